use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// First visible char so that `cursor` stays inside `width` columns.
pub fn input_scroll(cursor: usize, width: usize) -> usize {
    if width == 0 {
        return cursor;
    }
    // Keep one column free for the cursor cell past the end.
    cursor.saturating_sub(width.saturating_sub(1))
}

/// Render a one-line input that scrolls horizontally with the cursor.
/// The cursor cell is drawn reversed when `show_cursor` is set.
pub fn render_text_input(
    frame: &mut Frame,
    area: Rect,
    text: &str,
    cursor: usize,
    style: Style,
    show_cursor: bool,
) {
    if area.width < 3 || area.height == 0 {
        return;
    }

    // 1 char left padding
    let inner_width = (area.width as usize).saturating_sub(1);
    let scroll = input_scroll(cursor, inner_width);
    let visible: Vec<char> = text.chars().skip(scroll).take(inner_width).collect();
    let cursor_col = cursor - scroll;

    let mut spans = vec![Span::styled(" ", style)];
    if show_cursor {
        let before: String = visible.iter().take(cursor_col).collect();
        let at = visible.get(cursor_col).copied().unwrap_or(' ');
        let after: String = visible.iter().skip(cursor_col + 1).collect();
        spans.push(Span::styled(before, style));
        spans.push(Span::styled(
            at.to_string(),
            style.add_modifier(Modifier::REVERSED),
        ));
        spans.push(Span::styled(after, style));
    } else {
        spans.push(Span::styled(visible.into_iter().collect::<String>(), style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
