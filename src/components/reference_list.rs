use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::git::ReferenceKind;
use crate::state::{AppState, FocusPanel};

use super::Component;

/// First visible row so that `selected` stays on screen.
pub fn list_scroll(selected: Option<usize>, inner_height: usize) -> usize {
    match selected {
        Some(selected) if inner_height > 0 && selected >= inner_height => {
            selected - inner_height + 1
        }
        _ => 0,
    }
}

/// Index of the reference under a click at `(col, row)`, if any.
pub fn row_at(area: Rect, col: u16, row: u16, selected: Option<usize>, len: usize) -> Option<usize> {
    let inside = col > area.x
        && col < area.x + area.width.saturating_sub(1)
        && row > area.y
        && row < area.y + area.height.saturating_sub(1);
    if !inside {
        return None;
    }
    let inner_height = area.height.saturating_sub(2) as usize;
    let index = list_scroll(selected, inner_height) + (row - area.y - 1) as usize;
    (index < len).then_some(index)
}

pub struct ReferenceList;

impl Component for ReferenceList {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let is_focused = state.focus == FocusPanel::References;
        let theme = &state.theme;

        let border_style = if is_focused {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text_muted)
        };

        let references = state.selection.references();
        let total = references.len();
        let block = Block::default()
            .title(format!(" Commits ({total}) "))
            .borders(Borders::ALL)
            .border_style(border_style);

        if references.is_empty() {
            let paragraph = Paragraph::new(" No commits or stashes")
                .style(Style::default().fg(theme.text_muted))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let inner_height = area.height.saturating_sub(2) as usize;
        let selected = state.selection.selected();
        let scroll = list_scroll(selected, inner_height);

        let lines: Vec<Line> = references
            .iter()
            .enumerate()
            .skip(scroll)
            .take(inner_height)
            .map(|(idx, reference)| {
                let is_selected = selected == Some(idx);
                let fg = match reference.kind() {
                    ReferenceKind::Commit => theme.text,
                    ReferenceKind::Stash => theme.warning,
                };
                let style = if is_selected && is_focused {
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD)
                        .bg(theme.selection_bg)
                } else if is_selected {
                    Style::default().fg(fg).bg(theme.selection_inactive_bg)
                } else {
                    Style::default().fg(fg)
                };
                let prefix = if is_selected { "\u{25b6}" } else { " " };
                Line::from(vec![
                    Span::styled(format!("{prefix} "), style),
                    Span::styled(reference.to_string(), style),
                ])
            })
            .collect();

        let scroll_info = match selected {
            Some(selected) if total > inner_height => format!(" {}/{} ", selected + 1, total),
            _ => String::new(),
        };

        let block = block.title_bottom(Line::from(scroll_info).right_aligned());
        let paragraph = Paragraph::new(lines).block(block);
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_scroll_keeps_selection_visible() {
        assert_eq!(list_scroll(None, 5), 0);
        assert_eq!(list_scroll(Some(4), 5), 0);
        assert_eq!(list_scroll(Some(5), 5), 1);
        assert_eq!(list_scroll(Some(3), 0), 0);
    }

    #[test]
    fn test_row_at() {
        let area = Rect::new(0, 2, 20, 7); // 5 inner rows starting at y=3
        assert_eq!(row_at(area, 5, 3, Some(0), 10), Some(0));
        assert_eq!(row_at(area, 5, 7, Some(0), 10), Some(4));
        // Border rows and columns are not rows.
        assert_eq!(row_at(area, 5, 2, Some(0), 10), None);
        assert_eq!(row_at(area, 0, 4, Some(0), 10), None);
        // Past the end of a short list.
        assert_eq!(row_at(area, 5, 6, Some(0), 2), None);
        // Scrolled: selection 9 with 5 rows shows 5..=9.
        assert_eq!(row_at(area, 5, 3, Some(9), 10), Some(5));
    }
}
