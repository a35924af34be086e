use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::state::{AppState, SelectionState};

use super::Component;

pub struct HeaderBar;

impl Component for HeaderBar {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;
        let count = state.selection.references().len();
        let noun = if count == 1 { "reference" } else { "references" };

        let mut spans = vec![
            Span::styled(" vdiff ", Style::default().fg(theme.surface).bg(theme.accent)),
            Span::raw("  "),
            Span::styled(
                format!("{count} {noun}"),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
        ];

        if let SelectionState::Highlighted(reference) = state.selection.state() {
            spans.push(Span::styled(" \u{2192} ", Style::default().fg(theme.text_muted)));
            spans.push(Span::styled(
                reference.short().to_string(),
                Style::default()
                    .fg(theme.diff_meta_fg)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("[{} cached]", state.cached_patches),
            Style::default().fg(theme.text_muted),
        ));
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("[{}]", theme.name),
            Style::default().fg(theme.text_muted),
        ));

        let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.surface));
        frame.render_widget(bar, area);
    }
}
