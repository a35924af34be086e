use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::state::{AppState, FocusPanel};

use super::Component;

pub struct StatusBar;

fn bindings(focus: FocusPanel) -> &'static [(&'static str, &'static str)] {
    match focus {
        FocusPanel::Command => &[
            ("Enter", "run"),
            ("\u{2191}/\u{2193}", "history"),
            ("Tab", "focus"),
            ("Esc", "list"),
            ("^C", "quit"),
        ],
        FocusPanel::References => &[
            ("q", "quit"),
            ("j/k", "select"),
            ("g/G", "first/last"),
            ("PgUp/PgDn", "scroll"),
            ("Tab", "focus"),
            ("/", "command"),
            ("^R", "run"),
            ("r", "retry"),
            ("y", "yank"),
            ("T", "theme"),
        ],
        FocusPanel::Patch => &[
            ("q", "quit"),
            ("j/k", "scroll"),
            ("g/G", "top/bottom"),
            ("n/p", "next/prev"),
            ("Tab", "focus"),
            ("r", "retry"),
            ("y", "yank"),
            ("T", "theme"),
        ],
    }
}

impl Component for StatusBar {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let theme = &state.theme;

        // Status message wins over key hints
        if let Some((ref msg, is_error)) = state.status_message {
            let color = if is_error { theme.error } else { theme.success };
            let bar = Paragraph::new(Line::from(vec![
                Span::raw(" "),
                Span::styled(msg.as_str(), Style::default().fg(color)),
            ]))
            .style(Style::default().bg(theme.surface));
            frame.render_widget(bar, area);
            return;
        }

        let mut spans = vec![Span::raw(" ")];
        for (i, (key, desc)) in bindings(state.focus).iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(
                format!("[{key}]"),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(*desc, Style::default().fg(theme.text_muted)));
        }

        let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.surface));
        frame.render_widget(bar, area);
    }
}
