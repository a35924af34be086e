use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::state::{AppState, DetailContent, FocusPanel};

use super::Component;

pub struct PatchView;

impl Component for PatchView {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let is_focused = state.focus == FocusPanel::Patch;
        let theme = &state.theme;
        let detail = &state.detail;

        let border_style = if is_focused {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text_muted)
        };

        let title = match detail.reference() {
            Some(reference) => format!(" {reference} "),
            None => " Patch ".to_string(),
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);

        let muted = Style::default().fg(theme.text_muted);
        let paragraph = match &detail.content {
            DetailContent::Empty => {
                let msg = if state.selection.references().is_empty() {
                    " Nothing to show. Enter a command above and press Enter."
                } else {
                    " Select a commit to view its patch"
                };
                Paragraph::new(msg).style(muted)
            }
            DetailContent::Loading(reference) => {
                Paragraph::new(format!(" Loading {reference}...")).style(muted)
            }
            DetailContent::Error { message, .. } => {
                let error = Style::default().fg(theme.error);
                let mut lines = vec![Line::styled(" Could not load patch", error)];
                lines.extend(message.lines().map(|l| Line::styled(format!(" {l}"), error)));
                lines.push(Line::default());
                lines.push(Line::styled(" Press r to retry", muted));
                Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false })
            }
            DetailContent::Patch { text, .. } => {
                let visible: Vec<Line> = text
                    .lines
                    .iter()
                    .skip(detail.scroll_offset)
                    .take(area.height.saturating_sub(2) as usize)
                    .cloned()
                    .collect();
                let total = text.lines.len();
                let info = if total > 0 {
                    format!(" {}/{} ", (detail.scroll_offset + 1).min(total), total)
                } else {
                    " empty patch ".to_string()
                };
                let block = block.title_bottom(Line::from(info).right_aligned());
                frame.render_widget(Paragraph::new(visible).block(block), area);
                return;
            }
        };

        frame.render_widget(paragraph.block(block), area);
    }
}
