use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::state::{AppState, FocusPanel};

use super::text_input::render_text_input;
use super::Component;

pub const BUTTON_LABEL: &str = "[ Get Diffs ]";

/// Input and button areas inside the bordered command bar.
pub fn command_bar_areas(area: Rect) -> (Rect, Rect) {
    let inner = Block::default().borders(Borders::ALL).inner(area);
    let button_width = BUTTON_LABEL.len() as u16 + 1;
    let parts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(button_width)])
        .split(inner);
    (parts[0], parts[1])
}

pub struct CommandBar;

impl Component for CommandBar {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState) {
        let is_focused = state.focus == FocusPanel::Command;
        let theme = &state.theme;

        let border_style = if is_focused {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text_muted)
        };
        let block = Block::default()
            .title(" Command ")
            .borders(Borders::ALL)
            .border_style(border_style);
        frame.render_widget(block, area);

        let (input_area, button_area) = command_bar_areas(area);
        render_text_input(
            frame,
            input_area,
            state.command.text(),
            state.command.cursor_char_index(),
            Style::default().fg(theme.text),
            is_focused,
        );

        let button = Paragraph::new(BUTTON_LABEL).style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_widget(button, button_area);
    }
}
