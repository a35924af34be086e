pub mod command_bar;
pub mod header;
pub mod patch_view;
pub mod reference_list;
pub mod status_bar;
pub mod text_input;

use ratatui::{layout::Rect, Frame};

use crate::state::AppState;

/// Trait for renderable TUI components.
pub trait Component {
    fn render(&self, frame: &mut Frame, area: Rect, state: &AppState);
}
