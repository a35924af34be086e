use crate::theme::Theme;

use super::{CommandInput, DetailState, SelectionController};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPanel {
    Command,
    References,
    Patch,
}

impl FocusPanel {
    pub fn next(self) -> Self {
        match self {
            FocusPanel::Command => FocusPanel::References,
            FocusPanel::References => FocusPanel::Patch,
            FocusPanel::Patch => FocusPanel::Command,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FocusPanel::Command => FocusPanel::Patch,
            FocusPanel::References => FocusPanel::Command,
            FocusPanel::Patch => FocusPanel::References,
        }
    }
}

pub struct AppState {
    pub focus: FocusPanel,
    pub selection: SelectionController,
    pub detail: DetailState,
    pub command: CommandInput,
    pub theme: Theme,
    pub should_quit: bool,
    pub status_message: Option<(String, bool)>, // (message, is_error)
    /// Patches held in the fetch cache, as last reported by the worker.
    pub cached_patches: usize,
}

impl AppState {
    pub fn new(command: &str, theme: Theme) -> Self {
        Self {
            focus: FocusPanel::References,
            selection: SelectionController::new(),
            detail: DetailState::new(),
            command: CommandInput::new(command),
            theme,
            should_quit: false,
            status_message: None,
            cached_patches: 0,
        }
    }
}
