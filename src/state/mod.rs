pub mod app_state;
pub mod command_state;
pub mod detail_state;
pub mod selection_state;

pub use app_state::{AppState, FocusPanel};
pub use command_state::CommandInput;
pub use detail_state::{DetailContent, DetailState};
pub use selection_state::{SelectionController, SelectionState};
