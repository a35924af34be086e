mod diff;
mod engine;
mod languages;
mod theme;

pub use diff::highlight_patch;
pub use engine::HighlightEngine;
