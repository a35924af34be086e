pub mod commands;
pub mod error;
pub mod extract;
pub mod patch;
pub mod reference;
pub mod runner;

pub use commands::GitCommands;
pub use error::VdiffError;
pub use patch::PatchFetcher;
pub use reference::{Reference, ReferenceKind};
pub use runner::{CommandRunner, ProcessRunner};
