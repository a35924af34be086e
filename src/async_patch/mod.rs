mod channel;
mod worker;

pub use channel::{PatchRequest, PatchResult};
pub use worker::PatchWorker;
