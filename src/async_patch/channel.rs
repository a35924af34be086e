use std::sync::Arc;

use crate::git::{Reference, VdiffError};

#[derive(Debug, Clone)]
pub struct PatchRequest {
    pub generation: u64,
    pub reference: Reference,
}

#[derive(Debug)]
pub struct PatchResult {
    pub generation: u64,
    pub reference: Reference,
    pub patch: Result<Arc<str>, VdiffError>,
    /// Cache size after this fetch, for the status bar.
    pub cached_patches: usize,
}
