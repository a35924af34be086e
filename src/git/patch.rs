use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::commands::GitCommands;
use super::error::VdiffError;
use super::reference::Reference;
use super::runner::CommandRunner;

/// Raw patch text keyed by the exact reference string.
///
/// Lives for the whole process and never evicts: the working set is however
/// many commits one person clicks through in a session.
#[derive(Debug, Default)]
pub struct PatchCache {
    entries: HashMap<String, Arc<str>>,
}

impl PatchCache {
    pub fn get(&self, reference: &str) -> Option<Arc<str>> {
        self.entries.get(reference).cloned()
    }

    pub fn insert(&mut self, reference: &str, patch: Arc<str>) {
        self.entries.insert(reference.to_string(), patch);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Materializes patches through git, one process per cache miss.
pub struct PatchFetcher<R> {
    runner: R,
    commands: GitCommands,
    cache: PatchCache,
}

impl<R: CommandRunner> PatchFetcher<R> {
    pub fn new(runner: R, commands: GitCommands) -> Self {
        Self {
            runner,
            commands,
            cache: PatchCache::default(),
        }
    }

    /// Patch text for `reference`. Input is re-validated here because the
    /// cache is keyed by whatever string the caller passes in. Failed runs
    /// are not cached so the next selection retries.
    pub fn fetch(&mut self, reference: &str) -> Result<Arc<str>, VdiffError> {
        let reference = Reference::validate(reference)?;
        if let Some(patch) = self.cache.get(reference.as_str()) {
            debug!(%reference, "patch cache hit");
            return Ok(patch);
        }

        debug!(%reference, "patch cache miss");
        let argv = self.commands.patch_args(&reference);
        let patch: Arc<str> = Arc::from(self.runner.run(&argv)?);
        self.cache.insert(reference.as_str(), Arc::clone(&patch));
        Ok(patch)
    }

    #[cfg(test)]
    pub fn cached(&self, reference: &str) -> Option<Arc<str>> {
        self.cache.get(reference)
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}
