use crate::async_patch::{PatchRequest, PatchResult};
use crate::git::Reference;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionState {
    /// No references loaded.
    Empty,
    /// References loaded, nothing highlighted yet.
    Listed,
    /// `Reference` is the active selection; its patch was requested.
    Highlighted(Reference),
}

/// Owns the reference list and keeps the highlighted row in step with the
/// patch being shown. Every highlight change produces a [`PatchRequest`]
/// stamped with a fresh generation; only the result for the latest
/// generation is ever published.
#[derive(Debug)]
pub struct SelectionController {
    references: Vec<Reference>,
    selected: Option<usize>,
    state: SelectionState,
    generation: u64,
}

impl SelectionController {
    pub fn new() -> Self {
        Self {
            references: Vec::new(),
            selected: None,
            state: SelectionState::Empty,
            generation: 0,
        }
    }

    /// Replace the list and auto-highlight the first entry.
    pub fn load(&mut self, references: Vec<Reference>) -> Option<PatchRequest> {
        self.references = references;
        self.selected = None;
        if self.references.is_empty() {
            self.state = SelectionState::Empty;
            // Outstanding results belong to the old list.
            self.generation += 1;
            return None;
        }
        self.state = SelectionState::Listed;
        self.highlight(0)
    }

    /// Make `index` the active row. Out-of-range indices are ignored.
    pub fn highlight(&mut self, index: usize) -> Option<PatchRequest> {
        if self.state == SelectionState::Empty {
            return None;
        }
        let reference = self.references.get(index)?.clone();
        self.selected = Some(index);
        self.state = SelectionState::Highlighted(reference.clone());
        self.generation += 1;
        Some(PatchRequest {
            generation: self.generation,
            reference,
        })
    }

    pub fn select_up(&mut self) -> Option<PatchRequest> {
        let current = self.selected?;
        if current == 0 {
            return None;
        }
        self.highlight(current - 1)
    }

    pub fn select_down(&mut self) -> Option<PatchRequest> {
        let next = self.selected.map_or(0, |i| i + 1);
        if next >= self.references.len() {
            return None;
        }
        self.highlight(next)
    }

    pub fn select_first(&mut self) -> Option<PatchRequest> {
        self.move_to(0)
    }

    pub fn select_last(&mut self) -> Option<PatchRequest> {
        let last = self.references.len().checked_sub(1)?;
        self.move_to(last)
    }

    fn move_to(&mut self, index: usize) -> Option<PatchRequest> {
        if self.selected == Some(index) {
            return None;
        }
        self.highlight(index)
    }

    /// Ask again for the active reference, e.g. after a failed fetch.
    pub fn refetch(&mut self) -> Option<PatchRequest> {
        self.highlight(self.selected?)
    }

    /// Whether `result` answers the newest request for the active reference.
    /// Anything else is stale and must not reach the detail pane.
    pub fn accepts(&self, result: &PatchResult) -> bool {
        result.generation == self.generation
            && matches!(&self.state, SelectionState::Highlighted(active) if *active == result.reference)
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn active(&self) -> Option<&Reference> {
        match &self.state {
            SelectionState::Highlighted(reference) => Some(reference),
            _ => None,
        }
    }
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn refs(ids: &[&str]) -> Vec<Reference> {
        ids.iter().map(|id| Reference::parse(id).unwrap()).collect()
    }

    fn answer(req: &PatchRequest) -> PatchResult {
        PatchResult {
            generation: req.generation,
            reference: req.reference.clone(),
            patch: Ok(Arc::from(format!("patch {}", req.reference))),
            cached_patches: 0,
        }
    }

    #[test]
    fn test_load_empty() {
        let mut c = SelectionController::new();
        assert!(c.load(Vec::new()).is_none());
        assert_eq!(*c.state(), SelectionState::Empty);
        assert_eq!(c.selected(), None);
        assert!(c.highlight(0).is_none());
        assert!(c.select_down().is_none());
        assert!(c.refetch().is_none());
    }

    #[test]
    fn test_load_highlights_first() {
        let mut c = SelectionController::new();
        let req = c.load(refs(&["aaa111", "bbb222"])).unwrap();
        assert_eq!(req.reference.as_str(), "aaa111");
        assert_eq!(c.selected(), Some(0));
        assert_eq!(c.active().map(Reference::as_str), Some("aaa111"));
    }

    #[test]
    fn test_reload_replaces_list_and_resets_selection() {
        let mut c = SelectionController::new();
        c.load(refs(&["aaa111", "bbb222"]));
        c.highlight(1);
        let req = c.load(refs(&["ccc333"])).unwrap();
        assert_eq!(req.reference.as_str(), "ccc333");
        assert_eq!(c.references().len(), 1);
        assert_eq!(c.selected(), Some(0));
    }

    #[test]
    fn test_out_of_bounds_highlight_ignored() {
        let mut c = SelectionController::new();
        c.load(refs(&["aaa111", "bbb222"]));
        let before = c.state().clone();
        assert!(c.highlight(5).is_none());
        assert_eq!(*c.state(), before);
        assert_eq!(c.selected(), Some(0));
    }

    #[test]
    fn test_navigation_bounds() {
        let mut c = SelectionController::new();
        c.load(refs(&["aaa111", "bbb222", "ccc333"]));
        assert!(c.select_up().is_none());
        assert_eq!(c.select_down().unwrap().reference.as_str(), "bbb222");
        assert_eq!(c.select_last().unwrap().reference.as_str(), "ccc333");
        assert!(c.select_down().is_none());
        assert!(c.select_last().is_none());
        assert_eq!(c.select_first().unwrap().reference.as_str(), "aaa111");
    }

    #[test]
    fn test_stale_result_discarded() {
        let mut c = SelectionController::new();
        let initial = c.load(refs(&["aaa111", "bbb222"])).unwrap();
        let to_b = c.highlight(1).unwrap();
        let back_to_a = c.highlight(0).unwrap();

        assert!(!c.accepts(&answer(&initial)));
        assert!(!c.accepts(&answer(&to_b)));
        assert!(c.accepts(&answer(&back_to_a)));
        assert_eq!(c.active().map(Reference::as_str), Some("aaa111"));
    }

    #[test]
    fn test_result_after_reload_discarded() {
        let mut c = SelectionController::new();
        let req = c.load(refs(&["aaa111"])).unwrap();
        c.load(Vec::new());
        assert!(!c.accepts(&answer(&req)));
    }

    #[test]
    fn test_refetch_issues_new_generation() {
        let mut c = SelectionController::new();
        let first = c.load(refs(&["aaa111"])).unwrap();
        let retry = c.refetch().unwrap();
        assert_eq!(retry.reference, first.reference);
        assert!(retry.generation > first.generation);
        assert!(!c.accepts(&answer(&first)));
        assert!(c.accepts(&answer(&retry)));
    }
}
