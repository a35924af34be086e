use ratatui::text::Text;

use crate::git::Reference;

/// What the patch pane currently shows.
#[derive(Debug, Clone, Default)]
pub enum DetailContent {
    #[default]
    Empty,
    Loading(Reference),
    Patch {
        reference: Reference,
        text: Text<'static>,
    },
    Error {
        reference: Reference,
        message: String,
    },
}

pub struct DetailState {
    pub content: DetailContent,
    pub scroll_offset: usize,
    pub viewport_height: usize,
}

impl DetailState {
    pub fn new() -> Self {
        Self {
            content: DetailContent::Empty,
            scroll_offset: 0,
            viewport_height: 20,
        }
    }

    pub fn clear(&mut self) {
        self.content = DetailContent::Empty;
        self.scroll_offset = 0;
    }

    /// Keep showing the previous patch's text while loading the same
    /// reference again; otherwise switch to a loading placeholder.
    pub fn set_loading(&mut self, reference: Reference) {
        if matches!(&self.content, DetailContent::Patch { reference: shown, .. } if *shown == reference)
        {
            return;
        }
        self.content = DetailContent::Loading(reference);
        self.scroll_offset = 0;
    }

    pub fn publish_patch(&mut self, reference: Reference, text: Text<'static>) {
        if self.reference() != Some(&reference) {
            self.scroll_offset = 0;
        }
        self.content = DetailContent::Patch { reference, text };
        self.clamp_scroll();
    }

    pub fn publish_error(&mut self, reference: Reference, message: String) {
        self.content = DetailContent::Error { reference, message };
        self.scroll_offset = 0;
    }

    pub fn reference(&self) -> Option<&Reference> {
        match &self.content {
            DetailContent::Empty => None,
            DetailContent::Loading(reference)
            | DetailContent::Patch { reference, .. }
            | DetailContent::Error { reference, .. } => Some(reference),
        }
    }

    pub fn line_count(&self) -> usize {
        match &self.content {
            DetailContent::Patch { text, .. } => text.lines.len(),
            DetailContent::Error { message, .. } => message.lines().count(),
            _ => 0,
        }
    }

    fn max_scroll(&self) -> usize {
        self.line_count().saturating_sub(self.viewport_height.max(1))
    }

    fn clamp_scroll(&mut self) {
        self.scroll_offset = self.scroll_offset.min(self.max_scroll());
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset = (self.scroll_offset + lines).min(self.max_scroll());
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.max_scroll();
    }
}

impl Default for DetailState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(id: &str) -> Reference {
        Reference::parse(id).unwrap()
    }

    fn text(lines: usize) -> Text<'static> {
        Text::from((0..lines).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n"))
    }

    #[test]
    fn test_scroll_clamped_to_content() {
        let mut d = DetailState::new();
        d.viewport_height = 10;
        d.publish_patch(reference("aaa111"), text(25));
        d.scroll_down(100);
        assert_eq!(d.scroll_offset, 15);
        d.scroll_up(4);
        assert_eq!(d.scroll_offset, 11);
        d.scroll_to_top();
        assert_eq!(d.scroll_offset, 0);
        d.scroll_to_bottom();
        assert_eq!(d.scroll_offset, 15);
    }

    #[test]
    fn test_short_patch_never_scrolls() {
        let mut d = DetailState::new();
        d.viewport_height = 10;
        d.publish_patch(reference("aaa111"), text(3));
        d.scroll_down(1);
        assert_eq!(d.scroll_offset, 0);
    }

    #[test]
    fn test_new_reference_resets_scroll() {
        let mut d = DetailState::new();
        d.viewport_height = 5;
        d.publish_patch(reference("aaa111"), text(30));
        d.scroll_down(10);
        d.set_loading(reference("bbb222"));
        assert!(matches!(d.content, DetailContent::Loading(_)));
        assert_eq!(d.scroll_offset, 0);
    }

    #[test]
    fn test_reload_same_reference_keeps_text_and_scroll() {
        let mut d = DetailState::new();
        d.viewport_height = 5;
        d.publish_patch(reference("aaa111"), text(30));
        d.scroll_down(10);
        d.set_loading(reference("aaa111"));
        assert!(matches!(d.content, DetailContent::Patch { .. }));
        d.publish_patch(reference("aaa111"), text(30));
        assert_eq!(d.scroll_offset, 10);
    }

    #[test]
    fn test_error_replaces_patch() {
        let mut d = DetailState::new();
        d.publish_patch(reference("aaa111"), text(3));
        d.publish_error(reference("aaa111"), "fatal: bad object".to_string());
        assert!(matches!(d.content, DetailContent::Error { .. }));
        assert_eq!(d.reference().map(Reference::as_str), Some("aaa111"));
    }

    #[test]
    fn test_retry_after_error_shows_loading() {
        let mut d = DetailState::new();
        d.publish_error(reference("aaa111"), "fatal: bad object".to_string());
        d.set_loading(reference("aaa111"));
        assert!(matches!(d.content, DetailContent::Loading(_)));
    }
}
