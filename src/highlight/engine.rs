use std::collections::HashMap;
use std::path::Path;

use ratatui::style::Style;
use tracing::warn;
use tree_sitter_highlight::{HighlightConfiguration, HighlightEvent, Highlighter};

use super::languages::{detect_language, language_entries};
use super::theme::{highlight_names_vec, style_for_highlight};
use crate::theme::SyntaxColors;

/// A styled byte range within one line.
#[derive(Debug, Clone)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
    pub style: Style,
}

/// Tree-sitter configurations for every bundled language, built once.
pub struct HighlightEngine {
    configs: HashMap<&'static str, HighlightConfiguration>,
}

impl HighlightEngine {
    pub fn new() -> Self {
        let highlight_names = highlight_names_vec();
        let configs = language_entries()
            .into_iter()
            .filter_map(|entry| match entry.config(&highlight_names) {
                Ok(config) => Some((entry.name, config)),
                Err(e) => {
                    warn!(language = entry.name, error = %e, "highlight query rejected");
                    None
                }
            })
            .collect();
        Self { configs }
    }

    /// Per-line spans for `content`, or `None` when the path's language is
    /// not bundled or the parse fails.
    pub fn highlight_lines(
        &self,
        path: &Path,
        content: &str,
        syntax: &SyntaxColors,
    ) -> Option<Vec<Vec<HighlightSpan>>> {
        let config = self.configs.get(detect_language(path)?)?;

        let mut highlighter = Highlighter::new();
        let events = highlighter
            .highlight(config, content.as_bytes(), None, |_| None)
            .ok()?;

        let lines: Vec<&str> = content.split('\n').collect();
        let mut result: Vec<Vec<HighlightSpan>> = vec![Vec::new(); lines.len()];
        let mut current_style = Style::default();

        for event in events {
            match event.ok()? {
                HighlightEvent::Source { start, end } => {
                    add_spans_for_range(&lines, &mut result, start, end, current_style);
                }
                HighlightEvent::HighlightStart(highlight) => {
                    current_style = style_for_highlight(highlight.0, syntax);
                }
                HighlightEvent::HighlightEnd => {
                    current_style = Style::default();
                }
            }
        }

        Some(result)
    }
}

impl Default for HighlightEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a byte range of the whole buffer into per-line spans.
fn add_spans_for_range(
    lines: &[&str],
    result: &mut [Vec<HighlightSpan>],
    start: usize,
    end: usize,
    style: Style,
) {
    if start >= end {
        return;
    }

    let mut line_start_byte = 0;
    for (line_idx, line) in lines.iter().enumerate() {
        if line_start_byte > end {
            break;
        }
        let line_end_byte = line_start_byte + line.len();

        if start <= line_end_byte && end > line_start_byte {
            let span_start = start.saturating_sub(line_start_byte).min(line.len());
            let span_end = (end - line_start_byte).min(line.len());
            if span_start < span_end {
                result[line_idx].push(HighlightSpan {
                    start: span_start,
                    end: span_end,
                    style,
                });
            }
        }

        // +1 for the newline
        line_start_byte = line_end_byte + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn test_range_split_across_lines() {
        let content = "abc\ndef\ng";
        let lines: Vec<&str> = content.split('\n').collect();
        let mut result = vec![Vec::new(); lines.len()];
        let style = Style::default().fg(Color::Red);
        add_spans_for_range(&lines, &mut result, 1, 6, style);

        assert_eq!((result[0][0].start, result[0][0].end), (1, 3));
        assert_eq!((result[1][0].start, result[1][0].end), (0, 2));
        assert!(result[2].is_empty());
    }

    #[test]
    fn test_empty_range_ignored() {
        let lines = vec!["abc"];
        let mut result = vec![Vec::new()];
        add_spans_for_range(&lines, &mut result, 2, 2, Style::default());
        assert!(result[0].is_empty());
    }

    #[test]
    fn test_unknown_language_is_none() {
        let engine = HighlightEngine::new();
        let syntax = crate::theme::Theme::from_name("one-dark").syntax;
        assert!(engine
            .highlight_lines(Path::new("notes.unknownext"), "hello", &syntax)
            .is_none());
    }

    #[test]
    fn test_rust_keywords_styled() {
        let engine = HighlightEngine::new();
        let syntax = crate::theme::Theme::from_name("one-dark").syntax;
        let spans = engine
            .highlight_lines(Path::new("src/lib.rs"), "fn main() {}\nlet x = 1;", &syntax)
            .unwrap();
        assert_eq!(spans.len(), 2);
        assert!(spans[0]
            .iter()
            .any(|s| s.style.fg == Some(syntax.keyword) && s.start == 0 && s.end == 2));
    }
}
