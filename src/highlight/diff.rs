use std::path::Path;

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};

use super::engine::{HighlightEngine, HighlightSpan};
use crate::theme::Theme;

/// Role of one line of `git show` / `git stash show -p` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchLineKind {
    /// `commit <hash>` line.
    CommitHeader,
    /// `Author:`, `Date:`, `Merge:` and friends.
    CommitMeta,
    CommitMessage,
    /// `diff --git`, `---`, `+++`.
    FileHeader,
    /// `index`, mode, rename and binary notices.
    FileMeta,
    HunkHeader,
    Addition,
    Deletion,
    Context,
    /// `\ No newline at end of file`.
    NoNewline,
}

impl PatchLineKind {
    fn is_code(self) -> bool {
        matches!(
            self,
            PatchLineKind::Addition | PatchLineKind::Deletion | PatchLineKind::Context
        )
    }
}

/// Classify each line. A small state machine is enough: header until the
/// first `diff --git`, file header until the first `@@`, then hunk lines.
pub fn classify(patch: &str) -> Vec<PatchLineKind> {
    #[derive(PartialEq)]
    enum Section {
        Commit,
        FileHeader,
        Hunk,
    }

    let mut section = Section::Commit;
    patch
        .lines()
        .map(|line| {
            if line.starts_with("diff --git ") || line.starts_with("diff --cc ") {
                section = Section::FileHeader;
                return PatchLineKind::FileHeader;
            }
            match section {
                Section::Commit => {
                    if line.starts_with("commit ") {
                        PatchLineKind::CommitHeader
                    } else if is_commit_meta(line) {
                        PatchLineKind::CommitMeta
                    } else {
                        PatchLineKind::CommitMessage
                    }
                }
                Section::FileHeader => {
                    if line.starts_with("@@") {
                        section = Section::Hunk;
                        PatchLineKind::HunkHeader
                    } else if line.starts_with("--- ") || line.starts_with("+++ ") {
                        PatchLineKind::FileHeader
                    } else {
                        PatchLineKind::FileMeta
                    }
                }
                Section::Hunk => match line.as_bytes().first() {
                    Some(b'+') => PatchLineKind::Addition,
                    Some(b'-') => PatchLineKind::Deletion,
                    Some(b'\\') => PatchLineKind::NoNewline,
                    Some(b'@') if line.starts_with("@@") => PatchLineKind::HunkHeader,
                    _ => PatchLineKind::Context,
                },
            }
        })
        .collect()
}

fn is_commit_meta(line: &str) -> bool {
    const KEYS: &[&str] = &[
        "Author:",
        "AuthorDate:",
        "Commit:",
        "CommitDate:",
        "Date:",
        "Merge:",
    ];
    KEYS.iter().any(|k| line.starts_with(k))
}

/// Destination path from `diff --git a/<old> b/<new>`.
pub fn file_path_from_header(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("diff --git ")?;
    rest.rfind(" b/").map(|i| &rest[i + 3..])
}

/// Render a patch as styled text: diff structure colours plus tree-sitter
/// highlighting for the code of any bundled language. Produces exactly one
/// output line per input line.
pub fn highlight_patch(patch: &str, engine: &HighlightEngine, theme: &Theme) -> Text<'static> {
    let lines: Vec<&str> = patch.lines().collect();
    let kinds = classify(patch);
    let code_spans = highlight_code(&lines, &kinds, engine, theme);

    let rendered: Vec<Line<'static>> = lines
        .iter()
        .zip(&kinds)
        .zip(code_spans)
        .map(|((line, kind), spans)| render_line(line, *kind, spans.as_deref(), theme))
        .collect();
    Text::from(rendered)
}

/// Run each file section's code lines (prefix stripped) through the engine
/// as one buffer, so multi-line constructs get a fair parse.
fn highlight_code(
    lines: &[&str],
    kinds: &[PatchLineKind],
    engine: &HighlightEngine,
    theme: &Theme,
) -> Vec<Option<Vec<HighlightSpan>>> {
    let mut out: Vec<Option<Vec<HighlightSpan>>> = vec![None; lines.len()];
    let mut path: Option<&str> = None;
    let mut section: Vec<usize> = Vec::new();

    let mut flush = |path: Option<&str>, section: &mut Vec<usize>| {
        if let Some(path) = path {
            if !section.is_empty() {
                let buffer = section
                    .iter()
                    .map(|&i| lines[i].get(1..).unwrap_or(""))
                    .collect::<Vec<_>>()
                    .join("\n");
                if let Some(per_line) =
                    engine.highlight_lines(Path::new(path), &buffer, &theme.syntax)
                {
                    for (&i, spans) in section.iter().zip(per_line) {
                        out[i] = Some(spans);
                    }
                }
            }
        }
        section.clear();
    };

    for (i, (line, kind)) in lines.iter().zip(kinds).enumerate() {
        if *kind == PatchLineKind::FileHeader && line.starts_with("diff --git ") {
            flush(path, &mut section);
            path = file_path_from_header(line);
        } else if kind.is_code() {
            section.push(i);
        }
    }
    flush(path, &mut section);
    out
}

fn render_line(
    line: &str,
    kind: PatchLineKind,
    code_spans: Option<&[HighlightSpan]>,
    theme: &Theme,
) -> Line<'static> {
    let plain = |style: Style| Line::from(Span::styled(expand_tabs(line), style));
    match kind {
        PatchLineKind::CommitHeader => plain(
            Style::default()
                .fg(theme.diff_meta_fg)
                .add_modifier(Modifier::BOLD),
        ),
        PatchLineKind::CommitMeta => plain(Style::default().fg(theme.text_muted)),
        PatchLineKind::CommitMessage => plain(Style::default().fg(theme.text)),
        PatchLineKind::FileHeader => plain(Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
        PatchLineKind::FileMeta | PatchLineKind::NoNewline => {
            plain(Style::default().fg(theme.text_muted))
        }
        PatchLineKind::HunkHeader => plain(Style::default().fg(theme.diff_hunk_header_fg)),
        PatchLineKind::Addition | PatchLineKind::Deletion | PatchLineKind::Context => {
            render_code_line(line, kind, code_spans, theme)
        }
    }
}

fn render_code_line(
    line: &str,
    kind: PatchLineKind,
    code_spans: Option<&[HighlightSpan]>,
    theme: &Theme,
) -> Line<'static> {
    let (prefix_style, base) = match kind {
        PatchLineKind::Addition => (
            Style::default().fg(theme.diff_add_fg).bg(theme.diff_add_bg),
            Style::default().fg(theme.diff_add_fg).bg(theme.diff_add_bg),
        ),
        PatchLineKind::Deletion => (
            Style::default().fg(theme.diff_del_fg).bg(theme.diff_del_bg),
            Style::default().fg(theme.diff_del_fg).bg(theme.diff_del_bg),
        ),
        _ => (
            Style::default().fg(theme.text_muted),
            Style::default().fg(theme.syntax.default_fg),
        ),
    };

    let split = line.char_indices().nth(1).map_or(line.len(), |(i, _)| i);
    let (prefix, code) = line.split_at(split);
    let mut spans = vec![Span::styled(prefix.to_string(), prefix_style)];

    match code_spans {
        Some(highlights) if !highlights.is_empty() => {
            // Syntax colours win over the add/delete foreground; the
            // background still marks the change.
            let base = match kind {
                PatchLineKind::Context => base,
                _ => base.fg(theme.syntax.default_fg),
            };
            spans.extend(styled_segments(code, highlights, base));
        }
        _ => spans.push(Span::styled(expand_tabs(code), base)),
    }
    Line::from(spans)
}

/// Cover `code` completely: highlighted ranges take their style patched over
/// `base`, gaps get `base`.
fn styled_segments(code: &str, highlights: &[HighlightSpan], base: Style) -> Vec<Span<'static>> {
    let mut sorted: Vec<&HighlightSpan> = highlights.iter().collect();
    sorted.sort_by_key(|s| s.start);

    let mut segments = Vec::new();
    let mut pos = 0;
    for span in sorted {
        let start = span.start.max(pos);
        let end = span.end.min(code.len());
        if start >= end {
            continue;
        }
        let (Some(gap), Some(text)) = (code.get(pos..start), code.get(start..end)) else {
            continue;
        };
        if !gap.is_empty() {
            segments.push(Span::styled(expand_tabs(gap), base));
        }
        segments.push(Span::styled(expand_tabs(text), base.patch(span.style)));
        pos = end;
    }
    if let Some(rest) = code.get(pos..) {
        if !rest.is_empty() {
            segments.push(Span::styled(expand_tabs(rest), base));
        }
    }
    segments
}

fn expand_tabs(s: &str) -> String {
    s.replace('\t', "    ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    const PATCH: &str = "commit 0123456789abcdef0123456789abcdef01234567
Author: Jo Doe <jo@example.com>
Date:   Mon Jan 1 00:00:00 2024 +0000

    Add greeting

diff --git a/src/lib.rs b/src/lib.rs
index 1111111..2222222 100644
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1,2 +1,3 @@
 fn main() {
-    old();
+    println!(\"hi\");
+    new();
\\ No newline at end of file
diff --git a/notes.weird b/notes.weird
new file mode 100644
--- /dev/null
+++ b/notes.weird
@@ -0,0 +1 @@
+plain text
";

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_classify() {
        use PatchLineKind::*;
        let kinds = classify(PATCH);
        assert_eq!(
            &kinds[..16],
            &[
                CommitHeader,
                CommitMeta,
                CommitMeta,
                CommitMessage,
                CommitMessage,
                CommitMessage,
                FileHeader,
                FileMeta,
                FileHeader,
                FileHeader,
                HunkHeader,
                Context,
                Deletion,
                Addition,
                Addition,
                NoNewline,
            ]
        );
        assert_eq!(kinds[16], FileHeader);
        assert_eq!(kinds[17], FileMeta);
        assert_eq!(kinds.last(), Some(&Addition));
    }

    #[test]
    fn test_triple_dash_inside_hunk_is_deletion() {
        let kinds = classify("diff --git a/x b/x\n--- a/x\n+++ b/x\n@@ -1 +1 @@\n--- removed\n");
        assert_eq!(kinds[4], PatchLineKind::Deletion);
    }

    #[test]
    fn test_stash_patch_has_no_commit_header() {
        let kinds = classify("diff --git a/a.txt b/a.txt\n@@ -1 +1 @@\n-a\n+b\n");
        assert_eq!(kinds[0], PatchLineKind::FileHeader);
    }

    #[test]
    fn test_file_path_from_header() {
        assert_eq!(
            file_path_from_header("diff --git a/src/old.rs b/src/new.rs"),
            Some("src/new.rs")
        );
        assert_eq!(file_path_from_header("index 123..456"), None);
    }

    #[test]
    fn test_highlight_preserves_lines_and_text() {
        let engine = HighlightEngine::new();
        let theme = Theme::from_name("one-dark");
        let text = highlight_patch(PATCH, &engine, &theme);
        assert_eq!(text.lines.len(), PATCH.lines().count());
        for (rendered, original) in text.lines.iter().zip(PATCH.lines()) {
            assert_eq!(line_text(rendered), expand_tabs(original));
        }
    }

    #[test]
    fn test_change_markers_coloured() {
        let engine = HighlightEngine::new();
        let theme = Theme::from_name("one-dark");
        let text = highlight_patch(PATCH, &engine, &theme);

        let deletion = &text.lines[12];
        assert_eq!(deletion.spans[0].content, "-");
        assert_eq!(deletion.spans[0].style.fg, Some(theme.diff_del_fg));

        let addition = &text.lines[13];
        assert_eq!(addition.spans[0].style.bg, Some(theme.diff_add_bg));

        // Unknown language keeps the plain addition colour.
        let plain = text.lines.last().unwrap();
        assert_eq!(plain.spans[1].style.fg, Some(theme.diff_add_fg));
    }

    #[test]
    fn test_rust_code_gets_syntax_colours() {
        let engine = HighlightEngine::new();
        let theme = Theme::from_name("one-dark");
        let text = highlight_patch(PATCH, &engine, &theme);
        let context = &text.lines[11];
        assert!(context
            .spans
            .iter()
            .any(|s| s.content == "fn" && s.style.fg == Some(theme.syntax.keyword)));
    }

    #[test]
    fn test_styled_segments_fill_gaps() {
        let red = Style::default().fg(Color::Red);
        let spans = styled_segments(
            "let x = 1;",
            &[HighlightSpan {
                start: 4,
                end: 5,
                style: red,
            }],
            Style::default(),
        );
        let texts: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(texts, vec!["let ", "x", " = 1;"]);
        assert_eq!(spans[1].style.fg, Some(Color::Red));
    }

    #[test]
    fn test_empty_patch() {
        let engine = HighlightEngine::new();
        let text = highlight_patch("", &engine, &Theme::from_name("one-dark"));
        assert!(text.lines.is_empty());
    }
}
