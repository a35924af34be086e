use ratatui::style::{Modifier, Style};

use crate::theme::SyntaxColors;

/// Capture names handed to tree-sitter; a highlight id indexes this list.
pub const HIGHLIGHT_NAMES: &[&str] = &[
    "attribute",
    "comment",
    "constant",
    "constant.builtin",
    "constructor",
    "escape",
    "function",
    "function.builtin",
    "function.method",
    "keyword",
    "label",
    "number",
    "operator",
    "property",
    "punctuation",
    "punctuation.bracket",
    "punctuation.delimiter",
    "punctuation.special",
    "string",
    "string.special",
    "tag",
    "type",
    "type.builtin",
    "variable",
    "variable.builtin",
    "variable.parameter",
];

pub fn highlight_names_vec() -> Vec<String> {
    HIGHLIGHT_NAMES.iter().map(|s| s.to_string()).collect()
}

/// Foreground style for a capture, drawn from the active theme's syntax slots.
pub fn style_for_highlight(idx: usize, syntax: &SyntaxColors) -> Style {
    let name = HIGHLIGHT_NAMES.get(idx).copied().unwrap_or("");
    let fg = match name {
        "comment" => syntax.comment,
        "keyword" => return Style::default().fg(syntax.keyword).add_modifier(Modifier::BOLD),
        "string" | "string.special" => syntax.string,
        "number" | "constant" | "constant.builtin" | "attribute" => syntax.number,
        "function" | "function.builtin" | "function.method" => syntax.function,
        "type" | "type.builtin" | "constructor" => syntax.type_name,
        "variable" | "variable.parameter" | "variable.builtin" => syntax.variable,
        "operator" | "escape" => syntax.operator,
        "property" | "label" => syntax.property,
        "tag" => syntax.tag,
        "punctuation" | "punctuation.bracket" | "punctuation.delimiter" | "punctuation.special" => {
            syntax.punctuation
        }
        _ => syntax.default_fg,
    };
    Style::default().fg(fg)
}
