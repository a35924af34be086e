use std::path::Path;

use tree_sitter::QueryError;
use tree_sitter_highlight::HighlightConfiguration;

/// A bundled grammar and the file names it applies to.
pub struct LanguageEntry {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
    /// Extension-less files recognised by exact name.
    pub filenames: &'static [&'static str],
    config_fn: fn() -> Result<HighlightConfiguration, QueryError>,
}

impl LanguageEntry {
    pub fn config(&self, highlight_names: &[String]) -> Result<HighlightConfiguration, QueryError> {
        let mut config = (self.config_fn)()?;
        config.configure(highlight_names);
        Ok(config)
    }
}

macro_rules! lang {
    ($name:expr, $exts:expr, $lang_fn:expr, $highlights:expr) => {
        lang!($name, $exts, &[], $lang_fn, $highlights)
    };
    ($name:expr, $exts:expr, $files:expr, $lang_fn:expr, $highlights:expr) => {
        LanguageEntry {
            name: $name,
            extensions: $exts,
            filenames: $files,
            config_fn: || HighlightConfiguration::new($lang_fn.into(), $name, $highlights, "", ""),
        }
    };
}

pub fn language_entries() -> Vec<LanguageEntry> {
    vec![
        lang!(
            "rust",
            &["rs"],
            tree_sitter_rust::LANGUAGE,
            tree_sitter_rust::HIGHLIGHTS_QUERY
        ),
        lang!(
            "javascript",
            &["js", "jsx", "mjs", "cjs"],
            tree_sitter_javascript::LANGUAGE,
            tree_sitter_javascript::HIGHLIGHT_QUERY
        ),
        lang!(
            "typescript",
            &["ts", "tsx"],
            tree_sitter_typescript::LANGUAGE_TYPESCRIPT,
            tree_sitter_typescript::HIGHLIGHTS_QUERY
        ),
        lang!(
            "python",
            &["py", "pyi"],
            tree_sitter_python::LANGUAGE,
            tree_sitter_python::HIGHLIGHTS_QUERY
        ),
        lang!(
            "json",
            &["json", "jsonc"],
            tree_sitter_json::LANGUAGE,
            tree_sitter_json::HIGHLIGHTS_QUERY
        ),
        lang!(
            "toml",
            &["toml"],
            tree_sitter_toml_ng::LANGUAGE,
            tree_sitter_toml_ng::HIGHLIGHTS_QUERY
        ),
        lang!(
            "css",
            &["css"],
            tree_sitter_css::LANGUAGE,
            tree_sitter_css::HIGHLIGHTS_QUERY
        ),
        lang!(
            "html",
            &["html", "htm"],
            tree_sitter_html::LANGUAGE,
            tree_sitter_html::HIGHLIGHTS_QUERY
        ),
        lang!(
            "go",
            &["go"],
            tree_sitter_go::LANGUAGE,
            tree_sitter_go::HIGHLIGHTS_QUERY
        ),
        lang!(
            "ruby",
            &["rb", "rake", "gemspec"],
            &["Gemfile", "Rakefile"],
            tree_sitter_ruby::LANGUAGE,
            tree_sitter_ruby::HIGHLIGHTS_QUERY
        ),
        lang!(
            "bash",
            &["sh", "bash", "zsh"],
            &[".bashrc", ".zshrc", ".profile"],
            tree_sitter_bash::LANGUAGE,
            tree_sitter_bash::HIGHLIGHT_QUERY
        ),
        lang!(
            "yaml",
            &["yml", "yaml"],
            tree_sitter_yaml::LANGUAGE,
            tree_sitter_yaml::HIGHLIGHTS_QUERY
        ),
    ]
}

/// Language name for a path taken from a patch header, if one is bundled.
pub fn detect_language(path: &Path) -> Option<&'static str> {
    let filename = path.file_name()?.to_str()?;
    let ext = path.extension().and_then(|e| e.to_str());
    language_entries().into_iter().find_map(|entry| {
        let by_ext = ext.is_some_and(|ext| entry.extensions.contains(&ext));
        (by_ext || entry.filenames.contains(&filename)).then_some(entry.name)
    })
}
