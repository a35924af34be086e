use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::theme::{apply_overrides, Theme, ThemeOverrides};

const DEFAULT_THEME: &str = "one-dark";
const DEFAULT_COMMAND: &str = "git log";
const DEFAULT_FORMAT_FLAG: &str = "--pretty=%h";
const DEFAULT_GIT: &str = "git";

#[derive(Debug, Clone)]
pub struct VdiffConfig {
    pub theme_name: String,
    pub colors: Option<ThemeOverrides>,
    /// Prefilled query in the command bar.
    pub command: String,
    /// Appended to query commands that don't pick a format themselves.
    pub format_flag: String,
    pub git: String,
    pub log_file: Option<PathBuf>,
}

impl Default for VdiffConfig {
    fn default() -> Self {
        Self {
            theme_name: DEFAULT_THEME.to_string(),
            colors: None,
            command: DEFAULT_COMMAND.to_string(),
            format_flag: DEFAULT_FORMAT_FLAG.to_string(),
            git: DEFAULT_GIT.to_string(),
            log_file: None,
        }
    }
}

impl VdiffConfig {
    /// Named theme with the `[colors]` overrides laid on top.
    pub fn theme(&self, name: &str) -> Theme {
        let mut theme = Theme::from_name(name);
        if let Some(ref overrides) = self.colors {
            apply_overrides(&mut theme, overrides);
        }
        theme
    }
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    theme: Option<String>,
    #[serde(default)]
    colors: Option<ThemeOverrides>,
    #[serde(default)]
    command: Option<String>,
    #[serde(default)]
    format_flag: Option<String>,
    #[serde(default)]
    git: Option<String>,
    #[serde(default)]
    log_file: Option<PathBuf>,
}

pub fn config_path() -> PathBuf {
    let mut path = dirs_home().unwrap_or_else(|| PathBuf::from("."));
    path.push(".config");
    path.push("vdiff");
    path.push("config.toml");
    path
}

pub fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Parse config file contents. Missing keys take their defaults; blank
/// strings count as missing.
pub fn parse_config(contents: &str) -> Result<VdiffConfig, toml::de::Error> {
    let file: ConfigFile = toml::from_str(contents)?;
    let defaults = VdiffConfig::default();
    let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

    Ok(VdiffConfig {
        theme_name: non_blank(file.theme).unwrap_or(defaults.theme_name),
        colors: file.colors,
        command: non_blank(file.command).unwrap_or(defaults.command),
        format_flag: non_blank(file.format_flag).unwrap_or(defaults.format_flag),
        git: non_blank(file.git).unwrap_or(defaults.git),
        log_file: file.log_file,
    })
}

/// Load config from `~/.config/vdiff/config.toml`, falling back to defaults.
pub fn load_config() -> VdiffConfig {
    load_config_from(&config_path())
}

pub fn load_config_from(path: &Path) -> VdiffConfig {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return VdiffConfig::default(),
    };
    // Logging isn't up yet when config loads; a bad file just means defaults.
    parse_config(&contents).unwrap_or_default()
}

/// Write the chosen theme back to the config file, keeping every other key.
pub fn save_theme(theme_name: &str) -> std::io::Result<()> {
    save_theme_to(&config_path(), theme_name)
}

/// A file that exists but doesn't parse is left untouched and reported as
/// `InvalidData`.
pub fn save_theme_to(path: &Path, theme_name: &str) -> std::io::Result<()> {
    let mut table = match std::fs::read_to_string(path) {
        Ok(contents) => contents
            .parse::<toml::Table>()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => toml::Table::new(),
        Err(e) => return Err(e),
    };

    table.insert(
        "theme".to_string(),
        toml::Value::String(theme_name.to_string()),
    );

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_string = toml::to_string_pretty(&table)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(path, toml_string)
}
