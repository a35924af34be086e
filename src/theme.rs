use ratatui::style::Color;
use serde::Deserialize;

/// Semantic colour slots for the browser.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // General UI
    pub accent: Color,
    pub text: Color,
    pub text_muted: Color,
    pub surface: Color,
    pub selection_bg: Color,
    pub selection_inactive_bg: Color,

    // Patch
    pub diff_add_bg: Color,
    pub diff_del_bg: Color,
    pub diff_add_fg: Color,
    pub diff_del_fg: Color,
    pub diff_hunk_header_fg: Color,
    /// Commit header and `diff --git` / `index` lines.
    pub diff_meta_fg: Color,

    // Status indicators
    pub success: Color,
    pub error: Color,
    pub warning: Color,

    pub syntax: SyntaxColors,
}

/// Syntax highlighting colour slots.
#[derive(Debug, Clone)]
pub struct SyntaxColors {
    pub comment: Color,
    pub keyword: Color,
    pub string: Color,
    pub number: Color,
    pub function: Color,
    pub type_name: Color,
    pub variable: Color,
    pub operator: Color,
    pub property: Color,
    pub tag: Color,
    pub punctuation: Color,
    pub default_fg: Color,
}

pub const THEME_NAMES: &[&str] = &["one-dark", "dracula", "tokyo-night"];

impl Theme {
    /// Unknown names fall back to one-dark.
    pub fn from_name(name: &str) -> Self {
        match name {
            "dracula" => dracula(),
            "tokyo-night" => tokyo_night(),
            _ => one_dark(),
        }
    }
}

pub fn next_theme(current: &str) -> &'static str {
    let idx = THEME_NAMES.iter().position(|&n| n == current).unwrap_or(0);
    THEME_NAMES[(idx + 1) % THEME_NAMES.len()]
}

pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// `[colors]` table from the config file; every slot is an optional `#rrggbb`.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ThemeOverrides {
    pub accent: Option<String>,
    pub text: Option<String>,
    pub text_muted: Option<String>,
    pub surface: Option<String>,
    pub selection_bg: Option<String>,
    pub selection_inactive_bg: Option<String>,
    pub diff_add_bg: Option<String>,
    pub diff_del_bg: Option<String>,
    pub diff_add_fg: Option<String>,
    pub diff_del_fg: Option<String>,
    pub diff_hunk_header_fg: Option<String>,
    pub diff_meta_fg: Option<String>,
    pub success: Option<String>,
    pub error: Option<String>,
    pub warning: Option<String>,
    #[serde(default)]
    pub syntax: Option<SyntaxOverrides>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SyntaxOverrides {
    pub comment: Option<String>,
    pub keyword: Option<String>,
    pub string: Option<String>,
    pub number: Option<String>,
    pub function: Option<String>,
    pub type_name: Option<String>,
    pub variable: Option<String>,
    pub operator: Option<String>,
    pub property: Option<String>,
    pub tag: Option<String>,
    pub punctuation: Option<String>,
    pub default_fg: Option<String>,
}

pub fn apply_overrides(theme: &mut Theme, overrides: &ThemeOverrides) {
    macro_rules! apply {
        ($target:expr, $source:expr, [$($field:ident),* $(,)?]) => {
            $(
                if let Some(c) = $source.$field.as_deref().and_then(parse_hex_color) {
                    $target.$field = c;
                }
            )*
        };
    }
    apply!(
        theme,
        overrides,
        [
            accent,
            text,
            text_muted,
            surface,
            selection_bg,
            selection_inactive_bg,
            diff_add_bg,
            diff_del_bg,
            diff_add_fg,
            diff_del_fg,
            diff_hunk_header_fg,
            diff_meta_fg,
            success,
            error,
            warning,
        ]
    );
    if let Some(ref syn) = overrides.syntax {
        apply!(
            theme.syntax,
            syn,
            [
                comment,
                keyword,
                string,
                number,
                function,
                type_name,
                variable,
                operator,
                property,
                tag,
                punctuation,
                default_fg,
            ]
        );
    }
}

// ── Built-in themes ──────────────────────────────────────────────

fn one_dark() -> Theme {
    Theme {
        name: "one-dark".to_string(),
        accent: Color::Cyan,
        text: Color::White,
        text_muted: Color::DarkGray,
        surface: Color::Rgb(30, 30, 30),
        selection_bg: Color::Rgb(40, 40, 50),
        selection_inactive_bg: Color::Rgb(35, 35, 45),
        diff_add_bg: Color::Rgb(0, 30, 0),
        diff_del_bg: Color::Rgb(40, 0, 0),
        diff_add_fg: Color::Green,
        diff_del_fg: Color::Red,
        diff_hunk_header_fg: Color::Magenta,
        diff_meta_fg: Color::Yellow,
        success: Color::Green,
        error: Color::Red,
        warning: Color::Yellow,
        syntax: SyntaxColors {
            comment: Color::Rgb(106, 115, 125),
            keyword: Color::Rgb(198, 120, 221),
            string: Color::Rgb(152, 195, 121),
            number: Color::Rgb(209, 154, 102),
            function: Color::Rgb(97, 175, 239),
            type_name: Color::Rgb(229, 192, 123),
            variable: Color::Rgb(171, 178, 191),
            operator: Color::Rgb(86, 182, 194),
            property: Color::Rgb(224, 108, 117),
            tag: Color::Rgb(224, 108, 117),
            punctuation: Color::Rgb(140, 140, 140),
            default_fg: Color::Rgb(171, 178, 191),
        },
    }
}

fn dracula() -> Theme {
    Theme {
        name: "dracula".to_string(),
        accent: Color::Rgb(139, 233, 253),
        text: Color::Rgb(248, 248, 242),
        text_muted: Color::Rgb(98, 114, 164),
        surface: Color::Rgb(40, 42, 54),
        selection_bg: Color::Rgb(68, 71, 90),
        selection_inactive_bg: Color::Rgb(55, 58, 75),
        diff_add_bg: Color::Rgb(15, 40, 15),
        diff_del_bg: Color::Rgb(45, 10, 10),
        diff_add_fg: Color::Rgb(80, 250, 123),
        diff_del_fg: Color::Rgb(255, 85, 85),
        diff_hunk_header_fg: Color::Rgb(255, 121, 198),
        diff_meta_fg: Color::Rgb(241, 250, 140),
        success: Color::Rgb(80, 250, 123),
        error: Color::Rgb(255, 85, 85),
        warning: Color::Rgb(241, 250, 140),
        syntax: SyntaxColors {
            comment: Color::Rgb(98, 114, 164),
            keyword: Color::Rgb(255, 121, 198),
            string: Color::Rgb(241, 250, 140),
            number: Color::Rgb(189, 147, 249),
            function: Color::Rgb(80, 250, 123),
            type_name: Color::Rgb(139, 233, 253),
            variable: Color::Rgb(248, 248, 242),
            operator: Color::Rgb(255, 121, 198),
            property: Color::Rgb(189, 147, 249),
            tag: Color::Rgb(255, 121, 198),
            punctuation: Color::Rgb(248, 248, 242),
            default_fg: Color::Rgb(248, 248, 242),
        },
    }
}

fn tokyo_night() -> Theme {
    Theme {
        name: "tokyo-night".to_string(),
        accent: Color::Rgb(122, 162, 247),
        text: Color::Rgb(192, 202, 245),
        text_muted: Color::Rgb(86, 95, 137),
        surface: Color::Rgb(26, 27, 38),
        selection_bg: Color::Rgb(41, 46, 66),
        selection_inactive_bg: Color::Rgb(33, 37, 55),
        diff_add_bg: Color::Rgb(10, 35, 15),
        diff_del_bg: Color::Rgb(45, 10, 15),
        diff_add_fg: Color::Rgb(158, 206, 106),
        diff_del_fg: Color::Rgb(247, 118, 142),
        diff_hunk_header_fg: Color::Rgb(187, 154, 247),
        diff_meta_fg: Color::Rgb(224, 175, 104),
        success: Color::Rgb(158, 206, 106),
        error: Color::Rgb(247, 118, 142),
        warning: Color::Rgb(224, 175, 104),
        syntax: SyntaxColors {
            comment: Color::Rgb(86, 95, 137),
            keyword: Color::Rgb(187, 154, 247),
            string: Color::Rgb(158, 206, 106),
            number: Color::Rgb(255, 158, 100),
            function: Color::Rgb(122, 162, 247),
            type_name: Color::Rgb(42, 195, 222),
            variable: Color::Rgb(192, 202, 245),
            operator: Color::Rgb(137, 221, 255),
            property: Color::Rgb(115, 218, 202),
            tag: Color::Rgb(247, 118, 142),
            punctuation: Color::Rgb(86, 95, 137),
            default_fg: Color::Rgb(192, 202, 245),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(parse_hex_color("0a0b0c"), Some(Color::Rgb(10, 11, 12)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#gg0000"), None);
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        assert_eq!(Theme::from_name("nope").name, "one-dark");
        assert_eq!(Theme::from_name("dracula").name, "dracula");
    }

    #[test]
    fn test_next_theme_cycles() {
        let mut name = "one-dark";
        for _ in 0..THEME_NAMES.len() {
            name = next_theme(name);
        }
        assert_eq!(name, "one-dark");
    }

    #[test]
    fn test_overrides_apply_valid_colors_only() {
        let mut theme = Theme::from_name("one-dark");
        let overrides = ThemeOverrides {
            accent: Some("#010203".to_string()),
            error: Some("not a color".to_string()),
            syntax: Some(SyntaxOverrides {
                keyword: Some("#ffffff".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        apply_overrides(&mut theme, &overrides);
        assert_eq!(theme.accent, Color::Rgb(1, 2, 3));
        assert_eq!(theme.error, Color::Red);
        assert_eq!(theme.syntax.keyword, Color::Rgb(255, 255, 255));
    }
}
