//! Color themes and ANSI escape sequences.
//!
//! Built-in themes are compiled in from `themes/*.toml`; custom themes are
//! read from a TOML file at startup.
//!
//! # Built-in Themes
//!
//! - `catppuccin-mocha`: dark (default)
//! - `catppuccin-latte`: light
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#cdd6f4"
//! cursor_fg = "#1e1e2e"
//! cursor_bg = "#89b4fa"
//! checked_fg = "#a6e3a1"
//! text_normal = "#cdd6f4"
//! text_dim = "#6c7086"
//! border = "#45475a"
//! search_bar_border = "#f5c2e7"
//! match_highlight_fg = "#1e1e2e"
//! match_highlight_bg = "#f9e2af"
//! sort_indicator_fg = "#fab387"
//! empty_state_fg = "#89b4fa"
//! loading_fg = "#94e2d5"
//! status_fg = "#a6adc8"
//! error_fg = "#f38ba8"
//! ```

use crate::domain::error::{Result, TabulaError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Named color scheme.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Theme {
    /// Theme name.
    pub name: String,
    /// Palette.
    pub colors: ThemeColors,
}

/// Hex colors (`"#rrggbb"`) for every UI element.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ThemeColors {
    /// Title and column header text.
    pub header_fg: String,
    /// Optional title background.
    #[serde(default)]
    pub header_bg: Option<String>,

    /// Row under the cursor, foreground.
    pub cursor_fg: String,
    /// Row under the cursor, background.
    pub cursor_bg: String,

    /// Selected (checked) rows and checkboxes.
    pub checked_fg: String,
    /// Optional background for selected rows.
    #[serde(default)]
    pub checked_bg: Option<String>,

    /// Cell text.
    pub text_normal: String,
    /// Footer and hints.
    pub text_dim: String,

    /// Separator lines.
    pub border: String,

    /// Search box frame.
    pub search_bar_border: String,
    /// Search match foreground.
    pub match_highlight_fg: String,
    /// Search match background.
    pub match_highlight_bg: String,

    /// `▲`/`▼` next to the sorted column.
    pub sort_indicator_fg: String,

    /// Empty-state message.
    pub empty_state_fg: String,
    /// Loading message.
    pub loading_fg: String,

    /// Selected-count and informational status text.
    pub status_fg: String,
    /// Error status text.
    pub error_fg: String,
}

impl Theme {
    /// Loads a built-in theme by name.
    ///
    /// ```rust
    /// use tabula::ui::Theme;
    ///
    /// let theme = Theme::from_name("catppuccin-latte").unwrap();
    /// assert_eq!(theme.name, "catppuccin-latte");
    /// assert!(Theme::from_name("solarized").is_none());
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "catppuccin-mocha" => include_str!("../../themes/catppuccin-mocha.toml"),
            "catppuccin-latte" => include_str!("../../themes/catppuccin-latte.toml"),
            _ => return None,
        };

        toml::from_str(toml_str).ok()
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`TabulaError::Theme`] if the file cannot be read or is not a
    /// complete theme.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| TabulaError::Theme(format!("failed to read theme file: {e}")))?;

        toml::from_str(&contents).map_err(|e| TabulaError::Theme(format!("failed to parse theme TOML: {e}")))
    }

    /// `(r, g, b)` of a hex color; white when malformed.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim().trim_start_matches('#');

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).unwrap_or(255);
        (channel(0..2), channel(2..4), channel(4..6))
    }

    /// 24-bit foreground escape for a hex color.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// 24-bit background escape for a hex color.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    /// Bold.
    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    /// Dim.
    #[must_use]
    pub const fn dim() -> &'static str {
        "\u{001b}[2m"
    }

    /// Underline.
    #[must_use]
    pub const fn underline() -> &'static str {
        "\u{001b}[4m"
    }

    /// Clears all styling.
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    /// Catppuccin Mocha.
    ///
    /// # Panics
    ///
    /// Panics if the compiled-in theme fails to parse, which the theme tests
    /// rule out.
    fn default() -> Self {
        Self::from_name("catppuccin-mocha").expect("built-in catppuccin-mocha theme should always parse")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn built_in_themes_parse() {
        assert_eq!(Theme::default().name, "catppuccin-mocha");
        assert!(Theme::from_name("catppuccin-latte").is_some());
    }

    #[test]
    fn hex_colors_become_truecolor_escapes() {
        assert_eq!(Theme::fg("#ff8000"), "\u{1b}[38;2;255;128;0m");
        assert_eq!(Theme::bg("000000"), "\u{1b}[48;2;0;0;0m");
        assert_eq!(Theme::fg("#xyz"), "\u{1b}[38;2;255;255;255m");
    }

    #[test]
    fn theme_file_must_be_complete() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name = \"broken\"\n[colors]\nheader_fg = \"#ffffff\"").unwrap();

        let err = Theme::from_file(file.path()).unwrap_err();
        assert!(matches!(err, TabulaError::Theme(_)));
    }

    #[test]
    fn theme_file_round_trips_a_built_in() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let latte = Theme::from_name("catppuccin-latte").unwrap();
        write!(file, "{}", toml::to_string(&latte).unwrap()).unwrap();

        let loaded = Theme::from_file(file.path()).unwrap();
        assert_eq!(loaded.colors.cursor_bg, latte.colors.cursor_bg);
    }
}
