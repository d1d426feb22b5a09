//! Tabula: a sortable, selectable data table for Zellij.
//!
//! The crate has two halves:
//! - a reusable engine ([`table`]) that keeps a dataset, its column
//!   descriptors, a single-column sort, a text filter and a row selection
//!   keyed by stable row identity, and reports every selection change
//!   through a callback
//! - a Zellij plugin built on it: dataset loading and selection export in a
//!   worker, keyboard-driven navigation, and an ANSI renderer

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Zellij Plugin Shim (main.rs)                       │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling, actions, view models             │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Table Engine  │   │ Worker Layer  │
//! │ (ui/)         │   │ (table/)      │   │ (worker/)     │
//! │ - Rendering   │   │ - Sort        │   │ - Load JSON   │
//! │ - Theming     │   │ - Filter      │   │ - Export      │
//! │ - Components  │   │ - Selection   │   │ - IPC bridge  │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                              │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain & Dataset Layers                            │
//! │  - Values, records, columns, errors (domain/)       │
//! │  - Dataset files and sources (dataset/)             │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Configuration
//!
//! ```kdl
//! pane {
//!     plugin location="file:/path/to/tabula.wasm" {
//!         data_file "~/data/users.json"
//!         row_key "id"
//!         selectable "true"
//!         export_file "~/data/selected.json"
//!         max_height "15"
//!         theme "catppuccin-mocha"
//!         trace_level "info"
//!     }
//! }
//! ```
//!
//! Without `data_file` the plugin shows a built-in table of demo users.
//!
//! # Library Usage
//!
//! ```rust
//! use tabula::domain::{Column, Record};
//! use tabula::table::{DataTable, TableOptions};
//!
//! let columns = vec![Column::field("name", "Name", "name")];
//! let mut table = DataTable::new(columns, TableOptions::selectable());
//! table.set_records(vec![
//!     Record::new().with("name", "Bob"),
//!     Record::new().with("name", "Alice"),
//! ]);
//! table.click_header("name");
//! assert_eq!(table.row(0).map(|r| r.get("name").to_string()), Some("Alice".to_string()));
//! ```
//!
//! # Platform Support
//!
//! - **Target**: `wasm32-wasip1` (Zellij WASM runtime)
//! - The engine, dataset and app layers also build natively for tests

pub mod app;
pub mod dataset;
pub mod domain;
pub mod infrastructure;
pub mod table;
pub mod worker;

pub mod ui;

pub mod observability;

pub use app::{handle_event, Action, AppState, Event, InputMode, SearchFocus};
pub use domain::{Result, TabulaError};
pub use table::{DataTable, TableOptions};
pub use ui::Theme;

use std::collections::BTreeMap;

/// Plugin configuration parsed from Zellij's configuration system.
///
/// # Example
///
/// ```kdl
/// plugin location="file:/path/to/tabula.wasm" {
///     data_file "~/data/users.json"
///     row_key "email"
///     selectable "false"
///     empty_message "No users yet"
///     theme_file "/path/to/theme.toml"
///     trace_level "debug"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Dataset file, with `~` mapped into the sandbox. `None` shows the demo
    /// users.
    pub data_file: Option<String>,

    /// Record field used as row identity. Overrides the dataset's own
    /// `row_key`.
    pub row_key: Option<String>,

    /// Whether rows can be selected. Default: `true`
    pub selectable: bool,

    /// Text shown when no rows are visible. Default: `"No data available"`
    pub empty_message: String,

    /// Maximum table height; a plain integer caps the visible rows.
    pub max_height: Option<String>,

    /// File that receives the selected rows after every selection change.
    pub export_file: Option<String>,

    /// Built-in theme name: `catppuccin-mocha` or `catppuccin-latte`.
    /// Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file. See [`ui::theme`] for the format.
    pub theme_file: Option<String>,

    /// Tracing level filter. Options: `trace`, `debug`, `info`, `warn`,
    /// `error`. Default: `"info"`
    pub trace_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            row_key: None,
            selectable: true,
            empty_message: table::DEFAULT_EMPTY_MESSAGE.to_string(),
            max_height: None,
            export_file: None,
            theme_name: None,
            theme_file: None,
            trace_level: None,
        }
    }
}

impl Config {
    /// Parses configuration from Zellij's configuration map.
    ///
    /// # Parsing Rules
    ///
    /// - Blank values count as unset
    /// - `data_file`, `export_file`: `~` expands to `/host`
    /// - `selectable`: `true`/`false`/`yes`/`no`/`1`/`0`, anything else keeps
    ///   the default
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use tabula::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("data_file".to_string(), "~/users.json".to_string());
    /// map.insert("selectable".to_string(), "no".to_string());
    ///
    /// let config = Config::from_zellij(&map);
    /// assert_eq!(config.data_file.as_deref(), Some("/host/users.json"));
    /// assert!(!config.selectable);
    /// ```
    #[must_use]
    pub fn from_zellij(config: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| {
            config
                .get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(String::from)
        };

        let selectable = get("selectable")
            .and_then(|value| parse_bool(&value))
            .unwrap_or(true);

        Self {
            data_file: get("data_file").map(|p| infrastructure::expand_tilde(&p)),
            row_key: get("row_key"),
            selectable,
            empty_message: get("empty_message").unwrap_or_else(|| table::DEFAULT_EMPTY_MESSAGE.to_string()),
            max_height: get("max_height"),
            export_file: get("export_file").map(|p| infrastructure::expand_tilde(&p)),
            theme_name: get("theme"),
            theme_file: get("theme_file").map(|p| infrastructure::expand_tilde(&p)),
            trace_level: get("trace_level"),
        }
    }

    /// Table options derived from this configuration.
    #[must_use]
    pub fn table_options(&self) -> TableOptions {
        TableOptions {
            selectable: self.selectable,
            loading: true,
            empty_message: self.empty_message.clone(),
            max_height: self.max_height.clone(),
            row_key: self.row_key.clone(),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}

/// Creates the application state for `config`.
///
/// The table starts in the loading state; the plugin posts a `LoadDataset`
/// request once permissions are granted.
///
/// Theme resolution: `theme_file`, then `theme`, then the default. A theme
/// that fails to load falls back to the default.
///
/// # Example
///
/// ```rust
/// use tabula::{initialize, Config};
///
/// let state = initialize(&Config::default());
/// assert!(state.table.options().loading);
/// assert!(state.table.options().selectable);
/// ```
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!("initializing tabula plugin");

    let theme = config.theme_file.as_ref().map_or_else(
        || {
            config.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
                Theme::from_name(theme_name).unwrap_or_else(|| {
                    tracing::debug!(theme_name = %theme_name, "unknown theme, using default");
                    Theme::default()
                })
            })
        },
        |theme_file| {
            Theme::from_file(theme_file).unwrap_or_else(|e| {
                tracing::debug!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
                Theme::default()
            })
        },
    );

    let mut state = AppState::new(config.table_options(), theme);
    state.data_file.clone_from(&config.data_file);
    state.export_path.clone_from(&config.export_file);
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn empty_map_gives_defaults() {
        assert_eq!(Config::from_zellij(&BTreeMap::new()), Config::default());
    }

    #[test]
    fn blank_values_are_unset() {
        let config = Config::from_zellij(&map(&[("data_file", "  "), ("row_key", "")]));
        assert_eq!(config.data_file, None);
        assert_eq!(config.row_key, None);
    }

    #[test]
    fn invalid_selectable_keeps_default() {
        let config = Config::from_zellij(&map(&[("selectable", "maybe")]));
        assert!(config.selectable);
    }

    #[test]
    fn options_carry_config() {
        let config = Config::from_zellij(&map(&[
            ("row_key", "email"),
            ("max_height", "12"),
            ("empty_message", "Nothing yet"),
        ]));
        let options = config.table_options();
        assert_eq!(options.row_key.as_deref(), Some("email"));
        assert_eq!(options.max_visible_rows(), Some(12));
        assert_eq!(options.empty_message, "Nothing yet");
        assert!(options.loading);
    }

    #[test]
    fn initialize_falls_back_on_unknown_theme() {
        let config = Config {
            theme_name: Some("solarized".to_string()),
            export_file: Some("/host/out.json".to_string()),
            ..Config::default()
        };
        let state = initialize(&config);
        assert_eq!(state.theme.name, Theme::default().name);
        assert_eq!(state.export_path.as_deref(), Some("/host/out.json"));
    }
}
