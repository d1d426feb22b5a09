//! View model types representing renderable UI state.
//!
//! View models are computed by `AppState::compute_viewmodel()` and consumed by
//! the renderer. They hold display-ready text only: cells are already
//! formatted, truncated to their column width and paired with search match
//! ranges.
//!
//! # Example
//!
//! ```rust
//! use tabula::ui::viewmodel::{CheckState, FooterInfo, HeaderInfo, TableBody, UIViewModel};
//!
//! let vm = UIViewModel {
//!     header: HeaderInfo { title: " Tabula ".to_string() },
//!     search_bar: None,
//!     columns: vec![],
//!     select_all: Some(CheckState::Unchecked),
//!     body: TableBody::Loading,
//!     status_bar: Default::default(),
//!     footer: FooterInfo { keybindings: "q: quit".to_string() },
//! };
//! assert!(vm.search_bar.is_none());
//! ```

use crate::table::SortOrder;

/// Complete UI view model for rendering.
#[derive(Debug, Clone)]
pub struct UIViewModel {
    /// Title bar.
    pub header: HeaderInfo,

    /// Search input, present in search mode.
    pub search_bar: Option<SearchBarInfo>,

    /// Column headers with their final widths.
    pub columns: Vec<ColumnHeader>,

    /// Select-all checkbox state; `None` when rows are not selectable.
    pub select_all: Option<CheckState>,

    /// Loading indicator, empty message or rows.
    pub body: TableBody,

    /// Selected-count and status messages.
    pub status_bar: StatusBarInfo,

    /// Keybinding hints.
    pub footer: FooterInfo,
}

/// Tri-state checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    /// Every row selected: `[x]`.
    Checked,
    /// Some rows selected: `[-]`.
    Partial,
    /// Nothing selected: `[ ]`.
    Unchecked,
}

impl CheckState {
    /// Checkbox glyph.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Checked => "[x]",
            Self::Partial => "[-]",
            Self::Unchecked => "[ ]",
        }
    }
}

/// One column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    /// Header text.
    pub title: String,
    /// Width in terminal cells, shared with the cells below.
    pub width: usize,
    /// Sort direction shown next to the title.
    pub sort: SortOrder,
    /// Whether the column cursor is on this column.
    pub is_focused: bool,
    /// Whether the column can be sorted.
    pub sortable: bool,
}

impl ColumnHeader {
    /// `▲` for ascending, `▼` for descending, nothing otherwise.
    #[must_use]
    pub const fn sort_indicator(&self) -> &'static str {
        match self.sort {
            SortOrder::Ascending => "▲",
            SortOrder::Descending => "▼",
            SortOrder::None => "",
        }
    }
}

/// Table body in one of the three display states.
#[derive(Debug, Clone)]
pub enum TableBody {
    /// Data is loading.
    Loading,
    /// No rows to show.
    Empty(EmptyState),
    /// The visible window of rows.
    Rows(Vec<DisplayRow>),
}

/// One visible table row.
#[derive(Debug, Clone)]
pub struct DisplayRow {
    /// Formatted cells, one per column.
    pub cells: Vec<DisplayCell>,
    /// Whether the row cursor is on this row.
    pub is_cursor: bool,
    /// Checkbox state; `None` when rows are not selectable.
    pub checked: Option<bool>,
}

/// One formatted cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayCell {
    /// Text, already truncated to the column width.
    pub text: String,
    /// Character ranges matching the search query, `(start, end)` exclusive.
    pub highlight_ranges: Vec<(usize, usize)>,
}

/// Header display information.
#[derive(Debug, Clone)]
pub struct HeaderInfo {
    /// Title text.
    pub title: String,
}

/// Footer display information.
#[derive(Debug, Clone)]
pub struct FooterInfo {
    /// Keybinding help text.
    pub keybindings: String,
}

/// Empty state display information.
#[derive(Debug, Clone)]
pub struct EmptyState {
    /// Primary message, the table's empty message.
    pub message: String,

    /// Secondary hint.
    pub subtitle: String,
}

/// Search bar display information.
#[derive(Debug, Clone)]
pub struct SearchBarInfo {
    /// Current search query text.
    pub query: String,

    /// Whether keystrokes go to the query.
    pub is_typing: bool,
}

/// Line between the table and the footer.
#[derive(Debug, Clone, Default)]
pub struct StatusBarInfo {
    /// Pluralized selected-row count, when anything is selected.
    pub selection: Option<String>,

    /// Latest status message.
    pub message: Option<String>,

    /// Whether `message` reports a failure.
    pub is_error: bool,
}
