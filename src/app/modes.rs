//! Input mode state machine.
//!
//! - **Normal**: navigation, sorting and selection keys
//! - **Search**: the query is being typed, or results are being browsed with
//!   the query kept

/// Focus within search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    /// Keystrokes edit the query.
    Typing,

    /// Keystrokes navigate and select the filtered rows; `/` returns to
    /// typing.
    Navigating,
}

/// Current input handling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Default navigation and command mode.
    #[default]
    Normal,

    /// Search mode with its focus.
    Search(SearchFocus),
}

impl InputMode {
    /// Returns `true` while keystrokes go to the search query.
    #[must_use]
    pub const fn is_typing(self) -> bool {
        matches!(self, Self::Search(SearchFocus::Typing))
    }

    /// Returns `true` in either search focus.
    #[must_use]
    pub const fn is_search(self) -> bool {
        matches!(self, Self::Search(_))
    }
}
