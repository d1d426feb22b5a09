//! Which of the three table bodies to show.

/// Message shown when the view has no rows and no other message is set.
pub const DEFAULT_EMPTY_MESSAGE: &str = "No data available";

/// Body state of a table render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayState {
    /// Data is still arriving.
    Loading,
    /// The view has no rows.
    Empty {
        /// Text shown in place of the rows.
        message: String,
    },
    /// At least one row is visible.
    Populated,
}

/// Resolves the display state: loading wins over empty, empty over populated.
///
/// ```
/// use tabula::table::display::{resolve, DisplayState};
///
/// assert_eq!(resolve(true, 0, "none"), DisplayState::Loading);
/// assert_eq!(resolve(false, 3, "none"), DisplayState::Populated);
/// ```
#[must_use]
pub fn resolve(loading: bool, row_count: usize, empty_message: &str) -> DisplayState {
    if loading {
        DisplayState::Loading
    } else if row_count == 0 {
        DisplayState::Empty {
            message: empty_message.to_string(),
        }
    } else {
        DisplayState::Populated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_takes_priority_over_empty() {
        assert_eq!(resolve(true, 0, DEFAULT_EMPTY_MESSAGE), DisplayState::Loading);
        assert_eq!(resolve(true, 5, DEFAULT_EMPTY_MESSAGE), DisplayState::Loading);
    }

    #[test]
    fn empty_view_carries_message() {
        assert_eq!(
            resolve(false, 0, "Nothing here"),
            DisplayState::Empty {
                message: "Nothing here".to_string()
            }
        );
    }
}
