//! Loading indicator.

use super::empty::print_centered;
use crate::ui::theme::Theme;

/// Renders the loading message one blank line below `row`. Returns the row
/// after it.
pub fn render_loading(row: usize, theme: &Theme, cols: usize) -> usize {
    print_centered(row + 1, "Loading…", &Theme::fg(&theme.colors.loading_fg), cols);
    row + 2
}
