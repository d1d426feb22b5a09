//! Search input box.

use crate::ui::helpers::{position_cursor, text_width, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::SearchBarInfo;

/// Spaces left and right of the box.
const SEARCH_BOX_MARGIN: usize = 5;

/// Renders the three-line search box starting at `row`. Returns the row
/// after it.
///
/// ```text
/// [margin] ┌─────────────────┐ [margin]
/// [margin] │ Search: query▏  │ [margin]
/// [margin] └─────────────────┘ [margin]
/// ```
///
/// The frame is dimmed and the caret hidden while the results have focus.
pub fn render_search_bar(row: usize, search: &SearchBarInfo, theme: &Theme, cols: usize) -> usize {
    let box_width = cols.saturating_sub(SEARCH_BOX_MARGIN * 2);
    let inner_width = box_width.saturating_sub(2);
    let frame = if search.is_typing {
        Theme::fg(&theme.colors.search_bar_border)
    } else {
        Theme::fg(&theme.colors.border)
    };

    position_cursor(row, 1);
    print!("{}", " ".repeat(SEARCH_BOX_MARGIN));
    print!("{frame}┌{}┐", "─".repeat(inner_width));
    print!("{}", Theme::reset());

    let caret = if search.is_typing { "▏" } else { "" };
    let search_text = truncate(&format!(" Search: {}{caret}", search.query), inner_width);
    let padding = inner_width.saturating_sub(text_width(&search_text));

    position_cursor(row + 1, 1);
    print!("{}", " ".repeat(SEARCH_BOX_MARGIN));
    print!("{frame}│");
    print!("{}", Theme::fg(&theme.colors.text_normal));
    print!("{search_text}");
    print!("{}", " ".repeat(padding));
    print!("{frame}│");
    print!("{}", Theme::reset());

    position_cursor(row + 2, 1);
    print!("{}", " ".repeat(SEARCH_BOX_MARGIN));
    print!("{frame}└{}┘", "─".repeat(inner_width));
    print!("{}", Theme::reset());

    row + 3
}
