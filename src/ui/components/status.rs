//! Status bar: selected-row count on the left, latest message on the right.

use crate::ui::helpers::{position_cursor, text_width, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::StatusBarInfo;

/// Renders the status bar on `row`. Returns the next row.
pub fn render_status_bar(row: usize, status: &StatusBarInfo, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);

    let selection = status.selection.as_deref().map(|s| format!(" {s}")).unwrap_or_default();
    let selection = truncate(&selection, cols);
    let selection_len = text_width(&selection);
    print!("{}{}{selection}", Theme::bold(), Theme::fg(&theme.colors.checked_fg));
    print!("{}", Theme::reset());

    let room = cols.saturating_sub(selection_len + 2);
    let message = status.message.as_deref().map(|m| truncate(m, room)).unwrap_or_default();
    let message_len = text_width(&message);
    let color = if status.is_error {
        &theme.colors.error_fg
    } else {
        &theme.colors.status_fg
    };

    print!("{}", " ".repeat(cols.saturating_sub(selection_len + message_len + 1)));
    print!("{}{message} {}", Theme::fg(color), Theme::reset());
    row + 1
}
