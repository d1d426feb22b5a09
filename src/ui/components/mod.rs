//! Component renderers and the screen layout.
//!
//! # Components
//!
//! - `header`: centered title
//! - `search`: search input box
//! - `table`: column headers and rows
//! - `loading`, `empty`: alternative table bodies
//! - `status`: selected-row count and status message
//! - `footer`: keybinding hints
//!
//! # Layout
//!
//! ```text
//! [blank line]
//! [Header]
//! [Border]
//! [Search Bar - 3 lines, search mode only]
//! [Column Headers]
//! [Rows | Loading | Empty]
//! [Blank padding]
//! [Status Bar]
//! [Border]
//! [Footer]
//! ```

mod empty;
mod footer;
mod header;
mod loading;
mod search;
mod status;
mod table;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{TableBody, UIViewModel};

use empty::render_empty_state;
use footer::render_footer;
use header::render_header;
use loading::render_loading;
use search::render_search_bar;
use status::render_status_bar;
use table::{render_column_headers, render_table_rows};

/// Renders a horizontal border on `row`. Returns the next row.
fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders the full screen for `vm`.
pub fn render_layout(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = 2; // row 1 stays blank

    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);
    if let Some(search) = &vm.search_bar {
        current_row = render_search_bar(current_row, search, theme, cols);
    }
    current_row = render_column_headers(current_row, &vm.columns, vm.select_all, theme, cols);

    match &vm.body {
        TableBody::Loading => {
            render_loading(current_row, theme, cols);
        }
        TableBody::Empty(empty) => {
            render_empty_state(current_row, empty, theme, cols);
        }
        TableBody::Rows(display_rows) => {
            let widths: Vec<usize> = vm.columns.iter().map(|c| c.width).collect();
            render_table_rows(current_row, display_rows, &widths, theme, cols);
        }
    }

    let footer_row = rows;
    let border_row = footer_row.saturating_sub(1);
    let status_row = border_row.saturating_sub(1);

    render_status_bar(status_row, &vm.status_bar, theme, cols);
    render_border(border_row, &theme.colors.border, cols);
    render_footer(footer_row, &vm.footer, theme, cols);
}
