//! Column headers and table rows.
//!
//! Rows are laid out as an optional checkbox gutter followed by the cells,
//! each padded to its column width and separated by two spaces. Header
//! titles carry the sort indicator of the sorted column; the focused column
//! is underlined.

use crate::ui::helpers::{self, pad_right, position_cursor, text_width, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{CheckState, ColumnHeader, DisplayRow};

const GAP: &str = "  ";

/// Renders the header row. Returns the next row.
pub fn render_column_headers(
    row: usize,
    columns: &[ColumnHeader],
    select_all: Option<CheckState>,
    theme: &Theme,
    cols: usize,
) -> usize {
    position_cursor(row, 1);
    let mut used = 0;

    if let Some(state) = select_all {
        let color = if state == CheckState::Unchecked {
            &theme.colors.text_dim
        } else {
            &theme.colors.checked_fg
        };
        print!("{}{} {}", Theme::fg(color), state.glyph(), Theme::reset());
        used += 4;
    }

    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            print!("{GAP}");
            used += GAP.len();
        }

        let indicator = column.sort_indicator();
        let room = column.width.saturating_sub(if indicator.is_empty() { 0 } else { 2 });
        let title = truncate(&column.title, room);

        print!("{}", Theme::bold());
        print!("{}", Theme::fg(&theme.colors.header_fg));
        if column.is_focused {
            print!("{}", Theme::underline());
        }
        if !column.sortable {
            print!("{}", Theme::dim());
        }
        print!("{}", pad_right(&title, room));
        print!("{}", Theme::reset());
        if !indicator.is_empty() {
            print!(" {}{indicator}{}", Theme::fg(&theme.colors.sort_indicator_fg), Theme::reset());
        }
        used += column.width;
    }

    print!("{}", " ".repeat(cols.saturating_sub(used)));
    row + 1
}

/// Renders `rows` starting at `row`. Returns the row after the last one.
pub fn render_table_rows(row: usize, rows: &[DisplayRow], widths: &[usize], theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for display_row in rows {
        current_row = render_table_row(current_row, display_row, widths, theme, cols);
    }
    current_row
}

/// Escape sequence for a row's base style.
///
/// Cursor styling wins over checked styling.
fn row_style(display_row: &DisplayRow, theme: &Theme) -> String {
    if display_row.is_cursor {
        format!("{}{}", Theme::fg(&theme.colors.cursor_fg), Theme::bg(&theme.colors.cursor_bg))
    } else if display_row.checked == Some(true) {
        let mut style = Theme::fg(&theme.colors.checked_fg);
        if let Some(bg) = &theme.colors.checked_bg {
            style.push_str(&Theme::bg(bg));
        }
        style
    } else {
        Theme::fg(&theme.colors.text_normal)
    }
}

fn render_table_row(row: usize, display_row: &DisplayRow, widths: &[usize], theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    let style = row_style(display_row, theme);
    print!("{style}");
    let mut used = 0;

    if let Some(checked) = display_row.checked {
        print!("{} ", if checked { "[x]" } else { "[ ]" });
        used += 4;
    }

    for (i, (cell, &width)) in display_row.cells.iter().zip(widths).enumerate() {
        if i > 0 {
            print!("{GAP}");
            used += GAP.len();
        }
        helpers::render_highlighted_text(&cell.text, &cell.highlight_ranges, theme, &style);
        print!("{}", " ".repeat(width.saturating_sub(text_width(&cell.text))));
        used += width;
    }

    print!("{}", " ".repeat(cols.saturating_sub(used)));
    print!("{}", Theme::reset());
    row + 1
}
