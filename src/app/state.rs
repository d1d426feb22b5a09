//! Application state and view model computation.
//!
//! [`AppState`] wraps the [`DataTable`] engine with the interactive state the
//! plugin needs: a row cursor, a column cursor, the input mode and search
//! query, and a status line. It is the single source of truth for rendering;
//! view models are computed from it on demand.
//!
//! # Selection notifications
//!
//! The table's row-selection callback pushes each new selection into a
//! channel owned by the state. The event handler drains it after every event
//! with [`AppState::take_selection_changes`] and turns the changes into worker
//! exports.
//!
//! # Example
//!
//! ```rust
//! use tabula::app::AppState;
//! use tabula::dataset::sample_users;
//! use tabula::table::TableOptions;
//! use tabula::ui::Theme;
//!
//! let mut state = AppState::new(TableOptions::selectable(), Theme::default());
//! state.install_dataset("sample users", sample_users());
//! state.toggle_cursor_row();
//! assert_eq!(state.take_selection_changes().len(), 1);
//! let viewmodel = state.compute_viewmodel(24, 100);
//! assert_eq!(viewmodel.columns.len(), 6);
//! ```

use super::modes::{InputMode, SearchFocus};
use crate::dataset::Dataset;
use crate::domain::{Column, Record};
use crate::table::{filter, DataTable, DisplayState, TableOptions};
use crate::ui::helpers::{fit_widths, match_ranges, text_width, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    CheckState, ColumnHeader, DisplayCell, DisplayRow, EmptyState, FooterInfo, HeaderInfo, SearchBarInfo,
    StatusBarInfo, TableBody, UIViewModel,
};
use std::sync::mpsc::{self, Receiver};

/// Width of the checkbox gutter, `"[x] "`.
const CHECKBOX_WIDTH: usize = 4;
/// Spaces between columns.
const COLUMN_GAP: usize = 2;
/// Upper bound for auto-sized columns.
const MAX_AUTO_WIDTH: usize = 32;
/// Columns never shrink below this.
const MIN_COLUMN_WIDTH: usize = 4;

/// Latest message shown under the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    /// Informational message.
    Info(String),
    /// Failure message.
    Error(String),
}

/// Central application state container.
#[derive(Debug)]
pub struct AppState {
    /// The sort/selection engine holding the dataset.
    pub table: DataTable,

    /// Zero-based cursor position within the table view.
    ///
    /// Clamped whenever the view changes length; wraps during navigation.
    pub cursor: usize,

    /// Index of the focused column, used by the sort-focused key.
    pub column_cursor: usize,

    /// Current input handling mode.
    pub input_mode: InputMode,

    /// Current search query, mirrored into the table filter.
    pub search_query: String,

    /// Color scheme for rendering.
    pub theme: Theme,

    /// Latest status message.
    pub status: Option<StatusLine>,

    /// Where the dataset came from, shown in the header.
    pub source: Option<String>,

    /// Configured dataset file; `None` loads the sample users.
    pub data_file: Option<String>,

    /// Configured export file for selections.
    pub export_path: Option<String>,

    /// Row key from configuration; overrides the dataset's own.
    configured_row_key: Option<String>,

    selection_rx: Receiver<Vec<Record>>,
}

impl AppState {
    /// Creates a state with an empty, loading table.
    ///
    /// The table's selection callback is wired to the state's selection
    /// channel.
    #[must_use]
    pub fn new(options: TableOptions, theme: Theme) -> Self {
        let configured_row_key = options.row_key.clone();
        let mut table = DataTable::new(Vec::new(), options);
        table.set_loading(true);

        let (tx, selection_rx) = mpsc::channel();
        table.on_row_select(Box::new(move |rows: &[&Record]| {
            let owned: Vec<Record> = rows.iter().map(|&row| row.clone()).collect();
            if tx.send(owned).is_err() {
                tracing::debug!("selection receiver dropped");
            }
        }));

        Self {
            table,
            cursor: 0,
            column_cursor: 0,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            theme,
            status: None,
            source: None,
            data_file: None,
            export_path: None,
            configured_row_key,
            selection_rx,
        }
    }

    /// Installs a freshly loaded dataset and clears the loading flag.
    pub fn install_dataset(&mut self, source: &str, dataset: Dataset) {
        let _span = tracing::debug_span!("install_dataset", source = %source, rows = dataset.rows.len()).entered();

        let row_key = self.configured_row_key.clone().or_else(|| dataset.row_key.clone());
        let columns = dataset.table_columns();

        self.table.set_row_key(row_key);
        self.table.set_data(columns, dataset.rows);
        self.table.set_loading(false);

        self.source = Some(source.to_string());
        self.column_cursor = self.column_cursor.min(self.table.columns().len().saturating_sub(1));
        self.clamp_cursor();
    }

    /// Selections emitted by the table since the last call, oldest first.
    pub fn take_selection_changes(&mut self) -> Vec<Vec<Record>> {
        self.selection_rx.try_iter().collect()
    }

    /// Moves the cursor down, wrapping to the top. No-op on an empty view.
    pub fn move_cursor_down(&mut self) {
        let len = self.table.len();
        if len == 0 {
            return;
        }
        self.cursor = (self.cursor + 1) % len;
    }

    /// Moves the cursor up, wrapping to the bottom. No-op on an empty view.
    pub fn move_cursor_up(&mut self) {
        let len = self.table.len();
        if len == 0 {
            return;
        }
        self.cursor = if self.cursor == 0 { len - 1 } else { self.cursor - 1 };
    }

    /// Focuses the next column, wrapping.
    pub fn move_column_right(&mut self) {
        let len = self.table.columns().len();
        if len > 0 {
            self.column_cursor = (self.column_cursor + 1) % len;
        }
    }

    /// Focuses the previous column, wrapping.
    pub fn move_column_left(&mut self) {
        let len = self.table.columns().len();
        if len > 0 {
            self.column_cursor = if self.column_cursor == 0 { len - 1 } else { self.column_cursor - 1 };
        }
    }

    /// The focused column.
    #[must_use]
    pub fn focused_column(&self) -> Option<&Column> {
        self.table.columns().get(self.column_cursor)
    }

    /// Clicks the header of the column at `index`. Returns `true` if the sort
    /// changed.
    pub fn sort_column(&mut self, index: usize) -> bool {
        let Some(key) = self.table.columns().get(index).map(|c| c.key.clone()) else {
            return false;
        };
        self.column_cursor = index;
        self.table.click_header(&key)
    }

    /// Clicks the header of the focused column.
    pub fn sort_focused(&mut self) -> bool {
        self.sort_column(self.column_cursor)
    }

    /// Toggles the row under the cursor.
    pub fn toggle_cursor_row(&mut self) -> bool {
        self.table.toggle_row(self.cursor)
    }

    /// Mirrors the search query into the table filter and clamps the cursor.
    pub fn apply_search_filter(&mut self) {
        let _span = tracing::debug_span!("apply_search_filter", query_len = self.search_query.len()).entered();

        self.table.set_filter(&self.search_query);
        self.clamp_cursor();

        tracing::debug!(visible = self.table.len(), "search filter applied");
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.table.len().saturating_sub(1));
    }

    /// Computes the view model for a `rows` × `cols` pane.
    ///
    /// # Windowing
    ///
    /// The visible window holds as many rows as fit below the chrome, capped
    /// by the table's `max_height` when that is a row count, and is centered
    /// on the cursor where possible.
    ///
    /// # Column widths
    ///
    /// Each column uses its configured width, or the widest of its title and
    /// visible cells (capped), then all columns shrink together to fit `cols`.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let selectable = self.table.options().selectable;
        let terms = filter::terms(&self.search_query).unwrap_or_default();

        let (start, end) = self.visible_window(rows);
        let raw_cells: Vec<Vec<String>> = (start..end)
            .filter_map(|position| {
                let record = self.table.row(position)?;
                Some(self.table.columns().iter().map(|c| c.display(record, position)).collect())
            })
            .collect();

        let widths = self.column_widths(&raw_cells, cols, selectable);
        let columns = self.compute_column_headers(&widths);

        let body = match self.table.display_state() {
            DisplayState::Loading => TableBody::Loading,
            DisplayState::Empty { message } => TableBody::Empty(EmptyState {
                subtitle: self.empty_subtitle(),
                message,
            }),
            DisplayState::Populated => TableBody::Rows(
                raw_cells
                    .into_iter()
                    .enumerate()
                    .map(|(offset, cells)| {
                        let position = start + offset;
                        DisplayRow {
                            cells: cells
                                .iter()
                                .zip(&widths)
                                .map(|(text, &width)| {
                                    let text = truncate(text, width);
                                    DisplayCell {
                                        highlight_ranges: match_ranges(&text, &terms),
                                        text,
                                    }
                                })
                                .collect(),
                            is_cursor: position == self.cursor,
                            checked: selectable.then(|| self.table.is_selected(position)),
                        }
                    })
                    .collect(),
            ),
        };

        UIViewModel {
            header: self.compute_header(),
            search_bar: self.compute_search_bar(),
            columns,
            select_all: selectable.then(|| self.compute_select_all()),
            body,
            status_bar: self.compute_status_bar(),
            footer: self.compute_footer(),
        }
    }

    /// Rows available for table rows after the chrome.
    ///
    /// Chrome: blank line, title, border, column headers, status bar, border
    /// and footer; the search box adds three more lines.
    fn available_rows(&self, total_rows: usize) -> usize {
        let chrome = if self.input_mode.is_search() { 10 } else { 7 };
        let fit = total_rows.saturating_sub(chrome);
        self.table
            .options()
            .max_visible_rows()
            .map_or(fit, |cap| fit.min(cap))
    }

    /// `[start, end)` of the view positions to draw.
    fn visible_window(&self, total_rows: usize) -> (usize, usize) {
        let len = self.table.len();
        let available = self.available_rows(total_rows);

        let mut start = self.cursor.saturating_sub(available / 2);
        let end = (start + available).min(len);
        if end - start < available && len >= available {
            start = end.saturating_sub(available);
        }
        (start.min(end), end)
    }

    fn column_widths(&self, cells: &[Vec<String>], cols: usize, selectable: bool) -> Vec<usize> {
        let columns = self.table.columns();

        let preferred: Vec<usize> = columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                column.width.unwrap_or_else(|| {
                    // title plus room for the sort indicator
                    let title = text_width(&column.title) + 2;
                    let widest_cell = cells.iter().filter_map(|row| row.get(i)).map(|t| text_width(t)).max();
                    title.max(widest_cell.unwrap_or(0)).min(MAX_AUTO_WIDTH)
                })
            })
            .collect();

        let gutter = if selectable { CHECKBOX_WIDTH } else { 0 };
        let gaps = COLUMN_GAP * columns.len().saturating_sub(1);
        fit_widths(&preferred, cols.saturating_sub(gutter + gaps), MIN_COLUMN_WIDTH)
    }

    fn compute_column_headers(&self, widths: &[usize]) -> Vec<ColumnHeader> {
        let sort = self.table.sort_state();
        self.table
            .columns()
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (column, &width))| ColumnHeader {
                title: column.title.clone(),
                width,
                sort: sort.order_for(&column.key),
                is_focused: i == self.column_cursor,
                sortable: column.sortable,
            })
            .collect()
    }

    fn compute_select_all(&self) -> CheckState {
        let summary = self.table.summary();
        if summary.all_selected() {
            CheckState::Checked
        } else if summary.partially_selected() {
            CheckState::Partial
        } else {
            CheckState::Unchecked
        }
    }

    fn empty_subtitle(&self) -> String {
        if !self.search_query.trim().is_empty() && self.table.dataset_len() > 0 {
            format!("No rows match \"{}\"", self.search_query.trim())
        } else {
            "Press r to reload".to_string()
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        let source = self.source.as_deref().unwrap_or("loading");
        let visible = self.table.len();
        let total = self.table.dataset_len();
        let count = if visible == total {
            total.to_string()
        } else {
            format!("{visible}/{total}")
        };
        HeaderInfo {
            title: format!(" Tabula: {source} ({count}) "),
        }
    }

    fn compute_footer(&self) -> FooterInfo {
        let selectable = self.table.options().selectable;
        let keybindings = match (self.input_mode, selectable) {
            (InputMode::Search(SearchFocus::Typing), _) => "ESC: exit search  Enter: browse results  Type to filter",
            (InputMode::Search(SearchFocus::Navigating), true) => {
                "ESC: exit search  /: edit query  j/k: move  Space: select  a: all  o: sort"
            }
            (InputMode::Search(SearchFocus::Navigating), false) => "ESC: exit search  /: edit query  j/k: move  o: sort",
            (InputMode::Normal, true) => {
                "j/k: move  h/l: column  o/1-9: sort  Space: select  a: all  Esc: clear  /: search  r: reload  q: quit"
            }
            (InputMode::Normal, false) => "j/k: move  h/l: column  o/1-9: sort  /: search  r: reload  q: quit",
        };

        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }

    fn compute_search_bar(&self) -> Option<SearchBarInfo> {
        self.input_mode.is_search().then(|| SearchBarInfo {
            query: self.search_query.clone(),
            is_typing: self.input_mode.is_typing(),
        })
    }

    fn compute_status_bar(&self) -> StatusBarInfo {
        let (message, is_error) = match &self.status {
            Some(StatusLine::Info(text)) => (Some(text.clone()), false),
            Some(StatusLine::Error(text)) => (Some(text.clone()), true),
            None => (None, false),
        };
        StatusBarInfo {
            selection: self.table.selection_label(),
            message,
            is_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::sample_users;
    use crate::domain::ColumnSpec;

    fn loaded(options: TableOptions) -> AppState {
        let mut state = AppState::new(options, Theme::default());
        state.install_dataset("sample users", sample_users());
        state
    }

    fn names(state: &AppState) -> Vec<String> {
        state.table.view().iter().map(|r| r.get("name").to_string()).collect()
    }

    #[test]
    fn new_state_is_loading() {
        let state = AppState::new(TableOptions::selectable(), Theme::default());
        let vm = state.compute_viewmodel(24, 80);
        assert!(matches!(vm.body, TableBody::Loading));
        assert_eq!(vm.header.title, " Tabula: loading (0) ");
    }

    #[test]
    fn cursor_wraps_in_both_directions() {
        let mut state = loaded(TableOptions::selectable());
        state.move_cursor_up();
        assert_eq!(state.cursor, 4);
        state.move_cursor_down();
        assert_eq!(state.cursor, 0);
    }

    #[test]
    fn sort_focused_cycles_the_focused_column() {
        let mut state = loaded(TableOptions::selectable());
        state.move_column_right();
        state.move_column_right();
        state.move_column_right();
        state.move_column_right();
        assert_eq!(state.focused_column().map(|c| c.key.as_str()), Some("salary"));

        assert!(state.sort_focused());
        assert_eq!(names(&state)[0], "Alice Brown");
        assert!(state.sort_focused());
        assert_eq!(names(&state)[0], "Charlie Wilson");
        assert!(state.sort_focused());
        assert_eq!(names(&state)[0], "John Doe");
    }

    #[test]
    fn search_filter_clamps_cursor() {
        let mut state = loaded(TableOptions::selectable());
        state.cursor = 4;
        state.search_query = "admin".to_string();
        state.apply_search_filter();

        assert_eq!(names(&state), vec!["John Doe", "Charlie Wilson"]);
        assert_eq!(state.cursor, 1);
    }

    #[test]
    fn viewmodel_reflects_selection_and_sort() {
        let mut state = loaded(TableOptions::selectable());
        state.sort_column(0);
        state.toggle_cursor_row();

        let vm = state.compute_viewmodel(24, 120);
        assert_eq!(vm.select_all, Some(CheckState::Partial));
        assert_eq!(vm.columns[0].sort_indicator(), "▲");
        assert_eq!(vm.status_bar.selection.as_deref(), Some("1 row selected"));

        let TableBody::Rows(rows) = vm.body else {
            panic!("expected rows");
        };
        assert_eq!(rows[0].cells[0].text, "Alice Brown");
        assert_eq!(rows[0].checked, Some(true));
        assert!(rows[0].is_cursor);
        assert_eq!(rows[1].checked, Some(false));
    }

    #[test]
    fn max_height_caps_visible_rows() {
        let options = TableOptions {
            max_height: Some("2".to_string()),
            ..TableOptions::selectable()
        };
        let state = loaded(options);
        let TableBody::Rows(rows) = state.compute_viewmodel(40, 120).body else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn window_follows_cursor() {
        let mut state = loaded(TableOptions::selectable());
        state.cursor = 4;
        // 10 total rows leave 3 for the table
        let TableBody::Rows(rows) = state.compute_viewmodel(10, 120).body else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 3);
        assert!(rows[2].is_cursor);
    }

    #[test]
    fn empty_filter_explains_itself() {
        let mut state = loaded(TableOptions::selectable());
        state.search_query = "nobody".to_string();
        state.apply_search_filter();

        let TableBody::Empty(empty) = state.compute_viewmodel(24, 80).body else {
            panic!("expected empty state");
        };
        assert_eq!(empty.message, "No data available");
        assert_eq!(empty.subtitle, "No rows match \"nobody\"");
    }

    #[test]
    fn configured_row_key_wins_over_dataset() {
        let options = TableOptions {
            row_key: Some("email".to_string()),
            ..TableOptions::selectable()
        };
        let mut state = loaded(options);
        state.toggle_cursor_row();
        state.install_dataset("sample users", sample_users());
        assert_eq!(state.table.summary().selected, 1);
    }

    #[test]
    fn wide_characters_size_columns_by_terminal_cells() {
        let mut state = AppState::new(TableOptions::selectable(), Theme::default());
        let dataset = Dataset::new(
            vec![ColumnSpec::new("name"), ColumnSpec::new("city")],
            vec![Record::new().with("name", "山田太郎さん").with("city", "Tokyo")],
        );
        state.install_dataset("people", dataset);

        let vm = state.compute_viewmodel(24, 80);
        assert_eq!(vm.columns[0].width, 12);

        // gutter 4 + gap 2 leaves 14 cells for 12 + 6
        let vm = state.compute_viewmodel(24, 20);
        assert_eq!(vm.columns[0].width, 8);
        let TableBody::Rows(rows) = vm.body else {
            panic!("expected rows");
        };
        assert_eq!(rows[0].cells[0].text, "山田太…");
        assert!(text_width(&rows[0].cells[0].text) <= vm.columns[0].width);
    }

    #[test]
    fn columns_shrink_to_fit_narrow_panes() {
        let state = loaded(TableOptions::selectable());
        let vm = state.compute_viewmodel(24, 60);
        let used: usize = vm.columns.iter().map(|c| c.width).sum::<usize>() + CHECKBOX_WIDTH + COLUMN_GAP * 5;
        assert!(used <= 60);
    }
}
