//! The sortable, selectable table engine.
//!
//! [`DataTable`] owns a dataset, its column descriptors, and the transient
//! state layered on top: sort, text filter and selection. Every mutation
//! recomputes the cached *view* (the filtered, sorted sequence of dataset
//! positions) so that reads are cheap.
//!
//! # Invariants
//!
//! - Every selected row is present in the current view.
//! - Sorting never changes which records are selected and never invokes the
//!   selection callback.
//! - Each effective toggle invokes the callback exactly once, synchronously,
//!   with the selected records in the order they were selected. Select-all
//!   selects in view order.
//!
//! # Organization
//!
//! - [`sort`]: comparator, [`SortState`] and the header-click cycle
//! - [`selection`]: [`SelectionSet`] and [`SelectionSummary`]
//! - [`filter`]: case-insensitive text filtering
//! - [`display`]: loading / empty / populated resolution
//!
//! # Example
//!
//! ```
//! use std::sync::{Arc, Mutex};
//! use tabula::domain::{Column, Record};
//! use tabula::table::{DataTable, TableOptions};
//!
//! let columns = vec![Column::field("name", "Name", "name")];
//! let mut table = DataTable::new(columns, TableOptions::selectable());
//! table.set_records(vec![
//!     Record::new().with("name", "Bob"),
//!     Record::new().with("name", "Alice"),
//! ]);
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! table.on_row_select(Box::new(move |rows: &[&Record]| {
//!     let names = rows.iter().map(|r| r.get("name").to_string()).collect::<Vec<_>>();
//!     sink.lock().unwrap().push(names);
//! }));
//!
//! table.click_header("name");
//! assert!(table.toggle_row(0));
//! assert_eq!(seen.lock().unwrap()[0], vec!["Alice".to_string()]);
//! ```

pub mod display;
pub mod filter;
pub mod selection;
pub mod sort;

pub use display::{DisplayState, DEFAULT_EMPTY_MESSAGE};
pub use selection::{SelectionSet, SelectionSummary};
pub use sort::{SortOrder, SortState};

use crate::domain::{Column, Record, RowKey};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Receives the selected records, in selection order, after each selection change.
pub type RowSelectCallback = Box<dyn FnMut(&[&Record]) + Send>;

/// Inbound flags of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOptions {
    /// Whether rows can be selected. Toggles are no-ops otherwise.
    pub selectable: bool,
    /// Whether data is still loading.
    pub loading: bool,
    /// Text shown when the view has no rows.
    pub empty_message: String,
    /// Maximum visible height. Opaque to the engine; renderers interpret it.
    pub max_height: Option<String>,
    /// Record field used as stable row identity. Falls back to dataset
    /// position when unset, missing or not unique.
    pub row_key: Option<String>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            selectable: false,
            loading: false,
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
            max_height: None,
            row_key: None,
        }
    }
}

impl TableOptions {
    /// Default options with selection enabled.
    #[must_use]
    pub fn selectable() -> Self {
        Self {
            selectable: true,
            ..Self::default()
        }
    }

    /// `max_height` as a row count, when it is a plain integer.
    #[must_use]
    pub fn max_visible_rows(&self) -> Option<usize> {
        self.max_height.as_deref()?.trim().parse().ok()
    }
}

/// A dataset with sort, filter and selection state.
pub struct DataTable {
    records: Vec<Record>,
    keys: Vec<RowKey>,
    columns: Vec<Column>,
    options: TableOptions,
    sort: SortState,
    filter: String,
    view: Vec<usize>,
    selection: SelectionSet,
    on_select: Option<RowSelectCallback>,
}

impl DataTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new(columns: Vec<Column>, options: TableOptions) -> Self {
        Self {
            records: Vec::new(),
            keys: Vec::new(),
            columns,
            options,
            sort: SortState::none(),
            filter: String::new(),
            view: Vec::new(),
            selection: SelectionSet::new(),
            on_select: None,
        }
    }

    /// Installs the row-selection callback, replacing any previous one.
    pub fn on_row_select(&mut self, callback: RowSelectCallback) {
        self.on_select = Some(callback);
    }

    /// Sets the row identity field. Takes effect at the next
    /// [`set_records`](Self::set_records).
    pub fn set_row_key(&mut self, row_key: Option<String>) {
        self.options.row_key = row_key;
    }

    /// Replaces the dataset.
    ///
    /// With a configured `row_key`, selected records that are still present
    /// stay selected; with positional keys the selection is cleared. The
    /// callback fires once if any previously selected row was dropped.
    pub fn set_records(&mut self, records: Vec<Record>) {
        let selected_before = self.selection.len();
        let keys = assign_keys(&records, self.options.row_key.as_deref());
        let keyed_by_field = matches!(keys.first(), Some(RowKey::Field(_)));

        if keyed_by_field {
            let surviving: HashSet<&RowKey> = keys.iter().collect();
            self.selection.retain(|key| surviving.contains(key));
        } else {
            self.selection.clear();
        }

        self.records = records;
        self.keys = keys;
        self.rebuild_view();
        self.prune_selection();

        tracing::debug!(
            rows = self.records.len(),
            visible = self.view.len(),
            keyed_by_field,
            selected = self.selection.len(),
            "dataset installed"
        );

        if self.selection.len() != selected_before {
            self.notify();
        }
    }

    /// Replaces columns and dataset together.
    ///
    /// Same selection rules as [`set_records`](Self::set_records); the
    /// callback fires at most once for the whole swap.
    pub fn set_data(&mut self, columns: Vec<Column>, records: Vec<Record>) {
        self.columns = columns;
        self.set_records(records);
    }

    /// Replaces the column descriptors.
    ///
    /// An active sort on a column that no longer exists stays recorded but has
    /// no effect.
    pub fn set_columns(&mut self, columns: Vec<Column>) {
        self.columns = columns;
        self.rebuild_view();
        if self.prune_selection() > 0 {
            self.notify();
        }
    }

    /// Sets the loading flag.
    pub fn set_loading(&mut self, loading: bool) {
        self.options.loading = loading;
    }

    /// Applies a header click on the column with `key`.
    ///
    /// Returns `true` if the sort state changed. Unknown and unsortable
    /// columns are ignored.
    pub fn click_header(&mut self, key: &str) -> bool {
        let Some(column) = self.columns.iter().find(|c| c.key == key) else {
            tracing::debug!(column = %key, "header click on unknown column ignored");
            return false;
        };

        let next = self.sort.after_click(column);
        if next == self.sort {
            return false;
        }

        tracing::debug!(column = %key, order = ?next.order(), "sort changed");
        self.set_sort(next);
        true
    }

    /// Replaces the sort state directly.
    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
        self.rebuild_view();
    }

    /// Current sort state.
    #[must_use]
    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    /// Sets the text filter.
    ///
    /// Selected rows that leave the view are deselected; if any were, the
    /// callback fires once with the remaining selection.
    pub fn set_filter(&mut self, query: &str) {
        if self.filter == query {
            return;
        }
        self.filter = query.to_string();
        self.rebuild_view();

        let pruned = self.prune_selection();
        tracing::debug!(query = %query, visible = self.view.len(), pruned, "filter applied");
        if pruned > 0 {
            self.notify();
        }
    }

    /// Current text filter.
    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Records of the current view, in view order.
    #[must_use]
    pub fn view(&self) -> Vec<&Record> {
        self.view.iter().map(|&i| &self.records[i]).collect()
    }

    /// Record at `position` in the view.
    #[must_use]
    pub fn row(&self, position: usize) -> Option<&Record> {
        self.view.get(position).map(|&i| &self.records[i])
    }

    /// Number of rows in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.view.len()
    }

    /// Returns `true` when the view has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    /// Number of records in the dataset, ignoring the filter.
    #[must_use]
    pub fn dataset_len(&self) -> usize {
        self.records.len()
    }

    /// Column descriptors.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Inbound flags.
    #[must_use]
    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    /// Flips selection of the row at `position`.
    ///
    /// Returns `false`, without invoking the callback, when selection is
    /// disabled or `position` is outside the view.
    pub fn toggle_row(&mut self, position: usize) -> bool {
        if !self.options.selectable {
            return false;
        }
        let Some(&index) = self.view.get(position) else {
            tracing::debug!(position, len = self.view.len(), "toggle outside view ignored");
            return false;
        };

        let selected = self.selection.toggle(self.keys[index].clone());
        tracing::debug!(position, selected, "row toggled");
        self.notify();
        true
    }

    /// Selects every row of the view, or clears the selection when every row
    /// is already selected.
    ///
    /// Returns `false`, without invoking the callback, when selection is
    /// disabled or the view is empty.
    pub fn toggle_select_all(&mut self) -> bool {
        if !self.options.selectable || self.view.is_empty() {
            return false;
        }

        if self.summary().all_selected() {
            self.selection.clear();
        } else {
            let keys: Vec<RowKey> = self.view.iter().map(|&i| self.keys[i].clone()).collect();
            self.selection.select_exactly(keys);
        }

        tracing::debug!(selected = self.selection.len(), "select-all toggled");
        self.notify();
        true
    }

    /// Deselects everything. Returns `true` and invokes the callback only if
    /// something was selected.
    pub fn clear_selection(&mut self) -> bool {
        if self.selection.is_empty() {
            return false;
        }
        self.selection.clear();
        self.notify();
        true
    }

    /// Returns `true` if the row at `position` is selected.
    #[must_use]
    pub fn is_selected(&self, position: usize) -> bool {
        self.view
            .get(position)
            .is_some_and(|&i| self.selection.contains(&self.keys[i]))
    }

    /// Selected records, oldest selection first.
    #[must_use]
    pub fn selected_records(&self) -> Vec<&Record> {
        self.selected_indices().into_iter().map(|i| &self.records[i]).collect()
    }

    /// Aggregate selection state of the view.
    #[must_use]
    pub fn summary(&self) -> SelectionSummary {
        SelectionSummary {
            selected: self.selection.len(),
            total: self.view.len(),
        }
    }

    /// Selected-count text, shown only while something is selected.
    #[must_use]
    pub fn selection_label(&self) -> Option<String> {
        let summary = self.summary();
        (self.options.selectable && summary.selected > 0).then(|| summary.label())
    }

    /// Which body to render.
    #[must_use]
    pub fn display_state(&self) -> DisplayState {
        display::resolve(self.options.loading, self.view.len(), &self.options.empty_message)
    }

    /// Sorts the whole dataset, then filters it in view order so renderers
    /// see the position each row will have in the view.
    fn rebuild_view(&mut self) {
        let all = (0..self.records.len()).collect();
        let sorted = sort::sort_positions(&self.records, all, &self.columns, &self.sort);
        self.view = match filter::terms(&self.filter) {
            None => sorted,
            Some(terms) => {
                let mut view = Vec::new();
                for index in sorted {
                    if filter::matches_terms(&self.records[index], view.len(), &self.columns, &terms) {
                        view.push(index);
                    }
                }
                view
            }
        };
    }

    /// Drops selected keys that are not in the view. Returns how many.
    fn prune_selection(&mut self) -> usize {
        if self.selection.is_empty() {
            return 0;
        }
        let visible: HashSet<&RowKey> = self.view.iter().map(|&i| &self.keys[i]).collect();
        self.selection.retain(|key| visible.contains(key))
    }

    /// Dataset indices of the selected rows, in selection order.
    fn selected_indices(&self) -> Vec<usize> {
        let by_key: HashMap<&RowKey, usize> = self.view.iter().map(|&i| (&self.keys[i], i)).collect();
        self.selection.iter().filter_map(|key| by_key.get(key).copied()).collect()
    }

    fn notify(&mut self) {
        if self.on_select.is_none() {
            return;
        }
        let indices = self.selected_indices();
        let selected: Vec<&Record> = indices.iter().map(|&i| &self.records[i]).collect();
        if let Some(callback) = self.on_select.as_mut() {
            callback(&selected);
        }
    }
}

impl fmt::Debug for DataTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTable")
            .field("rows", &self.records.len())
            .field("visible", &self.view.len())
            .field("columns", &self.columns)
            .field("options", &self.options)
            .field("sort", &self.sort)
            .field("filter", &self.filter)
            .field("selected", &self.selection.len())
            .finish_non_exhaustive()
    }
}

/// Assigns a stable key to every record.
///
/// Uses the display text of `row_key` when every record has a non-null,
/// unique value for it; otherwise falls back to dataset positions.
fn assign_keys(records: &[Record], row_key: Option<&str>) -> Vec<RowKey> {
    let positional = || (0..records.len()).map(RowKey::Index).collect();

    let Some(field) = row_key else {
        return positional();
    };

    let mut seen = HashSet::with_capacity(records.len());
    let mut keys = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        let value = record.get(field);
        if value.is_null() {
            tracing::warn!(field, index, "row key missing, using row positions");
            return positional();
        }
        let key = value.display_string();
        if !seen.insert(key.clone()) {
            tracing::warn!(field, key = %key, "duplicate row key, using row positions");
            return positional();
        }
        keys.push(RowKey::Field(key));
    }
    keys
}
