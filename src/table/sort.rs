//! Sorting: comparator, sort state and the header-click cycle.
//!
//! Sorting never fails. A missing active column or a stale column key leaves
//! the input order untouched.
//!
//! # Comparator
//!
//! For two values `a` and `b` of the active column:
//!
//! 1. `a` null sorts after `b`
//! 2. `b` null sorts after `a`
//! 3. two texts compare with [`locale_compare`]
//! 4. two numbers compare numerically
//! 5. anything else compares the display strings with [`locale_compare`]
//!
//! The whole result is reversed for [`SortOrder::Descending`], so nulls come
//! first in descending order.
//!
//! # Header cycle
//!
//! ```text
//! none ──click c──▶ (c, asc) ──click c──▶ (c, desc) ──click c──▶ none
//!                       ▲                      │
//!                       └──── click other ─────┘  (other, asc)
//! ```
//!
//! # Example
//!
//! ```
//! use tabula::domain::{Column, Record};
//! use tabula::table::sort::{sort_records, SortState};
//!
//! let columns = vec![Column::field("name", "Name", "name")];
//! let records = vec![
//!     Record::new().with("name", "Bob"),
//!     Record::new().with("name", "alice"),
//! ];
//! let state = SortState::none().after_click(&columns[0]);
//! let sorted = sort_records(&records, &columns, &state);
//! assert_eq!(sorted[0].get("name").as_text(), Some("alice"));
//! ```

use crate::domain::{CellValue, Column, Record};
use std::cmp::Ordering;

/// Direction of the active sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Smallest first, nulls last.
    Ascending,
    /// Largest first, nulls first.
    Descending,
    /// No sort; the view keeps dataset order.
    #[default]
    None,
}

/// Active sort column and direction.
///
/// The fields are private so that `order == None` exactly when no column is
/// active.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortState {
    column: Option<String>,
    order: SortOrder,
}

impl SortState {
    /// No active sort.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            column: None,
            order: SortOrder::None,
        }
    }

    /// Ascending sort by `key`.
    #[must_use]
    pub fn ascending(key: impl Into<String>) -> Self {
        Self {
            column: Some(key.into()),
            order: SortOrder::Ascending,
        }
    }

    /// Descending sort by `key`.
    #[must_use]
    pub fn descending(key: impl Into<String>) -> Self {
        Self {
            column: Some(key.into()),
            order: SortOrder::Descending,
        }
    }

    /// Key of the active column, if any.
    #[must_use]
    pub fn active_column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// Current direction.
    #[must_use]
    pub const fn order(&self) -> SortOrder {
        self.order
    }

    /// Returns `true` when a sort is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.column.is_some()
    }

    /// Direction shown for `key`: the active order if `key` is the active
    /// column, [`SortOrder::None`] otherwise.
    #[must_use]
    pub fn order_for(&self, key: &str) -> SortOrder {
        if self.active_column() == Some(key) {
            self.order
        } else {
            SortOrder::None
        }
    }

    /// State after the header of `column` is clicked.
    ///
    /// Unsortable columns leave the state unchanged. A new column starts
    /// ascending; the active column cycles ascending, descending, none.
    #[must_use]
    pub fn after_click(&self, column: &Column) -> Self {
        if !column.sortable {
            return self.clone();
        }

        if self.active_column() != Some(column.key.as_str()) {
            return Self::ascending(column.key.clone());
        }

        match self.order {
            SortOrder::Ascending => Self::descending(column.key.clone()),
            SortOrder::Descending | SortOrder::None => Self::none(),
        }
    }
}

/// Locale-style string ordering.
///
/// Compares case-insensitively first, so `"alice"` and `"Alice"` sort next to
/// each other and before `"bob"`. Strings equal ignoring case put lowercase
/// before uppercase at the first differing letter, then fall back to code point
/// order so that only identical strings compare equal.
///
/// ```
/// use std::cmp::Ordering;
/// use tabula::table::sort::locale_compare;
///
/// assert_eq!(locale_compare("alice", "Bob"), Ordering::Less);
/// assert_eq!(locale_compare("a", "A"), Ordering::Less);
/// assert_eq!(locale_compare("Zed", "zed"), Ordering::Greater);
/// ```
#[must_use]
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(char::to_lowercase);
    let folded_b = b.chars().flat_map(char::to_lowercase);

    folded_a
        .cmp(folded_b)
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

/// Ascending comparison of two cell values.
#[must_use]
pub fn compare_values(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Null, CellValue::Null) => Ordering::Equal,
        (CellValue::Null, _) => Ordering::Greater,
        (_, CellValue::Null) => Ordering::Less,
        (CellValue::Text(x), CellValue::Text(y)) => locale_compare(x, y),
        (CellValue::Number(x), CellValue::Number(y)) => {
            x.partial_cmp(y).unwrap_or_else(|| x.total_cmp(y))
        }
        _ => locale_compare(&a.display_string(), &b.display_string()),
    }
}

/// Reorders `positions` (indices into `records`) according to `state`.
///
/// Returns `positions` unchanged when no sort is active or the active key
/// names no column in `columns`. Each record's value is read once.
#[must_use]
pub fn sort_positions(
    records: &[Record],
    mut positions: Vec<usize>,
    columns: &[Column],
    state: &SortState,
) -> Vec<usize> {
    let Some(key) = state.active_column() else {
        return positions;
    };

    let Some(column) = columns.iter().find(|c| c.key == key) else {
        tracing::debug!(sort_key = %key, "sort key names no column, keeping input order");
        return positions;
    };

    let values: Vec<CellValue> = records.iter().map(|r| column.value(r)).collect();
    let descending = state.order() == SortOrder::Descending;

    stable_sort_by(&mut positions, |&a, &b| {
        let ordering = compare_values(&values[a], &values[b]);
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });

    positions
}

/// Returns `records` ordered by `state`.
///
/// Ties keep their dataset order.
#[must_use]
pub fn sort_records<'a>(records: &'a [Record], columns: &[Column], state: &SortState) -> Vec<&'a Record> {
    sort_positions(records, (0..records.len()).collect(), columns, state)
        .into_iter()
        .map(|i| &records[i])
        .collect()
}

/// Bottom-up merge sort.
///
/// Stable, and well-defined even when `compare` is not a total order (mixed
/// number/text columns can produce cycles), where `slice::sort_by` may panic.
fn stable_sort_by<T, F>(items: &mut Vec<T>, mut compare: F)
where
    T: Copy,
    F: FnMut(&T, &T) -> Ordering,
{
    let len = items.len();
    if len < 2 {
        return;
    }

    let mut buffer = items.clone();
    let mut width = 1;

    while width < len {
        let mut start = 0;
        while start < len {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            let (mut left, mut right) = (start, mid);

            for slot in &mut buffer[start..end] {
                let take_right = right < end
                    && (left >= mid || compare(&items[right], &items[left]) == Ordering::Less);
                if take_right {
                    *slot = items[right];
                    right += 1;
                } else {
                    *slot = items[left];
                    left += 1;
                }
            }

            start = end;
        }

        std::mem::swap(items, &mut buffer);
        width *= 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people() -> (Vec<Record>, Vec<Column>) {
        let records = vec![
            Record::new().with("name", "Bob").with("salary", 70000),
            Record::new().with("name", "Alice").with("salary", 62000),
            Record::new().with("name", "Alice").with("salary", CellValue::Null),
        ];
        let columns = vec![
            Column::field("name", "Name", "name"),
            Column::field("salary", "Salary", "salary"),
        ];
        (records, columns)
    }

    fn salaries(sorted: &[&Record]) -> Vec<CellValue> {
        sorted.iter().map(|r| r.get("salary").clone()).collect()
    }

    #[test]
    fn ties_keep_input_order_ascending_and_descending() {
        let (records, columns) = people();

        let asc = sort_records(&records, &columns, &SortState::ascending("name"));
        assert_eq!(
            salaries(&asc),
            vec![CellValue::Number(62000.0), CellValue::Null, CellValue::Number(70000.0)]
        );

        let desc = sort_records(&records, &columns, &SortState::descending("name"));
        assert_eq!(
            salaries(&desc),
            vec![CellValue::Number(70000.0), CellValue::Number(62000.0), CellValue::Null]
        );
    }

    #[test]
    fn nulls_last_ascending_first_descending() {
        let (records, columns) = people();

        let asc = sort_records(&records, &columns, &SortState::ascending("salary"));
        assert_eq!(asc[2].get("salary"), &CellValue::Null);

        let desc = sort_records(&records, &columns, &SortState::descending("salary"));
        assert_eq!(desc[0].get("salary"), &CellValue::Null);
        assert_eq!(desc[1].get("salary"), &CellValue::Number(70000.0));
    }

    #[test]
    fn unknown_or_inactive_sort_keeps_dataset_order() {
        let (records, columns) = people();
        let identity: Vec<&Record> = records.iter().collect();

        assert_eq!(sort_records(&records, &columns, &SortState::none()), identity);
        assert_eq!(sort_records(&records, &columns, &SortState::ascending("email")), identity);
    }

    #[test]
    fn header_clicks_cycle_through_three_states() {
        let (_, columns) = people();
        let name = &columns[0];

        let first = SortState::none().after_click(name);
        assert_eq!(first, SortState::ascending("name"));
        let second = first.after_click(name);
        assert_eq!(second.order(), SortOrder::Descending);
        let third = second.after_click(name);
        assert_eq!(third, SortState::none());
        assert_eq!(third.after_click(name), first);
    }

    #[test]
    fn clicking_another_column_restarts_ascending() {
        let (_, columns) = people();
        let state = SortState::descending("name").after_click(&columns[1]);
        assert_eq!(state, SortState::ascending("salary"));
    }

    #[test]
    fn unsortable_column_ignores_clicks() {
        let column = Column::field("email", "Email", "email").sortable(false);
        let state = SortState::ascending("name");
        assert_eq!(state.after_click(&column), state);
    }

    #[test]
    fn numbers_compare_numerically_not_lexically() {
        let records: Vec<Record> = [100, 9, 25]
            .into_iter()
            .map(|n| Record::new().with("n", n))
            .collect();
        let columns = vec![Column::field("n", "N", "n")];
        let sorted = sort_records(&records, &columns, &SortState::ascending("n"));
        let values: Vec<f64> = sorted.iter().filter_map(|r| r.get("n").as_number()).collect();
        assert_eq!(values, vec![9.0, 25.0, 100.0]);
    }

    #[test]
    fn mixed_types_compare_as_strings_without_panicking() {
        let records = vec![
            Record::new().with("v", 10),
            Record::new().with("v", "5x"),
            Record::new().with("v", 9),
            Record::new().with("v", true),
        ];
        let columns = vec![Column::field("v", "V", "v")];
        let sorted = sort_records(&records, &columns, &SortState::ascending("v"));
        assert_eq!(sorted.len(), 4);

        assert_eq!(
            compare_values(&CellValue::Number(10.0), &CellValue::from("5x")),
            Ordering::Less
        );
    }

    #[test]
    fn sorting_is_idempotent() {
        let (records, columns) = people();
        let state = SortState::descending("salary");
        assert_eq!(
            sort_records(&records, &columns, &state),
            sort_records(&records, &columns, &state)
        );
    }

    #[test]
    fn merge_sort_is_stable_on_larger_inputs() {
        let mut items: Vec<(u8, usize)> = (0..97).map(|i| ((i * 7 % 5) as u8, i)).collect();
        stable_sort_by(&mut items, |a, b| a.0.cmp(&b.0));

        for pair in items.windows(2) {
            assert!(pair[0].0 < pair[1].0 || (pair[0].0 == pair[1].0 && pair[0].1 < pair[1].1));
        }
    }
}
