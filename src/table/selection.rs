//! Row selection keyed by stable row identity.
//!
//! [`SelectionSet`] stores [`RowKey`]s rather than view positions, so sorting
//! never changes which records are selected. Keys are kept in the order they
//! were selected. The owning table keeps the set a subset of the keys in its
//! current view; [`SelectionSummary`] is derived from the set and the view
//! length on demand.

use crate::domain::RowKey;
use std::collections::HashSet;

/// Set of selected rows, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    order: Vec<RowKey>,
    members: HashSet<RowKey>,
}

impl SelectionSet {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `key` is selected.
    #[must_use]
    pub fn contains(&self, key: &RowKey) -> bool {
        self.members.contains(key)
    }

    /// Flips membership of `key`. Returns `true` if it is selected afterwards.
    ///
    /// A newly selected key goes to the end of the selection order.
    pub fn toggle(&mut self, key: RowKey) -> bool {
        if self.members.remove(&key) {
            self.order.retain(|k| *k != key);
            false
        } else {
            self.members.insert(key.clone());
            self.order.push(key);
            true
        }
    }

    /// Replaces the selection with `keys`, in the given order.
    pub fn select_exactly<I: IntoIterator<Item = RowKey>>(&mut self, keys: I) {
        self.clear();
        for key in keys {
            if self.members.insert(key.clone()) {
                self.order.push(key);
            }
        }
    }

    /// Deselects everything.
    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }

    /// Keeps only keys accepted by `keep`. Returns the number removed.
    pub fn retain<F: FnMut(&RowKey) -> bool>(&mut self, mut keep: F) -> usize {
        let before = self.order.len();
        let members = &mut self.members;
        self.order.retain(|key| {
            let kept = keep(key);
            if !kept {
                members.remove(key);
            }
            kept
        });
        before - self.order.len()
    }

    /// Selected keys, oldest selection first.
    pub fn iter(&self) -> impl Iterator<Item = &RowKey> {
        self.order.iter()
    }

    /// Number of selected rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` when nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Aggregate selection state of a view.
///
/// ```
/// use tabula::table::SelectionSummary;
///
/// let summary = SelectionSummary { selected: 1, total: 4 };
/// assert!(summary.partially_selected());
/// assert_eq!(summary.label(), "1 row selected");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionSummary {
    /// Number of selected rows.
    pub selected: usize,
    /// Number of rows in the view.
    pub total: usize,
}

impl SelectionSummary {
    /// Every row of a non-empty view is selected.
    #[must_use]
    pub const fn all_selected(&self) -> bool {
        self.total > 0 && self.selected == self.total
    }

    /// Some, but not all, rows are selected.
    #[must_use]
    pub const fn partially_selected(&self) -> bool {
        self.selected > 0 && self.selected < self.total
    }

    /// Pluralized count, e.g. `"3 rows selected"`.
    #[must_use]
    pub fn label(&self) -> String {
        if self.selected == 1 {
            "1 row selected".to_string()
        } else {
            format!("{} rows selected", self.selected)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_membership() {
        let mut set = SelectionSet::new();
        assert!(set.toggle(RowKey::Index(2)));
        assert!(set.contains(&RowKey::Index(2)));
        assert!(!set.toggle(RowKey::Index(2)));
        assert!(set.is_empty());
    }

    #[test]
    fn keys_iterate_in_selection_order() {
        let mut set = SelectionSet::new();
        set.toggle(RowKey::Index(3));
        set.toggle(RowKey::Index(0));
        set.toggle(RowKey::Index(2));
        set.toggle(RowKey::Index(3));
        set.toggle(RowKey::Index(3));

        let order: Vec<_> = set.iter().cloned().collect();
        assert_eq!(order, vec![RowKey::Index(0), RowKey::Index(2), RowKey::Index(3)]);
    }

    #[test]
    fn retain_reports_pruned_count() {
        let mut set = SelectionSet::new();
        set.select_exactly([RowKey::Field("a".into()), RowKey::Field("b".into())]);
        let pruned = set.retain(|key| *key == RowKey::Field("a".into()));
        assert_eq!(pruned, 1);
        assert_eq!(set.len(), 1);
        assert!(!set.contains(&RowKey::Field("b".into())));
    }

    #[test]
    fn summary_flags() {
        let empty = SelectionSummary { selected: 0, total: 0 };
        assert!(!empty.all_selected());
        assert!(!empty.partially_selected());

        let all = SelectionSummary { selected: 4, total: 4 };
        assert!(all.all_selected());
        assert!(!all.partially_selected());

        let none = SelectionSummary { selected: 0, total: 4 };
        assert!(!none.all_selected());
        assert!(!none.partially_selected());
    }

    #[test]
    fn label_pluralizes() {
        assert_eq!(SelectionSummary { selected: 0, total: 3 }.label(), "0 rows selected");
        assert_eq!(SelectionSummary { selected: 1, total: 3 }.label(), "1 row selected");
        assert_eq!(SelectionSummary { selected: 3, total: 3 }.label(), "3 rows selected");
    }
}
