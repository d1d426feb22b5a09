//! Text filtering of records.
//!
//! A record matches when every whitespace-separated term of the query occurs,
//! case-insensitively, in the display text of at least one column. An empty
//! query matches everything.

use crate::domain::{Column, Record};

/// Lowercased query terms, or `None` for a blank query.
#[must_use]
pub fn terms(query: &str) -> Option<Vec<String>> {
    let terms: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    if terms.is_empty() {
        None
    } else {
        Some(terms)
    }
}

/// Returns `true` if `record` matches `query` on any of `columns`.
///
/// Cells are matched against [`Column::display`] at `position`, the row's
/// position in the view, so formatted text such as `$75,000` is searchable.
///
/// ```
/// use tabula::domain::{Column, Record};
/// use tabula::table::filter::matches;
///
/// let columns = vec![Column::field("role", "Role", "role")];
/// let record = Record::new().with("role", "Moderator");
/// assert!(matches(&record, 0, &columns, "mod"));
/// assert!(!matches(&record, 0, &columns, "admin"));
/// ```
#[must_use]
pub fn matches(record: &Record, position: usize, columns: &[Column], query: &str) -> bool {
    let Some(terms) = terms(query) else {
        return true;
    };
    matches_terms(record, position, columns, &terms)
}

/// [`matches`] with pre-split terms.
#[must_use]
pub fn matches_terms(record: &Record, position: usize, columns: &[Column], terms: &[String]) -> bool {
    let haystacks: Vec<String> = columns
        .iter()
        .map(|column| column.display(record, position).to_lowercase())
        .collect();

    terms
        .iter()
        .all(|term| haystacks.iter().any(|cell| cell.contains(term.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CellFormat;

    fn columns() -> Vec<Column> {
        vec![
            Column::field("name", "Name", "name"),
            Column::field("email", "Email", "email"),
            Column::field("salary", "Salary", "salary").with_format(CellFormat::Currency),
        ]
    }

    fn jane() -> Record {
        Record::new()
            .with("name", "Jane Smith")
            .with("email", "jane@example.com")
            .with("salary", 65000)
    }

    #[test]
    fn blank_query_matches_everything() {
        assert!(matches(&jane(), 0, &columns(), ""));
        assert!(matches(&jane(), 0, &columns(), "   "));
    }

    #[test]
    fn match_is_case_insensitive_across_columns() {
        assert!(matches(&jane(), 0, &columns(), "SMITH"));
        assert!(matches(&jane(), 0, &columns(), "example.com"));
        assert!(matches(&jane(), 0, &columns(), "$65,000"));
    }

    #[test]
    fn every_term_must_match_somewhere() {
        assert!(matches(&jane(), 0, &columns(), "jane example"));
        assert!(!matches(&jane(), 0, &columns(), "jane bob"));
    }

    #[test]
    fn renderers_see_the_row_position() {
        let numbered =
            vec![Column::field("rank", "Rank", "name").with_renderer(|_, _, position| format!("#{}", position + 1))];
        assert!(matches(&jane(), 2, &numbered, "#3"));
        assert!(!matches(&jane(), 0, &numbered, "#3"));
    }
}
