//! Built-in demo dataset, shown when no `data_file` is configured.

use crate::dataset::models::Dataset;
use crate::dataset::source::DatasetSource;
use crate::domain::error::Result;
use crate::domain::{CellFormat, ColumnSpec, Record};

/// Five demo users with name, email, role, status, salary and join date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleDataset;

impl DatasetSource for SampleDataset {
    fn describe(&self) -> String {
        "sample users".to_string()
    }

    fn load(&self) -> Result<Dataset> {
        Ok(sample_users())
    }
}

fn column(key: &str, title: &str, format: CellFormat, width: Option<usize>) -> ColumnSpec {
    ColumnSpec {
        title: Some(title.to_string()),
        format,
        width,
        ..ColumnSpec::new(key)
    }
}

/// The demo users keyed by `id`.
#[must_use]
pub fn sample_users() -> Dataset {
    let columns = vec![
        column("name", "Name", CellFormat::Text, Some(20)),
        column("email", "Email", CellFormat::Text, Some(28)),
        column("role", "Role", CellFormat::Badge, None),
        column("status", "Status", CellFormat::Badge, None),
        column("salary", "Salary", CellFormat::Currency, None),
        column("joinDate", "Join Date", CellFormat::Date, None),
    ];

    let users = [
        (1, "John Doe", "john.doe@example.com", "Admin", "Active", "2024-01-15", 75000),
        (2, "Jane Smith", "jane.smith@example.com", "User", "Active", "2024-02-20", 65000),
        (3, "Bob Johnson", "bob.johnson@example.com", "Moderator", "Inactive", "2023-12-10", 70000),
        (4, "Alice Brown", "alice.brown@example.com", "User", "Active", "2024-03-05", 62000),
        (5, "Charlie Wilson", "charlie.wilson@example.com", "Admin", "Active", "2023-11-22", 78000),
    ];

    let rows = users
        .into_iter()
        .map(|(id, name, email, role, status, join_date, salary)| {
            Record::new()
                .with("id", id)
                .with("name", name)
                .with("email", email)
                .with("role", role)
                .with("status", status)
                .with("joinDate", join_date)
                .with("salary", salary)
        })
        .collect();

    Dataset::new(columns, rows).with_row_key("id")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_is_valid_and_keyed() {
        let dataset = SampleDataset.load().unwrap();
        dataset.validate().unwrap();
        assert_eq!(dataset.rows.len(), 5);
        assert_eq!(dataset.row_key.as_deref(), Some("id"));
        assert_eq!(dataset.columns.len(), 6);
    }

    #[test]
    fn sample_cells_render_formatted() {
        let dataset = sample_users();
        let columns = dataset.table_columns();
        let john = &dataset.rows[0];

        let rendered: Vec<String> = columns.iter().map(|c| c.display(john, 0)).collect();
        assert_eq!(
            rendered,
            vec!["John Doe", "john.doe@example.com", "[Admin]", "[Active]", "$75,000", "1/15/2024"]
        );
    }
}
