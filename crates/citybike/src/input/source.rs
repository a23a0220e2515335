//! Raw row containers and source metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::EntityKind;

/// One raw input row: column name to untouched string value.
pub type RawRecord = IndexMap<String, String>;

/// Metadata about a loaded source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Entity stream the file feeds.
    pub entity: EntityKind,
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was read.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been read.
    pub fn new(
        entity: EntityKind,
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            entity,
            file,
            path,
            hash,
            size_bytes,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// Tabular rows of one entity stream, exactly as read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order), aligned with `headers`.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Create a new table. Short rows are padded and long rows truncated.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// A table with no columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from row maps. Headers are the union of keys in
    /// first-seen order; a key absent from one map becomes an empty cell.
    pub fn from_records(records: Vec<RawRecord>) -> Self {
        let mut headers: Vec<String> = Vec::new();
        for record in &records {
            for key in record.keys() {
                if !headers.iter().any(|h| h == key) {
                    headers.push(key.clone());
                }
            }
        }

        let rows = records
            .iter()
            .map(|record| {
                headers
                    .iter()
                    .map(|h| record.get(h).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a single row as a record.
    pub fn record(&self, index: usize) -> Option<RawRecord> {
        self.rows.get(index).map(|row| self.to_record(row))
    }

    /// Iterate all rows as records, in input order.
    pub fn records(&self) -> impl Iterator<Item = RawRecord> + '_ {
        self.rows.iter().map(|row| self.to_record(row))
    }

    fn to_record(&self, row: &[String]) -> RawRecord {
        self.headers
            .iter()
            .cloned()
            .zip(row.iter().cloned())
            .collect()
    }

    /// Check if a value represents a missing/null value.
    pub fn is_null_value(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
            || trimmed.eq_ignore_ascii_case("nan")
            || trimmed.eq_ignore_ascii_case("null")
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed.eq_ignore_ascii_case("nil")
            || trimmed == "."
            || trimmed == "-"
    }
}

/// The full input snapshot for one run.
///
/// `users` and `bikes` are optional master sources. When absent, the cleaner
/// derives those tables from the trip rows.
#[derive(Debug, Clone, Default)]
pub struct RawDataset {
    pub trips: RawTable,
    pub stations: RawTable,
    pub maintenance: RawTable,
    pub users: Option<RawTable>,
    pub bikes: Option<RawTable>,
}

impl RawDataset {
    pub fn new(trips: RawTable, stations: RawTable, maintenance: RawTable) -> Self {
        Self {
            trips,
            stations,
            maintenance,
            users: None,
            bikes: None,
        }
    }

    /// Supply an explicit users source.
    pub fn with_users(mut self, users: RawTable) -> Self {
        self.users = Some(users);
        self
    }

    /// Supply an explicit bikes source.
    pub fn with_bikes(mut self, bikes: RawTable) -> Self {
        self.bikes = Some(bikes);
        self
    }

    /// Number of raw rows for an entity. Derived masters count as zero.
    pub fn row_count(&self, entity: EntityKind) -> usize {
        match entity {
            EntityKind::Station => self.stations.row_count(),
            EntityKind::Trip => self.trips.row_count(),
            EntityKind::Maintenance => self.maintenance.row_count(),
            EntityKind::User => self.users.as_ref().map_or(0, RawTable::row_count),
            EntityKind::Bike => self.bikes.as_ref().map_or(0, RawTable::row_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_from_records_unions_headers() {
        let table = RawTable::from_records(vec![
            record(&[("id", "S1"), ("capacity", "5")]),
            record(&[("id", "S2"), ("name", "Harbor View")]),
        ]);

        assert_eq!(table.headers, vec!["id", "capacity", "name"]);
        assert_eq!(table.row_count(), 2);
        let second = table.record(1).unwrap();
        assert_eq!(second.get("capacity").map(String::as_str), Some(""));
        assert_eq!(second.get("name").map(String::as_str), Some("Harbor View"));
    }

    #[test]
    fn test_new_pads_short_rows() {
        let table = RawTable::new(
            vec!["a".to_string(), "b".to_string()],
            vec![vec!["1".to_string()]],
        );
        assert_eq!(table.rows[0], vec!["1".to_string(), String::new()]);
    }

    #[test]
    fn test_is_null_value() {
        assert!(RawTable::is_null_value(""));
        assert!(RawTable::is_null_value("  NA "));
        assert!(RawTable::is_null_value("NaN"));
        assert!(RawTable::is_null_value("null"));
        assert!(RawTable::is_null_value("-"));
        assert!(!RawTable::is_null_value("0"));
        assert!(!RawTable::is_null_value("S1"));
    }

    #[test]
    fn test_dataset_row_counts() {
        let stations = RawTable::from_records(vec![record(&[("id", "S1")])]);
        let dataset = RawDataset::new(RawTable::empty(), stations, RawTable::empty());
        assert_eq!(dataset.row_count(EntityKind::Station), 1);
        assert_eq!(dataset.row_count(EntityKind::Bike), 0);
    }
}
