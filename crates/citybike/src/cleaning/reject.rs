//! Reject log: every excluded raw row with the reason it was excluded.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::input::RawRecord;
use crate::model::EntityKind;

/// Why a row was excluded from its clean table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "kebab-case")]
pub enum RejectReason {
    /// The stream lacks required columns, so no row can be processed.
    MissingColumn { columns: Vec<String> },
    /// A required cell is empty or null-like.
    MissingValue { column: String },
    /// A cell could not be parsed into its type.
    ParseFailure { column: String, value: String },
    /// A parsed value violates a domain rule.
    InvalidValue { column: String, detail: String },
    /// `end_time` is not after `start_time`.
    InvalidTimeOrder,
    /// A repair was needed but had no input to work from.
    Unrepairable { column: String },
    /// A later row with the same id replaced this one.
    DuplicateId { id: String },
    /// A foreign key names no row of the referenced clean table.
    UnresolvedReference { column: String, id: String },
}

/// Coarse error taxonomy the reason codes map onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectCategory {
    ParseFailure,
    ValidationFailure,
    Duplicate,
    UnresolvedReference,
}

impl RejectCategory {
    pub fn label(&self) -> &'static str {
        match self {
            RejectCategory::ParseFailure => "parse_failure",
            RejectCategory::ValidationFailure => "validation_failure",
            RejectCategory::Duplicate => "duplicate",
            RejectCategory::UnresolvedReference => "unresolved_reference",
        }
    }
}

/// Pipeline stage that produced a rejection. Orders entries within a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectStage {
    Validation,
    Dedup,
    Reference,
}

impl RejectReason {
    /// The kebab-case reason code.
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::MissingColumn { .. } => "missing-column",
            RejectReason::MissingValue { .. } => "missing-value",
            RejectReason::ParseFailure { .. } => "parse-failure",
            RejectReason::InvalidValue { .. } => "invalid-value",
            RejectReason::InvalidTimeOrder => "invalid-time-order",
            RejectReason::Unrepairable { .. } => "unrepairable",
            RejectReason::DuplicateId { .. } => "duplicate-id",
            RejectReason::UnresolvedReference { .. } => "unresolved-reference",
        }
    }

    pub fn category(&self) -> RejectCategory {
        match self {
            RejectReason::MissingColumn { .. }
            | RejectReason::MissingValue { .. }
            | RejectReason::ParseFailure { .. } => RejectCategory::ParseFailure,
            RejectReason::InvalidValue { .. }
            | RejectReason::InvalidTimeOrder
            | RejectReason::Unrepairable { .. } => RejectCategory::ValidationFailure,
            RejectReason::DuplicateId { .. } => RejectCategory::Duplicate,
            RejectReason::UnresolvedReference { .. } => RejectCategory::UnresolvedReference,
        }
    }

    pub fn stage(&self) -> RejectStage {
        match self {
            RejectReason::DuplicateId { .. } => RejectStage::Dedup,
            RejectReason::UnresolvedReference { .. } => RejectStage::Reference,
            _ => RejectStage::Validation,
        }
    }

    /// Human-readable detail, without the code.
    pub fn detail(&self) -> String {
        match self {
            RejectReason::MissingColumn { columns } => {
                format!("stream lacks column(s) {}", columns.join(", "))
            }
            RejectReason::MissingValue { column } => format!("{} is empty", column),
            RejectReason::ParseFailure { column, value } => {
                format!("{} could not parse '{}'", column, value)
            }
            RejectReason::InvalidValue { column, detail } => format!("{}: {}", column, detail),
            RejectReason::InvalidTimeOrder => "end_time is not after start_time".to_string(),
            RejectReason::Unrepairable { column } => {
                format!("{} is empty and no stream values exist to fill it", column)
            }
            RejectReason::DuplicateId { id } => format!("id {} superseded by a later row", id),
            RejectReason::UnresolvedReference { column, id } => {
                format!("{} {} does not resolve", column, id)
            }
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.code(), self.detail())
    }
}

/// One excluded row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectEntry {
    pub entity: EntityKind,
    /// 1-based position in the input stream.
    pub row_number: usize,
    /// The row exactly as read.
    pub row: RawRecord,
    pub reason: RejectReason,
}

impl RejectEntry {
    pub fn new(entity: EntityKind, row_number: usize, row: RawRecord, reason: RejectReason) -> Self {
        Self {
            entity,
            row_number,
            row,
            reason,
        }
    }
}

/// Ordered audit trail of rejected rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RejectLog {
    entries: Vec<RejectEntry>,
}

impl RejectLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: RejectEntry) {
        self.entries.push(entry);
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = RejectEntry>) {
        self.entries.extend(entries);
    }

    /// Put entries in audit order: stream, then stage, then input row.
    pub fn sort(&mut self) {
        self.entries
            .sort_by_key(|e| (e.entity, e.reason.stage(), e.row_number));
    }

    pub fn entries(&self) -> &[RejectEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RejectEntry> {
        self.entries.iter()
    }

    /// Entries for one entity stream.
    pub fn for_entity(&self, entity: EntityKind) -> impl Iterator<Item = &RejectEntry> {
        self.entries.iter().filter(move |e| e.entity == entity)
    }

    /// Counts per reason code, in order of first appearance.
    pub fn counts_by_reason(&self) -> IndexMap<String, usize> {
        let mut counts = IndexMap::new();
        for entry in &self.entries {
            *counts.entry(entry.reason.code().to_string()).or_insert(0) += 1;
        }
        counts
    }
}

impl<'a> IntoIterator for &'a RejectLog {
    type Item = &'a RejectEntry;
    type IntoIter = std::slice::Iter<'a, RejectEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(entity: EntityKind, row: usize, reason: RejectReason) -> RejectEntry {
        RejectEntry::new(entity, row, RawRecord::new(), reason)
    }

    #[test]
    fn test_codes_and_categories() {
        let reason = RejectReason::UnresolvedReference {
            column: "bike_id".to_string(),
            id: "BK999".to_string(),
        };
        assert_eq!(reason.code(), "unresolved-reference");
        assert_eq!(reason.category(), RejectCategory::UnresolvedReference);
        assert_eq!(RejectReason::InvalidTimeOrder.category(), RejectCategory::ValidationFailure);
        assert_eq!(
            RejectReason::DuplicateId { id: "S1".to_string() }.stage(),
            RejectStage::Dedup
        );
    }

    #[test]
    fn test_sort_orders_by_stream_stage_row() {
        let mut log = RejectLog::new();
        log.push(entry(
            EntityKind::Trip,
            1,
            RejectReason::UnresolvedReference {
                column: "user_id".to_string(),
                id: "U9".to_string(),
            },
        ));
        log.push(entry(EntityKind::Trip, 4, RejectReason::InvalidTimeOrder));
        log.push(entry(
            EntityKind::Station,
            7,
            RejectReason::DuplicateId { id: "S1".to_string() },
        ));
        log.sort();

        let order: Vec<(EntityKind, usize)> =
            log.iter().map(|e| (e.entity, e.row_number)).collect();
        assert_eq!(
            order,
            vec![(EntityKind::Station, 7), (EntityKind::Trip, 4), (EntityKind::Trip, 1)]
        );
    }

    #[test]
    fn test_serialises_with_code_tag() {
        let json = serde_json::to_value(RejectReason::MissingValue {
            column: "capacity".to_string(),
        })
        .unwrap();
        assert_eq!(json["code"], "missing-value");
        assert_eq!(json["column"], "capacity");
    }

    #[test]
    fn test_counts_by_reason() {
        let mut log = RejectLog::new();
        log.push(entry(EntityKind::Trip, 1, RejectReason::InvalidTimeOrder));
        log.push(entry(EntityKind::Trip, 2, RejectReason::InvalidTimeOrder));
        let counts = log.counts_by_reason();
        assert_eq!(counts.get("invalid-time-order"), Some(&2));
    }
}
