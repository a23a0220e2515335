//! Validator outcomes.

use serde::{Deserialize, Serialize};

use crate::cleaning::RejectReason;

/// A deterministic fix for a repairable record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Repair {
    /// Fill the column with the mean of the stream's valid values.
    FillWithStreamMean { column: String },
    /// Fill the column with a fixed value.
    FillDefault { column: String, value: String },
}

impl Repair {
    pub fn stream_mean(column: &str) -> Self {
        Repair::FillWithStreamMean {
            column: column.to_string(),
        }
    }

    pub fn default_value(column: &str, value: impl Into<String>) -> Self {
        Repair::FillDefault {
            column: column.to_string(),
            value: value.into(),
        }
    }

    /// The column this repair writes.
    pub fn column(&self) -> &str {
        match self {
            Repair::FillWithStreamMean { column } | Repair::FillDefault { column, .. } => column,
        }
    }
}

/// Classification of one candidate record.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Valid,
    Repairable(Vec<Repair>),
    Rejected(RejectReason),
}

impl Verdict {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Verdict::Rejected(_))
    }
}

impl From<Result<Vec<Repair>, RejectReason>> for Verdict {
    fn from(result: Result<Vec<Repair>, RejectReason>) -> Self {
        match result {
            Ok(repairs) if repairs.is_empty() => Verdict::Valid,
            Ok(repairs) => Verdict::Repairable(repairs),
            Err(reason) => Verdict::Rejected(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_from_check_result() {
        assert_eq!(Verdict::from(Ok(Vec::new())), Verdict::Valid);
        assert_eq!(
            Verdict::from(Ok(vec![Repair::stream_mean("distance_km")])),
            Verdict::Repairable(vec![Repair::stream_mean("distance_km")])
        );
        assert!(Verdict::from(Err(RejectReason::InvalidTimeOrder)).is_rejected());
    }

    #[test]
    fn test_repair_column() {
        assert_eq!(Repair::default_value("station_name", "S1").column(), "station_name");
    }
}
