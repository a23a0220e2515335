//! Record parser/normalizer: raw rows to typed candidates.
//!
//! Parsing never rejects. Missing and malformed cells are carried as
//! [`Field::Missing`] and [`Field::Invalid`] for the validators to judge.

pub mod columns;
mod candidates;
mod fields;

pub use candidates::{
    BikeCandidate, Candidate, MaintenanceCandidate, StationCandidate, TaggedTrip, TripCandidate,
    UserCandidate,
};
pub use columns::{ColumnDef, EntitySchema};
pub use fields::{parse_datetime, Field};
