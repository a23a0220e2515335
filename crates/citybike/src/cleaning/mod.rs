//! Data cleaner and reject log.

mod cleaner;
mod reject;

pub use cleaner::{CleanDataset, CleanerConfig, CleaningOutcome, DataCleaner, StreamReport};
pub use reject::{RejectCategory, RejectEntry, RejectLog, RejectReason, RejectStage};
