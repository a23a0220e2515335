//! CityBike: data cleaning and analytics for bike-sharing fleet records.
//!
//! CityBike reads raw trip, station, maintenance and (optionally) user and
//! bike tables, turns them into validated, deduplicated and cross-referenced
//! clean tables, and answers a fixed set of fleet questions over them.
//!
//! # Core Principles
//!
//! - **Nothing is dropped silently**: every excluded row lands in the reject
//!   log with a reason code
//! - **Deterministic**: the same input always yields the same tables, log
//!   and report
//! - **Read-only analytics**: queries never mutate the clean tables
//!
//! # Example
//!
//! ```no_run
//! use citybike::CityBike;
//!
//! let result = CityBike::new().analyze_dir("data/").unwrap();
//!
//! println!("Trips: {}", result.report.trip_summary.total_trips);
//! println!("Rejected rows: {}", result.rejects.len());
//! ```

pub mod analytics;
pub mod cleaning;
pub mod error;
pub mod export;
pub mod input;
pub mod model;
pub mod parse;
pub mod pricing;
pub mod resolve;
pub mod stats;
pub mod validation;

mod citybike;

pub use crate::citybike::{CityBike, CityBikeConfig, RunResult, RunSummary};
pub use analytics::{AnalyticsConfig, AnalyticsEngine, AnalyticsReport, Ratio};
pub use cleaning::{CleanDataset, CleanerConfig, DataCleaner, RejectLog, RejectReason};
pub use error::{CityBikeError, Result};
pub use input::{CsvLoader, LoaderConfig, RawDataset, RawRecord, RawTable, SourceMetadata};
pub use model::{
    Bike, BikeType, EntityKind, MaintenanceRecord, Station, Trip, TripStatus, User, UserType,
};
pub use pricing::{fare, FareInput, PricingStrategy};
pub use stats::OutlierMethod;
