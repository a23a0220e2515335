//! Input handling: raw row containers and CSV loading.

mod loader;
mod source;

pub use loader::{CsvLoader, LoaderConfig};
pub use source::{RawDataset, RawRecord, RawTable, SourceMetadata};
