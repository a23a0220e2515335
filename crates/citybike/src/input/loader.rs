//! CSV loading for the three fleet streams plus optional master files.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::error::{CityBikeError, Result};
use crate::model::EntityKind;

use super::source::{RawDataset, RawTable, SourceMetadata};

/// Loader configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Field delimiter.
    pub delimiter: u8,
    /// Quote character.
    pub quote: u8,
    /// Maximum rows to read per file (None = all).
    pub max_rows: Option<usize>,
    pub trips_file: String,
    pub stations_file: String,
    pub maintenance_file: String,
    /// Optional, the users table is derived from trips when the file is absent.
    pub users_file: String,
    /// Optional, the bikes table is derived from trips when the file is absent.
    pub bikes_file: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            max_rows: None,
            trips_file: "trips.csv".to_string(),
            stations_file: "stations.csv".to_string(),
            maintenance_file: "maintenance.csv".to_string(),
            users_file: "users.csv".to_string(),
            bikes_file: "bikes.csv".to_string(),
        }
    }
}

impl LoaderConfig {
    /// Set the field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Cap the number of rows read from each file.
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }
}

/// Reads source files into [`RawTable`]s.
pub struct CsvLoader {
    config: LoaderConfig,
}

impl CsvLoader {
    /// Create a new loader with default configuration.
    pub fn new() -> Self {
        Self {
            config: LoaderConfig::default(),
        }
    }

    /// Create a loader with custom configuration.
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Load every stream found in `dir`.
    ///
    /// Trips, stations and maintenance files are required. Users and bikes
    /// files are picked up when present.
    pub fn load_dir(&self, dir: impl AsRef<Path>) -> Result<(RawDataset, Vec<SourceMetadata>)> {
        let dir = dir.as_ref();
        let mut sources = Vec::new();

        let (trips, meta) = self.load_file(dir.join(&self.config.trips_file), EntityKind::Trip)?;
        sources.push(meta);
        let (stations, meta) =
            self.load_file(dir.join(&self.config.stations_file), EntityKind::Station)?;
        sources.push(meta);
        let (maintenance, meta) = self.load_file(
            dir.join(&self.config.maintenance_file),
            EntityKind::Maintenance,
        )?;
        sources.push(meta);

        let mut dataset = RawDataset::new(trips, stations, maintenance);

        let users_path = dir.join(&self.config.users_file);
        if users_path.is_file() {
            let (users, meta) = self.load_file(users_path, EntityKind::User)?;
            sources.push(meta);
            dataset = dataset.with_users(users);
        } else {
            debug!(path = %users_path.display(), "no users file, users will be derived from trips");
        }

        let bikes_path = dir.join(&self.config.bikes_file);
        if bikes_path.is_file() {
            let (bikes, meta) = self.load_file(bikes_path, EntityKind::Bike)?;
            sources.push(meta);
            dataset = dataset.with_bikes(bikes);
        } else {
            debug!(path = %bikes_path.display(), "no bikes file, bikes will be derived from trips");
        }

        Ok((dataset, sources))
    }

    /// Load one file and return its rows and metadata.
    pub fn load_file(
        &self,
        path: impl Into<PathBuf>,
        entity: EntityKind,
    ) -> Result<(RawTable, SourceMetadata)> {
        let path = path.into();

        let mut file = File::open(&path).map_err(|e| CityBikeError::Io {
            path: path.clone(),
            source: e,
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)
            .map_err(|e| CityBikeError::Io {
                path: path.clone(),
                source: e,
            })?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let table = self.parse_bytes(&contents)?;

        info!(
            entity = %entity,
            file = %path.display(),
            rows = table.row_count(),
            columns = table.column_count(),
            "loaded source"
        );

        let metadata = SourceMetadata::new(
            entity,
            path,
            hash,
            contents.len() as u64,
            table.row_count(),
            table.column_count(),
        );

        Ok((table, metadata))
    }

    /// Parse delimited bytes. A file with no header line yields an empty table.
    ///
    /// Cells that are not valid UTF-8 are decoded lossily so the row reaches
    /// validation instead of failing the whole file.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<RawTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .quote(self.config.quote)
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|s| s.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Ok(RawTable::empty());
        }

        let mut rows = Vec::new();
        let mut lossy_rows = 0usize;
        for (row_idx, result) in reader.byte_records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }

            let record = result?;
            if std::str::from_utf8(record.as_slice()).is_err() {
                lossy_rows += 1;
            }
            rows.push(
                record
                    .iter()
                    .map(|field| String::from_utf8_lossy(field).into_owned())
                    .collect(),
            );
        }

        if lossy_rows > 0 {
            warn!(rows = lossy_rows, "decoded rows with invalid UTF-8 lossily");
        }

        Ok(RawTable::new(headers, rows))
    }
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new()
    }
}
