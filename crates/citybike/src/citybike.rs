//! Main CityBike struct and public API.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analytics::{AnalyticsConfig, AnalyticsEngine, AnalyticsReport};
use crate::cleaning::{CleanDataset, CleanerConfig, DataCleaner, RejectLog, StreamReport};
use crate::error::{CityBikeError, Result};
use crate::input::{CsvLoader, LoaderConfig, RawDataset, SourceMetadata};

/// Configuration for a full pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CityBikeConfig {
    /// CSV loading configuration.
    pub loader: LoaderConfig,
    /// Cleaning configuration.
    pub cleaner: CleanerConfig,
    /// Analytics configuration.
    pub analytics: AnalyticsConfig,
}

impl CityBikeConfig {
    /// Read a configuration from a JSON file. Absent keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| CityBikeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Result of running the pipeline over one dataset.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// The clean tables.
    pub dataset: CleanDataset,
    /// Answers to every analytical query.
    pub report: AnalyticsReport,
    /// Every excluded row with its reason.
    pub rejects: RejectLog,
    /// Loaded files, empty when the dataset was supplied in memory.
    pub sources: Vec<SourceMetadata>,
    pub summary: RunSummary,
}

/// Summary of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Row accounting per entity, in cleaning order.
    pub streams: Vec<StreamReport>,
    /// Total rejected rows.
    pub total_rejects: usize,
    /// Rejects by reason code.
    pub rejects_by_reason: IndexMap<String, usize>,
    /// Share of supplied rows that reached a clean table (0.0-1.0).
    pub data_quality_score: f64,
    /// Human-readable recommendation.
    pub recommendation: String,
}

/// The main CityBike pipeline: load, clean, analyze.
pub struct CityBike {
    config: CityBikeConfig,
    loader: CsvLoader,
    cleaner: DataCleaner,
}

impl CityBike {
    /// Create a new CityBike instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(CityBikeConfig::default())
    }

    /// Create a CityBike instance with custom configuration.
    pub fn with_config(config: CityBikeConfig) -> Self {
        let loader = CsvLoader::with_config(config.loader.clone());
        let cleaner = DataCleaner::with_config(config.cleaner.clone());

        Self {
            config,
            loader,
            cleaner,
        }
    }

    pub fn config(&self) -> &CityBikeConfig {
        &self.config
    }

    /// Load every stream in `dir` and run the pipeline.
    pub fn analyze_dir(&self, dir: impl AsRef<Path>) -> Result<RunResult> {
        let (raw, sources) = self.loader.load_dir(dir)?;
        let mut result = self.run(raw)?;
        result.sources = sources;
        Ok(result)
    }

    /// Clean an in-memory dataset and answer every query over it.
    pub fn run(&self, raw: RawDataset) -> Result<RunResult> {
        let outcome = self.cleaner.clean(&raw)?;

        let report = AnalyticsEngine::with_config(&outcome.dataset, self.config.analytics.clone())
            .report();
        let summary = summarize(outcome.streams, &outcome.rejects);

        info!(
            rejects = summary.total_rejects,
            quality = summary.data_quality_score,
            "pipeline finished"
        );

        Ok(RunResult {
            dataset: outcome.dataset,
            report,
            rejects: outcome.rejects,
            sources: Vec::new(),
            summary,
        })
    }
}

impl Default for CityBike {
    fn default() -> Self {
        Self::new()
    }
}

fn summarize(streams: Vec<StreamReport>, rejects: &RejectLog) -> RunSummary {
    let data_quality_score = quality_score(&streams);
    let recommendation = recommendation(&streams, rejects, data_quality_score);

    RunSummary {
        streams,
        total_rejects: rejects.len(),
        rejects_by_reason: rejects.counts_by_reason(),
        data_quality_score,
        recommendation,
    }
}

/// Clean rows over raw rows across supplied streams. Derived tables have
/// no raw rows and are left out.
fn quality_score(streams: &[StreamReport]) -> f64 {
    let (raw, clean) = streams
        .iter()
        .filter(|s| !s.derived)
        .fold((0, 0), |(raw, clean), s| (raw + s.raw_rows, clean + s.clean_rows));

    if raw == 0 {
        return 1.0;
    }
    (clean as f64 / raw as f64).clamp(0.0, 1.0)
}

fn recommendation(streams: &[StreamReport], rejects: &RejectLog, score: f64) -> String {
    let emptied: Vec<&str> = streams
        .iter()
        .filter(|s| s.raw_rows > 0 && s.clean_rows == 0)
        .map(|s| s.entity.label())
        .collect();

    if !emptied.is_empty() {
        format!(
            "No usable rows in the {} stream(s). Check the source files before relying on results.",
            emptied.join(", ")
        )
    } else if rejects.is_empty() {
        "All rows passed cleaning.".to_string()
    } else if score >= 0.9 {
        format!(
            "Data quality is good. Review {} rejected row(s) in the reject log.",
            rejects.len()
        )
    } else if score >= 0.7 {
        format!(
            "Data quality is acceptable ({:.0}% of rows kept). \
             Consider fixing the most common reject reasons.",
            score * 100.0
        )
    } else {
        format!(
            "Data quality needs attention: only {:.0}% of rows kept.",
            score * 100.0
        )
    }
}
