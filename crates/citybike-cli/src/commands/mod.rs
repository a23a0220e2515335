//! CLI command implementations.

pub mod analyze;
pub mod clean;
pub mod rejects;

use std::path::{Path, PathBuf};

use citybike::CityBikeConfig;
use tracing::debug;

/// Load the configuration file if one was given, then apply flag overrides.
pub fn load_config(
    config: Option<PathBuf>,
    strict_schema: bool,
) -> Result<CityBikeConfig, Box<dyn std::error::Error>> {
    let mut config = match config {
        Some(path) => {
            debug!(path = %path.display(), "loading configuration");
            CityBikeConfig::from_json_file(&path)?
        }
        None => CityBikeConfig::default(),
    };

    if strict_schema {
        config.cleaner.strict_schema = true;
    }
    Ok(config)
}

/// Fail early with a readable message when the data directory is missing.
pub fn require_dir(dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if !dir.is_dir() {
        return Err(format!("Data directory not found: {}", dir.display()).into());
    }
    Ok(())
}
