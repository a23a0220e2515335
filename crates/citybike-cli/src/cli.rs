//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CityBike: clean bike-sharing fleet records and report on them
#[derive(Parser)]
#[command(name = "citybike")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Clean a data directory and print the analytics report
    Analyze {
        /// Directory holding trips.csv, stations.csv and maintenance.csv
        #[arg(value_name = "DATA_DIR")]
        data_dir: PathBuf,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Size of every top-N listing
        #[arg(short = 'n', long)]
        top_n: Option<usize>,

        /// Outlier rule for the outlier listing
        #[arg(long)]
        outlier_method: Option<OutlierChoice>,

        /// Outlier threshold (z-score) or multiplier (IQR)
        #[arg(long, requires = "outlier_method")]
        threshold: Option<f64>,

        /// Fail when a stream lacks a required column
        #[arg(long)]
        strict_schema: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Write the JSON report to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Clean a data directory and export the clean tables
    Clean {
        /// Directory holding the source CSV files
        #[arg(value_name = "DATA_DIR")]
        data_dir: PathBuf,

        /// Where to write *_clean.csv and rejects.csv (default: <DATA_DIR>/clean)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Fail when a stream lacks a required column
        #[arg(long)]
        strict_schema: bool,
    },

    /// Show every rejected row and why
    Rejects {
        /// Directory holding the source CSV files
        #[arg(value_name = "DATA_DIR")]
        data_dir: PathBuf,

        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Outlier rule choice
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum OutlierChoice {
    /// Distance from the mean in standard deviations
    Zscore,
    /// Distance outside the interquartile fences
    #[default]
    Iqr,
}

impl std::str::FromStr for OutlierChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "").as_str() {
            "zscore" | "z" => Ok(OutlierChoice::Zscore),
            "iqr" => Ok(OutlierChoice::Iqr),
            _ => Err(format!("Unknown outlier method: {}. Use zscore or iqr.", s)),
        }
    }
}

impl std::fmt::Display for OutlierChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutlierChoice::Zscore => write!(f, "zscore"),
            OutlierChoice::Iqr => write!(f, "iqr"),
        }
    }
}
