//! Clean command - export clean tables and the reject log.

use std::path::PathBuf;

use citybike::export::export_dir;
use citybike::CityBike;
use colored::Colorize;

use super::{load_config, require_dir};

pub fn run(
    data_dir: PathBuf,
    output_dir: Option<PathBuf>,
    config: Option<PathBuf>,
    strict_schema: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    require_dir(&data_dir)?;
    let config = load_config(config, strict_schema)?;

    println!(
        "{} {}",
        "Cleaning".cyan().bold(),
        data_dir.display().to_string().white()
    );

    let result = CityBike::with_config(config).analyze_dir(&data_dir)?;

    let output_dir = output_dir.unwrap_or_else(|| data_dir.join("clean"));
    let written = export_dir(&output_dir, &result.dataset, &result.rejects)?;

    println!();
    for stream in &result.summary.streams {
        let rejected = format!("{:>6}", stream.rejected_rows);
        let rejected = if stream.rejected_rows > 0 {
            rejected.red()
        } else {
            rejected.green()
        };
        let origin = if stream.derived { " (derived)" } else { "" };
        println!(
            "  {:12} {} clean  {:>6} repaired  {} rejected{}",
            stream.entity.label(),
            format!("{:>6}", stream.clean_rows).white().bold(),
            stream.repaired_rows,
            rejected,
            origin.dimmed()
        );
    }

    println!();
    println!(
        "{} {} files to {}",
        "Wrote".green().bold(),
        written.len(),
        output_dir.display().to_string().white()
    );
    println!(
        "Data quality score: {:.0}%",
        result.summary.data_quality_score * 100.0
    );

    Ok(())
}
