//! Rejects command - show every rejected row and why.

use std::path::PathBuf;

use citybike::CityBike;
use colored::Colorize;

use super::{load_config, require_dir};

pub fn run(
    data_dir: PathBuf,
    config: Option<PathBuf>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    require_dir(&data_dir)?;
    let config = load_config(config, false)?;
    let result = CityBike::with_config(config).analyze_dir(&data_dir)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result.rejects)?);
        return Ok(());
    }

    if result.rejects.is_empty() {
        println!("{}", "No rows rejected - data looks clean!".green());
        return Ok(());
    }

    println!(
        "{} rejected rows",
        result.rejects.len().to_string().white().bold()
    );
    println!();

    println!("{}", "By reason:".yellow().bold());
    for (code, count) in &result.summary.rejects_by_reason {
        println!("  {:22} {}", code, count.to_string().red());
    }
    println!();

    println!("{}", "Rows:".yellow().bold());
    for entry in &result.rejects {
        println!(
            "  {:12} row {:>5}  {} {}",
            entry.entity.label(),
            entry.row_number,
            format!("{:22}", entry.reason.code()).red(),
            entry.reason.detail().dimmed()
        );
    }

    Ok(())
}
