//! Example: clean a bike-sharing data directory and print a few answers.
//!
//! Usage:
//!   cargo run --example analyze -- <data_dir>
//!
//! The directory must hold `trips.csv`, `stations.csv` and `maintenance.csv`;
//! `users.csv` and `bikes.csv` are picked up when present.

use std::env;
use std::path::Path;

use citybike::{CityBike, PricingStrategy};

fn main() -> citybike::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example analyze -- <data_dir>");
        std::process::exit(1);
    }

    let dir = Path::new(&args[1]);
    if !dir.is_dir() {
        eprintln!("Error: Directory not found: {}", dir.display());
        std::process::exit(1);
    }

    let separator = "=".repeat(60);
    println!("{}", separator);
    println!("CityBike: {}", dir.display());
    println!("{}", separator);

    let result = CityBike::new().analyze_dir(dir)?;

    println!();
    println!("Sources:");
    for source in &result.sources {
        println!("  {:18} {:>7} rows", source.file, source.row_count);
    }

    println!();
    println!("Cleaning:");
    for stream in &result.summary.streams {
        println!(
            "  {:12} raw {:>6}  clean {:>6}  rejected {:>6}{}",
            stream.entity.label(),
            stream.raw_rows,
            stream.clean_rows,
            stream.rejected_rows,
            if stream.derived { "  (derived)" } else { "" }
        );
    }
    for (code, count) in &result.summary.rejects_by_reason {
        println!("  - {}: {}", code, count);
    }
    println!("  {}", result.summary.recommendation);

    let report = &result.report;
    println!();
    println!("Trips: {}", report.trip_summary.total_trips);
    println!("Completion rate: {}%", report.completion_rate.completion_rate_percentage);
    println!("Fleet utilization: {}%", report.bike_utilization.utilization_percentage);
    if let Some(hour) = report.peak_hours.peak_hour {
        println!("Peak hour: {:02}:00", hour);
    }

    println!();
    println!("Top routes:");
    for route in report.top_routes.iter().take(5) {
        println!(
            "  {} -> {}: {} trips",
            route.start_station_name, route.end_station_name, route.trips
        );
    }

    println!();
    println!("Revenue by strategy:");
    for revenue in &report.revenue_by_strategy {
        let marker = if revenue.strategy == PricingStrategy::Member { " (members)" } else { "" };
        println!("  {:10} {:>10.2}{}", revenue.strategy.name(), revenue.total_revenue, marker);
    }

    Ok(())
}
