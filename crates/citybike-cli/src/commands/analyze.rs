//! Analyze command - clean a data directory and print the report.

use std::fs;
use std::path::PathBuf;

use citybike::analytics::AnalyticsReport;
use citybike::stats::DescriptiveStats;
use citybike::{CityBike, OutlierMethod, RunResult};
use colored::Colorize;

use super::{load_config, require_dir};
use crate::cli::OutlierChoice;

pub struct AnalyzeArgs {
    pub data_dir: PathBuf,
    pub config: Option<PathBuf>,
    pub top_n: Option<usize>,
    pub outlier_method: Option<OutlierChoice>,
    pub threshold: Option<f64>,
    pub strict_schema: bool,
    pub json: bool,
    pub output: Option<PathBuf>,
    pub verbose: bool,
}

pub fn run(args: AnalyzeArgs) -> Result<(), Box<dyn std::error::Error>> {
    require_dir(&args.data_dir)?;

    let mut config = load_config(args.config, args.strict_schema)?;
    if let Some(n) = args.top_n {
        config.analytics = config.analytics.with_top_n(n);
    }
    if let Some(choice) = args.outlier_method {
        let method = OutlierMethod::from_name(&choice.to_string(), args.threshold)
            .ok_or_else(|| format!("Unknown outlier method: {}", choice))?;
        config.analytics = config.analytics.with_outlier_method(method);
    }

    if !args.json {
        println!(
            "{} {}",
            "Analyzing".cyan().bold(),
            args.data_dir.display().to_string().white()
        );
    }

    let result = CityBike::with_config(config).analyze_dir(&args.data_dir)?;

    let document = serde_json::json!({
        "sources": result.sources,
        "summary": result.summary,
        "report": result.report,
    });

    if let Some(ref path) = args.output {
        fs::write(path, serde_json::to_string_pretty(&document)?)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    print_summary(&result, args.verbose);
    print_report(&result.report);

    if let Some(path) = args.output {
        println!();
        println!(
            "{} {}",
            "Saved to".green().bold(),
            path.display().to_string().white()
        );
    }

    Ok(())
}

fn print_summary(result: &RunResult, verbose: bool) {
    if verbose {
        println!();
        println!("{}", "Sources:".yellow().bold());
        for source in &result.sources {
            println!(
                "  {:16} {:>7} rows  {}",
                source.file,
                source.row_count,
                source.hash.dimmed()
            );
        }
    }

    println!();
    println!("{}", "Cleaning:".yellow().bold());
    for stream in &result.summary.streams {
        let origin = if stream.derived { " (derived)" } else { "" };
        println!(
            "  {:12} {:>6} raw  {:>6} clean  {} rejected{}",
            stream.entity.label(),
            stream.raw_rows,
            stream.clean_rows,
            format!("{:>6}", stream.rejected_rows).red(),
            origin.dimmed()
        );
    }

    let score = result.summary.data_quality_score * 100.0;
    let score_text = format!("{:.0}%", score);
    let score_color = if score >= 90.0 {
        score_text.green()
    } else if score >= 70.0 {
        score_text.yellow()
    } else {
        score_text.red()
    };
    println!("Data quality score: {}", score_color);
    println!("{}", result.summary.recommendation);
}

fn print_report(report: &AnalyticsReport) {
    let summary = &report.trip_summary;
    section("Trips");
    println!("  Total trips:        {}", summary.total_trips.to_string().white().bold());
    println!("  Total distance:     {:.2} km", summary.total_distance_km);
    println!("  Average duration:   {}", minutes(summary.average_duration_minutes));

    let completion = &report.completion_rate;
    println!(
        "  Completion rate:    {}% ({} completed, {} cancelled)",
        completion.completion_rate_percentage, completion.completed, completion.cancelled
    );

    section("Popular start stations");
    for station in &report.popular_stations.top_start_stations {
        println!("  {:8} {:28} {:>6}", station.station_id, station.station_name, station.trips);
    }
    section("Popular end stations");
    for station in &report.popular_stations.top_end_stations {
        println!("  {:8} {:28} {:>6}", station.station_id, station.station_name, station.trips);
    }

    section("Peak hours");
    let busiest = report.peak_hours.hourly.iter().map(|h| h.trips).max().unwrap_or(0);
    for hour in &report.peak_hours.hourly {
        let width = if busiest == 0 { 0 } else { hour.trips * 30 / busiest };
        let marker = if Some(hour.hour) == report.peak_hours.peak_hour { " <" } else { "" };
        let bar = "█".repeat(width);
        println!("  {:02}:00 {:>6} {}{}", hour.hour, hour.trips, bar.cyan(), marker);
    }

    section("Peak day");
    match (&report.peak_day.peak_date, &report.peak_day.peak_weekday) {
        (Some(date), Some(weekday)) => {
            println!("  {} ({}) with {} trips", date, weekday, report.peak_day.trips)
        }
        _ => println!("  {}", "no trips".dimmed()),
    }
    for day in &report.peak_day.by_weekday {
        println!("  {:10} {:>6}", day.weekday, day.trips);
    }

    section("Monthly trend");
    for month in &report.monthly_trend.months {
        println!("  {} {:>6}", month.month, month.trips);
    }

    section("Riders");
    for entry in &report.avg_distance_by_user_type {
        println!(
            "  {:8} {:>6} trips  {:.2} km average",
            entry.user_type.label(),
            entry.trips,
            entry.average_distance_km
        );
    }
    println!("  Trips per user:     {}", report.avg_trips_per_user.overall_average);
    for entry in &report.avg_trips_per_user.by_user_type {
        println!(
            "    {:8} {} ({} users)",
            entry.user_type.label(),
            entry.average,
            entry.users
        );
    }

    section("Top users");
    for user in &report.top_users {
        let kind = user.user_type.map_or("unknown", |t| t.label());
        println!("  {:10} {:8} {:>6}", user.user_id, kind, user.trips);
    }

    section("Top routes");
    for route in &report.top_routes {
        let distance = route
            .distance_km
            .map_or_else(|| "-".to_string(), |d| format!("{:.2} km", d));
        println!(
            "  {} -> {} {:>6}  {}",
            route.start_station_name,
            route.end_station_name,
            route.trips,
            distance.dimmed()
        );
    }

    section("Fleet");
    let utilization = &report.bike_utilization;
    println!(
        "  Utilization:        {}% of {} bikes over {} days",
        utilization.utilization_percentage,
        utilization.bikes_in_fleet,
        utilization.date_range_days
    );
    for cost in &report.maintenance_cost_by_bike_type {
        println!(
            "  {:8} {:>10.2} over {} records",
            cost.bike_type.label(),
            cost.total_cost,
            cost.records
        );
    }

    section("Most maintained bikes");
    for bike in &report.maintenance_frequency {
        let kind = bike.bike_type.map_or("unknown", |t| t.label());
        println!(
            "  {:8} {:8} {:>4} records  {:>10.2}",
            bike.bike_id, kind, bike.records, bike.total_cost
        );
    }

    let outliers = &report.outlier_trips;
    section(&format!("Outliers ({})", outliers.method.label()));
    println!(
        "  {} trips flagged ({} on duration, {} on distance)",
        outliers.total_outliers.to_string().yellow(),
        outliers.duration_outliers,
        outliers.distance_outliers
    );
    for trip in &outliers.trips {
        println!(
            "  {:10} {:>8.2} min {:>8.2} km",
            trip.trip_id, trip.duration_minutes, trip.distance_km
        );
    }

    section("Trip statistics");
    print_stats("duration (min)", report.trip_statistics.duration_minutes.as_ref());
    print_stats("distance (km)", report.trip_statistics.distance_km.as_ref());

    section("Revenue by pricing strategy");
    for revenue in &report.revenue_by_strategy {
        println!(
            "  {:10} {:>10.2} over {} trips",
            revenue.strategy.name(),
            revenue.total_revenue,
            revenue.charged_trips
        );
    }
}

fn print_stats(label: &str, stats: Option<&DescriptiveStats>) {
    match stats {
        Some(s) => println!(
            "  {:15} mean {:.2}  median {:.2}  std {:.2}  min {:.2}  max {:.2}  p90 {:.2}",
            label, s.mean, s.median, s.std, s.min, s.max, s.p90
        ),
        None => println!("  {:15} {}", label, "no data".dimmed()),
    }
}

fn section(title: &str) {
    println!();
    println!("{}", format!("{}:", title).yellow().bold());
}

fn minutes(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |m| format!("{:.2} min", m))
}
