//! Structured query results, ready for a reporting layer to render.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::{BikeType, UserType};
use crate::pricing::PricingStrategy;
use crate::stats::{DescriptiveStats, OutlierMethod};

/// Round half away from zero to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A rate that may have a zero denominator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Ratio {
    Defined(f64),
    /// The denominator was zero. Distinct from a rate of 0.
    Undefined,
}

impl Ratio {
    /// `numerator / denominator`, rounded to two decimals.
    pub fn new(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 || !denominator.is_finite() {
            Ratio::Undefined
        } else {
            Ratio::Defined(round2(numerator / denominator))
        }
    }

    /// `numerator / denominator` as a percentage, rounded to two decimals.
    pub fn percent(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 || !denominator.is_finite() {
            Ratio::Undefined
        } else {
            Ratio::Defined(round2(numerator / denominator * 100.0))
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Ratio::Defined(v) => Some(*v),
            Ratio::Undefined => None,
        }
    }

    pub fn is_defined(&self) -> bool {
        matches!(self, Ratio::Defined(_))
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Defined(v) => write!(f, "{:.2}", v),
            Ratio::Undefined => f.write_str("undefined"),
        }
    }
}

/// Trip volume overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSummary {
    pub total_trips: usize,
    pub total_distance_km: f64,
    /// `None` when there are no trips.
    pub average_duration_minutes: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationCount {
    pub station_id: String,
    pub station_name: String,
    pub trips: usize,
}

/// Busiest start and end stations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularStations {
    pub top_start_stations: Vec<StationCount>,
    pub top_end_stations: Vec<StationCount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourCount {
    pub hour: u32,
    pub trips: usize,
}

/// Trips per start hour. `hourly` always has 24 entries, hour 0 first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakHours {
    pub hourly: Vec<HourCount>,
    /// Busiest hour, earliest on ties. `None` when there are no trips.
    pub peak_hour: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayCount {
    pub weekday: String,
    pub trips: usize,
}

/// Busiest calendar date. `by_weekday` always has 7 entries, Monday first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakDay {
    pub peak_date: Option<NaiveDate>,
    pub peak_weekday: Option<String>,
    pub trips: usize,
    pub by_weekday: Vec<WeekdayCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTypeDistance {
    pub user_type: UserType,
    pub trips: usize,
    pub average_distance_km: f64,
}

/// Fleet utilization over the trip date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BikeUtilization {
    /// Usage minutes over available minutes, in percent.
    pub utilization_percentage: Ratio,
    pub bikes_in_fleet: usize,
    pub date_range_days: i64,
    pub total_usage_minutes: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCount {
    /// `YYYY-MM`.
    pub month: String,
    pub trips: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    /// Chronological.
    pub months: Vec<MonthCount>,
    pub busiest_month: Option<MonthCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserActivity {
    pub user_id: String,
    pub user_type: Option<UserType>,
    pub trips: usize,
}

/// Maintenance spend of one bike type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceCost {
    pub bike_type: BikeType,
    pub total_cost: f64,
    pub records: usize,
}

/// One (start, end) station pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteCount {
    pub start_station_id: String,
    pub start_station_name: String,
    pub end_station_id: String,
    pub end_station_name: String,
    pub trips: usize,
    /// Straight-line distance between the two stations.
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRate {
    pub completion_rate_percentage: Ratio,
    pub total_trips: usize,
    pub completed: usize,
    pub cancelled: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserTypeTrips {
    pub user_type: UserType,
    pub users: usize,
    pub trips: usize,
    pub average: Ratio,
}

/// Trips per distinct rider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripsPerUser {
    pub overall_average: Ratio,
    pub by_user_type: Vec<UserTypeTrips>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BikeMaintenance {
    pub bike_id: String,
    pub bike_type: Option<BikeType>,
    pub records: usize,
    pub total_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierTrip {
    pub trip_id: String,
    pub duration_minutes: f64,
    pub distance_km: f64,
    pub duration_outlier: bool,
    pub distance_outlier: bool,
}

/// Trips flagged as unusual on duration or distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierReport {
    pub method: OutlierMethod,
    /// Trips flagged on either column.
    pub total_outliers: usize,
    pub duration_outliers: usize,
    pub distance_outliers: usize,
    /// Flagged trips in input order, capped by the listing limit.
    pub trips: Vec<OutlierTrip>,
}

/// Descriptive statistics of the two numeric trip columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripStatistics {
    pub duration_minutes: Option<DescriptiveStats>,
    pub distance_km: Option<DescriptiveStats>,
}

/// Fare totals for one pricing strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRevenue {
    pub strategy: PricingStrategy,
    pub charged_trips: usize,
    pub total_revenue: f64,
    pub average_fare: Option<f64>,
}

/// Every query of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub trip_summary: TripSummary,
    pub popular_stations: PopularStations,
    pub peak_hours: PeakHours,
    pub peak_day: PeakDay,
    pub avg_distance_by_user_type: Vec<UserTypeDistance>,
    pub bike_utilization: BikeUtilization,
    pub monthly_trend: MonthlyTrend,
    pub top_users: Vec<UserActivity>,
    pub maintenance_cost_by_bike_type: Vec<MaintenanceCost>,
    pub top_routes: Vec<RouteCount>,
    pub completion_rate: CompletionRate,
    pub avg_trips_per_user: TripsPerUser,
    pub maintenance_frequency: Vec<BikeMaintenance>,
    pub outlier_trips: OutlierReport,
    pub trip_statistics: TripStatistics,
    pub revenue_by_strategy: Vec<StrategyRevenue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_zero_denominator() {
        assert_eq!(Ratio::percent(0.0, 0.0), Ratio::Undefined);
        assert_eq!(Ratio::percent(0.0, 4.0), Ratio::Defined(0.0));
        assert_ne!(Ratio::Undefined, Ratio::Defined(0.0));
        assert_eq!(Ratio::new(2.0, 3.0).value(), Some(0.67));
    }

    #[test]
    fn test_round2_half_away_from_zero() {
        assert_eq!(round2(2.5), 2.5);
        assert_eq!(round2(1.005 * 10.0), 10.05);
        assert_eq!(round2(-0.125), -0.13);
    }

    #[test]
    fn test_ratio_display_and_json() {
        assert_eq!(Ratio::Defined(12.5).to_string(), "12.50");
        assert_eq!(Ratio::Undefined.to_string(), "undefined");
        let json = serde_json::to_value(Ratio::Undefined).unwrap();
        assert_eq!(json["status"], "undefined");
    }
}
