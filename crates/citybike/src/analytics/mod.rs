//! Analytical engine and its structured results.

mod engine;
mod ranking;
mod results;

pub use engine::{AnalyticsConfig, AnalyticsEngine};
pub use ranking::{rank, top_n, top_one};
pub use results::{
    round2, AnalyticsReport, BikeMaintenance, BikeUtilization, CompletionRate, HourCount,
    MaintenanceCost, MonthCount, MonthlyTrend, OutlierReport, OutlierTrip, PeakDay, PeakHours,
    PopularStations, Ratio, RouteCount, StationCount, StrategyRevenue, TripStatistics,
    TripSummary, TripsPerUser, UserActivity, UserTypeDistance, UserTypeTrips, WeekdayCount,
};
