//! Analytical engine: the fixed battery of fleet queries.
//!
//! Every query is a pure read over the clean tables. Grouping queries rank
//! by aggregate descending with ties broken by ascending key; reported
//! floats are rounded to two decimals.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cleaning::CleanDataset;
use crate::model::{BikeType, Trip, TripStatus, UserType};
use crate::pricing::{fare, FareInput, PricingStrategy};
use crate::stats::{descriptive_stats, mean, station_distance, OutlierMethod};

use super::ranking::{rank, top_n, top_one};
use super::results::{
    round2, AnalyticsReport, BikeMaintenance, BikeUtilization, CompletionRate, HourCount,
    MaintenanceCost, MonthCount, MonthlyTrend, OutlierReport, OutlierTrip, PeakDay, PeakHours,
    PopularStations, Ratio, RouteCount, StationCount, StrategyRevenue, TripStatistics,
    TripSummary, TripsPerUser, UserActivity, UserTypeDistance, UserTypeTrips, WeekdayCount,
};

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Analytics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Stations listed per direction by `popular_stations`.
    pub top_stations: usize,
    pub top_users: usize,
    pub top_routes: usize,
    /// Bikes listed by `maintenance_frequency`.
    pub top_maintenance: usize,
    /// Rule used by `outlier_trips` in the full report.
    pub outlier_method: OutlierMethod,
    /// Maximum flagged trips listed by `outlier_trips`.
    pub outlier_listing_limit: usize,
    /// Strategies compared by `revenue_by_strategy`.
    pub pricing_strategies: Vec<PricingStrategy>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            top_stations: 10,
            top_users: 15,
            top_routes: 10,
            top_maintenance: 10,
            outlier_method: OutlierMethod::default(),
            outlier_listing_limit: 20,
            pricing_strategies: PricingStrategy::ALL.to_vec(),
        }
    }
}

impl AnalyticsConfig {
    /// Use one size for every ranking query.
    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_stations = n;
        self.top_users = n;
        self.top_routes = n;
        self.top_maintenance = n;
        self
    }

    pub fn with_outlier_method(mut self, method: OutlierMethod) -> Self {
        self.outlier_method = method;
        self
    }

    pub fn with_outlier_listing_limit(mut self, limit: usize) -> Self {
        self.outlier_listing_limit = limit;
        self
    }
}

/// Answers the analytical queries over one clean dataset.
pub struct AnalyticsEngine<'a> {
    data: &'a CleanDataset,
    config: AnalyticsConfig,
}

impl<'a> AnalyticsEngine<'a> {
    /// Create an engine with default configuration.
    pub fn new(data: &'a CleanDataset) -> Self {
        Self::with_config(data, AnalyticsConfig::default())
    }

    /// Create an engine with custom configuration.
    pub fn with_config(data: &'a CleanDataset, config: AnalyticsConfig) -> Self {
        Self { data, config }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Run every query.
    pub fn report(&self) -> AnalyticsReport {
        debug!(
            trips = self.data.trips.len(),
            maintenance = self.data.maintenance.len(),
            "running analytics"
        );

        AnalyticsReport {
            trip_summary: self.trip_summary(),
            popular_stations: self.popular_stations(self.config.top_stations),
            peak_hours: self.peak_hours(),
            peak_day: self.peak_day(),
            avg_distance_by_user_type: self.avg_distance_by_user_type(),
            bike_utilization: self.bike_utilization(),
            monthly_trend: self.monthly_trend(),
            top_users: self.top_users(self.config.top_users),
            maintenance_cost_by_bike_type: self.maintenance_cost_by_bike_type(),
            top_routes: self.top_routes(self.config.top_routes),
            completion_rate: self.completion_rate(),
            avg_trips_per_user: self.avg_trips_per_user(),
            maintenance_frequency: self.maintenance_frequency(self.config.top_maintenance),
            outlier_trips: self.outlier_trips(self.config.outlier_method),
            trip_statistics: self.trip_statistics(),
            revenue_by_strategy: self.revenue_by_strategy(),
        }
    }

    // ========================================================================
    // Trip volume
    // ========================================================================

    /// Total trips, total distance and average duration.
    pub fn trip_summary(&self) -> TripSummary {
        let trips = &self.data.trips;
        let total_distance: f64 = trips.iter().map(|t| t.distance_km).sum();

        TripSummary {
            total_trips: trips.len(),
            total_distance_km: round2(total_distance),
            average_duration_minutes: mean(&self.durations()).map(round2),
        }
    }

    /// Most used start and end stations.
    pub fn popular_stations(&self, n: usize) -> PopularStations {
        let starts = count_by(self.data.trips.iter().map(|t| t.start_station_id.as_str()));
        let ends = count_by(self.data.trips.iter().map(|t| t.end_station_id.as_str()));

        PopularStations {
            top_start_stations: self.station_counts(starts, n),
            top_end_stations: self.station_counts(ends, n),
        }
    }

    fn station_counts(&self, counts: BTreeMap<&str, usize>, n: usize) -> Vec<StationCount> {
        let resolver = self.data.resolver();
        top_n(counts.into_iter().collect(), n, |c| *c as f64)
            .into_iter()
            .map(|(id, trips)| StationCount {
                station_id: id.to_string(),
                station_name: resolver.station_name(id).unwrap_or(id).to_string(),
                trips,
            })
            .collect()
    }

    /// Trips per start hour, all 24 hours present.
    pub fn peak_hours(&self) -> PeakHours {
        let mut hourly = [0usize; 24];
        for trip in &self.data.trips {
            hourly[trip.start_time.hour() as usize] += 1;
        }

        let pairs: Vec<(u32, usize)> = (0u32..24).zip(hourly).collect();
        let peak_hour = if self.data.trips.is_empty() {
            None
        } else {
            top_one(&pairs, |c| *c as f64).map(|(hour, _)| hour)
        };

        PeakHours {
            hourly: pairs
                .into_iter()
                .map(|(hour, trips)| HourCount { hour, trips })
                .collect(),
            peak_hour,
        }
    }

    /// Busiest calendar date plus a Monday-to-Sunday histogram.
    pub fn peak_day(&self) -> PeakDay {
        let daily: Vec<(NaiveDate, usize)> =
            count_by(self.data.trips.iter().map(|t| t.start_time.date()))
                .into_iter()
                .collect();

        let mut weekdays = [0usize; 7];
        for trip in &self.data.trips {
            weekdays[trip.start_time.weekday().num_days_from_monday() as usize] += 1;
        }

        let peak = top_one(&daily, |c| *c as f64);

        PeakDay {
            peak_date: peak.map(|(date, _)| date),
            peak_weekday: peak.map(|(date, _)| weekday_name(date.weekday()).to_string()),
            trips: peak.map_or(0, |(_, count)| count),
            by_weekday: WEEKDAYS
                .iter()
                .zip(weekdays)
                .map(|(day, trips)| WeekdayCount {
                    weekday: weekday_name(*day).to_string(),
                    trips,
                })
                .collect(),
        }
    }

    /// Trips per month, chronologically, plus the busiest month.
    pub fn monthly_trend(&self) -> MonthlyTrend {
        let months: Vec<(String, usize)> =
            count_by(self.data.trips.iter().map(|t| t.start_time.format("%Y-%m").to_string()))
                .into_iter()
                .collect();

        let busiest_month = top_one(&months, |c| *c as f64)
            .map(|(month, trips)| MonthCount { month, trips });

        MonthlyTrend {
            months: months
                .into_iter()
                .map(|(month, trips)| MonthCount { month, trips })
                .collect(),
            busiest_month,
        }
    }

    /// Most frequent (start, end) station pairs.
    pub fn top_routes(&self, n: usize) -> Vec<RouteCount> {
        let resolver = self.data.resolver();
        let counts = count_by(self.data.trips.iter().map(|t| t.route()));

        top_n(counts.into_iter().collect(), n, |c| *c as f64)
            .into_iter()
            .map(|((start, end), trips)| {
                let from = resolver.station(start);
                let to = resolver.station(end);
                RouteCount {
                    start_station_id: start.to_string(),
                    start_station_name: from.map_or(start, |s| s.name.as_str()).to_string(),
                    end_station_id: end.to_string(),
                    end_station_name: to.map_or(end, |s| s.name.as_str()).to_string(),
                    trips,
                    distance_km: from.zip(to).map(|(a, b)| round2(station_distance(a, b))),
                }
            })
            .collect()
    }

    // ========================================================================
    // Riders
    // ========================================================================

    /// Mean trip distance per user type. Only types with trips appear.
    pub fn avg_distance_by_user_type(&self) -> Vec<UserTypeDistance> {
        let mut groups: BTreeMap<UserType, (usize, f64)> = BTreeMap::new();
        for (trip, user_type) in self.trips_with_user_type() {
            let entry = groups.entry(user_type).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += trip.distance_km;
        }

        groups
            .into_iter()
            .map(|(user_type, (trips, total))| UserTypeDistance {
                user_type,
                trips,
                average_distance_km: round2(total / trips as f64),
            })
            .collect()
    }

    /// Most active users.
    pub fn top_users(&self, n: usize) -> Vec<UserActivity> {
        let resolver = self.data.resolver();
        let counts = count_by(self.data.trips.iter().map(|t| t.user_id.as_str()));

        top_n(counts.into_iter().collect(), n, |c| *c as f64)
            .into_iter()
            .map(|(id, trips)| UserActivity {
                user_id: id.to_string(),
                user_type: resolver.user(id).map(|u| u.user_type),
                trips,
            })
            .collect()
    }

    /// Trips per distinct rider, overall and per user type.
    pub fn avg_trips_per_user(&self) -> TripsPerUser {
        let riders: BTreeSet<&str> = self.data.trips.iter().map(|t| t.user_id.as_str()).collect();

        let mut groups: BTreeMap<UserType, (usize, BTreeSet<&str>)> = BTreeMap::new();
        for (trip, user_type) in self.trips_with_user_type() {
            let entry = groups.entry(user_type).or_default();
            entry.0 += 1;
            entry.1.insert(trip.user_id.as_str());
        }

        TripsPerUser {
            overall_average: Ratio::new(self.data.trips.len() as f64, riders.len() as f64),
            by_user_type: groups
                .into_iter()
                .map(|(user_type, (trips, users))| UserTypeTrips {
                    user_type,
                    users: users.len(),
                    trips,
                    average: Ratio::new(trips as f64, users.len() as f64),
                })
                .collect(),
        }
    }

    // ========================================================================
    // Fleet
    // ========================================================================

    /// Share of available bike-minutes spent riding.
    ///
    /// Available minutes are fleet size × 1440 × (whole days between the
    /// first and last trip start + 1).
    pub fn bike_utilization(&self) -> BikeUtilization {
        let trips = &self.data.trips;
        let fleet = self.data.bikes.len();
        let usage: f64 = self.durations().iter().sum();

        let first = trips.iter().map(|t| t.start_time).min();
        let last = trips.iter().map(|t| t.start_time).max();
        let days = match (first, last) {
            (Some(first), Some(last)) => (last - first).num_days() + 1,
            _ => 0,
        };

        BikeUtilization {
            utilization_percentage: Ratio::percent(usage, fleet as f64 * 1440.0 * days as f64),
            bikes_in_fleet: fleet,
            date_range_days: days,
            total_usage_minutes: round2(usage),
        }
    }

    /// Share of trips that completed.
    pub fn completion_rate(&self) -> CompletionRate {
        let trips = &self.data.trips;
        let completed = trips.iter().filter(|t| t.status == TripStatus::Completed).count();
        let cancelled = trips.iter().filter(|t| t.status == TripStatus::Cancelled).count();

        CompletionRate {
            completion_rate_percentage: Ratio::percent(completed as f64, trips.len() as f64),
            total_trips: trips.len(),
            completed,
            cancelled,
        }
    }

    /// Maintenance spend per bike type, highest first.
    pub fn maintenance_cost_by_bike_type(&self) -> Vec<MaintenanceCost> {
        let resolver = self.data.resolver();
        let mut groups: BTreeMap<BikeType, (f64, usize)> = BTreeMap::new();
        for record in &self.data.maintenance {
            let Some(bike) = resolver.bike(&record.bike_id) else {
                continue;
            };
            let entry = groups.entry(bike.bike_type()).or_insert((0.0, 0));
            entry.0 += record.cost;
            entry.1 += 1;
        }

        rank(groups.into_iter().collect(), |(cost, _)| *cost)
            .into_iter()
            .map(|(bike_type, (cost, records))| MaintenanceCost {
                bike_type,
                total_cost: round2(cost),
                records,
            })
            .collect()
    }

    /// Bikes with the most maintenance records.
    pub fn maintenance_frequency(&self, n: usize) -> Vec<BikeMaintenance> {
        let resolver = self.data.resolver();
        let mut groups: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
        for record in &self.data.maintenance {
            let entry = groups.entry(record.bike_id.as_str()).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += record.cost;
        }

        top_n(groups.into_iter().collect(), n, |(records, _)| *records as f64)
            .into_iter()
            .map(|(bike_id, (records, cost))| BikeMaintenance {
                bike_id: bike_id.to_string(),
                bike_type: resolver.bike(bike_id).map(|b| b.bike_type()),
                records,
                total_cost: round2(cost),
            })
            .collect()
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Trips with an unusual duration or distance.
    pub fn outlier_trips(&self, method: OutlierMethod) -> OutlierReport {
        let trips = self.data.trips.as_slice();
        let durations = self.durations();
        let distances: Vec<f64> = trips.iter().map(|t| t.distance_km).collect();

        let duration_flags = flags(trips.len(), method.detect(&durations));
        let distance_flags = flags(trips.len(), method.detect(&distances));

        let flagged: Vec<OutlierTrip> = trips
            .iter()
            .zip(duration_flags.iter().zip(&distance_flags))
            .filter(|(_, (d, k))| **d || **k)
            .map(|(trip, (d, k))| OutlierTrip {
                trip_id: trip.id.clone(),
                duration_minutes: round2(trip.duration_minutes()),
                distance_km: round2(trip.distance_km),
                duration_outlier: *d,
                distance_outlier: *k,
            })
            .collect();

        OutlierReport {
            method,
            total_outliers: flagged.len(),
            duration_outliers: duration_flags.iter().filter(|f| **f).count(),
            distance_outliers: distance_flags.iter().filter(|f| **f).count(),
            trips: flagged
                .into_iter()
                .take(self.config.outlier_listing_limit)
                .collect(),
        }
    }

    /// Descriptive statistics for trip duration and distance.
    pub fn trip_statistics(&self) -> TripStatistics {
        let distances: Vec<f64> = self.data.trips.iter().map(|t| t.distance_km).collect();
        TripStatistics {
            duration_minutes: descriptive_stats(&self.durations()).ok(),
            distance_km: descriptive_stats(&distances).ok(),
        }
    }

    /// What completed trips would have paid under each configured strategy.
    pub fn revenue_by_strategy(&self) -> Vec<StrategyRevenue> {
        let inputs: Vec<FareInput> = self
            .data
            .trips
            .iter()
            .filter(|t| t.is_completed())
            .map(|t| self.fare_input(t))
            .collect();

        self.config
            .pricing_strategies
            .iter()
            .map(|&strategy| {
                let fares: Vec<f64> = inputs.iter().map(|input| fare(strategy, input)).collect();
                StrategyRevenue {
                    strategy,
                    charged_trips: fares.len(),
                    total_revenue: round2(fares.iter().sum()),
                    average_fare: mean(&fares).map(round2),
                }
            })
            .collect()
    }

    fn fare_input(&self, trip: &Trip) -> FareInput {
        FareInput {
            duration_minutes: trip.duration_minutes(),
            distance_km: trip.distance_km,
            bike_type: self
                .data
                .resolver()
                .bike(&trip.bike_id)
                .map_or(BikeType::Classic, |b| b.bike_type()),
            start_hour: trip.start_time.hour(),
        }
    }

    fn durations(&self) -> Vec<f64> {
        self.data.trips.iter().map(Trip::duration_minutes).collect()
    }

    fn trips_with_user_type(&self) -> impl Iterator<Item = (&'a Trip, UserType)> {
        let resolver = self.data.resolver();
        self.data
            .trips
            .iter()
            .filter_map(move |t| resolver.user(&t.user_id).map(|u| (t, u.user_type)))
    }
}

fn count_by<K: Ord>(keys: impl Iterator<Item = K>) -> BTreeMap<K, usize> {
    let mut counts = BTreeMap::new();
    for key in keys {
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

fn flags(len: usize, indices: Vec<usize>) -> Vec<bool> {
    let mut flags = vec![false; len];
    for i in indices {
        if let Some(flag) = flags.get_mut(i) {
            *flag = true;
        }
    }
    flags
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Bike, BikeKind, MaintenanceRecord, Station, User};
    use crate::resolve::EntityIndex;
    use chrono::NaiveDateTime;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn trip(id: &str, user: &str, route: (&str, &str), start: &str, minutes: i64, km: f64) -> Trip {
        let start_time = ts(start);
        Trip {
            id: id.to_string(),
            user_id: user.to_string(),
            bike_id: "B1".to_string(),
            start_station_id: route.0.to_string(),
            end_station_id: route.1.to_string(),
            start_time,
            end_time: start_time + chrono::Duration::minutes(minutes),
            distance_km: km,
            status: TripStatus::Completed,
        }
    }

    fn dataset(trips: Vec<Trip>) -> CleanDataset {
        CleanDataset {
            stations: EntityIndex::from_items([
                Station::new("S1", "Central", 50.0, 10.0, 5),
                Station::new("S2", "Harbor", 50.01, 10.0, 5),
            ]),
            bikes: EntityIndex::from_items([
                Bike::new("B1", BikeKind::Classic),
                Bike::new("B2", BikeKind::Electric { battery_level: Some(90.0) }),
            ]),
            users: EntityIndex::from_items([
                User::new("U1", UserType::Member),
                User::new("U2", UserType::Casual),
            ]),
            trips: EntityIndex::from_items(trips),
            maintenance: EntityIndex::new(),
        }
    }

    #[test]
    fn test_single_trip_scenario() {
        let data = dataset(vec![trip("T1", "U1", ("S1", "S1"), "2024-01-01 08:00:00", 10, 1.0)]);
        let engine = AnalyticsEngine::new(&data);

        let completion = engine.completion_rate();
        assert_eq!(completion.total_trips, 1);
        assert_eq!(completion.completion_rate_percentage, Ratio::Defined(100.0));

        let summary = engine.trip_summary();
        assert_eq!(summary.total_trips, 1);
        assert_eq!(summary.average_duration_minutes, Some(10.0));
    }

    #[test]
    fn test_empty_tables_do_not_crash() {
        let data = CleanDataset::default();
        let report = AnalyticsEngine::new(&data).report();

        assert_eq!(report.trip_summary.total_trips, 0);
        assert_eq!(report.trip_summary.average_duration_minutes, None);
        assert_eq!(report.completion_rate.completion_rate_percentage, Ratio::Undefined);
        assert_eq!(report.bike_utilization.utilization_percentage, Ratio::Undefined);
        assert_eq!(report.avg_trips_per_user.overall_average, Ratio::Undefined);
        assert_eq!(report.peak_hours.hourly.len(), 24);
        assert_eq!(report.peak_hours.peak_hour, None);
        assert_eq!(report.peak_day.by_weekday.len(), 7);
        assert_eq!(report.peak_day.peak_date, None);
        assert!(report.trip_statistics.duration_minutes.is_none());
        assert_eq!(report.outlier_trips.total_outliers, 0);
    }

    #[test]
    fn test_peak_hours_dense() {
        let data = dataset(vec![
            trip("T1", "U1", ("S1", "S2"), "2024-01-01 08:00:00", 10, 1.0),
            trip("T2", "U1", ("S1", "S2"), "2024-01-01 08:30:00", 10, 1.0),
            trip("T3", "U2", ("S2", "S1"), "2024-01-01 17:00:00", 10, 1.0),
        ]);
        let peaks = AnalyticsEngine::new(&data).peak_hours();
        assert_eq!(peaks.hourly.len(), 24);
        assert_eq!(peaks.hourly[8].trips, 2);
        assert_eq!(peaks.hourly[3].trips, 0);
        assert_eq!(peaks.peak_hour, Some(8));
    }

    #[test]
    fn test_peak_day_tie_goes_to_earliest_date() {
        let data = dataset(vec![
            trip("T1", "U1", ("S1", "S2"), "2024-01-03 08:00:00", 10, 1.0),
            trip("T2", "U1", ("S1", "S2"), "2024-01-01 09:00:00", 10, 1.0),
        ]);
        let peak = AnalyticsEngine::new(&data).peak_day();
        assert_eq!(peak.peak_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(peak.peak_weekday.as_deref(), Some("Monday"));
        assert_eq!(peak.by_weekday[0].trips, 1);
        assert_eq!(peak.by_weekday[2].weekday, "Wednesday");
    }

    #[test]
    fn test_popular_stations_ties_by_id() {
        let data = dataset(vec![
            trip("T1", "U1", ("S2", "S1"), "2024-01-01 08:00:00", 10, 1.0),
            trip("T2", "U1", ("S1", "S2"), "2024-01-01 09:00:00", 10, 1.0),
        ]);
        let popular = AnalyticsEngine::new(&data).popular_stations(1);
        assert_eq!(popular.top_start_stations.len(), 1);
        assert_eq!(popular.top_start_stations[0].station_id, "S1");
        assert_eq!(popular.top_start_stations[0].station_name, "Central");
    }

    #[test]
    fn test_top_routes_with_distance() {
        let data = dataset(vec![
            trip("T1", "U1", ("S1", "S2"), "2024-01-01 08:00:00", 10, 1.0),
            trip("T2", "U2", ("S1", "S2"), "2024-01-02 08:00:00", 10, 1.0),
            trip("T3", "U2", ("S2", "S1"), "2024-01-02 09:00:00", 10, 1.0),
        ]);
        let routes = AnalyticsEngine::new(&data).top_routes(10);
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].trips, 2);
        assert_eq!(routes[0].start_station_name, "Central");
        assert_eq!(routes[0].end_station_name, "Harbor");
        assert_eq!(routes[0].distance_km, Some(1.11));
    }

    #[test]
    fn test_user_type_queries() {
        let data = dataset(vec![
            trip("T1", "U1", ("S1", "S2"), "2024-01-01 08:00:00", 10, 2.0),
            trip("T2", "U1", ("S1", "S2"), "2024-01-02 08:00:00", 10, 4.0),
            trip("T3", "U2", ("S2", "S1"), "2024-01-02 09:00:00", 10, 1.0),
        ]);
        let engine = AnalyticsEngine::new(&data);

        let distance = engine.avg_distance_by_user_type();
        assert_eq!(distance.len(), 2);
        assert_eq!(distance[0].user_type, UserType::Casual);
        assert_eq!(distance[1].average_distance_km, 3.0);

        let per_user = engine.avg_trips_per_user();
        assert_eq!(per_user.overall_average, Ratio::Defined(1.5));
        assert_eq!(per_user.by_user_type[1].average, Ratio::Defined(2.0));

        let top = engine.top_users(1);
        assert_eq!(top[0].user_id, "U1");
        assert_eq!(top[0].user_type, Some(UserType::Member));
    }

    #[test]
    fn test_monthly_trend_and_utilization() {
        let data = dataset(vec![
            trip("T1", "U1", ("S1", "S2"), "2024-01-31 23:00:00", 60, 2.0),
            trip("T2", "U1", ("S1", "S2"), "2024-02-01 08:00:00", 60, 4.0),
        ]);
        let engine = AnalyticsEngine::new(&data);

        let trend = engine.monthly_trend();
        let months: Vec<&str> = trend.months.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, vec!["2024-01", "2024-02"]);
        assert_eq!(trend.busiest_month.map(|m| m.month), Some("2024-01".to_string()));

        // Starts 9 hours apart are 0 whole days apart, even across midnight.
        // 120 usage minutes over 2 bikes × 1440 × 1 day.
        let utilization = engine.bike_utilization();
        assert_eq!(utilization.date_range_days, 1);
        assert_eq!(utilization.utilization_percentage, Ratio::Defined(4.17));
    }

    #[test]
    fn test_maintenance_queries() {
        let mut data = dataset(Vec::new());
        let record = |id: &str, bike: &str, cost: f64| MaintenanceRecord {
            id: id.to_string(),
            bike_id: bike.to_string(),
            category: "brakes".to_string(),
            cost,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            description: None,
        };
        data.maintenance = EntityIndex::from_items([
            record("M1", "B1", 10.0),
            record("M2", "B2", 30.0),
            record("M3", "B2", 5.5),
        ]);
        let engine = AnalyticsEngine::new(&data);

        let cost = engine.maintenance_cost_by_bike_type();
        assert_eq!(cost[0].bike_type, BikeType::Electric);
        assert_eq!(cost[0].total_cost, 35.5);
        assert_eq!(cost[0].records, 2);

        let frequency = engine.maintenance_frequency(5);
        assert_eq!(frequency[0].bike_id, "B2");
        assert_eq!(frequency[0].records, 2);
        assert_eq!(frequency[1].bike_type, Some(BikeType::Classic));
    }

    #[test]
    fn test_outlier_trips_on_distance() {
        let trips = [1.0, 1.0, 1.0, 1.0, 50.0]
            .iter()
            .enumerate()
            .map(|(i, km)| {
                let id = format!("T{}", i);
                trip(&id, "U1", ("S1", "S2"), "2024-01-01 08:00:00", 10, *km)
            })
            .collect();
        let data = dataset(trips);
        let engine = AnalyticsEngine::new(&data);

        let iqr = engine.outlier_trips(OutlierMethod::iqr());
        assert_eq!(iqr.total_outliers, 1);
        assert_eq!(iqr.trips[0].trip_id, "T4");
        assert!(iqr.trips[0].distance_outlier);
        assert!(!iqr.trips[0].duration_outlier);

        let zscore = engine.outlier_trips(OutlierMethod::ZScore { threshold: 1.5 });
        assert_eq!(zscore.trips[0].trip_id, "T4");
    }

    #[test]
    fn test_revenue_skips_cancelled() {
        let mut cancelled = trip("T2", "U1", ("S1", "S2"), "2024-01-01 12:00:00", 20, 1.0);
        cancelled.status = TripStatus::Cancelled;
        let data = dataset(vec![
            trip("T1", "U1", ("S1", "S2"), "2024-01-01 12:00:00", 20, 1.0),
            cancelled,
        ]);
        let revenue = AnalyticsEngine::new(&data).revenue_by_strategy();
        let casual = revenue
            .iter()
            .find(|r| r.strategy == PricingStrategy::Casual)
            .unwrap();
        assert_eq!(casual.charged_trips, 1);
        assert_eq!(casual.total_revenue, 6.0);
    }
}
