//! Data cleaner: parse, validate, repair, deduplicate and cross-reference
//! every entity stream into clean tables plus a reject log.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CityBikeError, Result};
use crate::input::{RawDataset, RawRecord, RawTable};
use crate::model::{
    Bike, BikeKind, BikeType, Entity, EntityKind, MaintenanceRecord, Station, Trip, User,
};
use crate::parse::{Candidate, EntitySchema, TaggedTrip};
use crate::resolve::{EntityIndex, Resolver};
use crate::validation::{
    BikeValidator, MaintenanceValidator, Repair, StationValidator, TripValidator, UserValidator,
    Validator, Verdict,
};

use super::reject::{RejectEntry, RejectLog, RejectReason};

/// Cleaner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
    /// Fail the run when a stream lacks a required column, instead of
    /// rejecting its rows.
    pub strict_schema: bool,
    /// Fill a missing trip distance with the stream mean.
    pub fill_missing_distance: bool,
    /// Reject trips shorter than this many minutes.
    pub min_trip_minutes: Option<f64>,
    /// Accepted maintenance categories. `None` accepts any.
    pub allowed_maintenance_types: Option<Vec<String>>,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            strict_schema: false,
            fill_missing_distance: true,
            min_trip_minutes: None,
            allowed_maintenance_types: None,
        }
    }
}

impl CleanerConfig {
    pub fn with_strict_schema(mut self, strict: bool) -> Self {
        self.strict_schema = strict;
        self
    }

    pub fn with_min_trip_minutes(mut self, minutes: f64) -> Self {
        self.min_trip_minutes = Some(minutes);
        self
    }

    pub fn with_allowed_maintenance_types(mut self, types: Vec<String>) -> Self {
        self.allowed_maintenance_types = Some(types);
        self
    }
}

/// The clean, deduplicated, reference-resolved tables of one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanDataset {
    pub stations: EntityIndex<Station>,
    pub bikes: EntityIndex<Bike>,
    pub users: EntityIndex<User>,
    pub trips: EntityIndex<Trip>,
    pub maintenance: EntityIndex<MaintenanceRecord>,
}

impl CleanDataset {
    /// Lookups over the master tables.
    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(&self.stations, &self.bikes, &self.users)
    }

    /// Number of clean rows for an entity.
    pub fn row_count(&self, entity: EntityKind) -> usize {
        match entity {
            EntityKind::Station => self.stations.len(),
            EntityKind::Bike => self.bikes.len(),
            EntityKind::User => self.users.len(),
            EntityKind::Trip => self.trips.len(),
            EntityKind::Maintenance => self.maintenance.len(),
        }
    }
}

/// Row accounting for one stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamReport {
    pub entity: EntityKind,
    pub raw_rows: usize,
    pub clean_rows: usize,
    /// Clean rows that needed at least one repair.
    pub repaired_rows: usize,
    pub rejected_rows: usize,
    /// Built from trip hints because no master source was supplied.
    pub derived: bool,
}

/// Everything the cleaner produces.
#[derive(Debug, Clone)]
pub struct CleaningOutcome {
    pub dataset: CleanDataset,
    pub rejects: RejectLog,
    /// One report per entity, in cleaning order.
    pub streams: Vec<StreamReport>,
}

/// A validated row on its way to a clean table.
#[derive(Debug, Clone)]
struct Staged<T> {
    row_number: usize,
    raw: RawRecord,
    entity: T,
}

/// Result of validating and repairing one stream.
struct StreamPass<T> {
    staged: Vec<Staged<T>>,
    rejects: Vec<RejectEntry>,
    repaired: usize,
}

/// Orchestrates cleaning across all entity streams.
pub struct DataCleaner {
    config: CleanerConfig,
}

impl DataCleaner {
    /// Create a new cleaner with default configuration.
    pub fn new() -> Self {
        Self::with_config(CleanerConfig::default())
    }

    /// Create a cleaner with custom configuration.
    pub fn with_config(config: CleanerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// Clean every stream of a raw snapshot.
    ///
    /// Masters are cleaned before the records that reference them. Row-level
    /// problems end up in the reject log; the only error is a schema
    /// failure under `strict_schema`.
    pub fn clean(&self, raw: &RawDataset) -> Result<CleaningOutcome> {
        let mut rejects = RejectLog::new();
        let mut streams = Vec::with_capacity(EntityKind::ALL.len());

        // Stations
        let pass = self.validate_stream(&StationValidator, &raw.stations)?;
        let (staged, dup_rejects) = dedup(pass.staged);
        let stations: EntityIndex<Station> = staged.into_iter().map(|s| s.entity).collect();
        let station_rejects = pass.rejects.len() + dup_rejects.len();
        rejects.extend(pass.rejects);
        rejects.extend(dup_rejects);
        streams.push(report(
            EntityKind::Station,
            raw.stations.row_count(),
            stations.len(),
            pass.repaired,
            station_rejects,
            false,
        ));

        // Bikes, when a master source exists
        let explicit_bikes = match &raw.bikes {
            Some(table) => {
                let pass = self.validate_stream(&BikeValidator, table)?;
                let (staged, dup_rejects) = dedup(pass.staged);
                let (staged, ref_rejects) = retain_resolved(staged, |bike: &Bike| {
                    bike.home_station_id
                        .as_deref()
                        .filter(|id| !stations.contains(id))
                        .map(|id| unresolved("home_station_id", id))
                });
                let count = pass.rejects.len() + dup_rejects.len() + ref_rejects.len();
                rejects.extend(pass.rejects);
                rejects.extend(dup_rejects);
                rejects.extend(ref_rejects);
                Some((
                    staged.into_iter().map(|s| s.entity).collect::<EntityIndex<Bike>>(),
                    table.row_count(),
                    pass.repaired,
                    count,
                ))
            }
            None => None,
        };

        // Users, when a master source exists
        let explicit_users = match &raw.users {
            Some(table) => {
                let pass = self.validate_stream(&UserValidator, table)?;
                let (staged, dup_rejects) = dedup(pass.staged);
                let count = pass.rejects.len() + dup_rejects.len();
                rejects.extend(pass.rejects);
                rejects.extend(dup_rejects);
                Some((
                    staged.into_iter().map(|s| s.entity).collect::<EntityIndex<User>>(),
                    table.row_count(),
                    pass.repaired,
                    count,
                ))
            }
            None => None,
        };

        // Trips
        let validator = TripValidator {
            fill_missing_distance: self.config.fill_missing_distance,
            min_trip_minutes: self.config.min_trip_minutes,
        };
        let pass = self.validate_stream(&validator, &raw.trips)?;
        let (staged, dup_rejects) = dedup(pass.staged);
        let bike_master = explicit_bikes.as_ref().map(|(index, ..)| index);
        let user_master = explicit_users.as_ref().map(|(index, ..)| index);
        let (staged, ref_rejects) = retain_resolved(staged, |tagged: &TaggedTrip| {
            let trip = &tagged.trip;
            if !stations.contains(&trip.start_station_id) {
                return Some(unresolved("start_station_id", &trip.start_station_id));
            }
            if !stations.contains(&trip.end_station_id) {
                return Some(unresolved("end_station_id", &trip.end_station_id));
            }
            if user_master.is_some_and(|users| !users.contains(&trip.user_id)) {
                return Some(unresolved("user_id", &trip.user_id));
            }
            if bike_master.is_some_and(|bikes| !bikes.contains(&trip.bike_id)) {
                return Some(unresolved("bike_id", &trip.bike_id));
            }
            None
        });
        let trip_rejects = pass.rejects.len() + dup_rejects.len() + ref_rejects.len();
        rejects.extend(pass.rejects);
        rejects.extend(dup_rejects);
        rejects.extend(ref_rejects);

        let bikes = match explicit_bikes {
            Some((index, raw_rows, repaired, rejected)) => {
                streams.push(report(
                    EntityKind::Bike,
                    raw_rows,
                    index.len(),
                    repaired,
                    rejected,
                    false,
                ));
                index
            }
            None => {
                let index = derive_bikes(&staged);
                debug!(bikes = index.len(), "derived bike table from trips");
                streams.push(report(EntityKind::Bike, 0, index.len(), 0, 0, true));
                index
            }
        };
        let users = match explicit_users {
            Some((index, raw_rows, repaired, rejected)) => {
                streams.push(report(
                    EntityKind::User,
                    raw_rows,
                    index.len(),
                    repaired,
                    rejected,
                    false,
                ));
                index
            }
            None => {
                let index = derive_users(&staged);
                debug!(users = index.len(), "derived user table from trips");
                streams.push(report(EntityKind::User, 0, index.len(), 0, 0, true));
                index
            }
        };

        let trips: EntityIndex<Trip> = staged.into_iter().map(|s| s.entity.trip).collect();
        streams.push(report(
            EntityKind::Trip,
            raw.trips.row_count(),
            trips.len(),
            pass.repaired,
            trip_rejects,
            false,
        ));

        // Maintenance
        let validator = MaintenanceValidator {
            allowed_types: self.config.allowed_maintenance_types.clone(),
        };
        let pass = self.validate_stream(&validator, &raw.maintenance)?;
        let (staged, dup_rejects) = dedup(pass.staged);
        let (staged, ref_rejects) = retain_resolved(staged, |record: &MaintenanceRecord| {
            (!bikes.contains(&record.bike_id)).then(|| unresolved("bike_id", &record.bike_id))
        });
        let maintenance_rejects = pass.rejects.len() + dup_rejects.len() + ref_rejects.len();
        rejects.extend(pass.rejects);
        rejects.extend(dup_rejects);
        rejects.extend(ref_rejects);
        let maintenance: EntityIndex<MaintenanceRecord> =
            staged.into_iter().map(|s| s.entity).collect();
        streams.push(report(
            EntityKind::Maintenance,
            raw.maintenance.row_count(),
            maintenance.len(),
            pass.repaired,
            maintenance_rejects,
            false,
        ));

        rejects.sort();
        streams.sort_by_key(|s| s.entity);

        for stream in &streams {
            info!(
                entity = %stream.entity,
                raw = stream.raw_rows,
                clean = stream.clean_rows,
                repaired = stream.repaired_rows,
                rejected = stream.rejected_rows,
                derived = stream.derived,
                "cleaned stream"
            );
        }

        Ok(CleaningOutcome {
            dataset: CleanDataset {
                stations,
                bikes,
                users,
                trips,
                maintenance,
            },
            rejects,
            streams,
        })
    }

    /// Parse, validate and repair one stream.
    fn validate_stream<V: Validator>(
        &self,
        validator: &V,
        table: &RawTable,
    ) -> Result<StreamPass<<V::Candidate as Candidate>::Output>> {
        let kind = <V::Candidate as Candidate>::KIND;
        let missing = EntitySchema::for_entity(kind).missing_columns(&table.headers);

        if !missing.is_empty() {
            if self.config.strict_schema {
                return Err(CityBikeError::Schema {
                    entity: kind,
                    missing,
                });
            }
            warn!(
                entity = %kind,
                columns = %missing.join(", "),
                rows = table.row_count(),
                "stream lacks required columns, rejecting every row"
            );
            let rejects = table
                .records()
                .enumerate()
                .map(|(i, row)| {
                    RejectEntry::new(kind, i + 1, row, RejectReason::MissingColumn {
                        columns: missing.clone(),
                    })
                })
                .collect();
            return Ok(StreamPass {
                staged: Vec::new(),
                rejects,
                repaired: 0,
            });
        }

        let judged: Vec<(V::Candidate, Verdict)> = table
            .records()
            .enumerate()
            .map(|(i, row)| {
                let candidate = <V::Candidate as Candidate>::parse(i + 1, row);
                let verdict = validator.validate(&candidate);
                (candidate, verdict)
            })
            .collect();

        let means = stream_means(&judged);

        let mut pass = StreamPass {
            staged: Vec::new(),
            rejects: Vec::new(),
            repaired: 0,
        };

        for (mut candidate, verdict) in judged {
            let outcome = match verdict {
                Verdict::Valid => Ok(false),
                Verdict::Rejected(reason) => Err(reason),
                Verdict::Repairable(repairs) => {
                    apply_repairs(&mut candidate, &repairs, &means).map(|()| true)
                }
            };

            let outcome = outcome.and_then(|repaired| {
                candidate
                    .build()
                    .map(|entity| (entity, repaired))
                    .ok_or_else(|| RejectReason::Unrepairable {
                        column: "row".to_string(),
                    })
            });

            match outcome {
                Ok((entity, repaired)) => {
                    if repaired {
                        pass.repaired += 1;
                    }
                    pass.staged.push(Staged {
                        row_number: candidate.row_number(),
                        raw: candidate.raw().clone(),
                        entity,
                    });
                }
                Err(reason) => pass.rejects.push(RejectEntry::new(
                    kind,
                    candidate.row_number(),
                    candidate.raw().clone(),
                    reason,
                )),
            }
        }

        debug!(
            entity = %kind,
            accepted = pass.staged.len(),
            rejected = pass.rejects.len(),
            repaired = pass.repaired,
            "validated stream"
        );
        Ok(pass)
    }
}

impl Default for DataCleaner {
    fn default() -> Self {
        Self::new()
    }
}

/// Means of every column some row wants filled, over the rows that were not
/// rejected. Computed once, before any fill is applied.
fn stream_means<C: Candidate>(judged: &[(C, Verdict)]) -> BTreeMap<String, Option<f64>> {
    let mut means = BTreeMap::new();

    for (_, verdict) in judged {
        let Verdict::Repairable(repairs) = verdict else {
            continue;
        };
        for repair in repairs {
            if let Repair::FillWithStreamMean { column } = repair {
                if means.contains_key(column) {
                    continue;
                }
                let values: Vec<f64> = judged
                    .iter()
                    .filter(|(_, v)| !v.is_rejected())
                    .filter_map(|(c, _)| c.number(column))
                    .collect();
                let mean = if values.is_empty() {
                    None
                } else {
                    Some(values.iter().sum::<f64>() / values.len() as f64)
                };
                means.insert(column.clone(), mean);
            }
        }
    }

    means
}

fn apply_repairs<C: Candidate>(
    candidate: &mut C,
    repairs: &[Repair],
    means: &BTreeMap<String, Option<f64>>,
) -> std::result::Result<(), RejectReason> {
    for repair in repairs {
        let value = match repair {
            Repair::FillWithStreamMean { column } => means
                .get(column)
                .copied()
                .flatten()
                .map(|mean| mean.to_string()),
            Repair::FillDefault { value, .. } => Some(value.clone()),
        };

        let filled = value.is_some_and(|v| candidate.fill(repair.column(), &v));
        if !filled {
            return Err(RejectReason::Unrepairable {
                column: repair.column().to_string(),
            });
        }
    }
    Ok(())
}

/// Keep the last row for each id at the position of its first occurrence.
/// Displaced rows become `duplicate-id` rejects.
fn dedup<T: Entity>(staged: Vec<Staged<T>>) -> (Vec<Staged<T>>, Vec<RejectEntry>) {
    let mut kept: IndexMap<String, Staged<T>> = IndexMap::with_capacity(staged.len());
    let mut rejects = Vec::new();

    for row in staged {
        let id = row.entity.id().to_string();
        if let Some(displaced) = kept.insert(id.clone(), row) {
            rejects.push(RejectEntry::new(
                T::KIND,
                displaced.row_number,
                displaced.raw,
                RejectReason::DuplicateId { id },
            ));
        }
    }

    if !rejects.is_empty() {
        debug!(entity = %T::KIND, duplicates = rejects.len(), "resolved duplicate ids, last row wins");
    }
    (kept.into_values().collect(), rejects)
}

/// Drop rows whose foreign keys do not resolve.
fn retain_resolved<T: Entity>(
    staged: Vec<Staged<T>>,
    check: impl Fn(&T) -> Option<RejectReason>,
) -> (Vec<Staged<T>>, Vec<RejectEntry>) {
    let mut kept = Vec::with_capacity(staged.len());
    let mut rejects = Vec::new();

    for row in staged {
        match check(&row.entity) {
            Some(reason) => {
                rejects.push(RejectEntry::new(T::KIND, row.row_number, row.raw, reason))
            }
            None => kept.push(row),
        }
    }

    if !rejects.is_empty() {
        debug!(entity = %T::KIND, unresolved = rejects.len(), "dropped rows with dangling references");
    }
    (kept, rejects)
}

fn unresolved(column: &str, id: &str) -> RejectReason {
    RejectReason::UnresolvedReference {
        column: column.to_string(),
        id: id.to_string(),
    }
}

fn derive_users(trips: &[Staged<TaggedTrip>]) -> EntityIndex<User> {
    trips
        .iter()
        .map(|s| User::new(s.entity.trip.user_id.clone(), s.entity.user_type))
        .collect()
}

fn derive_bikes(trips: &[Staged<TaggedTrip>]) -> EntityIndex<Bike> {
    trips
        .iter()
        .map(|s| {
            let kind = match s.entity.bike_type {
                BikeType::Classic => BikeKind::Classic,
                BikeType::Electric => BikeKind::Electric {
                    battery_level: None,
                },
            };
            Bike::new(s.entity.trip.bike_id.clone(), kind)
        })
        .collect()
}

fn report(
    entity: EntityKind,
    raw_rows: usize,
    clean_rows: usize,
    repaired_rows: usize,
    rejected_rows: usize,
    derived: bool,
) -> StreamReport {
    StreamReport {
        entity,
        raw_rows,
        clean_rows,
        repaired_rows,
        rejected_rows,
        derived,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    const STATION_HEADERS: &[&str] = &["station_id", "station_name", "latitude", "longitude", "capacity"];
    const TRIP_HEADERS: &[&str] = &[
        "trip_id",
        "user_id",
        "bike_id",
        "start_station_id",
        "end_station_id",
        "start_time",
        "end_time",
        "distance_km",
        "status",
    ];
    const MAINTENANCE_HEADERS: &[&str] = &["record_id", "bike_id", "date", "maintenance_type", "cost"];

    fn stations() -> RawTable {
        table(
            STATION_HEADERS,
            &[&["S1", "Central", "50", "10", "5"], &["S2", "Harbor", "50.01", "10.01", "8"]],
        )
    }

    fn trip(id: &str, bike: &str, distance: &str) -> Vec<String> {
        [id, "U1", bike, "S1", "S2", "2024-01-01 08:00:00", "2024-01-01 08:10:00", distance, "completed"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn dataset(trips: Vec<Vec<String>>) -> RawDataset {
        RawDataset::new(
            RawTable::new(TRIP_HEADERS.iter().map(|s| s.to_string()).collect(), trips),
            stations(),
            table(MAINTENANCE_HEADERS, &[]),
        )
    }

    #[test]
    fn test_duplicate_station_last_wins() {
        let raw = RawDataset::new(
            table(TRIP_HEADERS, &[]),
            table(
                STATION_HEADERS,
                &[
                    &["S1", "Central", "50", "10", "5"],
                    &["S2", "Harbor", "50", "10", "8"],
                    &["S1", "Central", "50", "10", "12"],
                ],
            ),
            table(MAINTENANCE_HEADERS, &[]),
        );
        let outcome = DataCleaner::new().clean(&raw).unwrap();

        let stations = &outcome.dataset.stations;
        assert_eq!(stations.len(), 2);
        assert_eq!(stations.get("S1").map(|s| s.capacity), Some(12));
        assert_eq!(stations.as_slice()[0].id, "S1");

        let dup: Vec<_> = outcome.rejects.iter().collect();
        assert_eq!(dup.len(), 1);
        assert_eq!(dup[0].row_number, 1);
        assert_eq!(dup[0].reason.code(), "duplicate-id");
    }

    #[test]
    fn test_missing_distance_uses_mean_of_others() {
        let raw = dataset(vec![
            trip("T1", "B1", "1.0"),
            trip("T2", "B1", "2.0"),
            trip("T3", "B1", ""),
            trip("T4", "B1", "3.0"),
            trip("T5", "B1", "6.0"),
        ]);
        let outcome = DataCleaner::new().clean(&raw).unwrap();

        let filled = outcome.dataset.trips.get("T3").unwrap();
        assert!((filled.distance_km - 3.0).abs() < 1e-9);
        assert!(outcome.rejects.is_empty());
    }

    #[test]
    fn test_mean_ignores_rejected_rows() {
        let mut bad = trip("T9", "B1", "100.0");
        bad[6] = "2024-01-01 07:00:00".to_string();
        let raw = dataset(vec![trip("T1", "B1", "2.0"), bad, trip("T2", "B1", "")]);
        let outcome = DataCleaner::new().clean(&raw).unwrap();

        assert_eq!(outcome.dataset.trips.get("T2").map(|t| t.distance_km), Some(2.0));
        assert_eq!(outcome.rejects.entries()[0].reason, RejectReason::InvalidTimeOrder);
    }

    #[test]
    fn test_no_values_to_fill_is_unrepairable() {
        let raw = dataset(vec![trip("T1", "B1", "")]);
        let outcome = DataCleaner::new().clean(&raw).unwrap();
        assert!(outcome.dataset.trips.is_empty());
        assert_eq!(outcome.rejects.entries()[0].reason.code(), "unrepairable");
    }

    #[test]
    fn test_unknown_bike_rejected_against_master() {
        let raw = dataset(vec![trip("T1", "B1", "1.0"), trip("T2", "BK999", "1.0")])
            .with_bikes(table(&["bike_id", "bike_type"], &[&["B1", "classic"]]));
        let outcome = DataCleaner::new().clean(&raw).unwrap();

        assert!(outcome.dataset.trips.get("T2").is_none());
        let unresolved: Vec<_> = outcome
            .rejects
            .iter()
            .filter(|e| e.reason.code() == "unresolved-reference")
            .collect();
        assert_eq!(unresolved.len(), 1);
        assert_eq!(unresolved[0].row.get("bike_id").map(String::as_str), Some("BK999"));
    }

    #[test]
    fn test_derived_masters() {
        let raw = dataset(vec![trip("T1", "B1", "1.0"), trip("T2", "B2", "1.0")]);
        let outcome = DataCleaner::new().clean(&raw).unwrap();

        assert_eq!(outcome.dataset.users.len(), 1);
        assert_eq!(outcome.dataset.bikes.len(), 2);
        let bike_report = outcome
            .streams
            .iter()
            .find(|s| s.entity == EntityKind::Bike)
            .unwrap();
        assert!(bike_report.derived);
        assert_eq!(bike_report.raw_rows, 0);
    }

    #[test]
    fn test_missing_column_rejects_rows() {
        let raw = RawDataset::new(
            table(TRIP_HEADERS, &[]),
            table(&["station_id", "latitude", "longitude"], &[&["S1", "1", "1"], &["S2", "1", "1"]]),
            table(MAINTENANCE_HEADERS, &[]),
        );
        let outcome = DataCleaner::new().clean(&raw).unwrap();
        assert!(outcome.dataset.stations.is_empty());
        assert_eq!(outcome.rejects.len(), 2);
        assert!(outcome.rejects.iter().all(|e| e.reason.code() == "missing-column"));
    }

    #[test]
    fn test_missing_column_strict_is_schema_error() {
        let raw = RawDataset::new(
            table(TRIP_HEADERS, &[]),
            table(&["station_id"], &[&["S1"]]),
            table(MAINTENANCE_HEADERS, &[]),
        );
        let cleaner = DataCleaner::with_config(CleanerConfig::default().with_strict_schema(true));
        let err = cleaner.clean(&raw).unwrap_err();
        assert!(matches!(
            err,
            CityBikeError::Schema {
                entity: EntityKind::Station,
                ..
            }
        ));
    }

    #[test]
    fn test_maintenance_requires_known_bike() {
        let mut raw = dataset(vec![trip("T1", "B1", "1.0")]);
        raw.maintenance = table(
            MAINTENANCE_HEADERS,
            &[&["M1", "B1", "2024-01-02", "brakes", "10"], &["M2", "B7", "2024-01-02", "brakes", "10"]],
        );
        let outcome = DataCleaner::new().clean(&raw).unwrap();
        assert_eq!(outcome.dataset.maintenance.len(), 1);
        assert_eq!(outcome.rejects.entries()[0].entity, EntityKind::Maintenance);
    }
}
