//! CSV export of clean tables and the reject log.
//!
//! Each entity table is written to `<plural>_clean.csv` and the reject log
//! to `rejects.csv`. Timestamps use the same layout the loader reads, so an
//! exported directory can be loaded again.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::cleaning::{CleanDataset, RejectEntry, RejectLog};
use crate::error::{CityBikeError, Result};
use crate::model::{Bike, EntityKind, MaintenanceRecord, Station, Trip, User};

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reject log file name.
pub const REJECTS_FILE: &str = "rejects.csv";

/// A value that can be written as one CSV row.
pub trait CsvRow {
    /// Header line, in field order.
    const HEADERS: &'static [&'static str];

    fn fields(&self) -> Vec<String>;
}

impl CsvRow for Station {
    const HEADERS: &'static [&'static str] =
        &["station_id", "station_name", "latitude", "longitude", "capacity"];

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.latitude.to_string(),
            self.longitude.to_string(),
            self.capacity.to_string(),
        ]
    }
}

impl CsvRow for Bike {
    const HEADERS: &'static [&'static str] =
        &["bike_id", "bike_type", "home_station_id", "available", "battery_level"];

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.bike_type().label().to_string(),
            self.home_station_id.clone().unwrap_or_default(),
            self.available.to_string(),
            optional(self.kind.battery_level()),
        ]
    }
}

impl CsvRow for User {
    const HEADERS: &'static [&'static str] = &["user_id", "user_type", "name", "email"];

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.user_type.label().to_string(),
            self.name.clone().unwrap_or_default(),
            self.email.clone().unwrap_or_default(),
        ]
    }
}

impl CsvRow for Trip {
    const HEADERS: &'static [&'static str] = &[
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

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.user_id.clone(),
            self.bike_id.clone(),
            self.start_station_id.clone(),
            self.end_station_id.clone(),
            self.start_time.format(DATETIME_FORMAT).to_string(),
            self.end_time.format(DATETIME_FORMAT).to_string(),
            self.distance_km.to_string(),
            self.status.label().to_string(),
        ]
    }
}

impl CsvRow for MaintenanceRecord {
    const HEADERS: &'static [&'static str] =
        &["record_id", "bike_id", "date", "maintenance_type", "cost", "description"];

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.bike_id.clone(),
            self.date.format(DATE_FORMAT).to_string(),
            self.category.clone(),
            self.cost.to_string(),
            self.description.clone().unwrap_or_default(),
        ]
    }
}

impl CsvRow for RejectEntry {
    const HEADERS: &'static [&'static str] =
        &["entity", "row_number", "code", "category", "detail", "row"];

    /// The raw row is embedded as a JSON object.
    fn fields(&self) -> Vec<String> {
        vec![
            self.entity.label().to_string(),
            self.row_number.to_string(),
            self.reason.code().to_string(),
            self.reason.category().label().to_string(),
            self.reason.detail(),
            serde_json::to_string(&self.row).unwrap_or_default(),
        ]
    }
}

fn optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// File name of an entity's clean table.
pub fn clean_file_name(entity: EntityKind) -> &'static str {
    match entity {
        EntityKind::Station => "stations_clean.csv",
        EntityKind::Bike => "bikes_clean.csv",
        EntityKind::User => "users_clean.csv",
        EntityKind::Trip => "trips_clean.csv",
        EntityKind::Maintenance => "maintenance_clean.csv",
    }
}

/// Write rows to a CSV file with a header line. Returns the row count.
pub fn write_rows<'a, T: CsvRow + 'a>(
    path: impl AsRef<Path>,
    rows: impl IntoIterator<Item = &'a T>,
) -> Result<usize> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    writer.write_record(T::HEADERS)?;

    let mut written = 0;
    for row in rows {
        writer.write_record(row.fields())?;
        written += 1;
    }

    writer.flush().map_err(|e| CityBikeError::Io {
        path: path.as_ref().to_path_buf(),
        source: e,
    })?;
    Ok(written)
}

/// Write every clean table plus the reject log into `dir`.
///
/// The directory is created if needed. Returns the written paths in
/// cleaning order with the reject log last.
pub fn export_dir(
    dir: impl AsRef<Path>,
    dataset: &CleanDataset,
    rejects: &RejectLog,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| CityBikeError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut written = Vec::with_capacity(EntityKind::ALL.len() + 1);
    for entity in EntityKind::ALL {
        let path = dir.join(clean_file_name(entity));
        let rows = match entity {
            EntityKind::Station => write_rows(&path, &dataset.stations)?,
            EntityKind::Bike => write_rows(&path, &dataset.bikes)?,
            EntityKind::User => write_rows(&path, &dataset.users)?,
            EntityKind::Trip => write_rows(&path, &dataset.trips)?,
            EntityKind::Maintenance => write_rows(&path, &dataset.maintenance)?,
        };
        info!(entity = %entity, file = %path.display(), rows, "exported clean table");
        written.push(path);
    }

    let path = dir.join(REJECTS_FILE);
    let rows = write_rows(&path, rejects.entries())?;
    info!(file = %path.display(), rows, "exported reject log");
    written.push(path);

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaning::RejectReason;
    use crate::input::{CsvLoader, RawRecord};
    use crate::model::{BikeKind, UserType};
    use crate::resolve::EntityIndex;
    use tempfile::TempDir;

    #[test]
    fn test_export_writes_all_files() {
        let dir = TempDir::new().unwrap();
        let dataset = CleanDataset {
            stations: EntityIndex::from_items([Station::new("S1", "Central", 50.0, 10.0, 12)]),
            bikes: EntityIndex::from_items([
                Bike::new("B1", BikeKind::Electric { battery_level: Some(80.0) })
                    .with_home_station("S1"),
            ]),
            users: EntityIndex::from_items([User::new("U1", UserType::Member)]),
            ..CleanDataset::default()
        };

        let mut rejects = RejectLog::new();
        let mut row = RawRecord::new();
        row.insert("trip_id".to_string(), "T9".to_string());
        rejects.push(RejectEntry::new(
            EntityKind::Trip,
            3,
            row,
            RejectReason::InvalidTimeOrder,
        ));

        let paths = export_dir(dir.path(), &dataset, &rejects).unwrap();
        assert_eq!(paths.len(), 6);
        assert!(paths[5].ends_with(REJECTS_FILE));

        let stations = fs::read_to_string(dir.path().join("stations_clean.csv")).unwrap();
        assert_eq!(
            stations,
            "station_id,station_name,latitude,longitude,capacity\nS1,Central,50,10,12\n"
        );

        let bikes = fs::read_to_string(dir.path().join("bikes_clean.csv")).unwrap();
        assert!(bikes.contains("B1,electric,S1,true,80"));

        let log = fs::read_to_string(dir.path().join(REJECTS_FILE)).unwrap();
        assert!(log.starts_with("entity,row_number,code"));
        assert!(log.contains("trip,3,invalid-time-order"));
    }

    #[test]
    fn test_exported_trips_reload() {
        let dir = TempDir::new().unwrap();
        let start = chrono::NaiveDateTime::parse_from_str("2024-01-01 08:00:00", DATETIME_FORMAT)
            .unwrap();
        let trip = Trip {
            id: "T1".to_string(),
            user_id: "U1".to_string(),
            bike_id: "B1".to_string(),
            start_station_id: "S1".to_string(),
            end_station_id: "S2".to_string(),
            start_time: start,
            end_time: start + chrono::Duration::minutes(12),
            distance_km: 2.5,
            status: crate::model::TripStatus::Completed,
        };

        let path = dir.path().join("trips.csv");
        assert_eq!(write_rows(&path, [&trip]).unwrap(), 1);

        let (table, _) = CsvLoader::new().load_file(&path, EntityKind::Trip).unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.rows[0][5], "2024-01-01 08:00:00");
        assert_eq!(table.rows[0][8], "completed");
    }
}
