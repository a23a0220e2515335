//! Typed candidate records, one per entity stream.
//!
//! A candidate holds every column as a [`Field`] together with its input
//! position and the untouched raw row. Candidates are never rejected here;
//! the validators decide what happens to them.

use chrono::{NaiveDate, NaiveDateTime};

use crate::input::RawRecord;
use crate::model::{
    Bike, BikeKind, BikeType, Entity, EntityKind, MaintenanceRecord, Station, Trip, TripStatus,
    User, UserType,
};

use super::columns::{bike, maintenance, station, trip, user};
use super::fields::{self, Field};

/// A parsed-but-unvalidated row of one entity stream.
pub trait Candidate: Sized {
    /// The clean entity this candidate becomes.
    type Output: Entity;

    const KIND: EntityKind;

    /// Parse a raw row. `row_number` is the 1-based input position.
    fn parse(row_number: usize, raw: RawRecord) -> Self;

    /// The declared id, when it parsed.
    fn id(&self) -> Option<&str>;

    fn row_number(&self) -> usize;

    fn raw(&self) -> &RawRecord;

    /// A parsed numeric column, used for stream means.
    fn number(&self, _column: &str) -> Option<f64> {
        None
    }

    /// Overwrite a column with a repair value. Returns false when the
    /// column is unknown or the value does not parse.
    fn fill(&mut self, column: &str, value: &str) -> bool;

    /// Build the clean entity. `None` when a required field is not a value.
    fn build(&self) -> Option<Self::Output>;
}

/// Replace `slot` with `parsed` when it is a value.
fn set<T>(slot: &mut Field<T>, parsed: Field<T>) -> bool {
    match parsed {
        Field::Value(_) => {
            *slot = parsed;
            true
        }
        _ => false,
    }
}

// ============================================================================
// Station
// ============================================================================

#[derive(Debug, Clone)]
pub struct StationCandidate {
    pub row_number: usize,
    pub raw: RawRecord,
    pub id: Field<String>,
    pub name: Field<String>,
    pub capacity: Field<i64>,
    pub latitude: Field<f64>,
    pub longitude: Field<f64>,
}

impl Candidate for StationCandidate {
    type Output = Station;
    const KIND: EntityKind = EntityKind::Station;

    fn parse(row_number: usize, raw: RawRecord) -> Self {
        Self {
            id: fields::text(station::ID.lookup(&raw)),
            name: fields::text(station::NAME.lookup(&raw)),
            capacity: fields::integer(station::CAPACITY.lookup(&raw)),
            latitude: fields::number(station::LATITUDE.lookup(&raw)),
            longitude: fields::number(station::LONGITUDE.lookup(&raw)),
            row_number,
            raw,
        }
    }

    fn id(&self) -> Option<&str> {
        self.id.value().map(String::as_str)
    }

    fn row_number(&self) -> usize {
        self.row_number
    }

    fn raw(&self) -> &RawRecord {
        &self.raw
    }

    fn fill(&mut self, column: &str, value: &str) -> bool {
        match column {
            c if c == station::NAME.name => set(&mut self.name, fields::text(Some(value))),
            _ => false,
        }
    }

    fn build(&self) -> Option<Station> {
        Some(Station::new(
            self.id.value()?.clone(),
            self.name.value()?.clone(),
            *self.latitude.value()?,
            *self.longitude.value()?,
            u32::try_from(*self.capacity.value()?).ok()?,
        ))
    }
}

// ============================================================================
// Bike
// ============================================================================

#[derive(Debug, Clone)]
pub struct BikeCandidate {
    pub row_number: usize,
    pub raw: RawRecord,
    pub id: Field<String>,
    pub bike_type: Field<BikeType>,
    pub home_station_id: Field<String>,
    pub available: Field<bool>,
    pub battery_level: Field<f64>,
}

impl Candidate for BikeCandidate {
    type Output = Bike;
    const KIND: EntityKind = EntityKind::Bike;

    fn parse(row_number: usize, raw: RawRecord) -> Self {
        Self {
            id: fields::text(bike::ID.lookup(&raw)),
            bike_type: fields::label(bike::TYPE.lookup(&raw), BikeType::from_label),
            home_station_id: fields::text(bike::HOME_STATION.lookup(&raw)),
            available: fields::flag(bike::AVAILABLE.lookup(&raw)),
            battery_level: fields::number(bike::BATTERY.lookup(&raw)),
            row_number,
            raw,
        }
    }

    fn id(&self) -> Option<&str> {
        self.id.value().map(String::as_str)
    }

    fn row_number(&self) -> usize {
        self.row_number
    }

    fn raw(&self) -> &RawRecord {
        &self.raw
    }

    fn fill(&mut self, column: &str, value: &str) -> bool {
        match column {
            c if c == bike::AVAILABLE.name => set(&mut self.available, fields::flag(Some(value))),
            _ => false,
        }
    }

    fn build(&self) -> Option<Bike> {
        let kind = match self.bike_type.value()? {
            BikeType::Classic => BikeKind::Classic,
            BikeType::Electric => BikeKind::Electric {
                battery_level: self.battery_level.value().copied(),
            },
        };

        let mut bike = Bike::new(self.id.value()?.clone(), kind)
            .with_availability(self.available.value().copied().unwrap_or(true));
        if let Some(station_id) = self.home_station_id.value() {
            bike = bike.with_home_station(station_id.clone());
        }
        Some(bike)
    }
}

// ============================================================================
// User
// ============================================================================

#[derive(Debug, Clone)]
pub struct UserCandidate {
    pub row_number: usize,
    pub raw: RawRecord,
    pub id: Field<String>,
    pub user_type: Field<UserType>,
    pub name: Field<String>,
    pub email: Field<String>,
}

impl Candidate for UserCandidate {
    type Output = User;
    const KIND: EntityKind = EntityKind::User;

    fn parse(row_number: usize, raw: RawRecord) -> Self {
        Self {
            id: fields::text(user::ID.lookup(&raw)),
            user_type: fields::label(user::TYPE.lookup(&raw), UserType::from_label),
            name: fields::text(user::NAME.lookup(&raw)),
            email: fields::text(user::EMAIL.lookup(&raw)),
            row_number,
            raw,
        }
    }

    fn id(&self) -> Option<&str> {
        self.id.value().map(String::as_str)
    }

    fn row_number(&self) -> usize {
        self.row_number
    }

    fn raw(&self) -> &RawRecord {
        &self.raw
    }

    fn fill(&mut self, _column: &str, _value: &str) -> bool {
        false
    }

    fn build(&self) -> Option<User> {
        let mut user = User::new(self.id.value()?.clone(), *self.user_type.value()?);
        if let Some(name) = self.name.value() {
            user = user.with_name(name.clone());
        }
        if let Some(email) = self.email.value() {
            user = user.with_email(email.clone());
        }
        Some(user)
    }
}

// ============================================================================
// Trip
// ============================================================================

/// A clean trip plus the master-data hints its row carried.
///
/// The hints feed the derived user and bike tables when no master source
/// is supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedTrip {
    pub trip: Trip,
    pub user_type: UserType,
    pub bike_type: BikeType,
}

impl Entity for TaggedTrip {
    const KIND: EntityKind = EntityKind::Trip;

    fn id(&self) -> &str {
        &self.trip.id
    }
}

#[derive(Debug, Clone)]
pub struct TripCandidate {
    pub row_number: usize,
    pub raw: RawRecord,
    pub id: Field<String>,
    pub user_id: Field<String>,
    pub bike_id: Field<String>,
    pub start_station_id: Field<String>,
    pub end_station_id: Field<String>,
    pub start_time: Field<NaiveDateTime>,
    pub end_time: Field<NaiveDateTime>,
    pub distance_km: Field<f64>,
    pub status: Field<TripStatus>,
    pub user_type: Field<UserType>,
    pub bike_type: Field<BikeType>,
}

impl Candidate for TripCandidate {
    type Output = TaggedTrip;
    const KIND: EntityKind = EntityKind::Trip;

    fn parse(row_number: usize, raw: RawRecord) -> Self {
        Self {
            id: fields::text(trip::ID.lookup(&raw)),
            user_id: fields::text(trip::USER_ID.lookup(&raw)),
            bike_id: fields::text(trip::BIKE_ID.lookup(&raw)),
            start_station_id: fields::text(trip::START_STATION.lookup(&raw)),
            end_station_id: fields::text(trip::END_STATION.lookup(&raw)),
            start_time: fields::datetime(trip::START_TIME.lookup(&raw)),
            end_time: fields::datetime(trip::END_TIME.lookup(&raw)),
            distance_km: fields::number(trip::DISTANCE.lookup(&raw)),
            status: fields::label(trip::STATUS.lookup(&raw), TripStatus::from_label),
            user_type: fields::label(trip::USER_TYPE.lookup(&raw), UserType::from_label),
            bike_type: fields::label(trip::BIKE_TYPE.lookup(&raw), BikeType::from_label),
            row_number,
            raw,
        }
    }

    fn id(&self) -> Option<&str> {
        self.id.value().map(String::as_str)
    }

    fn row_number(&self) -> usize {
        self.row_number
    }

    fn raw(&self) -> &RawRecord {
        &self.raw
    }

    fn number(&self, column: &str) -> Option<f64> {
        if column == trip::DISTANCE.name {
            self.distance_km.value().copied()
        } else {
            None
        }
    }

    fn fill(&mut self, column: &str, value: &str) -> bool {
        match column {
            c if c == trip::DISTANCE.name => set(&mut self.distance_km, fields::number(Some(value))),
            c if c == trip::USER_TYPE.name => set(
                &mut self.user_type,
                fields::label(Some(value), UserType::from_label),
            ),
            c if c == trip::BIKE_TYPE.name => set(
                &mut self.bike_type,
                fields::label(Some(value), BikeType::from_label),
            ),
            _ => false,
        }
    }

    fn build(&self) -> Option<TaggedTrip> {
        let trip = Trip {
            id: self.id.value()?.clone(),
            user_id: self.user_id.value()?.clone(),
            bike_id: self.bike_id.value()?.clone(),
            start_station_id: self.start_station_id.value()?.clone(),
            end_station_id: self.end_station_id.value()?.clone(),
            start_time: *self.start_time.value()?,
            end_time: *self.end_time.value()?,
            distance_km: *self.distance_km.value()?,
            status: *self.status.value()?,
        };
        Some(TaggedTrip {
            trip,
            user_type: self.user_type.value().copied().unwrap_or(UserType::Casual),
            bike_type: self.bike_type.value().copied().unwrap_or(BikeType::Classic),
        })
    }
}

// ============================================================================
// Maintenance
// ============================================================================

#[derive(Debug, Clone)]
pub struct MaintenanceCandidate {
    pub row_number: usize,
    pub raw: RawRecord,
    pub id: Field<String>,
    pub bike_id: Field<String>,
    pub date: Field<NaiveDate>,
    pub category: Field<String>,
    pub cost: Field<f64>,
    pub description: Field<String>,
}

impl Candidate for MaintenanceCandidate {
    type Output = MaintenanceRecord;
    const KIND: EntityKind = EntityKind::Maintenance;

    fn parse(row_number: usize, raw: RawRecord) -> Self {
        Self {
            id: fields::text(maintenance::ID.lookup(&raw)),
            bike_id: fields::text(maintenance::BIKE_ID.lookup(&raw)),
            date: fields::date(maintenance::DATE.lookup(&raw)),
            category: fields::text(maintenance::CATEGORY.lookup(&raw)),
            cost: fields::number(maintenance::COST.lookup(&raw)),
            description: fields::text(maintenance::DESCRIPTION.lookup(&raw)),
            row_number,
            raw,
        }
    }

    fn id(&self) -> Option<&str> {
        self.id.value().map(String::as_str)
    }

    fn row_number(&self) -> usize {
        self.row_number
    }

    fn raw(&self) -> &RawRecord {
        &self.raw
    }

    fn number(&self, column: &str) -> Option<f64> {
        if column == maintenance::COST.name {
            self.cost.value().copied()
        } else {
            None
        }
    }

    fn fill(&mut self, column: &str, value: &str) -> bool {
        match column {
            c if c == maintenance::COST.name => set(&mut self.cost, fields::number(Some(value))),
            _ => false,
        }
    }

    fn build(&self) -> Option<MaintenanceRecord> {
        Some(MaintenanceRecord {
            id: self.id.value()?.clone(),
            bike_id: self.bike_id.value()?.clone(),
            category: self.category.value()?.trim().to_lowercase(),
            cost: *self.cost.value()?,
            date: *self.date.value()?,
            description: self.description.value().cloned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_station_candidate_builds() {
        let candidate = StationCandidate::parse(
            1,
            record(&[
                ("id", "S1"),
                ("name", "Central"),
                ("lat", "50.0"),
                ("lon", "10.0"),
                ("capacity", "5"),
            ]),
        );
        let station = candidate.build().unwrap();
        assert_eq!(station, Station::new("S1", "Central", 50.0, 10.0, 5));
    }

    #[test]
    fn test_station_without_name_needs_fill() {
        let mut candidate = StationCandidate::parse(
            2,
            record(&[("station_id", "S2"), ("latitude", "1"), ("longitude", "2"), ("capacity", "3")]),
        );
        assert!(candidate.build().is_none());
        assert!(candidate.fill("station_name", "S2"));
        assert_eq!(candidate.build().unwrap().name, "S2");
    }

    #[test]
    fn test_trip_candidate_flags_without_failing() {
        let candidate = TripCandidate::parse(
            3,
            record(&[
                ("trip_id", "T1"),
                ("start_time", "not a date"),
                ("distance_km", ""),
                ("status", "Completed"),
            ]),
        );
        assert_eq!(candidate.id(), Some("T1"));
        assert!(candidate.start_time.is_invalid());
        assert!(candidate.distance_km.is_missing());
        assert!(candidate.user_id.is_missing());
        assert_eq!(candidate.status, Field::Value(TripStatus::Completed));
        assert!(candidate.build().is_none());
    }

    #[test]
    fn test_trip_fill_distance_and_hints() {
        let mut candidate = TripCandidate::parse(1, record(&[("distance_km", "")]));
        assert!(candidate.fill("distance_km", "2.5"));
        assert_eq!(candidate.number("distance_km"), Some(2.5));
        assert!(candidate.fill("user_type", "member"));
        assert_eq!(candidate.user_type, Field::Value(UserType::Member));
        assert!(!candidate.fill("status", "completed"));
    }

    #[test]
    fn test_electric_bike_keeps_battery() {
        let candidate = BikeCandidate::parse(
            1,
            record(&[("bike_id", "B1"), ("bike_type", "Electric"), ("battery_level", "64")]),
        );
        let bike = candidate.build().unwrap();
        assert_eq!(bike.kind, BikeKind::Electric { battery_level: Some(64.0) });
        assert!(bike.available);
    }

    #[test]
    fn test_maintenance_category_normalised() {
        let candidate = MaintenanceCandidate::parse(
            1,
            record(&[
                ("record_id", "M1"),
                ("bike_id", "B1"),
                ("date", "2024-02-01"),
                ("maintenance_type", "  Brake Repair "),
                ("cost", "40"),
            ]),
        );
        let record = candidate.build().unwrap();
        assert_eq!(record.category, "brake repair");
        assert_eq!(record.description, None);
    }
}
