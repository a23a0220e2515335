//! Clean entity types.
//!
//! Every entity here has already passed validation. Fields are public and
//! the structs are never mutated after the cleaner builds them.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::types::{BikeType, EntityKind, TripStatus, UserType};

/// Common identity for everything stored in an entity table.
pub trait Entity {
    /// Which stream this entity belongs to.
    const KIND: EntityKind;

    /// The declared id. Unique within a clean table.
    fn id(&self) -> &str;
}

/// A docking station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub capacity: u32,
}

impl Station {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        capacity: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            latitude,
            longitude,
            capacity,
        }
    }
}

impl Entity for Station {
    const KIND: EntityKind = EntityKind::Station;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Variant data carried by each bike type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BikeKind {
    Classic,
    Electric {
        /// Charge level in percent, when the source reports one.
        battery_level: Option<f64>,
    },
}

impl BikeKind {
    /// The plain type tag for this variant.
    pub fn bike_type(&self) -> BikeType {
        match self {
            BikeKind::Classic => BikeType::Classic,
            BikeKind::Electric { .. } => BikeType::Electric,
        }
    }

    /// Battery level for electric bikes, `None` otherwise.
    pub fn battery_level(&self) -> Option<f64> {
        match self {
            BikeKind::Classic => None,
            BikeKind::Electric { battery_level } => *battery_level,
        }
    }
}

/// A bike in the fleet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bike {
    pub id: String,
    pub kind: BikeKind,
    pub home_station_id: Option<String>,
    pub available: bool,
}

impl Bike {
    pub fn new(id: impl Into<String>, kind: BikeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            home_station_id: None,
            available: true,
        }
    }

    /// Set the home station.
    pub fn with_home_station(mut self, station_id: impl Into<String>) -> Self {
        self.home_station_id = Some(station_id.into());
        self
    }

    /// Set the availability flag.
    pub fn with_availability(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    pub fn bike_type(&self) -> BikeType {
        self.kind.bike_type()
    }
}

impl Entity for Bike {
    const KIND: EntityKind = EntityKind::Bike;

    fn id(&self) -> &str {
        &self.id
    }
}

/// A rider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub user_type: UserType,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>, user_type: UserType) -> Self {
        Self {
            id: id.into(),
            user_type,
            name: None,
            email: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> &str {
        &self.id
    }
}

/// A single rental, from undocking to docking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: String,
    pub user_id: String,
    pub bike_id: String,
    pub start_station_id: String,
    pub end_station_id: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub distance_km: f64,
    pub status: TripStatus,
}

impl Trip {
    /// Elapsed minutes between start and end. Always positive for clean trips.
    pub fn duration_minutes(&self) -> f64 {
        (self.end_time - self.start_time).num_seconds() as f64 / 60.0
    }

    /// The (start, end) station pair.
    pub fn route(&self) -> (&str, &str) {
        (&self.start_station_id, &self.end_station_id)
    }

    pub fn is_completed(&self) -> bool {
        self.status == TripStatus::Completed
    }
}

impl Entity for Trip {
    const KIND: EntityKind = EntityKind::Trip;

    fn id(&self) -> &str {
        &self.id
    }
}

/// One maintenance intervention on a bike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub id: String,
    pub bike_id: String,
    /// Free-text category, trimmed and lowercased.
    pub category: String,
    pub cost: f64,
    pub date: NaiveDate,
    pub description: Option<String>,
}

impl Entity for MaintenanceRecord {
    const KIND: EntityKind = EntityKind::Maintenance;

    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_trip_duration_is_derived() {
        let trip = Trip {
            id: "T1".to_string(),
            user_id: "U1".to_string(),
            bike_id: "B1".to_string(),
            start_station_id: "S1".to_string(),
            end_station_id: "S2".to_string(),
            start_time: ts("2024-01-01 08:00:00"),
            end_time: ts("2024-01-01 08:10:30"),
            distance_km: 1.2,
            status: TripStatus::Completed,
        };
        assert!((trip.duration_minutes() - 10.5).abs() < 1e-9);
        assert_eq!(trip.route(), ("S1", "S2"));
        assert!(trip.is_completed());
    }

    #[test]
    fn test_bike_kind_tags() {
        let bike = Bike::new("B1", BikeKind::Electric { battery_level: Some(80.0) })
            .with_home_station("S1");
        assert_eq!(bike.bike_type(), BikeType::Electric);
        assert_eq!(bike.kind.battery_level(), Some(80.0));
        assert_eq!(bike.home_station_id.as_deref(), Some("S1"));
        assert!(bike.available);
        assert_eq!(BikeKind::Classic.battery_level(), None);
    }
}
