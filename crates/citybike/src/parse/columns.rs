//! Fixed column contracts for each entity stream.

use crate::input::RawRecord;
use crate::model::EntityKind;

/// One expected input column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    /// Canonical header name.
    pub name: &'static str,
    /// Accepted alternative header names.
    pub aliases: &'static [&'static str],
    /// Whether the stream is unusable without this column.
    pub required: bool,
}

impl ColumnDef {
    pub const fn required(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self {
            name,
            aliases,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self {
            name,
            aliases,
            required: false,
        }
    }

    /// Check whether a header names this column (case-insensitive).
    pub fn matches(&self, header: &str) -> bool {
        let header = header.trim();
        header.eq_ignore_ascii_case(self.name)
            || self.aliases.iter().any(|a| header.eq_ignore_ascii_case(a))
    }

    /// Find this column's value in a raw record. The canonical name wins
    /// over an alias when both are present.
    pub fn lookup<'a>(&self, record: &'a RawRecord) -> Option<&'a str> {
        record
            .iter()
            .find(|(header, _)| header.trim().eq_ignore_ascii_case(self.name))
            .or_else(|| record.iter().find(|(header, _)| self.matches(header)))
            .map(|(_, value)| value.as_str())
    }
}

pub mod station {
    use super::ColumnDef;

    pub const ID: ColumnDef = ColumnDef::required("station_id", &["id"]);
    pub const NAME: ColumnDef = ColumnDef::optional("station_name", &["name"]);
    pub const CAPACITY: ColumnDef = ColumnDef::required("capacity", &[]);
    pub const LATITUDE: ColumnDef = ColumnDef::required("latitude", &["lat"]);
    pub const LONGITUDE: ColumnDef = ColumnDef::required("longitude", &["lon", "lng"]);
}

pub mod bike {
    use super::ColumnDef;

    pub const ID: ColumnDef = ColumnDef::required("bike_id", &["id"]);
    pub const TYPE: ColumnDef = ColumnDef::required("bike_type", &["type"]);
    pub const HOME_STATION: ColumnDef = ColumnDef::optional("home_station_id", &["station_id"]);
    pub const AVAILABLE: ColumnDef = ColumnDef::optional("available", &["availability"]);
    pub const BATTERY: ColumnDef = ColumnDef::optional("battery_level", &["battery"]);
}

pub mod user {
    use super::ColumnDef;

    pub const ID: ColumnDef = ColumnDef::required("user_id", &["id"]);
    pub const TYPE: ColumnDef = ColumnDef::required("user_type", &["type"]);
    pub const NAME: ColumnDef = ColumnDef::optional("name", &["user_name"]);
    pub const EMAIL: ColumnDef = ColumnDef::optional("email", &[]);
}

pub mod trip {
    use super::ColumnDef;

    pub const ID: ColumnDef = ColumnDef::required("trip_id", &["id"]);
    pub const USER_ID: ColumnDef = ColumnDef::required("user_id", &[]);
    pub const BIKE_ID: ColumnDef = ColumnDef::required("bike_id", &[]);
    pub const START_STATION: ColumnDef = ColumnDef::required("start_station_id", &[]);
    pub const END_STATION: ColumnDef = ColumnDef::required("end_station_id", &[]);
    pub const START_TIME: ColumnDef = ColumnDef::required("start_time", &[]);
    pub const END_TIME: ColumnDef = ColumnDef::required("end_time", &[]);
    pub const DISTANCE: ColumnDef = ColumnDef::required("distance_km", &["distance"]);
    pub const STATUS: ColumnDef = ColumnDef::required("status", &[]);
    pub const USER_TYPE: ColumnDef = ColumnDef::optional("user_type", &[]);
    pub const BIKE_TYPE: ColumnDef = ColumnDef::optional("bike_type", &[]);
}

pub mod maintenance {
    use super::ColumnDef;

    pub const ID: ColumnDef = ColumnDef::required("record_id", &["id"]);
    pub const BIKE_ID: ColumnDef = ColumnDef::required("bike_id", &[]);
    pub const DATE: ColumnDef = ColumnDef::required("date", &[]);
    pub const CATEGORY: ColumnDef = ColumnDef::required("maintenance_type", &["type"]);
    pub const COST: ColumnDef = ColumnDef::required("cost", &[]);
    pub const DESCRIPTION: ColumnDef = ColumnDef::optional("description", &[]);
}

/// The column contract of one entity stream.
#[derive(Debug, Clone, Copy)]
pub struct EntitySchema {
    pub entity: EntityKind,
    pub columns: &'static [ColumnDef],
}

static STATION_SCHEMA: EntitySchema = EntitySchema {
    entity: EntityKind::Station,
    columns: &[
        station::ID,
        station::NAME,
        station::CAPACITY,
        station::LATITUDE,
        station::LONGITUDE,
    ],
};

static BIKE_SCHEMA: EntitySchema = EntitySchema {
    entity: EntityKind::Bike,
    columns: &[
        bike::ID,
        bike::TYPE,
        bike::HOME_STATION,
        bike::AVAILABLE,
        bike::BATTERY,
    ],
};

static USER_SCHEMA: EntitySchema = EntitySchema {
    entity: EntityKind::User,
    columns: &[user::ID, user::TYPE, user::NAME, user::EMAIL],
};

static TRIP_SCHEMA: EntitySchema = EntitySchema {
    entity: EntityKind::Trip,
    columns: &[
        trip::ID,
        trip::USER_ID,
        trip::BIKE_ID,
        trip::START_STATION,
        trip::END_STATION,
        trip::START_TIME,
        trip::END_TIME,
        trip::DISTANCE,
        trip::STATUS,
        trip::USER_TYPE,
        trip::BIKE_TYPE,
    ],
};

static MAINTENANCE_SCHEMA: EntitySchema = EntitySchema {
    entity: EntityKind::Maintenance,
    columns: &[
        maintenance::ID,
        maintenance::BIKE_ID,
        maintenance::DATE,
        maintenance::CATEGORY,
        maintenance::COST,
        maintenance::DESCRIPTION,
    ],
};

impl EntitySchema {
    /// Get the contract for an entity stream.
    pub fn for_entity(entity: EntityKind) -> &'static EntitySchema {
        match entity {
            EntityKind::Station => &STATION_SCHEMA,
            EntityKind::Bike => &BIKE_SCHEMA,
            EntityKind::User => &USER_SCHEMA,
            EntityKind::Trip => &TRIP_SCHEMA,
            EntityKind::Maintenance => &MAINTENANCE_SCHEMA,
        }
    }

    /// Required columns that no header provides, by canonical name.
    pub fn missing_columns(&self, headers: &[String]) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.required && !headers.iter().any(|h| c.matches(h)))
            .map(|c| c.name.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_aliases_satisfy_required_columns() {
        let schema = EntitySchema::for_entity(EntityKind::Station);
        let missing = schema.missing_columns(&headers(&["id", "LAT", "lon", "capacity"]));
        assert!(missing.is_empty());
    }

    #[test]
    fn test_missing_columns_reported_in_contract_order() {
        let schema = EntitySchema::for_entity(EntityKind::Trip);
        let missing = schema.missing_columns(&headers(&[
            "trip_id",
            "user_id",
            "bike_id",
            "start_station_id",
            "end_station_id",
            "distance_km",
            "status",
        ]));
        assert_eq!(missing, vec!["start_time", "end_time"]);
    }

    #[test]
    fn test_lookup_uses_aliases() {
        let mut record = RawRecord::new();
        record.insert("Type".to_string(), "electric".to_string());
        assert_eq!(bike::TYPE.lookup(&record), Some("electric"));
        assert_eq!(bike::BATTERY.lookup(&record), None);
    }
}
