//! Per-entity validators.
//!
//! Each validator runs its checks in column order and stops at the first
//! failing one. Checks are pure; the cleaner applies the verdict.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::cleaning::RejectReason;
use crate::model::BikeType;
use crate::parse::columns::{bike, maintenance, station, trip, user};
use crate::parse::{
    BikeCandidate, Candidate, ColumnDef, Field, MaintenanceCandidate, StationCandidate,
    TripCandidate, UserCandidate,
};

use super::verdict::{Repair, Verdict};

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap());

/// Trait for record validators.
pub trait Validator {
    type Candidate: Candidate;

    /// Classify one candidate record.
    fn validate(&self, candidate: &Self::Candidate) -> Verdict;
}

type Check<T> = std::result::Result<T, RejectReason>;

/// A required field must hold a value.
fn required<'a, T>(field: &'a Field<T>, column: &ColumnDef) -> Check<&'a T> {
    match field {
        Field::Value(v) => Ok(v),
        Field::Missing => Err(RejectReason::MissingValue {
            column: column.name.to_string(),
        }),
        Field::Invalid(raw) => Err(RejectReason::ParseFailure {
            column: column.name.to_string(),
            value: raw.clone(),
        }),
    }
}

/// An optional field may be missing but must parse when present.
fn optional<'a, T>(field: &'a Field<T>, column: &ColumnDef) -> Check<Option<&'a T>> {
    match field {
        Field::Value(v) => Ok(Some(v)),
        Field::Missing => Ok(None),
        Field::Invalid(raw) => Err(RejectReason::ParseFailure {
            column: column.name.to_string(),
            value: raw.clone(),
        }),
    }
}

fn within(value: f64, min: f64, max: f64, column: &ColumnDef) -> Check<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(invalid(column, format!("{} outside [{}, {}]", value, min, max)))
    }
}

fn invalid(column: &ColumnDef, detail: impl Into<String>) -> RejectReason {
    RejectReason::InvalidValue {
        column: column.name.to_string(),
        detail: detail.into(),
    }
}

// ============================================================================
// Station
// ============================================================================

/// Station rules: positive capacity and coordinates on the globe.
#[derive(Debug, Clone, Default)]
pub struct StationValidator;

impl StationValidator {
    fn check(&self, c: &StationCandidate) -> Check<Vec<Repair>> {
        let mut repairs = Vec::new();

        let id = required(&c.id, &station::ID)?;
        if optional(&c.name, &station::NAME)?.is_none() {
            repairs.push(Repair::default_value(station::NAME.name, id.clone()));
        }

        let capacity = *required(&c.capacity, &station::CAPACITY)?;
        if capacity <= 0 || u32::try_from(capacity).is_err() {
            return Err(invalid(
                &station::CAPACITY,
                format!("capacity must be a positive integer, got {}", capacity),
            ));
        }

        within(*required(&c.latitude, &station::LATITUDE)?, -90.0, 90.0, &station::LATITUDE)?;
        within(
            *required(&c.longitude, &station::LONGITUDE)?,
            -180.0,
            180.0,
            &station::LONGITUDE,
        )?;

        Ok(repairs)
    }
}

impl Validator for StationValidator {
    type Candidate = StationCandidate;

    fn validate(&self, candidate: &StationCandidate) -> Verdict {
        self.check(candidate).into()
    }
}

// ============================================================================
// Bike
// ============================================================================

/// Bike rules. The home-station reference is checked later, against the
/// clean station table.
#[derive(Debug, Clone, Default)]
pub struct BikeValidator;

impl BikeValidator {
    fn check(&self, c: &BikeCandidate) -> Check<Vec<Repair>> {
        let mut repairs = Vec::new();

        required(&c.id, &bike::ID)?;
        let bike_type = *required(&c.bike_type, &bike::TYPE)?;
        optional(&c.home_station_id, &bike::HOME_STATION)?;

        if optional(&c.available, &bike::AVAILABLE)?.is_none() {
            repairs.push(Repair::default_value(bike::AVAILABLE.name, "true"));
        }

        if let Some(level) = optional(&c.battery_level, &bike::BATTERY)? {
            if bike_type == BikeType::Classic {
                return Err(invalid(&bike::BATTERY, "classic bikes have no battery"));
            }
            within(*level, 0.0, 100.0, &bike::BATTERY)?;
        }

        Ok(repairs)
    }
}

impl Validator for BikeValidator {
    type Candidate = BikeCandidate;

    fn validate(&self, candidate: &BikeCandidate) -> Verdict {
        self.check(candidate).into()
    }
}

// ============================================================================
// User
// ============================================================================

/// User rules: known type and a well-formed email when one is given.
#[derive(Debug, Clone, Default)]
pub struct UserValidator;

impl UserValidator {
    fn check(&self, c: &UserCandidate) -> Check<Vec<Repair>> {
        required(&c.id, &user::ID)?;
        required(&c.user_type, &user::TYPE)?;
        optional(&c.name, &user::NAME)?;

        if let Some(email) = optional(&c.email, &user::EMAIL)? {
            if !EMAIL_PATTERN.is_match(email) {
                return Err(invalid(&user::EMAIL, format!("malformed address '{}'", email)));
            }
        }

        Ok(Vec::new())
    }
}

impl Validator for UserValidator {
    type Candidate = UserCandidate;

    fn validate(&self, candidate: &UserCandidate) -> Verdict {
        self.check(candidate).into()
    }
}

// ============================================================================
// Trip
// ============================================================================

/// Trip rules.
#[derive(Debug, Clone)]
pub struct TripValidator {
    /// Repair a missing distance with the stream mean instead of rejecting.
    pub fill_missing_distance: bool,
    /// Reject trips shorter than this many minutes.
    pub min_trip_minutes: Option<f64>,
}

impl Default for TripValidator {
    fn default() -> Self {
        Self {
            fill_missing_distance: true,
            min_trip_minutes: None,
        }
    }
}

impl TripValidator {
    fn check(&self, c: &TripCandidate) -> Check<Vec<Repair>> {
        let mut repairs = Vec::new();

        required(&c.id, &trip::ID)?;
        required(&c.user_id, &trip::USER_ID)?;
        required(&c.bike_id, &trip::BIKE_ID)?;
        required(&c.start_station_id, &trip::START_STATION)?;
        required(&c.end_station_id, &trip::END_STATION)?;
        let start = *required(&c.start_time, &trip::START_TIME)?;
        let end = *required(&c.end_time, &trip::END_TIME)?;

        if end <= start {
            return Err(RejectReason::InvalidTimeOrder);
        }
        if let Some(min) = self.min_trip_minutes {
            let minutes = (end - start).num_seconds() as f64 / 60.0;
            if minutes < min {
                return Err(invalid(
                    &trip::END_TIME,
                    format!("trip lasts {:.2} min, below the {} min floor", minutes, min),
                ));
            }
        }

        match &c.distance_km {
            Field::Missing if self.fill_missing_distance => {
                repairs.push(Repair::stream_mean(trip::DISTANCE.name));
            }
            field => {
                let distance = *required(field, &trip::DISTANCE)?;
                if distance < 0.0 {
                    return Err(invalid(&trip::DISTANCE, format!("negative distance {}", distance)));
                }
            }
        }

        required(&c.status, &trip::STATUS)?;

        // Absent hints fall back to casual/classic when the trip is built.
        if let Field::Invalid(raw) = &c.user_type {
            return Err(invalid(&trip::USER_TYPE, format!("unknown user type '{}'", raw)));
        }
        if let Field::Invalid(raw) = &c.bike_type {
            return Err(invalid(&trip::BIKE_TYPE, format!("unknown bike type '{}'", raw)));
        }

        Ok(repairs)
    }
}

impl Validator for TripValidator {
    type Candidate = TripCandidate;

    fn validate(&self, candidate: &TripCandidate) -> Verdict {
        self.check(candidate).into()
    }
}

// ============================================================================
// Maintenance
// ============================================================================

/// Maintenance rules.
#[derive(Debug, Clone, Default)]
pub struct MaintenanceValidator {
    /// Accepted categories, lowercase. `None` accepts any non-empty category.
    pub allowed_types: Option<Vec<String>>,
}

impl MaintenanceValidator {
    fn check(&self, c: &MaintenanceCandidate) -> Check<Vec<Repair>> {
        required(&c.id, &maintenance::ID)?;
        required(&c.bike_id, &maintenance::BIKE_ID)?;
        required(&c.date, &maintenance::DATE)?;

        let category = required(&c.category, &maintenance::CATEGORY)?
            .trim()
            .to_lowercase();
        if let Some(allowed) = &self.allowed_types {
            if !allowed.iter().any(|a| a.trim().eq_ignore_ascii_case(&category)) {
                return Err(invalid(
                    &maintenance::CATEGORY,
                    format!("category '{}' is not an accepted type", category),
                ));
            }
        }

        let cost = *required(&c.cost, &maintenance::COST)?;
        if cost < 0.0 {
            return Err(invalid(&maintenance::COST, format!("negative cost {}", cost)));
        }

        optional(&c.description, &maintenance::DESCRIPTION)?;
        Ok(Vec::new())
    }
}

impl Validator for MaintenanceValidator {
    type Candidate = MaintenanceCandidate;

    fn validate(&self, candidate: &MaintenanceCandidate) -> Verdict {
        self.check(candidate).into()
    }
}
