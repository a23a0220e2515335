//! Domain model: entity structs and their tag enums.

mod entities;
mod types;

pub use entities::{Bike, BikeKind, Entity, MaintenanceRecord, Station, Trip, User};
pub use types::{BikeType, EntityKind, TripStatus, UserType};
