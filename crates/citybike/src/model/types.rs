//! Tag enums shared by the entity types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The five entity streams the engine understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Station,
    Bike,
    User,
    Trip,
    Maintenance,
}

impl EntityKind {
    /// Cleaning order: masters before the records that reference them.
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Station,
        EntityKind::Bike,
        EntityKind::User,
        EntityKind::Trip,
        EntityKind::Maintenance,
    ];

    /// Get the lowercase label used in logs and the reject log.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Station => "station",
            EntityKind::Bike => "bike",
            EntityKind::User => "user",
            EntityKind::Trip => "trip",
            EntityKind::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bike type tag. Used for grouping and for fare surcharges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BikeType {
    Classic,
    Electric,
}

impl BikeType {
    /// Parse a bike type label, ignoring case and surrounding whitespace.
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "classic" => Some(BikeType::Classic),
            "electric" => Some(BikeType::Electric),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BikeType::Classic => "classic",
            BikeType::Electric => "electric",
        }
    }
}

impl fmt::Display for BikeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// User type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Casual,
    Member,
}

impl UserType {
    /// Parse a user type label, ignoring case and surrounding whitespace.
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "casual" => Some(UserType::Casual),
            "member" => Some(UserType::Member),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UserType::Casual => "casual",
            UserType::Member => "member",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Final state of a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Completed,
    Cancelled,
}

impl TripStatus {
    /// Parse a status label, ignoring case and surrounding whitespace.
    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "completed" => Some(TripStatus::Completed),
            "cancelled" | "canceled" => Some(TripStatus::Cancelled),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_parse_case_insensitively() {
        assert_eq!(BikeType::from_label(" Electric "), Some(BikeType::Electric));
        assert_eq!(UserType::from_label("MEMBER"), Some(UserType::Member));
        assert_eq!(TripStatus::from_label("canceled"), Some(TripStatus::Cancelled));
        assert_eq!(BikeType::from_label("tandem"), None);
    }

    #[test]
    fn test_entity_order_puts_masters_first() {
        let trip_pos = EntityKind::ALL.iter().position(|k| *k == EntityKind::Trip);
        let station_pos = EntityKind::ALL.iter().position(|k| *k == EntityKind::Station);
        assert!(station_pos < trip_pos);
        assert_eq!(EntityKind::Maintenance.to_string(), "maintenance");
    }
}
