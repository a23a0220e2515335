//! Cross-reference resolver: id-keyed arenas and read-only lookups.

use std::collections::HashMap;

use crate::model::{Bike, Entity, Station, User};

/// An arena of entities in insertion order plus an id → position map.
///
/// Ids are unique: inserting an existing id replaces the stored entity in
/// place, so the replacement keeps the first occurrence's position.
#[derive(Debug, Clone)]
pub struct EntityIndex<T> {
    items: Vec<T>,
    positions: HashMap<String, usize>,
}

impl<T: Entity> EntityIndex<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            positions: HashMap::new(),
        }
    }

    /// Build an index; later items win over earlier ones with the same id.
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
        let mut index = Self::new();
        for item in items {
            index.insert(item);
        }
        index
    }

    /// Insert an entity, returning the one it displaced.
    pub fn insert(&mut self, item: T) -> Option<T> {
        match self.positions.get(item.id()) {
            Some(&pos) => Some(std::mem::replace(&mut self.items[pos], item)),
            None => {
                self.positions.insert(item.id().to_string(), self.items.len());
                self.items.push(item);
                None
            }
        }
    }

    /// Look up an entity by id.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.positions.get(id).map(|&pos| &self.items[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: Entity> Default for EntityIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> FromIterator<T> for EntityIndex<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_items(iter)
    }
}

impl<'a, T> IntoIterator for &'a EntityIndex<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: PartialEq> PartialEq for EntityIndex<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

/// Read-only lookups over the clean master tables.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    stations: &'a EntityIndex<Station>,
    bikes: &'a EntityIndex<Bike>,
    users: &'a EntityIndex<User>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        stations: &'a EntityIndex<Station>,
        bikes: &'a EntityIndex<Bike>,
        users: &'a EntityIndex<User>,
    ) -> Self {
        Self {
            stations,
            bikes,
            users,
        }
    }

    pub fn station(&self, id: &str) -> Option<&'a Station> {
        self.stations.get(id)
    }

    pub fn bike(&self, id: &str) -> Option<&'a Bike> {
        self.bikes.get(id)
    }

    pub fn user(&self, id: &str) -> Option<&'a User> {
        self.users.get(id)
    }

    /// Display name of a station.
    pub fn station_name(&self, id: &str) -> Option<&'a str> {
        self.station(id).map(|s| s.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BikeKind, UserType};

    #[test]
    fn test_insert_replaces_in_place() {
        let mut index = EntityIndex::new();
        index.insert(Station::new("S1", "First", 0.0, 0.0, 5));
        index.insert(Station::new("S2", "Second", 0.0, 0.0, 5));
        let displaced = index.insert(Station::new("S1", "First again", 0.0, 0.0, 9));

        assert_eq!(displaced.map(|s| s.capacity), Some(5));
        assert_eq!(index.len(), 2);
        assert_eq!(index.as_slice()[0].capacity, 9);
        assert_eq!(index.get("S1").map(|s| s.name.as_str()), Some("First again"));
    }

    #[test]
    fn test_resolver_not_found_is_none() {
        let stations: EntityIndex<Station> =
            [Station::new("S1", "Harbor", 1.0, 2.0, 3)].into_iter().collect();
        let bikes: EntityIndex<Bike> = [Bike::new("B1", BikeKind::Classic)].into_iter().collect();
        let users: EntityIndex<User> = [User::new("U1", UserType::Member)].into_iter().collect();
        let resolver = Resolver::new(&stations, &bikes, &users);

        assert_eq!(resolver.station_name("S1"), Some("Harbor"));
        assert!(resolver.station("S404").is_none());
        assert!(resolver.bike("BK999").is_none());
        assert_eq!(resolver.user("U1").map(|u| u.user_type), Some(UserType::Member));
    }
}
