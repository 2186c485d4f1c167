use std::sync::RwLock;

use hashbrown::{HashMap, HashSet};

use super::{Result, Storage, StorageError};
use crate::models::{Entity, Kind};

#[derive(Default)]
struct Tables {
    records: HashMap<Kind, HashMap<String, Entity>>,
    place_amenity: HashSet<(String, String)>,
}

/// Process-local store; contents are lost on exit.
#[derive(Default)]
pub struct MemoryStorage {
    tables: RwLock<Tables>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, kind: Kind, id: &str) -> Result<Option<Entity>> {
        let tables = self.tables.read().map_err(|_| StorageError::Poisoned)?;
        Ok(tables
            .records
            .get(&kind)
            .and_then(|records| records.get(id))
            .cloned())
    }

    fn all(&self, kind: Kind) -> Result<Vec<Entity>> {
        let tables = self.tables.read().map_err(|_| StorageError::Poisoned)?;
        Ok(tables
            .records
            .get(&kind)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default())
    }

    fn put(&self, entity: Entity) -> Result<()> {
        let mut tables = self.tables.write().map_err(|_| StorageError::Poisoned)?;
        tables
            .records
            .entry(entity.kind())
            .or_default()
            .insert(entity.id().to_string(), entity);
        Ok(())
    }

    fn delete(&self, kind: Kind, id: &str) -> Result<bool> {
        let mut tables = self.tables.write().map_err(|_| StorageError::Poisoned)?;
        Ok(tables
            .records
            .get_mut(&kind)
            .and_then(|records| records.remove(id))
            .is_some())
    }

    fn count(&self, kind: Kind) -> Result<usize> {
        let tables = self.tables.read().map_err(|_| StorageError::Poisoned)?;
        Ok(tables.records.get(&kind).map_or(0, |records| records.len()))
    }

    fn link(&self, place_id: &str, amenity_id: &str) -> Result<bool> {
        let mut tables = self.tables.write().map_err(|_| StorageError::Poisoned)?;
        Ok(tables
            .place_amenity
            .insert((place_id.to_string(), amenity_id.to_string())))
    }

    fn unlink(&self, place_id: &str, amenity_id: &str) -> Result<bool> {
        let mut tables = self.tables.write().map_err(|_| StorageError::Poisoned)?;
        Ok(tables
            .place_amenity
            .remove(&(place_id.to_string(), amenity_id.to_string())))
    }

    fn linked(&self, place_id: &str) -> Result<Vec<String>> {
        let tables = self.tables.read().map_err(|_| StorageError::Poisoned)?;
        Ok(tables
            .place_amenity
            .iter()
            .filter(|(place, _)| place == place_id)
            .map(|(_, amenity)| amenity.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Model, State};

    #[test]
    fn test_put_get_delete() {
        let storage = MemoryStorage::new();
        let state = State::new("Nevada");
        let id = state.id().to_string();

        storage.put(state.clone().into_entity()).unwrap();
        assert_eq!(storage.count(Kind::State).unwrap(), 1);
        assert_eq!(
            storage.get(Kind::State, &id).unwrap(),
            Some(state.into_entity())
        );
        assert!(storage.get(Kind::City, &id).unwrap().is_none());

        assert!(storage.delete(Kind::State, &id).unwrap());
        assert!(!storage.delete(Kind::State, &id).unwrap());
        assert_eq!(storage.count(Kind::State).unwrap(), 0);
    }

    #[test]
    fn test_join_rows() {
        let storage = MemoryStorage::new();

        assert!(storage.link("p1", "wifi").unwrap());
        assert!(!storage.link("p1", "wifi").unwrap());
        assert!(storage.link("p1", "pool").unwrap());
        assert!(storage.link("p2", "wifi").unwrap());

        let mut linked = storage.linked("p1").unwrap();
        linked.sort();
        assert_eq!(linked, vec!["pool".to_string(), "wifi".to_string()]);

        assert!(storage.unlink("p1", "wifi").unwrap());
        assert!(!storage.unlink("p1", "wifi").unwrap());
        assert_eq!(storage.linked("p1").unwrap(), vec!["pool".to_string()]);
    }
}
