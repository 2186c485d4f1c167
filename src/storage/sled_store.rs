use std::path::Path;

use hashbrown::HashMap;
use sled::{Db, Tree};
use tracing::info;

use super::{Result, Storage, StorageError};
use crate::models::{Entity, Kind};

const PLACE_AMENITY_TREE: &str = "place_amenity";

/// Persistent store backed by sled.
///
/// Each kind gets its own tree keyed by record id with JSON values. Join
/// rows live in a separate tree keyed `"{place_id}/{amenity_id}"`.
pub struct SledStorage {
    db: Db,
    trees: HashMap<Kind, Tree>,
    place_amenity: Tree,
}

impl SledStorage {
    /// Open (or create) a database directory
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("Opening sled database at {}", path.as_ref().display());
        Self::from_db(sled::open(path)?)
    }

    /// In-memory database removed on drop
    #[cfg(test)]
    pub(crate) fn temporary() -> Result<Self> {
        Self::from_db(sled::Config::new().temporary(true).open()?)
    }

    fn from_db(db: Db) -> Result<Self> {
        let mut trees = HashMap::new();
        for kind in Kind::all() {
            trees.insert(*kind, db.open_tree(kind.collection())?);
        }
        let place_amenity = db.open_tree(PLACE_AMENITY_TREE)?;

        Ok(Self {
            db,
            trees,
            place_amenity,
        })
    }

    /// Flush pending writes to disk
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    fn tree(&self, kind: Kind) -> &Tree {
        // Every kind is opened in `from_db`
        &self.trees[&kind]
    }

    fn decode(kind: Kind, bytes: &[u8]) -> Result<Entity> {
        Entity::from_json(kind, bytes).map_err(|source| StorageError::Codec { kind, source })
    }
}

fn join_key(place_id: &str, amenity_id: &str) -> String {
    format!("{}/{}", place_id, amenity_id)
}

impl Storage for SledStorage {
    fn get(&self, kind: Kind, id: &str) -> Result<Option<Entity>> {
        match self.tree(kind).get(id)? {
            Some(bytes) => Ok(Some(Self::decode(kind, &bytes)?)),
            None => Ok(None),
        }
    }

    fn all(&self, kind: Kind) -> Result<Vec<Entity>> {
        let mut entities = Vec::new();
        for item in self.tree(kind).iter() {
            let (_, bytes) = item?;
            entities.push(Self::decode(kind, &bytes)?);
        }
        Ok(entities)
    }

    fn put(&self, entity: Entity) -> Result<()> {
        let kind = entity.kind();
        let bytes = entity
            .to_json()
            .map_err(|source| StorageError::Codec { kind, source })?;
        self.tree(kind).insert(entity.id(), bytes)?;
        Ok(())
    }

    fn delete(&self, kind: Kind, id: &str) -> Result<bool> {
        Ok(self.tree(kind).remove(id)?.is_some())
    }

    fn count(&self, kind: Kind) -> Result<usize> {
        Ok(self.tree(kind).len())
    }

    fn link(&self, place_id: &str, amenity_id: &str) -> Result<bool> {
        let previous = self
            .place_amenity
            .insert(join_key(place_id, amenity_id), &[] as &[u8])?;
        Ok(previous.is_none())
    }

    fn unlink(&self, place_id: &str, amenity_id: &str) -> Result<bool> {
        Ok(self
            .place_amenity
            .remove(join_key(place_id, amenity_id))?
            .is_some())
    }

    fn linked(&self, place_id: &str) -> Result<Vec<String>> {
        let prefix = format!("{}/", place_id);
        let mut amenity_ids = Vec::new();
        for item in self.place_amenity.scan_prefix(prefix.as_bytes()) {
            let (key, _) = item?;
            let key = String::from_utf8_lossy(&key);
            if let Some(amenity_id) = key.strip_prefix(&prefix) {
                amenity_ids.push(amenity_id.to_string());
            }
        }
        Ok(amenity_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Model, Place, User};

    #[test]
    fn test_records_survive_reopen() {
        let dir = tempfile::Builder::new()
            .prefix("hbnb-sled-")
            .tempdir()
            .unwrap();

        let user = User::new("host@example.com", "pw");
        let mut place = Place::new("city-1", user.id(), "Cabin");
        place.amenity_ids.push("wifi".to_string());

        {
            let storage = SledStorage::open(dir.path()).unwrap();
            storage.put(user.clone().into_entity()).unwrap();
            storage.put(place.clone().into_entity()).unwrap();
            storage.link(place.id(), "pool").unwrap();
            storage.flush().unwrap();
        }

        let storage = SledStorage::open(dir.path()).unwrap();
        assert_eq!(storage.count(Kind::User).unwrap(), 1);
        assert_eq!(
            storage.get(Kind::Place, place.id()).unwrap(),
            Some(place.clone().into_entity())
        );
        assert_eq!(storage.linked(place.id()).unwrap(), vec!["pool".to_string()]);
    }

    #[test]
    fn test_join_rows_are_scoped_by_place() {
        let storage = SledStorage::temporary().unwrap();

        assert!(storage.link("p1", "wifi").unwrap());
        assert!(!storage.link("p1", "wifi").unwrap());
        assert!(storage.link("p10", "pool").unwrap());

        assert_eq!(storage.linked("p1").unwrap(), vec!["wifi".to_string()]);
        assert!(storage.unlink("p1", "wifi").unwrap());
        assert!(storage.linked("p1").unwrap().is_empty());
        assert_eq!(storage.linked("p10").unwrap(), vec!["pool".to_string()]);
    }

    #[test]
    fn test_delete_reports_presence() {
        let storage = SledStorage::temporary().unwrap();
        let user = User::new("a@b.c", "pw");

        storage.put(user.clone().into_entity()).unwrap();
        assert!(storage.delete(Kind::User, user.id()).unwrap());
        assert!(!storage.delete(Kind::User, user.id()).unwrap());
        assert!(storage.all(Kind::User).unwrap().is_empty());
    }
}
