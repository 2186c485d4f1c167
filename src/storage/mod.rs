//! Entity stores.
//!
//! A [`Storage`] is the raw record store the rest of the crate is built on:
//! get/list/put/delete by kind and id, plus the place↔amenity join table.
//! Typed access and relationship rules live in [`crate::repository`].

mod memory;
mod sled_store;

use thiserror::Error;

pub use memory::MemoryStorage;
pub use sled_store::SledStorage;

use crate::models::{Entity, Kind};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    Backend(#[from] sled::Error),

    #[error("Failed to encode or decode {kind} record: {source}")]
    Codec {
        kind: Kind,
        #[source]
        source: serde_json::Error,
    },

    #[error("Storage lock poisoned")]
    Poisoned,
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Record store shared by all request handlers.
pub trait Storage: Send + Sync {
    fn get(&self, kind: Kind, id: &str) -> Result<Option<Entity>>;

    /// All records of a kind, in no particular order
    fn all(&self, kind: Kind) -> Result<Vec<Entity>>;

    /// Insert or replace by id
    fn put(&self, entity: Entity) -> Result<()>;

    /// Returns whether a record was removed
    fn delete(&self, kind: Kind, id: &str) -> Result<bool>;

    fn count(&self, kind: Kind) -> Result<usize>;

    /// Add a join row; returns false if it already existed
    fn link(&self, place_id: &str, amenity_id: &str) -> Result<bool>;

    /// Remove a join row; returns false if there was none
    fn unlink(&self, place_id: &str, amenity_id: &str) -> Result<bool>;

    /// Amenity ids joined to a place
    fn linked(&self, place_id: &str) -> Result<Vec<String>>;
}
