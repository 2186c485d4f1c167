//! Kind-erased records and the typed `Model` capability.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::{Amenity, City, Kind, Meta, Place, Review, State, User};

/// A record of any kind, as handed to and returned from the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    State(State),
    City(City),
    Amenity(Amenity),
    User(User),
    Place(Place),
    Review(Review),
}

impl Entity {
    pub fn kind(&self) -> Kind {
        match self {
            Entity::State(_) => Kind::State,
            Entity::City(_) => Kind::City,
            Entity::Amenity(_) => Kind::Amenity,
            Entity::User(_) => Kind::User,
            Entity::Place(_) => Kind::Place,
            Entity::Review(_) => Kind::Review,
        }
    }

    pub fn meta(&self) -> &Meta {
        match self {
            Entity::State(m) => &m.meta,
            Entity::City(m) => &m.meta,
            Entity::Amenity(m) => &m.meta,
            Entity::User(m) => &m.meta,
            Entity::Place(m) => &m.meta,
            Entity::Review(m) => &m.meta,
        }
    }

    pub fn id(&self) -> &str {
        &self.meta().id
    }

    /// Encode the inner record as JSON (the kind is implied by where it is stored)
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        match self {
            Entity::State(m) => serde_json::to_vec(m),
            Entity::City(m) => serde_json::to_vec(m),
            Entity::Amenity(m) => serde_json::to_vec(m),
            Entity::User(m) => serde_json::to_vec(m),
            Entity::Place(m) => serde_json::to_vec(m),
            Entity::Review(m) => serde_json::to_vec(m),
        }
    }

    /// Decode a record of the given kind from JSON
    pub fn from_json(kind: Kind, bytes: &[u8]) -> serde_json::Result<Self> {
        Ok(match kind {
            Kind::State => Entity::State(serde_json::from_slice(bytes)?),
            Kind::City => Entity::City(serde_json::from_slice(bytes)?),
            Kind::Amenity => Entity::Amenity(serde_json::from_slice(bytes)?),
            Kind::User => Entity::User(serde_json::from_slice(bytes)?),
            Kind::Place => Entity::Place(serde_json::from_slice(bytes)?),
            Kind::Review => Entity::Review(serde_json::from_slice(bytes)?),
        })
    }
}

/// Typed view over one variant of [`Entity`].
pub trait Model: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: Kind;

    /// Stored fields that never appear in client documents
    const HIDDEN: &'static [&'static str] = &[];

    fn meta(&self) -> &Meta;

    fn meta_mut(&mut self) -> &mut Meta;

    fn into_entity(self) -> Entity;

    fn from_entity(entity: Entity) -> Option<Self>;

    fn id(&self) -> &str {
        &self.meta().id
    }

    /// Key/value document returned to API clients.
    fn to_document(&self) -> serde_json::Result<Map<String, Value>> {
        let mut doc = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for field in Self::HIDDEN {
            doc.remove(*field);
        }
        doc.insert(
            "__class__".to_string(),
            Value::String(Self::KIND.class_name().to_string()),
        );
        Ok(doc)
    }
}

/// Partial update carrying only the fields a client may change.
///
/// Fields absent from the implementing type (ids, timestamps, owning
/// foreign keys) are dropped during deserialization.
pub trait Patch<M>: DeserializeOwned {
    fn apply(self, target: &mut M);
}

macro_rules! impl_model {
    ($name:ident $(, hidden = [$($field:literal),* $(,)?])?) => {
        impl $crate::models::Model for $name {
            const KIND: $crate::models::Kind = $crate::models::Kind::$name;
            $(const HIDDEN: &'static [&'static str] = &[$($field),*];)?

            fn meta(&self) -> &$crate::models::Meta {
                &self.meta
            }

            fn meta_mut(&mut self) -> &mut $crate::models::Meta {
                &mut self.meta
            }

            fn into_entity(self) -> $crate::models::Entity {
                $crate::models::Entity::$name(self)
            }

            fn from_entity(entity: $crate::models::Entity) -> Option<Self> {
                match entity {
                    $crate::models::Entity::$name(model) => Some(model),
                    _ => None,
                }
            }
        }
    };
}

pub(crate) use impl_model;
