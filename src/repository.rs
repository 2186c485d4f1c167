//! Typed access to the store, relationship helpers and cascading deletes.

use std::sync::Arc;

use hashbrown::HashSet;
use parking_lot::Mutex;
use serde::Deserialize;
use tracing::debug;

use crate::models::{Amenity, City, Entity, Kind, Model, Place, Review, State, User};
use crate::search::PlaceCatalog;
use crate::storage::{Result, Storage};

/// Where place↔amenity links are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AmenityLinkage {
    /// Rows in the store's join table
    #[default]
    Join,
    /// Id list stored on the place itself
    Inline,
}

/// Typed facade over a [`Storage`]. Cheap to clone.
#[derive(Clone)]
pub struct Repository {
    storage: Arc<dyn Storage>,
    linkage: AmenityLinkage,
    /// Held across every read-modify-write of a stored place
    place_writes: Arc<Mutex<()>>,
}

impl Repository {
    pub fn new(storage: Arc<dyn Storage>, linkage: AmenityLinkage) -> Self {
        Self {
            storage,
            linkage,
            place_writes: Arc::new(Mutex::new(())),
        }
    }

    pub fn linkage(&self) -> AmenityLinkage {
        self.linkage
    }

    pub fn get<M: Model>(&self, id: &str) -> Result<Option<M>> {
        Ok(self.storage.get(M::KIND, id)?.and_then(M::from_entity))
    }

    /// All records of a kind, oldest first
    pub fn all<M: Model>(&self) -> Result<Vec<M>> {
        let mut models: Vec<M> = self
            .storage
            .all(M::KIND)?
            .into_iter()
            .filter_map(M::from_entity)
            .collect();
        models.sort_by(|a, b| {
            a.meta()
                .created_at
                .cmp(&b.meta().created_at)
                .then_with(|| a.id().cmp(b.id()))
        });
        Ok(models)
    }

    pub fn count<M: Model>(&self) -> Result<usize> {
        self.storage.count(M::KIND)
    }

    /// Store a new record as-is
    pub fn insert<M: Model>(&self, model: M) -> Result<M> {
        self.storage.put(model.clone().into_entity())?;
        Ok(model)
    }

    /// Store an existing record, refreshing `updated_at`.
    ///
    /// A place keeps the amenity links already stored for it; only
    /// [`Self::link_amenity`] and [`Self::unlink_amenity`] change them.
    pub fn save<M: Model>(&self, model: &mut M) -> Result<()> {
        model.meta_mut().touch();
        let mut place = match model.clone().into_entity() {
            Entity::Place(place) => place,
            entity => return self.storage.put(entity),
        };

        let _guard = self.place_writes.lock();
        if let Some(stored) = self.get::<Place>(place.id())? {
            place.amenity_ids = stored.amenity_ids;
        }
        self.storage.put(place.clone().into_entity())?;
        if let Some(saved) = M::from_entity(place.into_entity()) {
            *model = saved;
        }
        Ok(())
    }

    /// Delete a record and everything it owns. Returns false when the id is
    /// unknown.
    pub fn delete<M: Model>(&self, id: &str) -> Result<bool> {
        self.delete_kind(M::KIND, id)
    }

    fn delete_kind(&self, kind: Kind, id: &str) -> Result<bool> {
        if self.storage.get(kind, id)?.is_none() {
            return Ok(false);
        }

        match kind {
            Kind::State => {
                for city in self.cities_of(id)? {
                    self.delete_kind(Kind::City, city.id())?;
                }
            }
            Kind::City => {
                for place in self.places_of(id)? {
                    self.delete_kind(Kind::Place, place.id())?;
                }
            }
            Kind::User => {
                for place in self.all::<Place>()? {
                    if place.user_id == id {
                        self.delete_kind(Kind::Place, place.id())?;
                    }
                }
                for review in self.all::<Review>()? {
                    if review.user_id == id {
                        self.storage.delete(Kind::Review, review.id())?;
                    }
                }
            }
            Kind::Place => {
                for review in self.reviews_of(id)? {
                    self.storage.delete(Kind::Review, review.id())?;
                }
                for amenity_id in self.storage.linked(id)? {
                    self.storage.unlink(id, &amenity_id)?;
                }
            }
            Kind::Amenity => self.forget_amenity(id)?,
            Kind::Review => {}
        }

        debug!("Deleting {} {}", kind, id);
        self.storage.delete(kind, id)
    }

    /// Drop every link to an amenity that is about to disappear
    fn forget_amenity(&self, amenity_id: &str) -> Result<()> {
        let _guard = self.place_writes.lock();
        for mut place in self.all::<Place>()? {
            self.storage.unlink(place.id(), amenity_id)?;
            if place.amenity_ids.iter().any(|id| id == amenity_id) {
                place.amenity_ids.retain(|id| id != amenity_id);
                self.storage.put(place.into_entity())?;
            }
        }
        Ok(())
    }

    pub fn cities_of(&self, state_id: &str) -> Result<Vec<City>> {
        Ok(self
            .all::<City>()?
            .into_iter()
            .filter(|city| city.state_id == state_id)
            .collect())
    }

    pub fn places_of(&self, city_id: &str) -> Result<Vec<Place>> {
        Ok(self
            .all::<Place>()?
            .into_iter()
            .filter(|place| place.city_id == city_id)
            .collect())
    }

    pub fn reviews_of(&self, place_id: &str) -> Result<Vec<Review>> {
        Ok(self
            .all::<Review>()?
            .into_iter()
            .filter(|review| review.place_id == place_id)
            .collect())
    }

    /// Amenity ids linked to a place, sorted
    pub fn amenity_ids(&self, place: &Place) -> Result<Vec<String>> {
        let mut ids = match self.linkage {
            AmenityLinkage::Join => self.storage.linked(place.id())?,
            AmenityLinkage::Inline => place.amenity_ids.clone(),
        };
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    /// Amenities linked to a place, skipping links to deleted amenities
    pub fn amenities_of(&self, place: &Place) -> Result<Vec<Amenity>> {
        let mut amenities = Vec::new();
        for id in self.amenity_ids(place)? {
            if let Some(amenity) = self.get::<Amenity>(&id)? {
                amenities.push(amenity);
            }
        }
        Ok(amenities)
    }

    /// Link an amenity to a place. Returns false if it was already linked.
    pub fn link_amenity(&self, place: &mut Place, amenity_id: &str) -> Result<bool> {
        match self.linkage {
            AmenityLinkage::Join => self.storage.link(place.id(), amenity_id),
            AmenityLinkage::Inline => self.edit_inline_links(place, |ids| {
                if ids.iter().any(|id| id == amenity_id) {
                    return false;
                }
                ids.push(amenity_id.to_string());
                true
            }),
        }
    }

    /// Unlink an amenity from a place. Returns false if it was not linked.
    pub fn unlink_amenity(&self, place: &mut Place, amenity_id: &str) -> Result<bool> {
        match self.linkage {
            AmenityLinkage::Join => self.storage.unlink(place.id(), amenity_id),
            AmenityLinkage::Inline => self.edit_inline_links(place, |ids| {
                let before = ids.len();
                ids.retain(|id| id != amenity_id);
                ids.len() != before
            }),
        }
    }

    /// Apply `edit` to the stored copy of the place's inline links and write
    /// it back if it changed anything. `place` is refreshed from the store.
    fn edit_inline_links<F>(&self, place: &mut Place, edit: F) -> Result<bool>
    where
        F: FnOnce(&mut Vec<String>) -> bool,
    {
        let _guard = self.place_writes.lock();
        let Some(mut stored) = self.get::<Place>(place.id())? else {
            return Ok(false);
        };

        let changed = edit(&mut stored.amenity_ids);
        if changed {
            stored.meta.touch();
            self.storage.put(stored.clone().into_entity())?;
        }
        *place = stored;
        Ok(changed)
    }
}

impl PlaceCatalog for Repository {
    fn find_state(&self, id: &str) -> Result<Option<State>> {
        self.get(id)
    }

    fn find_city(&self, id: &str) -> Result<Option<City>> {
        self.get(id)
    }

    fn find_amenity(&self, id: &str) -> Result<Option<Amenity>> {
        self.get(id)
    }

    fn all_places(&self) -> Result<Vec<Place>> {
        self.all()
    }

    fn state_cities(&self, state: &State) -> Result<Vec<City>> {
        self.cities_of(state.id())
    }

    fn city_places(&self, city: &City) -> Result<Vec<Place>> {
        self.places_of(city.id())
    }

    fn place_amenities(&self, place: &Place) -> Result<HashSet<String>> {
        Ok(self.amenity_ids(place)?.into_iter().collect())
    }
}
