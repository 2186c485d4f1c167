//! Rentable place listed in a city.

use serde::{Deserialize, Serialize};

use super::entity::impl_model;
use super::{Meta, Patch};

/// A listed place.
///
/// How the place is linked to amenities depends on the store's
/// [`crate::repository::AmenityLinkage`]: with inline linkage the ids live in
/// `amenity_ids`, with join linkage that field stays empty and the links are
/// rows in the store's join table. Clients never see `amenity_ids` directly;
/// see [`crate::search::PlaceHit`] for the serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(flatten)]
    pub meta: Meta,

    pub city_id: String,

    /// Owner
    pub user_id: String,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub number_rooms: u32,

    #[serde(default)]
    pub number_bathrooms: u32,

    #[serde(default)]
    pub max_guest: u32,

    #[serde(default)]
    pub price_by_night: u32,

    #[serde(default)]
    pub latitude: Option<f64>,

    #[serde(default)]
    pub longitude: Option<f64>,

    /// Linked amenities, inline linkage only
    #[serde(default)]
    pub amenity_ids: Vec<String>,
}

impl_model!(Place, hidden = ["amenity_ids"]);

impl Place {
    pub fn new(
        city_id: impl Into<String>,
        user_id: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            meta: Meta::new(),
            city_id: city_id.into(),
            user_id: user_id.into(),
            name: name.into(),
            description: None,
            number_rooms: 0,
            number_bathrooms: 0,
            max_guest: 0,
            price_by_night: 0,
            latitude: None,
            longitude: None,
            amenity_ids: Vec::new(),
        }
    }
}

/// Body of `POST /cities/{city_id}/places`; the city comes from the path
#[derive(Debug, Deserialize)]
pub struct NewPlace {
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub number_rooms: u32,
    #[serde(default)]
    pub number_bathrooms: u32,
    #[serde(default)]
    pub max_guest: u32,
    #[serde(default)]
    pub price_by_night: u32,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl NewPlace {
    pub fn into_place(self, city_id: impl Into<String>) -> Place {
        let mut place = Place::new(city_id, self.user_id, self.name);
        place.description = self.description;
        place.number_rooms = self.number_rooms;
        place.number_bathrooms = self.number_bathrooms;
        place.max_guest = self.max_guest;
        place.price_by_night = self.price_by_night;
        place.latitude = self.latitude;
        place.longitude = self.longitude;
        place
    }
}

/// Mutable place fields. `city_id`, `user_id` and amenity links are not
/// changeable through an update.
#[derive(Debug, Default, Deserialize)]
pub struct PlacePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub number_rooms: Option<u32>,
    pub number_bathrooms: Option<u32>,
    pub max_guest: Option<u32>,
    pub price_by_night: Option<u32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Patch<Place> for PlacePatch {
    fn apply(self, target: &mut Place) {
        if let Some(name) = self.name {
            target.name = name;
        }
        if let Some(description) = self.description {
            target.description = Some(description);
        }
        if let Some(number_rooms) = self.number_rooms {
            target.number_rooms = number_rooms;
        }
        if let Some(number_bathrooms) = self.number_bathrooms {
            target.number_bathrooms = number_bathrooms;
        }
        if let Some(max_guest) = self.max_guest {
            target.max_guest = max_guest;
        }
        if let Some(price_by_night) = self.price_by_night {
            target.price_by_night = price_by_night;
        }
        if let Some(latitude) = self.latitude {
            target.latitude = Some(latitude);
        }
        if let Some(longitude) = self.longitude {
            target.longitude = Some(longitude);
        }
    }
}
