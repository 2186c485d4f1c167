use serde::{Deserialize, Serialize};

use super::entity::impl_model;
use super::{Meta, Patch};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amenity {
    #[serde(flatten)]
    pub meta: Meta,

    /// e.g. "Wifi", "Pool"
    pub name: String,
}

impl_model!(Amenity);

impl Amenity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            meta: Meta::new(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NewAmenity {
    pub name: String,
}

impl From<NewAmenity> for Amenity {
    fn from(new: NewAmenity) -> Self {
        Amenity::new(new.name)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AmenityPatch {
    pub name: Option<String>,
}

impl Patch<Amenity> for AmenityPatch {
    fn apply(self, target: &mut Amenity) {
        if let Some(name) = self.name {
            target.name = name;
        }
    }
}
