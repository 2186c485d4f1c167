use serde::{Deserialize, Serialize};

use super::entity::impl_model;
use super::{Meta, Patch};

/// A city, owned by a [`super::State`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    #[serde(flatten)]
    pub meta: Meta,

    /// Owning state
    pub state_id: String,

    pub name: String,
}

impl_model!(City);

impl City {
    pub fn new(state_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            meta: Meta::new(),
            state_id: state_id.into(),
            name: name.into(),
        }
    }
}

/// Body of `POST /states/{state_id}/cities`; the state comes from the path
#[derive(Debug, Deserialize)]
pub struct NewCity {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct CityPatch {
    pub name: Option<String>,
}

impl Patch<City> for CityPatch {
    fn apply(self, target: &mut City) {
        if let Some(name) = self.name {
            target.name = name;
        }
    }
}
