use serde::{Deserialize, Serialize};

use super::entity::impl_model;
use super::{Meta, Patch};

/// Top-level location grouping cities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    #[serde(flatten)]
    pub meta: Meta,

    pub name: String,
}

impl_model!(State);

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            meta: Meta::new(),
            name: name.into(),
        }
    }
}

/// Body of `POST /states`
#[derive(Debug, Deserialize)]
pub struct NewState {
    pub name: String,
}

impl From<NewState> for State {
    fn from(new: NewState) -> Self {
        State::new(new.name)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StatePatch {
    pub name: Option<String>,
}

impl Patch<State> for StatePatch {
    fn apply(self, target: &mut State) {
        if let Some(name) = self.name {
            target.name = name;
        }
    }
}
