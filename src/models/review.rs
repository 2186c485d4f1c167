use serde::{Deserialize, Serialize};

use super::entity::impl_model;
use super::{Meta, Patch};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(flatten)]
    pub meta: Meta,

    pub place_id: String,

    /// Author
    pub user_id: String,

    pub text: String,
}

impl_model!(Review);

impl Review {
    pub fn new(
        place_id: impl Into<String>,
        user_id: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            meta: Meta::new(),
            place_id: place_id.into(),
            user_id: user_id.into(),
            text: text.into(),
        }
    }
}

/// Body of `POST /places/{place_id}/reviews`
#[derive(Debug, Deserialize)]
pub struct NewReview {
    pub user_id: String,
    pub text: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReviewPatch {
    pub text: Option<String>,
}

impl Patch<Review> for ReviewPatch {
    fn apply(self, target: &mut Review) {
        if let Some(text) = self.text {
            target.text = text;
        }
    }
}
