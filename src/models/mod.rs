//! Records managed by the API.

pub mod amenity;
pub mod base;
pub mod city;
pub mod entity;
pub mod kind;
pub mod place;
pub mod review;
pub mod state;
pub mod user;

pub use amenity::{Amenity, AmenityPatch, NewAmenity};
pub use base::Meta;
pub use city::{City, CityPatch, NewCity};
pub use entity::{Entity, Model, Patch};
pub use kind::Kind;
pub use place::{NewPlace, Place, PlacePatch};
pub use review::{NewReview, Review, ReviewPatch};
pub use state::{NewState, State, StatePatch};
pub use user::{NewUser, User, UserPatch};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_document_hides_password() {
        let user = User::new("a@b.c", "secret");
        let doc = user.to_document().unwrap();

        assert!(!doc.contains_key("password"));
        assert_eq!(doc["email"], "a@b.c");
        assert_eq!(doc["__class__"], "User");
    }

    #[test]
    fn test_entity_json_keeps_kind() {
        let city = City::new("state-1", "San Francisco");
        let entity = city.clone().into_entity();
        let bytes = entity.to_json().unwrap();

        let back = Entity::from_json(Kind::City, &bytes).unwrap();
        assert_eq!(back.kind(), Kind::City);
        assert_eq!(City::from_entity(back), Some(city));
    }

    #[test]
    fn test_from_entity_rejects_other_kind() {
        let entity = State::new("CA").into_entity();
        assert!(Amenity::from_entity(entity).is_none());
    }

    #[test]
    fn test_patch_skips_immutable_user_email() {
        let mut user = User::new("a@b.c", "secret");
        let patch: UserPatch = serde_json::from_value(serde_json::json!({
            "email": "x@y.z",
            "first_name": "Ada",
            "created_at": "yesterday"
        }))
        .unwrap();
        patch.apply(&mut user);

        assert_eq!(user.email, "a@b.c");
        assert_eq!(user.first_name.as_deref(), Some("Ada"));
    }
}
