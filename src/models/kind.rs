//! Entity kinds known to the store.

/// Every kind of record the API manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    State,
    City,
    Amenity,
    User,
    Place,
    Review,
}

impl Kind {
    /// Get all kinds in a stable order
    pub fn all() -> &'static [Kind] {
        &[
            Kind::State,
            Kind::City,
            Kind::Amenity,
            Kind::User,
            Kind::Place,
            Kind::Review,
        ]
    }

    /// Class name written into serialized documents as `__class__`
    pub fn class_name(&self) -> &'static str {
        match self {
            Kind::State => "State",
            Kind::City => "City",
            Kind::Amenity => "Amenity",
            Kind::User => "User",
            Kind::Place => "Place",
            Kind::Review => "Review",
        }
    }

    /// Plural collection name, used for store trees and `/stats` keys
    pub fn collection(&self) -> &'static str {
        match self {
            Kind::State => "states",
            Kind::City => "cities",
            Kind::Amenity => "amenities",
            Kind::User => "users",
            Kind::Place => "places",
            Kind::Review => "reviews",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.class_name())
    }
}
