//! HBnB - REST API over states, cities, amenities, users, places and reviews
//!
//! This library provides the storage, search and HTTP layers used by the
//! `api` binary.

pub mod config;
pub mod models;
pub mod repository;
pub mod search;
pub mod storage;
pub mod web;

pub use models::{Amenity, City, Kind, Model, Place, Review, State, User};
pub use repository::{AmenityLinkage, Repository};
pub use search::{PlaceFilter, PlaceFilterResolver, PlaceHit};
