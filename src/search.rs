//! Place search.
//!
//! Resolves a [`PlaceFilter`] into the matching places: state and city
//! selectors are unioned into a candidate set, amenity selectors then keep
//! only the candidates linked to every requested amenity.

use hashbrown::HashSet;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::models::{Amenity, City, Model, Place, State};
use crate::storage::Result;

/// Read-only lookups the resolver needs from the store.
pub trait PlaceCatalog {
    fn find_state(&self, id: &str) -> Result<Option<State>>;

    fn find_city(&self, id: &str) -> Result<Option<City>>;

    fn find_amenity(&self, id: &str) -> Result<Option<Amenity>>;

    fn all_places(&self) -> Result<Vec<Place>>;

    fn state_cities(&self, state: &State) -> Result<Vec<City>>;

    fn city_places(&self, city: &City) -> Result<Vec<Place>>;

    /// Ids of the amenities linked to a place, however the link is stored
    fn place_amenities(&self, place: &Place) -> Result<HashSet<String>>;
}

/// Body of `POST /places_search`. Absent and empty lists mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlaceFilter {
    #[serde(default)]
    pub states: Option<Vec<String>>,

    #[serde(default)]
    pub cities: Option<Vec<String>>,

    #[serde(default)]
    pub amenities: Option<Vec<String>>,
}

impl PlaceFilter {
    pub fn states(&self) -> &[String] {
        self.states.as_deref().unwrap_or_default()
    }

    pub fn cities(&self) -> &[String] {
        self.cities.as_deref().unwrap_or_default()
    }

    pub fn amenities(&self) -> &[String] {
        self.amenities.as_deref().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.states().is_empty() && self.cities().is_empty() && self.amenities().is_empty()
    }
}

/// A matched place and, unless amenity filtering was applied, its amenity ids.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceHit {
    pub place: Place,
    pub amenities: Option<Vec<String>>,
}

impl PlaceHit {
    /// Client document: the place fields plus `amenities` when present
    pub fn to_document(&self) -> serde_json::Result<Map<String, Value>> {
        let mut doc = self.place.to_document()?;
        if let Some(ids) = &self.amenities {
            doc.insert("amenities".to_string(), serde_json::to_value(ids)?);
        }
        Ok(doc)
    }
}

pub struct PlaceFilterResolver<'a, C: ?Sized> {
    catalog: &'a C,
}

impl<'a, C: PlaceCatalog + ?Sized> PlaceFilterResolver<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self { catalog }
    }

    /// Run a filter. Unknown ids are ignored; only catalog errors fail.
    pub fn resolve(&self, filter: &PlaceFilter) -> Result<Vec<PlaceHit>> {
        if filter.is_empty() {
            let places = self.catalog.all_places()?;
            debug!("Unconstrained place search: {} places", places.len());
            return self.with_detail(places);
        }

        let candidates = if filter.states().is_empty() && filter.cities().is_empty() {
            self.catalog.all_places()?
        } else {
            self.locate(filter)?
        };

        if filter.amenities().is_empty() {
            debug!("Place search matched {} places", candidates.len());
            return self.with_detail(candidates);
        }

        let mut required = HashSet::new();
        for amenity_id in filter.amenities() {
            if let Some(amenity) = self.catalog.find_amenity(amenity_id)? {
                required.insert(amenity.meta.id);
            }
        }

        let mut kept = Vec::with_capacity(candidates.len());
        for place in candidates {
            if required.is_empty() || required.is_subset(&self.catalog.place_amenities(&place)?) {
                kept.push(place);
            }
        }

        debug!(
            "Place search matched {} places with {} required amenities",
            kept.len(),
            required.len()
        );

        Ok(kept
            .into_iter()
            .map(|place| PlaceHit {
                place,
                amenities: None,
            })
            .collect())
    }

    /// Union of the places under the selected states and cities, first seen first
    fn locate(&self, filter: &PlaceFilter) -> Result<Vec<Place>> {
        let mut seen = HashSet::new();
        let mut places = Vec::new();
        let mut add = |found: Vec<Place>| {
            for place in found {
                if seen.insert(place.meta.id.clone()) {
                    places.push(place);
                }
            }
        };

        for state_id in filter.states() {
            let Some(state) = self.catalog.find_state(state_id)? else {
                continue;
            };
            for city in self.catalog.state_cities(&state)? {
                add(self.catalog.city_places(&city)?);
            }
        }

        for city_id in filter.cities() {
            if let Some(city) = self.catalog.find_city(city_id)? {
                add(self.catalog.city_places(&city)?);
            }
        }

        Ok(places)
    }

    fn with_detail(&self, places: Vec<Place>) -> Result<Vec<PlaceHit>> {
        places
            .into_iter()
            .map(|place| {
                let mut ids: Vec<String> =
                    self.catalog.place_amenities(&place)?.into_iter().collect();
                ids.sort();
                Ok(PlaceHit {
                    place,
                    amenities: Some(ids),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::User;
    use crate::repository::{AmenityLinkage, Repository};
    use crate::storage::{MemoryStorage, StorageError};

    /// CA -> SF -> {p1: wifi, p2: wifi + pool}; NV -> Reno -> {p3: pool}
    struct Fixture {
        repo: Repository,
        ca: State,
        nv: State,
        sf: City,
        wifi: Amenity,
        pool: Amenity,
        spa: Amenity,
        p2: Place,
        p3: Place,
    }

    impl Fixture {
        fn new(linkage: AmenityLinkage) -> Self {
            let repo = Repository::new(Arc::new(MemoryStorage::new()), linkage);
            let host = repo.insert(User::new("host@example.com", "pw")).unwrap();
            let ca = repo.insert(State::new("California")).unwrap();
            let nv = repo.insert(State::new("Nevada")).unwrap();
            let sf = repo.insert(City::new(ca.id(), "San Francisco")).unwrap();
            let reno = repo.insert(City::new(nv.id(), "Reno")).unwrap();
            let wifi = repo.insert(Amenity::new("Wifi")).unwrap();
            let pool = repo.insert(Amenity::new("Pool")).unwrap();
            let spa = repo.insert(Amenity::new("Spa")).unwrap();

            let mut p1 = repo.insert(Place::new(sf.id(), host.id(), "p1")).unwrap();
            let mut p2 = repo.insert(Place::new(sf.id(), host.id(), "p2")).unwrap();
            let mut p3 = repo.insert(Place::new(reno.id(), host.id(), "p3")).unwrap();
            repo.link_amenity(&mut p1, wifi.id()).unwrap();
            repo.link_amenity(&mut p2, wifi.id()).unwrap();
            repo.link_amenity(&mut p2, pool.id()).unwrap();
            repo.link_amenity(&mut p3, pool.id()).unwrap();

            Self {
                repo,
                ca,
                nv,
                sf,
                wifi,
                pool,
                spa,
                p2,
                p3,
            }
        }

        fn run(&self, filter: PlaceFilter) -> Vec<PlaceHit> {
            PlaceFilterResolver::new(&self.repo).resolve(&filter).unwrap()
        }
    }

    fn ids(list: &[&str]) -> Option<Vec<String>> {
        Some(list.iter().map(|s| s.to_string()).collect())
    }

    fn names(hits: &[PlaceHit]) -> Vec<&str> {
        let mut names: Vec<&str> = hits.iter().map(|h| h.place.name.as_str()).collect();
        names.sort();
        names
    }

    const LINKAGES: [AmenityLinkage; 2] = [AmenityLinkage::Join, AmenityLinkage::Inline];

    #[test]
    fn test_empty_filter_returns_everything_with_detail() {
        for linkage in LINKAGES {
            let fx = Fixture::new(linkage);
            let hits = fx.run(PlaceFilter::default());

            assert_eq!(names(&hits), vec!["p1", "p2", "p3"]);
            let p2 = hits.iter().find(|h| h.place.name == "p2").unwrap();
            let mut expected = vec![fx.wifi.id().to_string(), fx.pool.id().to_string()];
            expected.sort();
            assert_eq!(p2.amenities, Some(expected));
        }
    }

    #[test]
    fn test_empty_lists_are_no_constraint() {
        let fx = Fixture::new(AmenityLinkage::Join);
        let hits = fx.run(PlaceFilter {
            states: Some(vec![]),
            cities: Some(vec![]),
            amenities: Some(vec![]),
        });
        assert_eq!(hits.len(), 3);
        assert!(hits.iter().all(|h| h.amenities.is_some()));
    }

    #[test]
    fn test_state_and_city_do_not_duplicate() {
        let fx = Fixture::new(AmenityLinkage::Join);
        let hits = fx.run(PlaceFilter {
            states: ids(&[fx.ca.id()]),
            cities: ids(&[fx.sf.id()]),
            amenities: None,
        });

        assert_eq!(names(&hits), vec!["p1", "p2"]);
    }

    #[test]
    fn test_states_and_cities_union() {
        let fx = Fixture::new(AmenityLinkage::Join);
        let hits = fx.run(PlaceFilter {
            states: ids(&[fx.nv.id()]),
            cities: ids(&[fx.sf.id()]),
            amenities: None,
        });

        // state selectors are expanded before city selectors
        assert_eq!(hits[0].place.id(), fx.p3.id());
        assert_eq!(names(&hits), vec!["p1", "p2", "p3"]);
    }

    #[test]
    fn test_amenities_are_all_of() {
        for linkage in LINKAGES {
            let fx = Fixture::new(linkage);

            let hits = fx.run(PlaceFilter {
                amenities: ids(&[fx.wifi.id(), fx.pool.id()]),
                ..Default::default()
            });
            assert_eq!(names(&hits), vec!["p2"]);

            let hits = fx.run(PlaceFilter {
                amenities: ids(&[fx.wifi.id(), fx.pool.id(), fx.spa.id()]),
                ..Default::default()
            });
            assert!(hits.is_empty());
        }
    }

    #[test]
    fn test_amenity_only_filter_seeds_from_all_places() {
        let fx = Fixture::new(AmenityLinkage::Join);
        let hits = fx.run(PlaceFilter {
            amenities: ids(&[fx.pool.id()]),
            ..Default::default()
        });

        assert_eq!(names(&hits), vec!["p2", "p3"]);
        assert!(hits.iter().all(|h| h.amenities.is_none()));
    }

    #[test]
    fn test_unknown_state_is_empty_not_everything() {
        let fx = Fixture::new(AmenityLinkage::Join);
        let hits = fx.run(PlaceFilter {
            states: ids(&["nonexistent"]),
            ..Default::default()
        });
        assert!(hits.is_empty());

        let hits = fx.run(PlaceFilter {
            states: ids(&["nonexistent"]),
            amenities: ids(&[fx.wifi.id()]),
            ..Default::default()
        });
        assert!(hits.is_empty());
    }

    #[test]
    fn test_unknown_ids_are_skipped() {
        let fx = Fixture::new(AmenityLinkage::Join);
        let hits = fx.run(PlaceFilter {
            states: ids(&["nope", fx.ca.id()]),
            cities: ids(&["gone"]),
            amenities: ids(&["missing", fx.pool.id()]),
        });

        assert_eq!(names(&hits), vec!["p2"]);
    }

    #[test]
    fn test_only_unknown_amenities_filters_nothing_but_strips_detail() {
        let fx = Fixture::new(AmenityLinkage::Join);
        let hits = fx.run(PlaceFilter {
            amenities: ids(&["missing"]),
            ..Default::default()
        });

        assert_eq!(names(&hits), vec!["p1", "p2", "p3"]);
        assert!(hits.iter().all(|h| h.amenities.is_none()));
    }

    #[test]
    fn test_state_with_amenities_scenario() {
        for linkage in LINKAGES {
            let fx = Fixture::new(linkage);
            let hits = fx.run(PlaceFilter {
                states: ids(&[fx.ca.id()]),
                amenities: ids(&[fx.wifi.id(), fx.pool.id()]),
                ..Default::default()
            });

            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].place.id(), fx.p2.id());
            let doc = hits[0].to_document().unwrap();
            assert!(!doc.contains_key("amenities"));
            assert!(!doc.contains_key("amenity_ids"));
        }
    }

    #[test]
    fn test_resolve_is_repeatable() {
        let fx = Fixture::new(AmenityLinkage::Join);
        let filter = PlaceFilter {
            states: ids(&[fx.ca.id(), fx.nv.id()]),
            amenities: ids(&[fx.pool.id()]),
            ..Default::default()
        };

        assert_eq!(fx.run(filter.clone()), fx.run(filter));
    }

    #[test]
    fn test_filter_body_accepts_nulls_and_missing_keys() {
        let filter: PlaceFilter =
            serde_json::from_value(serde_json::json!({"states": null, "cities": ["c"]})).unwrap();
        assert!(filter.states().is_empty());
        assert_eq!(filter.cities(), ["c".to_string()]);
        assert!(!filter.is_empty());

        let filter: PlaceFilter = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(filter.is_empty());
    }

    struct BrokenCatalog;

    impl PlaceCatalog for BrokenCatalog {
        fn find_state(&self, _id: &str) -> Result<Option<State>> {
            Err(StorageError::Poisoned)
        }

        fn find_city(&self, _id: &str) -> Result<Option<City>> {
            Ok(None)
        }

        fn find_amenity(&self, _id: &str) -> Result<Option<Amenity>> {
            Ok(None)
        }

        fn all_places(&self) -> Result<Vec<Place>> {
            Err(StorageError::Poisoned)
        }

        fn state_cities(&self, _state: &State) -> Result<Vec<City>> {
            Ok(Vec::new())
        }

        fn city_places(&self, _city: &City) -> Result<Vec<Place>> {
            Ok(Vec::new())
        }

        fn place_amenities(&self, _place: &Place) -> Result<HashSet<String>> {
            Ok(HashSet::new())
        }
    }

    #[test]
    fn test_catalog_errors_propagate() {
        let resolver = PlaceFilterResolver::new(&BrokenCatalog);

        assert!(matches!(
            resolver.resolve(&PlaceFilter::default()),
            Err(StorageError::Poisoned)
        ));
        assert!(resolver
            .resolve(&PlaceFilter {
                states: ids(&["any"]),
                ..Default::default()
            })
            .is_err());
        assert!(resolver
            .resolve(&PlaceFilter {
                cities: ids(&["any"]),
                ..Default::default()
            })
            .unwrap()
            .is_empty());
    }
}
