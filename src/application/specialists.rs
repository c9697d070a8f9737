//! Specialist search service: geocode, search nearby, enrich, cache.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::TtlCache;
use crate::domain::{experience_label, SpecialistProfile, SpecialistReview};
use crate::ports::{Geocoder, PlaceDetails, PlacesDirectory};
use crate::{GlucoguardError, Result};

/// How long a search result stays served from cache.
const SEARCH_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Hard cap on detail fetches per search; bounds external cost.
const MAX_CANDIDATES: usize = 3;

/// At most this many reviews are kept per specialist.
const MAX_REVIEWS: usize = 3;

/// Fixed specialist category queried at the places collaborator.
const SPECIALIST_CATEGORY: &str = "endocrinologist OR diabetologist";

/// Detail fields requested for each candidate.
const DETAIL_FIELDS: [&str; 7] = [
    "name",
    "formatted_address",
    "rating",
    "user_ratings_total",
    "reviews",
    "formatted_phone_number",
    "website",
];

/// Cache key: lowercased location text plus radius.
type SearchKey = (String, u32);

/// Service for finding nearby diabetes specialists.
pub struct SpecialistSearchService<G, P>
where
    G: Geocoder,
    P: PlacesDirectory,
{
    geocoder: Arc<G>,
    places: Arc<P>,
    cache: Arc<TtlCache<SearchKey, Vec<SpecialistProfile>>>,
}

impl<G, P> SpecialistSearchService<G, P>
where
    G: Geocoder,
    P: PlacesDirectory,
{
    /// Create a new search service around an injected cache.
    pub fn new(
        geocoder: Arc<G>,
        places: Arc<P>,
        cache: Arc<TtlCache<SearchKey, Vec<SpecialistProfile>>>,
    ) -> Self {
        Self {
            geocoder,
            places,
            cache,
        }
    }

    /// Search for specialists near `location` within `radius_meters`.
    ///
    /// Results are cached for 24 hours per (location, radius). Partial
    /// results are acceptable; only a completely empty result is an error.
    ///
    /// # Errors
    /// - `Validation` for an empty location
    /// - `InvalidLocation` when geocoding resolves nothing
    /// - `External` when a collaborator call fails
    /// - `NotFound` when no candidate survives enrichment
    pub fn search(
        &self,
        location: &str,
        radius_meters: u32,
    ) -> Result<Vec<SpecialistProfile>> {
        let location = location.trim();
        if location.is_empty() {
            return Err(GlucoguardError::Validation("location is required".into()));
        }

        let key = (location.to_lowercase(), radius_meters);
        self.cache
            .get_or_fetch(key, SEARCH_TTL, || self.lookup(location, radius_meters))
    }

    fn lookup(&self, location: &str, radius_meters: u32) -> Result<Vec<SpecialistProfile>> {
        let coordinates = self
            .geocoder
            .geocode(location)?
            .ok_or_else(|| GlucoguardError::InvalidLocation(location.to_string()))?;

        tracing::debug!(
            "Geocoded '{location}' to ({}, {})",
            coordinates.lat,
            coordinates.lng
        );

        let candidates =
            self.places
                .find_nearby(coordinates, radius_meters, SPECIALIST_CATEGORY)?;

        let mut specialists = Vec::new();
        for candidate in candidates.iter().take(MAX_CANDIDATES) {
            match self.places.fetch_details(candidate, &DETAIL_FIELDS) {
                Ok(details) => specialists.push(profile_from_details(details)),
                Err(e) => {
                    // Partial results are acceptable; total failure is not.
                    tracing::warn!("Skipping candidate {}: {e}", candidate.id);
                }
            }
        }

        if specialists.is_empty() {
            return Err(GlucoguardError::NotFound(
                "no diabetes specialists found in this area".into(),
            ));
        }

        tracing::info!(
            "Found {} specialists near '{location}' (radius {radius_meters} m)",
            specialists.len()
        );
        Ok(specialists)
    }
}

fn profile_from_details(details: PlaceDetails) -> SpecialistProfile {
    let total_reviews = details.user_ratings_total.unwrap_or(0);
    let rating = details.rating.unwrap_or(0.0);

    SpecialistProfile {
        name: details.name.unwrap_or_else(|| "Unknown".into()),
        address: details.formatted_address.unwrap_or_else(|| "Unknown".into()),
        rating,
        total_reviews,
        experience: experience_label(total_reviews, rating).to_string(),
        phone: details
            .formatted_phone_number
            .unwrap_or_else(|| "Not available".into()),
        website: details.website.unwrap_or_else(|| "Not available".into()),
        reviews: details
            .reviews
            .into_iter()
            .take(MAX_REVIEWS)
            .map(|review| SpecialistReview {
                author: review.author_name.unwrap_or_else(|| "Anonymous".into()),
                rating: review.rating.unwrap_or(0.0),
                text: review.text.unwrap_or_default(),
                time: review.relative_time_description.unwrap_or_default(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinates;
    use crate::ports::{ExternalServiceError, PlaceRef, PlaceReview};
    use std::result::Result;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeGeocoder {
        result: Option<Coordinates>,
        calls: AtomicUsize,
    }

    impl FakeGeocoder {
        fn resolving() -> Self {
            Self {
                result: Some(Coordinates {
                    lat: 18.52,
                    lng: 73.86,
                }),
                calls: AtomicUsize::new(0),
            }
        }

        fn unresolvable() -> Self {
            Self {
                result: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Geocoder for FakeGeocoder {
        fn geocode(&self, _text: &str) -> Result<Option<Coordinates>, ExternalServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.result)
        }
    }

    struct FakePlaces {
        candidates: usize,
        failing_detail_ids: Vec<String>,
        search_calls: AtomicUsize,
        detail_calls: AtomicUsize,
    }

    impl FakePlaces {
        fn with_candidates(candidates: usize) -> Self {
            Self {
                candidates,
                failing_detail_ids: Vec::new(),
                search_calls: AtomicUsize::new(0),
                detail_calls: AtomicUsize::new(0),
            }
        }
    }

    impl PlacesDirectory for FakePlaces {
        fn find_nearby(
            &self,
            _at: Coordinates,
            _radius_meters: u32,
            _category: &str,
        ) -> Result<Vec<PlaceRef>, ExternalServiceError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            Ok((0..self.candidates)
                .map(|i| PlaceRef {
                    id: format!("place-{i}"),
                    name: format!("Clinic {i}"),
                })
                .collect())
        }

        fn fetch_details(
            &self,
            place: &PlaceRef,
            _fields: &[&str],
        ) -> Result<PlaceDetails, ExternalServiceError> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            if self.failing_detail_ids.contains(&place.id) {
                return Err(ExternalServiceError::Service("NOT_FOUND".into()));
            }
            Ok(PlaceDetails {
                name: Some(place.name.clone()),
                formatted_address: Some("12 MG Road".into()),
                rating: Some(4.4),
                user_ratings_total: Some(80),
                formatted_phone_number: None,
                website: None,
                reviews: vec![PlaceReview::default(); 5],
            })
        }
    }

    fn service(
        geocoder: FakeGeocoder,
        places: FakePlaces,
    ) -> (
        SpecialistSearchService<FakeGeocoder, FakePlaces>,
        Arc<FakeGeocoder>,
        Arc<FakePlaces>,
    ) {
        let geocoder = Arc::new(geocoder);
        let places = Arc::new(places);
        let cache = Arc::new(TtlCache::new(64));
        (
            SpecialistSearchService::new(Arc::clone(&geocoder), Arc::clone(&places), cache),
            geocoder,
            places,
        )
    }

    #[test]
    fn test_unresolvable_location_makes_zero_places_calls() {
        let (svc, _geo, places) =
            service(FakeGeocoder::unresolvable(), FakePlaces::with_candidates(3));

        let err = svc.search("nowhere-land", 5000).expect_err("must fail");
        assert_eq!(err.code(), "invalid_location");
        assert_eq!(places.search_calls.load(Ordering::SeqCst), 0);
        assert_eq!(places.detail_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_candidate_cap_bounds_detail_fetches() {
        let (svc, _geo, places) =
            service(FakeGeocoder::resolving(), FakePlaces::with_candidates(7));

        let results = svc.search("Pune", 5000).expect("search");
        assert_eq!(results.len(), MAX_CANDIDATES);
        assert_eq!(places.detail_calls.load(Ordering::SeqCst), MAX_CANDIDATES);
        assert!(results.iter().all(|s| s.reviews.len() <= MAX_REVIEWS));
    }

    #[test]
    fn test_detail_failure_skips_candidate_only() {
        let mut places = FakePlaces::with_candidates(3);
        places.failing_detail_ids = vec!["place-1".into()];
        let (svc, _geo, _places) = service(FakeGeocoder::resolving(), places);

        let results = svc.search("Pune", 5000).expect("search");
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_all_details_failing_is_not_found() {
        let mut places = FakePlaces::with_candidates(2);
        places.failing_detail_ids = vec!["place-0".into(), "place-1".into()];
        let (svc, _geo, _places) = service(FakeGeocoder::resolving(), places);

        let err = svc.search("Pune", 5000).expect_err("must fail");
        assert_eq!(err.code(), "not_found");
    }

    #[test]
    fn test_repeat_search_is_served_from_cache() {
        let (svc, geo, places) =
            service(FakeGeocoder::resolving(), FakePlaces::with_candidates(2));

        svc.search("Pune", 5000).expect("first");
        svc.search("  PUNE ", 5000).expect("second, same key");
        assert_eq!(geo.calls.load(Ordering::SeqCst), 1);
        assert_eq!(places.search_calls.load(Ordering::SeqCst), 1);

        // Different radius is a different key.
        svc.search("Pune", 9000).expect("third");
        assert_eq!(geo.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_empty_location_is_validation_error() {
        let (svc, _geo, _places) =
            service(FakeGeocoder::resolving(), FakePlaces::with_candidates(2));
        let err = svc.search("   ", 5000).expect_err("must fail");
        assert_eq!(err.code(), "validation_error");
    }

    #[test]
    fn test_experience_labels_applied_from_details() {
        let (svc, _geo, _places) =
            service(FakeGeocoder::resolving(), FakePlaces::with_candidates(1));
        let results = svc.search("Pune", 5000).expect("search");
        // 80 reviews > 50
        assert_eq!(results[0].experience, "Likely experienced");
        assert_eq!(results[0].phone, "Not available");
    }
}
