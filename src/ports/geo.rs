//! Geocoding and places ports.

use crate::domain::Coordinates;

use super::ExternalServiceError;

/// A candidate place reference returned by a nearby search, before detail
/// enrichment.
#[derive(Debug, Clone)]
pub struct PlaceRef {
    /// Collaborator-scoped opaque identifier
    pub id: String,
    pub name: String,
}

/// One review attached to a detail record.
#[derive(Debug, Clone, Default)]
pub struct PlaceReview {
    pub author_name: Option<String>,
    pub rating: Option<f64>,
    pub text: Option<String>,
    pub relative_time_description: Option<String>,
}

/// Detail record for a single place. Every field is optional; the search
/// service applies presentation defaults.
#[derive(Debug, Clone, Default)]
pub struct PlaceDetails {
    pub name: Option<String>,
    pub formatted_address: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u32>,
    pub formatted_phone_number: Option<String>,
    pub website: Option<String>,
    pub reviews: Vec<PlaceReview>,
}

/// Trait for resolving free-form location text to coordinates.
pub trait Geocoder: Send + Sync {
    /// Geocode `text`.
    ///
    /// Returns `None` when the collaborator resolves nothing for the text
    /// (as opposed to failing).
    ///
    /// # Errors
    /// Returns `ExternalServiceError` on transport or collaborator failure.
    fn geocode(&self, text: &str) -> Result<Option<Coordinates>, ExternalServiceError>;
}

/// Trait for nearby-place search and per-place detail enrichment.
pub trait PlacesDirectory: Send + Sync {
    /// Find places matching `category` within `radius_meters` of `at`.
    ///
    /// # Errors
    /// Returns `ExternalServiceError` on transport or collaborator failure.
    fn find_nearby(
        &self,
        at: Coordinates,
        radius_meters: u32,
        category: &str,
    ) -> Result<Vec<PlaceRef>, ExternalServiceError>;

    /// Fetch the requested detail `fields` for one candidate.
    ///
    /// # Errors
    /// Returns `ExternalServiceError` when the detail record does not
    /// report success; the caller skips the candidate rather than failing
    /// the whole search.
    fn fetch_details(
        &self,
        place: &PlaceRef,
        fields: &[&str],
    ) -> Result<PlaceDetails, ExternalServiceError>;
}
