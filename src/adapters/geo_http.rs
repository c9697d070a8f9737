//! HTTP adapter for the geocoding/places collaborator.
//!
//! Speaks a Maps-style REST surface: `/geocode/json`,
//! `/place/textsearch/json`, and `/place/details/json`, each returning an
//! envelope with a collaborator-level `status` string alongside the HTTP
//! status. Every request carries an explicit timeout; the engine's own
//! logic specifies none, so unbounded blocking must be impossible here.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::Coordinates;
use crate::ports::{ExternalServiceError, Geocoder, PlaceDetails, PlaceRef, PlacesDirectory};

/// Default per-request timeout for collaborator calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Collaborator status meaning "valid query, nothing found".
const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

/// HTTP client for geocoding and nearby-place lookup.
pub struct HttpGeoDirectory {
    client: Client,
    base_url: String,
    api_key: String,
}

impl HttpGeoDirectory {
    /// Create an adapter against `base_url` with the default timeout.
    ///
    /// # Errors
    /// Returns `ExternalServiceError::Transport` if the client cannot be
    /// constructed.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ExternalServiceError> {
        Self::with_timeout(base_url, api_key, DEFAULT_TIMEOUT)
    }

    /// Create an adapter with an explicit per-request timeout.
    ///
    /// # Errors
    /// Returns `ExternalServiceError::Transport` if the client cannot be
    /// constructed.
    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ExternalServiceError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| ExternalServiceError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ExternalServiceError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .map_err(|e| ExternalServiceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExternalServiceError::Http(status.as_u16()));
        }

        response
            .json::<T>()
            .map_err(|e| ExternalServiceError::Decode(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct LatLngPayload {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct GeometryPayload {
    location: LatLngPayload,
}

#[derive(Debug, Deserialize)]
struct GeocodeResultPayload {
    geometry: GeometryPayload,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResultPayload>,
}

#[derive(Debug, Deserialize)]
struct PlaceSummaryPayload {
    place_id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceSummaryPayload>,
}

#[derive(Debug, Deserialize, Default)]
struct ReviewPayload {
    author_name: Option<String>,
    rating: Option<f64>,
    text: Option<String>,
    relative_time_description: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct DetailsPayload {
    name: Option<String>,
    formatted_address: Option<String>,
    rating: Option<f64>,
    user_ratings_total: Option<u32>,
    formatted_phone_number: Option<String>,
    website: Option<String>,
    #[serde(default)]
    reviews: Vec<ReviewPayload>,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<DetailsPayload>,
}

impl Geocoder for HttpGeoDirectory {
    fn geocode(&self, text: &str) -> Result<Option<Coordinates>, ExternalServiceError> {
        let response: GeocodeResponse =
            self.get_json("/geocode/json", &[("address", text)])?;

        match response.status.as_str() {
            "OK" => Ok(response.results.first().map(|r| Coordinates {
                lat: r.geometry.location.lat,
                lng: r.geometry.location.lng,
            })),
            STATUS_ZERO_RESULTS => Ok(None),
            other => Err(ExternalServiceError::Service(format!(
                "geocode status {other}"
            ))),
        }
    }
}

impl PlacesDirectory for HttpGeoDirectory {
    fn find_nearby(
        &self,
        at: Coordinates,
        radius_meters: u32,
        category: &str,
    ) -> Result<Vec<PlaceRef>, ExternalServiceError> {
        let location = format!("{},{}", at.lat, at.lng);
        let radius = radius_meters.to_string();
        let response: TextSearchResponse = self.get_json(
            "/place/textsearch/json",
            &[
                ("query", category),
                ("location", location.as_str()),
                ("radius", radius.as_str()),
                ("type", "doctor"),
            ],
        )?;

        match response.status.as_str() {
            "OK" | STATUS_ZERO_RESULTS => Ok(response
                .results
                .into_iter()
                .map(|place| PlaceRef {
                    id: place.place_id,
                    name: place.name,
                })
                .collect()),
            other => Err(ExternalServiceError::Service(format!(
                "place search status {other}"
            ))),
        }
    }

    fn fetch_details(
        &self,
        place: &PlaceRef,
        fields: &[&str],
    ) -> Result<PlaceDetails, ExternalServiceError> {
        let fields = fields.join(",");
        let response: DetailsResponse = self.get_json(
            "/place/details/json",
            &[("place_id", place.id.as_str()), ("fields", fields.as_str())],
        )?;

        if response.status != "OK" {
            return Err(ExternalServiceError::Service(format!(
                "place details status {}",
                response.status
            )));
        }

        let payload = response.result.unwrap_or_default();
        Ok(PlaceDetails {
            name: payload.name,
            formatted_address: payload.formatted_address,
            rating: payload.rating,
            user_ratings_total: payload.user_ratings_total,
            formatted_phone_number: payload.formatted_phone_number,
            website: payload.website,
            reviews: payload
                .reviews
                .into_iter()
                .map(|review| crate::ports::PlaceReview {
                    author_name: review.author_name,
                    rating: review.rating,
                    text: review.text,
                    relative_time_description: review.relative_time_description,
                })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geocode_response_shape() {
        let body = r#"{
            "status": "OK",
            "results": [{"geometry": {"location": {"lat": 18.52, "lng": 73.86}}}]
        }"#;
        let parsed: GeocodeResponse = serde_json::from_str(body).expect("parse");
        assert_eq!(parsed.status, "OK");
        assert!((parsed.results[0].geometry.location.lat - 18.52).abs() < f64::EPSILON);
    }

    #[test]
    fn test_details_response_tolerates_missing_fields() {
        let body = r#"{"status": "OK", "result": {"name": "Dr. Rao"}}"#;
        let parsed: DetailsResponse = serde_json::from_str(body).expect("parse");
        let result = parsed.result.expect("result");
        assert_eq!(result.name.as_deref(), Some("Dr. Rao"));
        assert!(result.rating.is_none());
        assert!(result.reviews.is_empty());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let adapter =
            HttpGeoDirectory::new("https://maps.example.com/api/", "k").expect("client");
        assert_eq!(adapter.base_url, "https://maps.example.com/api");
    }
}
