//! Ports layer: Trait definitions for external collaborators.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the engine and external systems (geocoding/places lookup, text
//! generation, profile and daily-log stores).

mod generator;
mod geo;
mod store;

pub use generator::TextGenerator;
pub use geo::{Geocoder, PlaceDetails, PlaceRef, PlaceReview, PlacesDirectory};
pub use store::{DailyLog, ProfileStore};

/// Error type for calls into external network collaborators.
///
/// Every variant surfaces immediately to the calling component; callers
/// decide whether to degrade to local data. No retries happen here.
#[derive(Debug, thiserror::Error)]
pub enum ExternalServiceError {
    /// Connection failure or timeout before a response arrived
    #[error("Transport failure: {0}")]
    Transport(String),

    /// Non-success HTTP status from the collaborator
    #[error("Collaborator returned HTTP {0}")]
    Http(u16),

    /// Collaborator-reported failure status in an otherwise valid response
    #[error("Collaborator reported failure: {0}")]
    Service(String),

    /// Response body could not be decoded
    #[error("Response could not be decoded: {0}")]
    Decode(String),
}
