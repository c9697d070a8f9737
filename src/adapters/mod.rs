//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external systems:
//! - `geo_http`: HTTP geocoding/places collaborator
//! - `generative_http`: HTTP generative-text collaborator
//! - `memory`: in-memory profile and daily-log stores
//! - `text`: cleanup of collaborator-returned text

pub mod generative_http;
pub mod geo_http;
pub mod memory;
pub mod text;

pub use generative_http::HttpTextGenerator;
pub use geo_http::HttpGeoDirectory;
pub use memory::{InMemoryDailyLog, InMemoryProfileStore};

/// Error type for the in-memory store adapters.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Store lock poisoned")]
    Poisoned,
}
