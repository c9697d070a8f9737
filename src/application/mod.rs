//! Application layer: use cases orchestrating domain, model, and ports.

mod advice;
mod recommendation;
mod risk;
mod specialists;
mod tracking;

pub use advice::AdviceService;
pub use recommendation::{RecommendationCache, RecommendationService};
pub use risk::RiskService;
pub use specialists::SpecialistSearchService;
pub use tracking::TrackingService;
