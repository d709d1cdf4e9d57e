//! Airspace restrictions: feed access, normalization and proximity filtering

use async_trait::async_trait;

use crate::Result;
use crate::models::RawRestriction;

pub mod faa;
pub mod normalizer;
pub mod proximity;
pub mod validity;

pub use faa::FaaRestrictionFeed;
pub use normalizer::RestrictionNormalizer;
pub use proximity::{ProximityFilter, is_currently_active, is_spatially_relevant};
pub use validity::parse_validity_window;

/// Source of raw restriction records for one evaluation
#[async_trait]
pub trait RestrictionFeed: Send + Sync {
    async fn fetch_restrictions(&self) -> Result<Vec<RawRestriction>>;
}
