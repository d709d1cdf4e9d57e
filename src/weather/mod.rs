//! Weather observations: the feed seam, the Open-Meteo client and the
//! threshold evaluator

use async_trait::async_trait;

use crate::Result;
use crate::models::{Location, WeatherObservation};

pub mod evaluator;
pub mod open_meteo;

pub use evaluator::{WeatherEvaluator, classify_wind, forecast_stats};
pub use open_meteo::OpenMeteoWeatherFeed;

/// Source of one weather observation per evaluation
#[async_trait]
pub trait WeatherFeed: Send + Sync {
    async fn fetch_observation(&self, location: &Location) -> Result<WeatherObservation>;
}
