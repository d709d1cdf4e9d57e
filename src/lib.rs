//! `DroneWeather` - go/no-go checks for recreational drone flights
//!
//! This library fetches airspace restrictions and current weather for a
//! home location, normalizes both into one frame of reference and combines
//! them into a flight safety report.

pub mod config;
pub mod email;
pub mod error;
pub mod geo;
pub mod http;
pub mod logging;
pub mod models;
pub mod restrictions;
pub mod safety;
pub mod weather;

// Re-export core types for public API
pub use config::DroneWeatherConfig;
pub use email::{EmailNotifier, Notifier};
pub use error::DroneWeatherError;
pub use models::{
    Coordinates, FlightSafetyReport, Location, ProximityResult, RawRestriction, Restriction,
    WeatherObservation, WeatherThresholds, WeatherVerdict,
};
pub use restrictions::{FaaRestrictionFeed, ProximityFilter, RestrictionFeed, RestrictionNormalizer};
pub use safety::FlightSafetyEvaluator;
pub use weather::{OpenMeteoWeatherFeed, WeatherEvaluator, WeatherFeed};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, DroneWeatherError>;
