//! Data models for the drone weather checker
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates and display metadata
//! - Restriction: Airspace restrictions and proximity results
//! - Weather: Observations, thresholds and verdicts
//! - Report: The combined go/no-go report

pub mod location;
pub mod report;
pub mod restriction;
pub mod weather;

// Re-export all public types for convenient access
pub use location::{Coordinates, Location};
pub use report::FlightSafetyReport;
pub use restriction::{ProximityResult, RawRestriction, Restriction, ValidityKind, ValidityWindow};
pub use weather::{
    ForecastSample, ForecastStats, MAX_FORECAST_SAMPLES, ThresholdViolation, WeatherObservation,
    WeatherThresholds, WeatherVerdict, WindBreakpoints, WindForecast,
};
