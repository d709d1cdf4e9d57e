//! Weather observation, thresholds and verdict models

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Coordinates;

/// Upper bound on forecast samples kept with an observation
pub const MAX_FORECAST_SAMPLES: usize = 48;

/// Point weather observation for one evaluation cycle
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherObservation {
    /// When the observation was valid
    pub timestamp: DateTime<Utc>,
    /// Timezone of the observed location, for display only
    pub timezone: Tz,
    pub coordinates: Coordinates,
    /// Temperature in Celsius
    pub temperature_c: f64,
    /// Wind speed in km/h
    pub wind_speed_kmh: f64,
    /// Wind direction in degrees (0-360, where 0/360 is North)
    pub wind_direction_deg: u16,
    /// Visibility in kilometres
    pub visibility_km: f64,
    /// Precipitation amount in mm
    pub precipitation_mm: f64,
    /// Short-horizon wind forecast, if the feed supplied one
    pub forecast: Option<Vec<ForecastSample>>,
}

/// One hourly wind forecast sample
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct ForecastSample {
    pub time: DateTime<Utc>,
    /// Wind speed in km/h
    pub wind_speed_kmh: f64,
    /// Wind gust speed in km/h
    pub wind_gust_kmh: f64,
}

impl WeatherObservation {
    /// Attach a forecast series, keeping at most [`MAX_FORECAST_SAMPLES`] samples.
    #[must_use]
    pub fn with_forecast(mut self, mut samples: Vec<ForecastSample>) -> Self {
        samples.truncate(MAX_FORECAST_SAMPLES);
        self.forecast = Some(samples);
        self
    }

    /// Convert wind direction from degrees to cardinal direction
    #[must_use]
    pub fn wind_direction_to_cardinal(degrees: u16) -> &'static str {
        match degrees {
            0..=11 | 349..=360 => "N",
            12..=33 => "NNE",
            34..=56 => "NE",
            57..=78 => "ENE",
            79..=101 => "E",
            102..=123 => "ESE",
            124..=146 => "SE",
            147..=168 => "SSE",
            169..=191 => "S",
            192..=213 => "SSW",
            214..=236 => "SW",
            237..=258 => "WSW",
            259..=281 => "W",
            282..=303 => "WNW",
            304..=326 => "NW",
            327..=348 => "NNW",
            _ => "Unknown",
        }
    }

    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.1}°C", self.temperature_c)
    }

    /// Format wind information
    #[must_use]
    pub fn format_wind(&self) -> String {
        let direction = Self::wind_direction_to_cardinal(self.wind_direction_deg);
        format!("{:.1} km/h {}", self.wind_speed_kmh, direction)
    }

    /// Observation time in the location's own timezone
    #[must_use]
    pub fn format_local_time(&self) -> String {
        self.timestamp
            .with_timezone(&self.timezone)
            .format("%H:%M %Z")
            .to_string()
    }
}

/// Limits an observation must respect to be considered flyable.
///
/// All values use the crate's canonical units: km/h, km, mm and Celsius.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WeatherThresholds {
    pub max_wind_speed_kmh: f64,
    pub min_visibility_km: f64,
    pub max_precipitation_mm: f64,
    pub min_temp_c: f64,
    pub max_temp_c: f64,
    /// Breakpoints for the qualitative wind label
    pub wind_breakpoints_kmh: WindBreakpoints,
}

impl Default for WeatherThresholds {
    fn default() -> Self {
        Self {
            max_wind_speed_kmh: 25.0,
            min_visibility_km: 5.0,
            max_precipitation_mm: 0.0,
            min_temp_c: 4.4,
            max_temp_c: 35.0,
            wind_breakpoints_kmh: WindBreakpoints::default(),
        }
    }
}

/// Three increasing wind speeds separating the four wind labels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindBreakpoints {
    pub very_light_below: f64,
    pub light_below: f64,
    pub moderate_below: f64,
}

impl Default for WindBreakpoints {
    fn default() -> Self {
        Self {
            very_light_below: 8.0,
            light_below: 16.0,
            moderate_below: 24.0,
        }
    }
}

impl WindBreakpoints {
    #[must_use]
    pub fn is_increasing(&self) -> bool {
        self.very_light_below < self.light_below && self.light_below < self.moderate_below
    }
}

/// Qualitative wind label, ordered from calmest to strongest
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum WindForecast {
    VeryLight,
    Light,
    Moderate,
    Strong,
}

impl fmt::Display for WindForecast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindForecast::VeryLight => write!(f, "Very light winds, excellent conditions"),
            WindForecast::Light => write!(f, "Light winds, good conditions"),
            WindForecast::Moderate => write!(f, "Moderate winds, manageable"),
            WindForecast::Strong => write!(f, "Strong winds, challenging conditions"),
        }
    }
}

/// A single failed threshold check
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum ThresholdViolation {
    WindTooHigh { actual_kmh: f64, max_kmh: f64 },
    VisibilityTooLow { actual_km: f64, min_km: f64 },
    Precipitation { actual_mm: f64, max_mm: f64 },
    TooCold { actual_c: f64, min_c: f64 },
    TooHot { actual_c: f64, max_c: f64 },
}

impl fmt::Display for ThresholdViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThresholdViolation::WindTooHigh { actual_kmh, max_kmh } => write!(
                f,
                "Wind speed too high: {actual_kmh:.1} km/h (max: {max_kmh:.1} km/h)"
            ),
            ThresholdViolation::VisibilityTooLow { actual_km, min_km } => write!(
                f,
                "Visibility too low: {actual_km:.1} km (min: {min_km:.1} km)"
            ),
            ThresholdViolation::Precipitation { actual_mm, max_mm } => write!(
                f,
                "Precipitation present: {actual_mm:.1} mm (max: {max_mm:.1} mm)"
            ),
            ThresholdViolation::TooCold { actual_c, min_c } => write!(
                f,
                "Temperature too low: {actual_c:.1}°C (min: {min_c:.1}°C)"
            ),
            ThresholdViolation::TooHot { actual_c, max_c } => write!(
                f,
                "Temperature too high: {actual_c:.1}°C (max: {max_c:.1}°C)"
            ),
        }
    }
}

/// Mean wind over the forecast series
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ForecastStats {
    pub mean_wind_speed_kmh: f64,
    pub mean_wind_gust_kmh: f64,
    pub sample_count: usize,
}

/// Weather go/no-go with the reasons behind it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherVerdict {
    pub observation: WeatherObservation,
    pub flyable: bool,
    /// Failed checks in evaluation order
    pub violations: Vec<ThresholdViolation>,
    /// Human-readable form of `violations`, same order
    pub reasons: Vec<String>,
    pub wind_forecast: WindForecast,
    /// `None` when no forecast series was supplied
    pub forecast_stats: Option<ForecastStats>,
}
