//! Configuration management for the drone weather checker
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::DroneWeatherError;
use crate::models::{Location, WeatherThresholds};
use anyhow::{Context, Result};
use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DroneWeatherConfig {
    /// Where the pilot flies from
    pub home: HomeConfig,
    /// Airspace restriction feed settings
    pub restrictions: RestrictionsConfig,
    /// Weather feed settings
    pub weather: WeatherConfig,
    /// Go/no-go limits
    pub thresholds: WeatherThresholds,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Report delivery; no email is sent when absent
    pub email: Option<EmailConfig>,
}

/// Home location settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    /// IANA timezone used when showing times, e.g. "America/Chicago"
    #[serde(default = "default_timezone")]
    pub timezone: Tz,
}

/// Restriction feed settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestrictionsConfig {
    /// WFS endpoint returning GeoJSON in EPSG:3857
    #[serde(default = "default_restrictions_url")]
    pub url: String,
    /// Search radius around home in kilometers
    #[serde(default = "default_search_radius")]
    pub search_radius_km: f64,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Maximum number of retries for failed requests
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Open-Meteo forecast endpoint
    #[serde(default = "default_weather_url")]
    pub url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Maximum number of retries for failed requests
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Hours of hourly wind forecast to request
    #[serde(default = "default_forecast_hours")]
    pub forecast_hours: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// SMTP settings for report delivery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_server: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
    pub to: String,
}

// Default value functions
fn default_timezone() -> Tz {
    Tz::UTC
}

fn default_restrictions_url() -> String {
    "https://tfr.faa.gov/geoserver/TFR/ows?service=WFS&version=1.1.0&request=GetFeature&typeName=TFR:V_TFR_LOC&maxFeatures=300&outputFormat=application/json&srsname=EPSG:3857".to_string()
}

fn default_search_radius() -> f64 {
    40.0
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_weather_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_forecast_hours() -> u32 {
    24
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            timezone: default_timezone(),
        }
    }
}

impl Default for RestrictionsConfig {
    fn default() -> Self {
        Self {
            url: default_restrictions_url(),
            search_radius_km: default_search_radius(),
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            url: default_weather_url(),
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            forecast_hours: default_forecast_hours(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl HomeConfig {
    /// The configured home as a model location
    #[must_use]
    pub fn location(&self) -> Location {
        Location::new(self.name.clone(), self.latitude, self.longitude)
            .with_timezone(self.timezone)
    }
}

impl DroneWeatherConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // DRONEWEATHER_HOME__NAME overrides home.name
        builder = builder.add_source(
            Environment::with_prefix("DRONEWEATHER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: DroneWeatherConfig = settings
            .try_deserialize()
            .with_context(|| format!("Failed to deserialize configuration from {}", config_file.display()))?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("droneweather").join("config.toml"))
    }

    /// Apply default values to zeroed or empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.restrictions.url.is_empty() {
            self.restrictions.url = default_restrictions_url();
        }
        if self.restrictions.search_radius_km <= 0.0 {
            self.restrictions.search_radius_km = default_search_radius();
        }
        if self.restrictions.timeout_seconds == 0 {
            self.restrictions.timeout_seconds = default_timeout();
        }
        if self.weather.url.is_empty() {
            self.weather.url = default_weather_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_timeout();
        }
        if self.weather.forecast_hours == 0 {
            self.weather.forecast_hours = default_forecast_hours();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_home()?;
        self.validate_numeric_ranges()?;
        self.validate_thresholds()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_home(&self) -> Result<()> {
        if self.home.name.trim().is_empty() {
            return Err(DroneWeatherError::config("Home location name must be set").into());
        }

        let coordinates = self.home.location().coordinates;
        if coordinates.is_unknown() {
            return Err(DroneWeatherError::config(
                "Home latitude and longitude must be set",
            )
            .into());
        }
        if !coordinates.is_in_range() {
            return Err(DroneWeatherError::config(format!(
                "Home coordinates out of range: {}",
                coordinates.format_coordinates()
            ))
            .into());
        }

        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.restrictions.search_radius_km > 500.0 {
            return Err(DroneWeatherError::config("Search radius cannot exceed 500 km").into());
        }

        if self.restrictions.timeout_seconds > 300 || self.weather.timeout_seconds > 300 {
            return Err(DroneWeatherError::config("Feed timeout cannot exceed 300 seconds").into());
        }

        if self.restrictions.max_retries > 10 || self.weather.max_retries > 10 {
            return Err(DroneWeatherError::config("Feed max retries cannot exceed 10").into());
        }

        if !(1..=48).contains(&self.weather.forecast_hours) {
            return Err(DroneWeatherError::config(
                "Forecast hours must be between 1 and 48",
            )
            .into());
        }

        Ok(())
    }

    fn validate_thresholds(&self) -> Result<()> {
        let thresholds = &self.thresholds;

        if thresholds.max_wind_speed_kmh < 0.0
            || thresholds.min_visibility_km < 0.0
            || thresholds.max_precipitation_mm < 0.0
        {
            return Err(DroneWeatherError::config(
                "Wind, visibility and precipitation thresholds cannot be negative",
            )
            .into());
        }

        if thresholds.min_temp_c >= thresholds.max_temp_c {
            return Err(DroneWeatherError::config(format!(
                "Minimum temperature ({:.1}°C) must be below maximum temperature ({:.1}°C)",
                thresholds.min_temp_c, thresholds.max_temp_c
            ))
            .into());
        }

        if !thresholds.wind_breakpoints_kmh.is_increasing() {
            return Err(DroneWeatherError::config(
                "Wind breakpoints must be strictly increasing",
            )
            .into());
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(DroneWeatherError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(DroneWeatherError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Restriction feed", &self.restrictions.url),
            ("Weather API", &self.weather.url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(DroneWeatherError::config(format!(
                    "{name} URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if let Some(email) = &self.email {
            if email.smtp_server.is_empty() || email.from.is_empty() || email.to.is_empty() {
                return Err(DroneWeatherError::config(
                    "Email settings need smtp_server, from and to",
                )
                .into());
            }
        }

        Ok(())
    }
}
