//! Open-Meteo forecast API client

use async_trait::async_trait;
use chrono::DateTime;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

use super::WeatherFeed;
use crate::Result;
use crate::config::WeatherConfig;
use crate::error::DroneWeatherError;
use crate::http;
use crate::models::{ForecastSample, Location, WeatherObservation};

const FEED_NAME: &str = "weather";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<CurrentConditions>,
    hourly: Option<HourlySeries>,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    time: i64,
    temperature_2m: Option<f64>,
    wind_speed_10m: Option<f64>,
    wind_direction_10m: Option<f64>,
    /// Metres
    visibility: Option<f64>,
    precipitation: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct HourlySeries {
    time: Vec<i64>,
    #[serde(default)]
    wind_speed_10m: Vec<Option<f64>>,
    #[serde(default)]
    wind_gusts_10m: Vec<Option<f64>>,
}

fn required(value: Option<f64>, field: &str) -> Result<f64> {
    value.ok_or_else(|| DroneWeatherError::parse(format!("Weather response is missing current {field}")))
}

/// Like `required`, for magnitudes that cannot be below zero
fn non_negative(value: Option<f64>, field: &str) -> Result<f64> {
    let value = required(value, field)?;
    if value < 0.0 {
        return Err(DroneWeatherError::parse(format!(
            "Weather response has negative current {field}: {value}"
        )));
    }
    Ok(value)
}

/// Decode an Open-Meteo forecast response for `location`.
///
/// Every current value must be present and every magnitude but temperature
/// non-negative. The hourly series is optional; hours with a missing or
/// negative speed or gust are dropped.
pub fn parse_forecast_response(body: &str, location: &Location) -> Result<WeatherObservation> {
    let response: ForecastResponse = serde_json::from_str(body)
        .map_err(|e| DroneWeatherError::parse(format!("Failed to parse weather response: {e}")))?;

    let current = response
        .current
        .ok_or_else(|| DroneWeatherError::parse("Weather response has no current conditions"))?;

    let timestamp = DateTime::from_timestamp(current.time, 0)
        .ok_or_else(|| DroneWeatherError::parse(format!("Invalid observation time {}", current.time)))?;
    let wind_direction = required(current.wind_direction_10m, "wind_direction_10m")?;

    let observation = WeatherObservation {
        timestamp,
        timezone: location.timezone,
        coordinates: location.coordinates,
        temperature_c: required(current.temperature_2m, "temperature_2m")?,
        wind_speed_kmh: non_negative(current.wind_speed_10m, "wind_speed_10m")?,
        wind_direction_deg: wind_direction.round().rem_euclid(360.0) as u16,
        visibility_km: non_negative(current.visibility, "visibility")? / 1000.0,
        precipitation_mm: non_negative(current.precipitation, "precipitation")?,
        forecast: None,
    };

    let Some(hourly) = response.hourly else {
        return Ok(observation);
    };

    let samples: Vec<ForecastSample> = hourly
        .time
        .iter()
        .zip(hourly.wind_speed_10m.iter().zip(hourly.wind_gusts_10m.iter()))
        .filter_map(|(time, (speed, gust))| {
            Some(ForecastSample {
                time: DateTime::from_timestamp(*time, 0)?,
                wind_speed_kmh: (*speed).filter(|v| *v >= 0.0)?,
                wind_gust_kmh: (*gust).filter(|v| *v >= 0.0)?,
            })
        })
        .collect();

    Ok(observation.with_forecast(samples))
}

/// Weather feed backed by the Open-Meteo forecast endpoint
pub struct OpenMeteoWeatherFeed {
    client: ClientWithMiddleware,
    base_url: String,
    forecast_hours: u32,
}

impl OpenMeteoWeatherFeed {
    pub fn new(client: ClientWithMiddleware, base_url: impl Into<String>, forecast_hours: u32) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            forecast_hours,
        }
    }

    pub fn from_config(config: &WeatherConfig) -> Result<Self> {
        let client = http::build_client(
            Duration::from_secs(config.timeout_seconds),
            config.max_retries,
        )?;
        Ok(Self::new(client, config.url.clone(), config.forecast_hours))
    }

    fn request_url(&self, location: &Location) -> String {
        format!(
            "{}?latitude={:.4}&longitude={:.4}\
             &current=temperature_2m,wind_speed_10m,wind_direction_10m,visibility,precipitation\
             &hourly=wind_speed_10m,wind_gusts_10m&forecast_hours={}\
             &wind_speed_unit=kmh&temperature_unit=celsius&precipitation_unit=mm\
             &timeformat=unixtime&timezone=GMT",
            self.base_url,
            location.coordinates.latitude,
            location.coordinates.longitude,
            self.forecast_hours
        )
    }
}

#[async_trait]
impl WeatherFeed for OpenMeteoWeatherFeed {
    #[tracing::instrument(skip(self), fields(location = %location.name))]
    async fn fetch_observation(&self, location: &Location) -> Result<WeatherObservation> {
        info!(
            "Fetching weather for {} ({})",
            location.name,
            location.coordinates.format_coordinates()
        );

        let body = http::get_text(&self.client, FEED_NAME, &self.request_url(location)).await?;
        let observation = parse_forecast_response(&body, location)?;

        info!(
            "Current weather: {}, wind {}",
            observation.format_temperature(),
            observation.format_wind()
        );
        Ok(observation)
    }
}
