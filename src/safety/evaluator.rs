//! One full flight safety evaluation: fetch, normalize, filter, evaluate, compose

use chrono::{DateTime, Utc};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::composer::compose;
use crate::config::DroneWeatherConfig;
use crate::error::DroneWeatherError;
use crate::models::{FlightSafetyReport, Location, ProximityResult, WeatherThresholds};
use crate::restrictions::{
    FaaRestrictionFeed, ProximityFilter, RestrictionFeed, RestrictionNormalizer,
};
use crate::weather::{OpenMeteoWeatherFeed, WeatherEvaluator, WeatherFeed};
use crate::Result;

const DEFAULT_SEARCH_RADIUS_KM: f64 = 40.0;
const DEFAULT_FEED_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs evaluations for one home location against injected feeds
pub struct FlightSafetyEvaluator {
    restriction_feed: Arc<dyn RestrictionFeed>,
    weather_feed: Arc<dyn WeatherFeed>,
    home: Location,
    search_radius_km: f64,
    thresholds: WeatherThresholds,
    restriction_timeout: Duration,
    weather_timeout: Duration,
}

impl FlightSafetyEvaluator {
    pub fn new(
        restriction_feed: Arc<dyn RestrictionFeed>,
        weather_feed: Arc<dyn WeatherFeed>,
        home: Location,
    ) -> Self {
        Self {
            restriction_feed,
            weather_feed,
            home,
            search_radius_km: DEFAULT_SEARCH_RADIUS_KM,
            thresholds: WeatherThresholds::default(),
            restriction_timeout: DEFAULT_FEED_TIMEOUT,
            weather_timeout: DEFAULT_FEED_TIMEOUT,
        }
    }

    /// Wire the FAA and Open-Meteo feeds from configuration
    pub fn from_config(config: &DroneWeatherConfig) -> Result<Self> {
        let restriction_feed = Arc::new(FaaRestrictionFeed::from_config(&config.restrictions)?);
        let weather_feed = Arc::new(OpenMeteoWeatherFeed::from_config(&config.weather)?);

        Ok(Self::new(restriction_feed, weather_feed, config.home.location())
            .with_search_radius(config.restrictions.search_radius_km)
            .with_thresholds(config.thresholds.clone())
            .with_timeouts(
                Duration::from_secs(config.restrictions.timeout_seconds),
                Duration::from_secs(config.weather.timeout_seconds),
            ))
    }

    #[must_use]
    pub fn with_search_radius(mut self, search_radius_km: f64) -> Self {
        self.search_radius_km = search_radius_km;
        self
    }

    #[must_use]
    pub fn with_thresholds(mut self, thresholds: WeatherThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    #[must_use]
    pub fn with_timeouts(mut self, restriction: Duration, weather: Duration) -> Self {
        self.restriction_timeout = restriction;
        self.weather_timeout = weather;
        self
    }

    /// Evaluate flight safety at `now`.
    ///
    /// Both feeds are fetched concurrently and both are awaited. A failed
    /// restriction feed degrades to a "check manually" result; a failed
    /// weather feed fails the whole evaluation.
    #[tracing::instrument(skip(self), fields(location = %self.home.name))]
    pub async fn evaluate(&self, now: DateTime<Utc>) -> Result<FlightSafetyReport> {
        let (restrictions, observation) = tokio::join!(
            bounded(
                "restriction",
                self.restriction_timeout,
                self.restriction_feed.fetch_restrictions()
            ),
            bounded(
                "weather",
                self.weather_timeout,
                self.weather_feed.fetch_observation(&self.home)
            ),
        );

        let proximity = match restrictions {
            Ok(raw) => {
                let normalized = RestrictionNormalizer::normalize_all(&raw, now);
                ProximityFilter::evaluate(
                    &normalized,
                    self.home.coordinates,
                    self.search_radius_km,
                    now,
                )
            }
            Err(e) => {
                warn!("Restriction check unavailable: {e}");
                ProximityResult::unavailable(self.search_radius_km, now)
            }
        };

        let observation = observation?;
        let verdict = WeatherEvaluator::evaluate(&observation, &self.thresholds);

        if verdict.flyable {
            info!("Conditions are flyable: {}", verdict.wind_forecast);
        } else {
            for reason in &verdict.reasons {
                info!("Weather limit exceeded: {reason}");
            }
        }

        Ok(compose(proximity, verdict, self.home.clone(), now))
    }
}

async fn bounded<T>(
    feed: &str,
    limit: Duration,
    request: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(limit, request)
        .await
        .map_err(|_| DroneWeatherError::timeout(feed, limit.as_secs()))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinates, RawRestriction, WeatherObservation};
    use async_trait::async_trait;
    use chrono::TimeZone;

    struct SlowRestrictions(Duration);

    #[async_trait]
    impl RestrictionFeed for SlowRestrictions {
        async fn fetch_restrictions(&self) -> Result<Vec<RawRestriction>> {
            tokio::time::sleep(self.0).await;
            Ok(Vec::new())
        }
    }

    struct FixedWeather(Option<WeatherObservation>);

    #[async_trait]
    impl WeatherFeed for FixedWeather {
        async fn fetch_observation(&self, _location: &Location) -> Result<WeatherObservation> {
            self.0
                .clone()
                .ok_or_else(|| DroneWeatherError::fetch("weather", "connection refused"))
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 15, 0, 0).unwrap()
    }

    fn calm() -> WeatherObservation {
        WeatherObservation {
            timestamp: now(),
            timezone: chrono_tz::UTC,
            coordinates: Coordinates::new(39.74, -104.99),
            temperature_c: 18.0,
            wind_speed_kmh: 6.0,
            wind_direction_deg: 45,
            visibility_km: 20.0,
            precipitation_mm: 0.0,
            forecast: None,
        }
    }

    fn home() -> Location {
        Location::new("Home", 39.74, -104.99)
    }

    #[tokio::test]
    async fn test_slow_restriction_feed_degrades() {
        let evaluator = FlightSafetyEvaluator::new(
            Arc::new(SlowRestrictions(Duration::from_secs(5))),
            Arc::new(FixedWeather(Some(calm()))),
            home(),
        )
        .with_timeouts(Duration::from_millis(20), Duration::from_secs(5));

        let report = evaluator.evaluate(now()).await.unwrap();
        assert!(report.flyable);
        assert!(!report.proximity.feed_available);
        assert!(report.proximity.has_restrictions);
        assert!(report.proximity.summary.contains("manually"));
    }

    #[tokio::test]
    async fn test_weather_failure_aborts() {
        let evaluator = FlightSafetyEvaluator::new(
            Arc::new(SlowRestrictions(Duration::ZERO)),
            Arc::new(FixedWeather(None)),
            home(),
        );

        let error = evaluator.evaluate(now()).await.unwrap_err();
        assert!(matches!(error, DroneWeatherError::Fetch { .. }));
        assert!(error.is_transient());
    }

    #[tokio::test]
    async fn test_report_carries_home_and_time() {
        let home = home().with_timezone(chrono_tz::America::Denver);
        let evaluator = FlightSafetyEvaluator::new(
            Arc::new(SlowRestrictions(Duration::ZERO)),
            Arc::new(FixedWeather(Some(calm()))),
            home.clone(),
        )
        .with_search_radius(25.0);

        let report = evaluator.evaluate(now()).await.unwrap();
        assert_eq!(report.location, home);
        assert_eq!(report.generated_at, now());
        assert_eq!(report.proximity.search_radius_km, 25.0);
        assert!(!report.proximity.has_restrictions);
    }

    #[tokio::test]
    async fn test_timeout_error_names_feed() {
        let result = bounded(
            "weather",
            Duration::from_millis(10),
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            },
        )
        .await;
        let error = result.unwrap_err();
        assert!(matches!(error, DroneWeatherError::Timeout { .. }));
        assert!(error.to_string().starts_with("weather feed timed out"));
    }
}
