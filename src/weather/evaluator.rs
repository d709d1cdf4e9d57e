//! Threshold checks turning an observation into a go/no-go verdict

use tracing::debug;

use crate::models::{
    ForecastSample, ForecastStats, ThresholdViolation, WeatherObservation, WeatherThresholds,
    WeatherVerdict, WindBreakpoints, WindForecast,
};

pub struct WeatherEvaluator;

impl WeatherEvaluator {
    /// Check an observation against every threshold.
    ///
    /// Checks always run in the order wind, visibility, precipitation, minimum
    /// temperature, maximum temperature, and all of them run even after one
    /// fails, so `reasons` lists every violation in that order.
    #[must_use]
    pub fn evaluate(observation: &WeatherObservation, thresholds: &WeatherThresholds) -> WeatherVerdict {
        let mut violations = Vec::new();

        if observation.wind_speed_kmh > thresholds.max_wind_speed_kmh {
            violations.push(ThresholdViolation::WindTooHigh {
                actual_kmh: observation.wind_speed_kmh,
                max_kmh: thresholds.max_wind_speed_kmh,
            });
        }

        if observation.visibility_km < thresholds.min_visibility_km {
            violations.push(ThresholdViolation::VisibilityTooLow {
                actual_km: observation.visibility_km,
                min_km: thresholds.min_visibility_km,
            });
        }

        if observation.precipitation_mm > thresholds.max_precipitation_mm {
            violations.push(ThresholdViolation::Precipitation {
                actual_mm: observation.precipitation_mm,
                max_mm: thresholds.max_precipitation_mm,
            });
        }

        if observation.temperature_c < thresholds.min_temp_c {
            violations.push(ThresholdViolation::TooCold {
                actual_c: observation.temperature_c,
                min_c: thresholds.min_temp_c,
            });
        }

        if observation.temperature_c > thresholds.max_temp_c {
            violations.push(ThresholdViolation::TooHot {
                actual_c: observation.temperature_c,
                max_c: thresholds.max_temp_c,
            });
        }

        let reasons: Vec<String> = violations.iter().map(ToString::to_string).collect();
        let wind_forecast =
            classify_wind(observation.wind_speed_kmh, &thresholds.wind_breakpoints_kmh);
        let forecast_stats = observation.forecast.as_deref().and_then(forecast_stats);

        debug!(
            violations = violations.len(),
            wind = ?wind_forecast,
            "Evaluated weather observation"
        );

        WeatherVerdict {
            observation: observation.clone(),
            flyable: violations.is_empty(),
            violations,
            reasons,
            wind_forecast,
            forecast_stats,
        }
    }
}

/// Step function from current wind speed to a wind label
#[must_use]
pub fn classify_wind(wind_speed_kmh: f64, breakpoints: &WindBreakpoints) -> WindForecast {
    if wind_speed_kmh < breakpoints.very_light_below {
        WindForecast::VeryLight
    } else if wind_speed_kmh < breakpoints.light_below {
        WindForecast::Light
    } else if wind_speed_kmh < breakpoints.moderate_below {
        WindForecast::Moderate
    } else {
        WindForecast::Strong
    }
}

/// Mean wind and gust over a series; `None` for an empty series
#[must_use]
pub fn forecast_stats(samples: &[ForecastSample]) -> Option<ForecastStats> {
    if samples.is_empty() {
        return None;
    }

    let count = samples.len() as f64;
    Some(ForecastStats {
        mean_wind_speed_kmh: samples.iter().map(|s| s.wind_speed_kmh).sum::<f64>() / count,
        mean_wind_gust_kmh: samples.iter().map(|s| s.wind_gust_kmh).sum::<f64>() / count,
        sample_count: samples.len(),
    })
}
