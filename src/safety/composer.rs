//! Merges the weather verdict and the restriction check into one report

use chrono::{DateTime, Utc};

use crate::models::{FlightSafetyReport, Location, ProximityResult, WeatherVerdict};

/// Build the final report. The flyable decision comes from the weather
/// verdict alone; restrictions only shape the justification.
#[must_use]
pub fn compose(
    proximity: ProximityResult,
    weather: WeatherVerdict,
    location: Location,
    generated_at: DateTime<Utc>,
) -> FlightSafetyReport {
    let flyable = weather.flyable;
    let justification = justification(&proximity, &weather);

    FlightSafetyReport {
        generated_at,
        location,
        weather,
        proximity,
        flyable,
        justification,
    }
}

fn justification(proximity: &ProximityResult, weather: &WeatherVerdict) -> String {
    if !weather.flyable {
        return format!("Not flyable: {}", weather.reasons.join("; "));
    }

    let base = format!("Good to fly: {}", weather.wind_forecast.to_string().to_lowercase());
    if !proximity.feed_available {
        format!("{base}; airspace was not checked, verify restrictions manually")
    } else if proximity.has_restrictions {
        format!(
            "{base}; {} active restriction(s) nearby, check their areas before flying",
            proximity.restrictions.len()
        )
    } else {
        base
    }
}
