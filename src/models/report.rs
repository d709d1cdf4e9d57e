//! Combined flight safety report handed to notifiers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

use super::{Location, ProximityResult, WeatherVerdict};

/// Go/no-go for one location at one point in time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightSafetyReport {
    pub generated_at: DateTime<Utc>,
    pub location: Location,
    pub weather: WeatherVerdict,
    pub proximity: ProximityResult,
    /// Overall decision; driven by weather alone
    pub flyable: bool,
    pub justification: String,
}

impl Display for FlightSafetyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let local = self.generated_at.with_timezone(&self.location.timezone);
        let observation = &self.weather.observation;

        writeln!(
            f,
            "Drone flight check for {} ({})",
            self.location.name,
            local.format("%A, %B %-d, %Y %H:%M %Z")
        )?;
        writeln!(
            f,
            "   {} {}",
            if self.flyable { "✅" } else { "❌" },
            self.justification
        )?;
        writeln!(f)?;
        writeln!(f, "Weather at {}", observation.format_local_time())?;
        writeln!(f, "   🌡️ Temperature: {}", observation.format_temperature())?;
        writeln!(f, "   💨 Wind: {}", observation.format_wind())?;
        writeln!(f, "   👁️ Visibility: {:.1} km", observation.visibility_km)?;
        writeln!(f, "   🌧️ Precipitation: {:.1} mm", observation.precipitation_mm)?;
        writeln!(f, "   📈 Outlook: {}", self.weather.wind_forecast)?;
        if let Some(stats) = &self.weather.forecast_stats {
            writeln!(
                f,
                "   📊 Next {}h average: wind {:.1} km/h, gusts {:.1} km/h",
                stats.sample_count, stats.mean_wind_speed_kmh, stats.mean_wind_gust_kmh
            )?;
        }
        for reason in &self.weather.reasons {
            writeln!(f, "   ⚠️ {reason}")?;
        }

        writeln!(f)?;
        writeln!(f, "Airspace")?;
        writeln!(f, "   {}", self.proximity.summary)?;
        for restriction in &self.proximity.restrictions {
            write!(f, "   🚫 {} [{}] {}", restriction.id, restriction.category, restriction.name)?;
            if !restriction.reason.is_empty() {
                write!(f, " - {}", restriction.reason)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
