//! Location model for geographic coordinates and metadata

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// WGS84 coordinates in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    /// Sentinel used by feeds that could not place a record on the map.
    pub const UNKNOWN: Coordinates = Coordinates {
        latitude: 0.0,
        longitude: 0.0,
    };

    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both components exactly zero means "never resolved", not the Gulf of Guinea.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }

    /// Whether both components are inside the valid WGS84 ranges
    #[must_use]
    pub fn is_in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A named point the checks are run for, with the timezone reports are shown in
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Location name (city, field, park...)
    pub name: String,
    pub coordinates: Coordinates,
    /// Display timezone; instants stay in UTC
    pub timezone: Tz,
}

impl Location {
    /// Create a new location shown in UTC
    #[must_use]
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            coordinates: Coordinates::new(latitude, longitude),
            timezone: Tz::UTC,
        }
    }

    #[must_use]
    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }
}
