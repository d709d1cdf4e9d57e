//! Airspace restriction records, raw and normalized

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Coordinates;

/// A restriction record as it arrives from a feed, before any interpretation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawRestriction {
    /// Feed identifier (NOTAM key for FAA records)
    pub id: String,
    /// Category or legal class, e.g. "SECURITY", "HAZARDS"
    pub category: String,
    /// Short name, usually the state or area the record belongs to
    pub name: String,
    /// Free text carrying the validity description
    pub description: String,
    /// Outer ring in projected (Web Mercator) x/y pairs, if the feed had any geometry
    pub ring: Option<Vec<[f64; 2]>>,
}

/// Time interval a restriction is in force, `[start, end)`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidityWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub kind: ValidityKind,
}

/// How a validity window was obtained from the description text
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ValidityKind {
    /// Both ends of a "... through ..." range were parsed
    Range,
    /// A single date, valid for the 24 hours starting at it
    SingleDay,
    /// Nothing parseable; assumed long-lived
    Permanent,
}

impl ValidityWindow {
    /// True iff `now` lies in `[start, end)`
    #[must_use]
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        self.start <= now && now < self.end
    }
}

/// A normalized restriction with a WGS84 center, a radius and a validity window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Restriction {
    pub id: String,
    pub category: String,
    pub name: String,
    /// Free-text reason as published
    pub reason: String,
    /// `None` when the record had no usable geometry
    pub center: Option<Coordinates>,
    /// Bounding radius around `center` in kilometres
    pub radius_km: f64,
    pub validity: ValidityWindow,
}

impl Restriction {
    /// The center, unless the record could not be placed on the map.
    #[must_use]
    pub fn resolved_center(&self) -> Option<Coordinates> {
        self.center.filter(|center| !center.is_unknown())
    }
}

/// Outcome of filtering restrictions around a query point
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProximityResult {
    /// True when restrictions were found, or when the check itself could not be done
    pub has_restrictions: bool,
    /// Active and spatially relevant restrictions, in feed order
    pub restrictions: Vec<Restriction>,
    pub search_radius_km: f64,
    /// False when the feed could not be fetched and nothing was checked
    pub feed_available: bool,
    pub checked_at: DateTime<Utc>,
    pub summary: String,
}

impl ProximityResult {
    /// Build a result from a completed check.
    #[must_use]
    pub fn checked(
        restrictions: Vec<Restriction>,
        search_radius_km: f64,
        checked_at: DateTime<Utc>,
    ) -> Self {
        let summary = if restrictions.is_empty() {
            format!("No restrictions found within {search_radius_km:.1} km - clear to fly")
        } else {
            format!(
                "{} restriction(s) found within {search_radius_km:.1} km - check locations before flying",
                restrictions.len()
            )
        };

        Self {
            has_restrictions: !restrictions.is_empty(),
            restrictions,
            search_radius_km,
            feed_available: true,
            checked_at,
            summary,
        }
    }

    /// Result used when the restriction feed failed; never reads as "clear".
    #[must_use]
    pub fn unavailable(search_radius_km: f64, checked_at: DateTime<Utc>) -> Self {
        Self {
            has_restrictions: true,
            restrictions: Vec::new(),
            search_radius_km,
            feed_available: false,
            checked_at,
            summary: "Restriction check failed - verify airspace restrictions manually before flying"
                .to_string(),
        }
    }
}
