//! Raw feed record to normalized restriction

use chrono::{DateTime, Utc};
use tracing::debug;

use super::validity::parse_validity_window;
use crate::geo::polygon_centroid_and_radius;
use crate::models::{RawRestriction, Restriction, ValidityKind};

/// Turns raw feed records into restrictions with a center, radius and validity window
pub struct RestrictionNormalizer;

impl RestrictionNormalizer {
    /// Normalize one record. Never fails: missing geometry leaves the center
    /// unresolved and an unreadable description gives a long-lived window.
    #[must_use]
    pub fn normalize(raw: &RawRestriction, now: DateTime<Utc>) -> Restriction {
        let (center, radius_km) = match raw.ring.as_deref() {
            Some(ring) => {
                let (center, radius_km) = polygon_centroid_and_radius(ring);
                if center.is_unknown() {
                    (None, 0.0)
                } else {
                    (Some(center), radius_km)
                }
            }
            None => (None, 0.0),
        };

        let validity = parse_validity_window(&raw.description, now);
        if validity.kind == ValidityKind::Permanent {
            debug!(id = %raw.id, "No validity dates found, assuming permanent restriction");
        }

        Restriction {
            id: raw.id.clone(),
            category: raw.category.clone(),
            name: raw.name.clone(),
            reason: raw.description.clone(),
            center,
            radius_km,
            validity,
        }
    }

    /// Normalize a whole feed snapshot, keeping feed order.
    #[must_use]
    pub fn normalize_all(raw: &[RawRestriction], now: DateTime<Utc>) -> Vec<Restriction> {
        raw.iter()
            .map(|record| Self::normalize(record, now))
            .collect()
    }
}
