//! Active and spatially relevant restrictions around a query point

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::geo::great_circle_distance_km;
use crate::models::{Coordinates, ProximityResult, Restriction};

/// True iff `now` falls inside the restriction's `[start, end)` window.
#[must_use]
pub fn is_currently_active(restriction: &Restriction, now: DateTime<Utc>) -> bool {
    restriction.validity.contains(now)
}

/// True iff the search circle and the restriction circle touch or overlap.
///
/// Restrictions whose center was never resolved are not relevant anywhere.
#[must_use]
pub fn is_spatially_relevant(
    restriction: &Restriction,
    query: Coordinates,
    search_radius_km: f64,
) -> bool {
    restriction.resolved_center().is_some_and(|center| {
        great_circle_distance_km(query, center) <= search_radius_km + restriction.radius_km
    })
}

pub struct ProximityFilter;

impl ProximityFilter {
    /// Keep restrictions that are both active at `now` and within reach of
    /// `query`, in the order the feed listed them.
    #[must_use]
    pub fn evaluate(
        restrictions: &[Restriction],
        query: Coordinates,
        search_radius_km: f64,
        now: DateTime<Utc>,
    ) -> ProximityResult {
        let matched: Vec<Restriction> = restrictions
            .iter()
            .filter(|restriction| is_currently_active(restriction, now))
            .filter(|restriction| is_spatially_relevant(restriction, query, search_radius_km))
            .cloned()
            .collect();

        debug!(
            total = restrictions.len(),
            matched = matched.len(),
            search_radius_km,
            "Filtered restrictions"
        );

        ProximityResult::checked(matched, search_radius_km, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ValidityKind, ValidityWindow};
    use chrono::{Duration, TimeZone};
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn restriction(id: &str, center: Option<Coordinates>, radius_km: f64) -> Restriction {
        Restriction {
            id: id.to_string(),
            category: "SECURITY".to_string(),
            name: "TEST".to_string(),
            reason: String::new(),
            center,
            radius_km,
            validity: ValidityWindow {
                start: now() - Duration::days(1),
                end: now() + Duration::days(1),
                kind: ValidityKind::Range,
            },
        }
    }

    const HOME: Coordinates = Coordinates {
        latitude: 40.0,
        longitude: -105.0,
    };
    const NEARBY: Coordinates = Coordinates {
        latitude: 40.2,
        longitude: -105.0,
    };

    #[test]
    fn test_circles_touching_is_relevant() {
        let d = great_circle_distance_km(HOME, NEARBY);
        let touching = restriction("touch", Some(NEARBY), d / 2.0);
        assert!(is_spatially_relevant(&touching, HOME, d / 2.0));

        let apart = restriction("apart", Some(NEARBY), d / 2.0 - 1e-6);
        assert!(!is_spatially_relevant(&apart, HOME, d / 2.0));
    }

    #[rstest]
    #[case(None)]
    #[case(Some(Coordinates::UNKNOWN))]
    fn test_unresolved_center_is_never_relevant(#[case] center: Option<Coordinates>) {
        let unresolved = restriction("nowhere", center, 20_000.0);
        assert!(!is_spatially_relevant(&unresolved, HOME, 20_000.0));
        assert!(!is_spatially_relevant(&unresolved, Coordinates::UNKNOWN, 20_000.0));
    }

    #[rstest]
    #[case(Duration::hours(1), Duration::hours(2), false)]
    #[case(Duration::hours(-2), Duration::hours(-1), false)]
    #[case(Duration::zero(), Duration::hours(1), true)]
    #[case(Duration::hours(-1), Duration::zero(), false)]
    fn test_active_window(
        #[case] start_offset: Duration,
        #[case] end_offset: Duration,
        #[case] expected: bool,
    ) {
        let mut candidate = restriction("r", Some(NEARBY), 1.0);
        candidate.validity.start = now() + start_offset;
        candidate.validity.end = now() + end_offset;
        assert_eq!(is_currently_active(&candidate, now()), expected);
    }

    #[test]
    fn test_evaluate_filters_and_keeps_order() {
        let mut future = restriction("future", Some(HOME), 5.0);
        future.validity.start = now() + Duration::hours(3);

        let far = restriction(
            "far",
            Some(Coordinates::new(-33.8688, 151.2093)),
            5.0,
        );

        let restrictions = vec![
            restriction("second-listed-first", Some(NEARBY), 1.0),
            future,
            far,
            restriction("unresolved", None, 50.0),
            restriction("at-home", Some(HOME), 0.5),
        ];

        let result = ProximityFilter::evaluate(&restrictions, HOME, 40.0, now());
        let ids: Vec<&str> = result.restrictions.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["second-listed-first", "at-home"]);
        assert!(result.has_restrictions);
        assert!(result.feed_available);
        assert_eq!(result.search_radius_km, 40.0);
        assert_eq!(result.checked_at, now());
    }

    #[test]
    fn test_evaluate_empty_is_clear() {
        let result = ProximityFilter::evaluate(&[], HOME, 40.0, now());
        assert!(!result.has_restrictions);
        assert!(result.restrictions.is_empty());
        assert!(result.summary.contains("clear to fly"));
    }
}
