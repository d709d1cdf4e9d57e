//! Geometry helpers for restriction proximity checks
//!
//! Pure functions only: great-circle distance, Web Mercator inversion and
//! the circle approximation used for restriction polygons. All distances
//! are kilometres.

use haversine::{Location as HaversineLocation, Units, distance};

use crate::models::Coordinates;

/// Half the Web Mercator world width in metres (EPSG:3857)
const WEB_MERCATOR_HALF_WORLD: f64 = 20_037_508.34;

/// Great-circle distance in kilometres on a spherical Earth.
///
/// The endpoints are put in a fixed order first so that swapping them
/// yields the bit-identical result.
#[must_use]
pub fn great_circle_distance_km(from: Coordinates, to: Coordinates) -> f64 {
    let (from, to) = if (from.latitude, from.longitude) <= (to.latitude, to.longitude) {
        (from, to)
    } else {
        (to, from)
    };
    let from_haversine = HaversineLocation {
        latitude: from.latitude,
        longitude: from.longitude,
    };
    let to_haversine = HaversineLocation {
        latitude: to.latitude,
        longitude: to.longitude,
    };
    distance(from_haversine, to_haversine, Units::Kilometers)
}

/// Invert a Web Mercator (EPSG:3857) x/y pair to WGS84 degrees.
#[must_use]
pub fn inverse_web_mercator(x: f64, y: f64) -> Coordinates {
    let longitude = x / WEB_MERCATOR_HALF_WORLD * 180.0;
    let projected_lat = y / WEB_MERCATOR_HALF_WORLD * 180.0;
    let latitude = (2.0 * (projected_lat.to_radians()).exp().atan() - std::f64::consts::FRAC_PI_2)
        .to_degrees();

    Coordinates {
        latitude,
        longitude,
    }
}

/// Approximate a projected polygon ring by a circle.
///
/// The center is the plain average of the inverse-projected vertices, not an
/// area-weighted centroid, so concave or unevenly sampled rings drift toward
/// their densest side. A closed ring's repeated first vertex is counted twice.
/// The radius is the largest great-circle distance from that center to any
/// vertex. An empty ring yields `(Coordinates::UNKNOWN, 0.0)`.
#[must_use]
pub fn polygon_centroid_and_radius(ring: &[[f64; 2]]) -> (Coordinates, f64) {
    if ring.is_empty() {
        return (Coordinates::UNKNOWN, 0.0);
    }

    let vertices: Vec<Coordinates> = ring
        .iter()
        .map(|[x, y]| inverse_web_mercator(*x, *y))
        .collect();

    let count = vertices.len() as f64;
    let center = Coordinates {
        latitude: vertices.iter().map(|v| v.latitude).sum::<f64>() / count,
        longitude: vertices.iter().map(|v| v.longitude).sum::<f64>() / count,
    };

    let radius_km = vertices
        .iter()
        .map(|vertex| great_circle_distance_km(center, *vertex))
        .fold(0.0, f64::max);

    (center, radius_km)
}
