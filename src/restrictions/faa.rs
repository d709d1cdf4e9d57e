//! FAA temporary flight restriction feed (GeoServer WFS, GeoJSON output)

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::RestrictionFeed;
use crate::config::RestrictionsConfig;
use crate::error::DroneWeatherError;
use crate::http;
use crate::models::RawRestriction;
use crate::Result;

const FEED_NAME: &str = "restriction";

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Properties,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    #[serde(rename = "NOTAM_KEY")]
    notam_key: Option<String>,
    #[serde(rename = "LEGAL")]
    legal: Option<String>,
    #[serde(rename = "TITLE")]
    title: Option<String>,
    #[serde(rename = "STATE")]
    state: Option<String>,
}

/// Positions are read loosely so 3D coordinates do not fail the whole feed
type Ring = Vec<Vec<f64>>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Geometry {
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
    #[serde(other)]
    Unsupported,
}

impl Geometry {
    /// Outer ring(s) as x/y pairs; `None` when there is nothing to place.
    fn outer_ring(&self) -> Option<Vec<[f64; 2]>> {
        let rings: Vec<&Ring> = match self {
            Geometry::Polygon { coordinates } => coordinates.first().into_iter().collect(),
            Geometry::MultiPolygon { coordinates } => {
                coordinates.iter().filter_map(|polygon| polygon.first()).collect()
            }
            Geometry::Unsupported => Vec::new(),
        };

        let points: Vec<[f64; 2]> = rings
            .into_iter()
            .flatten()
            .filter_map(|position| match position.as_slice() {
                [x, y, ..] => Some([*x, *y]),
                _ => None,
            })
            .collect();

        (!points.is_empty()).then_some(points)
    }
}

/// Decode a GeoJSON FeatureCollection into raw restriction records.
///
/// Features without a NOTAM key or legal class are skipped.
pub fn parse_feature_collection(body: &str) -> Result<Vec<RawRestriction>> {
    let collection: FeatureCollection = serde_json::from_str(body)
        .map_err(|e| DroneWeatherError::parse(format!("Failed to parse restriction GeoJSON: {e}")))?;

    let total = collection.features.len();
    let restrictions: Vec<RawRestriction> = collection
        .features
        .into_iter()
        .filter_map(|feature| {
            let id = feature.properties.notam_key.filter(|id| !id.is_empty())?;
            let category = feature.properties.legal.filter(|legal| !legal.is_empty())?;

            Some(RawRestriction {
                id,
                category,
                name: feature.properties.state.unwrap_or_default(),
                description: feature.properties.title.unwrap_or_default(),
                ring: feature.geometry.as_ref().and_then(Geometry::outer_ring),
            })
        })
        .collect();

    if restrictions.len() < total {
        debug!(
            skipped = total - restrictions.len(),
            "Skipped features without identifier or category"
        );
    }

    Ok(restrictions)
}

/// Restriction feed backed by the FAA TFR GeoServer
pub struct FaaRestrictionFeed {
    client: ClientWithMiddleware,
    url: String,
}

impl FaaRestrictionFeed {
    pub fn new(client: ClientWithMiddleware, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Build the feed with its own retrying client from configuration
    pub fn from_config(config: &RestrictionsConfig) -> Result<Self> {
        let client = http::build_client(
            Duration::from_secs(config.timeout_seconds),
            config.max_retries,
        )?;
        Ok(Self::new(client, config.url.clone()))
    }
}

#[async_trait]
impl RestrictionFeed for FaaRestrictionFeed {
    #[tracing::instrument(skip(self), fields(url = %self.url))]
    async fn fetch_restrictions(&self) -> Result<Vec<RawRestriction>> {
        info!("Fetching airspace restrictions");

        let body = http::get_text(&self.client, FEED_NAME, &self.url).await?;
        let restrictions = parse_feature_collection(&body)?;

        info!("Fetched {} airspace restrictions", restrictions.len());
        Ok(restrictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {
                    "NOTAM_KEY": "5/0210-1-FDC-F",
                    "LEGAL": "SECURITY",
                    "TITLE": "VIEQUES, PR, Monday, January 13, 2025 through Friday, December 19, 2025 UTC",
                    "STATE": "PR"
                },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [
                        [[-7282000.0, 2066000.0], [-7281000.0, 2066000.0], [-7281000.0, 2067000.0], [-7282000.0, 2066000.0]],
                        [[-7281800.0, 2066200.0], [-7281700.0, 2066200.0], [-7281700.0, 2066300.0]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": {
                    "NOTAM_KEY": "4/1111-1-FDC-F",
                    "LEGAL": "HAZARDS",
                    "TITLE": "BOISE, ID, Wildfire",
                    "STATE": "ID"
                },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[-12950000.0, 5400000.0, 0.0], [-12949000.0, 5400000.0, 0.0]]],
                        [[[-12940000.0, 5410000.0], [-12939000.0, 5410000.0]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": {
                    "NOTAM_KEY": "4/2222-1-FDC-F",
                    "LEGAL": "SPACE OPERATIONS",
                    "TITLE": "CAPE CANAVERAL, FL",
                    "STATE": "FL"
                },
                "geometry": { "type": "Point", "coordinates": [-8977000.0, 3311000.0] }
            },
            {
                "type": "Feature",
                "properties": { "NOTAM_KEY": "", "LEGAL": "SECURITY", "TITLE": "no key" },
                "geometry": null
            },
            {
                "type": "Feature",
                "properties": { "NOTAM_KEY": "4/3333-1-FDC-F", "TITLE": "no legal class" },
                "geometry": null
            },
            {
                "type": "Feature",
                "properties": { "NOTAM_KEY": "4/4444-1-FDC-F", "LEGAL": "VIP" }
            }
        ]
    }"#;

    #[test]
    fn test_parse_feature_collection() {
        let restrictions = parse_feature_collection(SAMPLE).unwrap();
        let ids: Vec<&str> = restrictions.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            ["5/0210-1-FDC-F", "4/1111-1-FDC-F", "4/2222-1-FDC-F", "4/4444-1-FDC-F"]
        );

        let vieques = &restrictions[0];
        assert_eq!(vieques.category, "SECURITY");
        assert_eq!(vieques.name, "PR");
        assert!(vieques.description.starts_with("VIEQUES, PR, Monday"));
        // Only the outer ring is used; holes are ignored
        assert_eq!(vieques.ring.as_ref().map(Vec::len), Some(4));
    }

    #[test]
    fn test_multipolygon_concatenates_outer_rings() {
        let restrictions = parse_feature_collection(SAMPLE).unwrap();
        let ring = restrictions[1].ring.as_ref().unwrap();
        assert_eq!(ring.len(), 4);
        assert_eq!(ring[0], [-12_950_000.0, 5_400_000.0]);
        assert_eq!(ring[3], [-12_939_000.0, 5_410_000.0]);
    }

    #[test]
    fn test_unsupported_or_missing_geometry_has_no_ring() {
        let restrictions = parse_feature_collection(SAMPLE).unwrap();
        assert!(restrictions[2].ring.is_none());
        assert!(restrictions[3].ring.is_none());
        assert_eq!(restrictions[3].description, "");
    }

    #[test]
    fn test_empty_collection() {
        let restrictions =
            parse_feature_collection(r#"{"type": "FeatureCollection", "features": []}"#).unwrap();
        assert!(restrictions.is_empty());
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        let error = parse_feature_collection("<html>Service Unavailable</html>").unwrap_err();
        assert!(matches!(error, DroneWeatherError::Parse { .. }));
    }
}
