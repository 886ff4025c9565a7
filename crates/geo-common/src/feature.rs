//! GeoJSON feature types.
//!
//! Only the subset the dashboard produces is modelled: point features for
//! fetched data and polygon features for the static zone catalog.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Flat property bag attached to a feature.
pub type Properties = Map<String, Value>;

/// A GeoJSON FeatureCollection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    /// Features in the order the upstream source returned them.
    pub features: Vec<Feature>,

    /// Optional summary block (used by the zone catalog).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl FeatureCollection {
    /// Create a new empty FeatureCollection.
    pub fn new() -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features: Vec::new(),
            metadata: None,
        }
    }

    /// Build a collection from already-normalized features.
    pub fn from_features(features: Vec<Feature>) -> Self {
        Self {
            features,
            ..Self::new()
        }
    }

    /// Attach a metadata block.
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterate over the (lat, lon) of every point feature.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.features.iter().filter_map(|f| f.geometry.as_point())
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

/// A GeoJSON Feature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    pub geometry: Geometry,

    #[serde(default)]
    pub properties: Properties,
}

impl Feature {
    /// Create a point feature. GeoJSON order is [lon, lat].
    pub fn point(lon: f64, lat: f64) -> Self {
        Self {
            type_: "Feature".to_string(),
            geometry: Geometry::Point {
                coordinates: [lon, lat],
            },
            properties: Properties::new(),
        }
    }

    /// Set a single property.
    pub fn with_property(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }
}

/// GeoJSON geometry types used by the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    /// Coordinates as [longitude, latitude].
    Point { coordinates: [f64; 2] },

    /// Linear rings of [longitude, latitude] positions.
    Polygon { coordinates: Vec<Vec<[f64; 2]>> },
}

impl Geometry {
    /// (lat, lon) for a point geometry, `None` otherwise.
    pub fn as_point(&self) -> Option<(f64, f64)> {
        match self {
            Geometry::Point { coordinates } => Some((coordinates[1], coordinates[0])),
            Geometry::Polygon { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collection_serialization() {
        let json = serde_json::to_value(FeatureCollection::new()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "FeatureCollection", "features": []})
        );
    }

    #[test]
    fn test_point_feature_serialization() {
        let feature = Feature::point(2.39, 6.37).with_property("name", "CNHU");
        let json = serde_json::to_value(&feature).unwrap();

        assert_eq!(json["type"], "Feature");
        assert_eq!(json["geometry"]["type"], "Point");
        assert_eq!(json["geometry"]["coordinates"][0], 2.39);
        assert_eq!(json["geometry"]["coordinates"][1], 6.37);
        assert_eq!(json["properties"]["name"], "CNHU");
    }

    #[test]
    fn test_polygon_roundtrip() {
        let raw = r#"{
            "type": "Feature",
            "geometry": {"type": "Polygon", "coordinates": [[[2.36, 6.36], [2.42, 6.36], [2.42, 6.42], [2.36, 6.36]]]},
            "properties": {"zone_type": "heat_island"}
        }"#;
        let feature: Feature = serde_json::from_str(raw).unwrap();
        assert!(feature.geometry.as_point().is_none());
        assert_eq!(feature.properties["zone_type"], "heat_island");
    }

    #[test]
    fn test_points_skip_polygons() {
        let polygon = Feature {
            type_: "Feature".to_string(),
            geometry: Geometry::Polygon {
                coordinates: vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
            },
            properties: Properties::new(),
        };
        let fc = FeatureCollection::from_features(vec![Feature::point(2.0, 6.0), polygon]);

        let points: Vec<_> = fc.points().collect();
        assert_eq!(points, vec![(6.0, 2.0)]);
    }
}
