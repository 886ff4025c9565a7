//! Common test fixtures for dashboard tests.
//!
//! Upstream bodies are trimmed-down copies of real Overpass and OpenAQ v2
//! responses for Cotonou, with a few deliberately broken records mixed in.

use open_data::Endpoints;

/// Common bounding box definitions for testing, as (south, west, north, east).
pub mod bbox {
    /// Cotonou, Littoral, Benin
    pub const COTONOU: (f64, f64, f64, f64) = (6.32, 2.33, 6.45, 2.52);

    /// Paris
    pub const PARIS: (f64, f64, f64, f64) = (48.80, 2.25, 48.92, 2.45);

    /// London; its width does not divide into six exact binary fractions
    pub const LONDON: (f64, f64, f64, f64) = (51.40, -0.20, 51.60, 0.10);

    /// A 6x6 degree square whose cells are exactly one degree wide
    pub const UNIT_GRID: (f64, f64, f64, f64) = (0.0, 0.0, 6.0, 6.0);
}

pub const OVERPASS_URL: &str = "http://overpass.test/api/interpreter";
pub const OPENAQ_MEASUREMENTS_URL: &str = "http://openaq.test/v2/measurements";
pub const OPENAQ_LATEST_URL: &str = "http://openaq.test/v2/latest";
pub const GIBS_BASE_URL: &str = "http://gibs.test/wmts/epsg3857/best";

/// Endpoints pointing at the hosts scripted into a [`crate::MockFetcher`].
pub fn test_endpoints() -> Endpoints {
    Endpoints {
        overpass_url: OVERPASS_URL.to_string(),
        openaq_measurements_url: OPENAQ_MEASUREMENTS_URL.to_string(),
        openaq_latest_url: OPENAQ_LATEST_URL.to_string(),
        gibs_base_url: GIBS_BASE_URL.to_string(),
    }
}

/// Four elements: a named hospital node, a clinic way with a center, a
/// relation without a center (unusable) and a pharmacy with only contact data.
pub const OVERPASS_FACILITIES: &str = r#"{
  "version": 0.6,
  "generator": "Overpass API",
  "elements": [
    {
      "type": "node", "id": 1001, "lat": 6.3654, "lon": 2.4183,
      "tags": {"amenity": "hospital", "name": "CNHU Hubert Koutoukou Maga", "phone": "+229 21 30 01 55"}
    },
    {
      "type": "way", "id": 2002, "center": {"lat": 6.3721, "lon": 2.3902},
      "tags": {"amenity": "clinic", "official_name": "Clinique Mahouna"}
    },
    {
      "type": "relation", "id": 3003,
      "tags": {"amenity": "hospital", "name": "Hopital de la Mere et de l'Enfant"}
    },
    {
      "type": "node", "id": 1004, "lat": 6.3502, "lon": 2.4401,
      "tags": {
        "amenity": "pharmacy",
        "contact:phone": "+229 97 00 00 00",
        "addr:housenumber": "12",
        "addr:street": "Rue 310",
        "addr:city": "Cotonou"
      }
    }
  ]
}"#;

/// Five elements covering every pollution-source classification.
pub const OVERPASS_SOURCES: &str = r#"{
  "elements": [
    {"type": "way", "id": 1, "center": {"lat": 6.36, "lon": 2.40}, "tags": {"highway": "trunk", "name": "Boulevard de la Marina"}},
    {"type": "way", "id": 2, "center": {"lat": 6.40, "lon": 2.47}, "tags": {"landuse": "landfill"}},
    {"type": "node", "id": 3, "lat": 6.35, "lon": 2.43, "tags": {"power": "plant", "name": "Centrale de Vedoko"}},
    {"type": "node", "id": 4, "lat": 6.37, "lon": 2.45, "tags": {"man_made": "works"}},
    {"type": "node", "id": 5, "lat": 6.38, "lon": 2.44, "tags": {"craft": "metal_construction"}}
  ]
}"#;

/// Three measurement rows, one of which has no coordinates.
pub const OPENAQ_MEASUREMENTS: &str = r#"{
  "meta": {"name": "openaq-api", "found": 3},
  "results": [
    {
      "locationId": 8118, "location": "Cotonou US Embassy", "parameter": "pm25",
      "value": 38.2, "unit": "µg/m³",
      "date": {"utc": "2024-03-01T10:00:00+00:00", "local": "2024-03-01T11:00:00+01:00"},
      "coordinates": {"latitude": 6.3572, "longitude": 2.4118},
      "country": "BJ", "city": null
    },
    {
      "locationId": 8118, "location": "Cotonou US Embassy", "parameter": "pm10",
      "value": 71.0, "unit": "µg/m³",
      "date": {"utc": "2024-03-01T10:00:00+00:00", "local": "2024-03-01T11:00:00+01:00"},
      "coordinates": {"latitude": 6.3572, "longitude": 2.4118},
      "country": "BJ", "city": null
    },
    {
      "locationId": 9001, "location": "Mobile sensor", "parameter": "no2",
      "value": 14.0, "unit": "ppb",
      "date": {"utc": "2024-03-01T09:00:00+00:00"},
      "coordinates": null,
      "country": "BJ", "city": "Cotonou"
    }
  ]
}"#;

/// A successful measurements answer with nothing in it.
pub const OPENAQ_EMPTY: &str = r#"{"meta": {"found": 0}, "results": []}"#;

/// Two locations; the first carries two readings.
pub const OPENAQ_LATEST: &str = r#"{
  "results": [
    {
      "location": "Akpakpa", "city": "Cotonou", "country": "BJ",
      "coordinates": {"latitude": 6.3561, "longitude": 2.4492},
      "measurements": [
        {"parameter": "pm25", "value": 44.0, "unit": "µg/m³", "lastUpdated": "2024-03-01T08:00:00+00:00"},
        {"parameter": "o3", "value": 21.0, "unit": "ppb", "lastUpdated": "2024-03-01T08:00:00+00:00"}
      ]
    },
    {
      "location": "Godomey", "city": "Abomey-Calavi", "country": "BJ",
      "coordinates": {"latitude": 6.3914, "longitude": 2.3437},
      "measurements": [
        {"parameter": "pm10", "value": 90.0, "unit": "µg/m³", "lastUpdated": "2024-03-01T07:00:00+00:00"}
      ]
    }
  ]
}"#;

/// A few bytes standing in for a JPEG tile.
pub const JPEG_TILE: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0xFF, 0xD9];
