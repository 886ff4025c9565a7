//! Static pollution zone catalog.
//!
//! Ten hand-drawn polygons over Cotonou, grouped by `zone_type`. The catalog
//! ships inside the binary; `zones_path` in the config can replace it.

use std::path::Path;

use anyhow::{Context, Result};
use geo_common::FeatureCollection;
use serde_json::{json, Value};

const EMBEDDED_CATALOG: &str = include_str!("../data/pollution_zones.geojson");

/// Load the catalog from `path`, or the embedded one when `None`, and attach
/// its summary metadata.
pub fn load_catalog(path: Option<&Path>) -> Result<FeatureCollection> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read zone catalog: {:?}", path))?;
            let catalog = parse_catalog(&raw)
                .with_context(|| format!("Failed to parse zone catalog: {:?}", path))?;
            tracing::info!(path = %path.display(), zones = catalog.len(), "Loaded zone catalog");
            Ok(catalog)
        }
        None => parse_catalog(EMBEDDED_CATALOG).context("Embedded zone catalog is invalid"),
    }
}

/// Parse a GeoJSON FeatureCollection and attach [`catalog_metadata`].
pub fn parse_catalog(raw: &str) -> Result<FeatureCollection> {
    let catalog: FeatureCollection = serde_json::from_str(raw)?;
    let metadata = catalog_metadata(&catalog);
    Ok(catalog.with_metadata(metadata))
}

/// Zone counts, overall and per `zone_type`.
pub fn catalog_metadata(catalog: &FeatureCollection) -> Value {
    let count = |zone_type: &str| {
        catalog
            .features
            .iter()
            .filter(|f| f.properties.get("zone_type").and_then(Value::as_str) == Some(zone_type))
            .count()
    };

    json!({
        "total_zones": catalog.len(),
        "air_pollution": count("air_pollution"),
        "lagoon_degradation": count("lagoon_degradation"),
        "heat_islands": count("heat_island"),
    })
}
