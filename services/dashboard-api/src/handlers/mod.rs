//! HTTP request handlers for the dashboard API.

pub mod air_quality;
pub mod facilities;
pub mod gibs;
pub mod health;
pub mod hotspots;
pub mod presets;
pub mod sources;
pub mod zones;

use geo_common::FeatureCollection;
use open_data::FetchError;
use serde::Deserialize;
use tracing::warn;

use crate::config::CityPreset;
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Query parameters shared by endpoints that only take a city.
#[derive(Debug, Default, Deserialize)]
pub struct CityQuery {
    pub city: Option<String>,
}

/// Resolve the `city` parameter, falling back to the configured default.
pub(crate) fn resolve_city<'a>(state: &'a AppState, city: Option<&str>) -> ApiResult<&'a CityPreset> {
    let config = &state.config;
    let name = city
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(config.default_city.as_str());

    config
        .find_city(name)
        .ok_or_else(|| ApiError::UnknownCity(name.to_string()))
}

/// Degrade an upstream failure to an empty collection.
pub(crate) fn or_empty(
    result: Result<FeatureCollection, FetchError>,
    source: &'static str,
) -> FeatureCollection {
    match result {
        Ok(collection) => collection,
        Err(e) => {
            warn!(source, error = %e, "Upstream fetch failed, returning empty collection");
            metrics::record_upstream_failure(source);
            FeatureCollection::new()
        }
    }
}
