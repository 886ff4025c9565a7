//! Pollution zone catalog handler.

use std::sync::Arc;

use axum::{extract::Extension, Json};
use geo_common::FeatureCollection;

use crate::metrics;
use crate::state::AppState;

/// GET /api/pollution-zones - Static zone polygons with summary metadata
pub async fn pollution_zones_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Json<FeatureCollection> {
    metrics::record_request("pollution_zones");
    Json(state.zones.clone())
}
