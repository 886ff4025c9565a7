//! Pollution sources handler.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    Json,
};
use geo_common::{BoundingBox, FeatureCollection};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{or_empty, resolve_city};
use crate::error::ApiResult;
use crate::metrics;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SourcesParams {
    /// "south,west,north,east"
    pub bbox: Option<String>,
    pub city: Option<String>,
}

/// GET /api/sources - Industry, landfills, power plants and major roads
///
/// A missing or unparsable `bbox` falls back to the city's extent.
#[instrument(skip(state))]
pub async fn sources_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<SourcesParams>,
) -> ApiResult<Json<FeatureCollection>> {
    metrics::record_request("sources");

    let city = resolve_city(&state, params.city.as_deref())?;

    let bbox = match params.bbox.as_deref() {
        Some(raw) => BoundingBox::from_query_string(raw).unwrap_or_else(|e| {
            debug!(bbox = raw, error = %e, "Ignoring unparsable bbox");
            city.bbox
        }),
        None => city.bbox,
    };

    let result = state.sources.pollution_sources(&bbox).await;
    Ok(Json(or_empty(result, "overpass")))
}
