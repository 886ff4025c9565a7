//! Health facilities handler.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    Json,
};
use geo_common::FeatureCollection;
use tracing::instrument;

use super::{or_empty, resolve_city, CityQuery};
use crate::error::ApiResult;
use crate::metrics;
use crate::state::AppState;

/// GET /api/health-facilities - Points of care inside the city's bbox
#[instrument(skip(state))]
pub async fn health_facilities_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<CityQuery>,
) -> ApiResult<Json<FeatureCollection>> {
    metrics::record_request("health_facilities");

    let city = resolve_city(&state, params.city.as_deref())?;
    let result = state
        .sources
        .health_facilities(&city.bbox, &state.config.facilities.amenities)
        .await;

    Ok(Json(or_empty(result, "overpass")))
}
