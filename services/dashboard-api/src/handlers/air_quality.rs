//! Air quality handler.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    Json,
};
use geo_common::FeatureCollection;
use open_data::AirQualityQuery;
use serde::Deserialize;
use tracing::instrument;

use super::{or_empty, resolve_city};
use crate::error::ApiResult;
use crate::metrics;
use crate::state::AppState;

/// Query parameters for the air quality endpoint.
///
/// Anything left out comes from the city preset and the `air_quality`
/// config section.
#[derive(Debug, Default, Deserialize)]
pub struct AirQualityParams {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Metres.
    pub radius: Option<u32>,
    pub limit: Option<u32>,
    pub city: Option<String>,
}

/// GET /api/air-quality - Pollutant readings around a point
#[instrument(skip(state))]
pub async fn air_quality_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<AirQualityParams>,
) -> ApiResult<Json<FeatureCollection>> {
    metrics::record_request("air_quality");

    let city = resolve_city(&state, params.city.as_deref())?;
    let defaults = &state.config.air_quality;

    let query = AirQualityQuery::new(params.lat.unwrap_or(city.lat), params.lon.unwrap_or(city.lon))
        .with_radius(params.radius.unwrap_or(defaults.radius))
        .with_limit(params.limit.unwrap_or(defaults.limit))
        .with_parameters(defaults.parameters.clone());

    let result = state.sources.air_quality(&query).await;
    Ok(Json(or_empty(result, "openaq")))
}
