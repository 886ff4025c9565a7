//! Hotspot ranking handler.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    Json,
};
use geo_common::{rank_cells, GridCell};
use open_data::AirQualityQuery;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::{or_empty, resolve_city, CityQuery};
use crate::error::ApiResult;
use crate::metrics;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HotspotsResponse {
    /// Neediest cells first.
    pub grid: Vec<GridCell>,
}

/// GET /api/hotspots - Grid cells ranked by need score
///
/// Facilities and air quality are fetched concurrently. A failed source
/// counts as zero points rather than failing the request.
#[instrument(skip(state))]
pub async fn hotspots_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<CityQuery>,
) -> ApiResult<Json<HotspotsResponse>> {
    metrics::record_request("hotspots");

    let city = resolve_city(&state, params.city.as_deref())?;
    let config = &state.config;

    let air_query = AirQualityQuery::new(city.lat, city.lon)
        .with_radius(config.air_quality.radius)
        .with_limit(config.hotspots.air_quality_limit)
        .with_parameters(config.air_quality.parameters.clone());

    let (facilities, air_quality) = tokio::join!(
        state
            .sources
            .health_facilities(&city.bbox, &config.facilities.amenities),
        state.sources.air_quality(&air_query),
    );
    let facilities = or_empty(facilities, "overpass");
    let air_quality = or_empty(air_quality, "openaq");

    let grid = rank_cells(
        &city.bbox,
        &facilities,
        &air_quality,
        config.hotspots.grid_spec(),
        config.hotspots.top_n,
    );

    info!(
        city = %city.name,
        facilities = facilities.len(),
        air_quality = air_quality.len(),
        cells = grid.len(),
        "Ranked hotspot cells"
    );

    Ok(Json(HotspotsResponse { grid }))
}
