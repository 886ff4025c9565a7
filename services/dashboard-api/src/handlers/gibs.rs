//! NASA GIBS tile proxy handler.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::header,
    response::{IntoResponse, Response},
};
use open_data::TileRequest;
use tracing::{instrument, warn};

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

/// Tiles for a given date never change.
const TILE_CACHE_CONTROL: &str = "public, max-age=86400";

/// GET /api/gibs/:layer/:date/:z/:y/:x.jpg - Proxied satellite tile
///
/// The request is validated before any upstream call: a malformed path is a
/// 400, an upstream failure a 502.
#[instrument(skip(state))]
pub async fn gibs_tile_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path((layer, date, z, y, file)): Path<(String, String, String, String, String)>,
) -> ApiResult<Response> {
    metrics::record_request("gibs");

    let tile = TileRequest::parse(&layer, &date, &z, &y, &file, &state.config.gibs_layers)
        .map_err(|e| {
            warn!(error = %e, "Rejected tile request");
            metrics::record_tile("invalid");
            ApiError::from(e)
        })?;

    match state.sources.gibs_tile(&tile).await {
        Ok(bytes) => {
            metrics::record_tile("ok");
            Ok((
                [
                    (header::CONTENT_TYPE, "image/jpeg"),
                    (header::CACHE_CONTROL, TILE_CACHE_CONTROL),
                ],
                bytes,
            )
                .into_response())
        }
        Err(e) => {
            warn!(error = %e, layer = %tile.layer_key, "GIBS tile fetch failed");
            metrics::record_tile("upstream_error");
            metrics::record_upstream_failure("gibs");
            Err(ApiError::TileUpstream(e))
        }
    }
}
