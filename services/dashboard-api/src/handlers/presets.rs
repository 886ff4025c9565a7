//! City presets handler.

use std::sync::Arc;

use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};

use crate::config::CityPreset;
use crate::metrics;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct PresetsResponse {
    pub default_city: String,
    pub cities: Vec<CityPreset>,
}

/// GET /api/presets - Cities the map can jump to
pub async fn presets_handler(Extension(state): Extension<Arc<AppState>>) -> Json<PresetsResponse> {
    metrics::record_request("presets");

    Json(PresetsResponse {
        default_city: state.config.default_city.clone(),
        cities: state.config.cities.clone(),
    })
}
