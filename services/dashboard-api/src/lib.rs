//! Urban Health Dashboard API Library
//!
//! HTTP adapter over the `open-data` sources and the `geo-common` grid
//! aggregator. The binary in `main.rs` only parses flags, installs logging
//! and metrics, and serves [`router`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod state;
pub mod zones;

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Build the application router with all routes and middleware.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // GeoJSON collections
        .route(
            "/api/health-facilities",
            get(handlers::facilities::health_facilities_handler),
        )
        .route(
            "/api/air-quality",
            get(handlers::air_quality::air_quality_handler),
        )
        .route("/api/sources", get(handlers::sources::sources_handler))
        .route(
            "/api/pollution-zones",
            get(handlers::zones::pollution_zones_handler),
        )
        // Hotspot ranking
        .route("/api/hotspots", get(handlers::hotspots::hotspots_handler))
        // Satellite tiles
        .route(
            "/api/gibs/:layer/:date/:z/:y/:file",
            get(handlers::gibs::gibs_tile_handler),
        )
        // City presets
        .route("/api/presets", get(handlers::presets::presets_handler))
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
