//! Application state for the dashboard API.

use std::sync::Arc;

use anyhow::Result;
use geo_common::FeatureCollection;
use metrics_exporter_prometheus::PrometheusHandle;
use open_data::{HttpFetcher, OpenDataClient, ReqwestFetcher};

use crate::config::DashboardConfig;
use crate::zones;

/// Shared application state. Immutable after start-up.
pub struct AppState {
    pub config: Arc<DashboardConfig>,

    /// Upstream open-data sources.
    pub sources: OpenDataClient,

    /// Pollution zone catalog with its metadata attached.
    pub zones: FeatureCollection,

    /// Renders `/metrics`; `None` when no recorder is installed.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create state backed by a real HTTP client.
    pub fn new(config: DashboardConfig, metrics: Option<PrometheusHandle>) -> Result<Self> {
        let fetcher = ReqwestFetcher::new(
            config.upstream.request_timeout(),
            config.upstream.connect_timeout(),
        )?;
        Self::with_fetcher(config, Arc::new(fetcher), metrics)
    }

    /// Create state over any [`HttpFetcher`].
    pub fn with_fetcher(
        config: DashboardConfig,
        fetcher: Arc<dyn HttpFetcher>,
        metrics: Option<PrometheusHandle>,
    ) -> Result<Self> {
        let zones = zones::load_catalog(config.zones_path.as_deref())?;
        let sources = OpenDataClient::new(fetcher, config.upstream.endpoints.clone());

        Ok(Self {
            config: Arc::new(config),
            sources,
            zones,
            metrics,
        })
    }
}
