//! Urban Health Dashboard API Server
//!
//! Serves GeoJSON layers built from OpenStreetMap, OpenAQ and NASA GIBS for a
//! map-based city health dashboard.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use dashboard_api::config::DashboardConfig;
use dashboard_api::state::AppState;

/// Urban Health Dashboard API Server
#[derive(Parser, Debug)]
#[command(name = "dashboard-api")]
#[command(about = "Open-data proxy and hotspot ranking server for the urban health dashboard")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:3000", env = "DASHBOARD_LISTEN_ADDR")]
    listen: String,

    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config/dashboard.yaml", env = "DASHBOARD_CONFIG")]
    config: PathBuf,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Number of worker threads
    #[arg(long, env = "DASHBOARD_WORKER_THREADS")]
    worker_threads: Option<usize>,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Build runtime with configured threads
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(threads) = args.worker_threads {
        runtime_builder.worker_threads(threads);
    }

    let runtime = runtime_builder
        .build()
        .context("Failed to create Tokio runtime")?;

    runtime.block_on(run_server(args))
}

async fn run_server(args: Args) -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .json()
        .init();

    // Initialize Prometheus metrics exporter
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    info!("Prometheus metrics exporter initialized");
    info!("Starting urban health dashboard API server");

    let config = DashboardConfig::load(&args.config)?;
    let state = Arc::new(AppState::new(config, Some(prometheus_handle))?);

    let app = dashboard_api::router(state);

    // Parse listen address
    let addr: SocketAddr = args
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", args.listen))?;

    info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server failed")?;

    Ok(())
}
