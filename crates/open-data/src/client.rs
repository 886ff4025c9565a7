//! HTTP transport seam shared by every upstream source.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Errors from a single upstream call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    /// Connection, timeout or body read failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Upstream answered with a non-2xx status.
    #[error("Upstream returned HTTP {0}")]
    Status(u16),

    /// Body was not the expected JSON document.
    #[error("Failed to decode upstream response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => FetchError::Status(status.as_u16()),
            None => FetchError::Transport(err.to_string()),
        }
    }
}

/// Decode a JSON body into `T`.
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, FetchError> {
    serde_json::from_slice(body).map_err(|e| FetchError::Decode(e.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    /// POST with an `application/x-www-form-urlencoded` body.
    PostForm,
}

/// A fully described upstream request.
///
/// `params` become the query string for [`Method::Get`] and the form body
/// for [`Method::PostForm`].
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    pub method: Method,
    pub url: String,
    pub params: Vec<(String, String)>,
}

impl UpstreamRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            params: Vec::new(),
        }
    }

    pub fn post_form(url: impl Into<String>) -> Self {
        Self {
            method: Method::PostForm,
            url: url.into(),
            params: Vec::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Look up a parameter by name.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for UpstreamRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = match self.method {
            Method::Get => "GET",
            Method::PostForm => "POST",
        };
        write!(f, "{} {}", method, self.url)
    }
}

/// Trait for anything that can execute an upstream request.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    /// Execute the request and return the body of a 2xx response.
    async fn fetch(&self, request: &UpstreamRequest) -> Result<Bytes, FetchError>;
}

/// Production fetcher backed by a pooled reqwest client.
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    /// Create a fetcher with the given per-request and connect timeouts.
    pub fn new(request_timeout: Duration, connect_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(connect_timeout)
            .user_agent(concat!("urban-health-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetcher for ReqwestFetcher {
    async fn fetch(&self, request: &UpstreamRequest) -> Result<Bytes, FetchError> {
        debug!(request = %request, "Upstream request");

        let builder = match request.method {
            Method::Get => self.client.get(&request.url).query(&request.params),
            Method::PostForm => self.client.post(&request.url).form(&request.params),
        };

        let response = builder.send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        Ok(response.bytes().await?)
    }
}

/// Base URLs of the upstream services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoints {
    #[serde(default = "default_overpass_url")]
    pub overpass_url: String,

    #[serde(default = "default_openaq_measurements_url")]
    pub openaq_measurements_url: String,

    #[serde(default = "default_openaq_latest_url")]
    pub openaq_latest_url: String,

    /// WMTS root; layer, date, matrix set and tile indices are appended.
    #[serde(default = "default_gibs_base_url")]
    pub gibs_base_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            overpass_url: default_overpass_url(),
            openaq_measurements_url: default_openaq_measurements_url(),
            openaq_latest_url: default_openaq_latest_url(),
            gibs_base_url: default_gibs_base_url(),
        }
    }
}

fn default_overpass_url() -> String {
    "https://overpass-api.de/api/interpreter".to_string()
}

fn default_openaq_measurements_url() -> String {
    "https://api.openaq.org/v2/measurements".to_string()
}

fn default_openaq_latest_url() -> String {
    "https://api.openaq.org/v2/latest".to_string()
}

fn default_gibs_base_url() -> String {
    "https://gibs.earthdata.nasa.gov/wmts/epsg3857/best".to_string()
}

/// Entry point for every upstream source.
///
/// Source-specific operations live next to their normalizers in the
/// `overpass`, `openaq` and `gibs` modules.
#[derive(Clone)]
pub struct OpenDataClient {
    pub(crate) fetcher: Arc<dyn HttpFetcher>,
    pub(crate) endpoints: Endpoints,
}

impl OpenDataClient {
    pub fn new(fetcher: Arc<dyn HttpFetcher>, endpoints: Endpoints) -> Self {
        Self { fetcher, endpoints }
    }
}
