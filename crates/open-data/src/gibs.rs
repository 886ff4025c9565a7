//! NASA GIBS WMTS tile proxy.
//!
//! Tiles are addressed as `{layer}/{date}/{z}/{y}/{x}.jpg` where `layer` is a
//! short key from an allow-list. Every part of the path is validated before
//! any upstream call is made.

use std::collections::BTreeMap;

use bytes::Bytes;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::client::{FetchError, OpenDataClient, UpstreamRequest};

/// A GIBS layer identifier and the tile matrix set it is published in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GibsLayer {
    pub layer_id: String,
    pub tile_matrix_set: String,
}

impl GibsLayer {
    pub fn new(layer_id: &str, tile_matrix_set: &str) -> Self {
        Self {
            layer_id: layer_id.to_string(),
            tile_matrix_set: tile_matrix_set.to_string(),
        }
    }
}

/// The four layers exposed to the dashboard.
pub fn default_layers() -> BTreeMap<String, GibsLayer> {
    BTreeMap::from([
        // Night lights
        (
            "VIIRS_DNB".to_string(),
            GibsLayer::new(
                "VIIRS_SNPP_DayNightBand_At_Sensor_Radiance",
                "GoogleMapsCompatible_Level9",
            ),
        ),
        // Sentinel-5P TROPOMI NO2, daily
        (
            "S5P_NO2".to_string(),
            GibsLayer::new("S5P_NO2_TROPOMI", "GoogleMapsCompatible_Level3"),
        ),
        // MAIAC aerosol optical depth, MODIS Terra+Aqua
        (
            "MAIAC_AOD".to_string(),
            GibsLayer::new("MODIS_Terra_Aqua_Aerosol", "GoogleMapsCompatible_Level9"),
        ),
        (
            "MODIS_TrueColor".to_string(),
            GibsLayer::new(
                "MODIS_Terra_CorrectedReflectance_TrueColor",
                "GoogleMapsCompatible_Level9",
            ),
        ),
    ])
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TileRequestError {
    #[error("Invalid layer key: {0}")]
    InvalidLayerKey(String),

    #[error("Unsupported layer: {0}")]
    UnsupportedLayer(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid tile index: {0}")]
    InvalidTileIndex(String),

    #[error("Only .jpg tiles are served, got '{0}'")]
    InvalidExtension(String),
}

/// A validated tile request.
#[derive(Debug, Clone, PartialEq)]
pub struct TileRequest {
    pub layer_key: String,
    pub layer: GibsLayer,
    pub date: NaiveDate,
    pub z: u32,
    pub y: u32,
    pub x: u32,
}

impl TileRequest {
    /// Validate raw path segments against the allow-list.
    ///
    /// `file` is the last path segment, e.g. "3.jpg".
    pub fn parse(
        layer_key: &str,
        date: &str,
        z: &str,
        y: &str,
        file: &str,
        layers: &BTreeMap<String, GibsLayer>,
    ) -> Result<Self, TileRequestError> {
        let key_ok = !layer_key.is_empty()
            && layer_key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !key_ok {
            return Err(TileRequestError::InvalidLayerKey(layer_key.to_string()));
        }

        let date = parse_date(date)?;

        let x = file
            .strip_suffix(".jpg")
            .ok_or_else(|| TileRequestError::InvalidExtension(file.to_string()))?;

        let z = parse_index(z)?;
        let y = parse_index(y)?;
        let x = parse_index(x)?;

        let layer = layers
            .get(layer_key)
            .cloned()
            .ok_or_else(|| TileRequestError::UnsupportedLayer(layer_key.to_string()))?;

        Ok(Self {
            layer_key: layer_key.to_string(),
            layer,
            date,
            z,
            y,
            x,
        })
    }

    /// Upstream WMTS REST URL for this tile.
    pub fn url(&self, base_url: &str) -> String {
        format!(
            "{}/{}/default/{}/{}/{}/{}/{}.jpg",
            base_url.trim_end_matches('/'),
            self.layer.layer_id,
            self.date.format("%Y-%m-%d"),
            self.layer.tile_matrix_set,
            self.z,
            self.y,
            self.x
        )
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, TileRequestError> {
    let shape_ok = s.len() == 10
        && s.char_indices().all(|(i, c)| match i {
            4 | 7 => c == '-',
            _ => c.is_ascii_digit(),
        });
    if !shape_ok {
        return Err(TileRequestError::InvalidDate(s.to_string()));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| TileRequestError::InvalidDate(s.to_string()))
}

fn parse_index(s: &str) -> Result<u32, TileRequestError> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(TileRequestError::InvalidTileIndex(s.to_string()));
    }
    s.parse()
        .map_err(|_| TileRequestError::InvalidTileIndex(s.to_string()))
}

impl OpenDataClient {
    /// Fetch one JPEG tile. Any failure is returned as-is; a broken image
    /// cannot be replaced by an empty one.
    #[instrument(skip(self, tile), fields(source = "gibs", layer = %tile.layer_key, z = tile.z, y = tile.y, x = tile.x))]
    pub async fn gibs_tile(&self, tile: &TileRequest) -> Result<Bytes, FetchError> {
        let request = UpstreamRequest::get(tile.url(&self.endpoints.gibs_base_url));
        let bytes = self.fetcher.fetch(&request).await?;
        info!(size = bytes.len(), "Fetched GIBS tile");
        Ok(bytes)
    }
}
