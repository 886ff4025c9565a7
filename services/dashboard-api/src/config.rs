//! Dashboard configuration loading and types.
//!
//! Everything is read once at start-up from a single YAML file. Each section
//! is optional; anything left out takes the defaults below.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, ensure, Context, Result};
use geo_common::{BoundingBox, GridSpec};
use open_data::gibs::default_layers;
use open_data::openaq::{DEFAULT_LIMIT, DEFAULT_PARAMETERS, DEFAULT_RADIUS};
use open_data::overpass::DEFAULT_AMENITIES;
use open_data::{Endpoints, GibsLayer};
use serde::{Deserialize, Serialize};

/// Dashboard configuration loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Preset used when a request names no city.
    #[serde(default = "default_city")]
    pub default_city: String,

    /// Named city presets.
    #[serde(default = "default_cities")]
    pub cities: Vec<CityPreset>,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub facilities: FacilitiesConfig,

    #[serde(default)]
    pub air_quality: AirQualityConfig,

    #[serde(default)]
    pub hotspots: HotspotsConfig,

    /// Allow-list of tile layer keys.
    #[serde(default = "default_layers")]
    pub gibs_layers: BTreeMap<String, GibsLayer>,

    /// GeoJSON file replacing the built-in pollution zone catalog.
    #[serde(default)]
    pub zones_path: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_city: default_city(),
            cities: default_cities(),
            upstream: UpstreamConfig::default(),
            facilities: FacilitiesConfig::default(),
            air_quality: AirQualityConfig::default(),
            hotspots: HotspotsConfig::default(),
            gibs_layers: default_layers(),
            zones_path: None,
        }
    }
}

impl DashboardConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// A missing file is not an error: the defaults are used instead.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Dashboard config file does not exist, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read: {:?}", path))?;

        let config =
            Self::from_yaml(&content).with_context(|| format!("Failed to parse: {:?}", path))?;

        tracing::info!(
            path = %path.display(),
            cities = config.cities.len(),
            default_city = %config.default_city,
            "Loaded dashboard config"
        );
        Ok(config)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        for city in &self.cities {
            ensure!(!city.name.is_empty(), "City preset with empty name");
            ensure!(
                city.lat.is_finite() && city.lon.is_finite(),
                "City '{}' has a non-finite centre",
                city.name
            );
            let b = city.bbox;
            if let Err(e) = BoundingBox::validated(b.south, b.west, b.north, b.east) {
                bail!("City '{}' has an invalid bbox: {}", city.name, e);
            }
        }

        ensure!(
            self.find_city(&self.default_city).is_some(),
            "Default city '{}' is not among the configured presets",
            self.default_city
        );

        let h = &self.hotspots;
        ensure!(
            h.rows > 0 && h.cols > 0,
            "Hotspot grid must have at least one row and one column"
        );
        ensure!(h.top_n > 0, "hotspots.top_n must be greater than zero");

        ensure!(
            self.upstream.request_timeout_secs > 0,
            "upstream.request_timeout_secs must be greater than zero"
        );

        Ok(())
    }

    /// Find a preset by name or label, ignoring case.
    pub fn find_city(&self, name: &str) -> Option<&CityPreset> {
        let name = name.trim();
        self.cities
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name) || c.label.eq_ignore_ascii_case(name))
    }

    /// The preset named by `default_city`.
    pub fn default_preset(&self) -> Option<&CityPreset> {
        self.find_city(&self.default_city)
    }
}

/// A named city with its map centre, extent and initial zoom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityPreset {
    /// Lookup key, e.g. "cotonou".
    pub name: String,

    /// Display name, e.g. "Cotonou".
    pub label: String,

    pub lat: f64,
    pub lon: f64,

    /// `[south, west, north, east]`
    pub bbox: BoundingBox,

    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

impl CityPreset {
    fn new(name: &str, label: &str, lat: f64, lon: f64, bbox: [f64; 4], zoom: u8) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            lat,
            lon,
            bbox: BoundingBox::new(bbox[0], bbox[1], bbox[2], bbox[3]),
            zoom,
        }
    }
}

/// Upstream service locations and HTTP client timeouts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    #[serde(flatten)]
    pub endpoints: Endpoints,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilitiesConfig {
    /// OSM `amenity` values queried as health facilities.
    #[serde(default = "default_amenities")]
    pub amenities: Vec<String>,
}

impl Default for FacilitiesConfig {
    fn default() -> Self {
        Self {
            amenities: default_amenities(),
        }
    }
}

/// Defaults for `/api/air-quality` when the caller leaves parameters out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirQualityConfig {
    /// Search radius in metres.
    #[serde(default = "default_radius")]
    pub radius: u32,

    #[serde(default = "default_limit")]
    pub limit: u32,

    #[serde(default = "default_parameters")]
    pub parameters: Vec<String>,
}

impl Default for AirQualityConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            limit: default_limit(),
            parameters: default_parameters(),
        }
    }
}

/// Hotspot grid settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotspotsConfig {
    #[serde(default = "default_grid_rows")]
    pub rows: usize,

    #[serde(default = "default_grid_cols")]
    pub cols: usize,

    /// Cells returned after ranking.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Row limit for the air-quality fetch feeding the grid.
    #[serde(default = "default_hotspot_aq_limit")]
    pub air_quality_limit: u32,
}

impl HotspotsConfig {
    pub fn grid_spec(&self) -> GridSpec {
        GridSpec::new(self.rows, self.cols)
    }
}

impl Default for HotspotsConfig {
    fn default() -> Self {
        Self {
            rows: default_grid_rows(),
            cols: default_grid_cols(),
            top_n: default_top_n(),
            air_quality_limit: default_hotspot_aq_limit(),
        }
    }
}

fn default_city() -> String {
    "cotonou".to_string()
}

fn default_cities() -> Vec<CityPreset> {
    vec![
        CityPreset::new("cotonou", "Cotonou", 6.3703, 2.3912, [6.32, 2.33, 6.45, 2.52], 12),
        CityPreset::new("dakar", "Dakar", 14.6928, -17.4467, [14.6, -17.5, 14.9, -17.2], 11),
        CityPreset::new("lome", "Lomé", 6.1725, 1.2314, [6.09, 1.18, 6.23, 1.35], 12),
        CityPreset::new("paris", "Paris", 48.8566, 2.3522, [48.80, 2.25, 48.92, 2.45], 12),
        CityPreset::new("new-york", "New York", 40.7128, -74.0060, [40.55, -74.25, 40.90, -73.70], 11),
        CityPreset::new("mumbai", "Mumbai", 19.0760, 72.8777, [18.90, 72.75, 19.20, 73.00], 12),
        CityPreset::new("beijing", "Beijing", 39.9042, 116.4074, [39.80, 116.20, 40.00, 116.60], 11),
        CityPreset::new("cairo", "Cairo", 30.0444, 31.2357, [29.90, 31.00, 30.20, 31.40], 11),
        CityPreset::new("london", "London", 51.5074, -0.1278, [51.40, -0.20, 51.60, 0.10], 11),
        CityPreset::new("tokyo", "Tokyo", 35.6895, 139.6917, [35.50, 139.50, 35.80, 139.90], 11),
        CityPreset::new("sao-paulo", "São Paulo", -23.5505, -46.6333, [-23.70, -46.80, -23.40, -46.50], 11),
        CityPreset::new("mexico-city", "Mexico City", 19.4326, -99.1332, [19.20, -99.30, 19.70, -98.90], 11),
        CityPreset::new("istanbul", "Istanbul", 41.0082, 28.9784, [40.90, 28.80, 41.10, 29.20], 11),
        CityPreset::new("moscow", "Moscow", 55.7558, 37.6173, [55.60, 37.40, 55.90, 37.80], 11),
        CityPreset::new("jakarta", "Jakarta", -6.2088, 106.8456, [-6.40, 106.60, -6.00, 107.00], 11),
    ]
}

fn default_zoom() -> u8 {
    12
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_amenities() -> Vec<String> {
    DEFAULT_AMENITIES.iter().map(|s| s.to_string()).collect()
}

fn default_radius() -> u32 {
    DEFAULT_RADIUS
}

fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

fn default_parameters() -> Vec<String> {
    DEFAULT_PARAMETERS.iter().map(|s| s.to_string()).collect()
}

fn default_grid_rows() -> usize {
    6
}

fn default_grid_cols() -> usize {
    6
}

fn default_top_n() -> usize {
    10
}

fn default_hotspot_aq_limit() -> u32 {
    200
}
