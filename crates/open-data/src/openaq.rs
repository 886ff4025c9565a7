//! OpenAQ air-quality source with a measurements → latest fallback.
//!
//! The `measurements` endpoint returns flat rows, one per reading. The
//! `latest` endpoint groups readings per location. Both are normalized to the
//! same point feature with the properties
//! `parameter, value, unit, datetime, location, country, city`.

use geo_common::{Feature, FeatureCollection};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::client::{decode_json, FetchError, OpenDataClient, UpstreamRequest};

/// Pollutants requested from OpenAQ.
pub const DEFAULT_PARAMETERS: [&str; 6] = ["pm25", "pm10", "no2", "o3", "so2", "co"];

/// Search radius in metres when the caller gives none.
pub const DEFAULT_RADIUS: u32 = 20_000;

/// Row limit when the caller gives none.
pub const DEFAULT_LIMIT: u32 = 100;

/// Parameters of an air-quality lookup around a coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct AirQualityQuery {
    pub lat: f64,
    pub lon: f64,
    /// Metres.
    pub radius: u32,
    pub limit: u32,
    pub parameters: Vec<String>,
}

impl AirQualityQuery {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            radius: DEFAULT_RADIUS,
            limit: DEFAULT_LIMIT,
            parameters: DEFAULT_PARAMETERS.iter().map(|p| p.to_string()).collect(),
        }
    }

    pub fn with_radius(mut self, radius: u32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<String>) -> Self {
        self.parameters = parameters;
        self
    }

    fn request(&self, url: &str) -> UpstreamRequest {
        UpstreamRequest::get(url)
            .with_param("coordinates", format!("{},{}", self.lat, self.lon))
            .with_param("radius", self.radius.to_string())
            .with_param("limit", self.limit.to_string())
            .with_param("sort", "desc")
            .with_param("order_by", "datetime")
            .with_param("parameter", self.parameters.join(","))
    }
}

#[derive(Debug, Deserialize)]
struct ResultsEnvelope {
    #[serde(default)]
    results: Vec<Value>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
struct Coordinates {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl Coordinates {
    fn lon_lat(&self) -> Option<(f64, f64)> {
        Some((self.longitude?, self.latitude?))
    }
}

#[derive(Debug, Default, Deserialize)]
struct DateStamp {
    #[serde(default)]
    utc: Value,
    #[serde(default)]
    local: Value,
}

/// A row from `/v2/measurements`.
#[derive(Debug, Deserialize)]
struct MeasurementRow {
    #[serde(default)]
    parameter: Value,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    unit: Value,
    date: Option<DateStamp>,
    #[serde(default)]
    location: Value,
    #[serde(default)]
    country: Value,
    #[serde(default)]
    city: Value,
    coordinates: Option<Coordinates>,
}

/// A location from `/v2/latest`.
#[derive(Debug, Deserialize)]
struct LatestLocation {
    #[serde(default)]
    location: Value,
    #[serde(default)]
    country: Value,
    #[serde(default)]
    city: Value,
    coordinates: Option<Coordinates>,
    #[serde(default)]
    measurements: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct LatestMeasurement {
    #[serde(default)]
    parameter: Value,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    unit: Value,
    #[serde(rename = "lastUpdated", default)]
    last_updated: Value,
    date: Option<DateStamp>,
}

/// First value that is neither null nor an empty string.
fn first_present(candidates: &[&Value]) -> Value {
    candidates
        .iter()
        .find(|v| match v {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            _ => true,
        })
        .map_or(Value::Null, |v| (*v).clone())
}

fn date_value(date: Option<&DateStamp>) -> Value {
    match date {
        Some(d) => first_present(&[&d.utc, &d.local]),
        None => Value::Null,
    }
}

fn decode_results<T: serde::de::DeserializeOwned>(body: &[u8]) -> Result<Vec<T>, FetchError> {
    let envelope: ResultsEnvelope = decode_json(body)?;
    let total = envelope.results.len();

    let rows: Vec<T> = envelope
        .results
        .into_iter()
        .filter_map(|raw| serde_json::from_value(raw).ok())
        .collect();

    if rows.len() < total {
        debug!(dropped = total - rows.len(), "Skipped malformed OpenAQ rows");
    }
    Ok(rows)
}

/// Normalize a `/v2/measurements` body.
pub fn parse_measurements(body: &[u8]) -> Result<FeatureCollection, FetchError> {
    let rows: Vec<MeasurementRow> = decode_results(body)?;

    let features = rows
        .into_iter()
        .filter_map(|row| {
            let (lon, lat) = row.coordinates?.lon_lat()?;
            Some(
                Feature::point(lon, lat)
                    .with_property("parameter", row.parameter)
                    .with_property("value", row.value)
                    .with_property("unit", row.unit)
                    .with_property("datetime", date_value(row.date.as_ref()))
                    .with_property("location", row.location)
                    .with_property("country", row.country)
                    .with_property("city", row.city),
            )
        })
        .collect();

    Ok(FeatureCollection::from_features(features))
}

/// Normalize a `/v2/latest` body: one feature per nested measurement, placed
/// at its location's coordinates.
pub fn parse_latest(body: &[u8]) -> Result<FeatureCollection, FetchError> {
    let locations: Vec<LatestLocation> = decode_results(body)?;

    let mut features = Vec::new();
    for loc in locations {
        let Some((lon, lat)) = loc.coordinates.and_then(|c| c.lon_lat()) else {
            continue;
        };

        let total = loc.measurements.len();
        let measurements: Vec<LatestMeasurement> = loc
            .measurements
            .into_iter()
            .filter_map(|raw| serde_json::from_value(raw).ok())
            .collect();
        if measurements.len() < total {
            debug!(
                dropped = total - measurements.len(),
                "Skipped malformed OpenAQ latest measurements"
            );
        }

        for m in measurements {
            let datetime = first_present(&[&m.last_updated, &date_value(m.date.as_ref())]);
            features.push(
                Feature::point(lon, lat)
                    .with_property("parameter", m.parameter)
                    .with_property("value", m.value)
                    .with_property("unit", m.unit)
                    .with_property("datetime", datetime)
                    .with_property("location", loc.location.clone())
                    .with_property("country", loc.country.clone())
                    .with_property("city", loc.city.clone()),
            );
        }
    }

    Ok(FeatureCollection::from_features(features))
}

impl OpenDataClient {
    /// Pollutant readings near a coordinate.
    ///
    /// Tries `measurements` first. When that call fails or yields no
    /// features, `latest` is tried once. The fallback's outcome is final.
    #[instrument(skip(self), fields(source = "openaq"))]
    pub async fn air_quality(
        &self,
        query: &AirQualityQuery,
    ) -> Result<FeatureCollection, FetchError> {
        match self.air_quality_measurements(query).await {
            Ok(fc) if !fc.is_empty() => {
                info!(features = fc.len(), "Fetched OpenAQ measurements");
                return Ok(fc);
            }
            Ok(_) => info!("No OpenAQ measurements, falling back to latest"),
            Err(e) => warn!(error = %e, "OpenAQ measurements failed, falling back to latest"),
        }

        let fc = self.air_quality_latest(query).await?;
        info!(features = fc.len(), "Fetched OpenAQ latest");
        Ok(fc)
    }

    /// Primary path only: `/v2/measurements`.
    pub async fn air_quality_measurements(
        &self,
        query: &AirQualityQuery,
    ) -> Result<FeatureCollection, FetchError> {
        let request = query.request(&self.endpoints.openaq_measurements_url);
        let body = self.fetcher.fetch(&request).await?;
        parse_measurements(&body)
    }

    /// Fallback path only: `/v2/latest`.
    pub async fn air_quality_latest(
        &self,
        query: &AirQualityQuery,
    ) -> Result<FeatureCollection, FetchError> {
        let request = query.request(&self.endpoints.openaq_latest_url);
        let body = self.fetcher.fetch(&request).await?;
        parse_latest(&body)
    }
}
