//! OpenStreetMap Overpass sources: health facilities and pollution sources.

use std::collections::BTreeMap;

use geo_common::{BoundingBox, Feature, FeatureCollection};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::client::{decode_json, FetchError, OpenDataClient, UpstreamRequest};

/// Amenity values treated as points of care.
pub const DEFAULT_AMENITIES: [&str; 6] = [
    "hospital",
    "clinic",
    "doctors",
    "pharmacy",
    "dentist",
    "health_post",
];

/// Overpass QL for amenity nodes, ways and relations inside `bbox`.
pub fn facilities_query(bbox: &BoundingBox, amenities: &[String]) -> String {
    let regex = amenities.join("|");
    let b = bbox.overpass_filter();
    format!(
        r#"
[out:json][timeout:25];
(
  node["amenity"~"{regex}"]({b});
  way["amenity"~"{regex}"]({b});
  relation["amenity"~"{regex}"]({b});
);
out center tags;
"#
    )
}

/// Overpass QL for industry, landfills, power plants and major roads inside `bbox`.
pub fn sources_query(bbox: &BoundingBox) -> String {
    let b = bbox.overpass_filter();
    format!(
        r#"
[out:json][timeout:25];
(
  node["landuse"="industrial"]({b});
  way["landuse"="industrial"]({b});
  node["industrial"]({b});
  node["man_made"="works"]({b});
  way["man_made"="works"]({b});
  node["landuse"="landfill"]({b});
  way["landuse"="landfill"]({b});
  node["amenity"="waste_disposal"]({b});
  node["power"="plant"]({b});
  way["power"="plant"]({b});
  way["highway"~"^(motorway|trunk|primary)$"]({b});
);
out center tags;
"#
    )
}

/// Collapse runs of whitespace so the query travels as a single line.
pub fn collapse_whitespace(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Deserialize)]
struct OverpassResponse {
    #[serde(default)]
    elements: Vec<Value>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Center {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// One element of an Overpass `out center tags` response.
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassElement {
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub id: i64,

    pub lat: Option<f64>,
    pub lon: Option<f64>,

    /// Present for ways and relations.
    pub center: Option<Center>,

    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl OverpassElement {
    /// (lon, lat): nodes carry their own position, everything else its center.
    pub fn position(&self) -> Option<(f64, f64)> {
        if self.kind == "node" {
            Some((self.lon?, self.lat?))
        } else {
            let center = self.center?;
            Some((center.lon?, center.lat?))
        }
    }

    /// "type/id", e.g. "way/123456".
    pub fn osm_id(&self) -> String {
        format!("{}/{}", self.kind, self.id)
    }

    fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// First non-empty value among `keys`.
    fn first_tag(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|k| self.tag(k))
    }

    fn tag_is(&self, key: &str, value: &str) -> bool {
        self.tags.get(key).is_some_and(|v| v == value)
    }
}

/// Decode the `elements` array, dropping any element that does not fit the
/// expected shape.
pub fn parse_elements(body: &[u8]) -> Result<Vec<OverpassElement>, FetchError> {
    let response: OverpassResponse = decode_json(body)?;
    let total = response.elements.len();

    let elements: Vec<OverpassElement> = response
        .elements
        .into_iter()
        .filter_map(|raw| serde_json::from_value(raw).ok())
        .collect();

    if elements.len() < total {
        debug!(dropped = total - elements.len(), "Skipped malformed Overpass elements");
    }
    Ok(elements)
}

/// Map an element to a facility feature; `None` when it has no position.
pub fn normalize_facility(element: &OverpassElement) -> Option<Feature> {
    let (lon, lat) = element.position()?;

    let address = ["addr:housenumber", "addr:street", "addr:city"]
        .iter()
        .filter_map(|k| element.tag(k))
        .collect::<Vec<_>>()
        .join(" ");

    let phone = element
        .first_tag(&["phone", "contact:phone"])
        .map_or(Value::Null, Value::from);

    Some(
        Feature::point(lon, lat)
            .with_property("id", element.osm_id())
            .with_property(
                "name",
                element.first_tag(&["name", "official_name"]).unwrap_or("Unknown"),
            )
            .with_property(
                "amenity",
                element.tags.get("amenity").map_or("unknown", String::as_str),
            )
            .with_property("phone", phone)
            .with_property("address", address),
    )
}

/// Category of a pollution source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Road,
    Landfill,
    PowerPlant,
    Factory,
    Source,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Road => "road",
            SourceKind::Landfill => "landfill",
            SourceKind::PowerPlant => "power_plant",
            SourceKind::Factory => "factory",
            SourceKind::Source => "source",
        }
    }
}

/// Classify an element returned by [`sources_query`].
pub fn classify_source(element: &OverpassElement) -> SourceKind {
    if element.kind == "way" && element.tags.contains_key("highway") {
        SourceKind::Road
    } else if element.tag_is("landuse", "landfill") || element.tag_is("amenity", "waste_disposal")
    {
        SourceKind::Landfill
    } else if element.tag_is("power", "plant") {
        SourceKind::PowerPlant
    } else if element.tag_is("landuse", "industrial")
        || element.tags.contains_key("industrial")
        || element.tag_is("man_made", "works")
    {
        SourceKind::Factory
    } else {
        SourceKind::Source
    }
}

/// Map an element to a pollution-source feature; `None` when it has no position.
pub fn normalize_source(element: &OverpassElement) -> Option<Feature> {
    let (lon, lat) = element.position()?;

    let tags: serde_json::Map<String, Value> = element
        .tags
        .iter()
        .map(|(k, v)| (k.clone(), Value::from(v.as_str())))
        .collect();

    Some(
        Feature::point(lon, lat)
            .with_property("id", element.osm_id())
            .with_property("name", element.tag("name").unwrap_or("Unknown"))
            .with_property("type", classify_source(element).as_str())
            .with_property("tags", Value::Object(tags)),
    )
}

impl OpenDataClient {
    /// Health facilities matching `amenities` inside `bbox`.
    #[instrument(skip(self, amenities), fields(source = "overpass"))]
    pub async fn health_facilities(
        &self,
        bbox: &BoundingBox,
        amenities: &[String],
    ) -> Result<FeatureCollection, FetchError> {
        let elements = self.overpass(&facilities_query(bbox, amenities)).await?;
        let features: Vec<Feature> = elements.iter().filter_map(normalize_facility).collect();

        info!(
            elements = elements.len(),
            features = features.len(),
            "Fetched health facilities"
        );
        Ok(FeatureCollection::from_features(features))
    }

    /// Industrial and traffic pollution sources inside `bbox`.
    #[instrument(skip(self), fields(source = "overpass"))]
    pub async fn pollution_sources(
        &self,
        bbox: &BoundingBox,
    ) -> Result<FeatureCollection, FetchError> {
        let elements = self.overpass(&sources_query(bbox)).await?;
        let features: Vec<Feature> = elements.iter().filter_map(normalize_source).collect();

        info!(
            elements = elements.len(),
            features = features.len(),
            "Fetched pollution sources"
        );
        Ok(FeatureCollection::from_features(features))
    }

    async fn overpass(&self, query: &str) -> Result<Vec<OverpassElement>, FetchError> {
        let request = UpstreamRequest::post_form(&self.endpoints.overpass_url)
            .with_param("data", collapse_whitespace(query));

        let body = self.fetcher.fetch(&request).await?;
        parse_elements(&body)
    }
}
