//! Tests for the upstream sources against a scripted fetcher.
//!
//! Every test builds an [`OpenDataClient`] over a [`MockFetcher`] so the
//! recorded calls can be asserted alongside the normalized output.

use std::sync::Arc;

use geo_common::BoundingBox;
use open_data::{
    gibs::default_layers, AirQualityQuery, FetchError, Method, OpenDataClient, TileRequest,
};
use serde_json::Value;
use test_utils::fixtures::{self, test_endpoints};
use test_utils::{bbox_from, MockFetcher};

fn client(mock: MockFetcher) -> (OpenDataClient, Arc<MockFetcher>) {
    let mock = Arc::new(mock);
    (OpenDataClient::new(mock.clone(), test_endpoints()), mock)
}

fn cotonou() -> BoundingBox {
    bbox_from(fixtures::bbox::COTONOU)
}

fn amenities() -> Vec<String> {
    vec!["hospital".to_string(), "clinic".to_string(), "pharmacy".to_string()]
}

// ============================================================================
// Overpass: health facilities
// ============================================================================

#[tokio::test]
async fn test_facilities_normalized_and_unlocated_dropped() {
    let (client, _) = client(
        MockFetcher::new().respond(fixtures::OVERPASS_URL, fixtures::OVERPASS_FACILITIES),
    );

    let fc = client.health_facilities(&cotonou(), &amenities()).await.unwrap();
    assert_eq!(fc.len(), 3);

    let hospital = &fc.features[0].properties;
    assert_eq!(hospital["id"], "node/1001");
    assert_eq!(hospital["name"], "CNHU Hubert Koutoukou Maga");
    assert_eq!(hospital["amenity"], "hospital");
    assert_eq!(hospital["phone"], "+229 21 30 01 55");

    let clinic = &fc.features[1];
    assert_eq!(clinic.properties["name"], "Clinique Mahouna");
    assert_eq!(clinic.geometry.as_point(), Some((6.3721, 2.3902)));

    let pharmacy = &fc.features[2].properties;
    assert_eq!(pharmacy["name"], "Unknown");
    assert_eq!(pharmacy["phone"], "+229 97 00 00 00");
    assert_eq!(pharmacy["address"], "12 Rue 310 Cotonou");
}

#[tokio::test]
async fn test_overpass_request_is_single_line_form_post() {
    let (client, mock) = client(
        MockFetcher::new().respond(fixtures::OVERPASS_URL, fixtures::OVERPASS_FACILITIES),
    );

    client.health_facilities(&cotonou(), &amenities()).await.unwrap();

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, Method::PostForm);
    assert_eq!(calls[0].url, fixtures::OVERPASS_URL);

    let data = calls[0].param("data").unwrap();
    assert!(!data.contains('\n'));
    assert!(!data.contains("  "));
    assert!(data.contains(r#"["amenity"~"hospital|clinic|pharmacy"](6.32,2.33,6.45,2.52)"#));
}

#[tokio::test]
async fn test_overpass_error_status_propagates() {
    let (client, _) = client(MockFetcher::new().fail(fixtures::OVERPASS_URL, FetchError::Status(504)));

    let result = client.health_facilities(&cotonou(), &amenities()).await;
    assert_eq!(result.unwrap_err(), FetchError::Status(504));
}

#[tokio::test]
async fn test_overpass_html_body_is_decode_error() {
    let (client, _) = client(
        MockFetcher::new().respond(fixtures::OVERPASS_URL, "<html>rate limited</html>"),
    );

    let result = client.pollution_sources(&cotonou()).await;
    assert!(matches!(result, Err(FetchError::Decode(_))));
}

// ============================================================================
// Overpass: pollution sources
// ============================================================================

#[tokio::test]
async fn test_sources_classified() {
    let (client, _) =
        client(MockFetcher::new().respond(fixtures::OVERPASS_URL, fixtures::OVERPASS_SOURCES));

    let fc = client.pollution_sources(&cotonou()).await.unwrap();
    let kinds: Vec<&Value> = fc.features.iter().map(|f| &f.properties["type"]).collect();
    assert_eq!(kinds, ["road", "landfill", "power_plant", "factory", "source"]);

    assert_eq!(fc.features[0].properties["name"], "Boulevard de la Marina");
    assert_eq!(fc.features[1].properties["name"], "Unknown");
    assert_eq!(fc.features[2].properties["tags"]["power"], "plant");
}

// ============================================================================
// OpenAQ fallback
// ============================================================================

#[tokio::test]
async fn test_measurements_success_skips_latest() {
    let (client, mock) = client(
        MockFetcher::new()
            .respond(fixtures::OPENAQ_MEASUREMENTS_URL, fixtures::OPENAQ_MEASUREMENTS)
            .respond(fixtures::OPENAQ_LATEST_URL, fixtures::OPENAQ_LATEST),
    );

    let fc = client
        .air_quality(&AirQualityQuery::new(6.3703, 2.3912))
        .await
        .unwrap();

    // The row without coordinates is dropped
    assert_eq!(fc.len(), 2);
    assert_eq!(fc.features[0].properties["parameter"], "pm25");
    assert_eq!(fc.features[0].properties["datetime"], "2024-03-01T10:00:00+00:00");
    assert_eq!(mock.call_count(fixtures::OPENAQ_MEASUREMENTS_URL), 1);
    assert_eq!(mock.call_count(fixtures::OPENAQ_LATEST_URL), 0);
}

#[tokio::test]
async fn test_empty_measurements_fall_back_once() {
    let (client, mock) = client(
        MockFetcher::new()
            .respond(fixtures::OPENAQ_MEASUREMENTS_URL, fixtures::OPENAQ_EMPTY)
            .respond(fixtures::OPENAQ_LATEST_URL, fixtures::OPENAQ_LATEST),
    );

    let fc = client
        .air_quality(&AirQualityQuery::new(6.3703, 2.3912))
        .await
        .unwrap();

    assert_eq!(fc.len(), 3);
    assert_eq!(fc.features[0].properties["location"], "Akpakpa");
    assert_eq!(fc.features[1].properties["parameter"], "o3");
    assert_eq!(fc.features[2].properties["city"], "Abomey-Calavi");
    assert_eq!(mock.call_count(fixtures::OPENAQ_LATEST_URL), 1);
}

#[tokio::test]
async fn test_failed_measurements_fall_back_with_same_query() {
    let (client, mock) = client(
        MockFetcher::new()
            .fail(fixtures::OPENAQ_MEASUREMENTS_URL, FetchError::Status(500))
            .respond(fixtures::OPENAQ_LATEST_URL, fixtures::OPENAQ_LATEST),
    );

    let query = AirQualityQuery::new(6.3703, 2.3912).with_radius(5000).with_limit(200);
    let fc = client.air_quality(&query).await.unwrap();
    assert_eq!(fc.len(), 3);

    let calls = mock.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].params, calls[1].params);
    assert_eq!(calls[1].param("radius"), Some("5000"));
    assert_eq!(calls[1].param("limit"), Some("200"));
}

#[tokio::test]
async fn test_both_openaq_calls_fail() {
    let (client, mock) = client(
        MockFetcher::new()
            .fail(fixtures::OPENAQ_MEASUREMENTS_URL, FetchError::Status(500))
            .fail(
                fixtures::OPENAQ_LATEST_URL,
                FetchError::Transport("connection reset".to_string()),
            ),
    );

    let result = client.air_quality(&AirQualityQuery::new(6.3703, 2.3912)).await;
    assert_eq!(
        result.unwrap_err(),
        FetchError::Transport("connection reset".to_string())
    );
    assert_eq!(mock.calls().len(), 2);
}

#[tokio::test]
async fn test_empty_latest_is_final() {
    let (client, mock) = client(
        MockFetcher::new()
            .respond(fixtures::OPENAQ_MEASUREMENTS_URL, fixtures::OPENAQ_EMPTY)
            .respond(fixtures::OPENAQ_LATEST_URL, fixtures::OPENAQ_EMPTY),
    );

    let fc = client
        .air_quality(&AirQualityQuery::new(6.3703, 2.3912))
        .await
        .unwrap();
    assert!(fc.is_empty());
    assert_eq!(mock.calls().len(), 2);
}

// ============================================================================
// GIBS tiles
// ============================================================================

#[tokio::test]
async fn test_gibs_tile_url_and_bytes() {
    let (client, mock) = client(
        MockFetcher::new().respond(fixtures::GIBS_BASE_URL, fixtures::JPEG_TILE),
    );

    let tile = TileRequest::parse("S5P_NO2", "2024-03-01", "3", "3", "4.jpg", &default_layers())
        .unwrap();
    let bytes = client.gibs_tile(&tile).await.unwrap();
    assert_eq!(&bytes[..], fixtures::JPEG_TILE);

    let calls = mock.calls();
    assert_eq!(calls[0].method, Method::Get);
    assert!(calls[0].params.is_empty());
    assert_eq!(
        calls[0].url,
        "http://gibs.test/wmts/epsg3857/best/S5P_NO2_TROPOMI/default/2024-03-01/GoogleMapsCompatible_Level3/3/3/4.jpg"
    );
}

#[tokio::test]
async fn test_gibs_tile_failure_propagates() {
    let (client, _) =
        client(MockFetcher::new().fail(fixtures::GIBS_BASE_URL, FetchError::Status(404)));

    let tile = TileRequest::parse("VIIRS_DNB", "2024-03-01", "1", "0", "1.jpg", &default_layers())
        .unwrap();
    assert_eq!(client.gibs_tile(&tile).await.unwrap_err(), FetchError::Status(404));
}
