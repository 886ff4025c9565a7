//! Clients for the third-party open-data services behind the dashboard.
//!
//! Each source issues exactly one upstream call per request and reshapes the
//! response into a GeoJSON [`FeatureCollection`](geo_common::FeatureCollection).
//! Failures are returned as [`FetchError`]; deciding to degrade them to an
//! empty collection is left to the caller.

pub mod client;
pub mod gibs;
pub mod openaq;
pub mod overpass;

pub use client::{
    Endpoints, FetchError, HttpFetcher, Method, OpenDataClient, ReqwestFetcher, UpstreamRequest,
};
pub use gibs::{GibsLayer, TileRequest, TileRequestError};
pub use openaq::AirQualityQuery;
