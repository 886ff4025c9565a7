//! Shared test utilities for the urban health dashboard workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Canned Overpass and OpenAQ response bodies
//! - A recording [`MockFetcher`] standing in for the upstream services
//! - Point feature generators for grid aggregation tests
//! - Workspace path helpers
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, MockFetcher};
//! ```

pub mod fixtures;
pub mod generators;
pub mod mock;
pub mod paths;

// Re-export commonly used items at the crate root
pub use generators::*;
pub use mock::MockFetcher;
pub use paths::*;
