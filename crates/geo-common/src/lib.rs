//! Common geographic types shared across the dashboard crates.

pub mod bbox;
pub mod feature;
pub mod grid;

pub use bbox::{BboxParseError, BoundingBox};
pub use feature::{Feature, FeatureCollection, Geometry, Properties};
pub use grid::{rank_cells, GridCell, GridSpec};
