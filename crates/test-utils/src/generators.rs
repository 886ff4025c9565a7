//! Point feature generators for grid aggregation tests.

use geo_common::{BoundingBox, Feature, FeatureCollection, GridSpec};

/// Build a bounding box from a fixture tuple.
pub fn bbox_from(t: (f64, f64, f64, f64)) -> BoundingBox {
    BoundingBox::new(t.0, t.1, t.2, t.3)
}

/// A collection of bare point features from (lon, lat) pairs.
pub fn point_collection(coords: &[(f64, f64)]) -> FeatureCollection {
    FeatureCollection::from_features(
        coords
            .iter()
            .map(|&(lon, lat)| Feature::point(lon, lat))
            .collect(),
    )
}

/// (lon, lat) of the centre of cell `row-col`.
pub fn cell_center(bbox: &BoundingBox, spec: GridSpec, row: usize, col: usize) -> (f64, f64) {
    let cell_h = bbox.height() / spec.rows as f64;
    let cell_w = bbox.width() / spec.cols as f64;
    (
        bbox.west + (col as f64 + 0.5) * cell_w,
        bbox.south + (row as f64 + 0.5) * cell_h,
    )
}

/// `n` points placed at the centre of cell `row-col`.
pub fn points_in_cell(
    bbox: &BoundingBox,
    spec: GridSpec,
    row: usize,
    col: usize,
    n: usize,
) -> Vec<(f64, f64)> {
    vec![cell_center(bbox, spec, row, col); n]
}
