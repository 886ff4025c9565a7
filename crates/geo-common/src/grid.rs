//! Hotspot grid aggregation.
//!
//! A bounding box is cut into a regular `rows x cols` grid. Facilities and
//! air-quality points are counted per cell and each cell is scored by how
//! much pollution signal it carries relative to the care available in it.

use crate::{BoundingBox, FeatureCollection};
use serde::{Deserialize, Serialize};

/// Weight applied to each facility when computing a cell's need score.
pub const FACILITY_WEIGHT: f64 = 0.5;

/// Dimensions of the hotspot grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Number of latitude bands.
    pub rows: usize,
    /// Number of longitude bands.
    pub cols: usize,
}

impl GridSpec {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build every cell of the grid over `bbox`, in row-major order.
    ///
    /// Row 0 is the southernmost band, column 0 the westernmost. Adjacent
    /// cells share the exact same edge value, so the half-open membership
    /// test places a point in at most one cell. The outermost edges are the
    /// bbox's own `north` and `east`, never a recomputed sum.
    pub fn cells(&self, bbox: &BoundingBox) -> Vec<GridCell> {
        if self.is_empty() {
            return Vec::new();
        }

        let cell_h = bbox.height() / self.rows as f64;
        let cell_w = bbox.width() / self.cols as f64;

        let lat_edge = |i: usize| {
            if i == self.rows {
                bbox.north
            } else {
                bbox.south + i as f64 * cell_h
            }
        };
        let lon_edge = |i: usize| {
            if i == self.cols {
                bbox.east
            } else {
                bbox.west + i as f64 * cell_w
            }
        };

        let mut cells = Vec::with_capacity(self.len());
        for r in 0..self.rows {
            for c in 0..self.cols {
                let cell_bbox =
                    BoundingBox::new(lat_edge(r), lon_edge(c), lat_edge(r + 1), lon_edge(c + 1));
                cells.push(GridCell::empty(format!("{}-{}", r, c), cell_bbox));
            }
        }
        cells
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self { rows: 6, cols: 6 }
    }
}

/// One scored cell of the hotspot grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    /// "row-col"
    pub id: String,

    pub bbox: BoundingBox,

    #[serde(rename = "facilities")]
    pub facility_count: u32,

    #[serde(rename = "aq_points")]
    pub air_quality_point_count: u32,

    pub need_score: f64,
}

impl GridCell {
    fn empty(id: String, bbox: BoundingBox) -> Self {
        Self {
            id,
            bbox,
            facility_count: 0,
            air_quality_point_count: 0,
            need_score: 0.0,
        }
    }

    /// `aq_points - 0.5 * facilities`
    pub fn compute_need_score(&self) -> f64 {
        self.air_quality_point_count as f64 - FACILITY_WEIGHT * self.facility_count as f64
    }
}

/// Score every cell of `spec` over `bbox` and return the `top_n` neediest.
///
/// Every cell is tested against every point, so a point lands in each cell
/// whose half-open bounds admit it. Points on the overall north or east edge
/// fall outside every cell. The sort is stable: equal scores keep row-major
/// order.
pub fn rank_cells(
    bbox: &BoundingBox,
    facilities: &FeatureCollection,
    air_quality: &FeatureCollection,
    spec: GridSpec,
    top_n: usize,
) -> Vec<GridCell> {
    let mut cells = spec.cells(bbox);

    for (lat, lon) in facilities.points() {
        for cell in cells.iter_mut() {
            if cell.bbox.contains_half_open(lat, lon) {
                cell.facility_count += 1;
            }
        }
    }

    for (lat, lon) in air_quality.points() {
        for cell in cells.iter_mut() {
            if cell.bbox.contains_half_open(lat, lon) {
                cell.air_quality_point_count += 1;
            }
        }
    }

    for cell in cells.iter_mut() {
        cell.need_score = cell.compute_need_score();
    }

    cells.sort_by(|a, b| b.need_score.total_cmp(&a.need_score));
    cells.truncate(top_n);
    cells
}
