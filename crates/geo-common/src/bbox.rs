//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in degrees.
///
/// Axis order follows the Overpass convention: south, west, north, east.
/// On the wire it is the array `[south, west, north, east]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Create a new bounding box from its four edges.
    ///
    /// No ordering check is made; use [`BoundingBox::validated`] for untrusted input.
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Create a bounding box, rejecting non-finite or inverted extents.
    pub fn validated(south: f64, west: f64, north: f64, east: f64) -> Result<Self, BboxParseError> {
        let bbox = Self::new(south, west, north, east);
        if !(south.is_finite() && west.is_finite() && north.is_finite() && east.is_finite()) {
            return Err(BboxParseError::NonFinite);
        }
        if south >= north || west >= east {
            return Err(BboxParseError::InvertedExtent(bbox));
        }
        Ok(bbox)
    }

    /// Parse a `bbox` query parameter: "south,west,north,east"
    pub fn from_query_string(s: &str) -> Result<Self, BboxParseError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }

        let mut values = [0.0f64; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| BboxParseError::InvalidNumber(part.to_string()))?;
        }

        Self::validated(values[0], values[1], values[2], values[3])
    }

    /// Extent in degrees of latitude.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Extent in degrees of longitude.
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Half-open membership test: the south and west edges are inside,
    /// the north and east edges are not.
    pub fn contains_half_open(&self, lat: f64, lon: f64) -> bool {
        lat >= self.south && lat < self.north && lon >= self.west && lon < self.east
    }

    /// Render as the "s,w,n,e" fragment used in Overpass filters.
    pub fn overpass_filter(&self) -> String {
        format!("{},{},{},{}", self.south, self.west, self.north, self.east)
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.south, self.west, self.north, self.east]
    }
}

impl TryFrom<[f64; 4]> for BoundingBox {
    type Error = BboxParseError;

    fn try_from(value: [f64; 4]) -> Result<Self, Self::Error> {
        Self::validated(value[0], value[1], value[2], value[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(bbox: BoundingBox) -> Self {
        bbox.to_array()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid bbox format: {0}. Expected 'south,west,north,east'")]
    InvalidFormat(String),

    #[error("Invalid number in bbox: {0}")]
    InvalidNumber(String),

    #[error("Bbox coordinates must be finite")]
    NonFinite,

    #[error("Bbox requires south < north and west < east, got {0:?}")]
    InvertedExtent(BoundingBox),
}
