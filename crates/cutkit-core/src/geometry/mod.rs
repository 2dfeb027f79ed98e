//! Plot geometry
//!
//! All coordinates are millimeters in the device frame: origin in the top
//! left corner of the media, x growing to the right, y growing downwards
//! (away from the carriage home). Just like SVG.

pub mod bbox;
pub mod clip;
pub mod transform;

use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use bbox::{BoundingBox, PlotBounds, Rect};
pub use transform::{find_bbox, flip, mirror};

/// A point in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Shift by an offset
    pub fn offset(self, offset: Offset) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One continuous pen-down stroke
pub type Path = Vec<Point>;

/// Ordered list of strokes; the pen is lifted between them
pub type PathList = Vec<Path>;

/// Translation applied to every point before clipping
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Offset {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<f64> for Offset {
    fn from(x: f64) -> Self {
        Self::new(x, 0.0)
    }
}

impl FromStr for Offset {
    type Err = ConfigurationError;

    /// Parse `"x"` or `"x,y"`
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || ConfigurationError::InvalidOffset {
            value: s.to_string(),
        };

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let numbers = parts
            .iter()
            .map(|p| p.parse::<f64>().map_err(|_| invalid()))
            .collect::<std::result::Result<Vec<f64>, _>>()?;

        match numbers.as_slice() {
            [x] => Ok(Self::new(*x, 0.0)),
            [x, y] => Ok(Self::new(*x, *y)),
            _ => Err(invalid()),
        }
    }
}
