//! Bounding-box accumulation
//!
//! Extents are stored literally. The device calls the top edge of the media
//! (nearest the carriage home) "upper right y" and the bottom edge "lower left
//! y"; here they are simply `min_y` and `max_y`.

use super::clip::ClipRegion;
use super::Point;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        min_x: 0.0,
        max_x: 0.0,
        min_y: 0.0,
        max_y: 0.0,
    };

    pub const fn new(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Degenerate rectangle holding a single point
    pub const fn from_point(p: Point) -> Self {
        Self::new(p.x, p.x, p.y, p.y)
    }

    /// Grow to include `p`
    pub fn extend(&mut self, p: Point) {
        if p.x < self.min_x {
            self.min_x = p.x;
        }
        if p.x > self.max_x {
            self.max_x = p.x;
        }
        if p.y < self.min_y {
            self.min_y = p.y;
        }
        if p.y > self.max_y {
            self.max_y = p.y;
        }
    }

    /// Top left corner, the origin of the region
    pub fn origin(&self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    /// Closed outline starting and ending at the top left corner, clockwise
    /// on the media
    pub fn outline(&self) -> [Point; 5] {
        [
            Point::new(self.min_x, self.min_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
            Point::new(self.min_x, self.max_y),
            Point::new(self.min_x, self.min_y),
        ]
    }
}

/// Running bounding box over visited points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    extents: Option<Rect>,
    count: usize,
}

impl BoundingBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the extents with `p`; the first point initializes all four
    pub fn extend(&mut self, p: Point) {
        match self.extents.as_mut() {
            Some(rect) => rect.extend(p),
            None => self.extents = Some(Rect::from_point(p)),
        }
    }

    /// Extend and count one visited point
    pub fn visit(&mut self, p: Point) {
        self.extend(p);
        self.count += 1;
    }

    /// Extents, `None` until the first point
    pub fn extents(&self) -> Option<Rect> {
        self.extents
    }

    /// Extents, all zero when nothing was seen
    pub fn extents_or_zero(&self) -> Rect {
        self.extents.unwrap_or(Rect::ZERO)
    }

    /// Number of visited points
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.extents.is_none()
    }
}

/// Accumulated state of one plot: the requested-point box and the optional
/// clip region with its counter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotBounds {
    pub bbox: BoundingBox,
    pub clip: Option<ClipRegion>,
}

impl PlotBounds {
    /// Bounds without a clip region: every point is inside
    pub fn unclipped() -> Self {
        Self::default()
    }

    /// Bounds clamped to `region`
    pub fn clipped_to(region: ClipRegion) -> Self {
        Self {
            bbox: BoundingBox::new(),
            clip: Some(region),
        }
    }

    /// Points that had to be clamped, 0 without a region
    pub fn clipped_count(&self) -> usize {
        self.clip.as_ref().map_or(0, |c| c.clipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_point_initializes_all_extents() {
        let mut bbox = BoundingBox::new();
        assert!(bbox.is_empty());
        bbox.extend(Point::new(3.0, -2.0));
        assert_eq!(bbox.extents(), Some(Rect::new(3.0, 3.0, -2.0, -2.0)));
        assert_eq!(bbox.count(), 0);
    }

    #[test]
    fn test_visit_tracks_min_max_and_count() {
        let mut bbox = BoundingBox::new();
        for p in [(0.0, 0.0), (4.5, 10.0), (4.5, 20.0), (-1.0, 5.0)] {
            bbox.visit(p.into());
        }
        assert_eq!(bbox.extents_or_zero(), Rect::new(-1.0, 4.5, 0.0, 20.0));
        assert_eq!(bbox.count(), 4);
    }

    #[test]
    fn test_empty_box_reports_zero() {
        assert_eq!(BoundingBox::new().extents_or_zero(), Rect::ZERO);
    }

    #[test]
    fn test_outline_is_closed() {
        let outline = Rect::new(1.0, 3.0, 2.0, 5.0).outline();
        assert_eq!(outline[0], outline[4]);
        assert_eq!(outline[2], Point::new(3.0, 5.0));
    }

    #[test]
    fn test_origin_is_top_left() {
        let rect = Rect::new(1.0, 3.0, 2.0, 5.0);
        assert_eq!(rect.origin(), Point::new(1.0, 2.0));
        assert_eq!(rect.origin(), rect.outline()[0]);
    }
}
