//! Point clipping against the media region
//!
//! This is an axis-aligned clamp, not a segment/rectangle intersection. A
//! segment that leaves the region is not split at the boundary; its clamped
//! endpoint is reported as outside and the plot engine turns the segment
//! into a travel move.

use super::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Default clip tolerance in millimeters (the device resolution)
pub const DEFAULT_CLIP_FUZZ: f64 = 0.05;

/// Hard limits that requested points are snapped into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipRegion {
    pub rect: Rect,
    /// Distance a point may stray past an edge before it is clamped
    pub fuzz: f64,
    /// Points that deviated from their requested position
    pub clipped: usize,
}

impl ClipRegion {
    pub fn new(rect: Rect) -> Self {
        Self::with_fuzz(rect, DEFAULT_CLIP_FUZZ)
    }

    pub fn with_fuzz(rect: Rect, fuzz: f64) -> Self {
        Self {
            rect,
            fuzz,
            clipped: 0,
        }
    }

    /// Clamp `p` into the region
    ///
    /// Returns the clamped point and whether it was inside. Each edge test
    /// runs independently, so a point can be clamped on both axes; the
    /// counter still moves by one.
    pub fn clip(&mut self, p: Point) -> (Point, bool) {
        let Point { mut x, mut y } = p;
        let r = &self.rect;
        let mut inside = true;

        if r.min_x - x > self.fuzz {
            x = r.min_x;
            inside = false;
        }
        if x - r.max_x > self.fuzz {
            x = r.max_x;
            inside = false;
        }
        if r.min_y - y > self.fuzz {
            y = r.min_y;
            inside = false;
        }
        if y - r.max_y > self.fuzz {
            y = r.max_y;
            inside = false;
        }

        if !inside {
            tracing::trace!("Clipped point {} to ({}, {})", p, x, y);
            self.clipped += 1;
        }
        (Point::new(x, y), inside)
    }
}

/// Clip against an optional region; without one every point is inside
pub fn clip_point(p: Point, region: Option<&mut ClipRegion>) -> (Point, bool) {
    match region {
        Some(region) => region.clip(p),
        None => (p, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> ClipRegion {
        ClipRegion::new(Rect::new(0.0, 4.0, 0.0, 20.0))
    }

    #[test]
    fn test_no_region_is_always_inside() {
        let p = Point::new(-100.0, 1e6);
        assert_eq!(clip_point(p, None), (p, true));
    }

    #[test]
    fn test_point_on_edge_is_not_clamped() {
        let mut r = region();
        for p in [(0.0, 0.0), (4.0, 20.0), (4.0, 0.0), (0.0, 20.0)] {
            let p = Point::from(p);
            assert_eq!(r.clip(p), (p, true));
        }
        assert_eq!(r.clipped, 0);
    }

    #[test]
    fn test_within_fuzz_is_not_clamped() {
        let mut r = region();
        let p = Point::new(4.04, -0.04);
        assert_eq!(r.clip(p), (p, true));
        assert_eq!(r.clipped, 0);
    }

    #[test]
    fn test_clamp_counts_once_for_two_axes() {
        let mut r = region();
        let (p, inside) = r.clip(Point::new(4.5, 25.0));
        assert!(!inside);
        assert_eq!(p, Point::new(4.0, 20.0));
        assert_eq!(r.clipped, 1);

        let (p, inside) = r.clip(Point::new(-1.0, -1.0));
        assert!(!inside);
        assert_eq!(p, Point::new(0.0, 0.0));
        assert_eq!(r.clipped, 2);
    }

    #[test]
    fn test_custom_fuzz() {
        let mut r = ClipRegion::with_fuzz(Rect::new(0.0, 4.0, 0.0, 20.0), 1.0);
        assert!(r.clip(Point::new(4.5, 10.0)).1);
        assert!(!r.clip(Point::new(5.5, 10.0)).1);
    }
}
