//! Bounding-box query and flip/mirror of whole cuts

use super::{BoundingBox, PathList, Point, Rect};
use crate::error::{GeometryError, Result};

/// Bounding box of every point in `paths`
///
/// Fails when there are no points: a zero box would be silently wrong.
pub fn find_bbox(paths: &[Vec<Point>]) -> Result<Rect> {
    bbox_of("find_bbox", paths)
}

/// Copy of `paths` reflected top to bottom, keeping the extents
///
/// `y' = max_y + min_y - y`
pub fn flip(paths: &[Vec<Point>]) -> Result<PathList> {
    let bb = bbox_of("flip", paths)?;
    Ok(map_points(paths, |p| Point::new(p.x, bb.max_y + bb.min_y - p.y)))
}

/// Copy of `paths` reflected left to right, keeping the extents
///
/// `x' = max_x + min_x - x`
pub fn mirror(paths: &[Vec<Point>]) -> Result<PathList> {
    let bb = bbox_of("mirror", paths)?;
    Ok(map_points(paths, |p| Point::new(bb.max_x + bb.min_x - p.x, p.y)))
}

fn bbox_of(operation: &'static str, paths: &[Vec<Point>]) -> Result<Rect> {
    let mut bbox = BoundingBox::new();
    paths.iter().flatten().for_each(|p| bbox.extend(*p));
    bbox.extents()
        .ok_or_else(|| GeometryError::EmptyPathList { operation }.into())
}

fn map_points(paths: &[Vec<Point>], f: impl Fn(&Point) -> Point) -> PathList {
    paths
        .iter()
        .map(|path| path.iter().map(&f).collect())
        .collect()
}
