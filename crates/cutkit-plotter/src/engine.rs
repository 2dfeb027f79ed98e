//! Path traversal
//!
//! Walks a path list point by point: shift by the offset, record the
//! requested position in the bounding box, clamp into the clip region, and
//! hand the result to the encoder. Segments touching a clamped point become
//! travel moves when software clipping is enabled.

use crate::encoder::{cut, travel, CommandToken, ToolState};
use cutkit_core::{clip_point, Offset, PlotBounds, Point};

/// Switches for one traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraversalOptions {
    /// Demote segments with a clamped endpoint to travel moves
    pub sw_clipping: bool,
    /// Emit commands; when false only the bounds are accumulated
    pub emit: bool,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            sw_clipping: true,
            emit: true,
        }
    }
}

impl TraversalOptions {
    /// Accumulate bounds without producing any command
    pub fn silent() -> Self {
        Self {
            emit: false,
            ..Self::default()
        }
    }
}

fn push(
    tokens: &mut Vec<CommandToken>,
    tool: &mut ToolState,
    step: fn(ToolState, Point) -> (ToolState, Vec<CommandToken>),
    p: Point,
) {
    let (next, emitted) = step(*tool, p);
    *tool = next;
    tokens.extend(emitted);
}

/// Translate `paths` into motion commands
///
/// `offset` is relative to the clip region's origin when `bounds` carries a
/// region. Paths with fewer than two points are skipped. Returns the
/// commands and the tool state after the last one.
pub fn generate(
    paths: &[Vec<Point>],
    bounds: &mut PlotBounds,
    offset: Offset,
    options: TraversalOptions,
    tool: ToolState,
) -> (Vec<CommandToken>, ToolState) {
    let offset = match &bounds.clip {
        Some(region) => {
            let origin = region.rect.origin();
            Offset::new(offset.x + origin.x, offset.y + origin.y)
        }
        None => offset,
    };

    let mut tool = tool;
    let mut tokens = Vec::new();

    for (index, path) in paths.iter().enumerate() {
        if path.len() < 2 {
            tracing::trace!("Skipping degenerate path {} ({} points)", index, path.len());
            continue;
        }

        let start = path[0].offset(offset);
        bounds.bbox.visit(start);
        let (p0, mut last_inside) = clip_point(start, bounds.clip.as_mut());
        if options.emit {
            push(&mut tokens, &mut tool, travel, p0);
        }

        for requested in path[1..].iter().map(|p| p.offset(offset)) {
            bounds.bbox.visit(requested);
            let (p, inside) = clip_point(requested, bounds.clip.as_mut());

            if options.emit {
                if !options.sw_clipping || (inside && last_inside) {
                    push(&mut tokens, &mut tool, cut, p);
                } else {
                    push(&mut tokens, &mut tool, travel, p);
                }
            }
            last_inside = inside;
        }

        tracing::debug!("Path {}: {} points, {} commands so far", index, path.len(), tokens.len());
    }

    (tokens, tool)
}
