//! # Cutkit Core
//!
//! Core types and geometry for Cutkit.
//! Provides points and path lists, bounding-box accumulation, clipping
//! against the media region, flip/mirror helpers, the device and media
//! tables, and the error types shared by every crate in the workspace.

pub mod data;
pub mod error;
pub mod geometry;

pub use data::{
    devices::{known_devices, DeviceProfile},
    media::{media_by_id, resolve_media_id, MediaEntry, MEDIA},
};

pub use error::{ConfigurationError, ConnectionError, Error, GeometryError, Result};

pub use geometry::{
    clip::{clip_point, ClipRegion, DEFAULT_CLIP_FUZZ},
    find_bbox, flip, mirror, BoundingBox, Offset, Path, PathList, PlotBounds, Point, Rect,
};
