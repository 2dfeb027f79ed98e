//! Static device data
//!
//! - Known cutter hardware (USB ids, media width, margins)
//! - Media presets (pressure, speed, blade depth)

pub mod devices;
pub mod media;
