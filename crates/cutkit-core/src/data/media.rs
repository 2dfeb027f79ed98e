//! Media presets
//!
//! Cutting parameters per media type: blade pressure, speed, depth, and
//! the colour of the blade cap to use.

use serde::Serialize;

/// Media id used when the requested one is out of range
pub const CUSTOM_MEDIA: u16 = 300;

/// Media id of the pen holder preset
pub const PEN_MEDIA: u16 = 113;

/// Default media: "Print Paper Light Weight"
pub const DEFAULT_MEDIA: u16 = 132;

/// One media preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MediaEntry {
    pub id: u16,
    pub pressure: Option<u8>,
    pub speed: Option<u8>,
    pub depth: Option<u8>,
    pub cap: &'static str,
    pub name: &'static str,
}

const fn entry(
    id: u16,
    pressure: Option<u8>,
    speed: Option<u8>,
    depth: Option<u8>,
    cap: &'static str,
    name: &'static str,
) -> MediaEntry {
    MediaEntry {
        id,
        pressure,
        speed,
        depth,
        cap,
        name,
    }
}

/// Known media presets, ordered by id
pub static MEDIA: &[MediaEntry] = &[
    entry(100, Some(27), Some(10), Some(1), "yellow", "Card without Craft Paper Backing"),
    entry(101, Some(27), Some(10), Some(1), "yellow", "Card with Craft Paper Backing"),
    entry(102, Some(10), Some(5), Some(1), "blue", "Vinyl Sticker"),
    entry(106, Some(14), Some(10), Some(1), "blue", "Film Labels"),
    entry(111, Some(27), Some(10), Some(1), "yellow", "Thick Media"),
    entry(112, Some(2), Some(10), Some(1), "blue", "Thin Media"),
    entry(113, Some(18), Some(10), None, "pen", "Pen"),
    entry(120, Some(30), Some(10), Some(1), "blue", "Bond Paper 13-28 lbs (105g)"),
    entry(121, Some(30), Some(10), Some(1), "yellow", "Bristol Paper 57-67 lbs (145g)"),
    entry(122, Some(30), Some(10), Some(1), "yellow", "Cardstock 40-60 lbs (90g)"),
    entry(123, Some(30), Some(10), Some(1), "yellow", "Cover 40-60 lbs (170g)"),
    entry(124, Some(1), Some(10), Some(1), "blue", "Film, Double Matte Translucent"),
    entry(125, Some(1), Some(10), Some(1), "blue", "Film, Vinyl With Adhesive Back"),
    entry(126, Some(1), Some(10), Some(1), "blue", "Film, Window With Kling Adhesive"),
    entry(127, Some(30), Some(10), Some(1), "red", "Index 90 lbs (165g)"),
    entry(128, Some(20), Some(10), Some(1), "yellow", "Inkjet Photo Paper 28-44 lbs (70g)"),
    entry(129, Some(27), Some(10), Some(1), "red", "Inkjet Photo Paper 45-75 lbs (110g)"),
    entry(130, Some(30), Some(3), Some(1), "red", "Magnetic Sheet"),
    entry(131, Some(30), Some(10), Some(1), "blue", "Offset 24-60 lbs (90g)"),
    entry(132, Some(5), Some(10), Some(1), "blue", "Print Paper Light Weight"),
    entry(133, Some(25), Some(10), Some(1), "yellow", "Print Paper Medium Weight"),
    entry(134, Some(20), Some(10), Some(1), "blue", "Sticker Sheet"),
    entry(135, Some(20), Some(10), Some(1), "red", "Tag 100 lbs (275g)"),
    entry(136, Some(30), Some(10), Some(1), "blue", "Text Paper 24-70 lbs (105g)"),
    entry(137, Some(30), Some(10), Some(1), "yellow", "Vellum Bristol 57-67 lbs (145g)"),
    entry(138, Some(30), Some(10), Some(1), "blue", "Writing Paper 24-70 lbs (105g)"),
    entry(300, None, None, None, "custom", "Custom"),
];

/// Map ids outside 100..=300 to the custom preset
pub fn resolve_media_id(media: u16) -> u16 {
    if (100..=CUSTOM_MEDIA).contains(&media) {
        media
    } else {
        CUSTOM_MEDIA
    }
}

/// Preset for `media`, if there is one
pub fn media_by_id(media: u16) -> Option<&'static MediaEntry> {
    MEDIA.iter().find(|m| m.id == media)
}
