//! Known cutter hardware

use serde::{Deserialize, Serialize};

/// USB vendor id of the Cricut Maker family
pub const VENDOR_ID_CRICUT: u16 = 0x04d8;

/// USB product id of the Cricut Maker 1
pub const PRODUCT_ID_CRICUT_MAKER1: u16 = 0x000a;

/// Hardware description of one cutter model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub name: String,
    pub vendor_id: Option<u16>,
    pub product_id: Option<u16>,
    /// Usable cutting width, when the hardware has a fixed one
    pub width_mm: Option<f64>,
    pub length_mm: Option<f64>,
    pub margin_top_mm: Option<f64>,
    pub margin_left_mm: Option<f64>,
    /// Hardware can read registration marks
    pub regmark: bool,
}

impl DeviceProfile {
    /// Cricut Maker 1 running CutcutGo
    pub fn cricut_maker1() -> Self {
        Self {
            name: "Cricut_Maker1".to_string(),
            vendor_id: Some(VENDOR_ID_CRICUT),
            product_id: Some(PRODUCT_ID_CRICUT_MAKER1),
            width_mm: Some(206.0),
            length_mm: Some(3000.0),
            margin_top_mm: None,
            margin_left_mm: None,
            regmark: true,
        }
    }

    /// Stand-in used for dry runs when nothing is attached
    pub fn dummy() -> Self {
        Self {
            name: "Crashtest Dummy Device".to_string(),
            vendor_id: None,
            product_id: None,
            width_mm: None,
            length_mm: None,
            margin_top_mm: None,
            margin_left_mm: None,
            regmark: false,
        }
    }

    /// True when `vid:pid` identifies this model
    pub fn matches_usb(&self, vid: u16, pid: u16) -> bool {
        self.vendor_id == Some(vid) && self.product_id == Some(pid)
    }

    /// Media is left aligned by default when the width is known
    pub fn default_left_aligned(&self) -> bool {
        self.width_mm.is_some()
    }
}

/// Every cutter the driver knows how to talk to
pub fn known_devices() -> Vec<DeviceProfile> {
    vec![DeviceProfile::cricut_maker1()]
}
