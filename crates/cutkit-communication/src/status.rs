//! Cutter readiness as reported by the `?` real-time query

use serde::{Deserialize, Serialize};
use std::fmt;

/// Real-time status query byte
pub const STATUS_QUERY: &str = "?";

/// Coarse machine state before and between jobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    /// Idle, accepting commands
    Ready,
    /// Still executing motion
    Moving,
    /// No media loaded
    Unloaded,
    /// Anything the firmware reported that we do not recognize
    Unknown(String),
}

impl DeviceStatus {
    /// Parse a GRBL-style report such as `<Idle|MPos:0.000,0.000,0.000|FS:0,0>`
    pub fn parse_report(line: &str) -> Self {
        let raw = line.trim();
        let state = raw
            .strip_prefix('<')
            .map(|body| body.trim_end_matches('>'))
            .and_then(|body| body.split(['|', ',']).next())
            .map(|s| s.split(':').next().unwrap_or(s));

        match state {
            Some("Idle") => DeviceStatus::Ready,
            Some("Run" | "Jog" | "Home" | "Hold") => DeviceStatus::Moving,
            Some("Door") => DeviceStatus::Unloaded,
            _ => DeviceStatus::Unknown(raw.to_string()),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, DeviceStatus::Ready)
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceStatus::Ready => write!(f, "ready"),
            DeviceStatus::Moving => write!(f, "moving"),
            DeviceStatus::Unloaded => write!(f, "unloaded"),
            DeviceStatus::Unknown(raw) => write!(f, "unknown ({})", raw),
        }
    }
}
