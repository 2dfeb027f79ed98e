//! Connection to the cutter
//!
//! The plot engine never touches the wire. It hands a finished command list
//! to a [`Transport`], which owns the physical connection.

pub mod serial;

use cutkit_core::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// CutcutGo talks at a fixed rate
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Byte-level link to a cutter
pub trait Transport: Send {
    /// Write `data`, failing with a write timeout if it does not drain in time
    fn write(&mut self, data: &[u8], timeout: Duration) -> Result<usize>;

    /// Read one response line without its terminator
    fn read_line(&mut self, timeout: Duration) -> Result<String>;

    /// Port or endpoint name, for logging
    fn name(&self) -> String;

    /// Close the link
    fn close(&mut self) -> Result<()>;
}

/// Serial parity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SerialParity {
    #[default]
    None,
    Even,
    Odd,
}

/// Parameters for opening a serial link
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionParams {
    /// Port name (e.g., "/dev/ttyACM0", "COM3")
    pub port: String,
    pub baud_rate: u32,
    pub data_bits: u8,
    pub stop_bits: u8,
    pub parity: SerialParity,
    /// Hardware flow control
    pub flow_control: bool,
}

impl ConnectionParams {
    /// 8N1 at the CutcutGo rate
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: 8,
            stop_bits: 1,
            parity: SerialParity::None,
            flow_control: false,
        }
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }
}
