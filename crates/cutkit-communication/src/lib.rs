//! # Cutkit Communication
//!
//! Transport layer between the plot engine and the cutter.
//! Provides the [`Transport`] trait, a serial implementation, discovery of
//! known cutters by USB id, and parsing of firmware status reports.

pub mod communication;
pub mod status;

pub use communication::{
    serial::{discover_device, list_ports, SerialPortInfo, SerialTransport},
    ConnectionParams, SerialParity, Transport, DEFAULT_BAUD_RATE,
};

pub use status::{DeviceStatus, STATUS_QUERY};
