//! Serial port communication implementation
//!
//! Provides low-level serial port operations for the USB CDC link to the
//! cutter.
//!
//! Supports:
//! - Port enumeration and discovery of known cutters by USB id
//! - Baud rate, parity, and stop bit configuration
//! - Blocking writes and line reads with per-call timeouts

use crate::{ConnectionParams, SerialParity, Transport};
use cutkit_core::data::devices::DeviceProfile;
use cutkit_core::{ConnectionError, Error, Result};
use std::io::{self, Read, Write};
use std::time::Duration;

/// Information about an available serial port
#[derive(Debug, Clone, PartialEq)]
pub struct SerialPortInfo {
    /// Port name (e.g., "/dev/ttyACM0", "COM3")
    pub port_name: String,

    /// Port description (e.g., "USB Serial Port")
    pub description: String,

    /// Manufacturer name if available
    pub manufacturer: Option<String>,

    /// USB vendor ID if applicable
    pub vid: Option<u16>,

    /// USB product ID if applicable
    pub pid: Option<u16>,
}

impl SerialPortInfo {
    /// Create a new port info
    pub fn new(port_name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            description: description.into(),
            manufacturer: None,
            vid: None,
            pid: None,
        }
    }

    /// Set manufacturer
    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    /// Set USB IDs
    pub fn with_usb_ids(mut self, vid: u16, pid: u16) -> Self {
        self.vid = Some(vid);
        self.pid = Some(pid);
        self
    }

    /// First known device whose USB ids match this port
    pub fn identify<'a>(&self, devices: &'a [DeviceProfile]) -> Option<&'a DeviceProfile> {
        let (vid, pid) = (self.vid?, self.pid?);
        devices.iter().find(|d| d.matches_usb(vid, pid))
    }
}

/// List available serial ports on the system
///
/// Filters ports to the patterns a USB cutter shows up as:
/// - Windows: COM* (e.g., COM1, COM3)
/// - Linux: /dev/ttyUSB*, /dev/ttyACM*
/// - macOS: /dev/cu.usbserial-*, /dev/cu.usbmodem*
pub fn list_ports() -> Result<Vec<SerialPortInfo>> {
    let ports = serialport::available_ports().map_err(|e| {
        tracing::error!("Failed to enumerate serial ports: {}", e);
        ConnectionError::SerialError {
            reason: format!("Failed to enumerate ports: {}", e),
        }
    })?;

    Ok(ports
        .iter()
        .filter(|port| is_valid_cutter_port(&port.port_name))
        .map(|port| {
            let info = SerialPortInfo::new(&port.port_name, get_port_description(port));
            match &port.port_type {
                serialport::SerialPortType::UsbPort(usb_info) => {
                    let info = info.with_usb_ids(usb_info.vid, usb_info.pid);
                    match usb_info.manufacturer {
                        Some(ref mfg) => info.with_manufacturer(mfg),
                        None => info,
                    }
                }
                _ => info,
            }
        })
        .collect())
}

/// Find the first attached port that belongs to one of `devices`
pub fn discover_device(
    devices: &[DeviceProfile],
) -> Result<Option<(SerialPortInfo, DeviceProfile)>> {
    let found = list_ports()?.into_iter().find_map(|port| {
        let device = port.identify(devices)?.clone();
        Some((port, device))
    });

    if let Some((port, device)) = &found {
        tracing::info!("{} found on port {}", device.name, port.port_name);
    }
    Ok(found)
}

/// Check if a port name matches USB serial patterns
fn is_valid_cutter_port(port_name: &str) -> bool {
    if port_name.len() > 3
        && port_name.starts_with("COM")
        && port_name[3..].chars().all(|c| c.is_ascii_digit())
    {
        return true;
    }

    if port_name.starts_with("/dev/ttyUSB") || port_name.starts_with("/dev/ttyACM") {
        return true;
    }

    port_name.starts_with("/dev/cu.usbserial-") || port_name.starts_with("/dev/cu.usbmodem")
}

/// Get a user-friendly description for a port
fn get_port_description(port: &serialport::SerialPortInfo) -> String {
    match &port.port_type {
        serialport::SerialPortType::UsbPort(usb_info) => {
            format!(
                "USB {} {}",
                usb_info.manufacturer.as_deref().unwrap_or("Device"),
                usb_info.product.as_deref().unwrap_or("Serial Port")
            )
        }
        serialport::SerialPortType::BluetoothPort => "Bluetooth Serial".to_string(),
        serialport::SerialPortType::PciPort => "PCI Serial".to_string(),
        _ => "Serial Port".to_string(),
    }
}

/// Convert a parity setting to serialport format
fn to_serialport_parity(parity: SerialParity) -> serialport::Parity {
    match parity {
        SerialParity::None => serialport::Parity::None,
        SerialParity::Even => serialport::Parity::Even,
        SerialParity::Odd => serialport::Parity::Odd,
    }
}

fn timeout_ms(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

/// Map an I/O error, turning timeouts into the tolerated variant `timeout`
fn map_io(err: io::Error, timeout: ConnectionError) -> Error {
    match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => timeout.into(),
        _ => ConnectionError::IoError {
            reason: err.to_string(),
        }
        .into(),
    }
}

/// Serial link backed by the serialport crate
pub struct SerialTransport {
    port: Box<dyn serialport::SerialPort>,
    name: String,
}

impl SerialTransport {
    /// Open a serial port with the given parameters
    pub fn open(params: &ConnectionParams) -> Result<Self> {
        let invalid = |what: &str, value: u8| ConnectionError::FailedToOpen {
            port: params.port.clone(),
            reason: format!("Invalid {}: {}", what, value),
        };

        let builder = serialport::new(&params.port, params.baud_rate)
            .timeout(Duration::from_millis(5000))
            .data_bits(match params.data_bits {
                5 => serialport::DataBits::Five,
                6 => serialport::DataBits::Six,
                7 => serialport::DataBits::Seven,
                8 => serialport::DataBits::Eight,
                other => return Err(invalid("data bits", other).into()),
            })
            .stop_bits(match params.stop_bits {
                1 => serialport::StopBits::One,
                2 => serialport::StopBits::Two,
                other => return Err(invalid("stop bits", other).into()),
            })
            .parity(to_serialport_parity(params.parity))
            .flow_control(if params.flow_control {
                serialport::FlowControl::Hardware
            } else {
                serialport::FlowControl::None
            });

        match builder.open() {
            Ok(port) => Ok(Self {
                port,
                name: params.port.clone(),
            }),
            Err(e) => {
                tracing::warn!("Failed to open serial port {}: {}", params.port, e);
                Err(ConnectionError::FailedToOpen {
                    port: params.port.clone(),
                    reason: e.to_string(),
                }
                .into())
            }
        }
    }

    fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
        self.port.set_timeout(timeout).map_err(|e| {
            ConnectionError::SerialError {
                reason: e.to_string(),
            }
            .into()
        })
    }
}

impl Transport for SerialTransport {
    fn write(&mut self, data: &[u8], timeout: Duration) -> Result<usize> {
        self.set_timeout(timeout)?;
        let timed_out = ConnectionError::WriteTimeout {
            timeout_ms: timeout_ms(timeout),
        };
        self.port
            .write_all(data)
            .and_then(|_| self.port.flush())
            .map_err(|e| map_io(e, timed_out))?;
        Ok(data.len())
    }

    fn read_line(&mut self, timeout: Duration) -> Result<String> {
        self.set_timeout(timeout)?;
        let mut line = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            match self.port.read(&mut byte) {
                Ok(0) => break,
                Ok(_) if byte[0] == b'\n' => break,
                Ok(_) => line.push(byte[0]),
                Err(e) => {
                    let timed_out = ConnectionError::ReadTimeout {
                        timeout_ms: timeout_ms(timeout),
                    };
                    return Err(map_io(e, timed_out));
                }
            }
        }
        Ok(String::from_utf8_lossy(&line).trim_end_matches('\r').to_string())
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn close(&mut self) -> Result<()> {
        self.port.flush()?;
        Ok(())
    }
}
