//! Error handling for Cutkit
//!
//! Provides error types for all layers of the driver:
//! - Geometry errors (operations that need at least one point)
//! - Configuration errors (offsets, tuning values)
//! - Connection errors (discovery, serial transport)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Geometry error type
///
/// Raised by helpers whose result is undefined without input points.
/// Points outside the clip region are never an error; they are clamped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The path list holds no points, so no bounding box exists
    #[error("{operation} requires at least one point, path list is empty")]
    EmptyPathList {
        /// The operation that was attempted.
        operation: &'static str,
    },
}

/// Configuration error type
///
/// Rejected before any geometry work begins.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// Offset is neither a scalar nor an (x, y) pair
    #[error("Invalid offset {value}: expected a number or an [x, y] pair")]
    InvalidOffset {
        /// The rejected input, rendered for display.
        value: String,
    },

    /// A tuning value is out of range
    #[error("Invalid value for '{name}': {reason}")]
    InvalidValue {
        /// The parameter name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Connection error type
///
/// Represents errors related to communication with the cutter,
/// including device discovery and the serial transport.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConnectionError {
    /// No known device is attached
    #[error("No cutter found (looked for {looked_for}). Check USB and power.")]
    DeviceNotFound {
        /// Human readable list of the devices that were searched for.
        looked_for: String,
    },

    /// Failed to open port
    #[error("Failed to open port {port}: {reason}")]
    FailedToOpen {
        /// The name of the port that failed to open.
        port: String,
        /// The reason the port failed to open.
        reason: String,
    },

    /// A write did not complete in time
    #[error("Write timeout after {timeout_ms}ms")]
    WriteTimeout {
        /// The timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// No response line arrived in time
    #[error("Read timeout after {timeout_ms}ms")]
    ReadTimeout {
        /// The timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// An operation needs a device but the session has none
    #[error("No device connected")]
    NotConnected,

    /// Serial port error
    #[error("Serial port error: {reason}")]
    SerialError {
        /// The reason for the serial port error.
        reason: String,
    },

    /// I/O error
    #[error("I/O error: {reason}")]
    IoError {
        /// The reason for the I/O error.
        reason: String,
    },
}

/// Main error type for Cutkit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Configuration error
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Connection error
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Malformed path list or report
    #[error("Format error: {0}")]
    Format(#[from] serde_json::Error),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this is a tolerated per-item timeout
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Error::Connection(ConnectionError::WriteTimeout { .. })
                | Error::Connection(ConnectionError::ReadTimeout { .. })
        )
    }

    /// Check if this is a connection error
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::Connection(_))
    }

    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Geometry(_))
    }

    /// Check if this is a configuration error
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
