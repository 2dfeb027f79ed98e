//! Cutkit Settings Crate
//!
//! Handles the driver configuration file.

pub mod config;
pub mod error;

pub use config::{Config, ConnectionSettings, PlotSettings, ToolSettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
