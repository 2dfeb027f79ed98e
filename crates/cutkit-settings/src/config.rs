//! Configuration file handling for Cutkit
//!
//! Supports JSON and TOML files, by default stored in the platform config
//! directory.
//!
//! Configuration is organized into sections:
//! - Connection settings (port, baud rate, timeouts, dry run, transcript)
//! - Plot settings (media size, margins, offset, clipping)
//! - Tool settings (media preset, tool holder, overrides)

use crate::error::{ConfigError, SettingsError, SettingsResult};
use cutkit_core::data::media::DEFAULT_MEDIA;
use cutkit_core::{Offset, DEFAULT_CLIP_FUZZ};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Serial port, or "Auto" to discover a known cutter
    pub port: String,
    /// Baud rate for serial connections
    pub baud_rate: u32,
    /// Per-command write timeout in milliseconds
    pub write_timeout_ms: u64,
    /// Per-command response timeout in milliseconds
    pub read_timeout_ms: u64,
    /// Generate and log commands without writing them
    pub dry_run: bool,
    /// File receiving every command sent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<PathBuf>,
    /// Record status queries in the transcript as well
    pub inc_queries: bool,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            port: "Auto".to_string(),
            baud_rate: 115200,
            write_timeout_ms: 10_000,
            read_timeout_ms: 20_000,
            dry_run: false,
            transcript: None,
            inc_queries: false,
        }
    }
}

impl ConnectionSettings {
    /// True when the port should be found by USB id
    pub fn auto_port(&self) -> bool {
        self.port.is_empty() || self.port.eq_ignore_ascii_case("auto")
    }
}

/// Media and placement defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotSettings {
    /// Media width in millimeters
    pub media_width: f64,
    /// Media height in millimeters
    pub media_height: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_left: Option<f64>,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Turn segments leaving the media into travel moves
    pub sw_clipping: bool,
    /// Clip tolerance in millimeters
    pub clip_fuzz: f64,
    /// Media alignment; device default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_aligned: Option<bool>,
}

impl Default for PlotSettings {
    fn default() -> Self {
        Self {
            media_width: 210.0,
            media_height: 297.0,
            margin_top: None,
            margin_left: None,
            offset_x: 0.0,
            offset_y: 0.0,
            sw_clipping: true,
            clip_fuzz: DEFAULT_CLIP_FUZZ,
            left_aligned: None,
        }
    }
}

impl PlotSettings {
    pub fn offset(&self) -> Offset {
        Offset::new(self.offset_x, self.offset_y)
    }
}

/// Tool and media preset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Media preset id
    pub media: u16,
    /// Tool holder, 1 or 2
    pub toolholder: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pen: Option<bool>,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            media: DEFAULT_MEDIA,
            toolholder: 1,
            speed: None,
            pressure: None,
            depth: None,
            pen: None,
        }
    }
}

/// File formats a config can be stored in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(other.unwrap_or("none").to_string()).into()),
        }
    }
}

/// Complete driver configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub connection: ConnectionSettings,
    pub plot: PlotSettings,
    pub tool: ToolSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// `config.toml` in the platform config directory
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("cutkit").join("config.toml"))
            .ok_or_else(|| SettingsError::ConfigDirectory("no config directory on this platform".to_string()))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path`, or the default file when it exists, or defaults
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        match Self::default_path() {
            Ok(path) if path.exists() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if self.connection.baud_rate == 0 {
            return Err(SettingsError::invalid("connection.baud_rate", "must be > 0"));
        }
        if self.connection.write_timeout_ms == 0 || self.connection.read_timeout_ms == 0 {
            return Err(SettingsError::invalid("connection.timeout", "must be > 0"));
        }

        let plot = &self.plot;
        for (key, value) in [
            ("plot.media_width", plot.media_width),
            ("plot.media_height", plot.media_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SettingsError::invalid(key, "must be a positive length"));
            }
        }
        for (key, value) in [
            ("plot.margin_top", plot.margin_top),
            ("plot.margin_left", plot.margin_left),
        ] {
            if value.is_some_and(|v| !v.is_finite() || v < 0.0) {
                return Err(SettingsError::invalid(key, "must be >= 0"));
            }
        }
        if !plot.offset_x.is_finite() || !plot.offset_y.is_finite() {
            return Err(SettingsError::invalid("plot.offset", "must be finite"));
        }
        if !plot.clip_fuzz.is_finite() || plot.clip_fuzz < 0.0 {
            return Err(SettingsError::invalid("plot.clip_fuzz", "must be >= 0"));
        }

        let tool = &self.tool;
        if !(1..=2).contains(&tool.toolholder) {
            return Err(ConfigError::ValueOutOfRange {
                key: "tool.toolholder".to_string(),
                value: tool.toolholder.to_string(),
            }
            .into());
        }
        if let Some(pressure) = tool.pressure.filter(|p| !(1..=33).contains(p)) {
            return Err(ConfigError::ValueOutOfRange {
                key: "tool.pressure".to_string(),
                value: pressure.to_string(),
            }
            .into());
        }
        if let Some(speed) = tool.speed.filter(|s| !(1..=30).contains(s)) {
            return Err(ConfigError::ValueOutOfRange {
                key: "tool.speed".to_string(),
                value: speed.to_string(),
            }
            .into());
        }

        Ok(())
    }
}
