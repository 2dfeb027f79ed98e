//! # Cutkit
//!
//! Driver for Cricut-class cutting plotters running the CutcutGo firmware.
//! Path lists go in; clipped, tool-state-aware motion commands come out and
//! are delivered over USB serial.
//!
//! ## Architecture
//!
//! Cutkit is organized as a workspace with multiple crates:
//!
//! 1. **cutkit-core** - Points, bounding boxes, clipping, device and media tables, errors
//! 2. **cutkit-communication** - Transport trait, serial port, discovery, status reports
//! 3. **cutkit-plotter** - Command encoder, traversal engine, plot jobs, sessions
//! 4. **cutkit-settings** - Configuration file handling
//! 5. **cutkit** - Main binary that integrates all crates

use std::path::Path;

pub use cutkit_core::{
    find_bbox, flip, known_devices, mirror, ClipRegion, ConfigurationError, ConnectionError,
    DeviceProfile, Error, GeometryError, Offset, PathList, PlotBounds, Point, Rect, Result,
};

pub use cutkit_communication::{
    discover_device, list_ports, ConnectionParams, DeviceStatus, SerialPortInfo,
    SerialTransport, Transport,
};

pub use cutkit_plotter::{
    CommandToken, CutterSession, DeliveryReport, MediaLayout, PlotMode, PlotOutput, PlotReport,
    PlotRequest, SessionOptions, SetupOptions, ToolState,
};

pub use cutkit_settings::{Config, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Parse a path list from JSON text
///
/// Besides a bare `[[[x, y], ...], ...]` document this accepts a dump file:
/// free text with the path list on the first line that starts with `[`.
pub fn parse_path_list(text: &str) -> Result<PathList> {
    match serde_json::from_str(text) {
        Ok(paths) => Ok(paths),
        Err(err) => match text.lines().find(|line| line.trim_start().starts_with('[')) {
            Some(line) if line.trim() != text.trim() => Ok(serde_json::from_str(line)?),
            _ => Err(err.into()),
        },
    }
}

/// Read a path list file, see [`parse_path_list`]
pub fn load_path_list(path: &Path) -> Result<PathList> {
    let text = std::fs::read_to_string(path)?;
    let paths = parse_path_list(&text)?;
    tracing::debug!("Loaded {} paths from {}", paths.len(), path.display());
    Ok(paths)
}

/// Session behavior from the connection section
pub fn session_options(config: &Config) -> SessionOptions {
    use std::time::Duration;

    SessionOptions {
        dry_run: config.connection.dry_run,
        inc_queries: config.connection.inc_queries,
        write_timeout: Duration::from_millis(config.connection.write_timeout_ms),
        read_timeout: Duration::from_millis(config.connection.read_timeout_ms),
    }
}

/// Tool setup from the tool and plot sections
pub fn setup_options(config: &Config) -> SetupOptions {
    SetupOptions {
        media: config.tool.media,
        speed: config.tool.speed,
        pressure: config.tool.pressure,
        depth: config.tool.depth,
        toolholder: config.tool.toolholder,
        pen: config.tool.pen,
        sw_clipping: config.plot.sw_clipping,
        clip_fuzz: config.plot.clip_fuzz,
        left_aligned: config.plot.left_aligned,
    }
}

/// Open a session for the connection section
///
/// An empty or `auto` port discovers the cutter by USB id. An explicit port
/// is matched against the known devices by its USB ids, falling back to the
/// Cricut Maker 1. A dry run never opens an explicit port.
pub fn open_session(config: &Config) -> Result<CutterSession> {
    let options = session_options(config);
    if config.connection.auto_port() {
        return CutterSession::connect(options);
    }

    let port = &config.connection.port;
    let device = list_ports()
        .ok()
        .and_then(|ports| {
            let devices = known_devices();
            ports
                .iter()
                .find(|p| &p.port_name == port)
                .and_then(|p| p.identify(&devices).cloned())
        })
        .unwrap_or_else(DeviceProfile::cricut_maker1);

    if options.dry_run {
        tracing::info!("Dry run, {} on {} is not opened", device.name, port);
        return Ok(CutterSession::new(device, None, options));
    }

    let params = ConnectionParams::new(port).with_baud_rate(config.connection.baud_rate);
    let transport = SerialTransport::open(&params)?;
    Ok(CutterSession::new(device, Some(Box::new(transport)), options))
}

/// Media layout from the plot section
pub fn media_layout(config: &Config) -> MediaLayout {
    MediaLayout {
        width: config.plot.media_width,
        height: config.plot.media_height,
        margin_top: config.plot.margin_top,
        margin_left: config.plot.margin_left,
    }
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr, pretty or JSON lines
/// - RUST_LOG environment variable support
///
/// `verbose` lowers the default level from INFO to DEBUG.
pub fn init_logging(verbose: bool, json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = EnvFilter::from_default_env().add_directive(level.into());
    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .json();
        registry.with(fmt_layer).try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_level(true)
            .with_line_number(true)
            .pretty();
        registry.with(fmt_layer).try_init()?;
    }

    Ok(())
}
