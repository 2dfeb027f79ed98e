//! Cutter session
//!
//! Owns the connection to one cutter together with the state that outlives a
//! single job: tool state, left alignment, and software clipping settings.
//! Jobs are generated completely before anything is written, so a job that
//! cannot be generated never reaches the device.

use crate::encoder::{self, CommandToken, ToolState};
use crate::job::{self, ClipSettings, PlotOutput, PlotRequest};
use cutkit_communication::{
    discover_device, ConnectionParams, DeviceStatus, SerialTransport, Transport, STATUS_QUERY,
};
use cutkit_core::data::media::{DEFAULT_MEDIA, PEN_MEDIA};
use cutkit_core::{
    known_devices, media_by_id, resolve_media_id, ConnectionError, DeviceProfile, Result,
    DEFAULT_CLIP_FUZZ,
};
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

/// Identification string of the CutcutGo firmware
pub const FIRMWARE_VERSION: &str = "CutcutGo v1.0";

/// Progress callback: items done, total items, status flags
///
/// The flags string collects a `t` for every timeout since the last
/// answered command.
pub type ProgressCallback = Box<dyn FnMut(usize, usize, &str) + Send>;

/// Session-wide I/O behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Generate and log everything but write nothing to the device
    pub dry_run: bool,
    /// Record status queries in the transcript, not only commands
    pub inc_queries: bool,
    pub write_timeout: Duration,
    pub read_timeout: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            inc_queries: false,
            write_timeout: Duration::from_millis(10_000),
            read_timeout: Duration::from_millis(20_000),
        }
    }
}

/// Tool and media parameters for [`CutterSession::setup`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetupOptions {
    /// Media preset id, 100..=300; anything else means custom
    pub media: u16,
    pub speed: Option<u8>,
    pub pressure: Option<u8>,
    pub depth: Option<u8>,
    pub toolholder: u8,
    /// Defaults to true only for the pen preset
    pub pen: Option<bool>,
    pub sw_clipping: bool,
    pub clip_fuzz: f64,
    /// Overrides the device default when set
    pub left_aligned: Option<bool>,
}

impl Default for SetupOptions {
    fn default() -> Self {
        Self {
            media: DEFAULT_MEDIA,
            speed: None,
            pressure: None,
            depth: None,
            toolholder: 1,
            pen: None,
            sw_clipping: true,
            clip_fuzz: DEFAULT_CLIP_FUZZ,
            left_aligned: None,
        }
    }
}

/// Tool configuration resolved by [`CutterSession::setup`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolSetup {
    pub media: u16,
    pub media_name: Option<&'static str>,
    pub speed: Option<u8>,
    pub pressure: Option<u8>,
    pub depth: Option<u8>,
    pub toolholder: u8,
    pub pen: bool,
}

/// Outcome of handing commands to the transport
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    /// Commands processed, including those that timed out
    pub sent: usize,
    /// Commands whose write or response timed out
    pub timeouts: usize,
}

impl DeliveryReport {
    fn absorb(&mut self, other: DeliveryReport) {
        self.sent += other.sent;
        self.timeouts += other.timeouts;
    }
}

/// Connection to one cutter
pub struct CutterSession {
    device: DeviceProfile,
    transport: Option<Box<dyn Transport>>,
    options: SessionOptions,
    transcript: Option<Box<dyn Write + Send>>,
    progress: Option<ProgressCallback>,
    tool: ToolState,
    left_aligned: bool,
    clip: ClipSettings,
}

impl CutterSession {
    /// Session over an already opened transport, or none for a dry run
    pub fn new(
        device: DeviceProfile,
        transport: Option<Box<dyn Transport>>,
        options: SessionOptions,
    ) -> Self {
        let left_aligned = transport.is_none() || device.default_left_aligned();
        Self {
            device,
            transport,
            options,
            transcript: None,
            progress: None,
            tool: ToolState::Up,
            left_aligned,
            clip: ClipSettings::default(),
        }
    }

    /// Find the first known cutter and open it
    ///
    /// A dry run without an attached cutter falls back to a dummy device.
    pub fn connect(options: SessionOptions) -> Result<Self> {
        let devices = known_devices();
        match discover_device(&devices)? {
            Some((port, device)) => {
                let transport = SerialTransport::open(&ConnectionParams::new(&port.port_name))?;
                Ok(Self::new(device, Some(Box::new(transport)), options))
            }
            None if options.dry_run => {
                let device = DeviceProfile::dummy();
                tracing::info!("{} used for dry run", device.name);
                Ok(Self::new(device, None, options))
            }
            None => {
                let looked_for = devices
                    .iter()
                    .map(|d| d.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                Err(ConnectionError::DeviceNotFound { looked_for }.into())
            }
        }
    }

    /// Record every command sent to `sink`
    pub fn with_transcript(mut self, sink: Box<dyn Write + Send>) -> Self {
        self.transcript = Some(sink);
        self
    }

    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    pub fn device(&self) -> &DeviceProfile {
        &self.device
    }

    pub fn tool(&self) -> ToolState {
        self.tool
    }

    pub fn left_aligned(&self) -> bool {
        self.left_aligned
    }

    pub fn clip_settings(&self) -> ClipSettings {
        self.clip
    }

    pub fn is_dry_run(&self) -> bool {
        self.options.dry_run
    }

    /// Firmware identification
    pub fn version(&self) -> &'static str {
        FIRMWARE_VERSION
    }

    /// Select media, tool holder and clipping, then home the machine
    pub fn setup(&mut self, setup: SetupOptions) -> Result<ToolSetup> {
        if let Some(left_aligned) = setup.left_aligned {
            self.left_aligned = left_aligned;
        }
        tracing::info!("Device version: '{}'", self.version());

        let media = resolve_media_id(setup.media);
        let preset = media_by_id(media);
        if let Some(preset) = preset {
            tracing::info!(
                "Media={}, cap='{}', name='{}'",
                media,
                preset.cap,
                preset.name
            );
        }

        let resolved = ToolSetup {
            media,
            media_name: preset.map(|p| p.name),
            speed: setup.speed.or(preset.and_then(|p| p.speed)),
            pressure: setup.pressure.or(preset.and_then(|p| p.pressure)),
            depth: setup.depth.or(preset.and_then(|p| p.depth)),
            toolholder: setup.toolholder,
            pen: setup.pen.unwrap_or(media == PEN_MEDIA),
        };

        self.send_commands(&encoder::tool_setup(setup.toolholder))?;
        self.tool = ToolState::Up;
        tracing::info!("Toolholder: {}", setup.toolholder);

        self.clip = ClipSettings {
            enabled: setup.sw_clipping,
            fuzz: setup.clip_fuzz,
        };
        Ok(resolved)
    }

    /// Generate `request` and send it with the trailer
    pub fn plot(&mut self, request: &PlotRequest) -> Result<(PlotOutput, DeliveryReport)> {
        let output = job::plot(
            request,
            &self.device,
            self.clip,
            self.left_aligned,
            self.tool,
        );

        let delivery = match self.send_job(&output) {
            Ok(delivery) => delivery,
            Err(e) => {
                // Blade position unknown; the next travel raises it first.
                self.tool = ToolState::Down;
                return Err(e);
            }
        };
        self.tool = output.tool;

        if delivery.timeouts > 0 {
            tracing::warn!(
                "{} of {} commands timed out",
                delivery.timeouts,
                delivery.sent
            );
        }
        Ok((output, delivery))
    }

    fn send_job(&mut self, output: &PlotOutput) -> Result<DeliveryReport> {
        let mut delivery = self.send_commands(&output.commands)?;
        delivery.absorb(self.send_commands(&output.trailer)?);
        Ok(delivery)
    }

    /// Send each command and wait for its response line
    ///
    /// Timeouts are counted and reported through the progress callback;
    /// any other transport error aborts the send.
    pub fn send_commands(&mut self, commands: &[CommandToken]) -> Result<DeliveryReport> {
        let total = commands.len();
        let mut report = DeliveryReport::default();
        let mut flags = String::new();

        for (index, command) in commands.iter().enumerate() {
            self.record(&command.text)?;

            if !self.options.dry_run {
                let write_timeout = self.options.write_timeout;
                let read_timeout = self.options.read_timeout;
                let transport = self.transport.as_mut().ok_or(ConnectionError::NotConnected)?;
                tracing::trace!("-> {}", command);

                let line = format!("{}\n", command.text);
                let answered = transport
                    .write(line.as_bytes(), write_timeout)
                    .and_then(|_| transport.read_line(read_timeout));

                match answered {
                    Ok(response) => {
                        tracing::trace!("<- {}", response);
                        flags.clear();
                    }
                    Err(e) if e.is_timeout() => {
                        tracing::warn!("Command '{}' timed out: {}", command, e);
                        report.timeouts += 1;
                        flags.push('t');
                    }
                    Err(e) => return Err(e),
                }
            }

            report.sent += 1;
            if let Some(progress) = self.progress.as_mut() {
                progress(index + 1, total, &flags);
            }
        }

        if let Some(transcript) = self.transcript.as_mut() {
            transcript.flush()?;
        }
        Ok(report)
    }

    /// Query the machine state
    pub fn status(&mut self) -> Result<DeviceStatus> {
        if self.options.dry_run {
            return Ok(DeviceStatus::Ready);
        }
        if self.options.inc_queries {
            self.record(STATUS_QUERY)?;
        }

        let write_timeout = self.options.write_timeout;
        let read_timeout = self.options.read_timeout;
        let transport = self.transport.as_mut().ok_or(ConnectionError::NotConnected)?;
        transport.write(STATUS_QUERY.as_bytes(), write_timeout)?;
        let report = transport.read_line(read_timeout)?;
        Ok(DeviceStatus::parse_report(&report))
    }

    /// Poll until the cutter is ready or `timeout` passes
    ///
    /// Returns the last status seen.
    pub fn wait_for_ready(&mut self, timeout: Duration, poll: Duration) -> Result<DeviceStatus> {
        let mut state = self.status()?;
        if self.options.dry_run {
            return Ok(state);
        }

        let polls = if poll.is_zero() {
            0
        } else {
            (timeout.as_secs_f64() / poll.as_secs_f64()) as usize
        };
        for i in 1..polls {
            match &state {
                DeviceStatus::Ready => break,
                DeviceStatus::Unloaded => {
                    tracing::warn!("{}/{}: please load media", i, polls);
                }
                other if i > polls / 3 => {
                    tracing::info!("{}/{}: status={}", i, polls, other);
                }
                _ => {}
            }
            std::thread::sleep(poll);
            state = self.status()?;
        }
        Ok(state)
    }

    /// Feed the media by `feed_mm` and make that the new origin
    pub fn move_origin(&mut self, feed_mm: i64) -> Result<DeliveryReport> {
        let wait = Duration::from_secs(30);
        let poll = Duration::from_secs(2);
        self.wait_for_ready(wait, poll)?;
        let report = self.send_commands(&encoder::move_origin(feed_mm))?;
        self.wait_for_ready(wait, poll)?;
        Ok(report)
    }

    /// Flush the transcript and close the transport
    pub fn close(&mut self) -> Result<()> {
        if let Some(transcript) = self.transcript.as_mut() {
            transcript.flush()?;
        }
        if let Some(mut transport) = self.transport.take() {
            tracing::debug!("Closing {}", transport.name());
            transport.close()?;
        }
        Ok(())
    }

    fn record(&mut self, text: &str) -> Result<()> {
        if let Some(transcript) = self.transcript.as_mut() {
            writeln!(transcript, "{}", text)?;
        }
        Ok(())
    }
}
