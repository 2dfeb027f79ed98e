//! Plot job orchestration
//!
//! Resolves the media box from the request and the device profile, runs the
//! traversal, and assembles the command list, trailer, and report.

use crate::encoder::{self, CommandToken, ToolState};
use crate::engine::{generate, TraversalOptions};
use cutkit_core::{
    ClipRegion, ConfigurationError, DeviceProfile, Offset, PathList, PlotBounds, Rect,
    DEFAULT_CLIP_FUZZ,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Loaded media, in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MediaLayout {
    pub width: f64,
    pub height: f64,
    /// Falls back to the device margin, then 0
    pub margin_top: Option<f64>,
    /// Falls back to the device margin, then 0
    pub margin_left: Option<f64>,
}

impl Default for MediaLayout {
    /// A4 portrait
    fn default() -> Self {
        Self {
            width: 210.0,
            height: 297.0,
            margin_top: None,
            margin_left: None,
        }
    }
}

impl MediaLayout {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Clip rectangle for this media on `device`
    ///
    /// A left-aligned device with a fixed width uses its full width.
    pub fn media_box(&self, device: &DeviceProfile, left_aligned: bool) -> Rect {
        let top = self.margin_top.or(device.margin_top_mm).unwrap_or(0.0);
        let left = self.margin_left.or(device.margin_left_mm).unwrap_or(0.0);

        let width = match device.width_mm {
            Some(device_width) if left_aligned => device_width,
            _ => self.width,
        };

        Rect::new(left, width.max(left), top, self.height.max(top))
    }
}

/// What the cutter does with a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlotMode {
    /// Cut or draw the paths
    #[default]
    Cut,
    /// Trace the bounding box of the paths instead
    Outline,
    /// Compute the bounding box without moving
    DryRun,
}

impl FromStr for PlotMode {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cut" => Ok(PlotMode::Cut),
            "outline" | "bbox" => Ok(PlotMode::Outline),
            "dry-run" | "dryrun" | "none" => Ok(PlotMode::DryRun),
            _ => Err(ConfigurationError::InvalidValue {
                name: "mode".to_string(),
                reason: format!("unknown plot mode '{}'", s),
            }),
        }
    }
}

impl fmt::Display for PlotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlotMode::Cut => write!(f, "cut"),
            PlotMode::Outline => write!(f, "outline"),
            PlotMode::DryRun => write!(f, "dry-run"),
        }
    }
}

/// Software clipping settings of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipSettings {
    /// Turn segments with a clamped endpoint into travel moves
    pub enabled: bool,
    pub fuzz: f64,
}

impl Default for ClipSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            fuzz: DEFAULT_CLIP_FUZZ,
        }
    }
}

/// One plot job
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotRequest {
    pub layout: MediaLayout,
    pub paths: PathList,
    /// Added to every point, relative to the top left margin corner
    pub offset: Offset,
    pub mode: PlotMode,
}

impl PlotRequest {
    pub fn new(paths: PathList) -> Self {
        Self {
            paths,
            ..Self::default()
        }
    }

    pub fn with_layout(mut self, layout: MediaLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_offset(mut self, offset: Offset) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_mode(mut self, mode: PlotMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Final bounding box and counters of a job
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotReport {
    /// Requested (unclipped) extents, all zero when nothing was plotted
    pub extents: Rect,
    /// Points visited
    pub count: usize,
    /// Points that had to be clamped into the media box
    pub clipped: usize,
    /// Media box the points were clamped into
    pub clip: Rect,
    /// Coordinate unit; always 1 (millimeters)
    pub unit: u32,
}

/// Everything a job sends to the cutter, in order
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOutput {
    pub report: PlotReport,
    pub commands: Vec<CommandToken>,
    pub trailer: Vec<CommandToken>,
    /// Tool state once the trailer has run
    pub tool: ToolState,
}

impl PlotOutput {
    /// Commands followed by the trailer
    pub fn all_commands(&self) -> impl Iterator<Item = &CommandToken> {
        self.commands.iter().chain(self.trailer.iter())
    }
}

/// Trace `rect` once: one travel to the top left corner and four cuts
fn outline_commands(rect: Rect, tool: ToolState) -> Vec<CommandToken> {
    let [start, corners @ ..] = rect.outline();
    let (mut tool, mut tokens) = encoder::travel(tool, start);
    for corner in corners {
        let (next, emitted) = encoder::cut(tool, corner);
        tool = next;
        tokens.extend(emitted);
    }
    tokens
}

/// Generate the complete command stream for `request`
///
/// `tool` is the state the cutter is in before the job.
pub fn plot(
    request: &PlotRequest,
    device: &DeviceProfile,
    clip: ClipSettings,
    left_aligned: bool,
    tool: ToolState,
) -> PlotOutput {
    let media = request.layout.media_box(device, left_aligned);
    tracing::info!(
        "Media box: ({}, {})-({}, {})",
        media.min_x,
        media.min_y,
        media.max_x,
        media.max_y
    );

    let mut bounds = PlotBounds::clipped_to(ClipRegion::with_fuzz(media, clip.fuzz));
    let options = TraversalOptions {
        sw_clipping: clip.enabled,
        emit: request.mode == PlotMode::Cut,
    };
    let (mut commands, _) = generate(&request.paths, &mut bounds, request.offset, options, tool);

    let report = PlotReport {
        extents: bounds.bbox.extents_or_zero(),
        count: bounds.bbox.count(),
        clipped: bounds.clipped_count(),
        clip: media,
        unit: 1,
    };
    tracing::info!(
        "Final bounding box: ({}, {})-({}, {}), {} points, {} clipped",
        report.extents.min_x,
        report.extents.min_y,
        report.extents.max_x,
        report.extents.max_y,
        report.count,
        report.clipped
    );

    if request.mode == PlotMode::Outline {
        commands = match bounds.bbox.extents() {
            Some(rect) => outline_commands(rect, tool),
            None => Vec::new(),
        };
    }

    PlotOutput {
        report,
        commands,
        trailer: encoder::trailer(),
        tool: ToolState::Up,
    }
}
