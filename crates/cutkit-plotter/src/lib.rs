//! # Cutkit Plotter
//!
//! Turns path lists into CutcutGo motion commands and delivers them.
//!
//! - [`encoder`]: pure tool-state transitions and the wire syntax
//! - [`engine`]: point-by-point traversal with bounding box and clipping
//! - [`job`]: media box resolution, plot modes, and reports
//! - [`session`]: a connected cutter with setup, status, and delivery

pub mod encoder;
pub mod engine;
pub mod job;
pub mod session;

pub use encoder::{cut, trailer, travel, CommandToken, TokenKind, ToolState};
pub use engine::{generate, TraversalOptions};
pub use job::{plot, ClipSettings, MediaLayout, PlotMode, PlotOutput, PlotReport, PlotRequest};
pub use session::{
    CutterSession, DeliveryReport, ProgressCallback, SessionOptions, SetupOptions, ToolSetup,
    FIRMWARE_VERSION,
};
