//! Tool-state-aware command encoding
//!
//! Translates a target point and the current tool state into CutcutGo
//! (GRBL dialect) motion commands. Every function here is pure: the new tool
//! state is returned alongside the tokens instead of being stored anywhere.

use cutkit_core::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lift the blade off the media
pub const RAISE_TOOL: &str = "G01Z0F10";

/// Press the blade into the media
pub const LOWER_TOOL: &str = "G01Z-10F10";

/// Return the carriage to zero on the feed axis
pub const HOME_Y: &str = "G01Y00F10";

/// Blade position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolState {
    #[default]
    Up,
    Down,
}

/// What a command does, for tests and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    ToolUp,
    ToolDown,
    /// Motion with the tool up
    Travel,
    /// Motion with the tool down
    Cut,
    /// Anything else sent to the firmware
    Raw,
}

/// One line of protocol text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandToken {
    pub kind: TokenKind,
    pub text: String,
}

impl CommandToken {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Self::new(TokenKind::Raw, text)
    }

    pub fn raise_tool() -> Self {
        Self::new(TokenKind::ToolUp, RAISE_TOOL)
    }

    pub fn lower_tool() -> Self {
        Self::new(TokenKind::ToolDown, LOWER_TOOL)
    }

    /// True for travel and cut commands
    pub fn is_motion(&self) -> bool {
        matches!(self.kind, TokenKind::Travel | TokenKind::Cut)
    }
}

impl fmt::Display for CommandToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

fn motion_text(p: Point) -> String {
    format!("G01X{:.6}Y{:.6}F10", p.x, p.y)
}

/// Move to `p` with the tool up, raising it first if needed
pub fn travel(state: ToolState, p: Point) -> (ToolState, Vec<CommandToken>) {
    let motion = CommandToken::new(TokenKind::Travel, motion_text(p));
    match state {
        ToolState::Up => (ToolState::Up, vec![motion]),
        ToolState::Down => (ToolState::Up, vec![CommandToken::raise_tool(), motion]),
    }
}

/// Cut to `p` with the tool down, lowering it first if needed
pub fn cut(state: ToolState, p: Point) -> (ToolState, Vec<CommandToken>) {
    let motion = CommandToken::new(TokenKind::Cut, motion_text(p));
    match state {
        ToolState::Down => (ToolState::Down, vec![motion]),
        ToolState::Up => (ToolState::Down, vec![CommandToken::lower_tool(), motion]),
    }
}

/// Commands closing every plot: raise the tool and return the carriage
pub fn trailer() -> Vec<CommandToken> {
    vec![CommandToken::raise_tool(), CommandToken::raw(HOME_Y)]
}

/// Select tool holder `toolholder` and home the machine
pub fn tool_setup(toolholder: u8) -> Vec<CommandToken> {
    vec![
        CommandToken::raw(format!("T{}", toolholder)),
        CommandToken::raw("$H"),
    ]
}

/// Shift the work origin by `feed_mm` on the feed axis and move to it
pub fn move_origin(feed_mm: i64) -> Vec<CommandToken> {
    vec![
        CommandToken::raw(format!("G10L02P0Y{}", feed_mm)),
        CommandToken::raw("G01Y0"),
    ]
}
