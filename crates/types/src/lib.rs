//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types shared by the rule engine, the
//! replay runner and anything that needs to speak the action wire format.
//! All types are plain data with serde derives and no game logic beyond
//! trivial conversions.
//!
//! # Well Dimensions
//!
//! - **Rows**: 20 (indexed 0-19, top to bottom)
//! - **Cols**: 10 (indexed 0-9, left to right)
//! - **Spawn row**: -2, so freshly spawned pieces start above the well
//!
//! # Gravity
//!
//! Gravity is expressed in frames per row (`drop_frames`). Lower is faster.
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DROP_FRAMES_DEFAULT` | 48 | Gravity at the start of every round |
//! | `DROP_FRAMES_DECREMENT` | 1.5 | Speed-up applied on every line clear |
//! | `DROP_FRAMES_MIN` | 4 | Floor for the speed-up |
//!
//! # Examples
//!
//! ```
//! use duel_tetris_types::{ActionKind, GameAction, TetrominoKind, UserId, WELL_COLS, WELL_ROWS};
//!
//! let kind = TetrominoKind::from_str("t").unwrap();
//! assert_eq!(kind, TetrominoKind::T);
//!
//! let action = GameAction::new(2, 1, UserId::from("alice"), ActionKind::MoveLeft);
//! assert_eq!(action.prev_action_id, Some(1));
//!
//! assert_eq!(WELL_COLS, 10);
//! assert_eq!(WELL_ROWS, 20);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Well height in cells (20 rows)
pub const WELL_ROWS: usize = 20;

/// Well width in cells (10 columns)
pub const WELL_COLS: usize = 10;

/// Row offset for freshly spawned pieces (above the visible well)
pub const SPAWN_Y: i32 = -2;

/// Maximum number of players sharing a game
pub const MAX_PLAYERS: usize = 2;

/// Gravity at the start of every round, in frames per row
pub const DROP_FRAMES_DEFAULT: f32 = 48.0;

/// Gravity speed-up applied whenever a drop clears at least one line
pub const DROP_FRAMES_DECREMENT: f32 = 1.5;

/// Lower bound for `drop_frames` after repeated speed-ups
pub const DROP_FRAMES_MIN: f32 = 4.0;

/// Number of cells in every tetromino
pub const TETROMINO_CELLS: u32 = 4;

/// Line clear bonus table, indexed by `lines_cleared - 1`
///
/// The bonus is multiplied by `(lines_total + 1)` where `lines_total` is the
/// player's line count before the clear.
pub const LINE_CLEAR_BONUSES: [u32; 4] = [100, 300, 500, 800];

/// Monotonic, sender-assigned action id
pub type ActionId = u32;

/// Unique id of a settled block within a player's well
pub type BlockId = u32;

/// Numeric game identity. Also the root of every piece sequence seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(pub u64);

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of the user owning a player slot
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 24-bit RGB color tag carried by every block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0 & 0x00ff_ffff)
    }
}

/// The seven tetromino kinds
///
/// Each kind has a fixed spawn shape (see `duel_tetris_core::pieces`) and a
/// color:
/// - **I**: cyan bar
/// - **O**: yellow square
/// - **T**: purple
/// - **J**: blue
/// - **L**: orange
/// - **S**: green
/// - **Z**: red
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TetrominoKind {
    I,
    O,
    T,
    J,
    L,
    S,
    Z,
}

impl TetrominoKind {
    /// Every kind in sequencer order
    pub const ALL: [TetrominoKind; 7] = [
        TetrominoKind::I,
        TetrominoKind::O,
        TetrominoKind::T,
        TetrominoKind::J,
        TetrominoKind::L,
        TetrominoKind::S,
        TetrominoKind::Z,
    ];

    /// Parse kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use duel_tetris_types::TetrominoKind;
    ///
    /// assert_eq!(TetrominoKind::from_str("i"), Some(TetrominoKind::I));
    /// assert_eq!(TetrominoKind::from_str("Z"), Some(TetrominoKind::Z));
    /// assert_eq!(TetrominoKind::from_str("x"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(TetrominoKind::I),
            "o" => Some(TetrominoKind::O),
            "t" => Some(TetrominoKind::T),
            "j" => Some(TetrominoKind::J),
            "l" => Some(TetrominoKind::L),
            "s" => Some(TetrominoKind::S),
            "z" => Some(TetrominoKind::Z),
            _ => None,
        }
    }

    /// Uppercase single-letter name
    pub fn as_str(&self) -> &'static str {
        match self {
            TetrominoKind::I => "I",
            TetrominoKind::O => "O",
            TetrominoKind::T => "T",
            TetrominoKind::J => "J",
            TetrominoKind::L => "L",
            TetrominoKind::S => "S",
            TetrominoKind::Z => "Z",
        }
    }

    /// Color stamped into the well when this kind lands
    pub fn color(&self) -> Color {
        match self {
            TetrominoKind::I => Color(0x3cc7d6),
            TetrominoKind::O => Color(0xfbb414),
            TetrominoKind::T => Color(0xb04497),
            TetrominoKind::J => Color(0x3993d0),
            TetrominoKind::L => Color(0xed652f),
            TetrominoKind::S => Color(0x95c43d),
            TetrominoKind::Z => Color(0xe84138),
        }
    }
}

/// Offset of a piece's local grid inside the well
///
/// `y` may be negative while a piece is still entering the well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Same position shifted by `(dx, dy)`
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A settled block in a well
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub color: Color,
}

/// A well cell
///
/// - `None`: empty
/// - `Some(Block)`: occupied
pub type Cell = Option<Block>;

/// Per-player lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlayerStatus {
    /// Joined, waiting to declare ready
    Pending,
    /// Playing (or waiting for the opponent to be ready)
    Ready,
    /// Solo game paused
    Pause,
    /// Lost the current round
    Lost,
    /// Won the current round
    Won,
}

impl PlayerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerStatus::Pending => "PENDING",
            PlayerStatus::Ready => "READY",
            PlayerStatus::Pause => "PAUSE",
            PlayerStatus::Lost => "LOST",
            PlayerStatus::Won => "WON",
        }
    }
}

/// Alternating suffix for visual effect toggles
///
/// Effects flip between the two variants every time they fire so that two
/// identical effects in a row still produce an observable state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashSuffix {
    A,
    B,
}

impl FlashSuffix {
    /// Next suffix after `prev` (starts at `A`)
    pub fn after(prev: Option<FlashSuffix>) -> FlashSuffix {
        match prev {
            Some(FlashSuffix::A) => FlashSuffix::B,
            Some(FlashSuffix::B) | None => FlashSuffix::A,
        }
    }
}

/// Screen shake effect fired by accelerated line clears
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quake {
    /// Number of lines cleared at once (1-4)
    pub magnitude: u8,
    pub suffix: FlashSuffix,
}

/// Action payload, tagged by `type` on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    /// Join a game waiting for an opponent
    JoinGame,
    /// Declare ready for the next round (or resume a solo pause)
    PlayerReady,
    /// Pause a solo game
    PlayerPause,
    /// Advance the active piece by `rows`
    Drop { rows: u32 },
    /// Move active piece one column left
    MoveLeft,
    /// Move active piece one column right
    MoveRight,
    /// Rotate active piece 90° clockwise
    Rotate,
    /// Turn soft drop on
    EnableAcceleration,
    /// Turn soft drop off
    DisableAcceleration,
    /// Merge queued attack rows into the well
    AppendPendingBlocks,
    /// Report client latency/last-seen time
    Ping { time: u64 },
}

impl ActionKind {
    /// Wire name of the action type
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::JoinGame => "JOIN_GAME",
            ActionKind::PlayerReady => "PLAYER_READY",
            ActionKind::PlayerPause => "PLAYER_PAUSE",
            ActionKind::Drop { .. } => "DROP",
            ActionKind::MoveLeft => "MOVE_LEFT",
            ActionKind::MoveRight => "MOVE_RIGHT",
            ActionKind::Rotate => "ROTATE",
            ActionKind::EnableAcceleration => "ENABLE_ACCELERATION",
            ActionKind::DisableAcceleration => "DISABLE_ACCELERATION",
            ActionKind::AppendPendingBlocks => "APPEND_PENDING_BLOCKS",
            ActionKind::Ping { .. } => "PING",
        }
    }
}

/// A player action as sent over the wire
///
/// ```json
/// {"type":"DROP","actionId":7,"prevActionId":6,"userId":"alice","rows":1}
/// ```
///
/// `prev_action_id` is absent only on `JOIN_GAME`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameAction {
    pub action_id: ActionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prev_action_id: Option<ActionId>,
    pub user_id: UserId,
    #[serde(flatten)]
    pub kind: ActionKind,
}

impl GameAction {
    /// Build a non-join action
    pub fn new(
        action_id: ActionId,
        prev_action_id: ActionId,
        user_id: UserId,
        kind: ActionKind,
    ) -> Self {
        Self {
            action_id,
            prev_action_id: Some(prev_action_id),
            user_id,
            kind,
        }
    }

    /// Build a join action (no predecessor)
    pub fn join(action_id: ActionId, user_id: UserId) -> Self {
        Self {
            action_id,
            prev_action_id: None,
            user_id,
            kind: ActionKind::JoinGame,
        }
    }

    pub fn is_join(&self) -> bool {
        matches!(self.kind, ActionKind::JoinGame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flash_suffix_alternates() {
        assert_eq!(FlashSuffix::after(None), FlashSuffix::A);
        assert_eq!(FlashSuffix::after(Some(FlashSuffix::A)), FlashSuffix::B);
        assert_eq!(FlashSuffix::after(Some(FlashSuffix::B)), FlashSuffix::A);
    }

    #[test]
    fn every_kind_has_a_distinct_color() {
        let mut colors: Vec<u32> = TetrominoKind::ALL.iter().map(|k| k.color().0).collect();
        colors.sort_unstable();
        colors.dedup();
        assert_eq!(colors.len(), TetrominoKind::ALL.len());
    }

    #[test]
    fn color_displays_as_hex() {
        assert_eq!(TetrominoKind::I.color().to_string(), "#3cc7d6");
    }

    #[test]
    fn action_kind_names_match_wire_tags() {
        assert_eq!(ActionKind::Drop { rows: 1 }.as_str(), "DROP");
        assert_eq!(ActionKind::AppendPendingBlocks.as_str(), "APPEND_PENDING_BLOCKS");
    }
}
