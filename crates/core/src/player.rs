//! Player module - per-player status machine and round state
//!
//! Status transitions:
//!
//! ```text
//! PENDING --ready--> READY --(all ready)--> new round, still READY
//! READY --pause (solo only)--> PAUSE --ready--> READY (no reset)
//! READY --drop lands above the well--> LOST (opponents WON)
//! LOST/WON --ready, all ready--> READY + new round
//! any --second player joins--> PENDING, losses = 0 (first player only)
//! ```

use serde::{Deserialize, Serialize};

use crate::block_ids::BlockIdSequence;
use crate::pieces::{spawn_position, TetrominoGrid};
use crate::rng::PieceSequencer;
use crate::types::{
    ActionId, FlashSuffix, GameId, PlayerStatus, Position, Quake, TetrominoKind, UserId,
};
use crate::well::{Well, WellRow};

/// Everything that is thrown away and rebuilt at the start of a round
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundState {
    /// Pieces placed this round
    pub drops: u32,
    pub score: u32,
    /// Cumulative cleared lines
    pub lines: u32,
    pub grid: Well,
    /// Rows removed by the last landing drop, as they were before the landed
    /// piece was stamped
    pub blocks_cleared: Vec<WellRow>,
    /// Attack rows from the opponent waiting to be merged
    pub blocks_pending: Vec<WellRow>,
    pub active_tetromino: TetrominoKind,
    pub active_tetromino_grid: TetrominoGrid,
    pub active_tetromino_position: Position,
    pub next_tetromino: TetrominoKind,
    pub drop_acceleration: bool,
    /// Id sequence for blocks entering `grid` or `blocks_pending`
    pub block_ids: BlockIdSequence,
    pub flash_yay: Option<FlashSuffix>,
    pub flash_nay: Option<FlashSuffix>,
    pub quake: Option<Quake>,
    /// Last reported client time
    pub ping: Option<u64>,
}

impl RoundState {
    /// Fresh round: empty well, zeroed counters, seeded first pieces
    pub fn blank(game_id: GameId, round: u32) -> Self {
        let grid = Well::blank();
        let (active, next) = PieceSequencer::new(game_id, round).pair(0);
        let active_grid = TetrominoGrid::spawn(active);
        Self {
            drops: 0,
            score: 0,
            lines: 0,
            active_tetromino_position: spawn_position(&active_grid, grid.cols()),
            grid,
            blocks_cleared: Vec::new(),
            blocks_pending: Vec::new(),
            active_tetromino: active,
            active_tetromino_grid: active_grid,
            next_tetromino: next,
            drop_acceleration: false,
            block_ids: BlockIdSequence::new(),
            flash_yay: None,
            flash_nay: None,
            quake: None,
            ping: None,
        }
    }

    /// Promote the lookahead piece to active and draw a new lookahead
    pub(crate) fn spawn_next(&mut self, sequencer: &PieceSequencer) {
        let active = self.next_tetromino;
        self.active_tetromino = active;
        self.active_tetromino_grid = TetrominoGrid::spawn(active);
        self.active_tetromino_position =
            spawn_position(&self.active_tetromino_grid, self.grid.cols());
        self.next_tetromino = sequencer.tetromino_at(self.drops + 1);
    }
}

/// A player slot in a game
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub user_id: UserId,
    /// Id of the last action applied for this player
    pub last_action_id: ActionId,
    pub status: PlayerStatus,
    /// Rounds lost in the current match
    pub losses: u32,
    #[serde(flatten)]
    pub round: RoundState,
}

impl Player {
    /// New PENDING player with a blank round
    pub fn new(user_id: UserId, game_id: GameId, round: u32) -> Self {
        Self {
            user_id,
            last_action_id: 0,
            status: PlayerStatus::Pending,
            losses: 0,
            round: RoundState::blank(game_id, round),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == PlayerStatus::Ready
    }

    /// A second player arrived: a fresh match starts
    pub(crate) fn reset_for_match(&mut self) {
        self.status = PlayerStatus::Pending;
        self.losses = 0;
    }

    pub(crate) fn mark_ready(&mut self) {
        self.status = PlayerStatus::Ready;
    }

    pub(crate) fn pause(&mut self) {
        self.status = PlayerStatus::Pause;
    }

    pub(crate) fn mark_lost(&mut self) {
        self.status = PlayerStatus::Lost;
        self.losses += 1;
    }

    pub(crate) fn mark_won(&mut self) {
        self.status = PlayerStatus::Won;
    }

    pub(crate) fn start_round(&mut self, game_id: GameId, round: u32) {
        self.round = RoundState::blank(game_id, round);
    }
}
