//! Core game logic module - pure, deterministic, and testable
//!
//! This crate holds the authoritative state of a two-player falling-block
//! game. It has **zero dependencies** on networking, timers, or rendering:
//! every change is an action run through [`game_reducer`], which returns a
//! new `Arc<Game>` (or the same one when nothing happened).
//!
//! - **Deterministic**: piece order is a pure function of game id, round and
//!   drop count, so every copy of a game draws the same pieces
//! - **Ordered**: each action names its predecessor, and copies refuse to
//!   apply actions whose history they are missing
//! - **Immutable**: transitions never mutate a shared value
//!
//! # Module Structure
//!
//! - [`well`]: 20x10 well with collision, line clearing and garbage rows
//! - [`pieces`]: tetromino shape grids and clockwise rotation
//! - [`rng`]: seeded, replayable piece sequencer
//! - [`scoring`]: drop points, line bonuses and gravity
//! - [`block_ids`]: identity for blocks as they move between wells
//! - [`player`]: status machine and per-round state
//! - [`game`]: the game value
//! - [`ordering`]: action offsets (apply, stale, detached)
//! - [`reducer`]: action dispatch
//! - [`snapshot`]: compact digests for comparing copies
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use duel_tetris_core::{game_reducer, Game};
//! use duel_tetris_core::types::{ActionKind, GameAction, GameId, PlayerStatus};
//!
//! let game = Arc::new(Game::new(GameId(1), "alice".into()));
//! let ready = GameAction::new(1, 0, "alice".into(), ActionKind::PlayerReady);
//!
//! let game = game_reducer(Some(&game), &ready).unwrap();
//! assert_eq!(game.players[0].status, PlayerStatus::Ready);
//! assert_eq!(game.players[0].last_action_id, 1);
//! ```

pub mod block_ids;
pub mod error;
pub mod game;
pub mod ordering;
pub mod pieces;
pub mod player;
pub mod reducer;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod well;

pub use duel_tetris_types as types;

// Re-export commonly used types for convenience
pub use block_ids::{override_block_ids, BlockIdSequence, BlockIdSource};
pub use error::GameError;
pub use game::Game;
pub use ordering::{action_offset, sequence_action, Sequencing};
pub use pieces::TetrominoGrid;
pub use player::{Player, RoundState};
pub use reducer::{apply_action, game_reducer, game_reducer_with, BumpPolicy, ReducerOptions};
pub use rng::{tetromino_at, PieceSequencer, SimpleRng};
pub use scoring::{calculate_score, ScoreResult};
pub use snapshot::{GameSnapshot, PlayerSnapshot};
pub use well::{Well, WellRow, WellShapeError};
