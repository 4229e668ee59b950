//! Protocol violations surfaced by the reducer
//!
//! Game-rule rejections (blocked moves, redundant joins, stale actions) are
//! not errors; they resolve to the unchanged state. Everything in
//! [`GameError`] means the caller or the ordering pipeline is broken and the
//! current call must stop without applying anything.

use duel_tetris_types::{ActionId, UserId};

/// Fatal errors for a single reducer call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    /// An action arrived for a game that does not exist yet
    #[error("game action {action} on void state")]
    VoidGame { action: &'static str },

    /// The sender's predecessor is ahead of what this copy has applied.
    /// The caller must backfill the missing actions and retry.
    #[error("detached action {action_id} from user {user_id} (offset {offset})")]
    DetachedAction {
        user_id: UserId,
        action_id: ActionId,
        offset: i64,
    },

    /// A non-join action without a predecessor id
    #[error("action {action_id} from user {user_id} is missing prevActionId")]
    MissingPrevActionId { user_id: UserId, action_id: ActionId },

    /// Pausing is only allowed in solo games
    #[error("user {user_id} tried to pause a multiplayer game")]
    MultiplayerPause { user_id: UserId },

    #[error("player {0} not found in game")]
    PlayerNotFound(UserId),

    /// Accelerated clears must remove between one and four lines at once
    #[error("invalid quake magnitude {0}")]
    InvalidQuakeMagnitude(usize),
}
