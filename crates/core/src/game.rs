//! Game module - the value every transition produces
//!
//! A [`Game`] is an immutable snapshot. Transitions clone what they change
//! and hand back a new `Arc<Game>`; a no-op hands back the input `Arc`, so
//! `Arc::ptr_eq` tells callers whether anything happened.

use serde::{Deserialize, Serialize};

use crate::error::GameError;
use crate::player::Player;
use crate::types::{GameId, PlayerStatus, UserId, DROP_FRAMES_DEFAULT};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: GameId,
    /// Join order; never empty, at most two entries
    pub players: Vec<Player>,
    /// Gravity in frames per row (lower is faster)
    pub drop_frames: f32,
}

impl Game {
    /// New game owned by `user_id`: one PENDING player with a blank round
    pub fn new(id: GameId, user_id: UserId) -> Self {
        Self {
            id,
            players: vec![Player::new(user_id, id, 0)],
            drop_frames: DROP_FRAMES_DEFAULT,
        }
    }

    /// Current round number: one per lost round in this match
    pub fn round(&self) -> u32 {
        self.players.iter().map(|p| p.losses).sum()
    }

    pub fn player(&self, user_id: &UserId) -> Option<&Player> {
        self.players.iter().find(|p| &p.user_id == user_id)
    }

    pub fn player_index(&self, user_id: &UserId) -> Option<usize> {
        self.players.iter().position(|p| &p.user_id == user_id)
    }

    /// Like [`Game::player_index`] but a missing player is a protocol error
    pub fn require_player(&self, user_id: &UserId) -> Result<usize, GameError> {
        self.player_index(user_id)
            .ok_or_else(|| GameError::PlayerNotFound(user_id.clone()))
    }

    /// First player that is not `user_id`
    pub fn other_player(&self, user_id: &UserId) -> Option<&Player> {
        self.players.iter().find(|p| &p.user_id != user_id)
    }

    pub fn other_player_index(&self, user_id: &UserId) -> Option<usize> {
        self.players.iter().position(|p| &p.user_id != user_id)
    }

    pub fn is_multiplayer(&self) -> bool {
        self.players.len() > 1
    }

    pub fn all_ready(&self) -> bool {
        self.players.iter().all(Player::is_ready)
    }

    /// Status of every player, join order
    pub fn statuses(&self) -> Vec<PlayerStatus> {
        self.players.iter().map(|p| p.status).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_has_one_pending_player() {
        let game = Game::new(GameId(1), UserId::from("host"));
        assert_eq!(game.players.len(), 1);
        assert_eq!(game.statuses(), vec![PlayerStatus::Pending]);
        assert_eq!(game.drop_frames, DROP_FRAMES_DEFAULT);
        assert!(!game.is_multiplayer());
    }

    #[test]
    fn round_counts_losses() {
        let mut game = Game::new(GameId(1), UserId::from("a"));
        game.players.push(Player::new(UserId::from("b"), GameId(1), 0));
        game.players[0].losses = 2;
        game.players[1].losses = 1;
        assert_eq!(game.round(), 3);
    }

    #[test]
    fn lookups() {
        let mut game = Game::new(GameId(1), UserId::from("a"));
        game.players.push(Player::new(UserId::from("b"), GameId(1), 0));

        let a = UserId::from("a");
        assert_eq!(game.player_index(&a), Some(0));
        assert_eq!(game.other_player(&a).map(|p| p.user_id.0.as_str()), Some("b"));
        assert_eq!(
            game.require_player(&UserId::from("zed")),
            Err(GameError::PlayerNotFound(UserId::from("zed")))
        );
    }
}
