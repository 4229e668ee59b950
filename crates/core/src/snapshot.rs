//! Snapshot module - compact state digests
//!
//! Server and client copies of a game can compare a [`GameSnapshot`] (or just
//! its [`digest`](GameSnapshot::digest)) after applying the same action to
//! confirm they have not diverged, without shipping whole wells around.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::game::Game;
use crate::player::Player;
use crate::types::{ActionId, GameId, PlayerStatus, Position, TetrominoKind, UserId};
use crate::well::Well;

/// FNV-1a 64-bit hasher
///
/// Unlike the std `DefaultHasher` the output is fixed across processes and
/// releases.
#[derive(Debug, Clone, Copy)]
pub struct Fnv1a64(u64);

impl Fnv1a64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    pub fn new() -> Self {
        Self(Self::OFFSET)
    }
}

impl Default for Fnv1a64 {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for Fnv1a64 {
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(Self::PRIME);
        }
    }

    fn finish(&self) -> u64 {
        self.0
    }
}

/// Hash of a well's cells (ids and colors)
pub fn well_hash(well: &Well) -> u64 {
    let mut h = Fnv1a64::new();
    well.hash(&mut h);
    h.finish()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSnapshot {
    pub user_id: UserId,
    pub last_action_id: ActionId,
    pub status: PlayerStatus,
    pub losses: u32,
    pub drops: u32,
    pub score: u32,
    pub lines: u32,
    pub pending_rows: usize,
    pub active: TetrominoKind,
    pub position: Position,
    pub next: TetrominoKind,
    pub board_hash: u64,
    /// Hash of the full player value, round state included
    pub player_hash: u64,
}

impl From<&Player> for PlayerSnapshot {
    fn from(player: &Player) -> Self {
        let round = &player.round;
        let mut h = Fnv1a64::new();
        player.hash(&mut h);
        Self {
            user_id: player.user_id.clone(),
            last_action_id: player.last_action_id,
            status: player.status,
            losses: player.losses,
            drops: round.drops,
            score: round.score,
            lines: round.lines,
            pending_rows: round.blocks_pending.len(),
            active: round.active_tetromino,
            position: round.active_tetromino_position,
            next: round.next_tetromino,
            board_hash: well_hash(&round.grid),
            player_hash: h.finish(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub game_id: GameId,
    pub drop_frames: f32,
    pub players: Vec<PlayerSnapshot>,
}

impl GameSnapshot {
    /// Single value summarizing the whole game
    pub fn digest(&self) -> u64 {
        let mut h = Fnv1a64::new();
        self.game_id.hash(&mut h);
        self.drop_frames.to_bits().hash(&mut h);
        for player in &self.players {
            player.player_hash.hash(&mut h);
        }
        h.finish()
    }
}

impl From<&Game> for GameSnapshot {
    fn from(game: &Game) -> Self {
        Self {
            game_id: game.id,
            drop_frames: game.drop_frames,
            players: game.players.iter().map(PlayerSnapshot::from).collect(),
        }
    }
}
