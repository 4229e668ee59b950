//! RNG module - seeded piece sequencing
//!
//! The piece stream of a round is a pure function of
//! `(game id, round, drop index)`: there is no generator state to carry
//! between actions, so a client prediction copy and the authoritative copy
//! always agree on the next piece, and replaying an action log reproduces
//! the exact same pieces.
//!
//! The drop index is mixed into the round seed and the result seeds a simple
//! LCG whose first output picks the kind.

use crate::types::{GameId, TetrominoKind};

/// Weyl-sequence increment used to spread consecutive inputs
const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// Simple LCG (Linear Congruential Generator) RNG
/// Uses constants from Numerical Recipes
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u32,
}

impl SimpleRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u32) -> Self {
        // Avoid 0 seed which would produce all zeros
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate next random u32
    pub fn next_u32(&mut self) -> u32 {
        // LCG formula: (a * state + c) mod m
        // Using Numerical Recipes constants: a=1664525, c=1013904223, m=2^32
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Generate random value in range [0, max)
    ///
    /// Uses the high bits; the low bits of a power-of-two LCG have short
    /// periods.
    pub fn next_range(&mut self, max: u32) -> u32 {
        ((self.next_u32() as u64 * max as u64) >> 32) as u32
    }
}

/// SplitMix64 finalizer
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Seed shared by every piece of a round
///
/// Combines the numeric game id with `round + 1` so each round of a game gets
/// its own (reproducible) sequence.
pub fn round_seed(game_id: GameId, round: u32) -> u64 {
    mix64(
        game_id
            .0
            .wrapping_add(GOLDEN_GAMMA)
            .wrapping_mul(u64::from(round) + 1),
    )
}

/// Piece kind for the `drop`-th piece of a round
pub fn tetromino_at(game_id: GameId, round: u32, drop: u32) -> TetrominoKind {
    PieceSequencer::new(game_id, round).tetromino_at(drop)
}

/// Piece generator bound to one round of one game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSequencer {
    seed: u64,
}

impl PieceSequencer {
    pub fn new(game_id: GameId, round: u32) -> Self {
        Self {
            seed: round_seed(game_id, round),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Kind of the `drop`-th piece (0-based)
    pub fn tetromino_at(&self, drop: u32) -> TetrominoKind {
        let mixed = mix64(self.seed ^ u64::from(drop).wrapping_mul(GOLDEN_GAMMA));
        let mut rng = SimpleRng::new((mixed >> 32) as u32 ^ mixed as u32);
        let index = rng.next_range(TetrominoKind::ALL.len() as u32) as usize;
        TetrominoKind::ALL[index]
    }

    /// Active piece and lookahead for a player who has placed `drops` pieces
    pub fn pair(&self, drops: u32) -> (TetrominoKind, TetrominoKind) {
        (self.tetromino_at(drops), self.tetromino_at(drops + 1))
    }
}
