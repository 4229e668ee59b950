//! Scoring module - points and gravity for line clears
//!
//! Rudimentary rules, no T-spin or back-to-back bonuses:
//! - Every landed piece is worth its cell count, doubled when it was dropped
//!   with acceleration on.
//! - Line clears add `LINE_CLEAR_BONUSES[lines - 1] * (lines_total + 1)`, so
//!   sustained clearing is rewarded.
//! - Every clearing drop speeds gravity up by a fixed decrement, down to a
//!   floor.

use crate::types::{DROP_FRAMES_DECREMENT, DROP_FRAMES_MIN, LINE_CLEAR_BONUSES, TETROMINO_CELLS};

/// Score calculation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Points for the landed piece itself
    pub drop_points: u32,
    /// Line clear bonus (already multiplied)
    pub line_bonus: u32,
    pub total: u32,
    /// Lines to add to the player's total
    pub lines: u32,
}

/// Points for landing a piece
pub fn calculate_drop_points(accelerated: bool) -> u32 {
    if accelerated {
        TETROMINO_CELLS * 2
    } else {
        TETROMINO_CELLS
    }
}

/// Line clear bonus
///
/// `lines_cleared`: lines removed by this drop (0 yields 0, counts above the
/// table size use the last entry).
/// `lines_total`: player's cumulative lines before this drop.
pub fn calculate_line_bonus(lines_cleared: usize, lines_total: u32) -> u32 {
    if lines_cleared == 0 {
        return 0;
    }
    let idx = (lines_cleared - 1).min(LINE_CLEAR_BONUSES.len() - 1);
    LINE_CLEAR_BONUSES[idx].saturating_mul(lines_total.saturating_add(1))
}

/// Full score for a drop that cleared `lines_cleared` lines
pub fn calculate_score(lines_cleared: usize, lines_total: u32, accelerated: bool) -> ScoreResult {
    let drop_points = calculate_drop_points(accelerated);
    let line_bonus = calculate_line_bonus(lines_cleared, lines_total);
    ScoreResult {
        drop_points,
        line_bonus,
        total: drop_points.saturating_add(line_bonus),
        lines: lines_cleared as u32,
    }
}

/// Gravity after a drop. Faster (lower) when lines were cleared, never
/// below [`DROP_FRAMES_MIN`].
pub fn next_drop_frames(drop_frames: f32, lines_cleared: usize) -> f32 {
    if lines_cleared == 0 {
        return drop_frames;
    }
    (drop_frames - DROP_FRAMES_DECREMENT).max(DROP_FRAMES_MIN)
}
