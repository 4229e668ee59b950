//! Reducer module - action dispatch and game rules
//!
//! [`game_reducer`] is the single entry point: it runs the ordering check,
//! applies the action through the rule handlers and records the action as
//! the player's last applied one.
//!
//! Handlers never mutate their input. A handler that rejects an action (a
//! blocked move, a redundant toggle, a join into a full game) returns the
//! input `Arc` itself so callers can detect "nothing changed" with
//! `Arc::ptr_eq` and skip rebroadcasting.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::block_ids::override_block_ids;
use crate::error::GameError;
use crate::game::Game;
use crate::ordering::{detached, sequence_action, Sequencing};
use crate::player::Player;
use crate::rng::PieceSequencer;
use crate::scoring::{calculate_score, next_drop_frames};
use crate::types::{
    ActionKind, FlashSuffix, GameAction, PlayerStatus, Quake, UserId, DROP_FRAMES_DEFAULT,
    MAX_PLAYERS,
};

/// When to record an applied action as the player's `last_action_id`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BumpPolicy {
    /// Every non-stale, non-detached action, even if it changed nothing.
    /// Copies rebuilt from backfill must agree on `last_action_id` even when
    /// an action was a no-op on only one of them.
    ///
    /// Rejected joins are never recorded: a join names no predecessor, so a
    /// redelivered one would otherwise rewind its sender.
    #[default]
    Always,
    /// Only when the handler produced a different state
    WhenChanged,
}

impl BumpPolicy {
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "always" => Some(BumpPolicy::Always),
            "when-changed" | "when_changed" | "changed" => Some(BumpPolicy::WhenChanged),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BumpPolicy::Always => "always",
            BumpPolicy::WhenChanged => "when-changed",
        }
    }
}

/// Knobs for [`game_reducer_with`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReducerOptions {
    pub bump_policy: BumpPolicy,
}

/// Apply `action` to `state` with default options
///
/// - `Err(GameError::DetachedAction)`: actions are missing, backfill and retry
/// - `Ok(same Arc)`: stale or rejected action, do not rebroadcast
/// - `Ok(new Arc)`: applied
pub fn game_reducer(
    state: Option<&Arc<Game>>,
    action: &GameAction,
) -> Result<Arc<Game>, GameError> {
    game_reducer_with(state, action, ReducerOptions::default())
}

pub fn game_reducer_with(
    state: Option<&Arc<Game>>,
    action: &GameAction,
    options: ReducerOptions,
) -> Result<Arc<Game>, GameError> {
    let Some(state) = state else {
        warn!(
            action = action.kind.as_str(),
            user_id = %action.user_id,
            "Game action on void state"
        );
        return Err(GameError::VoidGame {
            action: action.kind.as_str(),
        });
    };

    match sequence_action(state, action)? {
        Sequencing::Apply => {}
        Sequencing::Stale(offset) => {
            debug!(
                game_id = %state.id,
                user_id = %action.user_id,
                action_id = action.action_id,
                offset,
                "Ignoring stale action"
            );
            return Ok(Arc::clone(state));
        }
        Sequencing::Detached(offset) => {
            warn!(
                game_id = %state.id,
                user_id = %action.user_id,
                action_id = action.action_id,
                offset,
                "Detached action, backfill required"
            );
            return Err(detached(&action.user_id, action, offset));
        }
    }

    let next = apply_action(state, action)?;
    Ok(bump_last_action_id(state, next, action, options.bump_policy))
}

/// Record `action` as the acting player's last applied action
fn bump_last_action_id(
    before: &Arc<Game>,
    mut after: Arc<Game>,
    action: &GameAction,
    policy: BumpPolicy,
) -> Arc<Game> {
    let unchanged = Arc::ptr_eq(before, &after);
    if unchanged && (policy == BumpPolicy::WhenChanged || action.is_join()) {
        return after;
    }
    let Some(idx) = after.player_index(&action.user_id) else {
        return after;
    };
    // Never moves backwards.
    if after.players[idx].last_action_id >= action.action_id {
        return after;
    }
    Arc::make_mut(&mut after).players[idx].last_action_id = action.action_id;
    after
}

/// Run the rule handler for `action` without ordering checks or bumping
///
/// Returns the input `Arc` when the action is rejected by the game rules.
pub fn apply_action(state: &Arc<Game>, action: &GameAction) -> Result<Arc<Game>, GameError> {
    let game: &Game = state;
    let user_id = &action.user_id;

    let next = match &action.kind {
        ActionKind::JoinGame => join_game(game, user_id),
        ActionKind::PlayerReady => player_ready(game, user_id)?,
        ActionKind::PlayerPause => player_pause(game, user_id)?,
        ActionKind::Drop { rows } => drop_piece(game, user_id, *rows)?,
        ActionKind::MoveLeft => move_piece(game, user_id, -1)?,
        ActionKind::MoveRight => move_piece(game, user_id, 1)?,
        ActionKind::Rotate => rotate_piece(game, user_id)?,
        ActionKind::EnableAcceleration => set_acceleration(game, user_id, true)?,
        ActionKind::DisableAcceleration => set_acceleration(game, user_id, false)?,
        ActionKind::AppendPendingBlocks => append_pending_blocks(game, user_id)?,
        ActionKind::Ping { time } => ping(game, user_id, *time)?,
    };

    Ok(next.map(Arc::new).unwrap_or_else(|| Arc::clone(state)))
}

fn join_game(game: &Game, user_id: &UserId) -> Option<Game> {
    if game.player(user_id).is_some() {
        warn!(game_id = %game.id, user_id = %user_id, "User tried to join game more than once");
        return None;
    }
    if game.players.len() >= MAX_PLAYERS {
        warn!(game_id = %game.id, user_id = %user_id, "User tried to join a full game");
        return None;
    }

    let mut next = game.clone();
    for player in &mut next.players {
        player.reset_for_match();
    }
    let round = next.round();
    next.players.push(Player::new(user_id.clone(), next.id, round));

    info!(game_id = %game.id, user_id = %user_id, "Player joined game");
    Some(next)
}

fn player_ready(game: &Game, user_id: &UserId) -> Result<Option<Game>, GameError> {
    let idx = game.require_player(user_id)?;
    let prev_status = game.players[idx].status;

    let mut next = game.clone();
    next.players[idx].mark_ready();

    // A solo player resuming from pause keeps the round going.
    if next.all_ready() && (next.is_multiplayer() || prev_status != PlayerStatus::Pause) {
        let round = next.round();
        let id = next.id;
        for player in &mut next.players {
            player.start_round(id, round);
        }
        next.drop_frames = DROP_FRAMES_DEFAULT;
        info!(game_id = %id, round, "All players ready, starting round");
        return Ok(Some(next));
    }

    if prev_status == PlayerStatus::Ready {
        return Ok(None);
    }
    Ok(Some(next))
}

fn player_pause(game: &Game, user_id: &UserId) -> Result<Option<Game>, GameError> {
    if game.is_multiplayer() {
        warn!(game_id = %game.id, user_id = %user_id, "Pause attempted in multiplayer game");
        return Err(GameError::MultiplayerPause {
            user_id: user_id.clone(),
        });
    }
    let idx = game.require_player(user_id)?;
    if game.players[idx].status == PlayerStatus::Pause {
        return Ok(None);
    }

    let mut next = game.clone();
    next.players[idx].pause();
    Ok(Some(next))
}

fn move_piece(game: &Game, user_id: &UserId, dx: i32) -> Result<Option<Game>, GameError> {
    let idx = game.require_player(user_id)?;
    let round = &game.players[idx].round;
    let position = round.active_tetromino_position.offset(dx, 0);

    if !round
        .grid
        .is_position_available(&round.active_tetromino_grid, position)
    {
        debug!(user_id = %user_id, dx, "Move blocked");
        return Ok(None);
    }

    let mut next = game.clone();
    next.players[idx].round.active_tetromino_position = position;
    Ok(Some(next))
}

fn rotate_piece(game: &Game, user_id: &UserId) -> Result<Option<Game>, GameError> {
    let idx = game.require_player(user_id)?;
    let round = &game.players[idx].round;
    let shape = round.active_tetromino_grid.rotate();
    let position = round
        .grid
        .fit_position_in_bounds(&shape, round.active_tetromino_position);

    if !round.grid.is_position_available(&shape, position) {
        debug!(user_id = %user_id, "Rotation blocked");
        return Ok(None);
    }

    let mut next = game.clone();
    let round = &mut next.players[idx].round;
    round.active_tetromino_grid = shape;
    round.active_tetromino_position = position;
    Ok(Some(next))
}

fn set_acceleration(game: &Game, user_id: &UserId, enabled: bool) -> Result<Option<Game>, GameError> {
    let idx = game.require_player(user_id)?;
    if game.players[idx].round.drop_acceleration == enabled {
        return Ok(None);
    }

    let mut next = game.clone();
    next.players[idx].round.drop_acceleration = enabled;
    Ok(Some(next))
}

fn ping(game: &Game, user_id: &UserId, time: u64) -> Result<Option<Game>, GameError> {
    let idx = game.require_player(user_id)?;
    if game.players[idx].round.ping == Some(time) {
        return Ok(None);
    }

    let mut next = game.clone();
    next.players[idx].round.ping = Some(time);
    Ok(Some(next))
}

fn append_pending_blocks(game: &Game, user_id: &UserId) -> Result<Option<Game>, GameError> {
    let idx = game.require_player(user_id)?;
    let round = &game.players[idx].round;
    if round.blocks_pending.is_empty() {
        return Ok(None);
    }

    let grid = round.grid.append_blocks(&round.blocks_pending);
    let shape = &round.active_tetromino_grid;
    let mut position = round.active_tetromino_position;
    // Game over for a piece pushed out of the well is detected by the next drop.
    if !grid.is_position_available(shape, position) {
        position = grid.bottom_most_position(shape, position);
    }

    let mut next = game.clone();
    let round = &mut next.players[idx].round;
    round.grid = grid;
    round.blocks_pending = Vec::new();
    round.active_tetromino_position = position;
    Ok(Some(next))
}

/// Quake magnitude for an accelerated clear of `lines` lines
fn quake_magnitude(lines: usize) -> Result<u8, GameError> {
    match lines {
        1..=4 => Ok(lines as u8),
        _ => Err(GameError::InvalidQuakeMagnitude(lines)),
    }
}

fn drop_piece(game: &Game, user_id: &UserId, rows: u32) -> Result<Option<Game>, GameError> {
    let idx = game.require_player(user_id)?;
    let round = &game.players[idx].round;
    let shape = &round.active_tetromino_grid;
    let from = round.active_tetromino_position;

    let landing = round.grid.drop_position(shape, from, rows);
    if i64::from(landing.y) == i64::from(from.y) + i64::from(rows) {
        if rows == 0 {
            return Ok(None);
        }
        let mut next = game.clone();
        next.players[idx].round.active_tetromino_position = landing;
        return Ok(Some(next));
    }

    // The piece could not fully enter the well. Lines are not cleared on
    // this path even if that would have made room.
    if landing.y < 0 {
        let mut next = game.clone();
        for (i, player) in next.players.iter_mut().enumerate() {
            if i == idx {
                player.mark_lost();
            } else {
                player.mark_won();
            }
        }
        info!(
            game_id = %game.id,
            user_id = %user_id,
            losses = next.players[idx].losses,
            "Piece landed above the well, round over"
        );
        return Ok(Some(next));
    }

    let accelerated = round.drop_acceleration;
    let sequencer = PieceSequencer::new(game.id, game.round());
    let mut ids = round.block_ids;
    let stamped = round
        .grid
        .transfer_piece(shape, landing, round.active_tetromino.color(), &mut ids);

    let mut next = game.clone();
    let player_round = &mut next.players[idx].round;
    player_round.block_ids = ids;
    player_round.drops += 1;
    player_round.drop_acceleration = false;
    player_round.blocks_cleared = Vec::new();
    player_round.spawn_next(&sequencer);

    if !stamped.has_lines() {
        player_round.grid = stamped;
        return Ok(Some(next));
    }

    let (cleared_grid, cleared_rows) = stamped.clear_lines();
    // Taken from the well before the landed piece was stamped, so the rows
    // sent to the opponent have holes where the piece was.
    let blocks_cleared = round.grid.blocks_from_rows(&cleared_rows);
    let lines_cleared = cleared_rows.len();

    let quake = if accelerated {
        Some(Quake {
            magnitude: quake_magnitude(lines_cleared)?,
            suffix: FlashSuffix::after(player_round.quake.map(|q| q.suffix)),
        })
    } else {
        player_round.quake
    };
    let score = calculate_score(lines_cleared, player_round.lines, accelerated);

    player_round.grid = cleared_grid;
    player_round.blocks_cleared = blocks_cleared.clone();
    player_round.flash_yay = Some(FlashSuffix::after(player_round.flash_yay));
    player_round.quake = quake;
    player_round.score = player_round.score.saturating_add(score.total);
    player_round.lines += score.lines;
    next.drop_frames = next_drop_frames(next.drop_frames, lines_cleared);

    debug!(
        game_id = %game.id,
        user_id = %user_id,
        lines = lines_cleared,
        points = score.total,
        "Lines cleared"
    );

    if let Some(opponent) = next.other_player_index(user_id) {
        let opponent_round = &mut next.players[opponent].round;
        let relocated = override_block_ids(&blocks_cleared, &mut opponent_round.block_ids);
        opponent_round.blocks_pending.extend(relocated);
        opponent_round.flash_nay = Some(FlashSuffix::after(opponent_round.flash_nay));
    }

    Ok(Some(next))
}
