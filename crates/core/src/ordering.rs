//! Ordering module - causal sequencing of actions per player
//!
//! Each action names the last action its sender believed was applied to their
//! own player (`prev_action_id`). Comparing that with what this copy recorded
//! (`last_action_id`) gives a signed offset:
//!
//! - `0`: causally adjacent, apply it
//! - `> 0`: detached, actions are missing and must be backfilled first
//! - `< 0`: stale, already superseded, ignore it

use crate::error::GameError;
use crate::game::Game;
use crate::types::{GameAction, UserId};

/// What to do with an incoming action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sequencing {
    Apply,
    Stale(i64),
    Detached(i64),
}

impl Sequencing {
    pub fn from_offset(offset: i64) -> Self {
        match offset {
            0 => Sequencing::Apply,
            o if o > 0 => Sequencing::Detached(o),
            o => Sequencing::Stale(o),
        }
    }
}

/// Signed distance between the action's predecessor and the recorded last
/// action of its player
///
/// Joins never have a predecessor and always yield 0. Actions from a user who
/// is not (yet) a player yield their own id, which is treated as arbitrarily
/// far ahead.
pub fn action_offset(game: &Game, action: &GameAction) -> Result<i64, GameError> {
    if action.is_join() {
        return Ok(0);
    }
    let Some(player) = game.player(&action.user_id) else {
        return Ok(i64::from(action.action_id));
    };
    let prev = action
        .prev_action_id
        .ok_or_else(|| GameError::MissingPrevActionId {
            user_id: action.user_id.clone(),
            action_id: action.action_id,
        })?;
    Ok(i64::from(prev) - i64::from(player.last_action_id))
}

/// [`action_offset`] classified
pub fn sequence_action(game: &Game, action: &GameAction) -> Result<Sequencing, GameError> {
    action_offset(game, action).map(Sequencing::from_offset)
}

/// Build the error for a detached action
pub(crate) fn detached(user_id: &UserId, action: &GameAction, offset: i64) -> GameError {
    GameError::DetachedAction {
        user_id: user_id.clone(),
        action_id: action.action_id,
        offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActionKind, GameId};

    fn game_with_last(last: u32) -> Game {
        let mut game = Game::new(GameId(1), UserId::from("a"));
        game.players[0].last_action_id = last;
        game
    }

    #[test]
    fn adjacent_stale_and_detached() {
        let game = game_with_last(5);
        let user = UserId::from("a");

        let adjacent = GameAction::new(6, 5, user.clone(), ActionKind::MoveLeft);
        let stale = GameAction::new(5, 4, user.clone(), ActionKind::MoveLeft);
        let ahead = GameAction::new(7, 6, user, ActionKind::MoveLeft);

        assert_eq!(action_offset(&game, &adjacent), Ok(0));
        assert_eq!(action_offset(&game, &stale), Ok(-1));
        assert_eq!(action_offset(&game, &ahead), Ok(1));

        assert_eq!(sequence_action(&game, &adjacent), Ok(Sequencing::Apply));
        assert_eq!(sequence_action(&game, &stale), Ok(Sequencing::Stale(-1)));
        assert_eq!(sequence_action(&game, &ahead), Ok(Sequencing::Detached(1)));
    }

    #[test]
    fn join_is_always_adjacent() {
        let game = game_with_last(5);
        let join = GameAction::join(99, UserId::from("b"));
        assert_eq!(action_offset(&game, &join), Ok(0));
    }

    #[test]
    fn unknown_player_is_ahead_by_action_id() {
        let game = game_with_last(5);
        let action = GameAction::new(12, 11, UserId::from("ghost"), ActionKind::Rotate);
        assert_eq!(action_offset(&game, &action), Ok(12));
    }

    #[test]
    fn missing_predecessor_is_rejected() {
        let game = game_with_last(0);
        let mut action = GameAction::new(1, 0, UserId::from("a"), ActionKind::Rotate);
        action.prev_action_id = None;
        assert!(matches!(
            action_offset(&game, &action),
            Err(GameError::MissingPrevActionId { .. })
        ));
    }
}
