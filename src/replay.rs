//! Replay runner - feed a JSON-lines action log through the reducer
//!
//! The first non-empty line creates the game:
//!
//! ```json
//! {"gameId":42,"userId":"alice"}
//! ```
//!
//! Every following line is a [`GameAction`]. Rule rejections and stale
//! actions are counted and skipped; a detached action either stops the run
//! (reporting the gap a client would have to backfill) or is skipped,
//! depending on [`ReplayConfig::stop_on_detached`].

use std::io::BufRead;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ReplayConfig;
use crate::core::{
    apply_action, game_reducer_with, sequence_action, Game, GameError, GameSnapshot,
    ReducerOptions, Sequencing,
};
use crate::types::{ActionId, GameAction, GameId, UserId};

/// Game creation record heading an action log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameHeader {
    pub game_id: GameId,
    pub user_id: UserId,
}

/// A detached action that ended the replay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetachedGap {
    /// 1-based line number in the log
    pub line: usize,
    pub user_id: UserId,
    pub action_id: ActionId,
    /// Number of actions missing before this one
    pub offset: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaySummary {
    pub game_id: GameId,
    /// Action lines read (header excluded)
    pub actions: u32,
    /// Actions that changed the game
    pub applied: u32,
    /// In-order actions the game rules turned into no-ops
    pub unchanged: u32,
    pub stale: u32,
    /// Detached actions skipped (only when not stopping on them)
    pub detached: u32,
    /// Actions refused with a protocol error other than detachment
    pub rejected: u32,
    pub stopped_at: Option<DetachedGap>,
    pub snapshot: GameSnapshot,
    pub digest: u64,
}

impl ReplaySummary {
    fn new(game: &Game) -> Self {
        let snapshot = GameSnapshot::from(game);
        Self {
            game_id: game.id,
            actions: 0,
            applied: 0,
            unchanged: 0,
            stale: 0,
            detached: 0,
            rejected: 0,
            stopped_at: None,
            digest: snapshot.digest(),
            snapshot,
        }
    }

    fn finish(&mut self, game: &Game) {
        self.snapshot = GameSnapshot::from(game);
        self.digest = self.snapshot.digest();
    }
}

/// Replay errors
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("failed to read action log: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: invalid JSON: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("action log is empty, expected a game header")]
    MissingHeader,
}

/// Run every action of `reader` against a fresh game; returns the final game
/// and the summary
pub fn replay<R: BufRead>(
    reader: R,
    config: &ReplayConfig,
) -> Result<(Arc<Game>, ReplaySummary), ReplayError> {
    let options = ReducerOptions {
        bump_policy: config.bump_policy,
    };
    let mut lines = reader
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line));

    let header: GameHeader = loop {
        let Some((line_no, line)) = lines.next() else {
            return Err(ReplayError::MissingHeader);
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        break parse_line(line_no, &line)?;
    };

    let mut game = Arc::new(Game::new(header.game_id, header.user_id));
    let mut summary = ReplaySummary::new(&game);
    info!(game_id = %game.id, "Replaying action log");

    for (line_no, line) in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let action: GameAction = parse_line(line_no, &line)?;
        summary.actions += 1;

        match sequence_action(&game, &action) {
            Ok(Sequencing::Apply) => {}
            Ok(Sequencing::Stale(_)) => {
                summary.stale += 1;
                continue;
            }
            Ok(Sequencing::Detached(offset)) => {
                if config.stop_on_detached {
                    warn!(line = line_no, offset, "Stopping at detached action");
                    summary.stopped_at = Some(DetachedGap {
                        line: line_no,
                        user_id: action.user_id.clone(),
                        action_id: action.action_id,
                        offset,
                    });
                    break;
                }
                summary.detached += 1;
                continue;
            }
            Err(err) => {
                reject(&mut summary, line_no, &err);
                continue;
            }
        }

        // Rule outcome alone, before the bump makes every state look new.
        let changed = match apply_action(&game, &action) {
            Ok(next) => !Arc::ptr_eq(&next, &game),
            Err(err) => {
                reject(&mut summary, line_no, &err);
                continue;
            }
        };

        match game_reducer_with(Some(&game), &action, options) {
            Ok(next) => {
                if changed {
                    summary.applied += 1;
                } else {
                    summary.unchanged += 1;
                }
                game = next;
            }
            Err(err) => reject(&mut summary, line_no, &err),
        }
    }

    summary.finish(&game);
    info!(
        game_id = %game.id,
        applied = summary.applied,
        stale = summary.stale,
        digest = summary.digest,
        "Replay finished"
    );
    Ok((game, summary))
}

fn parse_line<T: for<'de> Deserialize<'de>>(line_no: usize, line: &str) -> Result<T, ReplayError> {
    serde_json::from_str(line).map_err(|source| ReplayError::Parse {
        line: line_no,
        source,
    })
}

fn reject(summary: &mut ReplaySummary, line_no: usize, err: &GameError) {
    debug!(line = line_no, error = %err, "Action rejected");
    summary.rejected += 1;
}
