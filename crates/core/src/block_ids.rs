//! Block id generation
//!
//! Every block stamped into (or relocated into) a well gets an id that is
//! unique within that well. Ids are handed out by a per-well monotonic
//! sequence stored in the player's round state, so two copies of the engine
//! fed the same actions hand out the same ids.

use serde::{Deserialize, Serialize};

use crate::types::{Block, BlockId};
use crate::well::WellRow;

/// Source of fresh block ids
pub trait BlockIdSource {
    fn next_id(&mut self) -> BlockId;
}

/// Monotonic id sequence scoped to a single well
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BlockIdSequence {
    next: BlockId,
}

impl BlockIdSequence {
    /// Sequence starting at 1 (0 is never handed out)
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Sequence whose next id is `next`
    pub fn starting_at(next: BlockId) -> Self {
        Self { next }
    }

    /// The id the next call to [`BlockIdSource::next_id`] returns
    pub fn peek(&self) -> BlockId {
        self.next
    }
}

impl BlockIdSource for BlockIdSequence {
    fn next_id(&mut self) -> BlockId {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }
}

/// Reassign fresh ids to every occupied cell of `rows`
///
/// Used when cleared rows are relocated into an opponent's pending queue so
/// they can never collide with ids already present in the destination well.
pub fn override_block_ids(rows: &[WellRow], ids: &mut impl BlockIdSource) -> Vec<WellRow> {
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|cell| {
                    cell.map(|block| Block {
                        id: ids.next_id(),
                        color: block.color,
                    })
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;

    #[test]
    fn sequence_is_monotonic() {
        let mut ids = BlockIdSequence::new();
        assert_eq!(ids.next_id(), 1);
        assert_eq!(ids.next_id(), 2);
        assert_eq!(ids.peek(), 3);
    }

    #[test]
    fn override_keeps_colors_and_holes() {
        let red = Color(0xff0000);
        let rows = vec![vec![
            Some(Block { id: 7, color: red }),
            None,
            Some(Block { id: 7, color: red }),
        ]];

        let mut ids = BlockIdSequence::starting_at(40);
        let out = override_block_ids(&rows, &mut ids);

        assert_eq!(out[0][0], Some(Block { id: 40, color: red }));
        assert_eq!(out[0][1], None);
        assert_eq!(out[0][2], Some(Block { id: 41, color: red }));
        assert_eq!(ids.peek(), 42);
    }
}
