//! Well tests - collision, stamping, line clearing and garbage rows

use duel_tetris::core::block_ids::BlockIdSequence;
use duel_tetris::core::{TetrominoGrid, Well};
use duel_tetris::types::{Block, Color, Position, TetrominoKind, WELL_COLS, WELL_ROWS};

const GRAY: Color = Color(0x808080);

fn mask_with_full_rows(full: &[usize]) -> Vec<Vec<bool>> {
    (0..WELL_ROWS)
        .map(|y| {
            (0..WELL_COLS)
                .map(|x| full.contains(&y) || (y > 10 && x == y % WELL_COLS))
                .collect()
        })
        .collect()
}

#[test]
fn test_blank_well_dimensions() {
    let well = Well::blank();
    assert_eq!(well.rows(), WELL_ROWS);
    assert_eq!(well.cols(), WELL_COLS);
    assert_eq!(well.blocks().count(), 0);
    assert!(!well.has_lines());

    assert_eq!(well.get(0, 0), Some(None));
    assert_eq!(well.get(-1, 0), None);
    assert_eq!(well.get(0, WELL_ROWS as i32), None);
}

#[test]
fn test_clear_two_separate_lines() {
    let well = Well::from_mask(&mask_with_full_rows(&[2, 5]), GRAY);
    let (cleared, rows) = well.clear_lines();

    assert_eq!(rows, vec![2, 5]);
    assert_eq!(cleared.rows(), WELL_ROWS);
    assert!(!cleared.has_lines());

    // Two empty rows were inserted at the top.
    assert!(cleared.row(0).unwrap().iter().all(Option::is_none));
    assert!(cleared.row(1).unwrap().iter().all(Option::is_none));

    // Rows below the lowest cleared row did not move.
    for y in 6..WELL_ROWS {
        assert_eq!(cleared.row(y), well.row(y), "row {y} should be untouched");
    }

    // Cleared rows are reported as they were.
    let removed = well.blocks_from_rows(&rows);
    assert_eq!(removed.len(), 2);
    assert!(removed.iter().all(|row| row.iter().all(Option::is_some)));
}

#[test]
fn test_cells_above_top_are_available() {
    let well = Well::blank();
    let i = TetrominoGrid::spawn(TetrominoKind::I);

    assert!(well.is_position_available(&i, Position::new(3, -3)));
    assert!(well.is_position_available(&i, Position::new(3, -1)));
    // The filled row of I is grid row 1, so y = 18 puts it on the floor row.
    assert!(well.is_position_available(&i, Position::new(3, 18)));
    assert!(!well.is_position_available(&i, Position::new(3, 19)));
    assert!(!well.is_position_available(&i, Position::new(-1, 5)));
    assert!(!well.is_position_available(&i, Position::new(7, 5)));
}

#[test]
fn test_bottom_most_position_lands_on_stack() {
    let mut well = Well::blank();
    for x in 0..WELL_COLS as i32 {
        well.set(x, 19, Some(Block { id: 1, color: GRAY }));
    }
    let o = TetrominoGrid::spawn(TetrominoKind::O);

    let landing = well.bottom_most_position(&o, Position::new(4, -2));
    assert_eq!(landing, Position::new(4, 17));
}

#[test]
fn test_drop_position_targets_advanced_row() {
    let mut well = Well::blank();
    // One-cell ledge at row 10 under the O's left column.
    well.set(4, 10, Some(Block { id: 1, color: GRAY }));
    let o = TetrominoGrid::spawn(TetrominoKind::O);

    // The advanced position is free, so the O ends up below the ledge.
    let past = well.drop_position(&o, Position::new(4, 0), 15);
    assert_eq!(past, Position::new(4, 15));

    // Overlapping the ledge, it climbs back to rest on top of it.
    let onto = well.drop_position(&o, Position::new(4, 0), 9);
    assert_eq!(onto, Position::new(4, 8));

    let partial = well.drop_position(&o, Position::new(4, 0), 3);
    assert_eq!(partial, Position::new(4, 3));
}

#[test]
fn test_transfer_piece_assigns_fresh_ids() {
    let well = Well::blank();
    let t = TetrominoGrid::spawn(TetrominoKind::T);
    let mut ids = BlockIdSequence::starting_at(10);

    let stamped = well.transfer_piece(&t, Position::new(3, 18), TetrominoKind::T.color(), &mut ids);
    let mut blocks: Vec<_> = stamped.blocks().map(|b| b.id).collect();
    blocks.sort_unstable();

    assert_eq!(blocks, vec![10, 11, 12, 13]);
    assert!(stamped.blocks().all(|b| b.color == TetrominoKind::T.color()));
    assert_eq!(ids.peek(), 14);
    // Source well is untouched.
    assert_eq!(well.blocks().count(), 0);
}

#[test]
fn test_transfer_piece_drops_cells_above_top() {
    let well = Well::blank();
    let o = TetrominoGrid::spawn(TetrominoKind::O);
    let mut ids = BlockIdSequence::new();

    let stamped = well.transfer_piece(&o, Position::new(0, -1), GRAY, &mut ids);
    assert_eq!(stamped.blocks().count(), 2);
}

#[test]
fn test_append_blocks_shifts_content_up() {
    let mut well = Well::blank();
    well.set(0, 0, Some(Block { id: 1, color: GRAY }));
    well.set(2, 19, Some(Block { id: 2, color: GRAY }));

    let garbage: Vec<_> = (0..WELL_COLS as u32)
        .map(|x| (x != 5).then_some(Block { id: 100 + x, color: GRAY }))
        .collect();
    let next = well.append_blocks(&[garbage.clone(), garbage]);

    assert_eq!(next.rows(), WELL_ROWS);
    // The top block was pushed out; the floor block moved up two rows.
    assert!(next.blocks().all(|b| b.id != 1));
    assert_eq!(next.get(2, 17), Some(Some(Block { id: 2, color: GRAY })));
    assert_eq!(next.get(5, 19), Some(None));
    assert_eq!(next.get(0, 18).flatten().map(|b| b.id), Some(100));
}

#[test]
fn test_fit_position_in_bounds_kicks_off_walls() {
    let well = Well::blank();
    let vertical_i = TetrominoGrid::spawn(TetrominoKind::I).rotate();

    // Filled column is grid col 2.
    let left = well.fit_position_in_bounds(&vertical_i, Position::new(-4, 5));
    assert_eq!(left, Position::new(-2, 5));

    let right = well.fit_position_in_bounds(&vertical_i, Position::new(9, 5));
    assert_eq!(right, Position::new(7, 5));

    let floor = well.fit_position_in_bounds(&vertical_i, Position::new(3, 19));
    assert_eq!(floor, Position::new(3, 16));
}

#[test]
fn test_display_renders_occupancy() {
    let mut well = Well::new(2, 3);
    well.set(1, 1, Some(Block { id: 1, color: GRAY }));
    assert_eq!(well.to_string(), "...\n.#.\n");
}
