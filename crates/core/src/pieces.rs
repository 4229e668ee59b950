//! Pieces module - tetromino shape grids and rotation
//!
//! Every kind spawns from a fixed square grid (4x4 for I, 2x2 for O, 3x3 for
//! the rest). Rotation is a plain clockwise transform of that grid with no
//! kick table; bounds are fixed up afterwards by
//! [`Well::fit_position_in_bounds`](crate::well::Well::fit_position_in_bounds).

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::types::{Position, TetrominoKind, SPAWN_Y};

/// Largest shape grid side (the I piece)
pub const SHAPE_MAX: usize = 4;

/// Filled cells of a shape as `(col, row)` offsets from the grid origin
pub type ShapeCells = ArrayVec<(i32, i32), { SHAPE_MAX * SHAPE_MAX }>;

/// A tetromino in one rotation state: a square boolean grid of side `size`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TetrominoGrid {
    size: u8,
    cells: [[bool; SHAPE_MAX]; SHAPE_MAX],
}

const X: bool = true;
const O: bool = false;

impl TetrominoGrid {
    /// Spawn orientation for a kind
    pub fn spawn(kind: TetrominoKind) -> Self {
        match kind {
            TetrominoKind::I => Self::from_rows(
                4,
                [[O, O, O, O], [X, X, X, X], [O, O, O, O], [O, O, O, O]],
            ),
            TetrominoKind::O => Self::from_rows(
                2,
                [[X, X, O, O], [X, X, O, O], [O, O, O, O], [O, O, O, O]],
            ),
            TetrominoKind::T => Self::from_rows(
                3,
                [[O, X, O, O], [X, X, X, O], [O, O, O, O], [O, O, O, O]],
            ),
            TetrominoKind::J => Self::from_rows(
                3,
                [[X, O, O, O], [X, X, X, O], [O, O, O, O], [O, O, O, O]],
            ),
            TetrominoKind::L => Self::from_rows(
                3,
                [[O, O, X, O], [X, X, X, O], [O, O, O, O], [O, O, O, O]],
            ),
            TetrominoKind::S => Self::from_rows(
                3,
                [[O, X, X, O], [X, X, O, O], [O, O, O, O], [O, O, O, O]],
            ),
            TetrominoKind::Z => Self::from_rows(
                3,
                [[X, X, O, O], [O, X, X, O], [O, O, O, O], [O, O, O, O]],
            ),
        }
    }

    /// Build a grid from explicit rows. Cells outside `size` are ignored.
    pub fn from_rows(size: u8, rows: [[bool; SHAPE_MAX]; SHAPE_MAX]) -> Self {
        let size = size.clamp(1, SHAPE_MAX as u8);
        let mut cells = [[false; SHAPE_MAX]; SHAPE_MAX];
        for row in 0..size as usize {
            for col in 0..size as usize {
                cells[row][col] = rows[row][col];
            }
        }
        Self { size, cells }
    }

    /// Side length of the local grid
    pub fn size(&self) -> usize {
        self.size as usize
    }

    pub fn is_filled(&self, row: usize, col: usize) -> bool {
        row < self.size() && col < self.size() && self.cells[row][col]
    }

    /// Filled cells as `(col, row)` offsets (row-major order)
    pub fn filled_cells(&self) -> ShapeCells {
        let mut out = ShapeCells::new();
        for row in 0..self.size() {
            for col in 0..self.size() {
                if self.cells[row][col] {
                    out.push((col as i32, row as i32));
                }
            }
        }
        out
    }

    /// Next rotation state (90° clockwise)
    ///
    /// `new[row][col] = old[size - 1 - col][row]`
    pub fn rotate(&self) -> Self {
        let n = self.size();
        let mut cells = [[false; SHAPE_MAX]; SHAPE_MAX];
        for (row, out_row) in cells.iter_mut().enumerate().take(n) {
            for (col, out) in out_row.iter_mut().enumerate().take(n) {
                *out = self.cells[n - 1 - col][row];
            }
        }
        Self {
            size: self.size,
            cells,
        }
    }
}

/// Spawn position for a grid in a well `well_cols` wide
///
/// Horizontally centered (rounding towards the left for odd leftovers) and
/// two rows above the top of the well.
pub fn spawn_position(grid: &TetrominoGrid, well_cols: usize) -> Position {
    let half_shape = grid.size().div_ceil(2) as i32;
    Position::new(well_cols as i32 / 2 - half_shape, SPAWN_Y)
}
