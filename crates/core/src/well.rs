//! Well module - the grid a player's pieces fall into
//!
//! The well is a `rows x cols` grid where each cell is empty or holds a
//! [`Block`]. Coordinates: `(x, y)` where x ranges over columns (left to
//! right) and y over rows (top to bottom). Pieces may hang above the top row
//! (negative y) while they are still entering the well.
//!
//! Every operation that changes content returns a new well; the receiver is
//! left untouched so game states can be shared between snapshots.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::block_ids::BlockIdSource;
use crate::pieces::TetrominoGrid;
use crate::types::{Block, Cell, Color, Position, WELL_COLS, WELL_ROWS};

/// One row of cells, left to right
pub type WellRow = Vec<Cell>;

/// A fixed-size well
///
/// Deserialization rejects ragged or empty grids, so every well in memory is
/// rectangular.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWell")]
pub struct Well {
    /// Rows top to bottom, each exactly `cols` wide
    grid: Vec<WellRow>,
    cols: usize,
}

/// Malformed serialized well
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WellShapeError {
    #[error("well has no rows")]
    NoRows,

    #[error("well has zero columns")]
    NoColumns,

    #[error("row {row} has {len} cells, expected {cols}")]
    RaggedRow { row: usize, len: usize, cols: usize },
}

/// Unchecked wire form of [`Well`]
#[derive(Deserialize)]
struct RawWell {
    grid: Vec<WellRow>,
    cols: usize,
}

impl TryFrom<RawWell> for Well {
    type Error = WellShapeError;

    fn try_from(raw: RawWell) -> Result<Self, Self::Error> {
        if raw.grid.is_empty() {
            return Err(WellShapeError::NoRows);
        }
        if raw.cols == 0 {
            return Err(WellShapeError::NoColumns);
        }
        if let Some((row, r)) = raw.grid.iter().enumerate().find(|(_, r)| r.len() != raw.cols) {
            return Err(WellShapeError::RaggedRow {
                row,
                len: r.len(),
                cols: raw.cols,
            });
        }
        Ok(Self {
            grid: raw.grid,
            cols: raw.cols,
        })
    }
}

impl Well {
    /// Create an empty well. Both dimensions are at least 1.
    pub fn new(rows: usize, cols: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            grid: vec![vec![None; cols]; rows],
            cols,
        }
    }

    /// Empty well with the standard 20x10 dimensions
    pub fn blank() -> Self {
        Self::new(WELL_ROWS, WELL_COLS)
    }

    /// Build a well from explicit rows. Rows are padded or truncated to the
    /// width of the first row.
    pub fn from_rows(rows: Vec<WellRow>) -> Self {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0).max(1);
        let mut grid: Vec<WellRow> = rows
            .into_iter()
            .map(|mut row| {
                row.resize(cols, None);
                row
            })
            .collect();
        if grid.is_empty() {
            grid.push(vec![None; cols]);
        }
        Self { grid, cols }
    }

    pub fn rows(&self) -> usize {
        self.grid.len()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell at `(x, y)`; `None` if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if self.is_out_of_bounds(x, y) {
            return None;
        }
        Some(self.grid[y as usize][x as usize])
    }

    /// Set cell at `(x, y)`. Returns false if out of bounds.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        if self.is_out_of_bounds(x, y) {
            return false;
        }
        self.grid[y as usize][x as usize] = cell;
        true
    }

    pub fn is_out_of_bounds(&self, x: i32, y: i32) -> bool {
        x < 0 || x >= self.cols as i32 || y < 0 || y >= self.rows() as i32
    }

    /// In bounds and filled
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        self.grid.get(y).map(|r| r.as_slice())
    }

    pub fn grid(&self) -> &[WellRow] {
        &self.grid
    }

    /// Every occupied cell, top to bottom, left to right
    pub fn blocks(&self) -> impl Iterator<Item = Block> + '_ {
        self.grid.iter().flat_map(|row| row.iter().flatten().copied())
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        self.grid
            .get(y)
            .is_some_and(|row| row.iter().all(|cell| cell.is_some()))
    }

    /// Check whether `shape` fits at `position`
    ///
    /// Every filled cell must be within the columns and above the floor, and
    /// must not overlap a settled block. Cells above the top row are still
    /// entering the well and always fit.
    pub fn is_position_available(&self, shape: &TetrominoGrid, position: Position) -> bool {
        shape.filled_cells().iter().all(|&(dx, dy)| {
            let x = position.x + dx;
            let y = position.y + dy;
            if x < 0 || x >= self.cols as i32 || y >= self.rows() as i32 {
                return false;
            }
            y < 0 || self.grid[y as usize][x as usize].is_none()
        })
    }

    /// Lowest available position in the column of `start`
    ///
    /// From an available start the piece slides down until the next row is
    /// blocked. From an unavailable start (blocks pushed up under the piece)
    /// it climbs until it fits again.
    pub fn bottom_most_position(&self, shape: &TetrominoGrid, start: Position) -> Position {
        let mut position = start;
        if self.is_position_available(shape, position) {
            let floor = self.rows() as i32;
            while position.y < floor && self.is_position_available(shape, position.offset(0, 1)) {
                position = position.offset(0, 1);
            }
            return position;
        }

        // Fully above the well everything fits unless the columns are wrong.
        let ceiling = -(shape.size() as i32);
        while position.y > ceiling {
            position = position.offset(0, -1);
            if self.is_position_available(shape, position) {
                return position;
            }
        }
        position
    }

    /// Advance `shape` from `from` by `rows`
    ///
    /// The advanced position is taken as-is when it fits, even across an
    /// overhang. Otherwise the piece climbs back from it to the nearest
    /// available position, see [`bottom_most_position`](Self::bottom_most_position).
    pub fn drop_position(&self, shape: &TetrominoGrid, from: Position, rows: u32) -> Position {
        // Anything past the floor climbs back the same way.
        let floor = self.rows() as i64;
        let target = (from.y as i64 + rows as i64).min(floor.max(from.y as i64));
        let advanced = Position::new(from.x, target as i32);
        if self.is_position_available(shape, advanced) {
            advanced
        } else {
            self.bottom_most_position(shape, advanced)
        }
    }

    /// Wall-kick `position` so every filled cell of `shape` is inside the
    /// columns and above the floor. Collisions are not considered.
    pub fn fit_position_in_bounds(&self, shape: &TetrominoGrid, position: Position) -> Position {
        let cols = self.cols as i32;
        let rows = self.rows() as i32;
        let mut x = position.x;
        let mut y = position.y;
        for &(dx, dy) in shape.filled_cells().iter() {
            let col = x + dx;
            if col < 0 {
                x -= col;
            } else if col >= cols {
                x -= col - cols + 1;
            }
            let row = y + dy;
            if row >= rows {
                y -= row - rows + 1;
            }
        }
        Position::new(x, y)
    }

    /// Stamp `shape` into a copy of the well
    ///
    /// Each new block takes a fresh id from `ids` and the given color. Cells
    /// hanging above the top row are dropped.
    pub fn transfer_piece(
        &self,
        shape: &TetrominoGrid,
        position: Position,
        color: Color,
        ids: &mut impl BlockIdSource,
    ) -> Well {
        let mut well = self.clone();
        for &(dx, dy) in shape.filled_cells().iter() {
            let x = position.x + dx;
            let y = position.y + dy;
            if well.is_out_of_bounds(x, y) {
                continue;
            }
            well.grid[y as usize][x as usize] = Some(Block {
                id: ids.next_id(),
                color,
            });
        }
        well
    }

    pub fn has_lines(&self) -> bool {
        (0..self.rows()).any(|y| self.is_row_full(y))
    }

    /// Remove every full row
    ///
    /// Rows above a cleared row shift down; empty rows are inserted at the
    /// top. Returns the new well and the cleared row indices (in the original
    /// well, ascending).
    pub fn clear_lines(&self) -> (Well, Vec<usize>) {
        let rows = self.rows();
        let mut cleared = Vec::new();
        let mut kept: Vec<WellRow> = Vec::with_capacity(rows);

        for (y, row) in self.grid.iter().enumerate() {
            if self.is_row_full(y) {
                cleared.push(y);
            } else {
                kept.push(row.clone());
            }
        }

        let mut grid = vec![vec![None; self.cols]; cleared.len()];
        grid.extend(kept);

        (
            Well {
                grid,
                cols: self.cols,
            },
            cleared,
        )
    }

    /// Copy the given rows (holes included). Out-of-range indices are skipped.
    pub fn blocks_from_rows(&self, rows: &[usize]) -> Vec<WellRow> {
        rows.iter()
            .filter_map(|&y| self.grid.get(y).cloned())
            .collect()
    }

    /// Push `pending` rows in at the bottom
    ///
    /// Existing content shifts up by the number of pending rows and whatever
    /// rises above the top row is discarded.
    pub fn append_blocks(&self, pending: &[WellRow]) -> Well {
        let rows = self.rows();
        let mut grid: Vec<WellRow> = Vec::with_capacity(rows + pending.len());
        grid.extend(self.grid.iter().cloned());
        grid.extend(pending.iter().map(|row| {
            let mut row = row.clone();
            row.resize(self.cols, None);
            row
        }));
        let overflow = grid.len() - rows;
        grid.drain(..overflow);

        Well {
            grid,
            cols: self.cols,
        }
    }

    /// Create a well from a 2D occupancy mask for testing
    ///
    /// `true` cells get sequential ids starting at 1 and the given color.
    pub fn from_mask(mask: &[Vec<bool>], color: Color) -> Self {
        let mut next_id = 1;
        let rows = mask
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&filled| {
                        filled.then(|| {
                            let id = next_id;
                            next_id += 1;
                            Block { id, color }
                        })
                    })
                    .collect()
            })
            .collect();
        Self::from_rows(rows)
    }
}

impl Default for Well {
    fn default() -> Self {
        Self::blank()
    }
}

impl fmt::Display for Well {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.grid {
            for cell in row {
                f.write_str(if cell.is_some() { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
