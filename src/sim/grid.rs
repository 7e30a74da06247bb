//! Grid model: the fixed matrix of settled pieces
//!
//! Cells are addressed `(col, row)` with signed coordinates so neighbour
//! arithmetic can step off the board. Out-of-range cells read as blocked
//! (never empty) and ignore writes.

use serde::{Deserialize, Serialize};

/// A palette index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u8);

/// Fixed-size matrix of cells, row 0 is the ceiling
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Color>>,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Index of the bottom row (the game-over line)
    #[inline]
    pub fn bottom_row(&self) -> i32 {
        self.rows as i32 - 1
    }

    #[inline]
    pub fn in_bounds(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && (col as usize) < self.cols && (row as usize) < self.rows
    }

    #[inline]
    fn index(&self, col: i32, row: i32) -> Option<usize> {
        self.in_bounds(col, row)
            .then(|| row as usize * self.cols + col as usize)
    }

    pub fn get(&self, col: i32, row: i32) -> Option<Color> {
        self.index(col, row).and_then(|i| self.cells[i])
    }

    /// True only for in-bounds cells without a piece
    pub fn is_empty(&self, col: i32, row: i32) -> bool {
        self.index(col, row).is_some_and(|i| self.cells[i].is_none())
    }

    /// Write a piece. Returns false (and does nothing) out of bounds.
    pub fn set(&mut self, col: i32, row: i32, color: Color) -> bool {
        match self.index(col, row) {
            Some(i) => {
                self.cells[i] = Some(color);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self, col: i32, row: i32) {
        if let Some(i) = self.index(col, row) {
            self.cells[i] = None;
        }
    }

    pub fn row_is_empty(&self, row: i32) -> bool {
        (0..self.cols as i32).all(|col| self.get(col, row).is_none())
    }

    /// Occupied cells in row-major order
    pub fn occupied(&self) -> impl Iterator<Item = (i32, i32, Color)> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, cell)| {
            cell.map(|color| ((i % self.cols) as i32, (i / self.cols) as i32, color))
        })
    }

    pub fn piece_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Rows of cells, top to bottom (for renderers and text dumps)
    pub fn row_slices(&self) -> impl Iterator<Item = &[Option<Color>]> {
        self.cells.chunks(self.cols.max(1))
    }
}
