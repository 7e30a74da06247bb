//! Play-field geometry
//!
//! Maps grid cells to continuous field coordinates. The origin is the
//! top-left corner of the grid, y grows downward and the ceiling is `y = 0`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub rows: usize,
    pub cols: usize,
    /// Edge length of one cell
    pub cell_size: f32,
}

impl Layout {
    pub fn new(rows: usize, cols: usize, cell_size: f32) -> Self {
        Self {
            rows,
            cols,
            cell_size,
        }
    }

    #[inline]
    pub fn field_width(&self) -> f32 {
        self.cols as f32 * self.cell_size
    }

    #[inline]
    pub fn cell_center(&self, col: i32, row: i32) -> Vec2 {
        Vec2::new(
            (col as f32 + 0.5) * self.cell_size,
            (row as f32 + 0.5) * self.cell_size,
        )
    }

    /// Column under a horizontal position, clamped to the grid
    pub fn column_at(&self, x: f32) -> i32 {
        let col = (x / self.cell_size).floor() as i32;
        col.clamp(0, self.cols as i32 - 1)
    }

    /// Launcher position: half a cell below the grid, under the middle column
    pub fn launch_point(&self) -> Vec2 {
        self.cell_center((self.cols / 2) as i32, self.rows as i32)
    }
}
