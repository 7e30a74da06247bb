//! Cluster elimination
//!
//! Finds maximal 4-connected groups of equal-color pieces with an explicit
//! worklist (no recursion) and clears the ones at or above the threshold.

use serde::{Deserialize, Serialize};

use super::grid::{Color, Grid};

const NEIGHBOURS: [(i32, i32); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

/// A maximal same-color group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    pub color: Color,
    /// Member cells as `(col, row)`, in discovery order
    pub cells: Vec<(i32, i32)>,
}

impl Cluster {
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Every cluster on the grid, seeded in row-major order
pub fn find_clusters(grid: &Grid) -> Vec<Cluster> {
    let cols = grid.cols();
    let mut visited = vec![false; grid.rows() * cols];
    let mut stack: Vec<(i32, i32)> = Vec::new();
    let mut clusters = Vec::new();

    for (col, row, color) in grid.occupied() {
        let seed = row as usize * cols + col as usize;
        if visited[seed] {
            continue;
        }
        visited[seed] = true;
        stack.push((col, row));

        let mut cells = Vec::new();
        while let Some((c, r)) = stack.pop() {
            cells.push((c, r));
            for (dc, dr) in NEIGHBOURS {
                let (nc, nr) = (c + dc, r + dr);
                // Out of range reads as None, which ends the walk there
                if grid.get(nc, nr) != Some(color) {
                    continue;
                }
                let idx = nr as usize * cols + nc as usize;
                if !visited[idx] {
                    visited[idx] = true;
                    stack.push((nc, nr));
                }
            }
        }
        clusters.push(Cluster { color, cells });
    }

    clusters
}

/// Clear every cluster of at least `min_size` pieces and return them
pub fn eliminate(grid: &mut Grid, min_size: usize) -> Vec<Cluster> {
    let removed: Vec<Cluster> = find_clusters(grid)
        .into_iter()
        .filter(|cluster| cluster.len() >= min_size)
        .collect();

    for cluster in &removed {
        for &(col, row) in &cluster.cells {
            grid.clear(col, row);
        }
    }
    removed
}

/// Total pieces across clusters
pub fn removed_count(clusters: &[Cluster]) -> usize {
    clusters.iter().map(Cluster::len).sum()
}
