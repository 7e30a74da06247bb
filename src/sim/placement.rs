//! Placement resolution
//!
//! Decides when the moving projectile becomes a settled piece and which
//! cell it lands in. Two triggers end flight: touching a settled piece, or
//! the projectile's top edge crossing the ceiling line.

use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::layout::Layout;
use super::projectile::Projectile;

/// What to do when no empty cell can take the projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FullRowPolicy {
    /// Force-write over the targeted cell (loses one settled piece)
    #[default]
    Overwrite,
    /// End the session instead of overwriting
    GameOverOnFull,
}

/// Condition that ended the flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    Ceiling,
    /// Contact with the settled piece at `(col, row)`
    Collision { col: i32, row: i32 },
}

/// Where the projectile settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub col: i32,
    pub row: i32,
    pub trigger: Trigger,
    /// The cell already held a piece that was replaced
    pub overwrote: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Placed(Placement),
    /// No empty candidate and the policy forbids overwriting
    BoardFull { col: i32, row: i32 },
}

/// Check both triggers. Contact with a settled piece wins over the ceiling.
pub fn check_trigger(
    grid: &Grid,
    layout: &Layout,
    projectile: &Projectile,
    contact_slack: f32,
) -> Option<Trigger> {
    let reach = 2.0 * projectile.radius - contact_slack;
    let reach_sq = reach * reach;

    let mut nearest: Option<(f32, i32, i32)> = None;
    for (col, row, _) in grid.occupied() {
        let dist_sq = projectile.pos.distance_squared(layout.cell_center(col, row));
        if dist_sq < reach_sq && nearest.is_none_or(|(best, _, _)| dist_sq < best) {
            nearest = Some((dist_sq, col, row));
        }
    }

    if let Some((_, col, row)) = nearest {
        return Some(Trigger::Collision { col, row });
    }
    if projectile.top() <= 0.0 {
        return Some(Trigger::Ceiling);
    }
    None
}

/// Pick the landing cell for a trigger and write the projectile's color
pub fn resolve(
    grid: &mut Grid,
    layout: &Layout,
    projectile: &Projectile,
    trigger: Trigger,
    policy: FullRowPolicy,
) -> Resolution {
    let (target, candidate) = match trigger {
        Trigger::Ceiling => {
            let col = layout.column_at(projectile.pos.x);
            ((col, 0), ceiling_cell(grid, col))
        }
        Trigger::Collision { col, row } => {
            ((col, row), neighbour_cell(grid, layout, projectile, col, row))
        }
    };

    let (col, row, overwrote) = match candidate {
        Some((col, row)) => (col, row, false),
        None => match policy {
            FullRowPolicy::Overwrite => {
                log::warn!(
                    "No free cell near ({}, {}), overwriting settled piece",
                    target.0,
                    target.1
                );
                (target.0, target.1, true)
            }
            FullRowPolicy::GameOverOnFull => {
                return Resolution::BoardFull {
                    col: target.0,
                    row: target.1,
                };
            }
        },
    };

    grid.set(col, row, projectile.color);
    Resolution::Placed(Placement {
        col,
        row,
        trigger,
        overwrote,
    })
}

/// Nearest empty ceiling cell, searching right then left at growing offsets
fn ceiling_cell(grid: &Grid, col: i32) -> Option<(i32, i32)> {
    if grid.is_empty(col, 0) {
        return Some((col, 0));
    }
    (1..grid.cols() as i32)
        .flat_map(|offset| [col + offset, col - offset])
        .find(|&c| grid.is_empty(c, 0))
        .map(|c| (c, 0))
}

/// Empty neighbour of the struck cell on the side the projectile came from
fn neighbour_cell(
    grid: &Grid,
    layout: &Layout,
    projectile: &Projectile,
    col: i32,
    row: i32,
) -> Option<(i32, i32)> {
    let delta = (projectile.pos - layout.cell_center(col, row)) / layout.cell_size;
    let sx = unit_step(delta.x);
    let sy = unit_step(delta.y);

    // Direct overlap: up, left, right
    const OVERLAP: [(i32, i32); 3] = [(0, -1), (-1, 0), (1, 0)];
    // Below, left, right, up
    const FALLBACK: [(i32, i32); 4] = [(0, 1), (-1, 0), (1, 0), (0, -1)];

    let offset = [(sx, sy)];
    let preferred: &[(i32, i32)] = if sx == 0 && sy == 0 { &OVERLAP } else { &offset };

    preferred
        .iter()
        .chain(FALLBACK.iter())
        .map(|&(dc, dr)| (col + dc, row + dr))
        .find(|&(c, r)| grid.is_empty(c, r))
}

#[inline]
fn unit_step(cells: f32) -> i32 {
    (cells.round() as i32).clamp(-1, 1)
}
