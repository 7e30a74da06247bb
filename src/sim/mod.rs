//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One logical step per tick, no wall clock
//! - Seeded RNG only
//! - Stable iteration order (row-major over the grid)
//! - No rendering or platform dependencies

pub mod cluster;
pub mod grid;
pub mod layout;
pub mod placement;
pub mod projectile;
pub mod state;
pub mod tick;

pub use cluster::{Cluster, eliminate, find_clusters};
pub use grid::{Color, Grid};
pub use layout::Layout;
pub use placement::{FullRowPolicy, Placement, Resolution, Trigger, check_trigger, resolve};
pub use projectile::{Projectile, Wall, reflect_velocity};
pub use state::{DemoPilot, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
