//! Cluster Shot - a cluster-matching bubble shooter engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, projectile, placement, clusters)
//! - `engine`: Tick driver with injected input/render/lifecycle collaborators
//! - `settings`: Session configuration and difficulty presets
//! - `highscores`: Leaderboard that can listen for game over

pub mod engine;
pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use engine::{Engine, FrameSink, GameOverListener, GameOverReport, InputSource, Snapshot};
pub use error::Error;
pub use highscores::HighScores;
pub use settings::{Difficulty, Settings};

/// Game configuration constants
pub mod consts {
    /// Reference grid dimensions
    pub const DEFAULT_ROWS: usize = 8;
    pub const DEFAULT_COLS: usize = 10;

    /// Edge length of one grid cell in field units
    pub const CELL_SIZE: f32 = 32.0;

    /// Distance travelled by the projectile per tick
    pub const PROJECTILE_SPEED: f32 = 8.0;

    /// Slack subtracted from the contact distance so pieces may overlap slightly
    pub const CONTACT_SLACK: f32 = 2.0;

    /// Aim bounds in degrees (90 = straight up)
    pub const MIN_AIM_DEG: f32 = 30.0;
    pub const MAX_AIM_DEG: f32 = 150.0;
    pub const START_AIM_DEG: f32 = 90.0;
    /// Aim change per tick while a direction is held
    pub const AIM_STEP_DEG: f32 = 2.0;

    /// Smallest group that gets eliminated
    pub const MIN_CLUSTER: usize = 3;

    /// Demo autopilot: ticks spent aiming between shots
    pub const DEMO_FIRE_INTERVAL: u32 = 40;
}

/// Clamp an aim angle (degrees) to the launcher's range
#[inline]
pub fn clamp_aim(angle_deg: f32) -> f32 {
    if angle_deg.is_nan() {
        return consts::START_AIM_DEG;
    }
    angle_deg.clamp(consts::MIN_AIM_DEG, consts::MAX_AIM_DEG)
}

/// Unit direction for an aim angle in field space (y grows downward)
#[inline]
pub fn aim_direction(angle_deg: f32) -> glam::Vec2 {
    let theta = angle_deg.to_radians();
    glam::Vec2::new(theta.cos(), -theta.sin())
}
