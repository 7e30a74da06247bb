//! Game state and core simulation types
//!
//! Everything a session needs to replay deterministically lives here.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::cluster::Cluster;
use super::grid::{Color, Grid};
use super::layout::Layout;
use super::placement::Placement;
use super::projectile::{Projectile, Wall};
use crate::clamp_aim;
use crate::consts::START_AIM_DEG;
use crate::settings::Settings;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Aiming, projectile resting in the launcher
    Ready,
    /// Projectile in flight
    Firing,
    /// Projectile just settled, clusters not yet resolved
    Placed,
    /// Bottom row reached (terminal)
    GameOver,
}

/// Something collaborators may want to react to (sounds, effects, UI)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Fired { angle_deg: f32, color: Color },
    Bounced { wall: Wall },
    Placed(Placement),
    ClusterCleared(Cluster),
    /// No free cell and overwriting is disabled
    BoardFull { col: i32, row: i32 },
    GameOver { score: u64 },
}

/// Autopilot state for demo sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoPilot {
    /// Currently rotating toward the left bound
    pub sweeping_left: bool,
    /// Ticks spent in `Ready` since the last shot
    pub ready_ticks: u32,
}

impl Default for DemoPilot {
    fn default() -> Self {
        Self {
            sweeping_left: true,
            ready_ticks: 0,
        }
    }
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Session configuration, fixed once play starts
    pub settings: Settings,
    pub layout: Layout,
    pub grid: Grid,
    /// The single live projectile (resting in the launcher while `Ready`)
    pub projectile: Projectile,
    /// Aim angle in degrees, always within the launcher range
    pub aim_deg: f32,
    pub phase: GamePhase,
    pub score: u64,
    /// Projectiles launched this session
    pub shots: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Present when the autopilot drives the session
    pub demo: Option<DemoPilot>,
    /// Events raised during the latest tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new player-driven session
    pub fn new(settings: Settings, seed: u64) -> Self {
        let layout = settings.layout();
        let launch = layout.launch_point();
        let radius = settings.projectile_radius;
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            grid: Grid::new(settings.rows, settings.cols),
            settings,
            layout,
            projectile: Projectile::loaded(launch, Color(0), radius),
            aim_deg: START_AIM_DEG,
            phase: GamePhase::Ready,
            score: 0,
            shots: 0,
            time_ticks: 0,
            demo: None,
            events: Vec::new(),
        };

        state.spawn_projectile();
        state
    }

    /// Create a session driven by the autopilot
    pub fn new_demo(settings: Settings, seed: u64) -> Self {
        let mut state = Self::new(settings, seed);
        state.demo = Some(DemoPilot::default());
        state
    }

    #[inline]
    pub fn is_demo(&self) -> bool {
        self.demo.is_some()
    }

    /// Load a fresh projectile of random palette color into the launcher
    pub fn spawn_projectile(&mut self) {
        let colors = self.settings.palette.len().max(1);
        let color = Color(self.rng.random_range(0..colors) as u8);
        self.projectile = Projectile::loaded(
            self.layout.launch_point(),
            color,
            self.settings.projectile_radius,
        );
    }

    /// Set the aim, clamped to the launcher range
    pub fn set_aim(&mut self, angle_deg: f32) {
        self.aim_deg = clamp_aim(angle_deg);
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_ready() {
        let state = GameState::new(Settings::default(), 7);
        assert_eq!(state.phase, GamePhase::Ready);
        assert_eq!(state.score, 0);
        assert_eq!(state.grid.piece_count(), 0);
        assert_eq!(state.aim_deg, 90.0);
        assert!(!state.projectile.is_moving());
        assert_eq!(state.projectile.pos, state.layout.launch_point());
        assert!((state.projectile.color.0 as usize) < state.settings.palette.len());
    }

    #[test]
    fn test_same_seed_same_colors() {
        let mut a = GameState::new(Settings::default(), 42);
        let mut b = GameState::new(Settings::default(), 42);
        for _ in 0..20 {
            assert_eq!(a.projectile.color, b.projectile.color);
            a.spawn_projectile();
            b.spawn_projectile();
        }
    }

    #[test]
    fn test_aim_is_clamped() {
        let mut state = GameState::new(Settings::default(), 1);
        state.set_aim(10.0);
        assert_eq!(state.aim_deg, 30.0);
        state.set_aim(200.0);
        assert_eq!(state.aim_deg, 150.0);
        state.set_aim(f32::NAN);
        assert_eq!(state.aim_deg, 90.0);
    }

    #[test]
    fn test_state_serializes_without_events() {
        let mut state = GameState::new_demo(Settings::default(), 3);
        state.push_event(GameEvent::GameOver { score: 1 });
        let json = serde_json::to_string(&state).expect("serialize");
        let restored: GameState = serde_json::from_str(&json).expect("deserialize");
        assert!(restored.events.is_empty());
        assert!(restored.is_demo());
        assert_eq!(restored.projectile, state.projectile);
    }
}
