//! Engine facade
//!
//! Owns one session and drives it one tick at a time. The host supplies
//! its collaborators at construction: where input comes from, where frames
//! go, and who hears about the end of a session. Nothing here draws, polls
//! devices or touches storage.

use glam::Vec2;
use serde::Serialize;

use crate::error::Result;
use crate::settings::Settings;
use crate::sim::{Color, GameEvent, GamePhase, GameState, Grid, Projectile, TickInput, tick};

/// Supplies the input for the next tick
pub trait InputSource {
    fn poll(&mut self) -> TickInput;
}

/// Receives a read-only view after every tick
pub trait FrameSink {
    fn present(&mut self, snapshot: &Snapshot, events: &[GameEvent]);
}

/// Told once when a player session ends
pub trait GameOverListener {
    fn game_over(&mut self, report: &GameOverReport);
}

impl InputSource for () {
    fn poll(&mut self) -> TickInput {
        TickInput::default()
    }
}

impl FrameSink for () {
    fn present(&mut self, _snapshot: &Snapshot, _events: &[GameEvent]) {}
}

impl GameOverListener for () {
    fn game_over(&mut self, _report: &GameOverReport) {}
}

/// Final numbers of a finished session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameOverReport {
    pub score: u64,
    pub shots: u32,
    pub ticks: u64,
    pub seed: u64,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub rows: usize,
    pub cols: usize,
    pub cell_size: f32,
    /// Row-major cells, `None` for empty
    pub cells: Vec<Option<Color>>,
    pub palette: Vec<u32>,
    pub projectile_pos: Vec2,
    pub projectile_color: Color,
    pub projectile_radius: f32,
    pub aim_deg: f32,
    pub score: u64,
    pub phase: GamePhase,
    pub demo: bool,
}

impl Snapshot {
    fn capture(state: &GameState) -> Self {
        Self {
            rows: state.grid.rows(),
            cols: state.grid.cols(),
            cell_size: state.layout.cell_size,
            cells: state.grid.row_slices().flatten().copied().collect(),
            palette: state.settings.palette.clone(),
            projectile_pos: state.projectile.pos,
            projectile_color: state.projectile.color,
            projectile_radius: state.projectile.radius,
            aim_deg: state.aim_deg,
            score: state.score,
            phase: state.phase,
            demo: state.is_demo(),
        }
    }

    /// Text rendering of the board, one line per row
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.cols + 1) * self.rows);
        for row in self.cells.chunks(self.cols.max(1)) {
            for cell in row {
                out.push(match cell {
                    Some(Color(c)) => char::from_digit(u32::from(*c) % 36, 36).unwrap_or('#'),
                    None => '.',
                });
            }
            out.push('\n');
        }
        out
    }
}

pub struct Engine<I = (), S = (), L = ()> {
    settings: Settings,
    state: GameState,
    input: I,
    sink: S,
    listener: L,
    reported: bool,
}

impl<I: InputSource, S: FrameSink, L: GameOverListener> Engine<I, S, L> {
    /// Build an engine with a ready player session; fails if the settings
    /// cannot drive a session
    pub fn new(settings: Settings, input: I, sink: S, listener: L) -> Result<Self> {
        settings.validate()?;
        let state = GameState::new(settings.clone(), next_seed(&settings));
        Ok(Self {
            settings,
            state,
            input,
            sink,
            listener,
            reported: false,
        })
    }

    /// Start a fresh player session
    pub fn start(&mut self) {
        let seed = next_seed(&self.settings);
        self.state = GameState::new(self.settings.clone(), seed);
        self.reported = false;
        log::info!(
            "Session started ({} {}x{}, seed {})",
            self.settings.difficulty.as_str(),
            self.settings.rows,
            self.settings.cols,
            seed
        );
    }

    /// Start an autopilot session; it never reports a score
    pub fn start_demo(&mut self) {
        let seed = next_seed(&self.settings);
        self.state = GameState::new_demo(self.settings.clone(), seed);
        self.reported = false;
        log::info!("Demo session started (seed {})", seed);
    }

    /// Advance one tick with explicit input, then present the frame
    pub fn tick(&mut self, input: &TickInput) {
        if self.state.phase == GamePhase::GameOver {
            return;
        }

        tick(&mut self.state, input);

        if self.state.phase == GamePhase::GameOver && !self.reported {
            self.reported = true;
            if !self.state.is_demo() {
                let report = self.report();
                self.listener.game_over(&report);
            }
        }

        let snapshot = self.snapshot();
        self.sink.present(&snapshot, &self.state.events);
    }

    /// Poll the injected input source and tick
    pub fn frame(&mut self) {
        let input = self.input.poll();
        self.tick(&input);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }

    pub fn report(&self) -> GameOverReport {
        GameOverReport {
            score: self.state.score,
            shots: self.state.shots,
            ticks: self.state.time_ticks,
            seed: self.state.seed,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.state.grid
    }

    pub fn projectile(&self) -> &Projectile {
        &self.state.projectile
    }

    pub fn aim_degrees(&self) -> f32 {
        self.state.aim_deg
    }

    pub fn score(&self) -> u64 {
        self.state.score
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_over(&self) -> bool {
        self.state.phase == GamePhase::GameOver
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Hand back the collaborators
    pub fn into_parts(self) -> (I, S, L) {
        (self.input, self.sink, self.listener)
    }
}

/// Configured seed, or a fresh random one
fn next_seed(settings: &Settings) -> u64 {
    settings.seed.unwrap_or_else(rand::random)
}
