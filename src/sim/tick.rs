//! Fixed-step simulation tick
//!
//! One call advances the session by one logical frame:
//! `Ready -(fire)-> Firing -(trigger)-> Placed -(clusters)-> Ready | GameOver`.

use serde::{Deserialize, Serialize};

use super::cluster::{eliminate, removed_count};
use super::placement::{Resolution, check_trigger, resolve};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::{MAX_AIM_DEG, MIN_AIM_DEG};

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Rotate the launcher toward the left wall
    pub aim_left: bool,
    /// Rotate the launcher toward the right wall
    pub aim_right: bool,
    /// Launch the loaded projectile
    pub fire: bool,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    if state.phase == GamePhase::GameOver {
        return;
    }

    state.time_ticks += 1;

    // Demo sessions ignore the collaborator's input entirely
    let input = if state.is_demo() {
        demo_input(state)
    } else {
        *input
    };

    match state.phase {
        GamePhase::Ready => {
            let step = state.settings.aim_step_deg;
            let mut aim = state.aim_deg;
            if input.aim_left {
                aim += step;
            }
            if input.aim_right {
                aim -= step;
            }
            state.set_aim(aim);

            if input.fire {
                fire(state);
            }
        }
        GamePhase::Firing => advance_projectile(state),
        GamePhase::Placed | GamePhase::GameOver => {}
    }

    if state.phase == GamePhase::Placed {
        settle(state);
    }
}

/// Launch the loaded projectile along the current aim
pub fn fire(state: &mut GameState) {
    if state.phase != GamePhase::Ready {
        return;
    }
    let speed = state.settings.projectile_speed;
    state.projectile.launch(state.aim_deg, speed);
    state.shots += 1;
    state.phase = GamePhase::Firing;
    state.push_event(GameEvent::Fired {
        angle_deg: state.aim_deg,
        color: state.projectile.color,
    });
}

/// Move the projectile one step and resolve any placement trigger
///
/// Leaves the state in `Placed` (or `GameOver` when the board is full and
/// overwriting is disabled) as soon as a trigger fires.
pub fn advance_projectile(state: &mut GameState) {
    if state.phase != GamePhase::Firing {
        return;
    }

    if let Some(wall) = state.projectile.step(state.layout.field_width()) {
        state.push_event(GameEvent::Bounced { wall });
    }

    let Some(trigger) = check_trigger(
        &state.grid,
        &state.layout,
        &state.projectile,
        state.settings.contact_slack,
    ) else {
        return;
    };

    match resolve(
        &mut state.grid,
        &state.layout,
        &state.projectile,
        trigger,
        state.settings.full_row_policy,
    ) {
        Resolution::Placed(placement) => {
            log::debug!(
                "Placed {:?} at ({}, {}) via {:?}",
                state.projectile.color,
                placement.col,
                placement.row,
                placement.trigger
            );
            state.phase = GamePhase::Placed;
            state.push_event(GameEvent::Placed(placement));
        }
        Resolution::BoardFull { col, row } => {
            log::info!("Board full at ({}, {}), ending session", col, row);
            state.push_event(GameEvent::BoardFull { col, row });
            end_session(state);
        }
    }
}

/// Resolve clusters after a placement, then check for game over
pub fn settle(state: &mut GameState) {
    if state.phase != GamePhase::Placed {
        return;
    }

    let removed = eliminate(&mut state.grid, state.settings.min_cluster);
    let count = removed_count(&removed);
    if count > 0 {
        state.score += count as u64;
        log::debug!(
            "Cleared {} cluster(s), {} pieces, score {}",
            removed.len(),
            count,
            state.score
        );
    }
    for cluster in removed {
        state.push_event(GameEvent::ClusterCleared(cluster));
    }

    if !state.grid.row_is_empty(state.grid.bottom_row()) {
        end_session(state);
        return;
    }

    state.spawn_projectile();
    state.phase = GamePhase::Ready;
}

fn end_session(state: &mut GameState) {
    state.phase = GamePhase::GameOver;
    state.push_event(GameEvent::GameOver { score: state.score });
    log::info!(
        "Game over: score {} after {} shots ({} ticks)",
        state.score,
        state.shots,
        state.time_ticks
    );
}

/// Autopilot: sweep the aim back and forth and fire on a fixed cadence
fn demo_input(state: &mut GameState) -> TickInput {
    if state.phase != GamePhase::Ready {
        return TickInput::default();
    }
    let aim = state.aim_deg;
    let interval = state.settings.demo_fire_interval;
    let Some(pilot) = state.demo.as_mut() else {
        return TickInput::default();
    };

    if aim >= MAX_AIM_DEG {
        pilot.sweeping_left = false;
    } else if aim <= MIN_AIM_DEG {
        pilot.sweeping_left = true;
    }

    pilot.ready_ticks += 1;
    let fire = pilot.ready_ticks >= interval;
    if fire {
        pilot.ready_ticks = 0;
    }

    TickInput {
        aim_left: pilot.sweeping_left,
        aim_right: !pilot.sweeping_left,
        fire,
    }
}
