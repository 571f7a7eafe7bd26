//! Frame tick
//!
//! The host calls `tick` once per display frame with the current timestamp.
//! Movement is per tick; timers and animations use the elapsed milliseconds.

use super::state::{GameEvent, GameState, Screen};
use super::{behavior, collision, effects, player, progression};
use crate::highscores::RunSummary;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Fire pressed this tick (edge, not held)
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Restart; honored while paused, after game over or after victory
    pub reset: bool,
    /// Start a run from the title screen
    pub start: bool,
    /// Show the run history from the title screen
    pub open_history: bool,
    /// Back to the title screen from the run history
    pub close_history: bool,
}

/// Advance the game by one frame at host time `now_ms`
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: f64) {
    state.events.clear();
    let dt_ms = frame_delta(state, now_ms);

    match state.screen {
        Screen::Start => {
            if input.start {
                state.start_run();
                state.last_frame_ms = Some(now_ms);
            } else if input.open_history {
                state.screen = Screen::History;
            }
            return;
        }
        Screen::History => {
            if input.close_history {
                state.screen = Screen::Start;
            }
            return;
        }
        Screen::Playing => {}
    }

    if input.reset && (state.paused || state.game_over || state.victory) {
        state.reset();
        state.last_frame_ms = Some(now_ms);
        return;
    }

    if input.pause && !state.game_over {
        state.paused = !state.paused;
        log::debug!("Paused: {}", state.paused);
    }

    if state.is_simulating() {
        step(state, input, dt_ms);
    }
    record_finished_run(state);
}

/// Elapsed time since the previous tick. Zero right after a reset.
fn frame_delta(state: &mut GameState, now_ms: f64) -> f32 {
    let dt = match state.last_frame_ms {
        Some(last) => (now_ms - last).max(0.0),
        None => 0.0,
    };
    state.last_frame_ms = Some(now_ms);
    dt as f32
}

/// One simulation step, in fixed order
fn step(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    state.time_ms += f64::from(dt_ms);

    state.sync_sprites();
    if let Some(scene) = state.scenes.advance(dt_ms) {
        state.events.push(GameEvent::SceneChanged { scene });
    }

    player::apply_input(state, input, dt_ms);
    player::advance_bullets(state);
    effects::update_power_ups(state, dt_ms);

    collision::resolve_player_bullets(state);
    progression::advance_if_cleared(state);
    collision::resolve_enemy_bullets(state);

    behavior::update_enemies(state, dt_ms);
    effects::update_explosions(state, dt_ms);
    effects::update_shield_impact(state, dt_ms);
}

/// Emit the run summary once per run when it ends
fn record_finished_run(state: &mut GameState) {
    if state.run_recorded || !(state.game_over || state.victory) {
        return;
    }
    state.run_recorded = true;
    let summary = RunSummary::new(state.score, state.highest_phase, (state.wall_clock)());
    log::info!(
        "Run finished: score {} phase {}",
        summary.score,
        summary.phase
    );
    state.events.push(GameEvent::RunFinished(summary));
}
