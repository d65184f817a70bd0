//! Fixed timestep simulation tick
//!
//! Core run loop that advances the simulation deterministically.

use serde::{Deserialize, Serialize};

use super::collision::{Resolution, body_hits_obstacle, resolve};
use super::state::{RunOutcome, RunPhase, SimEvent, SimState};
use crate::config::ScoringMode;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Jump/thrust held (keyboard, pointer and touch merged)
    pub jump: bool,
    /// Start requested this tick (edge-triggered)
    pub start: bool,
}

/// Events produced by one tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub events: Vec<SimEvent>,
}

impl TickReport {
    fn push(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    pub fn has(&self, event: &SimEvent) -> bool {
        self.events.contains(event)
    }
}

/// Advance the run by one step
///
/// `dt` is the step's duration in seconds and drives the countdown and the
/// elapsed-time counter; physics constants are per tick. A zero, negative or
/// non-finite `dt` leaves physics and timers untouched.
pub fn tick(state: &mut SimState, input: &TickInput, dt: f32) -> TickReport {
    let mut report = TickReport::default();
    let dt_ok = dt.is_finite() && dt > 0.0;

    match state.phase {
        RunPhase::Finished => {}
        RunPhase::Initial => {
            if input.start {
                begin_countdown(state, &mut report);
            }
        }
        RunPhase::Countdown { index, remaining } => {
            if dt_ok {
                advance_countdown(state, index, remaining - dt, &mut report);
            }
        }
        RunPhase::Running => {
            if dt_ok {
                step_running(state, input, dt, &mut report);
            }
        }
    }

    report
}

/// Throw the run away and start over with a fresh layout
///
/// Valid from any phase; always lands in `Initial`. The next layout seed is
/// drawn from the current run's RNG, so a sequence of resets is reproducible.
pub fn reset(state: &mut SimState) {
    let seed = state.next_seed();
    reset_with_seed(state, seed);
}

/// Reset with an explicit layout seed
pub fn reset_with_seed(state: &mut SimState, seed: u64) {
    log::info!(
        "Run reset from {} (score {}), new seed {seed}",
        state.phase.as_str(),
        state.score
    );
    state.rebuild(seed);
}

fn begin_countdown(state: &mut SimState, report: &mut TickReport) {
    report.push(SimEvent::CountdownStarted);
    match state.config.countdown.first() {
        Some(first) => {
            log::info!("Countdown started");
            state.phase = RunPhase::Countdown {
                index: 0,
                remaining: first.duration,
            };
            report.push(SimEvent::CountdownPhase { index: 0 });
        }
        None => start_running(state, report),
    }
}

fn advance_countdown(
    state: &mut SimState,
    mut index: usize,
    mut remaining: f32,
    report: &mut TickReport,
) {
    while remaining <= 0.0 {
        index += 1;
        match state.config.countdown.get(index) {
            Some(next) => {
                remaining += next.duration;
                report.push(SimEvent::CountdownPhase { index });
            }
            None => {
                // Leftover countdown time is dropped; the clock starts at zero
                start_running(state, report);
                return;
            }
        }
    }
    state.phase = RunPhase::Countdown { index, remaining };
}

fn start_running(state: &mut SimState, report: &mut TickReport) {
    state.phase = RunPhase::Running;
    state.elapsed = 0.0;
    state.time_ticks = 0;
    report.push(SimEvent::RunStarted);
    log::info!("Run started (seed {})", state.seed);
}

fn finish(state: &mut SimState, outcome: RunOutcome, report: &mut TickReport) {
    state.phase = RunPhase::Finished;
    state.outcome = Some(outcome);
    report.push(SimEvent::Finished { outcome });
    log::info!(
        "Run finished: {:?} after {} ticks, distance {:.0}, score {}",
        outcome,
        state.time_ticks,
        state.distance(),
        state.score
    );
}

fn step_running(state: &mut SimState, input: &TickInput, dt: f32, report: &mut TickReport) {
    // 1. Horizontal speed and scroll
    let scroll = state.body.advance_horizontal(&state.config.player);
    state.obstacles.advance(scroll);

    // 2. Vertical kinematics
    let vertical = state
        .body
        .integrate(&state.config.player, state.config.world.ground_y, input.jump);
    if vertical.jumped {
        report.push(SimEvent::Jumped);
    }
    if vertical.landed {
        report.push(SimEvent::Landed);
    }

    // 3. Frame counters
    state.time_ticks += 1;
    state.body.advance_animation();

    // 4. Obstacles: spawn, flag passed, cull
    if let Some(id) = state.obstacles.spawn_if_due(
        state.time_ticks,
        &state.config.spawn,
        &state.config.world,
        &mut state.rng,
    ) {
        report.push(SimEvent::ObstacleSpawned { id });
    }
    let passed = match state.config.scoring {
        ScoringMode::ObstaclesPassed => state.obstacles.mark_passed(state.config.player.x),
        ScoringMode::Survival => Vec::new(),
    };
    state.obstacles.cull();

    // 5. Collisions
    let offset = state.obstacles.offset();
    let insets = state.config.player.insets;
    let policy = state.config.collision;
    let mut crashed_into = None;
    for obstacle in state.obstacles.iter_mut() {
        if !body_hits_obstacle(&state.body, insets, obstacle, offset) {
            continue;
        }
        match resolve(policy, &mut state.body, obstacle) {
            Resolution::Fatal => {
                crashed_into = Some(obstacle.id);
                break;
            }
            Resolution::Penalized | Resolution::Marked => {
                log::debug!("Struck obstacle {}", obstacle.id);
                report.push(SimEvent::ObstacleStruck { id: obstacle.id });
            }
            Resolution::Ignored => {}
        }
    }

    // 6. Finish condition
    if let Some(id) = crashed_into {
        report.push(SimEvent::Crashed { id });
        finish(state, RunOutcome::Crashed, report);
    } else if state
        .config
        .world
        .track
        .distance()
        .is_some_and(|distance| state.distance() > distance)
    {
        finish(state, RunOutcome::Completed, report);
    }

    // 7. Score and time
    state.elapsed += dt;
    match state.config.scoring {
        ScoringMode::Survival => state.score += 1,
        ScoringMode::ObstaclesPassed => {
            state.score += passed.len() as u64;
            for id in passed {
                report.push(SimEvent::ObstacleScored { id });
            }
        }
    }
}
