//! Run state and core simulation types
//!
//! Everything needed to reproduce a run lives in `SimState`: configuration,
//! seeded RNG, body, obstacles and counters. The host owns the value and
//! hands it to `tick`/`reset`; nothing here is global.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::obstacle::ObstacleField;
use crate::config::{ConfigError, RunConfig, Track};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Waiting for a start input
    Initial,
    /// Display-only countdown; no physics
    Countdown {
        /// Index into the configured countdown phases
        index: usize,
        /// Seconds left in the current phase
        remaining: f32,
    },
    /// Full tick loop active
    Running,
    /// Terminal until reset
    Finished,
}

impl RunPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunPhase::Initial => "initial",
            RunPhase::Countdown { .. } => "countdown",
            RunPhase::Running => "running",
            RunPhase::Finished => "finished",
        }
    }
}

/// How a finished run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Fatal collision
    Crashed,
    /// Crossed the finish line
    Completed,
}

/// Things that happened during a tick, for sounds and effects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    CountdownStarted,
    /// A countdown phase became active
    CountdownPhase { index: usize },
    RunStarted,
    Jumped,
    Landed,
    ObstacleSpawned { id: u32 },
    ObstacleScored { id: u32 },
    ObstacleStruck { id: u32 },
    Crashed { id: u32 },
    Finished { outcome: RunOutcome },
}

/// Complete run state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimState {
    /// Validated configuration this run was built from
    pub config: RunConfig,
    /// Seed of the current run's layout
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: RunPhase,
    pub outcome: Option<RunOutcome>,
    pub body: Body,
    pub obstacles: ObstacleField,
    pub score: u64,
    /// Seconds spent running (starts at zero when the countdown ends)
    pub elapsed: f32,
    /// Running ticks since the countdown ended
    pub time_ticks: u64,
}

impl SimState {
    /// Validate the config and build a fresh run
    pub fn new(config: RunConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, seed))
    }

    fn build(config: RunConfig, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let body = Body::new(&config.player, config.world.ground_y);
        let obstacles = ObstacleField::for_policy(&config.spawn, &config.world, &mut rng);
        Self {
            config,
            seed,
            rng,
            phase: RunPhase::Initial,
            outcome: None,
            body,
            obstacles,
            score: 0,
            elapsed: 0.0,
            time_ticks: 0,
        }
    }

    /// Rebuild everything from the same config with a new layout seed
    pub(crate) fn rebuild(&mut self, seed: u64) {
        let config = self.config.clone();
        *self = Self::build(config, seed);
    }

    /// Draw the seed for the next run from this run's RNG
    pub(crate) fn next_seed(&mut self) -> u64 {
        self.rng.random()
    }

    /// Total distance scrolled
    #[inline]
    pub fn world_offset(&self) -> f32 {
        self.obstacles.offset()
    }

    /// Distance covered by the player's fixed column
    #[inline]
    pub fn distance(&self) -> f32 {
        self.world_offset() + self.config.player.x
    }

    /// Course completion in [0, 1]; `None` for endless tracks
    pub fn progress(&self) -> Option<f32> {
        match self.config.world.track {
            Track::Endless => None,
            Track::Finite { distance } => Some((self.distance() / distance).clamp(0.0, 1.0)),
        }
    }

    /// Label of the active countdown phase
    pub fn countdown_label(&self) -> Option<&str> {
        match self.phase {
            RunPhase::Countdown { index, .. } => {
                self.config.countdown.get(index).map(|p| p.label.as_str())
            }
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == RunPhase::Finished
    }
}
