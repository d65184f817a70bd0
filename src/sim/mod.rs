//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per `tick` call
//! - Seeded RNG only
//! - Stable iteration order (by spawn order)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod obstacle;
pub mod state;
pub mod tick;

pub use body::{Body, VerticalStep};
pub use collision::{Aabb, Resolution, body_hits_obstacle, overlaps};
pub use obstacle::{Obstacle, ObstacleField, course_layout};
pub use state::{RunOutcome, RunPhase, SimEvent, SimState};
pub use tick::{TickInput, TickReport, reset, reset_with_seed, tick};
