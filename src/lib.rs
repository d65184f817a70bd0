//! Dash Run - simulation core for jump-and-dodge runner games
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, obstacles, collisions, run state)
//! - `config`: Data-driven run configuration and variant presets
//! - `view`: Read-only frame snapshot and host collaborator traits
//! - `driver`: Fixed timestep frame driver gluing host, simulation and renderer

pub mod config;
pub mod driver;
pub mod sim;
pub mod view;

pub use config::{ConfigError, RunConfig, Variant};
pub use driver::FrameDriver;
pub use view::{FrameView, InputSource, PolledInput, Renderer};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;
    /// Longest frame delta the driver will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// View dimensions (canvas pixels)
    pub const VIEW_WIDTH: f32 = 800.0;
    /// Floor line - bodies and grounded obstacles rest on it
    pub const GROUND_Y: f32 = 400.0;

    /// Player defaults - fixed screen column, everything else scrolls past
    pub const PLAYER_X: f32 = 50.0;
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 50.0;

    /// Vertical physics, in pixels per tick
    pub const GRAVITY: f32 = 0.6;
    pub const JUMP_FORCE: f32 = 12.0;
    /// Terminal fall speed (keeps thin obstacles from being tunneled)
    pub const MAX_FALL_SPEED: f32 = 20.0;
    /// Held-jump thrust cap above the take-off point
    pub const MAX_JUMP_HEIGHT: f32 = 120.0;

    /// Scroll speed, in pixels per tick
    pub const RUN_SPEED: f32 = 5.0;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 30.0;
    pub const OBSTACLE_MIN_HEIGHT: f32 = 50.0;
    pub const OBSTACLE_MAX_HEIGHT: f32 = 150.0;
    /// Frames between interval spawns
    pub const SPAWN_INTERVAL_FRAMES: u32 = 120;

    /// Grounded ticks per run-cycle animation frame
    pub const RUN_ANIM_TICKS: u64 = 8;
    /// Frames in the run-cycle animation
    pub const RUN_ANIM_FRAMES: u32 = 2;
}
