//! Run configuration and variant presets
//!
//! Every runner variant is the same simulation with different knobs. A
//! `RunConfig` is validated once, when a `SimState` is built from it, so the
//! tick loop never has to second-guess its inputs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected configuration values
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must be a positive finite number, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must be a non-negative finite number, got {value}")]
    Negative { field: &'static str, value: f32 },
    #[error("{field} range is inverted: {min} > {max}")]
    InvertedRange {
        field: &'static str,
        min: f32,
        max: f32,
    },
    #[error("course obstacle count must be at least 1")]
    EmptyCourse,
    #[error("course spawn policy requires a finite track")]
    CourseOnEndlessTrack,
    #[error("course ends at {end_pos}, beyond the finish line at {distance}")]
    CoursePastFinish { end_pos: f32, distance: f32 },
    #[error("hitbox insets {horizontal}x{vertical} leave no collision area")]
    HitboxCollapsed { horizontal: f32, vertical: f32 },
    #[error("player does not fit above the ground line at {ground_y}")]
    PlayerBelowGround { ground_y: f32 },
    #[error("penalty speed multiplier must be within [0, 1], got {0}")]
    PenaltyMultiplier(f32),
    #[error("countdown phase {index} ({label:?}) has invalid duration {duration}")]
    CountdownDuration {
        index: usize,
        label: String,
        duration: f32,
    },
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn ordered(field: &'static str, min: f32, max: f32) -> Result<(), ConfigError> {
    if min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvertedRange { field, min, max })
    }
}

/// How jump input turns into vertical velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JumpMode {
    /// Single velocity kick at take-off
    #[default]
    Impulse,
    /// Continuous thrust while held, up to `max_jump_height`
    Held,
}

/// Gravity applied per tick, depending on whether jump is held
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GravityProfile {
    /// Gravity while the jump input is held
    pub gravity: f32,
    /// Gravity once the jump input is released
    pub fast_fall_gravity: f32,
}

impl GravityProfile {
    /// Same pull regardless of input
    pub fn uniform(gravity: f32) -> Self {
        Self {
            gravity,
            fast_fall_gravity: gravity,
        }
    }

    /// Gravity for this tick
    #[inline]
    pub fn for_input(&self, jump_held: bool) -> f32 {
        if jump_held {
            self.gravity
        } else {
            self.fast_fall_gravity
        }
    }
}

impl Default for GravityProfile {
    fn default() -> Self {
        Self::uniform(GRAVITY)
    }
}

/// Inward shrink applied to each side of the player's collision box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HitboxInsets {
    /// Removed from the left and from the right edge
    pub horizontal: f32,
    /// Removed from the top and from the bottom edge
    pub vertical: f32,
}

/// Player geometry and movement tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Fixed screen x of the player's left edge
    pub x: f32,
    pub width: f32,
    pub height: f32,
    pub insets: HitboxInsets,
    pub jump_mode: JumpMode,
    /// Upward speed set by a jump (pixels per tick)
    pub jump_force: f32,
    /// Held-jump thrust cap above the take-off point
    pub max_jump_height: f32,
    pub gravity: GravityProfile,
    pub max_fall_speed: f32,
    /// Horizontal speed at the start of a run
    pub initial_speed: f32,
    pub max_speed: f32,
    /// Grounded speed gain per tick
    pub acceleration: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            x: PLAYER_X,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            insets: HitboxInsets::default(),
            jump_mode: JumpMode::Impulse,
            jump_force: JUMP_FORCE,
            max_jump_height: MAX_JUMP_HEIGHT,
            gravity: GravityProfile::default(),
            max_fall_speed: MAX_FALL_SPEED,
            initial_speed: RUN_SPEED,
            max_speed: RUN_SPEED,
            acceleration: 0.0,
        }
    }
}

/// Finite race or endless survival
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Track {
    #[default]
    Endless,
    Finite {
        /// Finish line, measured from the start of the world
        distance: f32,
    },
}

impl Track {
    pub fn distance(&self) -> Option<f32> {
        match self {
            Track::Endless => None,
            Track::Finite { distance } => Some(*distance),
        }
    }
}

/// World geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Floor line (y grows downward)
    pub ground_y: f32,
    /// Visible window width; interval spawns appear at its right edge
    pub view_width: f32,
    pub track: Track,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            ground_y: GROUND_Y,
            view_width: VIEW_WIDTH,
            track: Track::Endless,
        }
    }
}

/// Size range for spawned obstacles; all obstacles rest on the ground
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleShape {
    pub width: f32,
    pub min_height: f32,
    pub max_height: f32,
}

impl Default for ObstacleShape {
    fn default() -> Self {
        Self {
            width: OBSTACLE_WIDTH,
            min_height: OBSTACLE_MIN_HEIGHT,
            max_height: OBSTACLE_MAX_HEIGHT,
        }
    }
}

impl ObstacleShape {
    fn validate(&self) -> Result<(), ConfigError> {
        positive("obstacle width", self.width)?;
        positive("obstacle min_height", self.min_height)?;
        positive("obstacle max_height", self.max_height)?;
        ordered("obstacle height", self.min_height, self.max_height)
    }
}

/// Where obstacles come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpawnPolicy {
    /// Empty world
    None,
    /// Unbounded stream, one obstacle every `min..=max` frames
    Interval {
        min_gap_frames: u32,
        max_gap_frames: u32,
        shape: ObstacleShape,
    },
    /// Fixed layout generated at reset, spanning `start_pos..=end_pos`
    Course {
        count: u32,
        start_pos: f32,
        end_pos: f32,
        min_gap: f32,
        max_gap: f32,
        shape: ObstacleShape,
    },
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        SpawnPolicy::Interval {
            min_gap_frames: SPAWN_INTERVAL_FRAMES,
            max_gap_frames: SPAWN_INTERVAL_FRAMES,
            shape: ObstacleShape::default(),
        }
    }
}

/// What touching an obstacle does
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Run ends immediately
    #[default]
    Fatal,
    /// Speed cut plus optional upward bounce, once per obstacle
    Penalty { speed_multiplier: f32, bounce: f32 },
    /// No physical effect
    ScoringOnly,
}

/// How score accumulates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMode {
    /// One point per running tick
    Survival,
    /// One point per obstacle that scrolls past the player
    #[default]
    ObstaclesPassed,
}

/// One step of the pre-run countdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountdownPhase {
    /// Text shown while the phase is active
    pub label: String,
    /// Seconds
    pub duration: f32,
}

impl CountdownPhase {
    pub fn new(label: impl Into<String>, duration: f32) -> Self {
        Self {
            label: label.into(),
            duration,
        }
    }

    /// Classic "3, 2, 1" with one second per number
    pub fn three_two_one() -> Vec<Self> {
        vec![Self::new("3", 1.0), Self::new("2", 1.0), Self::new("1", 1.0)]
    }
}

/// Complete configuration for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub player: PlayerConfig,
    pub world: WorldConfig,
    pub spawn: SpawnPolicy,
    pub collision: CollisionPolicy,
    pub scoring: ScoringMode,
    pub countdown: Vec<CountdownPhase>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Variant::Classic.config()
    }
}

impl RunConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.player;
        non_negative("player x", p.x)?;
        positive("player width", p.width)?;
        positive("player height", p.height)?;
        non_negative("hitbox horizontal inset", p.insets.horizontal)?;
        non_negative("hitbox vertical inset", p.insets.vertical)?;
        if p.insets.horizontal * 2.0 >= p.width || p.insets.vertical * 2.0 >= p.height {
            return Err(ConfigError::HitboxCollapsed {
                horizontal: p.insets.horizontal,
                vertical: p.insets.vertical,
            });
        }
        positive("jump force", p.jump_force)?;
        if p.jump_mode == JumpMode::Held {
            positive("max jump height", p.max_jump_height)?;
        }
        positive("gravity", p.gravity.gravity)?;
        positive("fast fall gravity", p.gravity.fast_fall_gravity)?;
        positive("max fall speed", p.max_fall_speed)?;
        non_negative("initial speed", p.initial_speed)?;
        non_negative("max speed", p.max_speed)?;
        non_negative("acceleration", p.acceleration)?;
        ordered("speed", p.initial_speed, p.max_speed)?;

        let w = &self.world;
        positive("ground y", w.ground_y)?;
        if p.height > w.ground_y {
            return Err(ConfigError::PlayerBelowGround {
                ground_y: w.ground_y,
            });
        }
        positive("view width", w.view_width)?;
        if let Track::Finite { distance } = w.track {
            positive("track distance", distance)?;
        }

        match &self.spawn {
            SpawnPolicy::None => {}
            SpawnPolicy::Interval {
                min_gap_frames,
                max_gap_frames,
                shape,
            } => {
                positive("spawn min_gap_frames", *min_gap_frames as f32)?;
                ordered(
                    "spawn gap frames",
                    *min_gap_frames as f32,
                    *max_gap_frames as f32,
                )?;
                shape.validate()?;
            }
            SpawnPolicy::Course {
                count,
                start_pos,
                end_pos,
                min_gap,
                max_gap,
                shape,
            } => {
                if *count == 0 {
                    return Err(ConfigError::EmptyCourse);
                }
                let Some(distance) = w.track.distance() else {
                    return Err(ConfigError::CourseOnEndlessTrack);
                };
                non_negative("course start", *start_pos)?;
                ordered("course span", *start_pos, *end_pos)?;
                if *end_pos > distance {
                    return Err(ConfigError::CoursePastFinish {
                        end_pos: *end_pos,
                        distance,
                    });
                }
                positive("course min_gap", *min_gap)?;
                ordered("course gap", *min_gap, *max_gap)?;
                shape.validate()?;
            }
        }

        if let CollisionPolicy::Penalty {
            speed_multiplier,
            bounce,
        } = self.collision
        {
            if !(0.0..=1.0).contains(&speed_multiplier) {
                return Err(ConfigError::PenaltyMultiplier(speed_multiplier));
            }
            non_negative("penalty bounce", bounce)?;
        }

        for (index, phase) in self.countdown.iter().enumerate() {
            if !(phase.duration.is_finite() && phase.duration > 0.0) {
                return Err(ConfigError::CountdownDuration {
                    index,
                    label: phase.label.clone(),
                    duration: phase.duration,
                });
            }
        }

        Ok(())
    }
}

/// Named presets reproducing the individual runner games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Variant {
    /// Endless, fatal hits, a point per obstacle cleared
    #[default]
    Classic,
    /// Endless, fatal hits, a point per frame survived
    Survival,
    /// Finite race with held jumps; hits cost speed
    Sprint,
    /// Finite hurdle course; hits only knock hurdles over
    Hurdles,
}

impl Variant {
    pub const ALL: [Variant; 4] = [
        Variant::Classic,
        Variant::Survival,
        Variant::Sprint,
        Variant::Hurdles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "Classic",
            Variant::Survival => "Survival",
            Variant::Sprint => "Sprint",
            Variant::Hurdles => "Hurdles",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Variant::Classic),
            "survival" => Some(Variant::Survival),
            "sprint" | "race" => Some(Variant::Sprint),
            "hurdles" => Some(Variant::Hurdles),
            _ => None,
        }
    }

    /// Build the preset configuration
    pub fn config(&self) -> RunConfig {
        match self {
            Variant::Classic => RunConfig {
                player: PlayerConfig::default(),
                world: WorldConfig::default(),
                spawn: SpawnPolicy::default(),
                collision: CollisionPolicy::Fatal,
                scoring: ScoringMode::ObstaclesPassed,
                countdown: Vec::new(),
            },
            Variant::Survival => RunConfig {
                player: PlayerConfig {
                    initial_speed: 6.0,
                    max_speed: 6.0,
                    ..PlayerConfig::default()
                },
                world: WorldConfig::default(),
                spawn: SpawnPolicy::Interval {
                    min_gap_frames: 70,
                    max_gap_frames: 150,
                    shape: ObstacleShape {
                        width: 20.0,
                        min_height: 20.0,
                        max_height: 40.0,
                    },
                },
                collision: CollisionPolicy::Fatal,
                scoring: ScoringMode::Survival,
                countdown: CountdownPhase::three_two_one(),
            },
            Variant::Sprint => RunConfig {
                player: PlayerConfig {
                    insets: HitboxInsets {
                        horizontal: 8.0,
                        vertical: 4.0,
                    },
                    jump_mode: JumpMode::Held,
                    jump_force: 7.0,
                    max_jump_height: 110.0,
                    gravity: GravityProfile {
                        gravity: 0.5,
                        fast_fall_gravity: 1.1,
                    },
                    initial_speed: 0.0,
                    max_speed: 10.0,
                    acceleration: 0.15,
                    ..PlayerConfig::default()
                },
                world: WorldConfig {
                    track: Track::Finite { distance: 4000.0 },
                    ..WorldConfig::default()
                },
                spawn: SpawnPolicy::Course {
                    count: 12,
                    start_pos: 600.0,
                    end_pos: 3600.0,
                    min_gap: 180.0,
                    max_gap: 420.0,
                    shape: ObstacleShape {
                        width: 26.0,
                        min_height: 40.0,
                        max_height: 70.0,
                    },
                },
                collision: CollisionPolicy::Penalty {
                    speed_multiplier: 0.3,
                    bounce: 4.0,
                },
                scoring: ScoringMode::ObstaclesPassed,
                countdown: CountdownPhase::three_two_one(),
            },
            Variant::Hurdles => RunConfig {
                player: PlayerConfig {
                    insets: HitboxInsets {
                        horizontal: 6.0,
                        vertical: 0.0,
                    },
                    initial_speed: 2.0,
                    max_speed: 8.0,
                    acceleration: 0.1,
                    ..PlayerConfig::default()
                },
                world: WorldConfig {
                    track: Track::Finite { distance: 3000.0 },
                    ..WorldConfig::default()
                },
                spawn: SpawnPolicy::Course {
                    count: 10,
                    start_pos: 500.0,
                    end_pos: 2700.0,
                    min_gap: 150.0,
                    max_gap: 300.0,
                    shape: ObstacleShape {
                        width: 12.0,
                        min_height: 45.0,
                        max_height: 45.0,
                    },
                },
                collision: CollisionPolicy::ScoringOnly,
                scoring: ScoringMode::ObstaclesPassed,
                countdown: vec![
                    CountdownPhase::new("Ready", 1.0),
                    CountdownPhase::new("Set", 1.0),
                    CountdownPhase::new("Go!", 0.5),
                ],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        for variant in Variant::ALL {
            let config = variant.config();
            assert!(
                config.validate().is_ok(),
                "{} preset should be valid",
                variant.as_str()
            );
        }
    }

    #[test]
    fn test_variant_names_round_trip() {
        for variant in Variant::ALL {
            assert_eq!(Variant::from_str(variant.as_str()), Some(variant));
        }
        assert_eq!(Variant::from_str("RACE"), Some(Variant::Sprint));
        assert_eq!(Variant::from_str("tetris"), None);
    }

    #[test]
    fn test_rejects_non_positive_track() {
        let mut config = Variant::Sprint.config();
        config.world.track = Track::Finite { distance: -10.0 };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                field: "track distance",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_empty_course() {
        let mut config = Variant::Hurdles.config();
        if let SpawnPolicy::Course { count, .. } = &mut config.spawn {
            *count = 0;
        }
        assert!(matches!(config.validate(), Err(ConfigError::EmptyCourse)));
    }

    #[test]
    fn test_rejects_course_on_endless_track() {
        let mut config = Variant::Hurdles.config();
        config.world.track = Track::Endless;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CourseOnEndlessTrack)
        ));
    }

    #[test]
    fn test_rejects_course_past_finish() {
        let mut config = Variant::Hurdles.config();
        config.world.track = Track::Finite { distance: 2000.0 };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CoursePastFinish { .. })
        ));
    }

    #[test]
    fn test_rejects_inverted_spawn_gap() {
        let mut config = RunConfig::default();
        config.spawn = SpawnPolicy::Interval {
            min_gap_frames: 100,
            max_gap_frames: 50,
            shape: ObstacleShape::default(),
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedRange { .. })
        ));
    }

    #[test]
    fn test_rejects_collapsed_hitbox() {
        let mut config = RunConfig::default();
        config.player.insets.horizontal = 25.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::HitboxCollapsed { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_penalty_and_countdown() {
        let mut config = RunConfig::default();
        config.collision = CollisionPolicy::Penalty {
            speed_multiplier: 1.5,
            bounce: 0.0,
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PenaltyMultiplier(_))
        ));

        let mut config = RunConfig::default();
        config.countdown = vec![CountdownPhase::new("3", 0.0)];
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CountdownDuration { index: 0, .. })
        ));
    }

    #[test]
    fn test_rejects_nan_gravity() {
        let mut config = RunConfig::default();
        config.player.gravity = GravityProfile::uniform(f32::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip_keeps_preset() {
        let config = Variant::Sprint.config();
        let json = config.to_json().unwrap();
        let parsed = RunConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "collision": { "kind": "penalty", "speed_multiplier": 0.5, "bounce": 2.0 },
            "scoring": "survival"
        }"#;
        let config = RunConfig::from_json(json).unwrap();
        assert_eq!(config.scoring, ScoringMode::Survival);
        assert_eq!(config.player, PlayerConfig::default());
        assert!(matches!(config.collision, CollisionPolicy::Penalty { .. }));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        assert!(matches!(
            RunConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        // Parses but fails validation
        let json = r#"{ "world": { "track": { "kind": "finite", "distance": 0.0 } } }"#;
        assert!(matches!(
            RunConfig::from_json(json),
            Err(ConfigError::NotPositive { .. })
        ));
    }
}
