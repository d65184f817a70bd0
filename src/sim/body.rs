//! Player kinematics
//!
//! The player never moves on screen horizontally. Its horizontal speed is the
//! scroll speed of the world, and only the vertical axis is integrated as a
//! position.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::config::{JumpMode, PlayerConfig};
use crate::consts::{RUN_ANIM_FRAMES, RUN_ANIM_TICKS};

/// Vertical happenings during one integration step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerticalStep {
    pub jumped: bool,
    pub landed: bool,
}

/// The player's body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner in screen space
    pub pos: Vec2,
    /// x = scroll speed, y = vertical speed (positive = falling)
    pub vel: Vec2,
    pub size: Vec2,
    pub on_ground: bool,
    /// Top y at take-off, for the held-jump height cap
    pub jump_origin_y: f32,
    /// Held-jump thrust still available
    pub thrusting: bool,
    /// Run-cycle animation frame
    pub anim_frame: u32,
    grounded_ticks: u64,
}

impl Body {
    /// A body standing on the ground at the configured column
    pub fn new(config: &PlayerConfig, ground_y: f32) -> Self {
        let size = Vec2::new(config.width, config.height);
        let rest_y = ground_y - size.y;
        Self {
            pos: Vec2::new(config.x, rest_y),
            vel: Vec2::new(config.initial_speed, 0.0),
            size,
            on_ground: true,
            jump_origin_y: rest_y,
            thrusting: false,
            anim_frame: 0,
            grounded_ticks: 0,
        }
    }

    /// Full (un-inset) bounding box
    #[inline]
    pub fn rect(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Accelerate toward max speed while grounded; returns the scroll distance
    /// for this tick
    pub fn advance_horizontal(&mut self, config: &PlayerConfig) -> f32 {
        if self.on_ground && self.vel.x < config.max_speed {
            self.vel.x = (self.vel.x + config.acceleration).min(config.max_speed);
        }
        self.vel.x
    }

    /// Jump, gravity, fall cap and ground clamp
    pub fn integrate(
        &mut self,
        config: &PlayerConfig,
        ground_y: f32,
        jump_held: bool,
    ) -> VerticalStep {
        let mut step = VerticalStep::default();

        if jump_held && self.on_ground {
            self.vel.y = -config.jump_force;
            self.on_ground = false;
            self.jump_origin_y = self.pos.y;
            self.thrusting = config.jump_mode == JumpMode::Held;
            step.jumped = true;
        } else if self.thrusting {
            let risen = self.jump_origin_y - self.pos.y;
            if jump_held && risen < config.max_jump_height {
                self.vel.y = -config.jump_force;
            } else {
                // Released or capped: no more thrust until the next landing
                self.thrusting = false;
            }
        }

        self.vel.y += config.gravity.for_input(jump_held);
        self.vel.y = self.vel.y.min(config.max_fall_speed);
        self.pos.y += self.vel.y;

        let rest_y = ground_y - self.size.y;
        if self.pos.y >= rest_y {
            self.pos.y = rest_y;
            self.vel.y = 0.0;
            step.landed = !self.on_ground;
            self.on_ground = true;
            self.thrusting = false;
        }

        step
    }

    /// Advance the run cycle (only while running on the ground)
    pub fn advance_animation(&mut self) {
        if !self.on_ground {
            return;
        }
        self.grounded_ticks += 1;
        if self.grounded_ticks % RUN_ANIM_TICKS == 0 {
            self.anim_frame = (self.anim_frame + 1) % RUN_ANIM_FRAMES;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GravityProfile;

    const GROUND: f32 = 400.0;

    fn classic() -> PlayerConfig {
        PlayerConfig {
            x: 50.0,
            width: 50.0,
            height: 50.0,
            jump_force: 12.0,
            gravity: GravityProfile::uniform(0.6),
            ..PlayerConfig::default()
        }
    }

    #[test]
    fn test_new_body_is_grounded() {
        let body = Body::new(&classic(), GROUND);
        assert!(body.on_ground);
        assert_eq!(body.pos, Vec2::new(50.0, 350.0));
        assert_eq!(body.bottom(), GROUND);
    }

    #[test]
    fn test_idle_body_stays_on_ground() {
        let config = classic();
        let mut body = Body::new(&config, GROUND);
        for _ in 0..100 {
            body.integrate(&config, GROUND, false);
            assert!(body.on_ground);
            assert_eq!(body.pos.y, 350.0);
            assert_eq!(body.vel.y, 0.0);
        }
    }

    #[test]
    fn test_impulse_jump_arc() {
        let config = classic();
        let mut body = Body::new(&config, GROUND);

        let step = body.integrate(&config, GROUND, true);
        assert!(step.jumped);
        assert!(!body.on_ground);
        // Kick then one tick of gravity, same order as the browser loop
        assert!((body.vel.y - (-11.4)).abs() < 1e-5);
        assert!((body.pos.y - (350.0 - 11.4)).abs() < 1e-4);

        let mut peak = body.pos.y;
        let mut ticks = 1;
        loop {
            let step = body.integrate(&config, GROUND, false);
            peak = peak.min(body.pos.y);
            ticks += 1;
            if step.landed {
                break;
            }
            assert!(ticks < 200, "body never landed");
        }
        assert!(body.on_ground);
        assert_eq!(body.pos.y, 350.0);
        // v^2 / 2g = 144 / 1.2 = 120, discretised a little lower
        let height = 350.0 - peak;
        assert!(height > 100.0 && height < 125.0, "jump height {height}");
        assert!((38..=42).contains(&ticks), "air time {ticks}");
    }

    #[test]
    fn test_cannot_jump_midair() {
        let config = classic();
        let mut body = Body::new(&config, GROUND);
        body.integrate(&config, GROUND, true);
        let vy = body.vel.y;
        let step = body.integrate(&config, GROUND, true);
        assert!(!step.jumped);
        assert!((body.vel.y - (vy + 0.6)).abs() < 1e-5);
    }

    #[test]
    fn test_held_jump_goes_higher_than_tap() {
        let config = PlayerConfig {
            jump_mode: JumpMode::Held,
            jump_force: 6.0,
            max_jump_height: 100.0,
            ..classic()
        };

        let apex = |hold_ticks: usize| {
            let mut body = Body::new(&config, GROUND);
            let mut peak = body.pos.y;
            for i in 0..300 {
                body.integrate(&config, GROUND, i < hold_ticks);
                peak = peak.min(body.pos.y);
            }
            assert!(body.on_ground);
            350.0 - peak
        };

        let tap = apex(1);
        let held = apex(30);
        assert!(held > tap + 40.0, "held {held} vs tap {tap}");
        // Thrust stops at the cap; the remaining rise is ballistic
        let ballistic = 6.0 * 6.0 / (2.0 * 0.6);
        assert!(held <= 100.0 + 6.0 + ballistic, "held jump {held} too high");
    }

    #[test]
    fn test_released_thrust_does_not_resume() {
        let config = PlayerConfig {
            jump_mode: JumpMode::Held,
            jump_force: 6.0,
            max_jump_height: 200.0,
            ..classic()
        };
        let mut body = Body::new(&config, GROUND);
        body.integrate(&config, GROUND, true);
        body.integrate(&config, GROUND, false);
        assert!(!body.thrusting);
        let vy = body.vel.y;
        body.integrate(&config, GROUND, true);
        assert!(body.vel.y > vy, "thrust resumed after release");
    }

    #[test]
    fn test_fast_fall_when_released() {
        let config = PlayerConfig {
            gravity: GravityProfile {
                gravity: 0.5,
                fast_fall_gravity: 1.5,
            },
            ..classic()
        };
        let mut held = Body::new(&config, GROUND);
        let mut released = Body::new(&config, GROUND);
        held.integrate(&config, GROUND, true);
        released.integrate(&config, GROUND, true);
        for _ in 0..5 {
            held.integrate(&config, GROUND, true);
            released.integrate(&config, GROUND, false);
        }
        assert!(released.pos.y > held.pos.y);
    }

    #[test]
    fn test_fall_speed_capped() {
        let config = PlayerConfig {
            max_fall_speed: 8.0,
            ..classic()
        };
        let mut body = Body::new(&config, 10_000.0);
        body.pos.y = 0.0;
        body.on_ground = false;
        for _ in 0..100 {
            body.integrate(&config, 10_000.0, false);
            assert!(body.vel.y <= 8.0);
        }
    }

    #[test]
    fn test_horizontal_accelerates_only_on_ground() {
        let config = PlayerConfig {
            initial_speed: 0.0,
            max_speed: 10.0,
            acceleration: 1.0,
            ..classic()
        };
        let mut body = Body::new(&config, GROUND);
        assert_eq!(body.advance_horizontal(&config), 1.0);
        assert_eq!(body.advance_horizontal(&config), 2.0);

        body.integrate(&config, GROUND, true);
        assert!(!body.on_ground);
        assert_eq!(body.advance_horizontal(&config), 2.0);

        body.on_ground = true;
        for _ in 0..20 {
            body.advance_horizontal(&config);
        }
        assert_eq!(body.vel.x, 10.0);
    }

    #[test]
    fn test_animation_advances_only_grounded() {
        let config = classic();
        let mut body = Body::new(&config, GROUND);
        for _ in 0..RUN_ANIM_TICKS {
            body.advance_animation();
        }
        assert_eq!(body.anim_frame, 1);

        body.on_ground = false;
        for _ in 0..RUN_ANIM_TICKS * 3 {
            body.advance_animation();
        }
        assert_eq!(body.anim_frame, 1);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn grounded_flag_matches_position(
                inputs in proptest::collection::vec(any::<bool>(), 1..400),
                held_mode in any::<bool>(),
            ) {
                let config = PlayerConfig {
                    jump_mode: if held_mode { JumpMode::Held } else { JumpMode::Impulse },
                    jump_force: 8.0,
                    gravity: GravityProfile { gravity: 0.6, fast_fall_gravity: 1.2 },
                    ..classic()
                };
                let mut body = Body::new(&config, GROUND);
                for jump in inputs {
                    body.integrate(&config, GROUND, jump);
                    prop_assert!(body.bottom() <= GROUND);
                    prop_assert_eq!(body.on_ground, body.pos.y == GROUND - 50.0);
                    if body.on_ground {
                        prop_assert_eq!(body.vel.y, 0.0);
                    }
                }
            }
        }
    }
}
