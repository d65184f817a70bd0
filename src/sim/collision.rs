//! Collision detection and response for axis-aligned boxes
//!
//! Everything is compared in screen space: obstacles live in world space and
//! are shifted left by the world offset before testing against the player,
//! whose screen x never changes.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::obstacle::Obstacle;
use crate::config::{CollisionPolicy, HitboxInsets};

/// Axis-aligned rectangle (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Top-left corner
    pub min: Vec2,
    /// Bottom-right corner
    pub max: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Shrink every side inward
    pub fn inset(&self, insets: HitboxInsets) -> Self {
        let d = Vec2::new(insets.horizontal, insets.vertical);
        Self {
            min: self.min + d,
            max: self.max - d,
        }
    }

    /// Shift horizontally (world space to screen space and back)
    pub fn translate_x(&self, dx: f32) -> Self {
        let d = Vec2::new(dx, 0.0);
        Self {
            min: self.min + d,
            max: self.max + d,
        }
    }
}

/// Strict overlap test; boxes that only touch along an edge do not collide
#[inline]
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    a.min.x < b.max.x && a.max.x > b.min.x && a.min.y < b.max.y && a.max.y > b.min.y
}

/// The player's effective collision box
pub fn body_hitbox(body: &Body, insets: HitboxInsets) -> Aabb {
    body.rect().inset(insets)
}

/// Check a body against an obstacle at the given world offset
pub fn body_hits_obstacle(
    body: &Body,
    insets: HitboxInsets,
    obstacle: &Obstacle,
    world_offset: f32,
) -> bool {
    overlaps(
        &body_hitbox(body, insets),
        &obstacle.screen_rect(world_offset),
    )
}

/// What a single contact did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The run is over
    Fatal,
    /// Speed was cut (and the body possibly bounced)
    Penalized,
    /// Obstacle marked as knocked over, no effect on the body
    Marked,
    /// Already handled on an earlier tick
    Ignored,
}

/// Apply the collision policy for a contact
///
/// Penalty and scoring-only contacts flag the obstacle `struck`, so holding
/// an overlap across many ticks resolves exactly once.
pub fn resolve(policy: CollisionPolicy, body: &mut Body, obstacle: &mut Obstacle) -> Resolution {
    match policy {
        CollisionPolicy::Fatal => Resolution::Fatal,
        CollisionPolicy::Penalty {
            speed_multiplier,
            bounce,
        } => {
            if obstacle.struck {
                return Resolution::Ignored;
            }
            obstacle.struck = true;
            body.vel.x *= speed_multiplier;
            if bounce > 0.0 {
                // Lift off now so the body is never flagged airborne on the ground line
                body.pos.y -= bounce;
                body.vel.y = -bounce;
                body.on_ground = false;
                body.thrusting = false;
            }
            Resolution::Penalized
        }
        CollisionPolicy::ScoringOnly => {
            if obstacle.struck {
                return Resolution::Ignored;
            }
            obstacle.struck = true;
            Resolution::Marked
        }
    }
}
