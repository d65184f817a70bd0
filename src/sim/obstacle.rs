//! Obstacle field: spawning, scrolling and culling
//!
//! Obstacles are stored in world space and never move. Scrolling is the
//! field's view offset growing; an obstacle's screen x is its world x minus
//! that offset.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::config::{ObstacleShape, SpawnPolicy, WorldConfig};

/// A single obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Top-left corner in world space
    pub pos: Vec2,
    pub size: Vec2,
    /// Score already awarded for passing it
    pub scored: bool,
    /// Collision side effect already applied (knocked over)
    pub struck: bool,
}

impl Obstacle {
    pub fn new(id: u32, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            pos,
            size,
            scored: false,
            struck: false,
        }
    }

    #[inline]
    pub fn world_rect(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    /// Rectangle relative to the view's left edge
    #[inline]
    pub fn screen_rect(&self, world_offset: f32) -> Aabb {
        self.world_rect().translate_x(-world_offset)
    }

    /// Trailing edge is left of the view
    #[inline]
    pub fn is_behind(&self, view_left: f32) -> bool {
        self.pos.x + self.size.x < view_left
    }
}

/// Place `count` obstacles from `start_pos` to `end_pos`
///
/// Gaps are drawn at random and then rescaled so they sum to the span, so
/// the last obstacle always lands on `end_pos` whatever the seed.
pub fn course_layout<R: Rng>(
    rng: &mut R,
    count: u32,
    start_pos: f32,
    end_pos: f32,
    min_gap: f32,
    max_gap: f32,
) -> Vec<f32> {
    if count == 0 {
        return Vec::new();
    }
    let gaps: Vec<f64> = (1..count)
        .map(|_| rng.random_range(min_gap..=max_gap) as f64)
        .collect();
    let total: f64 = gaps.iter().sum();
    let span = (end_pos - start_pos) as f64;
    let scale = if total > 0.0 { span / total } else { 0.0 };

    let mut positions = Vec::with_capacity(count as usize);
    let mut x = start_pos as f64;
    positions.push(start_pos);
    for gap in gaps {
        x += gap * scale;
        positions.push(x as f32);
    }
    if count > 1 {
        // Pin against accumulated rounding
        if let Some(last) = positions.last_mut() {
            *last = end_pos;
        }
    }
    positions
}

fn random_size<R: Rng>(rng: &mut R, shape: &ObstacleShape) -> Vec2 {
    let height = rng.random_range(shape.min_height..=shape.max_height);
    Vec2::new(shape.width, height)
}

/// All live obstacles, ordered by spawn (and therefore by world x)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
    /// World x of the view's left edge (total distance scrolled)
    offset: f32,
    /// Frame at which the next interval spawn is due
    next_spawn_tick: Option<u64>,
    /// Highest id handed out so far
    last_id: u32,
    culled: u32,
}

impl ObstacleField {
    /// Empty field with nothing scheduled
    pub fn new() -> Self {
        Self::default()
    }

    /// Field prepared for a spawn policy: courses are laid out up front,
    /// interval spawns get their first deadline
    pub fn for_policy<R: Rng>(policy: &SpawnPolicy, world: &WorldConfig, rng: &mut R) -> Self {
        let mut field = Self::new();
        match policy {
            SpawnPolicy::None => {}
            SpawnPolicy::Interval {
                min_gap_frames,
                max_gap_frames,
                ..
            } => {
                field.schedule(0, *min_gap_frames, *max_gap_frames, rng);
            }
            SpawnPolicy::Course {
                count,
                start_pos,
                end_pos,
                min_gap,
                max_gap,
                shape,
            } => {
                for x in course_layout(rng, *count, *start_pos, *end_pos, *min_gap, *max_gap) {
                    let size = random_size(rng, shape);
                    field.push(Vec2::new(x, world.ground_y - size.y), size);
                }
                log::debug!("Course laid out: {} obstacles", field.len());
            }
        }
        field
    }

    fn schedule<R: Rng>(&mut self, tick: u64, min: u32, max: u32, rng: &mut R) {
        let gap = rng.random_range(min..=max) as u64;
        self.next_spawn_tick = Some(tick + gap);
    }

    /// Add an obstacle at a world position, returning its id
    pub fn push(&mut self, pos: Vec2, size: Vec2) -> u32 {
        self.last_id += 1;
        let id = self.last_id;
        self.obstacles.push(Obstacle::new(id, pos, size));
        id
    }

    /// Scroll the view forward
    pub fn advance(&mut self, delta: f32) {
        self.offset += delta;
    }

    /// Spawn at the view's right edge if the interval deadline has passed
    ///
    /// Returns the new obstacle's id. Course and empty policies never spawn
    /// here.
    pub fn spawn_if_due<R: Rng>(
        &mut self,
        tick: u64,
        policy: &SpawnPolicy,
        world: &WorldConfig,
        rng: &mut R,
    ) -> Option<u32> {
        let SpawnPolicy::Interval {
            min_gap_frames,
            max_gap_frames,
            shape,
        } = policy
        else {
            return None;
        };
        match self.next_spawn_tick {
            Some(due) if tick >= due => {}
            _ => return None,
        }

        let size = random_size(rng, shape);
        let pos = Vec2::new(self.offset + world.view_width, world.ground_y - size.y);
        let id = self.push(pos, size);
        self.schedule(tick, *min_gap_frames, *max_gap_frames, rng);
        log::debug!("Spawned obstacle {id} at x={:.1} h={:.1}", pos.x, size.y);
        Some(id)
    }

    /// Flag obstacles whose trailing edge is left of `player_x` (screen
    /// space) as scored; returns the ids newly flagged
    pub fn mark_passed(&mut self, player_x: f32) -> Vec<u32> {
        let line = self.offset + player_x;
        self.obstacles
            .iter_mut()
            .filter(|o| !o.scored && o.pos.x + o.size.x < line)
            .map(|o| {
                o.scored = true;
                o.id
            })
            .collect()
    }

    /// Drop everything fully behind the view, keeping survivors in order
    pub fn cull(&mut self) -> usize {
        let view_left = self.offset;
        let before = self.obstacles.len();
        self.obstacles.retain(|o| !o.is_behind(view_left));
        let removed = before - self.obstacles.len();
        if removed > 0 {
            self.culled += removed as u32;
            log::debug!("Culled {removed} obstacles ({} total)", self.culled);
        }
        removed
    }

    /// Obstacles intersecting the visible window
    pub fn visible(&self, view_width: f32) -> impl Iterator<Item = &Obstacle> {
        let left = self.offset;
        let right = self.offset + view_width;
        self.obstacles
            .iter()
            .filter(move |o| o.pos.x + o.size.x >= left && o.pos.x <= right)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Obstacle> {
        self.obstacles.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Total distance scrolled
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Obstacles removed so far this run
    pub fn culled(&self) -> u32 {
        self.culled
    }

    /// Frame of the next interval spawn, if one is scheduled
    pub fn next_spawn_tick(&self) -> Option<u64> {
        self.next_spawn_tick
    }
}
