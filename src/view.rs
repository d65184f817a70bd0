//! Host-facing boundary: what renderers read and what input sources supply
//!
//! Renderers only ever see a `FrameView`, a read-only snapshot in screen
//! space. They never touch `SimState` directly.

use serde::Serialize;

use crate::sim::{Aabb, RunOutcome, RunPhase, SimEvent, SimState};

/// Raw per-frame input, aggregated by the host from keyboard, pointer and
/// touch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PolledInput {
    /// Jump/thrust currently held
    pub jump: bool,
    /// Start pressed since the last poll
    pub start: bool,
    /// Restart pressed since the last poll
    pub reset: bool,
}

/// Supplies input once per rendered frame
pub trait InputSource {
    fn poll(&mut self) -> PolledInput;
}

impl<F: FnMut() -> PolledInput> InputSource for F {
    fn poll(&mut self) -> PolledInput {
        self()
    }
}

/// Draws a frame; owns all asset and sprite concerns
pub trait Renderer {
    fn render(&mut self, view: &FrameView<'_>);
}

/// An obstacle translated into screen space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ObstacleView {
    pub id: u32,
    pub rect: Aabb,
    /// Knocked over (draw fallen)
    pub struck: bool,
    pub scored: bool,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameView<'a> {
    pub phase: RunPhase,
    /// Text of the active countdown phase
    pub countdown_label: Option<&'a str>,
    /// Player rectangle (full sprite bounds, not the hitbox)
    pub body: Aabb,
    pub anim_frame: u32,
    pub airborne: bool,
    /// Obstacles intersecting the view, left to right
    pub obstacles: Vec<ObstacleView>,
    pub score: u64,
    /// Seconds since the countdown ended
    pub elapsed: f32,
    /// Course completion for finite tracks
    pub progress: Option<f32>,
    pub outcome: Option<RunOutcome>,
    /// Events from the steps simulated since the previous frame
    pub events: &'a [SimEvent],
}

impl<'a> FrameView<'a> {
    pub fn capture(state: &'a SimState, events: &'a [SimEvent]) -> Self {
        let offset = state.world_offset();
        let obstacles = state
            .obstacles
            .visible(state.config.world.view_width)
            .map(|o| ObstacleView {
                id: o.id,
                rect: o.screen_rect(offset),
                struck: o.struck,
                scored: o.scored,
            })
            .collect();

        Self {
            phase: state.phase,
            countdown_label: state.countdown_label(),
            body: state.body.rect(),
            anim_frame: state.body.anim_frame,
            airborne: !state.body.on_ground,
            obstacles,
            score: state.score,
            elapsed: state.elapsed,
            progress: state.progress(),
            outcome: state.outcome,
            events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SpawnPolicy, Variant};
    use glam::Vec2;

    #[test]
    fn test_capture_translates_to_screen() {
        let mut config = Variant::Classic.config();
        config.spawn = SpawnPolicy::None;
        let mut state = SimState::new(config, 1).unwrap();
        state
            .obstacles
            .push(Vec2::new(100.0, 350.0), Vec2::new(30.0, 50.0));
        state
            .obstacles
            .push(Vec2::new(1200.0, 350.0), Vec2::new(30.0, 50.0));
        state
            .obstacles
            .push(Vec2::new(2500.0, 350.0), Vec2::new(30.0, 50.0));
        state.obstacles.advance(1000.0);

        let view = FrameView::capture(&state, &[]);
        // Only the middle obstacle is inside the 800px window
        assert_eq!(view.obstacles.len(), 1);
        assert_eq!(view.obstacles[0].id, 2);
        assert_eq!(view.obstacles[0].rect.min, Vec2::new(200.0, 350.0));
        assert_eq!(view.body.min, Vec2::new(50.0, 350.0));
        assert!(!view.airborne);
        assert_eq!(view.phase, RunPhase::Initial);
        assert_eq!(view.countdown_label, None);
    }

    #[test]
    fn test_closure_input_source() {
        let mut presses = 0;
        let mut source = || {
            presses += 1;
            PolledInput {
                jump: presses % 2 == 0,
                ..Default::default()
            }
        };
        assert!(!source.poll().jump);
        assert!(source.poll().jump);
    }

    #[test]
    fn test_view_serializes_for_js_hosts() {
        let state = SimState::new(Variant::Sprint.config(), 8).unwrap();
        let view = FrameView::capture(&state, &[]);
        let json = serde_json::to_string(&view).unwrap();
        assert!(json.contains("\"phase\":\"Initial\""));
        assert!(json.contains("\"progress\""));
    }
}
