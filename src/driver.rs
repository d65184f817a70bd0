//! Frame driver: turns host frames into fixed simulation steps
//!
//! Hosts call `frame` from their animation callback with a monotonic
//! timestamp. The driver accumulates real time, runs as many fixed `SIM_DT`
//! ticks as have elapsed (bounded), and hands the renderer a fresh view.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::sim::{SimEvent, SimState, TickInput, TickReport, reset, tick};
use crate::view::{FrameView, InputSource, Renderer};

/// Owns a run and steps it in fixed increments
pub struct FrameDriver {
    state: SimState,
    accumulator: f32,
    last_time: Option<f64>,
    /// Start press waiting for the next simulation step
    pending_start: bool,
    /// Events from the current frame's steps
    events: Vec<SimEvent>,
}

impl FrameDriver {
    pub fn new(state: SimState) -> Self {
        Self {
            state,
            accumulator: 0.0,
            last_time: None,
            pending_start: false,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    /// Events produced during the most recent frame
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Run one animation frame; returns the number of ticks simulated
    pub fn frame<I, R>(&mut self, now: f64, input: &mut I, renderer: &mut R) -> u32
    where
        I: InputSource + ?Sized,
        R: Renderer + ?Sized,
    {
        let polled = input.poll();
        if polled.reset {
            reset(&mut self.state);
            self.accumulator = 0.0;
            self.pending_start = false;
        }
        self.pending_start |= polled.start;

        // Clamp huge gaps (tab switches, breakpoints); NaN collapses to zero
        let dt = match self.last_time {
            Some(last) => ((now - last) as f32).max(0.0).min(MAX_FRAME_DT),
            None => 0.0,
        };
        self.last_time = Some(now);
        self.accumulator += dt;

        self.events.clear();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = TickInput {
                jump: polled.jump,
                start: self.pending_start,
            };
            let report = tick(&mut self.state, &input, SIM_DT);
            self.events.extend(report.events);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.pending_start = false;
        }
        if self.accumulator >= SIM_DT {
            // Drop the backlog instead of spiralling
            self.accumulator = 0.0;
        }

        let view = FrameView::capture(&self.state, &self.events);
        renderer.render(&view);
        substeps
    }

    /// Single fixed step without a host clock (headless runs, replays)
    pub fn step(&mut self, input: TickInput) -> TickReport {
        tick(&mut self.state, &input, SIM_DT)
    }
}
