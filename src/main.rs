//! Dash Run headless demo
//!
//! Runs one game with a scripted jumper and logs what happens:
//!
//! ```text
//! dash-run [preset|config.json] [seconds] [seed]
//! ```
//!
//! Set `RUST_LOG=debug` to see per-second status lines.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::cell::Cell;
    use std::rc::Rc;

    use anyhow::{Context, Result};
    use dash_run::consts::SIM_DT;
    use dash_run::sim::{RunPhase, SimEvent, SimState};
    use dash_run::{FrameDriver, FrameView, PolledInput, Renderer, RunConfig, Variant};

    /// How far ahead (px) the jumper reacts to an obstacle
    const JUMP_LEAD: f32 = 60.0;

    /// Logs events and decides when the scripted player should jump
    struct LogRenderer {
        want_jump: Rc<Cell<bool>>,
        frames: u64,
    }

    impl Renderer for LogRenderer {
        fn render(&mut self, view: &FrameView<'_>) {
            self.frames += 1;
            for event in view.events {
                match event {
                    SimEvent::Jumped | SimEvent::Landed => log::debug!("{event:?}"),
                    SimEvent::CountdownPhase { .. } => {
                        if let Some(label) = view.countdown_label {
                            log::info!("{label}");
                        }
                    }
                    _ => log::info!("{event:?}"),
                }
            }
            if self.frames % 60 == 0 {
                log::debug!(
                    "[{}] t={:.1}s score={} obstacles={} progress={:?}",
                    view.phase.as_str(),
                    view.elapsed,
                    view.score,
                    view.obstacles.len(),
                    view.progress
                );
            }

            let ahead = view.obstacles.iter().any(|o| {
                !o.struck
                    && o.rect.min.x >= view.body.min.x
                    && o.rect.min.x - view.body.max.x <= JUMP_LEAD
            });
            self.want_jump.set(ahead);
        }
    }

    fn load_config(arg: Option<&str>) -> Result<RunConfig> {
        let Some(arg) = arg else {
            return Ok(Variant::Classic.config());
        };
        if let Some(variant) = Variant::from_str(arg) {
            log::info!("Using {} preset", variant.as_str());
            return Ok(variant.config());
        }
        let json = std::fs::read_to_string(arg).with_context(|| format!("reading {arg}"))?;
        RunConfig::from_json(&json).with_context(|| format!("loading {arg}"))
    }

    pub fn run() -> Result<()> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let config = load_config(args.first().map(String::as_str))?;
        let seconds: f64 = match args.get(1) {
            Some(s) => s.parse().with_context(|| format!("bad duration: {s}"))?,
            None => 30.0,
        };
        let seed: u64 = match args.get(2) {
            Some(s) => s.parse().with_context(|| format!("bad seed: {s}"))?,
            None => rand::random(),
        };

        let state = SimState::new(config, seed)?;
        log::info!("Run initialized with seed: {seed}");
        let mut driver = FrameDriver::new(state);

        let want_jump = Rc::new(Cell::new(false));
        let mut renderer = LogRenderer {
            want_jump: Rc::clone(&want_jump),
            frames: 0,
        };
        let mut first = true;
        let mut input = || {
            let start = first;
            first = false;
            PolledInput {
                jump: want_jump.get(),
                start,
                reset: false,
            }
        };

        let frames = (seconds / SIM_DT as f64).ceil() as u64;
        for frame in 0..=frames {
            driver.frame(frame as f64 * SIM_DT as f64, &mut input, &mut renderer);
            if driver.state().phase == RunPhase::Finished {
                break;
            }
        }

        let state = driver.state();
        log::info!(
            "Done: {} after {:.1}s, score {}, distance {:.0}, outcome {:?}",
            state.phase.as_str(),
            state.elapsed,
            state.score,
            state.distance(),
            state.outcome
        );
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Dash Run (native) starting...");

    if let Err(e) = native::run() {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts drive the library directly; this only satisfies the compiler
}
