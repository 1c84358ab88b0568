//! Headless runs of the particle field on the same frame loop the browser
//! uses, with a manual scheduler standing in for `requestAnimationFrame`.

use crate::error::CliError;
use portfolio_fx_core::field::FieldSnapshot;
use portfolio_fx_core::{
    AnimationLoop, FxConfig, ManualScheduler, ParticleField, RecordingSurface, Xorshift64,
};
use std::cell::RefCell;
use std::rc::Rc;

/// What to simulate.
#[derive(Debug, Clone)]
pub struct SimulationSpec {
    pub width: f64,
    pub height: f64,
    pub frames: usize,
    pub seed: u64,
    /// Overrides the viewport-derived particle count.
    pub count: Option<usize>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub frames: u64,
    pub circles_drawn: usize,
    pub lines_drawn: usize,
    pub max_lines_in_frame: usize,
}

pub struct SimulationReport {
    pub stats: FrameStats,
    pub snapshot: FieldSnapshot,
}

impl SimulationReport {
    pub fn to_json(&self, spec: &SimulationSpec, include_particles: bool) -> serde_json::Value {
        let mut info = serde_json::json!({
            "width": spec.width,
            "height": spec.height,
            "seed": spec.seed,
            "frames": self.stats.frames,
            "particles": self.snapshot.particles.len(),
            "connections": self.snapshot.connections.len(),
            "circles_drawn": self.stats.circles_drawn,
            "lines_drawn": self.stats.lines_drawn,
            "max_lines_in_frame": self.stats.max_lines_in_frame,
        });
        if include_particles {
            info["snapshot"] = serde_json::to_value(&self.snapshot).unwrap_or_default();
        }
        info
    }
}

/// Builds the field a page of `spec.width` pixels would get.
pub fn build_field(config: &FxConfig, spec: &SimulationSpec) -> Result<ParticleField, CliError> {
    let count = spec
        .count
        .unwrap_or_else(|| config.particle_count(spec.width));
    let mut rng = Xorshift64::new(spec.seed);
    let field = ParticleField::new(&config.particles, count, spec.width, spec.height, &mut rng)?;
    log::debug!(
        "field of {count} particles on {}x{} (seed {})",
        spec.width,
        spec.height,
        spec.seed
    );
    Ok(field)
}

/// Runs `spec.frames` animation frames and reports what was drawn.
pub fn run(config: &FxConfig, spec: &SimulationSpec) -> Result<SimulationReport, CliError> {
    let field = build_field(config, spec)?;
    let state = Rc::new(RefCell::new((
        field,
        RecordingSurface::new(spec.width, spec.height),
        FrameStats::default(),
    )));

    let scheduler = Rc::new(ManualScheduler::new());
    let frame_state = Rc::clone(&state);
    let animation = AnimationLoop::new(scheduler.clone(), move || {
        let mut guard = frame_state.borrow_mut();
        let (field, surface, stats) = &mut *guard;
        field.render_frame(surface);
        let (circles, lines) = (surface.circle_count(), surface.line_count());
        surface.take_commands();
        stats.circles_drawn += circles;
        stats.lines_drawn += lines;
        stats.max_lines_in_frame = stats.max_lines_in_frame.max(lines);
    });

    if spec.frames > 0 {
        animation.start();
        scheduler.run_frames(spec.frames - 1);
        animation.stop();
    }

    let frames = animation.frames();
    drop(animation);
    let guard = state.borrow();
    let (field, _, stats) = &*guard;
    Ok(SimulationReport {
        stats: FrameStats { frames, ..*stats },
        snapshot: field.snapshot(),
    })
}
