//! The particle field behind the hero section.
//!
//! A [`ParticleField`] owns its particles exclusively. Each frame it clears
//! the surface, advances and draws every particle, then joins every pair
//! closer than the connection distance with a line whose alpha fades
//! linearly to zero at that distance.
//!
//! Scheduling is not the field's concern: the host drives
//! [`ParticleField::render_frame`] from an
//! [`AnimationLoop`](crate::animation::AnimationLoop).

use crate::color::Rgba;
use crate::config::ParticleConfig;
use crate::error::FxError;
use crate::particle::Particle;
use crate::prng::Xorshift64;
use crate::surface::Surface;
use glam::DVec2;
use serde::Serialize;

/// Line width of connection strokes, in pixels.
const CONNECTION_LINE_WIDTH: f64 = 1.0;

/// Alpha of a connection line between two particles `distance` apart.
///
/// Equals `opacity` at distance 0 and falls linearly to exactly 0 at
/// `threshold`; anything at or beyond the threshold is 0.
pub fn connection_alpha(distance: f64, threshold: f64, opacity: f64) -> f64 {
    if threshold <= 0.0 || distance >= threshold {
        return 0.0;
    }
    opacity * (1.0 - distance.max(0.0) / threshold)
}

/// A line drawn between particles `a` and `b` (indices, `a < b`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    pub distance: f64,
    pub alpha: f64,
}

/// Serializable view of one frame's state.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSnapshot {
    pub width: f64,
    pub height: f64,
    pub particles: Vec<Particle>,
    pub connections: Vec<Connection>,
}

/// Collection of bouncing particles plus the styling used to draw them.
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Vec<Particle>,
    bounds: DVec2,
    fill: Rgba,
    line_color: Rgba,
    line_opacity: f64,
    connection_distance: f64,
}

impl ParticleField {
    /// Spawns `count` particles inside a `width` x `height` area.
    ///
    /// `count` 0 yields an empty field. Returns
    /// `FxError::InvalidDimensions` for negative or non-finite sizes.
    pub fn new(
        config: &ParticleConfig,
        count: usize,
        width: f64,
        height: f64,
        rng: &mut Xorshift64,
    ) -> Result<Self, FxError> {
        let bounds = checked_bounds(width, height)?;
        let particles = (0..count)
            .map(|_| {
                Particle::spawn(
                    rng,
                    bounds,
                    config.speed,
                    config.min_radius,
                    config.max_radius,
                )
            })
            .collect();
        Ok(Self::with_particles(config, bounds, particles))
    }

    /// Builds a field from explicit particles, for replay and tests.
    pub fn from_particles(
        config: &ParticleConfig,
        width: f64,
        height: f64,
        particles: Vec<Particle>,
    ) -> Result<Self, FxError> {
        let bounds = checked_bounds(width, height)?;
        Ok(Self::with_particles(config, bounds, particles))
    }

    fn with_particles(config: &ParticleConfig, bounds: DVec2, particles: Vec<Particle>) -> Self {
        Self {
            particles,
            bounds,
            fill: config.color,
            line_color: config.line_color,
            line_opacity: config.line_opacity,
            connection_distance: config.connection_distance,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Current bounds as `(width, height)`.
    pub fn bounds(&self) -> (f64, f64) {
        (self.bounds.x, self.bounds.y)
    }

    /// Changes the bounce area. Takes effect on the next [`step`](Self::step);
    /// particles already outside the new area are left where they are and
    /// bounce back once they next move.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), FxError> {
        self.bounds = checked_bounds(width, height)?;
        Ok(())
    }

    /// Advances every particle by one velocity increment.
    pub fn step(&mut self) {
        let bounds = self.bounds;
        for p in &mut self.particles {
            p.update(bounds);
        }
    }

    /// Every pair closer than the connection distance.
    pub fn connections(&self) -> Vec<Connection> {
        let mut out = Vec::new();
        for (i, pi) in self.particles.iter().enumerate() {
            for (j, pj) in self.particles.iter().enumerate().skip(i + 1) {
                let distance = pi.position.distance(pj.position);
                if distance < self.connection_distance {
                    out.push(Connection {
                        a: i,
                        b: j,
                        distance,
                        alpha: connection_alpha(
                            distance,
                            self.connection_distance,
                            self.line_opacity,
                        ),
                    });
                }
            }
        }
        out
    }

    /// Strokes one line per connected pair.
    pub fn draw_connections(&self, surface: &mut dyn Surface) {
        let connections = self.connections();
        if connections.is_empty() {
            return;
        }
        surface.set_line_width(CONNECTION_LINE_WIDTH);
        for c in connections {
            let (a, b) = (self.particles[c.a].position, self.particles[c.b].position);
            surface.set_stroke_color(self.line_color.with_alpha(c.alpha));
            surface.stroke_line(a.x, a.y, b.x, b.y);
        }
    }

    /// One animation frame: clear, step and draw particles, draw connections.
    pub fn render_frame(&mut self, surface: &mut dyn Surface) {
        self.step();
        self.draw(surface);
    }

    /// Draws the current state without advancing it.
    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.clear();
        surface.set_fill_color(self.fill);
        for p in &self.particles {
            p.draw(surface);
        }
        self.draw_connections(surface);
    }

    pub fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            width: self.bounds.x,
            height: self.bounds.y,
            particles: self.particles.clone(),
            connections: self.connections(),
        }
    }
}

fn checked_bounds(width: f64, height: f64) -> Result<DVec2, FxError> {
    if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
        return Err(FxError::InvalidDimensions { width, height });
    }
    Ok(DVec2::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    fn config() -> ParticleConfig {
        ParticleConfig::default()
    }

    fn at_rest(points: &[(f64, f64)]) -> Vec<Particle> {
        points
            .iter()
            .map(|&(x, y)| Particle::new(DVec2::new(x, y), DVec2::ZERO, 1.0))
            .collect()
    }

    // -- construction --

    #[test]
    fn new_spawns_requested_count_inside_bounds() {
        let mut rng = Xorshift64::new(42);
        let field = ParticleField::new(&config(), 50, 800.0, 600.0, &mut rng).unwrap();
        assert_eq!(field.len(), 50);
        assert!(field.particles().iter().all(|p| {
            (0.0..800.0).contains(&p.position.x) && (0.0..600.0).contains(&p.position.y)
        }));
    }

    #[test]
    fn zero_count_is_an_empty_valid_field() {
        let mut rng = Xorshift64::new(1);
        let mut field = ParticleField::new(&config(), 0, 100.0, 100.0, &mut rng).unwrap();
        assert!(field.is_empty());
        let mut surface = RecordingSurface::new(100.0, 100.0);
        field.render_frame(&mut surface);
        assert_eq!(surface.circle_count(), 0);
        assert_eq!(surface.line_count(), 0);
    }

    #[test]
    fn invalid_dimensions_are_rejected() {
        let mut rng = Xorshift64::new(1);
        assert!(ParticleField::new(&config(), 3, -1.0, 10.0, &mut rng).is_err());
        assert!(ParticleField::new(&config(), 3, 10.0, f64::NAN, &mut rng).is_err());
    }

    #[test]
    fn same_seed_same_field() {
        let a = ParticleField::new(&config(), 20, 300.0, 200.0, &mut Xorshift64::new(9)).unwrap();
        let b = ParticleField::new(&config(), 20, 300.0, 200.0, &mut Xorshift64::new(9)).unwrap();
        assert_eq!(a.particles(), b.particles());
    }

    // -- stepping --

    #[test]
    fn particles_at_rest_never_move() {
        let initial = at_rest(&[(10.0, 10.0), (50.0, 50.0), (90.0, 5.0)]);
        let mut field = ParticleField::from_particles(&config(), 100.0, 100.0, initial.clone()).unwrap();
        for _ in 0..1000 {
            field.step();
        }
        assert_eq!(field.particles(), initial.as_slice());
    }

    #[test]
    fn bounce_is_symmetric_at_right_edge() {
        let p = Particle::new(DVec2::new(99.0, 50.0), DVec2::new(2.0, 0.0), 1.0);
        let mut field = ParticleField::from_particles(&config(), 100.0, 100.0, vec![p]).unwrap();
        field.step();
        assert_eq!(field.particles()[0].position.x, 101.0);
        assert_eq!(field.particles()[0].velocity.x, -2.0);
        field.step();
        assert_eq!(field.particles()[0].position.x, 99.0);
    }

    #[test]
    fn resize_applies_to_next_step_without_correction() {
        let p = Particle::new(DVec2::new(80.0, 10.0), DVec2::new(1.0, 0.0), 1.0);
        let mut field = ParticleField::from_particles(&config(), 100.0, 100.0, vec![p]).unwrap();
        field.resize(50.0, 50.0).unwrap();
        assert_eq!(field.particles()[0].position.x, 80.0, "no retroactive clamp");
        field.step();
        assert_eq!(field.particles()[0].position.x, 81.0);
        assert_eq!(field.particles()[0].velocity.x, -1.0);
        assert_eq!(field.bounds(), (50.0, 50.0));
    }

    #[test]
    fn resize_rejects_bad_size_and_keeps_old_bounds() {
        let mut field = ParticleField::from_particles(&config(), 100.0, 100.0, vec![]).unwrap();
        assert!(field.resize(f64::INFINITY, 1.0).is_err());
        assert_eq!(field.bounds(), (100.0, 100.0));
    }

    // -- connections --

    #[test]
    fn connection_alpha_endpoints() {
        assert_eq!(connection_alpha(0.0, 120.0, 0.2), 0.2);
        assert_eq!(connection_alpha(120.0, 120.0, 0.2), 0.0);
        assert_eq!(connection_alpha(500.0, 120.0, 0.2), 0.0);
        assert!((connection_alpha(60.0, 120.0, 0.2) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn connections_only_below_threshold() {
        let particles = at_rest(&[(0.0, 0.0), (30.0, 40.0), (0.0, 200.0)]);
        let field = ParticleField::from_particles(&config(), 300.0, 300.0, particles).unwrap();
        let conns = field.connections();
        assert_eq!(conns.len(), 1);
        assert_eq!((conns[0].a, conns[0].b), (0, 1));
        assert!((conns[0].distance - 50.0).abs() < 1e-12);
    }

    #[test]
    fn draw_connections_uses_faded_line_color() {
        let particles = at_rest(&[(0.0, 0.0), (60.0, 0.0)]);
        let field = ParticleField::from_particles(&config(), 100.0, 100.0, particles).unwrap();
        let mut surface = RecordingSurface::new(100.0, 100.0);
        field.draw_connections(&mut surface);
        let cmds = surface.commands();
        assert_eq!(cmds[0], DrawCommand::LineWidth { width: 1.0 });
        match cmds[1] {
            DrawCommand::StrokeColor { color } => {
                assert_eq!((color.r, color.g, color.b), (51, 153, 204));
                assert!((color.a - 0.1).abs() < 1e-12);
            }
            ref other => panic!("expected stroke color, got {other:?}"),
        }
        assert_eq!(
            cmds[2],
            DrawCommand::Line {
                x0: 0.0,
                y0: 0.0,
                x1: 60.0,
                y1: 0.0
            }
        );
    }

    // -- frames --

    #[test]
    fn render_frame_clears_then_draws_particles_then_lines() {
        let particles = at_rest(&[(10.0, 10.0), (20.0, 10.0), (90.0, 90.0)]);
        let mut field = ParticleField::from_particles(&config(), 100.0, 100.0, particles).unwrap();
        let mut surface = RecordingSurface::new(100.0, 100.0);
        field.render_frame(&mut surface);
        let cmds = surface.commands();
        assert_eq!(cmds[0], DrawCommand::Clear);
        assert!(matches!(cmds[1], DrawCommand::FillColor { .. }));
        assert_eq!(surface.circle_count(), 3);
        // All three are within 120px of each other.
        assert_eq!(surface.line_count(), 3);
        let first_line = cmds
            .iter()
            .position(|c| matches!(c, DrawCommand::Line { .. }))
            .unwrap();
        let last_circle = cmds
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Circle { .. }))
            .unwrap();
        assert!(last_circle < first_line);
    }

    #[test]
    fn draw_leaves_particles_in_place() {
        let particles = vec![Particle::new(DVec2::new(5.0, 5.0), DVec2::new(1.0, 0.0), 1.0)];
        let field = ParticleField::from_particles(&config(), 50.0, 50.0, particles).unwrap();
        let mut surface = RecordingSurface::new(50.0, 50.0);
        field.draw(&mut surface);
        field.draw(&mut surface);
        assert_eq!(field.particles()[0].position, DVec2::new(5.0, 5.0));
        assert_eq!(surface.circle_count(), 2);
    }

    #[test]
    fn snapshot_reports_state() {
        let particles = at_rest(&[(0.0, 0.0), (10.0, 0.0)]);
        let field = ParticleField::from_particles(&config(), 64.0, 32.0, particles).unwrap();
        let snap = field.snapshot();
        assert_eq!((snap.width, snap.height), (64.0, 32.0));
        assert_eq!(snap.particles.len(), 2);
        assert_eq!(snap.connections.len(), 1);
        let v = serde_json::to_value(&snap).unwrap();
        assert_eq!(v["particles"][1]["position"][0], 10.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn positions_stay_within_one_increment_of_bounds(
                seed: u64,
                width in 1.0_f64..500.0,
                height in 1.0_f64..500.0,
                speed in 0.0_f64..20.0,
                steps in 0_usize..400,
            ) {
                let cfg = ParticleConfig { speed, ..ParticleConfig::default() };
                let mut field = ParticleField::new(&cfg, 10, width, height, &mut Xorshift64::new(seed)).unwrap();
                for _ in 0..steps {
                    field.step();
                }
                for p in field.particles() {
                    let tol = p.velocity.abs() + DVec2::splat(1e-9);
                    prop_assert!(p.position.x >= -tol.x && p.position.x <= width + tol.x,
                        "x={} width={} vx={}", p.position.x, width, p.velocity.x);
                    prop_assert!(p.position.y >= -tol.y && p.position.y <= height + tol.y,
                        "y={} height={} vy={}", p.position.y, height, p.velocity.y);
                }
            }

            #[test]
            fn alpha_decreases_with_distance(
                d1 in 0.0_f64..200.0,
                d2 in 0.0_f64..200.0,
                threshold in 1.0_f64..200.0,
                opacity in 0.0_f64..1.0,
            ) {
                let (near, far) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
                let a_near = connection_alpha(near, threshold, opacity);
                let a_far = connection_alpha(far, threshold, opacity);
                prop_assert!(a_near >= a_far);
                prop_assert!(a_far >= 0.0 && a_near <= opacity);
            }
        }
    }
}
