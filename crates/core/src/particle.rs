//! A single bouncing point of the hero background.

use crate::prng::Xorshift64;
use crate::surface::Surface;
use glam::DVec2;
use serde::Serialize;

/// One particle: position, velocity and a radius fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Particle {
    pub position: DVec2,
    pub velocity: DVec2,
    pub radius: f64,
}

impl Particle {
    /// Creates a particle with explicit state.
    pub fn new(position: DVec2, velocity: DVec2, radius: f64) -> Self {
        Self {
            position,
            velocity,
            radius,
        }
    }

    /// Spawns a particle uniformly inside `bounds` with velocity components in
    /// `[-speed/2, speed/2)` and radius in `[min_radius, max_radius)`.
    pub fn spawn(
        rng: &mut Xorshift64,
        bounds: DVec2,
        speed: f64,
        min_radius: f64,
        max_radius: f64,
    ) -> Self {
        let position = DVec2::new(rng.next_f64() * bounds.x, rng.next_f64() * bounds.y);
        let velocity = DVec2::new(rng.next_centered(speed), rng.next_centered(speed));
        let radius = rng.next_range(min_radius, max_radius);
        Self::new(position, velocity, radius)
    }

    /// Moves by one velocity increment, then reverses each velocity component
    /// whose coordinate landed outside `[0, bound]`.
    ///
    /// The check happens after displacement, so a particle may sit one step
    /// past an edge until the next update carries it back.
    pub fn update(&mut self, bounds: DVec2) {
        self.position += self.velocity;
        if self.position.x < 0.0 || self.position.x > bounds.x {
            self.velocity.x = -self.velocity.x;
        }
        if self.position.y < 0.0 || self.position.y > bounds.y {
            self.velocity.y = -self.velocity.y;
        }
    }

    /// Draws the particle as a filled circle using the surface's current fill.
    pub fn draw(&self, surface: &mut dyn Surface) {
        surface.fill_circle(self.position.x, self.position.y, self.radius);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    const BOUNDS: DVec2 = DVec2::new(100.0, 100.0);

    #[test]
    fn update_moves_by_velocity() {
        let mut p = Particle::new(DVec2::new(10.0, 20.0), DVec2::new(1.5, -0.5), 1.0);
        p.update(BOUNDS);
        assert_eq!(p.position, DVec2::new(11.5, 19.5));
        assert_eq!(p.velocity, DVec2::new(1.5, -0.5));
    }

    #[test]
    fn crossing_right_edge_overshoots_then_returns() {
        let mut p = Particle::new(DVec2::new(99.0, 50.0), DVec2::new(2.0, 0.0), 1.0);
        p.update(BOUNDS);
        assert_eq!(p.position.x, 101.0);
        assert_eq!(p.velocity.x, -2.0);
        p.update(BOUNDS);
        assert_eq!(p.position.x, 99.0);
        assert_eq!(p.velocity.x, -2.0);
    }

    #[test]
    fn crossing_top_edge_flips_vy_only() {
        let mut p = Particle::new(DVec2::new(50.0, 0.2), DVec2::new(0.3, -0.5), 1.0);
        p.update(BOUNDS);
        assert!(p.position.y < 0.0);
        assert_eq!(p.velocity, DVec2::new(0.3, 0.5));
    }

    #[test]
    fn landing_exactly_on_edge_does_not_flip() {
        let mut p = Particle::new(DVec2::new(98.0, 50.0), DVec2::new(2.0, 0.0), 1.0);
        p.update(BOUNDS);
        assert_eq!(p.position.x, 100.0);
        assert_eq!(p.velocity.x, 2.0);
    }

    #[test]
    fn spawn_respects_ranges() {
        let mut rng = Xorshift64::new(11);
        for _ in 0..200 {
            let p = Particle::spawn(&mut rng, DVec2::new(640.0, 480.0), 0.5, 1.0, 2.0);
            assert!((0.0..640.0).contains(&p.position.x));
            assert!((0.0..480.0).contains(&p.position.y));
            assert!(p.velocity.x.abs() <= 0.25 && p.velocity.y.abs() <= 0.25);
            assert!((1.0..2.0).contains(&p.radius));
        }
    }

    #[test]
    fn draw_emits_one_circle() {
        let p = Particle::new(DVec2::new(3.0, 4.0), DVec2::ZERO, 1.5);
        let mut rec = RecordingSurface::new(10.0, 10.0);
        p.draw(&mut rec);
        assert_eq!(
            rec.commands(),
            &[DrawCommand::Circle {
                x: 3.0,
                y: 4.0,
                radius: 1.5
            }]
        );
    }
}
