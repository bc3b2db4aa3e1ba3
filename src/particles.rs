//! Debris thrown off by shattered tiles.
//!
//! Particles are ordinary [`Body`]/[`Shape`] pairs with a lifespan. They take
//! part in tile collision only to bounce; nothing they do feeds back into
//! gameplay.
use std::f32::consts::TAU;

use glam::Vec2;

use crate::body::Body;
use crate::params::DebrisParams;
use crate::random::SeededRandom;
use crate::shape::{Shape, ShapeLayout};

/// One piece of debris.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Kinematic state.
    pub body: Body,
    /// Collision boxes.
    pub shape: Shape,
    /// Ticks left before the particle disappears.
    pub lifespan: u32,
}

impl Particle {
    /// Pushes the particle out of a tile by `mtv` and reflects it.
    ///
    /// Acceleration is reversed outright; velocity is reversed on the axis
    /// the push runs along, vertical on a tie.
    pub fn bounce(&mut self, mtv: Vec2) {
        self.body.position += mtv;
        self.body.acceleration = -self.body.acceleration;
        if mtv.x.abs() > mtv.y.abs() {
            self.body.velocity.x = -self.body.velocity.x;
        } else {
            self.body.velocity.y = -self.body.velocity.y;
        }
        self.shape.sync(&self.body);
    }
}

/// A burst of particles released from one point.
#[derive(Debug, Clone, PartialEq)]
pub struct Emitter {
    origin: Vec2,
    particles: Vec<Particle>,
}

impl Emitter {
    /// Releases `params.particles` particles at `origin`.
    ///
    /// Each particle starts as a copy of `template`, receives `inherited` as
    /// a force and is flung in a random direction. Direction, force and
    /// lifespan are drawn from `rng`.
    pub fn burst(
        origin: Vec2,
        inherited: Vec2,
        template: &Body,
        params: &DebrisParams,
        rng: &mut SeededRandom,
    ) -> Self {
        let layout = ShapeLayout::uniform(Vec2::splat(params.size));
        let corner = origin - layout.dimensions * 0.5;
        let particles = (0..params.particles)
            .map(|_| {
                let mut body = template.clone().with_position(corner);
                body.apply_force(inherited);
                let angle = rng.next_range(0.0, TAU);
                let force = params.force * rng.next_range(0.5, 1.5);
                body.apply_force_at_angle(force, angle);
                let lifespan = (params.lifespan_ticks / 2)
                    .saturating_add(rng.next_u32() % params.lifespan_ticks.max(1));
                let mut shape = Shape::new(layout);
                shape.sync(&body);
                Particle {
                    body,
                    shape,
                    lifespan,
                }
            })
            .collect();
        Self { origin, particles }
    }

    /// Point the burst was released from.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Live particles.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access to live particles.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Integrates every particle by one step and ages it.
    pub fn integrate(&mut self, dt: f32) {
        for particle in &mut self.particles {
            particle.body.integrate(dt, false);
            particle.shape.sync(&particle.body);
            particle.lifespan = particle.lifespan.saturating_sub(1);
        }
    }

    /// Drops consumed forces and expired particles.
    pub fn retire(&mut self) {
        for particle in &mut self.particles {
            particle.body.clear_forces();
        }
        self.particles.retain(|particle| particle.lifespan > 0);
    }

    /// Returns whether every particle has expired.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
