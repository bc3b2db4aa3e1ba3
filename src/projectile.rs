//! Bullets and grapple hooks in flight.
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::actor::{ActorId, Team};
use crate::body::Body;
use crate::shape::{Shape, ShapeLayout};

slotmap::new_key_type! {
    /// Handle to a projectile in a [`World`](crate::world::World).
    pub struct ProjectileId;
}

/// What a projectile does when it lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectileKind {
    /// Damages actors and wears down breakable tiles.
    Bullet,
    /// Anchors its owner's grapple hook to a hookable tile.
    Hook,
}

/// Fixed properties of a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileStats {
    /// Damage dealt to actors.
    pub base_damage: u32,
    /// Passes through tiles without wearing or stopping on them.
    pub transcendent: bool,
    /// Survives hitting an actor.
    pub persistent: bool,
    /// Ticks before the projectile expires.
    pub lifespan: u32,
}

impl Default for ProjectileStats {
    fn default() -> Self {
        Self {
            base_damage: 1,
            transcendent: false,
            persistent: false,
            lifespan: 120,
        }
    }
}

/// A projectile in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    /// Behaviour tag.
    pub kind: ProjectileKind,
    /// Fixed properties.
    pub stats: ProjectileStats,
    /// Side that fired it.
    pub team: Team,
    /// Actor that fired it; may have died since.
    pub owner: ActorId,
    /// Kinematic state.
    pub body: Body,
    /// Collision boxes.
    pub shape: Shape,
    /// Ticks left in flight.
    pub remaining: u32,
    destroyed: bool,
}

impl Projectile {
    /// Creates a projectile moving at `velocity` with its boxes synced.
    #[must_use]
    pub fn new(
        kind: ProjectileKind,
        stats: ProjectileStats,
        owner: ActorId,
        team: Team,
        mut body: Body,
        layout: ShapeLayout,
        velocity: Vec2,
    ) -> Self {
        body.velocity = velocity;
        let mut shape = Shape::new(layout);
        shape.sync(&body);
        Self {
            kind,
            stats,
            team,
            owner,
            body,
            shape,
            remaining: stats.lifespan,
            destroyed: false,
        }
    }

    /// Flags the projectile for removal at the end of the tick.
    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    /// Whether the projectile has hit something or expired.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed || self.remaining == 0
    }

    /// Integrates one step and counts down the lifespan.
    pub fn integrate(&mut self, dt: f32) {
        self.body.integrate(dt, false);
        self.shape.sync(&self.body);
        self.remaining = self.remaining.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::PhysicsParams;
    use rstest::rstest;
    use slotmap::SlotMap;

    #[rstest]
    fn projectiles_expire_after_their_lifespan() {
        let body = Body::new(&PhysicsParams {
            ground_friction: Vec2::ONE,
            air_friction: Vec2::ONE,
            ..PhysicsParams::default()
        })
        .expect("valid params");
        let stats = ProjectileStats {
            lifespan: 3,
            ..ProjectileStats::default()
        };
        let owner = SlotMap::<ActorId, ()>::with_key().insert(());
        let mut bolt = Projectile::new(
            ProjectileKind::Bullet,
            stats,
            owner,
            Team::Player,
            body,
            ShapeLayout::uniform(Vec2::splat(4.0)),
            Vec2::new(2.0, 0.0),
        );
        for _ in 0..3 {
            assert!(!bolt.is_destroyed());
            bolt.integrate(1.0);
        }
        assert!(bolt.is_destroyed());
        assert_eq!(bolt.body.position, Vec2::new(6.0, 0.0));
    }
}
