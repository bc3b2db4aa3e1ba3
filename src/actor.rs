//! Players and enemies: a body, its shape, health and input intent.
//!
//! Kinds differ only through the small capability checks on [`ActorKind`];
//! the tick loop treats every actor the same way otherwise.
use glam::Vec2;

use crate::body::Body;
use crate::health::Health;
use crate::hook::GrappleHook;
use crate::params::HookParams;
use crate::shape::{Shape, ShapeLayout};

slotmap::new_key_type! {
    /// Handle to an actor in a [`World`](crate::world::World).
    pub struct ActorId;
}

/// Side an entity fights for. Projectiles never hurt their own team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    /// The player and anything they fire.
    Player,
    /// Hostiles and anything they fire.
    Enemy,
}

/// Behaviour tag of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorKind {
    /// The controllable character.
    Player,
    /// A hostile.
    Enemy,
}

impl ActorKind {
    /// Team the actor belongs to.
    #[must_use]
    pub const fn team(self) -> Team {
        match self {
            Self::Player => Team::Player,
            Self::Enemy => Team::Enemy,
        }
    }

    /// Whether spike tiles hurt this kind.
    #[must_use]
    pub const fn takes_hazard_damage(self) -> bool {
        matches!(self, Self::Player)
    }

    /// Whether this kind may fire grapple hooks.
    #[must_use]
    pub const fn can_grapple(self) -> bool {
        matches!(self, Self::Player)
    }
}

/// Per-tick requests from whatever is driving an actor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Intent {
    /// Force applied at the start of the tick.
    pub force: Vec2,
    /// Horizontal steering in `[-1, 1]`, also fed to an anchored hook.
    pub horizontal: f32,
    /// Whether the hook button is held.
    pub hook_held: bool,
    /// Whether the hook button was released this tick.
    pub hook_released: bool,
}

/// A player or enemy.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    /// Behaviour tag.
    pub kind: ActorKind,
    /// Kinematic state.
    pub body: Body,
    /// Collision boxes.
    pub shape: Shape,
    /// Hit points.
    pub health: Health,
    /// Grapple hook, idle unless the kind can grapple.
    pub hook: GrappleHook,
    /// Input for the current tick.
    pub intent: Intent,
    pub(crate) death_reported: bool,
}

impl Actor {
    /// Places a new actor with its boxes synced to `body`.
    #[must_use]
    pub fn new(
        kind: ActorKind,
        body: Body,
        layout: ShapeLayout,
        health: Health,
        hook: HookParams,
    ) -> Self {
        let mut shape = Shape::new(layout);
        shape.sync(&body);
        Self {
            kind,
            body,
            shape,
            health,
            hook: GrappleHook::new(hook),
            intent: Intent::default(),
            death_reported: false,
        }
    }

    /// Team the actor belongs to.
    #[must_use]
    pub const fn team(&self) -> Team {
        self.kind.team()
    }

    /// Whether the actor is standing on something this tick.
    #[must_use]
    pub const fn grounded(&self) -> bool {
        self.shape.grounded()
    }

    /// Teleports the actor, dropping all motion.
    pub fn respawn(&mut self, position: Vec2) {
        self.body.set_position(position);
        self.body.zero();
        self.shape.sync(&self.body);
        self.health.reset();
        self.death_reported = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::PhysicsParams;
    use rstest::rstest;

    #[rstest]
    #[case(ActorKind::Player, Team::Player, true, true)]
    #[case(ActorKind::Enemy, Team::Enemy, false, false)]
    fn capabilities_follow_kind(
        #[case] kind: ActorKind,
        #[case] team: Team,
        #[case] hazards: bool,
        #[case] grapples: bool,
    ) {
        assert_eq!(kind.team(), team);
        assert_eq!(kind.takes_hazard_damage(), hazards);
        assert_eq!(kind.can_grapple(), grapples);
    }

    #[rstest]
    fn respawn_clears_motion_and_health() {
        let body = Body::new(&PhysicsParams::default()).expect("valid params");
        let mut actor = Actor::new(
            ActorKind::Player,
            body,
            ShapeLayout::uniform(Vec2::splat(16.0)),
            Health::new(4, 10),
            HookParams::default(),
        );
        actor.body.velocity = Vec2::new(5.0, 5.0);
        actor.health.inflict(3);
        actor.respawn(Vec2::new(64.0, 32.0));
        assert_eq!(actor.body.position, Vec2::new(64.0, 32.0));
        assert_eq!(actor.body.velocity, Vec2::ZERO);
        assert_eq!(actor.shape.bounding_box.position, Vec2::new(64.0, 32.0));
        assert_eq!(actor.health.hp(), 4);
    }
}
