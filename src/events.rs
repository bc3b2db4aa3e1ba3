//! Discrete notifications produced by a tick.
//!
//! Animation, audio and effects code consume these instead of polling
//! contact flags. The world writes into any [`EventSink`]; [`EventLog`] is
//! the buffering sink it owns by default.
use glam::Vec2;

use crate::actor::ActorId;
use crate::hook::BreakReason;
use crate::projectile::ProjectileId;
use crate::tile::TileKind;

/// Side of an actor a wall was hit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallSide {
    /// The wall is to the actor's left.
    Left,
    /// The wall is to the actor's right.
    Right,
}

/// Something that happened during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhysicsEvent {
    /// The actor landed after being airborne.
    Grounded {
        /// Actor that landed.
        actor: ActorId,
    },
    /// The actor stopped standing on anything.
    LeftGround {
        /// Actor that left the ground.
        actor: ActorId,
    },
    /// Horizontal motion was stopped by a wall.
    HitWall {
        /// Actor that hit the wall.
        actor: ActorId,
        /// Side the wall is on.
        side: WallSide,
    },
    /// A breakable tile was worn down to nothing.
    TileDestroyed {
        /// Row-major cell index.
        cell: usize,
        /// Centre of the cleared cell.
        position: Vec2,
    },
    /// The actor's hurt box touched a hazard tile and took damage.
    HazardContact {
        /// Actor that was hurt.
        actor: ActorId,
        /// Hazard kind that was touched.
        kind: TileKind,
        /// Damage applied.
        damage: u32,
    },
    /// A projectile struck an actor.
    ActorHit {
        /// Actor that was struck.
        actor: ActorId,
        /// Projectile responsible.
        projectile: ProjectileId,
        /// Damage applied.
        damage: u32,
    },
    /// The actor's hit points reached zero. Fires once per death.
    Died {
        /// Actor that died.
        actor: ActorId,
    },
    /// The actor's hook latched onto a tile.
    HookAnchored {
        /// Hook owner.
        actor: ActorId,
        /// Anchor point.
        anchor: Vec2,
    },
    /// The actor's hook let go.
    HookBroken {
        /// Hook owner.
        actor: ActorId,
        /// Why it let go.
        reason: BreakReason,
    },
    /// The actor's hook projectile found nothing to grab.
    HookMissed {
        /// Hook owner.
        actor: ActorId,
    },
}

/// Receiver for [`PhysicsEvent`]s.
pub trait EventSink {
    /// Accepts one event.
    fn emit(&mut self, event: PhysicsEvent);
}

/// Ordered buffer of events awaiting a consumer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    events: Vec<PhysicsEvent>,
}

impl EventLog {
    /// Appends one event.
    pub fn push(&mut self, event: PhysicsEvent) {
        self.events.push(event);
    }

    /// Appends several events in order.
    pub fn extend<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = PhysicsEvent>,
    {
        self.events.extend(events);
    }

    /// Removes and yields every buffered event, oldest first.
    pub fn drain(&mut self) -> std::vec::Drain<'_, PhysicsEvent> {
        self.events.drain(..)
    }

    /// Buffered events, oldest first.
    #[must_use]
    pub fn as_slice(&self) -> &[PhysicsEvent] {
        &self.events
    }

    /// Number of buffered events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: PhysicsEvent) {
        self.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn destroyed(cell: usize) -> PhysicsEvent {
        PhysicsEvent::TileDestroyed {
            cell,
            position: Vec2::ZERO,
        }
    }

    #[rstest]
    fn drain_empties_in_order() {
        let mut log = EventLog::default();
        assert!(log.is_empty());
        log.emit(destroyed(1));
        log.extend([destroyed(2), destroyed(3)]);
        assert_eq!(log.len(), 3);
        let drained: Vec<_> = log.drain().collect();
        assert_eq!(drained, vec![destroyed(1), destroyed(2), destroyed(3)]);
        assert!(log.is_empty());
    }
}
