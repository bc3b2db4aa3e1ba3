//! Hit points with a post-hit invincibility window.
use log::debug;

/// Result of an attempt to inflict damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Invincibility was running or the owner was already dead.
    Ignored,
    /// Damage landed and the owner survived.
    Wounded {
        /// Hit points left.
        remaining: u32,
    },
    /// Damage landed and brought hit points to zero.
    Killed,
}

/// Hit points of one actor.
///
/// A successful hit starts an invincibility window; further hits are ignored
/// until it has elapsed. `taken_point` trails the current value so a HUD can
/// show recently lost health draining away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Health {
    hp: u32,
    max_hp: u32,
    invincibility_ticks: u32,
    invincible_for: u32,
    taken_point: u32,
}

impl Health {
    /// Full health with the given invincibility window.
    #[must_use]
    pub const fn new(max_hp: u32, invincibility_ticks: u32) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            invincibility_ticks,
            invincible_for: 0,
            taken_point: max_hp,
        }
    }

    /// Current hit points.
    #[must_use]
    pub const fn hp(&self) -> u32 {
        self.hp
    }

    /// Maximum hit points.
    #[must_use]
    pub const fn max_hp(&self) -> u32 {
        self.max_hp
    }

    /// Trailing hit point value for damage display.
    #[must_use]
    pub const fn taken_point(&self) -> u32 {
        self.taken_point
    }

    /// Whether hits are currently ignored.
    #[must_use]
    pub const fn is_invincible(&self) -> bool {
        self.invincible_for > 0
    }

    /// Whether hit points have reached zero.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.hp == 0
    }

    /// Applies `amount` damage unless invincible or dead.
    pub fn inflict(&mut self, amount: u32) -> HitOutcome {
        if self.is_invincible() || self.is_dead() || amount == 0 {
            return HitOutcome::Ignored;
        }
        self.taken_point = self.hp;
        self.hp = self.hp.saturating_sub(amount);
        self.invincible_for = self.invincibility_ticks;
        debug!("took {amount} damage, {} hp left", self.hp);
        if self.is_dead() {
            HitOutcome::Killed
        } else {
            HitOutcome::Wounded { remaining: self.hp }
        }
    }

    /// Restores up to `amount` hit points, never past the maximum.
    pub fn heal(&mut self, amount: u32) {
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
        self.taken_point = self.taken_point.max(self.hp);
    }

    /// Restores full health and ends invincibility.
    pub fn reset(&mut self) {
        self.hp = self.max_hp;
        self.taken_point = self.max_hp;
        self.invincible_for = 0;
    }

    /// Advances the invincibility window and the trailing display value by
    /// one tick.
    pub fn tick(&mut self) {
        self.invincible_for = self.invincible_for.saturating_sub(1);
        if self.taken_point > self.hp {
            self.taken_point -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn health() -> Health {
        Health::new(8, 3)
    }

    #[rstest]
    fn hits_during_invincibility_are_ignored(mut health: Health) {
        assert_eq!(health.inflict(2), HitOutcome::Wounded { remaining: 6 });
        assert_eq!(health.inflict(2), HitOutcome::Ignored);
        for _ in 0..3 {
            health.tick();
        }
        assert_eq!(health.inflict(2), HitOutcome::Wounded { remaining: 4 });
    }

    #[rstest]
    fn lethal_damage_kills_once(mut health: Health) {
        assert_eq!(health.inflict(64), HitOutcome::Killed);
        assert!(health.is_dead());
        for _ in 0..3 {
            health.tick();
        }
        assert_eq!(health.inflict(1), HitOutcome::Ignored);
    }

    #[rstest]
    fn healing_is_capped(mut health: Health) {
        health.inflict(5);
        health.heal(100);
        assert_eq!(health.hp(), 8);
    }

    #[rstest]
    fn taken_point_drains_towards_hp(mut health: Health) {
        health.inflict(2);
        assert_eq!(health.taken_point(), 8);
        health.tick();
        assert_eq!(health.taken_point(), 7);
        health.tick();
        health.tick();
        assert_eq!(health.taken_point(), 6);
    }

    #[rstest]
    fn reset_restores_everything(mut health: Health) {
        health.inflict(8);
        health.reset();
        assert_eq!(health.hp(), 8);
        assert!(!health.is_invincible());
    }
}
