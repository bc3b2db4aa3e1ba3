//! Grapple hook: a damped spring hung from a tile, pulling its owner along.
//!
//! The hook's lifecycle is an explicit table over [`HookState`] and
//! [`HookEvent`]; every state change goes through [`transition`], so an event
//! that makes no sense in the current state is simply rejected. While
//! anchored, the spring's bob is the candidate position for the owner's
//! centre. The candidate is validated against the level before the owner is
//! moved, and a bob that strays beyond the safety distance from the owner
//! breaks the hook in the same tick.
use glam::Vec2;
use log::debug;

use crate::body::Body;
use crate::params::HookParams;
use crate::shape::{Aabb, Shape};

/// Phase of a grapple hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HookState {
    /// Not in use.
    #[default]
    Idle,
    /// A hook projectile is in flight looking for something to grab.
    Probing,
    /// Attached to a tile and pulling the owner.
    Anchored,
    /// Letting go; returns to idle after a short settle period.
    Snaking,
}

/// Inputs that drive the hook's state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookEvent {
    /// A hook projectile was launched.
    Fired,
    /// The projectile touched a hookable tile.
    AnchorFound,
    /// The projectile hit something else or expired.
    Missed,
    /// The owner let go.
    Released,
    /// The bob strayed too far from the owner.
    SafetyExceeded,
    /// The owner stopped holding the hook.
    HoldLost,
    /// The settle period ended.
    Settled,
}

/// Why an anchored hook let go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BreakReason {
    /// Explicit release input.
    Released,
    /// Owner-to-bob distance exceeded the safety threshold.
    SafetyExceeded,
    /// Hold input was no longer present.
    HoldLost,
}

impl From<BreakReason> for HookEvent {
    fn from(reason: BreakReason) -> Self {
        match reason {
            BreakReason::Released => Self::Released,
            BreakReason::SafetyExceeded => Self::SafetyExceeded,
            BreakReason::HoldLost => Self::HoldLost,
        }
    }
}

/// Next state for `event` in `state`, or `None` when the pair is not a
/// legal transition.
///
/// # Examples
/// ```
/// use tilebound::hook::{transition, HookEvent, HookState};
/// assert_eq!(transition(HookState::Idle, HookEvent::Fired), Some(HookState::Probing));
/// assert_eq!(transition(HookState::Snaking, HookEvent::Released), None);
/// ```
#[must_use]
pub const fn transition(state: HookState, event: HookEvent) -> Option<HookState> {
    match (state, event) {
        (HookState::Idle, HookEvent::Fired) => Some(HookState::Probing),
        (HookState::Probing, HookEvent::AnchorFound) => Some(HookState::Anchored),
        (HookState::Probing, HookEvent::Missed) => Some(HookState::Idle),
        (
            HookState::Anchored,
            HookEvent::Released | HookEvent::SafetyExceeded | HookEvent::HoldLost,
        ) => Some(HookState::Snaking),
        (HookState::Snaking, HookEvent::Settled) => Some(HookState::Idle),
        _ => None,
    }
}

/// Damped spring between a fixed anchor and a moving bob.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    /// Fixed end.
    pub anchor: Vec2,
    /// Free end; the owner's centre follows it.
    pub bob: Vec2,
    /// Bob velocity.
    pub velocity: Vec2,
    /// Acceleration accumulated for the next update.
    pub acceleration: Vec2,
    /// Length at which the spring exerts no force.
    pub rest_length: f32,
    /// Stiffness.
    pub spring_constant: f32,
    /// Per-step velocity multiplier.
    pub damping: f32,
}

impl Spring {
    /// Spring at rest between `anchor` and `bob`.
    #[must_use]
    pub fn new(anchor: Vec2, bob: Vec2, spring_constant: f32, damping: f32) -> Self {
        Self {
            anchor,
            bob,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            rest_length: anchor.distance(bob),
            spring_constant,
            damping,
        }
    }

    /// Current anchor-to-bob distance.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.anchor.distance(self.bob)
    }

    /// Advances the bob by one step of length `dt`.
    ///
    /// Hooke's law pulls the bob towards the rest length along the spring
    /// axis; accumulated acceleration is consumed.
    pub fn update(&mut self, dt: f32) {
        let offset = self.bob - self.anchor;
        let length = offset.length();
        if length > f32::EPSILON {
            let extension = length - self.rest_length;
            self.acceleration -= offset / length * (self.spring_constant * extension);
        }
        self.velocity = (self.velocity + self.acceleration * dt) * self.damping;
        self.bob += self.velocity * dt;
        self.acceleration = Vec2::ZERO;
    }
}

/// What an anchored update did to the owner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pull {
    /// The hook was not anchored.
    Inactive,
    /// The owner moved to the spring's bob.
    Moved,
    /// The candidate position hit the level, so the owner was stopped.
    Blocked,
    /// The hook let go this tick.
    Broke(BreakReason),
}

/// Grapple hook owned by one actor.
#[derive(Debug, Clone, PartialEq)]
pub struct GrappleHook {
    state: HookState,
    spring: Option<Spring>,
    settle_ticks: u32,
    params: HookParams,
}

impl GrappleHook {
    /// Idle hook using `params`.
    #[must_use]
    pub const fn new(params: HookParams) -> Self {
        Self {
            state: HookState::Idle,
            spring: None,
            settle_ticks: 0,
            params,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn state(&self) -> HookState {
        self.state
    }

    /// The spring while anchored.
    #[must_use]
    pub const fn spring(&self) -> Option<&Spring> {
        self.spring.as_ref()
    }

    /// Applies `event`, returning whether the state changed.
    pub fn handle(&mut self, event: HookEvent) -> bool {
        let Some(next) = transition(self.state, event) else {
            return false;
        };
        debug!("hook {:?} --{event:?}--> {next:?}", self.state);
        self.state = next;
        match next {
            HookState::Snaking => self.settle_ticks = self.params.snake_ticks,
            HookState::Idle | HookState::Probing => self.spring = None,
            HookState::Anchored => {}
        }
        true
    }

    /// Latches onto `anchor`, folding the owner's motion into the spring so
    /// the attachment adds no impulse.
    pub fn attach(&mut self, anchor: Vec2, owner: &Body, owner_center: Vec2) -> bool {
        if !self.handle(HookEvent::AnchorFound) {
            return false;
        }
        let mut spring = Spring::new(
            anchor,
            owner_center,
            self.params.spring_constant,
            self.params.damping,
        );
        spring.rest_length = self.rest_length_for(owner.position.y, anchor.y);
        spring.velocity += owner.velocity;
        spring.acceleration += owner.acceleration;
        self.spring = Some(spring);
        true
    }

    fn rest_length_for(&self, owner_y: f32, anchor_y: f32) -> f32 {
        (self.params.slack * (owner_y - anchor_y).abs())
            .clamp(self.params.min_length, self.params.max_length)
    }

    /// Lets go for `reason` if anchored.
    pub fn break_free(&mut self, reason: BreakReason) -> bool {
        let broke = self.handle(reason.into());
        if broke {
            debug!("hook broke free: {reason:?}");
        }
        broke
    }

    /// Counts down the settle period, returning to idle when it ends.
    pub fn settle(&mut self) {
        if self.state != HookState::Snaking {
            return;
        }
        self.settle_ticks = self.settle_ticks.saturating_sub(1);
        if self.settle_ticks == 0 {
            self.handle(HookEvent::Settled);
        }
    }

    /// Runs one anchored tick for the owner.
    ///
    /// `blocked` reports whether a box would overlap solid level geometry.
    /// Without `held` the hook breaks with [`BreakReason::HoldLost`].
    pub fn pull(
        &mut self,
        owner: &mut Body,
        shape: &mut Shape,
        held: bool,
        horizontal: f32,
        dt: f32,
        blocked: impl Fn(&Aabb) -> bool,
    ) -> Pull {
        if self.state != HookState::Anchored {
            return Pull::Inactive;
        }
        if !held {
            self.break_free(BreakReason::HoldLost);
            return Pull::Broke(BreakReason::HoldLost);
        }
        let Some(mut spring) = self.spring else {
            self.break_free(BreakReason::HoldLost);
            return Pull::Broke(BreakReason::HoldLost);
        };

        spring.acceleration += owner.acceleration;
        spring.acceleration.x += horizontal;
        spring.update(dt);
        spring.rest_length = self.rest_length_for(owner.position.y, spring.anchor.y);
        self.spring = Some(spring);

        if shape.center().distance(spring.bob) > self.params.safety_distance {
            self.break_free(BreakReason::SafetyExceeded);
            return Pull::Broke(BreakReason::SafetyExceeded);
        }

        let candidate = spring.bob - shape.dimensions() * 0.5;
        if blocked(&shape.predict_at(candidate)) {
            owner.zero();
            shape.sync(owner);
            return Pull::Blocked;
        }
        owner.position = candidate;
        owner.velocity = spring.velocity;
        shape.sync(owner);
        Pull::Moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::PhysicsParams;
    use crate::shape::ShapeLayout;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    const STATES: [HookState; 4] = [
        HookState::Idle,
        HookState::Probing,
        HookState::Anchored,
        HookState::Snaking,
    ];

    #[rstest]
    #[case(HookState::Idle, HookEvent::Fired, Some(HookState::Probing))]
    #[case(HookState::Probing, HookEvent::AnchorFound, Some(HookState::Anchored))]
    #[case(HookState::Probing, HookEvent::Missed, Some(HookState::Idle))]
    #[case(HookState::Anchored, HookEvent::Released, Some(HookState::Snaking))]
    #[case(HookState::Anchored, HookEvent::SafetyExceeded, Some(HookState::Snaking))]
    #[case(HookState::Anchored, HookEvent::HoldLost, Some(HookState::Snaking))]
    #[case(HookState::Snaking, HookEvent::Settled, Some(HookState::Idle))]
    #[case(HookState::Snaking, HookEvent::Released, None)]
    #[case(HookState::Anchored, HookEvent::Fired, None)]
    #[case(HookState::Idle, HookEvent::AnchorFound, None)]
    fn transition_table(
        #[case] state: HookState,
        #[case] event: HookEvent,
        #[case] expected: Option<HookState>,
    ) {
        assert_eq!(transition(state, event), expected);
    }

    #[rstest]
    fn only_idle_accepts_fire() {
        for state in STATES {
            let accepted = transition(state, HookEvent::Fired).is_some();
            assert_eq!(accepted, state == HookState::Idle, "{state:?}");
        }
    }

    #[rstest]
    fn stretched_spring_pulls_back() {
        let mut spring = Spring::new(Vec2::ZERO, Vec2::new(0.0, 50.0), 0.5, 1.0);
        spring.rest_length = 40.0;
        spring.update(1.0);
        assert_relative_eq!(spring.velocity.y, -5.0);
        assert_relative_eq!(spring.bob.y, 45.0);
        assert_eq!(spring.acceleration, Vec2::ZERO);
    }

    #[fixture]
    fn owner() -> (Body, Shape) {
        let body = Body::new(&PhysicsParams::default())
            .expect("valid params")
            .with_position(Vec2::new(95.0, 95.0));
        let mut shape = Shape::new(ShapeLayout::uniform(Vec2::splat(10.0)));
        shape.sync(&body);
        (body, shape)
    }

    fn anchored(body: &Body, shape: &Shape) -> GrappleHook {
        let mut hook = GrappleHook::new(HookParams::default());
        assert!(hook.handle(HookEvent::Fired));
        assert!(hook.attach(Vec2::new(100.0, 20.0), body, shape.center()));
        hook
    }

    #[rstest]
    fn attach_clamps_rest_length(owner: (Body, Shape)) {
        let (body, shape) = owner;
        let hook = anchored(&body, &shape);
        let spring = hook.spring().expect("anchored");
        assert_relative_eq!(spring.rest_length, 0.9 * 75.0);
        assert_eq!(spring.bob, shape.center());
    }

    #[rstest]
    fn releasing_hold_breaks_free(owner: (Body, Shape)) {
        let (mut body, mut shape) = owner;
        let mut hook = anchored(&body, &shape);
        let pull = hook.pull(&mut body, &mut shape, false, 0.0, 1.0, |_| false);
        assert_eq!(pull, Pull::Broke(BreakReason::HoldLost));
        assert_eq!(hook.state(), HookState::Snaking);
    }

    #[rstest]
    fn owner_follows_bob(owner: (Body, Shape)) {
        let (mut body, mut shape) = owner;
        let mut hook = anchored(&body, &shape);
        let pull = hook.pull(&mut body, &mut shape, true, 0.0, 1.0, |_| false);
        assert_eq!(pull, Pull::Moved);
        let bob = hook.spring().expect("anchored").bob;
        assert_relative_eq!(shape.center().x, bob.x, epsilon = 1e-4);
        assert_relative_eq!(shape.center().y, bob.y, epsilon = 1e-4);
    }

    #[rstest]
    fn blocked_pull_zeroes_owner(owner: (Body, Shape)) {
        let (mut body, mut shape) = owner;
        body.velocity = Vec2::new(3.0, 0.0);
        let start = body.position;
        let mut hook = anchored(&body, &shape);
        let pull = hook.pull(&mut body, &mut shape, true, 0.0, 1.0, |_| true);
        assert_eq!(pull, Pull::Blocked);
        assert_eq!(body.position, start);
        assert_eq!(body.velocity, Vec2::ZERO);
        assert_eq!(hook.state(), HookState::Anchored);
    }

    #[rstest]
    fn distant_bob_breaks_in_the_same_tick(owner: (Body, Shape)) {
        let (mut body, mut shape) = owner;
        let mut hook = anchored(&body, &shape);
        body.position = Vec2::new(400.0, 95.0);
        shape.sync(&body);
        let pull = hook.pull(&mut body, &mut shape, true, 0.0, 1.0, |_| false);
        assert_eq!(pull, Pull::Broke(BreakReason::SafetyExceeded));
        assert_eq!(hook.state(), HookState::Snaking);
    }

    #[rstest]
    fn snaking_settles_back_to_idle(owner: (Body, Shape)) {
        let (body, shape) = owner;
        let mut hook = anchored(&body, &shape);
        assert!(hook.break_free(BreakReason::Released));
        assert!(!hook.break_free(BreakReason::Released));
        for _ in 0..HookParams::default().snake_ticks {
            assert_eq!(hook.state(), HookState::Snaking);
            hook.settle();
        }
        assert_eq!(hook.state(), HookState::Idle);
        assert!(hook.spring().is_none());
    }
}
