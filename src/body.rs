//! Per-entity kinematic state and the fixed-step integrator.
//!
//! A [`Body`] is owned by exactly one entity and only ever mutated by that
//! entity's update or by the collision resolver acting on its behalf. The
//! integrator is pure `f32` arithmetic over the body's own fields, so the same
//! sequence of forces and step count always reproduces the same state bit for
//! bit.
use std::collections::VecDeque;

use glam::Vec2;
use log::warn;

use crate::constants::ACCELERATION_SAMPLE_SIZE;
use crate::error::ConfigError;
use crate::params::PhysicsParams;

/// Bounded rolling record of per-axis acceleration samples.
///
/// The oldest sample is evicted once `capacity` is reached.
#[derive(Debug, Clone, PartialEq)]
pub struct AccelerationHistory {
    x: VecDeque<f32>,
    y: VecDeque<f32>,
    capacity: usize,
}

impl AccelerationHistory {
    /// Creates an empty history holding at most `capacity` samples per axis.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            x: VecDeque::with_capacity(capacity),
            y: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records one sample, evicting the oldest when full.
    pub fn push(&mut self, sample: Vec2) {
        if self.capacity == 0 {
            return;
        }
        if self.x.len() == self.capacity {
            self.x.pop_front();
            self.y.pop_front();
        }
        self.x.push_back(sample.x);
        self.y.push_back(sample.y);
    }

    /// Number of samples held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns whether no sample has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Maximum capacity per axis.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Largest absolute sample seen on each axis.
    #[must_use]
    pub fn peak(&self) -> Vec2 {
        let peak = |samples: &VecDeque<f32>| samples.iter().fold(0.0_f32, |m, s| m.max(s.abs()));
        Vec2::new(peak(&self.x), peak(&self.y))
    }

    /// Most recent sample, if any.
    #[must_use]
    pub fn latest(&self) -> Option<Vec2> {
        Some(Vec2::new(*self.x.back()?, *self.y.back()?))
    }

    /// Drops every sample.
    pub fn clear(&mut self) {
        self.x.clear();
        self.y.clear();
    }
}

impl Default for AccelerationHistory {
    fn default() -> Self {
        Self::new(ACCELERATION_SAMPLE_SIZE)
    }
}

/// Kinematic state of one dynamic entity.
///
/// The coordinate system is screen space: `+y` points down, so a positive
/// `gravity` pulls bodies towards the floor.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Top-left corner of the body's primary box.
    pub position: Vec2,
    /// Displacement per unit step.
    pub velocity: Vec2,
    /// Accumulated forces divided by mass for the current step.
    pub acceleration: Vec2,
    /// Change in acceleration between the last two steps.
    pub jerk: Vec2,
    /// Position before the last integration.
    pub previous_position: Vec2,
    /// Velocity before the last integration.
    pub previous_velocity: Vec2,
    /// Acceleration consumed by the last integration.
    pub previous_acceleration: Vec2,
    /// Per-axis velocity multiplier while grounded.
    pub ground_friction: Vec2,
    /// Per-axis velocity multiplier while airborne.
    pub air_friction: Vec2,
    /// Divides applied forces.
    pub mass: f32,
    /// Downward pull added each step.
    pub gravity: f32,
    /// Component-wise velocity clamp.
    pub maximum_velocity: Vec2,
    history: AccelerationHistory,
}

impl Body {
    /// Builds a body at the origin from validated tuning.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when `params` carries NaN values, a
    /// non-positive mass or maximum velocity, or friction outside `[0, 1]`.
    ///
    /// # Examples
    /// ```
    /// use tilebound::{Body, PhysicsParams};
    /// let body = Body::new(&PhysicsParams::default()).unwrap();
    /// assert_eq!(body.velocity, glam::Vec2::ZERO);
    ///
    /// let broken = PhysicsParams { mass: 0.0, ..PhysicsParams::default() };
    /// assert!(Body::new(&broken).is_err());
    /// ```
    pub fn new(params: &PhysicsParams) -> Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            jerk: Vec2::ZERO,
            previous_position: Vec2::ZERO,
            previous_velocity: Vec2::ZERO,
            previous_acceleration: Vec2::ZERO,
            ground_friction: params.ground_friction,
            air_friction: params.air_friction,
            mass: params.mass,
            gravity: params.gravity,
            maximum_velocity: params.maximum_velocity,
            history: AccelerationHistory::default(),
        })
    }

    /// Returns the body teleported to `position`.
    #[must_use]
    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self.previous_position = position;
        self
    }

    /// Moves the body without leaving an interpolation trail.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.previous_position = position;
    }

    /// Accumulates `force` into this step's acceleration.
    ///
    /// Non-finite forces are ignored with a warning so one bad input cannot
    /// poison the simulation.
    pub fn apply_force(&mut self, force: Vec2) {
        if !force.is_finite() {
            warn!("ignoring non-finite force {force}");
            return;
        }
        self.acceleration += force / self.mass;
    }

    /// Applies `magnitude` along `angle` (radians, measured from `+x`
    /// towards `+y`).
    pub fn apply_force_at_angle(&mut self, magnitude: f32, angle: f32) {
        self.apply_force(Vec2::new(angle.cos(), angle.sin()) * magnitude);
    }

    /// Advances the body by one fixed step of length `dt`.
    ///
    /// Gravity is folded into the acceleration, the carried-over velocity is
    /// damped by the friction for the current contact state, the step's
    /// acceleration is added, and the result is clamped component-wise to
    /// `±maximum_velocity` before moving the position. Acceleration is left in
    /// place for the collision step to read; call [`Body::clear_forces`] once
    /// it has been consumed.
    pub fn integrate(&mut self, dt: f32, grounded: bool) {
        self.previous_position = self.position;
        self.previous_velocity = self.velocity;

        self.acceleration.y += self.gravity;
        let friction = if grounded {
            self.ground_friction
        } else {
            self.air_friction
        };
        let unclamped = self.velocity * friction + self.acceleration * dt;
        self.velocity = unclamped.clamp(-self.maximum_velocity, self.maximum_velocity);
        self.position += self.velocity * dt;

        self.jerk = self.acceleration - self.previous_acceleration;
        self.previous_acceleration = self.acceleration;
        self.history.push(self.acceleration);
    }

    /// Drops forces consumed by the current step.
    pub fn clear_forces(&mut self) {
        self.acceleration = Vec2::ZERO;
    }

    /// Resets every kinematic quantity except position.
    ///
    /// Used on respawn and teleport, and when a hook pull would drag the body
    /// into solid geometry.
    pub fn zero(&mut self) {
        self.velocity = Vec2::ZERO;
        self.acceleration = Vec2::ZERO;
        self.jerk = Vec2::ZERO;
        self.previous_velocity = Vec2::ZERO;
        self.previous_acceleration = Vec2::ZERO;
        self.previous_position = self.position;
        self.history.clear();
    }

    /// Sets ground and air friction to the same value.
    pub fn set_constant_friction(&mut self, friction: Vec2) {
        self.ground_friction = friction;
        self.air_friction = friction;
    }

    /// Position blended between the last two steps for rendering.
    #[must_use]
    pub fn interpolated_position(&self, alpha: f32) -> Vec2 {
        self.previous_position
            .lerp(self.position, alpha.clamp(0.0, 1.0))
    }

    /// Rolling acceleration history.
    #[must_use]
    pub const fn history(&self) -> &AccelerationHistory {
        &self.history
    }

    /// Returns whether the latest acceleration sample exceeds `threshold` on
    /// either axis, used to detect hard impacts.
    #[must_use]
    pub fn is_impacting(&self, threshold: f32) -> bool {
        self.history
            .latest()
            .is_some_and(|sample| sample.abs().max_element() > threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn falling() -> Body {
        Body::new(&PhysicsParams {
            gravity: 0.3,
            ground_friction: Vec2::splat(0.85),
            air_friction: Vec2::splat(0.85),
            maximum_velocity: Vec2::new(4.0, 6.0),
            mass: 2.0,
        })
        .expect("valid params")
    }

    #[rstest]
    fn gravity_adds_one_step_of_velocity_from_rest(mut falling: Body) {
        falling.integrate(1.0, true);
        assert_relative_eq!(falling.velocity.y, 0.3);
        assert_relative_eq!(falling.position.y, 0.3);
    }

    #[rstest]
    fn forces_are_divided_by_mass(mut falling: Body) {
        falling.apply_force(Vec2::new(2.0, 0.0));
        assert_relative_eq!(falling.acceleration.x, 1.0);
    }

    #[rstest]
    fn force_at_angle_decomposes(mut falling: Body) {
        falling.apply_force_at_angle(4.0, std::f32::consts::FRAC_PI_2);
        assert_relative_eq!(falling.acceleration.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(falling.acceleration.y, 2.0, epsilon = 1e-6);
    }

    #[rstest]
    fn non_finite_forces_are_ignored(mut falling: Body) {
        falling.apply_force(Vec2::new(f32::NAN, 1.0));
        assert_eq!(falling.acceleration, Vec2::ZERO);
    }

    #[rstest]
    fn velocity_is_clamped_after_integration(mut falling: Body) {
        for _ in 0..50 {
            falling.apply_force(Vec2::new(100.0, -100.0));
            falling.integrate(1.0, false);
            falling.clear_forces();
            assert!(falling.velocity.x.abs() <= falling.maximum_velocity.x);
            assert!(falling.velocity.y.abs() <= falling.maximum_velocity.y);
        }
        assert_relative_eq!(falling.velocity.x, 4.0);
        assert_relative_eq!(falling.velocity.y, -6.0);
    }

    #[rstest]
    fn friction_depends_on_contact_state() {
        let mut body = Body::new(&PhysicsParams {
            ground_friction: Vec2::splat(0.5),
            air_friction: Vec2::splat(1.0),
            ..PhysicsParams::default()
        })
        .expect("valid params");
        body.velocity = Vec2::new(2.0, 0.0);
        body.integrate(1.0, true);
        assert_relative_eq!(body.velocity.x, 1.0);
        body.integrate(1.0, false);
        assert_relative_eq!(body.velocity.x, 1.0);
    }

    #[rstest]
    fn jerk_tracks_acceleration_changes(mut falling: Body) {
        falling.apply_force(Vec2::new(2.0, 0.0));
        falling.integrate(1.0, false);
        falling.clear_forces();
        assert_relative_eq!(falling.jerk.x, 1.0);
        falling.integrate(1.0, false);
        assert_relative_eq!(falling.jerk.x, -1.0);
    }

    #[rstest]
    fn zero_keeps_position_only(mut falling: Body) {
        falling.apply_force(Vec2::new(1.0, 1.0));
        falling.integrate(1.0, false);
        let position = falling.position;
        falling.zero();
        assert_eq!(falling.position, position);
        assert_eq!(falling.previous_position, position);
        assert_eq!(falling.velocity, Vec2::ZERO);
        assert_eq!(falling.acceleration, Vec2::ZERO);
        assert!(falling.history().is_empty());
    }

    #[rstest]
    fn history_is_bounded() {
        let mut history = AccelerationHistory::new(3);
        for step in 0..5_u8 {
            history.push(Vec2::splat(f32::from(step)));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.latest(), Some(Vec2::splat(4.0)));
        assert_relative_eq!(history.peak().x, 4.0);
    }

    #[rstest]
    fn default_history_uses_sample_size(falling: Body) {
        assert_eq!(falling.history().capacity(), ACCELERATION_SAMPLE_SIZE);
    }

    #[rstest]
    fn impacts_read_latest_sample(mut falling: Body) {
        falling.apply_force(Vec2::new(0.0, 20.0));
        falling.integrate(1.0, false);
        assert!(falling.is_impacting(5.0));
        falling.clear_forces();
        falling.integrate(1.0, false);
        assert!(!falling.is_impacting(5.0));
    }

    #[rstest]
    fn interpolation_blends_last_two_positions(mut falling: Body) {
        falling.velocity = Vec2::new(2.0, 0.0);
        falling.gravity = 0.0;
        falling.set_constant_friction(Vec2::ONE);
        falling.integrate(1.0, false);
        assert_relative_eq!(falling.interpolated_position(0.5).x, 1.0);
    }
}
