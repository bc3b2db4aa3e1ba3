//! Tuning parameters loaded from JSON.
//!
//! Bodies and the world are configured from plain `serde` structs so designers
//! can tweak gravity, friction and hook feel without recompiling. Every struct
//! has a `Default` matching [`crate::constants`] and is validated before use;
//! the simulation never sees a NaN or a zero mass.
use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::{
    CELL_SIZE, DEATH_SPIKE_DAMAGE, DEBRIS_FORCE, DEBRIS_GRAVITY, DEBRIS_LIFESPAN_TICKS,
    DEBRIS_PARTICLES, DEBRIS_SEED, DEBRIS_SIZE, DEFAULT_FRICTION, DEFAULT_GRAVITY, DEFAULT_MASS,
    HOOK_SAFETY_DISTANCE, HOOK_SLACK, INVINCIBILITY_TICKS, MAX_FRAME_SECONDS, MAX_HOOK_LENGTH,
    MIN_HOOK_LENGTH, PROXIMITY_CELLS, SNAKE_TICKS, SPIKE_DAMAGE, SPRING_CONSTANT,
    SPRING_DAMPING, STEP_SCALE, TICK_SECONDS, UNIVERSAL_MAX_SPEED, VICINITY_MARGIN, WALKER_FRICTION,
    WALKER_GRAVITY,
};
use crate::error::{ConfigError, ParamsError};
use crate::projectile::ProjectileStats;

fn finite(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

fn positive(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if finite(field, value)? > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn friction(field: &'static str, value: Vec2) -> Result<Vec2, ConfigError> {
    for component in [value.x, value.y] {
        if !(0.0..=1.0).contains(&finite(field, component)?) {
            return Err(ConfigError::FrictionOutOfRange {
                field,
                value: component,
            });
        }
    }
    Ok(value)
}

/// Per-body kinematic tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    /// Downward pull added to the acceleration every tick.
    pub gravity: f32,
    /// Per-axis velocity multiplier while grounded.
    pub ground_friction: Vec2,
    /// Per-axis velocity multiplier while airborne.
    pub air_friction: Vec2,
    /// Component-wise velocity clamp.
    pub maximum_velocity: Vec2,
    /// Divides applied forces.
    pub mass: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            gravity: DEFAULT_GRAVITY,
            ground_friction: Vec2::splat(DEFAULT_FRICTION),
            air_friction: Vec2::splat(DEFAULT_FRICTION),
            maximum_velocity: Vec2::splat(UNIVERSAL_MAX_SPEED),
            mass: DEFAULT_MASS,
        }
    }
}

impl PhysicsParams {
    /// Checks every field, returning the first violation.
    ///
    /// # Errors
    /// Returns [`ConfigError`] for NaN/infinite values, non-positive mass or
    /// maximum velocity, and friction outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        finite("gravity", self.gravity)?;
        friction("ground_friction", self.ground_friction)?;
        friction("air_friction", self.air_friction)?;
        positive("maximum_velocity.x", self.maximum_velocity.x)?;
        positive("maximum_velocity.y", self.maximum_velocity.y)?;
        finite("mass", self.mass)?;
        if self.mass <= 0.0 {
            return Err(ConfigError::NonPositiveMass(self.mass));
        }
        Ok(())
    }
}

/// Grapple spring tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HookParams {
    /// Shortest allowed rest length.
    pub min_length: f32,
    /// Longest allowed rest length.
    pub max_length: f32,
    /// Default slack factor for hook projectiles.
    pub slack: f32,
    /// Default spring constant for hook projectiles.
    pub spring_constant: f32,
    /// Velocity damping applied to the bob each tick.
    pub damping: f32,
    /// Owner-to-bob distance that forces a break-free.
    pub safety_distance: f32,
    /// Ticks spent breaking free before returning to idle.
    pub snake_ticks: u32,
}

impl Default for HookParams {
    fn default() -> Self {
        Self {
            min_length: MIN_HOOK_LENGTH,
            max_length: MAX_HOOK_LENGTH,
            slack: HOOK_SLACK,
            spring_constant: SPRING_CONSTANT,
            damping: SPRING_DAMPING,
            safety_distance: HOOK_SAFETY_DISTANCE,
            snake_ticks: SNAKE_TICKS,
        }
    }
}

impl HookParams {
    /// Checks every field, returning the first violation.
    ///
    /// # Errors
    /// Returns [`ConfigError`] for non-positive lengths, an inverted length
    /// range, or damping outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("hook.min_length", self.min_length)?;
        positive("hook.max_length", self.max_length)?;
        if self.min_length > self.max_length {
            return Err(ConfigError::InvertedHookRange {
                min: self.min_length,
                max: self.max_length,
            });
        }
        positive("hook.slack", self.slack)?;
        positive("hook.spring_constant", self.spring_constant)?;
        friction("hook.damping", Vec2::splat(self.damping))?;
        positive("hook.safety_distance", self.safety_distance)?;
        Ok(())
    }
}

/// Debris emitter tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebrisParams {
    /// Particles released per shattered tile.
    pub particles: usize,
    /// Ticks each particle lives.
    pub lifespan_ticks: u32,
    /// Expulsion force applied at spawn.
    pub force: f32,
    /// Gravity pulling particles down.
    pub gravity: f32,
    /// Edge length of each particle's box.
    pub size: f32,
    /// Seed for the spread of particle directions and lifespans.
    pub seed: u32,
}

impl Default for DebrisParams {
    fn default() -> Self {
        Self {
            particles: DEBRIS_PARTICLES,
            lifespan_ticks: DEBRIS_LIFESPAN_TICKS,
            force: DEBRIS_FORCE,
            gravity: DEBRIS_GRAVITY,
            size: DEBRIS_SIZE,
            seed: DEBRIS_SEED,
        }
    }
}

/// World-level tuning shared by every body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldParams {
    /// Wall-clock seconds covered by one tick.
    pub tick_seconds: f32,
    /// Largest frame time the accumulator accepts at once.
    pub max_frame_seconds: f32,
    /// Integration step applied to velocities and positions.
    pub step_scale: f32,
    /// Edge length of a tile cell.
    pub cell_size: f32,
    /// Broad-phase threshold as a multiple of `cell_size`.
    pub proximity_cells: f32,
    /// Margin between a body's swept box and its vicinity box.
    pub vicinity_margin: f32,
    /// Damage dealt by spike tiles.
    pub spike_damage: u32,
    /// Damage dealt by death-spike tiles.
    pub death_spike_damage: u32,
    /// Invulnerability window after a hit.
    pub invincibility_ticks: u32,
    /// Grapple spring tuning.
    pub hook: HookParams,
    /// Debris emitter tuning.
    pub debris: DebrisParams,
}

impl Default for WorldParams {
    fn default() -> Self {
        Self {
            tick_seconds: TICK_SECONDS,
            max_frame_seconds: MAX_FRAME_SECONDS,
            step_scale: STEP_SCALE,
            cell_size: CELL_SIZE,
            proximity_cells: PROXIMITY_CELLS,
            vicinity_margin: VICINITY_MARGIN,
            spike_damage: SPIKE_DAMAGE,
            death_spike_damage: DEATH_SPIKE_DAMAGE,
            invincibility_ticks: INVINCIBILITY_TICKS,
            hook: HookParams::default(),
            debris: DebrisParams::default(),
        }
    }
}

impl WorldParams {
    /// Checks every field, returning the first violation.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when a step size, cell size or threshold is not
    /// strictly positive, or when the hook tuning is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("tick_seconds", self.tick_seconds)?;
        positive("max_frame_seconds", self.max_frame_seconds)?;
        positive("step_scale", self.step_scale)?;
        positive("cell_size", self.cell_size)?;
        positive("proximity_cells", self.proximity_cells)?;
        finite("vicinity_margin", self.vicinity_margin)?;
        positive("debris.size", self.debris.size)?;
        finite("debris.force", self.debris.force)?;
        finite("debris.gravity", self.debris.gravity)?;
        self.hook.validate()
    }

    /// Broad-phase distance threshold in world units.
    #[must_use]
    pub fn proximity(&self) -> f32 {
        self.cell_size * self.proximity_cells
    }
}

/// Tuning file bundling world parameters with named body presets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuningFile {
    /// World-level parameters.
    pub world: WorldParams,
    /// Player body tuning.
    pub player: PhysicsParams,
    /// Enemy body tuning.
    pub enemy: PhysicsParams,
    /// Projectile body tuning.
    pub projectile: PhysicsParams,
    /// Stats given to fired bullets.
    pub bullet: ProjectileStats,
}

impl Default for TuningFile {
    fn default() -> Self {
        let walker = PhysicsParams {
            gravity: WALKER_GRAVITY,
            ground_friction: Vec2::splat(WALKER_FRICTION),
            air_friction: Vec2::splat(WALKER_FRICTION),
            ..PhysicsParams::default()
        };
        Self {
            world: WorldParams::default(),
            player: walker,
            enemy: walker,
            projectile: PhysicsParams {
                ground_friction: Vec2::ONE,
                air_friction: Vec2::ONE,
                ..PhysicsParams::default()
            },
            bullet: ProjectileStats::default(),
        }
    }
}

impl TuningFile {
    /// Parses and validates a tuning document.
    ///
    /// # Errors
    /// Returns [`ParamsError::Parse`] for malformed JSON and
    /// [`ParamsError::Invalid`] when a value fails validation.
    ///
    /// # Examples
    /// ```
    /// use tilebound::params::TuningFile;
    /// let tuning = TuningFile::from_json_str(r#"{ "player": { "gravity": 0.3 } }"#).unwrap();
    /// assert!((tuning.player.gravity - 0.3).abs() < f32::EPSILON);
    /// assert!((tuning.player.mass - 1.0).abs() < f32::EPSILON);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, ParamsError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reads, parses and validates a tuning file.
    ///
    /// # Errors
    /// Returns [`ParamsError::Io`] when the file cannot be read, otherwise as
    /// [`TuningFile::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Validates every section.
    ///
    /// # Errors
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;
        self.player.validate()?;
        self.enemy.validate()?;
        self.projectile.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_are_valid() {
        assert!(TuningFile::default().validate().is_ok());
    }

    #[rstest]
    #[case::nan_gravity(PhysicsParams { gravity: f32::NAN, ..PhysicsParams::default() })]
    #[case::zero_mass(PhysicsParams { mass: 0.0, ..PhysicsParams::default() })]
    #[case::negative_mass(PhysicsParams { mass: -2.0, ..PhysicsParams::default() })]
    #[case::friction_above_one(PhysicsParams {
        ground_friction: Vec2::new(1.5, 0.9),
        ..PhysicsParams::default()
    })]
    #[case::zero_clamp(PhysicsParams {
        maximum_velocity: Vec2::new(0.0, 10.0),
        ..PhysicsParams::default()
    })]
    fn invalid_physics_params_are_rejected(#[case] params: PhysicsParams) {
        assert!(params.validate().is_err());
    }

    #[rstest]
    fn negative_mass_reports_mass_error() {
        let params = PhysicsParams {
            mass: -1.0,
            ..PhysicsParams::default()
        };
        assert_eq!(params.validate(), Err(ConfigError::NonPositiveMass(-1.0)));
    }

    #[rstest]
    fn inverted_hook_range_is_rejected() {
        let hook = HookParams {
            min_length: 100.0,
            max_length: 50.0,
            ..HookParams::default()
        };
        assert!(matches!(
            hook.validate(),
            Err(ConfigError::InvertedHookRange { .. })
        ));
    }

    #[rstest]
    fn json_overrides_merge_with_defaults() {
        let json = r#"{
            "world": { "cell_size": 16.0, "hook": { "max_length": 128.0 } },
            "player": { "gravity": 0.3, "ground_friction": [0.85, 0.85] }
        }"#;
        let tuning = TuningFile::from_json_str(json).expect("valid tuning");
        assert!((tuning.world.cell_size - 16.0).abs() < f32::EPSILON);
        assert!((tuning.world.hook.max_length - 128.0).abs() < f32::EPSILON);
        assert!((tuning.world.hook.min_length - MIN_HOOK_LENGTH).abs() < f32::EPSILON);
        assert_eq!(tuning.player.ground_friction, Vec2::new(0.85, 0.85));
    }

    #[rstest]
    fn bullet_stats_load_from_json() {
        let json = r#"{ "bullet": { "base_damage": 3, "persistent": true } }"#;
        let tuning = TuningFile::from_json_str(json).expect("valid tuning");
        assert_eq!(
            tuning.bullet,
            ProjectileStats {
                base_damage: 3,
                persistent: true,
                ..ProjectileStats::default()
            }
        );
    }

    #[rstest]
    fn json_with_invalid_values_fails_validation() {
        let result = TuningFile::from_json_str(r#"{ "enemy": { "mass": 0.0 } }"#);
        assert!(matches!(result, Err(ParamsError::Invalid(_))));
    }

    #[rstest]
    fn malformed_json_fails_to_parse() {
        let result = TuningFile::from_json_str("{ not json");
        assert!(matches!(result, Err(ParamsError::Parse(_))));
    }
}
