//! Default tuning constants shared by the physics core.
//!
//! Values are expressed in world pixels and simulation ticks. Each constant
//! is also the `Default` of the matching field in [`crate::params`], so tuning
//! files only need to override what differs.

/// Edge length of a square tile cell.
pub const CELL_SIZE: f32 = 32.0;
/// Per-axis multiplicative friction used when none is configured.
pub const DEFAULT_FRICTION: f32 = 0.9;
/// Gravity of the stock player and enemy presets.
pub const WALKER_GRAVITY: f32 = 0.3;
/// Friction of the stock player and enemy presets.
pub const WALKER_FRICTION: f32 = 0.85;
/// Mass used when none is configured.
pub const DEFAULT_MASS: f32 = 1.0;
/// Velocity clamp used when none is configured.
pub const UNIVERSAL_MAX_SPEED: f32 = 64.0;
/// Gravity applied to bodies that do not opt in to a pull.
pub const DEFAULT_GRAVITY: f32 = 0.0;
/// Seconds of wall-clock time covered by one simulation tick.
pub const TICK_SECONDS: f32 = 1.0 / 60.0;
/// Integration step applied to velocities and positions each tick.
pub const STEP_SCALE: f32 = 1.0;
/// Upper bound on frame time fed to the accumulator in one frame.
pub const MAX_FRAME_SECONDS: f32 = 0.25;
/// Broad-phase proximity threshold as a multiple of [`CELL_SIZE`].
pub const PROXIMITY_CELLS: f32 = 2.0;
/// Margin added around a body's swept box to form its vicinity box.
pub const VICINITY_MARGIN: f32 = 4.0;
/// Capacity of the rolling acceleration history kept per body.
pub const ACCELERATION_SAMPLE_SIZE: usize = 2560;
/// Damage dealt by a spike tile on contact.
pub const SPIKE_DAMAGE: u32 = 1;
/// Damage dealt by a death-spike tile; lethal for any stock health pool.
pub const DEATH_SPIKE_DAMAGE: u32 = 64;
/// Ticks of invulnerability following a successful hit.
pub const INVINCIBILITY_TICKS: u32 = 200;
/// Shortest rest length a grapple spring may adopt.
pub const MIN_HOOK_LENGTH: f32 = 32.0;
/// Longest rest length a grapple spring may adopt.
pub const MAX_HOOK_LENGTH: f32 = 256.0;
/// Factor applied to vertical displacement when recomputing rest length.
pub const HOOK_SLACK: f32 = 0.9;
/// Stiffness of the grapple spring.
pub const SPRING_CONSTANT: f32 = 0.6;
/// Damping applied to the spring bob's velocity every tick.
pub const SPRING_DAMPING: f32 = 0.95;
/// Maximum distance between a hooked body and the spring bob.
pub const HOOK_SAFETY_DISTANCE: f32 = 32.0;
/// Ticks spent breaking free before the hook returns to idle.
pub const SNAKE_TICKS: u32 = 8;
/// Particles released when a breakable tile shatters.
pub const DEBRIS_PARTICLES: usize = 8;
/// Lifetime of a debris particle.
pub const DEBRIS_LIFESPAN_TICKS: u32 = 40;
/// Expulsion force applied to each debris particle at spawn.
pub const DEBRIS_FORCE: f32 = 1.6;
/// Gravity pulling debris particles down.
pub const DEBRIS_GRAVITY: f32 = 0.2;
/// Edge length of a debris particle's box.
pub const DEBRIS_SIZE: f32 = 3.0;

/// Seed of the debris spread generator.
pub const DEBRIS_SEED: u32 = 0x9E37_79B9;
