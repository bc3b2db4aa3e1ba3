//! Stock bodies and worlds for scenarios.
use glam::Vec2;
use tilebound::{Body, PhysicsParams, TileGrid, World, WorldParams};

/// Player-like body: gravity 0.3 and friction 0.85 on both axes.
///
/// # Panics
/// Never; the preset is valid.
pub fn walker(position: Vec2) -> Body {
    Body::new(&PhysicsParams {
        gravity: 0.3,
        ground_friction: Vec2::splat(0.85),
        air_friction: Vec2::splat(0.85),
        ..PhysicsParams::default()
    })
    .expect("walker preset is valid")
    .with_position(position)
}

/// Frictionless, weightless projectile body.
///
/// # Panics
/// Never; the preset is valid.
pub fn bolt(position: Vec2) -> Body {
    Body::new(&PhysicsParams {
        ground_friction: Vec2::ONE,
        air_friction: Vec2::ONE,
        ..PhysicsParams::default()
    })
    .expect("bolt preset is valid")
    .with_position(position)
}

/// World over `grid` with default tuning adjusted by `tweak`.
///
/// # Panics
/// Panics when the tweaked tuning is invalid.
pub fn world_with(grid: TileGrid, tweak: impl FnOnce(&mut WorldParams)) -> World {
    let mut params = WorldParams {
        cell_size: grid.cell_size(),
        ..WorldParams::default()
    };
    tweak(&mut params);
    World::new(grid, params).expect("valid world tuning")
}
