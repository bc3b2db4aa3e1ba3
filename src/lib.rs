//! Deterministic tile-grid physics and collision core for an action platformer.
//!
//! Bodies are integrated in fixed steps drained from a frame-time
//! accumulator, resolved against the boundary cells of a [`TileGrid`], and
//! report what happened to them through [`PhysicsEvent`]s. Rendering, input
//! and audio stay outside; they read positions and contact flags, and feed
//! forces back in through [`Intent`].
pub mod actor;
pub mod body;
pub mod constants;
pub mod error;
pub mod events;
pub mod grid;
pub mod health;
pub mod hook;
pub mod logging;
mod macros;
pub mod numeric;
pub mod params;
pub mod particles;
pub mod projectile;
pub mod random;
pub mod resolver;
pub mod shape;
pub mod tile;
pub mod timestep;
pub mod world;

// Re-export commonly used items
pub use actor::{Actor, ActorId, ActorKind, Intent, Team};
pub use body::Body;
pub use error::{ConfigError, GridError, ParamsError};
pub use events::{EventLog, EventSink, PhysicsEvent, WallSide};
pub use grid::{Cell, TileGrid};
pub use hook::{BreakReason, GrappleHook, HookState};
pub use logging::init as init_logging;
pub use params::{PhysicsParams, TuningFile, WorldParams};
pub use projectile::{ProjectileId, ProjectileKind, ProjectileStats};
pub use resolver::CollisionContext;
pub use shape::{Aabb, Contact, Shape, ShapeLayout};
pub use tile::{TileKind, TileLookup};
pub use timestep::FixedTimestep;
pub use world::World;

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust
    //! use tilebound::prelude::*;
    //!
    //! let grid = TileGrid::from_rows(&[[0, 0], [1, 1]], TileLookup::default(), 32.0).unwrap();
    //! let mut world = World::new(grid, WorldParams::default()).unwrap();
    //! let body = Body::new(&PhysicsParams { gravity: 0.3, ..PhysicsParams::default() })
    //!     .unwrap()
    //!     .with_position(Vec2::new(8.0, 16.0));
    //! let id = world.spawn_actor(ActorKind::Player, body, ShapeLayout::uniform(Vec2::splat(16.0)), 4);
    //! world.step();
    //! assert!(world.actor(id).unwrap().grounded());
    //! ```

    pub use crate::{
        ActorKind, Body, Contact, Intent, PhysicsEvent, PhysicsParams, ShapeLayout, TileGrid,
        TileKind, TileLookup, World, WorldParams,
    };
    pub use glam::Vec2;
}
