//! Utility helpers for tests.
//!
//! Levels are easiest to read when drawn, so [`grids`] turns ASCII art into
//! a [`TileGrid`](tilebound::TileGrid); [`bodies`] holds the stock body
//! presets used across scenarios.
pub mod bodies;
pub mod grids;

pub use bodies::{bolt, walker, world_with};
pub use grids::grid_from_ascii;
