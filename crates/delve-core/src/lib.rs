//! delve-core: dungeon level generation with a lock-and-key puzzle overlay
//!
//! This crate contains the whole generation pipeline with no I/O
//! dependencies. It is designed to be pure and testable: a seeded
//! [`GameRng`] and a [`dungeon::GenConfig`] fully determine the result.
//!
//! The pipeline carves rooms and corridors with a binary space partition,
//! extracts a sector/connector graph from the carved grid, locks mandatory
//! passages and places matching keys so the level is guaranteed solvable,
//! then hands back the grid, the actor list and the graph together.

pub mod actor;
pub mod dungeon;
pub mod topology;

mod consts;
mod errors;
mod rng;

pub use consts::*;
pub use errors::GenError;
pub use rng::GameRng;
