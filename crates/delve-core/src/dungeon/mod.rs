//! Dungeon system
//!
//! Contains the cell grid, the BSP digger, population, and the generation
//! pipeline.

mod bsp;
mod cell;
mod digger;
mod generation;
mod level;
mod populate;

pub use bsp::{BspNode, SplitAxis};
pub use cell::{Cell, CellType, Pos, CARDINALS};
pub use digger::{by_door, door_fits, place_doors, BspDigger, DigReport};
pub use generation::{generate_level, GenConfig, GeneratedLevel};
pub use level::{Level, Room};
pub use populate::{
    fix_wall_mounts, pick, populate_rooms, SpawnEntry, SpawnWeight, ITEMS, MONSTERS,
};
