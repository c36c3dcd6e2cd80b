//! Map cell types and grid coordinates.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// A grid position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

/// The four cardinal direction deltas
pub const CARDINALS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

impl Pos {
    /// Create a new position
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position shifted by a delta
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Cell terrain type
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum CellType {
    /// Undug rock
    #[default]
    Stone = 0,
    /// Room floor
    Room = 1,
    /// Corridor floor
    Corridor = 2,
}

impl CellType {
    /// Check if this is a wall type
    pub const fn is_wall(&self) -> bool {
        matches!(self, CellType::Stone)
    }

    /// Check if an agent can stand here (terrain only, ignores occupants)
    pub const fn is_walkable(&self) -> bool {
        matches!(self, CellType::Room | CellType::Corridor)
    }

    /// Get the display character for this cell type
    pub const fn symbol(&self) -> char {
        match self {
            CellType::Stone => ' ',
            CellType::Room => '.',
            CellType::Corridor => '#',
        }
    }
}

/// A single map cell
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Actual terrain type
    pub typ: CellType,

    /// Has been seen by the player
    pub explored: bool,

    /// Scent intensity left by the player; read by monster AI, never by
    /// generation
    pub scent: u32,
}

impl Cell {
    /// Create a new stone cell
    pub const fn stone() -> Self {
        Self {
            typ: CellType::Stone,
            explored: false,
            scent: 0,
        }
    }

    /// Create a room floor cell
    pub const fn room() -> Self {
        Self {
            typ: CellType::Room,
            explored: false,
            scent: 0,
        }
    }

    /// Create a corridor floor cell
    pub const fn corridor() -> Self {
        Self {
            typ: CellType::Corridor,
            explored: false,
            scent: 0,
        }
    }

    /// Check if walkable (terrain only)
    pub const fn is_walkable(&self) -> bool {
        self.typ.is_walkable()
    }
}
