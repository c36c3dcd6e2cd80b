//! Level structure: the cell grid plus everything generation placed on it.

use serde::{Deserialize, Serialize};

use super::cell::{Cell, CellType, Pos, CARDINALS};
use crate::actor::ActorArena;
use crate::rng::GameRng;

/// A dug rectangular room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Room {
    /// Create a new room
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center cell of the room
    pub fn center(&self) -> Pos {
        Pos::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Check whether a position lies inside the room
    pub fn contains(&self, pos: Pos) -> bool {
        pos.x >= self.x
            && pos.x < self.x + self.width
            && pos.y >= self.y
            && pos.y < self.y + self.height
    }

    /// Random floor cell inside the room
    pub fn random_point(&self, rng: &mut GameRng) -> Pos {
        Pos::new(
            self.x + rng.rn2(self.width as u32) as i32,
            self.y + rng.rn2(self.height as u32) as i32,
        )
    }

    /// Random cell on the wall ring surrounding the room
    ///
    /// Corners are never returned; they have no adjacent room floor.
    pub fn random_wall_point(&self, rng: &mut GameRng) -> Pos {
        match rng.rn2(4) {
            0 => Pos::new(self.x + rng.rn2(self.width as u32) as i32, self.y - 1),
            1 => Pos::new(
                self.x + rng.rn2(self.width as u32) as i32,
                self.y + self.height,
            ),
            2 => Pos::new(self.x - 1, self.y + rng.rn2(self.height as u32) as i32),
            _ => Pos::new(
                self.x + self.width,
                self.y + rng.rn2(self.height as u32) as i32,
            ),
        }
    }
}

/// A complete generated level
///
/// Owns the cell grid and the actor arena; mutated in place by the digger and
/// the population pass, then frozen once generation hands it to gameplay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub width: i32,
    pub height: i32,

    /// Dungeon depth, scales the population tables
    pub depth: u32,

    /// Map cells, indexed `[x][y]`
    pub cells: Vec<Vec<Cell>>,

    /// Every actor placed on this level
    pub actors: ActorArena,

    /// Rooms in dig order; the first one is the entry room
    pub rooms: Vec<Room>,

    /// Player spawn point
    pub spawn: Pos,

    /// Down stairway position
    pub stairs_down: Pos,
}

impl Level {
    /// Create a level of all stone
    pub fn new(width: i32, height: i32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
            cells: vec![vec![Cell::stone(); height as usize]; width as usize],
            actors: ActorArena::new(),
            rooms: Vec::new(),
            spawn: Pos::new(0, 0),
            stairs_down: Pos::new(0, 0),
        }
    }

    /// Check whether a position lies on the map
    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    /// Check for wall terrain; out-of-bounds counts as wall
    pub fn is_wall(&self, pos: Pos) -> bool {
        if !self.in_bounds(pos) {
            return true;
        }
        self.cells[pos.x as usize][pos.y as usize].typ.is_wall()
    }

    /// Check for walkable terrain, ignoring occupants
    pub fn is_walkable(&self, pos: Pos) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        self.cells[pos.x as usize][pos.y as usize].is_walkable()
    }

    /// Flip a cell to floor terrain
    pub fn set_floor(&mut self, pos: Pos, typ: CellType) {
        if self.in_bounds(pos) {
            self.cells[pos.x as usize][pos.y as usize].typ = typ;
        }
    }

    /// Flip a cell back to stone
    pub fn set_wall(&mut self, pos: Pos) {
        if self.in_bounds(pos) {
            self.cells[pos.x as usize][pos.y as usize].typ = CellType::Stone;
        }
    }

    /// Check whether an agent could occupy the cell: walkable terrain with no
    /// blocking occupant
    pub fn can_walk(&self, pos: Pos) -> bool {
        self.is_walkable(pos) && !self.actors.blocks_at(pos)
    }

    /// Check whether a wall cell has at least one 4-adjacent floor cell
    pub fn wall_has_adjacent_floor(&self, pos: Pos) -> bool {
        self.is_wall(pos)
            && CARDINALS
                .iter()
                .any(|&(dx, dy)| self.is_walkable(pos.offset(dx, dy)))
    }

    /// Render the level as text, one row per line
    ///
    /// Terrain first, then actors, then the stairway and spawn markers.
    pub fn render(&self) -> String {
        let mut rows: Vec<Vec<char>> = (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| self.cells[x as usize][y as usize].typ.symbol())
                    .collect()
            })
            .collect();
        for actor in self.actors.iter() {
            if self.in_bounds(actor.pos) {
                rows[actor.pos.y as usize][actor.pos.x as usize] = actor.glyph;
            }
        }
        if self.in_bounds(self.stairs_down) {
            rows[self.stairs_down.y as usize][self.stairs_down.x as usize] = '>';
        }
        if self.in_bounds(self.spawn) {
            rows[self.spawn.y as usize][self.spawn.x as usize] = '@';
        }
        let mut out = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for row in rows {
            out.extend(row);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor;

    #[test]
    fn test_new_level_is_all_stone() {
        let level = Level::new(10, 6, 1);
        for x in 0..10 {
            for y in 0..6 {
                assert!(level.is_wall(Pos::new(x, y)));
            }
        }
    }

    #[test]
    fn test_out_of_bounds_is_wall() {
        let level = Level::new(10, 6, 1);
        assert!(level.is_wall(Pos::new(-1, 0)));
        assert!(level.is_wall(Pos::new(10, 0)));
        assert!(!level.is_walkable(Pos::new(0, 6)));
    }

    #[test]
    fn test_can_walk_respects_occupants() {
        let mut level = Level::new(10, 6, 1);
        let pos = Pos::new(3, 3);
        level.set_floor(pos, CellType::Room);
        assert!(level.can_walk(pos));

        let mut rat = actor::create("rat").unwrap();
        rat.move_to(pos);
        level.actors.register(rat);
        assert!(!level.can_walk(pos));
        // still walkable terrain underneath
        assert!(level.is_walkable(pos));
    }

    #[test]
    fn test_set_wall_round_trip() {
        let mut level = Level::new(10, 6, 1);
        let pos = Pos::new(2, 2);
        level.set_floor(pos, CellType::Corridor);
        assert!(level.is_walkable(pos));
        level.set_wall(pos);
        assert!(level.is_wall(pos));
    }

    #[test]
    fn test_room_geometry() {
        let room = Room::new(2, 3, 5, 4);
        assert_eq!(room.center(), Pos::new(4, 5));
        assert!(room.contains(Pos::new(2, 3)));
        assert!(room.contains(Pos::new(6, 6)));
        assert!(!room.contains(Pos::new(7, 3)));

        let mut rng = GameRng::new(42);
        for _ in 0..100 {
            assert!(room.contains(room.random_point(&mut rng)));
        }
        for _ in 0..100 {
            let p = room.random_wall_point(&mut rng);
            assert!(!room.contains(p));
            // on the ring, never a corner
            let on_x = p.x >= room.x && p.x < room.x + room.width;
            let on_y = p.y >= room.y && p.y < room.y + room.height;
            assert!(on_x ^ on_y, "wall point {:?} should flank one axis", p);
        }
    }

    #[test]
    fn test_render_dimensions() {
        let mut level = Level::new(8, 4, 1);
        level.set_floor(Pos::new(1, 1), CellType::Room);
        let text = level.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|l| l.chars().count() == 8));
        assert_eq!(lines[1].chars().nth(1), Some('.'));
    }
}
