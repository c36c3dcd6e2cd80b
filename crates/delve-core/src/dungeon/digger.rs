//! Room and corridor digging over a BSP tree.
//!
//! Children are dug before their parents, so by the time an internal node
//! joins its two subtrees both sides already have rooms. A leaf whose region
//! cannot hold a minimum-size room is skipped and simply stays stone.

use serde::{Deserialize, Serialize};

use super::bsp::BspNode;
use super::cell::{CellType, Pos, CARDINALS};
use super::generation::GenConfig;
use super::level::{Level, Room};
use crate::actor;
use crate::rng::GameRng;

/// What the digger hands to the later passes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DigReport {
    /// Candidate door positions in dig order; re-validated by `place_doors`
    pub candidates: Vec<Pos>,
}

/// Carves rooms and corridors into a level
pub struct BspDigger<'a> {
    cfg: &'a GenConfig,
}

impl<'a> BspDigger<'a> {
    pub fn new(cfg: &'a GenConfig) -> Self {
        Self { cfg }
    }

    /// Split the map and dig every room and corridor
    ///
    /// The first dug room is the level entry: the spawn point lands at its
    /// center. The down stairway lands at the center of the last dug room.
    pub fn dig(&self, level: &mut Level, rng: &mut GameRng) -> DigReport {
        let mut root = BspNode::new(0, 0, level.width, level.height);
        root.split(self.cfg.bsp_depth, self.cfg.min_leaf, self.cfg.max_ratio, rng);

        let mut report = DigReport::default();
        self.dig_node(&root, level, &mut report, rng);

        if let Some(first) = level.rooms.first() {
            level.spawn = first.center();
        }
        if let Some(last) = level.rooms.last() {
            level.stairs_down = last.center();
        }
        report
    }

    /// Dig a subtree, returning its anchor point for corridor joining
    fn dig_node(
        &self,
        node: &BspNode,
        level: &mut Level,
        report: &mut DigReport,
        rng: &mut GameRng,
    ) -> Option<Pos> {
        let (Some(left), Some(right)) = (&node.left, &node.right) else {
            return self.dig_room(node, level, rng).map(|room| {
                let center = room.center();
                level.rooms.push(room);
                center
            });
        };

        let a = self.dig_node(left, level, report, rng);
        let b = self.dig_node(right, level, report, rng);
        match (a, b) {
            (Some(a), Some(b)) => {
                self.dig_tunnel(level, report, a, b);
                Some(a)
            }
            (one, None) => one,
            (None, one) => one,
        }
    }

    /// Pick a room rectangle strictly inside the leaf and carve it
    ///
    /// A one-cell margin stays stone on every side, which also keeps the
    /// outermost map border intact. Returns `None` when the leaf is too
    /// small; that is not an error, the region stays undug.
    fn dig_room(&self, node: &BspNode, level: &mut Level, rng: &mut GameRng) -> Option<Room> {
        let avail_w = node.width - 2;
        let avail_h = node.height - 2;
        if avail_w < self.cfg.min_room || avail_h < self.cfg.min_room {
            return None;
        }

        let w = self.cfg.min_room + rng.rn2((avail_w - self.cfg.min_room + 1) as u32) as i32;
        let h = self.cfg.min_room + rng.rn2((avail_h - self.cfg.min_room + 1) as u32) as i32;
        let x = node.x + 1 + rng.rn2((avail_w - w + 1) as u32) as i32;
        let y = node.y + 1 + rng.rn2((avail_h - h + 1) as u32) as i32;

        let room = Room::new(x, y, w, h);
        for cx in x..x + w {
            for cy in y..y + h {
                level.set_floor(Pos::new(cx, cy), CellType::Room);
            }
        }
        Some(room)
    }

    /// Join two anchor points with an L-shaped corridor
    ///
    /// One horizontal dig at `a.y`, then one vertical dig at `b.x`. Along
    /// each dig, the first cell shaped like a doorway is recorded as a
    /// candidate door position.
    fn dig_tunnel(&self, level: &mut Level, report: &mut DigReport, a: Pos, b: Pos) {
        let mut horizontal = Vec::new();
        let mut x = a.x;
        loop {
            let pos = Pos::new(x, a.y);
            carve(level, pos);
            horizontal.push(pos);
            if x == b.x {
                break;
            }
            x += (b.x - x).signum();
        }

        let mut vertical = Vec::new();
        let mut y = a.y;
        loop {
            let pos = Pos::new(b.x, y);
            carve(level, pos);
            vertical.push(pos);
            if y == b.y {
                break;
            }
            y += (b.y - y).signum();
        }

        for segment in [&horizontal, &vertical] {
            if let Some(&pos) = segment.iter().find(|&&pos| door_fits(level, pos)) {
                report.candidates.push(pos);
            }
        }
    }
}

/// Dig a single corridor cell; room floor is never downgraded
fn carve(level: &mut Level, pos: Pos) {
    if level.is_wall(pos) {
        level.set_floor(pos, CellType::Corridor);
    }
}

/// Doorway shape check: walls flanking one axis, open floor on the other
pub fn door_fits(level: &Level, pos: Pos) -> bool {
    if !level.is_walkable(pos) {
        return false;
    }
    let wall = |dx: i32, dy: i32| level.is_wall(pos.offset(dx, dy));
    let open = |dx: i32, dy: i32| level.is_walkable(pos.offset(dx, dy));
    (wall(0, -1) && wall(0, 1) && open(-1, 0) && open(1, 0))
        || (wall(-1, 0) && wall(1, 0) && open(0, -1) && open(0, 1))
}

/// Check if there's a door next to a position (4 cardinal directions)
pub fn by_door(level: &Level, pos: Pos) -> bool {
    CARDINALS
        .iter()
        .any(|&(dx, dy)| level.actors.door_at(pos.offset(dx, dy)).is_some())
}

/// Turn surviving candidates into door actors
///
/// Later digs can absorb a candidate into open floor, so every position is
/// re-checked: it must still be doorway-shaped, not already carry a door,
/// and not crowd an existing door.
pub fn place_doors(level: &mut Level, candidates: &[Pos]) {
    for &pos in candidates {
        if !door_fits(level, pos) {
            continue;
        }
        if level.actors.door_at(pos).is_some() || by_door(level, pos) {
            continue;
        }
        if let Some(mut door) = actor::create("door") {
            door.move_to(pos);
            level.actors.register(door);
        }
    }
}
