//! Room population: creatures, loot and wall lights.
//!
//! Spawn tables scale with dungeon depth. An entry either has a flat weight
//! or a list of `(min depth, weight)` steps, where the step with the highest
//! threshold at or below the current depth wins.

use super::cell::Pos;
use super::generation::GenConfig;
use super::level::Level;
use crate::actor::{self, ActorId};
use crate::rng::GameRng;

/// Weight of a spawn table entry
#[derive(Debug, Clone, Copy)]
pub enum SpawnWeight {
    Flat(u32),
    ByDepth(&'static [(u32, u32)]),
}

impl SpawnWeight {
    /// Resolve the weight at a given dungeon depth
    pub fn at_depth(&self, depth: u32) -> u32 {
        match self {
            SpawnWeight::Flat(w) => *w,
            SpawnWeight::ByDepth(steps) => steps
                .iter()
                .filter(|(min, _)| *min <= depth)
                .last()
                .map(|(_, w)| *w)
                .unwrap_or(0),
        }
    }
}

/// One row of a spawn table
#[derive(Debug, Clone, Copy)]
pub struct SpawnEntry {
    pub name: &'static str,
    pub weight: SpawnWeight,
}

/// Creature table; thresholds are ascending
pub const MONSTERS: &[SpawnEntry] = &[
    SpawnEntry { name: "rat", weight: SpawnWeight::Flat(80) },
    SpawnEntry { name: "kobold", weight: SpawnWeight::ByDepth(&[(1, 60), (4, 30)]) },
    SpawnEntry { name: "orc", weight: SpawnWeight::ByDepth(&[(2, 40), (5, 70)]) },
    SpawnEntry { name: "troll", weight: SpawnWeight::ByDepth(&[(4, 10), (7, 40)]) },
];

/// Loot table
pub const ITEMS: &[SpawnEntry] = &[
    SpawnEntry { name: "healing potion", weight: SpawnWeight::Flat(70) },
    SpawnEntry { name: "scroll of lightning", weight: SpawnWeight::ByDepth(&[(2, 40)]) },
    SpawnEntry { name: "short sword", weight: SpawnWeight::ByDepth(&[(3, 30)]) },
];

/// Roll a table, returning the chosen type name
pub fn pick(table: &[SpawnEntry], depth: u32, rng: &mut GameRng) -> Option<&'static str> {
    let weights: Vec<u32> = table.iter().map(|e| e.weight.at_depth(depth)).collect();
    rng.weighted(&weights).map(|idx| table[idx].name)
}

/// Scatter monsters, items and torches through every room but the entry
///
/// The first dug room is where the player starts and stays empty. A spawn
/// attempt whose cell is blocked or occupied is dropped, not retried.
pub fn populate_rooms(level: &mut Level, cfg: &GenConfig, rng: &mut GameRng) {
    for idx in 1..level.rooms.len() {
        populate_room(level, idx, cfg, rng);
    }
    fix_wall_mounts(level);
}

fn populate_room(level: &mut Level, idx: usize, cfg: &GenConfig, rng: &mut GameRng) {
    let room = level.rooms[idx];
    let depth = level.depth;

    let monsters = rng.rn2(cfg.max_room_monsters + 1);
    for _ in 0..monsters {
        let pos = room.random_point(rng);
        if !level.can_walk(pos) {
            continue;
        }
        let Some(name) = pick(MONSTERS, depth, rng) else {
            continue;
        };
        if let Some(mut m) = actor::create(name) {
            m.move_to(pos);
            level.actors.register(m);
        }
    }

    let items = rng.rn2(cfg.max_room_items + 1);
    for _ in 0..items {
        let pos = room.random_point(rng);
        if !level.can_walk(pos) || level.actors.actor_at(pos).is_some() {
            continue;
        }
        let Some(name) = pick(ITEMS, depth, rng) else {
            continue;
        };
        if let Some(mut item) = actor::create(name) {
            item.move_to(pos);
            level.actors.register(item);
        }
    }

    let torches = rng.rn2(cfg.max_room_torches + 1);
    for _ in 0..torches {
        let pos = room.random_wall_point(rng);
        if !level.is_wall(pos) || level.actors.actor_at(pos).is_some() {
            continue;
        }
        if let Some(mut torch) = actor::create("torch") {
            torch.move_to(pos);
            level.actors.register(torch);
        }
    }
}

/// Check whether a cell can hold a wall-mounted actor
fn wall_mount_ok(level: &Level, pos: Pos) -> bool {
    level.in_bounds(pos) && level.wall_has_adjacent_floor(pos)
}

/// Relocate wall-mounted actors that ended up off a usable wall
///
/// Corridor digs can open the wall a torch was placed on. Each misplaced
/// actor scans outward from its cell, wrapping at the map edges, until a
/// wall cell with an adjacent floor and no occupant turns up.
pub fn fix_wall_mounts(level: &mut Level) {
    let mounted: Vec<ActorId> = level
        .actors
        .iter()
        .filter(|a| a.wall_mounted)
        .map(|a| a.id)
        .collect();

    let total = (level.width * level.height) as i64;
    for id in mounted {
        let Some(pos) = level.actors.get(id).map(|a| a.pos) else {
            continue;
        };
        if wall_mount_ok(level, pos) {
            continue;
        }
        let start = pos.y as i64 * level.width as i64 + pos.x as i64;
        for step in 1..total {
            let idx = (start + step) % total;
            let candidate = Pos::new((idx % level.width as i64) as i32, (idx / level.width as i64) as i32);
            if !wall_mount_ok(level, candidate) {
                continue;
            }
            if level.actors.actor_at(candidate).is_some() {
                continue;
            }
            if let Some(actor) = level.actors.get_mut(id) {
                actor.move_to(candidate);
            }
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorKind;
    use crate::dungeon::digger::BspDigger;
    use crate::dungeon::CellType;

    #[test]
    fn test_weight_steps_pick_highest_threshold() {
        let w = SpawnWeight::ByDepth(&[(2, 40), (5, 70)]);
        assert_eq!(w.at_depth(1), 0);
        assert_eq!(w.at_depth(2), 40);
        assert_eq!(w.at_depth(4), 40);
        assert_eq!(w.at_depth(5), 70);
        assert_eq!(w.at_depth(9), 70);
        assert_eq!(SpawnWeight::Flat(30).at_depth(1), 30);
    }

    #[test]
    fn test_pick_respects_depth_gating() {
        let mut rng = GameRng::new(42);
        // at depth 1 trolls have zero weight
        for _ in 0..200 {
            let name = pick(MONSTERS, 1, &mut rng).unwrap();
            assert_ne!(name, "troll");
            assert_ne!(name, "orc");
        }
    }

    #[test]
    fn test_pick_empty_table() {
        let mut rng = GameRng::new(42);
        assert_eq!(pick(&[], 1, &mut rng), None);
    }

    #[test]
    fn test_entry_room_left_empty() {
        let cfg = GenConfig {
            width: 40,
            height: 20,
            bsp_depth: 4,
            min_leaf: 6,
            min_room: 4,
            ..GenConfig::default()
        };
        for seed in 0..5 {
            let mut rng = GameRng::new(seed);
            let mut level = Level::new(cfg.width, cfg.height, 1);
            BspDigger::new(&cfg).dig(&mut level, &mut rng);
            populate_rooms(&mut level, &cfg, &mut rng);

            if level.rooms.len() < 2 {
                continue;
            }
            let entry = level.rooms[0];
            for a in level.actors.iter() {
                if a.is_a(ActorKind::Creature) || a.is_a(ActorKind::Item) {
                    assert!(
                        !entry.contains(a.pos),
                        "{} spawned in the entry room",
                        a.name
                    );
                }
            }
        }
    }

    #[test]
    fn test_fix_wall_mounts_relocates() {
        let mut level = Level::new(12, 8, 1);
        // one open room in the middle
        for x in 3..9 {
            for y in 2..6 {
                level.set_floor(Pos::new(x, y), CellType::Room);
            }
        }
        // torch stranded on open floor
        let mut torch = actor::create("torch").unwrap();
        torch.move_to(Pos::new(5, 3));
        let id = level.actors.register(torch);

        fix_wall_mounts(&mut level);

        let pos = level.actors.get(id).unwrap().pos;
        assert!(wall_mount_ok(&level, pos), "torch still misplaced: {:?}", pos);
    }

    #[test]
    fn test_fix_wall_mounts_keeps_valid_placement() {
        let mut level = Level::new(12, 8, 1);
        for x in 3..9 {
            for y in 2..6 {
                level.set_floor(Pos::new(x, y), CellType::Room);
            }
        }
        let wall = Pos::new(3, 1); // wall above the room, floor below
        let mut torch = actor::create("torch").unwrap();
        torch.move_to(wall);
        let id = level.actors.register(torch);

        fix_wall_mounts(&mut level);
        assert_eq!(level.actors.get(id).unwrap().pos, wall);
    }
}
