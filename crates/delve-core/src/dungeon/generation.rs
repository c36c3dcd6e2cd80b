//! Level generation pipeline.
//!
//! Runs to completion on one thread: dig, doors, population, sectorization,
//! gut detection, entry/exit, puzzle, placement. Given the same seed and
//! config the result is bit-identical; the RNG is the only source of
//! nondeterminism and every stage draws from it in this fixed order.

use serde::{Deserialize, Serialize};

use super::digger::{place_doors, BspDigger};
use super::level::Level;
use super::populate::populate_rooms;
use crate::consts;
use crate::errors::GenError;
use crate::rng::GameRng;
use crate::topology::{
    apply_puzzle, build_puzzle, detect_guts, find_entry_exit, sectorize, PuzzleStep, SectorId,
    TopologyMap,
};

/// Generation parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GenConfig {
    pub width: i32,
    pub height: i32,
    /// Dungeon depth, scales the population tables
    pub depth: u32,
    /// Recursive BSP split passes
    pub bsp_depth: u8,
    /// Smallest BSP leaf edge
    pub min_leaf: i32,
    /// Smallest room edge
    pub min_room: i32,
    /// Widest node ratio before the split axis is forced
    pub max_ratio: f32,
    pub max_room_monsters: u32,
    pub max_room_items: u32,
    pub max_room_torches: u32,
    /// Percent chance a mandatory passage gets locked
    pub lock_chance: u32,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            width: consts::MAP_WIDTH,
            height: consts::MAP_HEIGHT,
            depth: 1,
            bsp_depth: consts::BSP_DEPTH,
            min_leaf: consts::MIN_LEAF_SIZE,
            min_room: consts::MIN_ROOM_SIZE,
            max_ratio: consts::MAX_HV_RATIO,
            max_room_monsters: consts::MAX_ROOM_MONSTERS,
            max_room_items: consts::MAX_ROOM_ITEMS,
            max_room_torches: consts::MAX_ROOM_TORCHES,
            lock_chance: consts::LOCK_CHANCE,
        }
    }
}

/// Everything generation hands to gameplay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedLevel {
    pub level: Level,
    pub topology: TopologyMap,
    pub steps: Vec<PuzzleStep>,
    /// Sector the player starts in
    pub entry: Option<SectorId>,
    /// Sector holding the down stairway
    pub exit: Option<SectorId>,
}

/// Generate a complete level
///
/// Either fully succeeds or returns the single fatal error: a mandatory
/// connector whose door actor went missing. Everything else (undersized
/// leaves, trivial topologies, declined locks) degrades gracefully into a
/// smaller or puzzle-free level.
pub fn generate_level(cfg: &GenConfig, rng: &mut GameRng) -> Result<GeneratedLevel, GenError> {
    let mut level = Level::new(cfg.width, cfg.height, cfg.depth);

    let report = BspDigger::new(cfg).dig(&mut level, rng);
    place_doors(&mut level, &report.candidates);
    populate_rooms(&mut level, cfg, rng);

    let mut topo = sectorize(&level, level.stairs_down);
    detect_guts(&mut topo);

    let (steps, entry, exit) = match find_entry_exit(&topo) {
        Some((exit, entry, _)) => {
            // the puzzle reasons about sectors; move the physical endpoints
            // onto the cells it reasons about
            level.spawn = topo.sector(entry).seed;
            level.stairs_down = topo.sector(exit).seed;
            let steps = build_puzzle(&mut topo, exit, entry, cfg.lock_chance, rng);
            apply_puzzle(&mut level, &topo, &steps, rng)?;
            (steps, Some(entry), Some(exit))
        }
        None => (Vec::new(), None, None),
    };

    Ok(GeneratedLevel {
        level,
        topology: topo,
        steps,
        entry,
        exit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_generates() {
        let mut rng = GameRng::new(12345);
        let result = generate_level(&GenConfig::default(), &mut rng).unwrap();
        assert!(!result.level.rooms.is_empty());
        assert!(result.topology.sector_count() >= 1);
        assert!(result.level.is_walkable(result.level.spawn));
        assert!(result.level.is_walkable(result.level.stairs_down));
    }

    #[test]
    fn test_spawn_and_stairs_match_sectors() {
        let mut rng = GameRng::new(99);
        let result = generate_level(&GenConfig::default(), &mut rng).unwrap();
        let (Some(entry), Some(exit)) = (result.entry, result.exit) else {
            panic!("default map should have a topology");
        };
        assert_eq!(result.topology.sector_at(result.level.spawn), Some(entry));
        assert_eq!(
            result.topology.sector_at(result.level.stairs_down),
            Some(exit)
        );
    }

    #[test]
    fn test_degenerate_map_is_not_an_error() {
        // too small for a single room: no sectors, no puzzle, no panic
        let cfg = GenConfig {
            width: 5,
            height: 5,
            bsp_depth: 2,
            ..GenConfig::default()
        };
        let mut rng = GameRng::new(1);
        let result = generate_level(&cfg, &mut rng).unwrap();
        assert_eq!(result.topology.sector_count(), 0);
        assert!(result.steps.is_empty());
        assert_eq!(result.entry, None);
    }
}
