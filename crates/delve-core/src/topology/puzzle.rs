//! Lock-and-key puzzle construction.
//!
//! Walks the sector path from the exit back toward the entry, locking
//! mandatory passages and dropping each key where it stays reachable, so the
//! finished level is always completable.

use serde::{Deserialize, Serialize};

use super::graph::{ConnectorId, SearchOpts, SectorId, TopologyMap};
use crate::actor;
use crate::dungeon::{Level, Pos};
use crate::errors::GenError;
use crate::rng::GameRng;

/// One locked connector paired with the sector holding its key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleStep {
    pub connector: ConnectorId,
    pub key_sector: SectorId,
    pub key: u32,
}

/// Overlay locks and key assignments on the graph
///
/// Runs as an explicit loop: the goal cursor starts at the exit sector and,
/// after each placed key, moves to the key's sector, always pathing back
/// toward the entry. On each pass the first still-unlocked gut connector on
/// the unlocked-only shortest path gets locked with the current key number,
/// unless the percent roll declines, in which case the cursor walks past it
/// and the key number advances anyway. The key lands in the sector farthest
/// from the entry among those reachable without crossing any lock, which
/// keeps every key collectible before its lock.
pub fn build_puzzle(
    topo: &mut TopologyMap,
    exit: SectorId,
    entry: SectorId,
    lock_chance: u32,
    rng: &mut GameRng,
) -> Vec<PuzzleStep> {
    let unlocked = SearchOpts {
        skip_locked: true,
        ..SearchOpts::default()
    };
    let mut steps = Vec::new();
    let mut goal = exit;
    let mut key = 1u32;

    loop {
        let Some(path) = topo.shortest_path(goal, entry, &unlocked) else {
            break;
        };
        if path.len() < 2 {
            // goal and entry share a sector: nothing left to guard
            break;
        }

        let hit = path.iter().skip(1).find(|hop| {
            hop.via.is_some_and(|cid| {
                let c = topo.connector(cid);
                c.gut && c.lock.is_none()
            })
        });
        let Some(hop) = hit else {
            break;
        };
        // the sector on the entry side of the passage
        let beyond = hop.sector;
        let Some(cid) = hop.via else {
            break;
        };

        if !rng.percent(lock_chance) {
            // leave this one open and keep hunting deeper
            goal = beyond;
            key += 1;
            continue;
        }

        topo.connector_mut(cid).lock = Some(key);

        // stash the key as deep as possible while still collectible
        let dist = topo.distances_from(entry, &unlocked);
        let mut key_sector = entry;
        let mut hops = 0;
        for (idx, d) in dist.iter().enumerate() {
            if let Some(d) = d {
                if *d > hops {
                    hops = *d;
                    key_sector = SectorId(idx as u32);
                }
            }
        }

        topo.sector_mut(key_sector).key = Some(key);
        steps.push(PuzzleStep {
            connector: cid,
            key_sector,
            key,
        });

        if key_sector == entry {
            break;
        }
        goal = key_sector;
        key += 1;
    }
    steps
}

/// Physically place the puzzle: lock door actors and drop key actors
///
/// A locked connector must have a door actor at its position; a missing door
/// means the digger and the analyzer disagree about the level, which is
/// unrecoverable.
pub fn apply_puzzle(
    level: &mut Level,
    topo: &TopologyMap,
    steps: &[PuzzleStep],
    rng: &mut GameRng,
) -> Result<(), GenError> {
    for step in steps {
        let c = topo.connector(step.connector);
        let Some(door_id) = level.actors.door_at(c.pos) else {
            return Err(GenError::MissingDoor {
                connector: c.id.0,
                x: c.pos.x,
                y: c.pos.y,
            });
        };
        if let Some(door) = level.actors.get_mut(door_id) {
            door.set_lock(step.key);
        }

        let sector = topo.sector(step.key_sector);
        let n = rng.rnd(sector.cell_count);
        if let Some(pos) = nth_sector_cell(level, topo, step.key_sector, n) {
            if let Some(mut key) = actor::create("key") {
                key.key_id = Some(step.key);
                key.move_to(pos);
                level.actors.register(key);
            }
        }
    }
    Ok(())
}

/// The Nth cell owned by a sector, in column-major grid order
///
/// N counts from 1; a single ordered scan makes the uniform pick
/// reproducible.
fn nth_sector_cell(level: &Level, topo: &TopologyMap, sector: SectorId, n: u32) -> Option<Pos> {
    let mut remaining = n;
    for x in 0..level.width {
        for y in 0..level.height {
            let pos = Pos::new(x, y);
            if topo.sector_at(pos) == Some(sector) {
                remaining -= 1;
                if remaining == 0 {
                    return Some(pos);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Chain of sectors joined by closed connectors, all guts
    fn chain(n: u32) -> TopologyMap {
        let mut topo = TopologyMap::new();
        for i in 0..n {
            topo.add_sector(Pos::new(i as i32 * 10, 0));
        }
        for i in 0..n.saturating_sub(1) {
            let cid = topo.add_connector(Pos::new(i as i32 * 10 + 5, 0), SectorId(i));
            topo.close_connector(cid, SectorId(i + 1));
            topo.connector_mut(cid).gut = true;
        }
        topo
    }

    #[test]
    fn test_linear_chain_layers_fully() {
        // entry 0 .. exit 4; locking always succeeds
        let mut topo = chain(5);
        let mut rng = GameRng::new(42);
        let steps = build_puzzle(&mut topo, SectorId(4), SectorId(0), 100, &mut rng);

        assert_eq!(steps.len(), 4);
        for (i, step) in steps.iter().enumerate() {
            assert_eq!(step.key, i as u32 + 1);
            // each lock sits one sector closer to the entry
            assert_eq!(step.connector, ConnectorId(3 - i as u32));
            // and its key one sector behind the lock
            assert_eq!(step.key_sector, SectorId(3 - i as u32));
        }
        // the last key rests in the entry sector itself
        assert_eq!(steps.last().unwrap().key_sector, SectorId(0));
    }

    #[test]
    fn test_always_skip_locks_nothing() {
        let mut topo = chain(5);
        let mut rng = GameRng::new(42);
        let steps = build_puzzle(&mut topo, SectorId(4), SectorId(0), 0, &mut rng);
        assert!(steps.is_empty());
        assert!(topo.connectors().iter().all(|c| c.lock.is_none()));
        assert!(topo.sectors().iter().all(|s| s.key.is_none()));
    }

    #[test]
    fn test_same_sector_no_puzzle() {
        let mut topo = chain(1);
        let mut rng = GameRng::new(42);
        let steps = build_puzzle(&mut topo, SectorId(0), SectorId(0), 100, &mut rng);
        assert!(steps.is_empty());
    }

    #[test]
    fn test_no_gut_no_locks() {
        let mut topo = chain(3);
        for c in [ConnectorId(0), ConnectorId(1)] {
            topo.connector_mut(c).gut = false;
        }
        let mut rng = GameRng::new(42);
        let steps = build_puzzle(&mut topo, SectorId(2), SectorId(0), 100, &mut rng);
        assert!(steps.is_empty());
    }

    /// Sectors reachable from `start` using unlocked connectors plus locks
    /// whose key is already held
    fn reachable_with_keys(topo: &TopologyMap, start: SectorId, keys: &[u32]) -> Vec<bool> {
        let mut seen = vec![false; topo.sector_count()];
        seen[start.0 as usize] = true;
        let mut queue = vec![start];
        while let Some(cur) = queue.pop() {
            for &cid in &topo.sector(cur).connectors {
                let c = topo.connector(cid);
                if c.lock.is_some_and(|k| !keys.contains(&k)) {
                    continue;
                }
                if let Some(next) = c.other_side(cur) {
                    if !seen[next.0 as usize] {
                        seen[next.0 as usize] = true;
                        queue.push(next);
                    }
                }
            }
        }
        seen
    }

    #[test]
    fn test_progression_is_solvable() {
        let mut topo = chain(6);
        let mut rng = GameRng::new(7);
        let steps = build_puzzle(&mut topo, SectorId(5), SectorId(0), 100, &mut rng);
        assert!(!steps.is_empty());

        // collect every key the entry side can reach, unlock, repeat
        let mut keys: Vec<u32> = Vec::new();
        loop {
            let reach = reachable_with_keys(&topo, SectorId(0), &keys);
            let mut progressed = false;
            for s in topo.sectors() {
                if reach[s.id.0 as usize] {
                    if let Some(k) = s.key {
                        if !keys.contains(&k) {
                            keys.push(k);
                            progressed = true;
                        }
                    }
                }
            }
            if !progressed {
                break;
            }
        }
        let reach = reachable_with_keys(&topo, SectorId(0), &keys);
        assert!(reach[5], "exit stays reachable after gathering keys");
        assert_eq!(keys.len(), steps.len(), "every key is collectible");
    }
}
