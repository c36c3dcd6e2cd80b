//! Grid-to-graph extraction.
//!
//! Flood-fills the carved grid into sectors separated by door cells, closes
//! connectors across doors, marks mandatory passages, and picks the
//! entry/exit sector pair.

use std::collections::VecDeque;

use super::graph::{ConnectorId, SearchOpts, SectorId, TopologyMap};
use crate::dungeon::{Level, Pos, CARDINALS};

/// Partition the walkable grid into sectors and connectors
///
/// `start` seeds the first fill; every walkable cell reachable from it ends
/// up owned by exactly one sector, and every door cell met along the way by
/// exactly one connector. A door whose far side folds back into the same
/// sector keeps its connector half-open (a dummy).
pub fn sectorize(level: &Level, start: Pos) -> TopologyMap {
    let mut topo = TopologyMap::new();
    let mut seeds = VecDeque::from([start]);

    while let Some(seed) = seeds.pop_front() {
        if !level.is_walkable(seed) || level.actors.door_at(seed).is_some() {
            continue;
        }
        if topo.sector_at(seed).is_some() {
            continue;
        }
        let sector = topo.add_sector(seed);
        flood_sector(level, &mut topo, sector, seed, &mut seeds);
    }
    topo
}

/// Grow one sector from its seed, spawning new seeds across doors
fn flood_sector(
    level: &Level,
    topo: &mut TopologyMap,
    sector: SectorId,
    seed: Pos,
    seeds: &mut VecDeque<Pos>,
) {
    let mut queue = VecDeque::from([seed]);
    topo.claim_cell(seed, sector);

    while let Some(p) = queue.pop_front() {
        for (dx, dy) in CARDINALS {
            let n = p.offset(dx, dy);
            if !level.is_walkable(n) {
                continue;
            }
            if level.actors.door_at(n).is_some() {
                match topo.connector_at(n) {
                    None => {
                        topo.add_connector(n, sector);
                        // keep filling from the far side of the door
                        seeds.push_back(n.offset(dx, dy));
                    }
                    Some(cid) => {
                        let c = topo.connector(cid);
                        if c.sector2.is_none() && c.sector1 != sector {
                            topo.close_connector(cid, sector);
                        }
                    }
                }
                continue;
            }
            if topo.sector_at(n).is_none() {
                topo.claim_cell(n, sector);
                queue.push_back(n);
            }
        }
    }
}

/// Flag every connector that is the only route between its two sectors
///
/// For each closed connector, search from one side using every connector but
/// the tested one; failing to reach the far side makes it a gut. Dummy
/// connectors are skipped.
pub fn detect_guts(topo: &mut TopologyMap) {
    for idx in 0..topo.connector_count() {
        let id = ConnectorId(idx as u32);
        let c = topo.connector(id);
        let Some(sector2) = c.sector2 else {
            continue;
        };
        let opts = SearchOpts {
            exclude: Some(id),
            ..SearchOpts::default()
        };
        let alternate = topo.reachable(c.sector1, sector2, &opts);
        topo.connector_mut(id).gut = !alternate;
    }
}

/// Pick the exit/entry sector pair
///
/// Scans every dead-end sector, pairing it with its graph-farthest sector;
/// the pair with the globally longest hop distance wins, the dead end taking
/// the exit role. With no dead ends anywhere the scan repeats over all
/// sectors. Returns `None` only for an empty graph.
pub fn find_entry_exit(topo: &TopologyMap) -> Option<(SectorId, SectorId, u32)> {
    let dead_ends: Vec<SectorId> = topo
        .sectors()
        .iter()
        .filter(|s| s.dead_end)
        .map(|s| s.id)
        .collect();
    let pool: Vec<SectorId> = if dead_ends.is_empty() {
        topo.sectors().iter().map(|s| s.id).collect()
    } else {
        dead_ends
    };

    let mut best: Option<(SectorId, SectorId, u32)> = None;
    for &candidate in &pool {
        let dist = topo.distances_from(candidate, &SearchOpts::default());
        let mut farthest = candidate;
        let mut hops = 0;
        for (idx, d) in dist.iter().enumerate() {
            if let Some(d) = d {
                if *d > hops {
                    hops = *d;
                    farthest = SectorId(idx as u32);
                }
            }
        }
        if best.is_none_or(|(_, _, b)| hops > b) {
            best = Some((candidate, farthest, hops));
        }
    }
    best
}
