//! Sector/connector graph over the carved grid.
//!
//! Sectors and connectors live in dense-id arenas; adjacency is stored as id
//! lists so every traversal works on integers with explicit visited sets and
//! terminates on cyclic graphs.

use std::collections::VecDeque;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::dungeon::Pos;

/// Dense sector id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectorId(pub u32);

/// Dense connector id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectorId(pub u32);

/// Which topology object owns a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TopoRef {
    Sector(SectorId),
    Connector(ConnectorId),
}

/// A maximal 4-connected walkable region not crossed by doors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sector {
    pub id: SectorId,
    /// Representative cell the flood fill grew from
    pub seed: Pos,
    pub cell_count: u32,
    /// Closed connectors touching this sector
    pub connectors: Vec<ConnectorId>,
    /// Key number stashed in this sector, if any
    pub key: Option<u32>,
    /// True while fewer than two distinct connectors touch the sector
    pub dead_end: bool,
}

/// A door cell joining up to two sectors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connector {
    pub id: ConnectorId,
    pub pos: Pos,
    pub sector1: SectorId,
    /// Unset while open; a connector whose far side resolved to `sector1`
    /// stays unset forever and is a dummy
    pub sector2: Option<SectorId>,
    /// Mandatory passage: the only route between its two sectors
    pub gut: bool,
    /// Key number required to pass, if locked
    pub lock: Option<u32>,
}

impl Connector {
    /// A dummy connector has both sides in one sector and is excluded from
    /// path and puzzle logic
    pub fn is_dummy(&self) -> bool {
        self.sector2.is_none()
    }

    /// The sector across from `from`, for closed connectors
    pub fn other_side(&self, from: SectorId) -> Option<SectorId> {
        let s2 = self.sector2?;
        if from == self.sector1 {
            Some(s2)
        } else if from == s2 {
            Some(self.sector1)
        } else {
            None
        }
    }
}

/// Edge filter for graph searches
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOpts {
    /// Refuse to traverse locked connectors
    pub skip_locked: bool,
    /// Refuse to traverse one specific connector
    pub exclude: Option<ConnectorId>,
}

/// One hop of a sector path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathHop {
    pub sector: SectorId,
    /// Connector crossed to reach `sector`; `None` on the starting hop
    pub via: Option<ConnectorId>,
}

/// Owns all sectors and connectors plus the per-cell lookup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TopologyMap {
    sectors: Vec<Sector>,
    connectors: Vec<Connector>,
    #[serde(with = "cell_lookup")]
    cells: HashMap<Pos, TopoRef>,
}

/// Serialize the cell lookup as a position-sorted pair list
///
/// Map-keyed structs break text formats, and sorting keeps the output
/// independent of hash order.
mod cell_lookup {
    use super::{HashMap, Pos, TopoRef};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        map: &HashMap<Pos, TopoRef>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut entries: Vec<(&Pos, &TopoRef)> = map.iter().collect();
        entries.sort_by_key(|(pos, _)| (pos.x, pos.y));
        entries.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<Pos, TopoRef>, D::Error> {
        let entries = Vec::<(Pos, TopoRef)>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

impl TopologyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new sector growing from `seed`
    pub fn add_sector(&mut self, seed: Pos) -> SectorId {
        let id = SectorId(self.sectors.len() as u32);
        self.sectors.push(Sector {
            id,
            seed,
            cell_count: 0,
            connectors: Vec::new(),
            key: None,
            dead_end: true,
        });
        id
    }

    /// Create an open connector anchored at a door cell
    pub fn add_connector(&mut self, pos: Pos, sector1: SectorId) -> ConnectorId {
        let id = ConnectorId(self.connectors.len() as u32);
        self.connectors.push(Connector {
            id,
            pos,
            sector1,
            sector2: None,
            gut: false,
            lock: None,
        });
        self.cells.insert(pos, TopoRef::Connector(id));
        id
    }

    /// Assign a walkable cell to a sector
    pub fn claim_cell(&mut self, pos: Pos, sector: SectorId) {
        self.cells.insert(pos, TopoRef::Sector(sector));
        self.sectors[sector.0 as usize].cell_count += 1;
    }

    /// Register a connector on a sector, maintaining the dead-end flag
    ///
    /// A second distinct connector clears the flag. Registering an already
    /// known connector again also clears it: a second route to the same
    /// doorway means the sector is not a simple dead end.
    pub fn attach(&mut self, sector: SectorId, connector: ConnectorId) {
        let s = &mut self.sectors[sector.0 as usize];
        if s.connectors.contains(&connector) {
            s.dead_end = false;
        } else {
            s.connectors.push(connector);
            if s.connectors.len() > 1 {
                s.dead_end = false;
            }
        }
    }

    /// Close an open connector onto its far sector and register it on both
    pub fn close_connector(&mut self, connector: ConnectorId, sector2: SectorId) {
        let sector1 = {
            let c = &mut self.connectors[connector.0 as usize];
            c.sector2 = Some(sector2);
            c.sector1
        };
        self.attach(sector1, connector);
        self.attach(sector2, connector);
    }

    /// Pure lookup: sector owning a cell
    pub fn sector_at(&self, pos: Pos) -> Option<SectorId> {
        match self.cells.get(&pos) {
            Some(TopoRef::Sector(id)) => Some(*id),
            _ => None,
        }
    }

    /// Pure lookup: connector anchored at a cell
    pub fn connector_at(&self, pos: Pos) -> Option<ConnectorId> {
        match self.cells.get(&pos) {
            Some(TopoRef::Connector(id)) => Some(*id),
            _ => None,
        }
    }

    pub fn sector(&self, id: SectorId) -> &Sector {
        &self.sectors[id.0 as usize]
    }

    pub fn sector_mut(&mut self, id: SectorId) -> &mut Sector {
        &mut self.sectors[id.0 as usize]
    }

    pub fn connector(&self, id: ConnectorId) -> &Connector {
        &self.connectors[id.0 as usize]
    }

    pub fn connector_mut(&mut self, id: ConnectorId) -> &mut Connector {
        &mut self.connectors[id.0 as usize]
    }

    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    pub fn connectors(&self) -> &[Connector] {
        &self.connectors
    }

    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }

    pub fn connector_count(&self) -> usize {
        self.connectors.len()
    }

    /// Check whether a connector passes the edge filter
    fn usable(&self, c: &Connector, opts: &SearchOpts) -> bool {
        if c.is_dummy() {
            return false;
        }
        if opts.skip_locked && c.lock.is_some() {
            return false;
        }
        opts.exclude != Some(c.id)
    }

    /// BFS hop distances from `start` over usable connectors
    ///
    /// Index i holds `Some(hops)` for reachable sector i, `None` otherwise.
    pub fn distances_from(&self, start: SectorId, opts: &SearchOpts) -> Vec<Option<u32>> {
        let mut dist = vec![None; self.sectors.len()];
        dist[start.0 as usize] = Some(0);
        let mut queue = VecDeque::from([start]);
        while let Some(cur) = queue.pop_front() {
            let d = dist[cur.0 as usize].unwrap_or(0);
            for &cid in &self.sectors[cur.0 as usize].connectors {
                let c = &self.connectors[cid.0 as usize];
                if !self.usable(c, opts) {
                    continue;
                }
                let Some(next) = c.other_side(cur) else {
                    continue;
                };
                if dist[next.0 as usize].is_none() {
                    dist[next.0 as usize] = Some(d + 1);
                    queue.push_back(next);
                }
            }
        }
        dist
    }

    /// Check reachability between two sectors under an edge filter
    pub fn reachable(&self, from: SectorId, to: SectorId, opts: &SearchOpts) -> bool {
        self.distances_from(from, opts)[to.0 as usize].is_some()
    }

    /// Shortest sector path from `from` to `to`, counting hops
    ///
    /// The first hop is `from` itself with no connector. Returns `None` when
    /// the two sectors are not connected under the filter.
    pub fn shortest_path(
        &self,
        from: SectorId,
        to: SectorId,
        opts: &SearchOpts,
    ) -> Option<Vec<PathHop>> {
        let mut prev: Vec<Option<(SectorId, ConnectorId)>> = vec![None; self.sectors.len()];
        let mut seen = vec![false; self.sectors.len()];
        seen[from.0 as usize] = true;
        let mut queue = VecDeque::from([from]);
        while let Some(cur) = queue.pop_front() {
            if cur == to {
                break;
            }
            for &cid in &self.sectors[cur.0 as usize].connectors {
                let c = &self.connectors[cid.0 as usize];
                if !self.usable(c, opts) {
                    continue;
                }
                let Some(next) = c.other_side(cur) else {
                    continue;
                };
                if !seen[next.0 as usize] {
                    seen[next.0 as usize] = true;
                    prev[next.0 as usize] = Some((cur, cid));
                    queue.push_back(next);
                }
            }
        }

        if !seen[to.0 as usize] {
            return None;
        }
        let mut path = Vec::new();
        let mut cur = to;
        while let Some((p, via)) = prev[cur.0 as usize] {
            path.push(PathHop {
                sector: cur,
                via: Some(via),
            });
            cur = p;
        }
        path.push(PathHop {
            sector: from,
            via: None,
        });
        path.reverse();
        Some(path)
    }
}
