//! Topology system
//!
//! Turns the carved grid into a sector/connector graph and overlays the
//! lock-and-key puzzle on it.

mod analyzer;
mod graph;
mod puzzle;

pub use analyzer::{detect_guts, find_entry_exit, sectorize};
pub use graph::{
    Connector, ConnectorId, PathHop, SearchOpts, Sector, SectorId, TopoRef, TopologyMap,
};
pub use puzzle::{apply_puzzle, build_puzzle, PuzzleStep};
