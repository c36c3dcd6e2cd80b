//! Actors created during generation: creatures, items, doors, keys and wall
//! lights.
//!
//! The generator never talks to a live game world. Everything it spawns lands
//! in an [`ActorArena`] owned by the level, and the topology analyzer reaches
//! doors through the arena's `door_at` query instead of a global registry.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::dungeon::Pos;

/// Dense actor id, assigned on registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u32);

/// Actor category
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum ActorKind {
    Creature,
    Item,
    Door,
    Key,
    WallLight,
}

bitflags! {
    /// Door state flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DoorState: u8 {
        const OPEN = 0x01;
        const CLOSED = 0x02;
        const LOCKED = 0x04;
    }
}

// Manual serde impl for DoorState
impl Serialize for DoorState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DoorState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(DoorState::from_bits_truncate(bits))
    }
}

/// A game object placed on the map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// Arena id; 0 until registered
    pub id: ActorId,
    pub name: String,
    pub kind: ActorKind,
    pub pos: Pos,
    pub glyph: char,
    /// Occupies its cell for walkability purposes
    pub blocks: bool,
    /// Must sit on a wall cell with an adjacent floor
    pub wall_mounted: bool,
    /// Door state, present on doors only
    pub door: Option<DoorState>,
    /// Key id required to open this door
    pub lock_id: Option<u32>,
    /// Lock this key opens
    pub key_id: Option<u32>,
}

impl Actor {
    /// Check the actor's category
    pub fn is_a(&self, kind: ActorKind) -> bool {
        self.kind == kind
    }

    /// Move the actor to a new cell
    pub fn move_to(&mut self, pos: Pos) {
        self.pos = pos;
    }

    /// Lock this door so it requires the given key id
    ///
    /// No effect on non-door actors.
    pub fn set_lock(&mut self, key_id: u32) {
        if let Some(state) = self.door.as_mut() {
            *state = DoorState::CLOSED | DoorState::LOCKED;
            self.lock_id = Some(key_id);
        }
    }
}

/// A spawnable actor blueprint
struct Blueprint {
    name: &'static str,
    kind: ActorKind,
    glyph: char,
    blocks: bool,
    wall_mounted: bool,
}

const BLUEPRINTS: &[Blueprint] = &[
    Blueprint { name: "rat", kind: ActorKind::Creature, glyph: 'r', blocks: true, wall_mounted: false },
    Blueprint { name: "kobold", kind: ActorKind::Creature, glyph: 'k', blocks: true, wall_mounted: false },
    Blueprint { name: "orc", kind: ActorKind::Creature, glyph: 'o', blocks: true, wall_mounted: false },
    Blueprint { name: "troll", kind: ActorKind::Creature, glyph: 'T', blocks: true, wall_mounted: false },
    Blueprint { name: "healing potion", kind: ActorKind::Item, glyph: '!', blocks: false, wall_mounted: false },
    Blueprint { name: "scroll of lightning", kind: ActorKind::Item, glyph: '?', blocks: false, wall_mounted: false },
    Blueprint { name: "short sword", kind: ActorKind::Item, glyph: ')', blocks: false, wall_mounted: false },
    Blueprint { name: "torch", kind: ActorKind::WallLight, glyph: '~', blocks: false, wall_mounted: true },
    Blueprint { name: "door", kind: ActorKind::Door, glyph: '+', blocks: true, wall_mounted: false },
    Blueprint { name: "key", kind: ActorKind::Key, glyph: '(', blocks: false, wall_mounted: false },
];

/// Build an actor from its type name
///
/// Returns `None` for unknown names; callers treat that as a failed spawn
/// attempt and move on.
pub fn create(name: &str) -> Option<Actor> {
    let bp = BLUEPRINTS.iter().find(|bp| bp.name == name)?;
    let mut actor = Actor {
        id: ActorId(0),
        name: bp.name.to_string(),
        kind: bp.kind,
        pos: Pos::new(0, 0),
        glyph: bp.glyph,
        blocks: bp.blocks,
        wall_mounted: bp.wall_mounted,
        door: None,
        lock_id: None,
        key_id: None,
    };
    if bp.kind == ActorKind::Door {
        actor.door = Some(DoorState::CLOSED);
    }
    Some(actor)
}

/// Owns every actor on a level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActorArena {
    actors: Vec<Actor>,
}

impl ActorArena {
    /// Create an empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an actor, assigning its id
    pub fn register(&mut self, mut actor: Actor) -> ActorId {
        let id = ActorId(self.actors.len() as u32);
        actor.id = id;
        self.actors.push(actor);
        id
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id.0 as usize)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Find the door actor at a cell, if any
    pub fn door_at(&self, pos: Pos) -> Option<ActorId> {
        self.actors
            .iter()
            .find(|a| a.kind == ActorKind::Door && a.pos == pos)
            .map(|a| a.id)
    }

    /// Find any actor at a cell
    pub fn actor_at(&self, pos: Pos) -> Option<ActorId> {
        self.actors.iter().find(|a| a.pos == pos).map(|a| a.id)
    }

    /// Check whether a blocking occupant sits on the cell
    pub fn blocks_at(&self, pos: Pos) -> bool {
        self.actors.iter().any(|a| a.blocks && a.pos == pos)
    }
}
