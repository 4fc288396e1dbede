//! Seams between the engine and whatever hosts it.
//!
//! The Bevy plugins implement these with sprites and events; the tests use
//! the in-memory recorders at the bottom of this file.

use crate::game_logic::abilities::{AbilitySet, Capability, ItemKind};
use crate::map::{Cell, TerrainGrid, TerrainKind};
use crate::terrain::GridLayout;
use bevy::math::Vec2;
use std::collections::HashMap;

/// A tile renderer that mirrors the authoritative grid
pub trait TerrainSurface {
    fn set_tile(&mut self, cell: Cell, kind: TerrainKind);
    fn clear_all(&mut self);
    fn get_tile(&self, cell: Cell) -> TerrainKind;
    fn cell_center(&self, cell: Cell) -> Vec2;
    fn world_to_cell(&self, world: Vec2) -> Cell;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Item(ItemKind),
}

/// Opaque id handed out by an [`EntitySpawner`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpawnHandle(pub u64);

pub trait EntitySpawner {
    fn spawn(&mut self, kind: EntityKind, position: Vec2) -> SpawnHandle;
    fn despawn(&mut self, handle: SpawnHandle);
}

/// Something that carries abilities and can be granted new ones
pub trait AbilityActor {
    fn abilities(&self) -> AbilitySet;
    fn grant(&mut self, capability: Capability) -> bool;
}

impl AbilityActor for AbilitySet {
    fn abilities(&self) -> AbilitySet {
        *self
    }

    fn grant(&mut self, capability: Capability) -> bool {
        AbilitySet::grant(self, capability)
    }
}

pub trait SessionNotifier {
    fn on_goal_reached(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Move to the clicked world position
    Primary(Vec2),
    /// Mine the clicked world position
    Secondary(Vec2),
}

/// Grid-backed surface with no rendering
#[derive(Debug, Clone)]
pub struct MemorySurface {
    pub layout: GridLayout,
    pub tiles: HashMap<Cell, TerrainKind>,
    pub writes: usize,
}

impl MemorySurface {
    pub fn new(layout: GridLayout) -> Self {
        Self {
            layout,
            tiles: HashMap::new(),
            writes: 0,
        }
    }

    /// Whether every cell of `grid` is mirrored exactly
    pub fn matches(&self, grid: &TerrainGrid) -> bool {
        grid.cells().all(|c| self.get_tile(c) == grid.get(c))
    }
}

impl TerrainSurface for MemorySurface {
    fn set_tile(&mut self, cell: Cell, kind: TerrainKind) {
        self.writes += 1;
        self.tiles.insert(cell, kind);
    }

    fn clear_all(&mut self) {
        self.tiles.clear();
    }

    fn get_tile(&self, cell: Cell) -> TerrainKind {
        self.tiles.get(&cell).copied().unwrap_or_default()
    }

    fn cell_center(&self, cell: Cell) -> Vec2 {
        self.layout.cell_center(cell)
    }

    fn world_to_cell(&self, world: Vec2) -> Cell {
        self.layout.world_to_cell(world)
    }
}

/// Spawner that only records what is alive
#[derive(Debug, Clone, Default)]
pub struct RecordingSpawner {
    next: u64,
    pub alive: HashMap<SpawnHandle, (EntityKind, Vec2)>,
}

impl RecordingSpawner {
    pub fn count(&self, kind: EntityKind) -> usize {
        self.alive.values().filter(|(k, _)| *k == kind).count()
    }
}

impl EntitySpawner for RecordingSpawner {
    fn spawn(&mut self, kind: EntityKind, position: Vec2) -> SpawnHandle {
        self.next += 1;
        let handle = SpawnHandle(self.next);
        self.alive.insert(handle, (kind, position));
        handle
    }

    fn despawn(&mut self, handle: SpawnHandle) {
        self.alive.remove(&handle);
    }
}

/// Counts goal notifications
#[derive(Debug, Clone, Copy, Default)]
pub struct GoalCounter(pub u32);

impl SessionNotifier for GoalCounter {
    fn on_goal_reached(&mut self) {
        self.0 += 1;
    }
}
