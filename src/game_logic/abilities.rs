use crate::map::TerrainKind;
use serde::{Deserialize, Serialize};

/// A single unlockable capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    Sail,
    Climb,
    Mine,
}

/// Traversal and interaction capabilities; only ever grows during a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AbilitySet {
    pub can_sail: bool,
    pub can_climb: bool,
    pub can_mine: bool,
}

impl AbilitySet {
    pub const ALL: AbilitySet = AbilitySet {
        can_sail: true,
        can_climb: true,
        can_mine: true,
    };

    pub fn has(&self, capability: Capability) -> bool {
        match capability {
            Capability::Sail => self.can_sail,
            Capability::Climb => self.can_climb,
            Capability::Mine => self.can_mine,
        }
    }

    /// Unlock a capability; returns true if it was newly gained
    pub fn grant(&mut self, capability: Capability) -> bool {
        let newly = !self.has(capability);
        match capability {
            Capability::Sail => self.can_sail = true,
            Capability::Climb => self.can_climb = true,
            Capability::Mine => self.can_mine = true,
        }
        newly
    }

    /// Walkability predicate shared by the navigator and play-time checks
    pub fn can_enter(&self, kind: TerrainKind) -> bool {
        match kind {
            TerrainKind::Grass => true,
            TerrainKind::Water => self.can_sail,
            TerrainKind::Mountain => self.can_climb,
            TerrainKind::Empty => false,
        }
    }

    /// Terrain kinds this set can walk on
    pub fn walkable_kinds(&self) -> Vec<TerrainKind> {
        TerrainKind::PLACEABLE
            .into_iter()
            .filter(|&k| self.can_enter(k))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Boat,
    Goat,
    Pickaxe,
    Goal,
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [ItemKind::Goat, ItemKind::Boat, ItemKind::Pickaxe, ItemKind::Goal];

    /// Capability granted on pickup; the Goal grants none and ends the session
    pub fn capability(self) -> Option<Capability> {
        match self {
            ItemKind::Boat => Some(Capability::Sail),
            ItemKind::Goat => Some(Capability::Climb),
            ItemKind::Pickaxe => Some(Capability::Mine),
            ItemKind::Goal => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Boat => "BOAT",
            ItemKind::Goat => "GOAT",
            ItemKind::Pickaxe => "PICKAXE",
            ItemKind::Goal => "GOAL",
        }
    }

    /// Map glyph used by text renderings
    pub fn glyph(self) -> char {
        match self {
            ItemKind::Boat => 'B',
            ItemKind::Goat => 'G',
            ItemKind::Pickaxe => 'P',
            ItemKind::Goal => '*',
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
