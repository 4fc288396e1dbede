use crate::game_logic::abilities::AbilitySet;
use crate::map::{Cell, TerrainGrid, TerrainKind};
use serde::{Deserialize, Serialize};

/// Which cells count as within reach for mining
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MiningRules {
    /// Use 8-adjacency instead of 4-adjacency
    pub allow_diagonal: bool,
    /// Allow mining the tile the actor stands on
    pub allow_current_tile: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiningOutcome {
    Mined,
    NoAbility,
    OutOfRange,
    NotMountain,
}

impl MiningRules {
    pub fn in_range(&self, actor: Cell, target: Cell) -> bool {
        let dx = actor.x.abs_diff(target.x);
        let dy = actor.y.abs_diff(target.y);

        if dx == 0 && dy == 0 {
            return self.allow_current_tile;
        }
        if self.allow_diagonal {
            dx.max(dy) == 1
        } else {
            matches!((dx, dy), (1, 0) | (0, 1))
        }
    }

    /// Convert a Mountain tile to Grass if the actor may mine it
    pub fn try_mine(
        &self,
        grid: &mut TerrainGrid,
        abilities: AbilitySet,
        actor: Cell,
        target: Cell,
    ) -> MiningOutcome {
        if !abilities.can_mine {
            return MiningOutcome::NoAbility;
        }
        if !self.in_range(actor, target) {
            return MiningOutcome::OutOfRange;
        }
        if grid.get(target) != TerrainKind::Mountain {
            return MiningOutcome::NotMountain;
        }

        grid.set(target, TerrainKind::Grass);
        MiningOutcome::Mined
    }
}
