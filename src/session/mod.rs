use crate::game_logic::abilities::ItemKind;
use crate::game_logic::mining::{MiningOutcome, MiningRules};
use crate::interfaces::{
    AbilityActor, EntityKind, EntitySpawner, InputEvent, SessionNotifier, SpawnHandle,
    TerrainSurface,
};
use crate::map::{Cell, TerrainGrid};
use crate::pathfinding::Navigator;
use crate::placement::Level;
use crate::terrain::GridLayout;
use bevy::log::{debug, info};
use bevy::math::Vec2;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutstandingItem {
    pub kind: ItemKind,
    pub handle: SpawnHandle,
}

/// What an input event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Path planned with this many waypoints; zero means no route
    Planned(usize),
    Mining(MiningOutcome),
    /// The session is over
    Ignored,
}

/// One round of play on a generated level
#[derive(Debug, Clone)]
pub struct Session {
    pub grid: TerrainGrid,
    pub layout: GridLayout,
    pub navigator: Navigator,
    pub mining: MiningRules,
    pub player_start: Vec2,
    pub player_handle: SpawnHandle,
    items: HashMap<Cell, OutstandingItem>,
    finished: bool,
}

impl Session {
    /// Mirror the level onto the surface and spawn its entities
    pub fn start(
        level: &Level,
        mining: MiningRules,
        surface: &mut impl TerrainSurface,
        spawner: &mut impl EntitySpawner,
    ) -> Self {
        let grid = level.grid.clone();
        let layout = level.layout();

        surface.clear_all();
        for cell in grid.cells() {
            surface.set_tile(cell, grid.get(cell));
        }

        let player_start = layout.cell_center(level.player);
        let player_handle = spawner.spawn(EntityKind::Player, player_start);

        let items = level
            .placements
            .iter()
            .map(|record| {
                let handle =
                    spawner.spawn(EntityKind::Item(record.item), layout.cell_center(record.cell));
                (
                    record.cell,
                    OutstandingItem {
                        kind: record.item,
                        handle,
                    },
                )
            })
            .collect();

        info!(
            "Session started on seed {} with {} item(s)",
            level.seed,
            level.placements.len()
        );

        Self {
            grid,
            layout,
            navigator: Navigator::new(),
            mining,
            player_start,
            player_handle,
            items,
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn item_at(&self, cell: Cell) -> Option<ItemKind> {
        self.items.get(&cell).map(|item| item.kind)
    }

    pub fn handle_input(
        &mut self,
        event: InputEvent,
        position: Vec2,
        actor: &impl AbilityActor,
        surface: &mut impl TerrainSurface,
    ) -> InputOutcome {
        if self.finished {
            return InputOutcome::Ignored;
        }

        match event {
            InputEvent::Primary(target) => InputOutcome::Planned(self.navigator.request(
                &self.grid,
                &self.layout,
                position,
                target,
                actor.abilities(),
            )),
            InputEvent::Secondary(target) => {
                let actor_cell = self.layout.world_to_cell(position);
                let target_cell = self.layout.world_to_cell(target);
                let outcome =
                    self.mining
                        .try_mine(&mut self.grid, actor.abilities(), actor_cell, target_cell);
                if outcome == MiningOutcome::Mined {
                    surface.set_tile(target_cell, self.grid.get(target_cell));
                    info!("Mined mountain at {target_cell}");
                } else {
                    debug!("Mining {target_cell} failed: {outcome:?}");
                }
                InputOutcome::Mining(outcome)
            }
        }
    }

    /// Advance along the current path
    pub fn step(&mut self, position: Vec2, max_step: f32) -> Vec2 {
        if self.finished {
            return position;
        }
        self.navigator.advance(position, max_step)
    }

    /// Pick up whatever lies under `position`
    pub fn collect_at(
        &mut self,
        position: Vec2,
        actor: &mut impl AbilityActor,
        spawner: &mut impl EntitySpawner,
        notifier: &mut impl SessionNotifier,
    ) -> Option<ItemKind> {
        if self.finished {
            return None;
        }

        let cell = self.layout.world_to_cell(position);
        let item = self.items.remove(&cell)?;
        spawner.despawn(item.handle);

        match item.kind.capability() {
            Some(capability) => {
                if actor.grant(capability) {
                    info!("Picked up {}: {capability:?} unlocked", item.kind);
                }
            }
            None => {
                info!("Goal reached");
                self.finished = true;
                self.navigator.clear();
                notifier.on_goal_reached();
            }
        }

        Some(item.kind)
    }
}
