use crate::game_logic::abilities::ItemKind;
use crate::game_logic::errors::TileQuestResult;
use crate::interfaces::{EntityKind, EntitySpawner, SessionNotifier, SpawnHandle, TerrainSurface};
use crate::map::{Cell, TerrainKind};
use crate::placement::{Level, PlacementEngine};
use crate::plugins::player::Player;
use crate::resources::{GameConfig, GameState, TileCatalog};
use crate::session::Session;
use crate::terrain::GridLayout;
use bevy::prelude::*;
use std::collections::HashMap;

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<GoalReached>()
            .insert_resource(GoalFlag::default())
            .add_systems(
                OnEnter(GameState::Generating),
                (clear_world, generate_level).chain(),
            )
            .add_systems(
                Update,
                (sync_tiles, sync_entities, emit_goal_reached)
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

#[derive(Event, Debug, Clone, Copy)]
pub struct GoalReached;

#[derive(Resource, Clone, Debug)]
pub struct ActiveLevel(pub Level);

#[derive(Resource, Clone, Debug)]
pub struct ActiveSession(pub Session);

#[derive(Component)]
pub struct TileSprite {
    pub cell: Cell,
}

#[derive(Component)]
pub struct SpawnedEntity {
    pub handle: SpawnHandle,
    pub kind: EntityKind,
}

/// Mirrors the grid as tile sprites; writes queue a redraw of that cell
#[derive(Resource, Debug)]
pub struct TileSurface {
    pub layout: GridLayout,
    tiles: HashMap<Cell, TerrainKind>,
    dirty: Vec<Cell>,
    sprites: HashMap<Cell, Entity>,
}

impl TileSurface {
    pub fn new(layout: GridLayout) -> Self {
        Self {
            layout,
            tiles: HashMap::new(),
            dirty: Vec::new(),
            sprites: HashMap::new(),
        }
    }
}

impl TerrainSurface for TileSurface {
    fn set_tile(&mut self, cell: Cell, kind: TerrainKind) {
        self.tiles.insert(cell, kind);
        self.dirty.push(cell);
    }

    fn clear_all(&mut self) {
        self.dirty.extend(self.tiles.keys().copied());
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

/// Spawn and despawn requests waiting for the next frame
#[derive(Resource, Debug, Default)]
pub struct EntityQueue {
    next: u64,
    spawns: Vec<(SpawnHandle, EntityKind, Vec2)>,
    despawns: Vec<SpawnHandle>,
}

impl EntitySpawner for EntityQueue {
    fn spawn(&mut self, kind: EntityKind, position: Vec2) -> SpawnHandle {
        self.next += 1;
        let handle = SpawnHandle(self.next);
        self.spawns.push((handle, kind, position));
        handle
    }

    fn despawn(&mut self, handle: SpawnHandle) {
        self.despawns.push(handle);
    }
}

/// Set by the session, turned into a [`GoalReached`] event each frame
#[derive(Resource, Debug, Default)]
pub struct GoalFlag(pub bool);

impl SessionNotifier for GoalFlag {
    fn on_goal_reached(&mut self) {
        self.0 = true;
    }
}

pub fn item_color(kind: ItemKind) -> Color {
    match kind {
        ItemKind::Boat => Color::srgb(0.55, 0.34, 0.16),
        ItemKind::Goat => Color::srgb(0.95, 0.95, 0.9),
        ItemKind::Pickaxe => Color::srgb(0.75, 0.75, 0.8),
        ItemKind::Goal => Color::srgb(1.0, 0.84, 0.0),
    }
}

fn clear_world(
    mut commands: Commands,
    tiles: Query<Entity, With<TileSprite>>,
    spawned: Query<Entity, With<SpawnedEntity>>,
    mut time: ResMut<Time<Virtual>>,
) {
    for entity in tiles.iter().chain(spawned.iter()) {
        commands.entity(entity).despawn();
    }
    commands.remove_resource::<ActiveSession>();
    time.unpause();
}

fn build_level(config: &GameConfig) -> TileQuestResult<Level> {
    config.settings.tiles.check()?;
    let params = config.settings.generation.to_params()?;
    let mut engine = PlacementEngine::new(params)?;
    info!("Generating level from seed {}", engine.initial_seed());
    engine.generate()
}

pub fn generate_level(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let level = match build_level(&config) {
        Ok(level) => level,
        Err(e) => {
            error!("Level setup failed: {e}");
            next_state.set(GameState::Failed);
            return;
        }
    };

    for line in level.summary() {
        info!("{line}");
    }

    let mut surface = TileSurface::new(level.layout());
    let mut queue = EntityQueue::default();
    let session = Session::start(&level, config.settings.mining, &mut surface, &mut queue);

    commands.insert_resource(config.settings.tiles.clone());
    commands.insert_resource(surface);
    commands.insert_resource(queue);
    commands.insert_resource(GoalFlag::default());
    commands.insert_resource(ActiveSession(session));
    commands.insert_resource(ActiveLevel(level));
    next_state.set(GameState::Playing);
}

fn sync_tiles(
    mut commands: Commands,
    mut surface: ResMut<TileSurface>,
    catalog: Res<TileCatalog>,
    mut sprites: Query<&mut Sprite, With<TileSprite>>,
) {
    if surface.dirty.is_empty() {
        return;
    }

    let dirty = std::mem::take(&mut surface.dirty);
    let size = Vec2::splat(surface.layout.cell_size);
    for cell in dirty {
        let kind = surface.get_tile(cell);
        let color = match catalog.color(kind) {
            Ok(color) => color,
            Err(e) => {
                warn!("{e}");
                continue;
            }
        };

        match surface.sprites.get(&cell).copied() {
            Some(entity) => {
                if let Ok(mut sprite) = sprites.get_mut(entity) {
                    sprite.color = color;
                }
            }
            None => {
                let center = surface.cell_center(cell);
                let entity = commands
                    .spawn((
                        Sprite::from_color(color, size),
                        Transform::from_xyz(center.x, center.y, 0.0),
                        TileSprite { cell },
                    ))
                    .id();
                surface.sprites.insert(cell, entity);
            }
        }
    }
}

pub fn sync_entities(
    mut commands: Commands,
    mut queue: ResMut<EntityQueue>,
    config: Res<GameConfig>,
    session: Res<ActiveSession>,
    spawned: Query<(Entity, &SpawnedEntity)>,
) {
    let despawns = std::mem::take(&mut queue.despawns);
    for (entity, marker) in spawned.iter() {
        if despawns.contains(&marker.handle) {
            debug!("Despawning {:?}", marker.kind);
            commands.entity(entity).despawn();
        }
    }

    let cell_size = session.0.layout.cell_size;
    for (handle, kind, position) in std::mem::take(&mut queue.spawns) {
        let marker = SpawnedEntity { handle, kind };
        match kind {
            EntityKind::Player => {
                commands.spawn((
                    Sprite::from_color(Color::srgb(0.85, 0.15, 0.15), Vec2::splat(cell_size * 0.6)),
                    Transform::from_xyz(position.x, position.y, 2.0),
                    Player::new(config.settings.player_movement_speed.get()),
                    marker,
                ));
            }
            EntityKind::Item(item) => {
                commands.spawn((
                    Sprite::from_color(item_color(item), Vec2::splat(cell_size * 0.5)),
                    Transform::from_xyz(position.x, position.y, 1.0),
                    marker,
                ));
            }
        }
    }
}

fn emit_goal_reached(
    mut flag: ResMut<GoalFlag>,
    mut events: EventWriter<GoalReached>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if flag.0 {
        flag.0 = false;
        events.write(GoalReached);
        next_state.set(GameState::Won);
    }
}
