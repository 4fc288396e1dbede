use crate::game_logic::abilities::{AbilitySet, Capability};
use crate::game_logic::movement::validate_target;
use crate::interfaces::{AbilityActor, InputEvent};
use crate::plugins::world::{ActiveSession, EntityQueue, GoalFlag, TileSurface, sync_entities};
use crate::resources::GameState;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (handle_player_input, move_player)
                .chain()
                .before(sync_entities)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

#[derive(Component, Debug, Clone)]
pub struct Player {
    pub abilities: AbilitySet,
    /// Tiles per second
    pub speed: f32,
}

impl Player {
    pub fn new(speed: f32) -> Self {
        Self {
            abilities: AbilitySet::default(),
            speed,
        }
    }
}

impl AbilityActor for Player {
    fn abilities(&self) -> AbilitySet {
        self.abilities
    }

    fn grant(&mut self, capability: Capability) -> bool {
        self.abilities.grant(capability)
    }
}

/// Cursor position projected onto the 2D world plane
fn cursor_world_position(
    windows: &Query<&Window, With<PrimaryWindow>>,
    camera_query: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
    let window = windows.single().ok()?;
    let cursor_pos = window.cursor_position()?;
    let (camera, camera_transform) = camera_query.single().ok()?;
    let world = camera.viewport_to_world_2d(camera_transform, cursor_pos).ok()?;
    validate_target(world).then_some(world)
}

fn handle_player_input(
    mouse_button: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
    player_query: Query<(&Transform, &Player)>,
    mut session: ResMut<ActiveSession>,
    mut surface: ResMut<TileSurface>,
) {
    let event = if mouse_button.just_pressed(MouseButton::Left) {
        cursor_world_position(&windows, &camera_query).map(InputEvent::Primary)
    } else if mouse_button.just_pressed(MouseButton::Right) {
        cursor_world_position(&windows, &camera_query).map(InputEvent::Secondary)
    } else {
        None
    };
    let Some(event) = event else {
        return;
    };
    let Ok((transform, player)) = player_query.single() else {
        return;
    };

    let outcome = session.0.handle_input(
        event,
        transform.translation.truncate(),
        player,
        &mut *surface,
    );
    debug!("{event:?} -> {outcome:?}");
}

fn move_player(
    mut player_query: Query<(&mut Transform, &mut Player)>,
    mut session: ResMut<ActiveSession>,
    mut queue: ResMut<EntityQueue>,
    mut goal: ResMut<GoalFlag>,
    time: Res<Time>,
) {
    let Ok((mut transform, mut player)) = player_query.single_mut() else {
        return;
    };

    let max_step = player.speed * session.0.layout.cell_size * time.delta_secs();
    let position = session.0.step(transform.translation.truncate(), max_step);
    transform.translation.x = position.x;
    transform.translation.y = position.y;

    session
        .0
        .collect_at(position, &mut *player, &mut *queue, &mut *goal);
}
