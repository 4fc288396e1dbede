use crate::game_logic::abilities::AbilitySet;
use crate::plugins::player::Player;
use crate::plugins::world::{ActiveLevel, GoalReached};
use crate::resources::*;
use bevy::app::AppExit;
use bevy::prelude::*;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_systems(Update, (handle_exit_events, handle_regenerate))
            .add_systems(OnEnter(GameState::Playing), setup_game_ui)
            .add_systems(
                Update,
                (update_hud, toggle_instructions).run_if(in_state(GameState::Playing)),
            )
            .add_systems(Update, show_win_panel)
            .add_systems(OnEnter(GameState::Failed), setup_failure_ui)
            .add_systems(OnEnter(GameState::Generating), cleanup_game_ui);
    }
}

#[derive(Component)]
pub struct GameUI;

#[derive(Component)]
pub struct AbilityText;

#[derive(Component)]
pub struct InstructionsPanel;

const INSTRUCTIONS: &str = "Left click: walk there\n\
    Right click: mine an adjacent mountain (needs PICKAXE)\n\
    BOAT lets you sail water, GOAT lets you climb mountains\n\
    Reach the GOAL to win\n\
    H: toggle help   R: new map   Esc: quit";

pub fn ability_line(abilities: AbilitySet) -> String {
    let flag = |on: bool| if on { "yes" } else { "no" };
    format!(
        "Sail: {}  Climb: {}  Mine: {}",
        flag(abilities.can_sail),
        flag(abilities.can_climb),
        flag(abilities.can_mine)
    )
}

fn handle_exit_events(keys: Res<ButtonInput<KeyCode>>, mut exit: EventWriter<AppExit>) {
    if keys.just_pressed(KeyCode::Escape) {
        exit.write(AppExit::Success);
    }
}

fn handle_regenerate(
    keys: Res<ButtonInput<KeyCode>>,
    current_state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keys.just_pressed(KeyCode::KeyR) && *current_state.get() != GameState::Generating {
        info!("Regenerating level");
        next_state.set(GameState::Generating);
    }
}

fn setup_game_ui(mut commands: Commands, config: Res<GameConfig>, level: Option<Res<ActiveLevel>>) {
    let font_size = config.settings.hud_font_size;
    let seed_line = level
        .map(|l| format!("Seed {} ({} restarts)", l.0.seed, l.0.restarts))
        .unwrap_or_default();

    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::SpaceBetween,
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(10.0)),
                ..default()
            },
            GameUI,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(ability_line(AbilitySet::default())),
                TextFont {
                    font_size,
                    ..default()
                },
                TextColor(Color::WHITE),
                AbilityText,
            ));

            parent.spawn((
                Text::new(seed_line),
                TextFont {
                    font_size: font_size * 0.8,
                    ..default()
                },
                TextColor(Color::srgb(0.7, 0.7, 0.7)),
            ));

            let visibility = if config.settings.show_instructions {
                Visibility::Inherited
            } else {
                Visibility::Hidden
            };
            parent.spawn((
                Text::new(INSTRUCTIONS),
                TextFont {
                    font_size: font_size * 0.9,
                    ..default()
                },
                TextColor(Color::srgb(0.85, 0.85, 0.85)),
                BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
                visibility,
                InstructionsPanel,
            ));
        });
}

fn update_hud(
    player_query: Query<&Player, Changed<Player>>,
    mut texts: Query<&mut Text, With<AbilityText>>,
) {
    let Ok(player) = player_query.single() else {
        return;
    };
    for mut text in texts.iter_mut() {
        text.0 = ability_line(player.abilities);
    }
}

fn toggle_instructions(
    keys: Res<ButtonInput<KeyCode>>,
    mut panels: Query<&mut Visibility, With<InstructionsPanel>>,
) {
    if !keys.just_pressed(KeyCode::KeyH) {
        return;
    }
    for mut visibility in panels.iter_mut() {
        *visibility = match *visibility {
            Visibility::Hidden => Visibility::Inherited,
            _ => Visibility::Hidden,
        };
    }
}

fn spawn_banner(commands: &mut Commands, message: &str, color: Color) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            GameUI,
        ))
        .with_children(|parent| {
            parent.spawn((
                Node {
                    padding: UiRect::all(Val::Px(24.0)),
                    ..default()
                },
                BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.8)),
            ))
            .with_children(|panel| {
                panel.spawn((
                    Text::new(message),
                    TextFont {
                        font_size: 32.0,
                        ..default()
                    },
                    TextColor(color),
                ));
            });
        });
}

/// Freeze time and congratulate the player
fn show_win_panel(
    mut commands: Commands,
    mut events: EventReader<GoalReached>,
    mut time: ResMut<Time<Virtual>>,
) {
    if events.read().last().is_none() {
        return;
    }
    time.pause();
    spawn_banner(
        &mut commands,
        "You reached the goal!\nPress R for a new map",
        Color::srgb(1.0, 0.84, 0.0),
    );
}

fn setup_failure_ui(mut commands: Commands) {
    spawn_banner(
        &mut commands,
        "No playable level could be generated.\nCheck the log, then press R to retry",
        Color::srgb(0.9, 0.3, 0.3),
    );
}

fn cleanup_game_ui(mut commands: Commands, game_ui_query: Query<Entity, With<GameUI>>) {
    for ui_entity in game_ui_query.iter() {
        commands.entity(ui_entity).despawn();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ability_line() {
        assert_eq!(
            ability_line(AbilitySet::default()),
            "Sail: no  Climb: no  Mine: no"
        );
        assert_eq!(ability_line(AbilitySet::ALL), "Sail: yes  Climb: yes  Mine: yes");
    }
}
