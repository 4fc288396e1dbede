use bevy::prelude::*;
use tilequest::config::load_config_or_default;
use tilequest::plugins::*;

fn main() {
    let config = load_config_or_default();
    let (width, height) = (
        config.settings.window_width,
        config.settings.window_height,
    );

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Tilequest".into(),
                resolution: (width, height).into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.08)))
        .insert_resource(config)
        .add_plugins((UiPlugin, CameraPlugin, WorldPlugin, PlayerPlugin))
        .run();
}
