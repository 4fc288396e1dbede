use crate::plugins::world::ActiveSession;
use crate::resources::GameState;
use bevy::prelude::*;
use bevy::render::camera::ScalingMode;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(OnEnter(GameState::Playing), frame_level);
    }
}

/// Extra world units kept around the grid edges
const FRAME_MARGIN: f32 = 1.0;

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Projection::from(OrthographicProjection {
            scaling_mode: ScalingMode::AutoMin {
                min_width: 60.0,
                min_height: 40.0,
            },
            ..OrthographicProjection::default_2d()
        }),
    ));
}

/// Fit the whole grid into view
fn frame_level(
    session: Option<Res<ActiveSession>>,
    mut camera_query: Query<(&mut Transform, &mut Projection), With<Camera2d>>,
) {
    let Some(session) = session else {
        return;
    };
    let Ok((mut transform, mut projection)) = camera_query.single_mut() else {
        return;
    };

    let layout = session.0.layout;
    let center = layout.world_center();
    let size = layout.world_size();
    transform.translation.x = center.x;
    transform.translation.y = center.y;

    if let Projection::Orthographic(ortho) = &mut *projection {
        ortho.scaling_mode = ScalingMode::AutoMin {
            min_width: size.x + FRAME_MARGIN * 2.0,
            min_height: size.y + FRAME_MARGIN * 2.0,
        };
    }
    info!(
        "Camera framed on ({:.1}, {:.1}) covering {:.0}x{:.0}",
        center.x, center.y, size.x, size.y
    );
}
