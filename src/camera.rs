use bevy::prelude::*;

use crate::config::CameraSettings;

#[derive(Component)]
pub struct SystemCamera;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::BLACK))
            .insert_resource(Msaa::Sample4);
    }
}

pub fn camera_transform(settings: &CameraSettings) -> Transform {
    Transform::from_translation(Vec3::from(settings.position))
        .looking_at(Vec3::from(settings.look_at), Vec3::Y)
}

pub fn camera_projection(settings: &CameraSettings) -> Projection {
    Projection::Perspective(PerspectiveProjection {
        fov: settings.fov_degrees.to_radians(),
        near: settings.near,
        far: settings.far,
        ..default()
    })
}

/// Fixed viewpoint over the ecliptic. Nothing moves it after startup.
pub fn spawn_camera(commands: &mut Commands, settings: &CameraSettings) -> Entity {
    commands
        .spawn((
            Camera3dBundle {
                transform: camera_transform(settings),
                projection: camera_projection(settings),
                ..default()
            },
            SystemCamera,
            Name::new("Camera"),
        ))
        .id()
}
