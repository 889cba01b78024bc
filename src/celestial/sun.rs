use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;

use super::SpawnAssets;
use crate::animation::Spin;
use crate::config::{color_or_white, SunSettings};

#[derive(Component)]
pub struct Sun;

#[derive(Component)]
pub struct SunLight;

/// Spawns the glowing sun sphere and the point light sitting at its centre.
/// Returns `(sun, light)`.
pub fn spawn_sun(
    commands: &mut Commands,
    assets: &mut SpawnAssets,
    settings: &SunSettings,
) -> (Entity, Entity) {
    let emissive =
        LinearRgba::from(color_or_white(&settings.emissive_color)) * settings.emissive_intensity;
    let material = assets.textured_material(
        StandardMaterial {
            emissive,
            ..default()
        },
        &settings.texture,
    );

    let sun = commands
        .spawn((
            PbrBundle {
                mesh: assets.sphere(settings.radius, settings.subdivisions),
                material,
                ..default()
            },
            Sun,
            Spin::about_y(settings.spin_per_frame),
            NotShadowCaster,
            Name::new("Sun"),
        ))
        .id();

    let light = commands
        .spawn((
            PointLightBundle {
                point_light: PointLight {
                    color: color_or_white(&settings.light_color),
                    intensity: settings.light_intensity,
                    range: settings.light_range,
                    shadows_enabled: false,
                    ..default()
                },
                transform: Transform::from_translation(Vec3::ZERO),
                ..default()
            },
            SunLight,
            Name::new("Sun light"),
        ))
        .id();

    info!(
        "Spawned sun (radius {}, light range {})",
        settings.radius, settings.light_range
    );
    (sun, light)
}
