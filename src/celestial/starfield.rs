use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::view::NoFrustumCulling;
use rand::Rng;

use super::SpawnAssets;
use crate::config::{color_or_white, StarFieldSettings};

#[derive(Component)]
pub struct StarField;

/// Scatters `count` points uniformly in a cube of edge `extent` centred on the origin.
pub fn generate_star_positions<R: Rng>(count: usize, extent: f32, rng: &mut R) -> Vec<[f32; 3]> {
    let half = extent * 0.5;
    let mut positions = Vec::with_capacity(count);
    for _ in 0..count {
        positions.push([
            rng.gen_range(-half..half),
            rng.gen_range(-half..half),
            rng.gen_range(-half..half),
        ]);
    }
    positions
}

pub fn star_field_mesh(positions: Vec<[f32; 3]>) -> Mesh {
    Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::RENDER_WORLD)
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
}

pub fn spawn_star_field(
    commands: &mut Commands,
    assets: &mut SpawnAssets,
    settings: &StarFieldSettings,
    positions: Vec<[f32; 3]>,
) -> Entity {
    let count = positions.len();
    let material = assets.materials.add(StandardMaterial {
        base_color: color_or_white(&settings.color).with_alpha(settings.opacity),
        unlit: true,
        alpha_mode: AlphaMode::Blend,
        ..default()
    });

    let entity = commands
        .spawn((
            PbrBundle {
                mesh: assets.meshes.add(star_field_mesh(positions)),
                material,
                ..default()
            },
            StarField,
            NotShadowCaster,
            NoFrustumCulling,
            Name::new("Star field"),
        ))
        .id();

    info!("Spawned star field with {} points", count);
    entity
}
