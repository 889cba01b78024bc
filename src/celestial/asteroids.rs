use std::f32::consts::{PI, TAU};

use bevy::prelude::*;
use rand::Rng;

use super::SpawnAssets;
use crate::animation::Spin;
use crate::config::AsteroidBeltSettings;

/// Per-asteroid drift speed along -Z, in units per frame.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Asteroid {
    pub velocity: f32,
}

/// Group entity holding every asteroid.
#[derive(Component)]
pub struct AsteroidBelt;

/// Randomised starting state of one asteroid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsteroidSeed {
    pub radius: f32,
    pub position: Vec3,
    /// Initial rotation about X and Y.
    pub tilt: Vec2,
    pub velocity: f32,
}

impl AsteroidSeed {
    pub fn planar_distance(&self) -> f32 {
        Vec2::new(self.position.x, self.position.z).length()
    }
}

pub fn scatter_belt<R: Rng>(settings: &AsteroidBeltSettings, rng: &mut R) -> Vec<AsteroidSeed> {
    (0..settings.count)
        .map(|_| {
            let angle = rng.gen_range(0.0..TAU);
            let distance = rng.gen_range(settings.inner_radius..settings.outer_radius);
            let height = if settings.half_height > 0.0 {
                rng.gen_range(-settings.half_height..settings.half_height)
            } else {
                0.0
            };
            // (0, max] so no asteroid collapses to a point
            let radius = settings.max_radius * (1.0 - rng.gen::<f32>());

            AsteroidSeed {
                radius,
                position: Vec3::new(angle.cos() * distance, height, angle.sin() * distance),
                tilt: Vec2::new(rng.gen_range(0.0..PI), rng.gen_range(0.0..PI)),
                velocity: rng.gen_range(0.5_f32..1.5) * settings.base_velocity,
            }
        })
        .collect()
}

/// Spawns the belt group and its asteroids. Returns `(belt, asteroids)`.
pub fn spawn_belt(
    commands: &mut Commands,
    assets: &mut SpawnAssets,
    settings: &AsteroidBeltSettings,
    seeds: &[AsteroidSeed],
) -> (Entity, Vec<Entity>) {
    let material = assets.textured_material(StandardMaterial::default(), &settings.texture);
    let tumble = Vec3::new(settings.tumble_per_frame, settings.tumble_per_frame, 0.0);

    let meshes: Vec<Handle<Mesh>> = seeds
        .iter()
        .map(|seed| assets.sphere(seed.radius, settings.subdivisions))
        .collect();

    let mut asteroids = Vec::with_capacity(seeds.len());
    let belt = commands
        .spawn((SpatialBundle::default(), AsteroidBelt, Name::new("Asteroid belt")))
        .with_children(|belt| {
            for (seed, mesh) in seeds.iter().zip(meshes) {
                let spin = Spin::new(seed.tilt.extend(0.0), tumble);
                let asteroid = belt
                    .spawn((
                        PbrBundle {
                            mesh,
                            material: material.clone(),
                            transform: Transform::from_translation(seed.position)
                                .with_rotation(spin.rotation()),
                            ..default()
                        },
                        Asteroid {
                            velocity: seed.velocity,
                        },
                        spin,
                    ))
                    .id();
                asteroids.push(asteroid);
            }
        })
        .id();

    info!("Spawned asteroid belt with {} asteroids", asteroids.len());
    (belt, asteroids)
}
