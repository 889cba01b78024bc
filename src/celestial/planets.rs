use bevy::prelude::*;

use super::SpawnAssets;
use crate::animation::Spin;
use crate::config::{PlanetSettings, PlanetarySettings};

#[derive(Component, Debug, Clone)]
pub struct Planet {
    pub name: String,
}

/// Invisible node at the origin; spinning it carries its planet around the sun.
#[derive(Component, Debug, Clone, Copy)]
pub struct OrbitPivot {
    pub speed: f32,
}

/// Entities making up one planet, kept so the scene can be torn down later.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetHandle {
    pub sphere: Entity,
    pub pivot: Entity,
    pub speed: f32,
}

pub fn spawn_planet(
    commands: &mut Commands,
    assets: &mut SpawnAssets,
    planetary: &PlanetarySettings,
    planet: &PlanetSettings,
) -> PlanetHandle {
    let material = assets.textured_material(StandardMaterial::default(), &planet.texture);

    let pivot = commands
        .spawn((
            SpatialBundle::default(),
            OrbitPivot {
                speed: planet.speed,
            },
            Spin::about_y(planet.speed),
            Name::new(format!("{} orbit", planet.name)),
        ))
        .id();

    let sphere = commands
        .spawn((
            PbrBundle {
                mesh: assets.sphere(planet.radius, planetary.subdivisions),
                material,
                transform: Transform::from_xyz(planet.distance, 0.0, 0.0),
                ..default()
            },
            Planet {
                name: planet.name.clone(),
            },
            Spin::about_y(planetary.spin_per_frame),
            Name::new(planet.name.clone()),
        ))
        .id();

    commands.entity(pivot).add_child(sphere);

    debug!(
        "Spawned {} (radius {}, distance {}, speed {})",
        planet.name, planet.radius, planet.distance, planet.speed
    );

    PlanetHandle {
        sphere,
        pivot,
        speed: planet.speed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_planets_match_the_classic_inner_system() {
        let planetary = PlanetarySettings::default();
        let orbits: Vec<(f32, f32)> = planetary
            .bodies
            .iter()
            .map(|planet| (planet.distance, planet.speed))
            .collect();
        assert_eq!(
            orbits,
            vec![(30.0, 0.02), (50.0, 0.015), (70.0, 0.01), (90.0, 0.007)]
        );

        let names: Vec<&str> = planetary.bodies.iter().map(|planet| planet.name.as_str()).collect();
        assert_eq!(names, ["Mercury", "Venus", "Earth", "Mars"]);
        assert_eq!(planetary.spin_per_frame, 0.005);
    }

    #[test]
    fn outer_planets_revolve_slower() {
        let planetary = PlanetarySettings::default();
        for pair in planetary.bodies.windows(2) {
            assert!(pair[0].distance < pair[1].distance);
            assert!(pair[0].speed > pair[1].speed);
        }
    }
}
