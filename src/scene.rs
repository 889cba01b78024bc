use bevy::app::AppExit;
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::animation::{AnimationPlugin, FrameScheduler};
use crate::camera::{spawn_camera, CameraPlugin};
use crate::celestial::asteroids::{scatter_belt, spawn_belt, AsteroidSeed};
use crate::celestial::lighting::ambient_light;
use crate::celestial::planets::{spawn_planet, PlanetHandle};
use crate::celestial::starfield::{generate_star_positions, spawn_star_field};
use crate::celestial::sun::spawn_sun;
use crate::celestial::SpawnAssets;
use crate::config::{ConfigSource, PlanetSettings, SolarSystemConfig};
use crate::textures::{TextureBindings, TexturePlugin};

/// Everything random about a scene, drawn up front so it can be inspected
/// without a renderer.
#[derive(Debug, Clone)]
pub struct WorldPlan {
    pub stars: Vec<[f32; 3]>,
    pub planets: Vec<PlanetSettings>,
    pub asteroids: Vec<AsteroidSeed>,
}

impl WorldPlan {
    pub fn generate<R: Rng>(config: &SolarSystemConfig, rng: &mut R) -> Self {
        Self {
            stars: generate_star_positions(config.star_field.count, config.star_field.extent, rng),
            planets: config.planets.bodies.clone(),
            asteroids: scatter_belt(&config.asteroid_belt, rng),
        }
    }
}

pub fn scene_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Handles to every spawned body. The ECS world owns the entities.
#[derive(Resource, Debug, Clone)]
pub struct SolarSystem {
    pub star_field: Entity,
    pub sun: Entity,
    pub sun_light: Entity,
    pub planets: Vec<PlanetHandle>,
    pub asteroid_belt: Entity,
    pub asteroids: Vec<Entity>,
    pub camera: Entity,
}

impl SolarSystem {
    /// Entities spawned at the top of the hierarchy.
    pub fn roots(&self) -> Vec<Entity> {
        let mut roots = vec![self.star_field, self.sun, self.sun_light];
        roots.extend(self.planets.iter().map(|planet| planet.pivot));
        roots.push(self.asteroid_belt);
        roots.push(self.camera);
        roots
    }
}

pub struct SolarSystemPlugin;

impl Plugin for SolarSystemPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SolarSystemConfig>();
        let limit = app.world().resource::<SolarSystemConfig>().animation.max_frames;

        app.insert_resource(FrameScheduler::with_limit(limit))
            .add_plugins((CameraPlugin, TexturePlugin, AnimationPlugin))
            .add_systems(Startup, (report_config, build_world).chain())
            .add_systems(Update, exit_when_stopped)
            .add_systems(Last, dispose_world);
    }
}

fn report_config(config: Res<SolarSystemConfig>, source: Option<Res<ConfigSource>>) {
    if let Some(source) = source {
        source.report(&config);
    }
}

fn build_world(
    mut commands: Commands,
    config: Res<SolarSystemConfig>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut textures: ResMut<TextureBindings>,
) {
    match config.seed {
        Some(seed) => info!("Building solar system from seed {}", seed),
        None => info!("Building solar system from a random seed"),
    }
    let mut rng = scene_rng(config.seed);
    let WorldPlan {
        stars,
        planets,
        asteroids,
    } = WorldPlan::generate(&config, &mut rng);

    let mut assets = SpawnAssets {
        asset_server: &asset_server,
        meshes: &mut meshes,
        materials: &mut materials,
        textures: &mut textures,
    };

    let star_field = spawn_star_field(&mut commands, &mut assets, &config.star_field, stars);
    let (sun, sun_light) = spawn_sun(&mut commands, &mut assets, &config.sun);
    let planets: Vec<PlanetHandle> = planets
        .iter()
        .map(|planet| spawn_planet(&mut commands, &mut assets, &config.planets, planet))
        .collect();
    let (asteroid_belt, asteroids) =
        spawn_belt(&mut commands, &mut assets, &config.asteroid_belt, &asteroids);
    commands.insert_resource(ambient_light(&config.ambient));
    let camera = spawn_camera(&mut commands, &config.camera);

    info!(
        "Solar system ready: {} planets, {} asteroids, {} surface maps loading",
        planets.len(),
        asteroids.len(),
        assets.textures.pending_count()
    );

    commands.insert_resource(SolarSystem {
        star_field,
        sun,
        sun_light,
        planets,
        asteroid_belt,
        asteroids,
        camera,
    });
}

fn exit_when_stopped(
    config: Res<SolarSystemConfig>,
    scheduler: Res<FrameScheduler>,
    mut exit: EventWriter<AppExit>,
    mut requested: Local<bool>,
) {
    if *requested || !config.animation.exit_when_stopped || scheduler.is_running() {
        return;
    }
    info!("Animation finished, closing");
    exit.send(AppExit::Success);
    *requested = true;
}

pub(crate) fn dispose_world(
    mut commands: Commands,
    mut exits: EventReader<AppExit>,
    system: Option<Res<SolarSystem>>,
    mut textures: ResMut<TextureBindings>,
) {
    if exits.read().next().is_none() {
        return;
    }
    let Some(system) = system else {
        return;
    };

    let roots = system.roots();
    for entity in &roots {
        if let Some(entity) = commands.get_entity(*entity) {
            entity.despawn_recursive();
        }
    }
    let abandoned = textures.pending_count();
    textures.clear();
    commands.remove_resource::<SolarSystem>();

    info!(
        "Disposed solar system ({} root entities, {} surface maps never arrived)",
        roots.len(),
        abandoned
    );
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::animation::{SchedulerStatus, Spin};
    use crate::celestial::asteroids::{Asteroid, AsteroidBelt};
    use crate::celestial::planets::Planet;
    use crate::celestial::sun::{Sun, SunLight};
    use crate::config::DriftClock;

    fn small_config(seed: u64) -> SolarSystemConfig {
        let mut config = SolarSystemConfig::default();
        config.seed = Some(seed);
        config.star_field.count = 5_000;
        config
    }

    #[test]
    fn plan_matches_configuration() {
        let config = small_config(11);
        let plan = WorldPlan::generate(&config, &mut scene_rng(config.seed));

        assert_eq!(plan.stars.len(), 5_000);
        assert!(plan
            .stars
            .iter()
            .flatten()
            .all(|coordinate| coordinate.abs() <= 20_000.0));
        assert_eq!(plan.planets.len(), 4);
        assert_eq!(plan.asteroids.len(), 30);
    }

    #[test]
    fn seeded_plans_are_reproducible() {
        let config = small_config(77);
        let first = WorldPlan::generate(&config, &mut scene_rng(config.seed));
        let second = WorldPlan::generate(&config, &mut scene_rng(config.seed));
        assert_eq!(first.stars, second.stars);
        assert_eq!(first.asteroids, second.asteroids);
    }

    /// Headless app running the real startup systems. No https source is
    /// registered, so every surface map request ends in a failed load.
    fn world_app(seed: u64) -> App {
        let mut config = small_config(seed);
        config.star_field.count = 200;
        config.sun.subdivisions = 16;
        config.planets.subdivisions = 16;
        config.asteroid_belt.subdivisions = 8;
        config.asteroid_belt.drift_clock = DriftClock::Elapsed;

        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            AssetPlugin {
                watch_for_changes_override: Some(false),
                ..default()
            },
        ))
        .init_asset::<Mesh>()
        .init_asset::<StandardMaterial>()
        .init_asset::<Image>()
        .insert_resource(config)
        .add_plugins(SolarSystemPlugin);
        app.update();
        app
    }

    fn settle_textures(app: &mut App) {
        for _ in 0..400 {
            if app.world().resource::<TextureBindings>().pending_count() == 0 {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
            app.update();
        }
    }

    fn all_entities(system: &SolarSystem) -> Vec<Entity> {
        system
            .roots()
            .into_iter()
            .chain(system.planets.iter().map(|planet| planet.sphere))
            .chain(system.asteroids.iter().copied())
            .collect()
    }

    #[test]
    fn roots_cover_top_level_entities() {
        let app = world_app(5);
        let world = app.world();
        let system = world.resource::<SolarSystem>();
        let roots = system.roots();

        assert_eq!(roots.len(), 3 + system.planets.len() + 2);
        for planet in &system.planets {
            assert!(roots.contains(&planet.pivot));
            assert!(!roots.contains(&planet.sphere));
        }
        for root in roots {
            assert!(world.get::<Parent>(root).is_none());
        }
    }

    #[test]
    fn planets_hang_off_their_pivots() {
        let app = world_app(5);
        let world = app.world();
        let system = world.resource::<SolarSystem>();
        let bodies = &world.resource::<SolarSystemConfig>().planets.bodies;
        assert_eq!(system.planets.len(), 4);

        for (planet, settings) in system.planets.iter().zip(bodies) {
            let parent = world.get::<Parent>(planet.sphere).expect("sphere has a parent");
            assert_eq!(parent.get(), planet.pivot);
            assert_eq!(planet.speed, settings.speed);

            let sphere = world.get::<Transform>(planet.sphere).expect("sphere transform");
            assert_eq!(sphere.translation, Vec3::new(settings.distance, 0.0, 0.0));
            let pivot = world.get::<Transform>(planet.pivot).expect("pivot transform");
            assert_eq!(pivot.translation, Vec3::ZERO);
            let name = &world.get::<Planet>(planet.sphere).expect("planet marker").name;
            assert_eq!(name, &settings.name);
        }
    }

    #[test]
    fn asteroids_share_one_belt_parent() {
        let app = world_app(9);
        let world = app.world();
        let system = world.resource::<SolarSystem>();
        assert_eq!(system.asteroids.len(), 30);
        assert!(world.get::<AsteroidBelt>(system.asteroid_belt).is_some());

        let children = world
            .get::<Children>(system.asteroid_belt)
            .expect("belt has children");
        assert_eq!(children.len(), 30);
        for asteroid in &system.asteroids {
            assert_eq!(
                world.get::<Parent>(*asteroid).map(Parent::get),
                Some(system.asteroid_belt)
            );
            let velocity = world.get::<Asteroid>(*asteroid).expect("asteroid").velocity;
            assert!((0.01..0.03).contains(&velocity));
        }
    }

    #[test]
    fn sun_and_its_light_sit_at_the_origin() {
        let app = world_app(2);
        let world = app.world();
        let system = world.resource::<SolarSystem>();

        assert!(world.get::<Sun>(system.sun).is_some());
        assert!(world.get::<SunLight>(system.sun_light).is_some());
        for entity in [system.sun, system.sun_light] {
            let transform = world.get::<Transform>(entity).expect("transform");
            assert_eq!(transform.translation, Vec3::ZERO);
        }
        let light = world.get::<PointLight>(system.sun_light).expect("point light");
        assert_eq!(light.range, 900.0);
        assert!(!light.shadows_enabled);
    }

    #[test]
    fn failed_surface_maps_leave_bodies_untextured() {
        let mut app = world_app(4);
        settle_textures(&mut app);

        assert_eq!(app.world().resource::<TextureBindings>().pending_count(), 0);
        let system = app.world().resource::<SolarSystem>().clone();
        let bodies = std::iter::once(system.sun)
            .chain(system.planets.iter().map(|planet| planet.sphere))
            .chain(system.asteroids.iter().copied());
        let materials = app.world().resource::<Assets<StandardMaterial>>();
        for body in bodies {
            let handle = app
                .world()
                .get::<Handle<StandardMaterial>>(body)
                .expect("body has a material");
            let material = materials.get(handle).expect("material is stored");
            assert!(material.base_color_texture.is_none());
        }
        assert!(app.world().get_entity(system.sun).is_some());
    }

    #[test]
    fn pivot_angles_never_decrease() {
        let mut app = world_app(6);
        let planets = app.world().resource::<SolarSystem>().planets.clone();
        let mut previous: Vec<f32> = planets
            .iter()
            .map(|planet| app.world().get::<Spin>(planet.pivot).expect("pivot spin").angles.y)
            .collect();

        for _ in 0..300 {
            app.update();
            for (planet, last) in planets.iter().zip(previous.iter_mut()) {
                let angle = app.world().get::<Spin>(planet.pivot).expect("pivot spin").angles.y;
                assert!(angle >= *last, "{} fell back to {}", *last, angle);
                *last = angle;
            }
        }

        let mercury = app.world().get::<Spin>(planets[0].pivot).expect("pivot spin");
        assert!((mercury.angles.y - 301.0 * planets[0].speed).abs() < 1e-3);
    }

    #[test]
    fn exit_disposes_every_entity() {
        let mut app = world_app(8);
        let everything = all_entities(app.world().resource::<SolarSystem>());
        assert_eq!(everything.len(), 3 + 4 + 2 + 4 + 30);

        app.update();
        assert!(app.world().contains_resource::<SolarSystem>());

        app.world_mut().send_event(AppExit::Success);
        app.update();

        assert!(!app.world().contains_resource::<SolarSystem>());
        assert_eq!(app.world().resource::<TextureBindings>().pending_count(), 0);
        for entity in everything {
            assert!(app.world().get_entity(entity).is_none());
        }
    }

    #[test]
    fn stopped_scheduler_requests_exit_when_configured() {
        let mut config = SolarSystemConfig::default();
        config.animation.exit_when_stopped = true;

        let mut scheduler = FrameScheduler::with_limit(Some(0));
        assert!(!scheduler.tick());
        assert_eq!(scheduler.status(), SchedulerStatus::Stopped);

        let mut app = App::new();
        app.add_event::<AppExit>()
            .insert_resource(config)
            .insert_resource(scheduler)
            .add_systems(Update, exit_when_stopped);
        app.update();

        let exits = app.world().resource::<Events<AppExit>>();
        assert_eq!(exits.len(), 1);
    }
}
