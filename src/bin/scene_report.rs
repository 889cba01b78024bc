use std::f32::consts::TAU;
use std::process::ExitCode;

use solar_system::config::SolarSystemConfig;
use solar_system::scene::{scene_rng, WorldPlan};
use solar_system::textures::{catalog_entry, is_remote};

fn main() -> ExitCode {
    let path = SolarSystemConfig::config_path();
    let mut config = if path.exists() {
        match SolarSystemConfig::load(&path) {
            Ok(config) => {
                println!("Config: {:?}", path);
                config
            }
            Err(err) => {
                eprintln!("{}", err);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("Config: built-in defaults");
        SolarSystemConfig::default()
    };

    if let Some(arg) = std::env::args().nth(1) {
        match arg.parse::<usize>() {
            Ok(count) if count > 0 => config.star_field.count = count,
            _ => {
                eprintln!("usage: scene_report [star_count]");
                return ExitCode::FAILURE;
            }
        }
    }

    let plan = WorldPlan::generate(&config, &mut scene_rng(config.seed));

    println!("Stars: {}", plan.stars.len());
    for (axis, label) in ["x", "y", "z"].iter().enumerate() {
        let (min, max) = min_max(plan.stars.iter().map(|star| star[axis]));
        println!("  {}: [{:.1}, {:.1}]", label, min, max);
    }

    println!("Planets: {}", plan.planets.len());
    for planet in &plan.planets {
        println!(
            "  {:<8} radius {:>4.1}  distance {:>5.1}  speed {:.3}  ~{:.0} frames per orbit",
            planet.name,
            planet.radius,
            planet.distance,
            planet.speed,
            TAU / planet.speed
        );
    }

    let belt = &config.asteroid_belt;
    println!("Asteroids: {}", plan.asteroids.len());
    if !plan.asteroids.is_empty() {
        let radii = plan.asteroids.iter().map(|seed| seed.radius);
        let distances = plan.asteroids.iter().map(|seed| seed.planar_distance());
        let (min_radius, max_radius) = min_max(radii);
        let (min_distance, max_distance) = min_max(distances);
        let mean_velocity =
            plan.asteroids.iter().map(|seed| seed.velocity).sum::<f32>() / plan.asteroids.len() as f32;
        let first_wrap = plan
            .asteroids
            .iter()
            .map(|seed| ((seed.position.z - belt.depth_floor) / seed.velocity).ceil())
            .fold(f32::MAX, f32::min);

        println!("  radius   [{:.2}, {:.2}]", min_radius, max_radius);
        println!("  distance [{:.1}, {:.1}]", min_distance, max_distance);
        println!("  mean drift {:.4} per frame", mean_velocity);
        println!(
            "  first wrap to z={} after ~{:.0} frames",
            belt.depth_reset, first_wrap
        );
    }

    println!("Surface maps:");
    let mut textures: Vec<&str> = std::iter::once(config.sun.texture.as_str())
        .chain(plan.planets.iter().map(|planet| planet.texture.as_str()))
        .chain(std::iter::once(belt.texture.as_str()))
        .collect();
    textures.dedup();
    for texture in textures {
        match catalog_entry(texture) {
            Some(source) => println!("  {:<8} {}", source.name, source.url),
            None if is_remote(texture) => println!("  {}", texture),
            None => println!("  assets/{}", texture),
        }
    }

    ExitCode::SUCCESS
}

fn min_max(values: impl Iterator<Item = f32>) -> (f32, f32) {
    values.fold((f32::MAX, f32::MIN), |(min, max), value| (min.min(value), max.max(value)))
}
