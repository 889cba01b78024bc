use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::textures::{
    ASTEROID_TEXTURE, EARTH_TEXTURE, MARS_TEXTURE, MERCURY_TEXTURE, SUN_TEXTURE, VENUS_TEXTURE,
};

/// Environment variable pointing at an alternative JSON config file.
pub const CONFIG_PATH_ENV: &str = "SOLAR_SYSTEM_CONFIG";
/// Environment variable capping the number of animated frames.
pub const FRAME_LIMIT_ENV: &str = "SOLAR_SYSTEM_FRAMES";
pub const DEFAULT_CONFIG_PATH: &str = "solar_system.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("{field} is not a hex colour: {value:?}")]
    Color { field: String, value: String },
}

impl ConfigError {
    fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Which clock feeds the sideways wobble of the asteroid belt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftClock {
    /// Milliseconds since the Unix epoch.
    #[default]
    WallClock,
    /// Milliseconds since the app started.
    Elapsed,
}

#[derive(Resource, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SolarSystemConfig {
    /// Fixed seed for the star field and asteroid scatter. `None` draws from entropy.
    pub seed: Option<u64>,
    pub window: WindowSettings,
    pub camera: CameraSettings,
    pub star_field: StarFieldSettings,
    pub sun: SunSettings,
    pub planets: PlanetarySettings,
    pub asteroid_belt: AsteroidBeltSettings,
    pub ambient: AmbientSettings,
    pub animation: AnimationSettings,
}

impl Default for SolarSystemConfig {
    fn default() -> Self {
        Self {
            seed: None,
            window: WindowSettings::default(),
            camera: CameraSettings::default(),
            star_field: StarFieldSettings::default(),
            sun: SunSettings::default(),
            planets: PlanetarySettings::default(),
            asteroid_belt: AsteroidBeltSettings::default(),
            ambient: AmbientSettings::default(),
            animation: AnimationSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: f32,
    pub height: f32,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "Solar System".to_string(),
            width: 1280.0,
            height: 720.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraSettings {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
    pub look_at: [f32; 3],
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 500.0,
            position: [0.0, 30.0, 130.0],
            look_at: [0.0, 0.0, 0.0],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StarFieldSettings {
    pub count: usize,
    /// Edge length of the cube the stars are scattered in, centred on the sun.
    pub extent: f32,
    pub color: String,
    pub opacity: f32,
}

impl Default for StarFieldSettings {
    fn default() -> Self {
        Self {
            count: 6_999_999,
            extent: 40_000.0,
            color: "#ffffff".to_string(),
            opacity: 0.9,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SunSettings {
    pub radius: f32,
    pub subdivisions: u32,
    /// Surface map, either an `https://` address or a path under `assets/`.
    pub texture: String,
    pub emissive_color: String,
    pub emissive_intensity: f32,
    pub spin_per_frame: f32,
    pub light_color: String,
    /// Point light output in lumens.
    pub light_intensity: f32,
    pub light_range: f32,
}

impl Default for SunSettings {
    fn default() -> Self {
        Self {
            radius: 15.0,
            subdivisions: 128,
            texture: SUN_TEXTURE.url.to_string(),
            emissive_color: "#ffa500".to_string(),
            emissive_intensity: 20.0,
            spin_per_frame: 0.002,
            light_color: "#ffa500".to_string(),
            light_intensity: 40.0 * 4.0 * std::f32::consts::PI * 10_000.0,
            light_range: 900.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanetarySettings {
    pub subdivisions: u32,
    /// Axial spin added to every planet each frame.
    pub spin_per_frame: f32,
    pub bodies: Vec<PlanetSettings>,
}

impl Default for PlanetarySettings {
    fn default() -> Self {
        Self {
            subdivisions: 128,
            spin_per_frame: 0.005,
            bodies: vec![
                PlanetSettings::new("Mercury", 2.0, MERCURY_TEXTURE.url, 30.0, 0.02),
                PlanetSettings::new("Venus", 3.0, VENUS_TEXTURE.url, 50.0, 0.015),
                PlanetSettings::new("Earth", 4.0, EARTH_TEXTURE.url, 70.0, 0.01),
                PlanetSettings::new("Mars", 3.5, MARS_TEXTURE.url, 90.0, 0.007),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanetSettings {
    pub name: String,
    pub radius: f32,
    pub texture: String,
    /// Offset from the pivot along +X.
    pub distance: f32,
    /// Revolution added to the pivot each frame, in radians.
    pub speed: f32,
}

impl PlanetSettings {
    pub fn new(name: &str, radius: f32, texture: &str, distance: f32, speed: f32) -> Self {
        Self {
            name: name.to_string(),
            radius,
            texture: texture.to_string(),
            distance,
            speed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AsteroidBeltSettings {
    pub count: usize,
    pub inner_radius: f32,
    pub outer_radius: f32,
    /// Asteroids are placed within `[-half_height, half_height)` of the orbital plane.
    pub half_height: f32,
    pub max_radius: f32,
    pub subdivisions: u32,
    pub texture: String,
    pub base_velocity: f32,
    pub tumble_per_frame: f32,
    pub lateral_frequency: f64,
    pub lateral_amplitude: f32,
    pub depth_floor: f32,
    pub depth_reset: f32,
    pub drift_clock: DriftClock,
}

impl Default for AsteroidBeltSettings {
    fn default() -> Self {
        Self {
            count: 30,
            inner_radius: 110.0,
            outer_radius: 140.0,
            half_height: 5.0,
            max_radius: 1.5,
            subdivisions: 32,
            texture: ASTEROID_TEXTURE.url.to_string(),
            base_velocity: 0.02,
            tumble_per_frame: 0.01,
            lateral_frequency: 0.0005,
            lateral_amplitude: 0.1,
            depth_floor: -200.0,
            depth_reset: 150.0,
            drift_clock: DriftClock::WallClock,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AmbientSettings {
    pub color: String,
    pub brightness: f32,
}

impl Default for AmbientSettings {
    fn default() -> Self {
        Self {
            color: "#ffffff".to_string(),
            brightness: 400.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationSettings {
    /// Stop the animation after this many frames. `None` runs until the window closes.
    pub max_frames: Option<u64>,
    pub exit_when_stopped: bool,
}

/// Where the active configuration came from.
#[derive(Resource, Debug, Clone, PartialEq)]
pub enum ConfigSource {
    BuiltIn { path: PathBuf },
    File { path: PathBuf },
    Fallback { path: PathBuf, error: String },
}

impl ConfigSource {
    pub fn report(&self, config: &SolarSystemConfig) {
        match self {
            ConfigSource::BuiltIn { path } => {
                info!("No config at {:?}, using built-in solar system", path)
            }
            ConfigSource::File { path } => info!("Loaded solar system config from {:?}", path),
            ConfigSource::Fallback { path, error } => {
                warn!("Ignoring config {:?}: {}. Falling back to defaults.", path, error)
            }
        }
        if let Some(frames) = config.animation.max_frames {
            info!("Animation will stop after {} frames", frames);
        }
    }
}

impl SolarSystemConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Path of the config file, honouring `SOLAR_SYSTEM_CONFIG`.
    pub fn config_path() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Loads the config file if there is one, falling back to defaults on any problem.
    /// `SOLAR_SYSTEM_FRAMES` overrides the frame limit either way.
    ///
    /// Runs before logging is set up, so the outcome is returned for reporting later.
    pub fn load_or_default() -> (Self, ConfigSource) {
        let path = Self::config_path();
        let (mut config, source) = if !path.exists() {
            (Self::default(), ConfigSource::BuiltIn { path })
        } else {
            match Self::load(&path) {
                Ok(config) => (config, ConfigSource::File { path }),
                Err(err) => (
                    Self::default(),
                    ConfigSource::Fallback {
                        path,
                        error: err.to_string(),
                    },
                ),
            }
        };

        if let Some(frames) = std::env::var(FRAME_LIMIT_ENV)
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
        {
            config.animation.max_frames = Some(frames);
        }

        (config, source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.star_field.count == 0 {
            return Err(ConfigError::invalid("star_field.count", "must be at least 1"));
        }
        if !(self.star_field.extent > 0.0) {
            return Err(ConfigError::invalid("star_field.extent", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.star_field.opacity) {
            return Err(ConfigError::invalid("star_field.opacity", "must be within [0, 1]"));
        }
        if !(self.sun.radius > 0.0) {
            return Err(ConfigError::invalid("sun.radius", "must be positive"));
        }

        for (index, planet) in self.planets.bodies.iter().enumerate() {
            if !(planet.radius > 0.0) {
                return Err(ConfigError::invalid(
                    format!("planets.bodies[{}].radius", index),
                    format!("{} must have a positive radius", planet.name),
                ));
            }
            if !(planet.distance > 0.0) {
                return Err(ConfigError::invalid(
                    format!("planets.bodies[{}].distance", index),
                    format!("{} must orbit outside the origin", planet.name),
                ));
            }
        }

        let belt = &self.asteroid_belt;
        if !(belt.inner_radius < belt.outer_radius) {
            return Err(ConfigError::invalid(
                "asteroid_belt.inner_radius",
                format!("{} is not below outer radius {}", belt.inner_radius, belt.outer_radius),
            ));
        }
        if belt.half_height < 0.0 {
            return Err(ConfigError::invalid("asteroid_belt.half_height", "must not be negative"));
        }
        if !(belt.max_radius > 0.0) {
            return Err(ConfigError::invalid("asteroid_belt.max_radius", "must be positive"));
        }
        if !(belt.depth_floor < belt.depth_reset) {
            return Err(ConfigError::invalid(
                "asteroid_belt.depth_floor",
                format!("{} is not below reset depth {}", belt.depth_floor, belt.depth_reset),
            ));
        }

        for (field, value) in [
            ("star_field.color", &self.star_field.color),
            ("sun.emissive_color", &self.sun.emissive_color),
            ("sun.light_color", &self.sun.light_color),
            ("ambient.color", &self.ambient.color),
        ] {
            parse_color(field, value)?;
        }

        Ok(())
    }
}

pub fn parse_color(field: &str, value: &str) -> Result<Color, ConfigError> {
    Srgba::hex(value)
        .map(Color::from)
        .map_err(|_| ConfigError::Color {
            field: field.to_string(),
            value: value.to_string(),
        })
}

/// Colour lookup for spawn code; configs are validated before they get there.
pub fn color_or_white(value: &str) -> Color {
    Srgba::hex(value).map(Color::from).unwrap_or(Color::WHITE)
}
