pub mod animation;
pub mod camera;
pub mod celestial;
pub mod config;
pub mod scene;
pub mod textures;

pub use config::SolarSystemConfig;
pub use scene::{SolarSystem, SolarSystemPlugin, WorldPlan};
