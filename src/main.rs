use bevy::prelude::*;
use bevy::window::PresentMode;
use bevy_web_asset::WebAssetPlugin;

use solar_system::{SolarSystemConfig, SolarSystemPlugin};

fn main() {
    let (config, source) = SolarSystemConfig::load_or_default();
    let window = config.window.clone();

    App::new()
        .add_plugins((
            // Registers the http and https asset sources; must precede DefaultPlugins.
            WebAssetPlugin::default(),
            DefaultPlugins.set(WindowPlugin {
                primary_window: Some(Window {
                    title: window.title,
                    resolution: (window.width, window.height).into(),
                    present_mode: PresentMode::AutoVsync,
                    ..default()
                }),
                ..default()
            }),
        ))
        .insert_resource(config)
        .insert_resource(source)
        .add_plugins(SolarSystemPlugin)
        .run();
}
