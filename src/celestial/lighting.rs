use bevy::prelude::*;

use crate::config::{color_or_white, AmbientSettings};

/// Non-directional fill light so the night sides of the planets stay visible.
pub fn ambient_light(settings: &AmbientSettings) -> AmbientLight {
    AmbientLight {
        color: color_or_white(&settings.color),
        brightness: settings.brightness,
    }
}
