use bevy::asset::LoadState;
use bevy::prelude::*;

/// A named surface map and the web address it is fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSource {
    pub name: &'static str,
    pub url: &'static str,
}

pub const SUN_TEXTURE: TextureSource = TextureSource {
    name: "sun",
    url: "https://upload.wikimedia.org/wikipedia/commons/3/3a/Solar-system-sun-texture.jpg",
};

pub const MERCURY_TEXTURE: TextureSource = TextureSource {
    name: "mercury",
    url: "https://upload.wikimedia.org/wikipedia/commons/2/23/Mercury_map.jpg",
};

pub const VENUS_TEXTURE: TextureSource = TextureSource {
    name: "venus",
    url: "https://upload.wikimedia.org/wikipedia/commons/8/85/Venus_texture_map.jpg",
};

pub const EARTH_TEXTURE: TextureSource = TextureSource {
    name: "earth",
    url: "https://upload.wikimedia.org/wikipedia/commons/8/80/Earthmap4K.jpg",
};

pub const MARS_TEXTURE: TextureSource = TextureSource {
    name: "mars",
    url: "https://upload.wikimedia.org/wikipedia/commons/2/28/Mars_texture.jpg",
};

pub const ASTEROID_TEXTURE: TextureSource = TextureSource {
    name: "asteroid",
    url: "https://upload.wikimedia.org/wikipedia/commons/7/7d/Asteroid_texture.jpg",
};

pub const TEXTURE_CATALOG: [TextureSource; 6] = [
    SUN_TEXTURE,
    MERCURY_TEXTURE,
    VENUS_TEXTURE,
    EARTH_TEXTURE,
    MARS_TEXTURE,
    ASTEROID_TEXTURE,
];

/// Catalog entry for a configured texture path, if it is one of the built-in maps.
pub fn catalog_entry(path: &str) -> Option<&'static TextureSource> {
    TEXTURE_CATALOG.iter().find(|source| source.url == path)
}

/// Whether the asset server fetches `path` over the network rather than from `assets/`.
pub fn is_remote(path: &str) -> bool {
    path.starts_with("https://") || path.starts_with("http://")
}

#[derive(Debug, Clone)]
struct PendingBinding {
    path: String,
    image: Handle<Image>,
    material: Handle<StandardMaterial>,
}

/// Materials waiting for their surface map.
///
/// Materials are spawned without a texture so they render straight away; the
/// map is attached in place once the image arrives. A map that fails to load
/// is dropped and the surface stays plain.
#[derive(Resource, Default)]
pub struct TextureBindings {
    pending: Vec<PendingBinding>,
}

impl TextureBindings {
    pub fn request(
        &mut self,
        asset_server: &AssetServer,
        material: Handle<StandardMaterial>,
        path: &str,
    ) {
        let image = asset_server.load::<Image>(path.to_string());
        self.track(path, image, material);
    }

    fn track(&mut self, path: &str, image: Handle<Image>, material: Handle<StandardMaterial>) {
        debug!("Waiting on surface map {}", path);
        self.pending.push(PendingBinding {
            path: path.to_string(),
            image,
            material,
        });
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

pub struct TexturePlugin;

impl Plugin for TexturePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TextureBindings>()
            .add_systems(Update, bind_loaded_textures);
    }
}

fn bind_loaded_textures(
    asset_server: Res<AssetServer>,
    images: Res<Assets<Image>>,
    mut bindings: ResMut<TextureBindings>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if bindings.pending.is_empty() {
        return;
    }

    bindings.pending.retain(|binding| {
        if images.contains(&binding.image) {
            if let Some(material) = materials.get_mut(&binding.material) {
                material.base_color_texture = Some(binding.image.clone());
                info!("Surface map {} applied", binding.path);
            }
            return false;
        }

        match asset_server.get_load_state(binding.image.id()) {
            Some(LoadState::Failed(_)) => {
                warn!("Surface map {} failed to load, leaving surface untextured", binding.path);
                false
            }
            _ => true,
        }
    });
}
