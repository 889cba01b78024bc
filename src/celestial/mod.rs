use bevy::prelude::*;

pub mod asteroids;
pub mod lighting;
pub mod planets;
pub mod starfield;
pub mod sun;

use crate::textures::TextureBindings;

/// Asset stores the world builder spawns into.
pub struct SpawnAssets<'a> {
    pub asset_server: &'a AssetServer,
    pub meshes: &'a mut Assets<Mesh>,
    pub materials: &'a mut Assets<StandardMaterial>,
    pub textures: &'a mut TextureBindings,
}

impl SpawnAssets<'_> {
    pub fn sphere(&mut self, radius: f32, subdivisions: u32) -> Handle<Mesh> {
        let subdivisions = subdivisions.max(3) as usize;
        self.meshes
            .add(Sphere::new(radius).mesh().uv(subdivisions, subdivisions))
    }

    /// Adds `material` and queues `texture_path` to become its base colour map.
    pub fn textured_material(
        &mut self,
        material: StandardMaterial,
        texture_path: &str,
    ) -> Handle<StandardMaterial> {
        let handle = self.materials.add(material);
        self.textures
            .request(self.asset_server, handle.clone(), texture_path);
        handle
    }
}
