use crate::engine::assets::displacement_textures::DisplacementTextures;
use crate::engine::compute::displacement_compute::DisplacementFrame;
use crate::engine::config::InstallationConfig;
use crate::engine::gallery::GalleryLayer;
use crate::engine::render::splat_material::{SplatMaterial, SplatSettings};
use crate::engine::simulation::DisplacementSettings;
use bevy::prelude::*;

/// Point every layer material at the generation written this frame.
///
/// Only the physics-active layer renders offsets; the other layer binds a zero
/// offset scale and its own rest texture.
pub fn bind_layer_materials(
    frame: Res<DisplacementFrame>,
    textures: Res<DisplacementTextures>,
    config: Res<InstallationConfig>,
    settings: Res<DisplacementSettings>,
    layers: Query<(&GalleryLayer, &MeshMaterial3d<SplatMaterial>)>,
    mut materials: ResMut<Assets<SplatMaterial>>,
) {
    let offsets = &textures.offsets[DisplacementTextures::write_index(frame.generation)];

    for (layer, material_handle) in &layers {
        let mut uniform = SplatSettings::from_config(&config.render, settings.params.max_offset);
        uniform.opacity = layer.opacity;
        let rest = if layer.physics_active {
            &textures.rest
        } else {
            uniform.offset_scale = 0.0;
            &layer.rest_texture
        };

        let Some(current) = materials.get(&material_handle.0) else {
            continue;
        };
        if current.rest_positions == *rest && current.offsets == *offsets && current.settings == uniform {
            continue;
        }
        if let Some(material) = materials.get_mut(&material_handle.0) {
            material.rest_positions = rest.clone();
            material.offsets = offsets.clone();
            material.settings = uniform;
        }
    }
}
