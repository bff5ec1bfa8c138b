use crate::engine::assets::displacement_textures::DisplacementTextures;
use crate::engine::config::InstallationConfig;
use crate::engine::gallery::{GalleryLayer, GalleryState, scene_transform};
use crate::engine::loading::manifest_loader::{InitialRestTextures, LayerPointCount};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::mesh::point_index_mesh::create_point_index_mesh;
use crate::engine::render::splat_material::{SplatMaterial, SplatSettings};
use crate::engine::simulation::DisplacementSettings;
use bevy::pbr::NotShadowCaster;
use bevy::prelude::*;
use bevy::render::view::NoFrustumCulling;

/// Spawn the active layer and, with two or more scenes, the preloaded one.
pub fn create_layers_when_ready(
    mut progress: ResMut<LoadingProgress>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<SplatMaterial>>,
    gallery: Option<ResMut<GalleryState>>,
    initial: Option<Res<InitialRestTextures>>,
    point_count: Option<Res<LayerPointCount>>,
    textures: Option<Res<DisplacementTextures>>,
    config: Option<Res<InstallationConfig>>,
    settings: Option<Res<DisplacementSettings>>,
    time: Res<Time>,
) {
    if progress.layers_created || !progress.textures_configured {
        return;
    }
    let (
        Some(mut gallery),
        Some(initial),
        Some(point_count),
        Some(textures),
        Some(config),
        Some(settings),
    ) = (gallery, initial, point_count, textures, config, settings)
    else {
        return;
    };

    // One mesh for both layers: the scenes are padded to the same count.
    let mesh = meshes.add(create_point_index_mesh(point_count.0));

    for (index, (scene, rest)) in initial.layers.iter().enumerate() {
        let physics_active = index == 0;
        let mut uniform = SplatSettings::from_config(&config.render, settings.params.max_offset);
        uniform.opacity = if physics_active { 1.0 } else { 0.0 };
        if !physics_active {
            uniform.offset_scale = 0.0;
        }

        let material = materials.add(SplatMaterial {
            rest_positions: rest.clone(),
            offsets: textures.offsets[0].clone(),
            settings: uniform,
        });

        commands.spawn((
            Mesh3d(mesh.clone()),
            MeshMaterial3d(material),
            scene_transform(),
            if physics_active {
                Visibility::Inherited
            } else {
                Visibility::Hidden
            },
            GalleryLayer {
                scene: *scene,
                rest_texture: rest.clone(),
                opacity: uniform.opacity,
                physics_active,
            },
            NoFrustumCulling,
            NotShadowCaster,
        ));
        info!("Layer {index} spawned for '{}'", gallery.scenes[*scene].name);
    }

    gallery.restart(config.gallery_settings(), time.elapsed_secs());
    commands.remove_resource::<InitialRestTextures>();
    progress.layers_created = true;
}
