use crate::engine::assets::displacement_textures::DisplacementTextures;
use crate::engine::camera::gallery_camera::{GalleryCamera, vertical_fov};
use crate::engine::compute::displacement_compute::DisplacementFrame;
use crate::engine::config::InstallationConfig;
use crate::engine::gallery::rotation::{GalleryTick, SceneSphere, orbit_camera_transform};
use crate::engine::gallery::{GalleryLayer, GalleryState};
use crate::engine::simulation::DisplacementSettings;
use bevy::prelude::*;

/// Advance the rotation: swap layers, fade, gate and frame the camera.
pub fn gallery_rotation_system(
    time: Res<Time>,
    config: Res<InstallationConfig>,
    asset_server: Res<AssetServer>,
    mut gallery: ResMut<GalleryState>,
    mut settings: ResMut<DisplacementSettings>,
    mut frame: ResMut<DisplacementFrame>,
    mut textures: ResMut<DisplacementTextures>,
    mut layers: Query<(&mut GalleryLayer, &mut Visibility, &Transform)>,
    mut cameras: Query<(&mut Transform, Option<&Projection>), (With<GalleryCamera>, Without<GalleryLayer>)>,
) {
    if gallery.scenes.is_empty() {
        return;
    }
    let now = time.elapsed_secs();
    let tick = gallery.rotation.tick(now);

    if tick.swapped {
        swap_layers(&gallery, &tick, &asset_server, &mut textures, &mut layers);
        frame.reset_requested = true;
        info!(
            "Gallery now showing '{}', preloading '{}'",
            gallery.scenes[tick.active].name, gallery.scenes[tick.incoming].name
        );
    }

    let mut active_world = None;
    let mut incoming_world = None;
    for (mut layer, mut visibility, transform) in &mut layers {
        let opacity = if layer.physics_active {
            1.0 - tick.blend
        } else if tick.incoming != tick.active {
            tick.blend
        } else {
            0.0
        };
        if layer.opacity != opacity {
            layer.opacity = opacity;
        }
        let target = if opacity > 0.0 {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        visibility.set_if_neq(target);

        let sphere = gallery.scenes[layer.scene].sphere.transformed(transform);
        if layer.physics_active {
            active_world = Some(sphere);
        } else {
            incoming_world = Some(sphere);
        }
    }

    let active_sphere = gallery.scenes[tick.active].sphere;
    settings.params.scene_center = active_sphere.center;
    settings.params.max_radius = active_sphere.radius * config.gallery.displace_radius_scale;

    let Some(active_world) = active_world else {
        return;
    };
    let framed = match incoming_world {
        Some(incoming) if tick.blend > 0.0 => active_world.lerp(incoming, tick.blend),
        _ => active_world,
    };
    frame_cameras(&config, now, framed, &mut cameras);
}

fn swap_layers(
    gallery: &GalleryState,
    tick: &GalleryTick,
    asset_server: &AssetServer,
    textures: &mut DisplacementTextures,
    layers: &mut Query<(&mut GalleryLayer, &mut Visibility, &Transform)>,
) {
    for (mut layer, _, _) in layers.iter_mut() {
        if layer.physics_active {
            // Outgoing layer takes the scene after the new active one.
            layer.physics_active = false;
            layer.scene = tick.incoming;
            layer.rest_texture =
                asset_server.load(gallery.scenes[tick.incoming].rest_texture_path.clone());
            layer.opacity = 0.0;
        } else {
            layer.physics_active = true;
            textures.rest = layer.rest_texture.clone();
        }
    }
}

fn frame_cameras(
    config: &InstallationConfig,
    now: f32,
    sphere: SceneSphere,
    cameras: &mut Query<
        (&mut Transform, Option<&Projection>),
        (With<GalleryCamera>, Without<GalleryLayer>),
    >,
) {
    let g = &config.gallery;
    for (mut transform, projection) in cameras.iter_mut() {
        let fov = vertical_fov(projection, g.vertical_fov_deg);
        *transform = orbit_camera_transform(
            sphere,
            fov,
            g.framing_margin,
            g.camera_elevation_deg,
            now * g.orbit_speed_deg,
        );
    }
}
