use crate::engine::assets::displacement_textures::{
    DisplacementTextures, configure_nearest_sampling, create_motion_field_image,
    create_state_image,
};
use crate::engine::config::Backend;
use crate::engine::loading::manifest_loader::InitialRestTextures;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::simulation::{DisplacementSettings, SensorMotionFieldResource};
use bevy::prelude::*;

/// Configure sampling on the loaded rest textures and create the state and motion textures.
pub fn configure_loaded_textures(
    mut progress: ResMut<LoadingProgress>,
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    initial: Option<Res<InitialRestTextures>>,
    settings: Option<Res<DisplacementSettings>>,
    field: Option<Res<SensorMotionFieldResource>>,
) {
    if progress.textures_configured || !progress.textures_loaded {
        return;
    }
    let (Some(initial), Some(settings), Some(field)) = (initial, settings, field) else {
        return;
    };
    let Some((_, active_rest)) = initial.layers.first() else {
        return;
    };

    for (_, handle) in &initial.layers {
        if let Some(image) = images.get_mut(handle) {
            configure_nearest_sampling(image);
        }
    }

    let cpu_side = settings.backend == Backend::Cpu;
    let mut state_image = || images.add(create_state_image(cpu_side));
    let offsets = [state_image(), state_image()];
    let velocities = [state_image(), state_image()];
    let motion_field = images.add(create_motion_field_image(
        field.0.width(),
        field.0.height(),
        field.0.to_texture_bytes(),
    ));

    commands.insert_resource(DisplacementTextures {
        rest: active_rest.clone(),
        motion_field,
        offsets,
        velocities,
    });

    info!(
        "Displacement textures created ({} backend)",
        if cpu_side { "CPU" } else { "GPU" }
    );
    progress.textures_configured = true;
}
