use crate::engine::assets::displacement_textures::DisplacementTextures;
use crate::engine::simulation::SensorMotionFieldResource;
use bevy::prelude::*;

/// Copy the motion field into its texture on frames where it changed.
pub fn upload_motion_field(
    field: Res<SensorMotionFieldResource>,
    textures: Res<DisplacementTextures>,
    mut images: ResMut<Assets<Image>>,
) {
    if !field.is_changed() {
        return;
    }
    let Some(image) = images.get_mut(&textures.motion_field) else {
        return;
    };

    let size = image.texture_descriptor.size;
    if size.width != field.0.width() || size.height != field.0.height() {
        warn!(
            "Motion field is {}x{} but its texture is {}x{}; upload skipped",
            field.0.width(),
            field.0.height(),
            size.width,
            size.height
        );
        return;
    }
    image.data = Some(field.0.to_texture_bytes());
}
