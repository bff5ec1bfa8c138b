use bevy::prelude::*;

/// The render viewpoint driven by the gallery orbit. Its basis orients sensor forces.
#[derive(Component, Debug, Default)]
pub struct GalleryCamera;

pub fn spawn_gallery_camera(commands: &mut Commands) {
    commands.spawn((
        Camera3d::default(),
        Camera {
            clear_color: ClearColorConfig::Custom(Color::BLACK),
            ..default()
        },
        Projection::from(PerspectiveProjection {
            fov: constants::gallery::FALLBACK_VERTICAL_FOV_DEG.to_radians(),
            ..default()
        }),
        Transform::from_xyz(0.0, 0.0, 10.0).looking_at(Vec3::ZERO, Vec3::Y),
        GalleryCamera,
    ));
}

/// Vertical FOV in radians of a perspective projection, else `fallback_deg`.
pub fn vertical_fov(projection: Option<&Projection>, fallback_deg: f32) -> f32 {
    match projection {
        Some(Projection::Perspective(perspective)) => perspective.fov,
        _ => fallback_deg.to_radians(),
    }
}
