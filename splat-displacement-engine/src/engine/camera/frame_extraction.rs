use crate::engine::camera::gallery_camera::GalleryCamera;
use crate::engine::gallery::GalleryLayer;
use crate::engine::simulation::PhysicsCameraFrame;
use crate::physics::ViewerBasis;
use bevy::prelude::*;

/// Refresh the viewer half of the camera frame.
///
/// The basis is taken from the camera's local transform and expressed in the
/// physics-active layer's scene space. The sensor half never changes here.
pub fn extract_camera_frame(
    cameras: Query<&Transform, With<GalleryCamera>>,
    layers: Query<(&GalleryLayer, &Transform), Without<GalleryCamera>>,
    mut frame: ResMut<PhysicsCameraFrame>,
) {
    let Ok(camera) = cameras.single() else {
        return;
    };

    let world_basis = ViewerBasis::from_world_transform(&camera.compute_matrix());
    let viewer = layers
        .iter()
        .find(|(layer, _)| layer.physics_active)
        .map(|(_, transform)| world_basis.relative_to(&transform.compute_matrix()))
        .unwrap_or(world_basis);

    if frame.0.viewer != viewer {
        frame.0.viewer = viewer;
    }
}
