//! Gallery of preprocessed scenes shown one after another.
//!
//! Two layers exist at any time: the physics-active scene and the preloaded next
//! one. [`systems::gallery_rotation_system`] cross-fades them, swaps the rest
//! texture the kernel reads, resets the feedback state on every swap and frames
//! the orbiting camera.

/// Timing, smoothstep blending and sphere framing.
pub mod rotation;

/// ECS systems driving the rotation.
pub mod systems;

use crate::engine::assets::gallery_manifest::GalleryManifest;
use bevy::prelude::*;
use constants::coordinate_system::{SCENE_ROTATION_EULER_DEG, SCENE_TO_WORLD_SCALE};
use rand::Rng;
use rand::seq::SliceRandom;
use rotation::{GalleryRotation, GallerySettings, SceneSphere};

/// One manifest scene, resolved against the manifest directory.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryScene {
    pub name: String,
    pub rest_texture_path: String,
    /// Bounding sphere in scene space.
    pub sphere: SceneSphere,
}

#[derive(Resource, Debug, Clone)]
pub struct GalleryState {
    pub scenes: Vec<GalleryScene>,
    pub rotation: GalleryRotation,
}

impl GalleryState {
    /// Scenes in manifest order. Texture paths are joined onto `manifest_dir`.
    pub fn from_manifest(
        manifest: &GalleryManifest,
        manifest_dir: &str,
        settings: GallerySettings,
    ) -> Self {
        let scenes: Vec<GalleryScene> = manifest
            .ordered_scenes()
            .into_iter()
            .map(|(name, entry)| GalleryScene {
                name: name.to_string(),
                rest_texture_path: join_asset_path(manifest_dir, &entry.rest_positions),
                sphere: entry.sphere(),
            })
            .collect();
        let rotation = GalleryRotation::new(scenes.len(), settings, 0.0);
        Self { scenes, rotation }
    }

    /// Reorder the scenes randomly. The rotation only depends on the scene count.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.scenes.shuffle(rng);
    }

    /// Restart the cycle clock, used once the layers exist.
    pub fn restart(&mut self, settings: GallerySettings, now: f32) {
        self.rotation = GalleryRotation::new(self.scenes.len(), settings, now);
    }
}

/// One of the (at most two) rendered scenes.
#[derive(Component, Debug, Clone)]
pub struct GalleryLayer {
    /// Index into [`GalleryState::scenes`].
    pub scene: usize,
    /// Keeps this layer's rest texture loaded.
    pub rest_texture: Handle<Image>,
    pub opacity: f32,
    /// The layer whose rest positions the kernel currently integrates.
    pub physics_active: bool,
}

/// Scene space (PLY) to world: Euler XYZ rotation then uniform scale.
pub fn scene_transform() -> Transform {
    let [x, y, z] = SCENE_ROTATION_EULER_DEG;
    Transform::from_rotation(Quat::from_euler(
        EulerRot::XYZ,
        x.to_radians(),
        y.to_radians(),
        z.to_radians(),
    ))
    .with_scale(Vec3::splat(SCENE_TO_WORLD_SCALE as f32))
}

/// `dir/file` in asset-path form; an empty `dir` yields `file`.
pub fn join_asset_path(dir: &str, file: &str) -> String {
    let dir = dir.trim_end_matches('/');
    if dir.is_empty() {
        file.to_string()
    } else {
        format!("{dir}/{file}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn scene_transform_matches_coordinate_system() {
        let world = scene_transform().transform_point(Vec3::new(1.0, 2.0, 3.0));
        let (x, y, z) = constants::coordinate_system::scene_to_world(1.0, 2.0, 3.0);
        assert!((world - Vec3::new(x as f32, y as f32, z as f32)).length() < 1e-4);
    }

    fn manifest_with(names: &[&str]) -> GalleryManifest {
        let scenes = names
            .iter()
            .map(|name| {
                format!(
                    r#""{name}": {{ "ply": "{name}.ply", "rest_positions": "{name}.restpos.dds", "point_count": 4, "center": [0.0, 0.0, 0.0], "radius": 1.0 }}"#
                )
            })
            .collect::<Vec<_>>()
            .join(",");
        serde_json::from_str(&format!(
            r#"{{ "texture_size": 1024, "padded_vertex_count": 4, "scenes": {{ {scenes} }} }}"#
        ))
        .unwrap()
    }

    #[test]
    fn shuffled_scenes_are_a_permutation_of_the_manifest() {
        let manifest = manifest_with(&["a", "b", "c", "d", "e", "f"]);
        let ordered = GalleryState::from_manifest(&manifest, "gallery", GallerySettings::default());
        let mut shuffled = ordered.clone();
        shuffled.shuffle(&mut StdRng::seed_from_u64(7));

        let names = |state: &GalleryState| {
            state
                .scenes
                .iter()
                .map(|scene| scene.name.clone())
                .collect::<Vec<_>>()
        };
        let mut sorted = names(&shuffled);
        sorted.sort();
        assert_eq!(sorted, names(&ordered));

        let spin = |seed| {
            let mut state = ordered.clone();
            state.shuffle(&mut StdRng::seed_from_u64(seed));
            names(&state)
        };
        assert!((0..16).any(|seed| spin(seed) != names(&ordered)));
    }

    #[test]
    fn asset_paths_join_onto_manifest_dir() {
        assert_eq!(join_asset_path("gallery/", "a.restpos.dds"), "gallery/a.restpos.dds");
        assert_eq!(join_asset_path("", "a.restpos.dds"), "a.restpos.dds");
    }
}
