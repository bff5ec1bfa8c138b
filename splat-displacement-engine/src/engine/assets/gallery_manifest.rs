use crate::engine::gallery::rotation::SceneSphere;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One preprocessed scene. Paths are relative to the manifest's directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneEntry {
    pub ply: String,
    pub rest_positions: String,
    pub point_count: usize,
    pub center: [f32; 3],
    pub radius: f32,
}

impl SceneEntry {
    /// Bounding sphere in scene space; an empty sphere falls back to the default radius.
    pub fn sphere(&self) -> SceneSphere {
        let radius = if self.radius > 0.0 && self.radius.is_finite() {
            self.radius
        } else {
            constants::gallery::DEFAULT_SPHERE_RADIUS
        };
        SceneSphere {
            center: Vec3::from_array(self.center),
            radius,
        }
    }
}

/// Gallery manifest as a Bevy asset. Mirrors the pre-processor's JSON exactly.
#[derive(Asset, TypePath, Debug, Clone, Serialize, Deserialize)]
pub struct GalleryManifest {
    pub texture_size: usize,
    pub padded_vertex_count: usize,
    pub scenes: BTreeMap<String, SceneEntry>,
}

impl GalleryManifest {
    /// Scenes in rotation order (sorted by name).
    pub fn ordered_scenes(&self) -> Vec<(&str, &SceneEntry)> {
        self.scenes.iter().map(|(n, s)| (n.as_str(), s)).collect()
    }

    /// Vertex count of every layer mesh, capped to the slot capacity.
    pub fn layer_point_count(&self) -> usize {
        self.padded_vertex_count.min(constants::texture::MAX_SLOTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_pre_processor_output() {
        let manifest: GalleryManifest = serde_json::from_str(
            r#"{
                "texture_size": 1024,
                "padded_vertex_count": 2000000,
                "scenes": {
                    "b_forest": { "ply": "b_forest.ply", "rest_positions": "b_forest.restpos.dds",
                                  "point_count": 10, "center": [0, 1, 2], "radius": 0 },
                    "a_atrium": { "ply": "a_atrium.ply", "rest_positions": "a_atrium.restpos.dds",
                                  "point_count": 20, "center": [1, 1, 1], "radius": 4.5 }
                }
            }"#,
        )
        .unwrap();

        let names: Vec<&str> = manifest.ordered_scenes().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["a_atrium", "b_forest"]);
        assert_eq!(manifest.layer_point_count(), constants::texture::MAX_SLOTS);
        assert_eq!(manifest.scenes["a_atrium"].sphere().radius, 4.5);
        assert_eq!(
            manifest.scenes["b_forest"].sphere().radius,
            constants::gallery::DEFAULT_SPHERE_RADIUS
        );
    }
}
