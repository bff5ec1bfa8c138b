//! Gallery manifest linking every padded scene to its rest texture and bounds.
use crate::bounds::BoundingSphere;
use crate::error::PreprocessError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Written once per gallery; the engine reads it to drive scene rotation.
#[derive(Debug, Serialize, Deserialize)]
pub struct GalleryManifest {
    /// Side length of every rest position texture.
    pub texture_size: usize,
    /// Vertex count every padded PLY shares.
    pub padded_vertex_count: usize,
    /// Scenes keyed by name, in rotation order.
    pub scenes: BTreeMap<String, SceneEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SceneEntry {
    /// Padded canonical PLY, relative to the manifest.
    pub ply: String,
    /// Rest position texture, relative to the manifest.
    pub rest_positions: String,
    /// Real (non-filler) points in the scene.
    pub point_count: usize,
    pub center: [f32; 3],
    pub radius: f32,
}

impl SceneEntry {
    pub fn new(name: &str, rest_suffix: &str, point_count: usize, sphere: BoundingSphere) -> Self {
        Self {
            ply: format!("{name}.ply"),
            rest_positions: format!("{name}{rest_suffix}"),
            point_count,
            center: sphere.center,
            radius: sphere.radius,
        }
    }
}

impl GalleryManifest {
    pub fn write(&self, path: &Path) -> Result<(), PreprocessError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| PreprocessError::io(path, e))?;

        println!("Generated gallery manifest: {}", path.display());
        self.print_summary();
        Ok(())
    }

    fn print_summary(&self) {
        println!("Manifest Summary:");
        println!("  Scenes: {}", self.scenes.len());
        println!("  Padded vertex count: {}", self.padded_vertex_count);
        for (name, scene) in &self.scenes {
            println!(
                "  {name}: {} points, center ({:.2}, {:.2}, {:.2}), radius {:.2}",
                scene.point_count, scene.center[0], scene.center[1], scene.center[2], scene.radius
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_json_uses_relative_file_names() {
        let mut scenes = BTreeMap::new();
        scenes.insert(
            "garden".to_string(),
            SceneEntry::new(
                "garden",
                ".restpos.dds",
                12,
                BoundingSphere {
                    center: [1.0, 2.0, 3.0],
                    radius: 4.0,
                },
            ),
        );
        let manifest = GalleryManifest {
            texture_size: 1024,
            padded_vertex_count: 20,
            scenes,
        };

        let value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(value["scenes"]["garden"]["ply"], "garden.ply");
        assert_eq!(value["scenes"]["garden"]["rest_positions"], "garden.restpos.dds");
        assert_eq!(value["padded_vertex_count"], 20);
    }
}
