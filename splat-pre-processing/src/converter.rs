//! Gallery converter: normalises, pads and indexes every splat scene.
use crate::bounds::BoundingSphere;
use crate::dds_writer::{rest_position_texels, write_rest_position_dds};
use crate::error::PreprocessError;
use crate::manifest::{GalleryManifest, SceneEntry};
use crate::ply::{read_ply, read_ply_header, write_canonical_ply};
use constants::gallery::{DEFAULT_SPHERE_RADIUS, GALLERY_MANIFEST_FILE, REST_TEXTURE_SUFFIX};
use constants::texture::{MAX_SLOTS, REST_TEXTURE_SIZE};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// One scene after conversion, before it is recorded in the manifest.
struct ConvertedScene {
    name: String,
    point_count: usize,
    sphere: BoundingSphere,
}

pub struct GalleryConverter {
    /// Directories scanned for `.ply` scenes.
    input_dirs: Vec<PathBuf>,
    output_dir: PathBuf,
}

impl GalleryConverter {
    pub fn new(input_dirs: Vec<PathBuf>, output_dir: &Path) -> Result<Self, PreprocessError> {
        fs::create_dir_all(output_dir).map_err(|e| PreprocessError::io(output_dir, e))?;
        Ok(Self {
            input_dirs,
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// Every `.ply` under the input directories, sorted by file name.
    /// Later directories override earlier ones on a name clash.
    pub fn discover_scenes(&self) -> Result<Vec<PathBuf>, PreprocessError> {
        let mut by_name = BTreeMap::new();
        for dir in &self.input_dirs {
            let entries = fs::read_dir(dir).map_err(|e| PreprocessError::io(dir, e))?;
            for entry in entries {
                let path = entry.map_err(|e| PreprocessError::io(dir, e))?.path();
                let is_ply = path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("ply"));
                if !is_ply {
                    continue;
                }
                if let Some(stem) = path.file_stem() {
                    by_name.insert(stem.to_string_lossy().to_string(), path);
                }
            }
        }

        if by_name.is_empty() {
            return Err(PreprocessError::NoScenes(self.input_dirs.clone()));
        }
        Ok(by_name.into_values().collect())
    }

    pub fn convert(&self) -> Result<GalleryManifest, PreprocessError> {
        let scenes = self.discover_scenes()?;
        println!("Found {} scenes", scenes.len());

        // Pass 1: headers only, to find the padding target.
        let padded_vertex_count = scenes
            .iter()
            .map(|path| read_ply_header(path).map(|h| h.vertex_count))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .max()
            .unwrap_or(0);
        println!("Padding every scene to {padded_vertex_count} vertices");

        let progress = ProgressBar::new(scenes.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        // Pass 2: convert scenes in parallel.
        let converted = scenes
            .par_iter()
            .map(|path| {
                let result = self.convert_scene(path, padded_vertex_count);
                progress.inc(1);
                result
            })
            .collect::<Result<Vec<_>, _>>()?;
        progress.finish_with_message("scenes converted");

        let manifest = GalleryManifest {
            texture_size: REST_TEXTURE_SIZE,
            padded_vertex_count,
            scenes: converted
                .into_iter()
                .map(|scene| {
                    let entry = SceneEntry::new(
                        &scene.name,
                        REST_TEXTURE_SUFFIX,
                        scene.point_count,
                        scene.sphere,
                    );
                    (scene.name, entry)
                })
                .collect(),
        };

        manifest.write(&self.output_dir.join(GALLERY_MANIFEST_FILE))?;
        Ok(manifest)
    }

    fn convert_scene(
        &self,
        path: &Path,
        padded_vertex_count: usize,
    ) -> Result<ConvertedScene, PreprocessError> {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let scene = read_ply(path)?;
        let positions = scene.positions();

        let padding = write_canonical_ply(
            &self.output_dir.join(format!("{name}.ply")),
            &scene,
            padded_vertex_count,
        )?;

        if positions.len() > MAX_SLOTS {
            eprintln!(
                "Warning: {name} has {} points, rest texture holds {MAX_SLOTS}; extra points are not displaced",
                positions.len()
            );
        }
        let texels = rest_position_texels(&positions);
        write_rest_position_dds(
            &self.output_dir.join(format!("{name}{REST_TEXTURE_SUFFIX}")),
            &texels,
        )?;

        let sphere = BoundingSphere::from_positions(&positions).unwrap_or(BoundingSphere {
            center: [0.0; 3],
            radius: DEFAULT_SPHERE_RADIUS,
        });

        println!(
            "  {name}: {} points (+{padding} padding), radius {:.2}",
            positions.len(),
            sphere.radius
        );

        Ok(ConvertedScene {
            name,
            point_count: positions.len(),
            sphere,
        })
    }
}
