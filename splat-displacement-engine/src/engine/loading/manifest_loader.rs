use crate::engine::assets::gallery_manifest::GalleryManifest;
use crate::engine::config::installation::CONFIG_PATH;
use crate::engine::config::{Backend, InstallationConfig};
use crate::engine::gallery::GalleryState;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::simulation::{
    CpuDisplacement, DisplacementSettings, PhysicsCameraFrame, SensorMotionFieldResource,
};
use crate::physics::SensorMotionField;
use bevy::asset::LoadState;
use bevy::prelude::*;
use std::path::Path;

#[derive(Resource, Default)]
pub struct ManifestLoader {
    config: Option<Handle<InstallationConfig>>,
    manifest: Option<Handle<GalleryManifest>>,
    manifest_dir: String,
    reported_failure: bool,
}

/// Start the loading process with the installation config.
pub fn start_loading(mut loader: ResMut<ManifestLoader>, asset_server: Res<AssetServer>) {
    loader.config = Some(asset_server.load(CONFIG_PATH));
}

/// Validate the config, publish the simulation resources and request the manifest.
///
/// A missing or invalid config is logged and replaced by defaults.
pub fn load_config_system(
    mut progress: ResMut<LoadingProgress>,
    mut loader: ResMut<ManifestLoader>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    configs: Res<Assets<InstallationConfig>>,
) {
    if progress.config_loaded {
        return;
    }
    let Some(handle) = loader.config.clone() else {
        return;
    };

    let config = if let Some(config) = configs.get(&handle) {
        match config.validate() {
            Ok(()) => config.clone(),
            Err(err) => {
                error!("Invalid {CONFIG_PATH}: {err}; using defaults");
                InstallationConfig::default()
            }
        }
    } else if matches!(asset_server.get_load_state(&handle), Some(LoadState::Failed(_))) {
        warn!("{CONFIG_PATH} could not be loaded; using defaults");
        InstallationConfig::default()
    } else {
        return;
    };

    info!(
        "Installation config: backend {:?}, return model {:?}, field {}x{}",
        config.backend,
        config.physics.return_model,
        config.sensor.field_width,
        config.sensor.field_height
    );

    commands.insert_resource(DisplacementSettings::from_config(&config));
    commands.insert_resource(PhysicsCameraFrame::from_config(&config));
    commands.insert_resource(SensorMotionFieldResource(SensorMotionField::zeros(
        config.sensor.field_width,
        config.sensor.field_height,
    )));
    if config.backend == Backend::Cpu {
        commands.insert_resource(CpuDisplacement::default());
    }

    let manifest_path = config.gallery.manifest_path.clone();
    loader.manifest_dir = Path::new(&manifest_path)
        .parent()
        .map(|dir| dir.to_string_lossy().into_owned())
        .unwrap_or_default();
    loader.manifest = Some(asset_server.load(manifest_path));

    commands.insert_resource(config);
    progress.config_loaded = true;
}

/// Build the gallery from the manifest and start loading the first two rest textures.
pub fn load_manifest_system(
    mut progress: ResMut<LoadingProgress>,
    mut loader: ResMut<ManifestLoader>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    manifests: Res<Assets<GalleryManifest>>,
    config: Option<Res<InstallationConfig>>,
) {
    if progress.manifest_loaded || !progress.config_loaded {
        return;
    }
    let (Some(handle), Some(config)) = (loader.manifest.clone(), config) else {
        return;
    };

    let Some(manifest) = manifests.get(&handle) else {
        if !loader.reported_failure
            && matches!(asset_server.get_load_state(&handle), Some(LoadState::Failed(_)))
        {
            error!(
                "Gallery manifest '{}' failed to load; run splat-pre-processing first",
                config.gallery.manifest_path
            );
            loader.reported_failure = true;
        }
        return;
    };

    if manifest.texture_size != constants::texture::REST_TEXTURE_SIZE {
        warn!(
            "Manifest texture size {} differs from engine slot texture size {}",
            manifest.texture_size,
            constants::texture::REST_TEXTURE_SIZE
        );
    }

    let mut gallery =
        GalleryState::from_manifest(manifest, &loader.manifest_dir, config.gallery_settings());
    if config.gallery.shuffle {
        gallery.shuffle(&mut rand::thread_rng());
    }
    if gallery.scenes.is_empty() {
        if !loader.reported_failure {
            error!("Gallery manifest lists no scenes");
            loader.reported_failure = true;
        }
        return;
    }

    info!(
        "Gallery manifest loaded: {} scenes, {} padded points",
        gallery.scenes.len(),
        manifest.padded_vertex_count
    );
    commands.insert_resource(LayerPointCount(manifest.layer_point_count()));
    commands.insert_resource(InitialRestTextures::load(&gallery, &asset_server));
    commands.insert_resource(gallery);
    progress.manifest_loaded = true;
}

/// Vertex count of every layer mesh.
#[derive(Resource, Debug, Clone, Copy)]
pub struct LayerPointCount(pub usize);

/// Rest textures of the first (active) and second (preloaded) scenes.
#[derive(Resource, Debug, Clone)]
pub struct InitialRestTextures {
    pub layers: Vec<(usize, Handle<Image>)>,
}

impl InitialRestTextures {
    pub fn load(gallery: &GalleryState, asset_server: &AssetServer) -> Self {
        let layers = (0..gallery.scenes.len().min(2))
            .map(|scene| {
                let path = gallery.scenes[scene].rest_texture_path.clone();
                (scene, asset_server.load(path))
            })
            .collect();
        Self { layers }
    }
}
