use bevy::prelude::*;

/// Loading milestones, in the order they complete.
#[derive(Resource, Default, Debug)]
pub struct LoadingProgress {
    pub config_loaded: bool,
    pub manifest_loaded: bool,
    pub textures_loaded: bool,
    pub textures_loading_states: Vec<(String, bool)>,
    pub textures_configured: bool,
    pub layers_created: bool,
    pub compute_pipelines_ready: bool,
}
