use crate::engine::gallery::GalleryState;
use crate::engine::loading::manifest_loader::InitialRestTextures;
use crate::engine::loading::progress::LoadingProgress;
use bevy::asset::LoadState;
use bevy::prelude::*;

/// Wait until the initial rest textures are loaded.
pub fn check_texture_loading(
    mut progress: ResMut<LoadingProgress>,
    initial: Option<Res<InitialRestTextures>>,
    gallery: Option<Res<GalleryState>>,
    asset_server: Res<AssetServer>,
) {
    if progress.textures_loaded || !progress.manifest_loaded {
        return;
    }
    let (Some(initial), Some(gallery)) = (initial, gallery) else {
        return;
    };

    let mut states = Vec::with_capacity(initial.layers.len());
    for (scene, handle) in &initial.layers {
        let name = gallery.scenes[*scene].name.clone();
        match asset_server.get_load_state(handle) {
            Some(LoadState::Loaded) => states.push((name, true)),
            Some(LoadState::Failed(err)) => {
                error!("Rest texture for '{name}' failed to load: {err}");
                states.push((name, false));
            }
            _ => states.push((name, false)),
        }
    }

    let all_loaded = states.iter().all(|(_, loaded)| *loaded);
    if states != progress.textures_loading_states {
        progress.textures_loading_states = states;
    }
    if all_loaded {
        info!("Rest textures loaded");
        progress.textures_loaded = true;
    }
}
