use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::engine::assets::gallery_manifest::GalleryManifest;
use crate::engine::camera::frame_extraction::extract_camera_frame;
use crate::engine::camera::gallery_camera::spawn_gallery_camera;
use crate::engine::compute::displacement_compute::DisplacementComputePlugin;
use crate::engine::config::InstallationConfig;
use crate::engine::core::app_state::{
    AppState, FpsText, transition_to_assets_loaded, transition_to_compute_ready,
    transition_to_running,
};
use crate::engine::core::window_config::create_window_config;
use crate::engine::gallery::systems::gallery_rotation_system;
use crate::engine::loading::layer_creator::create_layers_when_ready;
use crate::engine::loading::manifest_loader::{
    ManifestLoader, load_config_system, load_manifest_system, start_loading,
};
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::loading::texture_config::configure_loaded_textures;
use crate::engine::loading::texture_loader::check_texture_loading;
use crate::engine::render::layer_binding::bind_layer_materials;
use crate::engine::render::splat_material::SplatMaterial;
use crate::engine::sensor::field::upload_motion_field;
use crate::engine::sensor::pointer::pointer_motion_source;
use crate::engine::simulation::systems::{
    advance_generation, apply_upstream_snapshot, step_cpu_backend, sync_rest_store,
};
use crate::engine::simulation::{CpuDisplacement, RestStore};
use crate::engine::systems::fps_tracking::{fps_notification_system, fps_text_update_system};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(MaterialPlugin::<SplatMaterial>::default())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Multi-dot extensions keep the two JSON asset types apart.
        .add_plugins(JsonAssetPlugin::<InstallationConfig>::new(&["config.json"]))
        .add_plugins(JsonAssetPlugin::<GalleryManifest>::new(&["manifest.json"]))
        .add_plugins(DisplacementComputePlugin);

    app.init_resource::<LoadingProgress>()
        .init_resource::<ManifestLoader>()
        .init_resource::<RestStore>();

    app.add_systems(Startup, (setup, start_loading).chain())
        .add_systems(
            Update,
            (
                load_config_system,
                load_manifest_system,
                check_texture_loading,
                configure_loaded_textures,
                create_layers_when_ready,
                transition_to_assets_loaded,
            )
                .chain()
                .run_if(in_state(AppState::Loading)),
        )
        .add_systems(
            Update,
            transition_to_compute_ready.run_if(in_state(AppState::AssetsLoaded)),
        )
        .add_systems(
            Update,
            transition_to_running.run_if(in_state(AppState::ComputePipelinesReady)),
        );

    // Order matters: every input of the pass is final before the generation advances.
    let simulation_systems = (
        gallery_rotation_system,
        pointer_motion_source,
        upload_motion_field,
        extract_camera_frame,
        apply_upstream_snapshot,
        sync_rest_store.run_if(resource_exists::<CpuDisplacement>),
        advance_generation,
        step_cpu_backend.run_if(resource_exists::<CpuDisplacement>),
        bind_layer_materials,
    )
        .chain();

    app.add_systems(
        Update,
        (simulation_systems, fps_notification_system).run_if(in_state(AppState::Running)),
    );

    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, fps_text_update_system);
    }

    app
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands) {
    spawn_gallery_camera(&mut commands);

    #[cfg(not(target_arch = "wasm32"))]
    {
        create_native_overlays(&mut commands);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn create_native_overlays(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
