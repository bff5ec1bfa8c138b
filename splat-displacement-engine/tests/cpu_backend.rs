//! Headless run of the CPU backend systems: generation bookkeeping, offset upload
//! into the write texture, reset on request and upstream snapshots.
//!
//! Run: cargo test -p splat-displacement-engine --test cpu_backend

use bevy::prelude::*;
use splat_displacement_engine::engine::assets::displacement_textures::{
    DisplacementTextures, create_rest_image, create_state_image,
};
use splat_displacement_engine::engine::compute::displacement_compute::DisplacementFrame;
use splat_displacement_engine::engine::config::Backend;
use splat_displacement_engine::engine::simulation::systems::{
    advance_generation, apply_upstream_snapshot, step_cpu_backend, sync_rest_store,
};
use splat_displacement_engine::engine::simulation::{
    CpuDisplacement, DisplacementSettings, PhysicsCameraFrame, RestStore,
    SensorMotionFieldResource, UpstreamEntitySnapshot,
};
use splat_displacement_engine::physics::{
    DisplacementParams, FlowSample, RestStateStore, SensorMotionField, StableId,
};

fn texel_x(app: &App, handle: &Handle<Image>, slot: usize) -> f32 {
    let images = app.world().resource::<Assets<Image>>();
    let data = images.get(handle).unwrap().data.as_ref().unwrap();
    let start = slot * 16;
    f32::from_le_bytes(data[start..start + 4].try_into().unwrap())
}

fn cpu_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, AssetPlugin::default()))
        .init_asset::<Image>();

    let mut store = RestStateStore::default();
    store.write_snapshot([(StableId(0), Vec3::ZERO)]);

    let textures = {
        let mut images = app.world_mut().resource_mut::<Assets<Image>>();
        let mut state_image = || images.add(create_state_image(true));
        DisplacementTextures {
            rest: Handle::default(),
            motion_field: Handle::default(),
            offsets: [state_image(), state_image()],
            velocities: [state_image(), state_image()],
        }
    };

    app.insert_resource(textures)
        .insert_resource(DisplacementFrame::default())
        .insert_resource(DisplacementSettings {
            params: DisplacementParams::default(),
            backend: Backend::Cpu,
        })
        .insert_resource(PhysicsCameraFrame::default())
        .insert_resource(SensorMotionFieldResource(SensorMotionField::uniform(
            4,
            4,
            FlowSample {
                flow: Vec2::X,
                depth: 0.0,
            },
        )))
        .insert_resource(RestStore {
            store,
            source: None,
        })
        .insert_resource(CpuDisplacement::default())
        .add_systems(
            Update,
            (
                apply_upstream_snapshot,
                sync_rest_store,
                advance_generation,
                step_cpu_backend,
            )
                .chain(),
        );
    app
}

fn written_offsets(app: &App) -> Handle<Image> {
    let generation = app.world().resource::<DisplacementFrame>().generation;
    let textures = app.world().resource::<DisplacementTextures>();
    textures.offsets[DisplacementTextures::write_index(generation)].clone()
}

#[test]
fn each_frame_uploads_into_the_write_generation() {
    let mut app = cpu_app();

    app.update();
    assert_eq!(app.world().resource::<DisplacementFrame>().generation, 0);
    let first = written_offsets(&app);
    // dt 1/60, force (10, 0, 0): v = 10/60 * 0.9 = 0.15, o = 0.15/60 * 0.95.
    let expected = 0.15 / 60.0 * 0.95;
    assert!((texel_x(&app, &first, 0) - expected).abs() < 1e-6);
    assert_eq!(texel_x(&app, &first, 1), 0.0);

    app.update();
    assert_eq!(app.world().resource::<DisplacementFrame>().generation, 1);
    let second = written_offsets(&app);
    assert_ne!(first, second);
    assert!(texel_x(&app, &second, 0) > texel_x(&app, &first, 0));
}

#[test]
fn reset_request_zeroes_the_next_pass() {
    let mut app = cpu_app();
    app.update();
    app.update();

    app.world_mut()
        .resource_mut::<DisplacementFrame>()
        .reset_requested = true;
    app.update();

    let frame = app.world().resource::<DisplacementFrame>();
    assert!(!frame.reset_requested);
    assert_eq!(frame.uniform.reset, 1);
    let written = written_offsets(&app);
    assert_eq!(texel_x(&app, &written, 0), 0.0);
    let cpu = app.world().resource::<CpuDisplacement>();
    assert_eq!(cpu.0.offset(StableId(0)), Vec3::ZERO);
}

#[test]
fn upstream_snapshot_replaces_store_and_rest_texture() {
    let mut app = cpu_app();
    app.insert_resource(UpstreamEntitySnapshot {
        entities: vec![
            (StableId(7), Vec3::new(1.0, 0.0, 0.0)),
            (StableId(2), Vec3::new(0.0, 1.0, 0.0)),
        ],
    });
    app.update();

    let rest_store = app.world().resource::<RestStore>();
    assert_eq!(rest_store.store.valid_count(), 2);
    assert_eq!(rest_store.store.get(StableId(7)), Some(Vec3::X));
    assert_eq!(rest_store.store.get(StableId(0)), None);

    let rest = app.world().resource::<DisplacementTextures>().rest.clone();
    assert_eq!(rest_store.source, Some(rest.id()));
    assert!(app.world().resource::<Assets<Image>>().get(&rest).is_some());

    let cpu = app.world().resource::<CpuDisplacement>();
    assert!(cpu.0.offset(StableId(7)).x > 0.0);
    assert_eq!(cpu.0.offset(StableId(0)), Vec3::ZERO);
}

#[test]
fn static_upstream_snapshot_survives_rest_texture_swap() {
    let mut app = cpu_app();
    app.insert_resource(UpstreamEntitySnapshot {
        entities: vec![(StableId(7), Vec3::X)],
    });
    app.update();
    app.update();

    // A gallery swap points the rest texture at the incoming scene.
    let mut scene = RestStateStore::default();
    scene.write_snapshot([(StableId(0), Vec3::ZERO)]);
    let scene_rest = app
        .world_mut()
        .resource_mut::<Assets<Image>>()
        .add(create_rest_image(scene.as_bytes().to_vec()));
    app.world_mut().resource_mut::<DisplacementTextures>().rest = scene_rest.clone();
    app.update();

    let rest = app.world().resource::<DisplacementTextures>().rest.clone();
    assert_ne!(rest, scene_rest);
    let rest_store = app.world().resource::<RestStore>();
    assert_eq!(rest_store.source, Some(rest.id()));
    assert_eq!(rest_store.store.get(StableId(7)), Some(Vec3::X));
    assert_eq!(rest_store.store.get(StableId(0)), None);
    assert!(app.world().resource::<CpuDisplacement>().0.offset(StableId(7)).x > 0.0);
}
