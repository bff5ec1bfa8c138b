use crate::engine::assets::displacement_textures::{DisplacementTextures, create_rest_image};
use crate::engine::compute::displacement_compute::{DisplacementFrame, DisplacementUniform};
use crate::engine::config::Backend;
use crate::engine::simulation::resources::{
    CpuDisplacement, DisplacementSettings, PhysicsCameraFrame, RestStore,
    SensorMotionFieldResource, UpstreamEntitySnapshot,
};
use crate::physics::{FrameInputs, RestStateStore};
use bevy::prelude::*;
use constants::texture::MAX_SLOTS;

/// Build the uniform for this frame's pass and move to the next generation.
///
/// The pass of counter `g` writes `(g + 1) % 2`; the material binds that texture.
pub fn advance_generation(
    mut frame: ResMut<DisplacementFrame>,
    settings: Res<DisplacementSettings>,
    camera_frame: Res<PhysicsCameraFrame>,
    mut cpu: Option<ResMut<CpuDisplacement>>,
    time: Res<Time>,
) {
    let reset = std::mem::take(&mut frame.reset_requested);
    if reset {
        if let Some(cpu) = cpu.as_mut() {
            cpu.0.request_reset();
        }
        debug!("Displacement reset queued for generation {}", frame.generation + 1);
    }

    if frame.active {
        frame.generation += 1;
    }
    frame.active = true;
    frame.backend = settings.backend;
    frame.uniform = DisplacementUniform::new(
        &settings.params,
        &camera_frame.0,
        time.elapsed_secs(),
        reset,
        MAX_SLOTS as u32,
    );
}

/// Rebuild the CPU rest store whenever the physics-active rest texture changes.
pub fn sync_rest_store(
    mut rest_store: ResMut<RestStore>,
    textures: Res<DisplacementTextures>,
    images: Res<Assets<Image>>,
) {
    let id = textures.rest.id();
    if rest_store.source == Some(id) {
        return;
    }
    let Some(data) = images.get(id).and_then(|image| image.data.as_ref()) else {
        return;
    };

    match RestStateStore::from_rgba32f_bytes(data, MAX_SLOTS) {
        Ok(store) => {
            info!("Rest store rebuilt: {} valid slots", store.valid_count());
            rest_store.store = store;
        }
        Err(err) => error!("Rest texture rejected, keeping previous store: {err}"),
    }
    rest_store.source = Some(id);
}

/// Write an upstream snapshot into a fresh store and publish it as the rest texture.
///
/// Republished when the snapshot changes and whenever something else (a gallery
/// swap) replaced the rest texture, so a static snapshot stays authoritative.
pub fn apply_upstream_snapshot(
    snapshot: Option<Res<UpstreamEntitySnapshot>>,
    mut rest_store: ResMut<RestStore>,
    mut textures: ResMut<DisplacementTextures>,
    mut images: ResMut<Assets<Image>>,
) {
    let Some(snapshot) = snapshot else {
        return;
    };
    let displaced = rest_store.source != Some(textures.rest.id());
    if !snapshot.is_changed() && !displaced {
        return;
    }

    let mut store = RestStateStore::default();
    let report = store.write_snapshot(snapshot.entities.iter().copied());
    if report.out_of_capacity > 0 || report.non_finite > 0 {
        warn!(
            "Upstream snapshot: {} written, {} beyond capacity, {} non-finite",
            report.written, report.out_of_capacity, report.non_finite
        );
    }

    let handle = images.add(create_rest_image(store.as_bytes().to_vec()));
    rest_store.source = Some(handle.id());
    rest_store.store = store;
    textures.rest = handle;
}

/// Run one kernel pass on the CPU and upload the offsets into the write generation.
pub fn step_cpu_backend(
    frame: Res<DisplacementFrame>,
    settings: Res<DisplacementSettings>,
    camera_frame: Res<PhysicsCameraFrame>,
    field: Res<SensorMotionFieldResource>,
    rest_store: Res<RestStore>,
    mut cpu: ResMut<CpuDisplacement>,
    textures: Res<DisplacementTextures>,
    mut images: ResMut<Assets<Image>>,
) {
    if settings.backend != Backend::Cpu {
        return;
    }

    let inputs = FrameInputs {
        field: &field.0,
        frame: &camera_frame.0,
        params: &settings.params,
        time: frame.uniform.time,
    };
    cpu.0.step(&rest_store.store, &inputs);

    let target = &textures.offsets[DisplacementTextures::write_index(frame.generation)];
    match images.get_mut(target) {
        Some(image) => image.data = Some(cpu.0.offset_texture_bytes()),
        None => warn!("CPU offset texture missing for generation {}", frame.generation),
    }
}
