use crate::engine::assets::displacement_textures::DisplacementTextures;
use crate::engine::config::Backend;
use crate::physics::{CameraFrame, DisplacementParams};
use constants::texture::{COMPUTE_WORKGROUP_SIZE, REST_TEXTURE_SIZE};

use bevy::prelude::*;
use bevy::render::extract_resource::{ExtractResource, ExtractResourcePlugin};
use bevy::render::{
    Render, RenderApp, RenderSet,
    render_asset::RenderAssets,
    render_resource::{
        BindGroupEntry, BindGroupLayout, BindGroupLayoutEntry, BindingResource, BindingType,
        Buffer, BufferBindingType, BufferInitDescriptor, BufferUsages, CachedComputePipelineId,
        ComputePassDescriptor, ComputePipeline, ComputePipelineDescriptor, PipelineCache,
        ShaderStages, StorageTextureAccess, TextureFormat, TextureSampleType,
        TextureViewDimension,
    },
    renderer::{RenderDevice, RenderQueue},
    texture::GpuImage,
};
use bytemuck::{Pod, Zeroable};

const SHADER_PATH: &str = "shaders/displacement_update.wgsl";

/// Per-pass uniform block, laid out to match `DisplacementUniform` in
/// `shaders/displacement_update.wgsl` (176 bytes).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct DisplacementUniform {
    pub sensor_matrix: [[f32; 4]; 4], // 0
    pub viewer_right: [f32; 4],       // 64
    pub viewer_up: [f32; 4],          // 80
    pub scene_center: [f32; 4],       // 96, w = max radius

    pub force_gain: f32, // 112
    pub return_rate: f32,
    pub damping: f32,
    pub dt: f32,

    pub depth_falloff: f32, // 128
    pub max_offset: f32,
    pub noise_gain: f32,
    pub noise_rate: f32,

    pub uv_margin: f32, // 144
    pub time: f32,
    pub stiffness: f32,
    pub return_model: u32,

    pub reset: u32, // 160
    pub slot_count: u32,
    pub _padding: [u32; 2],
}

impl DisplacementUniform {
    pub fn new(
        params: &DisplacementParams,
        frame: &CameraFrame,
        time: f32,
        reset: bool,
        slot_count: u32,
    ) -> Self {
        Self {
            sensor_matrix: frame.sensor.matrix.to_cols_array_2d(),
            viewer_right: frame.viewer.right.extend(0.0).to_array(),
            viewer_up: frame.viewer.up.extend(0.0).to_array(),
            scene_center: params.scene_center.extend(params.max_radius).to_array(),
            force_gain: params.force_gain,
            return_rate: params.return_rate,
            damping: params.damping,
            dt: params.dt,
            depth_falloff: params.depth_falloff,
            max_offset: params.max_offset,
            noise_gain: params.noise_gain,
            noise_rate: params.noise_rate,
            uv_margin: params.uv_margin,
            time,
            stiffness: params.return_model.stiffness(),
            return_model: params.return_model.shader_code(),
            reset: u32::from(reset),
            slot_count,
            _padding: [0; 2],
        }
    }
}

/// Main-world description of this frame's pass, extracted every frame.
///
/// The pass reads generation `generation % 2` and writes `(generation + 1) % 2`.
#[derive(Resource, ExtractResource, Clone, Debug, Default)]
pub struct DisplacementFrame {
    pub generation: u64,
    pub uniform: DisplacementUniform,
    pub backend: Backend,
    /// Set once the app is running; nothing is dispatched before that.
    pub active: bool,
    /// Consumed by the next pass, which then writes zeros everywhere.
    pub reset_requested: bool,
}

/// Render-world pipeline cache for the displacement pass.
#[derive(Resource, Default)]
pub struct DisplacementComputeState {
    pub pipeline: Option<CachedComputePipelineId>,
    pub bind_group_layout: Option<BindGroupLayout>,
    last_generation: Option<u64>,
    /// A reset was requested by a generation whose pass never ran.
    reset_pending: bool,
}

impl DisplacementComputeState {
    fn observe(&mut self, frame: &DisplacementFrame) {
        if frame.uniform.reset != 0 {
            self.reset_pending = true;
        }
    }

    /// Uniform for the pass of `frame`, carrying any reset a skipped pass left behind.
    fn pass_uniform(&self, frame: &DisplacementFrame) -> DisplacementUniform {
        let mut uniform = frame.uniform;
        if self.reset_pending {
            uniform.reset = 1;
        }
        uniform
    }

    fn mark_dispatched(&mut self, generation: u64) {
        self.last_generation = Some(generation);
        self.reset_pending = false;
    }
}

pub struct DisplacementComputePlugin;

impl Plugin for DisplacementComputePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DisplacementFrame>()
            .add_plugins(ExtractResourcePlugin::<DisplacementFrame>::default())
            .add_plugins(ExtractResourcePlugin::<DisplacementTextures>::default());

        let Some(render_app) = app.get_sub_app_mut(RenderApp) else {
            return;
        };
        render_app
            .init_resource::<DisplacementComputeState>()
            .add_systems(
                Render,
                run_displacement_compute.in_set(RenderSet::Queue),
            );
    }
}

/// Dispatches one kernel pass per main-world generation.
///
/// ### WGSL expectations:
/// ```wgsl
/// @group(0) @binding(0) var rest_texture: texture_2d<f32>;
/// @group(0) @binding(1) var prev_offset: texture_2d<f32>;
/// @group(0) @binding(2) var prev_velocity: texture_2d<f32>;
/// @group(0) @binding(3) var motion_field: texture_2d<f32>;
/// @group(0) @binding(4) var next_offset: texture_storage_2d<rgba32float, write>;
/// @group(0) @binding(5) var next_velocity: texture_storage_2d<rgba32float, write>;
/// @group(0) @binding(6) var<uniform> params: DisplacementUniform;
/// ```
pub fn run_displacement_compute(
    mut state: ResMut<DisplacementComputeState>,
    frame: Option<Res<DisplacementFrame>>,
    textures: Option<Res<DisplacementTextures>>,
    render_device: Res<RenderDevice>,
    render_queue: Res<RenderQueue>,
    pipeline_cache: Res<PipelineCache>,
    gpu_images: Res<RenderAssets<GpuImage>>,
    asset_server: Res<AssetServer>,
) {
    let (Some(frame), Some(textures)) = (frame, textures) else {
        return;
    };
    if !frame.active || frame.backend != Backend::Gpu {
        return;
    }
    if state.last_generation == Some(frame.generation) {
        return;
    }
    state.observe(&frame);

    if state.bind_group_layout.is_none() {
        initialise_compute_pipeline(&mut state, &render_device, &pipeline_cache, &asset_server);
    }

    let Some(bind_group_layout) = &state.bind_group_layout else {
        return;
    };
    let Some(pipeline_id) = state.pipeline else {
        return;
    };
    let Some(pipeline) = pipeline_cache.get_compute_pipeline(pipeline_id) else {
        return;
    };

    let read = DisplacementTextures::read_index(frame.generation);
    let write = DisplacementTextures::write_index(frame.generation);
    let Some(rest_gpu) = gpu_images.get(&textures.rest) else {
        return;
    };
    let Some(field_gpu) = gpu_images.get(&textures.motion_field) else {
        return;
    };
    let (Some(prev_offset), Some(prev_velocity)) = (
        gpu_images.get(&textures.offsets[read]),
        gpu_images.get(&textures.velocities[read]),
    ) else {
        return;
    };
    let (Some(next_offset), Some(next_velocity)) = (
        gpu_images.get(&textures.offsets[write]),
        gpu_images.get(&textures.velocities[write]),
    ) else {
        return;
    };

    let uniform_buffer = create_uniform_buffer(&render_device, &state.pass_uniform(&frame));
    let bind_group = render_device.create_bind_group(
        "displacement_compute_bind_group",
        bind_group_layout,
        &[
            BindGroupEntry {
                binding: 0,
                resource: BindingResource::TextureView(&rest_gpu.texture_view),
            },
            BindGroupEntry {
                binding: 1,
                resource: BindingResource::TextureView(&prev_offset.texture_view),
            },
            BindGroupEntry {
                binding: 2,
                resource: BindingResource::TextureView(&prev_velocity.texture_view),
            },
            BindGroupEntry {
                binding: 3,
                resource: BindingResource::TextureView(&field_gpu.texture_view),
            },
            BindGroupEntry {
                binding: 4,
                resource: BindingResource::TextureView(&next_offset.texture_view),
            },
            BindGroupEntry {
                binding: 5,
                resource: BindingResource::TextureView(&next_velocity.texture_view),
            },
            BindGroupEntry {
                binding: 6,
                resource: uniform_buffer.as_entire_binding(),
            },
        ],
    );

    dispatch(&render_device, &render_queue, pipeline, &bind_group);
    state.mark_dispatched(frame.generation);
}

fn dispatch(
    render_device: &RenderDevice,
    render_queue: &RenderQueue,
    pipeline: &ComputePipeline,
    bind_group: &bevy::render::render_resource::BindGroup,
) {
    let groups = (REST_TEXTURE_SIZE as u32).div_ceil(COMPUTE_WORKGROUP_SIZE);
    let mut encoder = render_device.create_command_encoder(&Default::default());
    {
        let mut pass = encoder.begin_compute_pass(&ComputePassDescriptor {
            label: Some("displacement_compute"),
            timestamp_writes: None,
        });
        pass.set_pipeline(pipeline);
        pass.set_bind_group(0, bind_group, &[]);
        pass.dispatch_workgroups(groups, groups, 1);
    }
    render_queue.submit([encoder.finish()]);
}

fn sampled_texture(binding: u32) -> BindGroupLayoutEntry {
    BindGroupLayoutEntry {
        binding,
        visibility: ShaderStages::COMPUTE,
        ty: BindingType::Texture {
            sample_type: TextureSampleType::Float { filterable: false },
            view_dimension: TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

fn storage_texture(binding: u32) -> BindGroupLayoutEntry {
    BindGroupLayoutEntry {
        binding,
        visibility: ShaderStages::COMPUTE,
        ty: BindingType::StorageTexture {
            access: StorageTextureAccess::WriteOnly,
            format: TextureFormat::Rgba32Float,
            view_dimension: TextureViewDimension::D2,
        },
        count: None,
    }
}

/// Bindings 0-3 are read-only inputs, 4-5 the write generation, 6 the uniform.
fn initialise_compute_pipeline(
    state: &mut DisplacementComputeState,
    render_device: &RenderDevice,
    pipeline_cache: &PipelineCache,
    asset_server: &AssetServer,
) {
    let bind_group_layout = render_device.create_bind_group_layout(
        "displacement_compute_layout",
        &[
            sampled_texture(0),
            sampled_texture(1),
            sampled_texture(2),
            sampled_texture(3),
            storage_texture(4),
            storage_texture(5),
            BindGroupLayoutEntry {
                binding: 6,
                visibility: ShaderStages::COMPUTE,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
    );

    let shader = asset_server.load(SHADER_PATH);
    let pipeline = pipeline_cache.queue_compute_pipeline(ComputePipelineDescriptor {
        label: Some("displacement_compute".into()),
        layout: vec![bind_group_layout.clone()],
        push_constant_ranges: Vec::new(),
        shader,
        shader_defs: vec![],
        entry_point: "main".into(),
        zero_initialize_workgroup_memory: true,
    });

    info!("Displacement compute pipeline queued ({SHADER_PATH})");
    state.bind_group_layout = Some(bind_group_layout);
    state.pipeline = Some(pipeline);
}

fn create_uniform_buffer(render_device: &RenderDevice, uniform: &DisplacementUniform) -> Buffer {
    render_device.create_buffer_with_data(&BufferInitDescriptor {
        label: Some("displacement_uniform"),
        contents: bytemuck::cast_slice(&[*uniform]),
        usage: BufferUsages::UNIFORM,
    })
}
