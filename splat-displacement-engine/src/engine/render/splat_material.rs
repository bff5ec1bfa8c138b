use crate::engine::config::installation::RenderConfig;
use bevy::render::render_resource::ShaderType;
use bevy::{
    prelude::*,
    reflect::TypePath,
    render::render_resource::{AsBindGroup, ShaderRef},
};

const SHADER_PATH: &str = "shaders/splat_points.wgsl";

/// Per-layer values read by `splat_points.wgsl`.
#[derive(Debug, Clone, Copy, PartialEq, ShaderType)]
pub struct SplatSettings {
    pub base_colour: Vec4,
    /// Calibration factor applied to the offset; zero renders rest positions.
    pub offset_scale: f32,
    pub tint_strength: f32,
    /// Half-size of a splat in normalised device units.
    pub point_size: f32,
    pub max_offset: f32,
    /// Cross-fade opacity of the layer.
    pub opacity: f32,
}

impl SplatSettings {
    pub fn from_config(render: &RenderConfig, max_offset: f32) -> Self {
        Self {
            base_colour: Vec4::from_array(render.base_colour),
            offset_scale: render.offset_scale,
            tint_strength: render.tint_strength,
            point_size: render.point_size,
            max_offset,
            opacity: 1.0,
        }
    }
}

/// Point material sampling rest and offset textures by slot.
///
/// The vertex shader derives the slot from the vertex index, fetches both texels
/// and projects `rest + offset * offset_scale`.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct SplatMaterial {
    #[texture(0, sample_type = "float", filterable = false)]
    pub rest_positions: Handle<Image>,

    #[texture(1, sample_type = "float", filterable = false)]
    pub offsets: Handle<Image>,

    #[uniform(2)]
    pub settings: SplatSettings,
}

impl Material for SplatMaterial {
    fn vertex_shader() -> ShaderRef {
        SHADER_PATH.into()
    }

    fn fragment_shader() -> ShaderRef {
        SHADER_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Blend
    }
}
