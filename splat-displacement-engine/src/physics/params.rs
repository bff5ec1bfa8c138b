use bevy::math::Vec3;
use constants::physics::*;
use serde::{Deserialize, Serialize};

/// How displaced splats are pulled back toward rest. A run uses exactly one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ReturnModel {
    /// `offset *= return_rate` after integration.
    #[default]
    ExponentialDecay,
    /// `velocity -= offset * stiffness * dt` before damping.
    StiffSpring { stiffness: f32 },
}

impl ReturnModel {
    /// Code shared with the compute shader uniform.
    pub fn shader_code(self) -> u32 {
        match self {
            Self::ExponentialDecay => 0,
            Self::StiffSpring { .. } => 1,
        }
    }

    pub fn stiffness(self) -> f32 {
        match self {
            Self::ExponentialDecay => 0.0,
            Self::StiffSpring { stiffness } => stiffness,
        }
    }
}

/// Kernel tunables. Validated by the configuration layer, trusted by the kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplacementParams {
    pub force_gain: f32,
    pub return_rate: f32,
    pub damping: f32,
    pub dt: f32,
    pub depth_falloff: f32,
    pub max_offset: f32,
    pub noise_gain: f32,
    pub noise_rate: f32,
    pub uv_margin: f32,
    /// Gating centre in scene space.
    pub scene_center: Vec3,
    /// Gating radius; 0 disables gating.
    pub max_radius: f32,
    pub return_model: ReturnModel,
}

impl Default for DisplacementParams {
    fn default() -> Self {
        Self {
            force_gain: FORCE_GAIN,
            return_rate: RETURN_RATE,
            damping: DAMPING,
            dt: TIME_STEP,
            depth_falloff: DEPTH_FALLOFF,
            max_offset: MAX_OFFSET,
            noise_gain: NOISE_GAIN,
            noise_rate: NOISE_RATE,
            uv_margin: UV_MARGIN,
            scene_center: Vec3::ZERO,
            max_radius: 0.0,
            return_model: ReturnModel::ExponentialDecay,
        }
    }
}
