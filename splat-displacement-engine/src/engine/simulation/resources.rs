use crate::engine::config::{Backend, InstallationConfig};
use crate::physics::{
    CameraFrame, DisplacementParams, DisplacementState, RestStateStore, SensorMotionField,
    StableId, ViewerBasis,
};
use bevy::prelude::*;

/// Kernel tunables and backend for the current run.
///
/// `params.scene_center` and `params.max_radius` follow the active gallery scene.
#[derive(Resource, Debug, Clone)]
pub struct DisplacementSettings {
    pub params: DisplacementParams,
    pub backend: Backend,
}

impl DisplacementSettings {
    pub fn from_config(config: &InstallationConfig) -> Self {
        Self {
            params: config.displacement_params(),
            backend: config.backend,
        }
    }
}

/// Camera frame handed to the next kernel pass.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct PhysicsCameraFrame(pub CameraFrame);

impl PhysicsCameraFrame {
    pub fn from_config(config: &InstallationConfig) -> Self {
        Self(CameraFrame {
            viewer: ViewerBasis::default(),
            sensor: config.sensor_projection(),
        })
    }
}

/// Latest sensor motion field. Written by the sensor source, read by both backends.
#[derive(Resource, Debug, Clone)]
pub struct SensorMotionFieldResource(pub SensorMotionField);

/// CPU copy of the rest store; filled only where the CPU needs positions.
#[derive(Resource, Debug, Default)]
pub struct RestStore {
    pub store: RestStateStore,
    /// Rest texture the store was built from.
    pub source: Option<AssetId<Image>>,
}

/// Offset/velocity generations of the CPU backend.
#[derive(Resource, Debug, Clone)]
pub struct CpuDisplacement(pub DisplacementState);

impl Default for CpuDisplacement {
    fn default() -> Self {
        Self(DisplacementState::new(constants::texture::MAX_SLOTS))
    }
}

/// Entity collection published by a dynamic upstream pipeline.
///
/// When present and changed, the rest store is rebuilt from these pairs and
/// uploaded as the physics-active rest texture. Order is irrelevant.
#[derive(Resource, Debug, Clone, Default)]
pub struct UpstreamEntitySnapshot {
    pub entities: Vec<(StableId, Vec3)>,
}
