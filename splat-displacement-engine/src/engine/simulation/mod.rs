//! ECS glue around the [`crate::physics`] core.
//!
//! Per frame, in order: the gallery updates gating and layers, the sensor field is
//! refreshed, the camera frame is extracted, [`systems::advance_generation`] builds
//! the pass uniform, then either the render world dispatches the compute pass or
//! [`systems::step_cpu_backend`] runs the kernel with `rayon` and uploads the result.

/// Resources shared by the simulation systems.
pub mod resources;

/// Generation bookkeeping, rest store sync and the CPU backend.
pub mod systems;

pub use resources::{
    CpuDisplacement, DisplacementSettings, PhysicsCameraFrame, RestStore,
    SensorMotionFieldResource, UpstreamEntitySnapshot,
};
