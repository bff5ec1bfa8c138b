//! Persistent per-splat displacement physics.
//!
//! Everything in this module is plain data and arithmetic with no ECS access, so
//! the same code drives the CPU backend, builds the GPU uniforms and runs in tests.
//!
//! Frame flow:
//! 1. [`identity::RestStateStore`] receives the entity snapshot (any order).
//! 2. [`camera_frame::CameraFrame`] carries the viewer basis and the fixed sensor projection.
//! 3. [`kernel::update_slot`] integrates one slot from the previous generation.
//! 4. [`double_buffer::DisplacementState`] owns both generations and swaps them.
//! 5. [`sampler`] reads the most recent generation by stable id.

/// Error types for the fallible data edges (texture bytes, field dimensions).
pub mod error;

/// Stable identities and the slot-addressed rest position store.
pub mod identity;

/// Viewer basis extraction and the orthographic sensor projection.
pub mod camera_frame;

/// Dense 2D flow + depth field with bilinear sampling.
pub mod motion_field;

/// Kernel tunables and the return model.
pub mod params;

/// Per-slot spring-damper update.
pub mod kernel;

/// Two offset/velocity generations with read/write swapping.
pub mod double_buffer;

/// Render-time lookup of displaced positions and tint.
pub mod sampler;

pub use camera_frame::{AxisMapping, CameraFrame, SensorProjection, ViewerBasis};
pub use double_buffer::DisplacementState;
pub use identity::{RestStateStore, RestTexel, SnapshotReport, StableId};
pub use kernel::{FrameInputs, SlotState, update_slot};
pub use motion_field::{FlowSample, SensorMotionField};
pub use params::{DisplacementParams, ReturnModel};
