//! Render viewpoint and the per-frame camera frame handed to the kernel.

/// Gallery camera marker, spawn helper and FOV lookup.
pub mod gallery_camera;

/// Viewer basis extraction into [`crate::engine::simulation::PhysicsCameraFrame`].
pub mod frame_extraction;
