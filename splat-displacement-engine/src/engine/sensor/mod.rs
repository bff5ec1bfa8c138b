//! Sensor motion field ingestion.
//!
//! The depth sensor pipeline (or the pointer stand-in) writes
//! [`crate::engine::simulation::SensorMotionFieldResource`]; [`field::upload_motion_field`]
//! mirrors it into the float texture the compute pass samples.

/// Motion field texture upload.
pub mod field;

/// Pointer-driven stand-in for the depth sensor.
pub mod pointer;
