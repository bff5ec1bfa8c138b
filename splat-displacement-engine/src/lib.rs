//! Persistent per-splat displacement driven by a sensor motion field.
//!
//! [`physics`] is the engine-independent core; [`engine`] wires it into Bevy.

pub mod engine;
pub mod physics;
