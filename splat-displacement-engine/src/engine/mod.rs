//! Bevy application around the displacement core.
//!
//! Loading builds the installation config, the gallery and the slot textures;
//! at runtime the simulation systems feed one kernel pass per frame (GPU compute
//! or CPU `rayon`) and the splat material samples the resulting offsets.

/// Gallery manifest asset and the slot-addressed displacement textures.
pub mod assets;

/// Gallery camera and camera frame extraction.
pub mod camera;

/// GPU compute backend of the kernel.
pub mod compute;

/// Installation configuration asset and validation.
pub mod config;

/// App construction, state machine and window.
pub mod core;

/// Scene rotation, cross-fade and camera framing.
pub mod gallery;

/// Staged asset loading.
pub mod loading;

/// Index mesh expanded into splat quads.
pub mod mesh;

/// Splat material and per-frame binding.
pub mod render;

/// Motion field upload and the pointer stand-in.
pub mod sensor;

/// Simulation resources, generation bookkeeping and the CPU backend.
pub mod simulation;

/// Diagnostics.
pub mod systems;
