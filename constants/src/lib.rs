//! Constants shared by the pre-processing CLI and the displacement engine.

pub mod coordinate_system;
pub mod gallery;
pub mod physics;
pub mod render_settings;
pub mod sensor;
pub mod texture;
