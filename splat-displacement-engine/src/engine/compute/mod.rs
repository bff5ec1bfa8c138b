//! GPU backend of the displacement kernel.
//!
//! One compute pass per frame maps every slot of the rest texture to a new
//! offset/velocity texel. The pass reads generation `g % 2` and writes
//! `(g + 1) % 2`, so read and write textures never alias.
//!
//! **Input textures:**
//! - rest positions `(x, y, z, valid)` of the physics-active scene
//! - previous offsets and velocities
//! - sensor motion field `(flowX, flowY, depth, 1)`
//!
//! **Output:**
//! - next offsets and velocities (write-only storage textures)

/// Displacement compute pipeline, per-pass uniform and the render-world dispatch.
pub mod displacement_compute;
