//! Render-time sampling of displaced splats.
//!
//! Each gallery layer draws through [`splat_material::SplatMaterial`], which reads the
//! rest texel and the current offset texel of every slot in the vertex shader.

/// Splat point material and its per-layer uniform.
pub mod splat_material;

/// Per-frame material binding of rest texture, offset generation and fade.
pub mod layer_binding;
