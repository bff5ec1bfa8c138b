//! Mesh generation for splat rendering primitives.

/// Index mesh that the splat vertex shader expands into quads.
pub mod point_index_mesh;
