use bevy::prelude::*;
use bevy::{render::mesh::PrimitiveTopology, render::render_asset::RenderAssetUsages};

/// Vertices emitted per splat: two triangles forming a camera-facing quad.
pub const VERTICES_PER_SPLAT: usize = 6;

/// Index mesh for GPU-side splat expansion.
///
/// Vertex `i` stores `i` in `position.x`; the vertex shader recovers the slot as
/// `i / 6` and the quad corner as `i % 6`.
pub fn create_point_index_mesh(splat_count: usize) -> Mesh {
    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );

    let vertex_count = splat_count * VERTICES_PER_SPLAT;
    let indices: Vec<[f32; 3]> = (0..vertex_count).map(|i| [i as f32, 0.0, 0.0]).collect();

    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, indices);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::render::mesh::VertexAttributeValues;

    #[test]
    fn six_vertices_per_splat_with_exact_indices() {
        let mesh = create_point_index_mesh(3);
        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            panic!("position attribute missing");
        };
        assert_eq!(positions.len(), 18);
        assert_eq!(positions[17], [17.0, 0.0, 0.0]);
    }

    #[test]
    fn largest_slot_index_is_exact_in_f32() {
        let last = constants::texture::MAX_SLOTS * VERTICES_PER_SPLAT - 1;
        assert_eq!(last as f32 as usize, last);
    }
}
