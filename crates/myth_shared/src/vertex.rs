//! Vertex record handed to the renderer.
//!
//! Layout is fixed (`repr(C)`, 44 bytes) so a `&[Vertex]` can be uploaded
//! with `bytemuck::cast_slice` without repacking.

use bytemuck::{Pod, Zeroable};

use crate::math::{Vec2, Vec3};

/// One vertex of a terrain or prop mesh.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Object/world space position.
    pub position: [f32; 3],
    /// Linear RGB color.
    pub color: [f32; 3],
    /// Texture coordinate.
    pub uv: [f32; 2],
    /// Unit surface normal.
    pub normal: [f32; 3],
}

impl Vertex {
    /// Creates a vertex from math types.
    #[inline]
    #[must_use]
    pub const fn new(position: Vec3, color: Vec3, uv: Vec2, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
            uv: uv.to_array(),
            normal: normal.to_array(),
        }
    }

    /// Position as a vector.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<Vertex>(), 44);
        let verts = [Vertex::default(); 3];
        let bytes: &[u8] = bytemuck::cast_slice(&verts);
        assert_eq!(bytes.len(), 132);
    }
}
