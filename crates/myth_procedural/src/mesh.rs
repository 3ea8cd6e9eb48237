//! # Mesh Buffers
//!
//! Flat vertex/index buffers handed to the renderer: the streamed terrain
//! and the static prop meshes (landmark cube, player body) that entities
//! reference through [`Renderable`] ranges.

use myth_core::{MeshId, Renderable};
use myth_shared::{Vec2, Vec3, Vertex};

/// One flat vertex buffer plus one `u32` index buffer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TerrainMesh {
    /// Vertices of every loaded chunk.
    pub vertices: Vec<Vertex>,
    /// Triangle list, already rebased into `vertices`.
    pub indices: Vec<u32>,
}

impl TerrainMesh {
    /// Creates an empty mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties both buffers, keeping their allocations.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Whether there is nothing to draw.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Number of indices to draw.
    #[must_use]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Appends `vertices` and `indices`, rebasing indices past the vertices
    /// already present.
    ///
    /// # Panics
    ///
    /// Panics if the vertex count no longer fits a `u32` index.
    pub fn append(&mut self, vertices: &[Vertex], indices: &[u32]) {
        let base = u32::try_from(self.vertices.len()).unwrap_or_else(|_| {
            panic!("mesh exceeds u32 index range ({} vertices)", self.vertices.len())
        });
        self.vertices.extend_from_slice(vertices);
        self.indices.extend(indices.iter().map(|&i| base + i));
    }

    /// Vertex buffer as raw bytes for upload.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index buffer as raw bytes for upload.
    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Where one mesh lives inside [`StaticMeshes`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeshRange {
    /// First index.
    pub index_start: u32,
    /// Number of indices.
    pub index_count: u32,
    /// Added to each index.
    pub vertex_offset: i32,
}

/// Prop meshes packed into one shared buffer, addressed by [`MeshId`].
#[derive(Clone, Debug)]
pub struct StaticMeshes {
    /// Packed geometry.
    pub buffer: TerrainMesh,
    ranges: [MeshRange; 2],
}

impl StaticMeshes {
    /// Builds the unit cube and the player body into one buffer.
    ///
    /// Indices stay local to each mesh; the range's `vertex_offset` rebases them.
    #[must_use]
    pub fn build() -> Self {
        let mut buffer = TerrainMesh::new();
        let mut ranges = [MeshRange::default(); 2];

        for (mesh, vertices) in [
            (MeshId::Cube, cube_vertices(1.0)),
            (MeshId::Player, player_vertices(0.6, 1.8)),
        ] {
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let range = MeshRange {
                index_start: buffer.indices.len() as u32,
                index_count: BOX_INDICES.len() as u32,
                vertex_offset: buffer.vertices.len() as i32,
            };
            buffer.vertices.extend_from_slice(&vertices);
            buffer.indices.extend_from_slice(&BOX_INDICES);
            ranges[mesh as usize] = range;
        }

        Self { buffer, ranges }
    }

    /// Range of `mesh` in the shared buffer.
    #[must_use]
    pub fn range(&self, mesh: MeshId) -> MeshRange {
        self.ranges[mesh as usize]
    }

    /// Visible renderable drawing `mesh`.
    #[must_use]
    pub fn renderable(&self, mesh: MeshId) -> Renderable {
        let range = self.range(mesh);
        Renderable {
            mesh_id: mesh as u32,
            index_start: range.index_start,
            index_count: range.index_count,
            vertex_offset: range.vertex_offset,
            visible: true,
        }
    }
}

/// Two triangles per face, six faces of four vertices.
const BOX_INDICES: [u32; 36] = {
    let mut out = [0u32; 36];
    let mut face = 0;
    while face < 6 {
        let b = face as u32 * 4;
        let i = face * 6;
        out[i] = b;
        out[i + 1] = b + 1;
        out[i + 2] = b + 2;
        out[i + 3] = b;
        out[i + 4] = b + 2;
        out[i + 5] = b + 3;
        face += 1;
    }
    out
};

/// UVs of each face's four corners.
const FACE_UVS: [Vec2; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(0.0, 1.0),
];

fn face(corners: [Vec3; 4], colors: [Vec3; 4], normal: Vec3) -> [Vertex; 4] {
    std::array::from_fn(|i| Vertex::new(corners[i], colors[i], FACE_UVS[i], normal))
}

/// Centered cube of edge `size`, one flat color per face.
fn cube_vertices(size: f32) -> Vec<Vertex> {
    let s = size / 2.0;
    let v = Vec3::new;
    let faces = [
        ([v(-s, -s, s), v(s, -s, s), v(s, s, s), v(-s, s, s)], v(0.8, 0.2, 0.2), Vec3::Z),
        ([v(s, -s, -s), v(-s, -s, -s), v(-s, s, -s), v(s, s, -s)], v(0.2, 0.8, 0.2), -Vec3::Z),
        ([v(-s, s, s), v(s, s, s), v(s, s, -s), v(-s, s, -s)], v(0.2, 0.2, 0.8), Vec3::Y),
        ([v(-s, -s, -s), v(s, -s, -s), v(s, -s, s), v(-s, -s, s)], v(0.8, 0.8, 0.2), -Vec3::Y),
        ([v(s, -s, s), v(s, -s, -s), v(s, s, -s), v(s, s, s)], v(0.2, 0.8, 0.8), Vec3::X),
        ([v(-s, -s, -s), v(-s, -s, s), v(-s, s, s), v(-s, s, -s)], v(0.8, 0.2, 0.8), -Vec3::X),
    ];
    faces
        .into_iter()
        .flat_map(|(corners, color, normal)| face(corners, [color; 4], normal))
        .collect()
}

/// Box of footprint `width` and height `height` standing on `y = 0`,
/// body-colored at the feet and head-colored at the top.
fn player_vertices(width: f32, height: f32) -> Vec<Vertex> {
    let w = width / 2.0;
    let h = height;
    let v = Vec3::new;
    let body = v(0.9, 0.7, 0.3);
    let head = v(0.95, 0.8, 0.6);
    let side = [body, body, head, head];
    let faces = [
        ([v(-w, 0.0, w), v(w, 0.0, w), v(w, h, w), v(-w, h, w)], side, Vec3::Z),
        ([v(w, 0.0, -w), v(-w, 0.0, -w), v(-w, h, -w), v(w, h, -w)], side, -Vec3::Z),
        ([v(-w, h, w), v(w, h, w), v(w, h, -w), v(-w, h, -w)], [head; 4], Vec3::Y),
        ([v(-w, 0.0, -w), v(w, 0.0, -w), v(w, 0.0, w), v(-w, 0.0, w)], [body; 4], -Vec3::Y),
        ([v(w, 0.0, w), v(w, 0.0, -w), v(w, h, -w), v(w, h, w)], side, Vec3::X),
        ([v(-w, 0.0, -w), v(-w, 0.0, w), v(-w, h, w), v(-w, h, -w)], side, -Vec3::X),
    ];
    faces
        .into_iter()
        .flat_map(|(corners, colors, normal)| face(corners, colors, normal))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_rebases_indices() {
        let mut mesh = TerrainMesh::new();
        let quad = [Vertex::default(); 4];
        mesh.append(&quad, &[0, 1, 2, 0, 2, 3]);
        mesh.append(&quad, &[0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(&mesh.indices[6..], &[4, 5, 6, 4, 6, 7]);
        assert_eq!(mesh.vertex_bytes().len(), 8 * 44);
        assert_eq!(mesh.index_bytes().len(), 12 * 4);

        mesh.clear();
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_box_indices_pattern() {
        assert_eq!(&BOX_INDICES[..6], &[0, 1, 2, 0, 2, 3]);
        assert_eq!(&BOX_INDICES[30..], &[20, 21, 22, 20, 22, 23]);
    }

    #[test]
    fn test_static_mesh_ranges() {
        let meshes = StaticMeshes::build();
        let cube = meshes.range(MeshId::Cube);
        let player = meshes.range(MeshId::Player);

        assert_eq!(cube, MeshRange { index_start: 0, index_count: 36, vertex_offset: 0 });
        assert_eq!(player, MeshRange { index_start: 36, index_count: 36, vertex_offset: 24 });
        assert_eq!(meshes.buffer.vertices.len(), 48);

        let r = meshes.renderable(MeshId::Player);
        assert_eq!(r.mesh_id, 1);
        assert_eq!(r.index_start, 36);
        assert!(r.visible);
    }

    #[test]
    fn test_player_box_stands_on_ground() {
        let min_y = player_vertices(0.6, 1.8)
            .iter()
            .map(|v| v.position[1])
            .fold(f32::INFINITY, f32::min);
        assert_eq!(min_y, 0.0);
    }
}
