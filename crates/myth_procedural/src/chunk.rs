//! # Chunk System
//!
//! The ground is an infinite grid of square cells. Each cell's mesh is a
//! single quad whose corner heights and tint are a pure function of the
//! cell coordinate and a salt, so chunks are regenerated on demand and
//! never stored.
//!
//! ## Chunk Format
//!
//! 4 vertices, 6 indices (two triangles). The quad covers
//! `[x * S, (x + 1) * S] × [z * S, (z + 1) * S]` in world space, where `S`
//! is the chunk size.

use myth_shared::{Vec2, Vec3, Vertex};

/// Default chunk edge length in world units.
pub const DEFAULT_CHUNK_SIZE: f32 = 10.0;

/// Triangle list for a chunk quad.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// Hash channel for the base height.
const CHANNEL_HEIGHT: i32 = 0;
/// Hash channels for the tint (r, g, b).
const CHANNEL_TINT: [i32; 3] = [1, 2, 3];
/// Hash channel for per-corner height jitter.
const CHANNEL_CORNER: i32 = 10;

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not world units).
    pub x: i32,
    /// Z coordinate (in chunks, not world units).
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Cell containing the world position `(x, z)` for chunks of `chunk_size`.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_world_pos(x: f32, z: f32, chunk_size: f32) -> Self {
        Self {
            x: (x / chunk_size).floor() as i32,
            z: (z / chunk_size).floor() as i32,
        }
    }

    /// Chebyshev (king-move) distance between two cells.
    #[inline]
    #[must_use]
    pub fn chebyshev(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).max(self.z.abs_diff(other.z))
    }

    /// World position of the cell's minimum corner.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn world_origin(self, chunk_size: f32) -> (f32, f32) {
        (self.x as f32 * chunk_size, self.z as f32 * chunk_size)
    }
}

impl std::fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Integer lattice hash mapped to `[-1, 1]`.
///
/// All arithmetic wraps at 32 bits, so results are identical on every
/// platform. `salt` selects an independent world.
#[inline]
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn chunk_random(x: i32, z: i32, channel: i32, salt: i32) -> f32 {
    let mut n = x
        .wrapping_add(z.wrapping_mul(57))
        .wrapping_add(channel.wrapping_mul(131))
        .wrapping_add(salt.wrapping_mul(7919));
    n = (n << 13) ^ n;
    let h = n
        .wrapping_mul(n.wrapping_mul(n).wrapping_mul(15731).wrapping_add(789_221))
        .wrapping_add(1_376_312_589)
        & 0x7fff_ffff;
    1.0 - h as f32 / 1_073_741_824.0
}

/// A generated terrain cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    /// Cell this chunk covers.
    pub coord: ChunkCoord,
    /// Quad corners: (x0,z0), (x1,z0), (x1,z1), (x0,z1).
    pub vertices: [Vertex; 4],
    /// Triangle list into `vertices`.
    pub indices: [u32; 6],
}

impl Chunk {
    /// Mean corner height.
    #[must_use]
    pub fn average_height(&self) -> f32 {
        self.vertices.iter().map(|v| v.position[1]).sum::<f32>() / 4.0
    }
}

/// Generates the chunk at `coord`. Pure: same inputs, same bytes.
#[must_use]
pub fn generate_chunk(coord: ChunkCoord, chunk_size: f32, salt: i32) -> Chunk {
    let ChunkCoord { x, z } = coord;
    let r = |cx: i32, cz: i32, channel: i32| chunk_random(cx, cz, channel, salt);

    let base = r(x, z, CHANNEL_HEIGHT) * 0.3;
    let color = Vec3::new(
        0.12 + r(x, z, CHANNEL_TINT[0]) * 0.08,
        0.10 + r(x, z, CHANNEL_TINT[1]) * 0.06,
        0.08 + r(x, z, CHANNEL_TINT[2]) * 0.04,
    );

    // Corner jitter is keyed by the corner's lattice point, so it is
    // shared with the neighbour that touches the same corner.
    let h00 = base + r(x, z, CHANNEL_CORNER) * 0.1;
    let h10 = base + r(x.wrapping_add(1), z, CHANNEL_CORNER) * 0.1;
    let h01 = base + r(x, z.wrapping_add(1), CHANNEL_CORNER) * 0.1;
    let h11 = base + r(x.wrapping_add(1), z.wrapping_add(1), CHANNEL_CORNER) * 0.1;

    let (x0, z0) = coord.world_origin(chunk_size);
    let (x1, z1) = (x0 + chunk_size, z0 + chunk_size);

    let p0 = Vec3::new(x0, h00, z0);
    let p1 = Vec3::new(x1, h10, z0);
    let p2 = Vec3::new(x1, h11, z1);
    let p3 = Vec3::new(x0, h01, z1);
    let normal = (p3 - p0).cross(p1 - p0).normalize_or_zero();

    Chunk {
        coord,
        vertices: [
            Vertex::new(p0, color, Vec2::new(0.0, 0.0), normal),
            Vertex::new(p1, color, Vec2::new(1.0, 0.0), normal),
            Vertex::new(p2, color, Vec2::new(1.0, 1.0), normal),
            Vertex::new(p3, color, Vec2::new(0.0, 1.0), normal),
        ],
        indices: QUAD_INDICES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_random_range_and_determinism() {
        for x in -50..50 {
            for z in -50..50 {
                let a = chunk_random(x, z, 0, 0);
                assert!((-1.0..=1.0).contains(&a), "out of range: {a}");
                assert_eq!(a.to_bits(), chunk_random(x, z, 0, 0).to_bits());
            }
        }
    }

    #[test]
    fn test_chunk_random_extreme_coords_do_not_panic() {
        let _ = chunk_random(i32::MAX, i32::MIN, i32::MAX, i32::MIN);
        let _ = generate_chunk(ChunkCoord::new(i32::MAX, i32::MAX), 10.0, 1);
    }

    #[test]
    fn test_salt_changes_the_world() {
        let differs = (0..16).any(|x| chunk_random(x, 0, 0, 0) != chunk_random(x, 0, 0, 1));
        assert!(differs);
    }

    #[test]
    fn test_generate_is_deterministic() {
        let coord = ChunkCoord::new(-3, 7);
        let a = generate_chunk(coord, DEFAULT_CHUNK_SIZE, 0);
        let b = generate_chunk(coord, DEFAULT_CHUNK_SIZE, 0);
        assert_eq!(
            bytemuck::cast_slice::<Vertex, u8>(&a.vertices),
            bytemuck::cast_slice::<Vertex, u8>(&b.vertices)
        );
    }

    #[test]
    fn test_quad_covers_its_cell() {
        let c = generate_chunk(ChunkCoord::new(2, -1), 10.0, 0);
        assert_eq!(c.vertices[0].position[0], 20.0);
        assert_eq!(c.vertices[0].position[2], -10.0);
        assert_eq!(c.vertices[2].position[0], 30.0);
        assert_eq!(c.vertices[2].position[2], 0.0);
        assert_eq!(c.indices, QUAD_INDICES);
        assert_eq!(c.vertices[3].uv, [0.0, 1.0]);
    }

    #[test]
    fn test_heights_and_tint_in_band() {
        for x in -10..10 {
            for z in -10..10 {
                let c = generate_chunk(ChunkCoord::new(x, z), 10.0, 0);
                for v in &c.vertices {
                    assert!(v.position[1].abs() <= 0.4 + 1e-6);
                    assert!((0.039..=0.201).contains(&v.color[0]));
                    assert!(v.normal[1] > 0.9, "terrain normal should face up");
                }
            }
        }
    }

    #[test]
    fn test_neighbours_share_corner_jitter_key() {
        // Same lattice point, same jitter; only the base height differs.
        let a = generate_chunk(ChunkCoord::new(0, 0), 10.0, 0);
        let b = generate_chunk(ChunkCoord::new(1, 0), 10.0, 0);
        let base_a = chunk_random(0, 0, CHANNEL_HEIGHT, 0) * 0.3;
        let base_b = chunk_random(1, 0, CHANNEL_HEIGHT, 0) * 0.3;
        let jitter_a = a.vertices[1].position[1] - base_a;
        let jitter_b = b.vertices[0].position[1] - base_b;
        assert!((jitter_a - jitter_b).abs() < 1e-6);
    }

    #[test]
    fn test_from_world_pos_floors_negatives() {
        assert_eq!(ChunkCoord::from_world_pos(-0.5, 9.99, 10.0), ChunkCoord::new(-1, 0));
        assert_eq!(ChunkCoord::from_world_pos(10.0, -10.0, 10.0), ChunkCoord::new(1, -1));
        assert_eq!(ChunkCoord::new(0, 0).chebyshev(ChunkCoord::new(-3, 2)), 3);
    }
}
