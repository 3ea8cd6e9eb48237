//! # Chunk Streamer
//!
//! Keeps a square window of chunks loaded around a moving observer.
//!
//! ## Window
//!
//! With observer cell `c` and load radius `R`:
//! - every cell within Chebyshev distance `R` of `c` is loaded,
//! - a loaded cell is evicted only once it is farther than `R + 1`.
//!
//! The one-ring gap stops chunks from thrashing when the observer walks
//! back and forth across a cell border.
//!
//! ## Dirty Flag
//!
//! Any load or eviction marks the streamer dirty. The caller rebuilds its
//! terrain buffer with [`ChunkStreamer::build_mesh_into`] and then calls
//! [`ChunkStreamer::clear_dirty`]; the streamer never clears it itself.

use std::collections::HashMap;

use myth_shared::Vec3;
use tracing::{debug, info};

use crate::chunk::{generate_chunk, Chunk, ChunkCoord, DEFAULT_CHUNK_SIZE};
use crate::mesh::TerrainMesh;

/// Largest supported load radius: a full window is `513^2` chunks.
pub const MAX_LOAD_RADIUS: u32 = 256;

/// Streaming window parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StreamerConfig {
    /// Chunk edge length in world units. Must be positive.
    pub chunk_size: f32,
    /// Chebyshev radius of the loaded window, in chunks. At most [`MAX_LOAD_RADIUS`].
    pub load_radius: u32,
    /// World salt fed to chunk generation.
    pub salt: i32,
}

impl Default for StreamerConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            load_radius: 5,
            salt: 0,
        }
    }
}

impl StreamerConfig {
    /// Chunks in a full window: `(2R + 1)^2`.
    #[must_use]
    pub const fn window_chunks(&self) -> usize {
        let side = 2 * self.load_radius as usize + 1;
        side * side
    }
}

/// Streaming statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StreamerStats {
    /// Chunks currently loaded.
    pub loaded: usize,
    /// Chunks generated since creation.
    pub generated_total: u64,
    /// Chunks evicted since creation.
    pub evicted_total: u64,
    /// Observer cell at the last update.
    pub observer_cell: Option<ChunkCoord>,
}

/// Loads and evicts terrain chunks around an observer.
///
/// # Example
///
/// ```rust,ignore
/// let mut streamer = ChunkStreamer::new(StreamerConfig::default());
/// streamer.update(player_position);
/// if streamer.is_dirty() {
///     streamer.build_mesh_into(&mut terrain);
///     streamer.clear_dirty();
/// }
/// ```
#[derive(Debug)]
pub struct ChunkStreamer {
    config: StreamerConfig,
    chunks: HashMap<ChunkCoord, Chunk>,
    dirty: bool,
    stats: StreamerStats,
}

impl ChunkStreamer {
    /// Creates an empty streamer. Nothing loads until the first update.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_size` is not a positive finite number or
    /// `load_radius` exceeds [`MAX_LOAD_RADIUS`].
    #[must_use]
    pub fn new(config: StreamerConfig) -> Self {
        assert!(
            config.chunk_size.is_finite() && config.chunk_size > 0.0,
            "chunk size must be positive"
        );
        assert!(
            config.load_radius <= MAX_LOAD_RADIUS,
            "load radius {} exceeds {MAX_LOAD_RADIUS}",
            config.load_radius
        );

        info!(
            chunk_size = config.chunk_size,
            load_radius = config.load_radius,
            salt = config.salt,
            "ChunkStreamer created"
        );

        Self {
            config,
            chunks: HashMap::with_capacity(config.window_chunks()),
            dirty: false,
            stats: StreamerStats::default(),
        }
    }

    /// Streaming parameters.
    #[must_use]
    pub const fn config(&self) -> &StreamerConfig {
        &self.config
    }

    /// Cell containing `position`.
    #[must_use]
    pub fn cell_of(&self, position: Vec3) -> ChunkCoord {
        ChunkCoord::from_world_pos(position.x, position.z, self.config.chunk_size)
    }

    /// Moves the window to `position`. Returns whether the loaded set changed.
    pub fn update(&mut self, position: Vec3) -> bool {
        let center = self.cell_of(position);
        #[allow(clippy::cast_possible_wrap)]
        let radius = self.config.load_radius as i32;

        let mut generated = 0u64;
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                let coord = ChunkCoord::new(center.x.wrapping_add(dx), center.z.wrapping_add(dz));
                if !self.chunks.contains_key(&coord) {
                    let chunk = generate_chunk(coord, self.config.chunk_size, self.config.salt);
                    self.chunks.insert(coord, chunk);
                    generated += 1;
                }
            }
        }

        let keep = self.config.load_radius + 1;
        let before = self.chunks.len();
        self.chunks.retain(|coord, _| coord.chebyshev(center) <= keep);
        let evicted = (before - self.chunks.len()) as u64;

        self.stats.generated_total += generated;
        self.stats.evicted_total += evicted;
        self.stats.loaded = self.chunks.len();
        self.stats.observer_cell = Some(center);

        let changed = generated > 0 || evicted > 0;
        if changed {
            self.dirty = true;
            debug!(
                cell = %center,
                generated,
                evicted,
                loaded = self.chunks.len(),
                "Chunk window moved"
            );
        }
        changed
    }

    /// Concatenates every loaded chunk into a new mesh.
    #[must_use]
    pub fn build_mesh(&self) -> TerrainMesh {
        let mut mesh = TerrainMesh::new();
        self.build_mesh_into(&mut mesh);
        mesh
    }

    /// Rebuilds `mesh` in place from every loaded chunk, reusing its buffers.
    ///
    /// Chunks are emitted in ascending `(z, x)` order.
    pub fn build_mesh_into(&self, mesh: &mut TerrainMesh) {
        mesh.clear();
        mesh.vertices.reserve(self.chunks.len() * 4);
        mesh.indices.reserve(self.chunks.len() * 6);
        for coord in self.loaded_coords() {
            let chunk = &self.chunks[&coord];
            mesh.append(&chunk.vertices, &chunk.indices);
        }
    }

    /// Whether the loaded set changed since the last [`clear_dirty`](Self::clear_dirty).
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Acknowledges the current loaded set.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Marks the streamer dirty without changing the loaded set.
    pub fn force_rebuild(&mut self) {
        self.dirty = true;
    }

    /// Number of loaded chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether no chunk is loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Whether `coord` is loaded.
    #[must_use]
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Loaded chunk at `coord`.
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Loaded coordinates in ascending `(z, x)` order.
    #[must_use]
    pub fn loaded_coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<ChunkCoord> = self.chunks.keys().copied().collect();
        coords.sort_unstable_by_key(|c| (c.z, c.x));
        coords
    }

    /// Streaming statistics.
    #[must_use]
    pub const fn stats(&self) -> &StreamerStats {
        &self.stats
    }
}
