//! # MYTH Procedural Generation
//!
//! Deterministic terrain streamed around a moving observer.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: a chunk is a pure function of its coordinate and salt
//! 2. **Chunked**: the ground is an infinite grid of square cells
//! 3. **Streamable**: cells load and evict independently as the observer moves
//!
//! ## Core Components
//!
//! - [`generate_chunk`]: builds one terrain quad from the lattice hash
//! - [`ChunkStreamer`]: keeps the window loaded and reports changes
//! - [`TerrainMesh`]: flat vertex/index buffers for upload
//! - [`StaticMeshes`]: prop meshes referenced by entity renderables
//!
//! ## Example
//!
//! ```rust,ignore
//! use myth_procedural::{ChunkStreamer, StreamerConfig, TerrainMesh};
//!
//! let mut streamer = ChunkStreamer::new(StreamerConfig::default());
//! let mut terrain = TerrainMesh::new();
//!
//! streamer.update(player_position);
//! if streamer.is_dirty() {
//!     streamer.build_mesh_into(&mut terrain);
//!     streamer.clear_dirty();
//! }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod chunk;
pub mod mesh;
pub mod streamer;

pub use chunk::{chunk_random, generate_chunk, Chunk, ChunkCoord, DEFAULT_CHUNK_SIZE};
pub use mesh::{MeshRange, StaticMeshes, TerrainMesh};
pub use streamer::{ChunkStreamer, StreamerConfig, StreamerStats, MAX_LOAD_RADIUS};
