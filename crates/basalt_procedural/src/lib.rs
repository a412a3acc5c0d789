//! # Basalt Procedural Generation
//!
//! Deterministic world generation for an infinite, reproducible voxel
//! world.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: same seed always produces the same world
//! 2. **Chunked**: the world is generated in fixed-size 32x128x32 chunks
//! 3. **Self-contained**: a chunk never reads its neighbors, so chunks can
//!    be generated and discarded in any order
//!
//! ## Core Components
//!
//! - [`NoiseField`]: seeded 2D fractal simplex noise
//! - [`BlockTag`]: the closed set of world materials
//! - [`ChunkBlocks`]: dense per-chunk block storage
//! - [`TerrainGenerator`]: sea, beaches, soil stacks and trees
//!
//! ## Example
//!
//! ```rust,ignore
//! use basalt_procedural::{ChunkCoord, TerrainGenerator, TerrainParams, WorldSeed};
//!
//! let generator = TerrainGenerator::new(WorldSeed::new(42), TerrainParams::default());
//! let blocks = generator.generate(ChunkCoord::new(0, 0));
//! assert!(!blocks.get(0, 0, 0).is_air());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod block;
pub mod chunk;
pub mod noise;

pub use block::BlockTag;
pub use chunk::{
    ChunkBlocks, ChunkCoord, TerrainGenerator, TerrainParams, CHUNK_DEPTH, CHUNK_HEIGHT,
    CHUNK_VOLUME, CHUNK_WIDTH,
};
pub use noise::{NoiseField, NoiseParams, WorldSeed};
