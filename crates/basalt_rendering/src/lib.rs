//! # Basalt Rendering
//!
//! Chunk geometry and streaming for the Basalt voxel world.
//!
//! ## Architecture
//!
//! ```text
//! observer position ─▶ VoxelWorld ─▶ TerrainGenerator (basalt_procedural)
//!                          │                 │
//!                          │                 ▼
//!                          │           ChunkBlocks
//!                          │                 │
//!                          ▼                 ▼
//!                     lifecycle ◀──── face-culling mesher ──▶ land / water
//!                    (grace timer)                            vertex+index
//! ```
//!
//! The graphics backend is an external collaborator: this crate hands it
//! vertex/index buffers, per-chunk translations and the vertex layout
//! ([`Vertex::desc`]), and nothing else. Everything runs synchronously on
//! the frame-driving thread; there is no locking because there is no
//! cross-thread access.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod voxel;

pub use voxel::{
    build_meshes, AtlasCell, AtlasGrid, BlockCatalog, CatalogError, Chunk, ChunkMesh,
    DrawSubmission, FaceDirection, MeshSet, UvRect, Vertex, VoxelWorld, WorldConfig, WorldStats,
};
