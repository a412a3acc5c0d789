//! Voxel geometry and world streaming.
//!
//! This module turns generated block data into face-culled triangle
//! geometry and keeps a window of chunks alive around the observer.

mod catalog;
mod chunk;
mod face;
mod mesher;
mod vertex;
mod world;

pub use catalog::{AtlasCell, AtlasGrid, BlockCatalog, CatalogError, UvRect};
pub use chunk::{Chunk, DrawSubmission};
pub use face::FaceDirection;
pub use mesher::{build_meshes, MeshSet};
pub use vertex::{ChunkMesh, Vertex};
pub use world::{VoxelWorld, WorldConfig, WorldStats};
