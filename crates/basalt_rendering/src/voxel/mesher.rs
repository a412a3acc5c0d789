//! # Face-Culling Mesher
//!
//! Converts a chunk's block array into two disjoint vertex/index sets:
//! opaque land geometry and translucent water geometry.
//!
//! ## Algorithm
//!
//! For every non-air block, for each of the six face directions:
//!
//! 1. Skip the face when the neighbor holds the same block tag - except
//!    for leaves, which stay visible against each other.
//! 2. Otherwise emit the face only when the neighbor is not opaque.
//!    Out-of-bounds neighbors count as non-opaque, so faces are emitted
//!    at chunk edges (chunks never consult their neighbors; the seam
//!    faces are a documented limitation).
//! 3. Emitting looks up the block's per-face atlas cell; a missing entry
//!    is logged and that face skipped, leaving the rest of the block
//!    intact.

use basalt_procedural::{BlockTag, ChunkBlocks, CHUNK_DEPTH, CHUNK_HEIGHT, CHUNK_WIDTH};

use super::catalog::BlockCatalog;
use super::face::FaceDirection;
use super::vertex::{ChunkMesh, Vertex};

/// Unit-square texture coordinates in corner order: corners 0 and 1 are
/// the texture-bottom edge, 2 and 3 the top edge.
const CORNER_UVS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

/// The two geometry buffers produced for one chunk.
#[derive(Clone, Debug, Default)]
pub struct MeshSet {
    /// Opaque geometry (everything except water).
    pub land: ChunkMesh,
    /// Translucent water geometry, drawn in its own pass.
    pub water: ChunkMesh,
}

impl MeshSet {
    /// Returns true when neither buffer holds geometry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.land.is_empty() && self.water.is_empty()
    }
}

/// Builds the land and water meshes for a fully-populated block array.
#[must_use]
pub fn build_meshes(blocks: &ChunkBlocks, catalog: &BlockCatalog) -> MeshSet {
    let mut set = MeshSet::default();
    // One warning per missing (block, face) pair per rebuild, not one per
    // cell - an absent catalog would otherwise flood the log.
    let mut warned = [[false; 6]; 8];

    for z in 0..CHUNK_DEPTH as i32 {
        for y in 0..CHUNK_HEIGHT as i32 {
            for x in 0..CHUNK_WIDTH as i32 {
                let block = blocks.get(x, y, z);
                if block.is_air() {
                    continue;
                }

                for face in FaceDirection::ALL {
                    let o = face.offset();
                    let neighbor = blocks.get(x + o[0], y + o[1], z + o[2]);

                    // Identical neighbors cull each other; leaves are
                    // exempt so canopies keep their internal silhouettes.
                    if !block.is_leaves() && neighbor == block {
                        continue;
                    }
                    // Out-of-bounds neighbors read as air, which is never
                    // opaque, so edge faces are always emitted.
                    if neighbor.is_opaque() {
                        continue;
                    }

                    emit_face(&mut set, catalog, &mut warned, block, face, [x, y, z]);
                }
            }
        }
    }

    set
}

/// Appends one face quad to the matching mesh, or skips it when the
/// catalog has no cell for it.
fn emit_face(
    set: &mut MeshSet,
    catalog: &BlockCatalog,
    warned: &mut [[bool; 6]; 8],
    block: BlockTag,
    face: FaceDirection,
    cell: [i32; 3],
) {
    let Some(uv) = catalog.uv_rect(block, face) else {
        let flag = &mut warned[block.index()][face.index()];
        if !*flag {
            *flag = true;
            tracing::warn!(
                "no atlas cell for {} face {}, skipping",
                block.id(),
                face.key()
            );
        }
        return;
    };

    let normal = face.normal();
    let corners = face.corners();

    let mut quad = [Vertex {
        position: [0.0; 3],
        normal,
        tex_coord: [0.0; 2],
    }; 4];

    for (i, corner) in corners.iter().enumerate() {
        quad[i].position = [
            cell[0] as f32 + corner[0],
            cell[1] as f32 + corner[1],
            cell[2] as f32 + corner[2],
        ];
        quad[i].tex_coord = [
            uv.left + CORNER_UVS[i][0] * (uv.right - uv.left),
            uv.top + CORNER_UVS[i][1] * (uv.bottom - uv.top),
        ];
    }

    let mesh = if block.is_water() {
        &mut set.water
    } else {
        &mut set.land
    };
    mesh.push_quad(quad);
}
