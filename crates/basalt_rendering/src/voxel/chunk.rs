//! # Streaming Chunk
//!
//! The unit of loading and unloading: one chunk's block array, its two
//! geometry buffers, and the deletion-timer lifecycle the world scheduler
//! drives.
//!
//! Lifecycle: created with terrain and meshes populated synchronously;
//! marked for deletion when it leaves the view radius; a grace timer
//! accumulates while marked; once the timer passes the grace period the
//! chunk latches `deleted` and the world destroys it on its next sweep.
//! Re-entering the view radius before then clears the mark and resets the
//! timer - the system's only cancellation semantic.

use basalt_procedural::{BlockTag, ChunkBlocks, ChunkCoord, TerrainGenerator};

use super::catalog::BlockCatalog;
use super::mesher::{build_meshes, MeshSet};
use super::vertex::Vertex;

/// Everything the renderer needs for one draw call on one chunk.
///
/// The translation is the chunk's world origin, applied by the consumer
/// (typically as a push constant).
#[derive(Clone, Copy, Debug)]
pub struct DrawSubmission<'a> {
    /// Vertex buffer contents.
    pub vertices: &'a [Vertex],
    /// Index buffer contents.
    pub indices: &'a [u32],
    /// Number of indices to draw.
    pub index_count: u32,
    /// World-space translation of the chunk origin.
    pub translation: [i32; 3],
}

/// A loaded chunk: blocks, geometry, and lifecycle state.
pub struct Chunk {
    coord: ChunkCoord,
    blocks: ChunkBlocks,
    meshes: MeshSet,
    marked_for_deletion: bool,
    deleted: bool,
    deletion_timer: f32,
}

impl Chunk {
    /// Generates a chunk at a coordinate: terrain fill, then mesh build,
    /// both synchronous.
    #[must_use]
    pub fn generate(coord: ChunkCoord, terrain: &TerrainGenerator, catalog: &BlockCatalog) -> Self {
        let blocks = terrain.generate(coord);
        let meshes = build_meshes(&blocks, catalog);
        Self {
            coord,
            blocks,
            meshes,
            marked_for_deletion: false,
            deleted: false,
            deletion_timer: 0.0,
        }
    }

    /// The chunk's grid coordinate.
    #[inline]
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Read access to the block array.
    #[inline]
    #[must_use]
    pub const fn blocks(&self) -> &ChunkBlocks {
        &self.blocks
    }

    /// Block at a chunk-local coordinate (air when out of bounds).
    #[inline]
    #[must_use]
    pub fn block(&self, x: i32, y: i32, z: i32) -> BlockTag {
        self.blocks.get(x, y, z)
    }

    /// Mutable access to the block array.
    ///
    /// After editing, call [`Chunk::rebuild_meshes`] - geometry is rebuilt
    /// wholesale, never incrementally.
    #[inline]
    pub fn blocks_mut(&mut self) -> &mut ChunkBlocks {
        &mut self.blocks
    }

    /// Rebuilds both geometry buffers from the current block array.
    pub fn rebuild_meshes(&mut self, catalog: &BlockCatalog) {
        self.meshes = build_meshes(&self.blocks, catalog);
    }

    /// Marks or un-marks the chunk for deletion. Un-marking resets the
    /// grace timer.
    pub fn set_marked_for_deletion(&mut self, state: bool) {
        self.marked_for_deletion = state;
        if !state {
            self.deletion_timer = 0.0;
        }
    }

    /// Returns true while the chunk is outside the view radius.
    #[inline]
    #[must_use]
    pub const fn is_marked_for_deletion(&self) -> bool {
        self.marked_for_deletion
    }

    /// Returns true once the grace period has elapsed; the world destroys
    /// the chunk on its next sweep.
    #[inline]
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted
    }

    /// Seconds accumulated since the chunk was marked.
    #[inline]
    #[must_use]
    pub const fn deletion_timer(&self) -> f32 {
        self.deletion_timer
    }

    /// Advances the deletion timer by the frame's elapsed time.
    ///
    /// Elapsed time is injected rather than read from a clock so tests can
    /// simulate time deterministically.
    pub fn tick(&mut self, dt: f32, grace_period: f32) {
        if self.marked_for_deletion {
            self.deletion_timer += dt;
            if self.deletion_timer >= grace_period {
                self.deleted = true;
            }
        }
    }

    /// Opaque draw submission for this chunk.
    #[must_use]
    pub fn draw_land(&self) -> DrawSubmission<'_> {
        DrawSubmission {
            vertices: &self.meshes.land.vertices,
            indices: &self.meshes.land.indices,
            index_count: self.meshes.land.index_count(),
            translation: self.coord.world_origin(),
        }
    }

    /// Translucent water draw submission for this chunk.
    #[must_use]
    pub fn draw_water(&self) -> DrawSubmission<'_> {
        DrawSubmission {
            vertices: &self.meshes.water.vertices,
            indices: &self.meshes.water.indices,
            index_count: self.meshes.water.index_count(),
            translation: self.coord.world_origin(),
        }
    }

    /// Returns true when the water buffer holds geometry.
    #[must_use]
    pub fn has_water(&self) -> bool {
        !self.meshes.water.is_empty()
    }

    /// Returns true when the land buffer holds geometry.
    #[must_use]
    pub fn has_land(&self) -> bool {
        !self.meshes.land.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basalt_procedural::{TerrainParams, WorldSeed};

    fn catalog() -> BlockCatalog {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/blocks.toml");
        BlockCatalog::try_load(path).unwrap()
    }

    fn test_chunk() -> Chunk {
        let terrain = TerrainGenerator::new(WorldSeed::new(42), TerrainParams::default());
        Chunk::generate(ChunkCoord::new(0, 0), &terrain, &catalog())
    }

    #[test]
    fn test_generated_chunk_has_geometry() {
        let chunk = test_chunk();
        assert!(chunk.has_land());
        assert_eq!(chunk.draw_land().index_count % 6, 0);
        assert_eq!(chunk.draw_water().index_count % 6, 0);
        assert_eq!(chunk.draw_land().translation, [0, 0, 0]);
    }

    #[test]
    fn test_unmarking_resets_the_timer() {
        let mut chunk = test_chunk();

        chunk.set_marked_for_deletion(true);
        chunk.tick(3.0, 10.0);
        assert!(chunk.deletion_timer() > 0.0);
        assert!(!chunk.is_deleted());

        chunk.set_marked_for_deletion(false);
        assert_eq!(chunk.deletion_timer(), 0.0);

        // Unmarked chunks do not age.
        chunk.tick(100.0, 10.0);
        assert!(!chunk.is_deleted());
    }

    #[test]
    fn test_grace_period_elapses_into_deleted() {
        let mut chunk = test_chunk();
        chunk.set_marked_for_deletion(true);

        for _ in 0..10 {
            chunk.tick(1.0, 10.0);
        }
        assert!(chunk.is_deleted());
    }

    #[test]
    fn test_rebuild_after_edit_changes_geometry() {
        let mut chunk = test_chunk();
        let before = chunk.draw_land().index_count;

        // Find a cell whose whole neighborhood is open air.
        let spot = (1..31)
            .flat_map(|x| (1..31).map(move |z| (x, z)))
            .find_map(|(x, z)| {
                (1..127).rev().find_map(|y| {
                    let free = chunk.block(x, y, z).is_air()
                        && chunk.block(x + 1, y, z).is_air()
                        && chunk.block(x - 1, y, z).is_air()
                        && chunk.block(x, y + 1, z).is_air()
                        && chunk.block(x, y - 1, z).is_air()
                        && chunk.block(x, y, z + 1).is_air()
                        && chunk.block(x, y, z - 1).is_air();
                    free.then_some((x, y, z))
                })
            })
            .expect("no open air cell in the chunk");

        chunk.blocks_mut().set(spot.0, spot.1, spot.2, BlockTag::Stone);
        chunk.rebuild_meshes(&catalog());

        let after = chunk.draw_land().index_count;
        assert_eq!(after, before + 36, "a free-floating block adds six faces");
    }
}
