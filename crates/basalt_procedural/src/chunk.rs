//! # Chunk Storage & Terrain Generation
//!
//! The world is an infinite 2D grid of fixed-size 3D chunks. This module
//! owns the dense block storage for one chunk and the deterministic
//! terrain fill that populates it.
//!
//! ## Storage Format
//!
//! Chunks are 32x128x32 blocks (width x height x depth), one byte per
//! cell, linearized as `x + y*WIDTH + z*WIDTH*HEIGHT`.
//!
//! ## Generation
//!
//! Two passes, both pure functions of (seed, chunk coordinate):
//! terrain columns first (sea, beach, soil stack), then tree placement.
//! Chunks never read their neighbors, so generation order is irrelevant.

use ndshape::{ConstShape, ConstShape3u32};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use crate::block::BlockTag;
use crate::noise::{NoiseField, NoiseParams, WorldSeed};

/// Chunk width in blocks (X axis).
pub const CHUNK_WIDTH: usize = 32;

/// Chunk height in blocks (Y axis).
pub const CHUNK_HEIGHT: usize = 128;

/// Chunk depth in blocks (Z axis).
pub const CHUNK_DEPTH: usize = 32;

/// Total blocks per chunk.
pub const CHUNK_VOLUME: usize = CHUNK_WIDTH * CHUNK_HEIGHT * CHUNK_DEPTH;

/// Linearization shape: index = x + WIDTH*y + WIDTH*HEIGHT*z.
type ChunkShape = ConstShape3u32<{ CHUNK_WIDTH as u32 }, { CHUNK_HEIGHT as u32 }, { CHUNK_DEPTH as u32 }>;

/// Chunk coordinate on the infinite world grid.
///
/// Identifies a chunk by value; the world map is keyed by this.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not blocks).
    pub x: i32,
    /// Z coordinate (in chunks, not blocks).
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Converts world block coordinates to the containing chunk.
    ///
    /// Floored division, so negative world positions land in the correct
    /// chunk.
    #[inline]
    #[must_use]
    pub const fn from_world_pos(world_x: i32, world_z: i32) -> Self {
        Self {
            x: world_x.div_euclid(CHUNK_WIDTH as i32),
            z: world_z.div_euclid(CHUNK_DEPTH as i32),
        }
    }

    /// World X coordinate of the chunk's origin corner.
    #[inline]
    #[must_use]
    pub const fn world_x(self) -> i32 {
        self.x * CHUNK_WIDTH as i32
    }

    /// World Z coordinate of the chunk's origin corner.
    #[inline]
    #[must_use]
    pub const fn world_z(self) -> i32 {
        self.z * CHUNK_DEPTH as i32
    }

    /// World-space origin of this chunk. Y is always zero: the world is
    /// column-based, chunks are not stacked vertically.
    #[inline]
    #[must_use]
    pub const fn world_origin(self) -> [i32; 3] {
        [self.world_x(), 0, self.world_z()]
    }
}

/// Dense block storage for one chunk.
///
/// Reads outside `[0,WIDTH) x [0,HEIGHT) x [0,DEPTH)` return
/// [`BlockTag::Air`]; writes outside are ignored. Neither ever panics.
#[derive(Clone)]
pub struct ChunkBlocks {
    blocks: Box<[BlockTag; CHUNK_VOLUME]>,
}

impl Default for ChunkBlocks {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkBlocks {
    /// Creates an all-air chunk.
    ///
    /// Allocates; call during chunk creation, not per frame.
    #[must_use]
    pub fn new() -> Self {
        Self {
            blocks: Box::new([BlockTag::Air; CHUNK_VOLUME]),
        }
    }

    /// Returns true when the coordinate lies inside the chunk.
    #[inline]
    #[must_use]
    pub const fn in_bounds(x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && x < CHUNK_WIDTH as i32
            && y >= 0
            && y < CHUNK_HEIGHT as i32
            && z >= 0
            && z < CHUNK_DEPTH as i32
    }

    /// Linear index for an in-bounds coordinate.
    #[inline]
    fn index(x: i32, y: i32, z: i32) -> usize {
        ChunkShape::linearize([x as u32, y as u32, z as u32]) as usize
    }

    /// Gets the block at a local coordinate, or `Air` when out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, x: i32, y: i32, z: i32) -> BlockTag {
        if Self::in_bounds(x, y, z) {
            self.blocks[Self::index(x, y, z)]
        } else {
            BlockTag::Air
        }
    }

    /// Sets the block at a local coordinate. Out-of-bounds writes are
    /// ignored.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, z: i32, tag: BlockTag) {
        if Self::in_bounds(x, y, z) {
            self.blocks[Self::index(x, y, z)] = tag;
        }
    }

    /// All blocks in linear order (for byte-level comparisons).
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[BlockTag] {
        &self.blocks[..]
    }
}

/// Terrain shaping parameters, fixed at world creation.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct TerrainParams {
    /// Fractal noise profile for the height field.
    pub noise: NoiseParams,
    /// Octave count passed to the noise field per column.
    pub octaves: u32,
    /// Slope multiplier applied to the noise value before height mapping.
    ///
    /// Normalized fractal noise clusters around zero; the relief factor
    /// stretches it so the mapped height actually reaches the sea floor
    /// and the peaks (the mapping clamps at the chunk height range).
    pub relief: f64,
    /// Sea level as a fraction of chunk height.
    pub sea_level_fraction: f32,
    /// Columns at most this far above sea level become beaches.
    pub beach_band: i32,
    /// Maximum dirt layers under a grass surface.
    pub dirt_depth_max: i32,
    /// Chance that a grass column tries to grow a tree.
    pub tree_spawn_chance: f64,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            noise: NoiseParams::default(),
            octaves: 8,
            relief: 2.0,
            sea_level_fraction: 0.1,
            beach_band: 2,
            dirt_depth_max: 3,
            tree_spawn_chance: 0.05,
        }
    }
}

impl TerrainParams {
    /// Sea level in blocks.
    #[inline]
    #[must_use]
    pub fn sea_level(&self) -> i32 {
        (CHUNK_HEIGHT as f32 * self.sea_level_fraction) as i32
    }
}

/// Deterministic chunk terrain generator.
///
/// Same seed + same coordinate = byte-identical block array, across
/// regenerations and across runs.
pub struct TerrainGenerator {
    seed: WorldSeed,
    noise: NoiseField,
    params: TerrainParams,
}

impl TerrainGenerator {
    /// Trunk height of a generated tree, in blocks above the surface.
    const TRUNK_HEIGHT: i32 = 5;

    /// Canopy layer half-widths, bottom to top. The top layer is the
    /// narrower cap.
    const CANOPY_RADII: [i32; 3] = [2, 2, 1];

    /// Sub-seed purpose tag for the tree RNG stream.
    const TREE_STREAM: u64 = 0x7265;

    /// Creates a generator for the given seed and parameters.
    #[must_use]
    pub fn new(seed: WorldSeed, params: TerrainParams) -> Self {
        Self {
            seed,
            noise: NoiseField::new(seed, params.noise),
            params,
        }
    }

    /// Returns the generator's parameters.
    #[inline]
    #[must_use]
    pub const fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Terrain surface height for a world column, clamped to the chunk
    /// height range.
    #[must_use]
    pub fn terrain_height(&self, world_x: i32, world_z: i32) -> i32 {
        let n = self
            .noise
            .fractal(f64::from(world_x), f64::from(world_z), self.params.octaves);
        let h = ((n * self.params.relief + 1.0) * 0.5 * (CHUNK_HEIGHT as f64 - 1.0)) as i32;
        h.clamp(0, CHUNK_HEIGHT as i32 - 1)
    }

    /// Generates the block array for a chunk.
    #[must_use]
    pub fn generate(&self, coord: ChunkCoord) -> ChunkBlocks {
        let mut blocks = ChunkBlocks::new();
        let mut heights = [0i32; CHUNK_WIDTH * CHUNK_DEPTH];

        // Pass 1: base terrain, column by column.
        for local_z in 0..CHUNK_DEPTH as i32 {
            for local_x in 0..CHUNK_WIDTH as i32 {
                let world_x = coord.world_x() + local_x;
                let world_z = coord.world_z() + local_z;

                let h = self.terrain_height(world_x, world_z);
                heights[(local_x + local_z * CHUNK_WIDTH as i32) as usize] = h;

                self.fill_column(&mut blocks, local_x, local_z, h);
            }
        }

        // Pass 2: trees on grass surfaces, one deterministic RNG stream
        // per chunk.
        self.plant_trees(&mut blocks, coord, &heights);

        blocks
    }

    /// Fills one column: sea water first, then the land stack on top.
    fn fill_column(&self, blocks: &mut ChunkBlocks, x: i32, z: i32, h: i32) {
        let sea_level = self.params.sea_level();

        for y in 0..sea_level {
            blocks.set(x, y, z, BlockTag::Water);
        }

        if h >= sea_level && h <= sea_level + self.params.beach_band {
            // Beach: the whole column is sand up to the surface.
            for y in 0..=h {
                blocks.set(x, y, z, BlockTag::Sand);
            }
        } else {
            // Standard stack: grass surface, a few dirt layers, stone
            // below. Columns near sea level get fewer dirt layers.
            let dirt = (h - sea_level - 1).clamp(0, self.params.dirt_depth_max);

            blocks.set(x, h, z, BlockTag::GrassBlock);
            for y in (h - dirt)..h {
                blocks.set(x, y, z, BlockTag::Dirt);
            }
            for y in 0..(h - dirt) {
                blocks.set(x, y, z, BlockTag::Stone);
            }
        }
    }

    /// Attempts tree placement over every grass column in the chunk.
    fn plant_trees(&self, blocks: &mut ChunkBlocks, coord: ChunkCoord, heights: &[i32]) {
        let mut rng = ChaCha8Rng::seed_from_u64(
            self.seed
                .derive(Self::TREE_STREAM)
                .derive(coord.x as u64)
                .derive(coord.z as u64)
                .value(),
        );

        for local_z in 0..CHUNK_DEPTH as i32 {
            for local_x in 0..CHUNK_WIDTH as i32 {
                let h = heights[(local_x + local_z * CHUNK_WIDTH as i32) as usize];
                if blocks.get(local_x, h, local_z) != BlockTag::GrassBlock {
                    continue;
                }
                // Draw for every grass column so the stream stays aligned
                // regardless of placement outcomes.
                if rng.gen_bool(self.params.tree_spawn_chance) {
                    self.try_place_tree(blocks, local_x, local_z, h);
                }
            }
        }
    }

    /// Places a fixed-shape tree above a surface cell, or does nothing.
    ///
    /// A tree is placed only if every cell it would occupy is inside this
    /// chunk and currently air. Canopies never spill into neighbor chunks;
    /// a blocked or clipped attempt is skipped silently.
    fn try_place_tree(&self, blocks: &mut ChunkBlocks, x: i32, z: i32, surface: i32) {
        let base = surface + 1;
        let trunk_top = base + Self::TRUNK_HEIGHT - 1;

        // Trunk footprint.
        for y in base..=trunk_top {
            if !ChunkBlocks::in_bounds(x, y, z) || !blocks.get(x, y, z).is_air() {
                return;
            }
        }

        // Canopy footprint, stacked square layers above the trunk.
        for (layer, &radius) in Self::CANOPY_RADII.iter().enumerate() {
            let y = trunk_top + 1 + layer as i32;
            for dz in -radius..=radius {
                for dx in -radius..=radius {
                    if !ChunkBlocks::in_bounds(x + dx, y, z + dz)
                        || !blocks.get(x + dx, y, z + dz).is_air()
                    {
                        return;
                    }
                }
            }
        }

        // Footprint is clear: write the tree.
        for y in base..=trunk_top {
            blocks.set(x, y, z, BlockTag::Log);
        }
        for (layer, &radius) in Self::CANOPY_RADII.iter().enumerate() {
            let y = trunk_top + 1 + layer as i32;
            for dz in -radius..=radius {
                for dx in -radius..=radius {
                    blocks.set(x + dx, y, z + dz, BlockTag::Leaves);
                }
            }
        }
    }
}
