//! # Voxel World Streaming
//!
//! Keeps a window of chunks alive around a moving observer: creates
//! chunks entering the load radius, marks chunks leaving the view radius,
//! and destroys marked chunks once their grace period elapses.
//!
//! The world is an explicit object - no global singletons - so multiple
//! independent worlds (and deterministic tests) are possible. It is
//! single-threaded by design: chunk creation, meshing and destruction all
//! happen synchronously inside [`VoxelWorld::update`].
//!
//! ## Hysteresis
//!
//! Chunks are created within `load_distance + padding` of the observer
//! but only evicted beyond `view_distance` (which must be at least the
//! load distance). The band between the two radii prevents create/destroy
//! thrash when the observer oscillates near a chunk boundary.

use std::collections::HashMap;

use basalt_procedural::{
    BlockTag, ChunkCoord, TerrainGenerator, TerrainParams, WorldSeed, CHUNK_DEPTH, CHUNK_WIDTH,
};
use serde::Deserialize;

use super::catalog::BlockCatalog;
use super::chunk::{Chunk, DrawSubmission};

/// Streaming tunables, fixed at world creation.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Chunks are created within this Chebyshev radius of the observer.
    pub load_distance: i32,
    /// Chunks are evicted beyond this Chebyshev radius. Must be at least
    /// `load_distance`.
    pub view_distance: i32,
    /// Extra pre-fetch radius added to the load distance.
    pub padding: i32,
    /// Seconds a chunk stays marked before it is destroyed.
    pub deletion_grace_period: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            load_distance: 2,
            view_distance: 10,
            padding: 2,
            deletion_grace_period: 10.0,
        }
    }
}

impl WorldConfig {
    /// Enforces `load_distance <= view_distance`, clamping with a warning
    /// instead of failing: a mis-ordered config would otherwise evict
    /// chunks the loader keeps recreating.
    #[must_use]
    pub fn validated(mut self) -> Self {
        if self.load_distance > self.view_distance {
            tracing::warn!(
                "load_distance {} exceeds view_distance {}; clamping",
                self.load_distance,
                self.view_distance
            );
            self.load_distance = self.view_distance;
        }
        self
    }
}

/// Lifetime counters for a world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    /// Chunks created since the world was built.
    pub created: u64,
    /// Chunks destroyed since the world was built.
    pub destroyed: u64,
}

/// The streaming world: every live chunk, keyed by coordinate, plus the
/// observer tracking that drives their lifecycle.
pub struct VoxelWorld {
    chunks: HashMap<ChunkCoord, Chunk>,
    terrain: TerrainGenerator,
    catalog: BlockCatalog,
    config: WorldConfig,
    observer_chunk: Option<ChunkCoord>,
    observer_pos: [f32; 3],
    water_time: f32,
    stats: WorldStats,
}

impl VoxelWorld {
    /// Creates an empty world. Chunks appear on the first
    /// [`VoxelWorld::update`].
    #[must_use]
    pub fn new(
        seed: WorldSeed,
        terrain_params: TerrainParams,
        config: WorldConfig,
        catalog: BlockCatalog,
    ) -> Self {
        Self {
            chunks: HashMap::new(),
            terrain: TerrainGenerator::new(seed, terrain_params),
            catalog,
            config: config.validated(),
            observer_chunk: None,
            observer_pos: [0.0; 3],
            water_time: 0.0,
            stats: WorldStats::default(),
        }
    }

    /// Advances the world by one frame.
    ///
    /// Recomputes the observer's chunk coordinate (Y is ignored - the
    /// world is column-based), creates newly required chunks, re-marks
    /// every loaded chunk against the view radius, advances deletion
    /// timers by `dt`, and destroys chunks whose grace period elapsed.
    pub fn update(&mut self, observer_pos: [f32; 3], dt: f32) {
        self.observer_pos = observer_pos;
        self.water_time += dt;

        let observer = ChunkCoord::from_world_pos(
            observer_pos[0].floor() as i32,
            observer_pos[2].floor() as i32,
        );

        if self.observer_chunk != Some(observer) {
            self.observer_chunk = Some(observer);
            self.load_around(observer);
        }

        self.refresh_marks(observer);

        let grace = self.config.deletion_grace_period;
        for chunk in self.chunks.values_mut() {
            chunk.tick(dt, grace);
        }

        self.sweep();
    }

    /// Creates every missing chunk within the load radius (plus padding).
    fn load_around(&mut self, observer: ChunkCoord) {
        let radius = self.config.load_distance + self.config.padding;

        for x in (observer.x - radius)..=(observer.x + radius) {
            for z in (observer.z - radius)..=(observer.z + radius) {
                let coord = ChunkCoord::new(x, z);
                if !self.chunks.contains_key(&coord) {
                    let chunk = Chunk::generate(coord, &self.terrain, &self.catalog);
                    self.chunks.insert(coord, chunk);
                    self.stats.created += 1;
                }
            }
        }
    }

    /// Marks chunks outside the view radius and un-marks (timer reset)
    /// chunks back inside it.
    fn refresh_marks(&mut self, observer: ChunkCoord) {
        let view = self.config.view_distance;
        for (coord, chunk) in &mut self.chunks {
            let outside =
                (coord.x - observer.x).abs() > view || (coord.z - observer.z).abs() > view;
            chunk.set_marked_for_deletion(outside);
        }
    }

    /// Destroys every chunk whose deleted flag latched. Dropping the chunk
    /// releases its block array and geometry buffers immediately.
    fn sweep(&mut self) {
        let before = self.chunks.len();
        self.chunks.retain(|_, chunk| !chunk.is_deleted());
        self.stats.destroyed += (before - self.chunks.len()) as u64;
    }

    /// Opaque draw submissions for every live chunk, in arbitrary order.
    pub fn draw_land(&self) -> impl Iterator<Item = DrawSubmission<'_>> {
        self.chunks
            .values()
            .filter(|chunk| chunk.has_land())
            .map(Chunk::draw_land)
    }

    /// Translucent water submissions, sorted farthest-first from the
    /// observer for back-to-front alpha blending.
    #[must_use]
    pub fn draw_water(&self) -> Vec<DrawSubmission<'_>> {
        let mut draws: Vec<(f32, DrawSubmission<'_>)> = self
            .chunks
            .values()
            .filter(|chunk| chunk.has_water())
            .map(|chunk| (self.distance_sq_to(chunk.coord()), chunk.draw_water()))
            .collect();

        draws.sort_by(|a, b| b.0.total_cmp(&a.0));
        draws.into_iter().map(|(_, draw)| draw).collect()
    }

    /// Squared horizontal distance from the observer to a chunk's center.
    fn distance_sq_to(&self, coord: ChunkCoord) -> f32 {
        let center_x = coord.world_x() as f32 + CHUNK_WIDTH as f32 * 0.5;
        let center_z = coord.world_z() as f32 + CHUNK_DEPTH as f32 * 0.5;
        let dx = center_x - self.observer_pos[0];
        let dz = center_z - self.observer_pos[2];
        dx * dx + dz * dz
    }

    /// Accumulated water-animation time, for the consumer's shading.
    #[inline]
    #[must_use]
    pub const fn water_time(&self) -> f32 {
        self.water_time
    }

    /// Block at a world coordinate; air when no chunk is loaded there.
    #[must_use]
    pub fn block_at(&self, world_x: i32, world_y: i32, world_z: i32) -> BlockTag {
        let coord = ChunkCoord::from_world_pos(world_x, world_z);
        let local_x = world_x.rem_euclid(CHUNK_WIDTH as i32);
        let local_z = world_z.rem_euclid(CHUNK_DEPTH as i32);

        self.chunks
            .get(&coord)
            .map_or(BlockTag::Air, |chunk| chunk.block(local_x, world_y, local_z))
    }

    /// Number of live chunks (marked ones included).
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Returns true when a chunk is loaded at the coordinate.
    #[must_use]
    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Read access to a loaded chunk.
    #[must_use]
    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Lifetime counters.
    #[inline]
    #[must_use]
    pub const fn stats(&self) -> WorldStats {
        self.stats
    }

    /// The streaming configuration in effect.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> WorldConfig {
        self.config
    }
}
