//! # Streaming Lifecycle Integration Test
//!
//! Drives a world the way a frame loop would: observer moves, chunks
//! load, leave the view radius, wait out their grace period and die.
//! Elapsed time is injected, so every scenario is deterministic.

use basalt_procedural::{
    BlockTag, ChunkCoord, TerrainGenerator, TerrainParams, WorldSeed, CHUNK_WIDTH,
};
use basalt_rendering::{BlockCatalog, VoxelWorld, WorldConfig};

const SEED: u64 = 42;

fn catalog() -> BlockCatalog {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/blocks.toml");
    BlockCatalog::try_load(path).unwrap()
}

fn test_config() -> WorldConfig {
    WorldConfig {
        load_distance: 1,
        view_distance: 3,
        padding: 1,
        deletion_grace_period: 2.0,
    }
}

fn test_world() -> VoxelWorld {
    VoxelWorld::new(
        WorldSeed::new(SEED),
        TerrainParams::default(),
        test_config(),
        catalog(),
    )
}

/// Center of a chunk, in world coordinates.
fn chunk_center(x: i32, z: i32) -> [f32; 3] {
    [
        (x * CHUNK_WIDTH as i32 + CHUNK_WIDTH as i32 / 2) as f32,
        64.0,
        (z * CHUNK_WIDTH as i32 + CHUNK_WIDTH as i32 / 2) as f32,
    ]
}

#[test]
fn test_first_update_loads_the_window() {
    let mut world = test_world();
    world.update(chunk_center(0, 0), 0.016);

    // load_distance + padding = 2 -> a 5x5 window.
    assert_eq!(world.chunk_count(), 25);
    assert!(world.is_loaded(ChunkCoord::new(0, 0)));
    assert!(world.is_loaded(ChunkCoord::new(2, 2)));
    assert!(world.is_loaded(ChunkCoord::new(-2, -2)));
    assert!(!world.is_loaded(ChunkCoord::new(3, 0)));
    assert_eq!(world.stats().created, 25);
}

#[test]
fn test_standing_still_creates_nothing_twice() {
    let mut world = test_world();
    world.update(chunk_center(0, 0), 0.016);
    let created = world.stats().created;

    for _ in 0..10 {
        world.update(chunk_center(0, 0), 0.016);
    }

    assert_eq!(world.stats().created, created, "duplicate chunk creation");
    assert_eq!(world.chunk_count(), 25);
}

#[test]
fn test_negative_observer_positions() {
    let mut world = test_world();
    world.update([-16.0, 64.0, -16.0], 0.016);

    assert!(world.is_loaded(ChunkCoord::new(-1, -1)));
    assert!(world.is_loaded(ChunkCoord::new(-3, -3)));
    assert!(world.is_loaded(ChunkCoord::new(1, 1)));
    assert!(!world.is_loaded(ChunkCoord::new(2, 2)));
}

/// The observer jumps 100 chunks away; the origin chunk is marked on the
/// very next update and destroyed once the grace period of simulated
/// time has elapsed.
#[test]
fn test_far_move_marks_then_destroys() {
    let mut world = test_world();
    world.update(chunk_center(0, 0), 0.016);
    assert!(world.is_loaded(ChunkCoord::new(0, 0)));

    let far = chunk_center(100, 0);
    world.update(far, 0.5);

    let origin = world
        .chunk(ChunkCoord::new(0, 0))
        .expect("origin chunk should survive the grace period");
    assert!(origin.is_marked_for_deletion());
    assert!(!origin.is_deleted());

    // 0.5s elapsed so far; push past the 2.0s grace period.
    for _ in 0..4 {
        world.update(far, 0.5);
    }

    assert!(!world.is_loaded(ChunkCoord::new(0, 0)), "grace period ignored");
    assert!(world.stats().destroyed >= 25);
    assert!(world.is_loaded(ChunkCoord::new(100, 0)));
}

#[test]
fn test_reentry_cancels_pending_deletion() {
    let mut world = test_world();
    world.update(chunk_center(0, 0), 0.016);

    // Leave: origin gets marked and ages, but stays under the grace period.
    let far = chunk_center(100, 0);
    world.update(far, 0.5);
    world.update(far, 0.5);
    {
        let origin = world.chunk(ChunkCoord::new(0, 0)).unwrap();
        assert!(origin.is_marked_for_deletion());
        assert!(origin.deletion_timer() > 0.0);
    }

    // Return before it expires.
    world.update(chunk_center(0, 0), 0.5);
    let origin = world.chunk(ChunkCoord::new(0, 0)).unwrap();
    assert!(!origin.is_marked_for_deletion());
    assert!(!origin.is_deleted());
    assert_eq!(origin.deletion_timer(), 0.0, "timer must reset on re-entry");

    // And it never dies while the observer stays.
    for _ in 0..20 {
        world.update(chunk_center(0, 0), 1.0);
    }
    assert!(world.is_loaded(ChunkCoord::new(0, 0)));
}

/// A chunk between the load radius and the view radius is neither evicted
/// nor re-created: the hysteresis band.
#[test]
fn test_hysteresis_band() {
    let mut world = test_world();
    world.update(chunk_center(3, 0), 0.016);
    assert!(world.is_loaded(ChunkCoord::new(5, 0)));
    assert!(world.is_loaded(ChunkCoord::new(3, 0)));

    world.update(chunk_center(0, 0), 0.016);

    // Distance 3 == view_distance: inside the band, kept and unmarked.
    let band = world.chunk(ChunkCoord::new(3, 0)).unwrap();
    assert!(!band.is_marked_for_deletion());

    // Distance 5 > view_distance: marked.
    let outside = world.chunk(ChunkCoord::new(5, 0)).unwrap();
    assert!(outside.is_marked_for_deletion());

    // The band chunk survives indefinitely without being re-created.
    let created = world.stats().created;
    for _ in 0..20 {
        world.update(chunk_center(0, 0), 1.0);
    }
    assert!(world.is_loaded(ChunkCoord::new(3, 0)));
    assert_eq!(world.stats().created, created);
    assert!(!world.is_loaded(ChunkCoord::new(5, 0)), "marked chunk not evicted");
}

/// Walking far in one direction keeps the live set bounded and the ground
/// loaded under the observer.
#[test]
fn test_walk_keeps_live_set_bounded() {
    let mut world = test_world();
    let z = 16.0f32;

    let mut x = 16.0f32;
    world.update([x, 64.0, z], 0.1);

    for _ in 0..125 {
        x += 8.0;
        world.update([x, 64.0, z], 0.1);

        assert!(
            world.chunk_count() <= 120,
            "live set exploded to {} chunks",
            world.chunk_count()
        );
        assert_ne!(
            world.block_at(x as i32, 0, z as i32),
            BlockTag::Air,
            "no ground under the observer at x={x}"
        );
    }

    // Settle in place until everything behind has aged out.
    for _ in 0..30 {
        world.update([x, 64.0, z], 0.5);
    }

    // Everything still alive is within the view radius.
    let view = world.config().view_distance;
    assert!(world.chunk_count() <= ((2 * view + 1) * (2 * view + 1)) as usize);
    println!(
        "walked {} blocks: {} created, {} destroyed, {} live",
        125 * 8,
        world.stats().created,
        world.stats().destroyed,
        world.chunk_count()
    );
}

/// Water submissions come back farthest-first for back-to-front blending.
#[test]
fn test_water_draw_order_is_farthest_first() {
    // Find open sea with the same generator the world will use, then park
    // the observer there.
    let generator = TerrainGenerator::new(WorldSeed::new(SEED), TerrainParams::default());
    let params = TerrainParams::default();
    let sea_level = params.sea_level();

    let mut ocean = None;
    'scan: for wz in (-1600..=1600).step_by(160) {
        for wx in -2000..=2000 {
            if generator.terrain_height(wx, wz) < sea_level - 2 {
                ocean = Some((wx, wz));
                break 'scan;
            }
        }
    }
    let (wx, wz) = ocean.expect("no ocean found in the scanned area");

    let mut world = test_world();
    let observer = [wx as f32, 64.0, wz as f32];
    world.update(observer, 0.016);

    let draws = world.draw_water();
    assert!(draws.len() >= 2, "expected water in more than one chunk");

    let dist = |translation: [i32; 3]| -> f32 {
        let cx = translation[0] as f32 + CHUNK_WIDTH as f32 * 0.5;
        let cz = translation[2] as f32 + CHUNK_WIDTH as f32 * 0.5;
        let dx = cx - observer[0];
        let dz = cz - observer[2];
        dx * dx + dz * dz
    };

    for pair in draws.windows(2) {
        assert!(
            dist(pair[0].translation) >= dist(pair[1].translation),
            "water submissions not sorted farthest-first"
        );
    }
}

/// A missing catalog produces a fully functional world with zero face
/// geometry - broken visuals, nothing else.
#[test]
fn test_missing_catalog_degrades_gracefully() {
    let mut world = VoxelWorld::new(
        WorldSeed::new(SEED),
        TerrainParams::default(),
        test_config(),
        BlockCatalog::load("/definitely/not/here/blocks.toml"),
    );

    world.update(chunk_center(0, 0), 0.016);

    assert_eq!(world.chunk_count(), 25);
    assert_eq!(world.draw_land().count(), 0, "no catalog, no faces");
    assert!(world.draw_water().is_empty());
    // The block data itself is intact.
    assert_ne!(world.block_at(16, 0, 16), BlockTag::Air);
}

#[test]
fn test_water_time_accumulates() {
    let mut world = test_world();
    world.update(chunk_center(0, 0), 0.25);
    world.update(chunk_center(0, 0), 0.25);
    world.update(chunk_center(0, 0), 0.25);

    assert!((world.water_time() - 0.75).abs() < 1e-6);
}

#[test]
fn test_block_queries_outside_loaded_world_are_air() {
    let mut world = test_world();
    world.update(chunk_center(0, 0), 0.016);

    // Unloaded chunk far away.
    assert_eq!(world.block_at(10_000, 10, 10_000), BlockTag::Air);
    // Above the world ceiling inside a loaded chunk.
    assert_eq!(world.block_at(16, 500, 16), BlockTag::Air);
    // Ground inside the loaded window is solid.
    assert_ne!(world.block_at(16, 0, 16), BlockTag::Air);
}
