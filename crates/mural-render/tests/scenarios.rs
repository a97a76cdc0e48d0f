//! End-to-end scenarios driving full frames through the renderer.

use mural_common::{ChunkCoord, ChunkRect};
use mural_render::prelude::*;
use mural_world::{Cell, CellChange, ClassRegistry, DynamicKind, GridWorld, Layer};

fn bright(_: i32, _: i32) -> [f32; 3] {
    FULL_BRIGHT
}

fn fast_config() -> RenderCacheConfig {
    RenderCacheConfig {
        populate_interval: 1,
        ..Default::default()
    }
}

fn run_frame(
    renderer: &mut FrameRenderer,
    world: &GridWorld,
    registry: &ClassRegistry,
    camera: &Camera,
) {
    renderer.begin_frame(camera, &bright, VisionState::default(), None::<&dyn LightSampler>);
    renderer
        .render(Layer::Wall, world, registry, &FlatRasterizer::new(), camera)
        .expect("wall render");
    renderer
        .render(Layer::Tile, world, registry, &FlatRasterizer::new(), camera)
        .expect("tile render");
}

/// 20x20-cell chunks at 16 px/cell, an 8400x2400-cell world, the camera at
/// the world origin, and a 1366x768 screen: with a one-chunk margin the
/// loaded rectangle spans x in [-1, 5], y in [-1, 3].
#[test]
fn window_bounds_at_world_origin() {
    let world = GridWorld::new(8400, 2400);
    let registry = ClassRegistry::new();
    let camera = Camera::new(1366, 768);
    let mut renderer = FrameRenderer::new(fast_config(), camera.viewport).expect("renderer");

    run_frame(&mut renderer, &world, &registry, &camera);

    let expected = ChunkRect::new(ChunkCoord::new(-1, -1), ChunkCoord::new(5, 3));
    assert_eq!(camera.chunk_window(renderer.config()), expected);
    let cache = renderer.layer_cache(Layer::Tile).cache();
    assert_eq!(cache.loaded_count(), expected.count());
    for coord in expected.iter() {
        assert!(cache.is_loaded(coord), "chunk {coord:?} should be loaded");
    }
}

/// Mutating cell (400, 300) marks exactly chunk (20, 15) pending; its
/// neighbor (19, 15) is untouched, as is every other loaded chunk.
#[test]
fn mutation_marks_exactly_one_chunk() {
    let mut world = GridWorld::new(8400, 2400);
    let registry = ClassRegistry::new();
    // Position the camera so chunks (19, 15) and (20, 15) are loaded:
    // cell (400, 300) sits at world pixel (6400, 4800).
    let mut camera = Camera::new(1366, 768);
    camera.move_to(6000.0, 4500.0);
    let mut renderer = FrameRenderer::new(fast_config(), camera.viewport).expect("renderer");
    run_frame(&mut renderer, &world, &registry, &camera);

    world.set_tile(400, 300, Cell::new(6));
    renderer.apply_changes(&world.drain_changes());

    let cache = renderer.layer_cache(Layer::Tile).cache();
    assert!(cache.is_loaded(ChunkCoord::new(20, 15)));
    assert!(cache.pending_repopulation(ChunkCoord::new(20, 15)));
    assert!(!cache.is_pending(ChunkCoord::new(19, 15)));
    let pending: Vec<ChunkCoord> = camera
        .chunk_window(renderer.config())
        .iter()
        .filter(|&c| cache.is_pending(c))
        .collect();
    assert_eq!(pending, vec![ChunkCoord::new(20, 15)]);
    // The wall layer never saw a mutation
    assert!(!renderer
        .layer_cache(Layer::Wall)
        .cache()
        .is_pending(ChunkCoord::new(20, 15)));
}

/// A resolution change from 1280x720 to 1920x1080 reallocates the lighting
/// grid at the new cell count; every chunk bitmap keeps its handle and its
/// pixel contents.
#[test]
fn resize_preserves_chunk_bitmaps() {
    let mut world = GridWorld::new(8400, 2400);
    for x in 0..50 {
        world.set_tile(x, 10, Cell::new(3));
    }
    world.drain_changes();
    let registry = ClassRegistry::new();
    let mut camera = Camera::new(1280, 720);
    let mut renderer = FrameRenderer::new(fast_config(), camera.viewport).expect("renderer");
    run_frame(&mut renderer, &world, &registry, &camera);

    let old_light_id = renderer.light().id();
    let before: Vec<(ChunkCoord, BufferId, Vec<u32>)> = renderer
        .layer_cache(Layer::Tile)
        .cache()
        .chunks()
        .map(|chunk| {
            (
                chunk.coord(),
                chunk.buffer_id().expect("buffer id"),
                chunk.buffer().expect("buffer").pixels().to_vec(),
            )
        })
        .collect();
    assert!(!before.is_empty());

    camera.set_viewport(1920, 1080);
    run_frame(&mut renderer, &world, &registry, &camera);

    assert_ne!(renderer.light().id(), old_light_id);
    assert_eq!(
        (renderer.light().width(), renderer.light().height()),
        LightGrid::size_for((1920, 1080), renderer.config())
    );

    let cache = renderer.layer_cache(Layer::Tile).cache();
    for (coord, id, pixels) in before {
        let chunk = cache.get(coord).expect("chunk still loaded");
        assert_eq!(chunk.buffer_id(), Some(id), "chunk {coord:?} handle changed");
        assert_eq!(
            chunk.buffer().expect("buffer").pixels(),
            pixels.as_slice(),
            "chunk {coord:?} pixels changed"
        );
    }
}

/// Population that hits a not-ready cell at iteration k draws nothing after
/// k in that attempt, and the coordinate reappears only in the
/// repopulation queue, never in the first-population queue.
#[test]
fn population_abort_stops_at_the_not_ready_cell() {
    let mut world = GridWorld::new(8400, 2400);
    // Inside chunk (0, 0): a static cell before and after the hole.
    world.set_tile(2, 0, Cell::new(4));
    world.set_tile(10, 5, Cell::new(4));
    world.mark_pending(6, 2);
    world.drain_changes();

    let registry = ClassRegistry::new();
    let camera = Camera::new(640, 480);
    let mut renderer = FrameRenderer::new(fast_config(), camera.viewport).expect("renderer");
    run_frame(&mut renderer, &world, &registry, &camera);

    let cache = renderer.layer_cache(Layer::Tile).cache();
    let origin = ChunkCoord::new(0, 0);
    assert!(cache.pending_repopulation(origin));
    assert!(!cache.pending_first(origin));

    let chunk = cache.get(origin).expect("chunk");
    assert!(!chunk.is_populated());
    let buffer = chunk.buffer().expect("buffer");
    // (2, 0) iterates before (6, 2): drawn in the aborted attempt
    assert_ne!(buffer.get(32, 0), Some(TRANSPARENT));
    // (10, 5) iterates after: untouched
    assert_eq!(buffer.get(160, 80), Some(TRANSPARENT));

    // Data arrives; the next frame's batch completes the chunk.
    world.mark_ready(6, 2);
    run_frame(&mut renderer, &world, &registry, &camera);
    let cache = renderer.layer_cache(Layer::Tile).cache();
    let chunk = cache.get(origin).expect("chunk");
    assert!(chunk.is_populated());
    assert!(!cache.is_pending(origin));
    let buffer = chunk.buffer().expect("buffer");
    assert_ne!(buffer.get(32, 0), Some(TRANSPARENT));
    assert_ne!(buffer.get(160, 80), Some(TRANSPARENT));
}

/// Chunks leaving the window are removed once they have no pending work,
/// and reloading allocates fresh buffers.
#[test]
fn window_exit_unloads_resolved_chunks() {
    let world = GridWorld::new(8400, 2400);
    let registry = ClassRegistry::new();
    let mut camera = Camera::new(640, 480);
    let mut renderer = FrameRenderer::new(fast_config(), camera.viewport).expect("renderer");
    run_frame(&mut renderer, &world, &registry, &camera);

    let near_origin = ChunkCoord::new(0, 0);
    let old_id = renderer
        .layer_cache(Layer::Tile)
        .cache()
        .get(near_origin)
        .and_then(|c| c.buffer_id());
    assert!(old_id.is_some());

    // Move far away: the old window unloads entirely.
    camera.move_to(100_000.0, 30_000.0);
    run_frame(&mut renderer, &world, &registry, &camera);
    let cache = renderer.layer_cache(Layer::Tile).cache();
    assert!(!cache.is_loaded(near_origin));
    assert_eq!(cache.loaded_count(), camera.chunk_window(renderer.config()).count());

    // Moving back allocates a new buffer for the same coordinate.
    camera.move_to(0.0, 0.0);
    run_frame(&mut renderer, &world, &registry, &camera);
    let new_id = renderer
        .layer_cache(Layer::Tile)
        .cache()
        .get(near_origin)
        .and_then(|c| c.buffer_id());
    assert!(new_id.is_some());
    assert_ne!(new_id, old_id);
}

/// A cell reclassified from static to dynamic is excluded from the bitmap
/// and drawn via the live path after the next repopulation.
#[test]
fn reclassified_cell_moves_to_the_live_path() {
    let mut world = GridWorld::new(8400, 2400);
    world.set_tile(3, 3, Cell::new(7));
    world.drain_changes();

    let mut registry = ClassRegistry::new();
    let camera = Camera::new(640, 480);
    let mut renderer = FrameRenderer::new(fast_config(), camera.viewport).expect("renderer");
    run_frame(&mut renderer, &world, &registry, &camera);

    let coord = ChunkCoord::new(0, 0);
    {
        let chunk = renderer.layer_cache(Layer::Tile).cache().get(coord).expect("chunk");
        assert!(chunk.dynamic_points().is_empty());
        assert_ne!(chunk.buffer().expect("buffer").get(48, 48), Some(TRANSPARENT));
    }

    // Content placement re-registers the type as animated and mutates the
    // cell; the next batch re-derives the classification.
    registry.register(Layer::Tile, 7, DynamicKind::Animated);
    renderer.apply_changes(&[CellChange {
        layer: Layer::Tile,
        x: 3,
        y: 3,
    }]);
    run_frame(&mut renderer, &world, &registry, &camera);

    let chunk = renderer.layer_cache(Layer::Tile).cache().get(coord).expect("chunk");
    assert_eq!(chunk.dynamic_points().len(), 1);
    assert_eq!(chunk.buffer().expect("buffer").get(48, 48), Some(TRANSPARENT));
    // The live path drew it into the frame's composite target
    assert_eq!(renderer.stats().dynamic_drawn, 1);
    assert_ne!(renderer.target().get(48, 48), Some(TRANSPARENT));
}

/// The throttle bounds population to every Nth frame: chunks load
/// immediately but stay pending until a batch frame arrives.
#[test]
fn population_respects_the_throttle() {
    let world = GridWorld::new(8400, 2400);
    let registry = ClassRegistry::new();
    let camera = Camera::new(640, 480);
    // Default populate_interval = 4
    let mut renderer =
        FrameRenderer::new(RenderCacheConfig::default(), camera.viewport).expect("renderer");

    let coord = ChunkCoord::new(0, 0);
    for _ in 0..3 {
        run_frame(&mut renderer, &world, &registry, &camera);
        assert!(renderer.layer_cache(Layer::Tile).cache().pending_first(coord));
        assert_eq!(renderer.stats().populated, 0);
    }
    // Tick 4 runs the batch for both layers
    run_frame(&mut renderer, &world, &registry, &camera);
    assert!(!renderer.layer_cache(Layer::Tile).cache().is_pending(coord));
    assert!(renderer.stats().populated > 0);
}

/// Vision overrides brighten dark cells only while a vision flag is active.
#[test]
fn vision_override_blends_into_the_composite() {
    let mut world = GridWorld::new(200, 200);
    world.set_tile(0, 0, Cell::new(5));
    world.drain_changes();
    let registry = ClassRegistry::new();
    let camera = Camera::new(64, 64);
    let mut renderer = FrameRenderer::new(fast_config(), camera.viewport).expect("renderer");

    let dark = |_: i32, _: i32| [0.0, 0.0, 0.0];
    let reveal = |_: i32, _: i32| [1.0, 1.0, 1.0];

    // No vision state: fully dark output.
    renderer.begin_frame(&camera, &dark, VisionState::default(), Some(&reveal));
    renderer
        .render(Layer::Tile, &world, &registry, &FlatRasterizer::new(), &camera)
        .expect("render");
    let px = renderer.target().get(4, 4).expect("pixel");
    assert_eq!(unpack_rgba(px)[0], 0);

    // Vision active: the override lifts the darkness.
    let vision = VisionState {
        reveal_hidden: true,
        ..Default::default()
    };
    renderer.begin_frame(&camera, &dark, vision, Some(&reveal));
    renderer
        .render(Layer::Tile, &world, &registry, &FlatRasterizer::new(), &camera)
        .expect("render");
    let px = renderer.target().get(4, 4).expect("pixel");
    assert_ne!(unpack_rgba(px)[0], 0);
}
