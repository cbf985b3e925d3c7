//! Gameplay logging and metrics reach the Micromegas sink.

use ananas::actor::{ActorKind, spawn_actor};
use ananas::components::Cell;
use ananas::config::GameConfig;
use ananas::game::Game;
use ananas::grid::TileGrid;
use ananas::intent::Intent;
use ananas::mapgen::OpenFloor;
use micromegas_tracing::dispatch::{flush_log_buffer, flush_metrics_buffer, init_thread_stream};
use micromegas_tracing::levels::{self, LevelFilter};
use micromegas_tracing::test_utils::init_in_memory_tracing;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serial_test::serial;

fn cornered_game() -> Game {
    let grid = TileGrid::from_cells(
        4,
        4,
        (0..4).flat_map(|y| (0..4).map(move |x| Cell::new(x, y))),
    );
    Game::from_parts(
        GameConfig {
            map_width: 4,
            map_height: 4,
            max_boxes: 2,
            seed: Some(8),
            ..Default::default()
        },
        Box::new(OpenFloor),
        grid,
        vec![
            spawn_actor(ActorKind::Seeker, Cell::new(0, 0)),
            spawn_actor(ActorKind::DirectPursuer, Cell::new(2, 0)),
        ],
        StdRng::seed_from_u64(8),
    )
}

/// A full round (two waits, a capture, a restart) emits narrative logs and
/// the per-turn metric.
#[test]
#[serial]
fn round_emits_logs_and_metrics() {
    let guard = init_in_memory_tracing();
    levels::set_max_level(LevelFilter::Trace);
    init_thread_stream();

    let mut game = cornered_game();
    game.offer(Intent::Wait);
    game.offer(Intent::Wait);
    assert!(game.outcome().seeker_caught);
    game.offer(Intent::Continue);

    flush_log_buffer();
    flush_metrics_buffer();

    let sink = &guard.sink;
    // capture narration, prompt, round over, round start
    assert!(
        sink.total_log_events() >= 4,
        "expected >= 4 log events, got {}",
        sink.total_log_events()
    );
    // turns_elapsed once per seeker turn
    assert!(
        sink.total_metrics_events() >= 2,
        "expected >= 2 metrics events, got {}",
        sink.total_metrics_events()
    );
}

/// Logging from the core never depends on a registered thread stream.
#[test]
#[serial]
fn core_logs_without_thread_stream() {
    let guard = init_in_memory_tracing();
    levels::set_max_level(LevelFilter::Trace);

    let handle = std::thread::spawn(|| {
        let mut game = cornered_game();
        game.offer(Intent::Wait);
        game.offer(Intent::Wait);
        game.outcome().seeker_caught
    });
    assert!(handle.join().unwrap());

    flush_log_buffer();
    assert!(guard.sink.total_log_events() >= 2);
}
