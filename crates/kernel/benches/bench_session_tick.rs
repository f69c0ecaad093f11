use std::hint::black_box;
use std::time::Instant;

use meadowrun_common::Direction;
use meadowrun_input::{Action, FrameInput};
use meadowrun_kernel::{GameConfig, Session, generate};

const DT: f32 = 1.0 / 60.0;

fn make_session(obstacle_count: usize) -> Session {
    let mut config = GameConfig::default();
    config.seed = Some(7);
    config.corridor.count = obstacle_count;
    // Wide corridor so the run lasts the full duration most of the time.
    config.corridor.half_width = 40.0;
    match Session::new(config) {
        Ok(session) => session,
        Err(err) => panic!("bench config rejected: {err}"),
    }
}

fn bench_full_run(obstacle_count: usize, iterations: usize) {
    let start = Instant::now();
    let mut frames = 0u64;
    for _ in 0..iterations {
        let mut session = make_session(obstacle_count);
        session.tick(&FrameInput::new(DT, 0.0).with(Action::ConfirmStart));
        let mut i = 1u32;
        while !session.phase().is_finished() && i < 1000 {
            let mut frame = FrameInput::new(DT, i as f32 * DT);
            if i % 3 == 0 {
                frame.push(Action::Move(Direction::Left));
            }
            if i % 90 == 0 {
                frame.push(Action::Jump);
            }
            session.tick(black_box(&frame));
            i += 1;
        }
        frames += i as u64;
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  full run ({obstacle_count} obstacles, {iterations} runs, {frames} frames): {per_iter:?}/run, total {elapsed:?}"
    );
}

fn bench_generate(count: usize, iterations: usize) {
    let start = Instant::now();
    for seed in 0..iterations as u64 {
        let _ = black_box(generate(1.8, 35.0, black_box(count), seed));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!("  generate ({count} obstacles, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}");
}

fn main() {
    println!("=== Session Tick Benchmarks ===\n");

    println!("Full auto-move run:");
    bench_full_run(5, 1000);
    bench_full_run(100, 100);
    bench_full_run(10000, 10);

    println!("\nObstacle generation:");
    bench_generate(5, 100000);
    bench_generate(1000, 1000);

    println!("\n=== Done ===");
}
