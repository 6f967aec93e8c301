//! Tick-loop throughput benchmark

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use glam::Vec3;
use mobmind::monsters::flockling::FLOCKLING;
use mobmind::monsters::shambler::SHAMBLER;
use mobmind::monsters::stalker::STALKER;
use mobmind::monsters::PLAYER_PROXY;
use mobmind::world::tick::run_world_tick;
use mobmind::world::World;

fn build_world(monsters: usize) -> World {
    let mut world = World::new(42);
    world.spawn(&PLAYER_PROXY, "observer", Vec3::new(0.0, -200.0, 0.0));
    world.add_occluder(Vec3::new(-40.0, 180.0, -64.0), Vec3::new(40.0, 200.0, 64.0));

    for i in 0..monsters {
        let pos = Vec3::new((i % 32) as f32 * 60.0, (i / 32) as f32 * 60.0, 0.0);
        match i % 3 {
            0 => world.spawn(&FLOCKLING, format!("flockling-{i}"), pos),
            1 => world.spawn(&STALKER, format!("stalker-{i}"), pos),
            _ => world.spawn(&SHAMBLER, format!("shambler-{i}"), pos),
        };
    }
    world
}

fn bench_tick(c: &mut Criterion) {
    for &count in &[16usize, 64, 256] {
        c.bench_function(&format!("tick_{count}_monsters"), |b| {
            b.iter_batched(
                || build_world(count),
                |mut world| {
                    for _ in 0..10 {
                        run_world_tick(&mut world);
                    }
                    world
                },
                BatchSize::SmallInput,
            );
        });
    }
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
