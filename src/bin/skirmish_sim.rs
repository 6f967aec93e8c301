//! Headless skirmish runner
//!
//! Drops a flock, a stalker pack, and a shambler into an arena with a
//! few walls, runs the behavior engine for a fixed number of ticks, and
//! reports what happened.

use clap::Parser;
use glam::Vec3;
use mobmind::monsters::flockling::FLOCKLING;
use mobmind::monsters::shambler::SHAMBLER;
use mobmind::monsters::stalker::STALKER;
use mobmind::monsters::PLAYER_PROXY;
use mobmind::world::tick::run_world_tick;
use mobmind::world::{World, WorldEvent};
use serde::Serialize;
use std::collections::HashMap;

/// Headless skirmish runner for the behavior engine
#[derive(Parser, Debug)]
#[command(name = "skirmish_sim")]
#[command(about = "Run a monster skirmish and summarize the engine's decisions")]
struct Args {
    /// RNG seed (same seed, same skirmish)
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of simulation ticks to run
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Flocklings to spawn
    #[arg(long, default_value_t = 5)]
    flock: usize,

    /// Stalkers to spawn
    #[arg(long, default_value_t = 3)]
    stalkers: usize,

    /// Print the final report as JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Debug, Default, Serialize)]
struct Report {
    ticks: u64,
    schedules_started: HashMap<String, usize>,
    tasks_completed: usize,
    tasks_failed: usize,
    interrupts: usize,
    attacks_landed: usize,
    help_calls: usize,
    deaths: Vec<String>,
    survivors: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mobmind=info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();
    let mut world = World::new(args.seed);

    // A couple of walls to hide behind
    world.add_occluder(Vec3::new(-40.0, 180.0, -64.0), Vec3::new(40.0, 200.0, 64.0));
    world.add_occluder(Vec3::new(200.0, -40.0, -64.0), Vec3::new(220.0, 120.0, 64.0));

    // An observer so sensing never culls out
    world.spawn(&PLAYER_PROXY, "observer", Vec3::new(0.0, -200.0, 0.0));

    let mut flock_leader = None;
    for i in 0..args.flock {
        let handle = world.spawn(
            &FLOCKLING,
            format!("flockling-{i}"),
            Vec3::new(-300.0 + (i as f32) * 40.0, 0.0, 0.0),
        );
        if i == 0 {
            flock_leader = Some(handle);
        }
    }
    if let Some(leader) = flock_leader {
        world.form_squad(leader).expect("flock formation");
    }

    for i in 0..args.stalkers {
        world.spawn(
            &STALKER,
            format!("stalker-{i}"),
            Vec3::new(400.0, -100.0 + (i as f32) * 80.0, 0.0),
        );
    }

    world.spawn(&SHAMBLER, "shambler", Vec3::new(100.0, 300.0, 0.0));

    let mut report = Report {
        ticks: args.ticks,
        ..Report::default()
    };

    for _ in 0..args.ticks {
        for event in run_world_tick(&mut world) {
            match event {
                WorldEvent::ScheduleStarted { schedule, .. } => {
                    *report
                        .schedules_started
                        .entry(schedule.to_string())
                        .or_insert(0) += 1;
                }
                WorldEvent::TaskCompleted { .. } => report.tasks_completed += 1,
                WorldEvent::TaskFailed { .. } => report.tasks_failed += 1,
                WorldEvent::ScheduleInterrupted { .. } => report.interrupts += 1,
                WorldEvent::Attacked { .. } => report.attacks_landed += 1,
                WorldEvent::HelpCalled { .. } => report.help_calls += 1,
                WorldEvent::MonsterDied { monster } => report.deaths.push(monster),
                _ => {}
            }
        }
        if world.monsters.len() <= 2 {
            // Observer plus one survivor: the skirmish is decided
            break;
        }
    }

    report.survivors = world.monsters.len().saturating_sub(1);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report).unwrap());
        return;
    }

    println!("=== skirmish over after {} ticks ===", world.tick_count());
    println!("survivors: {}", report.survivors);
    println!(
        "tasks: {} completed, {} failed, {} schedule interrupts",
        report.tasks_completed, report.tasks_failed, report.interrupts
    );
    println!(
        "attacks landed: {}, help calls: {}",
        report.attacks_landed, report.help_calls
    );
    if !report.deaths.is_empty() {
        println!("fallen: {}", report.deaths.join(", "));
    }
    let mut schedules: Vec<_> = report.schedules_started.iter().collect();
    schedules.sort_by(|a, b| b.1.cmp(a.1));
    println!("schedules started:");
    for (name, count) in schedules {
        println!("  {count:>5}  {name}");
    }
}
