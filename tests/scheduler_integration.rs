//! Integration tests for schedule selection and task execution
//!
//! These drive full world ticks and assert on the event stream:
//! - schedules run their tasks to completion and re-enter the selector
//! - timed tasks never finish on the tick they started
//! - failures fall back to the designated fail schedule
//! - interrupts only happen at task boundaries
//! - attack tasks mask light damage behind the flinch delay

use glam::Vec3;
use mobmind::conditions::{Conditions, SoundMask};
use mobmind::core::types::Classify;
use mobmind::monster::Behavior;
use mobmind::monsters::shambler::SHAMBLER;
use mobmind::monsters::stalker::STALKER;
use mobmind::monsters::PLAYER_PROXY;
use mobmind::schedule::{library, Schedule, ScheduleId, Task, TaskKind};
use mobmind::world::tick::run_world_tick;
use mobmind::world::{World, WorldEvent};

// ============================================================================
// Test Behaviors
// ============================================================================

/// Runs a fixed three-step schedule forever; nothing interrupts it
struct Metronome;
static METRONOME: Metronome = Metronome;

static SCHED_THREE_STEP: Schedule = Schedule {
    name: "three_step",
    tasks: &[
        Task { kind: TaskKind::StopMoving, arg: 0.0 },
        Task { kind: TaskKind::Wait, arg: 0.2 },
        Task { kind: TaskKind::StopMoving, arg: 0.0 },
    ],
    interrupt_mask: Conditions::empty(),
    sound_mask: SoundMask::empty(),
};

impl Behavior for Metronome {
    fn name(&self) -> &'static str {
        "metronome"
    }
    fn classify(&self) -> Classify {
        Classify::Feral
    }
    fn schedule_for(&self, id: ScheduleId) -> &'static Schedule {
        match id {
            ScheduleId::IdleStand => &SCHED_THREE_STEP,
            other => library::resolve_default(other),
        }
    }
}

/// Only ever waits zero seconds
struct ZeroWaiter;
static ZERO_WAITER: ZeroWaiter = ZeroWaiter;

static SCHED_WAIT_ZERO: Schedule = Schedule {
    name: "wait_zero",
    tasks: &[Task { kind: TaskKind::Wait, arg: 0.0 }],
    interrupt_mask: Conditions::empty(),
    sound_mask: SoundMask::empty(),
};

impl Behavior for ZeroWaiter {
    fn name(&self) -> &'static str {
        "zero_waiter"
    }
    fn classify(&self) -> Classify {
        Classify::Feral
    }
    fn schedule_for(&self, id: ScheduleId) -> &'static Schedule {
        match id {
            ScheduleId::IdleStand => &SCHED_WAIT_ZERO,
            other => library::resolve_default(other),
        }
    }
}

/// Tries to walk to a sound it never heard; the schedule must fail
struct SoundChaser;
static SOUND_CHASER: SoundChaser = SoundChaser;

static SCHED_CHASE_NOTHING: Schedule = Schedule {
    name: "chase_nothing",
    tasks: &[
        Task { kind: TaskKind::RouteToSound, arg: 0.0 },
        Task { kind: TaskKind::RunRoute, arg: 0.0 },
    ],
    interrupt_mask: Conditions::empty(),
    sound_mask: SoundMask::empty(),
};

impl Behavior for SoundChaser {
    fn name(&self) -> &'static str {
        "sound_chaser"
    }
    fn classify(&self) -> Classify {
        Classify::Feral
    }
    fn schedule_for(&self, id: ScheduleId) -> &'static Schedule {
        match id {
            ScheduleId::IdleStand => &SCHED_CHASE_NOTHING,
            other => library::resolve_default(other),
        }
    }
}

/// World with an observer close enough that sensing never culls out,
/// but outside everyone's vision radius so nothing targets it
fn observed_world(seed: u64) -> World {
    let mut world = World::new(seed);
    world.spawn(&PLAYER_PROXY, "observer", Vec3::new(0.0, -600.0, 0.0));
    world
}

// ============================================================================
// Uninterrupted Execution
// ============================================================================

#[test]
fn test_schedule_completes_every_task_then_reenters_selector() {
    let mut world = observed_world(1);
    world.spawn(&METRONOME, "metro", Vec3::ZERO);

    let mut completions = 0;
    let mut schedule_completions = 0;
    let mut starts = 0;
    for _ in 0..40 {
        for event in run_world_tick(&mut world) {
            match event {
                WorldEvent::TaskCompleted { .. } => completions += 1,
                WorldEvent::ScheduleCompleted { schedule, .. } => {
                    assert_eq!(schedule, "three_step");
                    schedule_completions += 1;
                }
                WorldEvent::ScheduleStarted { schedule, .. } => {
                    assert_eq!(schedule, "three_step");
                    starts += 1;
                }
                WorldEvent::TaskFailed { .. } | WorldEvent::ScheduleFailed { .. } => {
                    panic!("nothing should fail here")
                }
                _ => {}
            }
        }
    }

    assert!(schedule_completions >= 2, "schedule should cycle");
    // Exactly N task completions per finished run; the final run may
    // still be mid-flight when the loop stops
    let n = SCHED_THREE_STEP.tasks.len();
    assert!(completions >= schedule_completions * n);
    assert!(completions < (schedule_completions + 1) * n);
    // Every completion hands control back to the selector, which starts
    // the schedule again
    assert!(starts > schedule_completions);
}

// ============================================================================
// Timed Task Edge: wait 0
// ============================================================================

#[test]
fn test_wait_zero_spans_a_full_tick() {
    let mut world = observed_world(2);
    world.spawn(&ZERO_WAITER, "waiter", Vec3::ZERO);

    // Tick 0: the schedule starts and the wait task begins
    let events = run_world_tick(&mut world);
    assert!(events
        .iter()
        .any(|e| matches!(e, WorldEvent::ScheduleStarted { schedule, .. } if *schedule == "wait_zero")));
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, WorldEvent::TaskCompleted { kind: TaskKind::Wait, .. })),
        "a zero wait must not complete on its starting tick"
    );

    // Tick 1: now it may complete
    let events = run_world_tick(&mut world);
    assert!(events
        .iter()
        .any(|e| matches!(e, WorldEvent::TaskCompleted { kind: TaskKind::Wait, .. })));
}

// ============================================================================
// Failure Routing
// ============================================================================

#[test]
fn test_failed_task_falls_back_to_fail_schedule() {
    let mut world = observed_world(3);
    world.spawn(&SOUND_CHASER, "chaser", Vec3::ZERO);

    // Tick 0: chase_nothing starts and its first task fails immediately
    let events = run_world_tick(&mut world);
    assert!(events
        .iter()
        .any(|e| matches!(e, WorldEvent::TaskFailed { kind: TaskKind::RouteToSound, .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, WorldEvent::ScheduleFailed { schedule, .. } if *schedule == "chase_nothing")));

    // Tick 1: the designated fail schedule takes over
    let events = run_world_tick(&mut world);
    assert!(events
        .iter()
        .any(|e| matches!(e, WorldEvent::ScheduleStarted { schedule, .. } if *schedule == "fail")));
}

#[test]
fn test_set_fail_schedule_overrides_failure_target() {
    // Chase an enemy whose route is blocked: SCHED_CHASE_ENEMY sets its
    // fail schedule to combat_face before routing
    let mut world = observed_world(4);
    // Wall between the shambler and its prey, so the route is blocked
    world.add_occluder(Vec3::new(-20.0, 40.0, -64.0), Vec3::new(20.0, 60.0, 64.0));
    let hunter = world.spawn(&SHAMBLER, "hunter", Vec3::ZERO);
    let prey = world.spawn(&STALKER, "prey", Vec3::new(0.0, 300.0, 0.0));

    // Hand the shambler its enemy directly; the wall keeps it occluded
    let prey_pos = world.monster(prey).unwrap().position;
    let now = world.time();
    world
        .monster_mut(hunter)
        .unwrap()
        .enemy
        .set(prey, prey_pos, now);

    let mut chase_failed = false;
    let mut recovered_into_combat_face = false;
    for _ in 0..30 {
        for event in run_world_tick(&mut world) {
            match event {
                WorldEvent::ScheduleFailed { schedule, .. } if schedule == "chase_enemy" => {
                    chase_failed = true;
                }
                WorldEvent::ScheduleStarted { schedule, .. }
                    if schedule == "combat_face" && chase_failed =>
                {
                    recovered_into_combat_face = true;
                }
                _ => {}
            }
        }
        if recovered_into_combat_face {
            break;
        }
    }

    assert!(chase_failed, "blocked route should fail the chase");
    assert!(
        recovered_into_combat_face,
        "failure should route to the schedule named by SetFailSchedule"
    );
}

// ============================================================================
// Interrupts
// ============================================================================

#[test]
fn test_light_damage_interrupts_idle_schedule_at_task_boundary() {
    let mut world = observed_world(5);
    let loafer = world.spawn(&STALKER, "loafer", Vec3::ZERO);

    // Let it settle into idle standing
    for _ in 0..3 {
        run_world_tick(&mut world);
    }

    world.apply_damage(loafer, 5.0, None);

    let mut interrupted = false;
    for _ in 0..3 {
        for event in run_world_tick(&mut world) {
            if let WorldEvent::ScheduleInterrupted { interrupts, .. } = event {
                assert!(interrupts.contains(Conditions::LIGHT_DAMAGE));
                interrupted = true;
            }
        }
        if interrupted {
            break;
        }
    }
    assert!(interrupted, "light damage should abort a standing schedule");
}

#[test]
fn test_attack_in_progress_shrugs_off_light_damage_after_flinching() {
    let mut world = observed_world(6);
    let brute = world.spawn(&SHAMBLER, "brute", Vec3::ZERO);
    // A player dummy in claw range: hated, never fights back
    world.spawn(&PLAYER_PROXY, "dummy", Vec3::new(40.0, 0.0, 0.0));

    // Wait for the first melee schedule
    let mut attacking = false;
    for _ in 0..20 {
        for event in run_world_tick(&mut world) {
            if matches!(&event, WorldEvent::ScheduleStarted { schedule, .. } if *schedule == "melee_attack1")
            {
                attacking = true;
            }
        }
        if attacking {
            break;
        }
    }
    assert!(attacking, "shambler should start attacking the dummy");

    // First light hit: the flinch is taken
    world.apply_damage(brute, 5.0, None);
    let mut flinched = false;
    for _ in 0..3 {
        for event in run_world_tick(&mut world) {
            if let WorldEvent::ScheduleInterrupted { interrupts, .. } = &event {
                if interrupts.contains(Conditions::LIGHT_DAMAGE) {
                    flinched = true;
                }
            }
        }
        if flinched {
            break;
        }
    }
    assert!(flinched, "the first light hit should interrupt");
    assert!(world.monster(brute).unwrap().next_flinch > world.time());

    // Get back into the swing, then hit again inside the flinch delay:
    // the attack task must not be aborted by light damage this time
    let mut reattacking = false;
    for _ in 0..10 {
        for event in run_world_tick(&mut world) {
            if matches!(&event, WorldEvent::ScheduleStarted { schedule, .. } if *schedule == "melee_attack1")
            {
                reattacking = true;
            }
        }
        if reattacking {
            break;
        }
    }
    assert!(reattacking);

    // Step to the attack task itself (past stop/face), then wound it
    for _ in 0..2 {
        run_world_tick(&mut world);
    }
    world.apply_damage(brute, 5.0, None);
    let events = run_world_tick(&mut world);
    let light_interrupt = events.iter().any(|e| {
        matches!(e, WorldEvent::ScheduleInterrupted { interrupts, .. }
            if interrupts.contains(Conditions::LIGHT_DAMAGE))
    });
    assert!(
        !light_interrupt,
        "light damage inside the flinch delay must not abort the attack"
    );
}

// ============================================================================
// Selector Scenarios
// ============================================================================

#[test]
fn test_idle_monster_seeing_feared_entity_takes_cover() {
    let mut world = observed_world(7);
    // Something to hide behind
    world.add_occluder(Vec3::new(-120.0, -20.0, -64.0), Vec3::new(-100.0, 20.0, 64.0));
    // Pack hunters fear the predator
    world.spawn(&STALKER, "scared", Vec3::ZERO);
    world.spawn(&SHAMBLER, "terror", Vec3::new(300.0, 0.0, 0.0));

    let events = run_world_tick(&mut world);
    assert!(
        events.iter().any(|e| matches!(
            e,
            WorldEvent::ScheduleStarted { schedule, monster, .. }
                if *schedule == "take_cover_from_fear" && monster == "scared"
        )),
        "seeing a feared entity while idle must select the fear-cover schedule"
    );
}

#[test]
fn test_monster_without_enemy_idles_safely() {
    // A lone monster must always resolve to some schedule and stand
    // still rather than leave task state undefined
    let mut world = observed_world(8);
    let loner = world.spawn(&SHAMBLER, "loner", Vec3::ZERO);

    for _ in 0..10 {
        run_world_tick(&mut world);
    }
    let mon = world.monster(loner).unwrap();
    assert!(mon.runner.schedule().is_some());
    assert_eq!(mon.position, Vec3::ZERO);
    assert_eq!(mon.velocity, Vec3::ZERO);
}

#[test]
fn test_enemy_death_routes_to_enemy_dead_schedule() {
    let mut world = observed_world(9);
    let hunter = world.spawn(&SHAMBLER, "hunter", Vec3::ZERO);
    let prey = world.spawn(&STALKER, "prey", Vec3::new(40.0, 0.0, 0.0));

    // Let the shambler acquire and start fighting
    for _ in 0..3 {
        run_world_tick(&mut world);
    }
    assert_eq!(world.monster(hunter).unwrap().enemy.enemy(), Some(prey));

    // Kill the prey out from under it
    world.apply_damage(prey, 1000.0, None);

    let mut saw_enemy_dead = false;
    for _ in 0..10 {
        for event in run_world_tick(&mut world) {
            if matches!(&event, WorldEvent::ScheduleStarted { schedule, .. } if *schedule == "enemy_dead")
            {
                saw_enemy_dead = true;
            }
        }
        if saw_enemy_dead {
            break;
        }
    }
    assert!(saw_enemy_dead);

    // The tracker lets go once the schedule's ForgetEnemy task runs
    for _ in 0..10 {
        run_world_tick(&mut world);
    }
    assert_eq!(world.monster(hunter).unwrap().enemy.enemy(), None);
}
