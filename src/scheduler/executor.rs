//! Task execution - one step of the active schedule per think
//!
//! `maintain` is the executor's whole surface: it checks interrupts at
//! the task boundary, asks the selector for a new schedule when needed,
//! and then starts or advances exactly one task. Nothing here suspends;
//! every call returns before the tick ends.

use super::TaskStatus;
use crate::conditions::Conditions;
use crate::core::types::MonsterHandle;
use crate::memory::MemoryFlags;
use crate::monster::{Monster, Route};
use crate::schedule::{ScheduleId, Task, TaskKind};
use crate::scheduler::selector::SelectionContext;
use crate::world::{World, WorldEvent};

/// Default arrival slack for built routes (world units)
const ROUTE_ARRIVE_DIST: f32 = 16.0;

/// Condition bits the active task wants ignored this think
///
/// This is what keeps an attack animation from being aborted by every
/// grazing hit: while the flinch-delay timer is running, attack tasks
/// mask out light damage. Heavy damage always interrupts.
fn ignored_conditions(mon: &Monster, now: f32) -> Conditions {
    let Some(schedule) = mon.runner.schedule() else {
        return Conditions::empty();
    };
    let Some(task) = schedule.tasks.get(mon.runner.task_index()) else {
        return Conditions::empty();
    };
    let attacking = matches!(
        task.kind,
        TaskKind::MeleeAttack1
            | TaskKind::MeleeAttack2
            | TaskKind::RangeAttack1
            | TaskKind::RangeAttack2
    );
    if attacking && now < mon.next_flinch {
        Conditions::LIGHT_DAMAGE
    } else {
        Conditions::empty()
    }
}

/// Drive the monster's schedule for one think
pub fn maintain(world: &mut World, handle: MonsterHandle, mon: &mut Monster) {
    let now = world.time();
    let tick = world.tick_count();

    // Interrupts are honored only here, between task steps; a running
    // task is never aborted mid-RunTask.
    if mon.runner.is_mid_schedule() {
        let schedule = mon.runner.schedule().unwrap();
        let interrupts =
            schedule.effective_interrupts() & mon.conditions & !ignored_conditions(mon, now);
        if !interrupts.is_empty() {
            if interrupts.contains(Conditions::LIGHT_DAMAGE)
                && !interrupts.contains(Conditions::HEAVY_DAMAGE)
            {
                // Taking this flinch buys immunity to the next ones
                mon.next_flinch = now + mon.behavior.flinch_delay(world.config());
            }
            // A hit interrupts once. The bits stay up for this think so
            // the selector can react to them, but the timestamps are
            // consumed so the next refresh drops them.
            if interrupts.intersects(Conditions::LIGHT_DAMAGE | Conditions::HEAVY_DAMAGE) {
                mon.last_light_damage = None;
                mon.last_heavy_damage = None;
            }
            tracing::debug!(
                monster = %mon.name,
                schedule = schedule.name,
                ?interrupts,
                "schedule interrupted"
            );
            world.push_event(WorldEvent::ScheduleInterrupted {
                monster: mon.name.clone(),
                schedule: schedule.name,
                interrupts,
            });
            mon.runner.abandon();
        }
    }

    if mon.runner.needs_new_schedule() {
        let id = if mon.runner.schedule_failed() {
            mon.runner.take_fail_target().unwrap_or(ScheduleId::Fail)
        } else {
            // The monster is outside the arena during its own think, so
            // leadership is read straight from the registry.
            let leader = mon.squad.and_then(|id| world.squads().get(id)).map(|s| s.leader());
            let ctx = SelectionContext {
                state: mon.state,
                conditions: mon.conditions,
                memory: &mon.memory,
                has_enemy: mon.enemy.enemy().is_some(),
                in_squad: mon.squad.is_some(),
                is_squad_leader: leader == Some(handle),
                now,
            };
            mon.behavior.select_schedule(&ctx)
        };
        let schedule = mon.behavior.schedule_for(id);
        mon.runner.begin(schedule, id, tick);
        // Schedule re-entry consumes the new-enemy edge
        mon.acknowledged_enemy = mon.enemy.enemy();
        tracing::debug!(monster = %mon.name, schedule = schedule.name, "schedule started");
        world.push_event(WorldEvent::ScheduleStarted {
            monster: mon.name.clone(),
            schedule: schedule.name,
        });
    }

    step_task(world, handle, mon);
}

/// Start or advance the current task, then process its outcome
fn step_task(world: &mut World, handle: MonsterHandle, mon: &mut Monster) {
    let Some(schedule) = mon.runner.schedule() else {
        return;
    };
    let Some(&task) = schedule.tasks.get(mon.runner.task_index()) else {
        // A schedule with no tasks finishes immediately
        mon.runner.set_task_status(TaskStatus::Complete);
        mon.runner.advance_task();
        return;
    };

    match mon.runner.task_status() {
        TaskStatus::NotStarted => {
            mon.runner.note_task_started(world.tick_count());
            let status = start_task(world, handle, mon, task);
            mon.runner.set_task_status(status);
        }
        TaskStatus::Running => {
            let status = run_task(world, handle, mon, task);
            mon.runner.set_task_status(status);
        }
        TaskStatus::Complete | TaskStatus::Failed => {}
    }

    match mon.runner.task_status() {
        TaskStatus::Complete => {
            tracing::trace!(monster = %mon.name, kind = ?task.kind, "task complete");
            world.push_event(WorldEvent::TaskCompleted {
                monster: mon.name.clone(),
                kind: task.kind,
            });
            mon.runner.advance_task();
            if mon.runner.needs_new_schedule() {
                world.push_event(WorldEvent::ScheduleCompleted {
                    monster: mon.name.clone(),
                    schedule: schedule.name,
                });
            }
        }
        TaskStatus::Failed => {
            tracing::debug!(monster = %mon.name, kind = ?task.kind, "task failed");
            world.push_event(WorldEvent::TaskFailed {
                monster: mon.name.clone(),
                kind: task.kind,
            });
            if matches!(
                task.kind,
                TaskKind::RouteToEnemyLkp
                    | TaskKind::RouteToCoverFromEnemy
                    | TaskKind::RouteToCoverFromThreat
                    | TaskKind::RouteToSound
                    | TaskKind::RunRoute
            ) {
                let retry = world.config().route_retry_delay;
                mon.memory
                    .remember(MemoryFlags::MOVE_FAILED, Some(world.time() + retry));
            }
            mon.runner.mark_failed();
            world.push_event(WorldEvent::ScheduleFailed {
                monster: mon.name.clone(),
                schedule: schedule.name,
            });
        }
        _ => {}
    }
}

/// Initialize task-local state; instant tasks complete right here
fn start_task(world: &mut World, handle: MonsterHandle, mon: &mut Monster, task: Task) -> TaskStatus {
    let now = world.time();
    match task.kind {
        TaskKind::StopMoving => {
            mon.route = None;
            mon.velocity = glam::Vec3::ZERO;
            TaskStatus::Complete
        }
        TaskKind::FaceEnemy => {
            if mon.enemy.enemy().is_some() {
                TaskStatus::Running
            } else {
                TaskStatus::Failed
            }
        }
        TaskKind::Wait => {
            mon.runner.wait_until = now + task.arg.max(0.0);
            TaskStatus::Running
        }
        TaskKind::WaitRandom => {
            let span = task.arg.max(0.0);
            mon.runner.wait_until = now + world.rng_range(0.0, span);
            TaskStatus::Running
        }
        TaskKind::RouteToEnemyLkp => {
            if mon.enemy.enemy().is_none() {
                return TaskStatus::Failed;
            }
            let target = mon.enemy.lkp();
            build_route(world, mon, target, ROUTE_ARRIVE_DIST)
        }
        TaskKind::RouteToCoverFromEnemy => {
            if mon.enemy.enemy().is_none() {
                return TaskStatus::Failed;
            }
            let threat = mon.enemy.lkp();
            route_to_cover(world, mon, threat)
        }
        TaskKind::RouteToCoverFromThreat => {
            // Danger sounds and feared entities both land here; fall
            // back to the enemy LKP if neither was sensed this tick.
            let threat = match mon.threat_origin {
                Some(origin) => origin,
                None if mon.enemy.enemy().is_some() => mon.enemy.lkp(),
                None => return TaskStatus::Failed,
            };
            route_to_cover(world, mon, threat)
        }
        TaskKind::RouteToSound => match mon.sound_origin {
            Some(origin) => build_route(world, mon, origin, ROUTE_ARRIVE_DIST * 4.0),
            None => TaskStatus::Failed,
        },
        TaskKind::RunRoute => {
            if mon.route.is_some() {
                TaskStatus::Running
            } else {
                TaskStatus::Failed
            }
        }
        TaskKind::MeleeAttack1
        | TaskKind::MeleeAttack2
        | TaskKind::RangeAttack1
        | TaskKind::RangeAttack2 => {
            if mon.enemy.enemy().is_none() {
                return TaskStatus::Failed;
            }
            mon.runner.wait_until = now + task.arg.max(0.0);
            TaskStatus::Running
        }
        TaskKind::SetFailSchedule => match ScheduleId::from_arg(task.arg) {
            Some(id) => {
                mon.runner.set_fail_override(id);
                TaskStatus::Complete
            }
            None => TaskStatus::Failed,
        },
        TaskKind::Remember => {
            let bits = MemoryFlags::from_bits_truncate(task.arg as u16);
            mon.memory.remember(bits, None);
            TaskStatus::Complete
        }
        TaskKind::Forget => {
            let bits = MemoryFlags::from_bits_truncate(task.arg as u16);
            mon.memory.forget(bits);
            TaskStatus::Complete
        }
        TaskKind::ForgetEnemy => {
            mon.enemy.clear();
            // Stay wary for a while instead of dropping straight to idle
            let linger = world.config().alert_linger;
            mon.memory
                .remember(MemoryFlags::SUSPICIOUS, Some(now + linger));
            TaskStatus::Complete
        }
        TaskKind::Custom(tag) => {
            let behavior = mon.behavior;
            behavior.start_custom_task(tag, task.arg, world, handle, mon)
        }
    }
}

/// Advance a running task by one think
fn run_task(world: &mut World, handle: MonsterHandle, mon: &mut Monster, task: Task) -> TaskStatus {
    let now = world.time();
    let dt = world.config().tick_seconds;
    let yaw_speed = world.config().yaw_speed_deg;

    match task.kind {
        TaskKind::FaceEnemy => {
            if mon.enemy.enemy().is_none() {
                return TaskStatus::Failed;
            }
            let target = mon.enemy.lkp();
            if mon.turn_toward(target, yaw_speed, dt) {
                TaskStatus::Complete
            } else {
                TaskStatus::Running
            }
        }
        TaskKind::Wait | TaskKind::WaitRandom => {
            // A wait of zero still spans a full tick: completion is
            // forbidden on the tick the task started.
            if world.tick_count() > mon.runner.task_started_tick() && now >= mon.runner.wait_until {
                TaskStatus::Complete
            } else {
                TaskStatus::Running
            }
        }
        TaskKind::RunRoute => advance_route(mon, dt),
        TaskKind::MeleeAttack1 | TaskKind::MeleeAttack2 => {
            let Some(enemy) = mon.enemy.enemy() else {
                return TaskStatus::Failed;
            };
            let Some(enemy_pos) = world.monster(enemy).map(|e| e.position) else {
                return TaskStatus::Failed;
            };
            mon.turn_toward(enemy_pos, yaw_speed, dt);
            if world.tick_count() > mon.runner.task_started_tick() && now >= mon.runner.wait_until {
                // Swing lands only if the enemy is still inside reach
                let reach = world.config().melee_range * 1.25;
                if mon.position.distance(enemy_pos) <= reach {
                    let damage = mon.behavior.melee_damage();
                    world.apply_damage(enemy, damage, Some(handle));
                }
                world.emit_sound(
                    mon.position,
                    crate::conditions::SoundMask::COMBAT,
                    world.config().sense_radius * 0.5,
                );
                TaskStatus::Complete
            } else {
                TaskStatus::Running
            }
        }
        TaskKind::RangeAttack1 | TaskKind::RangeAttack2 => {
            let Some(enemy) = mon.enemy.enemy() else {
                return TaskStatus::Failed;
            };
            let Some(enemy_pos) = world.monster(enemy).map(|e| e.position) else {
                return TaskStatus::Failed;
            };
            mon.turn_toward(enemy_pos, yaw_speed, dt);
            if world.tick_count() > mon.runner.task_started_tick() && now >= mon.runner.wait_until {
                // The shot goes out regardless; it only connects with a
                // clear line of sight.
                if world.visible(mon.position, enemy_pos) {
                    let damage = mon.behavior.range_damage();
                    world.apply_damage(enemy, damage, Some(handle));
                }
                world.emit_sound(
                    mon.position,
                    crate::conditions::SoundMask::COMBAT,
                    world.config().sense_radius,
                );
                TaskStatus::Complete
            } else {
                TaskStatus::Running
            }
        }
        TaskKind::Custom(tag) => {
            let behavior = mon.behavior;
            behavior.run_custom_task(tag, task.arg, world, handle, mon)
        }
        // Instant kinds never stay Running; be safe if they somehow do
        _ => TaskStatus::Complete,
    }
}

/// Build a straight route, failing when the segment is blocked
fn build_route(world: &World, mon: &mut Monster, target: glam::Vec3, arrive: f32) -> TaskStatus {
    // Starting to move means leaving whatever cover was held
    mon.memory.forget(MemoryFlags::IN_COVER);
    if world.visible(mon.position, target) {
        mon.route = Some(Route {
            target,
            arrive_dist: arrive,
        });
        TaskStatus::Complete
    } else {
        TaskStatus::Failed
    }
}

fn route_to_cover(world: &mut World, mon: &mut Monster, threat: glam::Vec3) -> TaskStatus {
    mon.memory.forget(MemoryFlags::IN_COVER);
    match world.find_cover(mon.position, threat) {
        Some(point) => {
            mon.route = Some(Route {
                target: point,
                arrive_dist: ROUTE_ARRIVE_DIST,
            });
            TaskStatus::Complete
        }
        None => TaskStatus::Failed,
    }
}

/// Move along the current route; arrival completes, loss of route fails
pub(crate) fn advance_route(mon: &mut Monster, dt: f32) -> TaskStatus {
    let Some(route) = mon.route else {
        return TaskStatus::Failed;
    };
    let to_target = route.target - mon.position;
    let dist = to_target.length();
    let step = mon.speed * dt;

    if dist <= route.arrive_dist.max(step) {
        mon.position = route.target;
        mon.velocity = glam::Vec3::ZERO;
        mon.route = None;
        TaskStatus::Complete
    } else {
        let dir = to_target / dist;
        mon.velocity = dir * mon.speed;
        mon.position += dir * step;
        TaskStatus::Running
    }
}
