//! Tick system - orchestrates the per-monster think pipeline
//!
//! One call to `run_world_tick` advances the simulation one step:
//! sweep sounds, rebuild the spatial grid, think every monster in arena
//! index order, reap the dead, advance the clock. Strictly
//! single-threaded; cross-entity mutations made during a think are
//! visible to every monster processed afterwards in the same tick.

use super::{World, WorldEvent};
use crate::conditions::Conditions;
use crate::core::types::{MonsterHandle, MonsterState};
use crate::memory::MemoryFlags;
use crate::monster::{AttackCheck, Monster};
use crate::scheduler::executor;
use crate::senses;

/// Run a single simulation tick and return the events it produced
pub fn run_world_tick(world: &mut World) -> Vec<WorldEvent> {
    world.sweep_sounds();
    world.rebuild_spatial();

    // Snapshot: monsters spawned mid-tick think starting next tick
    let handles = world.monsters.handles();
    for handle in handles {
        let Some(mut mon) = world.monsters.take(handle) else {
            continue;
        };
        let thinks = mon.behavior.autonomous()
            && mon.is_alive()
            && mon.state != MonsterState::Scripted;
        if thinks {
            think(world, handle, &mut mon);
        }
        world.monsters.restore(handle, mon);
    }

    reap_dead(world);
    world.advance_tick();
    world.drain_events()
}

/// One monster's think: sense, track, transition, schedule
fn think(world: &mut World, handle: MonsterHandle, mon: &mut Monster) {
    let cull = world.config().sense_cull_distance;
    if world.player_within(mon.position, cull) {
        refresh_conditions(world, handle, mon);
        acquire_enemy(world, handle, mon);
    } else {
        // Nobody can observe this monster: skip sensing entirely and
        // leave last tick's conditions standing. Cheap and deliberately
        // approximate. The enemy handle is still validated so nothing
        // dangles.
        if let Some(enemy) = mon.enemy.enemy() {
            if world.monster(enemy).is_none() {
                mon.enemy.clear();
            }
        }
    }

    update_state(world, mon);
    executor::maintain(world, handle, mon);

    // Crude velocity history for the LKP extrapolation
    mon.recent_velocity = mon.recent_velocity * 0.7 + mon.velocity * 0.3;
}

/// Rebuild the condition set from current world state
///
/// Pure with respect to the bitset: calling this twice against an
/// unchanged world produces the same conditions. Also performs enemy
/// bookkeeping (LKP confirm/extrapolate, dangling-handle cleanup).
pub(crate) fn refresh_conditions(world: &World, handle: MonsterHandle, mon: &mut Monster) {
    let now = world.time();
    let cfg = world.config();

    mon.conditions = Conditions::empty();
    senses::sense_update(world, handle, mon);

    // Damage bits from recent-hit timestamps
    let window = cfg.damage_condition_window;
    if mon
        .last_light_damage
        .map(|t| now - t < window)
        .unwrap_or(false)
    {
        mon.conditions.insert(Conditions::LIGHT_DAMAGE);
    }
    if mon
        .last_heavy_damage
        .map(|t| now - t < window)
        .unwrap_or(false)
    {
        mon.conditions.insert(Conditions::HEAVY_DAMAGE);
    }

    if mon.memory.has(MemoryFlags::PROVOKED, now) {
        mon.conditions.insert(Conditions::PROVOKED);
    }

    // Enemy bookkeeping and capability checks
    if let Some(enemy) = mon.enemy.enemy() {
        match world.monster(enemy) {
            None => {
                // Removed from the world: not an error, just gone.
                // Stay wary and let the senses find a new target.
                mon.enemy.clear();
                mon.memory
                    .remember(MemoryFlags::SUSPICIOUS, Some(now + cfg.alert_linger));
            }
            Some(e) if !e.is_alive() => {
                mon.conditions.insert(Conditions::ENEMY_DEAD);
            }
            Some(e) => {
                let in_range = mon.position.distance(e.position) <= cfg.sense_radius;
                let visible = in_range && world.visible(mon.position, e.position);
                if visible {
                    mon.conditions.insert(Conditions::SEE_ENEMY);
                    mon.enemy.confirm(e.position, now);
                } else {
                    mon.conditions.insert(Conditions::ENEMY_OCCLUDED);
                    mon.enemy
                        .extrapolate(mon.recent_velocity, cfg.tick_seconds, cfg.lkp_extrapolation_max);
                }

                let check = AttackCheck {
                    distance: mon.position.distance(mon.enemy.lkp()),
                    visible,
                    config: cfg,
                };
                if mon.behavior.check_melee_attack1(&check) {
                    mon.conditions.insert(Conditions::CAN_MELEE_ATTACK1);
                }
                if mon.behavior.check_melee_attack2(&check) {
                    mon.conditions.insert(Conditions::CAN_MELEE_ATTACK2);
                }
                if mon.behavior.check_range_attack1(&check) {
                    mon.conditions.insert(Conditions::CAN_RANGE_ATTACK1);
                }
                if mon.behavior.check_range_attack2(&check) {
                    mon.conditions.insert(Conditions::CAN_RANGE_ATTACK2);
                }
            }
        }
    }

    // An enemy the schedule layer has not reacted to yet (sensed last
    // think, or pushed in by a squad-mate's call for help) counts as new
    // until a schedule re-entry acknowledges it.
    if mon.enemy.enemy().is_some() && mon.enemy.enemy() != mon.acknowledged_enemy {
        mon.conditions.insert(Conditions::NEW_ENEMY);
    }
}

/// Promote the vision scan's candidate into the enemy tracker
fn acquire_enemy(world: &mut World, handle: MonsterHandle, mon: &mut Monster) {
    let Some(candidate) = mon.sensed_enemy else {
        return;
    };
    if mon.enemy.enemy() == Some(candidate) {
        return;
    }
    // Keep the current enemy while it is still valid; candidates only
    // fill a vacancy
    if mon.enemy.enemy().is_some() && !mon.conditions.contains(Conditions::ENEMY_DEAD) {
        return;
    }

    let Some(pos) = world.monster(candidate).map(|e| e.position) else {
        return;
    };
    let now = world.time();
    mon.enemy.set(candidate, pos, now);
    mon.conditions.insert(Conditions::NEW_ENEMY);
    mon.conditions.insert(Conditions::SEE_ENEMY);
    mon.conditions.remove(Conditions::ENEMY_DEAD);

    tracing::debug!(monster = %mon.name, enemy = ?candidate, "enemy acquired");
    world.push_event(WorldEvent::EnemyAcquired {
        monster: mon.name.clone(),
        enemy: candidate,
    });

    let behavior = mon.behavior;
    behavior.on_new_enemy(world, handle, mon);
}

/// Idle / alert / combat transitions
fn update_state(world: &mut World, mon: &mut Monster) {
    let now = world.time();
    let linger = world.config().alert_linger;

    let next = if !mon.is_alive() {
        MonsterState::Dead
    } else if mon.state == MonsterState::Scripted {
        MonsterState::Scripted
    } else if mon.enemy.enemy().is_some() {
        MonsterState::Combat
    } else {
        let unsettling = Conditions::HEARING_BITS
            | Conditions::LIGHT_DAMAGE
            | Conditions::HEAVY_DAMAGE
            | Conditions::PROVOKED
            | Conditions::SEE_DISLIKE
            | Conditions::SEE_FEAR;
        if mon.conditions.intersects(unsettling) {
            // Refresh the wariness window while causes persist
            mon.memory
                .remember(MemoryFlags::SUSPICIOUS, Some(now + linger));
            MonsterState::Alert
        } else if mon.memory.has(MemoryFlags::SUSPICIOUS, now) {
            MonsterState::Alert
        } else {
            MonsterState::Idle
        }
    };

    if next != mon.state {
        tracing::debug!(monster = %mon.name, from = ?mon.state, to = ?next, "state change");
        world.push_event(WorldEvent::StateChanged {
            monster: mon.name.clone(),
            from: mon.state,
            to: next,
        });
        mon.state = next;
    }
}

/// Remove monsters whose health reached zero, unlinking squads first
fn reap_dead(world: &mut World) {
    let dead: Vec<MonsterHandle> = world
        .monsters
        .iter()
        .filter(|(_, m)| !m.is_alive())
        .map(|(h, _)| h)
        .collect();

    for handle in dead {
        let name = world
            .monster(handle)
            .map(|m| m.name.clone())
            .unwrap_or_default();

        // Unlink from the squad ring before the handle goes stale
        if world
            .monster(handle)
            .map(|m| m.squad.is_some())
            .unwrap_or(false)
        {
            let _ = world.squad_remove(handle);
        }

        world.monsters.remove(handle);
        tracing::debug!(monster = %name, "monster reaped");
        world.push_event(WorldEvent::MonsterDied { monster: name });
    }
}
