//! The shared schedule library
//!
//! These are the generic behavior templates every monster type starts
//! from. A behavior overrides `schedule_for` for the ids it wants to
//! specialize; everything else resolves here.

use super::{Schedule, ScheduleId, Task, TaskKind};
use crate::conditions::{Conditions, SoundMask};
use crate::memory::MemoryFlags;

/// Safe fallback: stop, breathe, hand control back to the selector.
///
/// Runs whenever a schedule fails without a designated fail schedule.
pub static SCHED_FAIL: Schedule = Schedule {
    name: "fail",
    tasks: &[
        Task { kind: TaskKind::StopMoving, arg: 0.0 },
        Task { kind: TaskKind::Wait, arg: 0.8 },
    ],
    interrupt_mask: Conditions::NEW_ENEMY
        .union(Conditions::SEE_ENEMY)
        .union(Conditions::HEAVY_DAMAGE),
    sound_mask: SoundMask::DANGER,
};

pub static SCHED_IDLE_STAND: Schedule = Schedule {
    name: "idle_stand",
    tasks: &[
        Task { kind: TaskKind::StopMoving, arg: 0.0 },
        Task { kind: TaskKind::WaitRandom, arg: 5.0 },
    ],
    // Idle monsters react to everything
    interrupt_mask: Conditions::SIGHT_BITS
        .union(Conditions::NEW_ENEMY)
        .union(Conditions::LIGHT_DAMAGE)
        .union(Conditions::HEAVY_DAMAGE),
    sound_mask: SoundMask::DANGER
        .union(SoundMask::COMBAT)
        .union(SoundMask::PLAYER)
        .union(SoundMask::WORLD),
};

pub static SCHED_ALERT_STAND: Schedule = Schedule {
    name: "alert_stand",
    tasks: &[
        Task { kind: TaskKind::StopMoving, arg: 0.0 },
        Task { kind: TaskKind::WaitRandom, arg: 3.0 },
    ],
    interrupt_mask: Conditions::SIGHT_BITS
        .union(Conditions::NEW_ENEMY)
        .union(Conditions::LIGHT_DAMAGE)
        .union(Conditions::HEAVY_DAMAGE),
    sound_mask: SoundMask::DANGER
        .union(SoundMask::COMBAT)
        .union(SoundMask::PLAYER),
};

/// Stand ground and track the enemy; the default combat filler when no
/// attack is available and nothing forces movement.
pub static SCHED_COMBAT_FACE: Schedule = Schedule {
    name: "combat_face",
    tasks: &[
        Task { kind: TaskKind::StopMoving, arg: 0.0 },
        Task { kind: TaskKind::FaceEnemy, arg: 0.0 },
        Task { kind: TaskKind::Wait, arg: 0.5 },
    ],
    interrupt_mask: Conditions::ATTACK_BITS
        .union(Conditions::NEW_ENEMY)
        .union(Conditions::ENEMY_DEAD)
        .union(Conditions::HEAVY_DAMAGE)
        .union(Conditions::LIGHT_DAMAGE),
    sound_mask: SoundMask::DANGER,
};

/// Run to the enemy's last known position.
///
/// Interrupted the moment the enemy comes back into view so the selector
/// can pick an attack instead of blindly finishing the route.
pub static SCHED_CHASE_ENEMY: Schedule = Schedule {
    name: "chase_enemy",
    tasks: &[
        Task {
            kind: TaskKind::SetFailSchedule,
            arg: ScheduleId::CombatFace as u8 as f32,
        },
        Task { kind: TaskKind::RouteToEnemyLkp, arg: 0.0 },
        Task { kind: TaskKind::RunRoute, arg: 0.0 },
        Task { kind: TaskKind::StopMoving, arg: 0.0 },
    ],
    interrupt_mask: Conditions::ATTACK_BITS
        .union(Conditions::SEE_ENEMY)
        .union(Conditions::NEW_ENEMY)
        .union(Conditions::ENEMY_DEAD)
        .union(Conditions::HEAVY_DAMAGE),
    sound_mask: SoundMask::DANGER,
};

/// Close distance on a visible enemy until an attack becomes available.
pub static SCHED_REPOSITION: Schedule = Schedule {
    name: "reposition",
    tasks: &[
        Task {
            kind: TaskKind::SetFailSchedule,
            arg: ScheduleId::CombatFace as u8 as f32,
        },
        Task { kind: TaskKind::RouteToEnemyLkp, arg: 0.0 },
        Task { kind: TaskKind::RunRoute, arg: 0.0 },
        Task { kind: TaskKind::StopMoving, arg: 0.0 },
    ],
    interrupt_mask: Conditions::ATTACK_BITS
        .union(Conditions::NEW_ENEMY)
        .union(Conditions::ENEMY_DEAD)
        .union(Conditions::HEAVY_DAMAGE),
    sound_mask: SoundMask::DANGER,
};

pub static SCHED_TAKE_COVER: Schedule = Schedule {
    name: "take_cover",
    tasks: &[
        Task { kind: TaskKind::RouteToCoverFromEnemy, arg: 0.0 },
        Task { kind: TaskKind::RunRoute, arg: 0.0 },
        Task {
            kind: TaskKind::Remember,
            arg: MemoryFlags::IN_COVER.bits() as f32,
        },
        Task { kind: TaskKind::FaceEnemy, arg: 0.0 },
    ],
    interrupt_mask: Conditions::NEW_ENEMY.union(Conditions::ENEMY_DEAD),
    sound_mask: SoundMask::DANGER,
};

pub static SCHED_TAKE_COVER_FROM_THREAT: Schedule = Schedule {
    name: "take_cover_from_threat",
    tasks: &[
        Task { kind: TaskKind::RouteToCoverFromThreat, arg: 0.0 },
        Task { kind: TaskKind::RunRoute, arg: 0.0 },
        Task {
            kind: TaskKind::Remember,
            arg: MemoryFlags::IN_COVER.bits() as f32,
        },
        Task { kind: TaskKind::Wait, arg: 2.0 },
    ],
    interrupt_mask: Conditions::NEW_ENEMY.union(Conditions::HEAVY_DAMAGE),
    sound_mask: SoundMask::empty(),
};

/// Same movement as the threat variant, distinct id so feared entities
/// can be given their own treatment by subclasses.
pub static SCHED_TAKE_COVER_FROM_FEAR: Schedule = Schedule {
    name: "take_cover_from_fear",
    tasks: &[
        Task { kind: TaskKind::RouteToCoverFromThreat, arg: 0.0 },
        Task { kind: TaskKind::RunRoute, arg: 0.0 },
        Task {
            kind: TaskKind::Remember,
            arg: MemoryFlags::IN_COVER.bits() as f32,
        },
        Task { kind: TaskKind::Wait, arg: 3.0 },
    ],
    interrupt_mask: Conditions::NEW_ENEMY.union(Conditions::HEAVY_DAMAGE),
    sound_mask: SoundMask::empty(),
};

/// Walk toward a combat sound and look around.
pub static SCHED_INVESTIGATE_SOUND: Schedule = Schedule {
    name: "investigate_sound",
    tasks: &[
        Task {
            kind: TaskKind::SetFailSchedule,
            arg: ScheduleId::AlertStand as u8 as f32,
        },
        Task { kind: TaskKind::RouteToSound, arg: 0.0 },
        Task { kind: TaskKind::RunRoute, arg: 0.0 },
        Task { kind: TaskKind::StopMoving, arg: 0.0 },
        Task { kind: TaskKind::WaitRandom, arg: 2.0 },
    ],
    interrupt_mask: Conditions::SIGHT_BITS
        .union(Conditions::NEW_ENEMY)
        .union(Conditions::LIGHT_DAMAGE)
        .union(Conditions::HEAVY_DAMAGE),
    sound_mask: SoundMask::DANGER,
};

pub static SCHED_MELEE_ATTACK1: Schedule = Schedule {
    name: "melee_attack1",
    tasks: &[
        Task { kind: TaskKind::StopMoving, arg: 0.0 },
        Task { kind: TaskKind::FaceEnemy, arg: 0.0 },
        Task { kind: TaskKind::MeleeAttack1, arg: 0.6 },
    ],
    // LIGHT_DAMAGE here is subject to the flinch-delay ignore mask
    interrupt_mask: Conditions::NEW_ENEMY
        .union(Conditions::ENEMY_DEAD)
        .union(Conditions::HEAVY_DAMAGE)
        .union(Conditions::LIGHT_DAMAGE),
    sound_mask: SoundMask::DANGER,
};

pub static SCHED_MELEE_ATTACK2: Schedule = Schedule {
    name: "melee_attack2",
    tasks: &[
        Task { kind: TaskKind::StopMoving, arg: 0.0 },
        Task { kind: TaskKind::FaceEnemy, arg: 0.0 },
        Task { kind: TaskKind::MeleeAttack2, arg: 0.9 },
    ],
    interrupt_mask: Conditions::NEW_ENEMY
        .union(Conditions::ENEMY_DEAD)
        .union(Conditions::HEAVY_DAMAGE)
        .union(Conditions::LIGHT_DAMAGE),
    sound_mask: SoundMask::DANGER,
};

pub static SCHED_RANGE_ATTACK1: Schedule = Schedule {
    name: "range_attack1",
    tasks: &[
        Task { kind: TaskKind::StopMoving, arg: 0.0 },
        Task { kind: TaskKind::FaceEnemy, arg: 0.0 },
        Task { kind: TaskKind::RangeAttack1, arg: 0.8 },
    ],
    interrupt_mask: Conditions::NEW_ENEMY
        .union(Conditions::ENEMY_DEAD)
        .union(Conditions::ENEMY_OCCLUDED)
        .union(Conditions::HEAVY_DAMAGE)
        .union(Conditions::LIGHT_DAMAGE),
    sound_mask: SoundMask::DANGER,
};

pub static SCHED_RANGE_ATTACK2: Schedule = Schedule {
    name: "range_attack2",
    tasks: &[
        Task { kind: TaskKind::StopMoving, arg: 0.0 },
        Task { kind: TaskKind::FaceEnemy, arg: 0.0 },
        Task { kind: TaskKind::RangeAttack2, arg: 1.2 },
    ],
    interrupt_mask: Conditions::NEW_ENEMY
        .union(Conditions::ENEMY_DEAD)
        .union(Conditions::ENEMY_OCCLUDED)
        .union(Conditions::HEAVY_DAMAGE)
        .union(Conditions::LIGHT_DAMAGE),
    sound_mask: SoundMask::DANGER,
};

/// The enemy is gone; savor it briefly, then let go of the tracker.
pub static SCHED_ENEMY_DEAD: Schedule = Schedule {
    name: "enemy_dead",
    tasks: &[
        Task { kind: TaskKind::StopMoving, arg: 0.0 },
        Task { kind: TaskKind::Wait, arg: 0.5 },
        Task { kind: TaskKind::ForgetEnemy, arg: 0.0 },
    ],
    interrupt_mask: Conditions::NEW_ENEMY.union(Conditions::HEAVY_DAMAGE),
    sound_mask: SoundMask::DANGER,
};

/// Stagger from a hit. Not interruptible by further light damage; the
/// flinch delay in the executor covers re-entry.
pub static SCHED_FLINCH: Schedule = Schedule {
    name: "flinch",
    tasks: &[
        Task { kind: TaskKind::StopMoving, arg: 0.0 },
        Task { kind: TaskKind::Wait, arg: 0.3 },
    ],
    interrupt_mask: Conditions::HEAVY_DAMAGE,
    sound_mask: SoundMask::empty(),
};

/// Base resolution from symbolic id to concrete schedule
///
/// Behaviors delegate here for every id they do not override.
pub fn resolve_default(id: ScheduleId) -> &'static Schedule {
    match id {
        ScheduleId::Fail => &SCHED_FAIL,
        ScheduleId::IdleStand => &SCHED_IDLE_STAND,
        ScheduleId::AlertStand => &SCHED_ALERT_STAND,
        ScheduleId::CombatFace => &SCHED_COMBAT_FACE,
        ScheduleId::ChaseEnemy => &SCHED_CHASE_ENEMY,
        ScheduleId::Reposition => &SCHED_REPOSITION,
        ScheduleId::TakeCover => &SCHED_TAKE_COVER,
        ScheduleId::TakeCoverFromThreat => &SCHED_TAKE_COVER_FROM_THREAT,
        ScheduleId::TakeCoverFromFear => &SCHED_TAKE_COVER_FROM_FEAR,
        ScheduleId::InvestigateSound => &SCHED_INVESTIGATE_SOUND,
        ScheduleId::MeleeAttack1 => &SCHED_MELEE_ATTACK1,
        ScheduleId::MeleeAttack2 => &SCHED_MELEE_ATTACK2,
        ScheduleId::RangeAttack1 => &SCHED_RANGE_ATTACK1,
        ScheduleId::RangeAttack2 => &SCHED_RANGE_ATTACK2,
        ScheduleId::EnemyDead => &SCHED_ENEMY_DEAD,
        ScheduleId::Flinch => &SCHED_FLINCH,
        // Unresolved type-specific ids land on the safe default
        ScheduleId::Custom1 | ScheduleId::Custom2 => &SCHED_FAIL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_id_resolves() {
        // from_arg covers the whole enumeration; make sure resolution
        // agrees with it
        for raw in 0..=17u8 {
            let id = ScheduleId::from_arg(raw as f32).unwrap();
            let schedule = resolve_default(id);
            assert!(!schedule.tasks.is_empty(), "{} has no tasks", schedule.name);
        }
    }

    #[test]
    fn test_fail_schedule_stops_then_waits() {
        assert_eq!(SCHED_FAIL.tasks[0].kind, TaskKind::StopMoving);
        assert_eq!(SCHED_FAIL.tasks[1].kind, TaskKind::Wait);
    }

    #[test]
    fn test_chase_sets_fail_schedule_first() {
        let first = SCHED_CHASE_ENEMY.tasks[0];
        assert_eq!(first.kind, TaskKind::SetFailSchedule);
        assert_eq!(ScheduleId::from_arg(first.arg), Some(ScheduleId::CombatFace));
    }
}
