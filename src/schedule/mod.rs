//! Behavior templates: tasks, schedules, and their symbolic ids

pub mod library;

use crate::conditions::{Conditions, SoundMask};
use serde::{Deserialize, Serialize};

/// One atomic step within a schedule
///
/// The meaning of `arg` depends on the kind: a duration for waits and
/// attacks, a schedule id for [`TaskKind::SetFailSchedule`], raw memory
/// bits for [`TaskKind::Remember`] / [`TaskKind::Forget`], and an opaque
/// per-monster value for [`TaskKind::Custom`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Task {
    pub kind: TaskKind,
    pub arg: f32,
}

/// Closed enumeration of task kinds the executor understands
///
/// Monster-specific steps go through [`TaskKind::Custom`], which routes
/// to the monster's behavior hooks instead of the generic executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    /// Drop the current route and zero velocity
    StopMoving,
    /// Turn until facing the enemy's last known position
    FaceEnemy,
    /// Hold still for `arg` seconds (a zero arg still spans one full tick)
    Wait,
    /// Hold still for a random duration in `[0, arg]` seconds
    WaitRandom,
    /// Build a straight route to the enemy's last known position
    RouteToEnemyLkp,
    /// Build a route to a cover point away from the enemy
    RouteToCoverFromEnemy,
    /// Build a route to a cover point away from the current threat origin
    RouteToCoverFromThreat,
    /// Build a route toward the most recent interesting sound
    RouteToSound,
    /// Advance along the current route until arrival
    RunRoute,
    /// Execute the primary melee attack over `arg` seconds
    MeleeAttack1,
    /// Execute the secondary melee attack over `arg` seconds
    MeleeAttack2,
    /// Execute the primary ranged attack over `arg` seconds
    RangeAttack1,
    /// Execute the special ranged attack over `arg` seconds
    RangeAttack2,
    /// Override the fail schedule for the rest of this schedule;
    /// `arg` is a [`ScheduleId`] discriminant
    SetFailSchedule,
    /// Set memory bits given by `arg` (no expiry)
    Remember,
    /// Clear memory bits given by `arg`
    Forget,
    /// Drop the current enemy from the tracker
    ForgetEnemy,
    /// Monster-specific step handled by the behavior's task hooks
    Custom(u16),
}

/// Symbolic schedule id, resolvable per monster type
///
/// Behaviors override [`crate::monster::Behavior::schedule_for`] for the
/// ids whose concrete schedule differs; everything else falls through to
/// [`library::resolve_default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ScheduleId {
    Fail = 0,
    IdleStand = 1,
    AlertStand = 2,
    CombatFace = 3,
    ChaseEnemy = 4,
    Reposition = 5,
    TakeCover = 6,
    TakeCoverFromThreat = 7,
    TakeCoverFromFear = 8,
    InvestigateSound = 9,
    MeleeAttack1 = 10,
    MeleeAttack2 = 11,
    RangeAttack1 = 12,
    RangeAttack2 = 13,
    EnemyDead = 14,
    Flinch = 15,
    /// Type-specific slot; base resolution falls back to the fail schedule
    Custom1 = 16,
    /// Second type-specific slot
    Custom2 = 17,
}

impl ScheduleId {
    /// Recover an id from a task argument
    ///
    /// Returns `None` for arguments outside the enumeration, which the
    /// executor treats as a task failure rather than a panic.
    pub fn from_arg(arg: f32) -> Option<ScheduleId> {
        match arg as u8 {
            0 => Some(ScheduleId::Fail),
            1 => Some(ScheduleId::IdleStand),
            2 => Some(ScheduleId::AlertStand),
            3 => Some(ScheduleId::CombatFace),
            4 => Some(ScheduleId::ChaseEnemy),
            5 => Some(ScheduleId::Reposition),
            6 => Some(ScheduleId::TakeCover),
            7 => Some(ScheduleId::TakeCoverFromThreat),
            8 => Some(ScheduleId::TakeCoverFromFear),
            9 => Some(ScheduleId::InvestigateSound),
            10 => Some(ScheduleId::MeleeAttack1),
            11 => Some(ScheduleId::MeleeAttack2),
            12 => Some(ScheduleId::RangeAttack1),
            13 => Some(ScheduleId::RangeAttack2),
            14 => Some(ScheduleId::EnemyDead),
            15 => Some(ScheduleId::Flinch),
            16 => Some(ScheduleId::Custom1),
            17 => Some(ScheduleId::Custom2),
            _ => None,
        }
    }

    /// Encode this id as a task argument
    pub fn as_arg(self) -> f32 {
        self as u8 as f32
    }
}

/// An ordered, fixed task list plus its interruption rules
///
/// Schedules are statically allocated and shared by every instance of a
/// monster type; nothing in here is mutated at runtime.
#[derive(Debug)]
pub struct Schedule {
    /// Diagnostic name, shown in events and logs
    pub name: &'static str,
    pub tasks: &'static [Task],
    /// Condition bits that abort this schedule between task steps
    pub interrupt_mask: Conditions,
    /// Sound categories that abort this schedule when heard
    pub sound_mask: SoundMask,
}

impl Schedule {
    /// Full interrupt mask including the sound-category mapping
    pub fn effective_interrupts(&self) -> Conditions {
        self.interrupt_mask | self.sound_mask.to_conditions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_id_round_trips_through_arg() {
        for id in [
            ScheduleId::Fail,
            ScheduleId::ChaseEnemy,
            ScheduleId::TakeCoverFromFear,
            ScheduleId::Flinch,
        ] {
            assert_eq!(ScheduleId::from_arg(id.as_arg()), Some(id));
        }
    }

    #[test]
    fn test_schedule_id_from_bad_arg() {
        assert_eq!(ScheduleId::from_arg(200.0), None);
    }

    #[test]
    fn test_effective_interrupts_include_sounds() {
        let schedule = Schedule {
            name: "test",
            tasks: &[],
            interrupt_mask: Conditions::NEW_ENEMY,
            sound_mask: SoundMask::DANGER,
        };
        let mask = schedule.effective_interrupts();
        assert!(mask.contains(Conditions::NEW_ENEMY));
        assert!(mask.contains(Conditions::HEAR_DANGER));
    }
}
