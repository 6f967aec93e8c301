//! Shambler: slow melee bruiser
//!
//! Classified as a predator, so lesser monsters fear it on sight. It
//! never takes cover and barely reacts to light hits; its overrides
//! trade every defensive schedule for forward pressure.

use crate::conditions::{Conditions, SoundMask};
use crate::core::config::EngineConfig;
use crate::core::types::Classify;
use crate::monster::{AttackCheck, Behavior};
use crate::schedule::{library, Schedule, ScheduleId, Task, TaskKind};

/// Shared descriptor for all shamblers
pub static SHAMBLER: Shambler = Shambler;

pub struct Shambler;

/// Reach of the two-handed slam, a bit past the standard melee range
const SLAM_RANGE_SCALE: f32 = 1.6;

/// Instead of flinching or hiding, a shambler walks straight at whatever
/// hurt it.
static SCHED_SHAMBLER_PRESS: Schedule = Schedule {
    name: "shambler_press",
    tasks: &[
        Task {
            kind: TaskKind::SetFailSchedule,
            arg: ScheduleId::CombatFace as u8 as f32,
        },
        Task { kind: TaskKind::RouteToEnemyLkp, arg: 0.0 },
        Task { kind: TaskKind::RunRoute, arg: 0.0 },
    ],
    interrupt_mask: Conditions::ATTACK_BITS.union(Conditions::ENEMY_DEAD),
    sound_mask: SoundMask::empty(),
};

impl Behavior for Shambler {
    fn name(&self) -> &'static str {
        "shambler"
    }

    fn classify(&self) -> Classify {
        Classify::Predator
    }

    fn max_health(&self) -> f32 {
        120.0
    }

    fn speed(&self) -> f32 {
        90.0
    }

    fn hearing_mask(&self) -> SoundMask {
        // Shamblers do not recognize danger sounds; they lumber through
        SoundMask::COMBAT | SoundMask::PLAYER
    }

    fn flinch_delay(&self, config: &EngineConfig) -> f32 {
        config.flinch_delay * 2.0
    }

    fn melee_damage(&self) -> f32 {
        18.0
    }

    fn check_melee_attack2(&self, check: &AttackCheck) -> bool {
        // The slam covers the gap where claws cannot reach yet
        check.visible
            && check.distance > check.config.melee_range
            && check.distance <= check.config.melee_range * SLAM_RANGE_SCALE
    }

    fn schedule_for(&self, id: ScheduleId) -> &'static Schedule {
        match id {
            // Cover-seeking and flinching become forward pressure
            ScheduleId::TakeCover | ScheduleId::Flinch => &SCHED_SHAMBLER_PRESS,
            other => library::resolve_default(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shambler_never_takes_cover() {
        let schedule = SHAMBLER.schedule_for(ScheduleId::TakeCover);
        assert_eq!(schedule.name, "shambler_press");
        let schedule = SHAMBLER.schedule_for(ScheduleId::Flinch);
        assert_eq!(schedule.name, "shambler_press");
        // Unoverridden ids still resolve to the library
        let schedule = SHAMBLER.schedule_for(ScheduleId::IdleStand);
        assert_eq!(schedule.name, "idle_stand");
    }

    #[test]
    fn test_slam_fills_the_gap_past_claw_range() {
        let config = EngineConfig::default();
        let close = AttackCheck {
            distance: config.melee_range * 0.5,
            visible: true,
            config: &config,
        };
        let gap = AttackCheck {
            distance: config.melee_range * 1.3,
            visible: true,
            config: &config,
        };
        let far = AttackCheck {
            distance: config.melee_range * 3.0,
            visible: true,
            config: &config,
        };
        assert!(SHAMBLER.check_melee_attack1(&close));
        assert!(!SHAMBLER.check_melee_attack2(&close));
        assert!(SHAMBLER.check_melee_attack2(&gap));
        assert!(!SHAMBLER.check_melee_attack2(&far));
    }
}
