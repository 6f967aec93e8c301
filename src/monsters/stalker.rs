//! Stalker: ranged skirmisher that will not hold still
//!
//! Fires from the middle of the range band, slips sideways after every
//! shot, and answers any damage by breaking for cover. The slip is a
//! custom task: the generic executor has no notion of it.

use crate::conditions::{Conditions, SoundMask};
use crate::core::types::{Classify, MonsterHandle, MonsterState};
use crate::monster::{AttackCheck, Behavior, Monster, Route};
use crate::schedule::{library, Schedule, ScheduleId, Task, TaskKind};
use crate::scheduler::executor;
use crate::scheduler::selector::{self, SelectionContext};
use crate::scheduler::TaskStatus;
use crate::world::World;

/// Shared descriptor for all stalkers
pub static STALKER: Stalker = Stalker;

pub struct Stalker;

/// Custom task tag: dash perpendicular to the enemy after firing
pub const TASK_SLIP_ASIDE: u16 = 1;

/// How far one slip carries
const SLIP_DISTANCE: f32 = 96.0;

/// Fire, then displace so return fire lands where the stalker was.
static SCHED_STALKER_VOLLEY: Schedule = Schedule {
    name: "stalker_volley",
    tasks: &[
        Task { kind: TaskKind::StopMoving, arg: 0.0 },
        Task { kind: TaskKind::FaceEnemy, arg: 0.0 },
        Task { kind: TaskKind::RangeAttack1, arg: 0.8 },
        Task { kind: TaskKind::Custom(TASK_SLIP_ASIDE), arg: SLIP_DISTANCE },
    ],
    interrupt_mask: Conditions::NEW_ENEMY
        .union(Conditions::ENEMY_DEAD)
        .union(Conditions::HEAVY_DAMAGE)
        .union(Conditions::LIGHT_DAMAGE),
    sound_mask: SoundMask::DANGER,
};

impl Behavior for Stalker {
    fn name(&self) -> &'static str {
        "stalker"
    }

    fn classify(&self) -> Classify {
        Classify::PackHunter
    }

    fn max_health(&self) -> f32 {
        40.0
    }

    fn speed(&self) -> f32 {
        220.0
    }

    fn coordination_tag(&self) -> Option<&'static str> {
        Some("stalker-pack")
    }

    fn range_damage(&self) -> f32 {
        12.0
    }

    fn check_range_attack1(&self, check: &AttackCheck) -> bool {
        check.visible
            && check.distance > check.config.range_attack_min
            && check.distance <= check.config.range_attack_max
    }

    fn schedule_for(&self, id: ScheduleId) -> &'static Schedule {
        match id {
            ScheduleId::RangeAttack1 => &SCHED_STALKER_VOLLEY,
            other => library::resolve_default(other),
        }
    }

    fn select_schedule(&self, ctx: &SelectionContext) -> ScheduleId {
        // Any damage sends a stalker to cover, not just heavy hits
        if ctx.state == MonsterState::Combat
            && ctx
                .conditions
                .intersects(Conditions::LIGHT_DAMAGE | Conditions::HEAVY_DAMAGE)
        {
            return ScheduleId::TakeCover;
        }
        selector::default_select(ctx)
    }

    fn start_custom_task(
        &self,
        tag: u16,
        arg: f32,
        world: &mut World,
        _handle: MonsterHandle,
        mon: &mut Monster,
    ) -> TaskStatus {
        match tag {
            TASK_SLIP_ASIDE => {
                let Some(enemy) = mon.enemy.enemy() else {
                    return TaskStatus::Failed;
                };
                let Some(enemy_pos) = world.monster(enemy).map(|e| e.position) else {
                    return TaskStatus::Failed;
                };
                let to_enemy = (enemy_pos - mon.position).normalize_or_zero();
                // Perpendicular on the horizontal plane; side chosen by rng
                let side = if world.rng_range(0.0, 1.0) < 0.5 { 1.0 } else { -1.0 };
                let lateral = glam::Vec3::new(-to_enemy.y, to_enemy.x, 0.0) * side;
                let target = mon.position + lateral * arg;
                if !world.visible(mon.position, target) {
                    // Wall on that side; no slip this time
                    return TaskStatus::Complete;
                }
                mon.route = Some(Route {
                    target,
                    arrive_dist: 8.0,
                });
                TaskStatus::Running
            }
            _ => TaskStatus::Failed,
        }
    }

    fn run_custom_task(
        &self,
        tag: u16,
        _arg: f32,
        world: &mut World,
        _handle: MonsterHandle,
        mon: &mut Monster,
    ) -> TaskStatus {
        match tag {
            TASK_SLIP_ASIDE => executor::advance_route(mon, world.config().tick_seconds),
            _ => TaskStatus::Failed,
        }
    }
}
