//! Flockling: squad-forming pack beast
//!
//! Weak alone, dangerous in numbers. Flocklings travel in leader-rooted
//! squads: followers trail the leader, and the first one to sight an
//! enemy howls, handing the whole flock the target before its members
//! even think.

use crate::conditions::{Conditions, SoundMask};
use crate::core::types::{Classify, MonsterHandle, MonsterState};
use crate::monster::{Behavior, Monster, Route};
use crate::schedule::{library, Schedule, ScheduleId, Task, TaskKind};
use crate::scheduler::executor;
use crate::scheduler::selector::{self, SelectionContext};
use crate::scheduler::TaskStatus;
use crate::world::World;

/// Shared descriptor for all flocklings
pub static FLOCKLING: Flockling = Flockling;

pub struct Flockling;

/// Custom task tag: trail the squad leader
pub const TASK_TRAIL_LEADER: u16 = 1;

/// Followers keep roughly this distance from the leader
const TRAIL_DISTANCE: f32 = 72.0;

/// Follower idle behavior: stay on the leader's heels.
static SCHED_FLOCK_TRAIL: Schedule = Schedule {
    name: "flock_trail",
    tasks: &[
        Task { kind: TaskKind::Custom(TASK_TRAIL_LEADER), arg: TRAIL_DISTANCE },
        Task { kind: TaskKind::WaitRandom, arg: 1.0 },
    ],
    interrupt_mask: Conditions::SIGHT_BITS
        .union(Conditions::NEW_ENEMY)
        .union(Conditions::LIGHT_DAMAGE)
        .union(Conditions::HEAVY_DAMAGE),
    sound_mask: SoundMask::DANGER.union(SoundMask::COMBAT),
};

impl Behavior for Flockling {
    fn name(&self) -> &'static str {
        "flockling"
    }

    fn classify(&self) -> Classify {
        Classify::Feral
    }

    fn max_health(&self) -> f32 {
        30.0
    }

    fn speed(&self) -> f32 {
        180.0
    }

    fn coordination_tag(&self) -> Option<&'static str> {
        Some("flock")
    }

    fn melee_damage(&self) -> f32 {
        7.0
    }

    fn schedule_for(&self, id: ScheduleId) -> &'static Schedule {
        match id {
            ScheduleId::Custom1 => &SCHED_FLOCK_TRAIL,
            other => library::resolve_default(other),
        }
    }

    fn select_schedule(&self, ctx: &SelectionContext) -> ScheduleId {
        // Followers with nothing better to do trail their leader
        let quiet = matches!(ctx.state, MonsterState::Idle | MonsterState::Alert);
        if quiet
            && ctx.in_squad
            && !ctx.is_squad_leader
            && !ctx.conditions.intersects(
                Conditions::HEAR_DANGER | Conditions::SEE_FEAR | Conditions::HEAR_COMBAT,
            )
        {
            return ScheduleId::Custom1;
        }
        selector::default_select(ctx)
    }

    fn on_new_enemy(&self, world: &mut World, handle: MonsterHandle, mon: &mut Monster) {
        // Howl: the whole flock inherits the target synchronously
        world.broadcast_help(
            handle,
            mon.position,
            mon.classify(),
            self.coordination_tag(),
            mon.enemy.enemy(),
            mon.enemy.lkp(),
        );
    }

    fn start_custom_task(
        &self,
        tag: u16,
        arg: f32,
        world: &mut World,
        handle: MonsterHandle,
        mon: &mut Monster,
    ) -> TaskStatus {
        match tag {
            TASK_TRAIL_LEADER => {
                let Some(leader_pos) = leader_position(world, handle, mon) else {
                    return TaskStatus::Failed;
                };
                if mon.position.distance(leader_pos) <= arg {
                    return TaskStatus::Complete;
                }
                if !world.visible(mon.position, leader_pos) {
                    return TaskStatus::Failed;
                }
                mon.route = Some(Route {
                    target: leader_pos,
                    arrive_dist: arg,
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
        handle: MonsterHandle,
        mon: &mut Monster,
    ) -> TaskStatus {
        match tag {
            TASK_TRAIL_LEADER => {
                // Track the leader's current position, not where it was
                // when the task started
                let leader_pos = leader_position(world, handle, mon);
                match leader_pos {
                    Some(pos) => {
                        if let Some(route) = mon.route.as_mut() {
                            route.target = pos;
                        }
                        executor::advance_route(mon, world.config().tick_seconds)
                    }
                    None => TaskStatus::Failed,
                }
            }
            _ => TaskStatus::Failed,
        }
    }
}

/// Current position of this monster's squad leader
fn leader_position(world: &World, handle: MonsterHandle, mon: &Monster) -> Option<glam::Vec3> {
    let squad = world.squads().get(mon.squad?)?;
    let leader = squad.leader();
    if leader == handle {
        return None;
    }
    world.monster(leader).map(|m| m.position)
}
