//! Per-monster runtime state and the behavior seam
//!
//! A `Monster` is pure data; everything type-specific goes through the
//! [`Behavior`] trait object it carries. Behaviors are stateless static
//! descriptors, so the reference is `&'static` and cloning a monster
//! never clones behavior.

use crate::conditions::{Conditions, SoundMask};
use crate::core::config::EngineConfig;
use crate::core::types::{Classify, MonsterHandle, MonsterState, SimTime};
use crate::enemy::EnemyTracker;
use crate::memory::MemoryStore;
use crate::schedule::{library, Schedule, ScheduleId};
use crate::scheduler::selector::{self, SelectionContext};
use crate::scheduler::{ScheduleRunner, TaskStatus};
use crate::squad::SquadId;
use crate::world::World;
use glam::Vec3;

/// Inputs to the attack-availability predicates
pub struct AttackCheck<'a> {
    /// Distance to the current enemy's last known position
    pub distance: f32,
    /// Whether the enemy is currently in view
    pub visible: bool,
    pub config: &'a EngineConfig,
}

/// Type-specific seam into the generic engine
///
/// One implementation per monster type, registered as a `static` and
/// shared by every instance. Default methods give the stock treatment;
/// a type overrides only what differs.
pub trait Behavior: Sync {
    /// Type name, used for squad recruitment matching and diagnostics
    fn name(&self) -> &'static str;

    fn classify(&self) -> Classify;

    /// Monsters that never think (player proxies)
    fn autonomous(&self) -> bool {
        true
    }

    fn max_health(&self) -> f32 {
        50.0
    }

    /// Movement speed in world units per second
    fn speed(&self) -> f32 {
        150.0
    }

    /// Which sound categories this type reacts to
    fn hearing_mask(&self) -> SoundMask {
        SoundMask::DANGER | SoundMask::COMBAT | SoundMask::PLAYER
    }

    /// Shared tag for `call_for_help` broadcasts; `None` opts out
    fn coordination_tag(&self) -> Option<&'static str> {
        None
    }

    /// Seconds of light-damage immunity after taking a flinch
    fn flinch_delay(&self, config: &EngineConfig) -> f32 {
        config.flinch_delay
    }

    fn melee_damage(&self) -> f32 {
        10.0
    }

    fn range_damage(&self) -> f32 {
        8.0
    }

    /// Resolve a symbolic schedule id for this type
    ///
    /// Override for the ids whose behavior differs; unhandled ids must
    /// delegate to [`library::resolve_default`].
    fn schedule_for(&self, id: ScheduleId) -> &'static Schedule {
        library::resolve_default(id)
    }

    /// Pick the next schedule when the current one ends
    fn select_schedule(&self, ctx: &SelectionContext) -> ScheduleId {
        selector::default_select(ctx)
    }

    fn check_melee_attack1(&self, check: &AttackCheck) -> bool {
        check.visible && check.distance <= check.config.melee_range
    }

    fn check_melee_attack2(&self, _check: &AttackCheck) -> bool {
        false
    }

    fn check_range_attack1(&self, _check: &AttackCheck) -> bool {
        false
    }

    fn check_range_attack2(&self, _check: &AttackCheck) -> bool {
        false
    }

    /// Called once when an enemy is newly acquired
    fn on_new_enemy(&self, _world: &mut World, _handle: MonsterHandle, _mon: &mut Monster) {}

    /// Begin a [`crate::schedule::TaskKind::Custom`] task
    fn start_custom_task(
        &self,
        _tag: u16,
        _arg: f32,
        _world: &mut World,
        _handle: MonsterHandle,
        _mon: &mut Monster,
    ) -> TaskStatus {
        TaskStatus::Failed
    }

    /// Advance a running custom task
    fn run_custom_task(
        &self,
        _tag: u16,
        _arg: f32,
        _world: &mut World,
        _handle: MonsterHandle,
        _mon: &mut Monster,
    ) -> TaskStatus {
        TaskStatus::Failed
    }
}

/// A straight-line movement request toward a point
///
/// Route construction validates the segment against the world's
/// occluders; real pathfinding lives outside this crate.
#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub target: Vec3,
    /// Distance at which the route counts as arrived
    pub arrive_dist: f32,
}

/// Per-entity runtime state driven by the scheduling engine
pub struct Monster {
    pub name: String,
    pub behavior: &'static dyn Behavior,

    pub position: Vec3,
    pub velocity: Vec3,
    /// Facing in degrees on the horizontal plane
    pub yaw: f32,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,

    pub state: MonsterState,
    pub conditions: Conditions,
    pub memory: MemoryStore,
    pub enemy: EnemyTracker,
    pub runner: ScheduleRunner,
    pub route: Option<Route>,
    pub squad: Option<SquadId>,
    pub hearing: SoundMask,

    /// Exponential average of recent velocity; the "velocity history"
    /// the enemy tracker extrapolates the LKP with
    pub recent_velocity: Vec3,

    /// Origin to take cover from (danger sound or feared entity)
    pub threat_origin: Option<Vec3>,
    /// Origin of the most recent investigable sound
    pub sound_origin: Option<Vec3>,
    /// Nearest enemy candidate recorded by the last vision scan
    pub sensed_enemy: Option<MonsterHandle>,
    /// Enemy the schedule layer has already reacted to; a mismatch with
    /// the tracker raises NEW_ENEMY until a schedule re-entry consumes it
    pub acknowledged_enemy: Option<MonsterHandle>,

    pub last_light_damage: Option<SimTime>,
    pub last_heavy_damage: Option<SimTime>,
    /// Light damage is ignored by attack tasks until this time
    pub next_flinch: SimTime,
}

impl Monster {
    pub fn new(behavior: &'static dyn Behavior, name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            behavior,
            position,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            health: behavior.max_health(),
            max_health: behavior.max_health(),
            speed: behavior.speed(),
            state: MonsterState::Idle,
            conditions: Conditions::empty(),
            memory: MemoryStore::new(),
            enemy: EnemyTracker::new(),
            runner: ScheduleRunner::new(),
            route: None,
            squad: None,
            hearing: behavior.hearing_mask(),
            recent_velocity: Vec3::ZERO,
            threat_origin: None,
            sound_origin: None,
            sensed_enemy: None,
            acknowledged_enemy: None,
            last_light_damage: None,
            last_heavy_damage: None,
            next_flinch: 0.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0 && self.state != MonsterState::Dead
    }

    pub fn classify(&self) -> Classify {
        self.behavior.classify()
    }

    /// Turn toward a point at the given rate; returns true once facing it
    pub fn turn_toward(&mut self, point: Vec3, yaw_speed_deg: f32, dt: f32) -> bool {
        let delta = point - self.position;
        if delta.x.abs() < 1e-3 && delta.y.abs() < 1e-3 {
            return true;
        }
        let target_yaw = delta.y.atan2(delta.x).to_degrees();
        let mut diff = target_yaw - self.yaw;
        while diff > 180.0 {
            diff -= 360.0;
        }
        while diff < -180.0 {
            diff += 360.0;
        }

        let step = yaw_speed_deg * dt;
        if diff.abs() <= step {
            self.yaw = target_yaw;
            true
        } else {
            self.yaw += step * diff.signum();
            if self.yaw > 180.0 {
                self.yaw -= 360.0;
            } else if self.yaw < -180.0 {
                self.yaw += 360.0;
            }
            false
        }
    }
}
