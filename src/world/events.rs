//! Events generated during simulation ticks
//!
//! Returned by `run_world_tick` for logging, the demo binary's summary,
//! and behavioral assertions in tests.

use crate::conditions::Conditions;
use crate::core::types::{MonsterHandle, MonsterState};
use crate::schedule::TaskKind;

/// Something observable that happened during a tick
#[derive(Debug, Clone)]
pub enum WorldEvent {
    /// A monster entered a new schedule
    ScheduleStarted {
        monster: String,
        schedule: &'static str,
    },
    /// The active schedule ran all its tasks to completion
    ScheduleCompleted {
        monster: String,
        schedule: &'static str,
    },
    /// A task failure aborted the schedule
    ScheduleFailed {
        monster: String,
        schedule: &'static str,
    },
    /// Condition bits matched the interrupt mask between tasks
    ScheduleInterrupted {
        monster: String,
        schedule: &'static str,
        interrupts: Conditions,
    },
    /// One task finished
    TaskCompleted { monster: String, kind: TaskKind },
    /// One task aborted
    TaskFailed { monster: String, kind: TaskKind },
    /// High-level mode change (idle / alert / combat / dead)
    StateChanged {
        monster: String,
        from: MonsterState,
        to: MonsterState,
    },
    /// A new enemy was pushed onto the tracker
    EnemyAcquired {
        monster: String,
        enemy: MonsterHandle,
    },
    /// Damage was applied
    Attacked {
        attacker: Option<MonsterHandle>,
        victim: MonsterHandle,
        amount: f32,
    },
    /// Health reached zero; the monster is reaped this tick
    MonsterDied { monster: String },
    /// A squad formed around a leader
    SquadFormed { leader: MonsterHandle, size: usize },
    /// The old leader left; the next member took over
    LeaderPromoted { new_leader: MonsterHandle },
    /// A squad dropped below minimum size and dissolved
    SquadDisbanded { members: usize },
    /// A call for help reached listeners
    HelpCalled { caller: MonsterHandle, alerted: usize },
}
