//! Schedule execution state and the selector/executor pair

pub mod executor;
pub mod selector;

use crate::core::types::Tick;
use crate::schedule::{Schedule, ScheduleId};

/// Lifecycle of the task currently pointed at by the runner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Waiting for `start_task`
    NotStarted,
    /// Started; `run_task` advances it once per think
    Running,
    /// Finished; the runner moves to the next task
    Complete,
    /// Aborted; the whole schedule fails
    Failed,
}

/// Per-monster schedule execution state
///
/// Owns nothing but indices and flags; the schedule itself is a shared
/// `&'static` table.
#[derive(Debug)]
pub struct ScheduleRunner {
    schedule: Option<&'static Schedule>,
    schedule_id: Option<ScheduleId>,
    task_index: usize,
    task_status: TaskStatus,
    schedule_done: bool,
    schedule_failed: bool,
    /// Set by `SetFailSchedule`; consumed when the schedule fails
    fail_override: Option<ScheduleId>,
    /// Where the next selection should go after a failure
    fail_target: Option<ScheduleId>,
    /// Tick the current task was started on; timed tasks refuse to
    /// complete on this same tick
    task_started_tick: Tick,
    /// Deadline used by wait and attack tasks
    pub wait_until: f32,
}

impl ScheduleRunner {
    pub fn new() -> Self {
        Self {
            schedule: None,
            schedule_id: None,
            task_index: 0,
            task_status: TaskStatus::NotStarted,
            schedule_done: false,
            schedule_failed: false,
            fail_override: None,
            fail_target: None,
            task_started_tick: 0,
            wait_until: 0.0,
        }
    }

    pub fn schedule(&self) -> Option<&'static Schedule> {
        self.schedule
    }

    pub fn schedule_id(&self) -> Option<ScheduleId> {
        self.schedule_id
    }

    pub fn task_index(&self) -> usize {
        self.task_index
    }

    pub fn task_status(&self) -> TaskStatus {
        self.task_status
    }

    pub fn task_started_tick(&self) -> Tick {
        self.task_started_tick
    }

    /// True when the selector must provide a new schedule
    pub fn needs_new_schedule(&self) -> bool {
        self.schedule.is_none() || self.schedule_done || self.schedule_failed
    }

    /// True while a schedule is active and neither done nor failed
    pub fn is_mid_schedule(&self) -> bool {
        self.schedule.is_some() && !self.schedule_done && !self.schedule_failed
    }

    pub fn schedule_failed(&self) -> bool {
        self.schedule_failed
    }

    /// Enter a new schedule, resetting all task-local state
    pub fn begin(&mut self, schedule: &'static Schedule, id: ScheduleId, tick: Tick) {
        self.schedule = Some(schedule);
        self.schedule_id = Some(id);
        self.task_index = 0;
        self.task_status = TaskStatus::NotStarted;
        self.schedule_done = false;
        self.schedule_failed = false;
        self.fail_override = None;
        self.task_started_tick = tick;
        self.wait_until = 0.0;
    }

    /// Discard the remaining task list (interrupt)
    pub fn abandon(&mut self) {
        self.schedule = None;
        self.schedule_id = None;
        self.schedule_done = false;
        self.schedule_failed = false;
        self.fail_override = None;
    }

    pub fn set_task_status(&mut self, status: TaskStatus) {
        self.task_status = status;
    }

    pub fn note_task_started(&mut self, tick: Tick) {
        self.task_started_tick = tick;
    }

    /// Advance past a completed task; marks the schedule done after the
    /// last one
    pub fn advance_task(&mut self) {
        debug_assert_eq!(self.task_status, TaskStatus::Complete);
        self.task_index += 1;
        self.task_status = TaskStatus::NotStarted;
        if let Some(schedule) = self.schedule {
            if self.task_index >= schedule.tasks.len() {
                self.schedule_done = true;
            }
        }
    }

    /// Record a task failure; the fail override (if any) becomes the
    /// next selection target
    pub fn mark_failed(&mut self) {
        self.schedule_failed = true;
        self.fail_target = self.fail_override.take();
    }

    /// Override where a failure of this schedule routes to
    ///
    /// Normally driven by the `SetFailSchedule` task; custom task hooks
    /// may also call this before returning `Failed`.
    pub fn set_fail_override(&mut self, id: ScheduleId) {
        self.fail_override = Some(id);
    }

    /// Consume the failure routing decision
    pub fn take_fail_target(&mut self) -> Option<ScheduleId> {
        self.fail_target.take()
    }
}

impl Default for ScheduleRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::library::SCHED_FAIL;

    #[test]
    fn test_new_runner_needs_schedule() {
        let runner = ScheduleRunner::new();
        assert!(runner.needs_new_schedule());
        assert!(!runner.is_mid_schedule());
    }

    #[test]
    fn test_begin_resets_state() {
        let mut runner = ScheduleRunner::new();
        runner.begin(&SCHED_FAIL, ScheduleId::Fail, 5);
        assert!(!runner.needs_new_schedule());
        assert!(runner.is_mid_schedule());
        assert_eq!(runner.task_index(), 0);
        assert_eq!(runner.task_status(), TaskStatus::NotStarted);
    }

    #[test]
    fn test_advancing_past_last_task_finishes_schedule() {
        let mut runner = ScheduleRunner::new();
        runner.begin(&SCHED_FAIL, ScheduleId::Fail, 0);
        for _ in 0..SCHED_FAIL.tasks.len() {
            runner.set_task_status(TaskStatus::Complete);
            runner.advance_task();
        }
        assert!(runner.needs_new_schedule());
        assert!(!runner.schedule_failed());
    }

    #[test]
    fn test_fail_override_routes_failure() {
        let mut runner = ScheduleRunner::new();
        runner.begin(&SCHED_FAIL, ScheduleId::Fail, 0);
        runner.set_fail_override(ScheduleId::CombatFace);
        runner.mark_failed();
        assert!(runner.schedule_failed());
        assert_eq!(runner.take_fail_target(), Some(ScheduleId::CombatFace));
        // Consumed
        assert_eq!(runner.take_fail_target(), None);
    }
}
