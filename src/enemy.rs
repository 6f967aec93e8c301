//! Enemy tracking and last-known-position bookkeeping

use crate::core::types::{MonsterHandle, SimTime};
use glam::Vec3;

/// The current enemy and what the monster believes about its position
///
/// The handle is weak: if the enemy is removed from the arena, lookups
/// resolve to `None` and the tracker is cleared on the next think.
#[derive(Debug, Clone, Default)]
pub struct EnemyTracker {
    enemy: Option<MonsterHandle>,
    lkp: Vec3,
    last_seen: SimTime,
}

impl EnemyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enemy(&self) -> Option<MonsterHandle> {
        self.enemy
    }

    /// Last known position of the enemy
    ///
    /// Only meaningful while an enemy is set.
    pub fn lkp(&self) -> Vec3 {
        self.lkp
    }

    /// Simulation time of the last confirmed sighting
    pub fn last_seen(&self) -> SimTime {
        self.last_seen
    }

    /// Adopt a new enemy at a known position
    pub fn set(&mut self, enemy: MonsterHandle, position: Vec3, now: SimTime) {
        self.enemy = Some(enemy);
        self.lkp = position;
        self.last_seen = now;
    }

    /// Refresh the LKP with the enemy's true position (enemy is visible)
    pub fn confirm(&mut self, position: Vec3, now: SimTime) {
        self.lkp = position;
        self.last_seen = now;
    }

    /// Drift the LKP while the enemy is out of sight.
    ///
    /// The step is the monster's OWN recent velocity over one think,
    /// clamped to `max_step`. The original engine predicted this way and
    /// combat pacing depends on the specific inaccuracy, so it is kept
    /// as-is rather than replaced with a real projection of the enemy.
    pub fn extrapolate(&mut self, own_velocity: Vec3, dt: f32, max_step: f32) {
        let step = own_velocity * dt;
        let step = if step.length() > max_step {
            step.normalize_or_zero() * max_step
        } else {
            step
        };
        self.lkp += step;
    }

    /// Drop the enemy entirely
    pub fn clear(&mut self) {
        self.enemy = None;
    }
}
