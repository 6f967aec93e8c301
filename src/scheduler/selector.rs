//! Default schedule selection - the priority state machine
//!
//! Keyed primarily by monster state. Behaviors override
//! `select_schedule` when a type needs different priorities, but most
//! fall through to this cascade.

use crate::conditions::Conditions;
use crate::core::types::{MonsterState, SimTime};
use crate::memory::{MemoryFlags, MemoryStore};
use crate::schedule::ScheduleId;

/// Context provided to the schedule selection algorithm
pub struct SelectionContext<'a> {
    pub state: MonsterState,
    pub conditions: Conditions,
    pub memory: &'a MemoryStore,
    pub has_enemy: bool,
    pub in_squad: bool,
    pub is_squad_leader: bool,
    pub now: SimTime,
}

impl<'a> SelectionContext<'a> {
    pub fn has(&self, bits: Conditions) -> bool {
        self.conditions.intersects(bits)
    }
}

/// Stock priority cascade
///
/// Combat: dead enemy first, then damage-driven cover, then attacks in
/// fixed order (melee beats ranged, special beats primary), then
/// movement. Idle/alert: sounds dominate, fear drives cover, otherwise
/// stand around. Ties are broken by the order written here, never
/// randomly, so replays are stable.
pub fn default_select(ctx: &SelectionContext) -> ScheduleId {
    match ctx.state {
        MonsterState::Combat => select_combat(ctx),
        MonsterState::Idle | MonsterState::Alert => select_quiet(ctx),
        // Scripted and dead monsters should not reach the selector;
        // give them the safe default if they somehow do.
        MonsterState::Scripted | MonsterState::Dead => ScheduleId::Fail,
    }
}

fn select_combat(ctx: &SelectionContext) -> ScheduleId {
    if ctx.has(Conditions::ENEMY_DEAD) {
        return ScheduleId::EnemyDead;
    }

    // Lost the enemy reference entirely: drop back to wary standing
    // until the senses re-acquire something.
    if !ctx.has_enemy {
        return ScheduleId::AlertStand;
    }

    if ctx.has(Conditions::HEAVY_DAMAGE) {
        return ScheduleId::TakeCover;
    }

    if ctx.has(Conditions::LIGHT_DAMAGE) && !ctx.has(Conditions::ATTACK_BITS) {
        return ScheduleId::Flinch;
    }

    // Attack priority: melee > ranged-special > ranged-primary
    if ctx.has(Conditions::CAN_MELEE_ATTACK1) {
        return ScheduleId::MeleeAttack1;
    }
    if ctx.has(Conditions::CAN_MELEE_ATTACK2) {
        return ScheduleId::MeleeAttack2;
    }
    if ctx.has(Conditions::CAN_RANGE_ATTACK2) {
        return ScheduleId::RangeAttack2;
    }
    if ctx.has(Conditions::CAN_RANGE_ATTACK1) {
        return ScheduleId::RangeAttack1;
    }

    // No attack available: close in if the enemy is visible, chase the
    // last known position if not. A recent route failure means the way
    // is blocked; hold and face instead of re-planning the same route.
    if ctx.has(Conditions::SEE_ENEMY) {
        return ScheduleId::Reposition;
    }
    if ctx.memory.has(MemoryFlags::MOVE_FAILED, ctx.now) {
        return ScheduleId::CombatFace;
    }
    ScheduleId::ChaseEnemy
}

fn select_quiet(ctx: &SelectionContext) -> ScheduleId {
    if ctx.has(Conditions::HEAR_DANGER) {
        return ScheduleId::TakeCoverFromThreat;
    }
    if ctx.has(Conditions::SEE_FEAR) {
        // Already hidden: hold position instead of shuffling between
        // cover points while the feared thing stays in view
        if ctx.memory.has(MemoryFlags::IN_COVER, ctx.now) {
            return ScheduleId::AlertStand;
        }
        return ScheduleId::TakeCoverFromFear;
    }
    if ctx.has(Conditions::HEAR_COMBAT) {
        return ScheduleId::InvestigateSound;
    }

    // A provoked monster with nothing to shoot at stays wound up
    if ctx.state == MonsterState::Alert
        || ctx.has(Conditions::PROVOKED)
        || ctx.memory.has(MemoryFlags::SUSPICIOUS, ctx.now)
    {
        return ScheduleId::AlertStand;
    }
    ScheduleId::IdleStand
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(
        state: MonsterState,
        conditions: Conditions,
        memory: &MemoryStore,
        has_enemy: bool,
    ) -> SelectionContext<'_> {
        SelectionContext {
            state,
            conditions,
            memory,
            has_enemy,
            in_squad: false,
            is_squad_leader: false,
            now: 0.0,
        }
    }

    #[test]
    fn test_dead_enemy_beats_attacks() {
        let memory = MemoryStore::new();
        let conditions = Conditions::ENEMY_DEAD | Conditions::CAN_MELEE_ATTACK1;
        let id = default_select(&ctx(MonsterState::Combat, conditions, &memory, true));
        assert_eq!(id, ScheduleId::EnemyDead);
    }

    #[test]
    fn test_melee_beats_ranged() {
        let memory = MemoryStore::new();
        let conditions = Conditions::CAN_MELEE_ATTACK1
            | Conditions::CAN_RANGE_ATTACK1
            | Conditions::SEE_ENEMY;
        let id = default_select(&ctx(MonsterState::Combat, conditions, &memory, true));
        assert_eq!(id, ScheduleId::MeleeAttack1);
    }

    #[test]
    fn test_special_ranged_beats_primary() {
        let memory = MemoryStore::new();
        let conditions =
            Conditions::CAN_RANGE_ATTACK1 | Conditions::CAN_RANGE_ATTACK2 | Conditions::SEE_ENEMY;
        let id = default_select(&ctx(MonsterState::Combat, conditions, &memory, true));
        assert_eq!(id, ScheduleId::RangeAttack2);
    }

    #[test]
    fn test_heavy_damage_seeks_cover() {
        let memory = MemoryStore::new();
        let conditions = Conditions::HEAVY_DAMAGE | Conditions::CAN_MELEE_ATTACK1;
        let id = default_select(&ctx(MonsterState::Combat, conditions, &memory, true));
        assert_eq!(id, ScheduleId::TakeCover);
    }

    #[test]
    fn test_no_attack_visible_enemy_repositions() {
        let memory = MemoryStore::new();
        let id = default_select(&ctx(
            MonsterState::Combat,
            Conditions::SEE_ENEMY,
            &memory,
            true,
        ));
        assert_eq!(id, ScheduleId::Reposition);

        let id = default_select(&ctx(
            MonsterState::Combat,
            Conditions::ENEMY_OCCLUDED,
            &memory,
            true,
        ));
        assert_eq!(id, ScheduleId::ChaseEnemy);
    }

    #[test]
    fn test_danger_sound_dominates_idle() {
        let memory = MemoryStore::new();
        let conditions = Conditions::HEAR_DANGER | Conditions::HEAR_COMBAT;
        let id = default_select(&ctx(MonsterState::Idle, conditions, &memory, false));
        assert_eq!(id, ScheduleId::TakeCoverFromThreat);
    }

    #[test]
    fn test_see_fear_takes_cover_when_idle() {
        let memory = MemoryStore::new();
        let id = default_select(&ctx(
            MonsterState::Idle,
            Conditions::SEE_FEAR,
            &memory,
            false,
        ));
        assert_eq!(id, ScheduleId::TakeCoverFromFear);
    }

    #[test]
    fn test_combat_sound_investigates() {
        let memory = MemoryStore::new();
        let id = default_select(&ctx(
            MonsterState::Alert,
            Conditions::HEAR_COMBAT,
            &memory,
            false,
        ));
        assert_eq!(id, ScheduleId::InvestigateSound);
    }

    #[test]
    fn test_blocked_route_memory_suppresses_chase() {
        let mut memory = MemoryStore::new();
        memory.remember(MemoryFlags::MOVE_FAILED, Some(5.0));
        let id = default_select(&ctx(
            MonsterState::Combat,
            Conditions::ENEMY_OCCLUDED,
            &memory,
            true,
        ));
        assert_eq!(id, ScheduleId::CombatFace);
    }

    #[test]
    fn test_fear_while_in_cover_holds_position() {
        let mut memory = MemoryStore::new();
        memory.remember(MemoryFlags::IN_COVER, None);
        let id = default_select(&ctx(
            MonsterState::Alert,
            Conditions::SEE_FEAR,
            &memory,
            false,
        ));
        assert_eq!(id, ScheduleId::AlertStand);
    }

    #[test]
    fn test_quiet_idle_stands() {
        let memory = MemoryStore::new();
        let id = default_select(&ctx(
            MonsterState::Idle,
            Conditions::empty(),
            &memory,
            false,
        ));
        assert_eq!(id, ScheduleId::IdleStand);
    }
}
