//! Per-tick condition bits and sound category masks

use bitflags::bitflags;

bitflags! {
    /// Sensed facts about the world, valid for the current think only
    ///
    /// The whole set is rebuilt from scratch at the start of every think;
    /// nothing is patched incrementally, so there is no stale-bit drift.
    /// Schedules carry an interrupt mask of these bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Conditions: u64 {
        /// A hated entity is in view
        const SEE_HATE         = 1 << 0;
        /// A disliked entity is in view
        const SEE_DISLIKE      = 1 << 1;
        /// A feared entity is in view
        const SEE_FEAR         = 1 << 2;
        /// The current enemy is in view
        const SEE_ENEMY        = 1 << 3;
        /// The current enemy exists but line of sight is blocked
        const ENEMY_OCCLUDED   = 1 << 4;
        /// An enemy was acquired this think
        const NEW_ENEMY        = 1 << 5;
        /// The current enemy died or was removed from the world
        const ENEMY_DEAD       = 1 << 6;

        /// Took a light hit within the damage window
        const LIGHT_DAMAGE     = 1 << 8;
        /// Took a heavy hit within the damage window
        const HEAVY_DAMAGE     = 1 << 9;
        /// Carries the provoked memory bit (attacked or called to arms)
        const PROVOKED         = 1 << 10;

        /// Primary melee attack is possible right now
        const CAN_MELEE_ATTACK1 = 1 << 16;
        /// Secondary melee attack is possible right now
        const CAN_MELEE_ATTACK2 = 1 << 17;
        /// Primary ranged attack is possible right now
        const CAN_RANGE_ATTACK1 = 1 << 18;
        /// Special ranged attack is possible right now
        const CAN_RANGE_ATTACK2 = 1 << 19;

        /// Heard any sound this think
        const HEAR_SOUND       = 1 << 24;
        /// Heard a danger sound (incoming grenade, collapsing wall)
        const HEAR_DANGER      = 1 << 25;
        /// Heard combat noise (gunfire, impacts)
        const HEAR_COMBAT      = 1 << 26;
        /// Heard player movement or voice
        const HEAR_PLAYER      = 1 << 27;
        /// Heard ambient world noise
        const HEAR_WORLD       = 1 << 28;
    }
}

impl Conditions {
    /// All bits written by the vision scan
    pub const SIGHT_BITS: Conditions = Conditions::SEE_HATE
        .union(Conditions::SEE_DISLIKE)
        .union(Conditions::SEE_FEAR)
        .union(Conditions::SEE_ENEMY)
        .union(Conditions::ENEMY_OCCLUDED);

    /// All bits written by the hearing scan
    pub const HEARING_BITS: Conditions = Conditions::HEAR_SOUND
        .union(Conditions::HEAR_DANGER)
        .union(Conditions::HEAR_COMBAT)
        .union(Conditions::HEAR_PLAYER)
        .union(Conditions::HEAR_WORLD);

    /// All attack capability bits
    pub const ATTACK_BITS: Conditions = Conditions::CAN_MELEE_ATTACK1
        .union(Conditions::CAN_MELEE_ATTACK2)
        .union(Conditions::CAN_RANGE_ATTACK1)
        .union(Conditions::CAN_RANGE_ATTACK2);
}

bitflags! {
    /// Sound categories a monster can emit or listen for
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SoundMask: u8 {
        /// Imminent hazards; always worth fleeing
        const DANGER = 1 << 0;
        /// Weapons fire and melee impacts
        const COMBAT = 1 << 1;
        /// Player footsteps and voice
        const PLAYER = 1 << 2;
        /// Doors, machinery, scenery
        const WORLD  = 1 << 3;
    }
}

impl SoundMask {
    /// Map heard categories to their condition bits
    ///
    /// Schedules store a relevant-sound mask; combining this mapping with
    /// the schedule's interrupt mask decides whether a heard sound aborts
    /// the running schedule.
    pub fn to_conditions(self) -> Conditions {
        let mut bits = Conditions::empty();
        if self.contains(SoundMask::DANGER) {
            bits |= Conditions::HEAR_DANGER;
        }
        if self.contains(SoundMask::COMBAT) {
            bits |= Conditions::HEAR_COMBAT;
        }
        if self.contains(SoundMask::PLAYER) {
            bits |= Conditions::HEAR_PLAYER;
        }
        if self.contains(SoundMask::WORLD) {
            bits |= Conditions::HEAR_WORLD;
        }
        bits
    }
}
