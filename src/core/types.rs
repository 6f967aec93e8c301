//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

pub use crate::arena::Handle;

/// Weak reference to a monster in the world arena.
///
/// Generation-checked: once the monster is removed, every outstanding
/// handle resolves to `None` instead of dangling.
pub type MonsterHandle = Handle;

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// Continuous simulation time in seconds
pub type SimTime = f32;

/// High-level behavioral mode of a monster
///
/// The schedule selector is keyed primarily by this state; transitions
/// happen once per think, before schedule maintenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterState {
    /// Nothing of interest sensed recently
    Idle,
    /// Suspicious: heard something or was hurt, but has no enemy yet
    Alert,
    /// Has an enemy and is actively fighting or hunting it
    Combat,
    /// Under external control; the selector leaves it alone
    Scripted,
    /// Dead monsters never think again and are reaped at end of tick
    Dead,
}

/// Faction classification used by the relationship table
///
/// Who attacks whom is entirely driven by the pairing of these values,
/// never by per-instance flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classify {
    /// Inert scenery entities; ignored by everyone
    None,
    /// A player avatar
    Player,
    /// Fights alongside players
    PlayerAlly,
    /// Feral beasts: hate players and their allies
    Feral,
    /// Coordinated hunters: hate players, dislike feral beasts
    PackHunter,
    /// Apex threat: hated and feared by lesser monsters
    Predator,
    /// Skittish prey: fears everything that hunts
    Prey,
}

/// How one classification regards another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relationship {
    /// Friendly: never targeted
    Ally,
    /// Indifferent
    None,
    /// Disliked: attacked only once provoked
    Dislike,
    /// Hated: attacked on sight
    Hate,
    /// Feared: triggers cover-seeking rather than attack
    Fear,
}
