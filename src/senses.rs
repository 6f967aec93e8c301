//! Sensory system: vision, hearing, and the relationship table

use crate::conditions::{Conditions, SoundMask};
use crate::core::types::{Classify, MonsterHandle, Relationship};
use crate::memory::MemoryFlags;
use crate::monster::Monster;
use crate::world::World;

/// How `me` regards `other`, by classification alone
///
/// This is the single source of targeting truth; individual monsters
/// never carry per-instance hostility flags.
pub fn relationship(me: Classify, other: Classify) -> Relationship {
    use Classify::*;
    use Relationship as R;

    match (me, other) {
        (None, _) | (_, None) => R::None,
        // Player avatars are driven from outside; they regard nobody
        (Player, _) => R::None,

        (PlayerAlly, Player) | (PlayerAlly, PlayerAlly) => R::Ally,
        (PlayerAlly, Feral) | (PlayerAlly, PackHunter) | (PlayerAlly, Predator) => R::Hate,
        (PlayerAlly, Prey) => R::None,

        (Feral, Feral) => R::Ally,
        (Feral, Player) | (Feral, PlayerAlly) => R::Hate,
        (Feral, PackHunter) | (Feral, Predator) => R::Dislike,
        (Feral, Prey) => R::None,

        (PackHunter, PackHunter) => R::Ally,
        (PackHunter, Player) | (PackHunter, PlayerAlly) | (PackHunter, Prey) => R::Hate,
        (PackHunter, Feral) => R::Dislike,
        (PackHunter, Predator) => R::Fear,

        (Predator, Predator) => R::Dislike,
        (Predator, _) => R::Hate,

        (Prey, Prey) => R::Ally,
        (Prey, _) => R::Fear,
    }
}

/// One full sensory pass: vision then hearing
///
/// Overwrites every sight and hearing bit plus the threat/sound origins
/// and the enemy candidate. Nothing is patched incrementally, so calling
/// this twice against an unchanged world yields the same condition set.
pub fn sense_update(world: &World, handle: MonsterHandle, mon: &mut Monster) {
    mon.conditions
        .remove(Conditions::SIGHT_BITS | Conditions::HEARING_BITS);
    mon.sensed_enemy = None;
    mon.threat_origin = None;
    mon.sound_origin = None;

    look(world, handle, mon, world.config().sense_radius);
    listen(world, mon);
}

/// Vision scan: classify everything in radius and record the nearest enemy
fn look(world: &World, handle: MonsterHandle, mon: &mut Monster, radius: f32) {
    let my_class = mon.classify();
    let provoked = mon.memory.has(MemoryFlags::PROVOKED, world.time());

    let mut best_enemy: Option<(MonsterHandle, f32)> = None;
    let mut nearest_feared: Option<(f32, glam::Vec3)> = None;

    for other_handle in world.entities_near(mon.position, radius) {
        if other_handle == handle {
            continue;
        }
        let Some(other) = world.monster(other_handle) else {
            continue;
        };
        if !other.is_alive() {
            continue;
        }

        let rel = relationship(my_class, other.classify());
        if matches!(rel, Relationship::None | Relationship::Ally) {
            continue;
        }

        let dist = mon.position.distance(other.position);
        if dist > radius || !world.visible(mon.position, other.position) {
            continue;
        }

        match rel {
            Relationship::Hate => {
                mon.conditions.insert(Conditions::SEE_HATE);
                if best_enemy.map(|(h, d)| (d, h.index()) > (dist, other_handle.index()))
                    .unwrap_or(true)
                {
                    best_enemy = Some((other_handle, dist));
                }
            }
            Relationship::Dislike => {
                mon.conditions.insert(Conditions::SEE_DISLIKE);
                // Disliked entities only become targets once provoked
                if provoked
                    && best_enemy.map(|(h, d)| (d, h.index()) > (dist, other_handle.index()))
                        .unwrap_or(true)
                {
                    best_enemy = Some((other_handle, dist));
                }
            }
            Relationship::Fear => {
                mon.conditions.insert(Conditions::SEE_FEAR);
                if nearest_feared.map(|(d, _)| dist < d).unwrap_or(true) {
                    nearest_feared = Some((dist, other.position));
                }
            }
            Relationship::None | Relationship::Ally => {}
        }
    }

    mon.sensed_enemy = best_enemy.map(|(h, _)| h);
    if let Some((_, pos)) = nearest_feared {
        mon.threat_origin = Some(pos);
    }
}

/// Hearing scan: filter the shared world sound list by this monster's mask
fn listen(world: &World, mon: &mut Monster) {
    let now = world.time();

    let mut nearest_sound: Option<(f32, glam::Vec3)> = None;
    for sound in world.sounds().active(now) {
        if !mon.hearing.contains(sound.category) {
            continue;
        }
        let dist = mon.position.distance(sound.origin);
        if dist > sound.volume {
            continue;
        }

        mon.conditions.insert(Conditions::HEAR_SOUND);
        mon.conditions.insert(sound.category.to_conditions());

        if sound.category.contains(SoundMask::DANGER) {
            // Danger overrides any feared-entity origin from the vision
            // pass; fleeing the grenade beats fleeing the predator.
            mon.threat_origin = Some(sound.origin);
        }
        if nearest_sound.map(|(d, _)| dist < d).unwrap_or(true) {
            nearest_sound = Some((dist, sound.origin));
        }
    }

    if let Some((_, origin)) = nearest_sound {
        mon.sound_origin = Some(origin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_is_asymmetric() {
        // Pack hunters fear the predator; the predator merely hates them
        assert_eq!(
            relationship(Classify::PackHunter, Classify::Predator),
            Relationship::Fear
        );
        assert_eq!(
            relationship(Classify::Predator, Classify::PackHunter),
            Relationship::Hate
        );
    }

    #[test]
    fn test_same_kind_are_allies() {
        for class in [Classify::Feral, Classify::PackHunter, Classify::Prey] {
            assert_eq!(relationship(class, class), Relationship::Ally);
        }
    }

    #[test]
    fn test_players_regard_nobody() {
        assert_eq!(
            relationship(Classify::Player, Classify::Predator),
            Relationship::None
        );
    }
}
