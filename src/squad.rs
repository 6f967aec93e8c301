//! Squad coordination: shared enemy knowledge and leader-rooted groups
//!
//! Membership is stored as an owning collection (squad id to ordered
//! member list, leader first) rather than a pointer-threaded ring, so
//! "no duplicates, everyone reachable from the leader" holds by
//! construction. Contract violations (adding an already-squadded member,
//! removing a non-member) fail fast with an error.

use crate::core::error::{MindError, Result};
use crate::core::types::MonsterHandle;
use crate::memory::MemoryFlags;
use crate::world::{World, WorldEvent};

/// Identifier of a squad in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SquadId(u32);

/// A leader-rooted group of cooperating monsters
#[derive(Debug, Clone)]
pub struct Squad {
    /// Ordered roster; the leader is always `members[0]`
    members: Vec<MonsterHandle>,
}

impl Squad {
    pub fn leader(&self) -> MonsterHandle {
        self.members[0]
    }

    pub fn members(&self) -> &[MonsterHandle] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, handle: MonsterHandle) -> bool {
        self.members.contains(&handle)
    }
}

/// All squads in the world
#[derive(Debug, Default)]
pub struct SquadRegistry {
    squads: ahash::AHashMap<u32, Squad>,
    next_id: u32,
}

impl SquadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: SquadId) -> Option<&Squad> {
        self.squads.get(&id.0)
    }

    fn get_mut(&mut self, id: SquadId) -> Option<&mut Squad> {
        self.squads.get_mut(&id.0)
    }

    fn create(&mut self, leader: MonsterHandle) -> SquadId {
        let id = self.next_id;
        self.next_id += 1;
        self.squads.insert(
            id,
            Squad {
                members: vec![leader],
            },
        );
        SquadId(id)
    }

    fn destroy(&mut self, id: SquadId) -> Option<Squad> {
        self.squads.remove(&id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SquadId, &Squad)> {
        self.squads.iter().map(|(&id, squad)| (SquadId(id), squad))
    }

    /// Debug-build invariant check: unique members, leader present
    pub fn assert_invariants(&self) {
        if cfg!(debug_assertions) {
            for (_, squad) in self.iter() {
                assert!(!squad.is_empty(), "squad with no members");
                let mut seen = ahash::AHashSet::new();
                for &member in squad.members() {
                    assert!(seen.insert(member), "duplicate squad member {member:?}");
                }
            }
        }
    }
}

impl World {
    /// Form a new squad led by `leader`, recruiting nearby same-type
    /// monsters
    ///
    /// The leader must exist and be squad-free. Recruitment scans
    /// `squad_recruit_radius` for alive, squad-free monsters of the same
    /// behavior type, up to `max_squad_size` total members.
    pub fn form_squad(&mut self, leader: MonsterHandle) -> Result<SquadId> {
        let (leader_pos, leader_kind) = {
            let mon = self
                .monster(leader)
                .ok_or(MindError::MonsterNotFound(leader))?;
            if mon.squad.is_some() {
                return Err(MindError::SquadContract("form_squad: already in a squad"));
            }
            (mon.position, mon.behavior.name())
        };

        let id = self.squads_mut().create(leader);
        if let Some(mon) = self.monster_mut(leader) {
            mon.squad = Some(id);
        }

        let radius = self.config().squad_recruit_radius;
        let max_size = self.config().max_squad_size;
        let mut candidates: Vec<MonsterHandle> = self
            .entities_near(leader_pos, radius)
            .into_iter()
            .filter(|&h| h != leader)
            .filter(|&h| {
                self.monster(h)
                    .map(|m| {
                        m.is_alive()
                            && m.squad.is_none()
                            && m.behavior.name() == leader_kind
                            && m.position.distance(leader_pos) <= radius
                    })
                    .unwrap_or(false)
            })
            .collect();
        // Deterministic recruitment order regardless of grid iteration
        candidates.sort();

        for candidate in candidates {
            if self.squad_count_of(id) >= max_size {
                break;
            }
            self.squad_add(leader, candidate)?;
        }

        let size = self.squad_count_of(id);
        tracing::debug!(?leader, size, "squad formed");
        self.push_event(WorldEvent::SquadFormed { leader, size });
        self.squads().assert_invariants();
        Ok(id)
    }

    /// Splice `candidate` into the squad right after its leader
    ///
    /// The caller must be the current leader and the candidate must be
    /// squad-free; anything else is a contract violation.
    pub fn squad_add(&mut self, leader: MonsterHandle, candidate: MonsterHandle) -> Result<()> {
        let squad_id = self
            .monster(leader)
            .ok_or(MindError::MonsterNotFound(leader))?
            .squad
            .ok_or(MindError::SquadContract("squad_add: caller has no squad"))?;

        if self
            .squads()
            .get(squad_id)
            .map(|s| s.leader() != leader)
            .unwrap_or(true)
        {
            return Err(MindError::SquadContract("squad_add: caller is not the leader"));
        }

        let candidate_mon = self
            .monster(candidate)
            .ok_or(MindError::MonsterNotFound(candidate))?;
        if candidate_mon.squad.is_some() {
            return Err(MindError::SquadContract(
                "squad_add: candidate already in a squad",
            ));
        }

        if let Some(squad) = self.squads_mut().get_mut(squad_id) {
            squad.members.insert(1, candidate);
        }
        if let Some(mon) = self.monster_mut(candidate) {
            mon.squad = Some(squad_id);
        }
        self.squads().assert_invariants();
        Ok(())
    }

    /// Remove a member, promoting or disbanding as needed
    ///
    /// Removing the leader promotes the next member and hands it the
    /// departing leader's enemy knowledge. If two or fewer members would
    /// remain, the whole squad disbands instead.
    pub fn squad_remove(&mut self, member: MonsterHandle) -> Result<()> {
        let squad_id = self
            .monster(member)
            .ok_or(MindError::MonsterNotFound(member))?
            .squad
            .ok_or(MindError::SquadContract("squad_remove: not in a squad"))?;

        let (was_leader, remaining) = {
            let squad = self
                .squads()
                .get(squad_id)
                .expect("monster points at a squad the registry lost");
            (squad.leader() == member, squad.len() - 1)
        };

        if remaining <= 2 {
            self.squad_disband(squad_id);
            return Ok(());
        }

        // Capture the departing leader's enemy knowledge before unlinking
        let inherited = if was_leader {
            self.monster(member)
                .and_then(|m| m.enemy.enemy().map(|e| (e, m.enemy.lkp())))
        } else {
            None
        };

        if let Some(squad) = self.squads_mut().get_mut(squad_id) {
            squad.members.retain(|&h| h != member);
        }
        if let Some(mon) = self.monster_mut(member) {
            mon.squad = None;
        }

        if was_leader {
            let new_leader = self
                .squads()
                .get(squad_id)
                .expect("squad vanished during removal")
                .leader();
            if let Some((enemy, lkp)) = inherited {
                let now = self.time();
                if let Some(mon) = self.monster_mut(new_leader) {
                    if mon.enemy.enemy().is_none() {
                        mon.enemy.set(enemy, lkp, now);
                    }
                }
            }
            tracing::debug!(?new_leader, "squad leader promoted");
            self.push_event(WorldEvent::LeaderPromoted { new_leader });
        }

        self.squads().assert_invariants();
        Ok(())
    }

    /// Dissolve a squad entirely; every member forgets its membership
    pub fn squad_disband(&mut self, id: SquadId) {
        let Some(squad) = self.squads_mut().destroy(id) else {
            return;
        };
        let count = squad.len();
        for member in squad.members {
            if let Some(mon) = self.monster_mut(member) {
                mon.squad = None;
            }
        }
        tracing::debug!(members = count, "squad disbanded");
        self.push_event(WorldEvent::SquadDisbanded { members: count });
    }

    /// Squad size as seen from any member; 0 when squad-free
    pub fn squad_count(&self, member: MonsterHandle) -> usize {
        self.monster(member)
            .and_then(|m| m.squad)
            .and_then(|id| self.squads().get(id))
            .map(|s| s.len())
            .unwrap_or(0)
    }

    fn squad_count_of(&self, id: SquadId) -> usize {
        self.squads().get(id).map(|s| s.len()).unwrap_or(0)
    }

    /// Leader of the member's squad, if any
    pub fn squad_leader(&self, member: MonsterHandle) -> Option<MonsterHandle> {
        let id = self.monster(member)?.squad?;
        self.squads().get(id).map(|s| s.leader())
    }

    /// Broadcast enemy knowledge to nearby kin
    ///
    /// Same-classification monsters within `help_radius` that share the
    /// caller's coordination tag are marked provoked and handed the
    /// caller's enemy and LKP. The mutation is synchronous: a recipient
    /// thinking later this same tick already sees it.
    pub fn call_for_help(&mut self, caller: MonsterHandle) -> Result<usize> {
        let (pos, class, tag, enemy, lkp) = {
            let mon = self
                .monster(caller)
                .ok_or(MindError::MonsterNotFound(caller))?;
            (
                mon.position,
                mon.classify(),
                mon.behavior.coordination_tag(),
                mon.enemy.enemy(),
                mon.enemy.lkp(),
            )
        };
        Ok(self.broadcast_help(caller, pos, class, tag, enemy, lkp))
    }

    /// Inner broadcast used both by the public API and by behavior hooks
    /// running inside the caller's own think (when the caller is
    /// temporarily outside the arena).
    pub fn broadcast_help(
        &mut self,
        caller: MonsterHandle,
        origin: glam::Vec3,
        class: crate::core::types::Classify,
        tag: Option<&'static str>,
        enemy: Option<MonsterHandle>,
        lkp: glam::Vec3,
    ) -> usize {
        let Some(tag) = tag else {
            return 0;
        };
        let radius = self.config().help_radius;
        let now = self.time();

        let mut listeners: Vec<MonsterHandle> = self
            .entities_near(origin, radius)
            .into_iter()
            .filter(|&h| h != caller)
            .collect();
        listeners.sort();

        let mut alerted = 0;
        for handle in listeners {
            let Some(mon) = self.monster(handle) else {
                continue;
            };
            if !mon.is_alive()
                || mon.classify() != class
                || mon.behavior.coordination_tag() != Some(tag)
                || mon.position.distance(origin) > radius
            {
                continue;
            }
            let mon = self.monster_mut(handle).unwrap();
            mon.memory.remember(MemoryFlags::PROVOKED, None);
            if let Some(enemy) = enemy {
                if mon.enemy.enemy().is_none() {
                    mon.enemy.set(enemy, lkp, now);
                }
            }
            alerted += 1;
        }

        if alerted > 0 {
            tracing::debug!(?caller, alerted, "call for help answered");
            self.push_event(WorldEvent::HelpCalled { caller, alerted });
        }
        alerted
    }
}
