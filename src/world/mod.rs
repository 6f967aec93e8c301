//! The simulation world: entity arena, collaborator services, tick loop
//!
//! Everything monsters share lives here: the arena, the sound list, the
//! squad registry, occluders for visibility tests, and the seeded RNG.
//! All of it is mutated single-threaded, in arena index order, by
//! [`tick::run_world_tick`].

pub mod events;
pub mod sounds;
pub mod tick;

pub use events::WorldEvent;

use crate::arena::Arena;
use crate::conditions::SoundMask;
use crate::core::config::EngineConfig;
use crate::core::types::{Classify, MonsterHandle, SimTime, Tick};
use crate::memory::MemoryFlags;
use crate::monster::{Behavior, Monster};
use crate::spatial::SpatialGrid;
use crate::squad::SquadRegistry;
use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sounds::SoundList;

/// Axis-aligned box that blocks sight and straight routes
#[derive(Debug, Clone, Copy)]
pub struct Occluder {
    pub min: Vec3,
    pub max: Vec3,
}

impl Occluder {
    /// Slab test: does the segment `from -> to` pass through this box?
    fn blocks(&self, from: Vec3, to: Vec3) -> bool {
        let dir = to - from;
        let mut t_min = 0.0f32;
        let mut t_max = 1.0f32;

        for axis in 0..3 {
            let (origin, delta, lo, hi) = match axis {
                0 => (from.x, dir.x, self.min.x, self.max.x),
                1 => (from.y, dir.y, self.min.y, self.max.y),
                _ => (from.z, dir.z, self.min.z, self.max.z),
            };
            if delta.abs() < 1e-6 {
                if origin < lo || origin > hi {
                    return false;
                }
            } else {
                let inv = 1.0 / delta;
                let mut t0 = (lo - origin) * inv;
                let mut t1 = (hi - origin) * inv;
                if t0 > t1 {
                    std::mem::swap(&mut t0, &mut t1);
                }
                t_min = t_min.max(t0);
                t_max = t_max.min(t1);
                if t_min > t_max {
                    return false;
                }
            }
        }
        true
    }
}

/// The game world containing all monsters and shared state
pub struct World {
    config: EngineConfig,
    current_tick: Tick,
    pub monsters: Arena<Monster>,
    spatial: SpatialGrid,
    sounds: SoundList,
    squads: SquadRegistry,
    occluders: Vec<Occluder>,
    rng: ChaCha8Rng,
    pending_events: Vec<WorldEvent>,
}

impl World {
    pub fn new(seed: u64) -> Self {
        Self::with_config(EngineConfig::default(), seed)
    }

    pub fn with_config(config: EngineConfig, seed: u64) -> Self {
        let grid_cell = config.grid_cell_size;
        Self {
            config,
            current_tick: 0,
            monsters: Arena::new(),
            spatial: SpatialGrid::new(grid_cell),
            sounds: SoundList::new(),
            squads: SquadRegistry::new(),
            occluders: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            pending_events: Vec::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn tick_count(&self) -> Tick {
        self.current_tick
    }

    /// Simulation time in seconds
    pub fn time(&self) -> SimTime {
        self.current_tick as f32 * self.config.tick_seconds
    }

    // === ENTITIES ===

    /// Spawn a monster; it takes its first think on the next tick
    pub fn spawn(
        &mut self,
        behavior: &'static dyn Behavior,
        name: impl Into<String>,
        position: Vec3,
    ) -> MonsterHandle {
        let mon = Monster::new(behavior, name, position);
        let handle = self.monsters.insert(mon);
        // Make it visible to spatial queries issued before the next rebuild
        self.spatial.insert(handle, position);
        handle
    }

    pub fn monster(&self, handle: MonsterHandle) -> Option<&Monster> {
        self.monsters.get(handle)
    }

    pub fn monster_mut(&mut self, handle: MonsterHandle) -> Option<&mut Monster> {
        self.monsters.get_mut(handle)
    }

    /// Coarse radius query; callers confirm exact distance
    pub fn entities_near(&self, center: Vec3, radius: f32) -> Vec<MonsterHandle> {
        self.spatial.query_radius(center, radius)
    }

    /// Any player avatar within `dist`?
    ///
    /// Gate for the sensing skip: monsters nobody can observe do not
    /// spend time sensing.
    pub fn player_within(&self, pos: Vec3, dist: f32) -> bool {
        self.monsters.iter().any(|(_, m)| {
            m.classify() == Classify::Player && m.is_alive() && m.position.distance(pos) <= dist
        })
    }

    // === WORLD GEOMETRY ===

    pub fn add_occluder(&mut self, min: Vec3, max: Vec3) {
        self.occluders.push(Occluder { min, max });
    }

    /// Line of sight test against the occluder set
    pub fn visible(&self, from: Vec3, to: Vec3) -> bool {
        !self.occluders.iter().any(|o| o.blocks(from, to))
    }

    /// Search for a spot to hide from `threat`
    ///
    /// Samples jittered directions biased away from the threat and
    /// prefers points the threat cannot see. The straight path to the
    /// candidate must be clear, since routes here are straight lines.
    pub fn find_cover(&mut self, from: Vec3, threat: Vec3) -> Option<Vec3> {
        let dist = self.config.cover_search_distance;
        let attempts = self.config.cover_search_attempts;

        let away = (from - threat).normalize_or_zero();
        let base_angle = if away == Vec3::ZERO {
            self.rng.gen_range(0.0..std::f32::consts::TAU)
        } else {
            away.y.atan2(away.x)
        };

        let mut fallback = None;
        for i in 0..attempts {
            // Fan out around the away direction, widening with each try
            let spread = (i as f32 / attempts.max(1) as f32) * std::f32::consts::PI;
            let jitter = self.rng.gen_range(-0.3..0.3);
            let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
            let angle = base_angle + sign * spread + jitter;

            let candidate = from + Vec3::new(angle.cos(), angle.sin(), 0.0) * dist;
            if !self.visible(from, candidate) {
                continue;
            }
            if !self.visible(threat, candidate) {
                return Some(candidate);
            }
            // Reachable but exposed; better than nothing
            if fallback.is_none() && candidate.distance(threat) > from.distance(threat) {
                fallback = Some(candidate);
            }
        }
        fallback
    }

    // === EFFECT SINKS ===

    /// Emit a sound audible for the configured lifetime
    pub fn emit_sound(&mut self, origin: Vec3, category: SoundMask, volume: f32) {
        let expires = self.time() + self.config.sound_lifetime;
        self.sounds.emit(origin, category, volume, expires);
    }

    pub fn sounds(&self) -> &SoundList {
        &self.sounds
    }

    /// Apply damage to a monster (fire-and-forget)
    ///
    /// Records the hit for the damage condition bits, provokes the
    /// victim, and hands it the attacker as an enemy if it has none.
    pub fn apply_damage(
        &mut self,
        victim: MonsterHandle,
        amount: f32,
        attacker: Option<MonsterHandle>,
    ) {
        let now = self.time();
        let heavy_threshold = self.config.heavy_damage_threshold;
        let attacker_pos = attacker.and_then(|h| self.monster(h).map(|m| m.position));

        let Some(mon) = self.monsters.get_mut(victim) else {
            return;
        };
        if !mon.is_alive() {
            return;
        }

        mon.health -= amount;
        if amount >= heavy_threshold {
            mon.last_heavy_damage = Some(now);
        } else {
            mon.last_light_damage = Some(now);
        }
        mon.memory.remember(MemoryFlags::PROVOKED, None);

        if let (Some(attacker), Some(pos)) = (attacker, attacker_pos) {
            if mon.enemy.enemy().is_none() {
                mon.enemy.set(attacker, pos, now);
            }
        }

        self.pending_events.push(WorldEvent::Attacked {
            attacker,
            victim,
            amount,
        });
    }

    // === INTERNALS ===

    pub(crate) fn squads(&self) -> &SquadRegistry {
        &self.squads
    }

    pub(crate) fn squads_mut(&mut self) -> &mut SquadRegistry {
        &mut self.squads
    }

    pub(crate) fn push_event(&mut self, event: WorldEvent) {
        self.pending_events.push(event);
    }

    pub(crate) fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub(crate) fn rebuild_spatial(&mut self) {
        let entries: Vec<(MonsterHandle, Vec3)> = self
            .monsters
            .iter()
            .map(|(h, m)| (h, m.position))
            .collect();
        self.spatial.rebuild(entries.into_iter());
    }

    pub(crate) fn sweep_sounds(&mut self) {
        let now = self.time();
        self.sounds.sweep(now);
    }

    pub(crate) fn advance_tick(&mut self) {
        self.current_tick += 1;
    }

    /// Uniform random float in `[lo, hi]`
    pub fn rng_range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            lo
        } else {
            self.rng.gen_range(lo..=hi)
        }
    }

    /// Recompute a monster's condition set in place and return it
    ///
    /// Exposed so callers (and tests) can observe the sensory rebuild
    /// without running a whole tick.
    pub fn refresh_conditions(&mut self, handle: MonsterHandle) -> Option<crate::conditions::Conditions> {
        let mut mon = self.monsters.take(handle)?;
        tick::refresh_conditions(self, handle, &mut mon);
        let conditions = mon.conditions;
        self.monsters.restore(handle, mon);
        Some(conditions)
    }
}
