//! The shared world sound list
//!
//! Effect sinks push sounds here; monsters' hearing reads it. Sounds
//! carry an expiry and are swept once per tick, so a sound emitted
//! during a tick is audible to every monster that thinks after the
//! emitter in the same tick, and to earlier-indexed monsters on their
//! next think.

use crate::conditions::SoundMask;
use crate::core::types::SimTime;
use glam::Vec3;

/// One audible event in the world
#[derive(Debug, Clone, Copy)]
pub struct Sound {
    pub origin: Vec3,
    /// Exactly one category bit
    pub category: SoundMask,
    /// Audible radius in world units
    pub volume: f32,
    pub expires: SimTime,
}

/// Append-only list of recent sounds with lazy expiry
#[derive(Debug, Default)]
pub struct SoundList {
    sounds: Vec<Sound>,
}

impl SoundList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, origin: Vec3, category: SoundMask, volume: f32, expires: SimTime) {
        debug_assert_eq!(category.bits().count_ones(), 1, "one category per sound");
        self.sounds.push(Sound {
            origin,
            category,
            volume,
            expires,
        });
    }

    /// Sounds still audible at `now`
    pub fn active(&self, now: SimTime) -> impl Iterator<Item = &Sound> {
        self.sounds.iter().filter(move |s| s.expires > now)
    }

    /// Drop expired sounds; called once per tick
    pub fn sweep(&mut self, now: SimTime) {
        self.sounds.retain(|s| s.expires > now);
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }
}
