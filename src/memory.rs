//! Longer-lived facts a monster remembers across ticks

use crate::core::types::SimTime;
use ahash::AHashMap;
use bitflags::bitflags;

bitflags! {
    /// Facts that outlive the current think
    ///
    /// Unlike [`crate::conditions::Conditions`], these persist until
    /// explicitly cleared or timed out.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MemoryFlags: u16 {
        /// Was attacked or alerted by a squad-mate; disliked entities
        /// become valid targets while this holds
        const PROVOKED    = 1 << 0;
        /// Heard or suffered something worth staying alert about
        const SUSPICIOUS  = 1 << 1;
        /// Reached a cover point and is holding it
        const IN_COVER    = 1 << 2;
        /// A movement task failed recently
        const MOVE_FAILED = 1 << 3;
    }
}

/// Memory bits plus optional per-bit expiry timestamps
///
/// Expired bits are treated as cleared by [`MemoryStore::has`] but are not
/// eagerly swept; the stale bit is dropped the next time the same bit is
/// written. This mirrors how the rest of the engine treats time: lazily,
/// against the simulation clock.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    bits: MemoryFlags,
    expiry: AHashMap<u16, SimTime>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set memory bits, optionally expiring at `until`
    ///
    /// Writing a bit replaces any previous expiry for it; writing with
    /// `None` makes the bit permanent until cleared.
    pub fn remember(&mut self, bits: MemoryFlags, until: Option<SimTime>) {
        self.bits.insert(bits);
        match until {
            Some(t) => {
                for bit in bits.iter() {
                    self.expiry.insert(bit.bits(), t);
                }
            }
            None => {
                for bit in bits.iter() {
                    self.expiry.remove(&bit.bits());
                }
            }
        }
    }

    /// Clear memory bits and their expiry entries
    pub fn forget(&mut self, bits: MemoryFlags) {
        self.bits.remove(bits);
        for bit in bits.iter() {
            self.expiry.remove(&bit.bits());
        }
    }

    /// True while every bit in `bits` is set and none has expired
    pub fn has(&self, bits: MemoryFlags, now: SimTime) -> bool {
        if !self.bits.contains(bits) {
            return false;
        }
        bits.iter().all(|bit| match self.expiry.get(&bit.bits()) {
            Some(&t) => now < t,
            None => true,
        })
    }

    /// Raw bit access, ignoring expiry (diagnostics only)
    pub fn raw_bits(&self) -> MemoryFlags {
        self.bits
    }
}
