//! Generational arena for entity storage
//!
//! Entities refer to each other by `Handle`, an index tagged with the
//! generation of the slot it points into. Removing an entity bumps the
//! slot generation, so every handle still held elsewhere (enemy trackers,
//! squad rosters) resolves to `None` instead of dangling.

/// Generation-checked index into an [`Arena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle {
    index: u32,
    generation: u32,
}

impl Handle {
    /// Slot index, stable for the lifetime of the entity
    ///
    /// Entities are processed in ascending index order each tick, which
    /// is what makes cross-entity mutation ordering deterministic.
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

struct Slot<T> {
    generation: u32,
    item: Option<T>,
}

/// Slab of entities with generation-checked access
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert an entity, reusing a free slot if one exists
    pub fn insert(&mut self, item: T) -> Handle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.item = Some(item);
            Handle {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                item: Some(item),
            });
            Handle {
                index,
                generation: 0,
            }
        }
    }

    /// Remove an entity, invalidating all outstanding handles to it
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index())?;
        if slot.generation != handle.generation || slot.item.is_none() {
            return None;
        }
        let item = slot.item.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        item
    }

    pub fn get(&self, handle: Handle) -> Option<&T> {
        let slot = self.slots.get(handle.index())?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.item.as_ref()
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index())?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.item.as_mut()
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    /// Temporarily move an entity out of its slot without freeing it
    ///
    /// Used by the tick loop so an entity's own think can mutate the rest
    /// of the arena without aliasing itself. While taken, lookups of this
    /// handle return `None`. Pair with [`Arena::restore`].
    pub fn take(&mut self, handle: Handle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index())?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.item.take()
    }

    /// Put back an entity previously removed with [`Arena::take`]
    pub fn restore(&mut self, handle: Handle, item: T) {
        let slot = &mut self.slots[handle.index()];
        debug_assert!(slot.generation == handle.generation && slot.item.is_none());
        slot.item = Some(item);
    }

    /// Iterate live entities in ascending index order
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.item.as_ref().map(|item| {
                (
                    Handle {
                        index: i as u32,
                        generation: slot.generation,
                    },
                    item,
                )
            })
        })
    }

    /// Collect live handles in ascending index order
    ///
    /// Taken as a snapshot before the think loop so entities spawned
    /// mid-tick wait until the next tick for their first think.
    pub fn handles(&self) -> Vec<Handle> {
        self.iter().map(|(h, _)| h).collect()
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}
