//! # Entity Management
//!
//! Entities are lightweight identifiers consisting of:
//! - An index into the slot table (and the sparse side of every component array)
//! - A generation counter, bumped each time the slot is destroyed

use crate::error::EcsError;

/// Unique identifier for an entity.
///
/// The ID is split into two parts:
/// - Lower 32 bits: slot index
/// - Upper 32 bits: generation counter for detecting stale references
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new entity ID from index and generation.
    ///
    /// # Arguments
    ///
    /// * `index` - The slot index (0 to 2^32-1)
    /// * `generation` - The generation counter (0 to 2^32-1)
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | (index as u64))
    }

    /// Returns the index portion of the entity ID.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Returns the generation portion of the entity ID.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Null/invalid entity ID.
    pub const NULL: Self = Self(u64::MAX);

    /// Checks if this entity ID is null/invalid.
    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == u64::MAX
    }

    /// Raw packed value.
    #[inline]
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::NULL
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Slot {
    generation: u32,
    alive: bool,
}

/// Registry of entity slots with a free list for index recycling.
///
/// The table only tracks liveness; component cleanup on destroy is the
/// job of [`World`](super::World).
#[derive(Debug, Default)]
pub struct EntityTable {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl EntityTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table with room for `capacity` slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            live: 0,
        }
    }

    /// Issues a handle, reusing a freed index when one is available.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX - 1` slots are ever allocated.
    pub fn create(&mut self) -> EntityId {
        self.live += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.alive = true;
            return EntityId::new(index, slot.generation);
        }

        let index = self.slots.len();
        assert!(index < u32::MAX as usize, "entity index space exhausted");
        self.slots.push(Slot {
            generation: 0,
            alive: true,
        });
        #[allow(clippy::cast_possible_truncation)]
        let id = EntityId::new(index as u32, 0);
        id
    }

    /// Marks the entity dead and recycles its index.
    ///
    /// Components attached to it are left untouched; they become
    /// unreachable because the slot's generation moves on.
    ///
    /// # Errors
    ///
    /// [`EcsError::NullEntity`] for `NULL`, [`EcsError::Expired`] for a
    /// handle that is not currently alive.
    pub fn destroy(&mut self, id: EntityId) -> Result<(), EcsError> {
        if id.is_null() {
            return Err(EcsError::NullEntity);
        }
        if !self.is_alive(id) {
            return Err(EcsError::Expired(id));
        }

        let slot = &mut self.slots[id.index() as usize];
        slot.alive = false;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index());
        self.live -= 1;
        Ok(())
    }

    /// Checks if an entity is alive under this exact generation.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        if id.is_null() {
            return false;
        }
        self.slots
            .get(id.index() as usize)
            .is_some_and(|slot| slot.alive && slot.generation == id.generation())
    }

    /// Number of live entities.
    #[inline]
    #[must_use]
    pub const fn count(&self) -> usize {
        self.live
    }

    /// Number of slots ever allocated (live + free).
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Calls `f` for every live entity, in slot order.
    pub fn each(&self, mut f: impl FnMut(EntityId)) {
        for (index, slot) in self.slots.iter().enumerate() {
            if slot.alive {
                #[allow(clippy::cast_possible_truncation)]
                let id = EntityId::new(index as u32, slot.generation);
                f(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_roundtrip() {
        let id = EntityId::new(12345, 67890);
        assert_eq!(id.index(), 12345);
        assert_eq!(id.generation(), 67890);
        assert!(!id.is_null());
        assert!(EntityId::default().is_null());
    }

    #[test]
    fn test_create_and_destroy() {
        let mut table = EntityTable::new();
        let a = table.create();
        let b = table.create();
        assert_ne!(a, b);
        assert_eq!(table.count(), 2);

        table.destroy(a).unwrap();
        assert!(!table.is_alive(a));
        assert!(table.is_alive(b));
        assert_eq!(table.count(), 1);
        assert_eq!(table.capacity(), 2);
    }

    #[test]
    fn test_recycled_index_gets_new_generation() {
        let mut table = EntityTable::new();
        let old = table.create();
        table.destroy(old).unwrap();

        let new = table.create();
        assert_eq!(new.index(), old.index());
        assert_ne!(new.generation(), old.generation());
        assert!(!table.is_alive(old));
        assert!(table.is_alive(new));
        assert_eq!(table.capacity(), 1);
    }

    #[test]
    fn test_destroy_rejects_stale_and_null() {
        let mut table = EntityTable::new();
        let e = table.create();
        table.destroy(e).unwrap();

        assert_eq!(table.destroy(e), Err(EcsError::Expired(e)));
        assert_eq!(table.destroy(EntityId::NULL), Err(EcsError::NullEntity));
        assert_eq!(table.count(), 0);
    }

    #[test]
    fn test_each_visits_live_only() {
        let mut table = EntityTable::new();
        let ids: Vec<_> = (0..5).map(|_| table.create()).collect();
        table.destroy(ids[1]).unwrap();
        table.destroy(ids[3]).unwrap();

        let mut seen = Vec::new();
        table.each(|e| seen.push(e));
        assert_eq!(seen, vec![ids[0], ids[2], ids[4]]);
    }
}
