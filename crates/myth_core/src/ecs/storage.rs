//! # Component Storage
//!
//! Sparse-set storage, one array per component type:
//! - `sparse[entity.index]` points at a dense slot (or nothing)
//! - `dense` holds the full handle of the owner of each slot
//! - `values` is parallel to `dense`
//!
//! Add, remove and lookup are O(1). Removal swaps the last dense slot into
//! the hole, so iteration order is not stable across removals.

use super::entity::EntityId;

/// Sparse slot with no dense entry.
const EMPTY: u32 = u32::MAX;

/// Type-erased view of a component array.
///
/// The world keeps every array reachable through this trait so that
/// destroying an entity strips it from all of them.
pub trait ComponentStore {
    /// Short name of the stored component type, for logs and errors.
    fn component_name(&self) -> &'static str;

    /// Whether `entity` (exact generation) holds a component here.
    fn contains(&self, entity: EntityId) -> bool;

    /// Removes `entity`'s component if present. Returns whether one was removed.
    fn remove_entity(&mut self, entity: EntityId) -> bool;

    /// Number of stored components.
    fn stored(&self) -> usize;
}

/// Sparse-set storage for a single component type.
///
/// # Example
///
/// ```rust,ignore
/// let mut velocities: ComponentArray<Velocity> = ComponentArray::new();
/// velocities.add(entity, Velocity::default());
/// velocities.get_mut(entity).linear.y = 8.0;
/// ```
#[derive(Debug, Clone)]
pub struct ComponentArray<T> {
    sparse: Vec<u32>,
    dense: Vec<EntityId>,
    values: Vec<T>,
}

impl<T> Default for ComponentArray<T> {
    fn default() -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<T> ComponentArray<T> {
    /// Creates an empty array.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn slot_of(&self, entity: EntityId) -> Option<usize> {
        if entity.is_null() {
            return None;
        }
        let slot = *self.sparse.get(entity.index() as usize)?;
        if slot == EMPTY {
            return None;
        }
        let slot = slot as usize;
        (self.dense[slot] == entity).then_some(slot)
    }

    /// Attaches `value` to `entity`, overwriting any existing value.
    ///
    /// A leftover entry from an earlier generation of the same index is
    /// replaced in place.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is `NULL`.
    pub fn add(&mut self, entity: EntityId, value: T) {
        assert!(!entity.is_null(), "cannot add a component to the NULL entity");

        let index = entity.index() as usize;
        if index >= self.sparse.len() {
            self.sparse.resize(index + 1, EMPTY);
        }

        let slot = self.sparse[index];
        if slot != EMPTY {
            let slot = slot as usize;
            self.dense[slot] = entity;
            self.values[slot] = value;
            return;
        }

        #[allow(clippy::cast_possible_truncation)]
        let dense_slot = self.dense.len() as u32;
        self.sparse[index] = dense_slot;
        self.dense.push(entity);
        self.values.push(value);
    }

    /// Detaches and returns `entity`'s component.
    ///
    /// Returns `None` when the entity (at this generation) has none.
    pub fn remove(&mut self, entity: EntityId) -> Option<T> {
        let slot = self.slot_of(entity)?;

        let last = self.dense.len() - 1;
        if slot != last {
            let moved = self.dense[last];
            #[allow(clippy::cast_possible_truncation)]
            let new_slot = slot as u32;
            self.sparse[moved.index() as usize] = new_slot;
        }
        self.sparse[entity.index() as usize] = EMPTY;
        self.dense.swap_remove(slot);
        Some(self.values.swap_remove(slot))
    }

    /// Component of `entity`.
    ///
    /// # Panics
    ///
    /// Panics if the entity has no component in this array. Use
    /// [`try_get`](Self::try_get) when presence is not guaranteed.
    #[must_use]
    pub fn get(&self, entity: EntityId) -> &T {
        match self.slot_of(entity) {
            Some(slot) => &self.values[slot],
            None => panic!(
                "{entity:?} has no {} component",
                std::any::type_name::<T>()
            ),
        }
    }

    /// Mutable component of `entity`.
    ///
    /// # Panics
    ///
    /// Panics if the entity has no component in this array.
    pub fn get_mut(&mut self, entity: EntityId) -> &mut T {
        match self.slot_of(entity) {
            Some(slot) => &mut self.values[slot],
            None => panic!(
                "{entity:?} has no {} component",
                std::any::type_name::<T>()
            ),
        }
    }

    /// Component of `entity`, if present.
    #[inline]
    #[must_use]
    pub fn try_get(&self, entity: EntityId) -> Option<&T> {
        self.slot_of(entity).map(|slot| &self.values[slot])
    }

    /// Mutable component of `entity`, if present.
    #[inline]
    pub fn try_get_mut(&mut self, entity: EntityId) -> Option<&mut T> {
        self.slot_of(entity).map(|slot| &mut self.values[slot])
    }

    /// Whether `entity` holds a component here.
    #[inline]
    #[must_use]
    pub fn has(&self, entity: EntityId) -> bool {
        self.slot_of(entity).is_some()
    }

    /// Number of stored components.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Whether the array is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Calls `f` for every stored component.
    pub fn each(&self, mut f: impl FnMut(EntityId, &T)) {
        for (entity, value) in self.dense.iter().zip(&self.values) {
            f(*entity, value);
        }
    }

    /// Calls `f` for every stored component, mutably.
    pub fn each_mut(&mut self, mut f: impl FnMut(EntityId, &mut T)) {
        for (entity, value) in self.dense.iter().zip(&mut self.values) {
            f(*entity, value);
        }
    }

    /// Iterates `(owner, component)` pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.dense.iter().copied().zip(&self.values)
    }

    /// Owners of the stored components, in dense order.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[EntityId] {
        &self.dense
    }

    /// Removes every component.
    pub fn clear(&mut self) {
        self.sparse.clear();
        self.dense.clear();
        self.values.clear();
    }
}

impl<T> ComponentStore for ComponentArray<T> {
    fn component_name(&self) -> &'static str {
        let full = std::any::type_name::<T>();
        full.rsplit("::").next().unwrap_or(full)
    }

    fn contains(&self, entity: EntityId) -> bool {
        self.has(entity)
    }

    fn remove_entity(&mut self, entity: EntityId) -> bool {
        self.remove(entity).is_some()
    }

    fn stored(&self) -> usize {
        self.len()
    }
}
