//! ID-indexed entity arenas.
//!
//! A [`Repository`] maps monotonically assigned 64-bit IDs to entities with
//! O(1) lookup and insertion-order iteration. Removal vacates a slot
//! without renumbering survivors, so IDs stay stable for an entity's
//! lifetime. Back-references between entities are stored as IDs and
//! resolved through repositories, which keeps the cyclic
//! person ↔ family ↔ household ↔ dwelling graph safe for parallel reads.
//!
//! Repositories are not synchronized: the engine never mutates one during
//! an iteration window and batches all writes into the serial phases.

use types::Entity;

/// Append-only, iterable, ID-indexed collection of entities.
#[derive(Debug, Clone)]
pub struct Repository<T: Entity> {
    slots: Vec<Option<T>>,
    len: usize,
}

impl<T: Entity> Repository<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            len: 0,
        }
    }

    /// Insert an entity, assigning it the next free ID. The assigned ID is
    /// stored back into the entity and returned.
    pub fn add_new(&mut self, mut entity: T) -> T::Id {
        let id = T::Id::from(self.slots.len() as u64);
        entity.set_id(id);
        self.slots.push(Some(entity));
        self.len += 1;
        id
    }

    /// Look up an entity by ID.
    #[inline]
    pub fn try_get(&self, id: T::Id) -> Option<&T> {
        let index: u64 = id.into();
        self.slots.get(index as usize)?.as_ref()
    }

    /// Look up an entity by ID, mutably.
    #[inline]
    pub fn try_get_mut(&mut self, id: T::Id) -> Option<&mut T> {
        let index: u64 = id.into();
        self.slots.get_mut(index as usize)?.as_mut()
    }

    /// Look up an entity by ID.
    ///
    /// Panics when the ID is vacant or out of range; use [`try_get`]
    /// (Self::try_get) on paths where absence is an error to propagate.
    #[inline]
    pub fn get(&self, id: T::Id) -> &T {
        self.try_get(id).unwrap_or_else(|| {
            panic!("no entity for id {}", Into::<u64>::into(id));
        })
    }

    /// Remove an entity, leaving its slot vacant. Surviving entities keep
    /// their IDs. Returns the removed entity, if any.
    pub fn remove(&mut self, id: T::Id) -> Option<T> {
        let index: u64 = id.into();
        let removed = self.slots.get_mut(index as usize)?.take();
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Iterate entities in insertion (ID) order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Iterate entities mutably in insertion (ID) order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().filter_map(Option::as_mut)
    }

    /// Number of live entities.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T: Entity> Default for Repository<T> {
    fn default() -> Self {
        Self::new()
    }
}
