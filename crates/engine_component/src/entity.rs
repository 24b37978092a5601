//! Entity handles and the generation-counted slot allocator.
//!
//! An [`Entity`] packs a slot index and a generation into one `u64`. The
//! [`EntityAllocator`] owns the liveness and generation tables; a handle is
//! only valid while its generation matches the one stored for its slot.

use serde::{Deserialize, Serialize};

/// A generation-checked entity handle.
///
/// Layout: `(generation << 32) | index`. Entities carry no data of their own
/// and are always resolved through the world that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Entity(pub u64);

impl Entity {
    /// The null / invalid entity sentinel. Generations start at 1 and skip 0
    /// on wrap, so no allocator ever hands this value out.
    pub const INVALID: Entity = Entity(0);

    /// Pack a slot index and generation into a handle.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | index as u64)
    }

    /// Create an entity from a raw `u64` value.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }

    /// Slot index into the entity tables.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0 as u32
    }

    /// Generation the slot had when this handle was issued.
    #[must_use]
    pub const fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Returns `true` if this is not [`Entity::INVALID`].
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({}v{})", self.index(), self.generation())
    }
}

/// Default cap on the entity table size.
pub const DEFAULT_ENTITY_LIMIT: u32 = 1 << 24;

/// Issues, validates and recycles entity handles.
///
/// `alive` and `generations` always have the same length (the table size),
/// which never exceeds `limit`. Every slot that is in range and not alive
/// sits on the free-list exactly once.
#[derive(Debug)]
pub struct EntityAllocator {
    alive: Vec<bool>,
    generations: Vec<u32>,
    free: Vec<u32>,
    limit: u32,
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self {
            alive: Vec::new(),
            generations: Vec::new(),
            free: Vec::new(),
            limit: DEFAULT_ENTITY_LIMIT,
        }
    }
}

impl EntityAllocator {
    /// Creates an empty allocator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an allocator with room for `capacity` slots before growing.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            alive: Vec::with_capacity(capacity),
            generations: Vec::with_capacity(capacity),
            ..Self::default()
        }
    }

    /// Cap the table at `limit` slots.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Largest number of slots the table may hold.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Allocates a handle, reusing a freed slot when one is available.
    ///
    /// A reused slot keeps the generation it was bumped to when it was freed;
    /// a fresh slot starts at generation 1. Returns `None` only when the
    /// table has reached its limit and no slot is free.
    pub fn allocate(&mut self) -> Option<Entity> {
        if let Some(index) = self.free.pop() {
            let slot = index as usize;
            self.alive[slot] = true;
            return Some(Entity::new(index, self.generations[slot]));
        }

        let index = u32::try_from(self.alive.len()).ok()?;
        if index >= self.limit {
            return None;
        }
        self.alive.push(true);
        self.generations.push(1);
        Some(Entity::new(index, 1))
    }

    /// Frees a live handle: clears its liveness flag, bumps the slot's
    /// generation and pushes the slot onto the free-list.
    ///
    /// Returns `false` (and does nothing) if the handle is not alive.
    pub fn free(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        let slot = entity.index() as usize;
        self.alive[slot] = false;
        // Wraps past 0 so no handle equals `Entity::INVALID`. After 2^32 - 1
        // reuses a stale handle may alias.
        self.generations[slot] = self.generations[slot].wrapping_add(1).max(1);
        self.free.push(entity.index());
        true
    }

    /// The sole authority on handle validity.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        let slot = entity.index() as usize;
        slot < self.alive.len()
            && self.alive[slot]
            && self.generations[slot] == entity.generation()
    }

    /// Returns the current handle for a live slot.
    #[must_use]
    pub fn handle(&self, index: u32) -> Option<Entity> {
        let slot = index as usize;
        if slot < self.alive.len() && self.alive[slot] {
            Some(Entity::new(index, self.generations[slot]))
        } else {
            None
        }
    }

    /// Stored generation for a slot, alive or not.
    #[must_use]
    pub fn generation(&self, index: u32) -> Option<u32> {
        self.generations.get(index as usize).copied()
    }

    /// Table size: the number of slots ever allocated.
    #[must_use]
    pub fn len(&self) -> usize {
        self.alive.len()
    }

    /// Returns `true` if no slot has been allocated yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }

    /// Number of live entities.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.alive.len() - self.free.len()
    }

    /// Live handles in index order.
    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive
            .iter()
            .zip(self.generations.iter())
            .enumerate()
            .filter(|(_, (alive, _))| **alive)
            .map(|(index, (_, &generation))| Entity::new(index as u32, generation))
    }

    /// Marks every slot dead with generation 1, keeping the table size.
    ///
    /// Used as the fresh-start step of scene loading.
    pub fn reset(&mut self) {
        self.alive.fill(false);
        self.generations.fill(1);
        self.rebuild_free_list();
    }

    /// Marks `index` alive with an explicit generation, growing the table
    /// if needed. Call [`EntityAllocator::rebuild_free_list`] once all slots
    /// have been restored.
    ///
    /// Returns `None` if `index` is at or past the limit or `generation` is 0.
    pub fn restore(&mut self, index: u32, generation: u32) -> Option<Entity> {
        if index >= self.limit || generation == 0 {
            return None;
        }
        let slot = index as usize;
        if slot >= self.alive.len() {
            self.alive.resize(slot + 1, false);
            self.generations.resize(slot + 1, 1);
        }
        self.alive[slot] = true;
        self.generations[slot] = generation;
        Some(Entity::new(index, generation))
    }

    /// Recomputes the free-list from the liveness table. Lower indices are
    /// handed out first.
    pub fn rebuild_free_list(&mut self) {
        self.free.clear();
        self.free.extend(
            self.alive
                .iter()
                .enumerate()
                .rev()
                .filter(|(_, alive)| !**alive)
                .map(|(index, _)| index as u32),
        );
    }
}
