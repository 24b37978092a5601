//! Multi-component views.
//!
//! A [`View`] walks the dense entity list of its smallest pool (the
//! primary) and yields each entity that is present in every other pool of
//! the view. Iteration order is the primary pool's dense order. Adding or
//! removing components while a view is live is prevented by the borrow on
//! the [`World`].

use engine_component::{Component, ComponentPool, ComponentTypeId, Entity, TypeRegistry};

use crate::world::World;

/// Largest number of component types a single view can join.
pub const MAX_VIEW_TYPES: usize = 8;

/// Cursor over the entities that have every component type of the view.
#[derive(Debug, Clone)]
pub struct View<'w> {
    world: &'w World,
    pools: [Option<&'w ComponentPool>; MAX_VIEW_TYPES],
    types: [ComponentTypeId; MAX_VIEW_TYPES],
    len: usize,
    primary: usize,
    cursor: usize,
}

impl<'w> View<'w> {
    /// Build a view over `types`.
    ///
    /// Returns `None` if `types` is empty, longer than [`MAX_VIEW_TYPES`], or
    /// names an unregistered type.
    #[must_use]
    pub fn new(world: &'w World, types: &[ComponentTypeId]) -> Option<Self> {
        if types.is_empty() || types.len() > MAX_VIEW_TYPES {
            return None;
        }
        let mut pools = [None; MAX_VIEW_TYPES];
        let mut ids = [ComponentTypeId::INVALID; MAX_VIEW_TYPES];
        for (slot, &id) in types.iter().enumerate() {
            pools[slot] = Some(world.pool(id)?);
            ids[slot] = id;
        }
        // First smallest pool wins ties.
        let primary = pools[..types.len()]
            .iter()
            .enumerate()
            .min_by_key(|(_, pool)| pool.map_or(usize::MAX, ComponentPool::len))
            .map(|(slot, _)| slot)?;

        Some(Self {
            world,
            pools,
            types: ids,
            len: types.len(),
            primary,
            cursor: 0,
        })
    }

    /// Rewind to the start of the primary pool.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// Number of component types in the view.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.len
    }

    /// The type whose pool drives iteration.
    #[must_use]
    pub fn primary(&self) -> ComponentTypeId {
        self.pools[self.primary].map_or(ComponentTypeId::INVALID, ComponentPool::type_id)
    }
}

impl<'w> Iterator for View<'w> {
    type Item = ViewItem<'w>;

    fn next(&mut self) -> Option<ViewItem<'w>> {
        let primary = self.pools[self.primary]?;
        while let Some(index) = primary.entity_index_at(self.cursor) {
            self.cursor += 1;
            let Some(entity) = self.world.entities.handle(index) else {
                continue;
            };

            let empty: &'w [u8] = &[];
            let mut components = [empty; MAX_VIEW_TYPES];
            let matched = self.pools[..self.len]
                .iter()
                .zip(components.iter_mut())
                .all(|(pool, out)| {
                    let found = pool.and_then(|pool| pool.get(pool.slot_of(index)?));
                    match found {
                        Some(bytes) => {
                            *out = bytes;
                            true
                        }
                        None => false,
                    }
                });

            if matched {
                return Some(ViewItem {
                    entity,
                    components,
                    types: self.types,
                    len: self.len,
                    registry: &self.world.registry,
                });
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.pools[self.primary]
            .map_or(0, |pool| pool.len().saturating_sub(self.cursor));
        (0, Some(remaining))
    }
}

/// One matching entity and its component bytes, in view type order.
#[derive(Debug, Clone, Copy)]
pub struct ViewItem<'w> {
    entity: Entity,
    components: [&'w [u8]; MAX_VIEW_TYPES],
    types: [ComponentTypeId; MAX_VIEW_TYPES],
    len: usize,
    registry: &'w TypeRegistry,
}

impl<'w> ViewItem<'w> {
    /// The matching entity.
    #[must_use]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Bytes of the component at position `slot` of the view's type list.
    #[must_use]
    pub fn raw(&self, slot: usize) -> Option<&'w [u8]> {
        (slot < self.len).then(|| self.components[slot])
    }

    /// Type of the component at position `slot`.
    #[must_use]
    pub fn type_id(&self, slot: usize) -> Option<ComponentTypeId> {
        (slot < self.len).then(|| self.types[slot])
    }

    /// The component at position `slot`, viewed as `T`.
    ///
    /// Returns `None` unless `T` is the type registered for that position.
    #[must_use]
    pub fn get<T: Component>(&self, slot: usize) -> Option<&'w T> {
        if self.registry.id_of::<T>()? != self.type_id(slot)? {
            return None;
        }
        bytemuck::try_from_bytes(self.raw(slot)?).ok()
    }

    /// Bytes of every component, in view type order.
    #[must_use]
    pub fn components(&self) -> &[&'w [u8]] {
        &self.components[..self.len]
    }
}
