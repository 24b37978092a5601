//! The ECS world: entity lifecycle, component pools and the required-tag
//! policy.
//!
//! Components can be reached two ways. The raw API (`*_raw`, [`World::count`],
//! [`World::dense`], [`World::entity_at`]) works on [`ComponentTypeId`]s and
//! byte slices, which is what renderers and editors walking "every component
//! of type X" use. The typed API (`add::<T>`, `get::<T>`, ...) resolves the id
//! from [`Component::NAME`] and casts the bytes to `T`.
//!
//! Invalid ids, dead handles and missing components are routine: they come
//! back as `None`, `false` or `0`, never as errors.

use tracing::debug;

use engine_component::{
    Component, ComponentBase, ComponentInfo, ComponentPool, ComponentTypeId, Entity,
    EntityAllocator, RegistryError, TypeRegistry,
};

use crate::config::WorldConfig;
use crate::view::View;

/// Entity tables, type registry and one sparse-set pool per registered type.
///
/// `pools[i]` stores the type with id `i + 1`; a pool exists for every
/// registered type and is never removed, only emptied.
#[derive(Debug, Default)]
pub struct World {
    pub(crate) entities: EntityAllocator,
    pub(crate) registry: TypeRegistry,
    pub(crate) pools: Vec<ComponentPool>,
    pub(crate) required_tag: Option<ComponentTypeId>,
    /// Required-tag name from [`WorldConfig`] that has not been registered yet.
    pending_tag: Option<String>,
}

impl World {
    /// Create an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a world from a [`WorldConfig`].
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            entities: EntityAllocator::with_capacity(config.initial_capacity)
                .with_limit(config.max_entities),
            pending_tag: config.required_tag,
            ..Self::default()
        }
    }

    // -- Type registry --

    /// Register a byte-level component type, or return its existing id.
    ///
    /// # Errors
    ///
    /// See [`TypeRegistry::register`].
    pub fn register_raw(&mut self, info: ComponentInfo) -> Result<ComponentTypeId, RegistryError> {
        let id = self.registry.register(info)?;
        self.sync_pools();
        Ok(id)
    }

    /// Register a Rust component type, or return its existing id.
    ///
    /// # Errors
    ///
    /// See [`TypeRegistry::register_component`].
    pub fn register<T: Component>(&mut self) -> Result<ComponentTypeId, RegistryError> {
        let id = self.registry.register_component::<T>()?;
        self.sync_pools();
        Ok(id)
    }

    /// Create pools for newly registered types, pre-sized to the entity table.
    fn sync_pools(&mut self) {
        while self.pools.len() < self.registry.len() {
            let id = ComponentTypeId::from_slot(self.pools.len());
            let Some(info) = self.registry.get(id) else {
                break;
            };
            if self.pending_tag.as_deref() == Some(info.name.as_str()) {
                debug!(name = %info.name, id = id.0, "required tag resolved");
                self.required_tag = Some(id);
                self.pending_tag = None;
            }
            self.pools
                .push(ComponentPool::new(id, info.size, self.entities.len()));
        }
    }

    /// Id registered under `name`, or [`ComponentTypeId::INVALID`].
    #[must_use]
    pub fn id_by_name(&self, name: &str) -> ComponentTypeId {
        self.registry.id_by_name(name)
    }

    /// Id of a Rust component type, if registered.
    #[must_use]
    pub fn id_of<T: Component>(&self) -> Option<ComponentTypeId> {
        self.registry.id_of::<T>()
    }

    /// Metadata of a registered type.
    #[must_use]
    pub fn type_info(&self, id: ComponentTypeId) -> Option<&ComponentInfo> {
        self.registry.get(id)
    }

    /// The type registry.
    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    // -- Entity lifecycle --

    /// Create an entity, attaching the required tag if one is configured.
    ///
    /// Returns [`Entity::INVALID`] only if the entity table is at its limit
    /// and no slot is free.
    pub fn create(&mut self) -> Entity {
        let table_len = self.entities.len();
        let Some(entity) = self.entities.allocate() else {
            return Entity::INVALID;
        };
        if self.entities.len() > table_len {
            self.grow_pools();
        }
        if let Some(tag) = self.required_tag {
            self.attach(entity, tag, true);
        }
        entity
    }

    /// Destroy an entity and every component it owns.
    ///
    /// Returns `false` without side effects if the handle is not alive. The
    /// required tag is detached here like any other component.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if !self.entities.is_alive(entity) {
            return false;
        }
        for pool in &mut self.pools {
            pool.swap_remove(entity.index());
        }
        self.entities.free(entity)
    }

    /// Returns `true` if the handle refers to a live entity.
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.alive_count()
    }

    /// Live entities in index order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entities.iter()
    }

    /// Types of every component attached to `entity`, in id order.
    #[must_use]
    pub fn component_types(&self, entity: Entity) -> Vec<ComponentTypeId> {
        if !self.entities.is_alive(entity) {
            return Vec::new();
        }
        self.pools
            .iter()
            .filter(|pool| pool.contains(entity.index()))
            .map(ComponentPool::type_id)
            .collect()
    }

    /// Destroy every entity. Types and pools are kept.
    pub fn clear(&mut self) {
        let alive: Vec<Entity> = self.entities.iter().collect();
        for entity in alive {
            self.destroy(entity);
        }
    }

    /// Extend every pool's sparse array to the entity table size.
    pub(crate) fn grow_pools(&mut self) {
        let capacity = self.entities.len();
        for pool in &mut self.pools {
            pool.grow_sparse(capacity);
        }
    }

    // -- Raw component access --

    /// Attach a zeroed component of type `id`, populate its base record and
    /// run the type's constructor.
    ///
    /// Returns the existing component unchanged if one is already attached.
    /// Returns `None` if the entity is dead or the type is not registered.
    pub fn add_raw(&mut self, entity: Entity, id: ComponentTypeId) -> Option<&mut [u8]> {
        let slot = self.attach(entity, id, true)?;
        self.pool_mut(id)?.get_mut(slot)
    }

    /// Shared add path. Scene loading passes `construct = false`.
    pub(crate) fn attach(&mut self, entity: Entity, id: ComponentTypeId, construct: bool) -> Option<usize> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        let pool_slot = id.slot().filter(|&slot| slot < self.pools.len())?;

        if let Some(tag) = self.required_tag {
            // The tag's own attach must not re-enter this branch.
            if tag != id && !self.has_raw(entity, tag) {
                self.attach(entity, tag, true)?;
            }
        }

        let index = entity.index();
        if let Some(slot) = self.pools[pool_slot].slot_of(index) {
            return Some(slot);
        }

        let info = self.registry.get(id)?;
        let pool = &mut self.pools[pool_slot];
        let slot = pool.push(index);
        let component = pool.get_mut(slot)?;
        info.write_base(component, ComponentBase::new(entity, id));
        if construct {
            if let Some(construct) = info.construct {
                construct(component);
            }
        }
        Some(slot)
    }

    /// Bytes of `entity`'s component of type `id`.
    #[must_use]
    pub fn get_raw(&self, entity: Entity, id: ComponentTypeId) -> Option<&[u8]> {
        let pool = self.live_pool(entity, id)?;
        pool.get(pool.slot_of(entity.index())?)
    }

    /// Mutable bytes of `entity`'s component of type `id`.
    #[must_use]
    pub fn get_raw_mut(&mut self, entity: Entity, id: ComponentTypeId) -> Option<&mut [u8]> {
        if !self.entities.is_alive(entity) {
            return None;
        }
        let pool = self.pool_mut(id)?;
        let slot = pool.slot_of(entity.index())?;
        pool.get_mut(slot)
    }

    /// Returns `true` if `entity` is alive and has a component of type `id`.
    #[must_use]
    pub fn has_raw(&self, entity: Entity, id: ComponentTypeId) -> bool {
        self.live_pool(entity, id)
            .is_some_and(|pool| pool.contains(entity.index()))
    }

    /// Detach `entity`'s component of type `id`.
    ///
    /// Returns `false` if there is nothing to remove, or if `id` is the
    /// required tag: the tag only goes away when its entity is destroyed.
    pub fn remove_raw(&mut self, entity: Entity, id: ComponentTypeId) -> bool {
        if self.required_tag == Some(id) || !self.entities.is_alive(entity) {
            return false;
        }
        self.pool_mut(id)
            .is_some_and(|pool| pool.swap_remove(entity.index()))
    }

    /// Number of components of type `id`.
    #[must_use]
    pub fn count(&self, id: ComponentTypeId) -> usize {
        self.pool(id).map_or(0, ComponentPool::len)
    }

    /// All components of type `id` as packed bytes, in dense order.
    #[must_use]
    pub fn dense(&self, id: ComponentTypeId) -> &[u8] {
        self.pool(id).map(ComponentPool::bytes).unwrap_or_default()
    }

    /// Owner of the component in dense slot `dense_index` of type `id`.
    #[must_use]
    pub fn entity_at(&self, id: ComponentTypeId, dense_index: usize) -> Option<Entity> {
        let index = self.pool(id)?.entity_index_at(dense_index)?;
        self.entities.handle(index)
    }

    /// The pool storing type `id`.
    #[must_use]
    pub fn pool(&self, id: ComponentTypeId) -> Option<&ComponentPool> {
        self.pools.get(id.slot()?)
    }

    fn pool_mut(&mut self, id: ComponentTypeId) -> Option<&mut ComponentPool> {
        self.pools.get_mut(id.slot()?)
    }

    fn live_pool(&self, entity: Entity, id: ComponentTypeId) -> Option<&ComponentPool> {
        if self.entities.is_alive(entity) {
            self.pool(id)
        } else {
            None
        }
    }

    // -- Typed component access --

    /// Attach a `T`, registering the type on first use.
    pub fn add<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        let id = self.register::<T>().ok()?;
        bytemuck::try_from_bytes_mut(self.add_raw(entity, id)?).ok()
    }

    /// Attach a `T` and overwrite it with `value`, keeping the base record.
    pub fn insert<T: Component>(&mut self, entity: Entity, value: T) -> Option<&mut T> {
        let id = self.register::<T>().ok()?;
        let component = bytemuck::try_from_bytes_mut::<T>(self.add_raw(entity, id)?).ok()?;
        let base = component.base().copied();
        *component = value;
        if let Some(base) = base {
            T::info().write_base(bytemuck::bytes_of_mut(component), base);
        }
        Some(component)
    }

    /// `entity`'s `T`.
    #[must_use]
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        let id = self.id_of::<T>()?;
        bytemuck::try_from_bytes(self.get_raw(entity, id)?).ok()
    }

    /// `entity`'s `T`, mutably.
    #[must_use]
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        let id = self.id_of::<T>()?;
        bytemuck::try_from_bytes_mut(self.get_raw_mut(entity, id)?).ok()
    }

    /// Returns `true` if `entity` has a `T`.
    #[must_use]
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.id_of::<T>().is_some_and(|id| self.has_raw(entity, id))
    }

    /// Detach `entity`'s `T`. Same rules as [`World::remove_raw`].
    pub fn remove<T: Component>(&mut self, entity: Entity) -> bool {
        self.id_of::<T>().is_some_and(|id| self.remove_raw(entity, id))
    }

    /// Every `T` in dense order.
    #[must_use]
    pub fn components<T: Component>(&self) -> &[T] {
        self.id_of::<T>()
            .and_then(|id| bytemuck::try_cast_slice(self.dense(id)).ok())
            .unwrap_or(&[])
    }

    // -- Required tag --

    /// Set (or clear) the component type attached to every new entity.
    ///
    /// Existing entities are not retrofitted. Returns `false` if `tag` is not
    /// a registered type.
    pub fn set_required_tag(&mut self, tag: Option<ComponentTypeId>) -> bool {
        if let Some(id) = tag {
            if !self.registry.contains(id) {
                return false;
            }
        }
        self.required_tag = tag;
        self.pending_tag = None;
        true
    }

    /// The configured required tag.
    #[must_use]
    pub fn required_tag(&self) -> Option<ComponentTypeId> {
        self.required_tag
    }

    // -- Views --

    /// Iterate the entities that have every type in `types` (1 to
    /// [`MAX_VIEW_TYPES`](crate::MAX_VIEW_TYPES) entries).
    #[must_use]
    pub fn view(&self, types: &[ComponentTypeId]) -> Option<View<'_>> {
        View::new(self, types)
    }

    // -- Scene loading support --

    /// Kill every entity (generations back to 1) and empty every pool,
    /// keeping table and sparse sizes.
    pub(crate) fn reset(&mut self) {
        self.entities.reset();
        for pool in &mut self.pools {
            pool.clear();
        }
        self.required_tag = None;
    }
}

#[cfg(test)]
mod tests {
    use bytemuck::{Pod, Zeroable};

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Position {
        x: f32,
        y: f32,
    }

    impl Component for Position {
        const NAME: &'static str = "Position";
    }

    #[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Scale {
        base: ComponentBase,
        factor: f32,
        _pad: u32,
    }

    impl Component for Scale {
        const NAME: &'static str = "Scale";
        const BASE_OFFSET: Option<usize> = Some(std::mem::offset_of!(Scale, base));

        fn construct(&mut self) {
            self.factor = 1.0;
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct SceneTag {
        marker: u32,
    }

    impl Component for SceneTag {
        const NAME: &'static str = "SceneTag";
    }

    #[test]
    fn test_generation_safety() {
        let mut world = World::new();
        let e1 = world.create();
        assert!(world.destroy(e1));
        let e2 = world.create();

        assert_eq!(e1.index(), e2.index());
        assert_ne!(e1.id(), e2.id());
        assert!(!world.is_alive(e1));
        assert!(world.is_alive(e2));
    }

    #[test]
    fn test_double_destroy_is_noop() {
        let mut world = World::new();
        let e = world.create();
        assert!(world.destroy(e));
        assert!(!world.destroy(e));
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn test_idempotent_add() {
        let mut world = World::new();
        let id = world.register::<Position>().unwrap();
        let e = world.create();

        let first = world.add_raw(e, id).unwrap().as_ptr();
        let second = world.add_raw(e, id).unwrap().as_ptr();
        assert_eq!(first, second);
        assert_eq!(world.count(id), 1);
    }

    #[test]
    fn test_add_does_not_overwrite() {
        let mut world = World::new();
        let e = world.create();
        world.add::<Position>(e).unwrap().x = 5.0;
        assert_eq!(world.add::<Position>(e).unwrap().x, 5.0);
    }

    #[test]
    fn test_add_populates_base_and_runs_constructor() {
        let mut world = World::new();
        let e = world.create();
        let scale = *world.add::<Scale>(e).unwrap();
        let base = scale.base().unwrap();
        assert_eq!(base.entity(), e);
        assert_eq!(base.type_id(), world.id_of::<Scale>().unwrap());
        assert_eq!(base.flags, 0);
        assert_eq!(scale.factor, 1.0);
    }

    #[test]
    fn test_insert_keeps_base() {
        let mut world = World::new();
        let e = world.create();
        let mut value = Scale::zeroed();
        value.factor = 3.0;
        let stored = *world.insert(e, value).unwrap();
        assert_eq!(stored.factor, 3.0);
        assert_eq!(stored.base().unwrap().entity(), e);
    }

    #[test]
    fn test_swap_removal_keeps_lookup_consistent() {
        let mut world = World::new();
        let id = world.register::<Position>().unwrap();
        let entities: Vec<Entity> = (0..3).map(|_| world.create()).collect();
        for (i, &e) in entities.iter().enumerate() {
            world.add::<Position>(e).unwrap().x = i as f32;
        }

        assert!(world.remove_raw(entities[0], id));
        assert_eq!(world.count(id), 2);
        assert_eq!(world.entity_at(id, 0), Some(entities[2]));
        assert_eq!(world.get::<Position>(entities[2]).unwrap().x, 2.0);
        assert_eq!(world.get::<Position>(entities[1]).unwrap().x, 1.0);
        assert!(world.get::<Position>(entities[0]).is_none());
    }

    #[test]
    fn test_required_tag_enforcement() {
        let mut world = World::new();
        let tag = world.register::<SceneTag>().unwrap();
        assert!(world.set_required_tag(Some(tag)));

        let e = world.create();
        assert!(world.has_raw(e, tag));
        assert!(!world.remove_raw(e, tag));
        assert!(world.has_raw(e, tag));

        assert!(world.destroy(e));
        assert!(!world.has_raw(e, tag));
        assert_eq!(world.count(tag), 0);
    }

    #[test]
    fn test_required_tag_attached_on_add() {
        let mut world = World::new();
        let e = world.create();
        let tag = world.register::<SceneTag>().unwrap();
        world.set_required_tag(Some(tag));

        // Not retrofitted until the entity gains a component.
        assert!(!world.has_raw(e, tag));
        world.add::<Position>(e).unwrap();
        assert!(world.has_raw(e, tag));
    }

    #[test]
    fn test_create_at_entity_limit() {
        let mut world = World::with_config(WorldConfig::new().with_max_entities(2));
        let first = world.create();
        world.create();
        assert_eq!(world.create(), Entity::INVALID);
        assert_eq!(world.entity_count(), 2);

        world.destroy(first);
        let reused = world.create();
        assert!(world.is_alive(reused));
        assert_eq!(reused.index(), first.index());
    }

    #[test]
    fn test_required_tag_from_config() {
        let mut world = World::with_config(WorldConfig::new().with_required_tag("SceneTag"));
        assert_eq!(world.required_tag(), None);
        let tag = world.register::<SceneTag>().unwrap();
        assert_eq!(world.required_tag(), Some(tag));
        let e = world.create();
        assert!(world.has::<SceneTag>(e));
    }

    #[test]
    fn test_set_required_tag_rejects_unknown_type() {
        let mut world = World::new();
        assert!(!world.set_required_tag(Some(ComponentTypeId(4))));
        assert_eq!(world.required_tag(), None);
    }

    #[test]
    fn test_dead_handle_noops() {
        let mut world = World::new();
        let id = world.register::<Position>().unwrap();
        let e = world.create();
        let other = world.create();
        world.add::<Position>(e).unwrap();
        world.add::<Position>(other).unwrap();
        world.destroy(e);

        let before = world.count(id);
        assert!(world.get_raw(e, id).is_none());
        assert!(!world.has_raw(e, id));
        assert!(!world.remove_raw(e, id));
        assert!(world.add_raw(e, id).is_none());
        assert_eq!(world.count(id), before);
    }

    #[test]
    fn test_invalid_type_id_noops() {
        let mut world = World::new();
        let e = world.create();
        assert!(world.add_raw(e, ComponentTypeId::INVALID).is_none());
        assert!(world.add_raw(e, ComponentTypeId(9)).is_none());
        assert_eq!(world.count(ComponentTypeId(9)), 0);
        assert!(world.dense(ComponentTypeId(9)).is_empty());
        assert!(world.entity_at(ComponentTypeId(9), 0).is_none());
    }

    #[test]
    fn test_pools_grow_with_entity_table() {
        let mut world = World::new();
        let id = world.register::<Position>().unwrap();
        for _ in 0..10 {
            world.create();
        }
        assert_eq!(world.pool(id).unwrap().sparse_len(), 10);

        let late = world.register_raw(ComponentInfo::new("Late", 4)).unwrap();
        assert_eq!(world.pool(late).unwrap().sparse_len(), 10);
    }

    #[test]
    fn test_destroy_detaches_from_every_pool() {
        let mut world = World::new();
        let e = world.create();
        let keep = world.create();
        world.add::<Position>(e).unwrap();
        world.add::<Scale>(e).unwrap();
        world.add::<Position>(keep).unwrap();

        world.destroy(e);
        assert_eq!(world.components::<Position>().len(), 1);
        assert!(world.components::<Scale>().is_empty());
        assert_eq!(world.entity_at(world.id_of::<Position>().unwrap(), 0), Some(keep));
    }

    #[test]
    fn test_component_types_and_clear() {
        let mut world = World::new();
        let e = world.create();
        world.add::<Scale>(e).unwrap();
        world.add::<Position>(e).unwrap();
        let scale = world.id_of::<Scale>().unwrap();
        let position = world.id_of::<Position>().unwrap();
        assert_eq!(world.component_types(e), vec![scale, position]);

        world.clear();
        assert_eq!(world.entity_count(), 0);
        assert_eq!(world.count(scale), 0);
        assert!(world.component_types(e).is_empty());
        assert_eq!(world.registry().len(), 2);
    }

    #[test]
    fn test_typed_dense_slice() {
        let mut world = World::new();
        for i in 0..4 {
            let e = world.create();
            world.add::<Position>(e).unwrap().y = i as f32;
        }
        let ys: Vec<f32> = world.components::<Position>().iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![0.0, 1.0, 2.0, 3.0]);
    }
}
