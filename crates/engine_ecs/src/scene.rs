//! Binary scene format.
//!
//! Every integer is little-endian. Layout:
//!
//! ```text
//! u32 magic ("ECSW")  u32 version  u32 required tag id (0 = none)
//! u32 live entity count
//!     { u32 index, u32 generation } * count
//! u32 type count
//!     u16 name length, name bytes (UTF-8, no terminator)
//!     u32 component count
//!         { u32 entity index, u32 payload length, payload } * count
//! ```
//!
//! Every registered type is written in id order, including empty ones, so
//! the required tag id is also the 1-based position of its block. Types are
//! matched by name on load, so a file stays loadable after registration
//! order changes. Entity indices and generations are restored exactly,
//! which keeps handles saved alongside the scene valid.

use std::path::Path;

use tracing::{info, warn};

use engine_component::{ComponentBase, ComponentTypeId};

use crate::error::SceneError;
use crate::world::World;

/// `"ECSW"` read as a little-endian `u32`.
pub const SCENE_MAGIC: u32 = u32::from_le_bytes(*b"ECSW");

/// Current format version.
pub const SCENE_VERSION: u32 = 1;

impl World {
    /// Serialize the whole world into a byte buffer.
    ///
    /// # Errors
    ///
    /// Fails if a custom save hook fails or a count does not fit the format.
    pub fn save_to_vec(&self) -> Result<Vec<u8>, SceneError> {
        let mut out = Vec::new();
        put_u32(&mut out, SCENE_MAGIC);
        put_u32(&mut out, SCENE_VERSION);
        put_u32(&mut out, self.required_tag.map_or(0, |id| id.0));

        put_u32(&mut out, count_u32(self.entities.alive_count())?);
        for entity in self.entities.iter() {
            put_u32(&mut out, entity.index());
            put_u32(&mut out, entity.generation());
        }

        put_u32(&mut out, count_u32(self.registry.len())?);
        let mut payload = Vec::new();
        let mut components = 0;
        for (id, info) in self.registry.iter() {
            let name_len = u16::try_from(info.name.len()).map_err(|_| SceneError::NameTooLong {
                name: info.name.clone(),
            })?;
            out.extend_from_slice(&name_len.to_le_bytes());
            out.extend_from_slice(info.name.as_bytes());

            let Some(pool) = self.pool(id) else {
                put_u32(&mut out, 0);
                continue;
            };
            put_u32(&mut out, count_u32(pool.len())?);
            for (slot, &index) in pool.entity_indices().iter().enumerate() {
                payload.clear();
                info.save(pool.get(slot).unwrap_or_default(), &mut payload)
                    .map_err(|source| SceneError::Codec {
                        type_name: info.name.clone(),
                        source,
                    })?;
                put_u32(&mut out, index);
                put_u32(&mut out, count_u32(payload.len())?);
                out.extend_from_slice(&payload);
            }
            components += pool.len();
        }

        info!(
            entities = self.entities.alive_count(),
            types = self.registry.len(),
            components,
            bytes = out.len(),
            "saved scene"
        );
        Ok(out)
    }

    /// Replace the world's contents with a scene produced by
    /// [`World::save_to_vec`].
    ///
    /// Registered types are kept; components of types this world does not
    /// know are skipped. Constructor hooks do not run. On error the world is
    /// left with no live entities and empty pools.
    ///
    /// # Errors
    ///
    /// Fails on a bad header, truncated data, a component whose entity is not
    /// in the entity table, or a failing load hook.
    pub fn load_from_slice(&mut self, bytes: &[u8]) -> Result<(), SceneError> {
        let configured_tag = self.required_tag;
        self.reset();
        if let Err(err) = self.decode_scene(bytes) {
            self.reset();
            self.required_tag = configured_tag;
            return Err(err);
        }
        Ok(())
    }

    /// Save the scene to a file, replacing it.
    ///
    /// # Errors
    ///
    /// See [`World::save_to_vec`]; also fails if the file cannot be written.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let bytes = self.save_to_vec()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a scene file. The world is untouched if the file cannot be read.
    ///
    /// # Errors
    ///
    /// See [`World::load_from_slice`]; also fails if the file cannot be read.
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let bytes = std::fs::read(path)?;
        self.load_from_slice(&bytes)
    }

    fn decode_scene(&mut self, bytes: &[u8]) -> Result<(), SceneError> {
        let mut reader = SceneReader::new(bytes);

        let magic = reader.u32()?;
        if magic != SCENE_MAGIC {
            return Err(SceneError::BadMagic(magic));
        }
        let version = reader.u32()?;
        if version != SCENE_VERSION {
            return Err(SceneError::UnsupportedVersion(version));
        }
        let tag = ComponentTypeId(reader.u32()?);

        let entity_count = reader.u32()?;
        for _ in 0..entity_count {
            let index = reader.u32()?;
            let generation = reader.u32()?;
            if self.entities.restore(index, generation).is_none() {
                return Err(SceneError::InvalidEntity {
                    index,
                    generation,
                    limit: self.entities.limit(),
                });
            }
        }
        self.entities.rebuild_free_list();
        self.grow_pools();

        let type_count = reader.u32()?;
        let mut components = 0usize;
        let mut local_tag = ComponentTypeId::INVALID;
        for position in 0..type_count {
            let name_len = reader.u16()?;
            let name = std::str::from_utf8(reader.take(usize::from(name_len))?)
                .map_err(|_| SceneError::InvalidName)?;
            let count = reader.u32()?;

            let id = self.registry.id_by_name(name);
            if tag.slot() == Some(position as usize) {
                local_tag = id;
            }
            if !id.is_valid() {
                warn!(name, count, "skipping components of unregistered type");
                for _ in 0..count {
                    reader.u32()?;
                    let size = reader.u32()?;
                    reader.take(size as usize)?;
                }
                continue;
            }

            for _ in 0..count {
                let index = reader.u32()?;
                let size = reader.u32()?;
                let payload = reader.take(size as usize)?;
                self.load_component(id, index, payload)?;
            }
            components += count as usize;
        }

        if reader.remaining() > 0 {
            warn!(bytes = reader.remaining(), "ignoring trailing scene bytes");
        }

        if tag.is_valid() {
            if local_tag.is_valid() {
                self.required_tag = Some(local_tag);
            } else {
                warn!(id = tag.0, "scene's required tag type is not registered, dropping it");
            }
        }

        info!(
            entities = self.entities.alive_count(),
            types = type_count,
            components,
            "loaded scene"
        );
        Ok(())
    }

    fn load_component(&mut self, id: ComponentTypeId, index: u32, payload: &[u8]) -> Result<(), SceneError> {
        let entity = self.entities.handle(index);
        let slot = entity.and_then(|entity| self.attach(entity, id, false));
        let (Some(entity), Some(slot)) = (entity, slot) else {
            return Err(SceneError::DanglingComponent {
                type_name: self.type_name(id),
                entity_index: index,
            });
        };

        let Some(info) = self.registry.get(id) else {
            return Ok(());
        };
        let Some(component) = id
            .slot()
            .and_then(|pool| self.pools.get_mut(pool))
            .and_then(|pool| pool.get_mut(slot))
        else {
            return Ok(());
        };
        info.load(component, payload)
            .map_err(|source| SceneError::Codec {
                type_name: info.name.clone(),
                source,
            })?;
        // Load hooks see the whole record; the base always reflects the new owner.
        info.write_base(component, ComponentBase::new(entity, id));
        Ok(())
    }

    fn type_name(&self, id: ComponentTypeId) -> String {
        self.registry
            .get(id)
            .map_or_else(String::new, |info| info.name.clone())
    }
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn count_u32(count: usize) -> Result<u32, SceneError> {
    u32::try_from(count).map_err(|_| SceneError::CountOverflow)
}

/// Bounds-checked cursor over a scene buffer.
struct SceneReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> SceneReader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], SceneError> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(SceneError::Truncated {
                needed: len,
                remaining,
            });
        }
        let out = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    fn u16(&mut self) -> Result<u16, SceneError> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32, SceneError> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }
}

#[cfg(test)]
mod tests {
    use bytemuck::{Pod, Zeroable};
    use serde::{Deserialize, Serialize};

    use engine_component::{Codec, CodecError, Component, ComponentCodec, ComponentInfo, Entity};

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Position {
        base: ComponentBase,
        x: f32,
        y: f32,
        z: f32,
        _pad: u32,
    }

    impl Component for Position {
        const NAME: &'static str = "Position";
        const BASE_OFFSET: Option<usize> = Some(std::mem::offset_of!(Position, base));
    }

    /// Persists only `value`; `cache` is rebuilt on load.
    #[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Counter {
        value: u32,
        cache: u32,
    }

    impl Component for Counter {
        const NAME: &'static str = "Counter";

        fn construct(&mut self) {
            self.value = 99;
        }

        fn codec() -> Codec {
            Codec::custom::<Self>()
        }
    }

    impl ComponentCodec for Counter {
        fn save(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
            out.extend_from_slice(&self.value.to_le_bytes());
            Ok(())
        }

        fn load(&mut self, payload: &[u8]) -> Result<(), CodecError> {
            let bytes: [u8; 4] = payload.try_into().map_err(|_| CodecError::PayloadSize {
                expected: 4,
                actual: payload.len(),
            })?;
            self.value = u32::from_le_bytes(bytes);
            self.cache = self.value * 2;
            Ok(())
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
    #[repr(C)]
    struct Stats {
        strength: u16,
        agility: u16,
    }

    impl Component for Stats {
        const NAME: &'static str = "Stats";

        fn codec() -> Codec {
            Codec::msgpack::<Self>()
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct SceneTag {
        layer: u32,
    }

    impl Component for SceneTag {
        const NAME: &'static str = "SceneTag";
    }

    fn registered_world() -> World {
        let mut world = World::new();
        world.register::<Position>().unwrap();
        world.register::<Counter>().unwrap();
        world.register::<Stats>().unwrap();
        world
    }

    #[test]
    fn test_round_trip_with_both_codecs() {
        let mut world = registered_world();
        let e1 = world.create();
        let e2 = world.create();
        {
            let position = world.add::<Position>(e1).unwrap();
            position.x = 1.0;
            position.y = 2.0;
            position.z = 3.0;
        }
        world.add::<Counter>(e1).unwrap().value = 7;
        *world.add::<Stats>(e2).unwrap() = Stats {
            strength: 12,
            agility: 4,
        };

        let bytes = world.save_to_vec().unwrap();
        let mut loaded = registered_world();
        loaded.load_from_slice(&bytes).unwrap();

        assert_eq!(loaded.entity_count(), 2);
        let position = loaded.get::<Position>(e1).unwrap();
        assert_eq!((position.x, position.y, position.z), (1.0, 2.0, 3.0));
        assert_eq!(position.base().unwrap().entity(), e1);
        assert_eq!(
            position.base().unwrap().type_id(),
            loaded.id_of::<Position>().unwrap()
        );

        // Custom codec ran, constructor did not.
        let counter = loaded.get::<Counter>(e1).unwrap();
        assert_eq!(counter.value, 7);
        assert_eq!(counter.cache, 14);

        assert_eq!(
            *loaded.get::<Stats>(e2).unwrap(),
            Stats {
                strength: 12,
                agility: 4
            }
        );
        assert!(!loaded.has::<Position>(e2));
    }

    #[test]
    fn test_generations_and_free_list_survive() {
        let mut world = registered_world();
        let a = world.create();
        let b = world.create();
        world.destroy(a);
        let a2 = world.create();
        let c = world.create();
        world.destroy(c);
        assert_eq!(a2.generation(), 2);

        let bytes = world.save_to_vec().unwrap();
        let mut loaded = registered_world();
        loaded.load_from_slice(&bytes).unwrap();

        assert!(loaded.is_alive(a2));
        assert!(loaded.is_alive(b));
        assert!(!loaded.is_alive(a));
        assert!(!loaded.is_alive(c));
        let reused = loaded.create();
        assert_eq!(reused.index(), c.index());
    }

    #[test]
    fn test_load_replaces_existing_contents() {
        let mut source = registered_world();
        let kept = source.create();
        source.add::<Counter>(kept).unwrap();
        let bytes = source.save_to_vec().unwrap();

        let mut world = registered_world();
        for _ in 0..5 {
            let e = world.create();
            world.add::<Stats>(e).unwrap();
        }
        world.load_from_slice(&bytes).unwrap();
        assert_eq!(world.entity_count(), 1);
        assert_eq!(world.components::<Stats>().len(), 0);
        assert_eq!(world.components::<Counter>().len(), 1);
    }

    #[test]
    fn test_unknown_types_are_skipped() {
        let mut world = registered_world();
        let e = world.create();
        world.add::<Stats>(e).unwrap().strength = 3;
        world.add::<Counter>(e).unwrap();
        let bytes = world.save_to_vec().unwrap();

        let mut loaded = World::new();
        loaded.register::<Counter>().unwrap();
        loaded.load_from_slice(&bytes).unwrap();
        assert!(loaded.is_alive(e));
        assert!(loaded.has::<Counter>(e));
        assert_eq!(loaded.registry().len(), 1);
    }

    #[test]
    fn test_types_matched_by_name() {
        let mut world = registered_world();
        let e = world.create();
        world.add::<Stats>(e).unwrap().agility = 9;
        let bytes = world.save_to_vec().unwrap();

        let mut loaded = World::new();
        loaded.register::<Stats>().unwrap();
        loaded.register::<Position>().unwrap();
        loaded.load_from_slice(&bytes).unwrap();
        assert_eq!(loaded.get::<Stats>(e).unwrap().agility, 9);
    }

    #[test]
    fn test_header_layout() {
        let mut world = World::new();
        world.register_raw(ComponentInfo::new("Blob", 3)).unwrap();
        let e = world.create();
        world.add_raw(e, ComponentTypeId(1)).unwrap().copy_from_slice(&[1, 2, 3]);
        let bytes = world.save_to_vec().unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(b"ECSW");
        expected.extend_from_slice(&1u32.to_le_bytes());
        expected.extend_from_slice(&0u32.to_le_bytes());
        expected.extend_from_slice(&1u32.to_le_bytes());
        expected.extend_from_slice(&0u32.to_le_bytes());
        expected.extend_from_slice(&1u32.to_le_bytes());
        expected.extend_from_slice(&1u32.to_le_bytes());
        expected.extend_from_slice(&4u16.to_le_bytes());
        expected.extend_from_slice(b"Blob");
        expected.extend_from_slice(&1u32.to_le_bytes());
        expected.extend_from_slice(&0u32.to_le_bytes());
        expected.extend_from_slice(&3u32.to_le_bytes());
        expected.extend_from_slice(&[1, 2, 3]);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_empty_types_are_written() {
        let world = registered_world();
        let bytes = world.save_to_vec().unwrap();
        // Header, no entities, three types with zero components.
        let names = "Position".len() + "Counter".len() + "Stats".len();
        assert_eq!(bytes.len(), 16 + 4 + 3 * (2 + 4) + names);
    }

    #[test]
    fn test_bad_magic_leaves_world_empty() {
        let mut world = registered_world();
        let e = world.create();
        world.add::<Counter>(e).unwrap();

        let mut bytes = world.save_to_vec().unwrap();
        bytes[0] = b'X';
        let err = world.load_from_slice(&bytes).unwrap_err();
        assert!(matches!(err, SceneError::BadMagic(_)));
        assert_eq!(world.entity_count(), 0);
        assert_eq!(world.components::<Counter>().len(), 0);
    }

    #[test]
    fn test_unsupported_version() {
        let mut world = registered_world();
        let e = world.create();
        world.add::<Counter>(e).unwrap();
        world.add::<Stats>(e).unwrap();

        let mut bytes = world.save_to_vec().unwrap();
        bytes[4..8].copy_from_slice(&2u32.to_le_bytes());
        assert!(matches!(
            world.load_from_slice(&bytes),
            Err(SceneError::UnsupportedVersion(2))
        ));
        assert_eq!(world.entity_count(), 0);
        assert!(!world.is_alive(e));
        assert_eq!(world.components::<Counter>().len(), 0);
        assert_eq!(world.components::<Stats>().len(), 0);
    }

    /// Header followed by a single-entry entity table and no types.
    fn entity_table_scene(index: u32, generation: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        for value in [SCENE_MAGIC, SCENE_VERSION, 0, 1, index, generation, 0] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn test_generation_zero_rejected() {
        let mut world = registered_world();
        world.create();
        let err = world.load_from_slice(&entity_table_scene(0, 0)).unwrap_err();
        assert!(matches!(err, SceneError::InvalidEntity { index: 0, generation: 0, .. }));
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn test_entity_index_past_limit_rejected() {
        let mut world = registered_world();
        let err = world
            .load_from_slice(&entity_table_scene(0xFFFF_FFFE, 1))
            .unwrap_err();
        assert!(matches!(err, SceneError::InvalidEntity { index: 0xFFFF_FFFE, .. }));
        assert_eq!(world.entity_count(), 0);
        assert!(world.entities.is_empty());

        // Within the limit the same layout loads.
        world.load_from_slice(&entity_table_scene(3, 5)).unwrap();
        assert!(world.is_alive(Entity::new(3, 5)));
    }

    #[test]
    fn test_required_tag_survives_registration_order_change() {
        let mut world = World::new();
        world.register::<Counter>().unwrap();
        let tag = world.register::<SceneTag>().unwrap();
        world.set_required_tag(Some(tag));
        let e = world.create();
        world.add::<Counter>(e).unwrap();
        let bytes = world.save_to_vec().unwrap();

        let mut loaded = World::new();
        let local_tag = loaded.register::<SceneTag>().unwrap();
        let counter = loaded.register::<Counter>().unwrap();
        assert_ne!(local_tag, tag);
        loaded.load_from_slice(&bytes).unwrap();

        assert_eq!(loaded.required_tag(), Some(local_tag));
        assert!(loaded.has::<SceneTag>(e));
        assert!(!loaded.remove_raw(e, local_tag));
        assert!(loaded.remove_raw(e, counter));

        let fresh = loaded.create();
        assert!(loaded.has::<SceneTag>(fresh));
        assert!(!loaded.has::<Counter>(fresh));
    }

    #[test]
    fn test_required_tag_dropped_when_type_unknown() {
        let mut world = World::new();
        world.register::<Counter>().unwrap();
        let tag = world.register::<SceneTag>().unwrap();
        world.set_required_tag(Some(tag));
        world.create();
        let bytes = world.save_to_vec().unwrap();

        let mut loaded = World::new();
        loaded.register::<Counter>().unwrap();
        loaded.register::<Stats>().unwrap();
        loaded.load_from_slice(&bytes).unwrap();
        assert_eq!(loaded.required_tag(), None);
        let fresh = loaded.create();
        assert!(loaded.component_types(fresh).is_empty());
    }

    #[test]
    fn test_truncated_scene() {
        let mut world = registered_world();
        let e = world.create();
        world.add::<Position>(e).unwrap();
        let bytes = world.save_to_vec().unwrap();

        for cut in [3, 10, 20, bytes.len() - 1] {
            let mut target = registered_world();
            let err = target.load_from_slice(&bytes[..cut]).unwrap_err();
            assert!(matches!(err, SceneError::Truncated { .. }), "cut at {cut}");
            assert_eq!(target.entity_count(), 0);
        }
    }

    #[test]
    fn test_dangling_component_rejected() {
        let mut world = World::new();
        let id = world.register_raw(ComponentInfo::new("Blob", 1)).unwrap();
        let e = world.create();
        world.add_raw(e, id).unwrap();
        let mut bytes = world.save_to_vec().unwrap();

        // Point the single component at entity index 5.
        let at = bytes.len() - 1 - 4 - 4;
        bytes[at..at + 4].copy_from_slice(&5u32.to_le_bytes());
        let err = world.load_from_slice(&bytes).unwrap_err();
        assert!(matches!(
            err,
            SceneError::DanglingComponent { entity_index: 5, .. }
        ));
        assert_eq!(world.count(id), 0);
    }

    #[test]
    fn test_raw_payload_length_checked() {
        let mut world = World::new();
        let id = world.register_raw(ComponentInfo::new("Blob", 2)).unwrap();
        let e = world.create();
        world.add_raw(e, id).unwrap();
        let bytes = world.save_to_vec().unwrap();

        let mut other = World::new();
        other.register_raw(ComponentInfo::new("Blob", 4)).unwrap();
        let err = other.load_from_slice(&bytes).unwrap_err();
        assert!(matches!(err, SceneError::Codec { .. }));
        assert_eq!(other.entity_count(), 0);
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut world = registered_world();
        let e = world.create();
        let mut bytes = world.save_to_vec().unwrap();
        bytes.extend_from_slice(&[0xAA; 7]);
        world.load_from_slice(&bytes).unwrap();
        assert!(world.is_alive(e));
    }

    #[test]
    fn test_required_tag_round_trip() {
        let mut world = registered_world();
        let tag = world.register::<SceneTag>().unwrap();
        world.set_required_tag(Some(tag));
        let e = world.create();
        world.get_mut::<SceneTag>(e).unwrap().layer = 4;
        let bytes = world.save_to_vec().unwrap();

        let mut loaded = registered_world();
        loaded.register::<SceneTag>().unwrap();
        loaded.load_from_slice(&bytes).unwrap();
        assert_eq!(loaded.required_tag(), Some(tag));
        assert_eq!(loaded.get::<SceneTag>(e).unwrap().layer, 4);
        assert_eq!(loaded.count(tag), 1);
        let fresh = loaded.create();
        assert!(loaded.has::<SceneTag>(fresh));
    }

    #[test]
    fn test_failed_load_keeps_configured_tag() {
        let mut world = registered_world();
        let tag = world.register::<SceneTag>().unwrap();
        world.set_required_tag(Some(tag));
        assert!(world.load_from_slice(b"nope").is_err());
        assert_eq!(world.required_tag(), Some(tag));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("engine_ecs_scene_{}.bin", std::process::id()));
        let mut world = registered_world();
        let e = world.create();
        world.add::<Counter>(e).unwrap().value = 31;
        world.save_to_file(&path).unwrap();

        let mut loaded = registered_world();
        loaded.load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.get::<Counter>(e).unwrap().value, 31);

        let missing = std::env::temp_dir().join("engine_ecs_scene_missing.bin");
        assert!(matches!(loaded.load_from_file(&missing), Err(SceneError::Io(_))));
        assert!(loaded.is_alive(e));
    }

    #[test]
    fn test_constructor_not_run_on_load() {
        let mut world = registered_world();
        let e = world.create();
        world.add::<Counter>(e).unwrap().value = 0;
        let bytes = world.save_to_vec().unwrap();
        world.load_from_slice(&bytes).unwrap();
        assert_eq!(world.get::<Counter>(e).unwrap().value, 0);
    }
}
