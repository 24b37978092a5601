//! Core [`Component`] trait and runtime type metadata.
//!
//! Components are plain-old-data records stored as raw bytes in per-type
//! pools. A type is described at runtime by a [`ComponentInfo`]: its name,
//! byte size, where (if anywhere) it embeds a [`ComponentBase`], the
//! [`Codec`] used to persist it, and an optional constructor hook.
//!
//! ## Persistence strategies
//!
//! The codec is chosen once per type at registration time:
//!
//! - [`Codec::Raw`] copies every byte of the record except the embedded base,
//!   which is rebuilt from context on load.
//! - [`Codec::Custom`] calls a pair of save/load function pointers, typically
//!   produced by [`Codec::custom`] for a [`ComponentCodec`] implementor or by
//!   [`Codec::msgpack`] for serde-enabled components.

use std::ops::Range;

use bytemuck::{Pod, Zeroable};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::entity::Entity;
use crate::error::CodecError;

/// Dense, registration-ordered identifier of a component type.
///
/// Id 0 is permanently reserved as "invalid / none"; the first registered
/// type gets id 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ComponentTypeId(pub u32);

impl ComponentTypeId {
    /// The reserved invalid id.
    pub const INVALID: ComponentTypeId = ComponentTypeId(0);

    /// Returns `true` for any id other than [`ComponentTypeId::INVALID`].
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// Position of this type in registration-ordered tables.
    #[must_use]
    pub const fn slot(self) -> Option<usize> {
        match self.0 {
            0 => None,
            id => Some(id as usize - 1),
        }
    }

    /// Id for the type stored at `slot` in registration-ordered tables.
    #[must_use]
    pub const fn from_slot(slot: usize) -> Self {
        Self(slot as u32 + 1)
    }
}

impl std::fmt::Display for ComponentTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ComponentType({})", self.0)
    }
}

/// Header a component may embed to know its owner.
///
/// When a type declares a base offset, the world writes this record into the
/// component on every add and after every load. The default codec never
/// persists it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
#[repr(C)]
pub struct ComponentBase {
    /// Raw handle of the owning entity.
    pub entity: u64,
    /// Raw [`ComponentTypeId`] of the component.
    pub type_id: u32,
    /// Per-instance flags, zero on creation.
    pub flags: u32,
}

impl ComponentBase {
    /// Size of the base record in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Base record for a freshly attached component.
    #[must_use]
    pub const fn new(entity: Entity, type_id: ComponentTypeId) -> Self {
        Self {
            entity: entity.id(),
            type_id: type_id.0,
            flags: 0,
        }
    }

    /// The owning entity.
    #[must_use]
    pub const fn entity(&self) -> Entity {
        Entity::from_raw(self.entity)
    }

    /// The component's type id.
    #[must_use]
    pub const fn type_id(&self) -> ComponentTypeId {
        ComponentTypeId(self.type_id)
    }
}

/// Save hook: append the persisted form of `component` to `out`.
pub type SaveFn = fn(component: &[u8], out: &mut Vec<u8>) -> Result<(), CodecError>;

/// Load hook: populate `component` from a payload produced by the matching [`SaveFn`].
pub type LoadFn = fn(component: &mut [u8], payload: &[u8]) -> Result<(), CodecError>;

/// Constructor hook: seed type-specific defaults on a zeroed component.
pub type ConstructFn = fn(component: &mut [u8]);

/// How a component type is persisted.
#[derive(Debug, Clone, Copy, Default)]
pub enum Codec {
    /// Copy every byte outside the embedded base record.
    #[default]
    Raw,
    /// Type-specific save/load pair.
    Custom {
        /// Encoder.
        save: SaveFn,
        /// Decoder.
        load: LoadFn,
    },
}

impl Codec {
    /// Custom codec backed by a [`ComponentCodec`] implementation.
    #[must_use]
    pub fn custom<T: ComponentCodec>() -> Self {
        Codec::Custom {
            save: save_with_codec::<T>,
            load: load_with_codec::<T>,
        }
    }

    /// Custom codec that persists the component as MessagePack.
    #[must_use]
    pub fn msgpack<T: Component + Serialize + DeserializeOwned>() -> Self {
        Codec::Custom {
            save: save_msgpack::<T>,
            load: load_msgpack::<T>,
        }
    }

    /// Returns `true` for [`Codec::Custom`].
    #[must_use]
    pub const fn is_custom(&self) -> bool {
        matches!(self, Codec::Custom { .. })
    }
}

/// The core component trait.
///
/// Components are `Pod` records so their bytes can live in type-erased pools
/// and be viewed back as `&T` without copying. Size must be non-zero and
/// alignment at most [`MAX_COMPONENT_ALIGN`](crate::pool::MAX_COMPONENT_ALIGN).
///
/// # Examples
///
/// ```rust
/// use bytemuck::{Pod, Zeroable};
/// use engine_component::Component;
///
/// #[derive(Debug, Clone, Copy, Pod, Zeroable)]
/// #[repr(C)]
/// struct Health {
///     current: f32,
///     max: f32,
/// }
///
/// impl Component for Health {
///     const NAME: &'static str = "Health";
///
///     fn construct(&mut self) {
///         self.current = 100.0;
///         self.max = 100.0;
///     }
/// }
/// ```
pub trait Component: Pod {
    /// Registry name. Persisted in scene files, so keep it stable.
    const NAME: &'static str;

    /// Byte offset of an embedded [`ComponentBase`], if the type has one.
    const BASE_OFFSET: Option<usize> = None;

    /// Seeds defaults after the component has been zeroed and its base
    /// populated. Never called for components created by scene loading.
    fn construct(&mut self) {}

    /// Persistence strategy for this type.
    fn codec() -> Codec {
        Codec::Raw
    }

    /// Runtime description of this type.
    fn info() -> ComponentInfo {
        ComponentInfo {
            name: Self::NAME.to_owned(),
            size: std::mem::size_of::<Self>(),
            align: std::mem::align_of::<Self>(),
            base_offset: Self::BASE_OFFSET,
            codec: Self::codec(),
            construct: Some(construct_typed::<Self>),
        }
    }

    /// The embedded base record, if the type declares one.
    fn base(&self) -> Option<&ComponentBase> {
        let offset = Self::BASE_OFFSET?;
        let bytes = bytemuck::bytes_of(self).get(offset..offset + ComponentBase::SIZE)?;
        bytemuck::try_from_bytes(bytes).ok()
    }
}

/// Hand-written persistence for a component type.
///
/// Implementors opt in by returning [`Codec::custom::<Self>()`](Codec::custom)
/// from [`Component::codec`].
pub trait ComponentCodec: Component {
    /// Append the persisted form of `self` to `out`.
    fn save(&self, out: &mut Vec<u8>) -> Result<(), CodecError>;

    /// Populate `self` from a payload written by [`ComponentCodec::save`].
    fn load(&mut self, payload: &[u8]) -> Result<(), CodecError>;
}

/// Runtime metadata about a component type.
#[derive(Debug, Clone)]
pub struct ComponentInfo {
    /// Registry name.
    pub name: String,
    /// Size of one component record in bytes.
    pub size: usize,
    /// Required alignment of the record.
    pub align: usize,
    /// Offset of the embedded [`ComponentBase`], if any.
    pub base_offset: Option<usize>,
    /// Persistence strategy.
    pub codec: Codec,
    /// Constructor hook run on `add`.
    pub construct: Option<ConstructFn>,
}

impl ComponentInfo {
    /// Describe a byte-level component type with no base, raw codec and no
    /// constructor.
    #[must_use]
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            size,
            align: 1,
            base_offset: None,
            codec: Codec::Raw,
            construct: None,
        }
    }

    /// Set the required alignment.
    #[must_use]
    pub fn with_align(mut self, align: usize) -> Self {
        self.align = align;
        self
    }

    /// Declare an embedded [`ComponentBase`] at `offset`.
    #[must_use]
    pub fn with_base_offset(mut self, offset: usize) -> Self {
        self.base_offset = Some(offset);
        self
    }

    /// Set the persistence strategy.
    #[must_use]
    pub fn with_codec(mut self, codec: Codec) -> Self {
        self.codec = codec;
        self
    }

    /// Set the constructor hook.
    #[must_use]
    pub fn with_constructor(mut self, construct: ConstructFn) -> Self {
        self.construct = Some(construct);
        self
    }

    /// Byte range occupied by the embedded base record.
    #[must_use]
    pub fn base_span(&self) -> Option<Range<usize>> {
        let offset = self.base_offset?;
        Some(offset..offset.checked_add(ComponentBase::SIZE)?)
    }

    /// Number of bytes the raw codec writes per component.
    #[must_use]
    pub fn persisted_size(&self) -> usize {
        match self.base_offset {
            Some(_) => self.size.saturating_sub(ComponentBase::SIZE),
            None => self.size,
        }
    }

    /// Write `base` into the embedded base span of `component`. No-op for
    /// types without a base.
    pub fn write_base(&self, component: &mut [u8], base: ComponentBase) {
        let Some(span) = self.base_span() else {
            return;
        };
        if let Some(target) = component.get_mut(span) {
            target.copy_from_slice(bytemuck::bytes_of(&base));
        }
    }

    /// Encode one component with this type's codec.
    ///
    /// # Errors
    ///
    /// Propagates the custom save hook's error.
    pub fn save(&self, component: &[u8], out: &mut Vec<u8>) -> Result<(), CodecError> {
        match self.codec {
            Codec::Raw => {
                match self.base_span() {
                    Some(span) => {
                        out.extend_from_slice(&component[..span.start]);
                        out.extend_from_slice(&component[span.end..]);
                    }
                    None => out.extend_from_slice(component),
                }
                Ok(())
            }
            Codec::Custom { save, .. } => save(component, out),
        }
    }

    /// Decode `payload` into `component` with this type's codec.
    ///
    /// # Errors
    ///
    /// [`CodecError::PayloadSize`] if a raw payload is not exactly
    /// [`ComponentInfo::persisted_size`] bytes; otherwise the custom load
    /// hook's error.
    pub fn load(&self, component: &mut [u8], payload: &[u8]) -> Result<(), CodecError> {
        match self.codec {
            Codec::Raw => {
                let expected = self.persisted_size();
                if payload.len() != expected {
                    return Err(CodecError::PayloadSize {
                        expected,
                        actual: payload.len(),
                    });
                }
                match self.base_span() {
                    Some(span) => {
                        let (head, tail) = payload.split_at(span.start);
                        component[..span.start].copy_from_slice(head);
                        component[span.end..].copy_from_slice(tail);
                    }
                    None => component.copy_from_slice(payload),
                }
                Ok(())
            }
            Codec::Custom { load, .. } => load(component, payload),
        }
    }
}

fn construct_typed<T: Component>(component: &mut [u8]) {
    if let Ok(value) = bytemuck::try_from_bytes_mut::<T>(component) {
        value.construct();
    }
}

fn save_with_codec<T: ComponentCodec>(component: &[u8], out: &mut Vec<u8>) -> Result<(), CodecError> {
    let value: &T = bytemuck::try_from_bytes(component).map_err(CodecError::Layout)?;
    value.save(out)
}

fn load_with_codec<T: ComponentCodec>(component: &mut [u8], payload: &[u8]) -> Result<(), CodecError> {
    let value: &mut T = bytemuck::try_from_bytes_mut(component).map_err(CodecError::Layout)?;
    value.load(payload)
}

fn save_msgpack<T: Component + Serialize>(component: &[u8], out: &mut Vec<u8>) -> Result<(), CodecError> {
    let value: &T = bytemuck::try_from_bytes(component).map_err(CodecError::Layout)?;
    rmp_serde::encode::write_named(out, value)?;
    Ok(())
}

fn load_msgpack<T: Component + DeserializeOwned>(
    component: &mut [u8],
    payload: &[u8],
) -> Result<(), CodecError> {
    let target: &mut T = bytemuck::try_from_bytes_mut(component).map_err(CodecError::Layout)?;
    *target = rmp_serde::from_slice(payload)?;
    Ok(())
}
