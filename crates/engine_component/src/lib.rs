//! # engine_component
//!
//! The "E" and "C" in ECS: what an entity handle is, what a component type
//! looks like at runtime, and how one type's components are stored.
//!
//! This crate provides:
//!
//! - [`Entity`]: a generation-checked `u64` handle.
//! - [`EntityAllocator`]: liveness and generation tables with a free-list.
//! - [`Component`] trait and [`ComponentInfo`]: static and runtime type
//!   descriptions, including the [`Codec`] used to persist a type.
//! - [`TypeRegistry`]: name to [`ComponentTypeId`] mapping.
//! - [`ComponentPool`]: one sparse set of raw component bytes per type.

pub mod component;
pub mod entity;
pub mod error;
pub mod pool;
pub mod registry;

pub use component::{
    Codec, Component, ComponentBase, ComponentCodec, ComponentInfo, ComponentTypeId, ConstructFn,
    LoadFn, SaveFn,
};
pub use entity::{DEFAULT_ENTITY_LIMIT, Entity, EntityAllocator};
pub use error::{CodecError, RegistryError};
pub use pool::{ComponentPool, MAX_COMPONENT_ALIGN};
pub use registry::TypeRegistry;
