//! Component type registry.
//!
//! Maps type names to dense [`ComponentTypeId`]s. Registration is idempotent:
//! registering a name that is already known returns the existing id and
//! leaves the first registration's metadata in place.

use std::collections::HashMap;

use tracing::debug;

use crate::component::{Component, ComponentBase, ComponentInfo, ComponentTypeId};
use crate::error::RegistryError;
use crate::pool::MAX_COMPONENT_ALIGN;

/// Registry of every component type known to a world.
///
/// `infos[i]` describes the type with id `i + 1`; id 0 is never handed out.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    infos: Vec<ComponentInfo>,
    by_name: HashMap<String, ComponentTypeId>,
}

impl TypeRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type, or return the id it already has.
    ///
    /// # Errors
    ///
    /// Fails if the name is empty or too long, the size is zero, the
    /// alignment exceeds what pools provide, or the base record does not fit.
    pub fn register(&mut self, info: ComponentInfo) -> Result<ComponentTypeId, RegistryError> {
        if info.name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        if let Some(&id) = self.by_name.get(&info.name) {
            return Ok(id);
        }
        if info.name.len() > usize::from(u16::MAX) {
            return Err(RegistryError::NameTooLong {
                len: info.name.len(),
            });
        }
        if info.size == 0 {
            return Err(RegistryError::ZeroSize(info.name));
        }
        if !info.align.is_power_of_two() || info.align > MAX_COMPONENT_ALIGN {
            return Err(RegistryError::UnsupportedAlignment {
                name: info.name,
                align: info.align,
                max: MAX_COMPONENT_ALIGN,
            });
        }
        if let Some(offset) = info.base_offset {
            let end = offset.checked_add(ComponentBase::SIZE);
            if end.is_none_or(|end| end > info.size) {
                return Err(RegistryError::BaseOutOfBounds {
                    name: info.name,
                    offset,
                    size: info.size,
                });
            }
        }

        let id = ComponentTypeId::from_slot(self.infos.len());
        debug!(name = %info.name, id = id.0, size = info.size, "registered component type");
        self.by_name.insert(info.name.clone(), id);
        self.infos.push(info);
        Ok(id)
    }

    /// Register a Rust component type.
    ///
    /// # Errors
    ///
    /// Same as [`TypeRegistry::register`], plus
    /// [`RegistryError::SizeMismatch`] if the name is already taken by a type
    /// of a different size.
    pub fn register_component<T: Component>(&mut self) -> Result<ComponentTypeId, RegistryError> {
        let id = self.register(T::info())?;
        let registered = self.get(id).map_or(0, |info| info.size);
        if registered != std::mem::size_of::<T>() {
            return Err(RegistryError::SizeMismatch {
                name: T::NAME.to_owned(),
                registered,
                requested: std::mem::size_of::<T>(),
            });
        }
        Ok(id)
    }

    /// Id registered under `name`, or [`ComponentTypeId::INVALID`].
    #[must_use]
    pub fn id_by_name(&self, name: &str) -> ComponentTypeId {
        self.by_name
            .get(name)
            .copied()
            .unwrap_or(ComponentTypeId::INVALID)
    }

    /// Id of a Rust component type, if it is registered with a matching size.
    #[must_use]
    pub fn id_of<T: Component>(&self) -> Option<ComponentTypeId> {
        let id = self.by_name.get(T::NAME).copied()?;
        (self.get(id)?.size == std::mem::size_of::<T>()).then_some(id)
    }

    /// Metadata for a registered type.
    #[must_use]
    pub fn get(&self, id: ComponentTypeId) -> Option<&ComponentInfo> {
        self.infos.get(id.slot()?)
    }

    /// Returns `true` if `id` names a registered type.
    #[must_use]
    pub fn contains(&self, id: ComponentTypeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of registered types (the reserved id 0 is not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.infos.len()
    }

    /// Returns `true` if no type has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Registered types in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ComponentTypeId, &ComponentInfo)> {
        self.infos
            .iter()
            .enumerate()
            .map(|(slot, info)| (ComponentTypeId::from_slot(slot), info))
    }
}
