//! World configuration.

use engine_component::DEFAULT_ENTITY_LIMIT;
use serde::{Deserialize, Serialize};

/// Construction-time settings for a [`World`](crate::World).
///
/// Derives serde so hosts can embed it in their own config files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Entity slots to reserve up front. Pools created later are pre-sized
    /// to the entity table, not to this value.
    pub initial_capacity: usize,
    /// Name of the component type every entity must carry. Resolved when a
    /// type of that name is registered.
    pub required_tag: Option<String>,
    /// Cap on the entity table. `create` returns the invalid handle and scene
    /// loading fails once an index would reach it.
    pub max_entities: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 0,
            required_tag: None,
            max_entities: DEFAULT_ENTITY_LIMIT,
        }
    }
}

impl WorldConfig {
    /// Create a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve room for `capacity` entities.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Cap the entity table at `limit` slots.
    #[must_use]
    pub fn with_max_entities(mut self, limit: u32) -> Self {
        self.max_entities = limit;
        self
    }

    /// Require every entity to carry the component type named `name`.
    #[must_use]
    pub fn with_required_tag(mut self, name: impl Into<String>) -> Self {
        self.required_tag = Some(name.into());
        self
    }
}
