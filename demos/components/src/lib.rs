//! Example component definitions for the scene ECS.
//!
//! These demonstrate the three ways a component can be persisted:
//!
//! - the default raw codec ([`Velocity`], [`Transform`], [`SceneTag`]),
//! - MessagePack through serde ([`Health`]),
//! - a hand-written [`ComponentCodec`] ([`Label`]).
//!
//! [`Transform`] and [`SceneTag`] also embed a [`ComponentBase`], so they
//! always know which entity owns them.

use bytemuck::{Pod, Zeroable};
use engine_component::{Codec, CodecError, Component, ComponentBase, ComponentCodec, RegistryError};
use engine_ecs::World;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Position and scale in world space.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Transform {
    /// Owner record, maintained by the world.
    pub base: ComponentBase,
    /// World-space position.
    pub position: Vec3,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Component for Transform {
    const NAME: &'static str = "Transform";
    const BASE_OFFSET: Option<usize> = Some(std::mem::offset_of!(Transform, base));

    fn construct(&mut self) {
        self.scale = Vec3::ONE;
    }
}

/// A 3D velocity component.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Velocity {
    /// Linear velocity in world units per second.
    pub linear: Vec3,
}

impl Velocity {
    /// Create a new velocity.
    #[must_use]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            linear: Vec3::new(x, y, z),
        }
    }
}

impl Component for Velocity {
    const NAME: &'static str = "Velocity";
}

/// A health component with current and maximum hit points.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
#[repr(C)]
pub struct Health {
    /// Current hit points.
    pub current: f32,
    /// Maximum hit points.
    pub max: f32,
}

impl Health {
    /// Create a new health component at full HP.
    #[must_use]
    pub fn full(max: f32) -> Self {
        Self { current: max, max }
    }

    /// Returns `true` if the entity is alive (HP > 0).
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Apply damage, clamping to zero.
    pub fn damage(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }

    /// Heal, clamping to max.
    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
    }
}

impl Component for Health {
    const NAME: &'static str = "Health";

    fn construct(&mut self) {
        *self = Self::full(100.0);
    }

    fn codec() -> Codec {
        Codec::msgpack::<Self>()
    }
}

/// Capacity of a [`Label`] in bytes.
pub const LABEL_CAPACITY: usize = 60;

/// A short display name stored inline.
///
/// Persisted as its used bytes only, not the whole buffer.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Label {
    text: [u8; LABEL_CAPACITY],
    len: u32,
}

impl Label {
    /// Create a label, truncating `text` to [`LABEL_CAPACITY`] bytes on a
    /// character boundary.
    #[must_use]
    pub fn new(text: &str) -> Self {
        let mut label = Self::zeroed();
        label.set(text);
        label
    }

    /// Replace the label text.
    pub fn set(&mut self, text: &str) {
        let mut end = text.len().min(LABEL_CAPACITY);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        self.text = [0; LABEL_CAPACITY];
        self.text[..end].copy_from_slice(&text.as_bytes()[..end]);
        self.len = end as u32;
    }

    /// The label text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        let len = (self.len as usize).min(LABEL_CAPACITY);
        std::str::from_utf8(&self.text[..len]).unwrap_or_default()
    }
}

impl Component for Label {
    const NAME: &'static str = "Label";

    fn codec() -> Codec {
        Codec::custom::<Self>()
    }
}

impl ComponentCodec for Label {
    fn save(&self, out: &mut Vec<u8>) -> Result<(), CodecError> {
        out.extend_from_slice(self.as_str().as_bytes());
        Ok(())
    }

    fn load(&mut self, payload: &[u8]) -> Result<(), CodecError> {
        if payload.len() > LABEL_CAPACITY {
            return Err(CodecError::PayloadSize {
                expected: LABEL_CAPACITY,
                actual: payload.len(),
            });
        }
        let text = std::str::from_utf8(payload)
            .map_err(|err| CodecError::Invalid(format!("label is not UTF-8: {err}")))?;
        self.set(text);
        Ok(())
    }
}

/// Marks entities that belong to the scene. Used as the required tag.
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct SceneTag {
    /// Owner record, maintained by the world.
    pub base: ComponentBase,
    /// Render layer.
    pub layer: u32,
    _pad: u32,
}

impl Component for SceneTag {
    const NAME: &'static str = "SceneTag";
    const BASE_OFFSET: Option<usize> = Some(std::mem::offset_of!(SceneTag, base));
}

/// Register every demo component with `world`.
///
/// # Errors
///
/// Fails if a name is already taken by a differently sized type.
pub fn register_all(world: &mut World) -> Result<(), RegistryError> {
    world.register::<SceneTag>()?;
    world.register::<Transform>()?;
    world.register::<Velocity>()?;
    world.register::<Health>()?;
    world.register::<Label>()?;
    Ok(())
}
