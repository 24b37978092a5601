//! # engine_ecs
//!
//! The world: entity lifecycle, per-type sparse-set pools, multi-component
//! views and the binary scene format.
//!
//! This crate provides:
//!
//! - [`World`]: owns the entity tables, the type registry and one
//!   [`ComponentPool`](engine_component::ComponentPool) per type, and enforces
//!   the optional required-tag policy.
//! - [`View`]: a cursor over the entities that have every one of up to
//!   [`MAX_VIEW_TYPES`] component types.
//! - [`scene`]: save/load of a whole world to a flat little-endian buffer.
//! - [`WorldConfig`]: construction-time settings.
//!
//! ## Usage
//!
//! ```rust
//! use bytemuck::{Pod, Zeroable};
//! use engine_component::Component;
//! use engine_ecs::World;
//!
//! #[derive(Debug, Clone, Copy, Pod, Zeroable)]
//! #[repr(C)]
//! struct Velocity {
//!     x: f32,
//!     y: f32,
//! }
//!
//! impl Component for Velocity {
//!     const NAME: &'static str = "Velocity";
//! }
//!
//! let mut world = World::new();
//! let e = world.create();
//! world.add::<Velocity>(e).unwrap().x = 2.0;
//! assert_eq!(world.get::<Velocity>(e).unwrap().x, 2.0);
//!
//! let bytes = world.save_to_vec().unwrap();
//! world.load_from_slice(&bytes).unwrap();
//! assert!(world.has::<Velocity>(e));
//! ```

pub mod config;
pub mod error;
pub mod scene;
pub mod view;
pub mod world;

pub use config::WorldConfig;
pub use error::SceneError;
pub use scene::{SCENE_MAGIC, SCENE_VERSION};
pub use view::{MAX_VIEW_TYPES, View, ViewItem};
pub use world::World;
