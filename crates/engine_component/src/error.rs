//! Component-layer error types.

/// Errors returned when registering a component type.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Type names must be non-empty.
    #[error("component type name is empty")]
    EmptyName,

    /// Components must occupy at least one byte.
    #[error("component type '{0}' has zero size")]
    ZeroSize(String),

    /// Names are persisted with a `u16` length prefix.
    #[error("component type name is {len} bytes, limit is {}", u16::MAX)]
    NameTooLong {
        /// Length of the rejected name in bytes.
        len: usize,
    },

    /// Pool storage only guarantees a limited alignment.
    #[error("component type '{name}' requires alignment {align}, pools provide at most {max}")]
    UnsupportedAlignment {
        /// The type name.
        name: String,
        /// Requested alignment.
        align: usize,
        /// Largest supported alignment.
        max: usize,
    },

    /// The embedded base record must lie inside the component.
    #[error("component type '{name}' places its base record at {offset}, outside its {size} bytes")]
    BaseOutOfBounds {
        /// The type name.
        name: String,
        /// Declared base offset.
        offset: usize,
        /// Component size.
        size: usize,
    },

    /// A typed registration found the name already taken by a differently sized type.
    #[error("component type '{name}' is registered with size {registered}, requested {requested}")]
    SizeMismatch {
        /// The type name.
        name: String,
        /// Size recorded by the first registration.
        registered: usize,
        /// Size of the type being registered now.
        requested: usize,
    },
}

/// Errors raised by component save/load hooks.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// MessagePack encoding failed.
    #[error("failed to encode component: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// MessagePack decoding failed.
    #[error("failed to decode component: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    /// The payload did not have the length the decoder needs.
    #[error("payload is {actual} bytes, expected {expected}")]
    PayloadSize {
        /// Length the decoder requires.
        expected: usize,
        /// Length found in the payload.
        actual: usize,
    },

    /// The component bytes could not be viewed as the hook's Rust type.
    #[error("component bytes do not match the type layout: {0:?}")]
    Layout(bytemuck::PodCastError),

    /// Hook-specific validation failure.
    #[error("{0}")]
    Invalid(String),
}
