//! Scene serialisation error types.

use engine_component::CodecError;

/// Errors that abort a scene save or load.
///
/// Routine outcomes such as a dead handle or a missing component are not
/// errors in this crate; they are reported through `Option`/`bool` returns.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// Reading or writing the scene file failed.
    #[error("scene I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The buffer ended before a field could be read.
    #[error("scene data truncated: needed {needed} bytes, {remaining} left")]
    Truncated {
        /// Bytes the next field needs.
        needed: usize,
        /// Bytes left in the buffer.
        remaining: usize,
    },

    /// The buffer does not start with the scene magic.
    #[error("not a scene file (magic {0:#010x})")]
    BadMagic(u32),

    /// The scene was written by an unsupported format version.
    #[error("unsupported scene version {0}")]
    UnsupportedVersion(u32),

    /// A component names an entity slot the entity table did not mark alive.
    #[error("component '{type_name}' belongs to entity index {entity_index}, which is not alive")]
    DanglingComponent {
        /// Type of the orphaned component.
        type_name: String,
        /// Entity index recorded for it.
        entity_index: u32,
    },

    /// An entity table entry has generation 0 or an index past the world's
    /// entity limit.
    #[error("entity {index} (generation {generation}) is invalid or past the limit of {limit} slots")]
    InvalidEntity {
        /// Slot index recorded in the file.
        index: u32,
        /// Generation recorded in the file.
        generation: u32,
        /// The loading world's entity limit.
        limit: u32,
    },

    /// A type name does not fit the `u16` length prefix.
    #[error("component type name '{name}' is too long to persist")]
    NameTooLong {
        /// The offending name.
        name: String,
    },

    /// A type name in the file is not valid UTF-8.
    #[error("component type name is not valid UTF-8")]
    InvalidName,

    /// A count or payload size does not fit its `u32` field.
    #[error("scene section too large for the format")]
    CountOverflow,

    /// A component's save or load hook failed.
    #[error("component '{type_name}' codec failed: {source}")]
    Codec {
        /// Type whose hook failed.
        type_name: String,
        /// The hook's error.
        #[source]
        source: CodecError,
    },
}
