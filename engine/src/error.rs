//! The error type returned by every [`crate::FileSystem`] operation.
//!
//! One flat `thiserror` enum, not the teacher's per-layer cascade
//! (`BlockLayerError` → `InodeLayerError` → `DirLayerError`): this engine
//! has a single layer, so there is only one error type to define. Each
//! POSIX-named variant corresponds to a row in spec.md §7's table.

use thiserror::Error;

/// Error type returned by [`crate::FileSystem`] methods.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Path or parent not found; rename source missing; `readlink` on a
    /// non-symlink-or-missing entry.
    #[error("no such file or directory")]
    Enoent,

    /// Create/mkdir/symlink at an existing name; empty path given to
    /// create/mkdir/symlink.
    #[error("file exists")]
    Eexist,

    /// `rmdir` on a non-empty directory; rename onto a non-empty
    /// directory.
    #[error("directory not empty")]
    Enotempty,

    /// `unlink` on a directory.
    #[error("is a directory")]
    Eisdir,

    /// A path component expected to be a directory is not one.
    #[error("not a directory")]
    Enotdir,

    /// write/writeFile/setDeviceSize would exceed the device size.
    #[error("no space left on device")]
    Enospc,

    /// The chunk granularity a caller asked for does not match the one
    /// this instance was created with. Not part of spec.md §7's table
    /// (which enumerates POSIX codes for filesystem *operations*, not
    /// instance configuration) but needed to honor spec.md §6's "refuse
    /// to change chunk_size" requirement; reported as `EINVAL`.
    #[error("chunk size is immutable for the lifetime of this instance")]
    ChunkSizeImmutable,

    /// Failure from the underlying [`storage::SqlStore`].
    #[error("storage driver error")]
    Storage(#[from] storage::StorageError),

    /// Failure (de)serializing an `Attr` record to/from its `files.attr`
    /// blob representation.
    #[error("failed to (de)serialize an attribute record")]
    Serialize(#[from] bincode::Error),

    /// A row read back from the store did not have the shape the engine
    /// expects (e.g. a `kind` tag outside `{Directory, File, Symlink}`).
    /// Indicates store corruption, not a caller error.
    #[error("corrupt row in the storage engine: {0}")]
    Corrupt(&'static str),
}

impl EngineError {
    /// The POSIX short code the WebSocket/HTTP adapters (spec.md §6) use
    /// to report this failure on the wire. The engine owns this mapping
    /// because it is the only place that knows which internal failure
    /// corresponds to which code.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Enoent => "ENOENT",
            EngineError::Eexist => "EEXIST",
            EngineError::Enotempty => "ENOTEMPTY",
            EngineError::Eisdir => "EISDIR",
            EngineError::Enotdir => "ENOTDIR",
            EngineError::Enospc => "ENOSPC",
            EngineError::ChunkSizeImmutable => "EINVAL",
            EngineError::Storage(_) => "EIO",
            EngineError::Serialize(_) => "EIO",
            EngineError::Corrupt(_) => "EIO",
        }
    }
}

/// Generic alias for a `Result` with the error type [`EngineError`].
pub type Result<T> = std::result::Result<T, EngineError>;
