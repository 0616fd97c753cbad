//! The error type returned by [`crate::SqlStore`] implementations.
//!
//! Follows the same pattern as the rest of this codebase: a `thiserror`
//! enum with `#[from]` wrapping so `?` composes across layers, and a
//! transparent catch-all for errors that do not deserve their own
//! variant.

use thiserror::Error;

/// Error type used by every [`crate::SqlStore`] implementation.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Error returned by the bundled SQLite engine underneath [`crate::RusqliteStore`].
    #[error("error in the embedded SQL engine")]
    Sqlite(#[from] rusqlite::Error),

    /// Catch-all for storage-driver failures that do not originate from
    /// `rusqlite` (e.g. a caller-supplied store wrapping some other
    /// embedded engine).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Generic alias for a `Result` with the error type [`StorageError`].
pub type Result<T> = std::result::Result<T, StorageError>;
