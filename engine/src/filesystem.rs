//! The engine value itself.
//!
//! Per spec.md §9's "per-instance singleton surface" design note, this is
//! a plain value constructed once per host actor and injected where
//! needed — there is no process-wide state anywhere in this crate.

use storage::SqlStore;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::schema;

/// The storage engine: a POSIX-shaped filesystem layered over a
/// [`SqlStore`].
///
/// Every mutating method takes `&mut self`; every read-only method takes
/// `&self`. This mirrors spec.md §5's single-writer model in the type
/// system — nothing about the trait requires it, but a caller who only
/// ever has one `&mut FileSystem<S>` in scope cannot issue overlapping
/// mutations, which is exactly the discipline the host actor otherwise
/// has to enforce by hand.
pub struct FileSystem<S: SqlStore> {
    pub(crate) store: S,
    pub(crate) chunk_size: u64,
}

impl<S: SqlStore> FileSystem<S> {
    /// Construct a filesystem over `store`, bootstrapping its schema if
    /// this is the first time this store has been used (spec.md §4.7),
    /// or validating that an existing schema agrees with `config` if not.
    pub fn new(store: S, config: EngineConfig) -> Result<Self> {
        schema::bootstrap(&store, &config)?;
        let chunk_size = schema::stored_chunk_size(&store)?;
        Ok(FileSystem { store, chunk_size })
    }

    /// The chunk granularity this instance was created with. Immutable
    /// for the instance's lifetime (spec.md §3 invariant 7).
    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }
}
