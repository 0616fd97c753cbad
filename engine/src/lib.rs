//! A POSIX-shaped filesystem layered over a [`storage::SqlStore`].
//!
//! Bytes for regular files live in fixed-size `chunks` rows; directory
//! structure and attributes live in `files`; device-wide bookkeeping
//! lives in `meta`. Everything here assumes a single writer at a time —
//! see [`FileSystem`]'s doc comment for how that discipline is rendered
//! in the type system rather than enforced with a lock.

#![deny(missing_docs)]

mod attr;
mod chunk;
mod config;
mod device;
mod dir;
mod error;
mod filesystem;
mod inode;
/// Property checker for spec.md §8's quantified invariants; used by this
/// crate's own tests and by `tests/scenarios.rs`.
pub mod invariants;
mod options;
mod path;
mod schema;
mod store_ops;
mod stream;

pub use attr::{now, Attr, Kind, Stat};
pub use config::{EngineConfig, DEFAULT_CHUNK_SIZE, DEFAULT_DEVICE_SIZE, RECOMMENDED_CHUNK_SIZE};
pub use device::DeviceStats;
pub use dir::DirEntry;
pub use error::{EngineError, Result};
pub use filesystem::FileSystem;
pub use options::{
    CreateOptions, ListDirOptions, MkdirOptions, ReadOptions, RmdirOptions, SetAttrOptions,
    WriteFileOptions, WriteOptions,
};
pub use store_ops::ROOT_INO;
