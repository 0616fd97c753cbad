//! Root file of the `storage` crate.
//!
//! This crate provides nothing but the seam the engine builds on: a thin
//! trait over an embedded SQL engine (parameterized exec, row iteration,
//! single-row fetch) plus one concrete implementation backed by
//! [`rusqlite`]. A host actor that already owns an embedded SQL store of
//! its own is expected to implement [`SqlStore`] directly against that
//! store rather than go through [`RusqliteStore`]; this crate does not
//! assume which one a caller uses.
//!
//! See the [`driver`] module for the trait, [`value`] for the
//! storage-engine-agnostic value representation, and [`rusqlite_store`]
//! for the concrete implementation.

#![deny(missing_docs)]

pub mod driver;
pub mod error;
pub mod rusqlite_store;
pub mod value;

pub use driver::SqlStore;
pub use error::StorageError;
pub use rusqlite_store::RusqliteStore;
pub use value::{Row, Value};
