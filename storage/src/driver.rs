//! The thin trait the engine builds on.
//!
//! `SqlStore` is deliberately small: parameterized execution, batch DDL
//! execution (for the schema manager), row iteration, and single-row
//! fetch. Everything above this trait — schema, invariants, the chunked
//! file model — lives in the `engine` crate and never depends on a
//! concrete SQL crate.

use crate::error::Result;
use crate::value::{Row, Value};

/// A thin trait over an embedded SQL engine.
///
/// A host actor that already owns a SQL-backed persistence layer (the
/// case this crate is designed for) implements this trait directly
/// against its own handle; [`crate::RusqliteStore`] is provided for
/// callers who want a standalone, non-actor-hosted instance (and for
/// this crate's own tests).
pub trait SqlStore {
    /// Execute a single statement with bound parameters, returning the
    /// number of rows affected. Used for `INSERT`/`UPDATE`/`DELETE`.
    fn execute(&self, sql: &str, params: &[Value]) -> Result<usize>;

    /// Execute one or more semicolon-separated statements with no bound
    /// parameters. Used by the schema manager to create tables and
    /// indices idempotently.
    fn execute_batch(&self, sql: &str) -> Result<()>;

    /// Run a query and collect every matching row.
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>>;

    /// Run a query expected to match at most one row.
    fn query_one(&self, sql: &str, params: &[Value]) -> Result<Option<Row>>;
}
