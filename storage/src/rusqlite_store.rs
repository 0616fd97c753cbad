//! [`SqlStore`] implementation backed by [`rusqlite`].
//!
//! This is the one concrete embedded SQL engine this crate ships; a host
//! actor with its own SQL-backed storage would implement [`SqlStore`]
//! directly instead of going through this type.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use crate::driver::SqlStore;
use crate::error::{Result, StorageError};
use crate::value::{Row, Value};

/// A [`SqlStore`] backed by a single `rusqlite` connection.
///
/// `rusqlite::Connection` is `Send` but not `Sync`; we wrap it in a
/// `Mutex` purely to satisfy `Sync` for callers that want to share a
/// `RusqliteStore` across an `Arc`. Under the single-writer model the
/// engine is built for, the mutex is never contended.
pub struct RusqliteStore {
    conn: Mutex<Connection>,
}

impl RusqliteStore {
    /// Open an in-memory database. Its contents are lost once the store
    /// is dropped; useful for tests and for ephemeral instances.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(RusqliteStore {
            conn: Mutex::new(conn),
        })
    }

    /// Open (creating if absent) a database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(RusqliteStore {
            conn: Mutex::new(conn),
        })
    }

    fn to_sql_value(v: &Value) -> rusqlite::types::Value {
        match v {
            Value::Null => rusqlite::types::Value::Null,
            Value::Integer(i) => rusqlite::types::Value::Integer(*i),
            Value::Blob(b) => rusqlite::types::Value::Blob(b.clone()),
            Value::Text(s) => rusqlite::types::Value::Text(s.clone()),
        }
    }

    fn from_sql_value(v: rusqlite::types::Value) -> Value {
        match v {
            rusqlite::types::Value::Null => Value::Null,
            rusqlite::types::Value::Integer(i) => Value::Integer(i),
            rusqlite::types::Value::Real(f) => Value::Integer(f as i64),
            rusqlite::types::Value::Text(s) => Value::Text(s),
            rusqlite::types::Value::Blob(b) => Value::Blob(b),
        }
    }

    fn bound_params(params: &[Value]) -> Vec<rusqlite::types::Value> {
        params.iter().map(Self::to_sql_value).collect()
    }
}

impl SqlStore for RusqliteStore {
    fn execute(&self, sql: &str, params: &[Value]) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let bound = Self::bound_params(params);
        Ok(conn.execute(sql, rusqlite::params_from_iter(bound))?)
    }

    fn execute_batch(&self, sql: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        Ok(conn.execute_batch(sql)?)
    }

    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(sql)?;
        let bound = Self::bound_params(params);
        let ncols = stmt.column_count();
        let rows = stmt.query_map(rusqlite::params_from_iter(bound), |row| {
            let mut columns = Vec::with_capacity(ncols);
            for i in 0..ncols {
                let value: rusqlite::types::Value = row.get(i)?;
                columns.push(Self::from_sql_value(value));
            }
            Ok(Row::new(columns))
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(StorageError::from)?);
        }
        Ok(out)
    }

    fn query_one(&self, sql: &str, params: &[Value]) -> Result<Option<Row>> {
        let mut rows = self.query(sql, params)?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.remove(0))
        })
    }
}
