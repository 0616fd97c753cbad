//! Idempotent schema creation and meta-row seeding (spec.md §4.7).
//!
//! Everything here runs from [`crate::FileSystem::new`], inside whatever
//! scope the host actor guarantees is exclusive (spec.md §4.7's "no
//! other engine operation can interleave" requirement — enforced by the
//! caller, not by this module).

use storage::{SqlStore, Value};

use crate::attr::Attr;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::store_ops::ROOT_INO;

const DDL: &str = "
CREATE TABLE IF NOT EXISTS meta (
    key   TEXT PRIMARY KEY,
    value INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS files (
    ino    INTEGER PRIMARY KEY,
    name   TEXT NOT NULL,
    parent INTEGER,
    is_dir INTEGER NOT NULL,
    attr   BLOB NOT NULL,
    data   BLOB
);

CREATE UNIQUE INDEX IF NOT EXISTS ux_files_parent_name ON files (parent, name);
CREATE INDEX IF NOT EXISTS ix_files_parent ON files (parent);

CREATE TABLE IF NOT EXISTS chunks (
    ino    INTEGER NOT NULL,
    offset INTEGER NOT NULL,
    data   BLOB NOT NULL,
    length INTEGER NOT NULL,
    PRIMARY KEY (ino, offset)
);
";

/// Create all tables/indices if absent, then seed `meta.device_size`,
/// `meta.space_used`, `meta.chunk_size` and the root directory inode if
/// they are not already present.
///
/// `meta.chunk_size` is the engine's own bookkeeping (spec.md §6: "refuse
/// to change [chunk size] after first chunk write, or detect
/// inconsistency when opening an instance created with a different
/// granularity") — the teacher has no equivalent, since its chunk/block
/// size is fixed at `mkfs` time by construction; a SQL-table schema has
/// no such built-in enforcement, so this engine adds the check.
pub(crate) fn bootstrap<S: SqlStore>(store: &S, config: &EngineConfig) -> Result<()> {
    log::debug!("bootstrap(chunk_size={}, device_size={})", config.chunk_size, config.device_size);
    store.execute_batch(DDL)?;

    match get_meta_int(store, "chunk_size")? {
        None => {
            set_meta_int(store, "chunk_size", config.chunk_size as i64)?;
        }
        Some(existing) if existing as u64 != config.chunk_size => {
            return Err(EngineError::ChunkSizeImmutable);
        }
        Some(_) => {}
    }

    if get_meta_int(store, "device_size")?.is_none() {
        set_meta_int(store, "device_size", config.device_size as i64)?;
    }
    if get_meta_int(store, "space_used")?.is_none() {
        set_meta_int(store, "space_used", 0)?;
    }

    let root_exists = store
        .query_one(
            "SELECT ino FROM files WHERE ino = ?1",
            &[Value::from(ROOT_INO)],
        )?
        .is_some();
    if !root_exists {
        let attr = Attr::new_dir(ROOT_INO, Some(0o755), 0, 0, 0);
        store.execute(
            "INSERT INTO files (ino, name, parent, is_dir, attr, data) VALUES (?1, ?2, NULL, 1, ?3, NULL)",
            &[
                Value::from(ROOT_INO),
                Value::from("/"),
                Value::from(attr.to_bytes()?),
            ],
        )?;
    }

    Ok(())
}

/// The chunk granularity recorded in `meta` — authoritative once the
/// instance has been bootstrapped at least once.
pub(crate) fn stored_chunk_size<S: SqlStore>(store: &S) -> Result<u64> {
    Ok(get_meta_int(store, "chunk_size")?.unwrap_or(0) as u64)
}

fn get_meta_int<S: SqlStore>(store: &S, key: &str) -> Result<Option<i64>> {
    let row = store.query_one("SELECT value FROM meta WHERE key = ?1", &[Value::from(key)])?;
    Ok(row.and_then(|r| r.get_i64(0)))
}

fn set_meta_int<S: SqlStore>(store: &S, key: &str, value: i64) -> Result<()> {
    store.execute(
        "INSERT INTO meta (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        &[Value::from(key), Value::Integer(value)],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::RusqliteStore;

    #[test]
    fn bootstrap_seeds_root_and_meta() {
        let store = RusqliteStore::open_in_memory().unwrap();
        let cfg = EngineConfig::default();
        bootstrap(&store, &cfg).unwrap();

        assert_eq!(
            get_meta_int(&store, "device_size").unwrap(),
            Some(cfg.device_size as i64)
        );
        assert_eq!(get_meta_int(&store, "space_used").unwrap(), Some(0));
        let root = store
            .query_one(
                "SELECT ino, parent, is_dir FROM files WHERE ino = 1",
                &[],
            )
            .unwrap()
            .unwrap();
        assert_eq!(root.get_u64(0), Some(1));
        assert_eq!(root.get_i64(1), None);
        assert_eq!(root.get_i64(2), Some(1));
    }

    #[test]
    fn bootstrap_is_idempotent() {
        let store = RusqliteStore::open_in_memory().unwrap();
        let cfg = EngineConfig::default();
        bootstrap(&store, &cfg).unwrap();
        bootstrap(&store, &cfg).unwrap();
        let count = store
            .query_one("SELECT COUNT(*) FROM files", &[])
            .unwrap()
            .unwrap()
            .get_i64(0);
        assert_eq!(count, Some(1));
    }

    #[test]
    fn bootstrap_rejects_chunk_size_change() {
        let store = RusqliteStore::open_in_memory().unwrap();
        bootstrap(
            &store,
            &EngineConfig {
                chunk_size: 4096,
                ..EngineConfig::default()
            },
        )
        .unwrap();
        let result = bootstrap(
            &store,
            &EngineConfig {
                chunk_size: 8192,
                ..EngineConfig::default()
            },
        );
        assert!(matches!(result, Err(EngineError::ChunkSizeImmutable)));
    }
}
