//! Raw row access shared by every higher-level module.
//!
//! This plays the role the teacher's `Device`/`Block` abstraction plays
//! for `BlockSupport`: a single place that knows the literal SQL shape
//! of `meta`/`files`/`chunks`, so `path`, `inode`, `chunk`, `dir`,
//! `device` and `stream` only ever talk in terms of [`FileRow`] and
//! plain integers/bytes.

use storage::{SqlStore, Value};

use crate::attr::Attr;
use crate::error::{EngineError, Result};
use crate::filesystem::FileSystem;

/// Root inode number (spec.md §3: "Root is always `1`").
pub const ROOT_INO: u64 = 1;

/// One `files` row, with `attr` already decoded.
#[derive(Debug, Clone)]
pub(crate) struct FileRow {
    pub ino: u64,
    pub name: String,
    pub parent: Option<u64>,
    pub attr: Attr,
    pub data: Option<Vec<u8>>,
}

fn decode_row(row: &storage::Row) -> Result<FileRow> {
    let ino = row.get_u64(0).ok_or(EngineError::Corrupt("files.ino"))?;
    let name = row
        .get_text(1)
        .ok_or(EngineError::Corrupt("files.name"))?
        .to_owned();
    let parent = row.get_u64(2);
    let attr_bytes = row.get_blob(4).ok_or(EngineError::Corrupt("files.attr"))?;
    let attr = Attr::from_bytes(attr_bytes)?;
    let data = row.get_blob(5).map(|b| b.to_vec());
    Ok(FileRow {
        ino,
        name,
        parent,
        attr,
        data,
    })
}

const FILE_COLUMNS: &str = "ino, name, parent, is_dir, attr, data";

impl<S: SqlStore> FileSystem<S> {
    pub(crate) fn fetch_file_opt(&self, ino: u64) -> Result<Option<FileRow>> {
        let row = self.store.query_one(
            &format!("SELECT {FILE_COLUMNS} FROM files WHERE ino = ?1"),
            &[Value::from(ino)],
        )?;
        row.as_ref().map(decode_row).transpose()
    }

    pub(crate) fn fetch_file(&self, ino: u64) -> Result<FileRow> {
        self.fetch_file_opt(ino)?.ok_or(EngineError::Enoent)
    }

    pub(crate) fn fetch_child_opt(&self, parent: u64, name: &str) -> Result<Option<FileRow>> {
        let row = self.store.query_one(
            &format!("SELECT {FILE_COLUMNS} FROM files WHERE parent = ?1 AND name = ?2"),
            &[Value::from(parent), Value::from(name)],
        )?;
        row.as_ref().map(decode_row).transpose()
    }

    pub(crate) fn list_children(&self, parent: u64) -> Result<Vec<FileRow>> {
        let rows = self.store.query(
            &format!("SELECT {FILE_COLUMNS} FROM files WHERE parent = ?1"),
            &[Value::from(parent)],
        )?;
        rows.iter().map(decode_row).collect()
    }

    pub(crate) fn count_children(&self, parent: u64) -> Result<u64> {
        let row = self
            .store
            .query_one(
                "SELECT COUNT(*) FROM files WHERE parent = ?1",
                &[Value::from(parent)],
            )?
            .ok_or(EngineError::Corrupt("COUNT(*) returned no row"))?;
        Ok(row.get_u64(0).unwrap_or(0))
    }

    pub(crate) fn insert_file(
        &self,
        ino: u64,
        name: &str,
        parent: Option<u64>,
        attr: &Attr,
        data: Option<&[u8]>,
    ) -> Result<()> {
        let is_dir = matches!(attr.kind, crate::attr::Kind::Directory) as i64;
        self.store.execute(
            "INSERT INTO files (ino, name, parent, is_dir, attr, data) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            &[
                Value::from(ino),
                Value::from(name),
                Value::from(parent),
                Value::Integer(is_dir),
                Value::from(attr.to_bytes()?),
                Value::from(data.map(|d| d.to_vec())),
            ],
        )?;
        Ok(())
    }

    pub(crate) fn update_attr(&self, ino: u64, attr: &Attr) -> Result<()> {
        self.store.execute(
            "UPDATE files SET attr = ?1 WHERE ino = ?2",
            &[Value::from(attr.to_bytes()?), Value::from(ino)],
        )?;
        Ok(())
    }

    pub(crate) fn update_parent_name(&self, ino: u64, new_parent: u64, new_name: &str) -> Result<()> {
        self.store.execute(
            "UPDATE files SET parent = ?1, name = ?2 WHERE ino = ?3",
            &[Value::from(new_parent), Value::from(new_name), Value::from(ino)],
        )?;
        Ok(())
    }

    pub(crate) fn delete_file_row(&self, ino: u64) -> Result<()> {
        self.store
            .execute("DELETE FROM files WHERE ino = ?1", &[Value::from(ino)])?;
        Ok(())
    }

    pub(crate) fn next_ino(&self) -> Result<u64> {
        let row = self
            .store
            .query_one("SELECT MAX(ino) FROM files", &[])?
            .ok_or(EngineError::Corrupt("MAX(ino) returned no row"))?;
        Ok(row.get_u64(0).unwrap_or(ROOT_INO) + 1)
    }

    pub(crate) fn fetch_chunks(&self, ino: u64) -> Result<Vec<(u64, Vec<u8>, u64)>> {
        let rows = self.store.query(
            "SELECT offset, data, length FROM chunks WHERE ino = ?1 ORDER BY offset ASC",
            &[Value::from(ino)],
        )?;
        rows.iter()
            .map(|r| {
                let offset = r.get_u64(0).ok_or(EngineError::Corrupt("chunks.offset"))?;
                let data = r
                    .get_blob(1)
                    .ok_or(EngineError::Corrupt("chunks.data"))?
                    .to_vec();
                let length = r.get_u64(2).ok_or(EngineError::Corrupt("chunks.length"))?;
                Ok((offset, data, length))
            })
            .collect()
    }

    pub(crate) fn fetch_chunk_at(&self, ino: u64, offset: u64) -> Result<Option<(Vec<u8>, u64)>> {
        let row = self.store.query_one(
            "SELECT data, length FROM chunks WHERE ino = ?1 AND offset = ?2",
            &[Value::from(ino), Value::from(offset)],
        )?;
        row.map(|r| {
            let data = r
                .get_blob(0)
                .ok_or(EngineError::Corrupt("chunks.data"))?
                .to_vec();
            let length = r.get_u64(1).ok_or(EngineError::Corrupt("chunks.length"))?;
            Ok((data, length))
        })
        .transpose()
    }

    pub(crate) fn upsert_chunk(&self, ino: u64, offset: u64, data: &[u8], length: u64) -> Result<()> {
        self.store.execute(
            "INSERT INTO chunks (ino, offset, data, length) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(ino, offset) DO UPDATE SET data = excluded.data, length = excluded.length",
            &[
                Value::from(ino),
                Value::from(offset),
                Value::from(data.to_vec()),
                Value::from(length),
            ],
        )?;
        Ok(())
    }

    pub(crate) fn delete_chunks_from(&self, ino: u64, from_offset: u64) -> Result<()> {
        self.store.execute(
            "DELETE FROM chunks WHERE ino = ?1 AND offset >= ?2",
            &[Value::from(ino), Value::from(from_offset)],
        )?;
        Ok(())
    }

    pub(crate) fn delete_all_chunks(&self, ino: u64) -> Result<()> {
        self.store
            .execute("DELETE FROM chunks WHERE ino = ?1", &[Value::from(ino)])?;
        Ok(())
    }

    pub(crate) fn sum_chunk_lengths(&self, ino: u64) -> Result<u64> {
        let row = self
            .store
            .query_one(
                "SELECT COALESCE(SUM(length), 0) FROM chunks WHERE ino = ?1",
                &[Value::from(ino)],
            )?
            .ok_or(EngineError::Corrupt("SUM(length) returned no row"))?;
        Ok(row.get_u64(0).unwrap_or(0))
    }

    pub(crate) fn sum_all_chunk_lengths(&self) -> Result<u64> {
        let row = self
            .store
            .query_one("SELECT COALESCE(SUM(length), 0) FROM chunks", &[])?
            .ok_or(EngineError::Corrupt("SUM(length) returned no row"))?;
        Ok(row.get_u64(0).unwrap_or(0))
    }

    pub(crate) fn get_meta_int(&self, key: &str) -> Result<Option<i64>> {
        let row = self
            .store
            .query_one("SELECT value FROM meta WHERE key = ?1", &[Value::from(key)])?;
        Ok(row.and_then(|r| r.get_i64(0)))
    }

    pub(crate) fn set_meta_int(&self, key: &str, value: i64) -> Result<()> {
        self.store.execute(
            "INSERT INTO meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            &[Value::from(key), Value::Integer(value)],
        )?;
        Ok(())
    }

    /// Recompute and persist `meta.space_used` from the authoritative
    /// `chunks` table (spec.md §3 invariant 5, §4.5). Called after every
    /// chunk-mutating operation so `space_used` is never allowed to drift.
    pub(crate) fn recompute_space_used(&self) -> Result<u64> {
        let used = self.sum_all_chunk_lengths()?;
        self.set_meta_int("space_used", used as i64)?;
        Ok(used)
    }
}
