//! Property checker for spec.md §8's quantified invariants (P1-P5).
//!
//! Test-only: it walks `meta`/`files`/`chunks` directly through
//! [`storage::SqlStore`] rather than the engine's own path-based surface,
//! so a bug in `resolve` can't hide a violation from the checker that is
//! supposed to catch it.

use storage::{SqlStore, Value};

use crate::error::Result;
use crate::filesystem::FileSystem;

/// Every invariant violation the checker found, each tagged by its
/// spec.md §8 label (`P1`..`P5`).
#[derive(Debug, Default)]
pub struct Violations {
    /// One human-readable description per violation found.
    pub messages: Vec<String>,
}

impl Violations {
    /// Panics with all recorded violations if any were found. Intended
    /// for `check(&fs)?.assert_none()`-style test assertions.
    pub fn assert_none(&self) {
        assert!(self.messages.is_empty(), "invariant violations: {:?}", self.messages);
    }
}

/// Walk the store backing `fs` and check P1-P5 from spec.md §8.
pub fn check<S: SqlStore>(fs: &FileSystem<S>) -> Result<Violations> {
    let store = &fs.store;
    let mut violations = Vec::new();
    let chunk_size = fs.chunk_size();

    let files = store.query("SELECT ino, attr, is_dir, parent FROM files", &[])?;
    let mut seen_parent_name = std::collections::HashSet::new();
    let name_rows = store.query("SELECT parent, name FROM files", &[])?;
    for row in &name_rows {
        let parent = row.get_i64(0);
        let name = row.get_text(1).unwrap_or("").to_string();
        if !seen_parent_name.insert((parent, name.clone())) {
            violations.push(format!("P3: duplicate (parent, name) = ({parent:?}, {name})"));
        }
    }

    let mut root_seen = false;
    for row in &files {
        let ino = row.get_u64(0).unwrap_or(0);
        let attr_bytes = row.get_blob(1).unwrap_or(&[]);
        let is_dir = row.get_i64(2).unwrap_or(0);
        let parent = row.get_i64(3);

        let attr = match crate::attr::Attr::from_bytes(attr_bytes) {
            Ok(a) => a,
            Err(_) => {
                violations.push(format!("corrupt attr blob for ino {ino}"));
                continue;
            }
        };

        if ino == crate::store_ops::ROOT_INO {
            root_seen = true;
            if attr.kind != crate::attr::Kind::Directory || parent.is_some() {
                violations.push("P4: root is not a parentless directory".to_string());
            }
        }

        if (attr.kind == crate::attr::Kind::Directory) != (is_dir != 0) {
            violations.push(format!("ino {ino}: is_dir column disagrees with attr.kind"));
        }

        if attr.kind == crate::attr::Kind::File {
            let sum = sum_chunk_lengths(store, ino)?;
            if sum != attr.size {
                violations.push(format!(
                    "P1: ino {ino} attr.size={} but Σ chunks.length={sum}",
                    attr.size
                ));
            }
        }
    }
    if !root_seen {
        violations.push("P4: no row with ino = 1".to_string());
    }

    let total = sum_chunk_lengths(store, None)?;
    let space_used = store
        .query_one("SELECT value FROM meta WHERE key = 'space_used'", &[])?
        .and_then(|r| r.get_i64(0))
        .unwrap_or(0) as u64;
    if total != space_used {
        violations.push(format!(
            "P2: meta.space_used={space_used} but Σ chunks.length over all inos={total}"
        ));
    }

    let chunk_rows = store.query("SELECT ino, offset, length FROM chunks", &[])?;
    for row in &chunk_rows {
        let ino = row.get_u64(0).unwrap_or(0);
        let offset = row.get_u64(1).unwrap_or(0);
        let length = row.get_u64(2).unwrap_or(0);
        if offset % chunk_size != 0 {
            violations.push(format!("P5: ino {ino} chunk at offset {offset} misaligned"));
        }
        if length > chunk_size {
            violations.push(format!("P5: ino {ino} chunk at offset {offset} length {length} exceeds chunk_size"));
        }
    }

    Ok(Violations { messages: violations })
}

fn sum_chunk_lengths<S: SqlStore>(store: &S, ino: impl Into<Option<u64>>) -> Result<u64> {
    let ino = ino.into();
    let row = match ino {
        Some(ino) => store.query_one(
            "SELECT COALESCE(SUM(length), 0) FROM chunks WHERE ino = ?1",
            &[Value::from(ino)],
        )?,
        None => store.query_one("SELECT COALESCE(SUM(length), 0) FROM chunks", &[])?,
    };
    Ok(row.and_then(|r| r.get_u64(0)).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::options::{CreateOptions, MkdirOptions, WriteOptions};
    use storage::RusqliteStore;

    fn fs() -> FileSystem<RusqliteStore> {
        FileSystem::new(
            RusqliteStore::open_in_memory().unwrap(),
            EngineConfig {
                chunk_size: 8,
                ..EngineConfig::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn fresh_instance_has_no_violations() {
        let fs = fs();
        check(&fs).unwrap().assert_none();
    }

    #[test]
    fn after_writes_and_truncates_invariants_hold() {
        let mut fs = fs();
        fs.mkdir("/a", MkdirOptions::default()).unwrap();
        fs.create("/a/t", CreateOptions::default()).unwrap();
        fs.write("/a/t", b"Buy milk\nCall Alice", WriteOptions::default())
            .unwrap();
        fs.truncate("/a/t", 12).unwrap();
        check(&fs).unwrap().assert_none();
    }

    #[test]
    fn after_rename_and_unlink_invariants_hold() {
        let mut fs = fs();
        fs.create("/a", CreateOptions::default()).unwrap();
        fs.write("/a", b"12345678", WriteOptions::default()).unwrap();
        fs.create("/b", CreateOptions::default()).unwrap();
        fs.rename("/a", "/b").unwrap();
        fs.unlink("/b").unwrap();
        check(&fs).unwrap().assert_none();
    }
}
