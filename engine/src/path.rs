//! Path resolution (spec.md §4.1).
//!
//! No symlink traversal happens here: symlinks are readable entities,
//! not transparently followed. Higher layers (the FUSE adapter, out of
//! scope here) may implement traversal on top of `resolve`/`readlink`.

use storage::SqlStore;

use crate::attr::Kind;
use crate::error::{EngineError, Result};
use crate::filesystem::FileSystem;
use crate::store_ops::ROOT_INO;

pub(crate) fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

impl<S: SqlStore> FileSystem<S> {
    /// Resolve an absolute path to its inode. An empty path or `/`
    /// resolves to the root (`1`).
    pub fn resolve(&self, path: &str) -> Result<u64> {
        let mut current = ROOT_INO;
        for seg in segments(path) {
            let here = self.fetch_file(current)?;
            if here.attr.kind != Kind::Directory {
                return Err(EngineError::Enotdir);
            }
            current = self
                .fetch_child_opt(current, seg)?
                .ok_or(EngineError::Enoent)?
                .ino;
        }
        Ok(current)
    }

    /// Split `path` into its parent inode and leaf name, walking every
    /// segment but the last. `empty_path_error` lets callers pick the
    /// POSIX code an empty path should produce (`ENOENT` for rename,
    /// `EEXIST` for create/mkdir/symlink — spec.md §4.1).
    pub(crate) fn split_leaf(
        &self,
        path: &str,
        empty_path_error: EngineError,
    ) -> Result<(u64, String)> {
        let segs = segments(path);
        let (leaf, parents) = segs.split_last().ok_or(empty_path_error)?;
        let mut current = ROOT_INO;
        for seg in parents {
            let here = self.fetch_file(current)?;
            if here.attr.kind != Kind::Directory {
                return Err(EngineError::Enotdir);
            }
            current = self
                .fetch_child_opt(current, seg)?
                .ok_or(EngineError::Enoent)?
                .ino;
        }
        Ok((current, (*leaf).to_string()))
    }
}
