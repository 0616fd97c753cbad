//! Directory tree operations: `mkdir`, `rmdir`, `listDir`, `unlink`,
//! `symlink`/`readlink`, `rename` (spec.md §4.4).

use storage::SqlStore;

use crate::attr::{Attr, Kind};
use crate::error::{EngineError, Result};
use crate::filesystem::FileSystem;
use crate::options::{ListDirOptions, MkdirOptions, RmdirOptions};
use crate::path::segments;
use crate::store_ops::ROOT_INO;

/// One entry returned by [`FileSystem::list_dir`]. `name` is a bare child
/// name in the non-recursive case, or a `/`-joined path relative to the
/// queried directory when `recursive` is set.
#[derive(Debug, Clone)]
pub struct DirEntry {
    /// Entry name (or relative path, for recursive listings).
    pub name: String,
    /// Inode number.
    pub ino: u64,
    /// Discriminator among directory/file/symlink.
    pub kind: Kind,
}

impl<S: SqlStore> FileSystem<S> {
    /// `mkdir(path, {recursive?, mode?, umask?})` (spec.md §4.4).
    pub fn mkdir(&mut self, path: &str, opts: MkdirOptions) -> Result<()> {
        log::trace!("mkdir(path={path:?}, recursive={})", opts.recursive);
        let segs = segments(path);
        let (leaf, parents) = segs.split_last().ok_or(EngineError::Eexist)?;

        let mut current = ROOT_INO;
        for seg in parents {
            match self.fetch_child_opt(current, seg)? {
                Some(row) => {
                    if row.attr.kind != Kind::Directory {
                        return Err(EngineError::Enotdir);
                    }
                    current = row.ino;
                }
                None if opts.recursive => {
                    let ino = self.next_ino()?;
                    let attr = Attr::new_dir(ino, opts.mode, opts.umask, 0, 0);
                    self.insert_file(ino, seg, Some(current), &attr, None)?;
                    current = ino;
                }
                None => return Err(EngineError::Enoent),
            }
        }

        if self.fetch_child_opt(current, leaf)?.is_some() {
            return Err(EngineError::Eexist);
        }
        let ino = self.next_ino()?;
        let attr = Attr::new_dir(ino, opts.mode, opts.umask, 0, 0);
        self.insert_file(ino, leaf, Some(current), &attr, None)
    }

    /// `rmdir(path)` (spec.md §4.4). `opts.recursive` is an engine
    /// extension beyond the literal spec text: unset, it is the documented
    /// `ENOTEMPTY`-on-non-empty behavior; set, it deletes the subtree
    /// bottom-up first.
    pub fn rmdir(&mut self, path: &str, opts: RmdirOptions) -> Result<()> {
        log::trace!("rmdir(path={path:?}, recursive={})", opts.recursive);
        let ino = self.resolve(path)?;
        let attr = self.get_attr_by_ino(ino)?;
        if attr.kind != Kind::Directory {
            return Err(EngineError::Enotdir);
        }
        if opts.recursive {
            self.delete_subtree(ino)?;
        } else if self.count_children(ino)? > 0 {
            return Err(EngineError::Enotempty);
        }
        self.delete_file_row(ino)
    }

    fn delete_subtree(&mut self, ino: u64) -> Result<()> {
        for child in self.list_children(ino)? {
            if child.attr.kind == Kind::Directory {
                self.delete_subtree(child.ino)?;
            } else {
                self.delete_all_chunks(child.ino)?;
            }
            self.delete_file_row(child.ino)?;
        }
        Ok(())
    }

    /// `listDir(path, {recursive?})` (spec.md §4.4): `.`/`..` synthetic
    /// entries first, then children in whatever order the store returns
    /// them.
    pub fn list_dir(&self, path: &str, opts: ListDirOptions) -> Result<Vec<DirEntry>> {
        log::trace!("list_dir(path={path:?}, recursive={})", opts.recursive);
        let ino = self.resolve(path)?;
        let here = self.get_attr_by_ino(ino)?;
        if here.kind != Kind::Directory {
            return Err(EngineError::Enotdir);
        }
        let parent_ino = self.fetch_file(ino)?.parent.unwrap_or(ino);

        let mut out = vec![
            DirEntry {
                name: ".".to_string(),
                ino,
                kind: Kind::Directory,
            },
            DirEntry {
                name: "..".to_string(),
                ino: parent_ino,
                kind: Kind::Directory,
            },
        ];

        if opts.recursive {
            self.walk_recursive(ino, "", &mut out)?;
        } else {
            for child in self.list_children(ino)? {
                out.push(DirEntry {
                    name: child.name,
                    ino: child.ino,
                    kind: child.attr.kind,
                });
            }
        }
        Ok(out)
    }

    fn walk_recursive(&self, ino: u64, prefix: &str, out: &mut Vec<DirEntry>) -> Result<()> {
        for child in self.list_children(ino)? {
            let relative = if prefix.is_empty() {
                child.name.clone()
            } else {
                format!("{prefix}/{}", child.name)
            };
            let kind = child.attr.kind;
            out.push(DirEntry {
                name: relative.clone(),
                ino: child.ino,
                kind,
            });
            if kind == Kind::Directory {
                self.walk_recursive(child.ino, &relative, out)?;
            }
        }
        Ok(())
    }

    /// `unlink(path)` (spec.md §4.4): fails `EISDIR` on directories.
    pub fn unlink(&mut self, path: &str) -> Result<()> {
        log::trace!("unlink(path={path:?})");
        let ino = self.resolve(path)?;
        let attr = self.get_attr_by_ino(ino)?;
        if attr.kind == Kind::Directory {
            return Err(EngineError::Eisdir);
        }
        self.delete_all_chunks(ino)?;
        self.delete_file_row(ino)?;
        self.recompute_space_used()?;
        Ok(())
    }

    /// `symlink(target, path)` (spec.md §4.4).
    pub fn symlink(&mut self, target: &str, path: &str) -> Result<()> {
        log::trace!("symlink(target={target:?}, path={path:?})");
        let (parent, leaf) = self.split_leaf(path, EngineError::Eexist)?;
        if self.fetch_child_opt(parent, &leaf)?.is_some() {
            return Err(EngineError::Eexist);
        }
        let ino = self.next_ino()?;
        let attr = Attr::new_symlink(ino, target.len() as u64, 0, 0);
        self.insert_file(ino, &leaf, Some(parent), &attr, Some(target.as_bytes()))
    }

    /// `readlink(path)` (spec.md §4.4).
    pub fn readlink(&self, path: &str) -> Result<String> {
        log::trace!("readlink(path={path:?})");
        let ino = self.resolve(path)?;
        let row = self.fetch_file(ino)?;
        if row.attr.kind != Kind::Symlink {
            return Err(EngineError::Enoent);
        }
        let data = row.data.ok_or(EngineError::Corrupt("files.data missing for symlink"))?;
        String::from_utf8(data).map_err(|_| EngineError::Corrupt("symlink target is not UTF-8"))
    }

    /// `rename(old, new)` (spec.md §4.4): atomically replaces an existing
    /// non-directory (or empty directory) at `new`, failing `ENOTEMPTY`
    /// on a non-empty directory destination.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<()> {
        log::trace!("rename(old={old:?}, new={new:?})");
        let (old_parent, old_leaf) = self.split_leaf(old, EngineError::Enoent)?;
        let moved = self
            .fetch_child_opt(old_parent, &old_leaf)?
            .ok_or(EngineError::Enoent)?;

        let (new_parent, new_leaf) = self.split_leaf(new, EngineError::Enoent)?;
        if let Some(existing) = self.fetch_child_opt(new_parent, &new_leaf)? {
            if existing.attr.kind == Kind::Directory && self.count_children(existing.ino)? > 0 {
                return Err(EngineError::Enotempty);
            }
            if existing.attr.kind != Kind::Directory {
                self.delete_all_chunks(existing.ino)?;
            }
            self.delete_file_row(existing.ino)?;
            self.recompute_space_used()?;
        }

        self.update_parent_name(moved.ino, new_parent, &new_leaf)
    }
}
