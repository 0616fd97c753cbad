//! Inode allocation, attribute access, `stat`/`setattr`, and `create`
//! (spec.md §4.2).

use storage::SqlStore;

use crate::attr::{Attr, Stat};
use crate::error::{EngineError, Result};
use crate::filesystem::FileSystem;
use crate::options::{CreateOptions, SetAttrOptions};

impl<S: SqlStore> FileSystem<S> {
    /// `getAttr`-equivalent: read back the attribute record for an
    /// inode directly, bypassing path resolution. Used internally by
    /// every other module; not part of the path-based external surface.
    pub(crate) fn get_attr_by_ino(&self, ino: u64) -> Result<Attr> {
        Ok(self.fetch_file(ino)?.attr)
    }

    pub(crate) fn put_attr(&self, attr: &Attr) -> Result<()> {
        self.update_attr(attr.ino, attr)
    }

    /// `stat(path) → {...}` (spec.md §6).
    pub fn stat(&self, path: &str) -> Result<Stat> {
        let ino = self.resolve(path)?;
        let attr = self.get_attr_by_ino(ino)?;
        Ok(Stat::from(&attr))
    }

    /// `setattr(path, {mode?, uid?, gid?}) → void` (spec.md §4.2): only
    /// the provided fields are updated.
    pub fn setattr(&mut self, path: &str, opts: SetAttrOptions) -> Result<()> {
        let ino = self.resolve(path)?;
        let mut attr = self.get_attr_by_ino(ino)?;
        if let Some(mode) = opts.mode {
            attr.perm = mode & 0o7777;
        }
        if let Some(uid) = opts.uid {
            attr.uid = uid;
        }
        if let Some(gid) = opts.gid {
            attr.gid = gid;
        }
        attr.ctime = crate::attr::now();
        self.put_attr(&attr)
    }

    /// `create(path, {mode?, umask?}) → void` (spec.md §4.2, §6). Fails
    /// `EEXIST` on an empty path or an existing entry at `path`.
    pub fn create(&mut self, path: &str, opts: CreateOptions) -> Result<()> {
        log::trace!("create(path={path:?})");
        let (parent, leaf) = self.split_leaf(path, EngineError::Eexist)?;
        if self.fetch_child_opt(parent, &leaf)?.is_some() {
            return Err(EngineError::Eexist);
        }
        let ino = self.next_ino()?;
        let attr = Attr::new_file(ino, opts.mode, opts.umask, 0, 0);
        let res = self.insert_file(ino, &leaf, Some(parent), &attr, None);
        log::trace!("create: ino={ino} res={res:?}");
        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::options::CreateOptions;
    use storage::RusqliteStore;

    fn fs() -> FileSystem<RusqliteStore> {
        FileSystem::new(RusqliteStore::open_in_memory().unwrap(), EngineConfig::default()).unwrap()
    }

    #[test]
    fn create_then_stat() {
        let mut fs = fs();
        fs.create("/f", CreateOptions::default()).unwrap();
        let st = fs.stat("/f").unwrap();
        assert!(st.is_file);
        assert_eq!(st.size, 0);
        assert_eq!(st.mode, 0o644);
    }

    #[test]
    fn create_twice_is_eexist() {
        let mut fs = fs();
        fs.create("/f", CreateOptions::default()).unwrap();
        assert!(matches!(
            fs.create("/f", CreateOptions::default()),
            Err(EngineError::Eexist)
        ));
    }

    #[test]
    fn create_empty_path_is_eexist() {
        let mut fs = fs();
        assert!(matches!(
            fs.create("", CreateOptions::default()),
            Err(EngineError::Eexist)
        ));
    }

    #[test]
    fn setattr_updates_only_given_fields() {
        let mut fs = fs();
        fs.create("/f", CreateOptions::default()).unwrap();
        fs.setattr(
            "/f",
            SetAttrOptions {
                mode: Some(0o600),
                uid: None,
                gid: None,
            },
        )
        .unwrap();
        let st = fs.stat("/f").unwrap();
        assert_eq!(st.mode, 0o600);
        assert_eq!(st.uid, 0);
    }
}
