//! The attribute record embedded in `files.attr`, and its construction
//! rules from spec.md §4.2.
//!
//! Encoded to bytes with `bincode` and stored as a blob column, the same
//! way the teacher's `DInode` is encoded into a block via
//! `Buffer::serialize_into`/`deserialize_from` (see `types.rs` in the
//! retrieval pack) — just against a SQL blob instead of a raw block.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// The kind tag carried in `files.is_dir`/`files.attr.kind` (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kind {
    /// A directory inode.
    Directory,
    /// A regular file inode, backed by `chunks` rows.
    File,
    /// A symlink inode; its target lives in `files.data`.
    Symlink,
}

/// The attribute record described in spec.md §3 (`files.attr`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attr {
    /// Inode number this record belongs to.
    pub ino: u64,
    /// File size in bytes (`Σ chunks.length` for regular files).
    pub size: u64,
    /// 512-byte block count, derived from `size` for `stat`-style reporting.
    pub blocks: u64,
    /// Last access time, Unix seconds.
    pub atime: i64,
    /// Last modification time, Unix seconds.
    pub mtime: i64,
    /// Last metadata-change time, Unix seconds.
    pub ctime: i64,
    /// Creation time, Unix seconds.
    pub crtime: i64,
    /// Discriminator among directory/file/symlink.
    pub kind: Kind,
    /// 12-bit POSIX permission bits.
    pub perm: u16,
    /// Hard link count (always 1 for files/symlinks, 2 for directories — no hard links, spec.md §1 Non-goals).
    pub nlink: u32,
    /// Owning user id.
    pub uid: u32,
    /// Owning group id.
    pub gid: u32,
    /// Device number for special files; unused by this engine, carried for API completeness.
    pub rdev: u32,
    /// Opaque flags bitfield; unused by this engine, carried for API completeness.
    pub flags: u32,
    /// Preferred I/O block size reported to callers.
    pub blksize: u32,
}

/// 512, the block size `stat`-style reporting counts `blocks` in; unrelated to `chunk_size`.
const STAT_BLOCK_SIZE: u64 = 512;

fn blocks_for(size: u64) -> u64 {
    size.div_ceil(STAT_BLOCK_SIZE)
}

/// Unix-epoch seconds for "now". Centralized so every attribute-creating
/// path stamps a single consistent clock reading.
pub fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

impl Attr {
    /// Build the initial attribute record for a newly created regular file
    /// (spec.md §4.2).
    pub fn new_file(ino: u64, mode: Option<u16>, umask: u16, uid: u32, gid: u32) -> Self {
        let perm = (mode.unwrap_or(0o644) & !umask) & 0o7777;
        let t = now();
        Attr {
            ino,
            size: 0,
            blocks: 0,
            atime: t,
            mtime: t,
            ctime: t,
            crtime: t,
            kind: Kind::File,
            perm,
            nlink: 1,
            uid,
            gid,
            rdev: 0,
            flags: 0,
            blksize: 512,
        }
    }

    /// Build the initial attribute record for a newly created directory
    /// (spec.md §4.2).
    pub fn new_dir(ino: u64, mode: Option<u16>, umask: u16, uid: u32, gid: u32) -> Self {
        let perm = (mode.unwrap_or(0o755) & !umask) & 0o7777;
        let t = now();
        Attr {
            ino,
            size: 0,
            blocks: 0,
            atime: t,
            mtime: t,
            ctime: t,
            crtime: t,
            kind: Kind::Directory,
            perm,
            nlink: 2,
            uid,
            gid,
            rdev: 0,
            flags: 0,
            blksize: 512,
        }
    }

    /// Build the initial attribute record for a newly created symlink
    /// (spec.md §4.2). `target_len` is the byte length of the link target.
    pub fn new_symlink(ino: u64, target_len: u64, uid: u32, gid: u32) -> Self {
        let t = now();
        Attr {
            ino,
            size: target_len,
            blocks: blocks_for(target_len),
            atime: t,
            mtime: t,
            ctime: t,
            crtime: t,
            kind: Kind::Symlink,
            perm: 0o777,
            nlink: 1,
            uid,
            gid,
            rdev: 0,
            flags: 0,
            blksize: 512,
        }
    }

    /// Recompute `blocks` from `size` and bump `mtime`/`ctime` to now.
    /// Called after every size-changing operation (write, truncate).
    pub fn touch_size(&mut self, size: u64) {
        self.size = size;
        self.blocks = blocks_for(size);
        let t = now();
        self.mtime = t;
        self.ctime = t;
    }

    /// Encode this record for storage in the `files.attr` blob column.
    pub fn to_bytes(&self) -> std::result::Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Decode a record previously written by [`Attr::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> std::result::Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

/// The `stat(path)` return shape from spec.md §6, derived from an
/// [`Attr`]. Kept as its own type rather than exposing `Attr` directly
/// at the API boundary, since `isFile`/`isDirectory` are convenience
/// projections the wire-level `stat` call documents but `Attr` itself
/// does not need to carry.
#[derive(Debug, Clone)]
pub struct Stat {
    /// True when `kind == Kind::File`.
    pub is_file: bool,
    /// True when `kind == Kind::Directory`.
    pub is_directory: bool,
    /// File size in bytes.
    pub size: u64,
    /// 12-bit POSIX permission bits.
    pub mode: u16,
    /// Owning user id.
    pub uid: u32,
    /// Owning group id.
    pub gid: u32,
    /// Last modification time, Unix seconds.
    pub mtime: i64,
    /// Last metadata-change time, Unix seconds.
    pub ctime: i64,
    /// Last access time, Unix seconds.
    pub atime: i64,
    /// Creation time, Unix seconds.
    pub crtime: i64,
    /// 512-byte block count.
    pub blocks: u64,
    /// Hard link count.
    pub nlink: u32,
    /// Device number for special files.
    pub rdev: u32,
    /// Opaque flags bitfield.
    pub flags: u32,
    /// Preferred I/O block size.
    pub blksize: u32,
    /// Discriminator among directory/file/symlink.
    pub kind: Kind,
}

impl From<&Attr> for Stat {
    fn from(a: &Attr) -> Self {
        Stat {
            is_file: a.kind == Kind::File,
            is_directory: a.kind == Kind::Directory,
            size: a.size,
            mode: a.perm,
            uid: a.uid,
            gid: a.gid,
            mtime: a.mtime,
            ctime: a.ctime,
            atime: a.atime,
            crtime: a.crtime,
            blocks: a.blocks,
            nlink: a.nlink,
            rdev: a.rdev,
            flags: a.flags,
            blksize: a.blksize,
            kind: a.kind,
        }
    }
}
