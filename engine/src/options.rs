//! Explicit option records for the surface in spec.md §6.
//!
//! The source models these as loose records of recognized keys
//! (spec.md §9's Design Note); here each option set is an enumerated
//! struct with a `Default` impl matching the documented default from
//! spec.md §4. Unknown keys cannot exist by construction.

/// Options for [`crate::FileSystem::mkdir`].
#[derive(Debug, Clone, Default)]
pub struct MkdirOptions {
    /// When set, missing intermediate directories are created with the
    /// same permissions. When unset, a missing intermediate yields `ENOENT`.
    pub recursive: bool,
    /// Requested permission bits; defaults to `0o755` if absent.
    pub mode: Option<u16>,
    /// Bits cleared from `mode` (or the default) before storing `perm`.
    pub umask: u16,
}

/// Options for [`crate::FileSystem::create`] and the implicit create
/// performed by [`crate::FileSystem::write`].
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Requested permission bits; defaults to `0o644` if absent.
    pub mode: Option<u16>,
    /// Bits cleared from `mode` (or the default) before storing `perm`.
    pub umask: u16,
}

/// Options for [`crate::FileSystem::rmdir`].
#[derive(Debug, Clone, Default)]
pub struct RmdirOptions {
    /// When unset, the literal spec.md §4.4 behavior: `ENOTEMPTY` on a
    /// non-empty directory. When set, the subtree is deleted bottom-up
    /// first instead of failing.
    pub recursive: bool,
}

/// Options for [`crate::FileSystem::list_dir`].
#[derive(Debug, Clone, Default)]
pub struct ListDirOptions {
    /// When set, a pre-order walk yields all descendants with paths
    /// relative to the listed directory, instead of just its direct children.
    pub recursive: bool,
}

/// Options for [`crate::FileSystem::read`].
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Start offset in bytes; defaults to 0.
    pub offset: u64,
    /// Number of bytes to read; defaults to "through end of file".
    pub length: Option<u64>,
}

/// Options for [`crate::FileSystem::write`].
#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Start offset in bytes; defaults to 0.
    pub offset: u64,
}

/// Options for [`crate::FileSystem::write_file`].
#[derive(Debug, Clone, Default)]
pub struct WriteFileOptions {
    /// Recognized per spec.md §6. The engine is byte-oriented internally;
    /// an adapter layer is responsible for any text encoding/decoding
    /// before bytes reach this boundary, so this field is currently inert.
    pub encoding: Option<String>,
}

/// Options for [`crate::FileSystem::setattr`]. Only the provided fields
/// are applied; absent fields leave the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct SetAttrOptions {
    /// New permission bits, if provided.
    pub mode: Option<u16>,
    /// New owning uid, if provided.
    pub uid: Option<u32>,
    /// New owning gid, if provided.
    pub gid: Option<u32>,
}
