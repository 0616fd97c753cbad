//! Per-instance configuration, playing the role the teacher's
//! `SuperBlock` plays for `mkfs`/`mountfs`: a small, validated record
//! created once and consulted on every subsequent operation.

/// Default chunk granularity for a freshly constructed instance
/// (spec.md §4.3: "default 4 KiB in the per-instance surface").
pub const DEFAULT_CHUNK_SIZE: u64 = 4 * 1024;

/// The general documented default chunk size (spec.md §4.3: "64 KiB
/// documented as the general default"), offered as a named constant for
/// callers that want to match it explicitly.
pub const RECOMMENDED_CHUNK_SIZE: u64 = 64 * 1024;

/// Default device capacity (spec.md §3/§4.5: "default 1 GiB").
pub const DEFAULT_DEVICE_SIZE: u64 = 1024 * 1024 * 1024;

/// Configuration consulted by [`crate::FileSystem::new`].
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    /// Fixed-size block granularity for regular-file payload storage.
    /// Immutable for the lifetime of the instance once any chunk exists
    /// (spec.md §3 invariant 7, §6).
    pub chunk_size: u64,
    /// Initial `meta.device_size`, consulted only the first time an
    /// instance is bootstrapped; later changes go through
    /// [`crate::FileSystem::set_device_size`].
    pub device_size: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            chunk_size: DEFAULT_CHUNK_SIZE,
            device_size: DEFAULT_DEVICE_SIZE,
        }
    }
}
