//! Device accounting and df-style reporting (spec.md §4.5).

use storage::SqlStore;

use crate::error::{EngineError, Result};
use crate::filesystem::FileSystem;

/// `device_stats() → {deviceSize, spaceUsed, spaceAvailable}` (spec.md §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceStats {
    /// Total device capacity in bytes.
    pub device_size: u64,
    /// `Σ chunks.length` across every inode.
    pub space_used: u64,
    /// `device_size - space_used`.
    pub space_available: u64,
}

impl<S: SqlStore> FileSystem<S> {
    /// `device_stats()` (spec.md §4.5).
    pub fn device_stats(&self) -> Result<DeviceStats> {
        let device_size = self.get_meta_int("device_size")?.unwrap_or(0) as u64;
        let space_used = self.get_meta_int("space_used")?.unwrap_or(0) as u64;
        Ok(DeviceStats {
            device_size,
            space_used,
            space_available: device_size.saturating_sub(space_used),
        })
    }

    /// `set_device_size(n)` (spec.md §4.5): fails `ENOSPC` if `n` would be
    /// smaller than bytes already in use.
    pub fn set_device_size(&mut self, n: u64) -> Result<()> {
        log::debug!("set_device_size(n={n})");
        let space_used = self.get_meta_int("space_used")?.unwrap_or(0) as u64;
        if n < space_used {
            return Err(EngineError::Enospc);
        }
        self.set_meta_int("device_size", n as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::options::WriteOptions;
    use storage::RusqliteStore;

    fn fs() -> FileSystem<RusqliteStore> {
        FileSystem::new(RusqliteStore::open_in_memory().unwrap(), EngineConfig::default()).unwrap()
    }

    #[test]
    fn stats_reflect_defaults() {
        let fs = fs();
        let stats = fs.device_stats().unwrap();
        assert_eq!(stats.space_used, 0);
        assert_eq!(stats.space_available, stats.device_size);
    }

    #[test]
    fn set_device_size_rejects_shrink_below_usage() {
        let mut fs = fs();
        fs.write("/t", b"hello world", WriteOptions::default()).unwrap();
        assert!(matches!(
            fs.set_device_size(5),
            Err(EngineError::Enospc)
        ));
    }

    #[test]
    fn set_device_size_accepts_shrink_above_usage() {
        let mut fs = fs();
        fs.write("/t", b"hello", WriteOptions::default()).unwrap();
        fs.set_device_size(5).unwrap();
        let stats = fs.device_stats().unwrap();
        assert_eq!(stats.device_size, 5);
        assert_eq!(stats.space_available, 0);
    }
}
