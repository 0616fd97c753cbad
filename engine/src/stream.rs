//! `writeFile`, the batched/streaming append façade used by uploads
//! (spec.md §4.6).
//!
//! The source's pull-based byte stream becomes a plain Rust iterator:
//! `Iterator::next` is the single suspension point spec.md §9 calls out,
//! and an item of `Result<Vec<u8>>` lets an upstream read failure
//! propagate through `?` without this module inventing its own error
//! channel.

use storage::SqlStore;

use crate::error::{EngineError, Result};
use crate::filesystem::FileSystem;
use crate::options::{CreateOptions, WriteFileOptions, WriteOptions};

impl<S: SqlStore> FileSystem<S> {
    /// `writeFile(path, stream, {encoding?})` (spec.md §4.6): unlinks any
    /// existing entry at `path` (ignoring `ENOENT`), creates a fresh empty
    /// file, then appends each pulled chunk in order. A chunk-producing
    /// error propagates immediately, leaving whatever was already written
    /// in place — there is no rollback, matching the "tempfile then
    /// rename" idiom callers are expected to use for atomic visibility.
    pub fn write_file<I>(&mut self, path: &str, stream: I, _opts: WriteFileOptions) -> Result<()>
    where
        I: IntoIterator<Item = Result<Vec<u8>>>,
    {
        log::trace!("write_file(path={path:?})");
        match self.unlink(path) {
            Ok(()) | Err(EngineError::Enoent) => {}
            Err(e) => return Err(e),
        }
        self.create(path, CreateOptions::default())?;

        let initial_used = self.get_meta_int("space_used")?.unwrap_or(0) as u64;
        let device_size = self.get_meta_int("device_size")?.unwrap_or(0) as u64;

        let mut cumulative = 0u64;
        for chunk in stream {
            let chunk = chunk?;
            if initial_used + cumulative + chunk.len() as u64 > device_size {
                return Err(EngineError::Enospc);
            }
            self.write(path, &chunk, WriteOptions { offset: cumulative })?;
            cumulative += chunk.len() as u64;
        }
        Ok(())
    }

    /// `writeFile(path, data, {encoding?})` over a single finite buffer
    /// (spec.md §4.6 step 4): unlinks any existing entry, preflights the
    /// whole buffer once, and only then creates the file and writes it.
    /// Unlike the streaming form, a rejected preflight here never creates
    /// the destination: the whole size is known up front, so there is no
    /// reason to commit a partial result the way an exhausted stream
    /// might.
    pub fn write_file_bytes(&mut self, path: &str, data: &[u8], _opts: WriteFileOptions) -> Result<()> {
        log::trace!("write_file_bytes(path={path:?}, len={})", data.len());
        match self.unlink(path) {
            Ok(()) | Err(EngineError::Enoent) => {}
            Err(e) => return Err(e),
        }

        let space_used = self.get_meta_int("space_used")?.unwrap_or(0) as u64;
        let device_size = self.get_meta_int("device_size")?.unwrap_or(0) as u64;
        if space_used + data.len() as u64 > device_size {
            return Err(EngineError::Enospc);
        }

        self.create(path, CreateOptions::default())?;
        self.write(path, data, WriteOptions::default())
    }

    /// `readFile(path) → bytes`, the whole-file counterpart to `writeFile`.
    pub fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        self.read(path, crate::options::ReadOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::error::EngineError;
    use crate::options::{CreateOptions, MkdirOptions, WriteFileOptions};
    use storage::RusqliteStore;

    fn fs_with_chunk_size(chunk_size: u64) -> FileSystem<RusqliteStore> {
        FileSystem::new(
            RusqliteStore::open_in_memory().unwrap(),
            EngineConfig {
                chunk_size,
                ..EngineConfig::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn write_file_bytes_round_trips() {
        let mut fs = fs_with_chunk_size(8);
        fs.mkdir("/a", MkdirOptions::default()).unwrap();
        fs.write_file_bytes("/a/t", b"Buy milk", WriteFileOptions::default())
            .unwrap();
        assert_eq!(fs.read_file("/a/t").unwrap(), b"Buy milk");
        assert_eq!(fs.stat("/a/t").unwrap().size, 8);
    }

    #[test]
    fn write_file_stream_concatenates_chunks() {
        let mut fs = fs_with_chunk_size(8);
        let chunks: Vec<Result<Vec<u8>>> = vec![
            Ok(b"aaaaaaaa".to_vec()),
            Ok(b"bbbbbbbb".to_vec()),
            Ok(b"cccccccc".to_vec()),
        ];
        fs.write_file("/upload", chunks, WriteFileOptions::default())
            .unwrap();
        assert_eq!(fs.read_file("/upload").unwrap().len(), 24);
        assert_eq!(fs.device_stats().unwrap().space_used, 24);
    }

    #[test]
    fn write_file_replaces_existing_entry_and_reclaims_space() {
        let mut fs = fs_with_chunk_size(8);
        fs.create("/t", CreateOptions::default()).unwrap();
        fs.write("/t", b"0123456789", WriteOptions::default()).unwrap();
        fs.write_file_bytes("/t", b"short", WriteFileOptions::default())
            .unwrap();
        assert_eq!(fs.read_file("/t").unwrap(), b"short");
        assert_eq!(fs.device_stats().unwrap().space_used, 5);
    }

    #[test]
    fn write_file_over_device_size_is_enospc_and_target_absent() {
        let mut fs = fs_with_chunk_size(8);
        fs.set_device_size(10).unwrap();
        let result = fs.write_file_bytes("/big", &[0u8; 11], WriteFileOptions::default());
        assert!(matches!(result, Err(EngineError::Enospc)));
        assert!(matches!(fs.stat("/big"), Err(EngineError::Enoent)));
    }

    #[test]
    fn rename_upload_idiom_matches_scenario_five() {
        let mut fs = fs_with_chunk_size(8);
        fs.mkdir("/a", MkdirOptions::default()).unwrap();
        fs.write_file_bytes("/a/t", b"Buy milk\nCall Alice", WriteFileOptions::default())
            .unwrap();
        let chunks: Vec<Result<Vec<u8>>> = vec![
            Ok(b"aaaaaaaa".to_vec()),
            Ok(b"bbbbbbbb".to_vec()),
            Ok(b"cccccccc".to_vec()),
        ];
        fs.write_file("/a/t.uploading", chunks, WriteFileOptions::default())
            .unwrap();
        fs.rename("/a/t.uploading", "/a/t").unwrap();
        assert_eq!(fs.read_file("/a/t").unwrap().len(), 24);
        assert_eq!(fs.device_stats().unwrap().space_used, 24);
    }
}
