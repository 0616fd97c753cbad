//! Chunked byte-addressable I/O over a regular file's `chunks` rows
//! (spec.md §4.3).
//!
//! Chunks are sparse: a missing `(ino, offset)` row reads back as zeros.
//! `size`/`space_used` bookkeeping happens at the end of every mutating
//! call here, never incrementally, so a panic mid-write can only ever
//! leave the bookkeeping stale relative to the chunks actually written
//! (and the caller's transaction, if any, is theirs to manage — this
//! engine does not open one of its own; see DESIGN.md).

use storage::SqlStore;

use crate::attr::Kind;
use crate::error::{EngineError, Result};
use crate::filesystem::FileSystem;
use crate::options::{CreateOptions, ReadOptions, WriteOptions};

impl<S: SqlStore> FileSystem<S> {
    /// `read(path, {offset?, length?}) → bytes` (spec.md §4.3).
    pub fn read(&self, path: &str, opts: ReadOptions) -> Result<Vec<u8>> {
        log::trace!("read(path={path:?}, offset={}, length={:?})", opts.offset, opts.length);
        let ino = self.resolve(path)?;
        if self.get_attr_by_ino(ino)?.kind != Kind::File {
            return Err(EngineError::Eisdir);
        }
        let chunks = self.fetch_chunks(ino)?;
        let file_end = chunks.iter().map(|(o, _, l)| o + l).max().unwrap_or(0);
        let offset = opts.offset;
        let end = match opts.length {
            Some(len) => offset + len,
            None => file_end,
        };
        if end <= offset {
            return Ok(Vec::new());
        }

        let mut buf = vec![0u8; (end - offset) as usize];
        for (chunk_offset, data, length) in chunks {
            let chunk_start = chunk_offset;
            let chunk_end = chunk_offset + length;
            let overlap_start = chunk_start.max(offset);
            let overlap_end = chunk_end.min(end);
            if overlap_start >= overlap_end {
                continue;
            }
            let src_start = (overlap_start - chunk_start) as usize;
            let src_end = (overlap_end - chunk_start) as usize;
            let dst_start = (overlap_start - offset) as usize;
            let dst_end = (overlap_end - offset) as usize;
            buf[dst_start..dst_end].copy_from_slice(&data[src_start..src_end]);
        }
        Ok(buf)
    }

    /// `write(path, data, {offset?}) → void` (spec.md §4.3).
    pub fn write(&mut self, path: &str, data: &[u8], opts: WriteOptions) -> Result<()> {
        log::trace!("write(path={path:?}, offset={}, len={})", opts.offset, data.len());
        let ino = match self.resolve(path) {
            Ok(ino) => ino,
            Err(EngineError::Enoent) => {
                self.create(path, CreateOptions::default())?;
                self.resolve(path)?
            }
            Err(e) => return Err(e),
        };
        let attr = self.get_attr_by_ino(ino)?;
        if attr.kind != Kind::File {
            return Err(EngineError::Eisdir);
        }

        let offset = opts.offset;
        let end = offset + data.len() as u64;
        let additional = end.saturating_sub(attr.size);
        let space_used = self.get_meta_int("space_used")?.unwrap_or(0) as u64;
        let device_size = self.get_meta_int("device_size")?.unwrap_or(0) as u64;
        if space_used + additional > device_size {
            return Err(EngineError::Enospc);
        }

        let chunk_size = self.chunk_size;
        let mut pos = offset;
        let mut written = 0usize;
        while written < data.len() {
            let chunk_offset = (pos / chunk_size) * chunk_size;
            let within = (pos - chunk_offset) as usize;
            let room = chunk_size as usize - within;
            let take = room.min(data.len() - written);

            let existing = self.fetch_chunk_at(ino, chunk_offset)?;
            let mut buf = vec![0u8; chunk_size as usize];
            let mut existing_length = 0u64;
            if let Some((existing_data, existing_len)) = existing {
                buf[..existing_data.len()].copy_from_slice(&existing_data);
                existing_length = existing_len;
            }
            buf[within..within + take].copy_from_slice(&data[written..written + take]);

            // Non-tail slices always fill to the chunk boundary, so
            // `within + take` already equals `chunk_size` for them; this
            // single formula covers both cases (spec.md §4.3's tail-length
            // policy).
            let reach = (within + take) as u64;
            let length = reach.max(existing_length);
            self.upsert_chunk(ino, chunk_offset, &buf[..length as usize], length)?;

            written += take;
            pos += take as u64;
        }

        // A write that starts past the previous end of file can skip over
        // an earlier chunk that a prior write left shorter than
        // `chunk_size` (it was the tail then; it no longer is). Absent
        // bytes in the gap read back as zero (spec.md §4.3), so that
        // chunk must be re-upserted at full length or a later `read` would
        // under-report it relative to `attr.size`.
        let chunks = self.fetch_chunks(ino)?;
        if let Some(tail_offset) = chunks.iter().map(|(o, _, _)| *o).max() {
            for (chunk_offset, existing_data, length) in chunks {
                if chunk_offset < tail_offset && length < chunk_size {
                    let mut buf = vec![0u8; chunk_size as usize];
                    buf[..existing_data.len()].copy_from_slice(&existing_data);
                    self.upsert_chunk(ino, chunk_offset, &buf, chunk_size)?;
                }
            }
        }

        let size = self.sum_chunk_lengths(ino)?;
        let mut attr = attr;
        attr.touch_size(size);
        self.put_attr(&attr)?;
        self.recompute_space_used()?;
        log::trace!("write: ino={ino} new_size={size}");
        Ok(())
    }

    /// `truncate(path, size) → void` (spec.md §4.3).
    pub fn truncate(&mut self, path: &str, size: u64) -> Result<()> {
        log::trace!("truncate(path={path:?}, size={size})");
        let ino = self.resolve(path)?;
        let mut attr = self.get_attr_by_ino(ino)?;
        if attr.kind != Kind::File {
            return Err(EngineError::Eisdir);
        }

        let chunk_size = self.chunk_size;
        let threshold = (size / chunk_size) * chunk_size;
        let remainder = size % chunk_size;

        let tail = if remainder != 0 {
            self.fetch_chunk_at(ino, threshold)?
        } else {
            None
        };
        self.delete_chunks_from(ino, threshold)?;
        if remainder != 0 {
            if let Some((existing_data, existing_len)) = tail {
                let keep = (existing_len as usize).min(remainder as usize);
                let mut truncated = vec![0u8; remainder as usize];
                truncated[..keep].copy_from_slice(&existing_data[..keep]);
                self.upsert_chunk(ino, threshold, &truncated, remainder)?;
            }
        }

        attr.touch_size(size);
        self.put_attr(&attr)?;
        self.recompute_space_used()?;
        Ok(())
    }
}
