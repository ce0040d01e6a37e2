use crate::cache::BlockCache;
use crate::cleanup;
use apnum_core::{ApnumError, ContextConfig, DigitStore, Result, StorageLocation};
use parking_lot::Mutex;
use std::fmt;
use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};
use tracing::{debug, trace, warn};

/// Digits spilled to a temporary file, read through a [`BlockCache`].
///
/// All access goes through one lock owned by this store, so operations on
/// different disk stores never contend. The file is removed when the store
/// is dropped, i.e. when the last `Arc` referencing it goes away.
pub struct DiskStore {
    len: usize,
    path: PathBuf,
    inner: Mutex<DiskInner>,
}

struct DiskInner {
    file: Option<NamedTempFile>,
    cache: BlockCache,
}

impl DiskStore {
    /// Writes `digits` to a fresh file named `<counter><suffix>` in the configured directory.
    pub fn create(digits: &[u8], config: &ContextConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.file_path)?;

        let mut file = loop {
            let number = cleanup::next_file_number(config.file_initial_value);
            match Builder::new()
                .prefix(&number.to_string())
                .suffix(&config.file_suffix)
                .rand_bytes(0)
                .tempfile_in(&config.file_path)
            {
                Ok(file) => break file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        };

        for chunk in digits.chunks(config.max_memory_block_size.max(1)) {
            file.write_all(chunk)?;
        }
        file.flush()?;

        let path = file.path().to_path_buf();
        cleanup::register(&path);
        debug!(path = %path.display(), digits = digits.len(), "spilled digit sequence to disk");

        Ok(Self {
            len: digits.len(),
            path,
            inner: Mutex::new(DiskInner {
                file: Some(file),
                cache: BlockCache::new(config.block_size, config.cache_l1_size, config.cache_l2_size, config.cache_burst),
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `(hits, misses)` of the block cache.
    pub fn cache_stats(&self) -> (u64, u64) {
        self.inner.lock().cache.stats()
    }
}

fn read_blocks(file: &mut File, first: usize, count: usize, block_size: usize, total: usize) -> Result<Vec<Vec<u8>>> {
    let start = first * block_size;
    let end = total.min((first + count) * block_size);
    if start >= end {
        return Ok(Vec::new());
    }
    trace!(first, count, "reading digit blocks");
    file.seek(SeekFrom::Start(start as u64))?;
    let mut data = vec![0u8; end - start];
    file.read_exact(&mut data)?;
    Ok(data.chunks(block_size).map(|c| c.to_vec()).collect())
}

impl DigitStore for DiskStore {
    fn len(&self) -> usize {
        self.len
    }

    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<()> {
        let end = offset
            .checked_add(buf.len())
            .filter(|&end| end <= self.len)
            .ok_or_else(|| ApnumError::invalid(format!("Read of {} digits at {} past end of store", buf.len(), offset)))?;

        let total = self.len;
        let mut inner = self.inner.lock();
        let DiskInner { file, cache } = &mut *inner;
        let file = file
            .as_mut()
            .ok_or_else(|| ApnumError::Storage(std::io::Error::new(ErrorKind::NotFound, "digit file already released")))?;
        let block_size = cache.block_size();

        let mut pos = offset;
        let mut written = 0;
        while pos < end {
            let block = pos / block_size;
            let within = pos % block_size;
            let data = cache.get(block, |first, count| read_blocks(file.as_file_mut(), first, count, block_size, total))?;
            if data.len() <= within {
                return Err(ApnumError::Storage(std::io::Error::new(ErrorKind::UnexpectedEof, "short digit block")));
            }
            let n = (data.len() - within).min(end - pos);
            buf[written..written + n].copy_from_slice(&data[within..within + n]);
            pos += n;
            written += n;
        }
        Ok(())
    }

    fn location(&self) -> StorageLocation {
        StorageLocation::Disk
    }
}

impl fmt::Debug for DiskStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiskStore").field("len", &self.len).field("path", &self.path).finish()
    }
}

impl Drop for DiskStore {
    fn drop(&mut self) {
        cleanup::unregister(&self.path);
        if let Some(file) = self.inner.get_mut().file.take() {
            match file.close() {
                Ok(()) => trace!(path = %self.path.display(), "removed digit file"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!(path = %self.path.display(), error = %e, "failed to remove digit file"),
            }
        }
    }
}
