//! Temporary file bookkeeping.
//!
//! Disk stores delete their file when the last reference is dropped. The
//! registry here only covers files that outlive their store (leaked
//! references, process exit), swept by [`cleanup`].

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

static LIVE_FILES: Lazy<Mutex<HashSet<PathBuf>>> = Lazy::new(Default::default);
static FILE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Next temporary file number; strictly increasing within the process.
pub(crate) fn next_file_number(initial: u64) -> u64 {
    initial.wrapping_add(FILE_COUNTER.fetch_add(1, Ordering::Relaxed))
}

pub(crate) fn register(path: &Path) {
    LIVE_FILES.lock().insert(path.to_path_buf());
}

pub(crate) fn unregister(path: &Path) {
    LIVE_FILES.lock().remove(path);
}

/// Temporary digit files currently owned by live stores.
pub fn live_files() -> Vec<PathBuf> {
    let mut files: Vec<_> = LIVE_FILES.lock().iter().cloned().collect();
    files.sort();
    files
}

/// Best-effort sweep of every registered temporary file.
///
/// Returns the number of files removed. Failures are logged, never raised.
pub fn cleanup() -> usize {
    let files: Vec<PathBuf> = LIVE_FILES.lock().drain().collect();
    let mut removed = 0;
    for path in files {
        match std::fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "failed to remove temporary digit file"),
        }
    }
    debug!(removed, "temporary file sweep finished");
    removed
}
