use crate::memory::MemoryStore;
use apnum_core::{ApnumError, DigitStore, Result, StorageLocation};
use std::sync::Arc;

/// A window onto a shared [`DigitStore`].
///
/// Truncating a value only narrows the window; the underlying store is
/// shared until the last sequence referencing it is dropped.
#[derive(Debug, Clone)]
pub struct DigitSequence {
    store: Arc<dyn DigitStore>,
    offset: usize,
    len: usize,
}

impl DigitSequence {
    pub fn empty() -> Self {
        Self::from_store(Arc::new(MemoryStore::new(Vec::new())))
    }

    pub fn from_store(store: Arc<dyn DigitStore>) -> Self {
        let len = store.len();
        Self { store, offset: 0, len }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn location(&self) -> StorageLocation {
        self.store.location()
    }

    /// Copies the whole window into memory.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        let mut digits = vec![0u8; self.len];
        self.store.read(self.offset, &mut digits)?;
        Ok(digits)
    }

    /// Copies `buf.len()` digits starting at `offset` within the window.
    pub fn read(&self, offset: usize, buf: &mut [u8]) -> Result<()> {
        if offset.checked_add(buf.len()).map_or(true, |end| end > self.len) {
            return Err(ApnumError::invalid(format!(
                "Read of {} digits at {} past end of sequence of {}",
                buf.len(),
                offset,
                self.len
            )));
        }
        self.store.read(self.offset + offset, buf)
    }

    pub fn digit(&self, index: usize) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read(index, &mut buf)?;
        Ok(buf[0])
    }

    /// The first `len` digits, sharing storage.
    pub fn prefix(&self, len: usize) -> Self {
        self.slice(0, len.min(self.len))
    }

    /// `len` digits starting at `start`, clamped to the window, sharing storage.
    pub fn slice(&self, start: usize, len: usize) -> Self {
        let start = start.min(self.len);
        let len = len.min(self.len - start);
        Self { store: Arc::clone(&self.store), offset: self.offset + start, len }
    }

    pub fn shares_storage(&self, other: &DigitSequence) -> bool {
        Arc::ptr_eq(&self.store, &other.store)
    }

    /// Number of sequences currently referencing the underlying store.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.store)
    }
}

impl From<Vec<u8>> for DigitSequence {
    fn from(digits: Vec<u8>) -> Self {
        Self::from_store(Arc::new(MemoryStore::new(digits)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_shares_storage() {
        let seq = DigitSequence::from(vec![1, 2, 3, 4, 5]);
        let head = seq.prefix(3);
        assert_eq!(head.to_vec().unwrap(), vec![1, 2, 3]);
        assert!(head.shares_storage(&seq));
        assert_eq!(seq.ref_count(), 2);
        drop(head);
        assert_eq!(seq.ref_count(), 1);
    }

    #[test]
    fn test_slice_is_clamped() {
        let seq = DigitSequence::from(vec![9, 8, 7, 6]);
        let tail = seq.slice(2, 10);
        assert_eq!(tail.to_vec().unwrap(), vec![7, 6]);
        assert_eq!(tail.digit(1).unwrap(), 6);
        assert!(tail.digit(2).is_err());
        assert!(seq.slice(7, 1).is_empty());
    }

    #[test]
    fn test_empty() {
        let seq = DigitSequence::empty();
        assert!(seq.is_empty());
        assert_eq!(seq.to_vec().unwrap(), Vec::<u8>::new());
        assert_eq!(seq.location(), StorageLocation::Memory);
    }
}
