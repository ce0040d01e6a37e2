use apnum_core::{ApnumError, DigitStore, Result, StorageLocation};

/// Digits held in a flat in-process array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryStore {
    digits: Vec<u8>,
}

impl MemoryStore {
    pub fn new(digits: Vec<u8>) -> Self {
        Self { digits }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.digits
    }
}

impl DigitStore for MemoryStore {
    fn len(&self) -> usize {
        self.digits.len()
    }

    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<()> {
        let end = offset
            .checked_add(buf.len())
            .filter(|&end| end <= self.digits.len())
            .ok_or_else(|| ApnumError::invalid(format!("Read of {} digits at {} past end of store", buf.len(), offset)))?;
        buf.copy_from_slice(&self.digits[offset..end]);
        Ok(())
    }

    fn location(&self) -> StorageLocation {
        StorageLocation::Memory
    }
}
