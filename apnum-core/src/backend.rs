use crate::config::ContextConfig;
use crate::error::Result;
use std::fmt;
use std::sync::Arc;

/// Where a digit store keeps its digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageLocation {
    Memory,
    Disk,
}

/// Immutable sequence of radix digits, one digit per byte, most significant first.
///
/// Stores are shared between values through `Arc`; a store is never written
/// after construction, so readers only need the store's own lock (if any).
pub trait DigitStore: Send + Sync + fmt::Debug {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies `buf.len()` digits starting at `offset` into `buf`.
    fn read(&self, offset: usize, buf: &mut [u8]) -> Result<()>;

    fn location(&self) -> StorageLocation;
}

/// Creates digit stores; selected by name from the configuration.
pub trait DigitBackendFactory: Send + Sync {
    fn name(&self) -> &'static str;

    /// Takes ownership of `digits` and returns a store holding them.
    fn create(&self, digits: Vec<u8>, config: &ContextConfig) -> Result<Arc<dyn DigitStore>>;
}
