//! Named backend factories, selected by [`ContextConfig::backend`].

use crate::disk::DiskStore;
use crate::memory::MemoryStore;
use apnum_core::{ApnumError, ContextConfig, DigitBackendFactory, DigitStore, Result};
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::trace;

/// Keeps digits in memory up to `memory_threshold`, spills larger sequences to disk.
#[derive(Debug, Default)]
pub struct DefaultBackend;

/// Always in memory, regardless of size.
#[derive(Debug, Default)]
pub struct MemoryBackend;

/// Always on disk, regardless of size.
#[derive(Debug, Default)]
pub struct DiskBackend;

impl DigitBackendFactory for DefaultBackend {
    fn name(&self) -> &'static str {
        "default"
    }

    fn create(&self, digits: Vec<u8>, config: &ContextConfig) -> Result<Arc<dyn DigitStore>> {
        if digits.len() > config.memory_threshold {
            DiskBackend.create(digits, config)
        } else {
            MemoryBackend.create(digits, config)
        }
    }
}

impl DigitBackendFactory for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn create(&self, digits: Vec<u8>, _config: &ContextConfig) -> Result<Arc<dyn DigitStore>> {
        Ok(Arc::new(MemoryStore::new(digits)))
    }
}

impl DigitBackendFactory for DiskBackend {
    fn name(&self) -> &'static str {
        "disk"
    }

    fn create(&self, digits: Vec<u8>, config: &ContextConfig) -> Result<Arc<dyn DigitStore>> {
        Ok(Arc::new(DiskStore::create(&digits, config)?))
    }
}

static REGISTRY: Lazy<Vec<Arc<dyn DigitBackendFactory>>> =
    Lazy::new(|| vec![Arc::new(DefaultBackend), Arc::new(MemoryBackend), Arc::new(DiskBackend)]);

/// Looks up a factory by name.
pub fn lookup(name: &str) -> Result<Arc<dyn DigitBackendFactory>> {
    trace!(name, "looking up digit backend");
    REGISTRY
        .iter()
        .find(|f| f.name() == name)
        .cloned()
        .ok_or_else(|| ApnumError::invalid(format!("Unknown storage backend '{}'; known: {}", name, names().join(", "))))
}

pub fn names() -> Vec<&'static str> {
    REGISTRY.iter().map(|f| f.name()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use apnum_core::StorageLocation;

    #[test]
    fn test_lookup_known_and_unknown() {
        assert_eq!(lookup("memory").unwrap().name(), "memory");
        assert_eq!(names(), vec!["default", "memory", "disk"]);
        assert!(matches!(lookup("quantum"), Err(ApnumError::InvalidArgument(_))));
    }

    #[test]
    fn test_default_stays_in_memory_below_threshold() {
        let config = ContextConfig { memory_threshold: 8, ..Default::default() };
        let store = DefaultBackend.create(vec![1; 8], &config).unwrap();
        assert_eq!(store.location(), StorageLocation::Memory);
    }
}
