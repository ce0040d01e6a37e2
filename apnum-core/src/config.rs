use crate::error::{check_radix, ApnumError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

/// Property keys understood by [`ContextConfig::set_property`].
pub mod keys {
    pub const BACKEND: &str = "backend";
    pub const DEFAULT_RADIX: &str = "default_radix";
    pub const MAX_MEMORY_BLOCK_SIZE: &str = "max_memory_block_size";
    pub const CACHE_L1_SIZE: &str = "cache_l1_size";
    pub const CACHE_L2_SIZE: &str = "cache_l2_size";
    pub const CACHE_BURST: &str = "cache_burst";
    pub const MEMORY_THRESHOLD: &str = "memory_threshold";
    /// Legacy spelling of [`MEMORY_THRESHOLD`].
    pub const MEMORY_TRESHOLD: &str = "memory_treshold";
    pub const SHARED_MEMORY_THRESHOLD: &str = "shared_memory_threshold";
    pub const BLOCK_SIZE: &str = "block_size";
    pub const NUMBER_OF_PROCESSORS: &str = "number_of_processors";
    pub const FILE_PATH: &str = "file_path";
    pub const FILE_INITIAL_VALUE: &str = "file_initial_value";
    pub const FILE_SUFFIX: &str = "file_suffix";
    pub const CLEANUP_AT_EXIT: &str = "cleanup_at_exit";

    pub const ALL: [&str; 14] = [
        BACKEND,
        DEFAULT_RADIX,
        MAX_MEMORY_BLOCK_SIZE,
        CACHE_L1_SIZE,
        CACHE_L2_SIZE,
        CACHE_BURST,
        MEMORY_THRESHOLD,
        SHARED_MEMORY_THRESHOLD,
        BLOCK_SIZE,
        NUMBER_OF_PROCESSORS,
        FILE_PATH,
        FILE_INITIAL_VALUE,
        FILE_SUFFIX,
        CLEANUP_AT_EXIT,
    ];
}

/// Tunables of the execution context.
///
/// Sizes are in bytes; the storage layer keeps one digit per byte, so a
/// byte threshold is also a digit-count threshold.
///
/// # Example
/// ```
/// use apnum_core::ContextConfig;
///
/// let mut config = ContextConfig::default();
/// config.set_property("memory_threshold", "4096").unwrap();
/// // the legacy spelling is still accepted
/// config.set_property("memory_treshold", "8192").unwrap();
/// assert_eq!(config.memory_threshold, 8192);
/// assert_eq!(config.get_property("default_radix").unwrap(), "10");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Registered name of the digit backend factory.
    pub backend: String,
    pub default_radix: u32,
    /// Largest chunk a disk store reads into memory at once.
    pub max_memory_block_size: usize,
    /// Bytes held by the small, fast cache tier of a disk store.
    pub cache_l1_size: usize,
    /// Bytes held by the larger cache tier of a disk store.
    pub cache_l2_size: usize,
    /// Read-ahead size on a cache miss.
    pub cache_burst: usize,
    /// Digit sequences longer than this are spilled to disk.
    #[serde(alias = "memory_treshold")]
    pub memory_threshold: usize,
    /// Operand size from which multiplication work is shared across the worker pool.
    pub shared_memory_threshold: usize,
    /// Disk block size of the block cache.
    pub block_size: usize,
    /// Worker pool size.
    pub number_of_processors: usize,
    /// Directory for temporary digit files.
    pub file_path: PathBuf,
    /// First value of the temporary file name counter.
    pub file_initial_value: u64,
    pub file_suffix: String,
    /// Sweep remaining temporary files on orderly shutdown.
    pub cleanup_at_exit: bool,
}

impl Default for ContextConfig {
    fn default() -> Self {
        let processors = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        Self {
            backend: "default".to_string(),
            default_radix: 10,
            max_memory_block_size: 64 * 1024 * 1024,
            cache_l1_size: 8 * 1024,
            cache_l2_size: 256 * 1024,
            cache_burst: 32 * 1024,
            memory_threshold: 16 * 1024 * 1024,
            shared_memory_threshold: 64 * 1024,
            block_size: 4096,
            number_of_processors: processors,
            file_path: std::env::temp_dir(),
            file_initial_value: 0,
            file_suffix: ".ap".to_string(),
            cleanup_at_exit: true,
        }
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ApnumError::invalid(format!("Invalid value '{}' for property {}", value, key)))
}

impl ContextConfig {
    /// Overrides a single property from its string form.
    pub fn set_property(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            keys::BACKEND => self.backend = value.trim().to_string(),
            keys::DEFAULT_RADIX => self.default_radix = check_radix(parse_value(key, value)?)?,
            keys::MAX_MEMORY_BLOCK_SIZE => self.max_memory_block_size = parse_value(key, value)?,
            keys::CACHE_L1_SIZE => self.cache_l1_size = parse_value(key, value)?,
            keys::CACHE_L2_SIZE => self.cache_l2_size = parse_value(key, value)?,
            keys::CACHE_BURST => self.cache_burst = parse_value(key, value)?,
            keys::MEMORY_THRESHOLD | keys::MEMORY_TRESHOLD => self.memory_threshold = parse_value(key, value)?,
            keys::SHARED_MEMORY_THRESHOLD => self.shared_memory_threshold = parse_value(key, value)?,
            keys::BLOCK_SIZE => self.block_size = parse_value(key, value)?,
            keys::NUMBER_OF_PROCESSORS => self.number_of_processors = parse_value(key, value)?,
            keys::FILE_PATH => self.file_path = PathBuf::from(value.trim()),
            keys::FILE_INITIAL_VALUE => self.file_initial_value = parse_value(key, value)?,
            keys::FILE_SUFFIX => self.file_suffix = value.to_string(),
            keys::CLEANUP_AT_EXIT => self.cleanup_at_exit = parse_value(key, value)?,
            _ => return Err(ApnumError::invalid(format!("Unknown property {}", key))),
        }
        Ok(())
    }

    pub fn get_property(&self, key: &str) -> Result<String> {
        let value = match key {
            keys::BACKEND => self.backend.clone(),
            keys::DEFAULT_RADIX => self.default_radix.to_string(),
            keys::MAX_MEMORY_BLOCK_SIZE => self.max_memory_block_size.to_string(),
            keys::CACHE_L1_SIZE => self.cache_l1_size.to_string(),
            keys::CACHE_L2_SIZE => self.cache_l2_size.to_string(),
            keys::CACHE_BURST => self.cache_burst.to_string(),
            keys::MEMORY_THRESHOLD | keys::MEMORY_TRESHOLD => self.memory_threshold.to_string(),
            keys::SHARED_MEMORY_THRESHOLD => self.shared_memory_threshold.to_string(),
            keys::BLOCK_SIZE => self.block_size.to_string(),
            keys::NUMBER_OF_PROCESSORS => self.number_of_processors.to_string(),
            keys::FILE_PATH => self.file_path.display().to_string(),
            keys::FILE_INITIAL_VALUE => self.file_initial_value.to_string(),
            keys::FILE_SUFFIX => self.file_suffix.clone(),
            keys::CLEANUP_AT_EXIT => self.cleanup_at_exit.to_string(),
            _ => return Err(ApnumError::invalid(format!("Unknown property {}", key))),
        };
        Ok(value)
    }

    /// All properties in their string form, keyed by canonical name.
    pub fn properties(&self) -> BTreeMap<String, String> {
        keys::ALL
            .iter()
            .filter_map(|k| self.get_property(k).ok().map(|v| (k.to_string(), v)))
            .collect()
    }

    /// Applies every property of `properties`; stops at the first invalid one
    /// and leaves `self` untouched in that case.
    pub fn set_properties(&mut self, properties: &BTreeMap<String, String>) -> Result<()> {
        let mut updated = self.clone();
        for (key, value) in properties {
            updated.set_property(key, value)?;
        }
        *self = updated;
        Ok(())
    }

    /// Checks cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        check_radix(self.default_radix)?;
        if self.number_of_processors == 0 {
            return Err(ApnumError::invalid("number_of_processors must be at least 1"));
        }
        if self.block_size == 0 {
            return Err(ApnumError::invalid("block_size must be at least 1"));
        }
        if self.max_memory_block_size == 0 {
            return Err(ApnumError::invalid("max_memory_block_size must be at least 1"));
        }
        if self.cache_l1_size > self.cache_l2_size {
            return Err(ApnumError::invalid(format!(
                "cache_l1_size {} exceeds cache_l2_size {}",
                self.cache_l1_size, self.cache_l2_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ContextConfig::default();
        config.validate().unwrap();
        assert_eq!(config.default_radix, 10);
        assert!(config.number_of_processors >= 1);
    }

    #[test]
    fn test_property_roundtrip() {
        let mut config = ContextConfig::default();
        config.set_property(keys::NUMBER_OF_PROCESSORS, "3").unwrap();
        config.set_property(keys::FILE_SUFFIX, ".digits").unwrap();
        config.set_property(keys::CLEANUP_AT_EXIT, "false").unwrap();

        let props = config.properties();
        assert_eq!(props.len(), keys::ALL.len());
        assert_eq!(props[keys::NUMBER_OF_PROCESSORS], "3");
        assert_eq!(props[keys::FILE_SUFFIX], ".digits");
        assert_eq!(props[keys::CLEANUP_AT_EXIT], "false");
    }

    #[test]
    fn test_invalid_properties_rejected() {
        let mut config = ContextConfig::default();
        assert!(matches!(config.set_property("no_such_key", "1"), Err(ApnumError::InvalidArgument(_))));
        assert!(matches!(config.set_property(keys::BLOCK_SIZE, "lots"), Err(ApnumError::InvalidArgument(_))));
        assert!(matches!(config.set_property(keys::DEFAULT_RADIX, "40"), Err(ApnumError::Format(_))));
    }

    #[test]
    fn test_set_properties_is_atomic() {
        let mut config = ContextConfig::default();
        let mut props = BTreeMap::new();
        props.insert(keys::BLOCK_SIZE.to_string(), "512".to_string());
        props.insert(keys::CACHE_BURST.to_string(), "not a number".to_string());
        assert!(config.set_properties(&props).is_err());
        assert_eq!(config.block_size, ContextConfig::default().block_size);

        props.insert(keys::CACHE_BURST.to_string(), "1024".to_string());
        config.set_properties(&props).unwrap();
        assert_eq!(config.block_size, 512);
        assert_eq!(config.cache_burst, 1024);
    }

    #[test]
    fn test_validate_cache_tiers() {
        let config = ContextConfig { cache_l1_size: 10, cache_l2_size: 5, ..Default::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serde_legacy_alias() {
        let config: ContextConfig = serde_json::from_str(r#"{"memory_treshold": 123, "default_radix": 16}"#).unwrap();
        assert_eq!(config.memory_threshold, 123);
        assert_eq!(config.default_radix, 16);
        assert_eq!(config.block_size, ContextConfig::default().block_size);
    }
}
