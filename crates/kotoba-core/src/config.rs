//! Store configuration for kotoba
//!
//! Configuration lives in `<store>/config.toml`; every key is optional.

pub mod types;

use std::fs;
use std::path::Path;

use crate::bail_invalid;
use crate::error::{KotobaError, Result};

pub use types::{ScanStrategyConfig, StoreConfig, DEFAULT_CHUNK_SIZE, STORE_FORMAT_VERSION};

impl StoreConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: StoreConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| KotobaError::Other(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.version > STORE_FORMAT_VERSION {
            bail_invalid!("store format version", self.version);
        }
        if self.chunk_size == 0 {
            bail_invalid!("chunk_size", "must be at least 1");
        }
        if self.scan_workers == 0 {
            bail_invalid!("scan_workers", "must be at least 1");
        }
        if self.delete_rate == 0 {
            bail_invalid!("delete_rate", "must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.version, STORE_FORMAT_VERSION);
        assert_eq!(config.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(config.scan_strategy, ScanStrategyConfig::Auto);
        assert_eq!(config.scan_workers, 4);
        assert_eq!(config.delete_rate, 1000);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = StoreConfig {
            chunk_size: 250,
            scan_strategy: ScanStrategyConfig::Cursor,
            ..Default::default()
        };
        config.save(&path).unwrap();

        let loaded = StoreConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "scan_strategy = \"fetch_all\"\n").unwrap();

        let loaded = StoreConfig::load(&path).unwrap();
        assert_eq!(loaded.scan_strategy, ScanStrategyConfig::FetchAll);
        assert_eq!(loaded.chunk_size, DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "chunk_size = 0\n").unwrap();

        let err = StoreConfig::load(&path).unwrap_err();
        assert!(matches!(err, KotobaError::InvalidValue { .. }));
    }
}
