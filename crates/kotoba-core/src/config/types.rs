//! Configuration type definitions

use serde::{Deserialize, Serialize};

/// Current store format version
pub const STORE_FORMAT_VERSION: u32 = 1;

/// Records inserted per bulk-insert transaction during import
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store format version for compatibility checking
    #[serde(default = "default_version")]
    pub version: u32,

    /// Records per insert chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Index scan strategy used by bulk queries
    #[serde(default)]
    pub scan_strategy: ScanStrategyConfig,

    /// Reader connections opened by a single bulk query
    #[serde(default = "default_scan_workers")]
    pub scan_workers: usize,

    /// Rows deleted between progress reports when deleting a dictionary
    #[serde(default = "default_delete_rate")]
    pub delete_rate: usize,

    /// SQLite busy timeout in milliseconds
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            chunk_size: default_chunk_size(),
            scan_strategy: ScanStrategyConfig::default(),
            scan_workers: default_scan_workers(),
            delete_rate: default_delete_rate(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

/// Which index scan implementation bulk queries use.
///
/// `Auto` asks the database which one it can serve once, when it is initialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStrategyConfig {
    #[default]
    Auto,
    FetchAll,
    Cursor,
}

fn default_version() -> u32 {
    STORE_FORMAT_VERSION
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_scan_workers() -> usize {
    4
}

fn default_delete_rate() -> usize {
    1000
}

fn default_busy_timeout_ms() -> u64 {
    5000
}
