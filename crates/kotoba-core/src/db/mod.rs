//! SQLite record store for kotoba
//!
//! One writer connection per [`Database`]; bulk queries open their own
//! read-only connections so index scans can run side by side.

mod bulk;
mod delete;
mod dictionaries;
mod find;
mod insert;
mod rows;
mod scan;
mod schema;
mod tags;

use crate::config::StoreConfig;
use crate::error::{KotobaError, Result};
use crate::logging::ResourceMetrics;
use crate::map_db_err;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

pub use delete::DeleteProgress;
pub use insert::InsertRecord;
pub use scan::{ScanKey, ScanStrategy};
pub use schema::{create_schema, SchemaCreateResult, CURRENT_SCHEMA_VERSION, RECORD_TABLES};
pub use tags::TagCache;

/// Database file name inside a store directory
pub const DATABASE_FILE: &str = "kotoba.db";

/// Live storage handle, present between `initialize` and `close`
#[derive(Debug)]
struct Handle {
    conn: Connection,
    scan: Box<dyn ScanStrategy>,
}

impl Drop for Handle {
    fn drop(&mut self) {
        // Fold the WAL back into the main file so the next open starts clean
        let _ = self.conn.pragma_update(None, "wal_checkpoint", "TRUNCATE");
    }
}

/// SQLite database for kotoba
#[derive(Debug)]
pub struct Database {
    path: PathBuf,
    config: StoreConfig,
    handle: Option<Handle>,
    tag_cache: Mutex<TagCache>,
    tag_metrics: ResourceMetrics,
}

impl Database {
    /// Create a handle for the database file at `path`; nothing is opened until
    /// [`Database::initialize`].
    pub fn new(path: impl Into<PathBuf>, config: StoreConfig) -> Self {
        Self {
            path: path.into(),
            config,
            handle: None,
            tag_cache: Mutex::new(TagCache::default()),
            tag_metrics: ResourceMetrics::new(),
        }
    }

    /// Create and initialize in one step
    pub fn open(path: impl Into<PathBuf>, config: StoreConfig) -> Result<Self> {
        let mut db = Self::new(path, config);
        db.initialize()?;
        Ok(db)
    }

    /// Open storage at the current schema layout, upgrading older layouts in place.
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    pub fn initialize(&mut self) -> Result<()> {
        if self.handle.is_some() {
            return Err(KotobaError::AlreadyInitialized);
        }

        let conn = Self::open_writer(&self.path, &self.config)?;
        let result = create_schema(&conn)?;
        tracing::debug!(?result, "Schema ready");

        let scan = scan::select_strategy(&conn, self.config.scan_strategy)?;
        tracing::debug!(strategy = scan.name(), "Selected index scan strategy");

        self.handle = Some(Handle { conn, scan });
        Ok(())
    }

    fn open_writer(path: &Path, config: &StoreConfig) -> Result<Connection> {
        let conn = Connection::open(path).map_err(|e| {
            KotobaError::Other(format!(
                "failed to open database at {}: {}",
                path.display(),
                e
            ))
        })?;

        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| KotobaError::Other(format!("failed to enable WAL mode: {}", e)))?;
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(|e| KotobaError::Other(format!("failed to enable foreign keys: {}", e)))?;
        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;

        Ok(conn)
    }

    /// Discard every table and the tag cache, then recreate the current layout.
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    pub fn purge(&mut self) -> Result<()> {
        let handle = self.handle.as_ref().ok_or(KotobaError::NotInitialized)?;

        let tx = handle.conn.unchecked_transaction()?;
        schema::drop_all_tables(&tx)?;
        create_schema(&tx)?;
        tx.commit().map_err(|e| map_db_err!("commit purge", e))?;

        self.tag_cache_lock()?.clear();
        tracing::info!("Database purged");
        Ok(())
    }

    /// Release the storage handle; later operations fail with `NotInitialized`.
    pub fn close(&mut self) -> Result<()> {
        match self.handle.take() {
            Some(handle) => {
                drop(handle);
                self.tag_cache_lock()?.clear();
                Ok(())
            }
            None => Err(KotobaError::NotInitialized),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.handle.is_some()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn handle(&self) -> Result<&Handle> {
        self.handle.as_ref().ok_or(KotobaError::NotInitialized)
    }

    pub(crate) fn conn(&self) -> Result<&Connection> {
        Ok(&self.handle()?.conn)
    }

    fn tag_cache_lock(&self) -> Result<MutexGuard<'_, TagCache>> {
        self.tag_cache
            .lock()
            .map_err(|_| KotobaError::Other("tag cache lock poisoned".to_string()))
    }

    /// Hit/miss counters of the tag cache
    pub fn tag_cache_metrics(&self) -> &ResourceMetrics {
        &self.tag_metrics
    }

    /// Name of the index scan strategy picked at initialization
    pub fn scan_strategy_name(&self) -> Result<&'static str> {
        Ok(self.handle()?.scan.name())
    }

    pub fn schema_version(&self) -> Result<i32> {
        schema::stored_schema_version(self.conn()?)?
            .ok_or_else(|| KotobaError::Other("schema version missing".to_string()))
    }
}

#[cfg(test)]
mod tests;
