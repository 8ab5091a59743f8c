//! Store management for kotoba
//!
//! A store is a directory holding `config.toml` and the SQLite database.
//! Default location: `$KOTOBA_STORE`, else the platform data directory.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::config::StoreConfig;
use crate::db::{Database, DATABASE_FILE};
use crate::error::{KotobaError, Result};
use crate::import::{DictionaryImporter, ImportProgress, ImportResult};

pub const CONFIG_FILE: &str = "config.toml";
pub const STORE_ENV: &str = "KOTOBA_STORE";
const DEFAULT_STORE_DIR: &str = "kotoba";

/// The kotoba store
#[derive(Debug)]
pub struct Store {
    root: PathBuf,
    config: StoreConfig,
    db: Database,
}

impl Store {
    /// Store directory used when none is given explicitly
    pub fn default_root() -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(STORE_ENV).filter(|v| !v.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        dirs::data_dir()
            .map(|dir| dir.join(DEFAULT_STORE_DIR))
            .ok_or_else(|| KotobaError::InvalidStore {
                path: PathBuf::from(DEFAULT_STORE_DIR),
                reason: "no data directory on this platform; pass --store".to_string(),
            })
    }

    /// Open the store at `root`, creating the directory on first use
    #[tracing::instrument(skip(root), fields(root = %root.display()))]
    pub fn open(root: &Path) -> Result<Self> {
        if root.exists() && !root.is_dir() {
            return Err(KotobaError::InvalidStore {
                path: root.to_path_buf(),
                reason: "not a directory".to_string(),
            });
        }
        fs::create_dir_all(root)?;

        let config_path = root.join(CONFIG_FILE);
        let config = if config_path.exists() {
            StoreConfig::load(&config_path)?
        } else {
            let config = StoreConfig::default();
            config.save(&config_path)?;
            config
        };
        let db = Database::open(root.join(DATABASE_FILE), config.clone())?;

        Ok(Store {
            root: root.to_path_buf(),
            config,
            db,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut Database {
        &mut self.db
    }

    /// Import the package at `path`
    pub fn import_file(
        &self,
        path: &Path,
        progress: Option<&mut dyn FnMut(ImportProgress)>,
        collect_errors: bool,
    ) -> Result<ImportResult> {
        let file = File::open(path)?;
        DictionaryImporter::new(&self.db).import_dictionary(file, progress, collect_errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanStrategyConfig;
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_store() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("nested").join("store");

        let store = Store::open(&root).unwrap();
        assert!(root.join(DATABASE_FILE).exists());
        assert!(root.join(CONFIG_FILE).exists());
        assert_eq!(store.config(), &StoreConfig::default());
        assert!(store.db().summarize().unwrap().is_empty());
    }

    #[test]
    fn test_open_reads_config() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "chunk_size = 10\nscan_strategy = \"cursor\"\n",
        )
        .unwrap();

        let store = Store::open(dir.path()).unwrap();
        assert_eq!(store.config().chunk_size, 10);
        assert_eq!(store.db().scan_strategy_name().unwrap(), "cursor");
        assert_eq!(store.config().scan_strategy, ScanStrategyConfig::Cursor);
    }

    #[test]
    fn test_open_rejects_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("file");
        fs::write(&path, "").unwrap();

        assert!(matches!(
            Store::open(&path),
            Err(KotobaError::InvalidStore { .. })
        ));
    }

    #[test]
    fn test_import_missing_file() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path()).unwrap();
        let err = store
            .import_file(&dir.path().join("missing.zip"), None, false)
            .unwrap_err();
        assert!(matches!(err, KotobaError::Io(_)));
    }
}
