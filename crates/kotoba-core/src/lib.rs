//! Kotoba Core Library
//!
//! Dictionary storage for kotoba: a SQLite record store with bulk multi-index
//! lookups, and an importer for zipped dictionary packages.

pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod logging;
pub mod model;
pub mod store;
pub mod text;
