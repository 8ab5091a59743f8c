//! Removing one dictionary and everything it imported

use super::dictionaries::record_counts;
use super::schema::RECORD_TABLES;
use super::Database;
use crate::error::{KotobaError, Result};
use serde::Serialize;
use std::time::Instant;

/// Reported after every deleted batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProgress {
    /// Rows removed so far across all tables
    pub processed: u64,
    /// Rows the dictionary owned when the delete started
    pub count: u64,
    /// Record tables in the store
    pub store_count: usize,
    /// Record tables fully cleared so far
    pub stores_processed: usize,
}

impl Database {
    /// Delete the records of `title` in batches of `rate` rows, then its summary.
    ///
    /// Each batch commits on its own. If the delete is interrupted the summary
    /// is still present and the delete can simply be run again.
    #[tracing::instrument(skip(self, progress))]
    pub fn delete_dictionary(
        &self,
        title: &str,
        rate: usize,
        mut progress: Option<&mut dyn FnMut(DeleteProgress)>,
    ) -> Result<()> {
        let conn = self.conn()?;
        if rate == 0 {
            return Err(KotobaError::invalid_value("delete rate", rate));
        }
        if !self.dictionary_exists(title)? {
            return Err(KotobaError::not_found("dictionary", title));
        }

        let start = Instant::now();
        let totals = record_counts(conn, Some(title))?;
        let mut state = DeleteProgress {
            processed: 0,
            count: totals.terms
                + totals.term_meta
                + totals.kanji
                + totals.kanji_meta
                + totals.tag_meta,
            store_count: RECORD_TABLES.len(),
            stores_processed: 0,
        };

        for table in RECORD_TABLES {
            let sql = format!(
                "DELETE FROM {table} WHERE id IN (SELECT id FROM {table} WHERE dictionary = ?1 LIMIT ?2)"
            );
            loop {
                let deleted = conn.execute(&sql, rusqlite::params![title, rate as i64])?;
                if deleted == 0 {
                    break;
                }
                state.processed += deleted as u64;
                if let Some(cb) = progress.as_mut() {
                    cb(state);
                }
            }
            state.stores_processed += 1;
            tracing::debug!(table, processed = state.processed, "Cleared table");
        }

        conn.execute("DELETE FROM dictionaries WHERE title = ?1", [title])?;
        self.invalidate_tag_cache(title)?;

        if let Some(cb) = progress.as_mut() {
            cb(state);
        }

        crate::trace_time!(start, "delete_dictionary", rows = state.processed);
        tracing::info!(title, rows = state.processed, "Deleted dictionary");
        Ok(())
    }
}
