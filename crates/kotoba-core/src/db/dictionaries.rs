//! Dictionary summaries and per-dictionary record counts

use super::schema::RECORD_TABLES;
use super::Database;
use crate::error::Result;
use crate::model::{DictionaryCounts, DictionarySummary, RecordCounts};
use rusqlite::Connection;

fn count_rows(conn: &Connection, table: &str, title: Option<&str>) -> Result<u64> {
    let count: i64 = match title {
        Some(title) => conn.query_row(
            &format!("SELECT COUNT(*) FROM {} WHERE dictionary = ?1", table),
            [title],
            |row| row.get(0),
        )?,
        None => conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
            row.get(0)
        })?,
    };
    Ok(count as u64)
}

/// Counts for one title, or for every dictionary when `title` is `None`
pub(crate) fn record_counts(conn: &Connection, title: Option<&str>) -> Result<RecordCounts> {
    let mut counts = [0u64; RECORD_TABLES.len()];
    for (slot, table) in counts.iter_mut().zip(RECORD_TABLES) {
        *slot = count_rows(conn, table, title)?;
    }
    let [terms, term_meta, kanji, kanji_meta, tag_meta] = counts;
    Ok(RecordCounts {
        terms,
        term_meta,
        kanji,
        kanji_meta,
        tag_meta,
    })
}

impl Database {
    /// Every registered dictionary, oldest import first
    pub fn summarize(&self) -> Result<Vec<DictionarySummary>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare_cached(
            "SELECT title, revision, sequenced, version FROM dictionaries ORDER BY id",
        )?;
        let summaries = stmt
            .query_map([], |row| {
                Ok(DictionarySummary {
                    title: row.get(0)?,
                    revision: row.get(1)?,
                    sequenced: row.get(2)?,
                    version: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(summaries)
    }

    pub fn dictionary_exists(&self, title: &str) -> Result<bool> {
        let exists: bool = self.conn()?.query_row(
            "SELECT COUNT(*) > 0 FROM dictionaries WHERE title = ?1",
            [title],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Record counts per requested title, in request order.
    ///
    /// Unknown titles count as zero. With `include_total` the total covers the
    /// whole store, not just the requested titles.
    pub fn get_dictionary_counts(
        &self,
        titles: &[String],
        include_total: bool,
    ) -> Result<DictionaryCounts> {
        let conn = self.conn()?;
        let counts = titles
            .iter()
            .map(|title| record_counts(conn, Some(title)))
            .collect::<Result<Vec<_>>>()?;
        let total = if include_total {
            Some(record_counts(conn, None)?)
        } else {
            None
        };
        Ok(DictionaryCounts { counts, total })
    }
}
