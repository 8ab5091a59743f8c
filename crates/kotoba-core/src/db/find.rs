//! Single-key lookups
//!
//! Unlike the bulk queries these run on the writer connection and leave
//! `index` unset on every entry.

use super::rows::StoredRecord;
use super::Database;
use crate::error::Result;
use crate::model::{KanjiEntry, KanjiMetaEntry, TermEntry, TermMetaEntry};
use rusqlite::ToSql;
use std::collections::HashSet;

impl Database {
    /// Rows of `R` matching `condition` whose dictionary is in `titles`, in id order
    fn find_where<R: StoredRecord>(
        &self,
        condition: &str,
        params: &[&dyn ToSql],
        titles: &HashSet<String>,
    ) -> Result<Vec<R>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM {} WHERE {} ORDER BY id",
            R::COLUMNS,
            R::TABLE,
            condition
        );
        let mut stmt = conn.prepare_cached(&sql)?;
        let rows = stmt.query_map(params, R::from_row)?;

        let mut results = Vec::new();
        for row in rows {
            let record = row?;
            if titles.contains(record.dictionary()) {
                results.push(record);
            }
        }
        Ok(results)
    }

    /// Terms whose expression or reading equals `term`
    pub fn find_terms(&self, term: &str, titles: &HashSet<String>) -> Result<Vec<TermEntry>> {
        self.find_where("expression = ?1 OR reading = ?1", &[&term], titles)
    }

    pub fn find_terms_exact(
        &self,
        term: &str,
        reading: &str,
        titles: &HashSet<String>,
    ) -> Result<Vec<TermEntry>> {
        self.find_where("expression = ?1 AND reading = ?2", &[&term, &reading], titles)
    }

    pub fn find_terms_by_sequence(
        &self,
        sequence: i64,
        titles: &HashSet<String>,
    ) -> Result<Vec<TermEntry>> {
        self.find_where("sequence = ?1", &[&sequence], titles)
    }

    pub fn find_term_meta(
        &self,
        term: &str,
        titles: &HashSet<String>,
    ) -> Result<Vec<TermMetaEntry>> {
        self.find_where("expression = ?1", &[&term], titles)
    }

    pub fn find_kanji(&self, character: &str, titles: &HashSet<String>) -> Result<Vec<KanjiEntry>> {
        self.find_where("character = ?1", &[&character], titles)
    }

    pub fn find_kanji_meta(
        &self,
        character: &str,
        titles: &HashSet<String>,
    ) -> Result<Vec<KanjiMetaEntry>> {
        self.find_where("character = ?1", &[&character], titles)
    }
}
