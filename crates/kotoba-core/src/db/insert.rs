//! Writing dictionaries and their records

use super::Database;
use crate::error::{KotobaError, Result};
use crate::model::{
    DictionarySummary, KanjiMetaRecord, KanjiRecord, TagRecord, TermMetaRecord, TermRecord,
};
use rusqlite::{params, ErrorCode, OptionalExtension, Statement, Transaction, TransactionBehavior};

/// A record that can be bulk-inserted into its table
pub trait InsertRecord {
    const TABLE: &'static str;
    const INSERT_SQL: &'static str;

    fn insert(&self, stmt: &mut Statement<'_>) -> Result<()>;
}

fn json(value: &impl serde::Serialize) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

impl InsertRecord for TermRecord {
    const TABLE: &'static str = "terms";
    const INSERT_SQL: &'static str = "INSERT INTO terms (dictionary, expression, reading, definition_tags, rules, score, glossary, sequence, term_tags) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

    fn insert(&self, stmt: &mut Statement<'_>) -> Result<()> {
        stmt.execute(params![
            self.dictionary,
            self.expression,
            self.reading,
            json(&self.definition_tags)?,
            json(&self.rules)?,
            self.score,
            json(&self.glossary)?,
            self.sequence,
            json(&self.term_tags)?,
        ])?;
        Ok(())
    }
}

impl InsertRecord for TermMetaRecord {
    const TABLE: &'static str = "term_meta";
    const INSERT_SQL: &'static str =
        "INSERT INTO term_meta (dictionary, expression, mode, data) VALUES (?1, ?2, ?3, ?4)";

    fn insert(&self, stmt: &mut Statement<'_>) -> Result<()> {
        stmt.execute(params![
            self.dictionary,
            self.expression,
            self.mode,
            json(&self.data)?
        ])?;
        Ok(())
    }
}

impl InsertRecord for KanjiRecord {
    const TABLE: &'static str = "kanji";
    const INSERT_SQL: &'static str = "INSERT INTO kanji (dictionary, character, onyomi, kunyomi, tags, meanings, stats) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

    fn insert(&self, stmt: &mut Statement<'_>) -> Result<()> {
        let stats = self.stats.as_ref().map(json).transpose()?;
        stmt.execute(params![
            self.dictionary,
            self.character,
            json(&self.onyomi)?,
            json(&self.kunyomi)?,
            json(&self.tags)?,
            json(&self.meanings)?,
            stats,
        ])?;
        Ok(())
    }
}

impl InsertRecord for KanjiMetaRecord {
    const TABLE: &'static str = "kanji_meta";
    const INSERT_SQL: &'static str =
        "INSERT INTO kanji_meta (dictionary, character, mode, data) VALUES (?1, ?2, ?3, ?4)";

    fn insert(&self, stmt: &mut Statement<'_>) -> Result<()> {
        stmt.execute(params![
            self.dictionary,
            self.character,
            self.mode,
            json(&self.data)?
        ])?;
        Ok(())
    }
}

impl InsertRecord for TagRecord {
    const TABLE: &'static str = "tag_meta";
    const INSERT_SQL: &'static str = "INSERT INTO tag_meta (dictionary, name, category, sort_order, notes, score) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";

    fn insert(&self, stmt: &mut Statement<'_>) -> Result<()> {
        stmt.execute(params![
            self.dictionary,
            self.name,
            self.category,
            self.order,
            self.notes,
            self.score
        ])?;
        Ok(())
    }
}

impl Database {
    /// Register a dictionary summary, refusing a title that is already present.
    ///
    /// The existence check and the insert share one immediate transaction, so
    /// two concurrent imports of the same title cannot both register it.
    pub fn register_dictionary(&self, summary: &DictionarySummary) -> Result<()> {
        let conn = self.conn()?;
        let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM dictionaries WHERE title = ?1",
                [&summary.title],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Err(KotobaError::DuplicateDictionary {
                title: summary.title.clone(),
            });
        }

        tx.execute(
            "INSERT INTO dictionaries (title, revision, sequenced, version) VALUES (?1, ?2, ?3, ?4)",
            params![
                summary.title,
                summary.revision,
                summary.sequenced,
                summary.version
            ],
        )
        .map_err(|e| match e.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation) => KotobaError::DuplicateDictionary {
                title: summary.title.clone(),
            },
            _ => KotobaError::from(e),
        })?;

        tx.commit()?;
        // Answers cached before this title existed are stale now
        self.invalidate_tag_cache(&summary.title)?;
        tracing::debug!(title = %summary.title, "Registered dictionary");
        Ok(())
    }

    /// Insert `records` in a single transaction; nothing is kept if one fails.
    pub fn bulk_add<R: InsertRecord>(&self, records: &[R]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let conn = self.conn()?;
        let tx = conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(R::INSERT_SQL)?;
            for record in records {
                record.insert(&mut stmt)?;
            }
        }
        tx.commit()?;

        tracing::trace!(table = R::TABLE, rows = records.len(), "Inserted chunk");
        Ok(())
    }
}
