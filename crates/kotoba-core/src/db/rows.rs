//! Decoding stored rows into lookup entries

use crate::model::{KanjiEntry, KanjiMetaEntry, TagEntry, TermEntry, TermMetaEntry};
use rusqlite::types::Type;
use rusqlite::Row;
use serde::de::DeserializeOwned;

/// A table whose rows decode into one lookup entry type
pub(crate) trait StoredRecord: Sized + Send {
    const TABLE: &'static str;
    /// Select list, `id` first and `dictionary` somewhere after it
    const COLUMNS: &'static str;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
    fn id(&self) -> i64;
    fn dictionary(&self) -> &str;

    fn select_by(column: &str) -> String {
        format!(
            "SELECT {} FROM {} WHERE {} = ?1",
            Self::COLUMNS,
            Self::TABLE,
            column
        )
    }
}

/// Read a JSON-encoded text column
fn json_column<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let text: String = row.get(idx)?;
    serde_json::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn optional_json_column<T: DeserializeOwned>(
    row: &Row<'_>,
    idx: usize,
) -> rusqlite::Result<Option<T>> {
    let text: Option<String> = row.get(idx)?;
    text.map(|t| {
        serde_json::from_str(&t)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

impl StoredRecord for TermEntry {
    const TABLE: &'static str = "terms";
    const COLUMNS: &'static str = "id, dictionary, expression, reading, definition_tags, rules, score, glossary, sequence, term_tags";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(TermEntry {
            index: None,
            id: row.get(0)?,
            dictionary: row.get(1)?,
            expression: row.get(2)?,
            reading: row.get(3)?,
            definition_tags: json_column(row, 4)?,
            rules: json_column(row, 5)?,
            score: row.get(6)?,
            glossary: json_column(row, 7)?,
            sequence: row.get(8)?,
            term_tags: json_column(row, 9)?,
        })
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn dictionary(&self) -> &str {
        &self.dictionary
    }
}

impl StoredRecord for TermMetaEntry {
    const TABLE: &'static str = "term_meta";
    const COLUMNS: &'static str = "id, dictionary, expression, mode, data";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(TermMetaEntry {
            index: None,
            id: row.get(0)?,
            dictionary: row.get(1)?,
            expression: row.get(2)?,
            mode: row.get(3)?,
            data: json_column(row, 4)?,
        })
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn dictionary(&self) -> &str {
        &self.dictionary
    }
}

impl StoredRecord for KanjiEntry {
    const TABLE: &'static str = "kanji";
    const COLUMNS: &'static str = "id, dictionary, character, onyomi, kunyomi, tags, meanings, stats";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(KanjiEntry {
            index: None,
            id: row.get(0)?,
            dictionary: row.get(1)?,
            character: row.get(2)?,
            onyomi: json_column(row, 3)?,
            kunyomi: json_column(row, 4)?,
            tags: json_column(row, 5)?,
            glossary: json_column(row, 6)?,
            stats: optional_json_column(row, 7)?,
        })
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn dictionary(&self) -> &str {
        &self.dictionary
    }
}

impl StoredRecord for KanjiMetaEntry {
    const TABLE: &'static str = "kanji_meta";
    const COLUMNS: &'static str = "id, dictionary, character, mode, data";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(KanjiMetaEntry {
            index: None,
            id: row.get(0)?,
            dictionary: row.get(1)?,
            character: row.get(2)?,
            mode: row.get(3)?,
            data: json_column(row, 4)?,
        })
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn dictionary(&self) -> &str {
        &self.dictionary
    }
}

impl StoredRecord for TagEntry {
    const TABLE: &'static str = "tag_meta";
    const COLUMNS: &'static str = "id, dictionary, name, category, sort_order, notes, score";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(TagEntry {
            id: row.get(0)?,
            dictionary: row.get(1)?,
            name: row.get(2)?,
            category: row.get(3)?,
            order: row.get(4)?,
            notes: row.get(5)?,
            score: row.get(6)?,
        })
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn dictionary(&self) -> &str {
        &self.dictionary
    }
}
