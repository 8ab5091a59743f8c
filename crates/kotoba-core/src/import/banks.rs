//! Data banks and their row layouts
//!
//! Term and kanji banks come in two layouts. Format 1 packages end each row
//! with a variadic run of glossary or meaning entries; later formats use a
//! fixed column set with optional trailing columns. The layout is chosen once
//! per import from the package format and every row is decoded against it.

use crate::error::{KotobaError, Result};
use crate::model::{KanjiMetaRecord, KanjiRecord, TagRecord, TermMetaRecord, TermRecord};
use crate::text::split_value;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

pub const DEFAULT_TAG_CATEGORY: &str = "default";

/// Bank categories, in the order an import processes them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BankKind {
    Term,
    TermMeta,
    Kanji,
    KanjiMeta,
    Tag,
}

impl BankKind {
    pub const ALL: [BankKind; 5] = [
        BankKind::Term,
        BankKind::TermMeta,
        BankKind::Kanji,
        BankKind::KanjiMeta,
        BankKind::Tag,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            BankKind::Term => "term_bank",
            BankKind::TermMeta => "term_meta_bank",
            BankKind::Kanji => "kanji_bank",
            BankKind::KanjiMeta => "kanji_meta_bank",
            BankKind::Tag => "tag_bank",
        }
    }

    /// File name of the bank at zero-based `index`; names are numbered from 1
    pub fn file_name(self, index: usize) -> String {
        format!("{}_{}.json", self.prefix(), index + 1)
    }
}

/// Row layout of term and kanji banks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowLayout {
    /// Fixed head followed by a variadic glossary/meanings tail
    Legacy,
    /// Fixed columns, optional trailing sequence/tags/stats
    Current,
}

impl RowLayout {
    pub fn for_version(version: i64) -> Self {
        if version == 1 {
            RowLayout::Legacy
        } else {
            RowLayout::Current
        }
    }
}

/// `[expression, reading, definitionTags, rules, score]`
#[derive(Debug, Deserialize)]
struct TermHead(
    String,
    String,
    #[serde(default)] Value,
    #[serde(default)] Value,
    #[serde(default)] Option<f64>,
);

/// `[expression, reading, definitionTags, rules, score, glossary, sequence, termTags]`
#[derive(Debug, Deserialize)]
struct CurrentTermRow(
    String,
    String,
    #[serde(default)] Value,
    #[serde(default)] Value,
    #[serde(default)] Option<f64>,
    #[serde(default)] Vec<Value>,
    #[serde(default)] Option<i64>,
    #[serde(default)] Value,
);

/// `[character, onyomi, kunyomi, tags]`
#[derive(Debug, Deserialize)]
struct KanjiHead(
    String,
    #[serde(default)] Value,
    #[serde(default)] Value,
    #[serde(default)] Value,
);

/// `[character, onyomi, kunyomi, tags, meanings, stats]`
#[derive(Debug, Deserialize)]
struct CurrentKanjiRow(
    String,
    #[serde(default)] Value,
    #[serde(default)] Value,
    #[serde(default)] Value,
    #[serde(default)] Vec<String>,
    #[serde(default)] Option<Map<String, Value>>,
);

/// `[key, mode, data]`, shared by term-meta and kanji-meta banks
#[derive(Debug, Deserialize)]
struct MetaRow(String, String, #[serde(default)] Value);

/// `[name, category, order, notes, score]`
#[derive(Debug, Deserialize)]
struct TagRow(
    String,
    #[serde(default)] Option<String>,
    #[serde(default)] Option<f64>,
    #[serde(default)] Option<String>,
    #[serde(default)] Option<f64>,
);

/// A decoded term bank row
#[derive(Debug)]
enum TermRow {
    Legacy {
        head: TermHead,
        glossary: Vec<Value>,
    },
    Current(CurrentTermRow),
}

/// A decoded kanji bank row
#[derive(Debug)]
enum KanjiRow {
    Legacy {
        head: KanjiHead,
        meanings: Vec<String>,
    },
    Current(CurrentKanjiRow),
}

/// Decode the first `arity` columns of `row` as `T`, ignoring extra columns
fn decode_columns<T: DeserializeOwned>(mut row: Vec<Value>, arity: usize) -> serde_json::Result<T> {
    row.truncate(arity);
    serde_json::from_value(Value::Array(row))
}

impl TermRow {
    const HEAD_ARITY: usize = 5;
    const CURRENT_ARITY: usize = 8;

    fn decode(layout: RowLayout, mut row: Vec<Value>) -> serde_json::Result<Self> {
        match layout {
            RowLayout::Legacy => {
                let glossary = if row.len() > Self::HEAD_ARITY {
                    row.split_off(Self::HEAD_ARITY)
                } else {
                    Vec::new()
                };
                Ok(TermRow::Legacy {
                    head: decode_columns(row, Self::HEAD_ARITY)?,
                    glossary,
                })
            }
            RowLayout::Current => Ok(TermRow::Current(decode_columns(row, Self::CURRENT_ARITY)?)),
        }
    }

    fn into_record(self, dictionary: &str) -> TermRecord {
        let (expression, reading, definition_tags, rules, score, glossary, sequence, term_tags) =
            match self {
                TermRow::Legacy {
                    head: TermHead(expression, reading, tags, rules, score),
                    glossary,
                } => (expression, reading, tags, rules, score, glossary, None, Value::Null),
                TermRow::Current(CurrentTermRow(
                    expression,
                    reading,
                    tags,
                    rules,
                    score,
                    glossary,
                    sequence,
                    term_tags,
                )) => (
                    expression, reading, tags, rules, score, glossary, sequence, term_tags,
                ),
            };

        TermRecord {
            expression,
            reading,
            definition_tags: split_value(Some(&definition_tags)),
            rules: split_value(Some(&rules)),
            score: score.unwrap_or(0.0),
            glossary,
            sequence: sequence.unwrap_or(-1),
            term_tags: split_value(Some(&term_tags)),
            dictionary: dictionary.to_string(),
        }
    }
}

impl KanjiRow {
    const HEAD_ARITY: usize = 4;
    const CURRENT_ARITY: usize = 6;

    fn decode(layout: RowLayout, mut row: Vec<Value>) -> serde_json::Result<Self> {
        match layout {
            RowLayout::Legacy => {
                let tail = if row.len() > Self::HEAD_ARITY {
                    row.split_off(Self::HEAD_ARITY)
                } else {
                    Vec::new()
                };
                Ok(KanjiRow::Legacy {
                    head: decode_columns(row, Self::HEAD_ARITY)?,
                    meanings: serde_json::from_value(Value::Array(tail))?,
                })
            }
            RowLayout::Current => Ok(KanjiRow::Current(decode_columns(row, Self::CURRENT_ARITY)?)),
        }
    }

    fn into_record(self, dictionary: &str) -> KanjiRecord {
        let (character, onyomi, kunyomi, tags, meanings, stats) = match self {
            KanjiRow::Legacy {
                head: KanjiHead(character, onyomi, kunyomi, tags),
                meanings,
            } => (character, onyomi, kunyomi, tags, meanings, None),
            KanjiRow::Current(CurrentKanjiRow(character, onyomi, kunyomi, tags, meanings, stats)) => {
                (character, onyomi, kunyomi, tags, meanings, stats)
            }
        };

        KanjiRecord {
            character,
            onyomi: split_value(Some(&onyomi)),
            kunyomi: split_value(Some(&kunyomi)),
            tags: split_value(Some(&tags)),
            meanings,
            stats,
            dictionary: dictionary.to_string(),
        }
    }
}

impl TagRow {
    fn into_record(self, dictionary: &str) -> TagRecord {
        let TagRow(name, category, order, notes, score) = self;
        TagRecord {
            name,
            category: category
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_TAG_CATEGORY.to_string()),
            order: order.unwrap_or(0.0),
            notes: notes.unwrap_or_default(),
            score: score.unwrap_or(0.0),
            dictionary: dictionary.to_string(),
        }
    }
}

/// The typed contents of one bank
#[derive(Debug)]
pub enum BankRecords {
    Terms(Vec<TermRecord>),
    TermMeta(Vec<TermMetaRecord>),
    Kanji(Vec<KanjiRecord>),
    KanjiMeta(Vec<KanjiMetaRecord>),
    Tags(Vec<TagRecord>),
}

impl BankRecords {
    pub(crate) fn len(&self) -> usize {
        match self {
            BankRecords::Terms(r) => r.len(),
            BankRecords::TermMeta(r) => r.len(),
            BankRecords::Kanji(r) => r.len(),
            BankRecords::KanjiMeta(r) => r.len(),
            BankRecords::Tags(r) => r.len(),
        }
    }
}

/// Decode every row of `file`, a bank of `kind`, into records of `dictionary`
pub fn decode_bank(
    kind: BankKind,
    layout: RowLayout,
    file: &str,
    content: &str,
    dictionary: &str,
) -> Result<BankRecords> {
    let rows: Vec<Value> = serde_json::from_str(content)
        .map_err(|e| KotobaError::invalid_bank(file, e))?;

    let mut raw_rows = Vec::with_capacity(rows.len());
    for (i, row) in rows.into_iter().enumerate() {
        match row {
            Value::Array(columns) => raw_rows.push(columns),
            other => {
                return Err(KotobaError::invalid_bank(
                    file,
                    format!("row {} is not an array: {}", i, other),
                ))
            }
        }
    }

    let row_error =
        |i: usize, e: serde_json::Error| KotobaError::invalid_bank(file, format!("row {}: {}", i, e));

    let records = match kind {
        BankKind::Term => BankRecords::Terms(
            raw_rows
                .into_iter()
                .enumerate()
                .map(|(i, row)| {
                    TermRow::decode(layout, row)
                        .map(|r| r.into_record(dictionary))
                        .map_err(|e| row_error(i, e))
                })
                .collect::<Result<_>>()?,
        ),
        BankKind::Kanji => BankRecords::Kanji(
            raw_rows
                .into_iter()
                .enumerate()
                .map(|(i, row)| {
                    KanjiRow::decode(layout, row)
                        .map(|r| r.into_record(dictionary))
                        .map_err(|e| row_error(i, e))
                })
                .collect::<Result<_>>()?,
        ),
        BankKind::TermMeta => BankRecords::TermMeta(
            raw_rows
                .into_iter()
                .enumerate()
                .map(|(i, row)| {
                    decode_columns::<MetaRow>(row, 3)
                        .map(|MetaRow(expression, mode, data)| TermMetaRecord {
                            expression,
                            mode,
                            data,
                            dictionary: dictionary.to_string(),
                        })
                        .map_err(|e| row_error(i, e))
                })
                .collect::<Result<_>>()?,
        ),
        BankKind::KanjiMeta => BankRecords::KanjiMeta(
            raw_rows
                .into_iter()
                .enumerate()
                .map(|(i, row)| {
                    decode_columns::<MetaRow>(row, 3)
                        .map(|MetaRow(character, mode, data)| KanjiMetaRecord {
                            character,
                            mode,
                            data,
                            dictionary: dictionary.to_string(),
                        })
                        .map_err(|e| row_error(i, e))
                })
                .collect::<Result<_>>()?,
        ),
        BankKind::Tag => BankRecords::Tags(
            raw_rows
                .into_iter()
                .enumerate()
                .map(|(i, row)| {
                    decode_columns::<TagRow>(row, 5)
                        .map(|r| r.into_record(dictionary))
                        .map_err(|e| row_error(i, e))
                })
                .collect::<Result<_>>()?,
        ),
    };

    Ok(records)
}
