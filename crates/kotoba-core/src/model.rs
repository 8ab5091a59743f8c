//! Record types persisted by the store and the entries returned by lookups

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Oldest dictionary package format the importer understands
pub const MIN_DICTIONARY_VERSION: i64 = 1;

/// Newest dictionary package format the importer understands
pub const MAX_DICTIONARY_VERSION: i64 = 3;

/// Registered dictionary, one per successful import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionarySummary {
    pub title: String,
    pub revision: String,
    pub sequenced: bool,
    pub version: i64,
}

/// Term record as written by the importer; the id is assigned on insert
#[derive(Debug, Clone, PartialEq)]
pub struct TermRecord {
    pub expression: String,
    pub reading: String,
    pub definition_tags: Vec<String>,
    pub rules: Vec<String>,
    pub score: f64,
    pub glossary: Vec<Value>,
    /// -1 when the bank row carries no sequence
    pub sequence: i64,
    pub term_tags: Vec<String>,
    pub dictionary: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TermMetaRecord {
    pub expression: String,
    pub mode: String,
    pub data: Value,
    pub dictionary: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KanjiRecord {
    pub character: String,
    pub onyomi: Vec<String>,
    pub kunyomi: Vec<String>,
    pub tags: Vec<String>,
    pub meanings: Vec<String>,
    pub stats: Option<Map<String, Value>>,
    pub dictionary: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KanjiMetaRecord {
    pub character: String,
    pub mode: String,
    pub data: Value,
    pub dictionary: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagRecord {
    pub name: String,
    pub category: String,
    pub order: f64,
    pub notes: String,
    pub score: f64,
    pub dictionary: String,
}

/// Term as returned by lookups.
///
/// `index` is the position of the matching key in a bulk query's input; point
/// lookups leave it unset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TermEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub id: i64,
    pub expression: String,
    pub reading: String,
    pub definition_tags: Vec<String>,
    pub term_tags: Vec<String>,
    pub rules: Vec<String>,
    pub glossary: Vec<Value>,
    pub score: f64,
    pub dictionary: String,
    pub sequence: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TermMetaEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub id: i64,
    pub expression: String,
    pub mode: String,
    pub data: Value,
    pub dictionary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KanjiEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub id: i64,
    pub character: String,
    pub onyomi: Vec<String>,
    pub kunyomi: Vec<String>,
    pub tags: Vec<String>,
    pub glossary: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<Map<String, Value>>,
    pub dictionary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KanjiMetaEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub id: i64,
    pub character: String,
    pub mode: String,
    pub data: Value,
    pub dictionary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagEntry {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub order: f64,
    pub notes: String,
    pub score: f64,
    pub dictionary: String,
}

/// Lookup results that carry a bulk query position
pub trait Indexed {
    fn set_index(&mut self, index: usize);
}

macro_rules! impl_indexed {
    ($($ty:ty),*) => {
        $(impl Indexed for $ty {
            fn set_index(&mut self, index: usize) {
                self.index = Some(index);
            }
        })*
    };
}

impl_indexed!(TermEntry, TermMetaEntry, KanjiEntry, KanjiMetaEntry);

/// Record counts for one dictionary, or for the whole store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordCounts {
    pub terms: u64,
    pub term_meta: u64,
    pub kanji: u64,
    pub kanji_meta: u64,
    pub tag_meta: u64,
}

impl RecordCounts {
    pub fn is_empty(&self) -> bool {
        *self == RecordCounts::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DictionaryCounts {
    /// One entry per requested title, in request order
    pub counts: Vec<RecordCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<RecordCounts>,
}
