mod find;
mod open;
mod schema;

use super::{Database, DATABASE_FILE};
use crate::config::{ScanStrategyConfig, StoreConfig};
use crate::model::{
    DictionarySummary, KanjiMetaRecord, KanjiRecord, TagRecord, TermMetaRecord, TermRecord,
};
use serde_json::json;
use std::collections::HashSet;
use tempfile::TempDir;

pub(super) fn open_db(dir: &TempDir) -> Database {
    open_db_with(dir, StoreConfig::default())
}

pub(super) fn open_db_with(dir: &TempDir, config: StoreConfig) -> Database {
    Database::open(dir.path().join(DATABASE_FILE), config).unwrap()
}

pub(super) fn config_with_strategy(strategy: ScanStrategyConfig) -> StoreConfig {
    StoreConfig {
        scan_strategy: strategy,
        ..StoreConfig::default()
    }
}

pub(super) fn titles(names: &[&str]) -> HashSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

pub(super) fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

pub(super) fn summary(title: &str) -> DictionarySummary {
    DictionarySummary {
        title: title.to_string(),
        revision: "test".to_string(),
        sequenced: true,
        version: 3,
    }
}

pub(super) fn term(dictionary: &str, expression: &str, reading: &str, sequence: i64) -> TermRecord {
    TermRecord {
        expression: expression.to_string(),
        reading: reading.to_string(),
        definition_tags: vec!["v5".to_string()],
        rules: vec!["v5".to_string()],
        score: 1.0,
        glossary: vec![json!(format!("{expression} gloss"))],
        sequence,
        term_tags: vec![],
        dictionary: dictionary.to_string(),
    }
}

pub(super) fn kanji(dictionary: &str, character: &str) -> KanjiRecord {
    KanjiRecord {
        character: character.to_string(),
        onyomi: vec!["ダ".to_string()],
        kunyomi: vec!["う.つ".to_string()],
        tags: vec!["jouyou".to_string()],
        meanings: vec!["strike".to_string()],
        stats: json!({"strokes": "5"}).as_object().cloned(),
        dictionary: dictionary.to_string(),
    }
}

pub(super) fn tag(dictionary: &str, name: &str, notes: &str) -> TagRecord {
    TagRecord {
        name: name.to_string(),
        category: "partOfSpeech".to_string(),
        order: 0.0,
        notes: notes.to_string(),
        score: 0.0,
        dictionary: dictionary.to_string(),
    }
}

/// Register `title` with a small, known record set:
/// terms 打つ/うつ (seq 1), 打ち込む/うちこむ (seq 2), うつ/うつ (seq 3),
/// one term_meta and kanji_meta row, kanji 打 and 込, and tag v5.
pub(super) fn seed_dictionary(db: &Database, title: &str) {
    db.register_dictionary(&summary(title)).unwrap();
    db.bulk_add(&[
        term(title, "打つ", "うつ", 1),
        term(title, "打ち込む", "うちこむ", 2),
        term(title, "うつ", "うつ", 3),
    ])
    .unwrap();
    db.bulk_add(&[TermMetaRecord {
        expression: "打つ".to_string(),
        mode: "freq".to_string(),
        data: json!(1),
        dictionary: title.to_string(),
    }])
    .unwrap();
    db.bulk_add(&[kanji(title, "打"), kanji(title, "込")]).unwrap();
    db.bulk_add(&[KanjiMetaRecord {
        character: "打".to_string(),
        mode: "freq".to_string(),
        data: json!(2),
        dictionary: title.to_string(),
    }])
    .unwrap();
    db.bulk_add(&[tag(title, "v5", "Godan verb")]).unwrap();
}
