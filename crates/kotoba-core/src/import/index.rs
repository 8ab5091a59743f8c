//! The `index.json` descriptor of a dictionary package

use crate::error::{KotobaError, Result};
use crate::model::{DictionarySummary, TagRecord, MAX_DICTIONARY_VERSION, MIN_DICTIONARY_VERSION};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

pub const INDEX_FILE: &str = "index.json";

/// Raw descriptor; every field is optional here and checked by [`DictionaryIndex::summary`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryIndex {
    pub title: Option<String>,
    /// Usually a string; some packages write a number
    pub revision: Option<Value>,
    pub sequenced: Option<bool>,
    /// Legacy name of `version`
    pub format: Option<i64>,
    pub version: Option<i64>,
    /// Inline tag table, name to definition
    pub tag_meta: Option<BTreeMap<String, InlineTag>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InlineTag {
    pub category: Option<String>,
    pub order: Option<f64>,
    pub notes: Option<String>,
    pub score: Option<f64>,
}

impl DictionaryIndex {
    pub fn parse(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| KotobaError::InvalidIndex {
            reason: e.to_string(),
        })
    }

    fn revision_string(&self) -> Option<String> {
        match &self.revision {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Package format version, `version` taking precedence over `format`
    pub fn format_version(&self) -> Option<i64> {
        self.version.or(self.format)
    }

    /// Validate the descriptor and build the summary to register
    pub fn summary(&self) -> Result<DictionarySummary> {
        let title = match self.title.as_deref() {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => {
                return Err(KotobaError::InvalidIndex {
                    reason: "missing title".to_string(),
                })
            }
        };
        let revision = self.revision_string().ok_or_else(|| KotobaError::InvalidIndex {
            reason: "missing revision".to_string(),
        })?;
        let version = self
            .format_version()
            .ok_or_else(|| KotobaError::InvalidIndex {
                reason: "missing format version".to_string(),
            })?;

        if !(MIN_DICTIONARY_VERSION..=MAX_DICTIONARY_VERSION).contains(&version) {
            return Err(KotobaError::UnsupportedVersion {
                version,
                min: MIN_DICTIONARY_VERSION,
                max: MAX_DICTIONARY_VERSION,
            });
        }

        Ok(DictionarySummary {
            title,
            revision,
            sequenced: self.sequenced.unwrap_or(false),
            version,
        })
    }

    /// The inline tag table as tag records, sanitized like tag bank rows
    pub fn inline_tags(&self, dictionary: &str) -> Option<Vec<TagRecord>> {
        let tags = self.tag_meta.as_ref()?;
        Some(
            tags.iter()
                .map(|(name, tag)| TagRecord {
                    name: name.clone(),
                    category: tag
                        .category
                        .clone()
                        .filter(|c| !c.is_empty())
                        .unwrap_or_else(|| super::banks::DEFAULT_TAG_CATEGORY.to_string()),
                    order: tag.order.unwrap_or(0.0),
                    notes: tag.notes.clone().unwrap_or_default(),
                    score: tag.score.unwrap_or(0.0),
                    dictionary: dictionary.to_string(),
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_preferred_over_format() {
        let index =
            DictionaryIndex::parse(r#"{"title":"t","revision":"r","format":1,"version":3}"#)
                .unwrap();
        assert_eq!(index.summary().unwrap().version, 3);

        let legacy = DictionaryIndex::parse(r#"{"title":"t","revision":"r","format":2}"#).unwrap();
        assert_eq!(legacy.summary().unwrap().version, 2);
    }

    #[test]
    fn test_missing_fields() {
        for content in [
            r#"{"revision":"r","version":3}"#,
            r#"{"title":"","revision":"r","version":3}"#,
            r#"{"title":"t","version":3}"#,
            r#"{"title":"t","revision":"r"}"#,
        ] {
            let err = DictionaryIndex::parse(content).unwrap().summary().unwrap_err();
            assert!(matches!(err, KotobaError::InvalidIndex { .. }), "{content}");
        }
    }

    #[test]
    fn test_version_bounds() {
        for version in [0, 4] {
            let index = DictionaryIndex {
                title: Some("t".to_string()),
                revision: Some(Value::String("r".to_string())),
                version: Some(version),
                ..Default::default()
            };
            assert!(matches!(
                index.summary(),
                Err(KotobaError::UnsupportedVersion { .. })
            ));
        }
    }

    #[test]
    fn test_numeric_revision_and_default_sequenced() {
        let index = DictionaryIndex::parse(r#"{"title":"t","revision":20190101,"version":3}"#)
            .unwrap();
        let summary = index.summary().unwrap();
        assert_eq!(summary.revision, "20190101");
        assert!(!summary.sequenced);
    }

    #[test]
    fn test_inline_tags_sanitized() {
        let index = DictionaryIndex::parse(
            r#"{"title":"t","revision":"r","version":3,
                "tagMeta":{"v5":{"category":"partOfSpeech","order":1,"notes":"Godan"},"n":{}}}"#,
        )
        .unwrap();
        let tags = index.inline_tags("t").unwrap();
        assert_eq!(tags.len(), 2);

        let n = tags.iter().find(|t| t.name == "n").unwrap();
        assert_eq!(n.category, "default");
        assert_eq!(n.notes, "");
        assert_eq!(n.score, 0.0);

        let v5 = tags.iter().find(|t| t.name == "v5").unwrap();
        assert_eq!(v5.order, 1.0);
        assert_eq!(v5.dictionary, "t");

        assert!(DictionaryIndex::default().inline_tags("t").is_none());
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(
            DictionaryIndex::parse("not json"),
            Err(KotobaError::InvalidIndex { .. })
        ));
    }
}
