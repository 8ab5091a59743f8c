//! Tag lookup with a per-title cache
//!
//! Cached answers include "no such tag", so a name missing from a dictionary
//! is only scanned once per title.

use super::rows::StoredRecord;
use super::Database;
use crate::error::Result;
use crate::log_resource_metrics;
use crate::model::TagEntry;
use std::collections::HashMap;

/// Tag answers keyed by dictionary title, then tag name
#[derive(Debug, Default)]
pub struct TagCache {
    by_title: HashMap<String, HashMap<String, Option<TagEntry>>>,
}

impl TagCache {
    /// `None` when nothing is cached; `Some(None)` for a cached miss
    pub fn get(&self, title: &str, name: &str) -> Option<&Option<TagEntry>> {
        self.by_title.get(title).and_then(|tags| tags.get(name))
    }

    pub fn insert(&mut self, title: &str, name: &str, tag: Option<TagEntry>) {
        self.by_title
            .entry(title.to_string())
            .or_default()
            .insert(name.to_string(), tag);
    }

    pub fn invalidate_title(&mut self, title: &str) {
        self.by_title.remove(title);
    }

    pub fn clear(&mut self) {
        self.by_title.clear();
    }

    /// Number of cached answers across all titles
    pub fn len(&self) -> usize {
        self.by_title.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Database {
    /// Tag `name` as defined by dictionary `title`.
    ///
    /// When the title defines the name more than once, the last stored
    /// definition is returned.
    pub fn find_tag_for_title(&self, name: &str, title: &str) -> Result<Option<TagEntry>> {
        let conn = self.conn()?;

        if let Some(cached) = self.tag_cache_lock()?.get(title, name) {
            self.tag_metrics.record_cache_hit();
            return Ok(cached.clone());
        }

        let mut stmt = conn.prepare_cached(&format!(
            "{} ORDER BY id",
            TagEntry::select_by("name")
        ))?;
        let mut rows = stmt.query([name])?;
        let mut found = None;
        while let Some(row) = rows.next()? {
            let tag = TagEntry::from_row(row)?;
            if tag.dictionary == title {
                found = Some(tag);
            }
        }

        self.tag_cache_lock()?.insert(title, name, found.clone());
        self.tag_metrics.record_cache_miss();
        log_resource_metrics!(self.tag_metrics, "find_tag_for_title");

        Ok(found)
    }

    /// Cached answer only, without touching storage.
    ///
    /// `Ok(None)` means nothing is cached for this pair.
    pub fn find_tag_for_title_cached(
        &self,
        name: &str,
        title: &str,
    ) -> Result<Option<Option<TagEntry>>> {
        self.conn()?;
        Ok(self.tag_cache_lock()?.get(title, name).cloned())
    }

    pub(crate) fn invalidate_tag_cache(&self, title: &str) -> Result<()> {
        self.tag_cache_lock()?.invalidate_title(title);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str, dictionary: &str) -> TagEntry {
        TagEntry {
            id: 1,
            name: name.to_string(),
            category: "partOfSpeech".to_string(),
            order: 0.0,
            notes: "verb".to_string(),
            score: 0.0,
            dictionary: dictionary.to_string(),
        }
    }

    #[test]
    fn test_cache_distinguishes_miss_from_unknown() {
        let mut cache = TagCache::default();
        assert!(cache.get("d", "v5").is_none());

        cache.insert("d", "v5", None);
        assert_eq!(cache.get("d", "v5"), Some(&None));

        cache.insert("d", "n", Some(tag("n", "d")));
        assert_eq!(cache.get("d", "n").cloned().flatten().unwrap().name, "n");
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_invalidate_title_keeps_other_titles() {
        let mut cache = TagCache::default();
        cache.insert("a", "n", Some(tag("n", "a")));
        cache.insert("b", "n", None);

        cache.invalidate_title("a");
        assert!(cache.get("a", "n").is_none());
        assert_eq!(cache.get("b", "n"), Some(&None));

        cache.clear();
        assert!(cache.is_empty());
    }
}
