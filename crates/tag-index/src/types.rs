//! Tag index value type and key normalization.

use std::collections::HashMap;

/// Chat the index is scoped to.
pub type ChatId = i64;

/// Normalize text into a lookup key.
///
/// Lowercases, collapses runs of whitespace into one space and trims. Both
/// index construction and lookup go through this function.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Immutable mapping from normalized tag key to canonical tag title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagIndex {
    entries: HashMap<String, String>,
}

impl TagIndex {
    /// Build an index from canonical titles.
    ///
    /// Titles that normalize to nothing are skipped. When two titles share a
    /// key the first one is kept.
    pub fn from_titles<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut entries = HashMap::new();
        for title in titles {
            let title = title.into();
            let key = normalize(&title);
            if key.is_empty() {
                continue;
            }
            entries.entry(key).or_insert(title);
        }
        Self { entries }
    }

    /// Canonical title for `text`, exact match after normalization.
    pub fn get(&self, text: &str) -> Option<&str> {
        self.entries.get(&normalize(text)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical titles in the index, in no particular order.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }
}
