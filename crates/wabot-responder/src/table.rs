//! Command and keyword tables.

use std::collections::HashMap;

use crate::template::ReplyTemplate;

/// Lowercase and trim a message body. This is the only key used for
/// classification.
pub fn normalize(body: &str) -> String {
    body.to_lowercase().trim().to_string()
}

/// Exact-match commands, keyed by normalized text.
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    entries: HashMap<String, ReplyTemplate>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a command. The key is normalized first; blank keys
    /// are ignored.
    pub fn insert(&mut self, key: &str, reply: impl Into<String>) {
        let key = normalize(key);
        if key.is_empty() {
            return;
        }
        self.entries.insert(key, ReplyTemplate::new(reply));
    }

    /// Look up an already-normalized string.
    pub fn get(&self, normalized: &str) -> Option<&ReplyTemplate> {
        self.entries.get(normalized)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Command keys in sorted order.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

/// A group of substrings that selects one reply.
///
/// Matching is plain substring containment, so short keywords also fire
/// inside longer words ("hi" matches "this"). Keep keyword lists curated.
#[derive(Debug, Clone)]
pub struct KeywordRule {
    keywords: Vec<String>,
    response: ReplyTemplate,
}

impl KeywordRule {
    /// Keywords are normalized; blank ones are dropped since they would
    /// match every message.
    pub fn new<I, S>(keywords: I, response: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| normalize(k.as_ref()))
            .filter(|k| !k.is_empty())
            .collect();
        Self {
            keywords,
            response: ReplyTemplate::new(response),
        }
    }

    /// Whether any keyword occurs in the normalized text.
    pub fn matches(&self, normalized: &str) -> bool {
        self.keywords.iter().any(|kw| normalized.contains(kw.as_str()))
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn response(&self) -> &ReplyTemplate {
        &self.response
    }
}
