use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::defaults::*;

/// Reply table configuration.
///
/// The built-in command and keyword tables are used unless
/// `builtin_tables = false`. Entries under `[responder.commands]` are merged
/// over the built-in commands; a non-empty `[[responder.keywords]]` list
/// replaces the built-in keyword rules wholesale, since their order matters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponderConfig {
    #[serde(default = "default_true")]
    pub builtin_tables: bool,
    #[serde(default)]
    pub commands: BTreeMap<String, String>,
    #[serde(default)]
    pub keywords: Vec<KeywordRuleConfig>,
    /// Probability of answering a message that matched nothing.
    #[serde(default = "default_fallback_rate")]
    pub fallback_rate: f64,
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            builtin_tables: true,
            commands: BTreeMap::new(),
            keywords: Vec::new(),
            fallback_rate: default_fallback_rate(),
            fallback_message: default_fallback_message(),
        }
    }
}

/// One keyword rule as written in config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRuleConfig {
    pub keywords: Vec<String>,
    pub response: String,
}
