//! Keyword sets and label filters used by the extraction stages.

use std::collections::BTreeMap;
use std::path::Path;

use regstruct_core::ActorType;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ParseError;

const OBLIGATION_KEYWORDS: &[&str] = &[
    "shall",
    "must",
    "required",
    "ensure",
    "necessary",
    "obligation",
    "right",
    "responsibility",
    "liable",
    "accountable",
    "duty",
    "comply",
];

const RIGHT_KEYWORDS: &[&str] = &["right to", "entitled to", "freedom of", "liberty to"];

const TIME_KEYWORDS: &[&str] = &[
    "within",
    "days",
    "months",
    "years",
    "period",
    "delay",
    "without undue delay",
    "immediately",
    "promptly",
    "no later than",
];

const ENTITY_LABELS: &[&str] = &["ORG", "PERSON", "GPE", "LOC", "NORP"];

/// Parser configuration.
///
/// Every field has a default; a JSON file only needs the fields it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Lowercase substrings marking a sentence as an obligation.
    pub obligation_keywords: Vec<String>,
    /// Lowercase substrings marking a sentence as a right.
    pub right_keywords: Vec<String>,
    /// Lowercase substrings marking a sentence as time-bound.
    pub time_keywords: Vec<String>,
    /// Lowercase substrings signalling each actor type.
    pub actor_keywords: BTreeMap<ActorType, Vec<String>>,
    /// Entity labels kept from the NLP capability.
    pub entity_labels: Vec<String>,
    /// Article number always scanned for definitions, besides titles containing "definition".
    pub definition_article: String,
}

impl Default for ParseConfig {
    fn default() -> Self {
        let owned = |words: &[&str]| words.iter().map(|w| w.to_string()).collect::<Vec<_>>();
        Self {
            obligation_keywords: owned(OBLIGATION_KEYWORDS),
            right_keywords: owned(RIGHT_KEYWORDS),
            time_keywords: owned(TIME_KEYWORDS),
            actor_keywords: ActorType::ALL
                .into_iter()
                .map(|a| (a, owned(a.default_keywords())))
                .collect(),
            entity_labels: owned(ENTITY_LABELS),
            definition_article: "4".to_string(),
        }
    }
}

impl ParseConfig {
    /// Load a configuration from a JSON file, defaulting absent fields.
    pub fn from_json_file(path: &Path) -> Result<Self, ParseError> {
        if !path.exists() {
            return Err(ParseError::SourceNotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&raw)?;
        info!(path = %path.display(), "loaded parser configuration");
        Ok(config)
    }

    /// Parse a configuration from JSON, defaulting absent fields and
    /// lowercasing every keyword.
    pub fn from_json_str(raw: &str) -> Result<Self, ParseError> {
        let config: Self = serde_json::from_str(raw)?;
        Ok(config.lowercased())
    }

    /// Lowercase every keyword list. Matching runs against lowercased
    /// sentences, so keywords must be lowercase too.
    pub fn lowercased(mut self) -> Self {
        let lower = |words: &mut Vec<String>| {
            for w in words.iter_mut() {
                *w = w.to_lowercase();
            }
        };
        lower(&mut self.obligation_keywords);
        lower(&mut self.right_keywords);
        lower(&mut self.time_keywords);
        self.actor_keywords.values_mut().for_each(lower);
        self
    }

    /// Keywords for `actor`, in configured order. Missing entries mean no keywords.
    pub fn keywords_for(&self, actor: ActorType) -> &[String] {
        self.actor_keywords
            .get(&actor)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
