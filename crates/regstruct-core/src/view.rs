//! Read-side views reconstructed from the relational store.
//!
//! These mirror the nested document shape: one [`ArticleView`] per article,
//! with paragraphs → subparagraphs → sub-subparagraphs, and the whole-store
//! [`ExportDocument`]. Row identifiers are not carried, so two
//! reconstructions of the same data compare equal.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Title used in export metadata.
pub const DEFAULT_DOCUMENT_TITLE: &str = "General Data Protection Regulation (GDPR)";

/// Chapter or section heading attached to an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingView {
    pub number: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleView {
    pub number: String,
    pub title: String,
    pub content: String,
    pub chapter: Option<HeadingView>,
    pub section: Option<HeadingView>,
    pub paragraphs: Vec<ParagraphView>,
    pub requirements: Vec<RequirementView>,
    pub entities: Vec<EntityView>,
    pub cross_references: Vec<ReferenceView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphView {
    pub number: String,
    pub text: String,
    pub subparagraphs: Vec<SubparagraphView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubparagraphView {
    pub letter: String,
    pub text: String,
    pub subsubparagraphs: Vec<SubsubparagraphView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsubparagraphView {
    pub number: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementView {
    pub text: String,
    pub is_obligation: bool,
    pub is_right: bool,
    pub is_time_requirement: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityView {
    pub text: String,
    pub label: String,
    pub start: Option<i64>,
    pub end: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceView {
    pub article: String,
    pub paragraph: Option<String>,
}

/// One article matching a keyword search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub article: String,
    pub title: String,
    pub matches: Vec<ParagraphMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphMatch {
    pub paragraph: String,
    pub snippet: String,
}

/// A requirement attributed to a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRequirement {
    pub article: String,
    pub article_title: String,
    pub text: String,
    pub is_obligation: bool,
    pub is_right: bool,
    pub is_time_requirement: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecitalView {
    pub number: i64,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionView {
    pub term: String,
    pub definition: String,
    pub article: Option<String>,
    pub paragraph: Option<String>,
    pub subparagraph: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorMentionView {
    pub article: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRequirementView {
    pub article: String,
    pub paragraph: Option<String>,
    pub subparagraph: Option<String>,
    pub text: String,
}

/// A fixed privacy-policy information item and the articles requiring it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicySection {
    pub section_name: String,
    pub description: String,
    pub related_articles: String,
    pub required_information: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub title: String,
    /// RFC 3339 timestamp.
    pub exported_at: String,
}

/// The whole store as one nested document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDocument {
    pub metadata: ExportMetadata,
    pub chapters: Vec<HeadingView>,
    pub recitals: Vec<RecitalView>,
    pub articles: Vec<ArticleView>,
    pub definitions: Vec<DefinitionView>,
    /// Mentions grouped by actor type name.
    pub key_actors: BTreeMap<String, Vec<ActorMentionView>>,
    pub time_requirements: Vec<TimeRequirementView>,
}

impl ExportDocument {
    pub fn article(&self, number: &str) -> Option<&ArticleView> {
        self.articles.iter().find(|a| a.number == number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_document_has_expected_top_level_keys() {
        let doc = ExportDocument {
            metadata: ExportMetadata {
                title: DEFAULT_DOCUMENT_TITLE.into(),
                exported_at: "2026-01-01T00:00:00Z".into(),
            },
            chapters: vec![],
            recitals: vec![],
            articles: vec![],
            definitions: vec![],
            key_actors: BTreeMap::new(),
            time_requirements: vec![],
        };
        let value = serde_json::to_value(&doc).unwrap();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(|k| k.as_str())
            .collect();
        for key in [
            "metadata",
            "chapters",
            "recitals",
            "articles",
            "definitions",
            "key_actors",
            "time_requirements",
        ] {
            assert!(keys.contains(&key), "missing {key}");
        }
    }
}
