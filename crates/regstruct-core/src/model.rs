//! Parse-side data model.
//!
//! A [`ParsedDocument`] is the immutable output of one parse run. Text offsets
//! (`start`, `end`, `offset`) refer to the normalised document text; only
//! literal text and ordering keys survive persistence.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::actor::ActorType;
use crate::definitions::DefinitionMap;
use crate::ordinal::Ordinal;

/// A `CHAPTER <roman>` grouping and its interval `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Roman numeral as written ("I", "IV").
    pub number: String,
    pub title: String,
    pub start: usize,
    pub end: usize,
}

/// A `Section <n>` grouping and its interval `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub number: String,
    pub title: String,
    pub start: usize,
    pub end: usize,
    /// Index into [`ParsedDocument::chapters`] of the first chapter containing the header.
    pub chapter: Option<usize>,
}

impl Chapter {
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl Section {
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// A numbered preamble recital.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recital {
    pub number: u32,
    pub content: String,
}

/// One article, from its header to the next article header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub number: String,
    pub title: String,
    /// Full article span, header included.
    pub content: String,
    /// Offset of the header in the normalised text.
    pub offset: usize,
    /// Index into [`ParsedDocument::chapters`].
    pub chapter: Option<usize>,
    /// Index into [`ParsedDocument::sections`].
    pub section: Option<usize>,
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub number: Ordinal,
    /// Text before the first subparagraph marker (or the whole paragraph).
    pub text: String,
    pub subparagraphs: Vec<Subparagraph>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subparagraph {
    pub letter: Ordinal,
    /// Text before the first sub-subparagraph marker.
    pub text: String,
    pub subsubparagraphs: Vec<Subsubparagraph>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subsubparagraph {
    pub number: Ordinal,
    pub text: String,
}

/// A directed citation from the owning article to another article.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CrossReference {
    pub target_article: String,
    pub target_paragraph: Option<String>,
}

/// A glossary term with provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    pub term: String,
    pub definition: String,
    pub article: String,
    pub paragraph: String,
    pub subparagraph: Option<String>,
}

/// A sentence classified as an obligation and/or a right.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub paragraph: Option<String>,
    pub subparagraph: Option<String>,
    pub text: String,
    pub is_obligation: bool,
    pub is_right: bool,
    pub is_time_requirement: bool,
}

/// Secondary record for a requirement that is also time-bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRequirement {
    pub paragraph: Option<String>,
    pub subparagraph: Option<String>,
    pub text: String,
}

/// A named entity reported by the NLP capability, offsets in characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
    pub start: usize,
    pub end: usize,
}

/// A sentence mentioning one of the key actor roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyActorMention {
    pub actor: ActorType,
    pub text: String,
}

/// An article together with everything extracted from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedArticle {
    pub article: Article,
    pub cross_references: Vec<CrossReference>,
    pub requirements: Vec<Requirement>,
    pub time_requirements: Vec<TimeRequirement>,
    pub entities: Vec<Entity>,
    pub key_actors: Vec<KeyActorMention>,
}

impl ParsedArticle {
    /// Wrap an article with no extraction results yet.
    pub fn bare(article: Article) -> Self {
        Self {
            article,
            cross_references: Vec::new(),
            requirements: Vec::new(),
            time_requirements: Vec::new(),
            entities: Vec::new(),
            key_actors: Vec::new(),
        }
    }
}

/// Output of one parse run; the input of a single store population pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDocument {
    pub chapters: Vec<Chapter>,
    pub sections: Vec<Section>,
    pub recitals: Vec<Recital>,
    pub articles: Vec<ParsedArticle>,
    pub definitions: DefinitionMap,
}

impl ParsedDocument {
    pub fn chapter_of(&self, article: &Article) -> Option<&Chapter> {
        article.chapter.and_then(|i| self.chapters.get(i))
    }

    pub fn section_of(&self, article: &Article) -> Option<&Section> {
        article.section.and_then(|i| self.sections.get(i))
    }

    pub fn article(&self, number: &str) -> Option<&ParsedArticle> {
        self.articles.iter().find(|a| a.article.number == number)
    }

    pub fn paragraph_count(&self) -> usize {
        self.articles.iter().map(|a| a.article.paragraphs.len()).sum()
    }

    pub fn requirement_count(&self) -> usize {
        self.articles.iter().map(|a| a.requirements.len()).sum()
    }
}
