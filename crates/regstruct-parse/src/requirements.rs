//! Keyword classification of sentences into obligations, rights and
//! time-bound requirements.

use regstruct_core::{Article, Requirement, TimeRequirement};
use regstruct_nlp::NlpCapability;
use tracing::debug;

use crate::config::ParseConfig;

/// Flags for one sentence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classification {
    pub is_obligation: bool,
    pub is_right: bool,
    pub is_time_requirement: bool,
}

impl Classification {
    /// Only obligations and rights are kept; time-bound alone is not enough.
    pub fn is_requirement(&self) -> bool {
        self.is_obligation || self.is_right
    }
}

/// Requirements extracted from one article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleRequirements {
    pub requirements: Vec<Requirement>,
    pub time_requirements: Vec<TimeRequirement>,
}

/// Classifies sentences by case-insensitive substring match against the
/// configured keyword sets.
#[derive(Debug, Clone, Copy)]
pub struct RequirementClassifier<'c> {
    config: &'c ParseConfig,
}

impl<'c> RequirementClassifier<'c> {
    pub fn new(config: &'c ParseConfig) -> Self {
        Self { config }
    }

    pub fn classify(&self, sentence: &str) -> Classification {
        let lower = sentence.to_lowercase();
        let any = |keywords: &[String]| keywords.iter().any(|k| lower.contains(k.as_str()));
        Classification {
            is_obligation: any(&self.config.obligation_keywords),
            is_right: any(&self.config.right_keywords),
            is_time_requirement: any(&self.config.time_keywords),
        }
    }

    /// Classify every sentence of every paragraph and subparagraph text.
    ///
    /// A sentence becomes a [`Requirement`] only when it is an obligation or a
    /// right; a [`TimeRequirement`] is added when such a sentence is also
    /// time-bound. Sentences that are only time-bound are dropped.
    pub fn extract(&self, article: &Article, nlp: &impl NlpCapability) -> ArticleRequirements {
        let mut out = ArticleRequirements::default();
        for paragraph in &article.paragraphs {
            let number = &paragraph.number.raw;
            self.extract_text(&mut out, nlp, &paragraph.text, number, None);
            for sub in &paragraph.subparagraphs {
                self.extract_text(&mut out, nlp, &sub.text, number, Some(&sub.letter.raw));
            }
        }
        debug!(
            article = %article.number,
            requirements = out.requirements.len(),
            time_requirements = out.time_requirements.len(),
            "classified requirements"
        );
        out
    }

    fn extract_text(
        &self,
        out: &mut ArticleRequirements,
        nlp: &impl NlpCapability,
        text: &str,
        paragraph: &str,
        subparagraph: Option<&str>,
    ) {
        for sentence in nlp.segment_sentences(text) {
            let sentence = sentence.trim();
            if sentence.is_empty() {
                continue;
            }
            let flags = self.classify(sentence);
            if !flags.is_requirement() {
                continue;
            }
            if flags.is_time_requirement {
                out.time_requirements.push(TimeRequirement {
                    paragraph: Some(paragraph.to_string()),
                    subparagraph: subparagraph.map(str::to_string),
                    text: sentence.to_string(),
                });
            }
            out.requirements.push(Requirement {
                paragraph: Some(paragraph.to_string()),
                subparagraph: subparagraph.map(str::to_string),
                text: sentence.to_string(),
                is_obligation: flags.is_obligation,
                is_right: flags.is_right,
                is_time_requirement: flags.is_time_requirement,
            });
        }
    }
}
