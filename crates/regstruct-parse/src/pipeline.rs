//! The end-to-end parse: raw text in, [`ParsedDocument`] out.

use std::path::Path;

use regstruct_core::{ParsedArticle, ParsedDocument};
use regstruct_nlp::NlpCapability;
use tracing::info;

use crate::actors::{extract_entities, identify_key_actors};
use crate::articles::extract_articles;
use crate::config::ParseConfig;
use crate::definitions::extract_definitions;
use crate::normalize::normalize_text;
use crate::recitals::extract_recitals;
use crate::references::extract_cross_references;
use crate::requirements::RequirementClassifier;
use crate::segment::{segment_chapters, segment_sections};
use crate::ParseError;

/// Runs every extraction stage over one document.
///
/// Stages share nothing but their explicit inputs and outputs; a `Parser`
/// holds only configuration and the NLP capability, so it can parse any
/// number of documents.
#[derive(Debug, Clone)]
pub struct Parser<N> {
    config: ParseConfig,
    nlp: N,
}

impl<N: NlpCapability> Parser<N> {
    pub fn new(config: ParseConfig, nlp: N) -> Self {
        Self {
            config: config.lowercased(),
            nlp,
        }
    }

    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Parse a UTF-8 text file. Fails before any parsing if the file is missing.
    pub fn parse_file(&self, path: &Path) -> Result<ParsedDocument, ParseError> {
        if !path.exists() {
            return Err(ParseError::SourceNotFound(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), bytes = raw.len(), "read source document");
        Ok(self.parse_text(&raw))
    }

    /// Parse page texts, joined with newlines in page order.
    pub fn parse_pages(&self, pages: &[String]) -> ParsedDocument {
        self.parse_text(&pages.join("\n"))
    }

    /// Parse raw document text. Never fails; irregular input yields sparse output.
    pub fn parse_text(&self, raw: &str) -> ParsedDocument {
        let text = normalize_text(raw);

        let recitals = extract_recitals(&text);
        let chapters = segment_chapters(&text);
        let sections = segment_sections(&text, &chapters);
        let articles = extract_articles(&text, &chapters, &sections);
        let definitions = extract_definitions(&articles, &self.config);

        let classifier = RequirementClassifier::new(&self.config);
        let articles: Vec<ParsedArticle> = articles
            .into_iter()
            .map(|article| {
                let extracted = classifier.extract(&article, &self.nlp);
                ParsedArticle {
                    cross_references: extract_cross_references(&article.number, &article.content),
                    requirements: extracted.requirements,
                    time_requirements: extracted.time_requirements,
                    entities: extract_entities(&article.content, &self.nlp, &self.config),
                    key_actors: identify_key_actors(&article.content, &self.nlp, &self.config),
                    article,
                }
            })
            .collect();

        let document = ParsedDocument {
            chapters,
            sections,
            recitals,
            articles,
            definitions,
        };
        info!(
            chapters = document.chapters.len(),
            sections = document.sections.len(),
            recitals = document.recitals.len(),
            articles = document.articles.len(),
            paragraphs = document.paragraph_count(),
            requirements = document.requirement_count(),
            definitions = document.definitions.len(),
            "parsed document"
        );
        document
    }
}

#[cfg(test)]
mod tests {
    use regstruct_core::ActorType;
    use regstruct_nlp::RuleBasedNlp;

    use super::*;

    const GDPR_EXCERPT: &str = "\
REGULATION (EU) 2016/679
Whereas:
(1) The protection of natural persons is a fundamental right.
(2) This Regulation respects all fundamental rights.
HAVE ADOPTED THIS REGULATION:
CHAPTER I
General provisions
Article 4 - Definitions
For the purposes of this Regulation:
1. 'personal data' means any information relating to an identified or identifiable natural person;
2. 'processing' means any operation performed on personal data;
CHAPTER II
Principles
Article 5 \u{2013} Principles relating to processing of personal data
1. Personal data shall be processed lawfully as referred to in Article 6(1). (a) fairly; (b) transparently.
2. The controller shall be responsible for compliance with Article 5.
Article 12 - Transparent information
1. The controller shall provide information to the data subject without undue delay.
2. The reply comes within one month.";

    fn parser() -> Parser<RuleBasedNlp> {
        Parser::new(ParseConfig::default(), RuleBasedNlp::new())
    }

    #[test]
    fn structure_of_excerpt() {
        let doc = parser().parse_text(GDPR_EXCERPT);
        assert_eq!(doc.recitals.len(), 2);
        let chapter_numbers: Vec<&str> = doc.chapters.iter().map(|c| c.number.as_str()).collect();
        assert_eq!(chapter_numbers, vec!["I", "II"]);
        assert_eq!(doc.chapters[1].title, "Principles");

        let numbers: Vec<&str> = doc.articles.iter().map(|a| a.article.number.as_str()).collect();
        assert_eq!(numbers, vec!["4", "5", "12"]);

        let art5 = &doc.article("5").unwrap().article;
        assert_eq!(art5.title, "Principles relating to processing of personal data");
        assert_eq!(doc.chapter_of(art5).map(|c| c.number.as_str()), Some("II"));
        assert_eq!(art5.paragraphs.len(), 2);
        let letters: Vec<&str> = art5.paragraphs[0]
            .subparagraphs
            .iter()
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!(letters, vec!["fairly;", "transparently."]);
    }

    #[test]
    fn definitions_and_references() {
        let doc = parser().parse_text(GDPR_EXCERPT);
        let pd = doc.definitions.get("personal data").unwrap();
        assert_eq!(pd.article, "4");
        assert_eq!(pd.paragraph, "1");
        assert!(doc.definitions.get("processing").is_some());

        let refs = &doc.article("5").unwrap().cross_references;
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].target_article, "6");
        assert_eq!(refs[0].target_paragraph.as_deref(), Some("1"));
    }

    #[test]
    fn requirements_and_actors() {
        let doc = parser().parse_text(GDPR_EXCERPT);
        let art12 = doc.article("12").unwrap();
        assert_eq!(art12.requirements.len(), 1);
        assert!(art12.requirements[0].is_time_requirement);
        assert_eq!(art12.time_requirements.len(), 1);
        // "within one month" alone is not a requirement.
        assert!(art12.requirements.iter().all(|r| !r.text.contains("within one month")));

        let actors: Vec<ActorType> = art12.key_actors.iter().map(|m| m.actor).collect();
        assert!(actors.contains(&ActorType::Controller));
        assert!(actors.contains(&ActorType::DataSubject));
    }

    #[test]
    fn uppercase_configured_keywords_still_match() {
        let config = ParseConfig {
            obligation_keywords: vec!["SHALL".into()],
            ..ParseConfig::default()
        };
        let doc = Parser::new(config, RuleBasedNlp::new())
            .parse_text("Article 1 - Duty\n1. The controller shall act.");
        let reqs = &doc.article("1").unwrap().requirements;
        assert_eq!(reqs.len(), 1);
        assert!(reqs[0].is_obligation);
    }

    #[test]
    fn pages_are_joined_with_newlines() {
        let pages = vec![
            "CHAPTER I General provisions\nArticle 1 - Subject matter".to_string(),
            "1. Text1.".to_string(),
        ];
        let doc = parser().parse_pages(&pages);
        assert_eq!(doc.articles.len(), 1);
        assert_eq!(doc.articles[0].article.paragraphs[0].text, "Text1.");
    }

    #[test]
    fn text_without_articles_is_empty_not_error() {
        let doc = parser().parse_text("Nothing structured here.");
        assert!(doc.articles.is_empty());
        assert!(doc.chapters.is_empty());
        assert!(doc.definitions.is_empty());
    }

    #[test]
    fn missing_file_fails_fast() {
        let err = parser()
            .parse_file(Path::new("/nonexistent/gdpr.txt"))
            .unwrap_err();
        assert!(matches!(err, ParseError::SourceNotFound(_)));
    }

    #[test]
    fn parse_file_reads_text() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("gdpr.txt");
        std::fs::write(&path, GDPR_EXCERPT).unwrap();
        let doc = parser().parse_file(&path).unwrap();
        assert_eq!(doc.articles.len(), 3);
    }
}
