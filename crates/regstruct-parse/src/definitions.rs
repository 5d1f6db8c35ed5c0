//! Glossary extraction from definition articles.

use std::sync::LazyLock;

use regex::Regex;
use regstruct_core::{Article, Definition, DefinitionMap};
use tracing::info;

use crate::config::ParseConfig;

/// Quoted-term phrasings, tried in this order for every text.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DEFINITION_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    ["means", "refers to", "shall mean"].map(|verb| {
        Regex::new(&format!(
            r#"(?i)['"‘’“”]([^'"‘’“”]+)['"‘’“”]\s+{}\s+(.+)"#,
            verb.replace(' ', r"\s+")
        ))
        .expect("valid regex")
    })
});

/// Whether `article` is scanned for definitions.
fn is_definition_article(article: &Article, config: &ParseConfig) -> bool {
    article.title.to_lowercase().contains("definition") || article.number == config.definition_article
}

/// Build the glossary from every definition article.
///
/// Paragraph texts and subparagraph texts are scanned with each pattern in
/// turn. Every match is inserted into the [`DefinitionMap`], so a term seen
/// again later replaces the earlier definition.
pub fn extract_definitions(articles: &[Article], config: &ParseConfig) -> DefinitionMap {
    let mut map = DefinitionMap::new();

    for article in articles.iter().filter(|a| is_definition_article(a, config)) {
        for paragraph in &article.paragraphs {
            collect(&mut map, &paragraph.text, |term, definition| Definition {
                term,
                definition,
                article: article.number.clone(),
                paragraph: paragraph.number.raw.clone(),
                subparagraph: None,
            });
            for sub in &paragraph.subparagraphs {
                collect(&mut map, &sub.text, |term, definition| Definition {
                    term,
                    definition,
                    article: article.number.clone(),
                    paragraph: paragraph.number.raw.clone(),
                    subparagraph: Some(sub.letter.raw.clone()),
                });
            }
        }
    }

    info!(count = map.len(), "extracted definitions");
    map
}

fn collect(map: &mut DefinitionMap, text: &str, build: impl Fn(String, String) -> Definition) {
    for pattern in DEFINITION_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            let (Some(term), Some(definition)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            map.insert(build(
                term.as_str().trim().to_string(),
                definition.as_str().trim().to_string(),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use regstruct_core::{Ordinal, Paragraph, Subparagraph};

    use super::*;

    fn article(number: &str, title: &str, paragraphs: Vec<Paragraph>) -> Article {
        Article {
            number: number.into(),
            title: title.into(),
            content: String::new(),
            offset: 0,
            chapter: None,
            section: None,
            paragraphs,
        }
    }

    fn paragraph(number: &str, text: &str, subs: &[(&str, &str)]) -> Paragraph {
        Paragraph {
            number: Ordinal::arabic(number),
            text: text.into(),
            subparagraphs: subs
                .iter()
                .map(|(letter, text)| Subparagraph {
                    letter: Ordinal::letter(letter),
                    text: (*text).into(),
                    subsubparagraphs: vec![],
                })
                .collect(),
        }
    }

    #[test]
    fn personal_data_in_article_four() {
        let articles = vec![article(
            "4",
            "Definitions",
            vec![paragraph(
                "1",
                "'personal data' means any information relating to an identifiable natural person",
                &[],
            )],
        )];
        let map = extract_definitions(&articles, &ParseConfig::default());
        let def = map.get("personal data").unwrap();
        assert_eq!(def.article, "4");
        assert_eq!(def.paragraph, "1");
        assert_eq!(def.subparagraph, None);
        assert_eq!(
            def.definition,
            "any information relating to an identifiable natural person"
        );
    }

    #[test]
    fn only_definition_articles_are_scanned() {
        let articles = vec![
            article("5", "Principles", vec![paragraph("1", "'data' means things", &[])]),
            article(
                "26",
                "Definitions of joint roles",
                vec![paragraph("1", "\u{2018}joint controller\u{2019} refers to two controllers", &[])],
            ),
        ];
        let map = extract_definitions(&articles, &ParseConfig::default());
        assert!(map.get("data").is_none());
        assert_eq!(map.get("joint controller").unwrap().article, "26");
    }

    #[test]
    fn subparagraph_provenance() {
        let articles = vec![article(
            "4",
            "Definitions",
            vec![paragraph(
                "1",
                "For the purposes of this Regulation:",
                &[("a", "\"processing\" shall mean any operation")],
            )],
        )];
        let map = extract_definitions(&articles, &ParseConfig::default());
        let def = map.get("processing").unwrap();
        assert_eq!(def.subparagraph.as_deref(), Some("a"));
        assert_eq!(def.definition, "any operation");
    }

    #[test]
    fn later_occurrence_wins() {
        let articles = vec![article(
            "4",
            "Definitions",
            vec![
                paragraph("1", "'consent' means first wording", &[]),
                paragraph("2", "'recipient' means a body", &[]),
                paragraph("3", "'consent' MEANS second wording", &[]),
            ],
        )];
        let map = extract_definitions(&articles, &ParseConfig::default());
        assert_eq!(map.len(), 2);
        let consent = map.get("consent").unwrap();
        assert_eq!(consent.definition, "second wording");
        assert_eq!(consent.paragraph, "3");
        let terms: Vec<&str> = map.iter().map(|d| d.term.as_str()).collect();
        assert_eq!(terms, vec!["consent", "recipient"]);
    }

    #[test]
    fn configured_article_number() {
        let config = ParseConfig {
            definition_article: "2".into(),
            ..ParseConfig::default()
        };
        let articles = vec![
            article("2", "Scope", vec![paragraph("1", "'scope' means reach", &[])]),
            article("4", "Other", vec![paragraph("1", "'x' means y", &[])]),
        ];
        let map = extract_definitions(&articles, &config);
        assert!(map.get("scope").is_some());
        assert!(map.get("x").is_none());
    }
}
