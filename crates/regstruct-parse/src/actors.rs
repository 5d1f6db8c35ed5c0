//! Key-actor mentions and named entities for one article.

use regstruct_core::{ActorType, Entity, KeyActorMention};
use regstruct_nlp::NlpCapability;
use tracing::debug;

use crate::config::ParseConfig;

/// Sentences of `content` mentioning each actor type.
///
/// Sentences come from the NLP capability over the full article content and
/// are matched case-insensitively against the configured keywords. A sentence
/// yields at most one mention per actor type however many of that type's
/// keywords it contains. Output is grouped by actor type, then in sentence
/// order.
pub fn identify_key_actors(
    content: &str,
    nlp: &impl NlpCapability,
    config: &ParseConfig,
) -> Vec<KeyActorMention> {
    let lower = content.to_lowercase();
    let active: Vec<ActorType> = ActorType::ALL
        .into_iter()
        .filter(|actor| {
            config
                .keywords_for(*actor)
                .iter()
                .any(|k| lower.contains(k.as_str()))
        })
        .collect();
    if active.is_empty() {
        return Vec::new();
    }

    let sentences: Vec<(String, String)> = nlp
        .segment_sentences(content)
        .into_iter()
        .map(|s| {
            let trimmed = s.trim().to_string();
            (trimmed.to_lowercase(), trimmed)
        })
        .filter(|(_, s)| !s.is_empty())
        .collect();

    let mut mentions = Vec::new();
    for actor in active {
        let keywords = config.keywords_for(actor);
        for (lowered, sentence) in &sentences {
            if keywords.iter().any(|k| lowered.contains(k.as_str())) {
                mentions.push(KeyActorMention {
                    actor,
                    text: sentence.clone(),
                });
            }
        }
    }
    debug!(count = mentions.len(), "identified key actor mentions");
    mentions
}

/// Entities over the full article content, restricted to the configured labels.
pub fn extract_entities(
    content: &str,
    nlp: &impl NlpCapability,
    config: &ParseConfig,
) -> Vec<Entity> {
    nlp.extract_entities(content)
        .into_iter()
        .filter(|span| config.entity_labels.iter().any(|l| *l == span.label))
        .map(|span| Entity {
            text: span.text,
            label: span.label,
            start: span.start,
            end: span.end,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use regstruct_nlp::{EntitySpan, RuleBasedNlp};

    use super::*;

    struct FixedEntities;

    impl NlpCapability for FixedEntities {
        fn segment_sentences(&self, text: &str) -> Vec<String> {
            vec![text.to_string()]
        }

        fn extract_entities(&self, _text: &str) -> Vec<EntitySpan> {
            ["ORG", "DATE", "GPE", "CARDINAL"]
                .into_iter()
                .enumerate()
                .map(|(i, label)| EntitySpan {
                    text: format!("e{i}"),
                    label: label.to_string(),
                    start: i * 3,
                    end: i * 3 + 2,
                })
                .collect()
        }
    }

    #[test]
    fn one_mention_per_type_and_sentence() {
        let content = "The controller and the joint controller shall cooperate. The processor shall assist the Controller.";
        let mentions = identify_key_actors(content, &RuleBasedNlp::new(), &ParseConfig::default());
        let got: Vec<(ActorType, &str)> = mentions.iter().map(|m| (m.actor, m.text.as_str())).collect();
        assert_eq!(
            got,
            vec![
                (
                    ActorType::Controller,
                    "The controller and the joint controller shall cooperate."
                ),
                (ActorType::Controller, "The processor shall assist the Controller."),
                (ActorType::Processor, "The processor shall assist the Controller."),
            ]
        );
    }

    #[test]
    fn no_keywords_no_mentions() {
        let mentions =
            identify_key_actors("This Regulation lays down rules.", &RuleBasedNlp::new(), &ParseConfig::default());
        assert!(mentions.is_empty());
    }

    #[test]
    fn recipient_and_third_country() {
        let content = "Transfers to a third country require safeguards. The recipient is informed.";
        let mentions = identify_key_actors(content, &RuleBasedNlp::new(), &ParseConfig::default());
        let types: Vec<ActorType> = mentions.iter().map(|m| m.actor).collect();
        assert_eq!(types, vec![ActorType::ThirdParty, ActorType::Recipient]);
    }

    #[test]
    fn entity_labels_filtered() {
        let ents = extract_entities("ignored", &FixedEntities, &ParseConfig::default());
        let labels: Vec<&str> = ents.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["ORG", "GPE"]);
        assert_eq!(ents[1].start, 6);
    }
}
