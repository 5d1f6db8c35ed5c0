//! Deterministic rule-based sentence splitter and entity gazetteer.
//!
//! Good enough for regulatory prose: sentences end at `.`, `!` or `?`
//! followed by whitespace and an uppercase letter, digit, or opening
//! bracket/quote. Common abbreviations and bare list numbers ("2.") do not
//! end a sentence. Entities come from a small gazetteer of EU institutions
//! and places.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::{EntitySpan, NlpCapability};

/// Tokens that end in a period without ending the sentence (compared lowercase, period stripped).
const ABBREVIATIONS: &[&str] = &[
    "e.g", "i.e", "etc", "art", "arts", "no", "nos", "para", "cf", "vol", "p", "pp", "oj",
];

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ENTITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?:(?P<org>European Data Protection (?:Board|Supervisor)|European Parliament|Court of Justice(?: of the European Union)?|Council|Commission|Board)|(?P<gpe>European Union|Member States?|Union)|(?P<norp>European))\b",
    )
    .expect("valid regex")
});

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedNlp;

impl RuleBasedNlp {
    pub fn new() -> Self {
        Self
    }
}

impl NlpCapability for RuleBasedNlp {
    fn segment_sentences(&self, text: &str) -> Vec<String> {
        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut sentences = Vec::new();
        let mut start = 0usize;

        for (k, &(i, c)) in chars.iter().enumerate() {
            if !matches!(c, '.' | '!' | '?') {
                continue;
            }
            match chars.get(k + 1) {
                Some(&(_, next)) if next.is_whitespace() => {}
                _ => continue,
            }
            let following = chars[k + 1..]
                .iter()
                .map(|&(_, ch)| ch)
                .find(|ch| !ch.is_whitespace());
            match following {
                Some(f) if opens_sentence(f) => {}
                _ => continue,
            }
            if c == '.' && is_non_terminal(&text[start..i]) {
                continue;
            }

            let end = i + c.len_utf8();
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            start = end;
        }

        let rest = text[start..].trim();
        if !rest.is_empty() {
            sentences.push(rest.to_string());
        }
        trace!(count = sentences.len(), "segmented sentences");
        sentences
    }

    fn extract_entities(&self, text: &str) -> Vec<EntitySpan> {
        let mut spans = Vec::new();
        let mut chars_seen = 0usize;
        let mut bytes_seen = 0usize;

        for caps in ENTITY_PATTERN.captures_iter(text) {
            let (label, m) = if let Some(m) = caps.name("org") {
                ("ORG", m)
            } else if let Some(m) = caps.name("gpe") {
                ("GPE", m)
            } else if let Some(m) = caps.name("norp") {
                ("NORP", m)
            } else {
                continue;
            };

            chars_seen += text[bytes_seen..m.start()].chars().count();
            bytes_seen = m.start();
            let len = m.as_str().chars().count();

            spans.push(EntitySpan {
                text: m.as_str().to_string(),
                label: label.to_string(),
                start: chars_seen,
                end: chars_seen + len,
            });
        }
        spans
    }
}

fn opens_sentence(c: char) -> bool {
    c.is_uppercase() || c.is_ascii_digit() || matches!(c, '(' | '\'' | '"' | '‘' | '“')
}

/// Whether the period closing `before` belongs to an abbreviation or list number.
fn is_non_terminal(before: &str) -> bool {
    let trimmed = before.trim();
    let token = trimmed
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
        .trim_start_matches(['(', '"', '\'', '‘', '“']);
    if token.is_empty() {
        return false;
    }
    // A bare number opening the segment is a list marker ("2. The controller").
    if token == trimmed && token.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    let lower = token.to_lowercase();
    if ABBREVIATIONS.contains(&lower.as_str()) {
        return true;
    }
    // Single-letter initials.
    token.chars().count() == 1 && token.chars().all(char::is_alphabetic)
}
