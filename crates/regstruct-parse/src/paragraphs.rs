//! Recursive decomposition of an article body into numbered paragraphs,
//! lettered subparagraphs and roman-numeral sub-subparagraphs.
//!
//! Each level scans only its parent's own text. Markers are accepted in
//! sequence order (`1.` then `2.`; `(a)` then `(b)`; `(i)` then `(ii)`), and
//! only in positions where a list item can start, so citations such as
//! "Article 6." or "points (a) and (b)" stay in the running text. A marker
//! that is out of sequence is ordinary text for its level, which is how
//! `(i)` under `(h)` is read as a letter while `(i)` under `(a)` is read as a
//! roman numeral one level down.

use std::sync::LazyLock;

use regex::Regex;
use regstruct_core::ordinal::to_roman;
use regstruct_core::{Ordinal, Paragraph, Subparagraph, Subsubparagraph};
use tracing::trace;

use crate::normalize::collapse_whitespace;

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,3})\.(?:\s|$)").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static LETTERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([a-z])\)").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ROMAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([ivxlc]+)\)").expect("valid regex"));

/// An accepted list marker.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Marker {
    label: String,
    /// Offset of the marker itself.
    start: usize,
    /// Offset of the first byte after the marker.
    text_start: usize,
}

/// Split an article body (header stripped) into its paragraph tree.
///
/// If no numbered paragraph is found the whole body becomes paragraph "1"
/// with no subparagraphs, so every article has at least one paragraph.
pub fn decompose_paragraphs(body: &str) -> Vec<Paragraph> {
    let markers = numbered_markers(body);
    if markers.is_empty() {
        trace!("no numbered paragraphs, using whole body");
        return vec![Paragraph {
            number: Ordinal::arabic("1"),
            text: collapse_whitespace(body),
            subparagraphs: Vec::new(),
        }];
    }

    let (_, parts) = split_at(body, &markers);
    parts
        .into_iter()
        .map(|(marker, span)| decompose_paragraph(&marker.label, span))
        .collect()
}

/// Build one paragraph from its number and own text.
fn decompose_paragraph(number: &str, span: &str) -> Paragraph {
    let letters = sequenced_markers(span, &LETTERED, letter_label);
    let (head, parts) = split_at(span, &letters);
    let subparagraphs = parts
        .into_iter()
        .map(|(marker, sub)| decompose_subparagraph(&marker.label, sub))
        .collect();
    Paragraph {
        number: Ordinal::arabic(number),
        text: collapse_whitespace(head),
        subparagraphs,
    }
}

fn decompose_subparagraph(letter: &str, span: &str) -> Subparagraph {
    let numerals = sequenced_markers(span, &ROMAN, |n| Some(to_roman(n)));
    let (head, parts) = split_at(span, &numerals);
    let subsubparagraphs = parts
        .into_iter()
        .map(|(marker, text)| Subsubparagraph {
            number: Ordinal::roman(&marker.label),
            text: collapse_whitespace(text),
        })
        .collect();
    Subparagraph {
        letter: Ordinal::letter(letter),
        text: collapse_whitespace(head),
        subsubparagraphs,
    }
}

/// Split `text` into the part before the first marker and one span per marker.
fn split_at<'m, 't>(text: &'t str, markers: &'m [Marker]) -> (&'t str, Vec<(&'m Marker, &'t str)>) {
    let head_end = markers.first().map(|m| m.start).unwrap_or(text.len());
    let parts = markers
        .iter()
        .enumerate()
        .map(|(i, m)| {
            let end = markers.get(i + 1).map(|n| n.start).unwrap_or(text.len());
            (m, &text[m.text_start..end])
        })
        .collect();
    (&text[..head_end], parts)
}

fn letter_label(n: u32) -> Option<String> {
    (1..=26)
        .contains(&n)
        .then(|| char::from(b'a' + (n - 1) as u8).to_string())
}

/// Numbered markers `N.` in sequence from 1 at paragraph-opening positions.
fn numbered_markers(text: &str) -> Vec<Marker> {
    let mut expected = 1u32;
    let mut markers = Vec::new();
    for caps in NUMBERED.captures_iter(text) {
        let Some(digits) = caps.get(1) else { continue };
        if digits.as_str().parse::<u32>().ok() != Some(expected) {
            continue;
        }
        if !opens_paragraph(text, digits.start()) {
            continue;
        }
        markers.push(Marker {
            label: digits.as_str().to_string(),
            start: digits.start(),
            text_start: digits.end() + 1,
        });
        expected += 1;
    }
    markers
}

/// Parenthesised markers accepted in the order produced by `label`.
fn sequenced_markers(
    text: &str,
    pattern: &Regex,
    label: impl Fn(u32) -> Option<String>,
) -> Vec<Marker> {
    let mut n = 1u32;
    let mut markers = Vec::new();
    for caps in pattern.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let Some(expected) = label(n) else { break };
        if inner.as_str() != expected || !opens_item(text, whole.start()) {
            continue;
        }
        markers.push(Marker {
            label: expected,
            start: whole.start(),
            text_start: whole.end(),
        });
        n += 1;
    }
    markers
}

/// A numbered marker opens a paragraph at the body start, at a line start, or
/// after a sentence or clause terminator.
fn opens_paragraph(text: &str, at: usize) -> bool {
    let before = &text[..at];
    if before.trim().is_empty() {
        return true;
    }
    match before.chars().next_back() {
        Some('\n') => true,
        Some(c) if c.is_whitespace() => {
            matches!(before.trim_end().chars().next_back(), Some('.' | ':' | ';'))
        }
        _ => false,
    }
}

/// A parenthesised marker opens an item at the scope start or after
/// whitespace, unless it continues a citation ("point (a)", "points (a) and (b)").
fn opens_item(text: &str, at: usize) -> bool {
    let before = &text[..at];
    if before.trim().is_empty() {
        return true;
    }
    if !before.chars().next_back().is_some_and(char::is_whitespace) {
        return false;
    }
    let mut words = before.split_whitespace().rev();
    let last = words.next().unwrap_or("");
    let prior = words.next().unwrap_or("");
    let last_word = last
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_ascii_lowercase();
    if last_word == "point" || last_word == "points" || is_marker_token(last) {
        return false;
    }
    !(matches!(last_word.as_str(), "and" | "or" | "to") && is_marker_token(prior))
}

/// `(a)`, `(iv)`, optionally followed by a comma.
fn is_marker_token(token: &str) -> bool {
    let token = token.trim_end_matches(',');
    token
        .strip_prefix('(')
        .and_then(|t| t.strip_suffix(')'))
        .is_some_and(|inner| !inner.is_empty() && inner.chars().all(|c| c.is_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn texts(p: &Paragraph) -> Vec<(&str, &str)> {
        p.subparagraphs
            .iter()
            .map(|s| (s.letter.as_str(), s.text.as_str()))
            .collect()
    }

    #[test]
    fn head_text_and_lettered_subparagraphs() {
        let paras =
            decompose_paragraphs("1. Data shall be processed lawfully. (a) fairly; (b) transparently.");
        assert_eq!(paras.len(), 1);
        assert_eq!(paras[0].number.as_str(), "1");
        assert_eq!(paras[0].text, "Data shall be processed lawfully.");
        assert_eq!(texts(&paras[0]), vec![("a", "fairly;"), ("b", "transparently.")]);
    }

    #[test]
    fn paragraphs_on_separate_lines() {
        let paras = decompose_paragraphs("\n1. First rule.\n2. Second rule.\n3. Third rule.");
        let got: Vec<(&str, &str)> = paras
            .iter()
            .map(|p| (p.number.as_str(), p.text.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![("1", "First rule."), ("2", "Second rule."), ("3", "Third rule.")]
        );
    }

    #[test]
    fn citation_numbers_do_not_split() {
        let paras = decompose_paragraphs(
            "1. As referred to in Article 6. 2. The controller shall act in Article 2. of law.",
        );
        assert_eq!(paras.len(), 2);
        assert_eq!(paras[0].text, "As referred to in Article 6.");
        assert_eq!(paras[1].text, "The controller shall act in Article 2. of law.");
    }

    #[test]
    fn out_of_sequence_number_is_text() {
        let paras = decompose_paragraphs("1. Period of 3. months. 2. Next.");
        assert_eq!(paras.len(), 2);
        assert_eq!(paras[0].text, "Period of 3. months.");
    }

    #[test]
    fn fallback_single_paragraph() {
        let paras = decompose_paragraphs("\nThis Regulation applies to\n all processing.");
        assert_eq!(paras.len(), 1);
        assert_eq!(paras[0].number.as_str(), "1");
        assert_eq!(paras[0].text, "This Regulation applies to all processing.");
        assert!(paras[0].subparagraphs.is_empty());
    }

    #[test]
    fn fallback_keeps_lettered_markers_in_text() {
        let paras = decompose_paragraphs("Processing is lawful if: (a) consent; (b) contract.");
        assert_eq!(paras.len(), 1);
        assert!(paras[0].subparagraphs.is_empty());
        assert!(paras[0].text.contains("(a) consent"));
    }

    #[test]
    fn empty_body_still_has_a_paragraph() {
        let paras = decompose_paragraphs("");
        assert_eq!(paras.len(), 1);
        assert_eq!(paras[0].text, "");
    }

    #[test]
    fn roman_sub_subparagraphs() {
        let paras = decompose_paragraphs(
            "1. Member States may provide:\n(a) rules on:\n(i) consent;\n(ii) age;\n(b) other rules.",
        );
        let sub_a = &paras[0].subparagraphs[0];
        assert_eq!(sub_a.text, "rules on:");
        let romans: Vec<(&str, &str)> = sub_a
            .subsubparagraphs
            .iter()
            .map(|s| (s.number.as_str(), s.text.as_str()))
            .collect();
        assert_eq!(romans, vec![("i", "consent;"), ("ii", "age;")]);
        assert_eq!(paras[0].subparagraphs[1].text, "other rules.");
        assert!(paras[0].subparagraphs[1].subsubparagraphs.is_empty());
    }

    #[test]
    fn letter_i_after_h() {
        let body = "1. Items:\n(a) a;\n(b) b;\n(c) c;\n(d) d;\n(e) e;\n(f) f;\n(g) g;\n(h) h;\n(i) i-item.";
        let paras = decompose_paragraphs(body);
        let letters: Vec<&str> = paras[0]
            .subparagraphs
            .iter()
            .map(|s| s.letter.as_str())
            .collect();
        assert_eq!(letters, vec!["a", "b", "c", "d", "e", "f", "g", "h", "i"]);
        assert!(paras[0].subparagraphs[7].subsubparagraphs.is_empty());
        assert_eq!(paras[0].subparagraphs[8].text, "i-item.");
    }

    #[test]
    fn point_citations_stay_in_text() {
        let paras = decompose_paragraphs(
            "1. Intro: (a) the cases in points (a) and (b) of Article 9; (b) other cases.",
        );
        assert_eq!(
            texts(&paras[0]),
            vec![
                ("a", "the cases in points (a) and (b) of Article 9;"),
                ("b", "other cases."),
            ]
        );
    }

    #[test]
    fn marker_glued_to_word_is_not_an_item() {
        let paras = decompose_paragraphs("1. Under Article 6(a) nothing. (a) first.");
        assert_eq!(texts(&paras[0]), vec![("a", "first.")]);
        assert_eq!(paras[0].text, "Under Article 6(a) nothing.");
    }

    #[test]
    fn ordinals_carry_sort_keys() {
        let body = (1..=10)
            .map(|n| format!("{n}. Text {n}."))
            .collect::<Vec<_>>()
            .join("\n");
        let paras = decompose_paragraphs(&body);
        assert_eq!(paras.len(), 10);
        assert_eq!(paras[9].number.raw, "10");
        assert!(paras[1].number.sort_key < paras[9].number.sort_key);
    }
}
