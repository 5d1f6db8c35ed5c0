//! Article-to-article citations found in running text.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use regstruct_core::CrossReference;

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Article\s+(\d+)(?:\s*\(\s*(\d+)\s*\))?").expect("valid regex")
});

/// Collect the outgoing references of article `source` from its content.
///
/// `Article N` optionally followed by `(P)` yields an edge to article N,
/// paragraph P. Self-references are dropped, and each (article, paragraph)
/// pair is emitted once, in first-seen order.
pub fn extract_cross_references(source: &str, content: &str) -> Vec<CrossReference> {
    let mut seen = HashSet::new();
    REFERENCE
        .captures_iter(content)
        .filter_map(|caps| {
            let target_article = caps.get(1)?.as_str().to_string();
            if target_article == source {
                return None;
            }
            let reference = CrossReference {
                target_article,
                target_paragraph: caps.get(2).map(|m| m.as_str().to_string()),
            };
            seen.insert(reference.clone()).then_some(reference)
        })
        .collect()
}
