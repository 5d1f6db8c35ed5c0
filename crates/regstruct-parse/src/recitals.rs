//! Preamble recitals `(1)`, `(2)`, ... preceding the enacting formula.

use std::sync::LazyLock;

use regex::Regex;
use regstruct_core::Recital;
use tracing::info;

use crate::normalize::collapse_whitespace;

/// The enacting formula closing the preamble.
pub const ADOPTION_MARKER: &str = "HAVE ADOPTED THIS REGULATION";

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static RECITAL_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d{1,4})\)").expect("valid regex"));

/// Extract recitals from the preamble.
///
/// Only text before [`ADOPTION_MARKER`] is considered; without the marker
/// there is no preamble and the result is empty. Markers are accepted in
/// sequence from 1 and must start the text or follow whitespace, so
/// citations like "Regulation (EU) 2016/679" or "Article 6(1)" stay inside
/// the recital text. Each recital runs to the next accepted marker or the
/// end of the preamble.
pub fn extract_recitals(text: &str) -> Vec<Recital> {
    let Some(end) = text.find(ADOPTION_MARKER) else {
        return Vec::new();
    };
    let preamble = &text[..end];

    let mut expected = 1u32;
    let mut markers: Vec<(u32, usize, usize)> = Vec::new();
    for caps in RECITAL_MARKER.captures_iter(preamble) {
        let (Some(whole), Some(digits)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if digits.as_str().parse::<u32>().ok() != Some(expected) {
            continue;
        }
        let at_boundary = preamble[..whole.start()]
            .chars()
            .next_back()
            .is_none_or(char::is_whitespace);
        if !at_boundary {
            continue;
        }
        markers.push((expected, whole.start(), whole.end()));
        expected += 1;
    }

    let recitals: Vec<Recital> = markers
        .iter()
        .enumerate()
        .map(|(i, &(number, _, text_start))| {
            let stop = markers.get(i + 1).map(|m| m.1).unwrap_or(preamble.len());
            Recital {
                number,
                content: collapse_whitespace(&preamble[text_start..stop]),
            }
        })
        .collect();

    info!(count = recitals.len(), "extracted recitals");
    recitals
}
