//! Text cleanup applied before any structural scan.

use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ARTICLE_DASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Article (\d+) ?- ?").expect("valid regex"));

/// Normalise raw extracted text.
///
/// Fixes common OCR artifacts (`|` read for `I`, `l1` for `h`), folds
/// em/en dashes to `-`, collapses horizontal whitespace, drops blank lines and
/// rewrites article headers to the canonical `Article <n> - ` form. Line
/// breaks survive so that headers stay anchored at line starts.
pub fn normalize_text(raw: &str) -> String {
    let fixed = raw
        .replace('|', "I")
        .replace("l1", "h")
        .replace(['\u{2014}', '\u{2013}'], "-");

    let joined = fixed
        .lines()
        .map(collapse_whitespace)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    ARTICLE_DASH.replace_all(&joined, "Article $1 - ").into_owned()
}

/// Collapse every whitespace run to a single space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_spaces_and_drops_blank_lines() {
        let out = normalize_text("  CHAPTER   I \n\n\t General\tprovisions  \n");
        assert_eq!(out, "CHAPTER I\nGeneral provisions");
    }

    #[test]
    fn fixes_ocr_artifacts() {
        assert_eq!(normalize_text("CHAPTER |"), "CHAPTER I");
        assert_eq!(normalize_text("tl1e"), "the");
    }

    #[test]
    fn canonical_article_dash() {
        assert_eq!(normalize_text("Article 5 \u{2013}Principles"), "Article 5 - Principles");
        assert_eq!(normalize_text("Article 12-Transparent"), "Article 12 - Transparent");
    }

    #[test]
    fn article_mid_line_untouched() {
        assert_eq!(
            normalize_text("see Article 6 -like cases"),
            "see Article 6 -like cases"
        );
    }

    #[test]
    fn collapse_helper() {
        assert_eq!(collapse_whitespace(" a \n b\t c "), "a b c");
        assert_eq!(collapse_whitespace("   "), "");
    }
}
