//! Ordinal keys for numbered provisions.
//!
//! Every numbered level of an article (paragraph "10", letter "b", roman "iv")
//! is carried as an [`Ordinal`]: the literal text as it appears in the source,
//! plus a normalised sort key. The store keeps both, and [`OrdinalOrder`]
//! decides which one `ORDER BY` uses.
//!
//! # Ordering policies
//!
//! - [`OrdinalOrder::Lexicographic`] orders by the raw text. Paragraph "10"
//!   sorts before "2" and roman "ix" before "v". This is the reference
//!   behaviour and the default.
//! - [`OrdinalOrder::Natural`] orders by the sort key, which recovers
//!   document order for arabic, letter, and roman numbering.

use serde::{Deserialize, Serialize};

/// Which numbering scheme an ordinal belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrdinalKind {
    /// Paragraph and article numbers: "1", "10".
    Arabic,
    /// Subparagraph letters: "a", "b".
    Letter,
    /// Sub-subparagraph numerals: "i", "ii", "iv".
    Roman,
}

/// Raw ordinal text paired with its normalised sort key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ordinal {
    pub raw: String,
    pub sort_key: String,
}

impl Ordinal {
    pub fn new(kind: OrdinalKind, raw: &str) -> Self {
        let raw = raw.trim().to_string();
        let sort_key = match kind {
            OrdinalKind::Arabic => number_key(&raw),
            OrdinalKind::Letter => letter_key(&raw),
            OrdinalKind::Roman => roman_key(&raw),
        };
        Self { raw, sort_key }
    }

    pub fn arabic(raw: &str) -> Self {
        Self::new(OrdinalKind::Arabic, raw)
    }

    pub fn letter(raw: &str) -> Self {
        Self::new(OrdinalKind::Letter, raw)
    }

    pub fn roman(raw: &str) -> Self {
        Self::new(OrdinalKind::Roman, raw)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl std::fmt::Display for Ordinal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Ordering policy for reconstructed trees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrdinalOrder {
    /// Order by the literal text ("10" < "2").
    #[default]
    Lexicographic,
    /// Order by the normalised sort key ("2" < "10", "iv" < "v").
    Natural,
}

impl OrdinalOrder {
    /// Column to order by, given the name of the raw-text column.
    pub fn column<'a>(&self, raw_column: &'a str) -> &'a str {
        match self {
            Self::Lexicographic => raw_column,
            Self::Natural => "sort_key",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lexicographic => "lexicographic",
            Self::Natural => "natural",
        }
    }
}

/// Zero-padded key for an article or paragraph number ("2" → "000002").
/// Anything that is not a plain number keeps its text after all numbers.
pub fn number_key(s: &str) -> String {
    let s = s.trim();
    match s.parse::<u64>() {
        Ok(n) if s.bytes().all(|b| b.is_ascii_digit()) => format!("{n:06}"),
        _ => format!("~{s}"),
    }
}

/// Letters sort by length first, so "z" < "aa" if double letters ever appear.
fn letter_key(s: &str) -> String {
    let lower = s.to_ascii_lowercase();
    format!("{:02}.{}", lower.len(), lower)
}

/// Roman numerals sort by value; unparseable input keeps its text after all numerals.
fn roman_key(s: &str) -> String {
    match roman_value(s) {
        Some(v) => format!("{v:04}"),
        None => format!("~{}", s.to_ascii_lowercase()),
    }
}

/// Parse a lowercase or uppercase roman numeral ("iv" → 4).
///
/// Returns `None` for empty input or characters outside `ivxlcdm`.
pub fn roman_value(s: &str) -> Option<u32> {
    if s.is_empty() {
        return None;
    }
    let mut total = 0u32;
    let mut prev = 0u32;
    for c in s.chars().rev() {
        let v = match c.to_ascii_lowercase() {
            'i' => 1,
            'v' => 5,
            'x' => 10,
            'l' => 50,
            'c' => 100,
            'd' => 500,
            'm' => 1000,
            _ => return None,
        };
        if v < prev {
            total = total.checked_sub(v)?;
        } else {
            total += v;
            prev = v;
        }
    }
    Some(total)
}

/// Render a number as a lowercase roman numeral (4 → "iv").
pub fn to_roman(mut n: u32) -> String {
    const TABLE: &[(u32, &str)] = &[
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut out = String::new();
    for &(value, numeral) in TABLE {
        while n >= value {
            out.push_str(numeral);
            n -= value;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: assert a list of ordinals produces sort keys in strictly ascending order.
    fn assert_sorted_order(kind: OrdinalKind, inputs: &[&str]) {
        let keys: Vec<String> = inputs
            .iter()
            .map(|s| Ordinal::new(kind, s).sort_key)
            .collect();
        for i in 1..keys.len() {
            assert!(
                keys[i - 1] < keys[i],
                "Expected {:?} ({}) < {:?} ({})",
                inputs[i - 1],
                keys[i - 1],
                inputs[i],
                keys[i],
            );
        }
    }

    #[test]
    fn plain_numeric_sequence() {
        assert_sorted_order(OrdinalKind::Arabic, &["1", "2", "3", "9", "10", "11", "100"]);
    }

    #[test]
    fn padding_covers_three_digit_numbers() {
        assert_sorted_order(OrdinalKind::Arabic, &["9", "99", "100", "999"]);
    }

    #[test]
    fn letters_in_alphabet_order() {
        assert_sorted_order(OrdinalKind::Letter, &["a", "b", "h", "i", "z"]);
    }

    #[test]
    fn roman_numerals_by_value() {
        assert_sorted_order(
            OrdinalKind::Roman,
            &["i", "ii", "iii", "iv", "v", "vi", "ix", "x", "xi"],
        );
    }

    #[test]
    fn raw_text_order_differs_from_natural() {
        // The lexicographic policy really does put "10" before "2".
        let ten = Ordinal::arabic("10");
        let two = Ordinal::arabic("2");
        assert!(ten.raw < two.raw);
        assert!(two.sort_key < ten.sort_key);

        let ix = Ordinal::roman("ix");
        let v = Ordinal::roman("v");
        assert!(ix.raw < v.raw);
        assert!(v.sort_key < ix.sort_key);
    }

    #[test]
    fn exact_values() {
        assert_eq!(number_key("3"), "000003");
        assert_eq!(number_key("99"), "000099");
        assert_eq!(number_key(" 7 "), "000007");
        assert_eq!(number_key("+7"), "~+7");
        assert_eq!(number_key(""), "~");
        assert_eq!(Ordinal::arabic("12").sort_key, "000012");
        assert_eq!(Ordinal::letter("b").sort_key, "01.b");
        assert_eq!(Ordinal::roman("iv").sort_key, "0004");
    }

    #[test]
    fn whitespace_trimmed() {
        assert_eq!(Ordinal::arabic("  12 ").raw, "12");
    }

    #[test]
    fn roman_round_trip_values() {
        assert_eq!(roman_value("iv"), Some(4));
        assert_eq!(roman_value("XIV"), Some(14));
        assert_eq!(roman_value("q"), None);
        assert_eq!(to_roman(4), "iv");
        assert_eq!(to_roman(19), "xix");
        assert_eq!(to_roman(0), "");
    }

    #[test]
    fn unparseable_roman_sorts_last() {
        assert!(Ordinal::roman("xc").sort_key < Ordinal::roman("??").sort_key);
    }

    #[test]
    fn order_column_selection() {
        assert_eq!(OrdinalOrder::Lexicographic.column("number"), "number");
        assert_eq!(OrdinalOrder::Natural.column("letter"), "sort_key");
        assert_eq!(OrdinalOrder::default(), OrdinalOrder::Lexicographic);
    }
}
