//! Chapter and section segmentation, plus the header scanner shared with
//! article extraction.

use std::sync::LazyLock;

use regex::Regex;
use regstruct_core::{Chapter, Section};
use tracing::info;

use crate::interval::IntervalIndex;

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub(crate) static CHAPTER_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^CHAPTER[ ]+([IVXLC]+)\b[ ]*(.*)$").expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub(crate) static SECTION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Section[ ]+(\d+)\b[ :]*(.*)$").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
pub(crate) static ARTICLE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^Article[ ]+(\d+)[ ]*(?:-[ ]*(.*))?$").expect("valid regex")
});

/// Lines that open structure rather than continue a header title.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static STRUCTURAL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d{1,3}\.(?:\s|$)|\(|Article\s+\d|CHAPTER\s+[IVXLC]|Section\s+\d)")
        .expect("valid regex")
});

/// One header match with its title resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Header {
    pub number: String,
    pub title: String,
    /// Offset of the header line.
    pub start: usize,
    /// Offset just past the header line, or past the title line when the
    /// title was taken from the following line.
    pub body_start: usize,
}

/// Scan `text` for every match of a header pattern, in document order.
///
/// The pattern's first group is the number and its optional second group the
/// inline title. A header line without a title borrows the next line unless
/// that line itself opens structure.
pub(crate) fn scan_headers(text: &str, pattern: &Regex) -> Vec<Header> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let number = caps.get(1)?.as_str().to_string();
            let inline = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");

            let mut title = inline.to_string();
            let mut body_start = whole.end();
            if title.is_empty() {
                if let Some((line, line_end)) = next_line(text, whole.end()) {
                    if !STRUCTURAL_LINE.is_match(line) {
                        title = line.trim().to_string();
                        body_start = line_end;
                    }
                }
            }
            Some(Header {
                number,
                title,
                start: whole.start(),
                body_start,
            })
        })
        .collect()
}

/// The line following the newline at `from`, with the offset of its end.
fn next_line(text: &str, from: usize) -> Option<(&str, usize)> {
    let rest = text.get(from..)?.strip_prefix('\n')?;
    let begin = from + 1;
    let len = rest.find('\n').unwrap_or(rest.len());
    let line = &rest[..len];
    (!line.trim().is_empty()).then_some((line, begin + len))
}

/// End offsets for consecutive headers: each runs to the next one, the last to `len`.
pub(crate) fn interval_ends(headers: &[Header], len: usize) -> Vec<usize> {
    headers
        .iter()
        .skip(1)
        .map(|h| h.start)
        .chain(std::iter::once(len))
        .collect()
}

/// Locate `CHAPTER <roman>` headers and their contiguous intervals.
pub fn segment_chapters(text: &str) -> Vec<Chapter> {
    let headers = scan_headers(text, &CHAPTER_HEADER);
    let ends = interval_ends(&headers, text.len());
    let chapters: Vec<Chapter> = headers
        .into_iter()
        .zip(ends)
        .map(|(h, end)| Chapter {
            number: h.number,
            title: h.title,
            start: h.start,
            end,
        })
        .collect();
    info!(count = chapters.len(), "segmented chapters");
    chapters
}

/// Locate `Section <n>` headers, tagging each with its first containing chapter.
pub fn segment_sections(text: &str, chapters: &[Chapter]) -> Vec<Section> {
    let index = IntervalIndex::new(chapters);
    let headers = scan_headers(text, &SECTION_HEADER);
    let ends = interval_ends(&headers, text.len());
    let sections: Vec<Section> = headers
        .into_iter()
        .zip(ends)
        .map(|(h, end)| Section {
            chapter: index.first_containing(h.start),
            number: h.number,
            title: h.title,
            start: h.start,
            end,
        })
        .collect();
    info!(count = sections.len(), "segmented sections");
    sections
}
