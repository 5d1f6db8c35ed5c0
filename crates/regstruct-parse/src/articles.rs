//! Article extraction: one span per `Article <n>` header, tagged with the
//! chapter and section intervals containing the header.

use regstruct_core::{Article, Chapter, Section};
use tracing::{debug, info};

use crate::interval::IntervalIndex;
use crate::paragraphs::decompose_paragraphs;
use crate::segment::{ARTICLE_HEADER, CHAPTER_HEADER, SECTION_HEADER, interval_ends, scan_headers};

/// Split normalised text into articles.
///
/// Each article runs from its header to the next article header (or the end
/// of the document). Chapter and section membership use the first-match
/// policy of [`IntervalIndex`], each axis independently. Paragraphs are
/// decomposed from the body after the header, cut at the next chapter or
/// section heading so group titles do not leak into the last paragraph.
pub fn extract_articles(text: &str, chapters: &[Chapter], sections: &[Section]) -> Vec<Article> {
    let chapter_index = IntervalIndex::new(chapters);
    let section_index = IntervalIndex::new(sections);

    let headers = scan_headers(text, &ARTICLE_HEADER);
    let ends = interval_ends(&headers, text.len());

    let articles: Vec<Article> = headers
        .into_iter()
        .zip(ends)
        .map(|(header, end)| {
            let body = group_free_body(&text[header.body_start.min(end)..end]);
            let paragraphs = decompose_paragraphs(body);
            debug!(
                article = %header.number,
                paragraphs = paragraphs.len(),
                "extracted article"
            );
            Article {
                chapter: chapter_index.first_containing(header.start),
                section: section_index.first_containing(header.start),
                content: text[header.start..end].trim().to_string(),
                offset: header.start,
                number: header.number,
                title: header.title,
                paragraphs,
            }
        })
        .collect();

    info!(count = articles.len(), "extracted articles");
    articles
}

/// The body up to the first chapter or section heading it contains.
fn group_free_body(body: &str) -> &str {
    let cut = [&*CHAPTER_HEADER, &*SECTION_HEADER]
        .iter()
        .filter_map(|re| re.find(body).map(|m| m.start()))
        .min()
        .unwrap_or(body.len());
    &body[..cut]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::segment::{segment_chapters, segment_sections};

    const DOC: &str = "CHAPTER I General provisions\nArticle 1 - Subject matter\n1. Text1.\nArticle 2 - Scope\n1. Text2.";

    #[test]
    fn two_articles_in_chapter_one() {
        let chapters = segment_chapters(DOC);
        let articles = extract_articles(DOC, &chapters, &[]);
        assert_eq!(articles.len(), 2);
        for (article, text) in articles.iter().zip(["Text1.", "Text2."]) {
            let chapter = article.chapter.map(|i| chapters[i].number.as_str());
            assert_eq!(chapter, Some("I"));
            assert_eq!(article.paragraphs.len(), 1);
            assert_eq!(article.paragraphs[0].number.as_str(), "1");
            assert_eq!(article.paragraphs[0].text, text);
        }
        assert_eq!(articles[0].number, "1");
        assert_eq!(articles[0].title, "Subject matter");
        assert_eq!(articles[1].title, "Scope");
    }

    #[test]
    fn content_spans_header_to_next_header() {
        let articles = extract_articles(DOC, &[], &[]);
        assert_eq!(articles[0].content, "Article 1 - Subject matter\n1. Text1.");
        assert_eq!(articles[1].content, "Article 2 - Scope\n1. Text2.");
        assert_eq!(articles[0].offset, DOC.find("Article 1").unwrap());
        assert!(articles[0].chapter.is_none());
    }

    #[test]
    fn no_headers_no_articles() {
        assert!(extract_articles("Just a preamble.", &[], &[]).is_empty());
    }

    #[test]
    fn group_headings_do_not_leak_into_paragraphs() {
        let text = "CHAPTER I General\nArticle 1 - One\n1. Alpha.\nCHAPTER II Rights\nSection 1 Transparency\nArticle 2 - Two\n1. Beta.";
        let chapters = segment_chapters(text);
        let sections = segment_sections(text, &chapters);
        let articles = extract_articles(text, &chapters, &sections);
        assert_eq!(articles[0].paragraphs[0].text, "Alpha.");
        assert!(articles[0].content.ends_with("Section 1 Transparency"));
        assert_eq!(articles[0].chapter, Some(0));
        assert_eq!(articles[0].section, None);
        assert_eq!(articles[1].chapter, Some(1));
        assert_eq!(articles[1].section, Some(0));
    }

    #[test]
    fn axes_are_tagged_independently() {
        // A section interval that starts before its chapter still tags the article.
        let text = "Section 1 Orphan\nCHAPTER I Late\nArticle 1 - One\n1. Text.";
        let chapters = segment_chapters(text);
        let sections = segment_sections(text, &chapters);
        assert_eq!(sections[0].chapter, None);
        let articles = extract_articles(text, &chapters, &sections);
        assert_eq!(articles[0].chapter, Some(0));
        assert_eq!(articles[0].section, Some(0));
    }

    #[test]
    fn title_on_following_line() {
        let text = "Article 3\nTerritorial scope\n1. This Regulation applies.";
        let articles = extract_articles(text, &[], &[]);
        assert_eq!(articles[0].title, "Territorial scope");
        assert_eq!(articles[0].paragraphs[0].text, "This Regulation applies.");
    }

    #[test]
    fn untitled_header_followed_by_widely_spaced_header() {
        let text = "Article 6\nArticle  7 - Conditions\n1. Text.";
        let articles = extract_articles(text, &[], &[]);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "");
        assert!(articles[0].paragraphs.is_empty());
        assert_eq!(articles[1].number, "7");
        assert_eq!(articles[1].title, "Conditions");
        assert_eq!(articles[1].paragraphs[0].text, "Text.");
    }
}
