//! Read paths: nested article reconstruction, keyword search, and
//! requirements by role.

use duckdb::{OptionalExt, params};
use regstruct_core::view::{
    ArticleView, EntityView, HeadingView, ParagraphMatch, ParagraphView, ReferenceView,
    RequirementView, RoleRequirement, SearchHit, SubparagraphView, SubsubparagraphView,
};
use tracing::debug;

use crate::{KnowledgeStore, StoreError};

/// Characters of context kept on each side of a search match.
const SNIPPET_RADIUS: usize = 50;

impl KnowledgeStore {
    /// Reconstruct the article with this number, or `None` if there is none.
    ///
    /// When several rows share the number, the first inserted wins.
    pub fn get_article_by_number(&self, number: &str) -> Result<Option<ArticleView>, StoreError> {
        let id: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM articles WHERE number = ? ORDER BY id LIMIT 1",
                params![number],
                |row| row.get(0),
            )
            .optional()?;
        match id {
            Some(id) => self.load_article(id).map(Some),
            None => Ok(None),
        }
    }

    pub(crate) fn load_article(&self, id: i64) -> Result<ArticleView, StoreError> {
        let (number, title, content, chapter, section) = self.conn.query_row(
            "SELECT a.number, a.title, a.content, c.number, c.title, s.number, s.title
             FROM articles a
             LEFT JOIN chapters c ON a.chapter_id = c.id
             LEFT JOIN sections s ON a.section_id = s.id
             WHERE a.id = ?",
            params![id],
            |row| {
                let heading = |n: Option<String>, t: Option<String>| {
                    n.map(|number| HeadingView {
                        number,
                        title: t.unwrap_or_default(),
                    })
                };
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    heading(row.get(3)?, row.get(4)?),
                    heading(row.get(5)?, row.get(6)?),
                ))
            },
        )?;

        Ok(ArticleView {
            paragraphs: self.load_paragraphs(id)?,
            requirements: self.load_requirements(id)?,
            entities: self.load_entities(id)?,
            cross_references: self.load_references(id)?,
            number,
            title,
            content,
            chapter,
            section,
        })
    }

    fn load_paragraphs(&self, article_id: i64) -> Result<Vec<ParagraphView>, StoreError> {
        let sql = format!(
            "SELECT id, number, text FROM paragraphs WHERE article_id = ? ORDER BY {}, id",
            self.order.column("number")
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![article_id], |row| {
                Ok((row.get::<_, i64>(0)?, row.get(1)?, row.get(2)?))
            })?
            .collect::<Result<Vec<(i64, String, String)>, _>>()?;

        rows.into_iter()
            .map(|(id, number, text)| {
                Ok(ParagraphView {
                    number,
                    text,
                    subparagraphs: self.load_subparagraphs(id)?,
                })
            })
            .collect()
    }

    fn load_subparagraphs(&self, paragraph_id: i64) -> Result<Vec<SubparagraphView>, StoreError> {
        let sql = format!(
            "SELECT id, letter, text FROM subparagraphs WHERE paragraph_id = ? ORDER BY {}, id",
            self.order.column("letter")
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![paragraph_id], |row| {
                Ok((row.get::<_, i64>(0)?, row.get(1)?, row.get(2)?))
            })?
            .collect::<Result<Vec<(i64, String, String)>, _>>()?;

        rows.into_iter()
            .map(|(id, letter, text)| {
                Ok(SubparagraphView {
                    letter,
                    text,
                    subsubparagraphs: self.load_subsubparagraphs(id)?,
                })
            })
            .collect()
    }

    fn load_subsubparagraphs(
        &self,
        subparagraph_id: i64,
    ) -> Result<Vec<SubsubparagraphView>, StoreError> {
        let sql = format!(
            "SELECT number, text FROM subsubparagraphs WHERE subparagraph_id = ? ORDER BY {}, id",
            self.order.column("number")
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![subparagraph_id], |row| {
            Ok(SubsubparagraphView {
                number: row.get(0)?,
                text: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn load_requirements(&self, article_id: i64) -> Result<Vec<RequirementView>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT text, is_obligation, is_right, is_time_requirement
             FROM requirements WHERE article_id = ? ORDER BY id",
        )?;
        let rows = stmt.query_map(params![article_id], |row| {
            Ok(RequirementView {
                text: row.get(0)?,
                is_obligation: row.get(1)?,
                is_right: row.get(2)?,
                is_time_requirement: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn load_entities(&self, article_id: i64) -> Result<Vec<EntityView>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT text, label, start_pos, end_pos FROM entities WHERE article_id = ? ORDER BY id",
        )?;
        let rows = stmt.query_map(params![article_id], |row| {
            Ok(EntityView {
                text: row.get(0)?,
                label: row.get(1)?,
                start: row.get(2)?,
                end: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn load_references(&self, article_id: i64) -> Result<Vec<ReferenceView>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT a.number, r.to_paragraph
             FROM cross_references r
             JOIN articles a ON r.to_article_id = a.id
             WHERE r.from_article_id = ?
             ORDER BY r.id",
        )?;
        let rows = stmt.query_map(params![article_id], |row| {
            Ok(ReferenceView {
                article: row.get(0)?,
                paragraph: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    // ── Search ──

    /// Case-insensitive substring search over article content.
    ///
    /// Each hit lists the matching paragraphs with a snippet of up to 50
    /// characters of context either side of the first match. An article can
    /// match on its header alone and carry no paragraph matches.
    pub fn search_by_keyword(&self, keyword: &str) -> Result<Vec<SearchHit>, StoreError> {
        let sql = format!(
            "SELECT id, number, title FROM articles
             WHERE contains(lower(content), lower(?))
             ORDER BY {}, id",
            self.order.column("number")
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let articles = stmt
            .query_map(params![keyword], |row| {
                Ok((row.get::<_, i64>(0)?, row.get(1)?, row.get(2)?))
            })?
            .collect::<Result<Vec<(i64, String, String)>, _>>()?;

        let sql = format!(
            "SELECT number, text FROM paragraphs
             WHERE article_id = ? AND contains(lower(text), lower(?))
             ORDER BY {}, id",
            self.order.column("number")
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut hits = Vec::with_capacity(articles.len());
        for (id, article, title) in articles {
            let matches = stmt
                .query_map(params![id, keyword], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?
                .map(|row| {
                    row.map(|(paragraph, text)| ParagraphMatch {
                        snippet: snippet(&text, keyword),
                        paragraph,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            hits.push(SearchHit {
                article,
                title,
                matches,
            });
        }
        debug!(keyword, hits = hits.len(), "keyword search");
        Ok(hits)
    }

    // ── Roles ──

    /// Requirements in articles mentioning `role` as a key actor, whose own
    /// text also mentions the role.
    ///
    /// `role` is an actor type name such as `data_subject`; underscores are
    /// read as spaces when matching requirement text.
    pub fn requirements_for_role(&self, role: &str) -> Result<Vec<RoleRequirement>, StoreError> {
        let phrase = role.replace('_', " ").to_lowercase();
        let mut stmt = self.conn.prepare(
            "SELECT a.number, a.title, r.text, r.is_obligation, r.is_right, r.is_time_requirement
             FROM requirements r
             JOIN articles a ON r.article_id = a.id
             WHERE r.article_id IN (SELECT DISTINCT article_id FROM key_actors WHERE actor_type = ?)
             ORDER BY r.article_id, r.id",
        )?;
        let rows = stmt.query_map(params![role], |row| {
            Ok(RoleRequirement {
                article: row.get(0)?,
                article_title: row.get(1)?,
                text: row.get(2)?,
                is_obligation: row.get(3)?,
                is_right: row.get(4)?,
                is_time_requirement: row.get(5)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            let requirement = row?;
            if requirement.text.to_lowercase().contains(&phrase) {
                out.push(requirement);
            }
        }
        debug!(role, requirements = out.len(), "requirements for role");
        Ok(out)
    }
}

/// Up to [`SNIPPET_RADIUS`] characters either side of the first
/// case-insensitive occurrence of `keyword`, with `...` marking truncation.
/// Never empty for non-empty text.
pub(crate) fn snippet(text: &str, keyword: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let lowered: Vec<char> = chars.iter().copied().map(fold).collect();
    let needle: Vec<char> = keyword.chars().map(fold).collect();

    // SQL matched but the per-char fold did not: show the opening of the text.
    let (pos, len) = find(&lowered, &needle)
        .map(|pos| (pos, needle.len()))
        .unwrap_or((0, SNIPPET_RADIUS));
    let start = pos.saturating_sub(SNIPPET_RADIUS);
    let end = (pos + len + SNIPPET_RADIUS).min(chars.len());

    let mut out = String::new();
    if start > 0 {
        out.push_str("...");
    }
    out.extend(&chars[start..end]);
    if end < chars.len() {
        out.push_str("...");
    }
    out
}

/// One-to-one lowercase mapping, so positions line up with the input text.
fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

fn find(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
