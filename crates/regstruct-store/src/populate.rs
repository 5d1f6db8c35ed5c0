//! Single-pass, single-transaction population from a [`ParsedDocument`].

use std::collections::HashMap;

use duckdb::{Connection, params};
use regstruct_core::{ParsedArticle, ParsedDocument};
use serde::Serialize;
use tracing::{debug, info};

use crate::policy::POLICY_SECTIONS;
use crate::schema::TABLES;
use crate::{KnowledgeStore, StoreError};

/// Rows inserted by one population pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PopulateStats {
    pub chapters: usize,
    pub sections: usize,
    pub recitals: usize,
    pub articles: usize,
    pub paragraphs: usize,
    pub subparagraphs: usize,
    pub subsubparagraphs: usize,
    pub requirements: usize,
    pub entities: usize,
    pub definitions: usize,
    pub cross_references: usize,
    pub time_requirements: usize,
    pub key_actors: usize,
    pub policy_sections: usize,
}

impl PopulateStats {
    pub fn total(&self) -> usize {
        self.chapters
            + self.sections
            + self.recitals
            + self.articles
            + self.paragraphs
            + self.subparagraphs
            + self.subsubparagraphs
            + self.requirements
            + self.entities
            + self.definitions
            + self.cross_references
            + self.time_requirements
            + self.key_actors
            + self.policy_sections
    }
}

impl KnowledgeStore {
    /// Insert every entity of `document` in dependency order.
    ///
    /// Runs in one transaction: on any error nothing is committed and the
    /// store is exactly as it was. Calling this twice on the same store
    /// inserts everything twice; start each parse run from a fresh store.
    pub fn populate(&mut self, document: &ParsedDocument) -> Result<PopulateStats, StoreError> {
        let tx = self.conn.transaction()?;
        let stats = Populator::new(&tx)?.run(document)?;
        tx.commit()?;
        info!(
            articles = stats.articles,
            paragraphs = stats.paragraphs,
            requirements = stats.requirements,
            definitions = stats.definitions,
            rows = stats.total(),
            "populated knowledge store"
        );
        Ok(stats)
    }
}

/// Hands out identifiers per table, continuing after existing rows.
struct IdAllocator {
    next: HashMap<&'static str, i64>,
}

impl IdAllocator {
    fn new(conn: &Connection) -> Result<Self, StoreError> {
        let mut next = HashMap::new();
        for &table in TABLES {
            let max: i64 = conn.query_row(
                &format!("SELECT coalesce(max(id), 0)::BIGINT FROM {table}"),
                [],
                |row| row.get(0),
            )?;
            next.insert(table, max + 1);
        }
        Ok(Self { next })
    }

    fn next(&mut self, table: &'static str) -> i64 {
        let slot = self.next.entry(table).or_insert(1);
        let id = *slot;
        *slot += 1;
        id
    }
}

/// Row ids of one inserted article's paragraph tree.
#[derive(Default)]
struct ArticleIds {
    paragraphs: HashMap<String, i64>,
    subparagraphs: HashMap<(String, String), i64>,
}

impl ArticleIds {
    fn paragraph(&self, number: Option<&str>) -> Option<i64> {
        number.and_then(|n| self.paragraphs.get(n).copied())
    }

    fn subparagraph(&self, number: Option<&str>, letter: Option<&str>) -> Option<i64> {
        let key = (number?.to_string(), letter?.to_string());
        self.subparagraphs.get(&key).copied()
    }
}

struct Populator<'c> {
    conn: &'c Connection,
    ids: IdAllocator,
    stats: PopulateStats,
}

impl<'c> Populator<'c> {
    fn new(conn: &'c Connection) -> Result<Self, StoreError> {
        Ok(Self {
            conn,
            ids: IdAllocator::new(conn)?,
            stats: PopulateStats::default(),
        })
    }

    fn run(mut self, doc: &ParsedDocument) -> Result<PopulateStats, StoreError> {
        let chapter_ids = self.insert_chapters(doc)?;
        let section_ids = self.insert_sections(doc, &chapter_ids)?;
        self.insert_recitals(doc)?;

        // Number lookups resolve to the last article inserted with that number.
        let mut article_ids = Vec::with_capacity(doc.articles.len());
        let mut by_number: HashMap<&str, (i64, usize)> = HashMap::new();
        let mut trees = Vec::with_capacity(doc.articles.len());
        for (i, parsed) in doc.articles.iter().enumerate() {
            let id = self.insert_article(parsed, &chapter_ids, &section_ids)?;
            trees.push(self.insert_tree(id, parsed)?);
            article_ids.push(id);
            by_number.insert(parsed.article.number.as_str(), (id, i));
        }

        for ((parsed, &id), tree) in doc.articles.iter().zip(&article_ids).zip(&trees) {
            self.insert_extractions(id, parsed, tree)?;
        }

        for (parsed, &from) in doc.articles.iter().zip(&article_ids) {
            for reference in &parsed.cross_references {
                let Some(&(to, _)) = by_number.get(reference.target_article.as_str()) else {
                    debug!(
                        from = %parsed.article.number,
                        to = %reference.target_article,
                        "skipping reference to unknown article"
                    );
                    continue;
                };
                let id = self.ids.next("cross_references");
                self.conn.execute(
                    "INSERT INTO cross_references (id, from_article_id, to_article_id, to_paragraph)
                     VALUES (?, ?, ?, ?)",
                    params![id, from, to, reference.target_paragraph],
                )?;
                self.stats.cross_references += 1;
            }
        }

        for definition in doc.definitions.iter() {
            let resolved = by_number.get(definition.article.as_str());
            let article_id = resolved.map(|&(id, _)| id);
            let tree = resolved.map(|&(_, i)| &trees[i]);
            let paragraph = Some(definition.paragraph.as_str());
            let paragraph_id = tree.and_then(|t| t.paragraph(paragraph));
            let subparagraph_id =
                tree.and_then(|t| t.subparagraph(paragraph, definition.subparagraph.as_deref()));
            let id = self.ids.next("definitions");
            self.conn.execute(
                "INSERT INTO definitions (id, term, definition, article_id, paragraph_id, subparagraph_id)
                 VALUES (?, ?, ?, ?, ?, ?)",
                params![
                    id,
                    definition.term,
                    definition.definition,
                    article_id,
                    paragraph_id,
                    subparagraph_id
                ],
            )?;
            self.stats.definitions += 1;
        }

        self.insert_policy_sections()?;
        Ok(self.stats)
    }

    fn insert_chapters(&mut self, doc: &ParsedDocument) -> Result<Vec<i64>, StoreError> {
        let mut ids = Vec::with_capacity(doc.chapters.len());
        for chapter in &doc.chapters {
            let id = self.ids.next("chapters");
            self.conn.execute(
                "INSERT INTO chapters (id, number, title) VALUES (?, ?, ?)",
                params![id, chapter.number, chapter.title],
            )?;
            ids.push(id);
        }
        self.stats.chapters += ids.len();
        Ok(ids)
    }

    fn insert_sections(
        &mut self,
        doc: &ParsedDocument,
        chapter_ids: &[i64],
    ) -> Result<Vec<i64>, StoreError> {
        let mut ids = Vec::with_capacity(doc.sections.len());
        for section in &doc.sections {
            let id = self.ids.next("sections");
            let chapter_id = section.chapter.and_then(|i| chapter_ids.get(i).copied());
            self.conn.execute(
                "INSERT INTO sections (id, chapter_id, number, title) VALUES (?, ?, ?, ?)",
                params![id, chapter_id, section.number, section.title],
            )?;
            ids.push(id);
        }
        self.stats.sections += ids.len();
        Ok(ids)
    }

    fn insert_recitals(&mut self, doc: &ParsedDocument) -> Result<(), StoreError> {
        for recital in &doc.recitals {
            let id = self.ids.next("recitals");
            self.conn.execute(
                "INSERT INTO recitals (id, number, content) VALUES (?, ?, ?)",
                params![id, i64::from(recital.number), recital.content],
            )?;
            self.stats.recitals += 1;
        }
        Ok(())
    }

    fn insert_article(
        &mut self,
        parsed: &ParsedArticle,
        chapter_ids: &[i64],
        section_ids: &[i64],
    ) -> Result<i64, StoreError> {
        let article = &parsed.article;
        let id = self.ids.next("articles");
        let chapter_id = article.chapter.and_then(|i| chapter_ids.get(i).copied());
        let section_id = article.section.and_then(|i| section_ids.get(i).copied());
        self.conn.execute(
            "INSERT INTO articles (id, number, sort_key, title, content, chapter_id, section_id)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                id,
                article.number,
                regstruct_core::number_key(&article.number),
                article.title,
                article.content,
                chapter_id,
                section_id
            ],
        )?;
        self.stats.articles += 1;
        Ok(id)
    }

    fn insert_tree(&mut self, article_id: i64, parsed: &ParsedArticle) -> Result<ArticleIds, StoreError> {
        let mut tree = ArticleIds::default();
        for paragraph in &parsed.article.paragraphs {
            let paragraph_id = self.ids.next("paragraphs");
            self.conn.execute(
                "INSERT INTO paragraphs (id, article_id, number, sort_key, text) VALUES (?, ?, ?, ?, ?)",
                params![
                    paragraph_id,
                    article_id,
                    paragraph.number.raw,
                    paragraph.number.sort_key,
                    paragraph.text
                ],
            )?;
            self.stats.paragraphs += 1;
            tree.paragraphs.insert(paragraph.number.raw.clone(), paragraph_id);

            for sub in &paragraph.subparagraphs {
                let sub_id = self.ids.next("subparagraphs");
                self.conn.execute(
                    "INSERT INTO subparagraphs (id, paragraph_id, letter, sort_key, text) VALUES (?, ?, ?, ?, ?)",
                    params![sub_id, paragraph_id, sub.letter.raw, sub.letter.sort_key, sub.text],
                )?;
                self.stats.subparagraphs += 1;
                tree.subparagraphs
                    .insert((paragraph.number.raw.clone(), sub.letter.raw.clone()), sub_id);

                for subsub in &sub.subsubparagraphs {
                    let subsub_id = self.ids.next("subsubparagraphs");
                    self.conn.execute(
                        "INSERT INTO subsubparagraphs (id, subparagraph_id, number, sort_key, text) VALUES (?, ?, ?, ?, ?)",
                        params![
                            subsub_id,
                            sub_id,
                            subsub.number.raw,
                            subsub.number.sort_key,
                            subsub.text
                        ],
                    )?;
                    self.stats.subsubparagraphs += 1;
                }
            }
        }
        Ok(tree)
    }

    /// Requirements, entities, time requirements and key-actor mentions.
    fn insert_extractions(
        &mut self,
        article_id: i64,
        parsed: &ParsedArticle,
        tree: &ArticleIds,
    ) -> Result<(), StoreError> {
        for req in &parsed.requirements {
            let id = self.ids.next("requirements");
            let paragraph = req.paragraph.as_deref();
            self.conn.execute(
                "INSERT INTO requirements
                 (id, article_id, paragraph_id, subparagraph_id, text, is_obligation, is_right, is_time_requirement)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                params![
                    id,
                    article_id,
                    tree.paragraph(paragraph),
                    tree.subparagraph(paragraph, req.subparagraph.as_deref()),
                    req.text,
                    req.is_obligation,
                    req.is_right,
                    req.is_time_requirement
                ],
            )?;
            self.stats.requirements += 1;
        }

        for entity in &parsed.entities {
            let id = self.ids.next("entities");
            let (start, end) = (entity.start as i64, entity.end as i64);
            self.conn.execute(
                "INSERT INTO entities (id, article_id, text, label, start_pos, end_pos) VALUES (?, ?, ?, ?, ?, ?)",
                params![
                    id,
                    article_id,
                    entity.text,
                    entity.label,
                    start,
                    end
                ],
            )?;
            self.stats.entities += 1;
        }

        for time in &parsed.time_requirements {
            let id = self.ids.next("time_requirements");
            let paragraph = time.paragraph.as_deref();
            self.conn.execute(
                "INSERT INTO time_requirements (id, article_id, paragraph_id, subparagraph_id, text)
                 VALUES (?, ?, ?, ?, ?)",
                params![
                    id,
                    article_id,
                    tree.paragraph(paragraph),
                    tree.subparagraph(paragraph, time.subparagraph.as_deref()),
                    time.text
                ],
            )?;
            self.stats.time_requirements += 1;
        }

        for mention in &parsed.key_actors {
            let id = self.ids.next("key_actors");
            self.conn.execute(
                "INSERT INTO key_actors (id, actor_type, article_id, text) VALUES (?, ?, ?, ?)",
                params![id, mention.actor.as_str(), article_id, mention.text],
            )?;
            self.stats.key_actors += 1;
        }
        Ok(())
    }

    fn insert_policy_sections(&mut self) -> Result<(), StoreError> {
        for &(name, description, articles, info) in POLICY_SECTIONS {
            let id = self.ids.next("privacy_policy_sections");
            self.conn.execute(
                "INSERT INTO privacy_policy_sections
                 (id, section_name, description, related_articles, required_information)
                 VALUES (?, ?, ?, ?, ?)",
                params![id, name, description, articles, info],
            )?;
            self.stats.policy_sections += 1;
        }
        Ok(())
    }
}
