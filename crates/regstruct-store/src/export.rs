//! Whole-store export as one nested JSON document.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use regstruct_core::view::{
    ActorMentionView, DEFAULT_DOCUMENT_TITLE, DefinitionView, ExportDocument, ExportMetadata,
    HeadingView, RecitalView, TimeRequirementView,
};
use tracing::info;

use crate::{KnowledgeStore, StoreError};

impl KnowledgeStore {
    /// Reconstruct everything in the store.
    ///
    /// Each exported article is exactly what
    /// [`get_article_by_number`](Self::get_article_by_number) returns for it.
    pub fn export_all(&self) -> Result<ExportDocument, StoreError> {
        let doc = ExportDocument {
            metadata: ExportMetadata {
                title: DEFAULT_DOCUMENT_TITLE.to_string(),
                exported_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            },
            chapters: self.export_chapters()?,
            recitals: self.export_recitals()?,
            articles: self.export_articles()?,
            definitions: self.export_definitions()?,
            key_actors: self.export_key_actors()?,
            time_requirements: self.export_time_requirements()?,
        };
        info!(
            articles = doc.articles.len(),
            definitions = doc.definitions.len(),
            "exported knowledge store"
        );
        Ok(doc)
    }

    /// Write [`export_all`](Self::export_all) as pretty-printed JSON.
    pub fn export_json<W: Write>(&self, writer: W) -> Result<(), StoreError> {
        let doc = self.export_all()?;
        serde_json::to_writer_pretty(writer, &doc)?;
        Ok(())
    }

    /// Write the JSON export to `path`, replacing any existing file.
    pub fn export_to_file(&self, path: &Path) -> Result<(), StoreError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.export_json(&mut writer)?;
        writer.flush()?;
        info!(path = %path.display(), "wrote export");
        Ok(())
    }

    fn export_chapters(&self) -> Result<Vec<HeadingView>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT number, title FROM chapters ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(HeadingView {
                number: row.get(0)?,
                title: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn export_recitals(&self) -> Result<Vec<RecitalView>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT number::BIGINT, content FROM recitals ORDER BY number, id")?;
        let rows = stmt.query_map([], |row| {
            Ok(RecitalView {
                number: row.get(0)?,
                content: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn export_articles(&self) -> Result<Vec<regstruct_core::view::ArticleView>, StoreError> {
        let sql = format!(
            "SELECT id FROM articles ORDER BY {}, id",
            self.order.column("number")
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let ids = stmt
            .query_map([], |row| row.get::<_, i64>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        ids.into_iter().map(|id| self.load_article(id)).collect()
    }

    fn export_definitions(&self) -> Result<Vec<DefinitionView>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT d.term, d.definition, a.number, p.number, s.letter
             FROM definitions d
             LEFT JOIN articles a ON d.article_id = a.id
             LEFT JOIN paragraphs p ON d.paragraph_id = p.id
             LEFT JOIN subparagraphs s ON d.subparagraph_id = s.id
             ORDER BY d.term, d.id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(DefinitionView {
                term: row.get(0)?,
                definition: row.get(1)?,
                article: row.get(2)?,
                paragraph: row.get(3)?,
                subparagraph: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    fn export_key_actors(&self) -> Result<BTreeMap<String, Vec<ActorMentionView>>, StoreError> {
        let sql = format!(
            "SELECT k.actor_type, a.number, k.text
             FROM key_actors k
             JOIN articles a ON k.article_id = a.id
             ORDER BY k.actor_type, a.{}, k.id",
            self.order.column("number")
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                ActorMentionView {
                    article: row.get(1)?,
                    text: row.get(2)?,
                },
            ))
        })?;

        let mut grouped: BTreeMap<String, Vec<ActorMentionView>> = BTreeMap::new();
        for row in rows {
            let (actor, mention) = row?;
            grouped.entry(actor).or_default().push(mention);
        }
        Ok(grouped)
    }

    fn export_time_requirements(&self) -> Result<Vec<TimeRequirementView>, StoreError> {
        let sql = format!(
            "SELECT a.number, p.number, s.letter, t.text
             FROM time_requirements t
             JOIN articles a ON t.article_id = a.id
             LEFT JOIN paragraphs p ON t.paragraph_id = p.id
             LEFT JOIN subparagraphs s ON t.subparagraph_id = s.id
             ORDER BY a.{}, t.id",
            self.order.column("number")
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(TimeRequirementView {
                article: row.get(0)?,
                paragraph: row.get(1)?,
                subparagraph: row.get(2)?,
                text: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_exports_empty_collections() {
        let store = KnowledgeStore::open().unwrap();
        let doc = store.export_all().unwrap();
        assert_eq!(doc.metadata.title, DEFAULT_DOCUMENT_TITLE);
        assert!(doc.metadata.exported_at.ends_with('Z'));
        assert!(doc.chapters.is_empty());
        assert!(doc.articles.is_empty());
        assert!(doc.key_actors.is_empty());
    }

    #[test]
    fn export_json_is_valid_json() {
        let store = KnowledgeStore::open().unwrap();
        let mut buf = Vec::new();
        store.export_json(&mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert!(value["articles"].as_array().unwrap().is_empty());
        assert!(value["metadata"]["exported_at"].is_string());
    }

    #[test]
    fn export_to_file_writes_json() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("export.json");
        let store = KnowledgeStore::open().unwrap();
        store.export_to_file(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"metadata\""));
    }
}
