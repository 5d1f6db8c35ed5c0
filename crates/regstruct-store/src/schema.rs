//! Relational schema with foreign-key integrity.
//!
//! Identifiers are BIGINTs assigned by the populator. Every numbered level
//! (articles, paragraphs, subparagraphs, sub-subparagraphs) stores its raw
//! ordinal text next to a `sort_key`, so readers can order either way.

use duckdb::Connection;
use tracing::debug;

use crate::StoreError;

/// Every table, parents before children.
pub const TABLES: &[&str] = &[
    "chapters",
    "sections",
    "recitals",
    "articles",
    "paragraphs",
    "subparagraphs",
    "subsubparagraphs",
    "requirements",
    "entities",
    "definitions",
    "cross_references",
    "time_requirements",
    "key_actors",
    "privacy_policy_sections",
];

const DDL: &str = "
CREATE TABLE IF NOT EXISTS chapters (
    id BIGINT PRIMARY KEY,
    number VARCHAR NOT NULL,
    title VARCHAR NOT NULL
);

CREATE TABLE IF NOT EXISTS sections (
    id BIGINT PRIMARY KEY,
    chapter_id BIGINT REFERENCES chapters(id),
    number VARCHAR NOT NULL,
    title VARCHAR NOT NULL
);

CREATE TABLE IF NOT EXISTS recitals (
    id BIGINT PRIMARY KEY,
    number INTEGER NOT NULL,
    content VARCHAR NOT NULL
);

CREATE TABLE IF NOT EXISTS articles (
    id BIGINT PRIMARY KEY,
    number VARCHAR NOT NULL,
    sort_key VARCHAR NOT NULL,
    title VARCHAR NOT NULL,
    content VARCHAR NOT NULL,
    chapter_id BIGINT REFERENCES chapters(id),
    section_id BIGINT REFERENCES sections(id)
);

CREATE TABLE IF NOT EXISTS paragraphs (
    id BIGINT PRIMARY KEY,
    article_id BIGINT NOT NULL REFERENCES articles(id),
    number VARCHAR NOT NULL,
    sort_key VARCHAR NOT NULL,
    text VARCHAR NOT NULL
);

CREATE TABLE IF NOT EXISTS subparagraphs (
    id BIGINT PRIMARY KEY,
    paragraph_id BIGINT NOT NULL REFERENCES paragraphs(id),
    letter VARCHAR NOT NULL,
    sort_key VARCHAR NOT NULL,
    text VARCHAR NOT NULL
);

CREATE TABLE IF NOT EXISTS subsubparagraphs (
    id BIGINT PRIMARY KEY,
    subparagraph_id BIGINT NOT NULL REFERENCES subparagraphs(id),
    number VARCHAR NOT NULL,
    sort_key VARCHAR NOT NULL,
    text VARCHAR NOT NULL
);

CREATE TABLE IF NOT EXISTS requirements (
    id BIGINT PRIMARY KEY,
    article_id BIGINT NOT NULL REFERENCES articles(id),
    paragraph_id BIGINT REFERENCES paragraphs(id),
    subparagraph_id BIGINT REFERENCES subparagraphs(id),
    text VARCHAR NOT NULL,
    is_obligation BOOLEAN NOT NULL,
    is_right BOOLEAN NOT NULL,
    is_time_requirement BOOLEAN NOT NULL
);

CREATE TABLE IF NOT EXISTS entities (
    id BIGINT PRIMARY KEY,
    article_id BIGINT NOT NULL REFERENCES articles(id),
    text VARCHAR NOT NULL,
    label VARCHAR NOT NULL,
    start_pos BIGINT,
    end_pos BIGINT
);

CREATE TABLE IF NOT EXISTS definitions (
    id BIGINT PRIMARY KEY,
    term VARCHAR NOT NULL,
    definition VARCHAR NOT NULL,
    article_id BIGINT REFERENCES articles(id),
    paragraph_id BIGINT REFERENCES paragraphs(id),
    subparagraph_id BIGINT REFERENCES subparagraphs(id)
);

CREATE TABLE IF NOT EXISTS cross_references (
    id BIGINT PRIMARY KEY,
    from_article_id BIGINT NOT NULL REFERENCES articles(id),
    to_article_id BIGINT NOT NULL REFERENCES articles(id),
    to_paragraph VARCHAR
);

CREATE TABLE IF NOT EXISTS time_requirements (
    id BIGINT PRIMARY KEY,
    article_id BIGINT NOT NULL REFERENCES articles(id),
    paragraph_id BIGINT REFERENCES paragraphs(id),
    subparagraph_id BIGINT REFERENCES subparagraphs(id),
    text VARCHAR NOT NULL
);

CREATE TABLE IF NOT EXISTS key_actors (
    id BIGINT PRIMARY KEY,
    actor_type VARCHAR NOT NULL,
    article_id BIGINT NOT NULL REFERENCES articles(id),
    text VARCHAR NOT NULL
);

CREATE TABLE IF NOT EXISTS privacy_policy_sections (
    id BIGINT PRIMARY KEY,
    section_name VARCHAR NOT NULL,
    description VARCHAR NOT NULL,
    related_articles VARCHAR NOT NULL,
    required_information VARCHAR NOT NULL
);
";

/// Create any missing tables. Existing tables and rows are left alone.
pub(crate) fn create_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(DDL)?;
    debug!(tables = TABLES.len(), "schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ddl_creates_every_listed_table() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        let mut stmt = conn
            .prepare("SELECT table_name FROM information_schema.tables ORDER BY table_name")
            .unwrap();
        let names: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        for table in TABLES {
            assert!(names.iter().any(|n| n == table), "missing table {table}");
        }
        assert_eq!(names.len(), TABLES.len());
    }

    #[test]
    fn schema_creation_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        create_schema(&conn).unwrap();
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        let result = conn.execute(
            "INSERT INTO paragraphs (id, article_id, number, sort_key, text) VALUES (1, 99, '1', '001.000.000', 'orphan')",
            [],
        );
        assert!(result.is_err());
    }
}
