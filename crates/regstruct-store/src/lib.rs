//! Relational knowledge store for parsed regulations, backed by DuckDB.
//!
//! A [`KnowledgeStore`] is populated once from a
//! [`ParsedDocument`](regstruct_core::ParsedDocument) and then serves nested
//! article reconstruction, keyword search, requirements by role, the JSON
//! export and the privacy-policy template.

mod duck;
mod error;
mod export;
mod policy;
mod populate;
mod query;
mod schema;

pub use duck::KnowledgeStore;
pub use error::StoreError;
pub use populate::PopulateStats;
pub use schema::TABLES;
