//! DuckDB-backed knowledge store: connection lifecycle, counts, and the SQL
//! escape hatch. Population, reconstruction and export live in sibling
//! modules as further `impl KnowledgeStore` blocks.

use std::path::Path;

use arrow::array::Int64Array;
use arrow::record_batch::RecordBatch;
use duckdb::Connection;
use regstruct_core::OrdinalOrder;
use tracing::info;

use crate::StoreError;
use crate::schema::{TABLES, create_schema};

/// Relational store for one parsed regulation.
///
/// Supports both in-memory (ephemeral) and persistent (file-backed) modes.
/// Use [`open`](Self::open) for in-memory, [`open_persistent`](Self::open_persistent)
/// for an existing or new file, and [`create_persistent`](Self::create_persistent)
/// when the caller needs a guaranteed-fresh file before population.
///
/// Reads order numbered levels by the store's [`OrdinalOrder`].
pub struct KnowledgeStore {
    pub(crate) conn: Connection,
    pub(crate) order: OrdinalOrder,
}

impl KnowledgeStore {
    /// Open an in-memory database with the schema in place.
    pub fn open() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    /// Open or create a persistent database at `path`.
    pub fn open_persistent(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        info!(path = %path.display(), "opened knowledge store");
        Self::with_connection(conn)
    }

    /// Create a new persistent database, refusing to reuse an existing file.
    ///
    /// Population is not idempotent, so a parse run should start from a store
    /// created this way.
    pub fn create_persistent(path: &Path) -> Result<Self, StoreError> {
        if path.exists() {
            return Err(StoreError::DatabaseExists(path.to_path_buf()));
        }
        Self::open_persistent(path)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        create_schema(&conn)?;
        Ok(Self {
            conn,
            order: OrdinalOrder::default(),
        })
    }

    /// Use `order` for every subsequent read.
    pub fn with_order(mut self, order: OrdinalOrder) -> Self {
        self.order = order;
        self
    }

    pub fn order(&self) -> OrdinalOrder {
        self.order
    }

    // ── Counts ──

    /// Row count of every table, parents first.
    pub fn table_counts(&self) -> Result<Vec<(&'static str, usize)>, StoreError> {
        TABLES
            .iter()
            .map(|&table| self.count_table(table).map(|n| (table, n)))
            .collect()
    }

    /// Whether nothing has been populated yet.
    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.count_table("articles")? == 0 && self.count_table("chapters")? == 0)
    }

    pub(crate) fn count_table(&self, table: &str) -> Result<usize, StoreError> {
        let sql = format!("SELECT count(*)::BIGINT AS cnt FROM {table}");
        let mut stmt = self.conn.prepare(&sql)?;
        let batches: Vec<RecordBatch> = stmt.query_arrow([])?.collect();
        let batch = batches.first().ok_or(StoreError::NoResults)?;
        let col = batch
            .column(0)
            .as_any()
            .downcast_ref::<Int64Array>()
            .ok_or_else(|| StoreError::Other("count column not i64".into()))?;
        Ok(col.value(0) as usize)
    }

    // ── Escape hatch ──

    /// Execute arbitrary SQL and return Arrow RecordBatches.
    pub fn query_arrow(&self, sql: &str) -> Result<Vec<RecordBatch>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let batches: Vec<RecordBatch> = stmt.query_arrow([])?.collect();
        Ok(batches)
    }
}
