//! Storage-engine boundary for provisioning, ingestion, and queries.
//!
//! The core drives every database interaction through this object-safe trait
//! so provisioning and loading logic can be exercised against a mock engine.
//! The one production implementation is MySQL ([`mysql::MySqlEngine`]).

use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

pub mod mysql;

/// Wire format for bulk ingest; must match what schema inference assumed.
#[derive(Debug, Clone)]
pub struct IngestFormat {
    /// Field delimiter (default `,`)
    pub delimiter: u8,
    /// Optional enclosure character (default `"`)
    pub quote: Option<u8>,
    /// Whether records are CRLF-terminated (default true; false accepts any
    /// line ending)
    pub crlf: bool,
    /// Number of leading records to skip per file (default 1, the header)
    pub skip_lines: usize,
}

impl Default for IngestFormat {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: Some(b'"'),
            crlf: true,
            skip_lines: 1,
        }
    }
}

/// Object-safe interface to the target database.
///
/// One engine owns one connection (or single-connection pool) and at most one
/// open batch transaction. Implementations are driven strictly sequentially;
/// no operation overlaps another.
#[async_trait]
pub trait StorageEngine: Send {
    /// Checks whether `table` exists in the connected database.
    ///
    /// # Errors
    /// Returns a query error if the existence check fails.
    async fn table_exists(&mut self, table: &str) -> Result<bool>;

    /// Executes a DDL or other standalone statement, returning affected rows.
    ///
    /// DDL autocommits in MySQL; callers must not rely on rolling it back.
    ///
    /// # Errors
    /// Returns a query error carrying the engine's failure.
    async fn execute(&mut self, sql: &str) -> Result<u64>;

    /// Bulk-ingests one delimited file into `table`, returning rows loaded.
    ///
    /// Runs inside the engine's batch transaction, which is opened lazily on
    /// the first ingest and only closed by [`StorageEngine::commit`] (or
    /// rolled back when the engine is dropped).
    ///
    /// # Errors
    /// Returns an ingest error naming the file on any parse or insert
    /// failure.
    async fn ingest(&mut self, path: &Path, table: &str, format: &IngestFormat) -> Result<u64>;

    /// Commits the batch transaction, if one is open.
    ///
    /// # Errors
    /// Returns a query error if the commit fails.
    async fn commit(&mut self) -> Result<()>;

    /// Runs a query and decodes every column of every row as optional text.
    ///
    /// Non-text select expressions must be `CAST(... AS CHAR)` by the caller.
    ///
    /// # Errors
    /// Returns a query error if execution or decoding fails.
    async fn fetch_rows(&mut self, sql: &str) -> Result<Vec<Vec<Option<String>>>>;
}
