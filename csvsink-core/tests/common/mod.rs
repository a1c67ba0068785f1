//! Shared test doubles: an in-memory storage engine that records every call.

#![allow(clippy::unwrap_used)]
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use csvsink_core::engine::{IngestFormat, StorageEngine};
use csvsink_core::error::{Result, SinkError};

/// Storage engine double: records statements, ingests, and commits, and can
/// be told to fail specific statements or files.
#[derive(Debug, Default)]
pub struct MockEngine {
    /// Tables reported as existing by `table_exists`
    pub existing_tables: Vec<String>,
    /// Every statement passed to `execute`, in order
    pub statements: Vec<String>,
    /// Every file passed to `ingest`, in order
    pub ingested: Vec<PathBuf>,
    /// Number of `commit` calls
    pub commits: usize,
    /// `execute` fails if the statement contains any of these substrings
    pub fail_statements: Vec<String>,
    /// `ingest` fails for files whose name contains this substring
    pub fail_ingest_matching: Option<String>,
    /// Canned responses for `fetch_rows`, consumed in order
    pub canned_rows: std::collections::VecDeque<Vec<Vec<Option<String>>>>,
    /// Every query passed to `fetch_rows`, in order
    pub queries: Vec<String>,
}

impl MockEngine {
    pub fn with_existing_table(table: &str) -> Self {
        Self {
            existing_tables: vec![table.to_string()],
            ..Self::default()
        }
    }

    fn mock_failure(context: &str) -> SinkError {
        SinkError::query_failed(context.to_string(), std::io::Error::other("mock failure"))
    }
}

#[async_trait]
impl StorageEngine for MockEngine {
    async fn table_exists(&mut self, table: &str) -> Result<bool> {
        Ok(self.existing_tables.iter().any(|t| t == table))
    }

    async fn execute(&mut self, sql: &str) -> Result<u64> {
        self.statements.push(sql.to_string());
        if self.fail_statements.iter().any(|bad| sql.contains(bad)) {
            return Err(Self::mock_failure(sql));
        }
        Ok(0)
    }

    async fn ingest(&mut self, path: &Path, _table: &str, format: &IngestFormat) -> Result<u64> {
        self.ingested.push(path.to_path_buf());

        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if let Some(bad) = &self.fail_ingest_matching {
            if name.contains(bad.as_str()) {
                return Err(SinkError::ingest_failed(
                    path,
                    "mock ingest failure",
                    std::io::Error::other("mock failure"),
                ));
            }
        }

        // Count data records the way a real engine would: parse the file and
        // skip the header lines.
        let data = std::fs::read(path)
            .map_err(|e| SinkError::io(format!("failed to read {}", path.display()), e))?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(format.delimiter)
            .from_reader(data.as_slice());
        let mut rows = 0u64;
        for (index, record) in reader.records().enumerate() {
            record.map_err(|e| SinkError::ingest_failed(path, "malformed record", e))?;
            if index >= format.skip_lines {
                rows += 1;
            }
        }
        Ok(rows)
    }

    async fn commit(&mut self) -> Result<()> {
        self.commits += 1;
        Ok(())
    }

    async fn fetch_rows(&mut self, sql: &str) -> Result<Vec<Vec<Option<String>>>> {
        self.queries.push(sql.to_string());
        self.canned_rows
            .pop_front()
            .ok_or_else(|| Self::mock_failure("no canned rows left"))
    }
}
