//! Table-schema inference from a sample CSV header.
//!
//! The first record of one discovered file decides the column list for table
//! creation. Header names are trusted only when every field contains at least
//! one alphabetic character; otherwise all names are discarded and positional
//! `C0..Cn` names are used instead. Every inferred column is unbounded TEXT —
//! typing the data is left to whoever queries it later.

use std::fs::File;
use std::path::Path;

use crate::error::{Result, SinkError};
use crate::identifier::quote;

/// A single inferred column: display name plus SQL type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Quoted (or positional) name as it appears in DDL
    pub name: String,
    /// SQL type; always `TEXT` in the default inference path
    pub sql_type: String,
}

impl Column {
    fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: "TEXT".to_string(),
        }
    }
}

/// A sanitized table name plus its inferred column list.
#[derive(Debug, Clone)]
pub struct TableSchema {
    /// Sanitized table name
    pub name: String,
    /// Ordered column specifications
    pub columns: Vec<Column>,
}

impl TableSchema {
    /// Builds the `CREATE TABLE` statement for this schema.
    #[must_use]
    pub fn create_statement(&self) -> String {
        let body = self
            .columns
            .iter()
            .map(|c| format!("{} {}", c.name, c.sql_type))
            .collect::<Vec<_>>()
            .join(", ");
        format!("CREATE TABLE {} ({})", self.name, body)
    }
}

/// Infers the column list from the first record of `sample`.
///
/// Policy is all-or-nothing: if every header field contains at least one
/// alphabetic character, the header names are used (backtick-quoted so
/// reserved words survive); if even one field is empty, purely numeric, or
/// symbol-only, every column falls back to `C0..C{n-1}`.
///
/// # Errors
/// Returns a `SchemaInference` error if the file cannot be opened or its
/// first record cannot be parsed as comma-delimited text. The message hints
/// that such files are usually compressed rather than plain CSV.
pub fn infer_columns(sample: &Path) -> Result<Vec<Column>> {
    let file = File::open(sample)
        .map_err(|e| SinkError::inference_failed(sample, "failed to open sample file", e))?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut records = reader.records();
    let header = match records.next() {
        Some(Ok(record)) => record,
        Some(Err(e)) => {
            return Err(SinkError::inference_failed(
                sample,
                "failed to parse the header record",
                e,
            ));
        }
        None => {
            return Err(SinkError::SchemaInference {
                path: sample.to_path_buf(),
                context: "sample file is empty".to_string(),
                source: None,
            });
        }
    };

    let fields: Vec<&str> = header.iter().collect();
    let valid = fields
        .iter()
        .filter(|f| f.chars().any(char::is_alphabetic))
        .count();

    let columns = if valid == fields.len() {
        fields.iter().map(|f| Column::text(quote(f))).collect()
    } else {
        tracing::warn!(
            "Header of {} has {} unusable field(s); falling back to positional column names",
            sample.display(),
            fields.len() - valid
        );
        (0..fields.len()).map(|i| Column::text(format!("C{i}"))).collect()
    };

    Ok(columns)
}
