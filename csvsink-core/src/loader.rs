//! Bulk loading of discovered files into the provisioned table.
//!
//! Files are ingested strictly in sequence into one batch transaction with a
//! single commit after the last file. The first failing file aborts the
//! remaining batch and nothing is committed — there is deliberately no
//! skip-and-continue for malformed files.

use std::path::PathBuf;

use crate::engine::{IngestFormat, StorageEngine};
use crate::error::Result;

/// Ingests every file in `files` into `table`, then commits once.
///
/// Returns the total number of rows loaded across all files. Per-file
/// progress is logged at info level.
///
/// # Errors
/// Propagates the first ingest failure immediately; files after the failing
/// one are never touched and no commit is issued.
pub async fn load_all(
    engine: &mut dyn StorageEngine,
    files: &[PathBuf],
    table: &str,
    format: &IngestFormat,
) -> Result<u64> {
    let mut total = 0u64;

    for file in files {
        tracing::info!("Importing {} into the {} table", file.display(), table);
        let rows = engine.ingest(file, table, format).await?;
        tracing::debug!("{} rows loaded from {}", rows, file.display());
        total += rows;
    }

    engine.commit().await?;
    tracing::info!(
        "Loaded {} rows from {} file(s) into {}",
        total,
        files.len(),
        table
    );

    Ok(total)
}
