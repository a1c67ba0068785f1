//! Core logic for csvsink: bulk-loading trees of CSV files into a MySQL
//! table and aggregating over the result.
//!
//! The pipeline is discovery → schema inference → table provisioning → bulk
//! load → single commit, with reporting reading back afterwards. Two
//! boundaries keep it testable headless: every database interaction goes
//! through [`engine::StorageEngine`], and every would-be interactive prompt
//! goes through [`decision::DecisionProvider`].
//!
//! Everything runs strictly sequentially on one connection. Two concurrent
//! runs against the same table can still race the existence-check/create
//! sequence; callers serialize invocations externally.

pub mod aggregate;
pub mod decision;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod identifier;
pub mod loader;
pub mod logging;
pub mod provision;
pub mod schema;

// Re-export commonly used types
pub use aggregate::{AggregateReport, AggregateSpec, Metric, Reducer, aggregate};
pub use decision::{AssumeDefaults, Choice, DecisionProvider, ScriptedDecisions, StdinDecisions};
pub use discovery::{CsvTree, DEFAULT_PATTERN, FilePattern};
pub use engine::{IngestFormat, StorageEngine};
pub use error::{Result, SinkError, redact_database_url};
pub use loader::load_all;
pub use logging::init_logging;
pub use provision::{ProvisionOutcome, provision};
pub use schema::{Column, TableSchema, infer_columns};
