//! Grouped aggregate queries over a loaded table.
//!
//! One query is issued per requested metric, all sharing the same group-by
//! column and filter predicate, and the per-metric rows are joined by group
//! label into a single report. Every column is loaded as TEXT, so select
//! expressions are cast back to CHAR and numeric work happens server-side.
//!
//! Known caveat, carried deliberately: the join assumes every query returns
//! the same key set. A label that first appears in a later query's result is
//! not retrofitted into the report; it is dropped and counted in
//! [`AggregateReport::dropped_labels`].

use std::collections::HashMap;

use serde::Serialize;

use crate::engine::StorageEngine;
use crate::error::{Result, SinkError};
use crate::identifier::quote;

/// Server-side reduction applied to a metric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    /// `SUM(column)`
    Sum,
    /// `MIN(column)`
    Min,
    /// `MAX(column)`
    Max,
    /// `AVG(column)`
    Avg,
    /// `COUNT(column)`
    Count,
}

impl Reducer {
    fn sql_name(self) -> &'static str {
        match self {
            Self::Sum => "SUM",
            Self::Min => "MIN",
            Self::Max => "MAX",
            Self::Avg => "AVG",
            Self::Count => "COUNT",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Min => "min",
            Self::Max => "max",
            Self::Avg => "avg",
            Self::Count => "count",
        }
    }
}

/// One requested statistic: a column, a reducer, and an optional unit divisor
/// (e.g. 1000 to report thousands).
#[derive(Debug, Clone)]
pub struct Metric {
    /// Column the reducer is applied to
    pub column: String,
    /// Server-side reduction
    pub reducer: Reducer,
    /// Optional divisor applied to the reduced value
    pub divisor: Option<f64>,
}

impl Metric {
    /// Column label used for this metric in the report, e.g. `sum price`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.reducer.label(), self.column)
    }
}

/// A full aggregation request against one table.
#[derive(Debug, Clone)]
pub struct AggregateSpec {
    /// Column to group by; its values become the report's row labels
    pub group_by: String,
    /// Statistics to compute, one query each
    pub metrics: Vec<Metric>,
    /// Optional raw SQL predicate shared by every query
    pub filter: Option<String>,
}

impl AggregateSpec {
    /// Filter predicate excluding rows whose `column` holds an embedded
    /// comma-separated list — the data-quality guard for scraped inputs
    /// where several values ended up in one cell.
    #[must_use]
    pub fn embedded_list_guard(column: &str) -> String {
        format!("{} NOT LIKE '%,%'", quote(column))
    }
}

/// Joined result rows plus their column labels.
#[derive(Debug, Clone, Serialize)]
pub struct AggregateReport {
    /// Group-by label followed by one label per metric
    pub columns: Vec<String>,
    /// One row per group value seen by the first metric's query
    pub rows: Vec<Vec<String>>,
    /// Labels seen only by later queries and therefore lost by the join
    pub dropped_labels: usize,
}

/// Builds the grouped query for one metric.
fn metric_sql(table: &str, spec: &AggregateSpec, metric: &Metric) -> String {
    let group = quote(&spec.group_by);
    let mut expr = format!("{}({})", metric.reducer.sql_name(), quote(&metric.column));
    if let Some(divisor) = metric.divisor {
        expr = format!("{expr} / {divisor}");
    }
    let filter = spec
        .filter
        .as_deref()
        .map(|predicate| format!(" WHERE {predicate}"))
        .unwrap_or_default();
    format!(
        "SELECT CAST({group} AS CHAR), CAST({expr} AS CHAR) FROM {table}{filter} GROUP BY {group}"
    )
}

/// Runs every metric query and joins the rows by group label.
///
/// # Errors
/// Returns a configuration error for an empty metric list and propagates any
/// query failure.
pub async fn aggregate(
    engine: &mut dyn StorageEngine,
    table: &str,
    spec: &AggregateSpec,
) -> Result<AggregateReport> {
    if spec.metrics.is_empty() {
        return Err(SinkError::configuration(
            "at least one metric is required for aggregation",
        ));
    }

    let mut columns = vec![spec.group_by.clone()];
    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut index_by_label: HashMap<String, usize> = HashMap::new();
    let mut dropped_labels = 0usize;

    for (metric_index, metric) in spec.metrics.iter().enumerate() {
        let sql = metric_sql(table, spec, metric);
        tracing::debug!("Aggregation query: {}", sql);
        let fetched = engine.fetch_rows(&sql).await?;
        columns.push(metric.label());

        if metric_index == 0 {
            for row in fetched {
                let mut cells = row.into_iter().map(Option::unwrap_or_default);
                let label = cells.next().unwrap_or_default();
                let value = cells.next().unwrap_or_default();
                index_by_label.insert(label.clone(), rows.len());
                rows.push(vec![label, value]);
            }
            continue;
        }

        // Join by label into the key set the first query established.
        let mut seen = vec![false; rows.len()];
        for row in fetched {
            let mut cells = row.into_iter().map(Option::unwrap_or_default);
            let label = cells.next().unwrap_or_default();
            let value = cells.next().unwrap_or_default();
            if let Some(&at) = index_by_label.get(&label) {
                rows[at].push(value);
                seen[at] = true;
            } else {
                dropped_labels += 1;
            }
        }
        // Keep rows rectangular when a label vanished from this query.
        for (at, was_seen) in seen.iter().enumerate() {
            if !was_seen {
                rows[at].push(String::new());
            }
        }
    }

    if dropped_labels > 0 {
        tracing::warn!(
            "{} group label(s) appeared only in later metric queries and were dropped",
            dropped_labels
        );
    }

    Ok(AggregateReport {
        columns,
        rows,
        dropped_labels,
    })
}
