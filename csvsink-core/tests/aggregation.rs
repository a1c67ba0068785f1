//! Aggregation query fan-out and join-by-label behavior.

#![allow(clippy::unwrap_used)]

mod common;

use common::MockEngine;
use csvsink_core::aggregate::{AggregateSpec, Metric, Reducer, aggregate};

fn two_metric_spec() -> AggregateSpec {
    AggregateSpec {
        group_by: "Title".to_string(),
        metrics: vec![
            Metric {
                column: "full_price".to_string(),
                reducer: Reducer::Min,
                divisor: None,
            },
            Metric {
                column: "full_price".to_string(),
                reducer: Reducer::Max,
                divisor: None,
            },
        ],
        filter: Some(AggregateSpec::embedded_list_guard("appid")),
    }
}

fn rows(pairs: &[(&str, &str)]) -> Vec<Vec<Option<String>>> {
    pairs
        .iter()
        .map(|(label, value)| vec![Some((*label).to_string()), Some((*value).to_string())])
        .collect()
}

#[tokio::test]
async fn one_query_per_metric_sharing_the_filter() {
    let mut engine = MockEngine::default();
    engine.canned_rows.push_back(rows(&[("Halo", "10")]));
    engine.canned_rows.push_back(rows(&[("Halo", "60")]));

    let report = aggregate(&mut engine, "steam", &two_metric_spec())
        .await
        .unwrap();

    assert_eq!(engine.queries.len(), 2);
    for query in &engine.queries {
        assert!(query.contains("WHERE `appid` NOT LIKE '%,%'"));
        assert!(query.contains("GROUP BY `Title`"));
    }
    assert_eq!(report.columns, vec!["Title", "min full_price", "max full_price"]);
    assert_eq!(report.rows, vec![vec![
        "Halo".to_string(),
        "10".to_string(),
        "60".to_string()
    ]]);
}

#[tokio::test]
async fn labels_only_in_later_queries_are_dropped_and_counted() {
    let mut engine = MockEngine::default();
    engine.canned_rows.push_back(rows(&[("Halo", "10"), ("Myst", "5")]));
    engine
        .canned_rows
        .push_back(rows(&[("Halo", "60"), ("Doom", "99")]));

    let report = aggregate(&mut engine, "steam", &two_metric_spec())
        .await
        .unwrap();

    // Doom appeared only in the second query: silently lost, but counted.
    assert_eq!(report.dropped_labels, 1);
    assert_eq!(report.rows.len(), 2);
    // Myst vanished from the second query; its cell stays empty.
    assert_eq!(report.rows[1], vec![
        "Myst".to_string(),
        "5".to_string(),
        String::new()
    ]);
}

#[tokio::test]
async fn empty_metric_list_is_a_configuration_error() {
    let mut engine = MockEngine::default();
    let spec = AggregateSpec {
        group_by: "Title".to_string(),
        metrics: vec![],
        filter: None,
    };

    assert!(aggregate(&mut engine, "steam", &spec).await.is_err());
    assert!(engine.queries.is_empty());
}

#[tokio::test]
async fn null_aggregate_values_render_as_empty_text() {
    let mut engine = MockEngine::default();
    engine
        .canned_rows
        .push_back(vec![vec![Some("Halo".to_string()), None]]);

    let spec = AggregateSpec {
        group_by: "Title".to_string(),
        metrics: vec![Metric {
            column: "full_price".to_string(),
            reducer: Reducer::Sum,
            divisor: None,
        }],
        filter: None,
    };

    let report = aggregate(&mut engine, "steam", &spec).await.unwrap();
    assert_eq!(report.rows, vec![vec!["Halo".to_string(), String::new()]]);
}
