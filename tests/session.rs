use std::sync::Arc;

use deal_pipeline::ingestion::{ingest_from_path, IngestionOptions};
use deal_pipeline::pipeline::{Pipeline, TracingPipelineObserver};
use deal_pipeline::session::DealSession;
use deal_pipeline::spec::{NumericRange, SortDirection};
use deal_pipeline::types::Value;

fn load(path: &str) -> deal_pipeline::types::DataSet {
    ingest_from_path(path, &IngestionOptions::default()).unwrap()
}

#[test]
fn reload_from_another_feed_keeps_csv_columns() {
    let pipeline = Pipeline::default().with_observer(Arc::new(TracingPipelineObserver));
    let mut session = DealSession::new(pipeline);
    session.replace_dataset(load("tests/fixtures/deals.csv"));
    let columns = session.dataset().schema.clone();

    session.replace_dataset(load("tests/fixtures/deals.ndjson"));
    let ds = session.dataset();
    assert_eq!(session.version(), 2);
    assert_eq!(ds.schema, columns);
    assert_eq!(ds.row_count(), 3);

    let owner = ds.schema.index_of("Account Owner").unwrap();
    let revenue = ds.schema.index_of("Revenue").unwrap();
    assert_eq!(ds.rows[0][owner], Value::Null);
    assert_eq!(ds.rows[1][revenue], Value::text("$900,000"));
}

#[test]
fn header_click_flow_recomputes_sorted_view() {
    let mut session = DealSession::default();
    session.replace_dataset(load("tests/fixtures/deals.csv"));
    session.spec_mut().filter.revenue_range = Some(NumericRange::new(2_000_000.0, 5_000_000.0));

    session.toggle_sort("Revenue");
    let first = |s: &mut DealSession| s.output().sorted.rows[0][0].clone();
    assert_eq!(first(&mut session), Value::text("D09"));

    assert_eq!(session.toggle_sort("Revenue").direction, SortDirection::Desc);
    assert_eq!(first(&mut session), Value::text("D03"));

    // D06 has no revenue; raw values sort after numbers, so it leads a descending sort.
    session.reset_filters();
    assert_eq!(first(&mut session), Value::text("D06"));
    assert_eq!(session.output().sorted.rows[1][0], Value::text("D05"));
    assert_eq!(session.output().filtered.row_count(), 10);
}

#[test]
fn metrics_accumulate_per_run_not_per_call() {
    let pipeline = Pipeline::default();
    let metrics = pipeline.metrics();
    let mut session = DealSession::new(pipeline);
    session.replace_dataset(load("tests/fixtures/deals.csv"));

    let _ = session.output();
    let _ = session.output();
    assert_eq!(metrics.snapshot().run_id, 1);

    session.clear_sort();
    session.toggle_sort("EBITDA");
    let _ = session.output();
    assert_eq!(metrics.snapshot().run_id, 2);
}
