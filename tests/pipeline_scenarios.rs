use chrono::NaiveDate;

use deal_pipeline::ingestion::csv::ingest_csv_from_path;
use deal_pipeline::pipeline::{run, Pipeline};
use deal_pipeline::spec::{DateRange, FlagFilter, NumericRange, PipelineSpec, SortSpec};
use deal_pipeline::types::{DataSet, Schema, Value};

fn fixture() -> DataSet {
    ingest_csv_from_path("tests/fixtures/deals.csv").unwrap()
}

fn ids(ds: &DataSet) -> Vec<String> {
    let id = ds.schema.index_of("Deal ID").unwrap();
    ds.rows.iter().map(|r| r[id].as_text().into_owned()).collect()
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn flags(smartshare: Value, inbound: Value) -> DataSet {
    DataSet::new(
        Schema::new(["Deal ID", "SmartShare Enabled?", "Inbound Inquiry Enabled?"]),
        vec![vec![Value::text("D1"), smartshare, inbound]],
    )
}

fn both_flags_required() -> PipelineSpec {
    let mut spec = PipelineSpec::default();
    spec.filter.include_smartshare_enabled = FlagFilter::RequireTrue;
    spec.filter.include_inbound_inquiry_enabled = FlagFilter::RequireTrue;
    spec
}

#[test]
fn revenue_range_keeps_only_records_inside_bounds() {
    let ds = DataSet::new(
        Schema::new(["Deal ID", "Revenue"]),
        vec![
            vec![Value::text("low"), Value::Number(1_000_000.0)],
            vec![Value::text("mid"), Value::Number(3_000_000.0)],
        ],
    );
    let mut spec = PipelineSpec::default();
    spec.filter.revenue_range = Some(NumericRange::new(2_000_000.0, 5_000_000.0));

    assert_eq!(ids(&run(&ds, &spec).filtered), vec!["mid"]);
}

#[test]
fn revenue_range_on_feed_coerces_formatted_values() {
    let mut spec = PipelineSpec::default();
    spec.filter.revenue_range = Some(NumericRange::new(2_000_000.0, 5_000_000.0));

    // D05 is "$6,200,000"; D06 has no revenue and reads as 0.
    let out = run(&fixture(), &spec);
    assert_eq!(ids(&out.filtered), vec!["D02", "D03", "D04", "D08", "D09"]);
}

#[test]
fn requiring_both_flags_passes_either_flag() {
    let out = run(&flags(Value::text("TRUE"), Value::Number(0.0)), &both_flags_required());
    assert_eq!(out.filtered.row_count(), 1);
}

#[test]
fn requiring_both_flags_excludes_neither_flag() {
    let out = run(&flags(Value::Bool(false), Value::Bool(false)), &both_flags_required());
    assert!(out.filtered.is_empty());
    assert_eq!(out.summary, None);
}

#[test]
fn requiring_both_flags_on_feed() {
    let out = run(&fixture(), &both_flags_required());
    assert_eq!(
        ids(&out.filtered),
        vec!["D01", "D02", "D03", "D04", "D07", "D08", "D09"]
    );
}

#[test]
fn unparseable_market_dates_are_never_excluded() {
    let ds = DataSet::new(
        Schema::new(["Deal ID", "Market Date"]),
        vec![
            vec![Value::text("valid"), Value::text("1/5/2024")],
            vec![Value::text("invalid"), Value::text("13/40/2024")],
        ],
    );
    let mut spec = PipelineSpec::default();
    spec.filter.market_date_range = Some(DateRange::between(ymd(2024, 1, 1), ymd(2024, 1, 10)));
    assert_eq!(ids(&run(&ds, &spec).filtered), vec!["valid", "invalid"]);

    spec.filter.market_date_range = Some(DateRange::between(ymd(2024, 2, 1), ymd(2024, 2, 28)));
    assert_eq!(ids(&run(&ds, &spec).filtered), vec!["invalid"]);
}

#[test]
fn market_date_range_on_feed_is_inclusive() {
    let mut spec = PipelineSpec::default();
    spec.filter.market_date_range = Some(DateRange::between(ymd(2024, 1, 1), ymd(2024, 1, 10)));

    // D03 has an impossible date and D05 none at all.
    let out = run(&fixture(), &spec);
    assert_eq!(ids(&out.filtered), vec!["D01", "D03", "D05", "D08", "D10"]);
}

#[test]
fn vertical_groups_ordered_by_descending_count() {
    let spec = PipelineSpec {
        group_by: vec!["Primary Supply Vertical".to_string()],
        ..PipelineSpec::default()
    };
    let out = run(&fixture(), &spec);

    let view = out.aggregate("Primary Supply Vertical").unwrap();
    let groups: Vec<(&str, usize, f64)> = view
        .groups
        .iter()
        .map(|g| (g.label.as_str(), g.count, g.percentage))
        .collect();
    assert_eq!(groups, vec![("Retail", 6, 60.0), ("Industrial", 4, 40.0)]);
}

#[test]
fn deal_intent_filters_ignore_case() {
    let mut spec = PipelineSpec::default();
    spec.filter.deal_intent_statuses.insert("ACTIVE".to_string());
    let out = run(&fixture(), &spec);
    assert_eq!(ids(&out.filtered), vec!["D01", "D02", "D04", "D06", "D08", "D09"]);

    let mut spec = PipelineSpec::default();
    spec.filter.deal_intent_types.insert("recap".to_string());
    let out = run(&fixture(), &spec);
    assert_eq!(ids(&out.filtered), vec!["D02", "D09"]);
}

#[test]
fn market_date_sort_puts_dates_first_in_calendar_order() {
    let spec = PipelineSpec {
        sort: SortSpec::ascending("Market Date"),
        ..PipelineSpec::default()
    };
    let out = run(&fixture(), &spec);
    assert_eq!(
        ids(&out.sorted),
        vec!["D04", "D06", "D01", "D08", "D10", "D02", "D09", "D07", "D03", "D05"]
    );
    // The filtered view keeps dataset order.
    assert_eq!(ids(&out.filtered)[0], "D01");
}

#[test]
fn summary_treats_missing_values_as_zero() {
    let out = run(&fixture(), &PipelineSpec::default());
    let summary = out.summary.unwrap();

    assert_eq!(summary.record_count, 10);
    assert_eq!(summary.field("Revenue").unwrap().sum, 25_850_000.0);
    assert_eq!(summary.field("Revenue").unwrap().average, 2_585_000.0);
    assert_eq!(summary.field("EBITDA").unwrap().sum, 2_245_000.0);
    assert_eq!(summary.field("EBITDA").unwrap().average, 224_500.0);
}

#[test]
fn saved_spec_file_drives_a_full_run() {
    let spec = PipelineSpec::from_path("tests/fixtures/spec.json").unwrap();
    let out = Pipeline::default().run(&fixture(), &spec);

    // Retail within [2M, 5M], minus the broker-owned D02.
    assert_eq!(ids(&out.filtered), vec!["D04", "D08"]);
    assert_eq!(ids(&out.sorted), vec!["D08", "D04"]);

    let regions = out.aggregate("Region").unwrap();
    let labels: Vec<&str> = regions.groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["South", "West"]);
    assert_eq!(out.aggregates.len(), 1);

    let summary = out.summary.as_ref().unwrap();
    assert_eq!(summary.field("Revenue").unwrap().average, 3_200_000.0);
    assert_eq!(summary.field("EBITDA").unwrap().sum, 640_000.0);
}

#[test]
fn output_serializes_to_json() {
    let spec = PipelineSpec {
        group_by: vec!["Region".to_string()],
        ..PipelineSpec::default()
    };
    let out = run(&fixture(), &spec);
    let json = serde_json::to_value(&out).unwrap();

    assert_eq!(json["filtered"]["rows"].as_array().unwrap().len(), 10);
    assert_eq!(json["aggregates"][0]["field"], "Region");
    assert_eq!(json["summary"]["recordCount"], 10);
    assert_eq!(json["sorted"]["rows"][0][0], "D01");
}
