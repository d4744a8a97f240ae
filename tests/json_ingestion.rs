use deal_pipeline::ingestion::json::{ingest_json_from_path, ingest_json_from_str};
use deal_pipeline::types::{Schema, Value};

#[test]
fn ingest_ndjson_from_path_unions_columns() {
    let ds = ingest_json_from_path("tests/fixtures/deals.ndjson").unwrap();

    assert_eq!(ds.row_count(), 3);
    assert_eq!(
        ds.schema,
        Schema::new([
            "Deal ID",
            "Primary Supply Vertical",
            "Revenue",
            "Market Date",
            "SmartShare Enabled?",
            "Region",
        ])
    );
    assert_eq!(ds.rows[0][2], Value::Number(2_500_000.0));
    assert_eq!(ds.rows[1][2], Value::text("$900,000"));
    assert_eq!(ds.rows[2][2], Value::Null);
    assert_eq!(ds.rows[0][5], Value::Null);
    assert_eq!(ds.rows[2][5], Value::text("West"));
}

#[test]
fn ingest_json_array_of_objects() {
    let input = r#"[{"Deal ID":"D1","SmartShare Enabled?":true},{"Deal ID":"D2","SmartShare Enabled?":"TRUE"}]"#;
    let ds = ingest_json_from_str(input).unwrap();
    assert_eq!(ds.row_count(), 2);
    assert_eq!(ds.rows[0][1], Value::Bool(true));
    // JSON strings are never re-typed.
    assert_eq!(ds.rows[1][1], Value::text("TRUE"));
}

#[test]
fn ingest_json_errors_on_invalid_ndjson_line() {
    let input = "{\"a\": 1}\n{not json}\n";
    let err = ingest_json_from_str(input).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("schema mismatch"));
    assert!(msg.contains("invalid ndjson at line 2"));
}

#[test]
fn ingest_json_errors_on_missing_file() {
    let err = ingest_json_from_path("tests/fixtures/does_not_exist.json").unwrap_err();
    assert!(err.to_string().contains("io error"));
}
