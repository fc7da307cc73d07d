//! End-to-end tests for building request files from a case table

use drugledger_extractor::{
    ExtractionSchema, ExtractorError, RequestBuilder, RequestConfig, SystemPrompt,
};
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn default_builder() -> RequestBuilder {
    let config = RequestConfig::default();
    let schema = ExtractionSchema::standard(&config.schema_name);
    RequestBuilder::new(config, schema, SystemPrompt::default()).unwrap()
}

#[test]
fn test_run_writes_schema_and_requests() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cases.csv");
    fs::write(
        &input,
        "case_number,judgment,court\n1234,被告人持有冰毒5.2克,A\n1235,,B\n1236,海洛因10克,C\n",
    )
    .unwrap();

    let requests = dir.path().join("out/batch_requests.jsonl");
    let schema = dir.path().join("out/schema.json");

    let summary = default_builder().run(&input, &requests, &schema).unwrap();
    assert_eq!(summary.rows, 3);

    let content = fs::read_to_string(&requests).unwrap();
    let lines: Vec<Value> = content
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["custom_id"], "case-1234");
    assert_eq!(lines[1]["custom_id"], "case-1235");
    assert_eq!(lines[2]["custom_id"], "case-1236");
    assert_eq!(lines[1]["body"]["input"][1]["content"], "case_id=1235\n");

    let schema_doc: Value = serde_json::from_str(&fs::read_to_string(&schema).unwrap()).unwrap();
    assert_eq!(schema_doc["name"], "CaseDrugExtraction");
    assert_eq!(schema_doc["type"], "json_schema");
    assert_eq!(schema_doc["strict"], true);
}

#[test]
fn test_missing_column_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cases.csv");
    fs::write(&input, "case_number,text\n1,abc\n").unwrap();

    let requests = dir.path().join("batch_requests.jsonl");
    let schema = dir.path().join("schema.json");

    let err = default_builder().run(&input, &requests, &schema).unwrap_err();
    assert!(matches!(err, ExtractorError::MissingColumn(_)));
    assert!(!requests.exists());
    assert!(!schema.exists());
}

#[test]
fn test_empty_table_still_writes_schema() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("cases.csv");
    fs::write(&input, "case_number,judgment\n").unwrap();

    let requests = dir.path().join("batch_requests.jsonl");
    let schema = dir.path().join("schema.json");

    let summary = default_builder().run(&input, &requests, &schema).unwrap();
    assert_eq!(summary.rows, 0);
    assert!(schema.exists());
    assert_eq!(fs::read_to_string(&requests).unwrap(), "");
}
