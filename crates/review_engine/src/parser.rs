use std::collections::HashMap;

use serde_json::{Map, Value};
use shared::domain::{TestCase, UploadFormat};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON export: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid CSV export: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON export must be an array of test cases or an object with `testCases`")]
    UnexpectedJsonShape,
    #[error("test case #{index} in JSON export is not an object")]
    CaseNotObject { index: usize },
}

/// Column aliases per test case field, matched against lowercased, trimmed
/// CSV headers. The first alias present wins.
const TITLE_COLUMNS: &[&str] = &["title", "summary", "test case name", "name"];
const STEPS_COLUMNS: &[&str] = &["steps", "test steps"];
const EXPECTED_COLUMNS: &[&str] = &["expected result", "expected", "result"];
const TEST_TYPE_COLUMNS: &[&str] = &["test type", "type"];
const PRECONDITIONS_COLUMNS: &[&str] = &["preconditions", "pre-condition"];
const LABELS_COLUMNS: &[&str] = &["labels", "tags"];

pub fn parse_upload(raw: &[u8], filename: &str) -> Result<Vec<TestCase>, ParseError> {
    let cases = match UploadFormat::from_filename(filename) {
        UploadFormat::Json => parse_json(raw)?,
        UploadFormat::Csv => parse_csv(raw)?,
    };
    debug!(filename, cases = cases.len(), "parsed upload");
    Ok(cases)
}

fn parse_json(raw: &[u8]) -> Result<Vec<TestCase>, ParseError> {
    let payload: Value = serde_json::from_slice(raw)?;
    let entries = match &payload {
        Value::Array(entries) => entries.as_slice(),
        Value::Object(object) => match object.get("testCases") {
            Some(Value::Array(entries)) => entries.as_slice(),
            _ => &[],
        },
        _ => return Err(ParseError::UnexpectedJsonShape),
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let case = entry
                .as_object()
                .ok_or(ParseError::CaseNotObject { index })?;
            Ok(json_case(case))
        })
        .collect()
}

fn json_case(case: &Map<String, Value>) -> TestCase {
    let labels = match case.get("labels") {
        Some(Value::Array(items)) => items
            .iter()
            .map(value_text)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.map(value_text).unwrap_or_default(),
    };

    TestCase {
        title: first_text(case, &["title", "name"]),
        steps: first_text(case, &["steps"]),
        expected: first_text(case, &["expectedResult", "expected"]),
        test_type: first_text(case, &["testType"]),
        preconditions: first_text(case, &["preconditions"]),
        labels,
    }
}

/// Text of the first key holding a truthy value. A whitespace-only string is
/// still truthy, so it wins and trims down to nothing.
fn first_text(case: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|key| case.get(*key))
        .find(|value| is_truthy(value))
        .map(value_text)
        .unwrap_or_default()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(text) => !text.is_empty(),
        Value::Number(number) => number.as_f64() != Some(0.0),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
        Value::Bool(true) => true,
    }
}

/// Renders a JSON value as trimmed text. Falsy values count as absent and
/// booleans read `True` the way the exporting tools print them.
fn value_text(value: &Value) -> String {
    if !is_truthy(value) {
        return String::new();
    }
    match value {
        Value::Bool(_) => "True".to_string(),
        Value::String(text) => text.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

fn parse_csv(raw: &[u8]) -> Result<Vec<TestCase>, ParseError> {
    let text = String::from_utf8_lossy(raw);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns: HashMap<String, usize> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(index, header)| (header.trim().to_lowercase(), index))
        .collect();

    let mut cases = Vec::new();
    for record in reader.records() {
        let record = record?;
        let lookup = |aliases: &[&str]| -> String {
            aliases
                .iter()
                .find_map(|alias| columns.get(*alias))
                .and_then(|index| record.get(*index))
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };
        cases.push(TestCase {
            title: lookup(TITLE_COLUMNS),
            steps: lookup(STEPS_COLUMNS),
            expected: lookup(EXPECTED_COLUMNS),
            test_type: lookup(TEST_TYPE_COLUMNS),
            preconditions: lookup(PRECONDITIONS_COLUMNS),
            labels: lookup(LABELS_COLUMNS),
        });
    }
    Ok(cases)
}

#[cfg(test)]
#[path = "tests/parser_tests.rs"]
mod tests;
