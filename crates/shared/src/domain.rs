use serde::{Deserialize, Serialize};

/// One test case normalized from a Zephyr export, CSV or JSON alike.
///
/// Every field is plain text and empty when the export did not carry it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub title: String,
    pub steps: String,
    pub expected: String,
    pub test_type: String,
    pub preconditions: String,
    pub labels: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadFormat {
    Csv,
    Json,
}

impl UploadFormat {
    pub fn from_filename(filename: &str) -> Self {
        if filename.to_ascii_lowercase().ends_with(".json") {
            Self::Json
        } else {
            Self::Csv
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewResult {
    pub review: String,
    pub coverage: u32,
    pub tree: String,
}
