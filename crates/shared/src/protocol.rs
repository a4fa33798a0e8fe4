use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::domain::ReviewResult;

pub const REVIEW_ROUTE: &str = "/api/review";
pub const HEALTH_ROUTE: &str = "/healthz";

pub const FILE_FIELD: &str = "zephyr_file";
pub const ACCEPTANCE_CRITERIA_FIELD: &str = "acceptance_criteria";
pub const USER_STORY_FIELD: &str = "user_story";

/// Alert text shown when a failed response carries no `error` message.
pub const FALLBACK_ERROR_MESSAGE: &str = "Unable to review file";

pub const MISSING_FILE_MESSAGE: &str = "Please upload a Zephyr export file.";
pub const NO_CASES_MESSAGE: &str = "No test cases found in uploaded file.";

/// Success body of `POST /api/review`.
///
/// `coverage` stays a raw JSON number so clients can render it verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub review: String,
    pub coverage: Number,
    pub tree: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
}

impl ReviewResponse {
    pub fn from_result(result: ReviewResult, output_file: Option<String>) -> Self {
        Self {
            review: result.review,
            coverage: Number::from(result.coverage),
            tree: result.tree,
            output_file,
        }
    }

    pub fn coverage_label(&self) -> String {
        format!("{}%", self.coverage)
    }
}
