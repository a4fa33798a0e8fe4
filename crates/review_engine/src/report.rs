use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::{DateTime, Utc};
use shared::domain::ReviewResult;
use tracing::info;

pub const REPORT_FILE_NAME: &str = "output.md";
const NOT_PROVIDED: &str = "_Not provided_";

pub struct ReportInput<'a> {
    pub filename: &'a str,
    pub acceptance_criteria: &'a str,
    pub user_story: &'a str,
    pub result: &'a ReviewResult,
}

pub fn render_report(input: &ReportInput<'_>, generated_at: DateTime<Utc>) -> String {
    let timestamp = generated_at.format("%Y-%m-%d %H:%M:%S UTC");
    let acceptance_criteria = or_not_provided(input.acceptance_criteria);
    let user_story = or_not_provided(input.user_story);
    format!(
        "# Testcase Review Output\n\n\
         - Generated at: {timestamp}\n\
         - Source file: {filename}\n\
         - Coverage: {coverage}%\n\n\
         ## Acceptance Criteria\n\n\
         {acceptance_criteria}\n\n\
         ## User Story\n\n\
         {user_story}\n\n\
         ## Review Comments\n\n\
         {review}\n\n\
         ## Coverage Tree\n\n\
         ```\n\
         {tree}\n\
         ```\n",
        filename = input.filename,
        coverage = input.result.coverage,
        review = input.result.review,
        tree = input.result.tree,
    )
}

fn or_not_provided(text: &str) -> &str {
    match text.trim() {
        "" => NOT_PROVIDED,
        trimmed => trimmed,
    }
}

/// Writes the Markdown report into `output_dir`, replacing any previous one.
pub fn write_report(output_dir: &Path, input: &ReportInput<'_>) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(output_dir).with_context(|| {
        format!(
            "failed to create report directory '{}'",
            output_dir.display()
        )
    })?;
    let path = output_dir.join(REPORT_FILE_NAME);
    fs::write(&path, render_report(input, Utc::now()))
        .with_context(|| format!("failed to write report '{}'", path.display()))?;
    info!(path = %path.display(), "review report written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn result() -> ReviewResult {
        ReviewResult {
            review: "- TC1: ok".into(),
            coverage: 50,
            tree: "    |||\n  🍃🍃🍃🍃🍃\n    |||\n    |||".into(),
        }
    }

    #[test]
    fn report_lists_inputs_and_fences_the_tree() {
        let result = result();
        let input = ReportInput {
            filename: "export.csv",
            acceptance_criteria: "  - can log in\n",
            user_story: "   ",
            result: &result,
        };
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let report = render_report(&input, at);

        assert!(report.starts_with("# Testcase Review Output\n\n"));
        assert!(report.contains("- Generated at: 2024-05-01 12:30:00 UTC\n"));
        assert!(report.contains("- Source file: export.csv\n"));
        assert!(report.contains("- Coverage: 50%\n"));
        assert!(report.contains("## Acceptance Criteria\n\n- can log in\n\n"));
        assert!(report.contains("## User Story\n\n_Not provided_\n\n"));
        assert!(report.contains("## Review Comments\n\n- TC1: ok\n\n"));
        assert!(report.ends_with("```\n    |||\n  🍃🍃🍃🍃🍃\n    |||\n    |||\n```\n"));
    }

    #[test]
    fn write_report_creates_directory_and_overwrites() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output_dir = dir.path().join("outputs");
        let result = result();
        let input = ReportInput {
            filename: "a.csv",
            acceptance_criteria: "",
            user_story: "",
            result: &result,
        };

        let path = write_report(&output_dir, &input).expect("first write");
        let second = ReportInput {
            filename: "b.csv",
            ..input
        };
        write_report(&output_dir, &second).expect("second write");

        assert_eq!(path, output_dir.join(REPORT_FILE_NAME));
        let written = fs::read_to_string(&path).expect("read");
        assert!(written.contains("- Source file: b.csv"));
    }
}
