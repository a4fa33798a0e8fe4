use shared::domain::{ReviewResult, TestCase};
use tracing::{info, warn};

use crate::{
    coverage::{compute_coverage, render_tree},
    llm::ReviewModel,
};

const REVIEW_INSTRUCTIONS: &str = "You are a senior QA reviewer. Review the Zephyr test cases below \
against the acceptance criteria and user story. For each test case, comment on title clarity, \
step granularity, expected results, test type, preconditions and labels. Point out acceptance \
criteria that no test case covers. Answer as a Markdown bullet list, one finding per bullet, and \
finish with two short, good-humoured closing remarks.";

pub fn build_prompt(cases: &[TestCase], acceptance_criteria: &str, user_story: &str) -> String {
    let cases_json = serde_json::to_string_pretty(cases).unwrap_or_default();
    format!(
        "{REVIEW_INSTRUCTIONS}\n\n\
         Acceptance Criteria:\n{acceptance_criteria}\n\n\
         User Story:\n{user_story}\n\n\
         Test Cases:\n{cases_json}\n"
    )
}

/// Reviews `cases`, preferring the model's comments and falling back to the
/// built-in heuristic when the model fails or stays silent.
pub async fn review_testcases(
    model: &dyn ReviewModel,
    cases: &[TestCase],
    acceptance_criteria: &str,
    user_story: &str,
) -> ReviewResult {
    let prompt = build_prompt(cases, acceptance_criteria, user_story);
    let model_output = match model.generate(&prompt).await {
        Ok(output) => output,
        Err(error) => {
            warn!(%error, "llm review failed; using heuristic review");
            String::new()
        }
    };

    let coverage = compute_coverage(cases.len(), acceptance_criteria);
    let review = match model_output.trim() {
        "" => heuristic_review(cases),
        trimmed => trimmed.to_string(),
    };
    info!(cases = cases.len(), coverage, "review complete");

    ReviewResult {
        review,
        coverage,
        tree: render_tree(coverage),
    }
}

pub fn heuristic_review(cases: &[TestCase]) -> String {
    let mut bullets = Vec::new();
    for (i, case) in cases.iter().enumerate() {
        let tc = format!("TC{}", i + 1);

        if case.title.chars().count() < 10 {
            bullets.push(format!(
                "- {tc}: Title is tiny; give it enough detail so future-you doesn't need detective mode."
            ));
        } else {
            bullets.push(format!("- {tc}: Title is clear and readable—nice start."));
        }

        if case.steps.lines().count() < 2 && case.steps.split('.').count() < 3 {
            bullets.push(format!(
                "- {tc}: Steps look compact; split actions into atomic steps for easier debugging."
            ));
        }
        if case.expected.is_empty() {
            bullets.push(format!(
                "- {tc}: Expected result is missing—this test currently grades itself on vibes."
            ));
        }
        if case.test_type.is_empty() {
            bullets.push(format!(
                "- {tc}: Add a test type so reports can separate smoke from full-course regression."
            ));
        }
        if case.preconditions.is_empty() {
            bullets.push(format!(
                "- {tc}: Preconditions are absent; setup context helps avoid flaky surprises."
            ));
        }
        if case.labels.is_empty() {
            bullets.push(format!(
                "- {tc}: Labels are empty; tags make triage and analytics way faster."
            ));
        }
    }

    bullets.push(
        "- Roast 1: These tests are close to greatness—they just need less mystery and more specificity."
            .to_string(),
    );
    bullets.push(
        "- Roast 2: Your coverage ambition is strong; your metadata just called asking for equal attention."
            .to_string(),
    );
    bullets.join("\n")
}

#[cfg(test)]
#[path = "tests/reviewer_tests.rs"]
mod tests;
