//! Review pipeline for uploaded Zephyr exports: parse the cases, score
//! coverage against the acceptance criteria, collect review comments and
//! write the Markdown report.

pub mod coverage;
pub mod llm;
pub mod parser;
pub mod report;
pub mod reviewer;

pub use coverage::{compute_coverage, render_tree};
pub use llm::{LlmClient, LlmSettings, Provider, ReviewModel};
pub use parser::{parse_upload, ParseError};
pub use report::{write_report, ReportInput, REPORT_FILE_NAME};
pub use reviewer::{heuristic_review, review_testcases};
