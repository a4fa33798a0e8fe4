use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    Region, ReviewForm, ReviewPage, ReviewView, SubmissionHandler, SubmitEvent, SubmitOutcome,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Submit a Zephyr test case export for review and print the result.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, env = "REVIEW_SERVER_URL", default_value = "http://127.0.0.1:5000")]
    server_url: String,
    /// CSV or JSON export to review.
    #[arg(long)]
    file: Option<PathBuf>,
    #[arg(
        long,
        default_value = "",
        allow_hyphen_values = true,
        conflicts_with = "acceptance_criteria_file"
    )]
    acceptance_criteria: String,
    /// Read acceptance criteria from a file, one criterion per line.
    #[arg(long)]
    acceptance_criteria_file: Option<PathBuf>,
    #[arg(long, default_value = "", allow_hyphen_values = true)]
    user_story: String,
}

/// Prints regions once the output is revealed; alerts go to stderr.
struct TerminalView {
    page: ReviewPage,
}

impl ReviewView for TerminalView {
    fn set_text(&mut self, region: Region, text: &str) {
        self.page.set_text(region, text);
    }

    fn reveal_output(&mut self) {
        self.page.reveal_output();
        for region in [Region::Review, Region::Coverage, Region::Tree] {
            println!("== {} ==\n{}\n", region.id(), self.page.text(region));
        }
    }

    fn alert(&mut self, message: &str) {
        self.page.alert(message);
        eprintln!("alert: {message}");
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let acceptance_criteria = match &args.acceptance_criteria_file {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read acceptance criteria '{}'", path.display()))?,
        None => args.acceptance_criteria.clone(),
    };
    let form = ReviewForm::review(args.file.clone(), acceptance_criteria, args.user_story.clone());

    let handler = SubmissionHandler::new(&args.server_url)?;
    debug!(endpoint = %handler.endpoint(), "submitting review form");

    let mut view = TerminalView {
        page: ReviewPage::new(),
    };
    let outcome = handler
        .on_submit(&mut SubmitEvent::new(), &form, &mut view)
        .await
        .context("review submission failed")?;

    Ok(match outcome {
        SubmitOutcome::Rendered(_) => ExitCode::SUCCESS,
        SubmitOutcome::Rejected { .. } => ExitCode::FAILURE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn criteria_text_and_file_are_exclusive() {
        let err = Args::try_parse_from([
            "review_cli",
            "--acceptance-criteria",
            "- a",
            "--acceptance-criteria-file",
            "criteria.txt",
        ])
        .expect_err("should conflict");
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn bullet_list_criteria_are_accepted() {
        let args = Args::try_parse_from([
            "review_cli",
            "--acceptance-criteria",
            "- can log in\n- can log out",
            "--user-story",
            "-x",
        ])
        .expect("args");
        assert_eq!(args.acceptance_criteria, "- can log in\n- can log out");
        assert_eq!(args.user_story, "-x");
    }

    #[test]
    fn file_and_story_are_optional() {
        let args = Args::try_parse_from(["review_cli", "--server-url", "http://localhost:1"])
            .expect("args");
        assert!(args.file.is_none());
        assert_eq!(args.user_story, "");
        assert_eq!(args.server_url, "http://localhost:1");
    }

    #[test]
    fn terminal_view_tracks_page_state() {
        let mut view = TerminalView {
            page: ReviewPage::new(),
        };
        view.set_text(Region::Coverage, "40%");
        view.alert("bad file");
        assert_eq!(view.page.text(Region::Coverage), "40%");
        assert_eq!(view.page.last_alert(), Some("bad file"));
        assert!(!view.page.output_visible());
    }
}
