use std::{path::PathBuf, sync::Arc};

use axum::extract::{multipart::MultipartError, Multipart};
use review_engine::{parse_upload, review_testcases, write_report, ReportInput, ReviewModel};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{
        ReviewResponse, ACCEPTANCE_CRITERIA_FIELD, FILE_FIELD, MISSING_FILE_MESSAGE,
        NO_CASES_MESSAGE, USER_STORY_FIELD,
    },
};
use tracing::{info, warn};

#[derive(Clone)]
pub struct ApiContext {
    pub model: Arc<dyn ReviewModel>,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct ReviewSubmission {
    pub acceptance_criteria: String,
    pub user_story: String,
    pub upload: Option<UploadedFile>,
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Drains the multipart body into a [`ReviewSubmission`].
///
/// Unknown fields are skipped. A file part without a file name counts as
/// "no file selected", which is what browsers send for an empty file input.
pub async fn read_submission(mut multipart: Multipart) -> Result<ReviewSubmission, ApiError> {
    let mut submission = ReviewSubmission::default();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        match name.as_str() {
            ACCEPTANCE_CRITERIA_FIELD => {
                submission.acceptance_criteria = field.text().await.map_err(multipart_error)?;
            }
            USER_STORY_FIELD => {
                submission.user_story = field.text().await.map_err(multipart_error)?;
            }
            FILE_FIELD => {
                let filename = field.file_name().map(str::to_owned);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if let Some(filename) = filename.filter(|name| !name.is_empty()) {
                    submission.upload = Some(UploadedFile {
                        filename,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }
    Ok(submission)
}

pub async fn review_submission(
    ctx: &ApiContext,
    submission: ReviewSubmission,
) -> Result<ReviewResponse, ApiError> {
    let ReviewSubmission {
        acceptance_criteria,
        user_story,
        upload,
    } = submission;
    let upload = upload.ok_or_else(|| ApiError::validation(MISSING_FILE_MESSAGE))?;

    let cases = parse_upload(&upload.bytes, &upload.filename).map_err(|error| {
        warn!(filename = %upload.filename, %error, "rejecting unparsable upload");
        ApiError::validation(format!("Unable to parse uploaded file: {error}"))
    })?;
    if cases.is_empty() {
        return Err(ApiError::validation(NO_CASES_MESSAGE));
    }
    info!(filename = %upload.filename, cases = cases.len(), "reviewing upload");

    let result = review_testcases(
        ctx.model.as_ref(),
        &cases,
        &acceptance_criteria,
        &user_story,
    )
    .await;

    let output_dir = ctx.output_dir.clone();
    let report_result = result.clone();
    let report_path = tokio::task::spawn_blocking(move || {
        write_report(
            &output_dir,
            &ReportInput {
                filename: &upload.filename,
                acceptance_criteria: &acceptance_criteria,
                user_story: &user_story,
                result: &report_result,
            },
        )
    })
    .await
    .map_err(|e| ApiError::internal(format!("report task failed: {e}")))?
    .map_err(|e| ApiError::internal(format!("{e:#}")))?;

    let output_file = report_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    Ok(ReviewResponse::from_result(result, output_file))
}

fn multipart_error(err: MultipartError) -> ApiError {
    let code = if err.status() == axum::http::StatusCode::PAYLOAD_TOO_LARGE {
        ErrorCode::PayloadTooLarge
    } else {
        ErrorCode::Validation
    };
    ApiError::new(code, err.body_text())
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
