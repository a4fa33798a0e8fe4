//! Client side of the review service: turns one form submission into one
//! `POST /api/review` round trip and renders the answer into a view.

use reqwest::{Client, StatusCode};
use serde_json::Value;
use shared::protocol::{ReviewResponse, FALLBACK_ERROR_MESSAGE, REVIEW_ROUTE};
use tracing::{info, warn};
use url::Url;

pub mod error;
pub mod form;
pub mod view;

pub use error::{ClientError, Result};
pub use form::{FileField, FilePart, FormPayload, ReviewForm};
pub use view::{Region, ReviewPage, ReviewView};

/// Context of one user-initiated submission.
#[derive(Debug, Default)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// 2xx answer, written into the view and output revealed.
    Rendered(ReviewResponse),
    /// Non-2xx answer, surfaced through [`ReviewView::alert`].
    Rejected { status: StatusCode, message: String },
}

/// Handles review form submissions against one server.
///
/// Holds no per-submission state, so overlapping submissions are allowed and
/// finish in whatever order the server answers.
#[derive(Debug, Clone)]
pub struct SubmissionHandler {
    http: Client,
    endpoint: Url,
}

impl SubmissionHandler {
    pub fn new(server_url: &str) -> Result<Self> {
        Self::with_client(server_url, Client::new())
    }

    pub fn with_client(server_url: &str, http: Client) -> Result<Self> {
        let endpoint = Url::parse(server_url)
            .and_then(|base| base.join(REVIEW_ROUTE))
            .map_err(|source| ClientError::InvalidServerUrl {
                url: server_url.to_string(),
                source,
            })?;
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Runs one submission: suppress the default action, post the form as
    /// multipart, then render the review or alert the server's error.
    ///
    /// Transport and parse failures are returned without touching the view.
    pub async fn on_submit<V: ReviewView + ?Sized>(
        &self,
        event: &mut SubmitEvent,
        form: &ReviewForm,
        view: &mut V,
    ) -> Result<SubmitOutcome> {
        event.prevent_default();

        let payload = form.snapshot().await?;
        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(payload.into_multipart()?)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        let payload: Value = serde_json::from_slice(&body)?;

        if !status.is_success() {
            let message = error_message(&payload);
            warn!(%status, %message, "review rejected");
            view.alert(&message);
            return Ok(SubmitOutcome::Rejected { status, message });
        }

        let review: ReviewResponse = serde_json::from_value(payload)?;
        render(view, &review);
        info!(coverage = %review.coverage, "review rendered");
        Ok(SubmitOutcome::Rendered(review))
    }
}

fn error_message(payload: &Value) -> String {
    match payload.get("error") {
        Some(Value::String(message)) if !message.is_empty() => message.clone(),
        _ => FALLBACK_ERROR_MESSAGE.to_string(),
    }
}

fn render<V: ReviewView + ?Sized>(view: &mut V, review: &ReviewResponse) {
    view.set_text(Region::Review, &review.review);
    view.set_text(Region::Coverage, &review.coverage_label());
    view.set_text(Region::Tree, &review.tree);
    view.reveal_output();
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
