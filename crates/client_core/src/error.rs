use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop a submission before anything is rendered.
///
/// A non-2xx answer from the server is not one of these: it is reported to
/// the view as an alert and returned as [`crate::SubmitOutcome::Rejected`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to read form file '{}': {source}", path.display())]
    Form {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid server url '{url}': {source}")]
    InvalidServerUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("review request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("review response could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
