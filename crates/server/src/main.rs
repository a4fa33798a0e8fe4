use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use review_engine::LlmClient;
use shared::{
    error::{ApiError, ErrorBody, ErrorCode},
    protocol::{ReviewResponse, HEALTH_ROUTE, REVIEW_ROUTE},
};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;

use api::{read_submission, review_submission, ApiContext};
use app_state::AppState;
use config::load_settings;

type HttpError = (StatusCode, Json<ErrorBody>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    info!(
        provider = settings.llm.provider.as_str(),
        model = %settings.llm.model,
        output_dir = %settings.output_dir.display(),
        "settings loaded"
    );

    let model = LlmClient::new(settings.llm.clone())?;
    let state = AppState {
        api: ApiContext {
            model: Arc::new(model),
            output_dir: settings.output_dir.clone(),
        },
    };
    let app = build_router(Arc::new(state), settings.max_upload_bytes);

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route(HEALTH_ROUTE, get(healthz))
        .route(REVIEW_ROUTE, post(http_review))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_review(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ReviewResponse>, HttpError> {
    let multipart = multipart.map_err(|rejection| {
        reject(ApiError::validation(format!(
            "expected a multipart form upload: {rejection}"
        )))
    })?;
    let submission = read_submission(multipart).await.map_err(reject)?;
    let response = review_submission(&state.api, submission)
        .await
        .map_err(reject)?;
    Ok(Json(response))
}

fn reject(err: ApiError) -> HttpError {
    let status = match err.code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        error!(message = %err.message, "review request failed");
    } else {
        warn!(%status, message = %err.message, "review request rejected");
    }
    (status, Json(ErrorBody::from(err)))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
