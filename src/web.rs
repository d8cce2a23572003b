use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use log::error;
use serde::{Deserialize, Serialize};

use crate::output::{self, Notice};
use crate::pipeline::{Outcome, Pipeline};
use crate::summarize::{Mode, Summarizer};
use crate::youtube::TranscriptProvider;
use crate::{Error, GenerationErrorKind, extract_video_id, thumbnail_url};

#[derive(Debug, Default, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub mode: Mode,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub video_id: String,
    pub mode: Mode,
    pub label: &'static str,
    pub thumbnail_url: String,
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

/// JSON error body for the API routes
pub struct ApiError(pub Error);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            Error::TranscriptUnavailable { .. } => StatusCode::NOT_FOUND,
            Error::Generation {
                kind: GenerationErrorKind::Quota,
                ..
            } => StatusCode::TOO_MANY_REQUESTS,
            Error::Generation {
                kind: GenerationErrorKind::InvalidRequest | GenerationErrorKind::Blocked,
                ..
            } => StatusCode::UNPROCESSABLE_ENTITY,
            Error::TranscriptTransport { .. } | Error::Generation { .. } => StatusCode::BAD_GATEWAY,
            Error::Configuration(_) => {
                error!("configuration error while serving: {}", self.0);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse {
            error: ErrorDetails {
                code: self.0.code(),
                message: self.0.to_string(),
            },
        });
        (status, body).into_response()
    }
}

pub fn router<P, S>(pipeline: Pipeline<P, S>) -> Router
where
    P: TranscriptProvider + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(index))
        .route("/summarize", post(summarize_page::<P, S>))
        .route("/api/summarize", post(summarize_api::<P, S>))
        .route("/health", get(health))
        .with_state(Arc::new(pipeline))
}

async fn health() -> &'static str {
    "ok"
}

async fn index(Query(req): Query<SummarizeRequest>) -> Html<String> {
    let url = req.url.trim();
    let video_id = extract_video_id(url);
    let notice = match (&video_id, url.is_empty()) {
        (_, true) => Notice::None,
        (Some(id), false) => Notice::Preview(id),
        (None, false) => Notice::Invalid,
    };
    Html(output::render_index(url, req.mode, notice))
}

async fn summarize_page<P, S>(
    State(pipeline): State<Arc<Pipeline<P, S>>>,
    Form(req): Form<SummarizeRequest>,
) -> Html<String>
where
    P: TranscriptProvider + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    let outcome = pipeline.run(&req.url, req.mode).await;
    Html(output::render_outcome(&req.url, req.mode, &outcome))
}

async fn summarize_api<P, S>(
    State(pipeline): State<Arc<Pipeline<P, S>>>,
    Json(req): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, ApiError>
where
    P: TranscriptProvider + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
{
    match pipeline.run(&req.url, req.mode).await {
        Outcome::SummaryReady(summary) => Ok(Json(SummarizeResponse {
            thumbnail_url: thumbnail_url(&summary.video_id),
            video_id: summary.video_id.to_string(),
            mode: summary.mode,
            label: summary.mode.label(),
            summary: summary.text,
        })),
        Outcome::TranscriptFailed { error, .. } | Outcome::SummaryFailed { error, .. } => Err(ApiError(error)),
    }
}
