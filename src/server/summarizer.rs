//! Presentation-summarizer endpoints.

use super::uploads::{has_allowed_extension, multipart_error, save_upload};
use super::{attachment, health, with_common_layers, ApiError, AppState};
use crate::error::StudioError;
use crate::naming;
use crate::output::{FileRole, OutputFormat, SummarySlide};
use crate::pipeline::extract::PRESENTATION_EXTENSIONS;
use crate::pipeline::pptx;
use crate::summarize::{read_deck, summarize_deck, summary_file_name, SUMMARY_SUBTITLE};
use axum::{
    extract::{rejection::JsonRejection, Multipart, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::info;

const NO_KEY_MESSAGE: &str =
    "OpenAI API key not configured. Please set OPENAI_API_KEY environment variable.";

/// Router for the presentation-summarizer surface.
pub fn summarizer_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health))
        .route("/api/status", get(status))
        .route("/api/upload", post(upload))
        .route("/api/summarize", post(summarize))
        .route("/api/download", post(download));
    with_common_layers(routes, state)
}

fn json_body<T: DeserializeOwned>(
    state: &AppState,
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => Err(
            ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, state.too_large_message()),
        ),
        Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
    }
}

async fn status(State(state): State<AppState>) -> Json<Value> {
    let ready = state.config.has_api_key();
    Json(json!({
        "ready": ready,
        "message": if ready { "Application is ready" } else { "API key not configured" },
    }))
}

// ── Upload ───────────────────────────────────────────────────────────────

async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> Result<Json<Value>, ApiError> {
    if !state.config.has_api_key() {
        return Err(ApiError::bad_request(NO_KEY_MESSAGE));
    }

    let mut file: Option<(String, axum::body::Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&state, e))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|e| multipart_error(&state, e))?;
        file = Some((name, bytes));
        break;
    }

    let (name, bytes) = file.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    if name.is_empty() {
        return Err(ApiError::bad_request("No file selected"));
    }
    if !has_allowed_extension(&name, PRESENTATION_EXTENSIONS) {
        return Err(ApiError::bad_request("File must be a .pptx file"));
    }

    let stored = save_upload(&state.config.upload_dir, &name, &bytes, FileRole::Deliverable).await?;
    let path = PathBuf::from(&stored.filepath);
    let overview = tokio::task::spawn_blocking(move || read_deck(&path))
        .await
        .map_err(|e| StudioError::Internal(format!("deck reader task failed: {e}")))?
        .map_err(|e| ApiError::bad_request(e.public_message()))?;

    info!("Uploaded deck '{}' ({} slides)", name, overview.total_slides);
    Ok(Json(json!({
        "success": true,
        "file_path": stored.filepath,
        "file_name": naming::sanitize_filename(&name),
        "total_slides": overview.total_slides,
        "slides": overview.slides,
    })))
}

// ── Summarize ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SummarizeBody {
    file_path: Option<String>,
    max_length: Option<Value>,
    model: Option<String>,
}

/// Accept `max_length` as a number or a numeric string.
fn parse_max_length(value: Option<&Value>, default: usize) -> Result<usize, StudioError> {
    let invalid = || StudioError::validation("max_length", "must be a positive whole number");
    let words = match value {
        None | Some(Value::Null) => return Ok(default),
        Some(Value::Number(n)) => n.as_u64().ok_or_else(invalid)?,
        Some(Value::String(s)) => s.trim().parse::<u64>().map_err(|_| invalid())?,
        Some(_) => return Err(invalid()),
    };
    if words == 0 {
        return Err(invalid());
    }
    usize::try_from(words).map_err(|_| invalid())
}

async fn summarize(
    State(state): State<AppState>,
    body: Result<Json<SummarizeBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let body = json_body(&state, body)?;
    let path = body
        .file_path
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .filter(|p| p.exists())
        .ok_or_else(|| ApiError::bad_request("File not found"))?;
    let max_words = parse_max_length(body.max_length.as_ref(), state.config.default_summary_words)?;
    let model = body
        .model
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| state.config.summary_model.clone());

    let slide = summarize_deck(state.completion.as_ref(), &state.config, &path, max_words, &model).await?;
    Ok(Json(json!({
        "success": true,
        "summary": slide.summary,
        "title": slide.title,
    })))
}

// ── Download ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct DownloadBody {
    title: Option<String>,
    summary: Option<String>,
    file_name: Option<String>,
}

async fn download(
    State(state): State<AppState>,
    body: Result<Json<DownloadBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let body = json_body(&state, body)?;
    let title = body
        .title
        .ok_or_else(|| StudioError::validation("title", "must be provided"))?;
    let summary = body
        .summary
        .ok_or_else(|| StudioError::validation("summary", "must be provided"))?;
    let file_name = body
        .file_name
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "summary.pptx".to_string());
    let download_name = summary_file_name(&naming::sanitize_filename(&file_name));

    let slide = SummarySlide {
        title,
        summary,
        subtitle: Some(SUMMARY_SUBTITLE.to_string()),
    };
    let bytes = tokio::task::spawn_blocking(move || pptx::render_summary_deck(&slide))
        .await
        .map_err(|e| StudioError::Internal(format!("render task failed: {e}")))??;
    Ok(attachment(bytes, OutputFormat::Pptx.mime_type(), &download_name))
}
