//! HTTP surfaces.
//!
//! Two independent routers share one [`AppState`]:
//!
//! | Router | Routes |
//! |--------|--------|
//! | [`case_study_router`] | `GET /health`, `POST /api/upload`, `POST /api/generate-case-study`, `GET /api/download/{filename}`, `GET /api/case-studies` |
//! | [`summarizer_router`] | `GET /health`, `GET /api/status`, `POST /api/upload`, `POST /api/summarize`, `POST /api/download` |
//!
//! Both reject oversize bodies with 413 before any handler runs, allow any
//! origin, and answer unknown routes with `{"error":"Not found"}`. Every
//! error body is `{"error": message}`.

mod case_study;
mod summarizer;
mod uploads;

use crate::config::StudioConfig;
use crate::error::StudioError;
use crate::pipeline::llm::CompletionService;
use axum::{
    extract::{DefaultBodyLimit, Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

pub use case_study::case_study_router;
pub use summarizer::summarizer_router;

/// Shared, immutable per-process state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<StudioConfig>,
    pub completion: Arc<dyn CompletionService>,
}

impl AppState {
    pub fn new(config: StudioConfig, completion: Arc<dyn CompletionService>) -> Self {
        Self {
            config: Arc::new(config),
            completion,
        }
    }

    fn too_large_message(&self) -> String {
        format!(
            "File too large. Maximum size is {}MB",
            self.config.max_upload_bytes / (1024 * 1024)
        )
    }
}

// ── Errors ───────────────────────────────────────────────────────────────

/// A JSON error response: `{"error": message, ...extra}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: serde_json::Value,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Attach an extra top-level field to the body.
    pub fn with(mut self, key: &str, value: impl serde::Serialize) -> Self {
        if let (Some(map), Ok(v)) = (self.body.as_object_mut(), serde_json::to_value(value)) {
            map.insert(key.to_string(), v);
        }
        self
    }

    /// Map a library error, prefixing its public message with `context`.
    pub fn from_studio(err: &StudioError, context: &str) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            warn!("{}: {}", context, err);
        }
        let message = if context.is_empty() {
            err.public_message()
        } else {
            format!("{context}: {}", err.public_message())
        };
        Self::new(status, message)
    }
}

impl From<StudioError> for ApiError {
    fn from(err: StudioError) -> Self {
        Self::from_studio(&err, "")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

// ── Shared layers ────────────────────────────────────────────────────────

/// 413 for any request whose declared `Content-Length` is over the limit.
async fn enforce_upload_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let declared = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    if let Some(len) = declared {
        if len > state.config.max_upload_bytes as u64 {
            warn!("Rejected {} byte request body", len);
            return ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, state.too_large_message())
                .into_response();
        }
    }
    next.run(request).await
}

async fn not_found() -> ApiError {
    ApiError::not_found("Not found")
}

/// Fallback, body limits, CORS and tracing shared by both routers.
fn with_common_layers(router: Router<AppState>, state: AppState) -> Router {
    router
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            enforce_upload_limit,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `attachment` response carrying `bytes` under `download_name`.
pub(crate) fn attachment(bytes: Vec<u8>, mime: &'static str, download_name: &str) -> Response {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{download_name}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));
    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(mime)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}

/// Health body shared by both routers.
pub(crate) async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Local::now().to_rfc3339(),
    }))
}

/// Bind `addr` and serve `app` until the process is stopped.
pub async fn serve(app: Router, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service()).await
}
