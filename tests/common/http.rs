//! Router-test helpers: completion stub, request builders, body readers.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use docstudio::prompts::TITLE_SYSTEM_PROMPT;
use docstudio::{CompletionError, CompletionRequest, CompletionService, StudioConfig};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

// ── Completion stub ──────────────────────────────────────────────────────────

/// Answers title requests with `title` and everything else with `reply`,
/// recording every request.
pub struct StubCompletion {
    reply: Result<String, CompletionError>,
    title: String,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl StubCompletion {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            title: "Stub Title".to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(err: CompletionError) -> Self {
        Self {
            reply: Err(err),
            title: "Stub Title".to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionService for StubCompletion {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.requests.lock().unwrap().push(request.clone());
        if request.system == TITLE_SYSTEM_PROMPT {
            return Ok(self.title.clone());
        }
        self.reply.clone()
    }
}

/// Config rooted in `dir` (`uploads/`, `outputs/`).
pub fn config_in(dir: &Path, api_key: Option<&str>) -> StudioConfig {
    let mut builder = StudioConfig::builder()
        .upload_dir(dir.join("uploads"))
        .output_dir(dir.join("outputs"));
    if let Some(key) = api_key {
        builder = builder.api_key(key);
    }
    builder.build().unwrap()
}

// ── Requests / responses ─────────────────────────────────────────────────────

const BOUNDARY: &str = "docstudio-test-boundary";

/// Minimal `multipart/form-data` body builder.
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        write!(
            self.body,
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
        .unwrap();
        self
    }

    pub fn file(mut self, name: &str, filename: &str, bytes: &[u8]) -> Self {
        write!(
            self.body,
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .unwrap();
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        write!(self.body, "--{BOUNDARY}--\r\n").unwrap();
        Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header(header::CONTENT_LENGTH, self.body.len())
            .body(Body::from(self.body))
            .unwrap()
    }
}

pub fn json_request(uri: &str, body: &serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

