//! Multipart helpers shared by both upload endpoints.

use super::{ApiError, AppState};
use crate::error::StudioError;
use crate::naming;
use crate::output::{FileRole, UploadedFile};
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use std::path::Path;
use tracing::debug;

/// Map a multipart read failure, keeping the fixed 413 body for overruns.
pub(super) fn multipart_error(state: &AppState, err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, state.too_large_message())
    } else {
        ApiError::bad_request(format!("Failed to read upload: {}", err.body_text()))
    }
}

/// `true` when `name` has one of `allowed` as its (case-insensitive) extension.
pub(super) fn has_allowed_extension(name: &str, allowed: &[&str]) -> bool {
    naming::extension_of(name).is_some_and(|ext| allowed.contains(&ext.as_str()))
}

/// Store `bytes` in `dir` under a fresh unique name.
pub(super) async fn save_upload(
    dir: &Path,
    original_name: &str,
    bytes: &[u8],
    role: FileRole,
) -> Result<UploadedFile, StudioError> {
    let saved_name = naming::upload_name(original_name, role == FileRole::Template);
    let path = dir.join(&saved_name);
    let write_err = |source| StudioError::OutputWriteFailed {
        path: path.clone(),
        source,
    };
    tokio::fs::create_dir_all(dir).await.map_err(write_err)?;
    tokio::fs::write(&path, bytes).await.map_err(write_err)?;
    debug!("Stored upload '{}' as {}", original_name, path.display());

    Ok(UploadedFile {
        original_name: original_name.to_string(),
        saved_name,
        filepath: path.to_string_lossy().into_owned(),
        size: bytes.len() as u64,
        role,
    })
}
