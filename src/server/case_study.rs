//! Case-study endpoints.

use super::uploads::{has_allowed_extension, multipart_error, save_upload};
use super::{attachment, health, with_common_layers, ApiError, AppState};
use crate::case_study::{
    build_request, export_case_study_pdf, find_escaping_ref, generate_case_study, list_case_studies,
    write_case_study,
};
use crate::naming;
use crate::output::{CaseStudy, FileRef, FileRole, OutputFormat, ProjectInfo, UploadedFile};
use crate::pipeline::extract::CASE_STUDY_EXTENSIONS;
use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

/// Router for the case-study surface.
pub fn case_study_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health))
        .route("/api/upload", post(upload))
        .route("/api/generate-case-study", post(generate))
        .route("/api/download/{filename}", get(download))
        .route("/api/case-studies", get(list))
        .route("/api/export-pdf", post(export_pdf));
    with_common_layers(routes, state)
}

// ── Upload ───────────────────────────────────────────────────────────────

async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> Result<Json<Value>, ApiError> {
    let mut project = ProjectInfo::default();
    let mut saw_files_field = false;
    let mut uploaded: Vec<UploadedFile> = Vec::new();
    let mut templates: Vec<UploadedFile> = Vec::new();
    let mut errors: Vec<String> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&state, e))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "files" | "template_files" => {
                let role = if name == "files" {
                    saw_files_field = true;
                    FileRole::Deliverable
                } else {
                    FileRole::Template
                };
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| multipart_error(&state, e))?;

                if file_name.is_empty() {
                    if role == FileRole::Deliverable {
                        errors.push("Empty filename".to_string());
                    }
                    continue;
                }
                if !has_allowed_extension(&file_name, CASE_STUDY_EXTENSIONS) {
                    errors.push(match role {
                        FileRole::Deliverable => format!("{file_name}: Invalid file type"),
                        FileRole::Template => format!("{file_name}: Invalid template file type"),
                    });
                    continue;
                }
                match save_upload(&state.config.upload_dir, &file_name, &bytes, role).await {
                    Ok(file) if role == FileRole::Deliverable => uploaded.push(file),
                    Ok(file) => templates.push(file),
                    Err(e) => {
                        warn!("Could not store '{}': {}", file_name, e);
                        errors.push(match role {
                            FileRole::Deliverable => format!("{file_name}: {e}"),
                            FileRole::Template => format!("{file_name} (template): {e}"),
                        });
                    }
                }
            }
            "projectName" | "clientName" | "industry" => {
                let value = field.text().await.map_err(|e| multipart_error(&state, e))?;
                match name.as_str() {
                    "projectName" => project.project_name = value,
                    "clientName" => project.client_name = value,
                    _ => project.industry = value,
                }
            }
            _ => {}
        }
    }

    if !saw_files_field {
        return Err(ApiError::bad_request("No files provided"));
    }
    if uploaded.is_empty() {
        return Err(ApiError::bad_request("No files uploaded successfully").with("details", &errors));
    }

    info!(
        "Stored {} deliverable(s) and {} template(s) for '{}'",
        uploaded.len(),
        templates.len(),
        project.project_name
    );
    Ok(Json(json!({
        "success": true,
        "total_files": uploaded.len() + templates.len(),
        "uploaded_files": uploaded,
        "template_files": templates,
        "errors": errors,
        "metadata": project,
    })))
}

// ── Generate ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateBody {
    files: Option<Value>,
    #[serde(default, rename = "template_files")]
    template_files: Vec<FileRef>,
    project_name: Option<String>,
    client_name: Option<String>,
    industry: Option<String>,
    #[serde(default)]
    additional_context: String,
}

fn json_rejection(state: &AppState, rejection: JsonRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, state.too_large_message())
    } else {
        ApiError::bad_request(rejection.body_text())
    }
}

async fn generate(
    State(state): State<AppState>,
    body: Result<Json<GenerateBody>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = body.map_err(|rejection| json_rejection(&state, rejection))?;

    let files: Vec<FileRef> = match body.files {
        None => return Err(ApiError::bad_request("No files specified for processing")),
        Some(v) => serde_json::from_value(v)
            .ok()
            .filter(|f: &Vec<FileRef>| !f.is_empty())
            .ok_or_else(|| ApiError::bad_request("Files must be a non-empty array"))?,
    };

    for refs in [&files, &body.template_files] {
        if let Some(bad) = find_escaping_ref(&state.config.upload_dir, refs).await {
            warn!("Rejected file reference outside uploads: {:?}", bad.filepath);
            return Err(ApiError::bad_request("Invalid file path"));
        }
    }

    let defaults = ProjectInfo::default();
    let project = ProjectInfo {
        project_name: body.project_name.unwrap_or(defaults.project_name),
        client_name: body.client_name.unwrap_or(defaults.client_name),
        industry: body.industry.unwrap_or(defaults.industry),
    };

    const CONTEXT: &str = "Case study generation failed";
    let request = build_request(project, body.additional_context, &files, &body.template_files).await;
    let outcome = generate_case_study(state.completion.as_ref(), &state.config, &request)
        .await
        .map_err(|e| ApiError::from_studio(&e, CONTEXT))?;
    let written = write_case_study(&state.config, &outcome.case_study)
        .await
        .map_err(|e| ApiError::from_studio(&e, CONTEXT))?;

    Ok(Json(json!({
        "success": true,
        "case_study": outcome.case_study,
        "output_file": written.file_name,
        "output_path": written.docx.file_path,
        "generated_at": chrono::Local::now().to_rfc3339(),
        "parse": outcome.parse,
    })))
}

// ── PDF export ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ExportBody {
    #[serde(rename = "caseStudy", alias = "case_study")]
    case_study: Option<CaseStudy>,
}

async fn export_pdf(
    State(state): State<AppState>,
    body: Result<Json<ExportBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body.map_err(|rejection| json_rejection(&state, rejection))?;
    let case_study = body
        .case_study
        .ok_or_else(|| ApiError::bad_request("No case study provided"))?;
    let bytes = export_case_study_pdf(&case_study)
        .await
        .map_err(|e| ApiError::from_studio(&e, "Error generating PDF"))?;
    Ok(attachment(bytes, OutputFormat::Pdf.mime_type(), "case-study.pdf"))
}

// ── Download / list ──────────────────────────────────────────────────────

async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, ApiError> {
    if !naming::is_safe_filename(&filename) {
        return Err(ApiError::bad_request("Invalid filename"));
    }
    let path = state.config.output_dir.join(&filename);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ApiError::not_found("File not found"))
        }
        Err(e) => {
            warn!("Download of {} failed: {}", path.display(), e);
            return Err(ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Download failed",
            ));
        }
    };
    let mime = match naming::extension_of(&filename).as_deref() {
        Some("docx") => OutputFormat::Docx.mime_type(),
        Some("json") => OutputFormat::Json.mime_type(),
        Some("pdf") => OutputFormat::Pdf.mime_type(),
        _ => "application/octet-stream",
    };
    Ok(attachment(bytes, mime, &filename))
}

async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let listed = list_case_studies(&state.config.output_dir)
        .map_err(|e| ApiError::from_studio(&e, "Failed to list case studies"))?;
    Ok(Json(json!({ "case_studies": listed })))
}
