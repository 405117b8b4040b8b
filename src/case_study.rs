//! Case-study generation: extracted documents in, DOCX (and JSON) out.
//!
//! ```text
//! FileRef[] ─▶ extract_documents ─▶ case_study_prompt ─▶ complete ─▶ parse_case_study
//!                                                                        │
//!                                   write_case_study ◀── attach metadata ┘
//! ```
//!
//! Only the completion call can fail the request outright. Extraction
//! failures stay inside their document as markers, and parsing always
//! produces all six sections (possibly via the positional fallback).

use crate::config::StudioConfig;
use crate::error::StudioError;
use crate::naming;
use crate::output::{
    CaseStudy, CaseStudyMetadata, FileRef, GenerationRequest, OutputFormat, ParseKind,
    ProjectInfo, RenderedDocument,
};
use crate::pipeline::extract::{extract_documents, DocumentSource};
use crate::pipeline::llm::{CompletionRequest, CompletionService};
use crate::pipeline::{docx, parse, pdf};
use crate::prompts;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// A generated case study plus how its body was obtained.
#[derive(Debug, Clone)]
pub struct CaseStudyOutcome {
    pub case_study: CaseStudy,
    pub parse: ParseKind,
}

/// Files written for one case study.
#[derive(Debug, Clone)]
pub struct WrittenCaseStudy {
    /// Bare file name of the DOCX, as used by the download endpoint.
    pub file_name: String,
    pub docx: RenderedDocument,
    pub json: RenderedDocument,
}

/// One previously generated DOCX.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseStudyListing {
    pub filename: String,
    /// ISO-8601 creation time (falls back to modification time).
    pub created_at: String,
    pub size: u64,
}

// ── Request assembly ─────────────────────────────────────────────────────

/// Turn client file references into extraction sources.
///
/// Entries without a path are dropped. The display name is the original
/// upload name when known, else the stored file name.
pub fn resolve_sources(files: &[FileRef]) -> Vec<DocumentSource> {
    files
        .iter()
        .filter_map(|f| {
            let path = PathBuf::from(f.filepath.as_deref()?);
            let name = f
                .original_name
                .clone()
                .filter(|n| !n.is_empty())
                .or_else(|| path.file_name().map(|n| n.to_string_lossy().into_owned()))
                .unwrap_or_default();
            Some(DocumentSource { path, name })
        })
        .collect()
}

/// Extract deliverables and templates into a [`GenerationRequest`].
///
/// An empty template list yields `template_documents: None`.
pub async fn build_request(
    project: ProjectInfo,
    additional_context: impl Into<String>,
    files: &[FileRef],
    template_files: &[FileRef],
) -> GenerationRequest {
    let documents = extract_documents(&resolve_sources(files)).await;
    let templates = extract_documents(&resolve_sources(template_files)).await;
    debug!(
        "Extracted {} deliverable(s), {} template(s)",
        documents.len(),
        templates.len()
    );
    GenerationRequest {
        project,
        additional_context: additional_context.into(),
        documents,
        template_documents: (!templates.is_empty()).then_some(templates),
    }
}

// ── Generation ───────────────────────────────────────────────────────────

/// Run one completion for `request` and attach metadata to the parsed body.
///
/// # Errors
/// Only [`StudioError::Completion`]; parsing never fails.
pub async fn generate_case_study(
    service: &dyn CompletionService,
    config: &StudioConfig,
    request: &GenerationRequest,
) -> Result<CaseStudyOutcome, StudioError> {
    let start = Instant::now();
    info!(
        "Generating case study for '{}' from {} document(s)",
        request.project.project_name,
        request.documents.len()
    );

    let prompt = prompts::case_study_prompt(
        &request.project,
        &request.documents,
        request.template_documents.as_deref(),
        &request.additional_context,
        config.document_char_budget,
    );
    debug!("Case study prompt: {} chars", prompt.chars().count());

    let raw = service
        .complete(&CompletionRequest::for_case_study(config, prompt))
        .await?;

    let outcome = parse::parse_case_study(&raw);
    let kind = outcome.kind();
    if kind == ParseKind::Heuristic {
        warn!("Case study for '{}' used the sliced fallback", request.project.project_name);
    }

    let case_study = CaseStudy {
        body: outcome.into_inner(),
        metadata: CaseStudyMetadata {
            project_name: request.project.project_name.clone(),
            client_name: request.project.client_name.clone(),
            industry: request.project.industry.clone(),
            model_used: config.model.clone(),
        },
    };
    info!(
        "Case study generated in {}ms ({:?})",
        start.elapsed().as_millis(),
        kind
    );
    Ok(CaseStudyOutcome {
        case_study,
        parse: kind,
    })
}

// ── Output ───────────────────────────────────────────────────────────────

/// Write the DOCX and its JSON twin under `config.output_dir` with a fresh
/// `case_study_{stamp}_{token}` name.
pub async fn write_case_study(
    config: &StudioConfig,
    case_study: &CaseStudy,
) -> Result<WrittenCaseStudy, StudioError> {
    let stem = naming::case_study_stem();
    let file_name = format!("{stem}.{}", OutputFormat::Docx.extension());
    let docx_path = config.output_dir.join(&file_name);
    let json_path = config
        .output_dir
        .join(format!("{stem}.{}", OutputFormat::Json.extension()));

    let cs = case_study.clone();
    let (docx, json) = tokio::task::spawn_blocking(move || write_pair(&cs, &docx_path, &json_path))
        .await
        .map_err(|e| StudioError::Internal(format!("render task failed: {e}")))??;

    Ok(WrittenCaseStudy {
        file_name,
        docx,
        json,
    })
}

/// DOCX then JSON; a failed JSON write takes the DOCX back out so a listed
/// case study always has its twin.
fn write_pair(
    case_study: &CaseStudy,
    docx_path: &Path,
    json_path: &Path,
) -> Result<(RenderedDocument, RenderedDocument), StudioError> {
    let docx = docx::save_case_study(case_study, docx_path)?;
    match docx::save_case_study_json(case_study, json_path) {
        Ok(json) => Ok((docx, json)),
        Err(e) => {
            if let Err(rm) = std::fs::remove_file(docx_path) {
                warn!("Could not remove {} after failed JSON write: {}", docx_path.display(), rm);
            }
            Err(e)
        }
    }
}

/// Render `case_study` as a PDF in memory.
pub async fn export_case_study_pdf(case_study: &CaseStudy) -> Result<Vec<u8>, StudioError> {
    let cs = case_study.clone();
    tokio::task::spawn_blocking(move || pdf::render_case_study_pdf(&cs))
        .await
        .map_err(|e| StudioError::Internal(format!("PDF export task failed: {e}")))?
}

/// First reference that resolves to an existing file outside `dir`.
///
/// References to files that do not exist are ignored here; extraction
/// skips them.
pub async fn find_escaping_ref<'a>(dir: &Path, files: &'a [FileRef]) -> Option<&'a FileRef> {
    let root = tokio::fs::canonicalize(dir).await.ok();
    for file in files {
        let Some(path) = file.filepath.as_deref().filter(|p| !p.is_empty()) else {
            continue;
        };
        let Ok(real) = tokio::fs::canonicalize(path).await else {
            continue;
        };
        if !root.as_ref().is_some_and(|r| real.starts_with(r)) {
            return Some(file);
        }
    }
    None
}

/// Every `.docx` in `dir`, newest first. A missing directory lists as empty.
pub fn list_case_studies(dir: &Path) -> Result<Vec<CaseStudyListing>, StudioError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(StudioError::Internal(format!("listing {}: {e}", dir.display()))),
    };

    let mut found: Vec<(DateTime<Local>, CaseStudyListing)> = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if naming::extension_of(&name).as_deref() != Some(OutputFormat::Docx.extension()) {
            continue;
        }
        let Ok(meta) = entry.metadata() else {
            continue;
        };
        if !meta.is_file() {
            continue;
        }
        let created: DateTime<Local> = match meta.created().or_else(|_| meta.modified()) {
            Ok(t) => t.into(),
            Err(_) => continue,
        };
        found.push((
            created,
            CaseStudyListing {
                filename: name,
                created_at: created.to_rfc3339(),
                size: meta.len(),
            },
        ));
    }

    found.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.filename.cmp(&a.1.filename)));
    Ok(found.into_iter().map(|(_, listing)| listing).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompletionError;
    use crate::output::ExtractedDocument;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Returns a fixed reply and remembers the last request.
    struct Canned {
        reply: Result<String, CompletionError>,
        seen: Mutex<Option<CompletionRequest>>,
    }

    impl Canned {
        fn new(reply: Result<String, CompletionError>) -> Self {
            Self {
                reply,
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl CompletionService for Canned {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
            *self.seen.lock().unwrap() = Some(request.clone());
            self.reply.clone()
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            project: ProjectInfo {
                project_name: "Acme".into(),
                client_name: "Globex".into(),
                industry: "Retail".into(),
            },
            additional_context: String::new(),
            documents: vec![ExtractedDocument::ok("notes.txt", "Q1 revenue grew 20%.")],
            template_documents: None,
        }
    }

    #[tokio::test]
    async fn metadata_attached_after_parse() {
        let service = Canned::new(Ok("no json at all".into()));
        let config = StudioConfig::default();
        let outcome = generate_case_study(&service, &config, &request()).await.unwrap();

        assert_eq!(outcome.parse, ParseKind::Heuristic);
        let meta = &outcome.case_study.metadata;
        assert_eq!(
            (meta.project_name.as_str(), meta.client_name.as_str(), meta.industry.as_str()),
            ("Acme", "Globex", "Retail")
        );
        assert_eq!(meta.model_used, config.model);
        assert_eq!(outcome.case_study.body.problem_statement, "no json at all");

        let seen = service.seen.lock().unwrap().clone().unwrap();
        assert!(seen.user.contains("=== notes.txt ==="));
        assert!(seen.user.contains("None provided"));
        assert_eq!(seen.max_tokens, 2000);
    }

    #[tokio::test]
    async fn structured_reply_is_reported() {
        let service = Canned::new(Ok(r#"{"problem_statement":"p","key_metrics":["m"]}"#.into()));
        let outcome = generate_case_study(&service, &StudioConfig::default(), &request())
            .await
            .unwrap();
        assert_eq!(outcome.parse, ParseKind::Structured);
        assert_eq!(outcome.case_study.body.key_metrics, vec!["m"]);
    }

    #[tokio::test]
    async fn completion_failure_is_fatal() {
        let service = Canned::new(Err(CompletionError::RateLimitExceeded {
            detail: "429".into(),
        }));
        let err = generate_case_study(&service, &StudioConfig::default(), &request())
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn missing_files_are_skipped_and_names_resolved() {
        let dir = tempfile::tempdir().unwrap();
        let stored = dir.path().join("20240101_000000_abcd1234_notes.txt");
        std::fs::write(&stored, "hello").unwrap();

        let files = vec![
            FileRef {
                filepath: Some(stored.to_string_lossy().into_owned()),
                original_name: Some("notes.txt".into()),
            },
            FileRef {
                filepath: Some(dir.path().join("gone.txt").to_string_lossy().into_owned()),
                original_name: None,
            },
            FileRef::default(),
        ];
        let req = build_request(ProjectInfo::default(), "", &files, &[]).await;
        assert_eq!(req.documents, vec![ExtractedDocument::ok("notes.txt", "hello")]);
        assert!(req.template_documents.is_none());
    }

    #[tokio::test]
    async fn written_files_are_listed_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let config = StudioConfig::builder()
            .output_dir(dir.path())
            .build()
            .unwrap();
        let service = Canned::new(Ok("text".into()));
        let cs = generate_case_study(&service, &config, &request())
            .await
            .unwrap()
            .case_study;

        let written = write_case_study(&config, &cs).await.unwrap();
        assert!(written.file_name.starts_with("case_study_"));
        assert!(written.docx.file_path.exists());
        assert!(written.json.file_path.exists());

        let listed = list_case_studies(dir.path()).unwrap();
        assert_eq!(listed.len(), 1, "json twin must not be listed");
        assert_eq!(listed[0].filename, written.file_name);
        assert!(listed[0].size > 0);
    }

    #[tokio::test]
    async fn failed_json_write_removes_the_docx() {
        let dir = tempfile::tempdir().unwrap();
        let cs = generate_case_study(&Canned::new(Ok("text".into())), &StudioConfig::default(), &request())
            .await
            .unwrap()
            .case_study;
        let docx_path = dir.path().join("case_study_x.docx");
        // A directory where the JSON file should go makes the final rename fail.
        let json_path = dir.path().join("case_study_x.json");
        std::fs::create_dir(&json_path).unwrap();

        assert!(write_pair(&cs, &docx_path, &json_path).is_err());
        assert!(!docx_path.exists());
        assert!(list_case_studies(dir.path()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn references_outside_the_upload_dir_are_found() {
        let root = tempfile::tempdir().unwrap();
        let uploads = root.path().join("uploads");
        std::fs::create_dir(&uploads).unwrap();
        let inside = uploads.join("notes.txt");
        let outside = root.path().join("secret.txt");
        std::fs::write(&inside, "ok").unwrap();
        std::fs::write(&outside, "no").unwrap();
        let file_ref = |p: &Path| FileRef {
            filepath: Some(p.to_string_lossy().into_owned()),
            original_name: None,
        };

        let safe = vec![
            file_ref(&inside),
            file_ref(&uploads.join("missing.txt")),
            FileRef::default(),
        ];
        assert!(find_escaping_ref(&uploads, &safe).await.is_none());

        let sneaky = vec![file_ref(&inside), file_ref(&uploads.join("../secret.txt"))];
        let found = find_escaping_ref(&uploads, &sneaky).await.unwrap();
        assert!(found.filepath.as_deref().unwrap().ends_with("secret.txt"));
    }

    #[test]
    fn missing_output_dir_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(list_case_studies(&dir.path().join("nope")).unwrap().is_empty());
    }
}
