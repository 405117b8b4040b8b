//! Data model shared by the pipelines and the HTTP surfaces.
//!
//! Every type here is plain data (serde-serialisable) so the server can hand
//! it straight to `Json(...)` and tests can compare it field by field.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Role an upload plays in case-study generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRole {
    /// A project artifact the case study is written from.
    Deliverable,
    /// A reference case study whose style the model should follow.
    Template,
}

/// A file saved by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub original_name: String,
    pub saved_name: String,
    /// Stored path, as returned to and later sent back by the client.
    pub filepath: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub role: FileRole,
}

/// Reference to a stored file, as sent back by the client on generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileRef {
    #[serde(default)]
    pub filepath: Option<String>,
    #[serde(default)]
    pub original_name: Option<String>,
}

/// Text extracted from one document, or the marker explaining why not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub source_name: String,
    pub text: String,
    /// `true` when `text` is an `Error processing: …` marker.
    #[serde(default)]
    pub failed: bool,
}

impl ExtractedDocument {
    pub fn ok(source_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            text: text.into(),
            failed: false,
        }
    }

    pub fn failed(source_name: impl Into<String>, marker: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            text: marker.into(),
            failed: true,
        }
    }
}

/// Project/client/industry triple attached to a case study.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub project_name: String,
    pub client_name: String,
    pub industry: String,
}

impl Default for ProjectInfo {
    fn default() -> Self {
        Self {
            project_name: "Unnamed Project".to_string(),
            client_name: "Anonymous Client".to_string(),
            industry: "General".to_string(),
        }
    }
}

/// Everything needed to write one case study.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub project: ProjectInfo,
    pub additional_context: String,
    /// Deliverables in upload order.
    pub documents: Vec<ExtractedDocument>,
    /// Optional reference case studies in upload order.
    pub template_documents: Option<Vec<ExtractedDocument>>,
}

/// The six sections the model is asked to fill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseStudyBody {
    pub problem_statement: String,
    pub solution_approach: String,
    pub key_metrics: Vec<String>,
    pub impact_summary: String,
    pub implementation_details: String,
    pub lessons_learned: String,
}

/// Metadata attached by the orchestrator after parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseStudyMetadata {
    pub project_name: String,
    pub client_name: String,
    pub industry: String,
    pub model_used: String,
}

/// A complete case study: parsed body plus metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseStudy {
    #[serde(flatten)]
    pub body: CaseStudyBody,
    pub metadata: CaseStudyMetadata,
}

/// Title, summary and optional subtitle for the executive-summary slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummarySlide {
    pub title: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

/// Result of interpreting model output.
///
/// `Structured` means the reply contained the JSON shape we asked for;
/// `Heuristic` means the parser fell back to slicing raw text, which is lossy
/// and should not be trusted as a faithful reading of the reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome<T> {
    Structured(T),
    Heuristic(T),
}

impl<T> ParseOutcome<T> {
    pub fn is_structured(&self) -> bool {
        matches!(self, ParseOutcome::Structured(_))
    }

    pub fn kind(&self) -> ParseKind {
        match self {
            ParseOutcome::Structured(_) => ParseKind::Structured,
            ParseOutcome::Heuristic(_) => ParseKind::Heuristic,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            ParseOutcome::Structured(v) | ParseOutcome::Heuristic(v) => v,
        }
    }

    pub fn as_inner(&self) -> &T {
        match self {
            ParseOutcome::Structured(v) | ParseOutcome::Heuristic(v) => v,
        }
    }
}

/// Serialisable tag of a [`ParseOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseKind {
    Structured,
    Heuristic,
}

/// Output format of a rendered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Docx,
    Pptx,
    Json,
    Pdf,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Docx => "docx",
            OutputFormat::Pptx => "pptx",
            OutputFormat::Json => "json",
            OutputFormat::Pdf => "pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            OutputFormat::Pptx => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
            OutputFormat::Json => "application/json",
            OutputFormat::Pdf => "application/pdf",
        }
    }
}

/// A document written to disk by one of the renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedDocument {
    pub file_path: PathBuf,
    pub format: OutputFormat,
    pub created_at: DateTime<Utc>,
}

/// Content of one slide of an input presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideContent {
    pub slide_number: usize,
    pub title: String,
    pub content: Vec<String>,
    pub notes: String,
}

/// Structured view of an input presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckOverview {
    pub file_name: String,
    pub total_slides: usize,
    pub slides: Vec<SlideContent>,
}

impl DeckOverview {
    /// Flattened transcript fed to the summarizer.
    ///
    /// Per slide: `Slide {n}: {title}` (only when a title exists), each body
    /// text, `Notes: {notes}` (only when notes exist), then a blank line.
    pub fn transcript(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        for slide in &self.slides {
            if !slide.title.is_empty() {
                lines.push(format!("Slide {}: {}", slide.slide_number, slide.title));
            }
            lines.extend(slide.content.iter().cloned());
            if !slide.notes.is_empty() {
                lines.push(format!("Notes: {}", slide.notes));
            }
            lines.push(String::new());
        }
        lines.join("\n")
    }
}
