//! Text extraction: turn an uploaded file into plain text.
//!
//! Dispatch is a closed enum over the supported formats. Every backing
//! library here is synchronous, so async callers go through
//! [`extract_documents`], which moves the work onto `spawn_blocking`.
//!
//! ## Failure semantics
//!
//! [`DocumentFormat::extract`] returns an [`ExtractError`] per document.
//! The batch helper never propagates it: the failing document's text
//! becomes an `Error processing: …` marker and the batch carries on.

use crate::error::{ExtractError, StudioError};
use crate::output::ExtractedDocument;
use crate::pipeline::deck;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Extensions accepted by the case-study surface.
pub const CASE_STUDY_EXTENSIONS: &[&str] = &["pdf", "docx", "txt", "xlsx", "xls"];

/// Extensions accepted by the presentation surface.
pub const PRESENTATION_EXTENSIONS: &[&str] = &["pptx"];

/// Separator between spreadsheet cells.
pub const CELL_SEPARATOR: &str = " | ";

/// A supported input format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
    /// `.xlsx` and `.xls`
    Spreadsheet,
    /// Only reached from the presentation pipeline.
    Pptx,
}

impl DocumentFormat {
    /// Map a file extension (with or without the leading dot, any case).
    pub fn from_extension(ext: &str) -> Result<Self, ExtractError> {
        let normalised = ext.trim_start_matches('.').to_ascii_lowercase();
        match normalised.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "txt" => Ok(Self::Txt),
            "xlsx" | "xls" => Ok(Self::Spreadsheet),
            "pptx" => Ok(Self::Pptx),
            _ => Err(ExtractError::UnsupportedFormat {
                extension: normalised,
            }),
        }
    }

    /// Map a path by its extension.
    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(ext)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
            Self::Txt => "TXT",
            Self::Spreadsheet => "Excel",
            Self::Pptx => "PPTX",
        }
    }

    /// Extract the text of `path` as this format. Blocking.
    pub fn extract(self, path: &Path) -> Result<String, ExtractError> {
        let text = match self {
            Self::Pdf => extract_pdf(path),
            Self::Docx => extract_docx(path),
            Self::Txt => extract_txt(path),
            Self::Spreadsheet => extract_spreadsheet(path),
            Self::Pptx => deck::read_deck(path).map(|d| d.transcript()),
        }?;
        debug!(
            "Extracted {} chars from {} ({})",
            text.len(),
            path.display(),
            self.label()
        );
        Ok(text)
    }
}

/// Extract the text of an existing file, dispatching on its own extension.
pub fn extract_content(path: &Path) -> Result<String, StudioError> {
    if !path.exists() {
        return Err(StudioError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let format = DocumentFormat::from_path(path)?;
    Ok(format.extract(path)?)
}

/// Extract the text of an existing file as the declared extension.
pub fn extract_with_format(path: &Path, declared_ext: &str) -> Result<String, StudioError> {
    if !path.exists() {
        return Err(StudioError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let format = DocumentFormat::from_extension(declared_ext)?;
    Ok(format.extract(path)?)
}

/// A stored file plus the name it is shown under in prompts.
#[derive(Debug, Clone)]
pub struct DocumentSource {
    pub path: PathBuf,
    pub name: String,
}

/// Extract a batch of documents in order.
///
/// Missing files are skipped (with a warning). Any other failure is kept in
/// place as an `Error processing: …` marker so one bad file never sinks the
/// rest of the batch.
pub async fn extract_documents(sources: &[DocumentSource]) -> Vec<ExtractedDocument> {
    let mut out = Vec::with_capacity(sources.len());
    for source in sources {
        if !source.path.exists() {
            warn!("Skipping missing file '{}'", source.path.display());
            continue;
        }
        let path = source.path.clone();
        let result = tokio::task::spawn_blocking(move || {
            DocumentFormat::from_path(&path).and_then(|f| f.extract(&path))
        })
        .await;

        let doc = match result {
            Ok(Ok(text)) => ExtractedDocument::ok(&source.name, text),
            Ok(Err(e)) => {
                warn!("Extraction failed for '{}': {}", source.name, e);
                ExtractedDocument::failed(&source.name, e.marker())
            }
            Err(join) => {
                warn!("Extraction task for '{}' panicked: {}", source.name, join);
                ExtractedDocument::failed(
                    &source.name,
                    format!("Error processing: extraction task failed: {join}"),
                )
            }
        };
        out.push(doc);
    }
    out
}

// ── PDF ──────────────────────────────────────────────────────────────────

/// Bind pdfium from `PDFIUM_LIB_PATH`, else the cached download.
pub(crate) fn bind_pdfium() -> Result<Pdfium, ExtractError> {
    let bound = match std::env::var_os("PDFIUM_LIB_PATH") {
        Some(p) => pdfium_auto::bind_pdfium_from_path(Path::new(&p)),
        None => pdfium_auto::bind_pdfium_silent(),
    };
    bound.map_err(|e| ExtractError::LibraryUnavailable {
        format: "PDF",
        detail: e.to_string(),
    })
}

fn extract_pdf(path: &Path) -> Result<String, ExtractError> {
    let pdfium = bind_pdfium()?;
    let document = pdfium
        .load_pdf_from_file(path, None)
        .map_err(|e| ExtractError::Malformed {
            format: "PDF",
            path: path.to_path_buf(),
            detail: format!("{:?}", e),
        })?;

    let pages: Vec<String> = document
        .pages()
        .iter()
        .enumerate()
        .map(|(idx, page)| match page.text() {
            Ok(text) => text.all(),
            Err(e) => {
                warn!("PDF page {} unreadable: {:?}", idx + 1, e);
                String::new()
            }
        })
        .collect();
    Ok(pages.join("\n"))
}

// ── DOCX ─────────────────────────────────────────────────────────────────

fn extract_docx(path: &Path) -> Result<String, ExtractError> {
    use docx_rs::{
        read_docx, DocumentChild, TableCellContent, TableChild, TableRowChild,
    };

    let bytes = std::fs::read(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let docx = read_docx(&bytes).map_err(|e| ExtractError::Malformed {
        format: "DOCX",
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let mut paragraphs = Vec::new();
    let mut cells = Vec::new();

    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(p) => paragraphs.push(paragraph_text(p)),
            DocumentChild::Table(table) => {
                for row in &table.rows {
                    let TableChild::TableRow(row) = row;
                    for cell in &row.cells {
                        let TableRowChild::TableCell(cell) = cell;
                        let text = cell
                            .children
                            .iter()
                            .filter_map(|c| match c {
                                TableCellContent::Paragraph(p) => Some(paragraph_text(p)),
                                _ => None,
                            })
                            .collect::<Vec<_>>()
                            .join("\n");
                        cells.push(text);
                    }
                }
            }
            _ => {}
        }
    }

    // Tables follow the body text; they are not interleaved.
    Ok(paragraphs
        .into_iter()
        .chain(cells)
        .filter(|t| !t.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n"))
}

fn paragraph_text(p: &docx_rs::Paragraph) -> String {
    use docx_rs::{ParagraphChild, RunChild};

    p.children
        .iter()
        .filter_map(|pc| match pc {
            ParagraphChild::Run(run) => Some(
                run.children
                    .iter()
                    .filter_map(|rc| match rc {
                        RunChild::Text(t) => Some(t.text.as_str()),
                        _ => None,
                    })
                    .collect::<String>(),
            ),
            _ => None,
        })
        .collect()
}

// ── TXT ──────────────────────────────────────────────────────────────────

fn extract_txt(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode_text(bytes))
}

/// UTF-8 if valid, otherwise Latin-1 (every byte maps to one char).
pub fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            debug!("Input is not UTF-8, decoding as Latin-1");
            e.into_bytes().iter().map(|&b| b as char).collect()
        }
    }
}

// ── Spreadsheet ──────────────────────────────────────────────────────────

fn extract_spreadsheet(path: &Path) -> Result<String, ExtractError> {
    use calamine::{open_workbook_auto, Reader};

    let mut workbook = open_workbook_auto(path).map_err(|e| ExtractError::Malformed {
        format: "Excel",
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    let mut lines = Vec::new();
    for sheet in workbook.sheet_names().to_vec() {
        lines.push(format!("\n=== Sheet: {sheet} ===\n"));
        let range = workbook
            .worksheet_range(&sheet)
            .map_err(|e| ExtractError::Malformed {
                format: "Excel",
                path: path.to_path_buf(),
                detail: format!("sheet '{sheet}': {e}"),
            })?;
        for row in range.rows() {
            let cells: Vec<String> = row.iter().map(cell_text).collect();
            lines.push(cells.join(CELL_SEPARATOR));
        }
    }
    Ok(lines.join("\n"))
}

fn cell_text(cell: &calamine::Data) -> String {
    use calamine::Data;

    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.is_finite() && f.abs() < 1e15 => {
            format!("{}", *f as i64)
        }
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        Data::Error(_) => "#ERR".to_string(),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}
