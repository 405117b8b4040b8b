//! # docstudio
//!
//! Turn office documents into LLM-written deliverables:
//!
//! * **Case studies**: PDF / DOCX / TXT / XLSX project files are extracted,
//!   condensed into one prompt, sent to a completion model, and the reply is
//!   rendered as a one-page Word case study (plus a JSON twin).
//! * **Executive summaries**: a PowerPoint deck is read slide by slide,
//!   summarized, given a generated title, and rendered as a single summary
//!   slide (optionally inserted at the front of a copy of the deck).
//!
//! ## Pipeline Overview
//!
//! ```text
//! upload(s)
//!  │
//!  ├─ 1. Extract  per-format text (pdfium, docx-rs, calamine, quick-xml)
//!  ├─ 2. Prompt   per-document budget, "None provided" context marker
//!  ├─ 3. Complete one call per request (edgequake-llm, bounded by a timeout)
//!  ├─ 4. Parse    JSON object if present, positional slicing otherwise
//!  └─ 5. Render   DOCX / PPTX written atomically
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docstudio::{summarize_deck, LlmCompletionClient, StudioConfig};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StudioConfig::from_env()?;
//!     let client = LlmCompletionClient::from_config(&config);
//!     let slide = summarize_deck(
//!         &client,
//!         &config,
//!         Path::new("board-review.pptx"),
//!         config.default_summary_words,
//!         &config.summary_model,
//!     )
//!     .await?;
//!     println!("{}\n\n{}", slide.title, slide.summary);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `server` | on      | axum routers for both HTTP surfaces |
//! | `cli`    | on      | `docstudio` and `deck-summary` binaries (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod case_study;
pub mod config;
pub mod error;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
#[cfg(feature = "server")]
pub mod server;
pub mod summarize;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use case_study::{generate_case_study, write_case_study, CaseStudyOutcome};
pub use config::{StudioConfig, StudioConfigBuilder};
pub use error::{CompletionError, CompletionFailureKind, ExtractError, StudioError};
pub use output::{
    CaseStudy, DeckOverview, ExtractedDocument, GenerationRequest, ParseKind, ParseOutcome,
    RenderedDocument, SummarySlide,
};
pub use pipeline::extract::{extract_content, DocumentFormat};
pub use pipeline::llm::{CompletionRequest, CompletionService, LlmCompletionClient};
pub use progress::{NoopProgress, SummaryProgressCallback};
pub use summarize::{create_summary_presentation, read_deck, run_deck_summary, summarize_deck};
