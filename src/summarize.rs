//! Presentation summarizer: `.pptx` in, one executive-summary slide out.
//!
//! Two completion calls per deck: the summary (fatal on failure) and the
//! title (never fatal, see [`generate_slide_title`]). The output is either a
//! fresh one-slide deck or, with `include_original`, a copy of the input
//! with the summary inserted as slide 1.

use crate::config::StudioConfig;
use crate::error::StudioError;
use crate::naming;
use crate::output::{DeckOverview, OutputFormat, RenderedDocument, SummarySlide};
use crate::pipeline::llm::{generate_slide_title, CompletionRequest, CompletionService};
use crate::pipeline::{deck, parse, pptx};
use crate::progress::SummaryProgressCallback;
use crate::prompts;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Subtitle placed under every generated title.
pub const SUMMARY_SUBTITLE: &str = "Executive Summary";

/// Read the deck at `path`.
///
/// # Errors
/// - [`StudioError::NotFound`] if `path` does not exist
/// - [`StudioError::Validation`] if it is not a `.pptx` file
/// - [`StudioError::Extraction`] if the package cannot be read
pub fn read_deck(path: &Path) -> Result<DeckOverview, StudioError> {
    if !path.exists() {
        return Err(StudioError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let is_pptx = path
        .file_name()
        .and_then(|n| naming::extension_of(&n.to_string_lossy()))
        .is_some_and(|ext| ext == OutputFormat::Pptx.extension());
    if !is_pptx {
        return Err(StudioError::validation("file", "File must be a .pptx file"));
    }
    Ok(deck::read_deck(path)?)
}

async fn read_deck_blocking(path: &Path) -> Result<DeckOverview, StudioError> {
    let owned = path.to_path_buf();
    tokio::task::spawn_blocking(move || read_deck(&owned))
        .await
        .map_err(|e| StudioError::Internal(format!("deck reader task failed: {e}")))?
}

/// Summarize a transcript in roughly `max_words` words.
///
/// # Errors
/// [`StudioError::Validation`] for blank content, [`StudioError::Completion`]
/// when the call fails.
pub async fn summarize_text(
    service: &dyn CompletionService,
    config: &StudioConfig,
    content: &str,
    max_words: usize,
    model: &str,
) -> Result<String, StudioError> {
    let prompt = prompts::summary_prompt(content, max_words)?;
    let request = CompletionRequest::for_summary(config, prompt, model, max_words);
    debug!(
        "Summary request: model={} max_tokens={}",
        request.model, request.max_tokens
    );
    let raw = service.complete(&request).await?;
    let outcome = parse::parse_summary(&raw);
    if !outcome.is_structured() {
        warn!("Model returned an empty summary");
    }
    Ok(outcome.into_inner())
}

/// Summary, generated title and the fixed subtitle for the deck at `path`.
pub async fn summarize_deck(
    service: &dyn CompletionService,
    config: &StudioConfig,
    path: &Path,
    max_words: usize,
    model: &str,
) -> Result<SummarySlide, StudioError> {
    let overview = read_deck_blocking(path).await?;
    info!(
        "Read {} slide(s) from {}",
        overview.total_slides,
        path.display()
    );
    summarize_overview(service, config, &overview, max_words, model, &crate::progress::NoopProgress)
        .await
}

async fn summarize_overview(
    service: &dyn CompletionService,
    config: &StudioConfig,
    overview: &DeckOverview,
    max_words: usize,
    model: &str,
    progress: &dyn SummaryProgressCallback,
) -> Result<SummarySlide, StudioError> {
    progress.on_summary_start(max_words);
    let summary = summarize_text(service, config, &overview.transcript(), max_words, model).await?;
    progress.on_summary_complete(summary.chars().count());

    progress.on_title_start();
    let title = generate_slide_title(service, config, &summary, model).await;
    progress.on_title_complete(&title);

    Ok(SummarySlide {
        title,
        summary,
        subtitle: Some(SUMMARY_SUBTITLE.to_string()),
    })
}

/// Write `slide` as a one-slide deck at `output`.
pub async fn create_summary_presentation(
    slide: &SummarySlide,
    output: &Path,
) -> Result<RenderedDocument, StudioError> {
    let slide = slide.clone();
    let output = output.to_path_buf();
    tokio::task::spawn_blocking(move || pptx::save_summary_deck(&slide, &output))
        .await
        .map_err(|e| StudioError::Internal(format!("render task failed: {e}")))?
}

/// `{dir}/{stem}_summary.pptx` next to `input`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "presentation".to_string());
    input.with_file_name(format!("{stem}_summary.pptx"))
}

/// Download name for a summary of `file_name`: extension dropped,
/// `_summary.pptx` appended.
pub fn summary_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit_once('.')
        .map(|(base, _)| base)
        .unwrap_or(file_name);
    format!("{base}_summary.pptx")
}

// ── End-to-end run ───────────────────────────────────────────────────────

/// One summarizer run, as driven by the CLI.
#[derive(Debug, Clone)]
pub struct DeckSummaryJob {
    pub input: PathBuf,
    /// Defaults to [`default_output_path`].
    pub output: Option<PathBuf>,
    pub max_words: usize,
    pub model: String,
    /// Insert the slide into a copy of the input instead of writing a
    /// one-slide deck.
    pub include_original: bool,
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct DeckSummaryReport {
    pub total_slides: usize,
    pub slide: SummarySlide,
    pub output: RenderedDocument,
}

/// Read, summarize, title and render, reporting each stage to `progress`.
///
/// The output path is validated before any completion call is made, so a
/// bad `--output` costs nothing.
pub async fn run_deck_summary(
    service: &dyn CompletionService,
    config: &StudioConfig,
    job: &DeckSummaryJob,
    progress: &dyn SummaryProgressCallback,
) -> Result<DeckSummaryReport, StudioError> {
    let output = job
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&job.input));
    crate::pipeline::ensure_extension(&output, OutputFormat::Pptx)?;

    progress.on_read_start(&job.input);
    let overview = read_deck_blocking(&job.input).await?;
    progress.on_deck_read(overview.total_slides);

    let slide = summarize_overview(
        service,
        config,
        &overview,
        job.max_words,
        &job.model,
        progress,
    )
    .await?;

    progress.on_render_start(&output);
    let rendered = if job.include_original {
        let (input, out, s) = (job.input.clone(), output.clone(), slide.clone());
        tokio::task::spawn_blocking(move || pptx::insert_summary_slide(&input, &s, &out))
            .await
            .map_err(|e| StudioError::Internal(format!("render task failed: {e}")))??
    } else {
        create_summary_presentation(&slide, &output).await?
    };
    progress.on_render_complete(&rendered.file_path);

    Ok(DeckSummaryReport {
        total_slides: overview.total_slides,
        slide,
        output: rendered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompletionError;
    use crate::pipeline::llm::FALLBACK_TITLE;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Answers summary requests with `summary`; fails title requests when
    /// `title` is `None`.
    struct Scripted {
        summary: String,
        title: Option<String>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl Scripted {
        fn new(summary: &str, title: Option<&str>) -> Self {
            Self {
                summary: summary.to_string(),
                title: title.map(str::to_string),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionService for Scripted {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
            self.requests.lock().unwrap().push(request.clone());
            if request.system == prompts::TITLE_SYSTEM_PROMPT {
                self.title.clone().ok_or(CompletionError::Transport {
                    detail: "connection reset".into(),
                })
            } else {
                Ok(self.summary.clone())
            }
        }
    }

    fn source_deck(dir: &Path) -> PathBuf {
        let path = dir.join("quarterly.pptx");
        pptx::save_summary_deck(
            &SummarySlide {
                title: "Q3 Review".into(),
                summary: "Revenue up 12%\nChurn down".into(),
                subtitle: None,
            },
            &path,
        )
        .unwrap();
        path
    }

    #[test]
    fn read_deck_validates_input() {
        let dir = tempfile::tempdir().unwrap();
        let missing = read_deck(&dir.path().join("nope.pptx")).unwrap_err();
        assert!(matches!(missing, StudioError::NotFound { .. }));

        let txt = dir.path().join("notes.txt");
        std::fs::write(&txt, "x").unwrap();
        let wrong = read_deck(&txt).unwrap_err();
        assert!(matches!(wrong, StudioError::Validation { .. }));
    }

    #[tokio::test]
    async fn deck_is_summarized_with_title_and_subtitle() {
        let dir = tempfile::tempdir().unwrap();
        let deck = source_deck(dir.path());
        let service = Scripted::new("  - Revenue up\n", Some("\"Strong Quarter\""));
        let config = StudioConfig::default();

        let slide = summarize_deck(&service, &config, &deck, 300, "gpt-3.5-turbo")
            .await
            .unwrap();
        assert_eq!(slide.title, "Strong Quarter");
        assert_eq!(slide.summary, "- Revenue up");
        assert_eq!(slide.subtitle.as_deref(), Some(SUMMARY_SUBTITLE));

        let requests = service.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].max_tokens, 400);
        assert!(requests[0].user.contains("Slide 1: Q3 Review"));
        assert_eq!(requests[1].max_tokens, 30);
    }

    #[tokio::test]
    async fn title_failure_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let deck = source_deck(dir.path());
        let service = Scripted::new("summary", None);
        let slide = summarize_deck(&service, &StudioConfig::default(), &deck, 400, "m")
            .await
            .unwrap();
        assert_eq!(slide.title, FALLBACK_TITLE);
    }

    #[tokio::test]
    async fn run_writes_default_output_and_reports_stages() {
        struct Stages(Mutex<Vec<&'static str>>);
        impl SummaryProgressCallback for Stages {
            fn on_read_start(&self, _: &Path) {
                self.0.lock().unwrap().push("read");
            }
            fn on_summary_start(&self, _: usize) {
                self.0.lock().unwrap().push("summary");
            }
            fn on_title_start(&self) {
                self.0.lock().unwrap().push("title");
            }
            fn on_render_complete(&self, _: &Path) {
                self.0.lock().unwrap().push("rendered");
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let deck = source_deck(dir.path());
        let job = DeckSummaryJob {
            input: deck.clone(),
            output: None,
            max_words: 400,
            model: "gpt-3.5-turbo".into(),
            include_original: false,
        };
        let stages = Stages(Mutex::new(Vec::new()));
        let report = run_deck_summary(
            &Scripted::new("short", Some("Title")),
            &StudioConfig::default(),
            &job,
            &stages,
        )
        .await
        .unwrap();

        assert_eq!(report.total_slides, 1);
        assert_eq!(report.output.file_path, dir.path().join("quarterly_summary.pptx"));
        assert!(report.output.file_path.exists());
        assert_eq!(*stages.0.lock().unwrap(), vec!["read", "summary", "title", "rendered"]);
    }

    #[tokio::test]
    async fn include_original_prepends_slide() {
        let dir = tempfile::tempdir().unwrap();
        let deck = source_deck(dir.path());
        let job = DeckSummaryJob {
            input: deck,
            output: Some(dir.path().join("out.pptx")),
            max_words: 400,
            model: "m".into(),
            include_original: true,
        };
        let report = run_deck_summary(
            &Scripted::new("the summary", Some("Headline")),
            &StudioConfig::default(),
            &job,
            &crate::progress::NoopProgress,
        )
        .await
        .unwrap();

        let out = read_deck(&report.output.file_path).unwrap();
        assert_eq!(out.total_slides, 2);
        assert_eq!(out.slides[0].title, "Headline");
        assert_eq!(out.slides[1].title, "Q3 Review");
    }

    #[tokio::test]
    async fn bad_output_extension_fails_before_any_call() {
        let dir = tempfile::tempdir().unwrap();
        let deck = source_deck(dir.path());
        let service = Scripted::new("s", Some("t"));
        let job = DeckSummaryJob {
            input: deck,
            output: Some(dir.path().join("out.docx")),
            max_words: 400,
            model: "m".into(),
            include_original: false,
        };
        let err = run_deck_summary(&service, &StudioConfig::default(), &job, &crate::progress::NoopProgress)
            .await
            .unwrap_err();
        assert!(matches!(err, StudioError::InvalidOutputPath { .. }));
        assert!(service.requests.lock().unwrap().is_empty());
    }

    #[test]
    fn output_names() {
        assert_eq!(
            default_output_path(Path::new("/decks/board.pptx")),
            PathBuf::from("/decks/board_summary.pptx")
        );
        assert_eq!(summary_file_name("board.pptx"), "board_summary.pptx");
        assert_eq!(summary_file_name("summary"), "summary_summary.pptx");
        assert_eq!(summary_file_name("a.b.pptx"), "a.b_summary.pptx");
    }
}
