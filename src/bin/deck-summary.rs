//! CLI binary: executive-summary slide for a PowerPoint deck.
//!
//! A thin shim over [`docstudio::run_deck_summary`] that maps flags onto a
//! [`DeckSummaryJob`] and shows stage progress on a spinner.

use anyhow::{bail, Context, Result};
use clap::Parser;
use docstudio::summarize::{default_output_path, DeckSummaryJob};
use docstudio::{run_deck_summary, LlmCompletionClient, StudioConfig, SummaryProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Spinner driven by the summarizer's stage callbacks ───────────────────────

struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    fn done(&self, line: String) {
        self.bar.println(format!("  {} {}", green("✓"), line));
    }
}

impl SummaryProgressCallback for Spinner {
    fn on_read_start(&self, path: &Path) {
        self.bar.set_prefix("Reading");
        self.bar.set_message(path.display().to_string());
    }

    fn on_deck_read(&self, total_slides: usize) {
        self.done(format!("Extracted content from {total_slides} slides"));
    }

    fn on_summary_start(&self, max_words: usize) {
        self.bar.set_prefix("Summarizing");
        self.bar.set_message(format!("max {max_words} words…"));
    }

    fn on_summary_complete(&self, summary_len: usize) {
        self.done(format!("Summary generated ({summary_len} chars)"));
    }

    fn on_title_start(&self) {
        self.bar.set_prefix("Titling");
        self.bar.set_message("generating slide title…");
    }

    fn on_title_complete(&self, title: &str) {
        self.done(format!("Title: {}", bold(title)));
    }

    fn on_render_start(&self, output: &Path) {
        self.bar.set_prefix("Writing");
        self.bar.set_message(output.display().to_string());
    }

    fn on_render_complete(&self, output: &Path) {
        self.bar.finish_and_clear();
        eprintln!("{} Presentation saved to: {}", green("✔"), output.display());
    }
}

/// Create an executive-summary slide from a PowerPoint deck.
#[derive(Parser, Debug)]
#[command(
    name = "deck-summary",
    version,
    about = "Create an executive-summary slide from a PowerPoint deck",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_help = "EXAMPLE:\n  deck-summary presentation.pptx --output summary.pptx"
)]
struct Cli {
    /// Input `.pptx` file.
    input: PathBuf,

    /// Output file path (default: {input_stem}_summary.pptx next to the input).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Completion service API key.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Maximum length of the summary in words.
    #[arg(long, default_value_t = 400,
          value_parser = clap::value_parser!(u32).range(1..))]
    max_length: u32,

    /// Model to use.
    #[arg(long, env = "DOCSTUDIO_SUMMARY_MODEL", default_value = "gpt-3.5-turbo")]
    model: String,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(long, env = "DOCSTUDIO_PROVIDER", default_value = "openai")]
    provider: String,

    /// Completion call timeout in seconds.
    #[arg(long, env = "DOCSTUDIO_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Insert the summary slide at the front of a copy of the input deck
    /// instead of writing a one-slide file.
    #[arg(long)]
    include_original: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress everything except errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // With the spinner active, library INFO logs would only interleave with it.
    let filter = if cli.verbose { "debug" } else { "error" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} Error: {:#}", red("✘"), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if !cli.input.exists() {
        bail!("File not found: '{}'", cli.input.display());
    }
    let Some(key) = cli.api_key.clone().filter(|k| !k.trim().is_empty()) else {
        bail!("OpenAI API key is required. Set OPENAI_API_KEY or pass --api-key.");
    };
    let config = StudioConfig::builder()
        .api_key(key)
        .provider_name(&cli.provider)
        .summary_model(&cli.model)
        .api_timeout_secs(cli.api_timeout)
        .build()
        .context("Invalid configuration")?;

    let job = DeckSummaryJob {
        output: Some(
            cli.output
                .clone()
                .unwrap_or_else(|| default_output_path(&cli.input)),
        ),
        input: cli.input.clone(),
        max_words: cli.max_length as usize,
        model: cli.model.clone(),
        include_original: cli.include_original,
    };

    if !cli.quiet {
        eprintln!("{}", bold("📊 Presentation Summarizer"));
        eprintln!("{}", "-".repeat(50));
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;
    let client = LlmCompletionClient::from_config(&config);

    let report = runtime.block_on(async {
        if cli.quiet {
            run_deck_summary(&client, &config, &job, &docstudio::NoopProgress).await
        } else {
            let spinner = Spinner::new();
            let result = run_deck_summary(&client, &config, &job, &spinner).await;
            spinner.bar.finish_and_clear();
            result
        }
    })?;

    if !cli.quiet {
        eprintln!("{}", "-".repeat(50));
        eprintln!(
            "✨ Done! Summary of {} slides written to {}",
            report.total_slides,
            report.output.file_path.display()
        );
    }
    Ok(())
}
