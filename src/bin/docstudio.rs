//! Server binary for docstudio.
//!
//! `docstudio case-study` and `docstudio summarizer` each serve one HTTP
//! surface; everything else is shared configuration.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docstudio::server::{case_study_router, serve, summarizer_router, AppState};
use docstudio::{LlmCompletionClient, StudioConfig};
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Case Study Studio on :5000
  docstudio case-study

  # Presentation summarizer on a different port
  docstudio summarizer --port 5001

  # Use another model for case studies
  docstudio --model gpt-4o case-study

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY           Completion service API key (also read from .env)
  DOCSTUDIO_PROVIDER       LLM provider name (default: openai)
  DOCSTUDIO_MODEL          Case-study model (default: gpt-4)
  DOCSTUDIO_SUMMARY_MODEL  Summarizer default model (default: gpt-3.5-turbo)
  DOCSTUDIO_API_TIMEOUT    Completion timeout in seconds (default: 60)
  DOCSTUDIO_UPLOAD_DIR     Where uploads are stored (default: uploads)
  DOCSTUDIO_OUTPUT_DIR     Where documents are written (default: outputs)
  PDFIUM_LIB_PATH          Existing libpdfium to use instead of the cached download
"#;

/// Serve the case-study or presentation-summarizer HTTP API.
#[derive(Parser, Debug)]
#[command(
    name = "docstudio",
    version,
    about = "Serve the case-study or presentation-summarizer HTTP API",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    service: Service,

    /// Completion service API key.
    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(long, global = true, env = "DOCSTUDIO_PROVIDER", default_value = "openai")]
    provider: String,

    /// Model used for case studies.
    #[arg(long, global = true, env = "DOCSTUDIO_MODEL", default_value = "gpt-4")]
    model: String,

    /// Default model for presentation summaries.
    #[arg(long, global = true, env = "DOCSTUDIO_SUMMARY_MODEL", default_value = "gpt-3.5-turbo")]
    summary_model: String,

    /// Completion call timeout in seconds.
    #[arg(long, global = true, env = "DOCSTUDIO_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Directory for uploaded files.
    #[arg(long, global = true, env = "DOCSTUDIO_UPLOAD_DIR", default_value = "uploads")]
    upload_dir: PathBuf,

    /// Directory for generated documents.
    #[arg(long, global = true, env = "DOCSTUDIO_OUTPUT_DIR", default_value = "outputs")]
    output_dir: PathBuf,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log errors only.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Service {
    /// Upload deliverables and generate DOCX case studies.
    CaseStudy(Listen),
    /// Upload a deck and generate an executive-summary slide.
    Summarizer(Listen),
}

#[derive(clap::Args, Debug)]
struct Listen {
    /// Address to bind.
    #[arg(long, env = "DOCSTUDIO_HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to bind.
    #[arg(short, long, env = "DOCSTUDIO_PORT", default_value_t = 5000)]
    port: u16,
}

fn main() -> Result<()> {
    // .env first so clap's env fallbacks see it.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;
    if !config.has_api_key() {
        warn!("OPENAI_API_KEY is not set; completion calls will fail until it is");
    }

    // PDF extraction binds pdfium lazily; fetch it now so the first upload
    // doesn't pay for the download. Failure only disables PDF input.
    if !pdfium_auto::is_pdfium_cached() {
        info!("Fetching the PDF engine…");
        if let Err(e) = tokio::task::block_in_place(|| pdfium_auto::ensure_pdfium_library(None)) {
            warn!("PDF engine unavailable, PDF uploads will carry an error marker: {}", e);
        }
    }

    let completion = Arc::new(LlmCompletionClient::from_config(&config));
    let state = AppState::new(config, completion);

    let (app, listen, name) = match &cli.service {
        Service::CaseStudy(listen) => (case_study_router(state), listen, "Case Study Studio"),
        Service::Summarizer(listen) => (summarizer_router(state), listen, "Presentation Summarizer"),
    };
    info!("Starting {}", name);
    serve(app, SocketAddr::new(listen.host, listen.port))
        .await
        .context("Server stopped with an error")
}

fn build_config(cli: &Cli) -> Result<StudioConfig> {
    let mut builder = StudioConfig::builder()
        .provider_name(&cli.provider)
        .model(&cli.model)
        .summary_model(&cli.summary_model)
        .api_timeout_secs(cli.api_timeout)
        .upload_dir(&cli.upload_dir)
        .output_dir(&cli.output_dir);
    if let Some(ref key) = cli.api_key {
        builder = builder.api_key(key);
    }
    builder.build().context("Invalid configuration")
}
