//! Error types for the docstudio library.
//!
//! Three error types reflect three distinct failure modes:
//!
//! * [`StudioError`]: **Fatal** for the request: bad input, missing file,
//!   completion service failure, render/write failure. Returned as
//!   `Err(StudioError)` from the orchestrators and mapped onto an HTTP status
//!   by the server.
//!
//! * [`ExtractError`]: **Non-fatal** for a batch: a single document could not
//!   be read. The case-study pipeline turns it into an inline marker inside
//!   that document's text, so one bad upload degrades its own content and
//!   nothing else.
//!
//! * [`CompletionError`]: a failed call to the completion service, kept as
//!   its own type so callers can inspect the [`CompletionFailureKind`] and
//!   give a targeted message (bad key vs. rate limit vs. network).

use std::path::PathBuf;
use thiserror::Error;

/// All request-level errors returned by the docstudio library.
#[derive(Debug, Error)]
pub enum StudioError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Bad or missing input value.
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// A referenced file does not exist.
    #[error("File not found: '{path}'")]
    NotFound { path: PathBuf },

    /// Document extraction failed and the caller asked for it to be fatal.
    #[error(transparent)]
    Extraction(#[from] ExtractError),

    // ── Completion errors ─────────────────────────────────────────────────
    /// The completion service call failed.
    #[error(transparent)]
    Completion(#[from] CompletionError),

    // ── Output errors ─────────────────────────────────────────────────────
    /// The output path does not carry the extension the renderer produces.
    #[error("Output file must have .{expected} extension, got: '{path}'")]
    InvalidOutputPath { path: PathBuf, expected: &'static str },

    /// The document library could not build the output package.
    #[error("Failed to render document: {detail}")]
    Render { detail: String },

    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StudioError {
    /// Shorthand for a [`StudioError::Validation`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        StudioError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// HTTP status code for this error.
    ///
    /// Authentication and rate-limit failures are the caller's to fix, so
    /// they are reported as 400; transport failures are ours (500).
    pub fn status_code(&self) -> u16 {
        match self {
            StudioError::Validation { .. } | StudioError::InvalidOutputPath { .. } => 400,
            StudioError::NotFound { .. } => 404,
            StudioError::Extraction(ExtractError::UnsupportedFormat { .. }) => 400,
            StudioError::Completion(e) => match e.kind() {
                CompletionFailureKind::Authentication | CompletionFailureKind::RateLimit => 400,
                CompletionFailureKind::Transport => 500,
            },
            _ => 500,
        }
    }

    /// Message safe to show to an HTTP client.
    ///
    /// Internal and I/O failures collapse to a generic sentence; everything
    /// else carries its own human-readable cause.
    pub fn public_message(&self) -> String {
        match self {
            StudioError::Internal(_) | StudioError::OutputWriteFailed { .. } => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// A non-fatal error for a single document.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The extension is not one of the supported formats.
    #[error("Unsupported file format: .{extension}")]
    UnsupportedFormat { extension: String },

    /// The library backing this format could not be loaded.
    #[error("{format} support is not available: {detail}")]
    LibraryUnavailable { format: &'static str, detail: String },

    /// The file was read but its content could not be parsed.
    #[error("Error extracting {format} from '{path}': {detail}")]
    Malformed {
        format: &'static str,
        path: PathBuf,
        detail: String,
    },

    /// Reading the file failed.
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    /// Inline marker placed in a document's text when its extraction failed.
    pub fn marker(&self) -> String {
        format!("Error processing: {self}")
    }
}

/// Coarse classification of a [`CompletionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionFailureKind {
    Authentication,
    RateLimit,
    Transport,
}

/// A failed call to the completion service.
#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    /// The provider rejected the credentials (401/403) or none were set.
    #[error("Authentication failed. Please check your API key. ({detail})")]
    Authentication { detail: String },

    /// The provider could not be constructed (missing key, unknown provider).
    #[error("LLM provider '{provider}' is not configured: {hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// HTTP 429 from the provider.
    #[error("Rate limit exceeded. Please wait before trying again. ({detail})")]
    RateLimitExceeded { detail: String },

    /// The call did not finish within the configured timeout.
    #[error("Completion request timed out after {secs}s")]
    Timeout { secs: u64 },

    /// Network or any other provider failure.
    #[error("Failed to generate completion: {detail}")]
    Transport { detail: String },
}

impl CompletionError {
    pub fn kind(&self) -> CompletionFailureKind {
        match self {
            CompletionError::Authentication { .. }
            | CompletionError::ProviderNotConfigured { .. } => CompletionFailureKind::Authentication,
            CompletionError::RateLimitExceeded { .. } => CompletionFailureKind::RateLimit,
            CompletionError::Timeout { .. } | CompletionError::Transport { .. } => {
                CompletionFailureKind::Transport
            }
        }
    }
}
