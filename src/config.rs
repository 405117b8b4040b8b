//! Process-wide configuration for both services and the CLI.
//!
//! Every knob lives in [`StudioConfig`], built via [`StudioConfigBuilder`] or
//! loaded once from the environment with [`StudioConfig::from_env`]. The
//! config is immutable after start-up and injected as `Arc<StudioConfig>`
//! into each component rather than read from ambient globals.

use crate::error::StudioError;
use std::fmt;
use std::path::PathBuf;

/// Default model for case-study generation.
pub const DEFAULT_CASE_STUDY_MODEL: &str = "gpt-4";

/// Default model for presentation summaries and titles.
pub const DEFAULT_SUMMARY_MODEL: &str = "gpt-3.5-turbo";

/// Configuration shared by the pipelines, the HTTP surfaces and the CLI.
///
/// # Example
/// ```rust
/// use docstudio::StudioConfig;
///
/// let config = StudioConfig::builder()
///     .model("gpt-4o")
///     .api_timeout_secs(30)
///     .build()
///     .unwrap();
/// assert_eq!(config.document_char_budget, 1000);
/// ```
#[derive(Clone)]
pub struct StudioConfig {
    /// API key for the completion service. `None` means "not configured";
    /// the summarizer surface reports itself as not ready.
    pub api_key: Option<String>,

    /// edgequake-llm provider name. Default: `openai`.
    pub provider_name: String,

    /// Model used for case studies. Default: [`DEFAULT_CASE_STUDY_MODEL`].
    pub model: String,

    /// Model used for summaries when the request names none.
    /// Default: [`DEFAULT_SUMMARY_MODEL`].
    pub summary_model: String,

    /// Sampling temperature for every call site. Default: 0.7.
    pub temperature: f32,

    /// Output token cap for case-study generation. Default: 2000.
    pub case_study_max_tokens: usize,

    /// Output token cap for slide-title generation. Default: 30.
    pub title_max_tokens: usize,

    /// Words-per-token ratio used to turn a word budget into a token cap.
    /// Default: 0.75.
    pub words_per_token: f32,

    /// Summary length in words when the caller does not specify one. Default: 400.
    pub default_summary_words: usize,

    /// Characters of each document forwarded to the model. Default: 1000.
    pub document_char_budget: usize,

    /// Per-call completion timeout in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// Where uploads are stored. Default: `uploads`.
    pub upload_dir: PathBuf,

    /// Where generated documents are stored. Default: `outputs`.
    pub output_dir: PathBuf,

    /// Largest accepted request body in bytes. Default: 50 MiB.
    pub max_upload_bytes: usize,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider_name: "openai".to_string(),
            model: DEFAULT_CASE_STUDY_MODEL.to_string(),
            summary_model: DEFAULT_SUMMARY_MODEL.to_string(),
            temperature: 0.7,
            case_study_max_tokens: 2000,
            title_max_tokens: 30,
            words_per_token: 0.75,
            default_summary_words: 400,
            document_char_budget: 1000,
            api_timeout_secs: 60,
            upload_dir: PathBuf::from("uploads"),
            output_dir: PathBuf::from("outputs"),
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

impl fmt::Debug for StudioConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudioConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("provider_name", &self.provider_name)
            .field("model", &self.model)
            .field("summary_model", &self.summary_model)
            .field("temperature", &self.temperature)
            .field("case_study_max_tokens", &self.case_study_max_tokens)
            .field("title_max_tokens", &self.title_max_tokens)
            .field("document_char_budget", &self.document_char_budget)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("upload_dir", &self.upload_dir)
            .field("output_dir", &self.output_dir)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

impl StudioConfig {
    /// Create a new builder for `StudioConfig`.
    pub fn builder() -> StudioConfigBuilder {
        StudioConfigBuilder {
            config: Self::default(),
        }
    }

    /// Load the configuration from the process environment.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `OPENAI_API_KEY` | `api_key` |
    /// | `DOCSTUDIO_PROVIDER` | `provider_name` |
    /// | `DOCSTUDIO_MODEL` | `model` |
    /// | `DOCSTUDIO_SUMMARY_MODEL` | `summary_model` |
    /// | `DOCSTUDIO_API_TIMEOUT` | `api_timeout_secs` |
    /// | `DOCSTUDIO_UPLOAD_DIR` | `upload_dir` |
    /// | `DOCSTUDIO_OUTPUT_DIR` | `output_dir` |
    ///
    /// Call this once at start-up; nothing in the library re-reads the
    /// environment afterwards.
    pub fn from_env() -> Result<Self, StudioError> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let mut builder = Self::builder();
        if let Some(key) = var("OPENAI_API_KEY") {
            builder = builder.api_key(key);
        }
        if let Some(p) = var("DOCSTUDIO_PROVIDER") {
            builder = builder.provider_name(p);
        }
        if let Some(m) = var("DOCSTUDIO_MODEL") {
            builder = builder.model(m);
        }
        if let Some(m) = var("DOCSTUDIO_SUMMARY_MODEL") {
            builder = builder.summary_model(m);
        }
        if let Some(t) = var("DOCSTUDIO_API_TIMEOUT") {
            let secs = t.parse::<u64>().map_err(|_| {
                StudioError::InvalidConfig(format!(
                    "DOCSTUDIO_API_TIMEOUT must be a whole number of seconds, got '{t}'"
                ))
            })?;
            builder = builder.api_timeout_secs(secs);
        }
        if let Some(d) = var("DOCSTUDIO_UPLOAD_DIR") {
            builder = builder.upload_dir(d);
        }
        if let Some(d) = var("DOCSTUDIO_OUTPUT_DIR") {
            builder = builder.output_dir(d);
        }
        builder.build()
    }

    /// `true` when an API key is available for the completion service.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Token cap for a summary of `max_words` words: `ceil(words / ratio)`.
    pub fn summary_token_budget(&self, max_words: usize) -> usize {
        (max_words as f64 / f64::from(self.words_per_token)).ceil() as usize
    }
}

/// Builder for [`StudioConfig`].
#[derive(Debug)]
pub struct StudioConfigBuilder {
    config: StudioConfig,
}

impl StudioConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = name.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn summary_model(mut self, model: impl Into<String>) -> Self {
        self.config.summary_model = model.into();
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn case_study_max_tokens(mut self, n: usize) -> Self {
        self.config.case_study_max_tokens = n;
        self
    }

    pub fn title_max_tokens(mut self, n: usize) -> Self {
        self.config.title_max_tokens = n;
        self
    }

    pub fn default_summary_words(mut self, n: usize) -> Self {
        self.config.default_summary_words = n;
        self
    }

    pub fn document_char_budget(mut self, n: usize) -> Self {
        self.config.document_char_budget = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.upload_dir = dir.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn max_upload_bytes(mut self, n: usize) -> Self {
        self.config.max_upload_bytes = n;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<StudioConfig, StudioError> {
        let c = &self.config;
        if c.model.trim().is_empty() || c.summary_model.trim().is_empty() {
            return Err(StudioError::InvalidConfig("Model name must not be empty".into()));
        }
        if c.api_timeout_secs == 0 {
            return Err(StudioError::InvalidConfig(
                "API timeout must be ≥ 1 second".into(),
            ));
        }
        if c.document_char_budget == 0 {
            return Err(StudioError::InvalidConfig(
                "Document character budget must be ≥ 1".into(),
            ));
        }
        if c.max_upload_bytes == 0 {
            return Err(StudioError::InvalidConfig(
                "Upload limit must be ≥ 1 byte".into(),
            ));
        }
        Ok(self.config)
    }
}
