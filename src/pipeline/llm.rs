//! Completion calls: one system + one user message in, raw text out.
//!
//! The pipelines talk to a [`CompletionService`] rather than to a provider
//! directly. Production code uses [`LlmCompletionClient`] (edgequake-llm);
//! tests plug in a canned implementation.
//!
//! ## Failure classification
//!
//! Provider errors are mapped onto three kinds (authentication, rate limit,
//! transport) by inspecting the error text, since providers disagree on
//! which structured variant they raise for a 401 or a 429. Each call is
//! bounded by `api_timeout_secs`; an expired call is a transport failure.
//! There are no retries.

use crate::config::StudioConfig;
use crate::error::CompletionError;
use crate::prompts::{CASE_STUDY_SYSTEM_PROMPT, SUMMARY_SYSTEM_PROMPT, TITLE_SYSTEM_PROMPT};
use async_trait::async_trait;
use edgequake_llm::{ChatMessage, CompletionOptions, LLMProvider, OpenAIProvider, ProviderFactory};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Title used whenever title generation fails.
pub const FALLBACK_TITLE: &str = "Executive Summary";

/// A single completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: usize,
}

impl CompletionRequest {
    /// Case-study generation: configured model, 2000-token cap by default.
    pub fn for_case_study(config: &StudioConfig, prompt: impl Into<String>) -> Self {
        Self {
            system: CASE_STUDY_SYSTEM_PROMPT.to_string(),
            user: prompt.into(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.case_study_max_tokens,
        }
    }

    /// Executive summary of roughly `max_words` words.
    pub fn for_summary(
        config: &StudioConfig,
        prompt: impl Into<String>,
        model: &str,
        max_words: usize,
    ) -> Self {
        Self {
            system: SUMMARY_SYSTEM_PROMPT.to_string(),
            user: prompt.into(),
            model: model.to_string(),
            temperature: config.temperature,
            max_tokens: config.summary_token_budget(max_words),
        }
    }

    /// Slide title: short cap from `title_max_tokens`.
    pub fn for_title(config: &StudioConfig, prompt: impl Into<String>, model: &str) -> Self {
        Self {
            system: TITLE_SYSTEM_PROMPT.to_string(),
            user: prompt.into(),
            model: model.to_string(),
            temperature: config.temperature,
            max_tokens: config.title_max_tokens,
        }
    }
}

/// Anything that can turn a [`CompletionRequest`] into text.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

/// [`CompletionService`] backed by an edgequake-llm provider.
pub struct LlmCompletionClient {
    provider_name: String,
    /// Configured key; used directly for the `openai` provider.
    api_key: Option<String>,
    timeout: Duration,
    /// Pre-built provider used for every model instead of the factory.
    provider: Option<Arc<dyn LLMProvider>>,
}

impl LlmCompletionClient {
    /// Resolve providers by name (`config.provider_name`) for each request's
    /// model.
    ///
    /// With the `openai` provider and a configured `api_key`, the key is
    /// handed to the provider directly. Every other case goes through the
    /// factory, which reads keys from the environment.
    pub fn from_config(config: &StudioConfig) -> Self {
        Self {
            provider_name: config.provider_name.clone(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            timeout: Duration::from_secs(config.api_timeout_secs),
            provider: None,
        }
    }

    /// Use a caller-constructed provider for every request.
    pub fn with_provider(provider: Arc<dyn LLMProvider>, timeout: Duration) -> Self {
        Self {
            provider_name: "custom".to_string(),
            api_key: None,
            timeout,
            provider: Some(provider),
        }
    }

    fn provider_for(&self, model: &str) -> Result<Arc<dyn LLMProvider>, CompletionError> {
        if let Some(ref provider) = self.provider {
            return Ok(Arc::clone(provider));
        }
        if let Some(ref key) = self.api_key {
            if self.provider_name.eq_ignore_ascii_case("openai") {
                return Ok(Arc::new(OpenAIProvider::new(key.as_str()).with_model(model)));
            }
        }
        ProviderFactory::create_llm_provider(&self.provider_name, model).map_err(|e| {
            CompletionError::ProviderNotConfigured {
                provider: self.provider_name.clone(),
                hint: format!("{e}"),
            }
        })
    }
}

#[async_trait]
impl CompletionService for LlmCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        let provider = self.provider_for(&request.model)?;
        let messages = vec![
            ChatMessage::system(request.system.as_str()),
            ChatMessage::user(request.user.as_str()),
        ];
        let options = build_options(request);
        let start = Instant::now();

        let response = tokio::time::timeout(self.timeout, provider.chat(&messages, Some(&options)))
            .await
            .map_err(|_| CompletionError::Timeout {
                secs: self.timeout.as_secs(),
            })?
            .map_err(|e| classify_failure(&format!("{e}")))?;

        debug!(
            "Completion ({}): {} input tokens, {} output tokens, {:?}",
            request.model,
            response.prompt_tokens,
            response.completion_tokens,
            start.elapsed()
        );
        Ok(response.content)
    }
}

fn build_options(request: &CompletionRequest) -> CompletionOptions {
    CompletionOptions {
        temperature: Some(request.temperature),
        max_tokens: Some(request.max_tokens),
        ..Default::default()
    }
}

/// Map a provider error message onto a [`CompletionError`] kind.
pub fn classify_failure(detail: &str) -> CompletionError {
    let lower = detail.to_lowercase();
    if lower.contains("401")
        || lower.contains("403")
        || lower.contains("unauthorized")
        || lower.contains("authentication")
        || lower.contains("api key")
        || lower.contains("api_key")
    {
        CompletionError::Authentication {
            detail: detail.to_string(),
        }
    } else if lower.contains("429") || lower.contains("rate limit") || lower.contains("ratelimit") {
        CompletionError::RateLimitExceeded {
            detail: detail.to_string(),
        }
    } else {
        CompletionError::Transport {
            detail: detail.to_string(),
        }
    }
}

/// Ask for a 5-10 word title; never fails.
///
/// Any error, or an empty reply, yields [`FALLBACK_TITLE`]. Surrounding
/// whitespace and quotes are stripped from the reply.
pub async fn generate_slide_title(
    service: &dyn CompletionService,
    config: &StudioConfig,
    summary: &str,
    model: &str,
) -> String {
    let request = CompletionRequest::for_title(config, crate::prompts::title_prompt(summary), model);
    match service.complete(&request).await {
        Ok(raw) => {
            let title = raw.trim().trim_matches(|c| c == '"' || c == '\'').trim();
            if title.is_empty() {
                FALLBACK_TITLE.to_string()
            } else {
                title.to_string()
            }
        }
        Err(e) => {
            warn!("Title generation failed, using fallback: {}", e);
            FALLBACK_TITLE.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Result<String, CompletionError>);

    #[async_trait]
    impl CompletionService for Fixed {
        async fn complete(&self, _: &CompletionRequest) -> Result<String, CompletionError> {
            self.0.clone()
        }
    }

    #[test]
    fn call_site_budgets() {
        let config = StudioConfig::default();
        let cs = CompletionRequest::for_case_study(&config, "p");
        assert_eq!((cs.temperature, cs.max_tokens), (0.7, 2000));
        assert_eq!(cs.model, "gpt-4");

        let s = CompletionRequest::for_summary(&config, "p", "gpt-3.5-turbo", 400);
        assert_eq!(s.max_tokens, 534);

        let t = CompletionRequest::for_title(&config, "p", "gpt-3.5-turbo");
        assert_eq!(t.max_tokens, 30);
        assert_eq!(t.system, TITLE_SYSTEM_PROMPT);
    }

    #[test]
    fn options_mirror_request() {
        let config = StudioConfig::default();
        let opts = build_options(&CompletionRequest::for_case_study(&config, "p"));
        assert_eq!(opts.temperature, Some(0.7));
        assert_eq!(opts.max_tokens, Some(2000));
    }

    #[test]
    fn configured_key_builds_openai_provider_without_env() {
        std::env::remove_var("OPENAI_API_KEY");
        let config = StudioConfig::builder()
            .api_key("sk-configured")
            .build()
            .unwrap();
        let client = LlmCompletionClient::from_config(&config);
        let provider = client.provider_for("gpt-4").unwrap();
        assert_eq!(provider.model(), "gpt-4");
    }

    #[test]
    fn failures_are_classified() {
        assert!(matches!(
            classify_failure("HTTP 401 Unauthorized"),
            CompletionError::Authentication { .. }
        ));
        assert!(matches!(
            classify_failure("429 Too Many Requests: Rate limit reached"),
            CompletionError::RateLimitExceeded { .. }
        ));
        assert!(matches!(
            classify_failure("connection reset by peer"),
            CompletionError::Transport { .. }
        ));
    }

    #[test]
    fn title_falls_back_on_error() {
        let config = StudioConfig::default();
        let service = Fixed(Err(CompletionError::Transport {
            detail: "boom".into(),
        }));
        let title = tokio_test::block_on(generate_slide_title(&service, &config, "s", "m"));
        assert_eq!(title, FALLBACK_TITLE);
    }

    #[tokio::test]
    async fn title_is_trimmed_and_unquoted() {
        let config = StudioConfig::default();
        let service = Fixed(Ok("  \"Growth Through Focus\"\n".into()));
        let title = generate_slide_title(&service, &config, "s", "m").await;
        assert_eq!(title, "Growth Through Focus");
    }

    #[tokio::test]
    async fn blank_title_falls_back() {
        let config = StudioConfig::default();
        let service = Fixed(Ok("   ".into()));
        assert_eq!(
            generate_slide_title(&service, &config, "s", "m").await,
            FALLBACK_TITLE
        );
    }
}
