/*!
 * Lyrics correction through a language model.
 *
 * The reconciler only sees the [`Corrector`] trait. [`CorrectionService`]
 * implements it on top of the configured provider client, and
 * [`KeepOriginal`] implements it without any service for offline runs.
 */

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};

use crate::app_config::{CorrectionCommonConfig, CorrectionConfig, CorrectionProvider};
use crate::errors::ProviderError;
use crate::providers::Provider;
use crate::providers::anthropic::{Anthropic, AnthropicRequest};
use crate::providers::ollama::{ChatRequest, Ollama};
use crate::providers::openai::{OpenAI, OpenAIRequest};

/// Suggests a corrected lyric line for a mismatched pair
#[async_trait]
pub trait Corrector: Send + Sync {
    /// Return the corrected line; an empty answer means "no suggestion"
    async fn correct(&self, original: &str, transcribed: &str) -> Result<String, ProviderError>;
}

/// Corrector that never suggests anything, so mismatches keep the original
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepOriginal;

#[async_trait]
impl Corrector for KeepOriginal {
    async fn correct(&self, _original: &str, _transcribed: &str) -> Result<String, ProviderError> {
        Ok(String::new())
    }
}

/// Build the user prompt for one mismatched pair
pub fn build_correction_prompt(original: &str, transcribed: &str) -> String {
    format!(
        "Correct the transcribed lyrics to match the original lyrics:\nOriginal: {}\nTranscribed: {}\nCorrected:",
        original, transcribed
    )
}

/// Strip the wrapping a chat model tends to add around a single line
pub fn clean_suggestion(raw: &str) -> String {
    let line = raw.trim().lines().next().unwrap_or_default().trim();
    let line = line
        .strip_prefix("Corrected:")
        .map(str::trim)
        .unwrap_or(line);
    let line = line
        .strip_prefix('"')
        .and_then(|l| l.strip_suffix('"'))
        .unwrap_or(line);
    line.trim().to_string()
}

/// Run `operation`, retrying transient provider errors with exponential backoff.
///
/// Attempt `n` (0-based) waits `backoff_ms * 2^(n-1)` before running.
pub async fn with_retries<T, F, Fut>(retry_count: u32, backoff_ms: u64, mut operation: F) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < retry_count => {
                let delay = backoff_ms.saturating_mul(1u64 << attempt.min(16));
                warn!("{} (retry {}/{} in {} ms)", e, attempt + 1, retry_count, delay);
                tokio::time::sleep(Duration::from_millis(delay)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

enum CorrectionClient {
    OpenAI(OpenAI),
    Anthropic(Anthropic),
    Ollama(Ollama),
}

/// Corrector backed by the configured LLM provider
pub struct CorrectionService {
    client: CorrectionClient,
    provider: CorrectionProvider,
    model: String,
    options: CorrectionCommonConfig,
}

impl CorrectionService {
    /// Create the service for the active provider in `config`.
    ///
    /// The API key is taken from the configuration value; nothing is read
    /// from the environment here.
    pub fn new(config: &CorrectionConfig) -> Self {
        let endpoint = config.get_endpoint();
        let api_key = config.get_api_key();
        let timeout_secs = config.get_timeout_secs();

        let client = match config.provider {
            CorrectionProvider::OpenAI | CorrectionProvider::LMStudio => {
                CorrectionClient::OpenAI(OpenAI::new(api_key, endpoint, timeout_secs))
            }
            CorrectionProvider::Anthropic => {
                CorrectionClient::Anthropic(Anthropic::new(api_key, endpoint, timeout_secs))
            }
            CorrectionProvider::Ollama => CorrectionClient::Ollama(Ollama::new(endpoint, timeout_secs)),
        };

        Self {
            client,
            provider: config.provider.clone(),
            model: config.get_model(),
            options: config.common.clone(),
        }
    }

    pub fn provider(&self) -> &CorrectionProvider {
        &self.provider
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Check that the provider is reachable and accepts the credentials
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        match &self.client {
            CorrectionClient::OpenAI(client) => client.test_connection().await,
            CorrectionClient::Anthropic(client) => client.test_connection().await,
            CorrectionClient::Ollama(client) => client.test_connection().await,
        }
    }

    async fn complete_once(&self, prompt: &str) -> Result<String, ProviderError> {
        let system = self.options.system_prompt.as_str();
        let temperature = self.options.temperature;
        let max_tokens = self.options.max_tokens;

        match &self.client {
            CorrectionClient::OpenAI(client) => {
                let request = OpenAIRequest::new(&self.model)
                    .add_message("system", system)
                    .add_message("user", prompt)
                    .temperature(temperature)
                    .max_tokens(max_tokens);
                let response = client.complete(request).await?;
                Ok(OpenAI::extract_text(&response))
            }
            CorrectionClient::Anthropic(client) => {
                let request = AnthropicRequest::new(&self.model, max_tokens)
                    .system(system)
                    .add_message("user", prompt)
                    .temperature(temperature);
                let response = client.complete(request).await?;
                Ok(Anthropic::extract_text(&response))
            }
            CorrectionClient::Ollama(client) => {
                let request = ChatRequest::new(&self.model)
                    .add_message("system", system)
                    .add_message("user", prompt)
                    .temperature(temperature)
                    .num_predict(max_tokens);
                let response = client.complete(request).await?;
                Ok(Ollama::extract_text(&response))
            }
        }
    }
}

#[async_trait]
impl Corrector for CorrectionService {
    async fn correct(&self, original: &str, transcribed: &str) -> Result<String, ProviderError> {
        let prompt = build_correction_prompt(original, transcribed);
        let raw = with_retries(self.options.retry_count, self.options.retry_backoff_ms, || {
            self.complete_once(&prompt)
        })
        .await?;

        let suggestion = clean_suggestion(&raw);
        debug!("{} suggested '{}' for '{}'", self.provider.display_name(), suggestion, transcribed);
        Ok(suggestion)
    }
}
