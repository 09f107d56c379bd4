use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use url::Url;

use crate::lyrics::{AlignmentStrategy, MismatchPolicy};
use crate::timestamp::LrcTimestampStyle;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Speech transcription settings
    #[serde(default)]
    pub transcription: TranscriptionConfig,

    /// Lyrics correction settings
    #[serde(default)]
    pub correction: CorrectionConfig,

    /// Output files and LRC formatting
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Correction provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CorrectionProvider {
    // @provider: OpenAI
    #[default]
    OpenAI,
    // @provider: Anthropic
    Anthropic,
    // @provider: Ollama
    Ollama,
    // @provider: LM Studio (OpenAI-compatible local server)
    LMStudio,
}

impl CorrectionProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::Ollama => "Ollama",
            Self::LMStudio => "LM Studio",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::OpenAI => "openai".to_string(),
            Self::Anthropic => "anthropic".to_string(),
            Self::Ollama => "ollama".to_string(),
            Self::LMStudio => "lmstudio".to_string(),
        }
    }

    // @returns: Whether the hosted API needs a key
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::OpenAI | Self::Anthropic)
    }
}

// Implement Display trait for CorrectionProvider
impl std::fmt::Display for CorrectionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for CorrectionProvider
impl std::str::FromStr for CorrectionProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            "ollama" => Ok(Self::Ollama),
            "lmstudio" => Ok(Self::LMStudio),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: CorrectionProvider) -> Self {
        Self {
            provider_type: provider_type.to_lowercase_string(),
            model: default_model(&provider_type),
            api_key: String::new(),
            endpoint: default_endpoint(&provider_type),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Speech transcription settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranscriptionConfig {
    /// Whisper executable name or path
    #[serde(default = "default_whisper_command")]
    pub command: String,

    /// Whisper model name (tiny, base, small, medium, large, ...)
    #[serde(default = "default_whisper_model")]
    pub model: String,

    /// Spoken language code; auto-detected when unset
    #[serde(default)]
    pub language: Option<String>,

    /// Inference device passed through to whisper (cpu, cuda)
    #[serde(default)]
    pub device: Option<String>,

    /// Deadline for the whole transcription in seconds
    #[serde(default = "default_transcription_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            command: default_whisper_command(),
            model: default_whisper_model(),
            language: None,
            device: None,
            timeout_secs: default_transcription_timeout_secs(),
        }
    }
}

/// Lyrics correction configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CorrectionConfig {
    /// Whether mismatched lines are sent to a language model
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Correction provider to use
    #[serde(default)]
    pub provider: CorrectionProvider,

    /// Available correction providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common correction settings
    #[serde(default)]
    pub common: CorrectionCommonConfig,
}

/// Common correction settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CorrectionCommonConfig {
    /// System prompt sent with every correction request
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Temperature parameter for text generation (0.0 to 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens in a corrected line
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Retry count for rate-limited or dropped requests
    #[serde(default)]
    pub retry_count: u32,

    /// Backoff base for retries (in milliseconds), doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for CorrectionCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            retry_count: 0,
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Output files and LRC formatting
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    /// Directory receiving both output files
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,

    /// SRT file name
    #[serde(default = "default_srt_file")]
    pub srt_file: String,

    /// LRC file name
    #[serde(default = "default_lrc_file")]
    pub lrc_file: String,

    /// How LRC timestamps are written
    #[serde(default)]
    pub lrc_style: LrcTimestampStyle,

    /// How original lines are paired with transcribed lines
    #[serde(default)]
    pub alignment: AlignmentStrategy,

    /// What to do with lines that cannot be paired
    #[serde(default)]
    pub mismatch_policy: MismatchPolicy,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            srt_file: default_srt_file(),
            lrc_file: default_lrc_file(),
            lrc_style: LrcTimestampStyle::default(),
            alignment: AlignmentStrategy::default(),
            mismatch_policy: MismatchPolicy::default(),
        }
    }
}

impl OutputConfig {
    /// Full path of the SRT output
    pub fn srt_path(&self) -> PathBuf {
        self.directory.join(&self.srt_file)
    }

    /// Full path of the LRC output
    pub fn lrc_path(&self) -> PathBuf {
        self.directory.join(&self.lrc_file)
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_transcription_timeout_secs() -> u64 {
    1800 // 30 minutes covers the large models on CPU
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_temperature() -> f32 {
    0.0
}

fn default_max_tokens() -> u32 {
    60
}

fn default_true() -> bool {
    true
}

fn default_whisper_command() -> String {
    "whisper".to_string()
}

fn default_whisper_model() -> String {
    "base".to_string()
}

fn default_output_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_srt_file() -> String {
    "transcription.srt".to_string()
}

fn default_lrc_file() -> String {
    "song.lrc".to_string()
}

fn default_endpoint(provider: &CorrectionProvider) -> String {
    match provider {
        CorrectionProvider::OpenAI => "https://api.openai.com/v1".to_string(),
        CorrectionProvider::Anthropic => "https://api.anthropic.com".to_string(),
        CorrectionProvider::Ollama => "http://localhost:11434".to_string(),
        // LM Studio default server (OpenAI compatible) runs on port 1234 under /v1
        CorrectionProvider::LMStudio => "http://localhost:1234/v1".to_string(),
    }
}

fn default_model(provider: &CorrectionProvider) -> String {
    match provider {
        CorrectionProvider::OpenAI => "gpt-4o-mini".to_string(),
        CorrectionProvider::Anthropic => "claude-3-haiku-20240307".to_string(),
        CorrectionProvider::Ollama => "llama3.2:3b".to_string(),
        // Placeholder; users should set to the loaded model name in LM Studio
        CorrectionProvider::LMStudio => "local-model".to_string(),
    }
}

fn default_system_prompt() -> String {
    "You fix song lyrics produced by a speech recognizer. Reply with the corrected line only, without quotes, labels or commentary.".to_string()
}

impl Config {
    /// Load the configuration at `path`, writing a default one first when the
    /// file does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            return serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()));
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let transcription = &self.transcription;
        if transcription.command.trim().is_empty() {
            return Err(anyhow!("Transcription command cannot be empty"));
        }
        if transcription.model.trim().is_empty() {
            return Err(anyhow!("Transcription model cannot be empty"));
        }
        if transcription.timeout_secs == 0 {
            return Err(anyhow!("Transcription timeout must be greater than zero"));
        }
        if let Some(language) = &transcription.language {
            crate::language_utils::get_language_name(language)?;
        }

        if self.correction.enabled {
            self.correction.validate()?;
        }

        let output = &self.output;
        if output.srt_file.trim().is_empty() || output.lrc_file.trim().is_empty() {
            return Err(anyhow!("Output file names cannot be empty"));
        }
        if output.srt_file == output.lrc_file {
            return Err(anyhow!("SRT and LRC outputs must use different file names"));
        }
        if let AlignmentStrategy::Sequence { min_similarity } = output.alignment {
            if !(0.0..=1.0).contains(&min_similarity) {
                return Err(anyhow!("Alignment min_similarity must be between 0.0 and 1.0, got {}", min_similarity));
            }
        }

        Ok(())
    }
}

impl CorrectionConfig {
    fn validate(&self) -> Result<()> {
        if self.provider.requires_api_key() && self.get_api_key().is_empty() {
            return Err(anyhow!(
                "Correction API key is required for {} provider",
                self.provider.display_name()
            ));
        }

        let endpoint = self.get_endpoint();
        Url::parse(&endpoint).with_context(|| format!("Invalid endpoint URL: {}", endpoint))?;

        if !(0.0..=2.0).contains(&self.common.temperature) {
            return Err(anyhow!("Temperature must be between 0.0 and 2.0, got {}", self.common.temperature));
        }
        if self.common.max_tokens == 0 {
            return Err(anyhow!("max_tokens must be greater than zero"));
        }

        Ok(())
    }

    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(&self.provider)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &CorrectionProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    fn active_provider_config_mut(&mut self) -> &mut ProviderConfig {
        let provider_str = self.provider.to_lowercase_string();
        let position = self.available_providers.iter()
            .position(|p| p.provider_type == provider_str);

        match position {
            Some(index) => &mut self.available_providers[index],
            None => {
                self.available_providers.push(ProviderConfig::new(self.provider.clone()));
                let last = self.available_providers.len() - 1;
                &mut self.available_providers[last]
            }
        }
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.model.clone())
            .filter(|model| !model.is_empty())
            .unwrap_or_else(|| default_model(&self.provider))
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.api_key.clone())
            .unwrap_or_default()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        self.get_active_provider_config()
            .map(|p| p.endpoint.clone())
            .filter(|endpoint| !endpoint.is_empty())
            .unwrap_or_else(|| default_endpoint(&self.provider))
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        self.get_active_provider_config()
            .map(|p| p.timeout_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or_else(default_timeout_secs)
    }

    /// Override the model of the active provider
    pub fn set_model(&mut self, model: impl Into<String>) {
        self.active_provider_config_mut().model = model.into();
    }

    /// Override the API key of the active provider
    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.active_provider_config_mut().api_key = api_key.into();
    }
}

impl Default for CorrectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: CorrectionProvider::default(),
            available_providers: vec![
                ProviderConfig::new(CorrectionProvider::OpenAI),
                ProviderConfig::new(CorrectionProvider::Anthropic),
                ProviderConfig::new(CorrectionProvider::Ollama),
                ProviderConfig::new(CorrectionProvider::LMStudio),
            ],
            common: CorrectionCommonConfig::default(),
        }
    }
}
