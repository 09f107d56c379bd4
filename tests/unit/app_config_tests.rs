/*!
 * Tests for application configuration functionality
 */

use std::path::PathBuf;

use syncwai::app_config::{Config, CorrectionProvider, LogLevel, ProviderConfig};
use syncwai::lyrics::{AlignmentStrategy, MismatchPolicy};
use syncwai::timestamp::LrcTimestampStyle;

use crate::common;

fn valid_config() -> Config {
    let mut config = Config::default();
    config.correction.set_api_key("sk-test");
    config
}

/// Test default configuration values
#[test]
fn test_defaultConfig_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.transcription.command, "whisper");
    assert_eq!(config.transcription.model, "base");
    assert_eq!(config.transcription.language, None);
    assert_eq!(config.transcription.timeout_secs, 1800);

    assert!(config.correction.enabled);
    assert_eq!(config.correction.provider, CorrectionProvider::OpenAI);
    assert_eq!(config.correction.available_providers.len(), 4);
    assert_eq!(config.correction.get_model(), "gpt-4o-mini");
    assert_eq!(config.correction.get_endpoint(), "https://api.openai.com/v1");
    assert_eq!(config.correction.common.max_tokens, 60);
    assert_eq!(config.correction.common.temperature, 0.0);
    assert_eq!(config.correction.common.retry_count, 0);

    assert_eq!(config.output.srt_path(), PathBuf::from(".").join("transcription.srt"));
    assert_eq!(config.output.lrc_path(), PathBuf::from(".").join("song.lrc"));
    assert_eq!(config.output.lrc_style, LrcTimestampStyle::Padded);
    assert_eq!(config.output.alignment, AlignmentStrategy::Positional);
    assert_eq!(config.output.mismatch_policy, MismatchPolicy::Warn);

    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_configValidation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = valid_config();
    assert!(config.validate().is_ok());

    // Hosted providers need a key
    config.correction.set_api_key("");
    assert!(config.validate().is_err());

    // Unless correction is disabled
    config.correction.enabled = false;
    assert!(config.validate().is_ok());
    config.correction.enabled = true;

    // Local providers do not
    config.correction.provider = CorrectionProvider::Ollama;
    assert!(config.validate().is_ok());

    // Unknown language code
    config.transcription.language = Some("zz".to_string());
    assert!(config.validate().is_err());
    config.transcription.language = Some("fr".to_string());
    assert!(config.validate().is_ok());

    // Out of range temperature
    config.correction.common.temperature = 3.5;
    assert!(config.validate().is_err());
    config.correction.common.temperature = 0.2;

    // Same name for both outputs
    config.output.lrc_file = config.output.srt_file.clone();
    assert!(config.validate().is_err());
    config.output.lrc_file = "song.lrc".to_string();

    // Out of range similarity threshold
    config.output.alignment = AlignmentStrategy::Sequence { min_similarity: 1.5 };
    assert!(config.validate().is_err());
    config.output.alignment = AlignmentStrategy::sequence();
    assert!(config.validate().is_ok());
}

#[test]
fn test_configValidation_withBadEndpoint_shouldFail() {
    let mut config = valid_config();
    config.correction.available_providers = vec![ProviderConfig {
        endpoint: "not a url".to_string(),
        api_key: "sk-test".to_string(),
        ..ProviderConfig::new(CorrectionProvider::OpenAI)
    }];
    assert!(config.validate().is_err());
}

#[test]
fn test_setModel_withMissingProviderEntry_shouldAddIt() {
    let mut config = Config::default();
    config.correction.available_providers.clear();
    config.correction.provider = CorrectionProvider::Anthropic;

    assert_eq!(config.correction.get_model(), "claude-3-haiku-20240307");
    config.correction.set_model("claude-3-5-sonnet-latest");

    assert_eq!(config.correction.available_providers.len(), 1);
    assert_eq!(config.correction.get_model(), "claude-3-5-sonnet-latest");
}

#[test]
fn test_providerParsing_shouldRoundTripLowercaseNames() {
    for provider in [
        CorrectionProvider::OpenAI,
        CorrectionProvider::Anthropic,
        CorrectionProvider::Ollama,
        CorrectionProvider::LMStudio,
    ] {
        let parsed: CorrectionProvider = provider.to_string().parse().unwrap();
        assert_eq!(parsed, provider);
    }
    assert!("gemini".parse::<CorrectionProvider>().is_err());
    assert_eq!(CorrectionProvider::LMStudio.display_name(), "LM Studio");
}

#[test]
fn test_deserialize_withPartialJson_shouldFillDefaults() {
    let json = r#"{
        "correction": {
            "provider": "ollama",
            "available_providers": [
                {"type": "ollama", "model": "mistral", "endpoint": "http://gpu-box:11434"}
            ]
        },
        "output": {
            "lrc_style": "standard",
            "alignment": {"strategy": "sequence", "min_similarity": 0.5},
            "mismatch_policy": "strict"
        },
        "log_level": "debug"
    }"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.transcription.model, "base");
    assert_eq!(config.correction.provider, CorrectionProvider::Ollama);
    assert_eq!(config.correction.get_model(), "mistral");
    assert_eq!(config.correction.get_endpoint(), "http://gpu-box:11434");
    assert_eq!(config.correction.get_timeout_secs(), 30);
    assert_eq!(config.output.lrc_style, LrcTimestampStyle::Standard);
    assert_eq!(config.output.alignment, AlignmentStrategy::Sequence { min_similarity: 0.5 });
    assert_eq!(config.output.mismatch_policy, MismatchPolicy::Strict);
    assert_eq!(config.output.srt_file, "transcription.srt");
    assert_eq!(config.log_level, LogLevel::Debug);
    assert!(config.validate().is_ok());
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path).unwrap();
    assert!(path.exists());
    assert_eq!(created.transcription.model, "base");

    let loaded = Config::load_or_create(&path).unwrap();
    assert_eq!(loaded.correction.provider, created.correction.provider);
    assert_eq!(loaded.output.lrc_file, created.output.lrc_file);
}

#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json").unwrap();
    assert!(Config::load_or_create(&path).is_err());
}

#[test]
fn test_logLevel_shouldConvertToLevelFilter() {
    assert_eq!(log::LevelFilter::from(&LogLevel::Trace), log::LevelFilter::Trace);
    assert_eq!(log::LevelFilter::from(&LogLevel::Error), log::LevelFilter::Error);
}
