// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::PathBuf;

use syncwai::app_config::{self, Config, CorrectionProvider};
use syncwai::app_controller::{Controller, TranscriptSource};
use syncwai::correction::{Corrector, KeepOriginal};
use syncwai::input::{self, InputRequest, LyricsSource, TerminalPrompter};
use syncwai::lyrics::{AlignmentStrategy, LrcMetadata, MismatchPolicy};
use syncwai::lyrics::alignment::DEFAULT_MIN_SIMILARITY;
use syncwai::timestamp::LrcTimestampStyle;

/// CLI Wrapper for CorrectionProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliCorrectionProvider {
    #[value(name = "openai")]
    OpenAI,
    Anthropic,
    Ollama,
    #[value(name = "lmstudio")]
    LMStudio,
}

impl From<CliCorrectionProvider> for CorrectionProvider {
    fn from(cli_provider: CliCorrectionProvider) -> Self {
        match cli_provider {
            CliCorrectionProvider::OpenAI => CorrectionProvider::OpenAI,
            CliCorrectionProvider::Anthropic => CorrectionProvider::Anthropic,
            CliCorrectionProvider::Ollama => CorrectionProvider::Ollama,
            CliCorrectionProvider::LMStudio => CorrectionProvider::LMStudio,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for LrcTimestampStyle to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLrcStyle {
    /// `[75.5]`, shortest seconds form
    Reference,
    /// `[75.50]`, seconds with two decimals
    Padded,
    /// `[01:15.50]`, minutes and seconds
    Standard,
}

impl From<CliLrcStyle> for LrcTimestampStyle {
    fn from(cli_style: CliLrcStyle) -> Self {
        match cli_style {
            CliLrcStyle::Reference => LrcTimestampStyle::Reference,
            CliLrcStyle::Padded => LrcTimestampStyle::Padded,
            CliLrcStyle::Standard => LrcTimestampStyle::Standard,
        }
    }
}

/// CLI Wrapper for the alignment strategy
#[derive(Debug, Clone, ValueEnum)]
enum CliAlignment {
    /// Pair lines by position
    Positional,
    /// Pair lines by text similarity, skipping unmatched lines
    Sequence,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Transcribe a song and write synchronized lyrics (default command)
    #[command(alias = "sync")]
    Run(RunArgs),

    /// Check that whisper and the correction provider are reachable
    Check {
        /// Configuration file path
        #[arg(short, long, default_value = "conf.json")]
        config_path: String,

        /// Set logging level
        #[arg(long, value_enum)]
        log_level: Option<CliLogLevel>,
    },

    /// Generate shell completions for syncwai
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// Audio file to transcribe (asked for when missing)
    #[arg(value_name = "AUDIO")]
    audio: Option<PathBuf>,

    /// Original lyrics file, or '-' for stdin (asked for when missing)
    #[arg(long, value_name = "FILE")]
    lyrics: Option<String>,

    /// Use an existing Whisper JSON transcript instead of transcribing
    #[arg(long, value_name = "JSON", conflicts_with = "srt")]
    segments: Option<PathBuf>,

    /// Use an existing SRT file instead of transcribing
    #[arg(long, value_name = "FILE")]
    srt: Option<PathBuf>,

    /// Keep the original lyrics for mismatched lines without calling a provider
    #[arg(long)]
    no_correct: bool,

    /// Correction provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliCorrectionProvider>,

    /// Model name to use for correction
    #[arg(short, long)]
    model: Option<String>,

    /// API key for the correction provider
    #[arg(long, env = "SYNCWAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Whisper model name (e.g., 'tiny', 'base', 'small')
    #[arg(long)]
    whisper_model: Option<String>,

    /// Language of the song (e.g., 'en', 'fr'); detected when not set
    #[arg(short, long)]
    language: Option<String>,

    /// Output directory for the SRT and LRC files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// LRC timestamp style
    #[arg(long, value_enum)]
    lrc_style: Option<CliLrcStyle>,

    /// How original and transcribed lines are paired
    #[arg(long, value_enum)]
    alignment: Option<CliAlignment>,

    /// Minimum similarity for sequence alignment (0.0 to 1.0)
    #[arg(long)]
    min_similarity: Option<f32>,

    /// Fail instead of warning when lines cannot be paired
    #[arg(long)]
    strict: bool,

    /// Song title for the LRC [ti:] tag
    #[arg(long)]
    title: Option<String>,

    /// Artist for the LRC [ar:] tag
    #[arg(long)]
    artist: Option<String>,

    /// Album for the LRC [al:] tag
    #[arg(long)]
    album: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// SyncWAI - Sync lyrics With AI
///
/// Transcribes a song with Whisper, corrects the transcription against the
/// original lyrics using AI providers, and writes SRT and LRC files.
#[derive(Parser, Debug)]
#[command(name = "syncwai")]
#[command(version)]
#[command(about = "AI-assisted synchronized lyrics generator")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "SyncWAI transcribes a song, aligns the transcription with the original lyrics and writes time-synchronized SRT and LRC files.

EXAMPLES:
    syncwai song.mp3 --lyrics lyrics.txt            # Transcribe and synchronize
    syncwai song.mp3 --lyrics - < lyrics.txt        # Read the lyrics from stdin
    syncwai --segments song.json --lyrics lyrics.txt # Re-use a Whisper transcript
    syncwai --srt transcription.srt --no-correct    # Re-time from an SRT, no AI
    syncwai -p ollama -m llama3.2:3b song.mp3       # Use a local model
    syncwai --alignment sequence song.mp3           # Skip ad-libs and repeats
    syncwai --lrc-style standard song.mp3           # [mm:ss.xx] timestamps
    syncwai check                                   # Test whisper and the provider
    syncwai completions bash > syncwai.bash         # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.

API KEYS:
    Taken from the config file, --api-key, SYNCWAI_API_KEY, or the provider's
    own variable (OPENAI_API_KEY, ANTHROPIC_API_KEY).

SUPPORTED PROVIDERS:
    openai    - OpenAI API (requires API key, default: gpt-4o-mini)
    anthropic - Anthropic Claude API (requires API key)
    ollama    - Local Ollama server (default: llama3.2:3b)
    lmstudio  - LM Studio local server (OpenAI-compatible on http://localhost:1234/v1)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI colour for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger filters on the global max level, adjusted once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "syncwai", &mut std::io::stdout());
            return Ok(());
        }
        Some(Commands::Check { config_path, log_level }) => run_check(&config_path, log_level).await,
        Some(Commands::Run(args)) => run_sync(args).await,
        None => run_sync(cli.run).await,
    }
}

fn apply_log_level(config: &Config, cli_level: Option<CliLogLevel>) {
    let level = cli_level.map(app_config::LogLevel::from).unwrap_or_else(|| config.log_level.clone());
    log::set_max_level(LevelFilter::from(&level));
}

// @returns: Environment variable conventionally holding the provider's key
fn provider_key_env(provider: &CorrectionProvider) -> Option<&'static str> {
    match provider {
        CorrectionProvider::OpenAI => Some("OPENAI_API_KEY"),
        CorrectionProvider::Anthropic => Some("ANTHROPIC_API_KEY"),
        CorrectionProvider::Ollama | CorrectionProvider::LMStudio => None,
    }
}

fn apply_overrides(config: &mut Config, options: &RunArgs) {
    if let Some(provider) = &options.provider {
        config.correction.provider = provider.clone().into();
    }
    if let Some(model) = &options.model {
        config.correction.set_model(model.clone());
    }
    if let Some(api_key) = &options.api_key {
        config.correction.set_api_key(api_key.clone());
    } else if config.correction.get_api_key().is_empty() {
        let from_env = provider_key_env(&config.correction.provider)
            .and_then(|name| std::env::var(name).ok())
            .filter(|key| !key.trim().is_empty());
        if let Some(api_key) = from_env {
            config.correction.set_api_key(api_key);
        }
    }
    if options.no_correct {
        config.correction.enabled = false;
    }

    if let Some(whisper_model) = &options.whisper_model {
        config.transcription.model = whisper_model.clone();
    }
    if let Some(language) = &options.language {
        config.transcription.language = Some(language.clone());
    }

    if let Some(output_dir) = &options.output_dir {
        config.output.directory = output_dir.clone();
    }
    if let Some(style) = &options.lrc_style {
        config.output.lrc_style = style.clone().into();
    }
    let min_similarity = options.min_similarity.or(match config.output.alignment {
        AlignmentStrategy::Sequence { min_similarity } => Some(min_similarity),
        AlignmentStrategy::Positional => None,
    });
    match options.alignment {
        Some(CliAlignment::Positional) => config.output.alignment = AlignmentStrategy::Positional,
        Some(CliAlignment::Sequence) => {
            config.output.alignment = AlignmentStrategy::Sequence {
                min_similarity: min_similarity.unwrap_or(DEFAULT_MIN_SIMILARITY),
            }
        }
        None => {
            if let (AlignmentStrategy::Sequence { .. }, Some(min_similarity)) =
                (config.output.alignment, options.min_similarity)
            {
                config.output.alignment = AlignmentStrategy::Sequence { min_similarity };
            }
        }
    }
    if options.strict {
        config.output.mismatch_policy = MismatchPolicy::Strict;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}

async fn run_check(config_path: &str, log_level: Option<CliLogLevel>) -> Result<()> {
    let config = Config::load_or_create(config_path)?;
    apply_log_level(&config, log_level);
    config.validate().context("Configuration validation failed")?;

    Controller::with_config(config).check().await?;
    info!("All checks passed");
    Ok(())
}

async fn run_sync(options: RunArgs) -> Result<()> {
    let mut config = Config::load_or_create(&options.config_path)?;
    apply_overrides(&mut config, &options);
    apply_log_level(&config, options.log_level.clone());
    config.validate().context("Configuration validation failed")?;

    let request = InputRequest {
        audio_path: options.audio.clone(),
        lyrics: options.lyrics.as_deref().map(LyricsSource::from_arg),
        audio_required: options.segments.is_none() && options.srt.is_none(),
    };
    let mut prompter = TerminalPrompter::stdio();
    let inputs = input::acquire_inputs(&request, &mut prompter)?;

    let source = match (&options.srt, &options.segments, inputs.audio_path) {
        (Some(srt), _, _) => TranscriptSource::Srt(srt.clone()),
        (None, Some(segments), _) => TranscriptSource::Segments(segments.clone()),
        (None, None, Some(audio)) => TranscriptSource::Audio(audio),
        (None, None, None) => {
            return Err(anyhow::anyhow!("No audio file, transcript or SRT file to work from"));
        }
    };
    if options.audio.is_some() && !matches!(source, TranscriptSource::Audio(_)) {
        warn!("Audio file ignored because a transcript was given");
    }

    let metadata = LrcMetadata {
        title: options.title.clone(),
        artist: options.artist.clone(),
        album: options.album.clone(),
        by: None,
    };

    let controller = Controller::with_config(config);
    let transcriber = controller.whisper();
    let service = controller.correction_service();
    let corrector: &dyn Corrector = match &service {
        Some(service) => {
            info!(
                "Correcting mismatched lines with {} ({})",
                service.provider().display_name(),
                service.model()
            );
            service
        }
        None => {
            info!("Correction disabled, mismatched lines keep the original lyrics");
            &KeepOriginal
        }
    };

    controller
        .run(&source, &transcriber, &inputs.original_lyrics, corrector, metadata)
        .await?;

    Ok(())
}
