/*!
 * Acquisition of the user's inputs.
 *
 * A run needs the original lyrics and, unless the transcript is supplied
 * another way, an audio file. Inputs are gathered as an explicit ordered
 * list of steps. Each step uses the value given on the command line and
 * otherwise asks through a [`Prompter`]; an empty answer cancels the run.
 */

use std::fmt;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;

use log::{info, warn};

use crate::errors::InputError;
use crate::file_utils::FileManager;
use crate::lyrics::split_lyrics;
use crate::transcription::AUDIO_EXTENSIONS;

/// One input the run depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputStep {
    OriginalLyrics,
    AudioFile,
}

impl fmt::Display for InputStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OriginalLyrics => f.write_str("original lyrics"),
            Self::AudioFile => f.write_str("audio file"),
        }
    }
}

/// Where the original lyrics come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LyricsSource {
    /// A text file
    File(PathBuf),
    /// Standard input, read to EOF
    Stdin,
    /// Text already in memory
    Text(String),
}

impl LyricsSource {
    /// `-` means standard input, anything else is a file path
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Self::Stdin
        } else {
            Self::File(PathBuf::from(arg))
        }
    }
}

/// Asks the user for a missing value
pub trait Prompter {
    /// Ask for a single line; `None` when input ended
    fn ask_line(&mut self, prompt: &str) -> Result<Option<String>, InputError>;

    /// Ask for several lines; `None` when nothing was entered
    fn ask_block(&mut self, prompt: &str) -> Result<Option<String>, InputError>;
}

/// Prompter reading answers from `reader` and writing prompts to `writer`
pub struct TerminalPrompter<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr, read answers from stdin
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn ask_line(&mut self, prompt: &str) -> Result<Option<String>, InputError> {
        write!(self.writer, "{}: ", prompt)?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask_block(&mut self, prompt: &str) -> Result<Option<String>, InputError> {
        writeln!(self.writer, "{} (finish with a line containing only '.', or EOF):", prompt)?;
        self.writer.flush()?;

        let mut block = String::new();
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 || line.trim_end() == "." {
                break;
            }
            block.push_str(&line);
        }

        if block.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(block))
        }
    }
}

/// What the command line already supplied
#[derive(Debug, Clone, Default)]
pub struct InputRequest {
    /// Audio path given on the command line
    pub audio_path: Option<PathBuf>,
    /// Lyrics source given on the command line
    pub lyrics: Option<LyricsSource>,
    /// Whether an audio file is needed at all
    pub audio_required: bool,
}

/// The inputs of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInputs {
    /// Original lyric lines, blank lines removed
    pub original_lyrics: Vec<String>,
    /// Audio to transcribe, when transcription runs
    pub audio_path: Option<PathBuf>,
}

/// Ordered steps for `request`
pub fn input_steps(request: &InputRequest) -> Vec<InputStep> {
    let mut steps = vec![InputStep::OriginalLyrics];
    if request.audio_required {
        steps.push(InputStep::AudioFile);
    }
    steps
}

/// Run every input step in order, stopping at the first cancelled one
pub fn acquire_inputs<P: Prompter + ?Sized>(
    request: &InputRequest,
    prompter: &mut P,
) -> Result<SessionInputs, InputError> {
    let mut inputs = SessionInputs {
        original_lyrics: Vec::new(),
        audio_path: None,
    };

    for step in input_steps(request) {
        match step {
            InputStep::OriginalLyrics => {
                inputs.original_lyrics = acquire_lyrics(request.lyrics.as_ref(), prompter)?;
                info!("Read {} lyric line(s)", inputs.original_lyrics.len());
            }
            InputStep::AudioFile => {
                inputs.audio_path = Some(acquire_audio(request.audio_path.as_ref(), prompter)?);
            }
        }
    }

    Ok(inputs)
}

fn acquire_lyrics<P: Prompter + ?Sized>(
    source: Option<&LyricsSource>,
    prompter: &mut P,
) -> Result<Vec<String>, InputError> {
    let text = match source {
        Some(LyricsSource::File(path)) => {
            if !path.is_file() {
                return Err(InputError::NotFound(path.display().to_string()));
            }
            std::fs::read_to_string(path)?
        }
        Some(LyricsSource::Stdin) => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            text
        }
        Some(LyricsSource::Text(text)) => text.clone(),
        None => prompter
            .ask_block("Enter the original lyrics")?
            .unwrap_or_default(),
    };

    let lines = split_lyrics(&text);
    if lines.is_empty() {
        return Err(InputError::Cancelled(InputStep::OriginalLyrics.to_string()));
    }
    Ok(lines)
}

fn acquire_audio<P: Prompter + ?Sized>(
    given: Option<&PathBuf>,
    prompter: &mut P,
) -> Result<PathBuf, InputError> {
    let path = match given {
        Some(path) => path.clone(),
        None => {
            let prompt = format!("Select audio file ({})", AUDIO_EXTENSIONS.join(", "));
            let answer = prompter.ask_line(&prompt)?.unwrap_or_default();
            let answer = answer.trim().trim_matches(|c| c == '"' || c == '\'');
            if answer.is_empty() {
                return Err(InputError::Cancelled(InputStep::AudioFile.to_string()));
            }
            PathBuf::from(answer)
        }
    };

    if !path.is_file() {
        return Err(InputError::NotFound(path.display().to_string()));
    }
    if !FileManager::is_audio_file(&path) {
        warn!(
            "{} does not have a usual audio extension ({}); trying anyway",
            path.display(),
            AUDIO_EXTENSIONS.join(", ")
        );
    }

    Ok(path)
}
