/*!
 * Tests for acquiring the lyrics and the audio file
 */

use std::io::Cursor;
use std::path::PathBuf;

use syncwai::app_controller::{PipelineOptions, build_outputs};
use syncwai::correction::KeepOriginal;
use syncwai::errors::InputError;
use syncwai::input::{
    InputRequest, InputStep, LyricsSource, Prompter, TerminalPrompter, acquire_inputs, input_steps,
};

use syncwai::subtitle_processor::SubtitleDocument;

use crate::common::{self, ScriptedPrompter};

#[test]
fn test_inputSteps_shouldAskForLyricsBeforeAudio() {
    let request = InputRequest {
        audio_required: true,
        ..InputRequest::default()
    };
    assert_eq!(input_steps(&request), vec![InputStep::OriginalLyrics, InputStep::AudioFile]);

    let request = InputRequest::default();
    assert_eq!(input_steps(&request), vec![InputStep::OriginalLyrics]);
}

#[test]
fn test_acquireInputs_withPromptedValues_shouldReturnBoth() {
    let temp_dir = common::create_temp_dir().unwrap();
    let audio = common::create_test_file(temp_dir.path(), "song.mp3", "fake audio").unwrap();
    let audio_answer = audio.to_string_lossy().to_string();

    let mut prompter = ScriptedPrompter::new(vec![
        Some("Hello darkness\n\n  my old friend  \n"),
        Some(audio_answer.as_str()),
    ]);
    let request = InputRequest {
        audio_required: true,
        ..InputRequest::default()
    };

    let inputs = acquire_inputs(&request, &mut prompter).unwrap();

    assert_eq!(inputs.original_lyrics, vec!["Hello darkness", "my old friend"]);
    assert_eq!(inputs.audio_path, Some(audio));
    assert_eq!(prompter.prompts.len(), 2);
}

/// A stanza break is not sung, so it must not take a transcribed line's timing
#[test]
fn test_acquireInputs_withStanzaBreak_shouldKeepPairingWithSegments() {
    let mut prompter = ScriptedPrompter::new(vec![Some(
        "Hello darkness, my old friend\nI've come to talk with you again\n\nBecause a vision softly creeping\n",
    )]);

    let inputs = acquire_inputs(&InputRequest::default(), &mut prompter).unwrap();
    assert_eq!(inputs.original_lyrics, common::sample_lyrics());

    let document = SubtitleDocument::build(&common::sample_segments()).unwrap();
    let output = tokio_test::block_on(build_outputs(
        &document,
        &inputs.original_lyrics,
        &KeepOriginal,
        &PipelineOptions::default(),
        None,
    ))
    .unwrap();

    assert_eq!(
        output.lrc,
        "[0.00]Hello darkness, my old friend\n[2.50]I've come to talk with you again\n[5.00]Because a vision softly creeping\n"
    );
}

#[test]
fn test_acquireInputs_withEmptyLyrics_shouldCancelBeforeAskingForAudio() {
    let mut prompter = ScriptedPrompter::new(vec![None]);
    let request = InputRequest {
        audio_required: true,
        ..InputRequest::default()
    };

    let result = acquire_inputs(&request, &mut prompter);

    assert!(matches!(result, Err(InputError::Cancelled(step)) if step == "original lyrics"));
    assert_eq!(prompter.prompts.len(), 1);
}

#[test]
fn test_acquireInputs_withEmptyAudioAnswer_shouldCancel() {
    let mut prompter = ScriptedPrompter::new(vec![Some("a line"), Some("   ")]);
    let request = InputRequest {
        audio_required: true,
        ..InputRequest::default()
    };

    let result = acquire_inputs(&request, &mut prompter);
    assert!(matches!(result, Err(InputError::Cancelled(step)) if step == "audio file"));
}

#[test]
fn test_acquireInputs_withMissingAudioFile_shouldReportNotFound() {
    let mut prompter = ScriptedPrompter::new(vec![]);
    let request = InputRequest {
        audio_path: Some(PathBuf::from("no/such/song.mp3")),
        lyrics: Some(LyricsSource::Text("a line".to_string())),
        audio_required: true,
    };

    let result = acquire_inputs(&request, &mut prompter);
    assert!(matches!(result, Err(InputError::NotFound(_))));
    assert!(prompter.prompts.is_empty());
}

/// Unusual extensions are accepted with a warning
#[test]
fn test_acquireInputs_withUnusualExtension_shouldStillAccept() {
    let temp_dir = common::create_temp_dir().unwrap();
    let audio = common::create_test_file(temp_dir.path(), "song.m4a", "fake audio").unwrap();
    let mut prompter = ScriptedPrompter::new(vec![]);
    let request = InputRequest {
        audio_path: Some(audio.clone()),
        lyrics: Some(LyricsSource::Text("a line".to_string())),
        audio_required: true,
    };

    let inputs = acquire_inputs(&request, &mut prompter).unwrap();
    assert_eq!(inputs.audio_path, Some(audio));
}

#[test]
fn test_acquireInputs_withLyricsFile_shouldSplitLines() {
    let temp_dir = common::create_temp_dir().unwrap();
    let lyrics = common::create_test_file(temp_dir.path(), "lyrics.txt", "one\r\ntwo\r\n\r\nthree\r\n").unwrap();
    let mut prompter = ScriptedPrompter::new(vec![]);
    let request = InputRequest {
        lyrics: Some(LyricsSource::File(lyrics)),
        ..InputRequest::default()
    };

    let inputs = acquire_inputs(&request, &mut prompter).unwrap();
    assert_eq!(inputs.original_lyrics, vec!["one", "two", "three"]);
    assert_eq!(inputs.audio_path, None);
}

#[test]
fn test_acquireInputs_withMissingLyricsFile_shouldReportNotFound() {
    let mut prompter = ScriptedPrompter::new(vec![]);
    let request = InputRequest {
        lyrics: Some(LyricsSource::File(PathBuf::from("missing-lyrics.txt"))),
        ..InputRequest::default()
    };
    assert!(matches!(acquire_inputs(&request, &mut prompter), Err(InputError::NotFound(_))));
}

#[test]
fn test_lyricsSourceFromArg_shouldTreatDashAsStdin() {
    assert_eq!(LyricsSource::from_arg("-"), LyricsSource::Stdin);
    assert_eq!(LyricsSource::from_arg("words.txt"), LyricsSource::File(PathBuf::from("words.txt")));
}

#[test]
fn test_terminalPrompter_askBlock_shouldStopAtDotLine() {
    let input = Cursor::new("first\nsecond\n.\nafter\n");
    let mut output = Vec::new();
    let mut prompter = TerminalPrompter::new(input, &mut output);

    let block = prompter.ask_block("Lyrics").unwrap();
    assert_eq!(block.as_deref(), Some("first\nsecond\n"));

    let line = prompter.ask_line("Next").unwrap();
    assert_eq!(line.as_deref(), Some("after"));

    drop(prompter);
    let shown = String::from_utf8(output).unwrap();
    assert!(shown.contains("Lyrics"));
    assert!(shown.contains("Next: "));
}

#[test]
fn test_terminalPrompter_atEndOfInput_shouldReturnNone() {
    let mut output = Vec::new();
    let mut prompter = TerminalPrompter::new(Cursor::new(""), &mut output);

    assert_eq!(prompter.ask_line("Audio").unwrap(), None);
    assert_eq!(prompter.ask_block("Lyrics").unwrap(), None);
}
