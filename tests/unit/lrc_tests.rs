/*!
 * Tests for LRC content assembly
 */

use syncwai::lyrics::{LrcAssembler, LrcMetadata, assemble};
use syncwai::subtitle_processor::{Segment, SubtitleDocument, SubtitleEntry};
use syncwai::timestamp::LrcTimestampStyle;

fn entries() -> Vec<SubtitleEntry> {
    let segments = vec![
        Segment::new(0.0, 1.0, "a"),
        Segment::new(1.0, 2.5, "b"),
        Segment::new(75.5, 80.0, "c"),
    ];
    SubtitleDocument::build(&segments).unwrap().entries
}

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_assemble_withDefaultStyle_shouldWriteOneLinePerLyric() {
    let content = assemble(&entries(), &lines(&["first", "second", "third"])).unwrap();
    assert_eq!(content, "[0.00]first\n[1.00]second\n[75.50]third\n");
}

#[test]
fn test_assemble_withReferenceStyle_shouldMatchReferenceOutput() {
    let content = LrcAssembler::new(LrcTimestampStyle::Reference)
        .assemble(&entries(), &lines(&["first", "second", "third"]))
        .unwrap();
    assert_eq!(content, "[0.0]first\n[1.0]second\n[75.5]third\n");
}

#[test]
fn test_assemble_withStandardStyle_shouldUseMinutes() {
    let content = LrcAssembler::new(LrcTimestampStyle::Standard)
        .assemble(&entries(), &lines(&["first", "second", "third"]))
        .unwrap();
    assert_eq!(content, "[00:00.00]first\n[00:01.00]second\n[01:15.50]third\n");
}

#[test]
fn test_assemble_withFewerLyrics_shouldDropExtraEntries() {
    let content = assemble(&entries(), &lines(&["only"])).unwrap();
    assert_eq!(content, "[0.00]only\n");
}

#[test]
fn test_assemble_withNoLines_shouldBeEmpty() {
    assert_eq!(assemble(&[], &[]).unwrap(), "");
}

#[test]
fn test_assemble_withMetadata_shouldWriteTagsFirst() {
    let metadata = LrcMetadata {
        title: Some("The Sound of Silence".to_string()),
        artist: Some("Simon & Garfunkel".to_string()),
        album: Some("  ".to_string()),
        by: None,
    };
    let content = LrcAssembler::new(LrcTimestampStyle::Padded)
        .with_metadata(metadata)
        .assemble(&entries()[..1], &lines(&["Hello darkness"]))
        .unwrap();

    assert_eq!(
        content,
        "[ti:The Sound of Silence]\n[ar:Simon & Garfunkel]\n[0.00]Hello darkness\n"
    );
}

#[test]
fn test_metadata_withBlankValues_shouldBeEmpty() {
    let metadata = LrcMetadata {
        title: Some(String::new()),
        ..LrcMetadata::default()
    };
    assert!(metadata.is_empty());
    assert_eq!(metadata.to_string(), "");
}

#[test]
fn test_lines_withMalformedEntry_shouldFail() {
    let entry = SubtitleEntry {
        index: 1,
        start: "not a timestamp".to_string(),
        end: "00:00:01,000".to_string(),
        text: "x".to_string(),
    };
    let result = LrcAssembler::default().lines(&[entry], &lines(&["x"]));
    assert!(result.is_err());
}
