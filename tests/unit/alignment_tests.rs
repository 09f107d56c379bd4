/*!
 * Tests for pairing original lyric lines with transcribed lines
 */

use syncwai::lyrics::alignment::{DEFAULT_MIN_SIMILARITY, similarity};
use syncwai::lyrics::{AlignmentStrategy, align};

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_align_positional_withEqualLengths_shouldPairByIndex() {
    let original = lines(&["a", "b", "c"]);
    let transcribed = lines(&["x", "y", "z"]);
    let alignment = align(&original, &transcribed, AlignmentStrategy::Positional);

    assert_eq!(alignment.pairs, vec![(0, 0), (1, 1), (2, 2)]);
    assert!(!alignment.has_remainder());
}

#[test]
fn test_align_positional_withLongerOriginal_shouldReportRemainder() {
    let original = lines(&["a", "b", "c"]);
    let transcribed = lines(&["a"]);
    let alignment = align(&original, &transcribed, AlignmentStrategy::Positional);

    assert_eq!(alignment.pairs, vec![(0, 0)]);
    assert_eq!(alignment.unmatched_original, vec![1, 2]);
    assert!(alignment.unmatched_transcribed.is_empty());
    assert!(alignment.has_remainder());
}

/// An ad-lib the singer added is skipped instead of shifting every line
#[test]
fn test_align_sequence_withInsertedAdLib_shouldSkipIt() {
    let original = lines(&["Hello darkness, my old friend", "I've come to talk with you again"]);
    let transcribed = lines(&["hello darkness my old friend", "yeah yeah", "I've come to talk with you again"]);
    let alignment = align(&original, &transcribed, AlignmentStrategy::sequence());

    assert_eq!(alignment.pairs, vec![(0, 0), (1, 2)]);
    assert_eq!(alignment.unmatched_transcribed, vec![1]);
    assert!(alignment.unmatched_original.is_empty());
    assert_eq!(alignment.select_transcribed(&transcribed)[1], "I've come to talk with you again");
}

#[test]
fn test_align_sequence_withMissingTranscribedLine_shouldLeaveOriginalUnmatched() {
    let original = lines(&["first verse line", "second verse line", "third verse line"]);
    let transcribed = lines(&["first verse line", "third verse line"]);
    let alignment = align(&original, &transcribed, AlignmentStrategy::sequence());

    assert_eq!(alignment.pairs, vec![(0, 0), (2, 1)]);
    assert_eq!(alignment.unmatched_original, vec![1]);
    assert_eq!(alignment.select_original(&original), lines(&["first verse line", "third verse line"]));
}

#[test]
fn test_align_sequence_withUnrelatedLines_shouldPairNothing() {
    let original = lines(&["completely different"]);
    let transcribed = lines(&["xyz qqq"]);
    let alignment = align(&original, &transcribed, AlignmentStrategy::sequence());

    assert!(alignment.pairs.is_empty());
    assert_eq!(alignment.unmatched_original, vec![0]);
    assert_eq!(alignment.unmatched_transcribed, vec![0]);
}

#[test]
fn test_align_withEmptyInputs_shouldReturnEmptyAlignment() {
    for strategy in [AlignmentStrategy::Positional, AlignmentStrategy::sequence()] {
        let alignment = align(&[], &[], strategy);
        assert!(alignment.pairs.is_empty());
        assert!(!alignment.has_remainder());
    }
}

#[test]
fn test_similarity_shouldIgnoreCaseAndPunctuation() {
    assert_eq!(similarity("Hello, World!", "hello world"), 1.0);
    assert_eq!(similarity("", ""), 1.0);
    assert_eq!(similarity("abc", ""), 0.0);
    let partial = similarity("kitten", "sitting");
    assert!(partial > 0.5 && partial < 0.6, "got {}", partial);
}

#[test]
fn test_alignmentStrategy_serde_shouldUseTaggedForm() {
    assert_eq!(
        serde_json::to_value(AlignmentStrategy::sequence()).unwrap(),
        serde_json::json!({"strategy": "sequence", "min_similarity": DEFAULT_MIN_SIMILARITY})
    );
    let parsed: AlignmentStrategy = serde_json::from_str(r#"{"strategy":"positional"}"#).unwrap();
    assert_eq!(parsed, AlignmentStrategy::Positional);
    assert_eq!(AlignmentStrategy::default(), AlignmentStrategy::Positional);
}
