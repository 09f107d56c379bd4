/*!
 * Pairing of original lyric lines with transcribed lines.
 *
 * Transcription segments rarely line up one-to-one with the lines a user
 * pastes in: the recognizer merges short lines, splits long ones and picks
 * up ad-libs. `Positional` pairs lines by index. `Sequence` runs a monotonic
 * dynamic-programming alignment over normalized Levenshtein similarity so
 * that an extra line on either side only costs that line.
 */

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default lowest similarity at which two lines may be paired
pub const DEFAULT_MIN_SIMILARITY: f32 = 0.3;

/// How original and transcribed lines are paired
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase", tag = "strategy")]
pub enum AlignmentStrategy {
    /// Pair line i with line i
    #[default]
    Positional,
    /// Similarity-driven monotonic alignment
    Sequence {
        /// Pairs below this similarity (0.0-1.0) are never matched
        min_similarity: f32,
    },
}

impl AlignmentStrategy {
    pub fn sequence() -> Self {
        Self::Sequence {
            min_similarity: DEFAULT_MIN_SIMILARITY,
        }
    }
}

impl fmt::Display for AlignmentStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positional => f.write_str("positional"),
            Self::Sequence { min_similarity } => write!(f, "sequence (min similarity {:.2})", min_similarity),
        }
    }
}

/// Result of pairing two line sequences
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alignment {
    /// `(original index, transcribed index)`, increasing in both
    pub pairs: Vec<(usize, usize)>,
    /// Original lines that were not paired
    pub unmatched_original: Vec<usize>,
    /// Transcribed lines that were not paired
    pub unmatched_transcribed: Vec<usize>,
}

impl Alignment {
    /// Whether either side has lines left over
    pub fn has_remainder(&self) -> bool {
        !self.unmatched_original.is_empty() || !self.unmatched_transcribed.is_empty()
    }

    /// Pick the paired items of `original`, in pair order
    pub fn select_original<T: Clone>(&self, original: &[T]) -> Vec<T> {
        self.pairs.iter().map(|&(i, _)| original[i].clone()).collect()
    }

    /// Pick the paired items of `transcribed`, in pair order
    pub fn select_transcribed<T: Clone>(&self, transcribed: &[T]) -> Vec<T> {
        self.pairs.iter().map(|&(_, j)| transcribed[j].clone()).collect()
    }
}

/// Pair `original` with `transcribed` using `strategy`
pub fn align(original: &[String], transcribed: &[String], strategy: AlignmentStrategy) -> Alignment {
    match strategy {
        AlignmentStrategy::Positional => align_positional(original.len(), transcribed.len()),
        AlignmentStrategy::Sequence { min_similarity } => {
            align_sequence(original, transcribed, min_similarity.clamp(0.0, 1.0))
        }
    }
}

fn align_positional(original_len: usize, transcribed_len: usize) -> Alignment {
    let paired = original_len.min(transcribed_len);
    Alignment {
        pairs: (0..paired).map(|i| (i, i)).collect(),
        unmatched_original: (paired..original_len).collect(),
        unmatched_transcribed: (paired..transcribed_len).collect(),
    }
}

#[derive(Clone, Copy)]
enum Step {
    Match,
    SkipOriginal,
    SkipTranscribed,
}

fn align_sequence(original: &[String], transcribed: &[String], min_similarity: f32) -> Alignment {
    let n = original.len();
    let m = transcribed.len();
    let original_norm: Vec<String> = original.iter().map(|s| normalize(s)).collect();
    let transcribed_norm: Vec<String> = transcribed.iter().map(|s| normalize(s)).collect();

    let mut score = vec![vec![0.0f32; m + 1]; n + 1];
    let mut steps = vec![vec![Step::Match; m + 1]; n + 1];

    for i in 0..=n {
        for j in 0..=m {
            if i == 0 && j == 0 {
                continue;
            }
            if i == 0 {
                steps[i][j] = Step::SkipTranscribed;
                continue;
            }
            if j == 0 {
                steps[i][j] = Step::SkipOriginal;
                continue;
            }

            let mut best = f32::NEG_INFINITY;
            let mut step = Step::SkipOriginal;

            let sim = normalized_similarity(&original_norm[i - 1], &transcribed_norm[j - 1]);
            if sim >= min_similarity {
                best = score[i - 1][j - 1] + sim;
                step = Step::Match;
            }
            if score[i - 1][j] > best {
                best = score[i - 1][j];
                step = Step::SkipOriginal;
            }
            if score[i][j - 1] > best {
                best = score[i][j - 1];
                step = Step::SkipTranscribed;
            }

            score[i][j] = best;
            steps[i][j] = step;
        }
    }

    let mut alignment = Alignment::default();
    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        match steps[i][j] {
            Step::Match => {
                alignment.pairs.push((i - 1, j - 1));
                i -= 1;
                j -= 1;
            }
            Step::SkipOriginal => {
                alignment.unmatched_original.push(i - 1);
                i -= 1;
            }
            Step::SkipTranscribed => {
                alignment.unmatched_transcribed.push(j - 1);
                j -= 1;
            }
        }
    }

    alignment.pairs.reverse();
    alignment.unmatched_original.reverse();
    alignment.unmatched_transcribed.reverse();
    alignment
}

// Lowercase, drop punctuation, collapse whitespace
fn normalize(line: &str) -> String {
    line.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Similarity of two lines in 0.0-1.0 from normalized Levenshtein distance.
///
/// Case and punctuation are ignored.
pub fn similarity(a: &str, b: &str) -> f32 {
    normalized_similarity(&normalize(a), &normalize(b))
}

fn normalized_similarity(a: &str, b: &str) -> f32 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let distance = levenshtein_distance(a, b);
    let max_len = a.chars().count().max(b.chars().count());

    1.0 - (distance as f32 / max_len as f32)
}

fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut prev_row: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr_row: Vec<usize> = vec![0; b_chars.len() + 1];

    for (i, a_char) in a_chars.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, b_char) in b_chars.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[b_chars.len()]
}
