use indicatif::ProgressBar;
use log::{debug, warn};

use crate::correction::Corrector;
use crate::errors::LyricsError;
use crate::lyrics::MismatchPolicy;

// @module: Reconciliation of original lyrics against transcribed lines

/// Reconcile with the default [`MismatchPolicy::Warn`] policy.
///
/// Pairs are taken by position up to the shorter sequence. A pair that is
/// equal ignoring case keeps the original line without consulting the
/// corrector. Every other pair asks `corrector` for a corrected line and
/// falls back to the original when the answer is blank.
pub async fn reconcile<C: Corrector + ?Sized>(
    original: &[String],
    transcribed: &[String],
    corrector: &C,
) -> Result<Vec<String>, LyricsError> {
    LyricsReconciler::new(corrector).reconcile(original, transcribed).await
}

/// Lyrics reconciler bound to a corrector
pub struct LyricsReconciler<'a, C: Corrector + ?Sized> {
    corrector: &'a C,
    policy: MismatchPolicy,
    progress: Option<ProgressBar>,
}

impl<'a, C: Corrector + ?Sized> LyricsReconciler<'a, C> {
    pub fn new(corrector: &'a C) -> Self {
        Self {
            corrector,
            policy: MismatchPolicy::default(),
            progress: None,
        }
    }

    /// Set the length mismatch policy
    pub fn with_policy(mut self, policy: MismatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Advance `progress` once per reconciled line
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Reconcile `original` against `transcribed`.
    ///
    /// # Errors
    /// - [`LyricsError::LengthMismatch`] under the strict policy, before any
    ///   corrector call
    /// - [`LyricsError::Provider`] as soon as the corrector fails
    pub async fn reconcile(
        &self,
        original: &[String],
        transcribed: &[String],
    ) -> Result<Vec<String>, LyricsError> {
        if original.len() != transcribed.len() {
            match self.policy {
                MismatchPolicy::Strict => {
                    return Err(LyricsError::LengthMismatch {
                        original: original.len(),
                        transcribed: transcribed.len(),
                    });
                }
                MismatchPolicy::Warn => warn!(
                    "{} original line(s) vs {} transcribed line(s); the last {} line(s) will be dropped",
                    original.len(),
                    transcribed.len(),
                    original.len().abs_diff(transcribed.len())
                ),
            }
        }

        let mut reconciled = Vec::with_capacity(original.len().min(transcribed.len()));

        for (position, (original_line, transcribed_line)) in original.iter().zip(transcribed).enumerate() {
            let line = if lines_match(original_line, transcribed_line) {
                original_line.clone()
            } else {
                debug!(
                    "Line {} differs: '{}' vs '{}'",
                    position + 1,
                    original_line,
                    transcribed_line
                );
                let suggestion = self.corrector.correct(original_line, transcribed_line).await?;
                let suggestion = suggestion.trim();
                if suggestion.is_empty() {
                    debug!("Empty correction for line {}, keeping original", position + 1);
                    original_line.clone()
                } else {
                    suggestion.to_string()
                }
            };

            reconciled.push(line);
            if let Some(progress) = &self.progress {
                progress.inc(1);
            }
        }

        Ok(reconciled)
    }
}

/// Case-insensitive comparison, ignoring surrounding whitespace
pub fn lines_match(original: &str, transcribed: &str) -> bool {
    original.trim().to_lowercase() == transcribed.trim().to_lowercase()
}
