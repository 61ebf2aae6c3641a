//! Immutable description of one text-to-audio request.

use std::sync::Arc;

use crate::context::ContextTurn;
use crate::speaker_id::SpeakerId;
use crate::voice_error::JobSpecError;

/// Number of characters shown in progress lines before the text is elided.
pub const DEFAULT_PREVIEW_CHARS: usize = 50;

/// One conversion request inside a batch.
///
/// The `index` is 1-based and is the job's identity: output naming and
/// progress reporting are derived from it. Jobs are validated on
/// construction and cannot be mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionJob {
    index: usize,
    text: String,
    speaker: SpeakerId,
    context: Arc<[ContextTurn]>,
    max_duration_ms: u32,
}

impl ConversionJob {
    /// Build a validated job.
    ///
    /// # Errors
    /// * [`JobSpecError::ZeroIndex`] when `index` is 0
    /// * [`JobSpecError::EmptyText`] when `text` is empty or whitespace only
    /// * [`JobSpecError::ZeroMaxDuration`] when `max_duration_ms` is 0
    pub fn new(
        index: usize,
        text: impl Into<String>,
        speaker: impl Into<SpeakerId>,
        context: Arc<[ContextTurn]>,
        max_duration_ms: u32,
    ) -> Result<Self, JobSpecError> {
        if index == 0 {
            return Err(JobSpecError::ZeroIndex);
        }
        let text = text.into();
        if text.trim().is_empty() {
            return Err(JobSpecError::EmptyText { index });
        }
        if max_duration_ms == 0 {
            return Err(JobSpecError::ZeroMaxDuration { index });
        }
        Ok(Self {
            index,
            text,
            speaker: speaker.into(),
            context,
            max_duration_ms,
        })
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn speaker(&self) -> SpeakerId {
        self.speaker
    }

    #[inline]
    pub fn context(&self) -> &[ContextTurn] {
        &self.context
    }

    #[inline]
    pub fn max_duration_ms(&self) -> u32 {
        self.max_duration_ms
    }

    /// Text cut to at most `limit` characters, with `...` appended when cut.
    ///
    /// Truncation is on `char` boundaries so multi-byte text never panics.
    pub fn preview(&self, limit: usize) -> String {
        match self.text.char_indices().nth(limit) {
            Some((byte_idx, _)) => format!("{}...", &self.text[..byte_idx]),
            None => self.text.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_context() -> Arc<[ContextTurn]> {
        Arc::from(Vec::new())
    }

    #[test]
    fn rejects_invalid_jobs() {
        assert_eq!(
            ConversionJob::new(0, "hi", 0, no_context(), 10_000),
            Err(JobSpecError::ZeroIndex)
        );
        assert_eq!(
            ConversionJob::new(3, "   ", 0, no_context(), 10_000),
            Err(JobSpecError::EmptyText { index: 3 })
        );
        assert_eq!(
            ConversionJob::new(2, "hi", 0, no_context(), 0),
            Err(JobSpecError::ZeroMaxDuration { index: 2 })
        );
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let job = ConversionJob::new(1, "héllo wörld", 1, no_context(), 10_000).unwrap();
        assert_eq!(job.preview(5), "héllo...");
        assert_eq!(job.preview(50), "héllo wörld");
        assert_eq!(job.preview(11), "héllo wörld");
    }

    #[test]
    fn accessors_return_constructed_values() {
        let context: Arc<[ContextTurn]> = Arc::from(vec![ContextTurn::text_only(1, "before")]);
        let job = ConversionJob::new(7, "Hello world", 2, context, 12_000).unwrap();
        assert_eq!(job.index(), 7);
        assert_eq!(job.text(), "Hello world");
        assert_eq!(job.speaker(), SpeakerId(2));
        assert_eq!(job.context().len(), 1);
        assert_eq!(job.max_duration_ms(), 12_000);
    }
}
