//! Contract of the external speech-generation capability.
//!
//! The model is expensive to construct and cheap to reuse, so construction
//! ([`GeneratorLoader::load`]) is split from use ([`SpeechGenerator::generate`]).
//! A batch loads exactly once and then calls `generate` once per job.

use crate::context::ContextTurn;
use crate::conversion_job::ConversionJob;
use crate::speaker_id::SpeakerId;
use crate::voice_error::GenerationError;

/// Borrowed parameters of a single `generate` call.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub text: &'a str,
    pub speaker: SpeakerId,
    pub context: &'a [ContextTurn],
    pub max_duration_ms: u32,
}

impl<'a> From<&'a ConversionJob> for GenerationRequest<'a> {
    fn from(job: &'a ConversionJob) -> Self {
        Self {
            text: job.text(),
            speaker: job.speaker(),
            context: job.context(),
            max_duration_ms: job.max_duration_ms(),
        }
    }
}

/// A loaded, reusable speech generator.
pub trait SpeechGenerator: Send + Sync + 'static {
    /// Samples per second of every buffer returned by [`generate`](Self::generate).
    /// Constant for the lifetime of the instance.
    fn sample_rate(&self) -> u32;

    /// Synthesize mono samples for `request`.
    ///
    /// Blocking. The returned buffer represents at most
    /// `request.max_duration_ms` of audio at [`sample_rate`](Self::sample_rate).
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<Vec<f32>, GenerationError>;

    /// Whether `generate` may run on several threads at once.
    ///
    /// Defaults to `false`; callers then serialize every call.
    fn supports_concurrent_calls(&self) -> bool {
        false
    }
}

/// Factory step that pays the model's construction cost.
pub trait GeneratorLoader: Send + 'static {
    type Generator: SpeechGenerator;

    /// Construct the generator. May take a long time.
    fn load(&self) -> Result<Self::Generator, GenerationError>;

    /// Human-readable name used in logs and reports.
    fn describe(&self) -> String;
}
