//! Deterministic stand-in for a neural speech model.
//!
//! Produces a speaker-pitched tone whose length follows the text length, so
//! the whole pipeline (loading, timing, naming, WAV output, reporting) can run
//! without model weights.

use std::f32::consts::TAU;
use std::time::Duration;

use speech_batch_domain::{GenerationError, GenerationRequest, GeneratorLoader, SpeechGenerator};

use crate::config::{BatchConfig, ExecutionOptions};

/// Output rate of the synthetic generator (24 kHz mono).
pub const SYNTHETIC_SAMPLE_RATE: u32 = 24_000;

/// Audio produced per character of input text.
const MS_PER_CHAR: u64 = 60;

/// Fade applied at both ends to avoid clicks.
const FADE_MS: u64 = 10;

/// Peak amplitude of the tone.
const AMPLITUDE: f32 = 0.3;

/// Base pitch of each supported voice.
const VOICE_PITCH_HZ: [f32; 3] = [110.0, 165.0, 220.0];

/// Loader for [`SyntheticGenerator`].
#[derive(Debug, Clone, Default)]
pub struct SyntheticLoader {
    execution: ExecutionOptions,
    latency: Duration,
}

impl SyntheticLoader {
    pub fn new(execution: ExecutionOptions) -> Self {
        Self {
            execution,
            latency: Duration::ZERO,
        }
    }

    pub fn from_config(config: &BatchConfig) -> Self {
        Self::new(config.execution.clone())
            .with_latency(Duration::from_millis(config.generator.simulated_latency_ms))
    }

    /// Sleep this long inside every `generate` call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl GeneratorLoader for SyntheticLoader {
    type Generator = SyntheticGenerator;

    fn load(&self) -> Result<Self::Generator, GenerationError> {
        tracing::debug!(
            device = ?self.execution.device,
            disable_compilation = self.execution.disable_compilation,
            "• synthetic generator ignores execution options"
        );
        Ok(SyntheticGenerator {
            latency: self.latency,
        })
    }

    fn describe(&self) -> String {
        format!(
            "synthetic tone generator ({} kHz, voices 0-{})",
            SYNTHETIC_SAMPLE_RATE / 1000,
            VOICE_PITCH_HZ.len() - 1
        )
    }
}

/// Tone generator with three voices. Ignores the conditioning context.
#[derive(Debug, Clone, Default)]
pub struct SyntheticGenerator {
    latency: Duration,
}

impl SyntheticGenerator {
    fn pitch(speaker: u32) -> Option<f32> {
        VOICE_PITCH_HZ.get(speaker as usize).copied()
    }
}

impl SpeechGenerator for SyntheticGenerator {
    fn sample_rate(&self) -> u32 {
        SYNTHETIC_SAMPLE_RATE
    }

    fn generate(&self, request: &GenerationRequest<'_>) -> Result<Vec<f32>, GenerationError> {
        let pitch = Self::pitch(request.speaker.get())
            .ok_or(GenerationError::UnsupportedSpeaker(request.speaker))?;

        if !self.latency.is_zero() {
            std::thread::sleep(self.latency);
        }

        let chars = request.text.chars().count() as u64;
        let duration_ms = (chars * MS_PER_CHAR).min(u64::from(request.max_duration_ms));
        let rate = u64::from(SYNTHETIC_SAMPLE_RATE);
        let len = (duration_ms * rate / 1000) as usize;
        let fade = ((FADE_MS * rate / 1000) as usize).min(len / 2).max(1);

        let samples = (0..len)
            .map(|n| {
                let t = n as f32 / SYNTHETIC_SAMPLE_RATE as f32;
                let edge = n.min(len - 1 - n);
                let envelope = (edge as f32 / fade as f32).min(1.0);
                AMPLITUDE * envelope * (TAU * pitch * t).sin()
            })
            .collect();
        Ok(samples)
    }

    fn supports_concurrent_calls(&self) -> bool {
        true
    }
}
