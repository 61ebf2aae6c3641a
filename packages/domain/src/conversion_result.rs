//! Audio produced for one job plus its timing.

use std::time::Duration;

/// Output of a single successful generation.
///
/// Consumed immediately by the writer and the metrics; never retained for the
/// whole batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub index: usize,
    pub samples: Vec<f32>,
    /// Fixed for the batch; reported by the generator at load time.
    pub sample_rate: u32,
    /// Wall time spent inside `generate`.
    pub generation_time: Duration,
}

impl ConversionResult {
    pub fn new(index: usize, samples: Vec<f32>, sample_rate: u32, generation_time: Duration) -> Self {
        Self {
            index,
            samples,
            sample_rate,
            generation_time,
        }
    }

    /// `len(samples) / sample_rate`, or 0.0 for a zero sample rate.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration_seconds())
    }

    /// Whether the audio is longer than the job's cap.
    ///
    /// The cap is part of the generator's contract; the batch layer only
    /// observes it.
    pub fn exceeds_cap(&self, max_duration_ms: u32) -> bool {
        self.duration_seconds() * 1000.0 > f64::from(max_duration_ms)
    }

    /// Generation time over audio time, `None` for empty audio.
    pub fn real_time_factor(&self) -> Option<f64> {
        let audio = self.duration_seconds();
        (audio > 0.0).then(|| self.generation_time.as_secs_f64() / audio)
    }
}
