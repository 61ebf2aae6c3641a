//! Timing and throughput bookkeeping for a batch run.
//!
//! Pure accounting: the orchestrator is the only writer, every record is
//! append-only, and [`MetricsAccumulator::summary`] derives the ratios with
//! explicit guards so an empty batch or an all-failed batch never divides by
//! zero.

use std::fmt;
use std::time::Duration;

use crate::error::FailureKind;

/// A job that produced no output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFailureRecord {
    pub index: usize,
    pub kind: FailureKind,
    pub message: String,
}

/// Running totals of one batch.
#[derive(Debug, Default)]
pub struct MetricsAccumulator {
    requested: usize,
    model_load_duration: Duration,
    per_job_durations: Vec<Duration>,
    total_audio_seconds: f64,
    /// Jobs handed to the generator so far; never less than `per_job_durations.len()`.
    job_count: usize,
    failures: Vec<JobFailureRecord>,
    cap_exceeded: usize,
    batch_wall_time: Option<Duration>,
    skipped_by_cancel: usize,
}

impl MetricsAccumulator {
    pub fn new(requested: usize) -> Self {
        Self {
            requested,
            ..Self::default()
        }
    }

    pub fn record_load(&mut self, duration: Duration) {
        self.model_load_duration = duration;
    }

    pub fn record_dispatch(&mut self) {
        self.job_count += 1;
    }

    /// Record a completed job: its generation time and the audio it produced.
    pub fn record_job(&mut self, duration: Duration, audio_seconds: f64) {
        debug_assert!(
            self.per_job_durations.len() < self.job_count,
            "job recorded without being dispatched"
        );
        self.per_job_durations.push(duration);
        self.total_audio_seconds += audio_seconds.max(0.0);
    }

    pub fn record_failure(&mut self, failure: JobFailureRecord) {
        self.failures.push(failure);
    }

    pub fn record_cap_exceeded(&mut self) {
        self.cap_exceeded += 1;
    }

    pub fn record_wall_time(&mut self, duration: Duration) {
        self.batch_wall_time = Some(duration);
    }

    /// Jobs that were never dispatched because the batch was cancelled.
    pub fn record_cancelled(&mut self, skipped: usize) {
        self.skipped_by_cancel += skipped;
    }

    #[inline]
    pub fn job_count(&self) -> usize {
        self.job_count
    }

    #[inline]
    pub fn per_job_durations(&self) -> &[Duration] {
        &self.per_job_durations
    }

    pub fn summary(&self) -> BatchSummary {
        let processing_time: Duration = self.per_job_durations.iter().sum();
        let processing_secs = processing_time.as_secs_f64();
        let succeeded = self.per_job_durations.len();

        let real_time_factor =
            (self.total_audio_seconds > 0.0).then(|| processing_secs / self.total_audio_seconds);
        let throughput = (processing_secs > 0.0).then(|| succeeded as f64 / processing_secs);

        BatchSummary {
            model_load_time: self.model_load_duration,
            processing_time,
            total_time: self.model_load_duration + processing_time,
            wall_time: self.batch_wall_time,
            total_audio_seconds: self.total_audio_seconds,
            real_time_factor,
            throughput,
            requested: self.requested,
            dispatched: self.job_count,
            succeeded,
            failures: self.failures.clone(),
            cap_exceeded: self.cap_exceeded,
            cancelled: self.skipped_by_cancel > 0,
        }
    }
}

/// Final report of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub model_load_time: Duration,
    /// Sum of per-job generation times.
    pub processing_time: Duration,
    /// Load time plus processing time.
    pub total_time: Duration,
    /// Elapsed time of the job loop; lower than `processing_time` when jobs overlap.
    pub wall_time: Option<Duration>,
    pub total_audio_seconds: f64,
    /// Processing time over audio time; `None` when no audio was produced.
    pub real_time_factor: Option<f64>,
    /// Successful jobs per second of processing; `None` when nothing was processed.
    ///
    /// Counts successes rather than dispatched jobs: a failed job has no
    /// recorded duration, so counting it would inflate the rate.
    pub throughput: Option<f64>,
    pub requested: usize,
    pub dispatched: usize,
    pub succeeded: usize,
    pub failures: Vec<JobFailureRecord>,
    pub cap_exceeded: usize,
    pub cancelled: bool,
}

impl BatchSummary {
    #[inline]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Every requested job produced a file.
    pub fn is_complete(&self) -> bool {
        !self.cancelled && self.succeeded == self.requested
    }

    /// At least one requested job has no output (failed or skipped by cancellation).
    pub fn is_partial(&self) -> bool {
        !self.is_complete()
    }
}

struct Ratio(Option<f64>, &'static str);

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{value:.2}{}", self.1),
            None => f.write_str("n/a"),
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Performance Summary:")?;
        writeln!(f, "  • Model loading time: {:.2}s", self.model_load_time.as_secs_f64())?;
        writeln!(f, "  • Total TTS processing: {:.2}s", self.processing_time.as_secs_f64())?;
        writeln!(f, "  • Total processing time: {:.2}s", self.total_time.as_secs_f64())?;
        if let Some(wall) = self.wall_time {
            writeln!(f, "  • Batch wall time: {:.2}s", wall.as_secs_f64())?;
        }
        writeln!(f, "  • Total audio generated: {:.2}s", self.total_audio_seconds)?;
        writeln!(f, "  • Average real-time factor: {}", Ratio(self.real_time_factor, "x"))?;
        writeln!(f, "  • Files per second: {}", Ratio(self.throughput, ""))?;
        if self.cap_exceeded > 0 {
            writeln!(f, "  • Outputs over their length cap: {}", self.cap_exceeded)?;
        }
        write!(f, "  • Succeeded: {}/{}", self.succeeded, self.requested)?;
        if self.failed() > 0 {
            write!(f, " ({} failed)", self.failed())?;
        }
        if self.cancelled {
            write!(f, " (cancelled after {} dispatched)", self.dispatched)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_batch_reports_without_dividing_by_zero() {
        let metrics = MetricsAccumulator::new(0);
        let summary = metrics.summary();
        assert_eq!(summary.real_time_factor, None);
        assert_eq!(summary.throughput, None);
        assert_eq!(summary.total_audio_seconds, 0.0);
        assert!(summary.is_complete());
        assert!(summary.to_string().contains("Average real-time factor: n/a"));
    }

    #[test]
    fn failed_first_job_reports_without_dividing_by_zero() {
        let mut metrics = MetricsAccumulator::new(1);
        metrics.record_load(Duration::from_millis(250));
        metrics.record_dispatch();
        metrics.record_failure(JobFailureRecord {
            index: 1,
            kind: FailureKind::Generation,
            message: "boom".to_string(),
        });
        let summary = metrics.summary();
        assert_eq!(summary.real_time_factor, None);
        assert_eq!(summary.throughput, None);
        assert_eq!(summary.total_time, Duration::from_millis(250));
        assert_eq!(summary.failed(), 1);
        assert!(summary.is_partial());
        assert!(summary.to_string().contains("Succeeded: 0/1 (1 failed)"));
    }

    #[test]
    fn ratios_follow_recorded_totals() {
        let mut metrics = MetricsAccumulator::new(2);
        metrics.record_load(Duration::from_secs(3));
        for _ in 0..2 {
            metrics.record_dispatch();
            metrics.record_job(Duration::from_millis(500), 2.0);
        }
        assert_eq!(metrics.job_count(), metrics.per_job_durations().len());

        let summary = metrics.summary();
        assert_eq!(summary.processing_time, Duration::from_secs(1));
        assert_eq!(summary.total_time, Duration::from_secs(4));
        assert!((summary.total_audio_seconds - 4.0).abs() < 1e-9);
        assert!((summary.real_time_factor.unwrap() - 0.25).abs() < 1e-9);
        assert!((summary.throughput.unwrap() - 2.0).abs() < 1e-9);
        assert!(summary.is_complete());
    }

    #[test]
    fn cancellation_marks_the_summary() {
        let mut metrics = MetricsAccumulator::new(3);
        metrics.record_dispatch();
        metrics.record_job(Duration::from_millis(10), 0.5);
        metrics.record_cancelled(2);
        let summary = metrics.summary();
        assert!(summary.cancelled);
        assert!(!summary.is_complete());
        assert_eq!(summary.dispatched, 1);
    }

    #[test]
    fn throughput_counts_only_successful_jobs() {
        let mut metrics = MetricsAccumulator::new(3);
        metrics.record_dispatch();
        metrics.record_job(Duration::from_millis(500), 1.0);
        metrics.record_dispatch();
        metrics.record_failure(JobFailureRecord {
            index: 2,
            kind: FailureKind::Generation,
            message: "boom".to_string(),
        });
        metrics.record_dispatch();
        metrics.record_job(Duration::from_millis(500), 1.0);

        let summary = metrics.summary();
        assert_eq!(summary.dispatched, 3);
        assert!((summary.throughput.unwrap() - 2.0).abs() < 1e-9);
    }
}
