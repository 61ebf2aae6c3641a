//! Progress hooks of a batch run.

use std::path::{Path, PathBuf};
use std::time::Duration;

use speech_batch_domain::ConversionJob;

use crate::error::JobFailure;
use crate::metrics::BatchSummary;

/// Facts known once the generator is loaded.
#[derive(Debug, Clone, Copy)]
pub struct BatchStart<'a> {
    pub generator: &'a str,
    pub load_time: Duration,
    pub jobs: usize,
    pub sample_rate: u32,
    pub output_directory: &'a Path,
}

/// A job whose audio was written.
#[derive(Debug, Clone, PartialEq)]
pub struct JobOutcome {
    pub index: usize,
    pub path: PathBuf,
    pub audio_seconds: f64,
    pub generation_time: Duration,
    /// The generator returned more audio than the job's cap allows.
    pub exceeded_cap: bool,
}

/// Receives progress notifications from the orchestrator, in order, on the
/// orchestrating task. All hooks default to no-ops.
pub trait BatchObserver: Send {
    fn on_load_start(&mut self, _generator: &str) {}

    fn on_batch_start(&mut self, _start: &BatchStart<'_>) {}

    fn on_job_start(&mut self, _job: &ConversionJob, _total: usize) {}

    fn on_job_success(&mut self, _job: &ConversionJob, _outcome: &JobOutcome, _total: usize) {}

    fn on_job_failure(&mut self, _job: &ConversionJob, _failure: &JobFailure, _total: usize) {}

    fn on_batch_end(&mut self, _summary: &BatchSummary) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl BatchObserver for NullObserver {}
