//! Batch orchestration: one generator load, many conversions.
//!
//! Jobs are dispatched in input order. With `workers == 1` the loop is
//! strictly sequential; larger values keep up to that many jobs in flight.
//! Every blocking `generate` call runs on tokio's blocking pool so it can be
//! bounded by a deadline, and all metrics updates happen on the orchestrating
//! task only.

use std::any::Any;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio::sync::Mutex;
use speech_batch_domain::{
    ConversionJob, ConversionResult, DEFAULT_PREVIEW_CHARS, GenerationError, GenerationRequest,
    GeneratorLoader, OutputWriter, SpeechGenerator,
};

use crate::cancel::CancelFlag;
use crate::config::BatchConfig;
use crate::error::{BatchError, JobFailure};
use crate::metrics::{BatchSummary, JobFailureRecord, MetricsAccumulator};
use crate::naming::NamingMode;
use crate::observer::{BatchObserver, BatchStart, JobOutcome};

/// Run-time knobs of the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorOptions {
    pub output_directory: PathBuf,
    pub naming: NamingMode,
    pub workers: usize,
    pub generation_timeout: Option<Duration>,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self::from_config(&BatchConfig::default())
    }
}

impl OrchestratorOptions {
    pub fn from_config(config: &BatchConfig) -> Self {
        Self {
            output_directory: config.output_directory.clone(),
            naming: config.naming,
            workers: config.workers,
            generation_timeout: config.generation_timeout(),
        }
    }
}

/// Owns the loaded generator and drives batches through it.
pub struct BatchOrchestrator<G, W> {
    generator: Arc<G>,
    writer: Arc<W>,
    /// Held around every `generate` call when the generator is not reentrant.
    /// Acquired before the call's deadline starts, so queueing is never timed.
    call_gate: Option<Arc<Mutex<()>>>,
    sample_rate: u32,
    description: String,
    load_time: Duration,
    options: OrchestratorOptions,
}

impl<G, W> BatchOrchestrator<G, W>
where
    G: SpeechGenerator,
    W: OutputWriter,
{
    /// Construct the generator exactly once and remember how long it took.
    ///
    /// # Errors
    /// [`BatchError::Initialization`] when the loader fails, panics, or
    /// reports a zero sample rate.
    pub async fn initialize<L>(
        loader: L,
        writer: W,
        options: OrchestratorOptions,
    ) -> Result<Self, BatchError>
    where
        L: GeneratorLoader<Generator = G>,
    {
        let description = loader.describe();
        tracing::info!(generator = %description, "• loading generator");

        let started = Instant::now();
        let generator = tokio::task::spawn_blocking(move || loader.load())
            .await
            .map_err(|e| {
                BatchError::Initialization(GenerationError::Load(format!("loader task failed: {e}")))
            })?
            .map_err(BatchError::Initialization)?;
        let load_time = started.elapsed();

        let sample_rate = generator.sample_rate();
        if sample_rate == 0 {
            return Err(BatchError::Initialization(GenerationError::Load(
                "generator reported a zero sample rate".to_string(),
            )));
        }

        let call_gate = if generator.supports_concurrent_calls() {
            None
        } else {
            if options.workers > 1 {
                tracing::warn!(
                    workers = options.workers,
                    "• generator is not reentrant, generate calls will be serialized"
                );
            }
            Some(Arc::new(Mutex::new(())))
        };

        tracing::info!(
            generator = %description,
            sample_rate,
            load_secs = load_time.as_secs_f64(),
            "✔ generator loaded"
        );

        Ok(Self {
            generator: Arc::new(generator),
            writer: Arc::new(writer),
            call_gate,
            sample_rate,
            description,
            load_time,
            options,
        })
    }

    #[inline]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[inline]
    pub fn load_time(&self) -> Duration {
        self.load_time
    }

    #[inline]
    pub fn options(&self) -> &OrchestratorOptions {
        &self.options
    }

    /// Convert every job, reporting through `observer`, and summarise.
    ///
    /// Per-job failures are recorded and skipped. `cancel` is checked before
    /// each dispatch; jobs already in flight finish and keep their output.
    pub async fn run<O>(
        &self,
        jobs: Vec<ConversionJob>,
        cancel: &CancelFlag,
        observer: &mut O,
    ) -> BatchSummary
    where
        O: BatchObserver + ?Sized,
    {
        let total = jobs.len();
        let mut metrics = MetricsAccumulator::new(total);
        metrics.record_load(self.load_time);

        observer.on_batch_start(&BatchStart {
            generator: &self.description,
            load_time: self.load_time,
            jobs: total,
            sample_rate: self.sample_rate,
            output_directory: &self.options.output_directory,
        });
        tracing::info!(jobs = total, workers = self.options.workers, "• converting texts");

        let workers = self.options.workers.max(1);
        let started = Instant::now();
        let mut pending = jobs.into_iter();
        let mut in_flight = FuturesUnordered::new();

        loop {
            while in_flight.len() < workers && !cancel.is_cancelled() {
                let Some(job) = pending.next() else { break };
                metrics.record_dispatch();
                observer.on_job_start(&job, total);
                in_flight.push(self.process(job));
            }

            let Some((job, outcome)) = in_flight.next().await else {
                break;
            };
            match outcome {
                Ok(outcome) => {
                    if outcome.exceeded_cap {
                        tracing::warn!(
                            index = job.index(),
                            audio_secs = outcome.audio_seconds,
                            max_ms = job.max_duration_ms(),
                            "• generator exceeded the requested length cap"
                        );
                        metrics.record_cap_exceeded();
                    }
                    metrics.record_job(outcome.generation_time, outcome.audio_seconds);
                    tracing::info!(
                        index = job.index(),
                        path = %outcome.path.display(),
                        audio_secs = outcome.audio_seconds,
                        processing_secs = outcome.generation_time.as_secs_f64(),
                        "✔ saved"
                    );
                    observer.on_job_success(&job, &outcome, total);
                }
                Err(failure) => {
                    tracing::error!(
                        index = job.index(),
                        text = %job.preview(DEFAULT_PREVIEW_CHARS),
                        error = %failure,
                        "✘ job failed"
                    );
                    metrics.record_failure(JobFailureRecord {
                        index: job.index(),
                        kind: failure.kind(),
                        message: failure.to_string(),
                    });
                    observer.on_job_failure(&job, &failure, total);
                }
            }
        }

        let skipped = pending.count();
        if skipped > 0 {
            tracing::warn!(skipped, "• batch cancelled before all texts were dispatched");
            metrics.record_cancelled(skipped);
        }
        metrics.record_wall_time(started.elapsed());

        let summary = metrics.summary();
        tracing::info!(
            succeeded = summary.succeeded,
            requested = summary.requested,
            audio_secs = summary.total_audio_seconds,
            "• batch finished"
        );
        observer.on_batch_end(&summary);
        summary
    }

    /// Generate and persist one job. Never touches shared metrics.
    async fn process(&self, job: ConversionJob) -> (ConversionJob, Result<JobOutcome, JobFailure>) {
        let path = self.options.naming.path_for(&self.options.output_directory, &job);
        let outcome = match self.generate(&job).await {
            Ok(result) => self.persist(&job, result, path.clone()).await,
            Err(failure) => Err(failure),
        };
        if outcome.is_err() {
            discard_stale_output(&path);
        }
        (job, outcome)
    }

    async fn generate(&self, job: &ConversionJob) -> Result<ConversionResult, JobFailure> {
        let generator = Arc::clone(&self.generator);
        let gate = self.call_gate.clone();
        let sample_rate = self.sample_rate;
        let job = job.clone();

        let serialized = match gate {
            Some(gate) => Some(gate.lock_owned().await),
            None => None,
        };

        let task = tokio::task::spawn_blocking(move || {
            // Released when the call returns, even after its deadline expired.
            let _serialized = serialized;
            let started = Instant::now();
            let samples = generator.generate(&GenerationRequest::from(&job))?;
            Ok::<_, GenerationError>(ConversionResult::new(
                job.index(),
                samples,
                sample_rate,
                started.elapsed(),
            ))
        });

        let joined = match self.options.generation_timeout {
            // An expired call keeps running on the blocking pool; its result is dropped.
            Some(limit) => match tokio::time::timeout(limit, task).await {
                Ok(joined) => joined,
                Err(_) => return Err(JobFailure::Timeout(limit)),
            },
            None => task.await,
        };

        match joined {
            Ok(result) => result.map_err(JobFailure::from),
            Err(e) if e.is_panic() => Err(JobFailure::Panicked(panic_message(e.into_panic()))),
            Err(e) => Err(JobFailure::Panicked(e.to_string())),
        }
    }

    async fn persist(
        &self,
        job: &ConversionJob,
        result: ConversionResult,
        path: PathBuf,
    ) -> Result<JobOutcome, JobFailure> {
        let writer = Arc::clone(&self.writer);
        let exceeded_cap = result.exceeds_cap(job.max_duration_ms());

        let written = tokio::task::spawn_blocking(move || {
            writer
                .write(&result.samples, result.sample_rate, &path)
                .map(|()| JobOutcome {
                    index: result.index,
                    audio_seconds: result.duration_seconds(),
                    generation_time: result.generation_time,
                    exceeded_cap,
                    path,
                })
        })
        .await;

        match written {
            Ok(outcome) => outcome.map_err(JobFailure::from),
            Err(e) if e.is_panic() => Err(JobFailure::Panicked(panic_message(e.into_panic()))),
            Err(e) => Err(JobFailure::Panicked(e.to_string())),
        }
    }
}

/// Remove an output left by an earlier run so the directory only holds this
/// run's successes.
fn discard_stale_output(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "• removed stale output of failed job");
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove stale output");
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Validate `config`, load the generator once and run the whole batch.
///
/// # Errors
/// Configuration problems are reported before the loader is touched;
/// a failing loader aborts the batch. Per-job failures are not errors, they
/// are part of the returned [`BatchSummary`].
pub async fn convert_batch<L, W, O>(
    config: &BatchConfig,
    loader: L,
    writer: W,
    cancel: &CancelFlag,
    observer: &mut O,
) -> Result<BatchSummary, BatchError>
where
    L: GeneratorLoader,
    W: OutputWriter,
    O: BatchObserver + ?Sized,
{
    config.validate()?;
    let jobs = config.jobs()?;
    config.prepare_output_directory()?;

    observer.on_load_start(&loader.describe());
    let orchestrator =
        BatchOrchestrator::initialize(loader, writer, OrchestratorOptions::from_config(config))
            .await?;
    Ok(orchestrator.run(jobs, cancel, observer).await)
}
