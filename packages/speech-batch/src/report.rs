//! Human-readable console report.
//!
//! Mirrors the per-text progress lines and the closing performance block of
//! the interactive tool. Report lines go to stdout; the progress bar draws on
//! stderr and is suspended while a line is printed.

use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use speech_batch_domain::{ConversionJob, DEFAULT_PREVIEW_CHARS, SpeakerId};

use crate::error::JobFailure;
use crate::metrics::BatchSummary;
use crate::observer::{BatchObserver, BatchStart, JobOutcome};

const PROGRESS_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len}";

/// [`BatchObserver`] printing to the terminal.
pub struct ConsoleReporter {
    speaker: SpeakerId,
    preview_chars: usize,
    show_progress: bool,
    progress: Option<ProgressBar>,
    output_directory: Option<PathBuf>,
}

impl ConsoleReporter {
    pub fn new(speaker: SpeakerId) -> Self {
        Self {
            speaker,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            show_progress: true,
            progress: None,
            output_directory: None,
        }
    }

    pub fn with_progress_bar(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn with_preview_chars(mut self, chars: usize) -> Self {
        self.preview_chars = chars;
        self
    }

    fn emit(&self, line: &str) {
        match &self.progress {
            Some(pb) => pb.suspend(|| println!("{line}")),
            None => println!("{line}"),
        }
    }

    fn advance(&self) {
        if let Some(pb) = &self.progress {
            pb.inc(1);
        }
    }

    fn progress_bar(total: usize) -> ProgressBar {
        let pb = ProgressBar::new(total as u64);
        match ProgressStyle::default_bar().template(PROGRESS_TEMPLATE) {
            Ok(style) => pb.set_style(style.progress_chars("#>-")),
            Err(e) => tracing::debug!(error = %e, "progress template rejected, using default style"),
        }
        pb
    }
}

pub fn job_header(job: &ConversionJob, total: usize, preview_chars: usize) -> String {
    format!("[{}/{}] \"{}\"", job.index(), total, job.preview(preview_chars))
}

pub fn job_saved(outcome: &JobOutcome, total: usize) -> String {
    format!(
        "[{}/{}] saved {} ({:.2}s audio, {:.2}s processing)",
        outcome.index,
        total,
        outcome.path.display(),
        outcome.audio_seconds,
        outcome.generation_time.as_secs_f64()
    )
}

pub fn job_failed(job: &ConversionJob, total: usize, failure: &JobFailure) -> String {
    format!("[{}/{}] failed: {failure}", job.index(), total)
}

impl BatchObserver for ConsoleReporter {
    fn on_load_start(&mut self, generator: &str) {
        self.emit(&format!("Loading {generator}..."));
    }

    fn on_batch_start(&mut self, start: &BatchStart<'_>) {
        self.emit(&format!(
            "Model loaded in {:.2} seconds ({} Hz)",
            start.load_time.as_secs_f64(),
            start.sample_rate
        ));
        self.emit(&format!(
            "\nProcessing {} texts with speaker {}...",
            start.jobs, self.speaker
        ));
        self.output_directory = Some(start.output_directory.to_path_buf());
        if self.show_progress && start.jobs > 0 {
            self.progress = Some(Self::progress_bar(start.jobs));
        }
    }

    fn on_job_start(&mut self, job: &ConversionJob, total: usize) {
        self.emit(&format!("\n{}", job_header(job, total, self.preview_chars)));
    }

    fn on_job_success(&mut self, _job: &ConversionJob, outcome: &JobOutcome, total: usize) {
        let mut line = job_saved(outcome, total);
        if outcome.exceeded_cap {
            line.push_str(" [over length cap]");
        }
        self.emit(&line);
        self.advance();
    }

    fn on_job_failure(&mut self, job: &ConversionJob, failure: &JobFailure, total: usize) {
        self.emit(&job_failed(job, total, failure));
        self.advance();
    }

    fn on_batch_end(&mut self, summary: &BatchSummary) {
        if let Some(pb) = self.progress.take() {
            pb.finish_and_clear();
        }
        println!("\n{summary}");
        if let Some(dir) = &self.output_directory {
            println!("\nAll files saved to: {}", dir.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    fn job(index: usize, text: &str) -> ConversionJob {
        ConversionJob::new(index, text, 0, Arc::from(Vec::new()), 10_000).unwrap()
    }

    #[test]
    fn header_truncates_long_texts() {
        let text = "a".repeat(80);
        let line = job_header(&job(2, &text), 5, DEFAULT_PREVIEW_CHARS);
        assert_eq!(line, format!("[2/5] \"{}...\"", "a".repeat(50)));
        assert_eq!(job_header(&job(1, "Hello world"), 1, 50), "[1/1] \"Hello world\"");
    }

    #[test]
    fn saved_and_failed_lines() {
        let outcome = JobOutcome {
            index: 1,
            path: Path::new("output").join("speech_01.wav"),
            audio_seconds: 1.0,
            generation_time: Duration::from_millis(1250),
            exceeded_cap: false,
        };
        let saved = job_saved(&outcome, 3);
        assert!(saved.starts_with("[1/3] saved "));
        assert!(saved.contains("speech_01.wav"));
        assert!(saved.ends_with("(1.00s audio, 1.25s processing)"));

        let failure = JobFailure::Timeout(Duration::from_secs(2));
        assert_eq!(
            job_failed(&job(3, "slow"), 4, &failure),
            "[3/4] failed: generation timed out after 2s"
        );
    }

    #[test]
    fn reporter_survives_a_full_batch_without_a_terminal() {
        let mut reporter = ConsoleReporter::new(SpeakerId(1)).with_progress_bar(false);
        let dir = Path::new("out");
        reporter.on_batch_start(&BatchStart {
            generator: "stub",
            load_time: Duration::ZERO,
            jobs: 1,
            sample_rate: 24_000,
            output_directory: dir,
        });
        reporter.on_job_failure(&job(1, "x"), &JobFailure::Panicked("boom".into()), 1);
        assert!(reporter.progress.is_none());
        assert_eq!(reporter.output_directory.as_deref(), Some(dir));
    }
}
