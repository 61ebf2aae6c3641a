//! `speech-batch` - convert a list of texts into WAV files with one
//! amortized speech-generation model.
//!
//! The generator is loaded once ([`BatchOrchestrator::initialize`]), every
//! text becomes a [`ConversionJob`](speech_batch_domain::ConversionJob), and
//! each result is written by an [`OutputWriter`](speech_batch_domain::OutputWriter)
//! while a [`MetricsAccumulator`] keeps the timing totals for the final
//! [`BatchSummary`].

pub mod cancel;
pub mod cli;
pub mod config;
pub mod error;
pub mod exit;
pub mod logging;
pub mod metrics;
pub mod naming;
pub mod observer;
pub mod orchestrator;
pub mod report;
pub mod runtime;
pub mod synthetic;
pub mod writer;

pub use cancel::CancelFlag;
pub use config::{
    BatchConfig, DevicePreference, ExecutionOptions, GeneratorBackend, GeneratorConfig, TextEntry,
};
pub use error::{BatchError, ConfigError, FailureKind, JobFailure};
pub use exit::ExitStatus;
pub use metrics::{BatchSummary, JobFailureRecord, MetricsAccumulator};
pub use naming::NamingMode;
pub use observer::{BatchObserver, BatchStart, JobOutcome, NullObserver};
pub use orchestrator::{BatchOrchestrator, OrchestratorOptions, convert_batch};
pub use report::ConsoleReporter;
pub use synthetic::{SYNTHETIC_SAMPLE_RATE, SyntheticGenerator, SyntheticLoader};
pub use writer::WavWriter;

pub use speech_batch_domain as domain;
