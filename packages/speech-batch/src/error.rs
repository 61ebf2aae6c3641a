//! Error taxonomy of a batch run.
//!
//! [`ConfigError`] and [`BatchError::Initialization`] are fatal. Everything
//! that can go wrong inside one job is a [`JobFailure`], which is reported and
//! skipped without touching the rest of the batch.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use speech_batch_domain::{GenerationError, JobSpecError, PersistenceError, SpeakerId};
use thiserror::Error;

/// Invalid batch configuration, detected before any generation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no texts to convert")]
    NoTexts,

    #[error("text {index} is empty")]
    EmptyText { index: usize },

    #[error("max audio length must be positive")]
    ZeroMaxDuration,

    #[error("text {index}: max audio length must be positive")]
    ZeroJobMaxDuration { index: usize },

    #[error("worker count must be at least 1")]
    ZeroWorkers,

    #[error("generation timeout must be positive")]
    ZeroTimeout,

    #[error("output directory {path}: {reason}")]
    OutputDirectory { path: PathBuf, reason: String },

    #[error("speaker-tagged naming would write texts {jobs:?} to the same file for speaker {speaker}")]
    NamingCollision { speaker: SpeakerId, jobs: Vec<usize> },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Job(#[from] JobSpecError),
}

/// Fatal failure of the whole batch.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("generator initialization failed: {0}")]
    Initialization(#[source] GenerationError),
}

/// Why a single job produced no output.
#[derive(Debug, Error)]
pub enum JobFailure {
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("persistence failed: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("worker panicked: {0}")]
    Panicked(String),
}

impl JobFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Generation(_) => FailureKind::Generation,
            Self::Persistence(_) => FailureKind::Persistence,
            Self::Timeout(_) => FailureKind::Timeout,
            Self::Panicked(_) => FailureKind::Panicked,
        }
    }
}

/// Category of a [`JobFailure`], kept in the metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    Generation,
    Persistence,
    Timeout,
    Panicked,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Generation => "generation",
            Self::Persistence => "persistence",
            Self::Timeout => "timeout",
            Self::Panicked => "panic",
        };
        f.write_str(name)
    }
}
