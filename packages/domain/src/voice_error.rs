//! Error types shared by generators, writers and job construction.

use std::path::PathBuf;
use thiserror::Error;

use crate::speaker_id::SpeakerId;

/// Failure raised by a [`SpeechGenerator`](crate::SpeechGenerator) or its loader.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// The model has no voice profile for this id.
    #[error("unsupported speaker {0}")]
    UnsupportedSpeaker(SpeakerId),
    /// Memory, device or other resource limits were hit.
    #[error("resource exhaustion: {0}")]
    ResourceExhausted(String),
    /// Any other internal model failure.
    #[error("model: {0}")]
    Model(String),
    /// The model could not be constructed.
    #[error("load: {0}")]
    Load(String),
}

/// Failure raised by an [`OutputWriter`](crate::OutputWriter).
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode {path}: {message}")]
    Encode { path: PathBuf, message: String },
}

impl PersistenceError {
    pub fn io_error<P: Into<PathBuf>>(path: P, error: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source: error,
        }
    }

    pub fn encode_error<P: Into<PathBuf>>(path: P, message: impl ToString) -> Self {
        Self::Encode {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Target path of the failed write.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. } | Self::Encode { path, .. } => path,
        }
    }
}

/// A job description that violates its invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobSpecError {
    #[error("job indices are 1-based")]
    ZeroIndex,
    #[error("job {index}: text is empty")]
    EmptyText { index: usize },
    #[error("job {index}: max duration must be positive")]
    ZeroMaxDuration { index: usize },
}
