//! Process exit codes.

use std::process::ExitCode;

use crate::error::BatchError;
use crate::metrics::BatchSummary;

/// Outcome of a CLI invocation, mapped onto a stable exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Every requested text was converted.
    Success,
    /// An error outside the batch taxonomy.
    Unexpected,
    Configuration,
    Initialization,
    /// The batch ran but at least one text has no output.
    PartialSuccess,
    /// Interrupted before every text was dispatched.
    Cancelled,
}

impl ExitStatus {
    pub const fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Unexpected => 1,
            Self::Configuration => 2,
            Self::Initialization => 3,
            Self::PartialSuccess => 4,
            Self::Cancelled => 130,
        }
    }

    pub fn from_summary(summary: &BatchSummary) -> Self {
        if summary.cancelled {
            Self::Cancelled
        } else if summary.is_complete() {
            Self::Success
        } else {
            Self::PartialSuccess
        }
    }

    pub fn from_error(error: &BatchError) -> Self {
        match error {
            BatchError::Configuration(_) => Self::Configuration,
            BatchError::Initialization(_) => Self::Initialization,
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}
