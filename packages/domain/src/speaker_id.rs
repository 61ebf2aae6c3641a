//! Voice selector understood by the generator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer selecting one of the pre-trained voice profiles of a model.
///
/// Validity is owned by the generator: an id the model does not know is
/// reported as [`GenerationError::UnsupportedSpeaker`](crate::GenerationError)
/// at generation time, never rejected here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeakerId(pub u32);

impl SpeakerId {
    /// Raw numeric id.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for SpeakerId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for SpeakerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
