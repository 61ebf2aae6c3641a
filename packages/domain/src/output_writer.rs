//! Contract of the external audio persistence step.

use std::path::Path;

use crate::voice_error::PersistenceError;

/// Persists mono samples as a playable audio file.
///
/// A second write to the same path overwrites the first.
pub trait OutputWriter: Send + Sync + 'static {
    fn write(&self, samples: &[f32], sample_rate: u32, path: &Path) -> Result<(), PersistenceError>;
}
