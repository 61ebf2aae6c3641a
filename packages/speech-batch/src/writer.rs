//! WAV persistence of generated samples.

use std::fs;
use std::path::Path;

use speech_batch_domain::{OutputWriter, PersistenceError};

/// Writes mono 16-bit PCM WAV files with `hound`.
///
/// Samples are clamped to -1.0‥+1.0 and scaled to ±32767. A file left
/// half-written by a failed write is removed.
#[derive(Debug, Default, Clone, Copy)]
pub struct WavWriter;

impl WavWriter {
    pub fn new() -> Self {
        Self
    }

    fn write_file(samples: &[f32], sample_rate: u32, path: &Path) -> Result<(), hound::Error> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec)?;
        for &sample in samples {
            let clamped = sample.clamp(-1.0, 1.0);
            writer.write_sample((clamped * f32::from(i16::MAX)) as i16)?;
        }
        writer.finalize()
    }
}

impl OutputWriter for WavWriter {
    fn write(&self, samples: &[f32], sample_rate: u32, path: &Path) -> Result<(), PersistenceError> {
        Self::write_file(samples, sample_rate, path).map_err(|err| {
            if path.is_file()
                && let Err(e) = fs::remove_file(path)
            {
                tracing::warn!(path = %path.display(), error = %e, "failed to remove partial output");
            }
            match err {
                hound::Error::IoError(source) => PersistenceError::io_error(path, source),
                other => PersistenceError::encode_error(path, other),
            }
        })
    }
}
