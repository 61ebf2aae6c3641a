//! Output file naming.
//!
//! A file name is a pure function of the job, so the job-to-file mapping does
//! not depend on the order in which jobs complete.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use speech_batch_domain::ConversionJob;

/// How output files are named inside the output directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum NamingMode {
    /// `speech_01.wav`, `speech_02.wav`, ... (1-based, at least two digits).
    #[default]
    Sequential,
    /// `output_speech_speaker{id}.wav`, for single-text conversions.
    SpeakerTagged,
}

impl NamingMode {
    pub fn file_name(self, job: &ConversionJob) -> String {
        match self {
            Self::Sequential => format!("speech_{:02}.wav", job.index()),
            Self::SpeakerTagged => format!("output_speech_speaker{}.wav", job.speaker()),
        }
    }

    pub fn path_for(self, output_directory: &Path, job: &ConversionJob) -> PathBuf {
        output_directory.join(self.file_name(job))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn job(index: usize, speaker: u32) -> ConversionJob {
        ConversionJob::new(index, "text", speaker, Arc::from(Vec::new()), 10_000).unwrap()
    }

    #[test]
    fn sequential_names_are_zero_padded() {
        assert_eq!(NamingMode::Sequential.file_name(&job(1, 0)), "speech_01.wav");
        assert_eq!(NamingMode::Sequential.file_name(&job(12, 0)), "speech_12.wav");
        assert_eq!(NamingMode::Sequential.file_name(&job(123, 0)), "speech_123.wav");
    }

    #[test]
    fn sequential_names_sort_by_index() {
        let names: Vec<String> = (1..=30)
            .map(|i| NamingMode::Sequential.file_name(&job(i, 0)))
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(names, sorted);
    }

    #[test]
    fn speaker_tagged_uses_speaker_id() {
        let path = NamingMode::SpeakerTagged.path_for(Path::new("output"), &job(1, 2));
        assert_eq!(path, Path::new("output").join("output_speech_speaker2.wav"));
    }
}
