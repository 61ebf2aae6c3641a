//! Batch configuration.
//!
//! Everything the batch needs is carried explicitly in [`BatchConfig`]
//! (including execution switches such as forcing CPU), loaded from a JSON
//! file and/or overridden from the command line.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use speech_batch_domain::{ContextTurn, ConversionJob, SpeakerId};

use crate::error::ConfigError;
use crate::naming::NamingMode;

/// Default cap on generated audio per text (10 s).
pub const DEFAULT_MAX_AUDIO_LENGTH_MS: u32 = 10_000;

/// Default output directory, created when absent.
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "output";

// ------------ Texts -----------------

/// One text to convert, optionally overriding the batch-wide voice settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextEntry {
    Plain(String),
    Detailed {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        speaker_id: Option<SpeakerId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_audio_length_ms: Option<u32>,
    },
}

impl TextEntry {
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(text) | Self::Detailed { text, .. } => text,
        }
    }

    pub fn speaker_override(&self) -> Option<SpeakerId> {
        match self {
            Self::Plain(_) => None,
            Self::Detailed { speaker_id, .. } => *speaker_id,
        }
    }

    pub fn max_audio_length_override(&self) -> Option<u32> {
        match self {
            Self::Plain(_) => None,
            Self::Detailed {
                max_audio_length_ms,
                ..
            } => *max_audio_length_ms,
        }
    }
}

impl From<&str> for TextEntry {
    fn from(text: &str) -> Self {
        Self::Plain(text.to_string())
    }
}

impl From<String> for TextEntry {
    fn from(text: String) -> Self {
        Self::Plain(text)
    }
}

// ------------ Execution -------------

/// Compute device requested from the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DevicePreference {
    #[default]
    Cpu,
    Auto,
}

/// Execution switches handed to the generator loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionOptions {
    pub device: DevicePreference,
    /// Skip compiled-kernel paths; slower but more portable.
    pub disable_compilation: bool,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            device: DevicePreference::Cpu,
            disable_compilation: true,
        }
    }
}

// ------------ Generator -------------

/// Generator backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeneratorBackend {
    /// Built-in deterministic tone generator.
    #[default]
    Synthetic,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub backend: GeneratorBackend,
    /// Artificial per-call delay of the synthetic backend.
    pub simulated_latency_ms: u64,
}

// ------------ BatchConfig (root) -------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub texts: Vec<TextEntry>,
    pub speaker_id: SpeakerId,
    pub context: Vec<ContextTurn>,
    pub max_audio_length_ms: u32,
    pub output_directory: PathBuf,
    pub naming: NamingMode,
    /// Jobs in flight at once; 1 keeps the strictly sequential behaviour.
    pub workers: usize,
    /// Deadline for a single `generate` call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_timeout_ms: Option<u64>,
    pub execution: ExecutionOptions,
    pub generator: GeneratorConfig,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            texts: Vec::new(),
            speaker_id: SpeakerId(0),
            context: Vec::new(),
            max_audio_length_ms: DEFAULT_MAX_AUDIO_LENGTH_MS,
            output_directory: PathBuf::from(DEFAULT_OUTPUT_DIRECTORY),
            naming: NamingMode::Sequential,
            workers: 1,
            generation_timeout_ms: None,
            execution: ExecutionOptions::default(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl BatchConfig {
    /// A ready-to-edit configuration with a few demonstration texts.
    pub fn sample() -> Self {
        Self {
            texts: vec![
                "Hello, this is the first demonstration of batch text to speech.".into(),
                "A single model instance is loaded once and reused for every text.".into(),
                TextEntry::Detailed {
                    text: "This entry overrides the voice and the length cap.".to_string(),
                    speaker_id: Some(SpeakerId(1)),
                    max_audio_length_ms: Some(15_000),
                },
            ],
            speaker_id: SpeakerId(2),
            ..Self::default()
        }
    }

    /// Load a JSON config from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&txt).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save to disk (pretty-printed).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| write_err(e.into()))?;
        fs::write(path, json).map_err(write_err)
    }

    pub fn generation_timeout(&self) -> Option<Duration> {
        self.generation_timeout_ms.map(Duration::from_millis)
    }

    /// Check every invariant that can be checked without running the batch.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.texts.is_empty() {
            return Err(ConfigError::NoTexts);
        }
        if self.max_audio_length_ms == 0 {
            return Err(ConfigError::ZeroMaxDuration);
        }
        for (index, entry) in (1..).zip(&self.texts) {
            if entry.text().trim().is_empty() {
                return Err(ConfigError::EmptyText { index });
            }
            if entry.max_audio_length_override() == Some(0) {
                return Err(ConfigError::ZeroJobMaxDuration { index });
            }
        }
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.generation_timeout_ms == Some(0) {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.naming == NamingMode::SpeakerTagged {
            self.check_speaker_tagged_collisions()?;
        }
        self.check_output_directory()
    }

    fn check_speaker_tagged_collisions(&self) -> Result<(), ConfigError> {
        let mut by_speaker: BTreeMap<SpeakerId, Vec<usize>> = BTreeMap::new();
        for (index, entry) in (1..).zip(&self.texts) {
            let speaker = entry.speaker_override().unwrap_or(self.speaker_id);
            by_speaker.entry(speaker).or_default().push(index);
        }
        match by_speaker.into_iter().find(|(_, jobs)| jobs.len() > 1) {
            Some((speaker, jobs)) => Err(ConfigError::NamingCollision { speaker, jobs }),
            None => Ok(()),
        }
    }

    fn check_output_directory(&self) -> Result<(), ConfigError> {
        let path = &self.output_directory;
        let invalid = |reason: &str| ConfigError::OutputDirectory {
            path: path.clone(),
            reason: reason.to_string(),
        };
        if path.as_os_str().is_empty() {
            return Err(invalid("path is empty"));
        }
        match fs::metadata(path) {
            Ok(meta) if !meta.is_dir() => Err(invalid("exists and is not a directory")),
            Ok(meta) if meta.permissions().readonly() => Err(invalid("directory is read-only")),
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(invalid(&e.to_string())),
        }
    }

    /// Create the output directory if it does not exist yet.
    pub fn prepare_output_directory(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.output_directory).map_err(|e| ConfigError::OutputDirectory {
            path: self.output_directory.clone(),
            reason: e.to_string(),
        })
    }

    /// Materialise the ordered job list (1-based indices, overrides applied).
    pub fn jobs(&self) -> Result<Vec<ConversionJob>, ConfigError> {
        let context: Arc<[ContextTurn]> = Arc::from(self.context.clone());
        (1..)
            .zip(&self.texts)
            .map(|(index, entry)| {
                ConversionJob::new(
                    index,
                    entry.text(),
                    entry.speaker_override().unwrap_or(self.speaker_id),
                    Arc::clone(&context),
                    entry
                        .max_audio_length_override()
                        .unwrap_or(self.max_audio_length_ms),
                )
                .map_err(ConfigError::from)
            })
            .collect()
    }
}

/// Read texts from a file, one per line; blank lines are skipped.
pub fn read_texts_file<P: AsRef<Path>>(path: P) -> Result<Vec<TextEntry>, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(TextEntry::from)
        .collect())
}
