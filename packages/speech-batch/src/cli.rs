//! Command-line interface.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use speech_batch_domain::SpeakerId;

use crate::config::{BatchConfig, DevicePreference, TextEntry, read_texts_file};
use crate::error::ConfigError;
use crate::naming::NamingMode;

/// Convert a batch of texts to speech with a single loaded model
#[derive(Debug, Parser)]
#[command(name = "speech-batch", version)]
#[command(about = "Convert a list of texts into WAV files with one amortized TTS model")]
pub struct Cli {
    /// More diagnostic logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Net verbosity: negative when quiet.
    pub fn verbosity(&self) -> i8 {
        if self.quiet {
            -1
        } else {
            i8::try_from(self.verbose).unwrap_or(i8::MAX)
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert texts to WAV files
    Run(RunArgs),
    /// Write a sample configuration file
    InitConfig(InitConfigArgs),
}

/// Options of the `run` command; each one overrides the config file.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Text to convert (repeatable, appended after configured texts)
    #[arg(short, long = "text")]
    pub texts: Vec<String>,

    /// File with one text per line
    #[arg(long)]
    pub texts_file: Option<PathBuf>,

    /// Voice used for every text without its own override
    #[arg(short, long)]
    pub speaker: Option<u32>,

    /// Cap on generated audio per text, in milliseconds
    #[arg(long)]
    pub max_audio_length_ms: Option<u32>,

    /// Directory receiving the WAV files
    #[arg(short, long)]
    pub output_directory: Option<PathBuf>,

    /// Output file naming scheme
    #[arg(long, value_enum)]
    pub naming: Option<NamingMode>,

    /// Jobs in flight at once
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Deadline for a single generation, in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Compute device requested from the generator
    #[arg(long, value_enum)]
    pub device: Option<DevicePreference>,

    /// Artificial delay per generation of the synthetic backend
    #[arg(long)]
    pub synthetic_latency_ms: Option<u64>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl RunArgs {
    /// Build the effective configuration: file (or defaults), then flags.
    ///
    /// Validation is left to the batch so every entry point reports the same
    /// errors.
    pub fn resolve(&self) -> Result<BatchConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => BatchConfig::load(path)?,
            None => BatchConfig::default(),
        };

        if let Some(path) = &self.texts_file {
            config.texts.extend(read_texts_file(path)?);
        }
        config
            .texts
            .extend(self.texts.iter().cloned().map(TextEntry::from));

        if let Some(speaker) = self.speaker {
            config.speaker_id = SpeakerId(speaker);
        }
        if let Some(max) = self.max_audio_length_ms {
            config.max_audio_length_ms = max;
        }
        if let Some(dir) = &self.output_directory {
            config.output_directory = dir.clone();
        }
        if let Some(naming) = self.naming {
            config.naming = naming;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(timeout) = self.timeout_ms {
            config.generation_timeout_ms = Some(timeout);
        }
        if let Some(device) = self.device {
            config.execution.device = device;
        }
        if let Some(latency) = self.synthetic_latency_ms {
            config.generator.simulated_latency_ms = latency;
        }
        Ok(config)
    }
}

#[derive(Debug, Args)]
pub struct InitConfigArgs {
    /// Where to write the configuration
    #[arg(default_value = "speech-batch.json")]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}
