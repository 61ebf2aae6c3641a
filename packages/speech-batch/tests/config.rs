//! Configuration files and command-line overrides.

use std::fs;

use clap::Parser;
use speech_batch::cli::{Cli, Commands};
use speech_batch::domain::SpeakerId;
use speech_batch::{BatchConfig, ConfigError, DevicePreference, NamingMode, TextEntry};
use tempfile::TempDir;

#[test]
fn json_file_mixes_plain_and_detailed_texts() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("batch.json");
    fs::write(
        &path,
        r#"{
            "texts": [
                "Hello world",
                { "text": "Quieter voice", "speaker_id": 1, "max_audio_length_ms": 4000 }
            ],
            "speaker_id": 2,
            "naming": "speaker-tagged",
            "execution": { "device": "auto" }
        }"#,
    )
    .unwrap();

    let config = BatchConfig::load(&path).unwrap();
    assert_eq!(config.texts[0], TextEntry::from("Hello world"));
    assert_eq!(config.texts[1].speaker_override(), Some(SpeakerId(1)));
    assert_eq!(config.naming, NamingMode::SpeakerTagged);
    assert_eq!(config.execution.device, DevicePreference::Auto);
    assert!(config.execution.disable_compilation);
    assert_eq!(config.max_audio_length_ms, 10_000);

    let jobs = config.jobs().unwrap();
    assert_eq!(jobs[0].speaker(), SpeakerId(2));
    assert_eq!(jobs[1].max_duration_ms(), 4_000);
}

#[test]
fn saved_sample_loads_back() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("speech-batch.json");
    let sample = BatchConfig::sample();
    sample.save(&path).unwrap();
    assert_eq!(BatchConfig::load(&path).unwrap(), sample);
}

#[test]
fn broken_files_are_reported_with_their_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ texts: ").unwrap();
    match BatchConfig::load(&path) {
        Err(ConfigError::Parse { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected parse error, got {other:?}"),
    }
    assert!(matches!(
        BatchConfig::load(dir.path().join("missing.json")),
        Err(ConfigError::Read { .. })
    ));
}

#[test]
fn output_path_that_is_a_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("taken");
    fs::write(&file, b"x").unwrap();
    let config = BatchConfig {
        texts: vec!["hi".into()],
        output_directory: file,
        ..BatchConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::OutputDirectory { .. })
    ));
}

#[test]
fn cli_flags_override_the_config_file() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("batch.json");
    let texts_path = dir.path().join("texts.txt");
    BatchConfig::sample().save(&config_path).unwrap();
    fs::write(&texts_path, "From file one\n\n   \nFrom file two\n").unwrap();

    let cli = Cli::try_parse_from([
        "speech-batch",
        "-v",
        "run",
        "--config",
        config_path.to_str().unwrap(),
        "--texts-file",
        texts_path.to_str().unwrap(),
        "--text",
        "From flag",
        "--speaker",
        "1",
        "--workers",
        "2",
        "--naming",
        "sequential",
        "--timeout-ms",
        "5000",
        "--output-directory",
        "wavs",
    ])
    .unwrap();
    assert_eq!(cli.verbosity(), 1);

    let Commands::Run(args) = cli.command else {
        panic!("expected run command");
    };
    let config = args.resolve().unwrap();
    let texts: Vec<&str> = config.texts.iter().map(TextEntry::text).collect();
    assert_eq!(texts.len(), 6);
    assert_eq!(&texts[3..], ["From file one", "From file two", "From flag"]);
    assert_eq!(config.speaker_id, SpeakerId(1));
    assert_eq!(config.workers, 2);
    assert_eq!(config.generation_timeout_ms, Some(5_000));
    assert_eq!(config.output_directory, std::path::PathBuf::from("wavs"));
}

#[test]
fn cli_without_config_uses_defaults() {
    let cli = Cli::try_parse_from(["speech-batch", "-q", "run", "-t", "Hello world"]).unwrap();
    assert_eq!(cli.verbosity(), -1);
    let Commands::Run(args) = cli.command else {
        panic!("expected run command");
    };
    let config = args.resolve().unwrap();
    assert_eq!(config.texts, vec![TextEntry::from("Hello world")]);
    assert_eq!(config.max_audio_length_ms, 10_000);
    assert!(config.validate().is_ok());
}

#[test]
fn init_config_parses_path_and_force() {
    let cli = Cli::try_parse_from(["speech-batch", "init-config", "custom.json", "--force"]).unwrap();
    match cli.command {
        Commands::InitConfig(args) => {
            assert!(args.force);
            assert_eq!(args.path, std::path::PathBuf::from("custom.json"));
        }
        Commands::Run(_) => panic!("expected init-config"),
    }
}
