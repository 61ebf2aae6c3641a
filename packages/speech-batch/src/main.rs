use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use speech_batch::cli::{Cli, Commands, InitConfigArgs, RunArgs};
use speech_batch::runtime;
use speech_batch::{
    BatchConfig, CancelFlag, ConsoleReporter, ExitStatus, GeneratorBackend, SyntheticLoader,
    WavWriter, convert_batch,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = speech_batch::logging::init_tracing(cli.verbosity()) {
        eprintln!("Error: {e:#}");
        return ExitStatus::Unexpected.into();
    }

    let status = match cli.command {
        Commands::Run(args) => match runtime::build_runtime() {
            Ok(rt) => {
                let status = rt.block_on(run(args));
                runtime::shutdown(rt);
                status
            }
            Err(e) => {
                eprintln!("Error: failed to start async runtime: {e}");
                ExitStatus::Unexpected
            }
        },
        Commands::InitConfig(args) => match init_config(&args) {
            Ok(()) => ExitStatus::Success,
            Err(e) => {
                eprintln!("Error: {e:#}");
                ExitStatus::Unexpected
            }
        },
    };
    status.into()
}

async fn run(args: RunArgs) -> ExitStatus {
    let config = match args.resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            eprintln!("Error: {e}");
            return ExitStatus::Configuration;
        }
    };

    let cancel = CancelFlag::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, finishing in-flight texts");
            on_interrupt.cancel();
        }
    });

    let loader = match config.generator.backend {
        GeneratorBackend::Synthetic => SyntheticLoader::from_config(&config),
    };
    let mut reporter = ConsoleReporter::new(config.speaker_id).with_progress_bar(!args.no_progress);

    match convert_batch(&config, loader, WavWriter::new(), &cancel, &mut reporter).await {
        Ok(summary) => ExitStatus::from_summary(&summary),
        Err(e) => {
            tracing::error!(error = %e, "batch aborted");
            eprintln!("Error: {e}");
            ExitStatus::from_error(&e)
        }
    }
}

fn init_config(args: &InitConfigArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", args.path.display());
    }
    BatchConfig::sample()
        .save(&args.path)
        .with_context(|| format!("failed to write sample config to {}", args.path.display()))?;
    println!("Wrote sample configuration to {}", args.path.display());
    Ok(())
}
