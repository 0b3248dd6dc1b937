mod commands;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use seq_to_tree::cli::{self, Commands};
use seq_to_tree::config::Config;

fn init_logging(verbose: u8) {
    let log_level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn load_config(path: Option<&PathBuf>, work_dir: Option<PathBuf>) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load(),
    };
    if let Some(work_dir) = work_dir {
        config.work_dir = work_dir;
    }
    log::debug!("Using config: {:?}", config);
    Ok(config)
}

fn dispatch(args: cli::Args) -> Result<()> {
    let config_path = args.config.as_ref();

    match args.command {
        Commands::Run {
            unaligned_seqs,
            output_dir,
            alignment_mode,
            trimming_mode,
            gap_threshold,
            ufboot_reps,
            output_prefix,
            work_dir,
        } => {
            let config = load_config(config_path, work_dir)?;
            commands::run::run(
                commands::run::RunArgs {
                    unaligned_seqs,
                    output_dir,
                    alignment_mode,
                    trimming_mode,
                    gap_threshold,
                    ufboot_reps,
                    output_prefix,
                },
                &config,
            )
        }
        Commands::Align {
            unaligned_seqs,
            alignment_mode,
            output_prefix,
            work_dir,
        } => {
            let config = load_config(config_path, work_dir)?;
            commands::stage::align(&unaligned_seqs, alignment_mode, &output_prefix, &config)
        }
        Commands::Trim {
            alignment,
            trimming_mode,
            gap_threshold,
            output_prefix,
            work_dir,
        } => {
            let config = load_config(config_path, work_dir)?;
            commands::stage::trim(
                &alignment,
                trimming_mode,
                gap_threshold,
                &output_prefix,
                &config,
            )
        }
        Commands::Infer {
            trimmed_alignment,
            output_dir,
            ufboot_reps,
            output_prefix,
            work_dir,
        } => {
            let config = load_config(config_path, work_dir)?;
            commands::stage::infer(
                &trimmed_alignment,
                &output_dir,
                ufboot_reps,
                &output_prefix,
                &config,
            )
        }
        Commands::CheckTools => {
            let config = load_config(config_path, None)?;
            commands::check_tools::run(&config)
        }
        Commands::InitConfig { force } => commands::init_config::run(force),
    }
}

fn main() {
    let args = cli::Args::parse();
    init_logging(args.verbose);

    if let Err(e) = dispatch(args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
