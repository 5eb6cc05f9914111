//! vaultboy
//!
//! Merges .env and YAML files into flat Vault-style JSON, or expands flat
//! JSON back into .env or YAML.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;
use vaultboy::cli::{Cli, LogTarget, normalize_args};
use vaultboy::config::{ConfigLoader, ConfigPaths};
use vaultboy::convert::{self, RenderOptions, Report};

fn main() {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    if let Err(err) = init_logging(&cli) {
        eprintln!("error: failed to initialize logging: {err:#}");
        std::process::exit(1);
    }

    match run(&cli) {
        Ok(report) => {
            println!("Done! Output written to {}", report.output.display());
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}

/// Initialize logging based on --log and --verbose.
fn init_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    match &cli.log {
        LogTarget::Off => {
            // No logging
        }
        LogTarget::Stdout => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogTarget::Stderr => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        LogTarget::File(path) => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<Report> {
    let mut paths = ConfigPaths::discover();
    if let Some(config_path) = &cli.config {
        paths = paths.with_explicit(config_path);
    }
    let loader = ConfigLoader::load_with_paths(paths).context("failed to load configuration")?;
    for (tier, path) in loader.sources() {
        debug!(tier = %tier, path = %path.display(), "Using config file");
    }
    let config = loader.into_config();

    let request = cli.request(config.output.clone());
    let report = convert::run(&request, RenderOptions::from(&config))?;
    debug!(
        format = %report.format,
        entries = report.entries,
        "Conversion finished"
    );
    Ok(report)
}
