//! Sound record distributor command line host.
//!
//! Runs one override batch against a registry snapshot and logs the
//! conflict ledger.
//!
//! Usage:
//!   srd --registry registry.json [--remap remap.json] [--data-dir Data]

use anyhow::{Context, Result};
use clap::Parser;
use srd_engine::{EngineConfig, Notifier, Pipeline};
use srd_model::{MemoryRegistry, RemapTable};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "srd")]
#[command(about = "Applies sound override documents to a form registry")]
struct Args {
    /// Path to the engine config file
    #[arg(short, long, default_value = "srd.toml")]
    config: PathBuf,

    /// Directory scanned for override documents, overriding the config
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Registry snapshot (JSON)
    #[arg(short, long)]
    registry: PathBuf,

    /// Remap table for merged plugins (JSON)
    #[arg(long)]
    remap: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Shows error diagnostics on stderr.
struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str) {
        eprintln!("{}", message);
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut config = EngineConfig::load_from(&args.config);
    if let Some(data_dir) = args.data_dir {
        config.data_dir = data_dir;
    }

    let mut registry = MemoryRegistry::load(&args.registry)
        .with_context(|| format!("failed to load registry snapshot {:?}", args.registry))?;
    let remap = args
        .remap
        .as_deref()
        .map(RemapTable::load)
        .transpose()
        .context("failed to load remap table")?;
    info!(
        "Loaded {} forms, {} remapped addresses",
        registry.len(),
        remap.as_ref().map_or(0, RemapTable::len)
    );

    let source = config.source();
    let mut pipeline = Pipeline::new(&mut registry)
        .with_notifier(&StderrNotifier)
        .configure(&config);
    if let Some(remap) = &remap {
        pipeline = pipeline.with_remapper(remap);
    }

    // A discovery failure has already been logged and notified.
    let Ok(report) = pipeline.run(&source) else {
        return Ok(ExitCode::FAILURE);
    };
    info!(
        "Applied {} of {} documents: {} errors, {} contested fields",
        report.applied(),
        report.documents.len(),
        report.error_count(),
        report.ledger.contested().count()
    );
    Ok(ExitCode::SUCCESS)
}

fn init_logging(verbose: bool) {
    let builder = FmtSubscriber::builder().with_target(false).compact();
    if std::env::var_os("RUST_LOG").is_some() {
        builder.with_env_filter(EnvFilter::from_default_env()).init();
    } else {
        let level = if verbose { Level::DEBUG } else { Level::INFO };
        builder.with_max_level(level).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_required() {
        assert!(Args::try_parse_from(["srd"]).is_err());
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["srd", "--registry", "registry.json"]).unwrap();
        assert_eq!(args.config, PathBuf::from("srd.toml"));
        assert_eq!(args.data_dir, None);
        assert_eq!(args.remap, None);
        assert!(!args.verbose);
    }

    #[test]
    fn overrides() {
        let args = Args::try_parse_from([
            "srd",
            "-r",
            "registry.json",
            "--remap",
            "remap.json",
            "--data-dir",
            "Overrides",
            "-v",
        ])
        .unwrap();
        assert_eq!(args.remap, Some(PathBuf::from("remap.json")));
        assert_eq!(args.data_dir, Some(PathBuf::from("Overrides")));
        assert!(args.verbose);
    }
}
