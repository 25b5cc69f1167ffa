//! Seaport CLI entry point.
//!
//! This binary is the composition root. Responsibilities:
//!
//! 1. **Parse configuration**: read the optional TOML file, apply flags, and
//!    validate.
//! 2. **Wire observability**: install `tracing-subscriber` with the configured
//!    filter and format. Every span and event from `harbor` and `manifest`
//!    flows through it.
//! 3. **Load**: build and start the world from the description file.
//! 4. **Monitor**: log status summaries until every job has ended; Ctrl-C
//!    cancels every live job and waits for the cancellations to drain.
//! 5. **Report**: print the final world snapshot as JSON.

mod config;
mod monitor;
mod telemetry;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use harbor::WorldSnapshot;

use config::CliConfig;

/// Run a seaport world description and report what happened.
#[derive(Debug, Parser)]
#[command(name = "seaport", version)]
struct Args {
    /// World description file.
    file: PathBuf,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use the fast tick delay.
    #[arg(long)]
    fast: bool,

    /// Emit logs as JSON.
    #[arg(long)]
    json_logs: bool,

    /// Write the final snapshot here instead of stdout.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = CliConfig::load(args.config.as_deref())?;
    config.apply_flags(args.fast, args.json_logs);
    config.validate()?;
    telemetry::init(&config.logging)?;

    let loaded = manifest::load_file(&args.file, config.engine.clone())
        .await
        .with_context(|| format!("cannot load {}", args.file.display()))?;
    if !loaded.report.is_clean() {
        tracing::warn!(
            malformed = loaded.report.malformed,
            rejected = loaded.report.rejected,
            "world description had errors; the loaded world may be incomplete"
        );
    }

    monitor::run(&loaded.world, &config.monitor, interrupted()).await;
    write_report(&loaded.world.snapshot(), args.report.as_deref()).await
}

/// Resolves on Ctrl-C. If the handler cannot be installed the monitor
/// simply runs to completion.
async fn interrupted() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

async fn write_report(snapshot: &WorldSnapshot, path: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(snapshot).context("cannot serialize snapshot")?;
    match path {
        Some(path) => tokio::fs::write(path, format!("{json}\n"))
            .await
            .with_context(|| format!("cannot write report to {}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}
