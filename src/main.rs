mod declaration;
mod locator;
mod overrides;
mod report;
mod runner;
mod tools;
mod utils;
mod version;

use anyhow::Context;
use clap::Parser;
use locator::DirectoryLocator;
use report::TracingSink;
use runner::run_checks;
use std::path::PathBuf;
use tools::SystemTools;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Driftwatch - tracks customized copies of vendored package files and
/// reconciles upstream drift via three-way merge
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Comma-separated list of packages to check. When omitted, every
    /// installed package declaring overrides is checked.
    #[arg(short, long, env = "DRIFTWATCH_PACKAGES", value_delimiter = ',')]
    packages: Vec<String>,

    /// Root directory the packages are installed under
    #[arg(short = 'r', long, env = "DRIFTWATCH_INSTALL_ROOT")]
    install_root: PathBuf,

    /// Root directory historical package versions are archived under
    #[arg(short = 'e', long, env = "DRIFTWATCH_ARCHIVE_ROOT")]
    archive_root: PathBuf,

    /// Write merge results (even with conflicts) back to the overridden
    /// files
    #[arg(short, long)]
    merge: bool,

    /// Show diff output and skipped packages (debug logging)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")?;

    anyhow::ensure!(
        args.install_root.is_dir(),
        "install root {} is not a directory",
        args.install_root.display()
    );
    anyhow::ensure!(
        args.archive_root.is_dir(),
        "archive root {} is not a directory",
        args.archive_root.display()
    );

    let packages: Vec<String> = args
        .packages
        .iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();

    let locator = DirectoryLocator::new(&args.install_root, &args.archive_root);
    let tools = SystemTools::new();
    let sink = TracingSink;

    info!(
        "Starting driftwatch {} (install root: {}, archive root: {})",
        utils::DRIFTWATCH_VERSION,
        args.install_root.display(),
        args.archive_root.display()
    );

    let report = run_checks(&locator, &tools, &sink, &packages, args.merge).await;

    info!(
        checked = report.outcomes.len(),
        skipped = report.skipped.len(),
        all_ok = report.all_ok,
        "Run finished ({} .. {})",
        report.started_at,
        report.finished_at
    );

    std::process::exit(if report.all_ok { 0 } else { 1 });
}
