/*============================================================
  Synavera Project: Syn-Gather
  Module: syngather_core::main
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Entry point for Syn-Gather Core. Resolves the before and
    after builds, stages them into a private workspace, and
    emits a staging report for downstream inspections.

  Security / Safety Notes:
    Operates within user privileges. Executes the rpm query
    binary and performs HTTPS GET requests only.

  Dependencies:
    clap for CLI parsing, chrono for timestamps.

  Operational Scope:
    Invoked by the Syn-Gather inspection layer or when operators
    require standalone build staging.

  Revision History:
    2025-06-17 COD  Authored Syn-Gather Core runtime.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Result-first error handling with deterministic exits
    - Structured logging following Synavera cadence
    - Configurable execution via CLI and config file
============================================================*/

mod build_info;
mod config;
mod error;
mod fetch;
mod future;
mod gather;
mod header;
mod koji;
mod locator;
mod logger;
mod peers;
mod report;
mod sync;
mod workspace;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::{ArgAction, Parser};

use build_info::{BuildSide, ResolvedBuild};
use config::SyngatherConfig;
use error::{Result, SyngatherError};
use gather::Gatherer;
use header::RpmQuery;
use koji::{BuildService, KojiClient};
use locator::resolve;
use logger::Logger;
use report::{build_report, write_report, StagingReport};

/// Command-line arguments for Syn-Gather-Core.
#[derive(Debug, Parser)]
#[command(
    name = "Syn-Gather-Core",
    version,
    author = "Synavera Systems",
    about = "Build acquisition and peer staging for Syn-Gather"
)]
struct Cli {
    /// Override configuration file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Override the staging root directory.
    #[arg(long, value_name = "PATH")]
    workdir: Option<PathBuf>,
    /// Write the staging report to this path.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
    /// Explicit log file path.
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,
    /// Resolve both builds and print the plan without staging anything.
    #[arg(long, action = ArgAction::SetTrue)]
    dry_run: bool,
    /// Enable verbose logging to stderr.
    #[arg(long, action = ArgAction::SetTrue)]
    verbose: bool,
    /// Build under inspection (the after side).
    #[arg(value_name = "AFTER_BUILD")]
    after: String,
    /// Baseline build to compare against (the before side).
    #[arg(value_name = "BEFORE_BUILD")]
    before: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("[Syn-Gather-Core] {}", err);
            err.exit_code()
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = SyngatherConfig::load_from_optional_path(cli.config.as_deref())?;
    if let Some(workdir) = cli.workdir.clone() {
        config.workdir = workdir;
    }

    let session_stamp = Utc::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    let log_path = cli
        .log
        .clone()
        .or_else(|| Some(config.log_dir().join(format!("gather_{session_stamp}.log"))));
    let logger = Logger::new(log_path, cli.verbose)?;
    logger.info("INIT", "Syn-Gather Core awakening.");

    let service = KojiClient::new(&config.koji)?;

    if cli.dry_run {
        if cli.report.is_some() {
            logger.warn("PLAN", "Report path is ignored for dry runs");
        }
        print_plan(&cli, &service).await?;
        logger.info("COMPLETE", "Dry run finished; nothing staged.");
        logger.finalize()?;
        return Ok(ExitCode::SUCCESS);
    }

    let reader = RpmQuery::new();
    let mut gatherer = Gatherer::new(&config, &service, &reader, &logger)?;
    gatherer.gather(&cli.after, cli.before.as_deref()).await?;

    let subdir = gatherer
        .workspace
        .subdir()
        .ok_or_else(|| SyngatherError::Runtime("Acquisition finished without a workspace".into()))?
        .to_path_buf();

    let document = build_report(&cli.after, cli.before.as_deref(), &subdir, &gatherer.peers);
    let report_path = cli
        .report
        .clone()
        .unwrap_or_else(|| subdir.join("staging-report.json"));
    write_report(&document, &report_path)?;
    logger.info(
        "REPORT",
        format!("Staging report written to {}", report_path.display()),
    );

    print_summary(&document);
    logger.info("COMPLETE", "Builds staged and indexed.");
    logger.finalize()?;

    Ok(ExitCode::SUCCESS)
}

async fn print_plan<S: BuildService>(cli: &Cli, service: &S) -> Result<()> {
    let sides = [
        (BuildSide::After, Some(cli.after.as_str())),
        (BuildSide::Before, cli.before.as_deref()),
    ];

    for (side, reference) in sides {
        let Some(reference) = reference else {
            continue;
        };
        let resolved = resolve(reference, service)
            .await?
            .ok_or_else(|| SyngatherError::Resolution {
                side,
                reference: reference.to_string(),
            })?;
        match resolved {
            ResolvedBuild::Local { root } => {
                println!("→ {side} build `{reference}`: local tree at {}", root.display());
            }
            ResolvedBuild::Remote(build) => {
                println!(
                    "→ {side} build `{reference}`: remote {} ({} artifacts, volume {})",
                    build.label(),
                    build.artifacts.len(),
                    build.volume_name
                );
            }
        }
    }

    Ok(())
}

fn print_summary(document: &StagingReport) {
    println!(
        "→ Staged after={} before={} under {}",
        document.metadata.packages_after,
        document.metadata.packages_before,
        document.metadata.workspace
    );
}
