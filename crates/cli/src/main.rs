//! Main entry point for the txtmon CLI
//!
//! Prompts for the file to monitor and the report log, prints the initial
//! content, then runs the monitor until `exit` is typed.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use dialoguer::Input;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use txtmon::{ensure_log_file, validate_monitored_path, Countdown, LogFileStatus};
use txtmon_core::config::Config;
use txtmon_monitor::{ConsoleSink, Monitor};

#[derive(Parser)]
#[command(name = "txtmon")]
#[command(about = "Watch a text file and log line-level changes")]
#[command(version)]
struct Cli {
    /// Text file to monitor (prompted for when omitted)
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Report log file, created if absent (prompted for when omitted)
    #[arg(short, long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose)?;

    print_banner();

    let file_path = prompt_monitored_path(cli.file)?;
    let log_path = prompt_log_path(cli.log)?;

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    debug!("Loaded configuration: {:?}", config);

    let initial_content = tokio::fs::read(&file_path)
        .await
        .with_context(|| format!("Failed to read {}", file_path.display()))?;
    println!("Initial file content:");
    println!("{}", String::from_utf8_lossy(&initial_content));

    let monitor = Monitor::initialize(
        file_path.clone(),
        log_path,
        &initial_content,
        config,
        Arc::new(ConsoleSink),
    )?;
    monitor.start_watching().await?;
    let report_task = monitor.start_reporting();

    let cancel = CancellationToken::new();
    let countdown_task = spawn_countdown(Arc::clone(&monitor), cancel.clone());

    println!("Type 'exit' to stop the application.");
    wait_for_exit().await?;

    info!("Shutting down");
    cancel.cancel();
    monitor.shutdown().await;
    if let Err(e) = report_task.await {
        warn!("Report task ended abnormally: {}", e);
    }
    if let Err(e) = countdown_task.await {
        warn!("Countdown task ended abnormally: {}", e);
    }

    Ok(())
}

/// Initialize logging system
///
/// Logs go to stderr so they never interleave with reports on stdout.
fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "txtmon={level},txtmon_core={level},txtmon_watcher={level},txtmon_monitor={level}"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {e}"))?;

    Ok(())
}

fn print_banner() {
    println!("Welcome to txtmon!");
    println!("Instructions:");
    println!("1. Enter the path of the .txt file to monitor when prompted.");
    println!("2. Enter the path for the report log file when prompted. If the file does not exist, it will be created.");
    println!("3. To stop the application, type 'exit' and press Enter.");
    println!();
}

/// Ask until the user names an existing `.txt` file
///
/// A path given on the command line is tried first.
fn prompt_monitored_path(initial: Option<PathBuf>) -> Result<PathBuf> {
    let mut candidate = initial;
    loop {
        let path = match candidate.take() {
            Some(path) => path,
            None => prompt_path("Please enter the path of the .txt file to monitor")?,
        };

        match validate_monitored_path(&path) {
            Ok(()) => return Ok(path),
            Err(e) => println!("{e}. Please try again."),
        }
    }
}

/// Ask for the log path and create the file if needed
///
/// Creation failures are reported but do not stop startup; each report
/// retries the append.
fn prompt_log_path(initial: Option<PathBuf>) -> Result<PathBuf> {
    let path = match initial {
        Some(path) => path,
        None => prompt_path("Please enter the path for the report log file")?,
    };

    match ensure_log_file(&path) {
        Ok(LogFileStatus::Created) => println!("Log file created at specified location."),
        Ok(LogFileStatus::Existing) => debug!("Appending to existing log {}", path.display()),
        Err(e) => println!("Error creating log file: {e:#}"),
    }

    Ok(path)
}

fn prompt_path(prompt: &str) -> Result<PathBuf> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .interact_text()
        .map_err(|e| anyhow!("Failed to read input: {e}"))?;
    Ok(PathBuf::from(input.trim()))
}

/// Print the seconds left until the next report, once per second
fn spawn_countdown(monitor: Arc<Monitor>, cancel: CancellationToken) -> JoinHandle<()> {
    let mut countdown = Countdown::new(monitor.report_interval());

    tokio::spawn(async move {
        let mut ticker = interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let tick = countdown.tick(monitor.has_pending_changes());
                    if let Some(message) = tick.message() {
                        println!("{message}");
                    }
                }
            }
        }
    })
}

/// Block until `exit` is typed or stdin closes
async fn wait_for_exit() -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("Failed to read from stdin")?
    {
        if is_exit_command(&line) {
            return Ok(());
        }
    }
    debug!("stdin closed");
    Ok(())
}

fn is_exit_command(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("exit")
}
