//! AdsReject CLI
//!
//! Fetches the configured ad-blocking lists and writes the hosts file and the
//! Clash rule list. Runs both generators when no subcommand is given.

mod cache;
mod config;
mod error;
mod fetcher;
mod generate;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;

use crate::config::Config;
use crate::error::AppError;
use crate::fetcher::Fetcher;
use crate::generate::{run_hosts, run_rules, RunReport};

#[derive(Parser)]
#[command(name = "ar-cli")]
#[command(about = "AdsReject ad-blocking list aggregator")]
struct Cli {
    /// TOML file overriding the built-in configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Build the hosts file
    Hosts,
    /// Build the Clash rule list
    Rules,
    /// Build both artifacts
    All,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = Config::load(cli.config.as_deref())?;
    let fetcher = Fetcher::new(&config.fetch)?;
    let command = cli.command.unwrap_or(Commands::All);

    if matches!(command, Commands::Hosts | Commands::All) {
        summarize("hosts", &run_hosts(&config, &fetcher).await);
    }
    if matches!(command, Commands::Rules | Commands::All) {
        summarize("rules", &run_rules(&config, &fetcher).await);
    }

    Ok(())
}

fn summarize(name: &str, report: &RunReport) {
    let status = if report.written { "written" } else { "not written" };
    info!(
        "[{}] {}/{} sources, {} lines, {} {}",
        name,
        report.fetched,
        report.sources,
        report.total_lines,
        report.output.display(),
        status
    );
}
