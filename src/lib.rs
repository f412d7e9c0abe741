pub mod cli;
pub mod core;
pub mod providers;

use crate::cli::allocate::{AllocateOptions, AllocationReport};
use anyhow::Result;
use tracing::debug;

pub enum AppCommand {
    Allocate(AllocateOptions),
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    run_command_with_report(command, config_path).await.map(|_| ())
}

/// Runs `command`, returning the allocation report for inspection.
pub async fn run_command_with_report(
    command: AppCommand,
    config_path: Option<&str>,
) -> Result<AllocationReport> {
    let config = match config_path {
        Some(path) => core::config::AppConfig::load_from_path(path)?,
        None => core::config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = providers::YahooHistoryProvider::new(config.yahoo_base_url());
    let today = chrono::Local::now().date_naive();

    match command {
        AppCommand::Allocate(options) => {
            cli::allocate::run(&config, options, &provider, today).await
        }
    }
}
