mod cli;
mod config;
mod loader;
mod output;
mod wiring;

use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::{ConfigError, ResolvedConfig};
use crate::loader::{CommentLoader, StopReason};
use crate::output::OutputWriteError;
use crate::wiring::WiringError;
use steamscrape_infra::steam::{SteamClientError, SteamPageParser};

const EXIT_UNEXPECTED: u8 = 1;
const EXIT_REQUEST_FAILED: u8 = 2;
const EXIT_PAGINATION_DEPTH: u8 = 3;
const EXIT_CONFIG: u8 = 4;
const EXIT_INVALID_CLI: u8 = 5;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid cli: {0}")]
    InvalidCli(String),
    #[error("wiring error: {0}")]
    Wiring(#[from] WiringError),
    #[error("{0}")]
    Steam(#[from] SteamClientError),
    #[error("output error: {0}")]
    Output(#[from] OutputWriteError),
    #[error("task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) => EXIT_CONFIG,
            AppError::InvalidCli(_) => EXIT_INVALID_CLI,
            AppError::Steam(SteamClientError::MaxPaginationDepthExceeded { .. }) => {
                EXIT_PAGINATION_DEPTH
            }
            AppError::Steam(SteamClientError::RequestFailed { .. }) => EXIT_REQUEST_FAILED,
            AppError::Wiring(_) | AppError::Output(_) | AppError::Join(_) => EXIT_UNEXPECTED,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let printed = err.print().is_ok();
            return ExitCode::from(cli_error_exit_code(err.kind(), printed));
        }
    };

    let outcome = match tokio::spawn(run(cli)).await {
        Ok(outcome) => outcome,
        Err(err) => Err(AppError::Join(err)),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "steamscrape failed");
            ExitCode::from(err.exit_code())
        }
    }
}

/// Help and version requests succeed, unless stdout/stderr could not be written.
fn cli_error_exit_code(kind: ErrorKind, printed: bool) -> u8 {
    if !printed {
        return EXIT_UNEXPECTED;
    }
    match kind {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => 0,
        _ => EXIT_INVALID_CLI,
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    cli.check_conflicts().map_err(AppError::InvalidCli)?;

    let config = config::resolve(&cli.config, cli.overrides())?;
    print_config(&config);
    warn_missing_credentials(&config);

    let client = wiring::build_client(&config)?;
    let mut loader = CommentLoader::new(client, SteamPageParser, &config);
    info!(
        url = config.steam_url(),
        max_pages = config.max_pagination_depth(),
        delay_ms = config.request_delay_ms(),
        dry_run = config.dry_run(),
        "scrape starting"
    );
    let loaded = loader.load_all().await?;
    match loaded.stop {
        StopReason::DepthReached => warn!(
            max_pages = config.max_pagination_depth(),
            "max pagination depth reached, not all comments might have loaded"
        ),
        StopReason::EndOfData => {}
        StopReason::NoContent => info!("dry run produced no page content"),
    }
    info!(
        pages = loaded.pages_fetched,
        comments = loaded.result.comments.len(),
        summary = %loaded.result.summary(),
        "scrape complete"
    );

    output::write_result(&loaded.result, config.output_format(), config.output_file())?;
    Ok(())
}

fn print_config(config: &ResolvedConfig) {
    let Some(view) = config.view() else {
        return;
    };
    match serde_json::to_string_pretty(&view) {
        Ok(json) => info!(mode = %config.print_config_mode(), config = %json, "resolved config"),
        Err(err) => warn!(error = %err, "resolved config serialize failed"),
    }
}

fn warn_missing_credentials(config: &ResolvedConfig) {
    let missing = config.missing_credentials();
    for key in &missing {
        warn!(key, "missing or empty cookie key");
    }
    if !missing.is_empty() {
        warn!("without a valid session some profile data cannot be retrieved");
    }
}
