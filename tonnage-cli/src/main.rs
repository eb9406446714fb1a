//! Command line tool reporting DSNY tonnage for a NYC community district and caching the results.
#![allow(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "reports and argument errors are written to the terminal"
)]

mod cli;
mod settings;

use std::{env, process::ExitCode, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use reqwest::Client;
use secrecy::ExposeSecret;
use tonnage_core::{MAX_DISTRICT, report_single, report_total, service::TonnageService, validate};
use tonnage_provider_socrata::SocrataTonnagePort;
use tonnage_store::JsonFileStore;

use crate::cli::Cli;
use crate::settings::get_settings;

/// Exit status for arguments that failed validation.
const EXIT_INVALID_ARGUMENTS: u8 = 2;

/// How an invocation ended when nothing fatal happened.
enum Outcome {
    Reported,
    InvalidArguments,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse_from(cli::normalize_args(env::args_os()));
    init_logging(cli.log_level.as_deref());
    debug!("CLI Arguments provided: {cli:?}");

    match run(&cli).await {
        Ok(Outcome::Reported) => ExitCode::SUCCESS,
        Ok(Outcome::InvalidArguments) => ExitCode::from(EXIT_INVALID_ARGUMENTS),
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(level: Option<&str>) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder.parse_filters(level);
    }
    builder.init();
}

async fn run(cli: &Cli) -> Result<Outcome> {
    let settings = get_settings(cli.config.as_deref()).context("Failed to read settings")?;

    // HTTP + service setup
    let client = Client::builder()
        .user_agent(concat!("tonnage/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(settings.socrata.timeout_secs))
        .build()?;
    let remote = Arc::new(SocrataTonnagePort::new(
        client,
        &settings.socrata.domain,
        &settings.socrata.dataset,
        settings
            .socrata
            .app_token
            .as_ref()
            .map(|token| token.expose_secret().clone()),
    ));

    let store_path = cli.store.clone().unwrap_or(settings.store.path);
    info!("using store {}", store_path.display());
    let store = Arc::new(JsonFileStore::new(store_path));

    let service = TonnageService::new(remote, store);
    service
        .ensure_schema()
        .context("Failed to initialize the local store")?;

    if cli.get_total {
        let records = service.records().context("Failed to read the local store")?;
        println!("{}", report_total(records));
        return Ok(Outcome::Reported);
    }

    let filter = match validate(
        cli.borough.as_deref(),
        cli.garbage_type.as_deref(),
        cli.district.as_deref(),
    ) {
        Ok(filter) => filter,
        Err(invalid) => {
            for message in &invalid.messages {
                eprintln!("Error: {message}");
            }
            return Ok(Outcome::InvalidArguments);
        }
    };
    info!("Argument validation successful, querying API");
    if !filter.district.is_in_range() {
        warn!(
            "district {} is outside 01-{MAX_DISTRICT}; the query will likely be empty",
            filter.district
        );
    }

    let record = service.lookup(&filter).await.with_context(|| {
        format!(
            "Failed to look up {} district {}",
            filter.borough, filter.district
        )
    })?;
    println!("{}", report_single(&filter, record.as_ref()));

    Ok(Outcome::Reported)
}
