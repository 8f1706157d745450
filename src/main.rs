//! datacat - data catalog toolkit
//!
//! Main entry point for the datacat CLI and link check scheduler.

mod cli;
mod cmd_cron;
mod cmd_links;
mod cmd_records;

use std::sync::OnceLock;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use datacat_config::{Config, ConfigLoader, ConfigValidator, LoggingConfig};

use crate::cli::{Cli, Commands};

static GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Console output plus daily-rolling log files.
fn init_tracing(logging: &LoggingConfig) -> anyhow::Result<()> {
    let log_dir = logging.resolved_dir();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("datacat")
        .filename_suffix("log")
        .max_log_files(logging.max_files.max(1))
        .build(&log_dir)
        .context("Failed to create log file appender")?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = GUARD.set(guard);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let file_layer = if logging.json {
        fmt::layer().json().with_writer(non_blocking).boxed()
    } else {
        fmt::layer().with_writer(non_blocking).with_ansi(false).boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true).with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    ConfigLoader::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(&config.logging)?;
    debug!("Configuration loaded from {}", cli.config.display());

    if let Commands::Validate = cli.command {
        return cmd_links::validate_config(&config);
    }

    let warnings = ConfigValidator::validate(&config).into_result()?;
    for warning in warnings {
        warn!("Configuration warning at {}: {}", warning.path, warning.message);
    }

    match cli.command {
        Commands::Next {
            expression,
            from,
            count,
        } => cmd_cron::cron_next(&expression, from.as_deref(), count, config.cron.horizon()),
        Commands::Hash { fields } => {
            cmd_cron::hash_fields(&fields);
            Ok(())
        }
        Commands::CheckLinks { json } => cmd_links::check_links(&config, json).await,
        Commands::Run => cmd_links::run_scheduler(&config).await,
        Commands::Validate => cmd_links::validate_config(&config),
        Commands::Links { action } => cmd_links::handle_link_command(&config, action).await,
        Commands::Schedules { action } => cmd_links::handle_schedule_command(&config, action).await,
        Commands::Records { action } => cmd_records::handle_record_command(&config, action).await,
    }
}
