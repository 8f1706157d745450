//! Link, schedule and scheduler subcommand handlers.

use std::sync::Arc;

use anyhow::{Context, bail};
use tokio::sync::watch;
use tracing::{info, warn};

use datacat_config::{Config, DatabaseConfig};
use datacat_cron::{CronExpression, next_run_human};
use datacat_linkcheck::{HttpProbe, LinkCheckScheduler, LinkChecker, ProbeConfig};
use datacat_store::{CatalogStore, LinkStore, MemoryStore, NewLink, ScheduleStore, SqliteStore};

use crate::cli::{LinkAction, ScheduleAction};

/// Store handles shared by the subcommands.
pub(crate) struct Stores {
    pub catalog: Arc<dyn CatalogStore>,
    pub links: Arc<dyn LinkStore>,
    pub schedules: Arc<dyn ScheduleStore>,
}

impl Stores {
    pub(crate) async fn open(config: &DatabaseConfig) -> anyhow::Result<Self> {
        if config.in_memory {
            info!("Using in-memory store");
            let store = Arc::new(MemoryStore::new());
            return Ok(Self {
                catalog: store.clone(),
                links: store.clone(),
                schedules: store,
            });
        }

        let path = config.resolved_path();
        let store = Arc::new(
            SqliteStore::open(&path)
                .await
                .with_context(|| format!("Failed to open database {}", path.display()))?,
        );
        info!("Using database {}", path.display());
        Ok(Self {
            catalog: store.clone(),
            links: store.clone(),
            schedules: store,
        })
    }
}

fn build_checker(config: &Config, stores: &Stores) -> anyhow::Result<Arc<LinkChecker>> {
    let probe = HttpProbe::new(&ProbeConfig::from(&config.link_check))?;
    Ok(Arc::new(LinkChecker::new(stores.links.clone(), Arc::new(probe))))
}

/// Register the schedules listed in the configuration that are not stored yet.
pub(crate) async fn seed_schedules(config: &Config, stores: &Stores) -> anyhow::Result<usize> {
    let existing = stores.schedules.all_schedules().await?;
    let mut added = 0;

    for expression in &config.link_check.schedules {
        if existing.iter().any(|s| s.cron_expression == *expression) {
            continue;
        }
        if let Err(e) = CronExpression::parse(expression) {
            warn!("Ignoring configured schedule: {}", e);
            continue;
        }
        let id = stores.schedules.add_schedule(expression, true).await?;
        info!(id, expression = %expression, "Seeded link check schedule");
        added += 1;
    }

    Ok(added)
}

/// Run one link check over all active links.
pub(crate) async fn check_links(config: &Config, json: bool) -> anyhow::Result<()> {
    let stores = Stores::open(&config.database).await?;
    let checker = build_checker(config, &stores)?;
    let summary = checker.check_all().await?;

    if json {
        let value = serde_json::json!({
            "processed": summary.processed,
            "success": summary.success,
            "failed": summary.failed,
            "started_at": summary.started_at,
            "finished_at": summary.finished_at,
            "duration_ms": summary.duration().num_milliseconds(),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!(
            "Processed {} links: {} checked, {} failed ({} ms)",
            summary.processed,
            summary.success,
            summary.failed,
            summary.duration().num_milliseconds()
        );
    }
    Ok(())
}

/// Run the scheduler until Ctrl-C.
pub(crate) async fn run_scheduler(config: &Config) -> anyhow::Result<()> {
    let stores = Stores::open(&config.database).await?;
    seed_schedules(config, &stores).await?;

    let checker = build_checker(config, &stores)?;
    let scheduler = Arc::new(
        LinkCheckScheduler::new(stores.schedules.clone(), checker).with_horizon(config.cron.horizon()),
    );

    let (tx, rx) = watch::channel(false);
    let handle = tokio::spawn(scheduler.clone().run(rx));

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutdown signal received");

    let _ = tx.send(true);
    handle.await.context("Scheduler task failed")?;
    Ok(())
}

/// Handle link subcommands.
pub(crate) async fn handle_link_command(config: &Config, action: LinkAction) -> anyhow::Result<()> {
    let stores = Stores::open(&config.database).await?;

    match action {
        LinkAction::Add {
            url,
            name,
            description,
        } => {
            let mut link = NewLink::new(url, name);
            if let Some(description) = description {
                link = link.with_description(description);
            }
            let id = stores.links.add_link(link).await?;
            println!("Added link {}", id);
        }
        LinkAction::List { active, format } => {
            let links = if active {
                stores.links.active_links().await?
            } else {
                stores.links.all_links().await?
            };

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&links)?);
                return Ok(());
            }
            if links.is_empty() {
                println!("No links found.");
                return Ok(());
            }

            println!("{:<6} {:<8} {:<7} {:<24} {}", "ID", "ACTIVE", "STATUS", "NAME", "URL");
            println!("{}", "-".repeat(80));
            for link in links {
                let status = link
                    .status_code
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{:<6} {:<8} {:<7} {:<24} {}",
                    link.id,
                    link.is_active,
                    status,
                    link.link_name,
                    link.link.as_deref().unwrap_or("-")
                );
            }
        }
    }

    Ok(())
}

/// Handle schedule subcommands.
pub(crate) async fn handle_schedule_command(config: &Config, action: ScheduleAction) -> anyhow::Result<()> {
    let stores = Stores::open(&config.database).await?;

    match action {
        ScheduleAction::Add {
            expression,
            inactive,
        } => {
            let parsed = CronExpression::parse(&expression)?;
            let id = stores.schedules.add_schedule(parsed.source(), !inactive).await?;
            println!("Added schedule {} ({})", id, parsed);
        }
        ScheduleAction::List => {
            let schedules = stores.schedules.all_schedules().await?;
            if schedules.is_empty() {
                println!("No schedules found.");
                return Ok(());
            }

            println!("{:<6} {:<8} {:<22} {}", "ID", "ACTIVE", "NEXT RUN", "EXPRESSION");
            println!("{}", "-".repeat(80));
            for schedule in schedules {
                let next_run = next_run_human(&schedule.cron_expression, None)
                    .unwrap_or_else(|| "None".to_string());
                println!(
                    "{:<6} {:<8} {:<22} {}",
                    schedule.id, schedule.is_active, next_run, schedule.cron_expression
                );
            }
        }
        ScheduleAction::Enable { id } => {
            stores.schedules.set_schedule_active(id, true).await?;
            println!("Schedule {} enabled", id);
        }
        ScheduleAction::Disable { id } => {
            stores.schedules.set_schedule_active(id, false).await?;
            println!("Schedule {} disabled", id);
        }
    }

    Ok(())
}

/// Validate the configuration, printing every problem found.
pub(crate) fn validate_config(config: &Config) -> anyhow::Result<()> {
    let result = datacat_config::ConfigValidator::validate(config);
    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        println!("error: {}: {}", error.path, error.message);
    }
    if !result.is_valid() {
        bail!("Configuration has {} error(s)", result.errors.len());
    }
    println!("Configuration is valid");
    Ok(())
}
