//! Catalog record subcommand handlers.

use anyhow::Context;

use datacat_config::Config;
use datacat_store::{TotalData, UpsertOutcome};

use crate::cli::RecordAction;
use crate::cmd_links::Stores;

/// Parse one `total_data` row from JSON and upsert it.
pub(crate) async fn upsert_record_json(stores: &Stores, json: &str) -> anyhow::Result<UpsertOutcome> {
    let record: TotalData = serde_json::from_str(json).context("Invalid record JSON")?;
    let outcome = stores.catalog.upsert(record).await?;
    Ok(outcome)
}

/// Handle record subcommands.
pub(crate) async fn handle_record_command(config: &Config, action: RecordAction) -> anyhow::Result<()> {
    let stores = Stores::open(&config.database).await?;

    match action {
        RecordAction::Upsert { json } => {
            let outcome = upsert_record_json(&stores, &json).await?;
            let verb = if outcome.created { "Created" } else { "Updated" };
            println!("{} record {}", verb, outcome.hash_address);
        }
        RecordAction::Get { hash } => match stores.catalog.get(&hash).await? {
            Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            None => println!("Record {} not found", hash),
        },
        RecordAction::List => {
            let records = stores.catalog.list_active().await?;
            if records.is_empty() {
                println!("No active records found.");
                return Ok(());
            }
            println!("{:<64} {:<16} {:<24} {}", "HASH", "SCHEMA", "TABLE", "COLUMN");
            println!("{}", "-".repeat(120));
            for record in records {
                let data = &record.data;
                println!(
                    "{:<64} {:<16} {:<24} {}",
                    record.hash_address,
                    data.table_schema.as_deref().unwrap_or("-"),
                    data.table_name.as_deref().unwrap_or("-"),
                    data.column_name.as_deref().unwrap_or("-")
                );
            }
        }
        RecordAction::Deactivate { hash } => {
            stores.catalog.deactivate(&hash).await?;
            println!("Record {} deactivated", hash);
        }
    }

    Ok(())
}
