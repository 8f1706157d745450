//! Cron and hash subcommand handlers.

use anyhow::{Context, bail};
use chrono::{Local, NaiveDate, NaiveDateTime};

use datacat_cron::{CronExpression, SearchHorizon, schedule_human};
use datacat_store::hash_address;

const REFERENCE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Parse a `--from` value; a bare date means midnight.
pub(crate) fn parse_reference(value: &str) -> anyhow::Result<NaiveDateTime> {
    let value = value.trim();
    for format in REFERENCE_FORMATS {
        if let Ok(instant) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(instant);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight);
        }
    }
    bail!("Invalid reference time '{}', expected YYYY-MM-DDTHH:MM:SS", value)
}

/// Print the next `count` run times of `expression`.
pub(crate) fn cron_next(
    expression: &str,
    from: Option<&str>,
    count: usize,
    horizon: SearchHorizon,
) -> anyhow::Result<()> {
    let expression = CronExpression::parse(expression)?;
    let reference = match from {
        Some(value) => parse_reference(value)?,
        None => Local::now().naive_local(),
    };

    let runs = expression
        .upcoming(reference, count, horizon)
        .with_context(|| format!("Failed to evaluate '{}'", expression.source()))?;

    println!("Expression: {}", expression);
    println!("From:       {}", schedule_human(reference));
    for run in runs {
        println!("{}", schedule_human(run));
    }
    Ok(())
}

/// Print the hash address of `fields`.
pub(crate) fn hash_fields(fields: &[String]) {
    let values: Vec<Option<&str>> = fields
        .iter()
        .map(|f| Some(f.as_str()).filter(|v| !v.is_empty()))
        .collect();
    println!("{}", hash_address(&values));
}
