//! CLI definitions for datacat.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// datacat CLI.
#[derive(Parser)]
#[command(name = "datacat")]
#[command(about = "Data catalog toolkit: cron schedules, record hashes and link checks")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/datacat.toml", global = true, env = "DATACAT_CONFIG")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Show the next run times of a cron expression
    Next {
        /// Cron expression with 5, 6 or 7 fields
        expression: String,

        /// Reference time (YYYY-MM-DDTHH:MM:SS), defaults to now
        #[arg(long)]
        from: Option<String>,

        /// Number of run times to show
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },

    /// Compute the hash address of a list of field values
    Hash {
        /// Field values in key order; an empty string stands for a missing value
        fields: Vec<String>,
    },

    /// Check all active links once
    CheckLinks {
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the link check scheduler in the foreground
    Run,

    /// Validate the configuration file
    Validate,

    /// Link management commands
    Links {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Link check schedule commands
    Schedules {
        #[command(subcommand)]
        action: ScheduleAction,
    },

    /// Catalog record commands
    Records {
        #[command(subcommand)]
        action: RecordAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum LinkAction {
    /// Add a link
    Add {
        /// URL to check
        url: String,

        /// Display name
        name: String,

        /// Optional description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// List links
    List {
        /// Only show active links
        #[arg(long)]
        active: bool,

        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[derive(Subcommand)]
pub(crate) enum ScheduleAction {
    /// Add a schedule
    Add {
        /// Cron expression with 5, 6 or 7 fields
        expression: String,

        /// Store the schedule disabled
        #[arg(long)]
        inactive: bool,
    },

    /// List schedules with their next run
    List,

    /// Enable a schedule
    Enable { id: i64 },

    /// Disable a schedule
    Disable { id: i64 },
}

#[derive(Subcommand)]
pub(crate) enum RecordAction {
    /// Create or update a record from a JSON object
    Upsert {
        /// Record fields as JSON, keyed by column name
        json: String,
    },

    /// Show a record by hash address
    Get { hash: String },

    /// List active records
    List,

    /// Mark a record inactive
    Deactivate { hash: String },
}
