//! Configuration schema definitions.

use std::path::PathBuf;
use std::time::Duration;

use datacat_cron::SearchHorizon;
use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub link_check: LinkCheckConfig,

    #[serde(default)]
    pub cron: CronConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Catalog database configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite file path. `~` is expanded.
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Use a throwaway in-memory database instead of `path`.
    #[serde(default)]
    pub in_memory: bool,
}

impl DatabaseConfig {
    /// Database path with `~` expanded.
    pub fn resolved_path(&self) -> PathBuf {
        PathBuf::from(crate::ConfigLoader::expand_path(&self.path))
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            in_memory: false,
        }
    }
}

fn default_database_path() -> String {
    "~/.datacat/datacat.db".to_string()
}

/// Link check job configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkCheckConfig {
    /// Per-request timeout.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Accept invalid TLS certificates (internal hosts often use self-signed ones).
    #[serde(default = "default_true")]
    pub accept_invalid_certs: bool,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Cron expressions registered as active schedules on startup.
    #[serde(default)]
    pub schedules: Vec<String>,
}

impl LinkCheckConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for LinkCheckConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            accept_invalid_certs: default_true(),
            user_agent: default_user_agent(),
            schedules: Vec::new(),
        }
    }
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_true() -> bool {
    true
}

/// Cron evaluation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CronConfig {
    /// Maximum search iterations before an expression is deemed unsatisfiable.
    #[serde(default = "default_horizon_iterations")]
    pub horizon_iterations: u64,
}

impl CronConfig {
    pub fn horizon(&self) -> SearchHorizon {
        SearchHorizon::iterations(self.horizon_iterations)
    }
}

impl Default for CronConfig {
    fn default() -> Self {
        Self {
            horizon_iterations: default_horizon_iterations(),
        }
    }
}

fn default_horizon_iterations() -> u64 {
    SearchHorizon::FIVE_YEARS.get()
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for rolling log files. `None` means `~/.datacat/logs`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,

    /// Number of daily log files to keep.
    #[serde(default = "default_max_files")]
    pub max_files: usize,

    /// Emit JSON lines to the log file instead of plain text.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    /// Log directory with `~` expanded.
    pub fn resolved_dir(&self) -> PathBuf {
        match &self.dir {
            Some(dir) => PathBuf::from(crate::ConfigLoader::expand_path(dir)),
            None => dirs::home_dir()
                .map(|h| h.join(".datacat").join("logs"))
                .unwrap_or_else(|| PathBuf::from(".datacat/logs")),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: None,
            max_files: default_max_files(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_files() -> usize {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.database.path, "~/.datacat/datacat.db");
        assert!(!config.database.in_memory);
        assert_eq!(config.link_check.timeout(), Duration::from_secs(10));
        assert!(config.link_check.accept_invalid_certs);
        assert_eq!(config.link_check.user_agent, "Mozilla/5.0");
        assert!(config.link_check.schedules.is_empty());
        assert_eq!(config.cron.horizon(), SearchHorizon::FIVE_YEARS);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.max_files, 30);
    }

    #[test]
    fn test_resolved_paths_expand_tilde() {
        let config = Config::default();
        assert!(!config.database.resolved_path().starts_with("~"));
        assert!(config.logging.resolved_dir().ends_with("logs"));
    }

    #[test]
    fn test_serialize_roundtrip_keeps_schedules() {
        let mut config = Config::default();
        config.link_check.schedules.push("0 0 3 * * * *".to_string());

        let text = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.link_check.schedules, vec!["0 0 3 * * * *"]);
    }
}
