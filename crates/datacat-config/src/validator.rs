//! Configuration validation.

use std::fmt;

use datacat_cron::CronExpression;

use crate::error::ConfigError;
use crate::schema::Config;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Longest link check timeout accepted without a warning.
const MAX_QUIET_TIMEOUT_SECONDS: u64 = 120;

/// A problem found at a dotted config path such as `link_check.schedules[0]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

pub type ValidationError = ValidationIssue;
pub type ValidationWarning = ValidationIssue;

/// Errors block startup, warnings are only logged.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationIssue {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationIssue {
            path: path.into(),
            message: message.into(),
        });
    }

    /// Turn the first error into a [`ConfigError::InvalidValue`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// Checks a loaded [`Config`] for values the binary cannot work with.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Run every check, collecting all problems instead of stopping at the first.
    pub fn validate(config: &Config) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_database(config, &mut result);
        Self::validate_link_check(config, &mut result);
        Self::validate_cron(config, &mut result);
        Self::validate_logging(config, &mut result);

        result
    }

    fn validate_database(config: &Config, result: &mut ValidationResult) {
        if !config.database.in_memory && config.database.path.trim().is_empty() {
            result.error(
                "database.path",
                "Database path cannot be empty unless in_memory is set",
            );
        }
    }

    fn validate_link_check(config: &Config, result: &mut ValidationResult) {
        let link_check = &config.link_check;

        if link_check.timeout_seconds == 0 {
            result.error(
                "link_check.timeout_seconds",
                "timeout_seconds must be greater than 0",
            );
        }

        if link_check.timeout_seconds > MAX_QUIET_TIMEOUT_SECONDS {
            result.warn(
                "link_check.timeout_seconds",
                format!(
                    "timeout_seconds is above {}, a full check may take a long time",
                    MAX_QUIET_TIMEOUT_SECONDS
                ),
            );
        }

        if link_check.user_agent.is_empty() {
            result.warn(
                "link_check.user_agent",
                "Empty user agent, some hosts reject such requests",
            );
        }

        for (index, schedule) in link_check.schedules.iter().enumerate() {
            if let Err(e) = CronExpression::parse(schedule) {
                result.error(
                    format!("link_check.schedules[{}]", index),
                    e.to_string(),
                );
            }
        }
    }

    fn validate_cron(config: &Config, result: &mut ValidationResult) {
        if config.cron.horizon_iterations == 0 {
            result.error(
                "cron.horizon_iterations",
                "horizon_iterations must be greater than 0",
            );
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let level = config.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            result.warn(
                "logging.level",
                format!(
                    "Unknown log level '{}', valid values: {:?}",
                    config.logging.level, LOG_LEVELS
                ),
            );
        }

        if config.logging.max_files == 0 {
            result.warn(
                "logging.max_files",
                "max_files is 0, only the current log file is kept",
            );
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
