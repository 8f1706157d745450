//! Error types for cron evaluation.

use thiserror::Error;

use crate::field::CronField;
use crate::search::SearchHorizon;

/// Errors that can occur while parsing or evaluating a cron expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CronError {
    /// The expression as a whole is malformed (for example a wrong field count).
    #[error("Invalid cron expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },

    /// A single field contains a token outside the supported grammar.
    #[error("Invalid token '{token}' in {field} field: {reason}")]
    InvalidToken {
        field: CronField,
        token: String,
        reason: String,
    },

    /// No matching instant exists within the search horizon.
    #[error("No execution found for '{expression}' within {horizon}")]
    Unsatisfiable {
        expression: String,
        horizon: SearchHorizon,
    },
}

impl CronError {
    /// Whether the error was raised while parsing, as opposed to searching.
    pub fn is_invalid_expression(&self) -> bool {
        matches!(
            self,
            CronError::InvalidExpression { .. } | CronError::InvalidToken { .. }
        )
    }

    /// Whether the search horizon was exhausted.
    pub fn is_unsatisfiable(&self) -> bool {
        matches!(self, CronError::Unsatisfiable { .. })
    }
}

/// Result type for cron operations.
pub type CronResult<T> = Result<T, CronError>;
