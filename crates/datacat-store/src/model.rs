//! Catalog data model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::hash::hash_address;

/// Fields that make up a [`TotalData`] hash address, in hashing order.
pub const HASH_KEY_FIELDS: [&str; 7] = [
    "stand",
    "table_catalog",
    "table_schema",
    "table_type",
    "table_name",
    "column_name",
    "data_type",
];

/// One column of an externally loaded table inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalData {
    #[serde(default)]
    pub stand: Option<String>,
    #[serde(default)]
    pub table_type: Option<String>,
    #[serde(default)]
    pub group_catalog: Option<String>,
    #[serde(default)]
    pub table_catalog: Option<String>,
    #[serde(default)]
    pub table_schema: Option<String>,
    #[serde(default)]
    pub table_name: Option<String>,
    #[serde(default)]
    pub table_comment: Option<String>,
    #[serde(default)]
    pub column_number: Option<String>,
    #[serde(default)]
    pub column_name: Option<String>,
    #[serde(default)]
    pub column_comment: Option<String>,
    #[serde(default)]
    pub data_type: Option<String>,
    #[serde(default)]
    pub is_nullable: Option<String>,
    #[serde(default)]
    pub is_auto: Option<String>,
    /// Free-form extra information, a JSON object or array.
    #[serde(default)]
    pub column_info: Option<serde_json::Value>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Default for TotalData {
    fn default() -> Self {
        Self {
            stand: None,
            table_type: None,
            group_catalog: None,
            table_catalog: None,
            table_schema: None,
            table_name: None,
            table_comment: None,
            column_number: None,
            column_name: None,
            column_comment: None,
            data_type: None,
            is_nullable: None,
            is_auto: None,
            column_info: None,
            is_active: true,
        }
    }
}

impl TotalData {
    /// Key field values in [`HASH_KEY_FIELDS`] order.
    pub fn key_fields(&self) -> [Option<&str>; 7] {
        [
            self.stand.as_deref(),
            self.table_catalog.as_deref(),
            self.table_schema.as_deref(),
            self.table_type.as_deref(),
            self.table_name.as_deref(),
            self.column_name.as_deref(),
            self.data_type.as_deref(),
        ]
    }

    pub fn hash_address(&self) -> String {
        hash_address(&self.key_fields())
    }

    /// Reject `column_info` values that are neither objects nor arrays.
    pub fn validate(&self) -> StoreResult<()> {
        match &self.column_info {
            None | Some(serde_json::Value::Object(_)) | Some(serde_json::Value::Array(_)) => Ok(()),
            Some(other) => Err(StoreError::InvalidColumnInfo(format!(
                "expected a JSON object or array, got {}",
                other
            ))),
        }
    }

    /// Name of the first key field whose value differs in `other`.
    pub fn changed_key_field(&self, other: &TotalData) -> Option<&'static str> {
        self.key_fields()
            .iter()
            .zip(other.key_fields().iter())
            .zip(HASH_KEY_FIELDS)
            .find(|((current, new), _)| current.unwrap_or("") != new.unwrap_or(""))
            .map(|(_, name)| name)
    }
}

/// A stored [`TotalData`] with its address and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub hash_address: String,
    #[serde(flatten)]
    pub data: TotalData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of an update-or-create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpsertOutcome {
    pub hash_address: String,
    pub created: bool,
}

/// A link whose availability is tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: i64,
    /// URL; unique when present.
    pub link: Option<String>,
    pub link_name: String,
    pub description: Option<String>,
    pub is_active: bool,
    /// HTTP status of the last check, `None` if the request failed.
    pub status_code: Option<u16>,
    pub last_checked: Option<DateTime<Utc>>,
}

/// Input for creating a [`Link`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLink {
    pub link: Option<String>,
    pub link_name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewLink {
    pub fn new(link: impl Into<String>, link_name: impl Into<String>) -> Self {
        Self {
            link: Some(link.into()),
            link_name: link_name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Outcome of one link check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkCheck {
    pub status_code: Option<u16>,
    pub is_active: bool,
    pub checked_at: DateTime<Utc>,
}

/// A cron schedule for the link check job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCheckSchedule {
    pub id: i64,
    pub cron_expression: String,
    pub is_active: bool,
}

impl LinkCheckSchedule {
    /// Scheduler job identifier.
    pub fn job_id(&self) -> String {
        format!("link_check_{}", self.id)
    }
}
