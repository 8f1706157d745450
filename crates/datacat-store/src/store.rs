//! Store traits.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::model::{CatalogRecord, Link, LinkCheck, LinkCheckSchedule, NewLink, TotalData, UpsertOutcome};

/// Hash-addressed catalog records.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Update the record at `record.hash_address()` or create it.
    ///
    /// `created_at` of an existing record is kept.
    async fn upsert(&self, record: TotalData) -> StoreResult<UpsertOutcome>;

    /// Load a record by hash address.
    async fn get(&self, hash_address: &str) -> StoreResult<Option<CatalogRecord>>;

    /// Replace the non-key fields of an existing record.
    ///
    /// Fails with `ImmutableField` if a hash key field would change.
    async fn update(&self, hash_address: &str, record: TotalData) -> StoreResult<CatalogRecord>;

    /// All records with `is_active` set.
    async fn list_active(&self) -> StoreResult<Vec<CatalogRecord>>;

    /// Clear `is_active` on a record.
    async fn deactivate(&self, hash_address: &str) -> StoreResult<()>;
}

/// Links checked by the link check job.
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Add a link, failing with `Duplicate` if its URL is already stored.
    async fn add_link(&self, link: NewLink) -> StoreResult<i64>;

    async fn get_link(&self, id: i64) -> StoreResult<Option<Link>>;

    async fn all_links(&self) -> StoreResult<Vec<Link>>;

    /// Links with `is_active` set, ordered by id.
    async fn active_links(&self) -> StoreResult<Vec<Link>>;

    /// Persist the outcome of a check.
    async fn record_check(&self, id: i64, check: LinkCheck) -> StoreResult<()>;
}

/// Cron schedules of the link check job.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn add_schedule(&self, cron_expression: &str, is_active: bool) -> StoreResult<i64>;

    async fn all_schedules(&self) -> StoreResult<Vec<LinkCheckSchedule>>;

    /// Schedules with `is_active` set, ordered by id.
    async fn active_schedules(&self) -> StoreResult<Vec<LinkCheckSchedule>>;

    async fn set_schedule_active(&self, id: i64, is_active: bool) -> StoreResult<()>;
}
