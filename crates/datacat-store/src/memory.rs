//! In-memory store.

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::model::{CatalogRecord, Link, LinkCheck, LinkCheckSchedule, NewLink, TotalData, UpsertOutcome};
use crate::store::{CatalogStore, LinkStore, ScheduleStore};

#[derive(Default)]
struct MemoryState {
    records: HashMap<String, CatalogRecord>,
    links: BTreeMap<i64, Link>,
    schedules: BTreeMap<i64, LinkCheckSchedule>,
    next_link_id: i64,
    next_schedule_id: i64,
}

/// In-memory implementation of all store traits, for tests and dry runs.
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn upsert(&self, record: TotalData) -> StoreResult<UpsertOutcome> {
        record.validate()?;
        let hash_address = record.hash_address();
        let now = Utc::now();

        let mut state = self.state.write().await;
        let created = match state.records.entry(hash_address.clone()) {
            Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                existing.data = record;
                existing.updated_at = now;
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(CatalogRecord {
                    hash_address: hash_address.clone(),
                    data: record,
                    created_at: now,
                    updated_at: now,
                });
                true
            }
        };

        Ok(UpsertOutcome {
            hash_address,
            created,
        })
    }

    async fn get(&self, hash_address: &str) -> StoreResult<Option<CatalogRecord>> {
        let state = self.state.read().await;
        Ok(state.records.get(hash_address).cloned())
    }

    async fn update(&self, hash_address: &str, record: TotalData) -> StoreResult<CatalogRecord> {
        record.validate()?;
        let mut state = self.state.write().await;
        let existing = state
            .records
            .get_mut(hash_address)
            .ok_or_else(|| StoreError::NotFound(hash_address.to_string()))?;

        if let Some(field) = existing.data.changed_key_field(&record) {
            return Err(StoreError::ImmutableField(field.to_string()));
        }

        existing.data = record;
        existing.updated_at = Utc::now();
        Ok(existing.clone())
    }

    async fn list_active(&self) -> StoreResult<Vec<CatalogRecord>> {
        let state = self.state.read().await;
        let mut records: Vec<CatalogRecord> = state
            .records
            .values()
            .filter(|r| r.data.is_active)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.hash_address.cmp(&b.hash_address));
        Ok(records)
    }

    async fn deactivate(&self, hash_address: &str) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let existing = state
            .records
            .get_mut(hash_address)
            .ok_or_else(|| StoreError::NotFound(hash_address.to_string()))?;
        existing.data.is_active = false;
        existing.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl LinkStore for MemoryStore {
    async fn add_link(&self, link: NewLink) -> StoreResult<i64> {
        let mut state = self.state.write().await;

        if let Some(url) = &link.link {
            if state.links.values().any(|l| l.link.as_ref() == Some(url)) {
                return Err(StoreError::Duplicate(url.clone()));
            }
        }

        state.next_link_id += 1;
        let id = state.next_link_id;
        state.links.insert(
            id,
            Link {
                id,
                link: link.link,
                link_name: link.link_name,
                description: link.description,
                is_active: true,
                status_code: None,
                last_checked: None,
            },
        );
        Ok(id)
    }

    async fn get_link(&self, id: i64) -> StoreResult<Option<Link>> {
        let state = self.state.read().await;
        Ok(state.links.get(&id).cloned())
    }

    async fn all_links(&self) -> StoreResult<Vec<Link>> {
        let state = self.state.read().await;
        Ok(state.links.values().cloned().collect())
    }

    async fn active_links(&self) -> StoreResult<Vec<Link>> {
        let state = self.state.read().await;
        Ok(state.links.values().filter(|l| l.is_active).cloned().collect())
    }

    async fn record_check(&self, id: i64, check: LinkCheck) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let link = state
            .links
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("link {}", id)))?;
        link.status_code = check.status_code;
        link.is_active = check.is_active;
        link.last_checked = Some(check.checked_at);
        Ok(())
    }
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn add_schedule(&self, cron_expression: &str, is_active: bool) -> StoreResult<i64> {
        let mut state = self.state.write().await;
        state.next_schedule_id += 1;
        let id = state.next_schedule_id;
        state.schedules.insert(
            id,
            LinkCheckSchedule {
                id,
                cron_expression: cron_expression.to_string(),
                is_active,
            },
        );
        Ok(id)
    }

    async fn all_schedules(&self) -> StoreResult<Vec<LinkCheckSchedule>> {
        let state = self.state.read().await;
        Ok(state.schedules.values().cloned().collect())
    }

    async fn active_schedules(&self) -> StoreResult<Vec<LinkCheckSchedule>> {
        let state = self.state.read().await;
        Ok(state
            .schedules
            .values()
            .filter(|s| s.is_active)
            .cloned()
            .collect())
    }

    async fn set_schedule_active(&self, id: i64, is_active: bool) -> StoreResult<()> {
        let mut state = self.state.write().await;
        let schedule = state
            .schedules
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("schedule {}", id)))?;
        schedule.is_active = is_active;
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
