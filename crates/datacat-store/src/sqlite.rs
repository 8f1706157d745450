//! SQLite store implementation.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{ErrorCode, Row, params};
use tokio_rusqlite::Connection;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::model::{CatalogRecord, Link, LinkCheck, LinkCheckSchedule, NewLink, TotalData, UpsertOutcome};
use crate::schema::init_schema;
use crate::store::{CatalogStore, LinkStore, ScheduleStore};

#[cfg(test)]
#[path = "sqlite_tests.rs"]
mod tests;

const RECORD_COLUMNS: &str = "hash_address, stand, table_type, group_catalog, table_catalog, \
     table_schema, table_name, table_comment, column_number, column_name, column_comment, \
     data_type, is_nullable, is_auto, column_info, is_active, created_at, updated_at";

const LINK_COLUMNS: &str = "id, link, link_name, description, is_active, status_code, last_checked";

/// SQLite-backed implementation of all store traits.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new in-memory database.
    pub async fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().await?;
        conn.call(|conn| init_schema(conn)).await?;
        Ok(Self { conn })
    }

    /// Open (or create) a file-backed database.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Database(format!("Failed to create {}: {}", parent.display(), e)))?;
        }

        let conn = Connection::open(&path).await?;
        conn.call(|conn| init_schema(conn)).await?;
        debug!("SqliteStore opened at {}", path.display());

        Ok(Self { conn })
    }
}

fn parse_time(index: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}

fn read_record(row: &Row<'_>) -> rusqlite::Result<CatalogRecord> {
    let column_info: Option<String> = row.get(14)?;
    let column_info = column_info
        .map(|text| serde_json::from_str(&text))
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(14, Type::Text, Box::new(e)))?;
    let created_at: String = row.get(16)?;
    let updated_at: String = row.get(17)?;

    Ok(CatalogRecord {
        hash_address: row.get(0)?,
        data: TotalData {
            stand: row.get(1)?,
            table_type: row.get(2)?,
            group_catalog: row.get(3)?,
            table_catalog: row.get(4)?,
            table_schema: row.get(5)?,
            table_name: row.get(6)?,
            table_comment: row.get(7)?,
            column_number: row.get(8)?,
            column_name: row.get(9)?,
            column_comment: row.get(10)?,
            data_type: row.get(11)?,
            is_nullable: row.get(12)?,
            is_auto: row.get(13)?,
            column_info,
            is_active: row.get(15)?,
        },
        created_at: parse_time(16, &created_at)?,
        updated_at: parse_time(17, &updated_at)?,
    })
}

fn read_link(row: &Row<'_>) -> rusqlite::Result<Link> {
    let last_checked: Option<String> = row.get(6)?;
    Ok(Link {
        id: row.get(0)?,
        link: row.get(1)?,
        link_name: row.get(2)?,
        description: row.get(3)?,
        is_active: row.get(4)?,
        status_code: row.get(5)?,
        last_checked: last_checked.map(|t| parse_time(6, &t)).transpose()?,
    })
}

fn read_schedule(row: &Row<'_>) -> rusqlite::Result<LinkCheckSchedule> {
    Ok(LinkCheckSchedule {
        id: row.get(0)?,
        cron_expression: row.get(1)?,
        is_active: row.get(2)?,
    })
}

fn select_record(conn: &rusqlite::Connection, hash_address: &str) -> rusqlite::Result<Option<CatalogRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM total_data WHERE hash_address = ?1",
        RECORD_COLUMNS
    ))?;
    match stmt.query_row([hash_address], read_record) {
        Ok(record) => Ok(Some(record)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

fn encode_column_info(record: &TotalData) -> StoreResult<Option<String>> {
    Ok(record
        .column_info
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?)
}

#[async_trait]
impl CatalogStore for SqliteStore {
    async fn upsert(&self, record: TotalData) -> StoreResult<UpsertOutcome> {
        record.validate()?;
        let hash_address = record.hash_address();
        let column_info = encode_column_info(&record)?;
        let now = Utc::now().to_rfc3339();

        let key = hash_address.clone();
        let created = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;

                let exists = {
                    let mut stmt = tx.prepare("SELECT 1 FROM total_data WHERE hash_address = ?1")?;
                    stmt.exists([&key])?
                };

                tx.execute(
                    "INSERT INTO total_data (hash_address, stand, table_type, group_catalog, table_catalog,
                         table_schema, table_name, table_comment, column_number, column_name, column_comment,
                         data_type, is_nullable, is_auto, column_info, is_active, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?17)
                     ON CONFLICT(hash_address) DO UPDATE SET
                         stand = excluded.stand,
                         table_type = excluded.table_type,
                         group_catalog = excluded.group_catalog,
                         table_catalog = excluded.table_catalog,
                         table_schema = excluded.table_schema,
                         table_name = excluded.table_name,
                         table_comment = excluded.table_comment,
                         column_number = excluded.column_number,
                         column_name = excluded.column_name,
                         column_comment = excluded.column_comment,
                         data_type = excluded.data_type,
                         is_nullable = excluded.is_nullable,
                         is_auto = excluded.is_auto,
                         column_info = excluded.column_info,
                         is_active = excluded.is_active,
                         updated_at = excluded.updated_at",
                    params![
                        key,
                        record.stand,
                        record.table_type,
                        record.group_catalog,
                        record.table_catalog,
                        record.table_schema,
                        record.table_name,
                        record.table_comment,
                        record.column_number,
                        record.column_name,
                        record.column_comment,
                        record.data_type,
                        record.is_nullable,
                        record.is_auto,
                        column_info,
                        record.is_active,
                        now,
                    ],
                )?;

                tx.commit()?;
                Ok(!exists)
            })
            .await?;

        debug!(hash_address = %hash_address, created, "catalog record upserted");
        Ok(UpsertOutcome {
            hash_address,
            created,
        })
    }

    async fn get(&self, hash_address: &str) -> StoreResult<Option<CatalogRecord>> {
        let hash_address = hash_address.to_string();
        Ok(self
            .conn
            .call(move |conn| Ok(select_record(conn, &hash_address)?))
            .await?)
    }

    async fn update(&self, hash_address: &str, record: TotalData) -> StoreResult<CatalogRecord> {
        record.validate()?;
        let column_info = encode_column_info(&record)?;
        let now = Utc::now().to_rfc3339();
        let hash_address = hash_address.to_string();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;

                let Some(existing) = select_record(&tx, &hash_address)? else {
                    return Ok(Err(StoreError::NotFound(hash_address)));
                };
                if let Some(field) = existing.data.changed_key_field(&record) {
                    return Ok(Err(StoreError::ImmutableField(field.to_string())));
                }

                tx.execute(
                    "UPDATE total_data SET group_catalog = ?2, table_comment = ?3, column_number = ?4,
                         column_comment = ?5, is_nullable = ?6, is_auto = ?7, column_info = ?8,
                         is_active = ?9, updated_at = ?10
                     WHERE hash_address = ?1",
                    params![
                        hash_address,
                        record.group_catalog,
                        record.table_comment,
                        record.column_number,
                        record.column_comment,
                        record.is_nullable,
                        record.is_auto,
                        column_info,
                        record.is_active,
                        now,
                    ],
                )?;

                let updated = select_record(&tx, &hash_address)?;
                tx.commit()?;
                Ok(updated.ok_or(StoreError::NotFound(hash_address)))
            })
            .await?
    }

    async fn list_active(&self) -> StoreResult<Vec<CatalogRecord>> {
        Ok(self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM total_data WHERE is_active = 1 ORDER BY hash_address",
                    RECORD_COLUMNS
                ))?;
                let records = stmt
                    .query_map([], read_record)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(records)
            })
            .await?)
    }

    async fn deactivate(&self, hash_address: &str) -> StoreResult<()> {
        let hash_address = hash_address.to_string();
        let now = Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| {
                let changed = conn.execute(
                    "UPDATE total_data SET is_active = 0, updated_at = ?2 WHERE hash_address = ?1",
                    params![hash_address, now],
                )?;
                Ok(if changed == 0 {
                    Err(StoreError::NotFound(hash_address))
                } else {
                    Ok(())
                })
            })
            .await?
    }
}

#[async_trait]
impl LinkStore for SqliteStore {
    async fn add_link(&self, link: NewLink) -> StoreResult<i64> {
        self.conn
            .call(move |conn| {
                let inserted = conn.execute(
                    "INSERT INTO dim_link (link, link_name, description, is_active) VALUES (?1, ?2, ?3, 1)",
                    params![link.link, link.link_name, link.description],
                );
                match inserted {
                    Ok(_) => Ok(Ok(conn.last_insert_rowid())),
                    Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                        Ok(Err(StoreError::Duplicate(link.link.unwrap_or_default())))
                    }
                    Err(e) => Err(e.into()),
                }
            })
            .await?
    }

    async fn get_link(&self, id: i64) -> StoreResult<Option<Link>> {
        Ok(self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!("SELECT {} FROM dim_link WHERE id = ?1", LINK_COLUMNS))?;
                match stmt.query_row([id], read_link) {
                    Ok(link) => Ok(Some(link)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await?)
    }

    async fn all_links(&self) -> StoreResult<Vec<Link>> {
        Ok(self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(&format!("SELECT {} FROM dim_link ORDER BY id", LINK_COLUMNS))?;
                let links = stmt
                    .query_map([], read_link)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(links)
            })
            .await?)
    }

    async fn active_links(&self) -> StoreResult<Vec<Link>> {
        Ok(self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {} FROM dim_link WHERE is_active = 1 ORDER BY id",
                    LINK_COLUMNS
                ))?;
                let links = stmt
                    .query_map([], read_link)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(links)
            })
            .await?)
    }

    async fn record_check(&self, id: i64, check: LinkCheck) -> StoreResult<()> {
        let checked_at = check.checked_at.to_rfc3339();
        self.conn
            .call(move |conn| {
                let changed = conn.execute(
                    "UPDATE dim_link SET status_code = ?2, is_active = ?3, last_checked = ?4 WHERE id = ?1",
                    params![id, check.status_code, check.is_active, checked_at],
                )?;
                Ok(if changed == 0 {
                    Err(StoreError::NotFound(format!("link {}", id)))
                } else {
                    Ok(())
                })
            })
            .await?
    }
}

#[async_trait]
impl ScheduleStore for SqliteStore {
    async fn add_schedule(&self, cron_expression: &str, is_active: bool) -> StoreResult<i64> {
        let cron_expression = cron_expression.to_string();
        Ok(self
            .conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO link_check_schedule (cron_expression, is_active) VALUES (?1, ?2)",
                    params![cron_expression, is_active],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?)
    }

    async fn all_schedules(&self) -> StoreResult<Vec<LinkCheckSchedule>> {
        Ok(self
            .conn
            .call(|conn| {
                let mut stmt =
                    conn.prepare("SELECT id, cron_expression, is_active FROM link_check_schedule ORDER BY id")?;
                let schedules = stmt
                    .query_map([], read_schedule)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(schedules)
            })
            .await?)
    }

    async fn active_schedules(&self) -> StoreResult<Vec<LinkCheckSchedule>> {
        Ok(self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, cron_expression, is_active FROM link_check_schedule
                     WHERE is_active = 1 ORDER BY id",
                )?;
                let schedules = stmt
                    .query_map([], read_schedule)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(schedules)
            })
            .await?)
    }

    async fn set_schedule_active(&self, id: i64, is_active: bool) -> StoreResult<()> {
        self.conn
            .call(move |conn| {
                let changed = conn.execute(
                    "UPDATE link_check_schedule SET is_active = ?2 WHERE id = ?1",
                    params![id, is_active],
                )?;
                Ok(if changed == 0 {
                    Err(StoreError::NotFound(format!("schedule {}", id)))
                } else {
                    Ok(())
                })
            })
            .await?
    }
}
