//! Database schema management.

use rusqlite::Connection;
use tokio_rusqlite::Error;

/// Initialize the database schema.
pub fn init_schema(conn: &Connection) -> Result<(), Error> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

const SCHEMA: &str = r#"
-- Externally loaded column inventory, keyed by hash address
CREATE TABLE IF NOT EXISTS total_data (
    hash_address TEXT PRIMARY KEY,
    stand TEXT,
    table_type TEXT,
    group_catalog TEXT,
    table_catalog TEXT,
    table_schema TEXT,
    table_name TEXT,
    table_comment TEXT,
    column_number TEXT,
    column_name TEXT,
    column_comment TEXT,
    data_type TEXT,
    is_nullable TEXT,
    is_auto TEXT,
    column_info TEXT,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

-- Links checked by the link check job
CREATE TABLE IF NOT EXISTS dim_link (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    link TEXT UNIQUE,
    link_name TEXT NOT NULL,
    description TEXT,
    is_active INTEGER NOT NULL DEFAULT 1,
    status_code INTEGER,
    last_checked TEXT
);

-- Cron schedules of the link check job
CREATE TABLE IF NOT EXISTS link_check_schedule (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    cron_expression TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_total_data_active ON total_data(is_active);
CREATE INDEX IF NOT EXISTS idx_dim_link_active ON dim_link(is_active);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_creation() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        for table in ["total_data", "dim_link", "link_check_schedule"] {
            let mut stmt = conn
                .prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")
                .unwrap();
            assert!(stmt.exists([table]).unwrap(), "missing table {}", table);
        }
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();
    }
}
