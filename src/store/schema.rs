//! Year-partitioned table definitions.

use rusqlite::Connection;

use crate::domain::YearBucket;
use crate::error::AppError;

fn create_table_sql(bucket: YearBucket) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            keyword TEXT NOT NULL,
            date DATE,
            value INTEGER,
            trend_type TEXT
        )",
        bucket.table()
    )
}

/// Create both trend tables if they do not exist yet. Safe to re-run.
pub fn migrate(conn: &mut Connection) -> Result<(), AppError> {
    let tx = conn.transaction()?;
    for bucket in YearBucket::ALL {
        tx.execute(&create_table_sql(bucket), [])
            .map_err(|e| AppError::store(format!("Failed to create table {}: {e}", bucket.table())))?;
    }
    tx.commit()?;
    log::info!("Schema ready: {}", YearBucket::ALL.map(|b| b.table()).join(", "));
    Ok(())
}

/// Column names of a table in schema order.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>, AppError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}
