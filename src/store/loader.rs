//! Batched insertion of normalized rows.
//!
//! All rows of one call go through a single transaction: either every row is
//! committed or none is. Rows are appended; nothing is deduplicated.

use rusqlite::{Connection, params};

use crate::domain::{TrendRecord, YearBucket};
use crate::error::AppError;
use crate::store::schema::table_columns;

/// Insert `records` into the bucket's table. Returns the number of rows written.
pub fn insert_records(conn: &mut Connection, bucket: YearBucket, records: &[TrendRecord]) -> Result<usize, AppError> {
    let table = bucket.table();
    ensure_columns_match(conn, table)?;

    let sql = format!(
        "INSERT INTO {table} ({}) VALUES (?1, ?2, ?3, ?4)",
        TrendRecord::COLUMNS.join(",")
    );

    // Dropping the transaction without commit rolls the whole batch back.
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(&sql)?;
        for (idx, r) in records.iter().enumerate() {
            stmt.execute(params![r.keyword, r.date, r.value, r.trend_type])
                .map_err(|e| {
                    log::error!("Insert into {table} failed at row {idx}; rolling back batch");
                    AppError::store(format!("Insert into {table} failed at row {idx}: {e}"))
                })?;
        }
    }
    tx.commit()?;

    log::info!("Inserted {} row(s) into {table}", records.len());
    Ok(records.len())
}

fn ensure_columns_match(conn: &Connection, table: &str) -> Result<(), AppError> {
    let cols = table_columns(conn, table)?;
    if cols.is_empty() {
        return Err(AppError::store(format!(
            "Table {table} does not exist; run schema migration first."
        )));
    }
    let data_cols: Vec<&str> = cols.iter().map(String::as_str).filter(|c| *c != "id").collect();
    if data_cols != TrendRecord::COLUMNS {
        return Err(AppError::store(format!(
            "Table {table} columns {data_cols:?} do not match {:?}",
            TrendRecord::COLUMNS
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::store::{migrate, read_bucket};

    fn rec(keyword: &str, day: u32, value: i64, topic: &str) -> TrendRecord {
        TrendRecord {
            keyword: keyword.to_string(),
            date: NaiveDate::from_ymd_opt(2020, 3, day).unwrap(),
            value,
            trend_type: topic.to_string(),
        }
    }

    #[test]
    fn round_trip_preserves_multiset() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();

        let records = vec![
            rec("Jack", 1, 80, "Music"),
            rec("Jack", 1, 80, "Music"),
            rec("bóng đá", 8, 41, "Sport"),
            rec("SEA Games", 15, 0, "Sport"),
        ];
        let n = insert_records(&mut conn, YearBucket::Y2020, &records).unwrap();
        assert_eq!(n, 4);

        let mut back = read_bucket(&conn, YearBucket::Y2020).unwrap();
        let mut expected = records.clone();
        back.sort();
        expected.sort();
        assert_eq!(back, expected);

        assert!(read_bucket(&conn, YearBucket::Y2019).unwrap().is_empty());
    }

    #[test]
    fn failed_batch_is_rolled_back() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        conn.execute_batch(
            "CREATE TRIGGER reject_bad BEFORE INSERT ON vn_trending19
             WHEN NEW.keyword = 'bad' BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
        )
        .unwrap();

        let records = vec![rec("ok", 1, 1, "A"), rec("bad", 2, 2, "A"), rec("ok", 3, 3, "A")];
        let err = insert_records(&mut conn, YearBucket::Y2019, &records).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_STORE);
        assert!(read_bucket(&conn, YearBucket::Y2019).unwrap().is_empty());
    }

    #[test]
    fn missing_table_is_reported() {
        let mut conn = Connection::open_in_memory().unwrap();
        let err = insert_records(&mut conn, YearBucket::Y2020, &[rec("x", 1, 1, "A")]).unwrap_err();
        assert!(err.message().contains("does not exist"));
    }
}
