//! Read-only queries used by the reports.
//!
//! Reports load whole tables into memory; only the cross-table top-N is
//! aggregated in SQL.

use chrono::NaiveDate;
use rusqlite::{Connection, params};

use crate::domain::{KeywordTotal, TrendRecord, YearBucket};
use crate::error::AppError;

/// All rows of one bucket, in insertion order.
pub fn read_bucket(conn: &Connection, bucket: YearBucket) -> Result<Vec<TrendRecord>, AppError> {
    let sql = format!(
        "SELECT keyword, date, value, trend_type FROM {} ORDER BY id",
        bucket.table()
    );
    let mut stmt = conn.prepare(&sql)?;
    let raw = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, NaiveDate>(1)?,
                row.get::<_, Option<i64>>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut null_cells = 0usize;
    let rows: Vec<TrendRecord> = raw
        .into_iter()
        .map(|(keyword, date, value, trend_type)| {
            null_cells += usize::from(value.is_none()) + usize::from(trend_type.is_none());
            TrendRecord {
                keyword,
                date,
                value: value.unwrap_or(0),
                trend_type: trend_type.unwrap_or_default(),
            }
        })
        .collect();
    if null_cells > 0 {
        log::warn!(
            "{}: {null_cells} NULL value/trend_type cell(s) read as 0 / empty",
            bucket.table()
        );
    }
    log::debug!("Read {} row(s) from {}", rows.len(), bucket.table());
    Ok(rows)
}

/// Rows of several buckets concatenated in the given order.
pub fn read_buckets(conn: &Connection, buckets: &[YearBucket]) -> Result<Vec<TrendRecord>, AppError> {
    let mut out = Vec::new();
    for &bucket in buckets {
        out.extend(read_bucket(conn, bucket)?);
    }
    Ok(out)
}

/// Top `n` keywords by summed value over the union of `buckets`.
///
/// Ties on the total are ordered by keyword so the result does not depend on
/// the order of the union branches.
pub fn top_by_total(conn: &Connection, buckets: &[YearBucket], n: usize) -> Result<Vec<KeywordTotal>, AppError> {
    if buckets.is_empty() || n == 0 {
        return Ok(Vec::new());
    }

    let union = buckets
        .iter()
        .map(|b| format!("SELECT keyword, value FROM {}", b.table()))
        .collect::<Vec<_>>()
        .join(" UNION ALL ");
    let sql = format!(
        "SELECT keyword, COALESCE(SUM(value), 0) AS sum_val
         FROM ({union}) AS top_trend
         GROUP BY keyword
         ORDER BY sum_val DESC, keyword ASC
         LIMIT ?1"
    );

    let limit = i64::try_from(n).unwrap_or(i64::MAX);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![limit], |row| {
            Ok(KeywordTotal {
                keyword: row.get(0)?,
                total: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::store::{insert_records, migrate};

    fn rec(keyword: &str, value: i64) -> TrendRecord {
        TrendRecord {
            keyword: keyword.to_string(),
            date: NaiveDate::from_ymd_opt(2020, 6, 7).unwrap(),
            value,
            trend_type: "T".to_string(),
        }
    }

    fn seeded() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        insert_records(&mut conn, YearBucket::Y2019, &[rec("kw1", 10), rec("kw2", 5)]).unwrap();
        insert_records(&mut conn, YearBucket::Y2020, &[rec("kw1", 3)]).unwrap();
        conn
    }

    #[test]
    fn top_n_sums_across_both_tables() {
        let conn = seeded();
        let all = top_by_total(&conn, &YearBucket::ALL, 10).unwrap();
        assert_eq!(
            all,
            vec![
                KeywordTotal { keyword: "kw1".to_string(), total: 13 },
                KeywordTotal { keyword: "kw2".to_string(), total: 5 },
            ]
        );

        let top1 = top_by_total(&conn, &YearBucket::ALL, 1).unwrap();
        assert_eq!(top1.len(), 1);
        assert_eq!(top1[0].keyword, "kw1");
    }

    #[test]
    fn top_n_ignores_union_order() {
        let conn = seeded();
        let forward = top_by_total(&conn, &[YearBucket::Y2019, YearBucket::Y2020], 2).unwrap();
        let reverse = top_by_total(&conn, &[YearBucket::Y2020, YearBucket::Y2019], 2).unwrap();
        assert_eq!(forward, reverse);
    }

    #[test]
    fn read_buckets_concatenates_in_order() {
        let conn = seeded();
        let rows = read_buckets(&conn, &[YearBucket::Y2020, YearBucket::Y2019]).unwrap();
        let kws: Vec<&str> = rows.iter().map(|r| r.keyword.as_str()).collect();
        assert_eq!(kws, vec!["kw1", "kw1", "kw2"]);
    }

    #[test]
    fn null_cells_from_foreign_rows_read_as_defaults() {
        let conn = seeded();
        conn.execute(
            "INSERT INTO vn_trending20 (keyword, date, value, trend_type) VALUES ('kw3', '2020-06-14', NULL, NULL)",
            [],
        )
        .unwrap();

        let rows = read_bucket(&conn, YearBucket::Y2020).unwrap();
        let last = rows.last().unwrap();
        assert_eq!(last.keyword, "kw3");
        assert_eq!(last.value, 0);
        assert_eq!(last.trend_type, "");
    }
}
