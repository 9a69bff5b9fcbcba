//! Wide-to-long reshaping.
//!
//! Each keyword column of each topic's wide table becomes a block of
//! `TrendRecord`s tagged with the topic. Blocks are emitted in topic order,
//! then keyword-column order, then date order. Empty cells produce no row.

use crate::domain::{TopicTables, TrendRecord};

/// Normalize the listed topics into one long table.
///
/// Keys missing from `tables` are skipped with a warning.
pub fn to_records(tables: &TopicTables, topic_keys: &[String]) -> Vec<TrendRecord> {
    let mut out = Vec::new();

    for key in topic_keys {
        let Some(table) = tables.get(key) else {
            log::warn!("Topic '{key}' has no fetched table; skipped");
            continue;
        };

        for column in &table.columns {
            for (date, value) in table.index.iter().zip(&column.values) {
                let Some(value) = value else {
                    continue;
                };
                out.push(TrendRecord {
                    keyword: column.keyword.clone(),
                    date: *date,
                    value: *value,
                    trend_type: key.clone(),
                });
            }
        }
    }

    out
}

/// Normalize every topic, in fetch order.
pub fn to_records_all(tables: &TopicTables) -> Vec<TrendRecord> {
    to_records(tables, &tables.keys())
}
