//! Shared domain types.
//!
//! The pipeline moves data through three shapes:
//!
//! - the keyword taxonomy (`Taxonomy` / `Topic`) read from the source sheet
//! - per-topic wide tables (`WideTable`), one row per date and one column per keyword
//! - normalized long rows (`TrendRecord`), one per (keyword, date) observation
//!
//! Reports work on `TrendRecord`s read back from the store.

use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::error::AppError;

/// A named group of keywords (one column of the taxonomy sheet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    pub name: String,
    pub keywords: Vec<String>,
}

/// All topics in sheet column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Taxonomy {
    pub topics: Vec<Topic>,
}

impl Taxonomy {
    pub fn topic_names(&self) -> Vec<String> {
        self.topics.iter().map(|t| t.name.clone()).collect()
    }

    pub fn keyword_count(&self) -> usize {
        self.topics.iter().map(|t| t.keywords.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.keyword_count() == 0
    }
}

/// Provider-specific date-range token (e.g. `2020-01-01 2020-12-31`).
///
/// Opaque to this crate beyond trimming; it is passed straight to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimeWindow(String);

impl TimeWindow {
    pub fn new(raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::input("Time window must not be empty."));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Parse a comma-separated list, keeping at most `limit` windows.
    pub fn parse_list(raw: &str, limit: usize) -> Result<Vec<Self>, AppError> {
        raw.trim()
            .split(',')
            .take(limit)
            .map(TimeWindow::new)
            .collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One (date, value) point of a popularity series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: i64,
}

/// Popularity series for one keyword over one time window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationSeries {
    pub keyword: String,
    pub points: Vec<Observation>,
}

impl ObservationSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One keyword column of a `WideTable`, aligned to the table index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideColumn {
    pub keyword: String,
    pub values: Vec<Option<i64>>,
}

/// Date-indexed table with one column per keyword.
///
/// `index` is the sorted union of all dates seen; a cell is `None` when the
/// keyword had no observation on that date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WideTable {
    pub index: Vec<NaiveDate>,
    pub columns: Vec<WideColumn>,
}

impl WideTable {
    /// Outer-join per-keyword series on date, preserving series order as column order.
    pub fn from_series(series: &[ObservationSeries]) -> Self {
        let mut index: Vec<NaiveDate> = series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.date))
            .collect();
        index.sort();
        index.dedup();

        let columns = series
            .iter()
            .map(|s| {
                let mut values = vec![None; index.len()];
                for p in &s.points {
                    if let Ok(pos) = index.binary_search(&p.date) {
                        values[pos] = Some(p.value);
                    }
                }
                WideColumn {
                    keyword: s.keyword.clone(),
                    values,
                }
            })
            .collect();

        Self { index, columns }
    }

    /// Number of non-empty cells.
    pub fn observation_count(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.values.iter().filter(|v| v.is_some()).count())
            .sum()
    }
}

/// Per-topic wide tables in topic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicTables {
    entries: Vec<(String, WideTable)>,
}

impl TopicTables {
    /// Insert or replace the table for `topic`, keeping first-insertion order.
    pub fn insert(&mut self, topic: impl Into<String>, table: WideTable) {
        let topic = topic.into();
        match self.entries.iter_mut().find(|(name, _)| *name == topic) {
            Some(entry) => entry.1 = table,
            None => self.entries.push((topic, table)),
        }
    }

    pub fn get(&self, topic: &str) -> Option<&WideTable> {
        self.entries.iter().find(|(name, _)| name == topic).map(|(_, t)| t)
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }
}

/// A normalized, persisted observation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrendRecord {
    pub keyword: String,
    pub date: NaiveDate,
    pub value: i64,
    pub trend_type: String,
}

impl TrendRecord {
    /// Column order shared by the normalized table and the store schema.
    pub const COLUMNS: [&'static str; 4] = ["keyword", "date", "value", "trend_type"];
}

/// Year-partitioned trend table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YearBucket {
    Y2020,
    Y2019,
}

impl YearBucket {
    /// Most recent bucket first; ingestion pairs time windows with buckets in this order.
    pub const ALL: [YearBucket; 2] = [YearBucket::Y2020, YearBucket::Y2019];

    pub fn table(self) -> &'static str {
        match self {
            YearBucket::Y2020 => "vn_trending20",
            YearBucket::Y2019 => "vn_trending19",
        }
    }

    pub fn year(self) -> i32 {
        match self {
            YearBucket::Y2020 => 2020,
            YearBucket::Y2019 => 2019,
        }
    }

    pub fn label(self) -> String {
        format!("Year {}", self.year())
    }
}

/// Total value for one keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTotal {
    pub keyword: String,
    pub total: i64,
}

/// Calendar month bucket used by the pivot reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn format(self, style: PeriodStyle) -> String {
        let yy = self.year.rem_euclid(100);
        match style {
            PeriodStyle::MonthSlashYear => format!("{:02}/{:02}", self.month, yy),
            PeriodStyle::MonthDashYear => format!("{:02}-{:02}", self.month, yy),
        }
    }
}

/// Label format for month-year periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodStyle {
    /// `MM/YY`
    MonthSlashYear,
    /// `MM-YY`
    MonthDashYear,
}

/// A period in which a keyword reached its maximum summed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodMax {
    pub keyword: String,
    pub period: Period,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn time_window_list_respects_limit_and_trims() {
        let windows = TimeWindow::parse_list(" 2020-01-01 2020-12-31 , 2019-01-01 2019-12-31,today 5-y", 2).unwrap();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].as_str(), "2020-01-01 2020-12-31");
        assert_eq!(windows[1].as_str(), "2019-01-01 2019-12-31");
    }

    #[test]
    fn time_window_rejects_empty_token() {
        assert!(TimeWindow::parse_list("today 12-m,,x", 3).is_err());
    }

    #[test]
    fn wide_table_outer_joins_on_date() {
        let series = vec![
            ObservationSeries {
                keyword: "x".to_string(),
                points: vec![
                    Observation { date: d(2020, 1, 5), value: 10 },
                    Observation { date: d(2020, 1, 12), value: 20 },
                ],
            },
            ObservationSeries {
                keyword: "z".to_string(),
                points: vec![Observation { date: d(2020, 1, 19), value: 7 }],
            },
        ];

        let table = WideTable::from_series(&series);
        assert_eq!(table.index, vec![d(2020, 1, 5), d(2020, 1, 12), d(2020, 1, 19)]);
        assert_eq!(table.columns[0].values, vec![Some(10), Some(20), None]);
        assert_eq!(table.columns[1].values, vec![None, None, Some(7)]);
        assert_eq!(table.observation_count(), 3);
    }

    #[test]
    fn period_labels() {
        let p = Period::of(d(2019, 3, 17));
        assert_eq!(p.format(PeriodStyle::MonthSlashYear), "03/19");
        assert_eq!(p.format(PeriodStyle::MonthDashYear), "03-19");
        assert!(Period::of(d(2019, 12, 1)) < Period::of(d(2020, 1, 1)));
    }

    #[test]
    fn buckets_pair_most_recent_first() {
        assert_eq!(YearBucket::ALL[0].table(), "vn_trending20");
        assert_eq!(YearBucket::ALL[1].table(), "vn_trending19");
        assert_eq!(YearBucket::Y2019.label(), "Year 2019");
    }
}
