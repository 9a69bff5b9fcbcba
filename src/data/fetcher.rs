//! Per-topic trend fetching.
//!
//! One provider query per keyword, no batching and no retry: the first provider
//! error aborts the whole fetch.

use crate::domain::{ObservationSeries, Taxonomy, TimeWindow, Topic, TopicTables, WideTable};
use crate::error::AppError;

/// Source of keyword popularity series.
pub trait TrendSource {
    /// Interest over time for a single keyword (category "all", fixed geography).
    fn interest_over_time(&self, keyword: &str, window: &TimeWindow) -> Result<ObservationSeries, AppError>;
}

/// Fetch every keyword of `topic` and merge the non-empty series into one wide table.
pub fn fetch_topic(source: &dyn TrendSource, topic: &Topic, window: &TimeWindow) -> Result<WideTable, AppError> {
    let mut series = Vec::with_capacity(topic.keywords.len());

    for keyword in &topic.keywords {
        if keyword.trim().is_empty() {
            continue;
        }
        let s = source.interest_over_time(keyword, window)?;
        if s.is_empty() {
            log::info!("[{}] '{keyword}': no data for {window}, skipped", topic.name);
            continue;
        }
        log::debug!("[{}] '{keyword}': {} point(s)", topic.name, s.points.len());
        series.push(s);
    }

    if series.is_empty() {
        log::warn!("[{}] no keyword returned data for {window}", topic.name);
    }

    Ok(WideTable::from_series(&series))
}

/// Fetch all topics of the taxonomy for one window, in topic order.
pub fn fetch_topics(source: &dyn TrendSource, taxonomy: &Taxonomy, window: &TimeWindow) -> Result<TopicTables, AppError> {
    let mut tables = TopicTables::default();
    for topic in &taxonomy.topics {
        log::info!("Fetching topic '{}' ({} keyword(s)) for {window}", topic.name, topic.keywords.len());
        let table = fetch_topic(source, topic, window)?;
        tables.insert(topic.name.clone(), table);
    }
    Ok(tables)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use chrono::NaiveDate;

    use super::*;
    use crate::domain::Observation;

    /// In-memory provider keyed by keyword; unknown keywords return an empty series.
    #[derive(Default)]
    pub(crate) struct FakeSource {
        pub series: HashMap<String, Vec<(NaiveDate, i64)>>,
        pub fail_on: Option<String>,
        pub calls: RefCell<Vec<String>>,
    }

    impl FakeSource {
        pub(crate) fn with(mut self, keyword: &str, points: &[(NaiveDate, i64)]) -> Self {
            self.series.insert(keyword.to_string(), points.to_vec());
            self
        }
    }

    impl TrendSource for FakeSource {
        fn interest_over_time(&self, keyword: &str, _window: &TimeWindow) -> Result<ObservationSeries, AppError> {
            self.calls.borrow_mut().push(keyword.to_string());
            if self.fail_on.as_deref() == Some(keyword) {
                return Err(AppError::provider("simulated outage"));
            }
            let points = self
                .series
                .get(keyword)
                .map(|pts| pts.iter().map(|&(date, value)| Observation { date, value }).collect())
                .unwrap_or_default();
            Ok(ObservationSeries {
                keyword: keyword.to_string(),
                points,
            })
        }
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, day).unwrap()
    }

    fn topic(name: &str, keywords: &[&str]) -> Topic {
        Topic {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    #[test]
    fn empty_series_are_skipped() {
        let source = FakeSource::default().with("x", &[(d(5), 10), (d(12), 20)]);
        let window = TimeWindow::new("2020-01-01 2020-12-31").unwrap();

        let table = fetch_topic(&source, &topic("A", &["x", "y"]), &window).unwrap();
        assert_eq!(table.columns.len(), 1);
        assert_eq!(table.columns[0].keyword, "x");
        assert_eq!(*source.calls.borrow(), vec!["x", "y"]);
    }

    #[test]
    fn provider_error_aborts_topic() {
        let source = FakeSource {
            fail_on: Some("y".to_string()),
            ..FakeSource::default()
        }
        .with("x", &[(d(5), 10)])
        .with("z", &[(d(5), 1)]);
        let window = TimeWindow::new("today 12-m").unwrap();

        let err = fetch_topic(&source, &topic("A", &["x", "y", "z"]), &window).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(*source.calls.borrow(), vec!["x", "y"]);
    }

    #[test]
    fn topics_keep_taxonomy_order() {
        let source = FakeSource::default().with("z", &[(d(5), 1)]).with("x", &[(d(5), 2)]);
        let taxonomy = Taxonomy {
            topics: vec![topic("B", &["z"]), topic("A", &["x"])],
        };
        let window = TimeWindow::new("today 12-m").unwrap();

        let tables = fetch_topics(&source, &taxonomy, &window).unwrap();
        assert_eq!(tables.keys(), vec!["B", "A"]);
        assert_eq!(tables.get("A").unwrap().observation_count(), 1);
    }
}
