//! Reporting utilities: totals, per-period maxima, and topic/month pivots.
//!
//! Everything here is pure in-memory aggregation over `TrendRecord`s; reading
//! from the store and writing files happen elsewhere.

use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{KeywordTotal, Period, PeriodMax, PeriodStyle, TrendRecord};

pub mod format;

pub use format::*;

/// One output row of a top-N report: a keyword, its total, and one peak period.
///
/// A keyword whose maximum is reached in several periods yields several rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopRow {
    /// 1-based row number.
    pub no: usize,
    pub keyword: String,
    pub total: i64,
    /// Formatted period with the keyword's highest summed value.
    pub peak: Option<String>,
}

/// Keyword x month table for one topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicPivot {
    pub topic: String,
    /// Month numbers (1-12) present in this topic, ascending.
    pub months: Vec<u32>,
    pub rows: Vec<PivotRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PivotRow {
    pub no: usize,
    pub keyword: String,
    /// Summed value per entry of `TopicPivot::months`.
    pub cells: Vec<Option<i64>>,
}

/// Sum values per keyword and keep the `n` largest (ties ordered by keyword).
pub fn rank_totals(records: &[TrendRecord], n: usize) -> Vec<KeywordTotal> {
    let mut sums: BTreeMap<&str, i64> = BTreeMap::new();
    for r in records {
        *sums.entry(r.keyword.as_str()).or_insert(0) += r.value;
    }

    let mut totals: Vec<KeywordTotal> = sums
        .into_iter()
        .map(|(keyword, total)| KeywordTotal {
            keyword: keyword.to_string(),
            total,
        })
        .collect();
    totals.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.keyword.cmp(&b.keyword)));
    totals.truncate(n);
    totals
}

/// For every keyword, the month-year period(s) where its summed value peaks.
///
/// Keywords come out in ascending order; tied periods in chronological order.
pub fn period_maxima(records: &[TrendRecord]) -> Vec<PeriodMax> {
    let mut pivot: BTreeMap<&str, BTreeMap<Period, i64>> = BTreeMap::new();
    for r in records {
        *pivot
            .entry(r.keyword.as_str())
            .or_default()
            .entry(Period::of(r.date))
            .or_insert(0) += r.value;
    }

    let mut out = Vec::new();
    for (keyword, periods) in pivot {
        let Some(max) = periods.values().copied().max() else {
            continue;
        };
        for (period, total) in periods {
            if total == max {
                out.push(PeriodMax {
                    keyword: keyword.to_string(),
                    period,
                    total,
                });
            }
        }
    }
    out
}

/// Left-join the ranked totals onto their peak periods and number the rows.
pub fn join_peaks(totals: &[KeywordTotal], maxima: &[PeriodMax], style: PeriodStyle) -> Vec<TopRow> {
    let mut rows = Vec::new();
    for t in totals {
        let peaks: Vec<String> = maxima
            .iter()
            .filter(|m| m.keyword == t.keyword)
            .map(|m| m.period.format(style))
            .collect();

        if peaks.is_empty() {
            rows.push((t, None));
        } else {
            rows.extend(peaks.into_iter().map(|p| (t, Some(p))));
        }
    }

    rows.into_iter()
        .enumerate()
        .map(|(idx, (t, peak))| TopRow {
            no: idx + 1,
            keyword: t.keyword.clone(),
            total: t.total,
            peak,
        })
        .collect()
}

/// Top-N keywords of `records` with their peak periods.
pub fn top_with_peaks(records: &[TrendRecord], n: usize, style: PeriodStyle) -> Vec<TopRow> {
    join_peaks(&rank_totals(records, n), &period_maxima(records), style)
}

/// Split rows by topic (first-appearance order) and pivot each to keyword x month.
pub fn pivot_by_topic_month(records: &[TrendRecord]) -> Vec<TopicPivot> {
    let mut order: Vec<&str> = Vec::new();
    let mut by_topic: BTreeMap<&str, BTreeMap<&str, BTreeMap<u32, i64>>> = BTreeMap::new();

    for r in records {
        let topic = r.trend_type.as_str();
        if !by_topic.contains_key(topic) {
            order.push(topic);
        }
        *by_topic
            .entry(topic)
            .or_default()
            .entry(r.keyword.as_str())
            .or_default()
            .entry(Period::of(r.date).month)
            .or_insert(0) += r.value;
    }

    order
        .into_iter()
        .filter_map(|topic| {
            let keywords = by_topic.remove(topic)?;
            let months: Vec<u32> = keywords
                .values()
                .flat_map(|m| m.keys().copied())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();

            let rows = keywords
                .into_iter()
                .enumerate()
                .map(|(idx, (keyword, by_month))| PivotRow {
                    no: idx + 1,
                    keyword: keyword.to_string(),
                    cells: months.iter().map(|m| by_month.get(m).copied()).collect(),
                })
                .collect();

            Some(TopicPivot {
                topic: topic.to_string(),
                months,
                rows,
            })
        })
        .collect()
}
