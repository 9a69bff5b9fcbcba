//! Terminal formatting for reports.
//!
//! Keyword columns are padded by character count, not bytes, since keywords
//! are often non-ASCII.

use crate::domain::KeywordTotal;
use crate::report::{TopRow, TopicPivot};

const KEYWORD_MIN_WIDTH: usize = 12;

/// Format a top-N table with peak periods.
pub fn format_top_rows(title: &str, rows: &[TopRow]) -> String {
    let mut out = String::new();
    out.push_str(title);
    out.push('\n');

    if rows.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }

    let w = keyword_width(rows.iter().map(|r| r.keyword.as_str()));
    out.push_str(&format!("{:>3}  {}  {:>10}  {}\n", "No.", pad("Keyword", w), "Total", "Peak"));
    for r in rows {
        out.push_str(&format!(
            "{:>3}  {}  {:>10}  {}\n",
            r.no,
            pad(&r.keyword, w),
            r.total,
            r.peak.as_deref().unwrap_or("-"),
        ));
    }
    out
}

/// Format plain keyword totals.
pub fn format_totals(title: &str, totals: &[KeywordTotal]) -> String {
    let mut out = format!("{title}\n");
    let w = keyword_width(totals.iter().map(|t| t.keyword.as_str()));
    for (idx, t) in totals.iter().enumerate() {
        out.push_str(&format!("{:>3}  {}  {:>10}\n", idx + 1, pad(&t.keyword, w), t.total));
    }
    out
}

/// Format one topic's keyword x month pivot.
pub fn format_pivot(pivot: &TopicPivot) -> String {
    let mut out = format!("[{}]\n", pivot.topic);
    let w = keyword_width(pivot.rows.iter().map(|r| r.keyword.as_str()));

    out.push_str(&format!("{:>3}  {}", "STT", pad("Keyword", w)));
    for m in &pivot.months {
        out.push_str(&format!("  {:>6}", format!("M{m}")));
    }
    out.push('\n');

    for row in &pivot.rows {
        out.push_str(&format!("{:>3}  {}", row.no, pad(&row.keyword, w)));
        for cell in &row.cells {
            match cell {
                Some(v) => out.push_str(&format!("  {v:>6}")),
                None => out.push_str(&format!("  {:>6}", "")),
            }
        }
        out.push('\n');
    }
    out
}

fn keyword_width<'a>(keywords: impl Iterator<Item = &'a str>) -> usize {
    keywords
        .map(|k| k.chars().count())
        .max()
        .unwrap_or(0)
        .max(KEYWORD_MIN_WIDTH)
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    let mut out = s.to_string();
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(len)));
    out
}
