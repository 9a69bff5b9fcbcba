//! Report operations behind menu choices 2-6 and `trends report`.
//!
//! Each operation opens its own connection, reads what it needs, prints a
//! compact table and writes its exports into the configured output directory.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::cli::ReportKind;
use crate::config::Settings;
use crate::domain::{PeriodStyle, TrendRecord, YearBucket};
use crate::error::{AppError, EXIT_DATA};
use crate::io;
use crate::plot::{ChartKind, render_top_chart};
use crate::report::{self, TopRow};
use crate::store;

pub const TOP_TEN_TOTALS_FILE: &str = "vn_trending_top_ten.csv";
pub const UNION_DUMP_FILE: &str = "vn_trending_1920.csv";
pub const TOP_TEN_FILE: &str = "top_10_trending.csv";
pub const BY_TOPIC_WORKBOOK: &str = "search_keyword_in_2020";
pub const TOP_FIVE_FILE: &str = "top_five_trending_1920.csv";

const TOP_TEN: usize = 10;
const TOP_FIVE: usize = 5;

/// Files written by one report.
#[derive(Debug, Clone, Default)]
pub struct ReportOutput {
    pub console: String,
    pub files: Vec<PathBuf>,
}

pub fn dump_file(bucket: YearBucket) -> String {
    format!("{}.csv", bucket.table())
}

pub fn chart_file(bucket: YearBucket) -> String {
    format!("top_search_key_{}.svg", bucket.year())
}

pub fn chart_title(geo: &str, bucket: YearBucket) -> String {
    format!("TOP 5 MOST SEARCHED KEYWORDS IN {geo} {}", bucket.year())
}

/// Run one report against the database at `db_path`.
pub fn run(kind: ReportKind, settings: &Settings, db_path: &Path) -> Result<ReportOutput, AppError> {
    let conn = store::open_existing(db_path)?;
    match kind {
        ReportKind::TopTen => top_ten(&conn, settings),
        ReportKind::ByTopic => by_topic(&conn, settings),
        ReportKind::LineChart => chart(&conn, settings, YearBucket::Y2020, ChartKind::Line),
        ReportKind::BarChart => chart(&conn, settings, YearBucket::Y2019, ChartKind::Bar),
        ReportKind::TopFive => top_five(&conn, settings),
    }
}

fn dump_bucket(
    conn: &Connection,
    settings: &Settings,
    bucket: YearBucket,
    out: &mut ReportOutput,
) -> Result<Vec<TrendRecord>, AppError> {
    let records = store::read_bucket(conn, bucket)?;
    write_dump(settings, bucket, &records, out)?;
    Ok(records)
}

fn write_dump(
    settings: &Settings,
    bucket: YearBucket,
    records: &[TrendRecord],
    out: &mut ReportOutput,
) -> Result<(), AppError> {
    let path = settings.out_path(&dump_file(bucket));
    io::write_records_csv(&path, records)?;
    out.files.push(path);
    Ok(())
}

/// Top 10 over both years with their `MM/YY` peak month.
pub fn top_ten(conn: &Connection, settings: &Settings) -> Result<ReportOutput, AppError> {
    let mut out = ReportOutput::default();

    let totals = store::top_by_total(conn, &YearBucket::ALL, TOP_TEN)?;
    let totals_path = settings.out_path(TOP_TEN_TOTALS_FILE);
    io::write_totals_csv(&totals_path, &totals)?;
    out.files.push(totals_path);

    let union = store::read_buckets(conn, &[YearBucket::Y2019, YearBucket::Y2020])?;
    let union_path = settings.out_path(UNION_DUMP_FILE);
    io::write_observations_csv(&union_path, &union)?;
    out.files.push(union_path);

    let rows = report::join_peaks(&totals, &report::period_maxima(&union), PeriodStyle::MonthSlashYear);
    let path = settings.out_path(TOP_TEN_FILE);
    io::write_top_rows_csv(&path, &rows)?;
    out.files.push(path);

    out.console = report::format_top_rows("Top 10 most searched keywords (2019-2020)", &rows);
    Ok(out)
}

/// Keyword x month pivot per topic for 2020.
pub fn by_topic(conn: &Connection, settings: &Settings) -> Result<ReportOutput, AppError> {
    let mut out = ReportOutput::default();
    let records = dump_bucket(conn, settings, YearBucket::Y2020, &mut out)?;

    let pivots = report::pivot_by_topic_month(&records);
    let sheets = io::write_pivot_workbook(&settings.out_path(BY_TOPIC_WORKBOOK), &pivots)?;
    out.files.extend(sheets);

    out.console = pivots
        .iter()
        .map(report::format_pivot)
        .collect::<Vec<_>>()
        .join("\n");
    if out.console.is_empty() {
        out.console = format!("{}: (no data)\n", YearBucket::Y2020.table());
    }
    Ok(out)
}

/// Top 5 of one bucket as an SVG chart. An empty bucket writes nothing.
pub fn chart(conn: &Connection, settings: &Settings, bucket: YearBucket, kind: ChartKind) -> Result<ReportOutput, AppError> {
    let mut out = ReportOutput::default();
    let records = store::read_bucket(conn, bucket)?;
    let totals = store::top_by_total(conn, &[bucket], TOP_FIVE)?;
    if totals.is_empty() {
        return Err(AppError::new(
            EXIT_DATA,
            format!("{} has no rows to chart.", bucket.table()),
        ));
    }
    write_dump(settings, bucket, &records, &mut out)?;

    let title = chart_title(&settings.provider.geo, bucket);
    let path = settings.out_path(&chart_file(bucket));
    render_top_chart(&path, &title, &totals, kind)?;
    out.files.push(path);

    out.console = report::format_totals(&title, &totals);
    Ok(out)
}

/// Top 5 per year with `MM-YY` peaks, side by side.
pub fn top_five(conn: &Connection, settings: &Settings) -> Result<ReportOutput, AppError> {
    let mut out = ReportOutput::default();

    let recent = top_five_rows(conn, settings, YearBucket::Y2020, &mut out)?;
    let previous = top_five_rows(conn, settings, YearBucket::Y2019, &mut out)?;

    let path = settings.out_path(TOP_FIVE_FILE);
    io::write_side_by_side_csv(
        &path,
        (YearBucket::Y2020, recent.as_slice()),
        (YearBucket::Y2019, previous.as_slice()),
    )?;
    out.files.push(path);
    Ok(out)
}

fn top_five_rows(
    conn: &Connection,
    settings: &Settings,
    bucket: YearBucket,
    out: &mut ReportOutput,
) -> Result<Vec<TopRow>, AppError> {
    let records = dump_bucket(conn, settings, bucket, out)?;
    let rows = report::top_with_peaks(&records, TOP_FIVE, PeriodStyle::MonthDashYear);
    out.console.push_str(&report::format_top_rows(
        &format!("Top 5 most searched keywords in {}", bucket.year()),
        &rows,
    ));
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::NaiveDate;

    use super::*;
    use crate::config::ProviderSettings;
    use crate::error::EXIT_INPUT;

    fn rec(keyword: &str, y: i32, m: u32, value: i64, topic: &str) -> TrendRecord {
        TrendRecord {
            keyword: keyword.to_string(),
            date: NaiveDate::from_ymd_opt(y, m, 1).unwrap(),
            value,
            trend_type: topic.to_string(),
        }
    }

    fn setup(dir: &Path) -> (Settings, PathBuf) {
        let db = dir.join("trends.db");
        let mut conn = store::open(&db).unwrap();
        store::migrate(&mut conn).unwrap();
        store::insert_records(
            &mut conn,
            YearBucket::Y2020,
            &[
                rec("kw1", 2020, 1, 5, "Music"),
                rec("kw1", 2020, 3, 8, "Music"),
                rec("kw2", 2020, 1, 4, "Sport"),
            ],
        )
        .unwrap();
        store::insert_records(&mut conn, YearBucket::Y2019, &[rec("kw2", 2019, 6, 1, "Sport")]).unwrap();

        let settings = Settings {
            db_path: Some(db.clone()),
            out_dir: dir.join("out"),
            provider: ProviderSettings::default(),
        };
        (settings, db)
    }

    #[test]
    fn top_ten_writes_totals_union_and_peaks() {
        let dir = tempfile::tempdir().unwrap();
        let (settings, db) = setup(dir.path());

        let out = run(ReportKind::TopTen, &settings, &db).unwrap();
        assert_eq!(out.files.len(), 3);

        let totals = fs::read_to_string(settings.out_path(TOP_TEN_TOTALS_FILE)).unwrap();
        assert_eq!(totals, "keyword,sum_value\nkw1,13\nkw2,5\n");

        let top = fs::read_to_string(settings.out_path(TOP_TEN_FILE)).unwrap();
        let lines: Vec<&str> = top.lines().collect();
        assert_eq!(lines[1], "1,kw1,13,03/20");
        assert_eq!(lines[2], "2,kw2,5,01/20");
        assert!(out.console.contains("kw1"));
    }

    #[test]
    fn by_topic_writes_one_sheet_per_topic() {
        let dir = tempfile::tempdir().unwrap();
        let (settings, db) = setup(dir.path());

        run(ReportKind::ByTopic, &settings, &db).unwrap();
        let book = settings.out_path(BY_TOPIC_WORKBOOK);
        assert_eq!(
            fs::read_to_string(book.join("Music.csv")).unwrap(),
            "STT,Keyword,Month 1,Month 3\n1,kw1,5,8\n"
        );
        assert!(book.join("Sport.csv").exists());
        assert!(settings.out_path("vn_trending20.csv").exists());
    }

    #[test]
    fn charts_use_geo_in_title_and_fail_on_empty_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let (settings, db) = setup(dir.path());

        let out = run(ReportKind::LineChart, &settings, &db).unwrap();
        assert!(out.console.starts_with("TOP 5 MOST SEARCHED KEYWORDS IN VN 2020"));
        assert!(settings.out_path("top_search_key_2020.svg").exists());

        let conn = store::open(&db).unwrap();
        conn.execute("DELETE FROM vn_trending19", []).unwrap();
        let err = run(ReportKind::BarChart, &settings, &db).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_DATA);
        assert!(!settings.out_path("top_search_key_2019.svg").exists());
        assert!(!settings.out_path("vn_trending19.csv").exists());
    }

    #[test]
    fn missing_database_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let (settings, _) = setup(dir.path());
        let typo = dir.path().join("typo.db");

        let err = run(ReportKind::TopTen, &settings, &typo).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INPUT);
        assert!(!typo.exists());
        assert!(!settings.out_path(TOP_TEN_TOTALS_FILE).exists());
    }

    #[test]
    fn top_five_exports_both_years_side_by_side() {
        let dir = tempfile::tempdir().unwrap();
        let (settings, db) = setup(dir.path());

        run(ReportKind::TopFive, &settings, &db).unwrap();
        let text = fs::read_to_string(settings.out_path(TOP_FIVE_FILE)).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[2], "1,kw1,13,03-20,kw2,1,06-19");
        assert_eq!(lines[3], "2,kw2,4,01-20,,,");
        assert!(settings.out_path("vn_trending19.csv").exists());
    }
}
