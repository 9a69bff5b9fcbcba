//! CSV exports for the reports.
//!
//! The files are meant to be opened directly in a spreadsheet. Multi-sheet
//! workbooks are written as a directory holding one CSV per sheet.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use csv::Writer;

use crate::domain::{KeywordTotal, TrendRecord, YearBucket};
use crate::error::AppError;
use crate::report::{TopRow, TopicPivot};

pub const TOP_ROW_HEADERS: [&str; 4] = ["STT", "Keyword", "Total Search Count", "Date with the most searches"];

fn create_writer(path: &Path) -> Result<Writer<File>, AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::export(format!("Failed to create directory '{}': {e}", parent.display())))?;
    }
    Writer::from_path(path)
        .map_err(|e| AppError::export(format!("Failed to create export '{}': {e}", path.display())))
}

fn write_row<I, S>(writer: &mut Writer<File>, path: &Path, row: I) -> Result<(), AppError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    writer
        .write_record(row)
        .map_err(|e| AppError::export(format!("Failed to write '{}': {e}", path.display())))
}

fn finish(mut writer: Writer<File>, path: &Path) -> Result<(), AppError> {
    writer
        .flush()
        .map_err(|e| AppError::export(format!("Failed to flush '{}': {e}", path.display())))?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

/// `keyword,sum_value`
pub fn write_totals_csv(path: &Path, totals: &[KeywordTotal]) -> Result<(), AppError> {
    let mut w = create_writer(path)?;
    write_row(&mut w, path, ["keyword", "sum_value"])?;
    for t in totals {
        write_row(&mut w, path, [t.keyword.clone(), t.total.to_string()])?;
    }
    finish(w, path)
}

/// `keyword,value,date` for the merged all-years dump.
pub fn write_observations_csv(path: &Path, records: &[TrendRecord]) -> Result<(), AppError> {
    let mut w = create_writer(path)?;
    write_row(&mut w, path, ["keyword", "value", "date"])?;
    for r in records {
        write_row(&mut w, path, [r.keyword.clone(), r.value.to_string(), r.date.to_string()])?;
    }
    finish(w, path)
}

/// Full rows in table column order.
pub fn write_records_csv(path: &Path, records: &[TrendRecord]) -> Result<(), AppError> {
    let mut w = create_writer(path)?;
    write_row(&mut w, path, TrendRecord::COLUMNS)?;
    for r in records {
        write_row(
            &mut w,
            path,
            [r.keyword.clone(), r.date.to_string(), r.value.to_string(), r.trend_type.clone()],
        )?;
    }
    finish(w, path)
}

/// Numbered top-N rows with peak periods.
pub fn write_top_rows_csv(path: &Path, rows: &[TopRow]) -> Result<(), AppError> {
    let mut w = create_writer(path)?;
    write_row(&mut w, path, TOP_ROW_HEADERS)?;
    for r in rows {
        write_row(&mut w, path, top_row_cells(r))?;
    }
    finish(w, path)
}

fn top_row_cells(r: &TopRow) -> [String; 4] {
    [
        r.no.to_string(),
        r.keyword.clone(),
        r.total.to_string(),
        r.peak.clone().unwrap_or_default(),
    ]
}

/// One CSV per topic under `dir`. Returns the written paths in topic order.
///
/// Sheets left in `dir` by an earlier run are removed first, so the directory
/// always mirrors the current topics.
pub fn write_pivot_workbook(dir: &Path, pivots: &[TopicPivot]) -> Result<Vec<PathBuf>, AppError> {
    fs::create_dir_all(dir)
        .map_err(|e| AppError::export(format!("Failed to create directory '{}': {e}", dir.display())))?;
    clear_sheets(dir)?;

    let mut written = Vec::with_capacity(pivots.len());
    for pivot in pivots {
        let path = dir.join(format!("{}.csv", pivot.topic));
        let mut w = create_writer(&path)?;

        let mut header = vec!["STT".to_string(), "Keyword".to_string()];
        header.extend(pivot.months.iter().map(|m| format!("Month {m}")));
        write_row(&mut w, &path, &header)?;

        for row in &pivot.rows {
            let mut cells = vec![row.no.to_string(), row.keyword.clone()];
            cells.extend(row.cells.iter().map(|c| c.map(|v| v.to_string()).unwrap_or_default()));
            write_row(&mut w, &path, &cells)?;
        }
        finish(w, &path)?;
        written.push(path);
    }
    Ok(written)
}

fn clear_sheets(dir: &Path) -> Result<(), AppError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| AppError::export(format!("Failed to list '{}': {e}", dir.display())))?;
    for entry in entries {
        let path = entry
            .map_err(|e| AppError::export(format!("Failed to list '{}': {e}", dir.display())))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
            fs::remove_file(&path)
                .map_err(|e| AppError::export(format!("Failed to remove stale sheet '{}': {e}", path.display())))?;
            log::debug!("Removed stale sheet {}", path.display());
        }
    }
    Ok(())
}

/// Two top-N tables side by side under a two-row header.
///
/// The left block keeps its row numbers; the right block omits them. The
/// shorter block is padded with empty cells.
pub fn write_side_by_side_csv(
    path: &Path,
    left: (YearBucket, &[TopRow]),
    right: (YearBucket, &[TopRow]),
) -> Result<(), AppError> {
    let (left_bucket, left_rows) = left;
    let (right_bucket, right_rows) = right;

    let mut w = create_writer(path)?;

    let mut group = vec![left_bucket.label(); 4];
    group.extend(vec![right_bucket.label(); 3]);
    write_row(&mut w, path, &group)?;

    let mut columns: Vec<&str> = vec!["No."];
    columns.extend(&TOP_ROW_HEADERS[1..]);
    columns.extend(&TOP_ROW_HEADERS[1..]);
    write_row(&mut w, path, &columns)?;

    for i in 0..left_rows.len().max(right_rows.len()) {
        let mut cells: Vec<String> = match left_rows.get(i) {
            Some(r) => top_row_cells(r).to_vec(),
            None => vec![String::new(); 4],
        };
        match right_rows.get(i) {
            Some(r) => cells.extend(top_row_cells(r).into_iter().skip(1)),
            None => cells.extend(vec![String::new(); 3]),
        }
        write_row(&mut w, path, &cells)?;
    }
    finish(w, path)
}
