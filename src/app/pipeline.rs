//! Ingestion pipeline shared by the menu and the `ingest` subcommand.
//!
//! taxonomy -> fetch (per window, per topic) -> normalize -> schema migration -> load
//!
//! Every window is fetched before the database is touched, so a provider
//! failure never leaves a half-loaded run behind.

use std::path::Path;

use crate::data::{TrendSource, fetch_topics};
use crate::domain::{Taxonomy, TimeWindow, TrendRecord, YearBucket};
use crate::error::{AppError, EXIT_DATA};
use crate::normalize::to_records;
use crate::store;

/// Rows fetched for one bucket.
#[derive(Debug, Clone)]
pub struct BucketBatch {
    pub bucket: YearBucket,
    pub window: TimeWindow,
    pub records: Vec<TrendRecord>,
}

/// What happened to each bucket during loading.
#[derive(Debug, Clone, Default)]
pub struct IngestOutcome {
    pub loaded: Vec<(YearBucket, usize)>,
    pub failed: Vec<(YearBucket, AppError)>,
}

impl IngestOutcome {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Pair windows with buckets, most recent first. Surplus windows are dropped.
pub fn plan_buckets(windows: &[TimeWindow]) -> Vec<(YearBucket, TimeWindow)> {
    if windows.len() > YearBucket::ALL.len() {
        log::warn!(
            "{} time window(s) given but only {} table(s) exist; ignoring: {}",
            windows.len(),
            YearBucket::ALL.len(),
            windows[YearBucket::ALL.len()..]
                .iter()
                .map(TimeWindow::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    YearBucket::ALL
        .iter()
        .copied()
        .zip(windows.iter().cloned())
        .collect()
}

/// Fetch and normalize every topic for every planned window.
pub fn fetch_batches(
    source: &dyn TrendSource,
    taxonomy: &Taxonomy,
    windows: &[TimeWindow],
) -> Result<Vec<BucketBatch>, AppError> {
    if taxonomy.is_empty() {
        return Err(AppError::new(EXIT_DATA, "The taxonomy contains no keywords."));
    }
    if windows.is_empty() {
        return Err(AppError::input("At least one time window is required."));
    }

    let mut batches = Vec::new();
    for (bucket, window) in plan_buckets(windows) {
        let tables = fetch_topics(source, taxonomy, &window)?;
        let records = to_records(&tables, &taxonomy.topic_names());
        log::info!("{window}: {} normalized row(s) for {}", records.len(), bucket.table());
        batches.push(BucketBatch {
            bucket,
            window,
            records,
        });
    }
    Ok(batches)
}

/// Migrate the schema and load each batch in its own transaction.
///
/// A failed batch is rolled back and recorded; later batches are still attempted.
pub fn load_batches(db_path: &Path, batches: &[BucketBatch]) -> Result<IngestOutcome, AppError> {
    let mut conn = store::open(db_path)?;
    store::migrate(&mut conn)?;

    let mut outcome = IngestOutcome::default();
    for batch in batches {
        match store::insert_records(&mut conn, batch.bucket, &batch.records) {
            Ok(n) => outcome.loaded.push((batch.bucket, n)),
            Err(err) => {
                log::error!("Loading {} failed: {err}", batch.bucket.table());
                outcome.failed.push((batch.bucket, err));
            }
        }
    }
    Ok(outcome)
}

/// Full ingestion: fetch everything, then load.
pub fn run_ingest(
    source: &dyn TrendSource,
    taxonomy: &Taxonomy,
    windows: &[TimeWindow],
    db_path: &Path,
) -> Result<IngestOutcome, AppError> {
    let batches = fetch_batches(source, taxonomy, windows)?;
    load_batches(db_path, &batches)
}

/// Human-readable ingestion summary.
pub fn format_outcome(outcome: &IngestOutcome) -> String {
    let mut out = String::new();
    for (bucket, n) in &outcome.loaded {
        out.push_str(&format!("{}: {n} row(s) inserted\n", bucket.table()));
    }
    for (bucket, err) in &outcome.failed {
        out.push_str(&format!("{}: not loaded ({err})\n", bucket.table()));
    }
    if outcome.is_complete() {
        out.push_str("The required data is successfully fetched and saved into the database\n");
    }
    out
}
