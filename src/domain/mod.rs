//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the keyword taxonomy (`Taxonomy`, `Topic`) and provider inputs (`TimeWindow`)
//! - fetched series and their wide, date-indexed form (`ObservationSeries`, `WideTable`)
//! - persisted rows and report outputs (`TrendRecord`, `YearBucket`, `KeywordTotal`, `PeriodMax`)

pub mod types;

pub use types::*;
