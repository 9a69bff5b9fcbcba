//! Input side of the pipeline: keyword taxonomy and trend series.

pub mod fetcher;
pub mod taxonomy;
pub mod trends;

pub use fetcher::{TrendSource, fetch_topic, fetch_topics};
pub use taxonomy::{load_taxonomy, read_taxonomy, sanitize_topic_name};
pub use trends::TrendsClient;
