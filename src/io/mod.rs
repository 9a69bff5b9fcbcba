//! Input/output helpers.
//!
//! - CSV report exports and the multi-sheet pivot workbook (`export`)

pub mod export;

pub use export::*;
