//! `keyword-trends` library crate.
//!
//! The binary (`trends`) is a thin wrapper around this library so that:
//!
//! - the fetch -> normalize -> load pipeline is testable without a network or a terminal
//! - reports can be produced from any database file the store can open
//! - the trends provider sits behind a trait and can be swapped in tests

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod normalize;
pub mod plot;
pub mod report;
pub mod store;
