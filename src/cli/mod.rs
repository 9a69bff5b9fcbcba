//! Command-line parsing for the keyword trends pipeline.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the fetch/store/report code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod menu;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "trends", version, about = "Keyword search-trend collector and reporter")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone, Default)]
pub struct GlobalArgs {
    /// SQLite database file (overrides TRENDS_DB; prompted when neither is set).
    #[arg(long, global = true, value_name = "FILE")]
    pub db: Option<PathBuf>,

    /// Directory for exported reports and charts (overrides TRENDS_OUT_DIR).
    #[arg(long = "out-dir", global = true, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the interactive option menu (default).
    Menu,
    /// Create the trend tables if they do not exist.
    Init,
    /// Fetch trends for a keyword taxonomy and load them into the database.
    Ingest(IngestArgs),
    /// Export one report from the stored data.
    Report(ReportArgs),
}

#[derive(Debug, Args, Clone)]
pub struct IngestArgs {
    /// Taxonomy CSV: one column per topic, keywords as cells.
    #[arg(short = 'f', long, value_name = "CSV")]
    pub file: PathBuf,

    /// Comma-separated time windows, most recent first.
    #[arg(short = 'w', long, value_name = "W1,W2")]
    pub windows: String,

    /// Use only the first N windows.
    #[arg(short = 'n', long)]
    pub count: Option<usize>,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[arg(value_enum)]
    pub kind: ReportKind,
}

/// Report selectable from the CLI; mirrors menu options 2-6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Top 10 keywords over both years with their peak month.
    TopTen,
    /// Keyword x month pivot per topic for 2020.
    ByTopic,
    /// Line chart of the top 5 keywords in 2020.
    LineChart,
    /// Bar chart of the top 5 keywords in 2019.
    BarChart,
    /// Top 5 keywords per year, side by side.
    TopFive,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ingest_args_parse() {
        let cli = Cli::parse_from([
            "trends", "--db", "t.db", "ingest", "-f", "keywords.csv", "-w", "today 12-m,today 5-y", "-n", "1",
        ]);
        assert_eq!(cli.global.db, Some(PathBuf::from("t.db")));
        match cli.command {
            Command::Ingest(args) => {
                assert_eq!(args.file, PathBuf::from("keywords.csv"));
                assert_eq!(args.windows, "today 12-m,today 5-y");
                assert_eq!(args.count, Some(1));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn report_kind_and_global_flag_after_subcommand() {
        let cli = Cli::parse_from(["trends", "report", "line-chart", "--out-dir", "out"]);
        assert_eq!(cli.global.out_dir, Some(PathBuf::from("out")));
        assert!(matches!(cli.command, Command::Report(ReportArgs { kind: ReportKind::LineChart })));
    }
}
