//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and resolves settings
//! - asks for the database path when none is configured
//! - runs the option menu or a single subcommand
//! - prints summaries and export confirmations

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::cli::menu::{self, MenuChoice, Prompter};
use crate::cli::{Command, IngestArgs, ReportKind};
use crate::config::Settings;
use crate::data::{TrendSource, TrendsClient, load_taxonomy};
use crate::domain::TimeWindow;
use crate::error::AppError;
use crate::store;

pub mod pipeline;
pub mod reports;

/// Builds a live trends source on demand, so the menu only connects when ingesting.
pub type SourceFactory<'a> = dyn Fn() -> Result<Box<dyn TrendSource>, AppError> + 'a;

/// Entry point for the `trends` binary.
pub fn run() -> Result<(), AppError> {
    // `trends` and `trends --db x.db` should both open the menu. Clap requires
    // a subcommand name, so argv is rewritten before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    let settings = Settings::resolve(&cli.global);

    let mut prompter = menu::stdio();
    let db_path = resolve_db_path(&settings, &mut prompter)?;
    let connect = || connect_provider(&settings);

    match cli.command {
        Command::Menu => run_menu(&mut prompter, &settings, &db_path, &connect),
        Command::Init => handle_init(&db_path),
        Command::Ingest(args) => handle_ingest(&args, &db_path, &connect),
        Command::Report(args) => handle_report(args.kind, &settings, &db_path),
    }
}

fn connect_provider(settings: &Settings) -> Result<Box<dyn TrendSource>, AppError> {
    let client = TrendsClient::connect(settings.provider.clone())?;
    Ok(Box::new(client))
}

/// Configured database path, or one typed at the prompt.
pub fn resolve_db_path<R: BufRead, W: Write>(
    settings: &Settings,
    prompter: &mut Prompter<R, W>,
) -> Result<PathBuf, AppError> {
    if let Some(path) = &settings.db_path {
        return Ok(path.clone());
    }
    let raw = prompter.ask_required("Insert database path: ")?;
    if raw.is_empty() {
        return Err(AppError::input("A database path is required."));
    }
    Ok(PathBuf::from(raw))
}

fn handle_init(db_path: &Path) -> Result<(), AppError> {
    let mut conn = store::open(db_path)?;
    store::migrate(&mut conn)?;
    println!("Tables are ready in {}", db_path.display());
    Ok(())
}

fn handle_ingest(args: &IngestArgs, db_path: &Path, connect: &SourceFactory<'_>) -> Result<(), AppError> {
    let taxonomy = load_taxonomy(&args.file)?;
    let windows = TimeWindow::parse_list(&args.windows, args.count.unwrap_or(usize::MAX))?;
    let source = connect()?;

    let outcome = pipeline::run_ingest(source.as_ref(), &taxonomy, &windows, db_path)?;
    print!("{}", pipeline::format_outcome(&outcome));

    match outcome.failed.into_iter().next() {
        Some((_, err)) => Err(err),
        None => Ok(()),
    }
}

fn handle_report(kind: ReportKind, settings: &Settings, db_path: &Path) -> Result<(), AppError> {
    let output = reports::run(kind, settings, db_path)?;
    println!("{}", output.console.trim_end());
    for file in &output.files {
        println!("{} is successfully exported", file.display());
    }
    Ok(())
}

fn report_kind(choice: MenuChoice) -> Option<ReportKind> {
    match choice {
        MenuChoice::TopTen => Some(ReportKind::TopTen),
        MenuChoice::ByTopic => Some(ReportKind::ByTopic),
        MenuChoice::LineChart => Some(ReportKind::LineChart),
        MenuChoice::BarChart => Some(ReportKind::BarChart),
        MenuChoice::TopFive => Some(ReportKind::TopFive),
        MenuChoice::Ingest | MenuChoice::Exit => None,
    }
}

/// Interactive option menu.
///
/// Errors from a single choice are printed and the menu is shown again;
/// provider failures end the session.
pub fn run_menu<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    settings: &Settings,
    db_path: &Path,
    connect: &SourceFactory<'_>,
) -> Result<(), AppError> {
    loop {
        prompter.print_menu()?;
        let choice = prompter.next_choice()?;

        let result = match (choice, report_kind(choice)) {
            (MenuChoice::Exit, _) => {
                prompter.say("Goodbye!")?;
                return Ok(());
            }
            (_, Some(kind)) => menu_report(prompter, kind, settings, db_path),
            (_, None) => menu_ingest(prompter, db_path, connect),
        };

        if let Err(err) = result {
            if err.is_fatal() {
                return Err(err);
            }
            log::debug!("menu choice {choice:?} failed with code {}", err.exit_code());
            prompter.say(&err.to_string())?;
        }
    }
}

fn menu_ingest<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    db_path: &Path,
    connect: &SourceFactory<'_>,
) -> Result<(), AppError> {
    let path = prompter.ask_required("Enter excel file name or file path: ")?;
    let taxonomy = load_taxonomy(Path::new(&path))?;

    let count = prompter.ask_count("Enter the number of elements : ")?;
    let raw = prompter.ask_required("Enter the timeframes (Enter the most recent timeframe first): ")?;
    let windows = TimeWindow::parse_list(&raw, count)?;

    let source = connect()?;
    let outcome = pipeline::run_ingest(source.as_ref(), &taxonomy, &windows, db_path)?;
    prompter.say(pipeline::format_outcome(&outcome).trim_end())
}

fn menu_report<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    kind: ReportKind,
    settings: &Settings,
    db_path: &Path,
) -> Result<(), AppError> {
    let output = reports::run(kind, settings, db_path)?;
    prompter.say(output.console.trim_end())?;
    for file in &output.files {
        prompter.say(&format!("{} is successfully exported", file.display()))?;
    }
    Ok(())
}

/// Rewrite argv so `trends` defaults to `trends menu`.
///
/// Rules:
/// - `trends`                          -> `trends menu`
/// - `trends --db x.db ...`            -> `trends menu --db x.db ...`
/// - `trends --help/--version/-h`      -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("menu".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "menu" | "init" | "ingest" | "report");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "menu".to_string());
        return argv;
    }

    argv
}
