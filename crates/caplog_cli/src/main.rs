//! caplog binary entry point.
//!
//! # Responsibility
//! - Resolve home-relative paths once at startup and pass them down as
//!   plain values.
//! - Dispatch each invocation to exactly one core service call.
//! - Own every interactive step (confirmation, message prompt) so the
//!   core stays synchronous and prompt-free.

mod args;
mod batch;
mod render;
mod when;

use args::{Cli, Command};
use batch::BatchError;
use caplog_core::{default_log_level, init_logging, EntryService, RepoError};
use chrono::Local;
use clap::Parser;
use colored::Colorize;
use directories::UserDirs;
use log::error;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use when::WhenError;

const STORE_FILE_NAME: &str = "caplog.db";
const BACKUP_FILE_NAME: &str = "caplog_backup.json";

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(user_dirs) = UserDirs::new() else {
        eprintln!("caplog: could not determine the home directory");
        return ExitCode::FAILURE;
    };
    let home = user_dirs.home_dir().to_path_buf();

    // Journaling must work even when the logger cannot start.
    let log_dir = home.join(".caplog").join("logs");
    let _ = init_logging(default_log_level(), &log_dir.to_string_lossy());

    let store_path = home.join(STORE_FILE_NAME);
    if !store_path.exists() {
        println!(
            "{}",
            format!("Creating new log store at {}.", store_path.display()).cyan()
        );
    }

    let service = EntryService::new(&store_path);
    match run(cli, &service, &user_dirs) {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::Repo(RepoError::EmptyStore)) => {
            println!("{}", "No entries logged yet.".dimmed());
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=command_failed module=cli status=error error={err}");
            eprintln!("{}", format!("caplog: {err}").red());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, service: &EntryService, user_dirs: &UserDirs) -> Result<(), AppError> {
    match cli.command {
        None => {
            let message = cli.message.join(" ");
            if message.trim().is_empty() {
                show_tail(service, 3)
            } else {
                service.append(&message)?;
                Ok(())
            }
        }
        Some(Command::Amend { words }) => {
            if service.amend_last(&words.join(" "))? {
                println!("Amended the last entry.");
            }
            Ok(())
        }
        Some(Command::Delete) => delete_with_confirmation(service),
        Some(Command::Last { n }) => show_tail(service, n.max(1)),
        Some(Command::Past { when, message }) => backdated_entry(service, &when.join(" "), message),
        Some(Command::Grep { term }) => {
            let hits = service.search(&term)?;
            if hits.is_empty() {
                println!("{}", "No matching entries.".dimmed());
            } else {
                render::print_entries(&hits);
            }
            Ok(())
        }
        Some(Command::Count) => {
            println!("{}", service.count()?);
            Ok(())
        }
        Some(Command::Random) => {
            println!("{}", render::entry_line(&service.random_entry()?));
            Ok(())
        }
        Some(Command::Batch { dir }) => {
            let report = batch::import_dir(service, &dir)?;
            println!(
                "Imported {} entries ({} files skipped).",
                report.imported, report.skipped
            );
            Ok(())
        }
        Some(Command::Backup { path }) => backup(service, path, user_dirs),
    }
}

fn show_tail(service: &EntryService, n: u32) -> Result<(), AppError> {
    let entries = service.tail(n)?;
    render::print_entries(&entries);
    Ok(())
}

fn delete_with_confirmation(service: &EntryService) -> Result<(), AppError> {
    let last = service.tail(1)?;
    println!("{}", render::entry_line(&last[0]));

    if !confirm("Delete this entry? [y/N] ")? {
        println!("Cancelled.");
        return Ok(());
    }

    service.delete_last()?;
    println!("Deleted the last entry.");
    Ok(())
}

fn backdated_entry(
    service: &EntryService,
    expr: &str,
    message: Option<String>,
) -> Result<(), AppError> {
    // Resolve before prompting: an unparseable expression aborts the
    // whole invocation with no prompt and no mutation.
    let timestamp = when::resolve(expr, Local::now())?;

    let text = match message {
        Some(text) => text,
        None => prompt_line("Entry: ")?,
    };
    if text.trim().is_empty() {
        // Cancellation is a successful no-op, not a failure.
        println!("Cancelled.");
        return Ok(());
    }

    service.append_at(&text, timestamp)?;
    Ok(())
}

fn backup(
    service: &EntryService,
    path: Option<PathBuf>,
    user_dirs: &UserDirs,
) -> Result<(), AppError> {
    let target = path.unwrap_or_else(|| {
        user_dirs
            .document_dir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| user_dirs.home_dir().join("Documents"))
            .join(BACKUP_FILE_NAME)
    });

    let entries = service.all()?;
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&target, serde_json::to_string_pretty(&entries)?)?;

    println!(
        "{}",
        format!(
            "Backed up {} entries to {}.",
            entries.len(),
            target.display()
        )
        .cyan()
    );
    Ok(())
}

fn confirm(question: &str) -> Result<bool, AppError> {
    let answer = prompt_line(question)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

// Blocks until a line arrives; there is no timeout for interactive input.
fn prompt_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

#[derive(Debug)]
enum AppError {
    Repo(RepoError),
    When(WhenError),
    Batch(BatchError),
    Io(io::Error),
    Json(serde_json::Error),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::When(err) => write!(f, "{err}"),
            Self::Batch(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "could not serialize the backup: {err}"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::When(err) => Some(err),
            Self::Batch(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<WhenError> for AppError {
    fn from(value: WhenError) -> Self {
        Self::When(value)
    }
}

impl From<BatchError> for AppError {
    fn from(value: BatchError) -> Self {
        Self::Batch(value)
    }
}

impl From<io::Error> for AppError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
