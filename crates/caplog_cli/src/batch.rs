//! Batch import of entry files from a directory.
//!
//! A well-formed entry file starts with a `YYYY-MM-DD HH:MM` header line;
//! everything after it is the entry text. Each import is a backdated
//! append; successfully imported files move into a `_logged` subdirectory
//! and malformed files are left untouched.

use caplog_core::{is_blank, EntryService, RepoError};
use chrono::{Local, LocalResult, NaiveDateTime, TimeZone};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const LOGGED_SUBDIR: &str = "_logged";
const HEADER_FORMAT: &str = "%Y-%m-%d %H:%M";

static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}:\d{2}$").expect("header pattern is valid")
});

#[derive(Debug)]
pub enum BatchError {
    NotADirectory(PathBuf),
    Io(io::Error),
    Repo(RepoError),
}

impl Display for BatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotADirectory(path) => {
                write!(f, "`{}` is not a directory", path.display())
            }
            Self::Io(err) => write!(f, "batch import failed: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotADirectory(_) => None,
            Self::Io(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<io::Error> for BatchError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<RepoError> for BatchError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Outcome of one directory scan.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub imported: usize,
    pub skipped: usize,
}

/// Imports every well-formed entry file in `dir`.
///
/// Malformed files (bad header, blank body, unreadable content) are
/// counted as skipped and never moved or modified.
pub fn import_dir(service: &EntryService, dir: &Path) -> Result<BatchReport, BatchError> {
    if !dir.is_dir() {
        return Err(BatchError::NotADirectory(dir.to_path_buf()));
    }

    let logged_dir = dir.join(LOGGED_SUBDIR);
    let mut report = BatchReport::default();

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|dirent| dirent.path())
        .filter(|path| path.is_file())
        .collect();
    // Deterministic import order regardless of directory listing order.
    paths.sort();

    for path in paths {
        let Some((timestamp, text)) = parse_entry_file(&path) else {
            warn!(
                "event=batch_skip module=batch status=skipped file={}",
                path.display()
            );
            report.skipped += 1;
            continue;
        };

        service.append_at(&text, timestamp)?;

        fs::create_dir_all(&logged_dir)?;
        let target = logged_dir.join(path.file_name().unwrap_or_default());
        fs::rename(&path, &target)?;

        info!(
            "event=batch_import module=batch status=ok file={} timestamp={}",
            target.display(),
            timestamp
        );
        report.imported += 1;
    }

    Ok(report)
}

// Returns None for anything malformed; the caller leaves such files alone.
fn parse_entry_file(path: &Path) -> Option<(i64, String)> {
    let content = fs::read_to_string(path).ok()?;
    let mut lines = content.lines();

    let header = lines.next()?.trim().to_string();
    if !HEADER_RE.is_match(&header) {
        return None;
    }

    let naive = NaiveDateTime::parse_from_str(&header, HEADER_FORMAT).ok()?;
    let timestamp = match Local.from_local_datetime(&naive) {
        LocalResult::Single(moment) => moment.timestamp(),
        LocalResult::Ambiguous(earlier, _) => earlier.timestamp(),
        LocalResult::None => return None,
    };

    let text = lines.collect::<Vec<_>>().join("\n").trim().to_string();
    if is_blank(&text) {
        return None;
    }

    Some((timestamp, text))
}

#[cfg(test)]
mod tests {
    use super::{import_dir, parse_entry_file, BatchError, LOGGED_SUBDIR};
    use caplog_core::EntryService;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn temp_service() -> (TempDir, EntryService) {
        let dir = tempfile::tempdir().unwrap();
        let path: PathBuf = dir.path().join("caplog.db");
        (dir, EntryService::new(path))
    }

    fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn well_formed_files_are_imported_and_moved() {
        let (_store_dir, service) = temp_service();
        let inbox = tempfile::tempdir().unwrap();
        let path = write_file(&inbox, "note.txt", "2024-01-15 08:00\nmorning pages\n");

        let report = import_dir(&service, inbox.path()).unwrap();
        assert_eq!(report.imported, 1);
        assert_eq!(report.skipped, 0);

        assert!(!path.exists());
        assert!(inbox.path().join(LOGGED_SUBDIR).join("note.txt").exists());

        let entries = service.all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "morning pages");
    }

    #[test]
    fn malformed_files_are_left_untouched() {
        let (_store_dir, service) = temp_service();
        let inbox = tempfile::tempdir().unwrap();
        let bad_header = write_file(&inbox, "bad_header.txt", "January 15th\nsome text\n");
        let blank_body = write_file(&inbox, "blank_body.txt", "2024-01-15 08:00\n   \n");
        write_file(&inbox, "good.txt", "2024-01-15 09:00\nkept entry\n");

        let report = import_dir(&service, inbox.path()).unwrap();
        assert_eq!(report.imported, 1);
        assert_eq!(report.skipped, 2);

        assert!(bad_header.exists());
        assert!(blank_body.exists());
        assert_eq!(service.count().unwrap(), 1);
    }

    #[test]
    fn missing_directory_is_rejected() {
        let (_store_dir, service) = temp_service();
        let err = import_dir(&service, std::path::Path::new("/no/such/inbox")).unwrap_err();
        assert!(matches!(err, BatchError::NotADirectory(_)));
    }

    #[test]
    fn multi_line_bodies_survive_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "multi.txt", "2024-01-15 08:00\nline one\nline two\n");

        let (timestamp, text) = parse_entry_file(&path).unwrap();
        assert!(timestamp > 0);
        assert_eq!(text, "line one\nline two");
    }
}
