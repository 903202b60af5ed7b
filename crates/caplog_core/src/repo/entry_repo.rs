//! Entry repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the full read/write API over the `logs` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - "Last entry" is resolved as one rowid picked from the maximum
//!   timestamp; ties between equal timestamps are store-defined.
//! - User text only ever reaches SQL through bound parameters.
//! - Search terms match as literal substrings; LIKE metacharacters in
//!   the term are escaped before binding.

use crate::db::DbError;
use crate::model::entry::{is_blank, Entry};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

// Display time is projected at the store boundary so every reader sees
// the identical rendering.
const ENTRY_SELECT_SQL: &str = "SELECT
    timestamp,
    strftime('%Y-%m-%d %H:%M', timestamp, 'unixepoch', 'localtime') AS local_time,
    text
FROM logs";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error with fixed, non-leaking user-facing messages.
///
/// The underlying driver error stays reachable through `source()` for
/// diagnostics, but `Display` never exposes it.
#[derive(Debug)]
pub enum RepoError {
    /// The store file or schema could not be created.
    Init(DbError),
    /// The store exists but could not be read or queried.
    Corrupt(DbError),
    /// An operation requiring at least one entry found none.
    EmptyStore,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Init(_) => write!(f, "could not create the log store"),
            Self::Corrupt(_) => write!(f, "the log store is corrupt or unreadable"),
            Self::EmptyStore => write!(f, "no entries logged yet"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Init(err) | Self::Corrupt(err) => Some(err),
            Self::EmptyStore => None,
        }
    }
}

// A failure inside a repository operation means the already-opened store
// could not be queried; open-time failures are classified by the service.
impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Corrupt(DbError::Sqlite(value))
    }
}

/// Repository interface for entry persistence and retrieval.
pub trait EntryRepository {
    /// Inserts `text` at `timestamp`. Returns `false` (no row written)
    /// for blank text.
    fn insert(&self, text: &str, timestamp: i64) -> RepoResult<bool>;
    /// Replaces the text of the last entry in place, preserving its
    /// timestamp. Returns `false` for blank text.
    fn amend_last(&self, text: &str) -> RepoResult<bool>;
    /// Removes the last entry and returns it.
    fn delete_last(&self) -> RepoResult<Entry>;
    /// The `n` most recent entries, most-recent-first.
    fn tail(&self, n: u32) -> RepoResult<Vec<Entry>>;
    /// Entries whose text contains `term` literally, chronological.
    fn search(&self, term: &str) -> RepoResult<Vec<Entry>>;
    /// One uniformly random entry.
    fn random_entry(&self) -> RepoResult<Entry>;
    /// Total number of entries.
    fn count(&self) -> RepoResult<i64>;
    /// Every entry in chronological order.
    fn all(&self) -> RepoResult<Vec<Entry>>;
}

/// SQLite-backed entry repository borrowing a bootstrapped connection.
pub struct SqliteEntryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntryRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn last_rowid(&self) -> RepoResult<Option<i64>> {
        let rowid = self
            .conn
            .query_row(
                "SELECT rowid FROM logs ORDER BY timestamp DESC LIMIT 1;",
                [],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;
        Ok(rowid)
    }

    fn collect_entries(&self, sql: &str, bind: impl rusqlite::Params) -> RepoResult<Vec<Entry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(bind)?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }

        Ok(entries)
    }
}

impl EntryRepository for SqliteEntryRepository<'_> {
    fn insert(&self, text: &str, timestamp: i64) -> RepoResult<bool> {
        if is_blank(text) {
            return Ok(false);
        }

        self.conn.execute(
            "INSERT INTO logs (timestamp, text) VALUES (?1, ?2);",
            params![timestamp, text],
        )?;

        Ok(true)
    }

    fn amend_last(&self, text: &str) -> RepoResult<bool> {
        if is_blank(text) {
            return Ok(false);
        }

        // Rowid-scoped so a timestamp tie amends exactly one row.
        let Some(rowid) = self.last_rowid()? else {
            return Err(RepoError::EmptyStore);
        };

        self.conn.execute(
            "UPDATE logs SET text = ?1 WHERE rowid = ?2;",
            params![text, rowid],
        )?;

        Ok(true)
    }

    fn delete_last(&self) -> RepoResult<Entry> {
        let Some(rowid) = self.last_rowid()? else {
            return Err(RepoError::EmptyStore);
        };

        let entry = self.conn.query_row(
            &format!("{ENTRY_SELECT_SQL} WHERE rowid = ?1;"),
            params![rowid],
            |row| {
                Ok(Entry {
                    timestamp: row.get("timestamp")?,
                    local_time: row.get("local_time")?,
                    text: row.get("text")?,
                })
            },
        )?;

        self.conn
            .execute("DELETE FROM logs WHERE rowid = ?1;", params![rowid])?;

        Ok(entry)
    }

    fn tail(&self, n: u32) -> RepoResult<Vec<Entry>> {
        self.collect_entries(
            &format!("{ENTRY_SELECT_SQL} ORDER BY timestamp DESC LIMIT ?1;"),
            params![n],
        )
    }

    fn search(&self, term: &str) -> RepoResult<Vec<Entry>> {
        let pattern = format!("%{}%", escape_like_term(term));
        self.collect_entries(
            &format!("{ENTRY_SELECT_SQL} WHERE text LIKE ?1 ESCAPE '\\' ORDER BY timestamp ASC;"),
            params![pattern],
        )
    }

    fn random_entry(&self) -> RepoResult<Entry> {
        let entries = self.collect_entries(
            &format!("{ENTRY_SELECT_SQL} ORDER BY RANDOM() LIMIT 1;"),
            [],
        )?;
        entries.into_iter().next().ok_or(RepoError::EmptyStore)
    }

    fn count(&self) -> RepoResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM logs;", [], |row| row.get(0))?;
        Ok(count)
    }

    fn all(&self) -> RepoResult<Vec<Entry>> {
        self.collect_entries(&format!("{ENTRY_SELECT_SQL} ORDER BY timestamp ASC;"), [])
    }
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<Entry> {
    Ok(Entry {
        timestamp: row.get("timestamp")?,
        local_time: row.get("local_time")?,
        text: row.get("text")?,
    })
}

// LIKE treats `%` and `_` as wildcards; a user searching for "100%" means
// the literal text. The backslash doubles first so the escape char itself
// stays searchable.
fn escape_like_term(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
