//! Journal use-case service and query dispatch.
//!
//! # Responsibility
//! - Map each logical operation onto exactly one repository call.
//! - Own connection lifetime: one short-lived connection per operation,
//!   released on every exit path.
//! - Normalize result shape (tail reads newest-first from the store and
//!   is reversed here to chronological display order).
//!
//! # Invariants
//! - The store path is an explicit constructor argument, never a hidden
//!   global.
//! - No state is cached between operations; every call re-reads durable
//!   storage.

use crate::db::{open_db, DbError};
use crate::model::entry::Entry;
use crate::repo::entry_repo::{EntryRepository, RepoError, RepoResult, SqliteEntryRepository};
use log::info;
use rusqlite::Connection;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// One-shot journal operations over a store path.
///
/// Every method opens its own connection, performs a single repository
/// call and drops the connection before returning.
pub struct EntryService {
    db_path: PathBuf,
}

impl EntryService {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Appends `text` at the current time. `false` means blank input
    /// was dropped without touching the store.
    pub fn append(&self, text: &str) -> RepoResult<bool> {
        self.append_at(text, now_epoch())
    }

    /// Appends `text` at an explicit (typically past) timestamp.
    pub fn append_at(&self, text: &str, timestamp: i64) -> RepoResult<bool> {
        let conn = self.connect()?;
        let inserted = SqliteEntryRepository::new(&conn).insert(text, timestamp)?;
        if inserted {
            info!("event=entry_append module=service status=ok timestamp={timestamp}");
        }
        Ok(inserted)
    }

    /// Replaces the last entry's text, preserving its timestamp.
    pub fn amend_last(&self, text: &str) -> RepoResult<bool> {
        let conn = self.connect()?;
        let amended = SqliteEntryRepository::new(&conn).amend_last(text)?;
        if amended {
            info!("event=entry_amend module=service status=ok");
        }
        Ok(amended)
    }

    /// Removes the last entry outright and returns it. Confirmation is
    /// the caller's concern; this call never prompts.
    pub fn delete_last(&self) -> RepoResult<Entry> {
        let conn = self.connect()?;
        let removed = SqliteEntryRepository::new(&conn).delete_last()?;
        info!(
            "event=entry_delete module=service status=ok timestamp={}",
            removed.timestamp
        );
        Ok(removed)
    }

    /// The `n` most recent entries in chronological (display) order.
    ///
    /// An empty store is reported as [`RepoError::EmptyStore`] so callers
    /// show "no entries" instead of an empty listing.
    pub fn tail(&self, n: u32) -> RepoResult<Vec<Entry>> {
        let conn = self.connect()?;
        let mut entries = SqliteEntryRepository::new(&conn).tail(n)?;
        if entries.is_empty() {
            return Err(RepoError::EmptyStore);
        }
        entries.reverse();
        Ok(entries)
    }

    /// Entries containing `term` as a literal substring, chronological.
    /// No matches is an `Ok(empty)`, distinct from an empty store.
    pub fn search(&self, term: &str) -> RepoResult<Vec<Entry>> {
        let conn = self.connect()?;
        SqliteEntryRepository::new(&conn).search(term)
    }

    /// One uniformly random entry.
    pub fn random_entry(&self) -> RepoResult<Entry> {
        let conn = self.connect()?;
        SqliteEntryRepository::new(&conn).random_entry()
    }

    /// Total entry count.
    pub fn count(&self) -> RepoResult<i64> {
        let conn = self.connect()?;
        SqliteEntryRepository::new(&conn).count()
    }

    /// Every entry in chronological order (backs JSON backups).
    pub fn all(&self) -> RepoResult<Vec<Entry>> {
        let conn = self.connect()?;
        SqliteEntryRepository::new(&conn).all()
    }

    // Open failure on a path that already existed means the store could
    // not be read; on a fresh path it means bootstrap failed.
    fn connect(&self) -> RepoResult<Connection> {
        let existed = self.db_path.exists();
        open_db(&self.db_path).map_err(|err| classify_open_error(err, existed))
    }
}

fn classify_open_error(err: DbError, existed: bool) -> RepoError {
    if existed {
        RepoError::Corrupt(err)
    } else {
        RepoError::Init(err)
    }
}

fn now_epoch() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or(0)
}
