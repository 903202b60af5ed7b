//! Core storage and retrieval engine for the caplog journal.
//! This crate is the single source of truth for entry invariants:
//! ordering, atomicity, first-run bootstrap and malformed-store handling.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging};
pub use model::entry::{is_blank, Entry};
pub use repo::entry_repo::{EntryRepository, RepoError, RepoResult, SqliteEntryRepository};
pub use service::entry_service::EntryService;
