//! Journal entry domain model.
//!
//! # Responsibility
//! - Define the single persisted record shape.
//! - Provide the blank-input rule shared by all write paths.
//!
//! # Invariants
//! - `timestamp` is Unix epoch seconds (UTC) and is not required to be
//!   unique; "last entry" means the row with the maximum timestamp.
//! - `local_time` is rendered by the store's query projection, never
//!   recomputed in application code.

use serde::{Deserialize, Serialize};

/// A single timestamped journal record as read back from the store.
///
/// The serde shape (`timestamp` + `entry`, no display time) matches the
/// JSON backup files the tool writes, so backups stay importable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Unix epoch seconds. Creation time for live appends, the nominal
    /// moment for backdated ones.
    pub timestamp: i64,
    /// `YYYY-MM-DD HH:MM` in the local timezone, projected at query time.
    #[serde(skip)]
    pub local_time: String,
    /// Entry body. Arbitrary text; quotes, backslashes and newlines
    /// round-trip byte-identical.
    #[serde(rename = "entry")]
    pub text: String,
}

/// Returns whether `text` is empty once trimmed.
///
/// Blank input is a successful no-op on every write path, never an error.
/// The original (untrimmed) text is what gets stored when non-blank.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
