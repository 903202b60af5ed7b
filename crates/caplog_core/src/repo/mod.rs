//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts over the entry store.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - All statements bind user text as parameters; no value is ever
//!   interpolated into SQL.
//! - Store failures surface as semantic errors with fixed messages, not
//!   raw driver text.

pub mod entry_repo;
