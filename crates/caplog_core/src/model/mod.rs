//! Domain model for journal entries.
//!
//! # Responsibility
//! - Define the canonical entry record used by core business logic.
//!
//! # Invariants
//! - Entry text is never empty after trimming once persisted.
//! - Ordering is always expressed via `timestamp`, never by storage order.

pub mod entry;
