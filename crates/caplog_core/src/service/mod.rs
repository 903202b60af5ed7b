//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into one-shot journal operations.
//! - Keep the CLI layer decoupled from storage details.

pub mod entry_service;
