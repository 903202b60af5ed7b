//! End-to-end service scenarios against a file-backed store, exercising
//! one connection per operation the way the CLI drives the core.

use caplog_core::{EntryService, RepoError};
use std::path::PathBuf;
use tempfile::TempDir;

fn temp_service() -> (TempDir, EntryService) {
    let dir = tempfile::tempdir().unwrap();
    let path: PathBuf = dir.path().join("caplog.db");
    (dir, EntryService::new(path))
}

#[test]
fn bootstrap_on_first_use_creates_an_empty_store() {
    let (dir, service) = temp_service();

    assert_eq!(service.count().unwrap(), 0);
    assert!(dir.path().join("caplog.db").exists());
}

#[test]
fn append_amend_delete_grep_scenario() {
    let (_dir, service) = temp_service();

    assert!(service.append_at("Test A", 100).unwrap());
    assert!(service.append_at("Test B", 200).unwrap());

    let tail = service.tail(1).unwrap();
    assert_eq!(tail.len(), 1);
    assert_eq!(tail[0].text, "Test B");
    assert_eq!(tail[0].timestamp, 200);

    assert!(service.amend_last("Test B revised").unwrap());
    let tail = service.tail(1).unwrap();
    assert_eq!(tail[0].text, "Test B revised");
    assert_eq!(tail[0].timestamp, 200);

    let removed = service.delete_last().unwrap();
    assert_eq!(removed.timestamp, 200);
    assert_eq!(service.count().unwrap(), 1);

    let hits = service.search("Test").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].text, "Test A");
    assert_eq!(hits[0].timestamp, 100);
}

#[test]
fn tail_is_chronological_for_display() {
    let (_dir, service) = temp_service();

    for timestamp in [100, 300, 200, 400] {
        service
            .append_at(&format!("at {timestamp}"), timestamp)
            .unwrap();
    }

    let tail = service.tail(3).unwrap();
    let timestamps: Vec<i64> = tail.iter().map(|entry| entry.timestamp).collect();
    assert_eq!(timestamps, vec![200, 300, 400]);
}

#[test]
fn tail_on_empty_store_reports_empty_store() {
    let (_dir, service) = temp_service();

    let err = service.tail(3).unwrap_err();
    assert!(matches!(err, RepoError::EmptyStore));
}

#[test]
fn blank_append_is_a_noop_across_connections() {
    let (_dir, service) = temp_service();

    assert!(!service.append("   ").unwrap());
    assert_eq!(service.count().unwrap(), 0);
}

#[test]
fn state_persists_between_operations_without_caching() {
    let (_dir, service) = temp_service();

    assert!(service.append_at("durable", 100).unwrap());

    // A second service over the same path sees the row; nothing lives
    // in process memory between operations.
    let other = EntryService::new(_dir.path().join("caplog.db"));
    assert_eq!(other.count().unwrap(), 1);
    assert_eq!(other.all().unwrap()[0].text, "durable");
}

#[test]
fn corrupt_store_surfaces_fixed_message() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("caplog.db");
    std::fs::write(&path, b"this is not a sqlite database, not even close").unwrap();

    let service = EntryService::new(&path);
    let err = service.count().unwrap_err();
    assert!(matches!(err, RepoError::Corrupt(_)));
    assert_eq!(err.to_string(), "the log store is corrupt or unreadable");
}

#[test]
fn backup_dump_serializes_all_entries() {
    let (_dir, service) = temp_service();

    service.append_at("first", 100).unwrap();
    service.append_at("second", 200).unwrap();

    let json = serde_json::to_string(&service.all().unwrap()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed[0]["timestamp"], 100);
    assert_eq!(parsed[0]["entry"], "first");
    assert_eq!(parsed[1]["entry"], "second");
}
