//! Tests for MemoryStore
//!
//! These tests verify:
//! - Id assignment and mutation semantics
//! - Sorted and unsorted scans
//! - Journal replay across reopen
//! - Deadlines

use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Arc;
use std::thread;

use clientkeeper::config::JournalSyncStrategy;
use clientkeeper::query::SortKey;
use clientkeeper::record::{Fields, RecordId, Value};
use clientkeeper::store::{Deadline, MemoryStore, RecordStore};
use clientkeeper::{Config, KeeperError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn deadline() -> Deadline {
    Deadline::after_ms(1000)
}

fn client(first: &str, last: &str) -> Fields {
    let mut fields = Fields::new();
    fields.insert("first_name".to_string(), Value::from(first));
    fields.insert("last_name".to_string(), Value::from(last));
    fields
}

fn names(store: &MemoryStore, sort: Option<&SortKey>) -> Vec<String> {
    store
        .find_all_sorted(sort, deadline())
        .unwrap()
        .iter()
        .map(|r| r.get("first_name").and_then(Value::as_str).unwrap().to_string())
        .collect()
}

fn open_durable(dir: &TempDir) -> MemoryStore {
    MemoryStore::open_durable(dir.path(), JournalSyncStrategy::EveryWrite).unwrap()
}

// =============================================================================
// Basic Operation Tests
// =============================================================================

#[test]
fn test_insert_assigns_increasing_ids() {
    let store = MemoryStore::new();

    let a = store.insert(client("Ann", "Lee"), deadline()).unwrap();
    let b = store.insert(client("Bob", "Ray"), deadline()).unwrap();

    assert!(a.id() < b.id());
    assert_eq!(store.count_all(deadline()).unwrap(), 2);
}

#[test]
fn test_ids_not_reused_after_remove() {
    let store = MemoryStore::new();

    let a = store.insert(client("Ann", "Lee"), deadline()).unwrap();
    assert!(store.remove(a.id(), deadline()).unwrap());
    let b = store.insert(client("Bob", "Ray"), deadline()).unwrap();

    assert_ne!(a.id(), b.id());
}

#[test]
fn test_find_and_modify_sets_fields() {
    let store = MemoryStore::new();
    let a = store.insert(client("Ann", "Lee"), deadline()).unwrap();

    let mut change = Fields::new();
    change.insert("first_name".to_string(), Value::from("Anna"));
    let updated = store
        .find_and_modify(a.id(), &change, deadline())
        .unwrap()
        .unwrap();

    assert_eq!(updated.id(), a.id());
    assert_eq!(updated.get("first_name"), Some(&Value::from("Anna")));
    assert_eq!(updated.get("last_name"), Some(&Value::from("Lee")));
    assert_eq!(names(&store, None), vec!["Anna"]);
}

#[test]
fn test_find_and_modify_absent_id() {
    let store = MemoryStore::new();
    store.insert(client("Ann", "Lee"), deadline()).unwrap();

    let result = store
        .find_and_modify(RecordId::new(99), &client("X", "Y"), deadline())
        .unwrap();

    assert!(result.is_none());
    assert_eq!(names(&store, None), vec!["Ann"]);
}

#[test]
fn test_remove_absent_id() {
    let store = MemoryStore::new();
    assert!(!store.remove(RecordId::new(1), deadline()).unwrap());
}

#[test]
fn test_scan_orders() {
    let store = MemoryStore::new();
    for name in ["Bob", "Ann", "Cid"] {
        store.insert(client(name, "X"), deadline()).unwrap();
    }

    // Unsorted scans come back in id order
    assert_eq!(names(&store, None), vec!["Bob", "Ann", "Cid"]);
    assert_eq!(
        names(&store, Some(&SortKey::ascending("first_name"))),
        vec!["Ann", "Bob", "Cid"]
    );
    assert_eq!(
        names(&store, Some(&SortKey::descending("first_name"))),
        vec!["Cid", "Bob", "Ann"]
    );
}

#[test]
fn test_scan_is_a_snapshot() {
    let store = MemoryStore::new();
    store.insert(client("Ann", "Lee"), deadline()).unwrap();

    let snapshot = store.find_all_sorted(None, deadline()).unwrap();
    store.insert(client("Bob", "Ray"), deadline()).unwrap();

    assert_eq!(snapshot.len(), 1);
    assert_eq!(store.count_all(deadline()).unwrap(), 2);
}

#[test]
fn test_concurrent_inserts_get_unique_ids() {
    let store = Arc::new(MemoryStore::new());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                (0..50)
                    .map(|i| {
                        store
                            .insert(client(&format!("T{}-{}", t, i), "X"), deadline())
                            .unwrap()
                            .id()
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids: Vec<RecordId> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    ids.sort();
    ids.dedup();

    assert_eq!(ids.len(), 200);
    assert_eq!(store.count_all(deadline()).unwrap(), 200);
}

// =============================================================================
// Durability Tests
// =============================================================================

#[test]
fn test_volatile_by_default() {
    let store = MemoryStore::open(&Config::default()).unwrap();
    assert!(!store.is_durable());
    assert!(store.journal_path().is_none());
}

#[test]
fn test_reopen_replays_mutations() {
    let dir = TempDir::new().unwrap();

    let (ann, bob) = {
        let store = open_durable(&dir);
        let ann = store.insert(client("Ann", "Lee"), deadline()).unwrap();
        let bob = store.insert(client("Bob", "Ray"), deadline()).unwrap();
        store.insert(client("Cid", "Fox"), deadline()).unwrap();

        let mut change = Fields::new();
        change.insert("last_name".to_string(), Value::from("Lin"));
        store.find_and_modify(ann.id(), &change, deadline()).unwrap();
        store.remove(bob.id(), deadline()).unwrap();
        store.close().unwrap();
        (ann, bob)
    };

    let store = open_durable(&dir);
    let records = store.find_all_sorted(None, deadline()).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id(), ann.id());
    assert_eq!(records[0].get("last_name"), Some(&Value::from("Lin")));
    assert!(records.iter().all(|r| r.id() != bob.id()));
}

#[test]
fn test_reopen_continues_id_sequence() {
    let dir = TempDir::new().unwrap();

    let last = {
        let store = open_durable(&dir);
        store.insert(client("Ann", "Lee"), deadline()).unwrap();
        let last = store.insert(client("Bob", "Ray"), deadline()).unwrap();
        // Removing the newest record must not free its id
        store.remove(last.id(), deadline()).unwrap();
        last
    };

    let store = open_durable(&dir);
    let next = store.insert(client("Cid", "Fox"), deadline()).unwrap();
    assert!(next.id() > last.id());
}

#[test]
fn test_torn_tail_is_dropped_on_open() {
    let dir = TempDir::new().unwrap();

    let journal_path = {
        let store = open_durable(&dir);
        store.insert(client("Ann", "Lee"), deadline()).unwrap();
        store.insert(client("Bob", "Ray"), deadline()).unwrap();
        store.journal_path().unwrap().to_path_buf()
    };

    // Half a frame header, as left by a crash mid-append
    let mut file = OpenOptions::new().append(true).open(&journal_path).unwrap();
    file.write_all(&[9, 0, 0, 0, 0, 0]).unwrap();
    drop(file);

    let store = open_durable(&dir);
    assert_eq!(names(&store, None), vec!["Ann", "Bob"]);

    // Appends after recovery land on a clean frame boundary
    store.insert(client("Cid", "Fox"), deadline()).unwrap();
    drop(store);
    let store = open_durable(&dir);
    assert_eq!(names(&store, None), vec!["Ann", "Bob", "Cid"]);
}

// =============================================================================
// Deadline Tests
// =============================================================================

#[test]
fn test_deadline_expiry() {
    let expired = Deadline::after_ms(0);
    assert!(expired.is_expired());
    assert!(expired.remaining().is_zero());
    assert!(matches!(expired.timeout_error(), KeeperError::StoreTimeout(0)));

    let open = Deadline::after_ms(60_000);
    assert!(!open.is_expired());
    assert!(matches!(open.timeout_error(), KeeperError::StoreTimeout(60_000)));
}
