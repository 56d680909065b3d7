//! Tests for the record journal
//!
//! These tests verify:
//! - LSN sequencing
//! - Replay of written entries
//! - Corruption detection and tail truncation

use std::fs;
use std::path::PathBuf;

use clientkeeper::config::JournalSyncStrategy;
use clientkeeper::record::{Fields, Record, RecordId, Value};
use clientkeeper::store::journal::{JournalEntry, JournalRecovery, JournalWriter, Operation, HEADER_SIZE};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_journal() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("test.journal");
    (temp_dir, path)
}

fn insert_op(id: u64, name: &str) -> Operation {
    let mut fields = Fields::new();
    fields.insert("first_name".to_string(), Value::from(name));
    Operation::Insert {
        record: Record::new(RecordId::new(id), fields),
    }
}

fn write_entries(path: &PathBuf, count: u64) {
    let mut writer = JournalWriter::open(path, JournalSyncStrategy::EveryWrite, 1).unwrap();
    for i in 1..=count {
        writer.append(insert_op(i, &format!("name{}", i))).unwrap();
    }
}

// =============================================================================
// Writer Tests
// =============================================================================

#[test]
fn test_lsn_sequential() {
    let (_temp, path) = setup_temp_journal();
    let mut writer = JournalWriter::open(&path, JournalSyncStrategy::EveryWrite, 1).unwrap();

    let lsns: Vec<u64> = (1..=5)
        .map(|i| writer.append(insert_op(i, "x")).unwrap())
        .collect();

    assert_eq!(lsns, vec![1, 2, 3, 4, 5]);
    assert_eq!(writer.next_lsn(), 6);
}

#[test]
fn test_batched_sync_still_readable() {
    let (_temp, path) = setup_temp_journal();
    {
        let mut writer =
            JournalWriter::open(&path, JournalSyncStrategy::EveryNEntries { count: 10 }, 1)
                .unwrap();
        for i in 1..=3 {
            writer.append(insert_op(i, "x")).unwrap();
        }
    }

    let (entries, result) = JournalRecovery::recover(&path).unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(result.last_lsn, 3);
}

// =============================================================================
// Recovery Tests
// =============================================================================

#[test]
fn test_recover_missing_file() {
    let (_temp, path) = setup_temp_journal();

    let (entries, result) = JournalRecovery::recover(&path).unwrap();
    assert!(entries.is_empty());
    assert_eq!(result.last_lsn, 0);
    assert!(!result.was_truncated);
}

#[test]
fn test_recover_all_entries_in_order() {
    let (_temp, path) = setup_temp_journal();
    write_entries(&path, 4);

    let (entries, result) = JournalRecovery::recover(&path).unwrap();

    assert_eq!(result.entries_recovered, 4);
    assert_eq!(result.entries_corrupted, 0);
    assert_eq!(result.trailing_bytes, 0);
    assert_eq!(entries[0].operation, insert_op(1, "name1"));
    assert_eq!(
        entries.iter().map(|e| e.lsn).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
}

#[test]
fn test_crc_mismatch_truncates_from_bad_entry() {
    let (_temp, path) = setup_temp_journal();
    write_entries(&path, 3);

    let mut bytes = fs::read(&path).unwrap();
    let first_len = JournalEntry::decode(&bytes).unwrap().unwrap().1;
    // Flip a payload byte of the second entry
    bytes[first_len + HEADER_SIZE + 2] ^= 0xFF;
    fs::write(&path, &bytes).unwrap();

    let verified = JournalRecovery::verify(&path).unwrap();
    assert_eq!(verified.entries_recovered, 1);
    assert_eq!(verified.entries_corrupted, 1);
    assert_eq!(fs::read(&path).unwrap().len(), bytes.len());

    let (entries, result) = JournalRecovery::recover(&path).unwrap();
    assert_eq!(entries.len(), 1);
    assert!(result.was_truncated);
    assert_eq!(fs::read(&path).unwrap().len(), first_len);
}

#[test]
fn test_torn_payload_is_truncated() {
    let (_temp, path) = setup_temp_journal();
    write_entries(&path, 2);

    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() - 3]).unwrap();

    let (entries, result) = JournalRecovery::recover(&path).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(result.entries_corrupted, 0);
    assert!(result.was_truncated);
}

#[test]
fn test_writer_resumes_after_recovery() {
    let (_temp, path) = setup_temp_journal();
    write_entries(&path, 2);

    let (_, result) = JournalRecovery::recover(&path).unwrap();
    let mut writer =
        JournalWriter::open(&path, JournalSyncStrategy::EveryWrite, result.last_lsn + 1).unwrap();
    assert_eq!(writer.append(Operation::Remove { id: RecordId::new(1) }).unwrap(), 3);
    drop(writer);

    let (entries, _) = JournalRecovery::recover(&path).unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[2].operation, Operation::Remove { id: RecordId::new(1) });
}
