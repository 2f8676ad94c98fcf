// Integration tests for the on-disk recording inventory
//
// The session directory is the single source of truth: these tests verify
// extension filtering, ordering, index recomputation and best-effort
// deletion against a real temporary directory.

use anyhow::Result;
use aufnehmer::store::{Recording, RecordingStore};
use chrono::NaiveDate;
use std::fs;
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> RecordingStore {
    RecordingStore::at_root(dir.path().to_path_buf(), "mp3")
}

#[test]
fn test_list_filters_extension_and_orders() -> Result<()> {
    let dir = TempDir::new()?;
    fs::write(dir.path().join("0002.mp3"), b"")?;
    fs::write(dir.path().join("0001.mp3"), b"")?;
    fs::write(dir.path().join("notes.txt"), b"")?;

    let recordings = store_in(&dir).list()?;

    assert_eq!(recordings.len(), 2);
    assert_eq!(recordings[0].file_name, "0001.mp3");
    assert_eq!(recordings[0].index, 1);
    assert_eq!(recordings[1].file_name, "0002.mp3");
    assert_eq!(recordings[1].index, 2);

    Ok(())
}

#[test]
fn test_list_indices_stay_contiguous_across_gaps() -> Result<()> {
    let dir = TempDir::new()?;
    fs::write(dir.path().join("0001.mp3"), b"")?;
    fs::write(dir.path().join("0003.mp3"), b"")?;

    let recordings = store_in(&dir).list()?;

    let indices: Vec<usize> = recordings.iter().map(|r| r.index).collect();
    assert_eq!(indices, vec![1, 2], "Indices are positions, not filenames");

    Ok(())
}

#[test]
fn test_lexical_order_equals_numeric_order() -> Result<()> {
    let dir = TempDir::new()?;
    fs::write(dir.path().join("0010.mp3"), b"")?;
    fs::write(dir.path().join("0002.mp3"), b"")?;

    let recordings = store_in(&dir).list()?;

    assert_eq!(recordings[0].file_name, "0002.mp3");
    assert_eq!(recordings[1].file_name, "0010.mp3");

    Ok(())
}

#[test]
fn test_next_path_on_empty_root() -> Result<()> {
    let dir = TempDir::new()?;
    let store = store_in(&dir);

    let path = store.next_recording_path(store.list()?.len());
    assert!(path.to_string_lossy().ends_with("0001.mp3"));

    Ok(())
}

#[test]
fn test_next_path_skips_existing_file() -> Result<()> {
    let dir = TempDir::new()?;
    fs::write(dir.path().join("0001.mp3"), b"")?;

    // A stale count must not lead to overwriting 0001.mp3.
    let path = store_in(&dir).next_recording_path(0);
    assert!(path.to_string_lossy().ends_with("0002.mp3"));

    Ok(())
}

#[test]
fn test_delete_missing_file_is_silent() -> Result<()> {
    let dir = TempDir::new()?;
    fs::write(dir.path().join("0001.mp3"), b"")?;
    let store = store_in(&dir);

    let ghost = Recording {
        index: 99,
        file_name: "9999.mp3".to_string(),
        path: dir.path().join("9999.mp3"),
    };
    store.delete(&ghost);

    // The rest of the inventory is unaffected.
    let recordings = store.list()?;
    assert_eq!(recordings.len(), 1);
    assert_eq!(recordings[0].file_name, "0001.mp3");

    Ok(())
}

#[test]
fn test_delete_last_removes_highest_index() -> Result<()> {
    let dir = TempDir::new()?;
    fs::write(dir.path().join("0001.mp3"), b"")?;
    fs::write(dir.path().join("0002.mp3"), b"")?;
    let store = store_in(&dir);

    store.delete_last();

    let recordings = store.list()?;
    assert_eq!(recordings.len(), 1);
    assert_eq!(recordings[0].file_name, "0001.mp3");

    // Empty store: delete_last is a no-op, not a panic.
    store.delete_last();
    store.delete_last();
    assert_eq!(store.list()?.len(), 0);

    Ok(())
}

#[test]
fn test_ensure_root_creates_parents_and_is_idempotent() -> Result<()> {
    let dir = TempDir::new()?;
    let store = RecordingStore::at_root(dir.path().join("a").join("b"), "mp3");

    store.ensure_root_exists()?;
    assert!(store.root().is_dir());
    store.ensure_root_exists()?;

    Ok(())
}

#[test]
fn test_session_root_is_date_stamped() -> Result<()> {
    let dir = TempDir::new()?;
    let date = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();
    let store = RecordingStore::new(dir.path(), "Aufnahme-", date, "mp3");

    assert!(store
        .root()
        .to_string_lossy()
        .ends_with("Aufnahme-2026-08-25"));

    Ok(())
}
