use super::*;

#[test]
fn memory_store_starts_empty() {
    let store = MemoryStore::new();
    assert_eq!(store.load("theme"), Ok(None));
}

#[test]
fn memory_store_save_then_load() {
    let store = MemoryStore::new();
    store.save("theme", "dark").unwrap();
    assert_eq!(store.load("theme"), Ok(Some("dark".into())));
    store.save("theme", "light").unwrap();
    assert_eq!(store.get("theme").as_deref(), Some("light"));
}

#[test]
fn memory_store_with_entry_seeds_value() {
    let store = MemoryStore::new().with_entry("theme", "dark");
    assert_eq!(store.load("theme"), Ok(Some("dark".into())));
    assert_eq!(store.load("other"), Ok(None));
}

#[test]
fn storage_error_display_includes_cause() {
    let err = StorageError::Write("quota exceeded".into());
    assert!(err.to_string().contains("quota exceeded"));
}

// =============================================================
// FileStore
// =============================================================

#[test]
fn file_store_missing_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("prefs.json"));
    assert_eq!(store.load("theme"), Ok(None));
}

#[test]
fn file_store_round_trips_and_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("prefs.json");
    let store = FileStore::new(&path);

    store.save("theme", "dark").unwrap();
    assert!(path.exists());
    assert_eq!(store.load("theme"), Ok(Some("dark".into())));

    let reopened = FileStore::new(&path);
    assert_eq!(reopened.load("theme"), Ok(Some("dark".into())));
}

#[test]
fn file_store_keeps_unrelated_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path().join("prefs.json"));
    store.save("other", "value").unwrap();
    store.save("theme", "light").unwrap();
    assert_eq!(store.load("other"), Ok(Some("value".into())));
    assert_eq!(store.load("theme"), Ok(Some("light".into())));
}

#[test]
fn file_store_reports_corrupt_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.json");
    std::fs::write(&path, "not json").unwrap();
    let store = FileStore::new(&path);

    assert!(matches!(store.load("theme"), Err(StorageError::Corrupt(_))));
    assert!(matches!(store.save("theme", "dark"), Err(StorageError::Corrupt(_))));
}
