use super::*;

fn storage_in(dir: &tempfile::TempDir) -> FileStorage {
    FileStorage::new(dir.path().join("storage.json"))
}

#[test]
fn missing_file_reads_as_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = storage_in(&dir);
    assert_eq!(storage.get_item("ui").expect("read"), None);
    assert!(storage.entries().expect("entries").is_empty());
}

#[test]
fn set_then_get_round_trips_raw_text() {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = storage_in(&dir);
    storage.set_item("ui", r#"{"menu":true}"#).expect("write");
    storage.set_item("todos", "[]").expect("write");
    assert_eq!(storage.get_item("ui").expect("read").as_deref(), Some(r#"{"menu":true}"#));
    assert_eq!(storage.entries().expect("entries").len(), 2);
}

#[test]
fn set_overwrites_existing_key() {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = storage_in(&dir);
    storage.set_item("ui", "1").expect("write");
    storage.set_item("ui", "2").expect("write");
    assert_eq!(storage.get_item("ui").expect("read").as_deref(), Some("2"));
}

#[test]
fn inline_json_values_are_returned_as_text() {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = storage_in(&dir);
    fs::write(storage.path(), r#"{"ui":{"menu":true},"gone":null}"#).expect("seed");
    assert_eq!(storage.get_item("ui").expect("read").as_deref(), Some(r#"{"menu":true}"#));
    assert_eq!(storage.get_item("gone").expect("read"), None);
}

#[test]
fn non_object_file_is_an_operation_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = storage_in(&dir);
    fs::write(storage.path(), "[1,2]").expect("seed");
    let err = storage.get_item("ui").expect_err("array file");
    assert_eq!(err.error_code(), "E_STORAGE_OPERATION");
}

#[test]
fn unreadable_path_is_unavailable() {
    let dir = tempfile::tempdir().expect("tempdir");
    let storage = FileStorage::new(dir.path());
    let err = storage.get_item("ui").expect_err("directory path");
    assert_eq!(err.error_code(), "E_STORAGE_UNAVAILABLE");
}
