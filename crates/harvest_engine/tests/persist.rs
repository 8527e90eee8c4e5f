use std::fs;

use harvest_engine::write_atomic;
use tempfile::TempDir;

#[test]
fn writes_and_replaces_existing_content() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("state.json");

    write_atomic(&target, "first").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "first");

    // Replace existing
    write_atomic(&target, "second").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "second");
}

#[test]
fn creates_missing_parent_directory() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("nested").join("out").join("channels.txt");

    write_atomic(&target, "url\n").unwrap();
    assert_eq!(fs::read_to_string(&target).unwrap(), "url\n");
}

#[test]
fn no_partial_file_when_parent_is_not_a_directory() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let target = file_path.join("state.json");
    assert!(write_atomic(&target, "data").is_err());
    assert!(!target.exists());
}

#[test]
fn leaves_no_temp_files_behind() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("state.json");

    write_atomic(&target, "{}").unwrap();

    let entries: Vec<_> = fs::read_dir(temp.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("state.json")]);
}
