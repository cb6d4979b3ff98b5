use hpm_fs::{NormalizedPath, io};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_write_atomic_creates_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("test.json"));

    io::write_atomic(&path, b"{}").unwrap();

    let content = fs::read_to_string(path.to_native()).unwrap();
    assert_eq!(content, "{}");
}

#[test]
fn test_write_atomic_overwrites_existing() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("test.json");
    fs::write(&file_path, "{\"enable\": true}").unwrap();

    let path = NormalizedPath::new(&file_path);
    io::write_atomic(&path, b"{\"enable\": false}").unwrap();

    let content = fs::read_to_string(&file_path).unwrap();
    assert_eq!(content, "{\"enable\": false}");
}

#[test]
fn test_write_atomic_creates_missing_parent() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("user/data/cache.json"));

    io::write_text(&path, "{}").unwrap();

    assert!(path.is_file());
}

#[test]
fn test_write_atomic_leaves_no_temp_file() {
    let temp = TempDir::new().unwrap();
    let path = NormalizedPath::new(temp.path().join("mops.json"));

    io::write_text(&path, "{}").unwrap();

    let names: Vec<String> = fs::read_dir(temp.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["mops.json".to_string()]);
}

#[test]
fn test_read_text_nonexistent_file() {
    let path = NormalizedPath::new("/nonexistent/file.json");
    let result = io::read_text(&path);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("/nonexistent/file.json"));
}
