use rust_file_store::error::{BackendError, DEFAULT_DISPLAY_MESSAGE};
use rust_file_store::models::{BackendOptions, StoredFile};
use rust_file_store::services::backends::FileBackend;
use rust_file_store::services::storage::Backend;
use std::path::Path;

fn options_for(root: &Path) -> BackendOptions {
    BackendOptions::new()
        .with(
            "file_path",
            format!("{}/files/{{name}}", root.display()),
        )
        .with(
            "info_path",
            format!("{}/info/{{name}}.html", root.display()),
        )
}

fn make_dirs(root: &Path) {
    std::fs::create_dir_all(root.join("files")).unwrap();
    std::fs::create_dir_all(root.join("info")).unwrap();
}

#[tokio::test]
async fn test_store_file_and_info_page() {
    let dir = tempfile::tempdir().unwrap();
    make_dirs(dir.path());
    let backend = FileBackend::new(options_for(dir.path()));

    let file = StoredFile::from_bytes("abc123", "hello test", "<html>info</html>");
    backend.store(file).await.unwrap();

    let stored = std::fs::read(dir.path().join("files/abc123")).unwrap();
    assert_eq!(stored, b"hello test");
    let info = std::fs::read_to_string(dir.path().join("info/abc123.html")).unwrap();
    assert_eq!(info, "<html>info</html>");
}

#[tokio::test]
async fn test_large_content_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    make_dirs(dir.path());
    let backend = FileBackend::new(options_for(dir.path()));

    let data: Vec<u8> = (0..3 * 1024 * 1024).map(|i| (i % 251) as u8).collect();
    let source = dir.path().join("source.bin");
    std::fs::write(&source, &data).unwrap();

    let file = StoredFile::open("big", &source, "<p>big</p>").await.unwrap();
    assert_eq!(file.size(), data.len() as u64);
    backend.store(file).await.unwrap();

    let stored = std::fs::read(dir.path().join("files/big")).unwrap();
    assert_eq!(stored.len(), data.len());
    assert!(stored == data);
}

#[tokio::test]
async fn test_existing_destination_is_truncated() {
    let dir = tempfile::tempdir().unwrap();
    make_dirs(dir.path());
    std::fs::write(dir.path().join("files/again"), vec![b'x'; 1000]).unwrap();
    let backend = FileBackend::new(options_for(dir.path()));

    backend
        .store(StoredFile::from_bytes("again", "short", "<p>info</p>"))
        .await
        .unwrap();

    assert_eq!(std::fs::read(dir.path().join("files/again")).unwrap(), b"short");
}

#[tokio::test]
async fn test_info_failure_keeps_written_file() {
    let dir = tempfile::tempdir().unwrap();
    // Only the files directory exists, so the info page cannot be created.
    std::fs::create_dir_all(dir.path().join("files")).unwrap();
    let backend = FileBackend::new(options_for(dir.path()));

    let err = backend
        .store(StoredFile::from_bytes("half", "payload", "<p>info</p>"))
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::Io { .. }));
    assert_eq!(err.display_message(), DEFAULT_DISPLAY_MESSAGE);
    assert!(err.internal_message().contains("half.html"));
    assert_eq!(std::fs::read(dir.path().join("files/half")).unwrap(), b"payload");
}

#[tokio::test]
async fn test_file_failure_skips_info_page() {
    let dir = tempfile::tempdir().unwrap();
    // Only the info directory exists, so the file write fails first.
    std::fs::create_dir_all(dir.path().join("info")).unwrap();
    let backend = FileBackend::new(options_for(dir.path()));

    let err = backend
        .store(StoredFile::from_bytes("nofile", "payload", "<p>info</p>"))
        .await
        .unwrap_err();

    assert!(matches!(err, BackendError::Io { .. }));
    assert!(err.internal_message().contains("nofile"));
    assert!(!dir.path().join("info/nofile.html").exists());
}

#[tokio::test]
async fn test_missing_option_is_reported_as_backend_error() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FileBackend::new(
        BackendOptions::new().with("file_path", format!("{}/{{name}}", dir.path().display())),
    );

    let err = backend
        .store(StoredFile::from_bytes("x", "data", ""))
        .await
        .unwrap_err();

    assert!(err.internal_message().contains("info_path"));
    assert!(!dir.path().join("x").exists());
}
